use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::Label;
use crate::session::review::{self, Grade, OptionMark, QuestionReview};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = app.session() else {
        return;
    };

    let score = session.score().unwrap_or_default();
    let total = session.total_questions();
    let percentage = review::grade_percentage(score, total);

    let chunks = Layout::vertical([
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[0], app.title(), score, total, percentage);
    render_review(frame, chunks[1], &review::review(session), app.result_scroll());
    super::render_status(frame, chunks[2], app);
    render_controls(frame, chunks[3], app.is_generating());
}

fn grade_color(grade: Grade) -> Color {
    match grade {
        Grade::Excellent => Color::Green,
        Grade::Good => Color::Cyan,
        Grade::Pass => Color::Yellow,
        Grade::Fail => Color::Red,
    }
}

fn render_score_summary(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    score: usize,
    total: usize,
    percentage: f64,
) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            title.to_uppercase(),
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} / {}  ({}%)",
                score,
                total,
                review::rounded_percentage(score, total)
            ),
            Style::default()
                .fg(grade_color(review::grade(percentage)))
                .bold(),
        )),
        Line::from(review::feedback(percentage).fg(Color::White)),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_review(frame: &mut Frame, area: Rect, reviews: &[QuestionReview<'_>], scroll: usize) {
    let mut lines: Vec<Line> = Vec::new();
    // Line offset of each question, so scrolling moves one question at a time.
    let mut offsets = Vec::with_capacity(reviews.len());

    for review in reviews {
        offsets.push(lines.len());
        let (symbol, color) = if review.is_correct {
            ("+", Color::Green)
        } else {
            ("-", Color::Red)
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
            Span::styled(
                format!("{:2}. ", review.index + 1),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(review.question.text.as_str(), Style::default().fg(Color::White).bold()),
        ]));

        for label in Label::ALL {
            lines.push(render_option(review, label));
        }
        lines.push(Line::from(""));
    }

    let offset = offsets.get(scroll).copied().unwrap_or_default();
    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((offset as u16, 0));
    frame.render_widget(widget, area);
}

fn render_option<'a>(review: &QuestionReview<'a>, label: Label) -> Line<'a> {
    let (marker, style) = match review.marks[label.index()] {
        OptionMark::Correct => ("✓", Style::default().fg(Color::Green)),
        OptionMark::IncorrectlySelected => ("✗", Style::default().fg(Color::Red)),
        OptionMark::Neutral => (" ", Style::default().fg(Color::DarkGray)),
    };

    Line::from(vec![
        Span::styled(format!("      {} {}. ", marker, label), style),
        Span::styled(review.question.option(label), style),
    ])
}

fn render_controls(frame: &mut Frame, area: Rect, generating: bool) {
    let regenerate = if generating {
        "generating..."
    } else {
        "g new questions"
    };
    let text = format!(
        "j/k scroll  ·  r retake  ·  {}  ·  u other pdf  ·  q quit",
        regenerate
    );
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
