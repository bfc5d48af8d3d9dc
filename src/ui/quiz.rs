use ratatui::{
    prelude::*,
    widgets::{Gauge, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::{Label, Question};
use crate::session::{QuizSession, format_remaining};

const LOW_TIME_SECS: u32 = 60;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = app.session() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_header(frame, chunks[0], app.title(), session);
    render_progress(frame, chunks[1], session);

    let question = session.current_question();
    render_question_text(frame, chunks[2], &question.text);
    render_options(
        frame,
        chunks[3],
        question,
        session.current_answer(),
        app.highlighted(),
    );
    super::render_status(frame, chunks[4], app);
    render_controls(frame, chunks[5], session);
}

fn render_header(frame: &mut Frame, area: Rect, title: &str, session: &QuizSession) {
    let [title_area, info_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(20)]).areas(area);

    frame.render_widget(Paragraph::new(title).fg(Color::Cyan).bold(), title_area);

    let remaining = session.remaining_seconds();
    let time_color = if remaining <= LOW_TIME_SECS {
        Color::Red
    } else {
        Color::DarkGray
    };
    let info = Line::from(vec![
        Span::styled(
            format!("{}/{}  ", session.current_question_number(), session.total_questions()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(format_remaining(remaining), Style::default().fg(time_color)),
    ]);
    frame.render_widget(Paragraph::new(info).alignment(Alignment::Right), info_area);
}

fn render_progress(frame: &mut Frame, area: Rect, session: &QuizSession) {
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Blue).bg(Color::Reset))
        .percent(session.progress_percent())
        .label("");
    frame.render_widget(gauge, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    question: &Question,
    answer: Option<Label>,
    highlighted: Label,
) {
    let mut lines: Vec<Line> = Vec::with_capacity(Label::ALL.len() * 2);

    for label in Label::ALL {
        let is_selected = answer == Some(label);
        let style = if is_selected {
            Style::default().fg(Color::Blue).bold()
        } else if label == highlighted {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if label == highlighted { ">" } else { " " };
        let check = if is_selected { "  ✓" } else { "" };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", label), style),
            Span::styled(question.option(label), style),
            Span::styled(check, style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_controls(frame: &mut Frame, area: Rect, session: &QuizSession) {
    let forward = if session.is_last_question() {
        "l submit"
    } else {
        "l next"
    };
    let text = format!("a-d answer  ·  j/k move  ·  enter select  ·  h back  ·  {}  ·  q quit", forward);
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
