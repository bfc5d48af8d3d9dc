use ratatui::{
    prelude::*,
    widgets::{Gauge, Paragraph},
};

use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .horizontal_margin(4)
    .split(area);

    let source = app.document().map_or_else(
        || "your document".to_string(),
        |document| format!("{} ({} KB)", document.display_name(), document.size().div_ceil(1024)),
    );
    let heading = Paragraph::new(format!("Generating quiz from {}", source))
        .alignment(Alignment::Center)
        .fg(Color::Cyan)
        .bold();
    frame.render_widget(heading, chunks[1]);

    let progress = app.generation_progress();
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
        .percent(progress)
        .label(format!("{}%", progress));
    frame.render_widget(gauge, chunks[2]);

    super::render_status(frame, chunks[4], app);

    let controls = Paragraph::new("esc cancel  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(controls, chunks[5]);
}
