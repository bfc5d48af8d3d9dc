mod generating;
mod quiz;
mod result;
mod upload;

use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph},
};

use crate::app::{App, StatusLevel};
use crate::models::AppState;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.state {
        AppState::Upload => upload::render(frame, area, app),
        AppState::Generating => generating::render(frame, area, app),
        AppState::Quiz => quiz::render(frame, area, app),
        AppState::Result => result::render(frame, area, app),
    }
}

/// One-line status message, the terminal stand-in for a toast.
fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let Some(status) = app.status() else {
        return;
    };

    let color = match status.level {
        StatusLevel::Info => Color::Cyan,
        StatusLevel::Error => Color::Red,
    };
    let widget = Paragraph::new(status.text.as_str())
        .alignment(Alignment::Center)
        .fg(color);
    frame.render_widget(widget, area);
}
