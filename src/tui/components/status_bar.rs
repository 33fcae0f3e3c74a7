// Status bar component
//
// One line at the bottom: current view, active problem and language,
// autosave state, progress counts, and the most recent warning.

use super::truncate_to_width;
use crate::tui::app::{App, View};
use crate::tui::theme;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::time::Duration;

/// How long the "saved" flash stays visible after an autosave flush
const SAVED_FLASH: Duration = Duration::from_secs(2);

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut spans: Vec<Span> = vec![
        Span::styled(
            format!(" {} ", app.view.name()),
            Style::default().fg(theme::FG).bg(theme::ACCENT),
        ),
        Span::raw(" "),
    ];

    if app.view == View::Editor {
        if let Some(detail) = &app.detail {
            spans.push(Span::styled(
                truncate_to_width(&format!("{}. {}", detail.id, detail.title), 40),
                Style::default().fg(theme::FG),
            ));
            spans.push(Span::styled(
                format!(" [{}]", app.session.current_language()),
                Style::default().fg(theme::ACCENT),
            ));
        }

        let save_state = if app.session.autosave_pending() {
            Some(Span::styled("  saving…", Style::default().fg(theme::DIM)))
        } else if app
            .last_autosave
            .is_some_and(|at| at.elapsed() < SAVED_FLASH)
        {
            Some(Span::styled("  saved", Style::default().fg(theme::SUCCESS)))
        } else {
            None
        };
        spans.extend(save_state);

        spans.push(Span::styled(
            format!("  edit:{}", app.focus.name()),
            Style::default().fg(theme::DIM),
        ));
    }

    let (solved, attempted) = app.session.progress_counts();
    spans.push(Span::styled(
        format!("  ✅ {solved} ⚠ {attempted}"),
        Style::default().fg(theme::DIM),
    ));

    if app.session.storage_degraded() {
        spans.push(Span::styled(
            "  mem-only",
            Style::default().fg(theme::ERROR),
        ));
    }

    // One warning slot: an explicit notice first, else the last warning
    // captured from tracing
    if let Some(notice) = &app.notice {
        spans.push(Span::styled(
            format!("  {}", truncate_to_width(notice, 60)),
            Style::default().fg(theme::WARNING),
        ));
    } else if let Some(entry) = app.log_buffer.last_warning() {
        spans.push(Span::styled(
            format!("  {}", truncate_to_width(&entry.message, 60)),
            Style::default().fg(theme::WARNING),
        ));
    }

    spans.push(Span::styled(
        "  ? help",
        Style::default().fg(theme::DIM),
    ));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
