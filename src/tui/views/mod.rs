// View rendering - dispatches to the active screen and draws overlays

mod dashboard;
mod editor;
mod list;

use super::app::{App, View};
use super::components::status_bar;
use super::modal::Modal;
use super::theme;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(f.area());

    match app.view {
        View::Dashboard => dashboard::render(f, chunks[0], app),
        View::List => list::render(f, chunks[0], app),
        View::Editor => editor::render(f, chunks[0], app),
    }

    status_bar::render(f, chunks[1], app);

    if let Some(modal) = app.modal {
        draw_modal(f, modal);
    }
}

fn draw_modal(f: &mut Frame, modal: Modal) {
    let area = centered_rect(f.area(), 60, 12);
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT))
        .title(format!(" {} ", modal.title()));

    let lines: Vec<Line> = match modal {
        Modal::ConfirmReset => vec![
            Line::default(),
            Line::from("Reset code to default?"),
            Line::from("This will lose your current changes."),
            Line::default(),
            Line::from(vec![
                Span::styled("[y] ", Style::default().fg(theme::ERROR)),
                Span::raw("reset    "),
                Span::styled("[n] ", Style::default().fg(theme::SUCCESS)),
                Span::raw("keep my code"),
            ]),
        ],
        Modal::Help => vec![
            help_line("j/k or arrows", "navigate lists"),
            help_line("Enter", "open collection / problem"),
            help_line("1/2/3, f, /", "filter by difficulty, topic, search"),
            help_line("Ctrl+Enter", "run with custom input"),
            help_line("Ctrl+Shift+Enter", "submit against all tests"),
            help_line("Ctrl+T / Ctrl+P", "cycle tabs / console panes"),
            help_line("Ctrl+L", "switch language"),
            help_line("Ctrl+R", "reset buffer to boilerplate"),
            help_line("Esc", "back"),
            help_line("q / Ctrl+Q", "quit"),
        ],
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn help_line(keys: &str, action: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" {keys:<18}"),
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(action.to_string(), Style::default().fg(theme::FG)),
    ])
}

/// A centered rect of at most `width` x `height` inside `area`
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
