// Problem list view - one row per problem with progress and difficulty

use crate::session::ProblemStatus;
use crate::tui::app::App;
use crate::tui::theme;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", app.list_title));

    if app.problems.is_empty() {
        let inner = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(
            Paragraph::new("No problems found.").style(Style::default().fg(theme::DIM)),
            inner,
        );
        return;
    }

    let header = Row::new(vec!["", "#", "Title", "Tags", "Difficulty"])
        .style(Style::default().fg(theme::DIM).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .problems
        .iter()
        .map(|problem| {
            let status = match app.session.current_status(problem.id) {
                ProblemStatus::Solved => Span::styled("✅", Style::default().fg(theme::SUCCESS)),
                ProblemStatus::Attempted => {
                    Span::styled("⚠", Style::default().fg(theme::WARNING))
                }
                ProblemStatus::None => Span::raw(" "),
            };

            Row::new(vec![
                Cell::from(status),
                Cell::from(format!("{}", problem.id)).style(Style::default().fg(theme::DIM)),
                Cell::from(problem.title.clone()).style(Style::default().fg(theme::FG)),
                Cell::from(problem.tags.join(", ")).style(Style::default().fg(theme::DIM)),
                Cell::from(problem.difficulty.clone())
                    .style(Style::default().fg(theme::difficulty_color(&problem.difficulty))),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Length(5),
            Constraint::Percentage(45),
            Constraint::Percentage(30),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default().with_selected(Some(app.selected_problem));
    f.render_stateful_widget(table, area, &mut state);
}
