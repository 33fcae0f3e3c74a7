// Editor view - problem panel, editing surface and console
//
// Left: the four content tabs (description, hints, solution, notes).
// Right: the code editing surface. Bottom: the two-pane console. The
// description and solution are shown as plain text; markup rendering is
// out of scope for this client.

use crate::session::{ConsolePane, Tab};
use crate::tui::app::{App, Focus};
use crate::tui::editor::{CodeArea, EditSurface};
use crate::tui::theme;
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::vertical([
        Constraint::Min(8),     // tabs + editor
        Constraint::Length(10), // console
    ])
    .split(area);

    let columns = Layout::horizontal([
        Constraint::Percentage(45),
        Constraint::Percentage(55),
    ])
    .split(chunks[0]);

    render_tab_panel(f, columns[0], app);
    render_code_panel(f, columns[1], app);
    render_console(f, chunks[1], app);
}

fn render_tab_panel(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).split(area);

    let active = app.session.current_tab();
    let index = Tab::ALL.iter().position(|t| *t == active).unwrap_or(0);
    let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(t.name())).collect();
    let tabs = Tabs::new(titles)
        .select(index)
        .style(Style::default().fg(theme::DIM))
        .highlight_style(
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, chunks[0]);

    match active {
        Tab::Description => render_description(f, chunks[1], app),
        Tab::Hints => render_hints(f, chunks[1], app),
        Tab::Solution => render_solution(f, chunks[1], app),
        Tab::Notes => {
            let focused = app.focus == Focus::Notes;
            render_text_area(f, chunks[1], &mut app.notes, " Notes ", focused);
        }
    }
}

fn render_description(f: &mut Frame, area: Rect, app: &App) {
    let Some(detail) = &app.detail else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{}. {}", detail.id, detail.title),
            Style::default().fg(theme::FG).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];
    lines.extend(text_lines(&detail.description, theme::FG));

    if !detail.input_format.is_empty() {
        lines.push(Line::default());
        lines.push(section_header("Input"));
        lines.extend(text_lines(&detail.input_format, theme::FG));
    }
    if !detail.output_format.is_empty() {
        lines.push(Line::default());
        lines.push(section_header("Output"));
        lines.extend(text_lines(&detail.output_format, theme::FG));
    }

    if !detail.examples.is_empty() {
        lines.push(Line::default());
        lines.push(section_header("Examples"));
        for (i, example) in detail.examples.iter().enumerate() {
            lines.push(Line::from(Span::styled(
                format!("Ex {}:", i + 1),
                Style::default().fg(theme::ACCENT),
            )));
            lines.push(Line::from(Span::styled("Input:", Style::default().fg(theme::DIM))));
            lines.extend(text_lines(&example.input, theme::FG));
            lines.push(Line::from(Span::styled(
                "Output:",
                Style::default().fg(theme::DIM),
            )));
            lines.extend(text_lines(&example.output, theme::FG));
            lines.push(Line::default());
        }
    }

    let block = Block::default().borders(Borders::ALL);
    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

fn render_hints(f: &mut Frame, area: Rect, app: &App) {
    let Some(detail) = &app.detail else {
        return;
    };

    let lines: Vec<Line> = if detail.hints.is_empty() {
        vec![Line::from(Span::styled(
            "No hints.",
            Style::default().fg(theme::DIM),
        ))]
    } else {
        detail
            .hints
            .iter()
            .enumerate()
            .flat_map(|(i, hint)| {
                let mut lines = vec![Line::from(Span::styled(
                    format!("{}. {}", i + 1, hint),
                    Style::default().fg(theme::FG),
                ))];
                lines.push(Line::default());
                lines
            })
            .collect()
    };

    let block = Block::default().borders(Borders::ALL).title(" Hints ");
    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

fn render_solution(f: &mut Frame, area: Rect, app: &App) {
    let Some(detail) = &app.detail else {
        return;
    };

    let lines = if detail.solution.is_empty() {
        vec![Line::from(Span::styled(
            "No solution available.",
            Style::default().fg(theme::DIM),
        ))]
    } else {
        text_lines(&detail.solution, theme::FG)
    };

    let block = Block::default().borders(Borders::ALL).title(" Solution ");
    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

fn render_code_panel(f: &mut Frame, area: Rect, app: &mut App) {
    let title = format!(" {} [Ctrl+L to switch] ", app.code.language());
    let focused = app.focus == Focus::Code;
    render_code_area(f, area, &mut app.code, &title, focused, true);
}

fn render_console(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).split(area);

    let pane = app.session.current_pane();
    let index = match pane {
        ConsolePane::Output => 0,
        ConsolePane::Input => 1,
    };
    let tabs = Tabs::new(vec![
        Line::from(ConsolePane::Output.name()),
        Line::from(ConsolePane::Input.name()),
    ])
    .select(index)
    .style(Style::default().fg(theme::DIM))
    .highlight_style(
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    );
    f.render_widget(tabs, chunks[0]);

    match pane {
        ConsolePane::Output => {
            let block = Block::default().borders(Borders::ALL);
            let text = text_lines(&app.console.text, app.console.tone.color());
            f.render_widget(
                Paragraph::new(text).wrap(Wrap { trim: false }).block(block),
                chunks[1],
            );
        }
        ConsolePane::Input => {
            let focused = app.focus == Focus::Input;
            render_text_area(f, chunks[1], &mut app.custom_input, " stdin ", focused);
        }
    }
}

/// Plain editable area without line numbers (notes, custom input)
fn render_text_area(f: &mut Frame, area: Rect, text: &mut CodeArea, title: &str, focused: bool) {
    render_code_area(f, area, text, title, focused, false);
}

fn render_code_area(
    f: &mut Frame,
    area: Rect,
    code: &mut CodeArea,
    title: &str,
    focused: bool,
    line_numbers: bool,
) {
    let border_style = if focused {
        Style::default().fg(theme::ACCENT)
    } else {
        Style::default().fg(theme::DIM)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title.to_string());
    let inner = block.inner(area);
    f.render_widget(block, area);

    code.scroll_to_cursor(inner.height as usize);

    let gutter = if line_numbers {
        format!("{}", code.line_count()).len() + 1
    } else {
        0
    };

    let lines: Vec<Line> = code
        .lines()
        .iter()
        .enumerate()
        .skip(code.scroll)
        .take(inner.height as usize)
        .map(|(i, line)| {
            let mut spans = Vec::new();
            if line_numbers {
                spans.push(Span::styled(
                    format!("{:>width$} ", i + 1, width = gutter - 1),
                    Style::default().fg(theme::DIM),
                ));
            }
            spans.push(Span::styled(line.clone(), Style::default().fg(theme::FG)));
            Line::from(spans)
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);

    if focused {
        let (row, col) = code.cursor();
        let line = &code.lines()[row];
        let prefix: String = line.chars().take(col).collect();
        let x = inner.x + gutter as u16 + prefix.width() as u16;
        let y = inner.y + (row - code.scroll) as u16;
        if x < inner.right() && y < inner.bottom() {
            f.set_cursor_position(Position::new(x, y));
        }
    }
}

fn section_header(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Split raw text into styled lines, preserving blank lines
fn text_lines(text: &str, color: ratatui::style::Color) -> Vec<Line<'static>> {
    text.split('\n')
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(color))))
        .collect()
}
