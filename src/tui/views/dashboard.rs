// Dashboard view - problem collections and filter shortcuts

use crate::tui::app::{App, Prompt, TOPICS};
use crate::tui::theme;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // filters
        Constraint::Min(0),    // cards
    ])
    .split(area);

    render_filters(f, chunks[0], app);
    render_cards(f, chunks[1], app);
}

fn render_filters(f: &mut Frame, area: Rect, app: &App) {
    let line = match &app.prompt {
        Some(Prompt::Search(buffer)) => Line::from(vec![
            Span::styled("Search: ", Style::default().fg(theme::ACCENT)),
            Span::styled(buffer.clone(), Style::default().fg(theme::FG)),
            Span::styled("▏", Style::default().fg(theme::ACCENT)),
        ]),
        Some(Prompt::Topic) => {
            let mut spans = vec![Span::styled(
                "Topic: ",
                Style::default().fg(theme::ACCENT),
            )];
            for (i, topic) in TOPICS.iter().enumerate() {
                spans.push(Span::styled(
                    format!("[{i}] {topic}  "),
                    Style::default().fg(theme::FG),
                ));
            }
            Line::from(spans)
        }
        None => Line::from(vec![
            Span::styled("Difficulty: ", Style::default().fg(theme::DIM)),
            Span::styled("[1] Easy ", Style::default().fg(theme::SUCCESS)),
            Span::styled("[2] Medium ", Style::default().fg(theme::MEDIUM)),
            Span::styled("[3] Hard ", Style::default().fg(theme::ERROR)),
            Span::styled("   [f] topics   [/] search   [r] reload", Style::default().fg(theme::DIM)),
        ]),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" grind @ {} ", app.config.judge_url));
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_cards(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" Collections ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.cards.is_empty() {
        f.render_widget(
            Paragraph::new("No collections loaded. Press r to reload.")
                .style(Style::default().fg(theme::DIM)),
            inner,
        );
        return;
    }

    let mut lines = Vec::new();
    for (i, card) in app.cards.iter().enumerate() {
        let selected = i == app.selected_card;
        let marker = if selected { "▸ " } else { "  " };
        let title_style = if selected {
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::FG)
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{}", card.title), title_style),
            Span::styled(
                format!("  ({} Problems)", card.question_count),
                Style::default().fg(theme::DIM),
            ),
        ]));

        let description = if card.description.is_empty() {
            "Master the basics with this curated list."
        } else {
            card.description.as_str()
        };
        lines.push(Line::from(Span::styled(
            format!("    {description}"),
            Style::default().fg(theme::DIM),
        )));
        lines.push(Line::default());
    }

    let scroll = scroll_for_selection(app.selected_card, inner.height as usize);
    f.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), inner);
}

/// Each card occupies three lines; keep the selected one in view
fn scroll_for_selection(selected: usize, height: usize) -> usize {
    let top = selected * 3;
    if height == 0 || top + 3 <= height {
        0
    } else {
        top + 3 - height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_near_top_does_not_scroll() {
        assert_eq!(scroll_for_selection(0, 12), 0);
        assert_eq!(scroll_for_selection(2, 12), 0);
    }

    #[test]
    fn selection_below_the_fold_scrolls_into_view() {
        // Card 5 spans lines 15..18; viewport of 12 must scroll by 6
        assert_eq!(scroll_for_selection(5, 12), 6);
    }
}
