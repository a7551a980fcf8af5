use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::state::State;

const STATUS_LABEL: &str = " backend unavailable ";

pub fn render_input(frame: &mut Frame, state: &State, area: Rect) {
    let title = if state.is_prompting() { " Watch file (Enter to open, Esc to cancel) " } else { " Command " };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_FOCUS))
        .style(Style::default().bg(theme::BG_INPUT))
        .title(Span::styled(title, Style::default().fg(theme::ACCENT)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut text_width = inner.width;
    if state.show_status_label() && !state.is_prompting() {
        let label_width = STATUS_LABEL.len() as u16;
        text_width = text_width.saturating_sub(label_width);
        let status = Paragraph::new(Span::styled(STATUS_LABEL, Style::default().fg(theme::BG_BASE).bg(theme::WARNING)))
            .alignment(Alignment::Right);
        frame.render_widget(status, inner);
    }

    let text_area = Rect { width: text_width, ..inner };
    frame.render_widget(
        Paragraph::new(Span::styled(state.input.text(), Style::default().fg(theme::TEXT))),
        text_area,
    );

    let column = (state.input.cursor_column() as u16).min(text_width.saturating_sub(1));
    frame.set_cursor_position((inner.x + column, inner.y));
}

pub fn render_hints(frame: &mut Frame, state: &State, area: Rect) {
    let base = Style::default().bg(theme::BG_BASE).fg(theme::TEXT_MUTED);
    let key = Style::default().bg(theme::BG_BASE).fg(theme::ACCENT_DIM).bold();
    let hints: &[(&str, &str)] = if state.is_prompting() {
        &[("Enter", "open"), ("Up/Down", "presets"), ("Esc", "cancel")]
    } else {
        &[
            ("Esc", "hide"),
            ("Tab", "switch"),
            ("^O", "watch file"),
            ("^W", "close tab"),
            ("^K", "pick"),
            ("^G", "gc"),
            ("^L", "clear history"),
            ("^Q", "quit"),
        ]
    };

    let mut spans = vec![Span::styled(" ", base)];
    for (k, what) in hints {
        spans.push(Span::styled(*k, key));
        spans.push(Span::styled(format!(" {}  ", what), base));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(base), area);
}
