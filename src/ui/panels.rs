use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use sg_mod_tail::TailSession;

use super::theme;
use crate::state::{ResultKind, State};

fn panel_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER))
        .style(Style::default().bg(theme::BG_SURFACE))
        .title(Span::styled(format!(" {} ", title), Style::default().fg(theme::ACCENT)))
}

pub fn render_results(frame: &mut Frame, state: &State, area: Rect) {
    let block = panel_block("Results");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let height = inner.height as usize;
    let end = state.results.len().saturating_sub(state.results_scroll);
    let start = end.saturating_sub(height);

    let lines: Vec<Line> = state.results[start..end]
        .iter()
        .map(|entry| {
            let (marker, color) = match entry.kind {
                ResultKind::Command => ("> ", theme::TEXT),
                ResultKind::Info => ("  ", theme::SUCCESS),
                ResultKind::Error => ("! ", theme::ERROR),
            };
            Line::from(vec![
                Span::styled(entry.at.format("%H:%M:%S ").to_string(), Style::default().fg(theme::TEXT_MUTED)),
                Span::styled(marker, Style::default().fg(color)),
                Span::styled(entry.text.clone(), Style::default().fg(color)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// The tail view scrolls to the end only here, once the viewport size is known.
pub fn render_tail(frame: &mut Frame, session: &mut TailSession, area: Rect) {
    let title = session.path().display().to_string();
    let block = panel_block(&title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let view = session.view_mut();
    let top = view.layout(inner.height as usize);
    let paragraph = Paragraph::new(view.text())
        .style(Style::default().fg(theme::TEXT))
        .scroll((top.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(paragraph, inner);
}
