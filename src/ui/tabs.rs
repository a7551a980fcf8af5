use ratatui::{prelude::*, widgets::Paragraph};
use sg_mod_tail::TailSet;

use super::theme;
use crate::state::{State, Tab};

pub fn render_tab_bar(frame: &mut Frame, state: &State, tails: &TailSet, area: Rect) {
    let base = Style::default().bg(theme::BG_BASE).fg(theme::TEXT_MUTED);
    let selected = Style::default().bg(theme::ACCENT).fg(theme::BG_BASE).bold();

    let mut spans = vec![Span::styled(" ", base)];
    let tabs = std::iter::once((Tab::Results, "Results")).chain(tails.iter().map(|s| (Tab::File(s.id()), s.label())));
    for (tab, label) in tabs {
        let style = if tab == state.selected_tab { selected } else { base };
        spans.push(Span::styled(format!(" {} ", label), style));
        spans.push(Span::styled(" ", base));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(base), area);
}
