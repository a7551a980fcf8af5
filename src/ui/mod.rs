mod input;
mod panels;
mod tabs;
mod theme;

use ratatui::{prelude::*, widgets::Block};
use sg_mod_tail::TailSet;

use crate::state::{State, Tab};

pub fn render(frame: &mut Frame, state: &mut State, tails: &mut TailSet) {
    let area = frame.area();

    frame.render_widget(Block::default().style(Style::default().bg(theme::BG_BASE)), area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(1),    // Results or file view
            Constraint::Length(3), // Command line
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    tabs::render_tab_bar(frame, state, tails, layout[0]);
    match state.selected_tab {
        Tab::Results => panels::render_results(frame, state, layout[1]),
        Tab::File(id) => match tails.get_mut(id) {
            Some(session) => panels::render_tail(frame, session, layout[1]),
            None => panels::render_results(frame, state, layout[1]),
        },
    }
    input::render_input(frame, state, layout[2]);
    input::render_hints(frame, state, layout[3]);
}
