//! Plain-text rendering of inbox snapshots for the interactive prompt.

mod composer;
mod inbox;
mod reader;
mod widgets;

use crate::app::state::InboxView;
use crate::command::available_commands;

/// Render the list followed by the open message and the draft, when present.
pub fn render(view: &InboxView) -> String {
    let mut out = inbox::render_list(view);
    if let Some(message) = view.selected_message() {
        out.push('\n');
        out.push_str(&reader::render_message(message));
    }
    if let Some(draft) = &view.draft {
        out.push('\n');
        out.push_str(&composer::render_draft(draft, view.sending));
    }
    out
}

pub fn render_help() -> String {
    let commands = available_commands();
    let width = commands.iter().map(|c| c.name.len()).max().unwrap_or(0);
    commands
        .iter()
        .map(|c| format!("  {:width$}  {}\n", c.name, c.description, width = width))
        .collect()
}
