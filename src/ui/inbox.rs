//! Inbox list view

use std::fmt::Write;

use crate::app::state::InboxView;
use crate::constants::{LIST_PREVIEW_WIDTH, LIST_SUBJECT_WIDTH, LIST_TITLE_WIDTH};
use crate::mail::types::Message;

use super::widgets::{fit, one_line, time_ago, truncate_string};

pub fn render_header(view: &InboxView) -> String {
    let Some(mailbox) = &view.mailbox else {
        return "No mailbox selected. Use `mailbox <address>` to open one.".to_string();
    };

    let mut header = mailbox.to_string();
    if let Some(total) = view.total {
        let _ = write!(header, " | {} messages", total);
    }
    if view.needs_pagination() {
        let _ = write!(header, " | page {} of {}", view.page, view.page_count);
    }
    if view.auto_refresh {
        header.push_str(" | auto-refresh");
    }
    if view.loading {
        header.push_str(" | loading...");
    }
    header
}

fn render_row(row: usize, message: &Message, view: &InboxView) -> String {
    let cursor = if view.selected.as_ref() == Some(&message.id) {
        '>'
    } else {
        ' '
    };
    let checkbox = if view.is_bulk_selected(&message.id) {
        "[x]"
    } else {
        "[ ]"
    };
    let unread = if message.is_read() { ' ' } else { '*' };
    let date = message.timestamp().map(time_ago).unwrap_or_default();
    let preview = one_line(&message.body_text());

    format!(
        "{}{:>3} {} {} {} {} {}  {}",
        cursor,
        row,
        checkbox,
        unread,
        fit(&one_line(message.display_title()), LIST_TITLE_WIDTH),
        fit(&one_line(message.subject()), LIST_SUBJECT_WIDTH),
        truncate_string(&preview, LIST_PREVIEW_WIDTH),
        date
    )
}

/// The full list: header, one row per message, then selection and paging hints.
pub fn render_list(view: &InboxView) -> String {
    let mut out = render_header(view);
    out.push('\n');
    if view.mailbox.is_none() {
        return out;
    }

    if view.messages.is_empty() {
        if view.total.is_some() {
            out.push_str("  No messages\n");
        } else if view.loading {
            out.push_str("  Loading...\n");
        }
    }
    for (i, message) in view.messages.iter().enumerate() {
        out.push_str(&render_row(i + 1, message, view));
        out.push('\n');
    }

    if !view.bulk_selected.is_empty() {
        let _ = write!(out, "  {} checked", view.bulk_selected.len());
        if view.bulk_pending {
            out.push_str(" (marking as read...)");
        }
        out.push('\n');
    }
    if view.needs_pagination() {
        let _ = writeln!(
            out,
            "  Page {} of {}. Use `page <n>` to move.",
            view.page, view.page_count
        );
    }
    out
}
