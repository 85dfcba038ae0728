//! Draft view

use crate::mail::types::Draft;

fn field(value: &str) -> &str {
    if value.is_empty() { "(empty)" } else { value }
}

pub fn render_draft(draft: &Draft, sending: bool) -> String {
    let mut out = String::from(if sending {
        "Sending draft...\n"
    } else {
        "Draft (edit with `to`, `subject`, `body`; `send` or `cancel`)\n"
    });
    out.push_str(&format!("  From:    {}\n", draft.from()));
    out.push_str(&format!("  To:      {}\n", field(&draft.to)));
    out.push_str(&format!("  Subject: {}\n", field(&draft.subject)));
    out.push_str(&format!("  Body:    {}\n", field(&draft.html)));
    out
}
