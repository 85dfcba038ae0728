//! Message detail view

use crate::mail::types::Message;

use super::widgets::{format_date, sanitize_text};

pub fn render_message(message: &Message) -> String {
    let mut out = String::new();

    let from = match (&message.from_name, &message.from) {
        (Some(name), Some(addr)) if !name.trim().is_empty() => format!("{} <{}>", name, addr),
        (_, Some(addr)) => addr.clone(),
        (Some(name), None) => name.clone(),
        (None, None) => "(unknown sender)".to_string(),
    };
    out.push_str(&format!("From:    {}\n", sanitize_text(&from)));
    if let Some(to) = &message.to {
        out.push_str(&format!("To:      {}\n", sanitize_text(to)));
    }
    if let Some(date) = message.timestamp() {
        out.push_str(&format!("Date:    {}\n", format_date(date)));
    }
    out.push_str(&format!("Subject: {}\n", sanitize_text(message.subject())));
    out.push('\n');
    out.push_str(&sanitize_text(&message.body_text()));
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::types::make_message;

    #[test]
    fn test_render_message() {
        let message = make_message("m1", true);
        let out = render_message(&message);
        assert!(out.starts_with("From:    Sender <sender@example.com>\n"));
        assert!(out.contains("Subject: Subject m1\n"));
        assert!(out.ends_with("Body of m1\n"));
    }

    #[test]
    fn test_render_html_body_as_text() {
        let mut message = make_message("m1", true);
        message.html = Some("<p>Hello <b>there</b></p>".to_string());
        let out = render_message(&message);
        assert!(out.contains("Hello"));
        assert!(!out.contains("<p>"));
    }
}
