//! Text helpers shared by the views

use chrono::{DateTime, Datelike, Local, Utc};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cut `s` to at most `max_width` terminal columns, marking the cut with "...".
pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let (budget, suffix) = if max_width > 3 {
        (max_width - 3, "...")
    } else {
        (max_width, "")
    };

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(suffix);
    out
}

/// Truncate then pad with spaces to exactly `width` columns.
pub fn fit(s: &str, width: usize) -> String {
    let mut out = truncate_string(s, width);
    let pad = width.saturating_sub(out.width());
    out.extend(std::iter::repeat_n(' ', pad));
    out
}

/// Relative age for list rows: "just now", "5m ago", "3h ago", "2d ago", "4mo ago", "1y ago".
pub fn time_ago(dt: DateTime<Utc>) -> String {
    time_ago_at(dt, Utc::now())
}

fn time_ago_at(dt: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(dt);
    let days = age.num_days();
    if age.num_minutes() < 1 {
        // Also covers timestamps slightly in the future.
        "just now".to_string()
    } else if age.num_hours() < 1 {
        format!("{}m ago", age.num_minutes())
    } else if days < 1 {
        format!("{}h ago", age.num_hours())
    } else if days < 30 {
        format!("{}d ago", days)
    } else if days < 365 {
        format!("{}mo ago", days / 30)
    } else {
        format!("{}y ago", days / 365)
    }
}

pub fn format_date(dt: DateTime<Utc>) -> String {
    format_date_at(dt, Local::now())
}

fn format_date_at(dt: DateTime<Utc>, now: DateTime<Local>) -> String {
    let dt = dt.with_timezone(&Local);
    let today = now.date_naive();
    let date = dt.date_naive();

    if date == today {
        dt.format("%H:%M").to_string()
    } else if (today - date).num_days() < 7 && date < today {
        dt.format("%a %H:%M").to_string()
    } else if date.year() == today.year() {
        dt.format("%b %d").to_string()
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}

/// Sanitize text for display: drop ANSI escape sequences, blank out control characters
pub fn sanitize_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // Runs until the final letter of the sequence.
            for ch in chars.by_ref() {
                if ch.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        if c.is_control() && c != '\n' && c != '\t' {
            result.push(' ');
        } else {
            result.push(c);
        }
    }

    result
}

/// Collapse a (possibly multi-line) text into a single line for list previews.
pub fn one_line(text: &str) -> String {
    sanitize_text(text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
