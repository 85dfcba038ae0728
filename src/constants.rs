//! Application-wide constants for tuning and configuration
//!
//! Centralizes magic numbers to make them discoverable and configurable.

/// Default number of messages requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Interval between automatic refreshes while auto-refresh is enabled.
pub const POLL_INTERVAL_MS: u64 = 5000;

/// Identical list requests issued within this window share a single result.
/// Keeps a double-clicked refresh or a tick racing a manual action from hitting the server twice.
pub const DEDUP_WINDOW_MS: u64 = 2000;

/// Upper bound on distinct (mailbox, page, size) keys held in the dedup cache.
pub const DEDUP_CACHE_CAPACITY: u64 = 64;

/// Default HTTP request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Command channel capacity for the inbox engine.
pub const ENGINE_COMMAND_CAPACITY: usize = 64;

/// Event channel capacity for the inbox engine.
pub const ENGINE_EVENT_CAPACITY: usize = 128;

// === Rendering ===

/// Column width of the sender/title cell in the list view.
pub const LIST_TITLE_WIDTH: usize = 24;

/// Column width of the subject cell in the list view.
pub const LIST_SUBJECT_WIDTH: usize = 36;

/// Maximum characters of body preview shown per row.
pub const LIST_PREVIEW_WIDTH: usize = 60;

/// Wrap width used when converting HTML bodies to text.
pub const HTML_WRAP_WIDTH: usize = 80;
