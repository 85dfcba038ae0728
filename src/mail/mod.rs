pub mod http;
#[cfg(test)]
pub mod mock;
pub mod service;
pub mod types;

pub use http::HttpMailService;
pub use service::MailService;
