//! Chat message cells for the terminal.
//!
//! A message is dispatched by content type to a [`dispatch::MessageRenderer`];
//! rich content selections are reported back as `(text_to_send, element)`.

pub mod config;
pub mod dispatch;
pub mod log_error;
pub mod models;
pub mod tui;
