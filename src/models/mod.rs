//! Data models for chat messages and their content

mod group;
mod message;
pub mod mock;
mod rich;
mod transcript;

pub use group::*;
pub use message::*;
pub use rich::*;
pub use transcript::*;
