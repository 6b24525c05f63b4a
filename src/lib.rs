//! Shared shape of a todo entry, plus the pieces a consumer needs around it:
//! boundary codecs, a Markdown checklist reader and a small owning list.

pub mod codec;
pub mod config;
pub mod error;
pub mod list;
pub mod models;
pub mod parser;

pub use codec::Format;
pub use config::Config;
pub use error::{Error, Result};
pub use list::TodoList;
pub use models::{Todo, TodoId};
