//! Clipboard history: capture, persistence, and plain-text export.

pub mod capture;
pub mod clipboard;
pub mod config;
pub mod entry;
pub mod error;
pub mod logging;
pub mod storage;
pub mod transfer;

pub use entry::{Entry, EntryKind};
pub use error::HistoryError;
pub use storage::{HistoryStore, ImportSummary};
