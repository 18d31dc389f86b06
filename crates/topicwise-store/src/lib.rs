//! Topicwise Store: append-only history of generated content.

pub mod history;
pub mod memory;
pub mod schema;
pub mod sqlite;

pub use history::{ContentHistoryStore, HistoryStats};
pub use memory::MemoryHistory;
pub use sqlite::SqliteHistory;
