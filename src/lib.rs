//! Core library surface for the moodlog TUI application.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as potential external tooling can reuse the same
//! pieces. Keeping the glue logic documented makes it easy to recall why each
//! re-export exists when revisiting the project.
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;

/// Convenience re-exports for the persistence layer. `main.rs` uses these to
/// open the blob file and hydrate the entry history before drawing anything.
pub use store::{EntryStore, FileStore};

/// The domain types other layers manipulate.
pub use models::{Context, Draft, Mood, MoodEntry, WeekStats};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};

/// The file-backed tracing setup used by the binary.
pub use logging::init_logging;
