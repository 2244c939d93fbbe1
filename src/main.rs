//! Binary entry point that glues the blob-backed entry store to the TUI.
//! Summarizing the bootstrapping pipeline here keeps the intent obvious when
//! revisiting the code: we set up file logging, open the storage blob,
//! hydrate the entry history, and drive the Ratatui event loop until the
//! user exits.
use anyhow::Context as _;
use moodlog::{init_logging, run_app, App, EntryStore, FileStore};

/// Initialize logging and persistence, load the entry history, and launch
/// the Ratatui event loop.
///
/// Returning a `Result` bubbles up fatal initialization problems (for example
/// a missing home directory) to the terminal instead of crashing silently.
/// Loading the history itself never fails: corrupt or absent storage just
/// starts an empty journal.
fn main() -> anyhow::Result<()> {
    init_logging();

    let backend = FileStore::open_default().context("failed to open entry storage")?;
    let store = EntryStore::load(backend);

    let mut app = App::new(store);
    run_app(&mut app)
}
