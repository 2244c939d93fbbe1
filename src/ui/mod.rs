//! Ratatui front-end split across logical submodules. The app state and its
//! key handling live in `app`; `terminal` owns raw-mode setup and the
//! draw/poll loop; the remaining modules hold screen-scoped state and small
//! rendering helpers.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
