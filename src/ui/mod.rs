//! Terminal UI: the event loop, key dispatch, and all rendering. The
//! controllers in the crate root stay terminal-free; everything here only
//! reads their state snapshots.

pub mod app;
pub mod overlay;

pub use app::{run_tui_app, TuiApp};
