pub mod api_client;
pub mod clipboard;
pub mod config;
pub mod debouncer;
pub mod detail;
pub mod export;
pub mod favorites;
pub mod fetch;
pub mod logging;
pub mod search;
pub mod selection;
pub mod term;
pub mod ui;
