//! Configuration: server endpoints, behavior toggles, and display options,
//! loaded from a TOML file in the user config directory.

pub mod config;

pub use config::Config;
