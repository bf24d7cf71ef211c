use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub behavior: BehaviorConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Free-text search endpoint (positional row payload).
    pub search_url: String,

    /// Base URL for per-term detail, annotation, and neighbor endpoints.
    pub term_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Debounce window between the last keystroke and the search request.
    pub debounce_ms: u64,

    /// Maximum rows requested from the search endpoint per call.
    pub max_results: usize,

    /// Export filename (written to export_dir or the working directory).
    pub export_filename: String,

    /// Directory for exports; working directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,

    /// Empty the selection after a successful export.
    pub clear_selection_after_export: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show the HPO id next to each search result name.
    pub show_result_ids: bool,

    /// Separator between result name and id.
    pub result_id_separator: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            behavior: BehaviorConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            search_url: "https://ontology.jax.org/api/hp/suggest".to_string(),
            term_url: "https://ontology.jax.org/api/hp/terms".to_string(),
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            max_results: crate::api_client::MAX_SEARCH_RESULTS,
            export_filename: "HPO.txt".to_string(),
            export_dir: None,
            clear_selection_after_export: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_result_ids: true,
            result_id_separator: " - ".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, creating it on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to the default location.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("hpo-cli").join("config.toml"))
    }

    /// A commented template for `--generate-config`.
    pub fn create_default_with_comments() -> String {
        r#"# hpo-cli Configuration File
# Location: ~/.config/hpo-cli/config.toml (Linux/macOS)
#           %APPDATA%\hpo-cli\config.toml (Windows)

[server]
# Free-text search endpoint. Answers with a positional JSON array whose
# fourth element is the result row list.
search_url = "https://ontology.jax.org/api/hp/suggest"

# Base URL for term detail requests. The client appends /{id},
# /{id}/annotations, /{id}/parents and /{id}/children.
term_url = "https://ontology.jax.org/api/hp/terms"

[behavior]
# Milliseconds of typing inactivity before a search fires.
debounce_ms = 500

# Maximum rows requested from the search endpoint per call.
max_results = 500

# Name of the exported selection file.
export_filename = "HPO.txt"

# Directory for exports (defaults to the working directory).
# export_dir = "/path/to/exports"

# Empty the selection after a successful export.
clear_selection_after_export = false

[display]
# Append the HPO id to each search result line.
show_result_ids = true

# Separator between result name and id.
result_id_separator = " - "
"#
        .to_string()
    }

    /// Build a config from the wizard's answers. An empty filename keeps
    /// the default.
    pub fn from_wizard_answers(export_filename: &str, clear_after_export: bool) -> Self {
        let mut config = Config::default();
        let filename = export_filename.trim();
        if !filename.is_empty() {
            config.behavior.export_filename = filename.to_string();
        }
        config.behavior.clear_selection_after_export = clear_after_export;
        config
    }

    /// Initialize config with a setup wizard.
    pub fn init_wizard() -> Result<Self> {
        println!("hpo-cli Configuration Setup");
        println!("===========================");

        print!("Export filename [HPO.txt]: ");
        std::io::Write::flush(&mut std::io::stdout())?;
        let mut filename = String::new();
        std::io::stdin().read_line(&mut filename)?;

        print!("Clear the selection after a successful export? (y/n) [n]: ");
        std::io::Write::flush(&mut std::io::stdout())?;
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        let clear_after_export = input.trim().eq_ignore_ascii_case("y");

        let config = Config::from_wizard_answers(&filename, clear_after_export);
        config.save()?;

        println!("\nConfiguration saved to: {:?}", Config::get_config_path()?);
        println!("You can edit this file directly to customize further.");

        Ok(config)
    }
}
