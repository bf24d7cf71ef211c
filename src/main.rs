use anyhow::Result;

use hpo_cli::config::Config;
use hpo_cli::logging;
use hpo_cli::ui::run_tui_app;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_help() {
    println!("hpo-cli {} - browse the Human Phenotype Ontology", VERSION);
    println!();
    println!("Usage: hpo-cli [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --search-url <URL>   Override the search endpoint for this run");
    println!("  --term-url <URL>     Override the term detail endpoint for this run");
    println!("  --init-config        Run the interactive configuration wizard and exit");
    println!("  --generate-config    Write a commented config file and exit");
    println!("  --help               Show this help");
    println!("  --version            Show the version");
    println!();
    println!("Type in the search box to query terms; press F1 inside the app");
    println!("for the full key reference. The selection exports to a");
    println!("tab-separated text file (HPO.txt by default).");
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|pos| args.get(pos + 1))
        .cloned()
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.contains(&"--help".to_string()) {
        print_help();
        return Ok(());
    }
    if args.contains(&"--version".to_string()) {
        println!("hpo-cli {}", VERSION);
        return Ok(());
    }

    if args.contains(&"--init-config".to_string()) {
        match Config::init_wizard() {
            Ok(config) => {
                println!("\nConfiguration initialized successfully!");
                if config.behavior.clear_selection_after_export {
                    println!("Note: the selection will be cleared after each export");
                }
                return Ok(());
            }
            Err(e) => {
                eprintln!("Error initializing config: {}", e);
                std::process::exit(1);
            }
        }
    }

    if args.contains(&"--generate-config".to_string()) {
        let path = Config::get_config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, Config::create_default_with_comments())?;
        println!("Configuration file created at: {:?}", path);
        println!("Edit this file to customize endpoints and export behavior.");
        return Ok(());
    }

    // Logging goes to an in-memory buffer shown via F12; the terminal itself
    // belongs to the TUI.
    let log_buffer = logging::init_tracing();

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Could not load config ({}), using defaults", e);
            Config::default()
        }
    };
    if let Some(url) = flag_value(&args, "--search-url") {
        config.server.search_url = url;
    }
    if let Some(url) = flag_value(&args, "--term-url") {
        config.server.term_url = url;
    }

    if let Err(e) = run_tui_app(config, log_buffer) {
        eprintln!("TUI Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
