// ABOUTME: Command-line entry point for storing, cleaning, and inspecting persisted display settings.
// ABOUTME: Reads host state from a TOML snapshot and drives the Persister against the reg command.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use regprefs::encode::print_object;
use regprefs::{Config, DISPLAY_SETTINGS, SnapshotHost};

type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Persist window display settings in the per-user registry.
#[derive(Parser, Debug)]
#[command(name = "regprefs")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file to use instead of the standard location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Write every setting from a host snapshot
    Store {
        #[arg(long)]
        host: PathBuf,
    },
    /// Delete every setting and the status flag
    Clean,
    /// Report whether settings are currently stored
    Status,
    /// Print the stored value of every setting
    Show {
        /// Decode stored text back into host values
        #[arg(long)]
        decoded: bool,
    },
    /// Print, as JSON, what `store` would do for a host snapshot
    Preview {
        #[arg(long)]
        host: PathBuf,
    },
    /// Write the effective configuration to the config file
    InitConfig {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let args = Args::parse();

    let config_path = args.config.unwrap_or_else(Config::config_file_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.level)),
        )
        .init();

    if let Err(e) = run(args.command, &config, &config_path) {
        tracing::error!("Fatal: {e}");
        std::process::exit(1);
    }
}

fn run(command: Cmd, config: &Config, config_path: &Path) -> Result<(), DynError> {
    let mut persister = regprefs::persister_from_config(config, DISPLAY_SETTINGS)?;

    match command {
        Cmd::Store { host } => {
            let host = SnapshotHost::load(&host)?;
            let report = persister.store_all(&host);
            if report.store_unreachable() {
                return Err(format!("could not run {}", config.store.command).into());
            }
        }
        Cmd::Clean => {
            let report = persister.clean_all();
            if report.store_unreachable() {
                return Err(format!("could not run {}", config.store.command).into());
            }
        }
        Cmd::Status => {
            let stored = persister.is_stored();
            println!("{}", if stored { "stored" } else { "not stored" });
        }
        Cmd::Show { decoded: false } => {
            for (key, value) in persister.fetch_all() {
                match value {
                    Some(value) => println!("{key} = {value}"),
                    None => println!("{key} = <absent>"),
                }
            }
        }
        Cmd::Show { decoded: true } => {
            for (key, value) in persister.fetch_decoded() {
                match value {
                    Some(value) => println!("{key} = {}", print_object(&value)),
                    None => println!("{key} = <absent>"),
                }
            }
        }
        Cmd::Preview { host } => {
            let host = SnapshotHost::load(&host)?;
            let actions = persister.plan(&host);
            println!("{}", serde_json::to_string_pretty(&actions)?);
        }
        Cmd::InitConfig { force } => {
            if config_path.exists() && !force {
                return Err(format!("{} already exists", config_path.display()).into());
            }
            config.save_to(config_path)?;
            println!("{}", config_path.display());
        }
    }

    Ok(())
}
