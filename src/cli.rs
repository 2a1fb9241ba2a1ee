//! Command-line interface: argument parsing, logging setup and subcommands

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use powdertime::config::LoggingConfig;
use powdertime::{Powdertime, PowdertimeConfig, PowdertimeError, ResortCatalog};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "powdertime",
    version,
    about = "Ski mountain weather monitor that alerts on significant snowfall"
)]
pub struct Cli {
    /// Path to the YAML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check the forecast once (default)
    Check {
        /// Notify even when no significant snow is forecast
        #[arg(long)]
        always_notify: bool,
    },

    /// Keep checking every `check_frequency_hours`
    Watch {
        /// Notify even when no significant snow is forecast
        #[arg(long)]
        always_notify: bool,
    },

    /// Run against synthetic forecasts, no weather API calls
    Demo,

    /// List the resorts that would be monitored
    Resorts {
        /// List every resort in the catalog instead
        #[arg(long)]
        all: bool,
    },

    /// Print the effective configuration, or one dotted key
    Config {
        /// e.g. notifications.email.smtp_server
        key: Option<String>,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let command = self.command.unwrap_or(Command::Check {
            always_notify: false,
        });
        let config_path = PowdertimeConfig::resolve_path(self.config);

        // `resorts --all` only needs the catalog, so a missing file is fine there
        let config = match &command {
            Command::Resorts { all: true } if !config_path.exists() => PowdertimeConfig::default(),
            _ => PowdertimeConfig::load_from_path(&config_path)?,
        };

        init_tracing(&config.logging, self.verbose);
        debug!("Loaded configuration from {}", config_path.display());

        match command {
            Command::Check { always_notify } => {
                print_banner();
                let app = Powdertime::new(config)?;
                let summary = app.check(always_notify)?;
                debug!(
                    "Checked {} resorts, {} events, {} skipped",
                    summary.resorts_checked,
                    summary.events.len(),
                    summary.skipped.len()
                );
            }
            Command::Watch { always_notify } => {
                print_banner();
                let app = Powdertime::new(config)?;
                app.watch(always_notify)?;
            }
            Command::Demo => {
                print_banner();
                let app = Powdertime::new(config)?;
                app.demo()?;
            }
            Command::Resorts { all } => {
                if all {
                    let catalog = ResortCatalog::load(config.resort_catalog.as_deref())
                        .context("Failed to load resort catalog")?;
                    println!("📋 {} resorts in catalog:", catalog.len());
                    for resort in catalog.iter() {
                        print_resort(resort, None);
                    }
                } else {
                    let app = Powdertime::new(config)?;
                    let discovery = app.discover()?;
                    if let Some(home) = &discovery.home {
                        println!("📍 Location: {} ({})", home.name, home.format_coordinates());
                    }
                    println!("✅ Monitoring {} resort(s):", discovery.resorts.len());
                    for monitored in &discovery.resorts {
                        print_resort(&monitored.resort, monitored.distance_miles);
                    }
                }
            }
            Command::Config { key } => match key {
                Some(key) => {
                    let value = config
                        .get(&key)
                        .ok_or_else(|| anyhow!("Config key '{key}' is not set"))?;
                    match value {
                        serde_json::Value::String(s) => println!("{s}"),
                        other => println!("{}", serde_json::to_string_pretty(&other)?),
                    }
                }
                None => println!("{}", serde_json::to_string_pretty(&config)?),
            },
        }

        Ok(())
    }
}

/// Extra guidance for errors a user can fix themselves
pub fn hint_for(error: &anyhow::Error) -> Option<&'static str> {
    match error.downcast_ref::<PowdertimeError>()? {
        PowdertimeError::Config { message } if message.starts_with("Configuration file not found") => {
            Some("Create a config.yaml (see config.example.yaml) or pass --config <PATH>.")
        }
        PowdertimeError::Config { .. } => Some("Check your config.yaml settings."),
        PowdertimeError::Api { .. } => {
            Some("The weather service may be unavailable; try again later.")
        }
        _ => None,
    }
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,powdertime=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("warn,powdertime={}", logging.level)))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if logging.format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        eprintln!("Failed to initialize logging: {e}");
    }
}

fn print_banner() {
    println!("🏔️  Powdertime v{} - Ski Mountain Weather Monitor", powdertime::VERSION);
    println!("{}\n", "=".repeat(70));
}

fn print_resort(resort: &powdertime::Resort, distance: Option<f64>) {
    let elevation = resort
        .elevation_ft
        .map(|ft| format!(", {ft} ft"))
        .unwrap_or_default();
    match distance {
        Some(miles) => println!("   • {resort} ({miles:.0} mi{elevation})"),
        None if elevation.is_empty() => println!("   • {resort}"),
        None => println!("   • {resort} ({})", elevation.trim_start_matches(", ")),
    }
}
