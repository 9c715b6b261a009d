//! `gauge` - convert between units and inspect dimensions from the command line.

mod commands;
mod config;
mod logging;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gauge", version, about = "Unit conversion and dimension inspection")]
struct Cli {
    /// Configuration file (defaults to $GAUGE_CONFIG, then ./gauge.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a value between units, e.g. `gauge convert 12 meters feet`
    Convert {
        #[arg(allow_hyphen_values = true)]
        value: String,
        from: String,
        to: String,
        /// Round the result to this many fractional digits
        #[arg(long)]
        precision: Option<u32>,
    },
    /// Show the canonical form of a dimension, e.g. `gauge dimension force/area`
    Dimension { expression: String },
    /// List registered dimensions
    Dimensions,
    /// List units, optionally only those of one dimension
    Units {
        #[arg(long)]
        dimension: Option<String>,
    },
    /// Multiply two units
    Multiply { lhs: String, rhs: String },
    /// Divide one unit by another
    Divide { lhs: String, rhs: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = config::CliConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    logging::init_logging(&config.log_level, cli.verbose);

    let registry = config.build_registry()?;

    let report = match &cli.command {
        Command::Convert {
            value,
            from,
            to,
            precision,
        } => commands::convert(&registry, value, from, to, *precision)?,
        Command::Dimension { expression } => commands::dimension(&registry, expression)?,
        Command::Dimensions => commands::dimensions(&registry)?,
        Command::Units { dimension } => commands::units(&registry, dimension.as_deref())?,
        Command::Multiply { lhs, rhs } => commands::multiply(&registry, lhs, rhs)?,
        Command::Divide { lhs, rhs } => commands::divide(&registry, lhs, rhs)?,
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report.json).context("Failed to render JSON")?
        );
    } else {
        println!("{}", report.text);
    }
    Ok(())
}
