use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;
use triage_core::{analyze, detect_cycle, normalize_batch, time, RawValue, Strategy, WeightInput, WEIGHT_KEYS};

mod config;
mod input;
mod logging;
mod render;
mod state;

use render::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "triage", version, about = "Rank tasks by urgency, importance, effort and dependencies")]
struct Cli {
    /// Config file (default: ~/.triage/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score and rank a task batch (.json, .csv, or - for JSON on stdin)
    Score {
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// smart | fastest | impact | deadline (overrides the file and config)
        #[arg(long)]
        strategy: Option<String>,

        /// Custom weight, repeatable: --weight urgency=0.5 --weight effort=0.5
        #[arg(long = "weight", value_name = "KEY=VALUE")]
        weights: Vec<String>,

        /// Reference date (YYYY-MM-DD); defaults to today in the configured timezone
        #[arg(long)]
        today: Option<String>,

        /// Only print the top N tasks
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Check a task batch for dependency cycles
    Cycles {
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Manage ~/.triage/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Score {
            file,
            format,
            strategy,
            weights,
            today,
            limit,
        } => {
            score(config_path, &file, format, strategy, &weights, today, limit).await?;
        }

        Command::Cycles { file, format } => {
            let request = input::read_request(&file).await?;
            let report = detect_cycle(&normalize_batch(request.tasks));
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Text => print!("{}", render::render_cycles(&report)),
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init { force } => config::init_config(config_path, force)?,
            ConfigCommand::Show => {
                let cfg = config::load_config(config_path)?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

async fn score(
    config_path: Option<&Path>,
    file: &Path,
    format: OutputFormat,
    strategy: Option<String>,
    weights: &[String],
    today: Option<String>,
    limit: Option<usize>,
) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    let mut request = input::read_request(file).await?;

    // flags > request document > config
    if let Some(name) = strategy {
        request.strategy = Some(Strategy::from(name));
    }
    if !weights.is_empty() {
        request.weights = Some(parse_weight_args(weights)?);
    }
    cfg.apply_defaults(&mut request);

    let today = match today {
        Some(s) => time::parse_reference_date(&s)?,
        None => time::today_in_timezone(&cfg.clock.timezone)
            .with_context(|| format!("resolving today in {}", cfg.clock.timezone))?,
    };

    let strategy = request.strategy.unwrap_or_default();
    debug!(file = %file.display(), %strategy, %today, "scoring batch");
    let mut analysis = analyze(request, today);
    if let Some(n) = limit {
        analysis.tasks.truncate(n);
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
        OutputFormat::Text => {
            println!("# Ranked tasks (strategy: {strategy}, today: {today})\n");
            print!("{}", render::render_analysis(&analysis));
        }
    }

    Ok(())
}

/// Parse repeated `key=value` weight flags. Unlike weights read from a
/// document, flags are checked strictly so typos surface immediately.
fn parse_weight_args(args: &[String]) -> Result<WeightInput> {
    let mut out = WeightInput::new();
    for arg in args {
        let Some((key, value)) = arg.split_once('=') else {
            bail!("invalid --weight '{arg}' (expected KEY=VALUE)");
        };
        let key = key.trim().to_lowercase();
        if !WEIGHT_KEYS.contains(&key.as_str()) {
            bail!("unknown weight '{key}' (expected one of: {})", WEIGHT_KEYS.join(", "));
        }
        let value: f64 = value
            .trim()
            .parse()
            .with_context(|| format!("invalid value for weight '{key}': {value}"))?;
        out.insert(key, RawValue::Float(value));
    }
    Ok(out)
}
