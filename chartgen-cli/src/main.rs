//! Chartgen CLI - topic in, chart out
//!
//! A command-line interface that asks a language model for sample chart data
//! and renders it to SVG.

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

mod config;
mod error;
mod output;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chartgen::prelude::*;
use clap::{Args, Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use crate::config::{ChartgenConfig, ConfigError, RenderConfig};
use crate::error::{CliError, Result};

/// Chartgen - sample chart data from a topic, rendered to SVG
#[derive(Parser)]
#[command(name = "chartgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "CHARTGEN_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate chart data for a topic and render it
    Generate(GenerateArgs),

    /// Validate a saved JSON reply and render it offline
    Render(RenderArgs),

    /// Print the instruction and schema that would be sent
    Prompt(PromptArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for the generate command
#[derive(Args)]
struct GenerateArgs {
    /// What the chart is about
    #[arg(required = true)]
    topic: Vec<String>,

    /// Chart kind: bar, line or pie
    #[arg(short, long, default_value_t = ChartKind::Bar)]
    kind: ChartKind,

    /// Model to use (overrides env and config)
    #[arg(short, long)]
    model: Option<String>,

    #[command(flatten)]
    output: OutputArgs,
}

/// Arguments for the render command
#[derive(Args)]
struct RenderArgs {
    /// JSON file holding a model reply
    file: PathBuf,

    /// Chart kind the reply was generated for
    #[arg(short, long, default_value_t = ChartKind::Bar)]
    kind: ChartKind,

    #[command(flatten)]
    output: OutputArgs,
}

/// Arguments for the prompt command
#[derive(Args)]
struct PromptArgs {
    /// What the chart is about
    #[arg(required = true)]
    topic: Vec<String>,

    /// Chart kind: bar, line or pie
    #[arg(short, long, default_value_t = ChartKind::Bar)]
    kind: ChartKind,
}

/// Output options shared by generate and render
#[derive(Args)]
struct OutputArgs {
    /// SVG file to write (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the validated data as JSON instead of the tooltip table
    #[arg(long)]
    json: bool,

    /// Chart caption
    #[arg(long)]
    title: Option<String>,

    /// Canvas width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    height: Option<u32>,
}

/// Arguments for the config command
#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show configuration file path
    Path,
    /// Show current configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging with the given verbosity level.
///
/// Logs go to stderr so stdout stays clean for tables and JSON.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "chartgen={level},{}",
            if verbosity >= 3 { "debug" } else { "warn" }
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let config_file = cli.config.unwrap_or_else(config::config_path);

    match cli.command {
        Commands::Generate(args) => cmd_generate(args, &config_file).await,
        Commands::Render(args) => cmd_render(args, &config_file).await,
        Commands::Prompt(args) => cmd_prompt(&args),
        Commands::Config(args) => cmd_config(args, &config_file).await,
    }
}

/// Generate and render a chart.
async fn cmd_generate(args: GenerateArgs, config_file: &Path) -> Result<()> {
    let config = config::load_config_from(config_file).await?;

    // Credential check happens before any request is built.
    let client_config = config
        .provider
        .resolve(args.model.as_deref())
        .map_err(GenerationError::Configuration)?;
    let mut generator = ChartGenerator::openai(client_config)?;
    if let Some(temperature) = config.provider.temperature {
        generator = generator.with_temperature(temperature);
    }
    info!(model = generator.model(), "Using generation endpoint");

    let topic = args.topic.join(" ");
    let mut controller = ChartController::new(generator);

    match controller.submit(&topic, args.kind).await {
        ChartState::Success { kind, result } => {
            let title = args.output.title.clone().unwrap_or_else(|| topic.trim().to_owned());
            emit(*kind, result, &args.output, &config.render, title).await
        }
        ChartState::Failed(message) => Err(CliError::Failed(message.clone())),
        ChartState::Idle | ChartState::Loading { .. } => {
            Err(CliError::Failed("generation did not complete".to_owned()))
        }
    }
}

/// Validate a saved reply and render it.
async fn cmd_render(args: RenderArgs, config_file: &Path) -> Result<()> {
    let config = config::load_config_from(config_file).await?;

    let text = tokio::fs::read_to_string(&args.file).await?;
    let result = parse_reply(args.kind, &text)?;
    info!(file = %args.file.display(), rows = result.rows.len(), "Loaded chart data");

    let title = args.output.title.clone().unwrap_or_default();
    emit(args.kind, &result, &args.output, &config.render, title).await
}

/// Print the request that would be sent.
fn cmd_prompt(args: &PromptArgs) -> Result<()> {
    let topic = Topic::new(args.topic.join(" ")).map_err(|e| CliError::Failed(e.to_string()))?;
    let request = build(&topic, args.kind);

    println!("{}", request.instruction);
    println!();
    println!("{}", serde_json::to_string_pretty(&request.schema)?);
    Ok(())
}

/// Configuration management.
async fn cmd_config(args: ConfigArgs, config_file: &Path) -> Result<()> {
    match args.command {
        ConfigCommands::Path => {
            println!("{}", config_file.display());
        }
        ConfigCommands::Show => {
            if tokio::fs::try_exists(config_file).await? {
                let content = tokio::fs::read_to_string(config_file).await?;
                println!("{content}");
            } else {
                let defaults =
                    toml::to_string_pretty(&ChartgenConfig::default()).map_err(ConfigError::from)?;
                println!("# {} does not exist; defaults:", config_file.display());
                println!("{defaults}");
            }
        }
        ConfigCommands::Init { force } => {
            if config::init_config(config_file, force).await? {
                println!("Configuration created: {}", config_file.display());
            } else {
                println!("Configuration already exists at: {}", config_file.display());
                println!("Use --force to overwrite.");
            }
        }
    }

    Ok(())
}

/// Render `result`, write the SVG, then print JSON or the tooltip table.
async fn emit(
    kind: ChartKind,
    result: &GenerationResult,
    args: &OutputArgs,
    defaults: &RenderConfig,
    title: String,
) -> Result<()> {
    let plan = chartgen::render::plan(kind, result);
    let mut options = RenderOptions::default().with_size(
        args.width.unwrap_or(defaults.width),
        args.height.unwrap_or(defaults.height),
    );
    if !title.is_empty() {
        options = options.with_title(title);
    }

    let svg = render_svg(&plan, &options)?;
    let path = args.output.clone().unwrap_or_else(|| defaults.output.clone());
    output::write_svg(&path, &svg).await?;
    info!(path = %path.display(), kind = %kind, "Chart written");

    if args.json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!("{}", output::tooltip_table(&plan));
        println!();
        println!("Chart written to {}", path.display());
    }
    Ok(())
}
