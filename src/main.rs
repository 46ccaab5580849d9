use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stackwise::cli::OutputFormat;
use stackwise::cli::commands::recommend::RecommendOptions;
use stackwise::types::Tier;

#[derive(Parser)]
#[command(name = "stackwise")]
#[command(
    version,
    about = "Merge project classifications into a validated consensus and rank deployment architectures"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge classification results into a validated consensus
    Analyze {
        #[arg(required = true, help = "Classification result files (JSON or YAML)")]
        files: Vec<PathBuf>,
        #[arg(long, short, help = "Project description (part of the cache key)")]
        description: Option<String>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: OutputFormat,
    },

    /// Validate classification results without merging them
    Validate {
        #[arg(help = "Classification result file (JSON or YAML)")]
        file: PathBuf,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: OutputFormat,
    },

    /// Rank deployment architectures for the consensus classification
    Recommend {
        #[arg(required = true, help = "Classification result files (JSON or YAML)")]
        files: Vec<PathBuf>,
        #[arg(long, short, help = "Project description (part of the cache key)")]
        description: Option<String>,
        #[arg(long, help = "Pattern catalog file (YAML, JSON or TOML)")]
        catalog: Option<PathBuf>,
        #[arg(long, help = "Prefer low-cost patterns")]
        prioritize_cost: bool,
        #[arg(long, help = "Prefer low-complexity patterns")]
        prioritize_simplicity: bool,
        #[arg(long, help = "Prefer high-capacity patterns")]
        prioritize_scalability: bool,
        #[arg(long, help = "Expected traffic: low, medium, high")]
        traffic: Option<Tier>,
        #[arg(long, short = 'n', help = "Maximum number of patterns to show")]
        limit: Option<usize>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: OutputFormat,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text (TOML), json"
        )]
        format: OutputFormat,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mStackwise encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    // Logs go to stderr so JSON output on stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Analyze {
            files,
            description,
            format,
        } => {
            stackwise::cli::commands::analyze::run(&files, description.as_deref(), format)?;
        }
        Commands::Validate { file, format } => {
            stackwise::cli::commands::validate::run(&file, format)?;
        }
        Commands::Recommend {
            files,
            description,
            catalog,
            prioritize_cost,
            prioritize_simplicity,
            prioritize_scalability,
            traffic,
            limit,
            format,
        } => {
            stackwise::cli::commands::recommend::run(RecommendOptions {
                files,
                description,
                catalog,
                prioritize_cost,
                prioritize_simplicity,
                prioritize_scalability,
                traffic,
                limit,
                format,
            })?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                stackwise::cli::commands::config::show(format)?;
            }
            ConfigAction::Path => {
                stackwise::cli::commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                stackwise::cli::commands::config::init(global, force)?;
            }
        },
    }

    Ok(())
}
