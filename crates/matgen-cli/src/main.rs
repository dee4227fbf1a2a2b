//! Matgen CLI - Batch-create materials from texture folders

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{config, generate, pairs};

#[derive(Parser)]
#[command(name = "matgen")]
#[command(about = "Create one material per texture, pairing normal maps by name", long_about = None)]
#[command(version)]
struct Cli {
    /// Log progress at info level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate materials for every texture in a folder
    Generate(generate::GenerateArgs),

    /// Show how textures would be paired, without writing anything
    Pairs(pairs::PairsArgs),

    /// Print the effective generation config
    Config {
        /// Project root (defaults to the current directory)
        #[arg(long)]
        project: Option<String>,

        /// Read settings from this file instead of the project and global config
        #[arg(long)]
        config: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate(args) => generate::run(args),
        Commands::Pairs(args) => pairs::run(args),
        Commands::Config {
            project,
            config: config_file,
        } => config::run(project.as_deref(), config_file.as_deref()),
    }
}
