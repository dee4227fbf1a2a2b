//! Batch material generation command

use anyhow::Result;
use clap::Args;
use matgen_asset::FsAssetStore;
use matgen_gen::{BatchGenerator, RunReport};

use super::{load_config, project_root, resolve_folder, GenerationFlags};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Folder holding the source textures
    #[arg(long, short)]
    pub input: String,

    /// Existing folder the materials are written to
    #[arg(long, short)]
    pub output: String,

    /// Project root (defaults to the current directory)
    #[arg(long)]
    pub project: Option<String>,

    /// Read settings from this file instead of the project and global config
    #[arg(long)]
    pub config: Option<String>,

    /// Report format (text or json)
    #[arg(long, default_value = "text")]
    pub format: String,

    #[command(flatten)]
    pub flags: GenerationFlags,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    if args.format != "text" && args.format != "json" {
        anyhow::bail!("Unknown format '{}'. Use 'text' or 'json'", args.format);
    }

    let root = project_root(args.project.as_deref())?;
    let input = resolve_folder(&root, &args.input, "Input")?;
    let output = resolve_folder(&root, &args.output, "Output")?;

    let config = load_config(&root, args.config.as_deref())?.with_overrides(args.flags.to_overrides())?;
    let generator = BatchGenerator::new(config.generation, config.shaders);
    let mut store = FsAssetStore::new(&root);

    let report = generator.run_folder(&mut store, &input, &output)?;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, &input, &output);
    }

    let failed = report.failed_count();
    if failed > 0 {
        anyhow::bail!("{} texture(s) could not be turned into materials", failed);
    }
    if let Some(err) = &report.persist_error {
        anyhow::bail!("Materials were written but the store could not be saved: {}", err);
    }
    Ok(())
}

fn print_report(report: &RunReport, input: &str, output: &str) {
    println!("Generated materials: {} -> {}", input, output);
    for path in &report.created {
        println!("  + {}", path);
    }
    for path in &report.skipped_existing {
        println!("  = {} (exists)", path);
    }
    if report.metadata_edits > 0 {
        println!("  Updated import settings on {} texture(s)", report.metadata_edits);
    }

    let warnings: Vec<_> = report.warnings().collect();
    if !warnings.is_empty() {
        println!();
        println!("Warnings:");
        for issue in warnings {
            println!("  {}", issue);
        }
    }
    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        eprintln!();
        eprintln!("Failures:");
        for issue in failures {
            eprintln!("  {}", issue);
        }
    }

    println!();
    println!("{}", report.summary());
}
