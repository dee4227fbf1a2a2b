//! Dry-run pairing preview

use anyhow::Result;
use clap::Args;
use matgen_asset::{AssetKind, AssetStore, FsAssetStore};
use matgen_gen::{NameMatcher, OutputNamer};

use super::{load_config, project_root, resolve_folder, GenerationFlags};

#[derive(Args, Debug)]
pub struct PairsArgs {
    /// Folder holding the source textures
    #[arg(long, short)]
    pub input: String,

    /// Project root (defaults to the current directory)
    #[arg(long)]
    pub project: Option<String>,

    /// Read settings from this file instead of the project and global config
    #[arg(long)]
    pub config: Option<String>,

    #[command(flatten)]
    pub flags: GenerationFlags,
}

pub fn run(args: PairsArgs) -> Result<()> {
    let root = project_root(args.project.as_deref())?;
    let input = resolve_folder(&root, &args.input, "Input")?;
    let config = load_config(&root, args.config.as_deref())?.with_overrides(args.flags.to_overrides())?;

    let store = FsAssetStore::new(&root);
    let textures = store.enumerate(&input, AssetKind::Texture)?;
    let matcher = NameMatcher::new(&config.generation.companion_suffixes);
    let namer = OutputNamer::new(&config.generation);
    let pairings = matcher.build_pairings(&textures);

    if pairings.is_empty() {
        println!("No base textures in {}", input);
        return Ok(());
    }

    println!("Pairings in {} (suffixes: {}):", input, matcher.suffixes().join(", "));
    for pairing in &pairings {
        let companion = pairing
            .companion
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("-");
        println!(
            "  {} -> {}  => {}",
            pairing.base.name,
            companion,
            namer.file_name(&pairing.base_output_stem)
        );
    }

    let paired = pairings.iter().filter(|p| p.companion.is_some()).count();
    println!();
    println!(
        "{} base texture(s), {} with a companion, {} texture(s) total",
        pairings.len(),
        paired,
        textures.len()
    );
    Ok(())
}
