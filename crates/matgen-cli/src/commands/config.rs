//! Effective configuration display

use anyhow::Result;
use matgen_gen::GenerationConfig;
use serde::Serialize;

use super::{load_config, project_root};

#[derive(Serialize)]
struct EffectiveConfig<'a> {
    generation: &'a GenerationConfig,
}

pub fn run(project: Option<&str>, config_file: Option<&str>) -> Result<()> {
    let root = project_root(project)?;
    let config = load_config(&root, config_file)?;
    config.generation.validate()?;

    let rendered = toml::to_string_pretty(&EffectiveConfig {
        generation: &config.generation,
    })?;
    println!("{}", rendered.trim_end());
    println!();
    println!("# shaders: {}", config.shaders.names().join(", "));
    Ok(())
}
