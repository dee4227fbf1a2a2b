//! CLI command implementations

pub mod config;
pub mod generate;
pub mod pairs;

use anyhow::Result;
use clap::Args;
use matgen_asset::paths;
use matgen_core::MatgenError;
use matgen_gen::{AlphaOverride, GenerationOverrides, ProjectConfig};
use std::path::{Path, PathBuf};

/// Flags that override the generation config files
#[derive(Args, Debug, Default)]
pub struct GenerationFlags {
    /// Prepended to every material name (sanitized)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Appended to every material name (sanitized)
    #[arg(long)]
    pub suffix: Option<String>,

    /// Replace materials that already exist
    #[arg(long)]
    pub overwrite: bool,

    /// Pair normal maps with their base texture
    #[arg(long)]
    pub companions: bool,

    /// Bind the base texture to this property instead of the main slot
    #[arg(long)]
    pub base_property: Option<String>,

    /// Bind the normal map to this property instead of _BumpMap
    #[arg(long)]
    pub companion_property: Option<String>,

    /// Set alpha-is-transparency on every base texture
    #[arg(long)]
    pub alpha: Option<bool>,

    /// Store path of a material to copy properties from
    #[arg(long)]
    pub template: Option<String>,

    /// Shader every material uses (e.g. "Unlit/Texture")
    #[arg(long)]
    pub shader: Option<String>,

    /// Companion name suffix, repeatable (default: _n, _normal)
    #[arg(long = "companion-suffix")]
    pub companion_suffixes: Vec<String>,
}

impl GenerationFlags {
    /// Only flags actually given override lower layers
    pub fn to_overrides(&self) -> GenerationOverrides {
        GenerationOverrides {
            name_prefix: self.prefix.clone(),
            name_suffix: self.suffix.clone(),
            overwrite_existing: self.overwrite.then_some(true),
            include_companion: self.companions.then_some(true),
            base_property_name: self.base_property.clone(),
            override_base_property_name: self.base_property.as_ref().map(|_| true),
            companion_property_name: self.companion_property.clone(),
            override_companion_property_name: self.companion_property.as_ref().map(|_| true),
            alpha_override: self.alpha.map(|new_value| AlphaOverride {
                enabled: true,
                new_value,
            }),
            template: self.template.as_deref().map(paths::normalize),
            shader: self.shader.clone(),
            companion_suffixes: if self.companion_suffixes.is_empty() {
                None
            } else {
                Some(self.companion_suffixes.clone())
            },
            artifact_extension: None,
        }
    }
}

/// Project root from `--project`, or the current directory
pub fn project_root(project: Option<&str>) -> Result<PathBuf> {
    match project {
        Some(p) => {
            let root = PathBuf::from(p);
            if !root.is_dir() {
                anyhow::bail!("Project directory '{}' does not exist", p);
            }
            Ok(root)
        }
        None => Ok(std::env::current_dir()?),
    }
}

/// Layered config for the project, or only the given file
pub fn load_config(project_root: &Path, config_file: Option<&str>) -> Result<ProjectConfig, MatgenError> {
    match config_file {
        Some(path) => ProjectConfig::load_from_file(Path::new(path)),
        None => ProjectConfig::load(project_root),
    }
}

/// Resolve a user-supplied folder to a store path, or fail the command
pub fn resolve_folder(project_root: &Path, raw: &str, label: &str) -> Result<String, MatgenError> {
    paths::to_store_relative(project_root, raw).ok_or_else(|| {
        MatgenError::PreconditionFailed(format!(
            "{} folder '{}' is not valid: it must be an existing folder inside {}",
            label,
            raw,
            project_root.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_unset_flags_override_nothing() {
        assert_eq!(GenerationFlags::default().to_overrides(), GenerationOverrides::default());
    }

    #[test]
    fn test_property_flags_enable_overrides() {
        let flags = GenerationFlags {
            base_property: Some("_Albedo".to_string()),
            alpha: Some(false),
            companion_suffixes: vec!["_nrm".to_string()],
            template: Some(".\\Assets\\Templates\\Base.mat".to_string()),
            ..Default::default()
        };
        let overrides = flags.to_overrides();

        assert_eq!(overrides.base_property_name.as_deref(), Some("_Albedo"));
        assert_eq!(overrides.override_base_property_name, Some(true));
        assert_eq!(overrides.override_companion_property_name, None);
        assert_eq!(
            overrides.alpha_override,
            Some(AlphaOverride {
                enabled: true,
                new_value: false
            })
        );
        assert_eq!(overrides.companion_suffixes, Some(vec!["_nrm".to_string()]));
        assert_eq!(overrides.template.as_deref(), Some("Assets/Templates/Base.mat"));
    }

    #[test]
    fn test_resolve_folder() {
        let root = std::env::temp_dir().join(format!("matgen_cli_test_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(root.join("Assets/Textures")).unwrap();

        assert_eq!(
            resolve_folder(&root, "Assets/Textures/", "Input").unwrap(),
            "Assets/Textures"
        );
        let err = resolve_folder(&root, "Assets/Missing", "Output").unwrap_err();
        assert!(err.is_precondition());
        assert!(err.to_string().contains("Output folder 'Assets/Missing'"));

        fs::remove_dir_all(&root).ok();
    }
}
