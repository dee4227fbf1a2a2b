//! Layered configuration system
//!
//! Config is loaded with four layers of precedence (highest wins):
//! 1. Explicit overrides (CLI flags)
//! 2. Environment variables: `MATGEN_NAME_PREFIX`, `MATGEN_NAME_SUFFIX`,
//!    `MATGEN_COMPANION_SUFFIXES` (comma separated)
//! 3. Project-local: `<project>/.matgen/config.toml`
//! 4. Global: `~/.matgen/config.toml`

use matgen_asset::material::DEFAULT_MAIN_TEXTURE;
use matgen_asset::{ShaderDef, ShaderLibrary};
use matgen_core::{MatgenError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default companion slot for normal maps
pub const DEFAULT_COMPANION_PROPERTY: &str = "_BumpMap";

/// Optional rewrite of the base image's alpha-is-transparency import flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlphaOverride {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub new_value: bool,
}

/// Everything one batch run needs. Read-only while the run is in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub name_prefix: String,
    pub name_suffix: String,
    pub overwrite_existing: bool,
    pub include_companion: bool,
    pub base_property_name: String,
    pub companion_property_name: String,
    pub override_base_property_name: bool,
    pub override_companion_property_name: bool,
    /// Store path of a material whose properties seed every artifact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Shader every artifact is (re)targeted onto
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shader: Option<String>,
    pub companion_suffixes: Vec<String>,
    pub artifact_extension: String,
    pub alpha_override: AlphaOverride,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            name_prefix: String::new(),
            name_suffix: String::new(),
            overwrite_existing: false,
            include_companion: false,
            base_property_name: DEFAULT_MAIN_TEXTURE.to_string(),
            companion_property_name: DEFAULT_COMPANION_PROPERTY.to_string(),
            override_base_property_name: false,
            override_companion_property_name: false,
            template: None,
            shader: None,
            companion_suffixes: default_companion_suffixes(),
            artifact_extension: "mat".to_string(),
            alpha_override: AlphaOverride::default(),
        }
    }
}

pub fn default_companion_suffixes() -> Vec<String> {
    vec!["_n".to_string(), "_normal".to_string()]
}

impl GenerationConfig {
    /// Apply every field that is set in `overrides`
    pub fn apply(&mut self, overrides: GenerationOverrides) {
        if let Some(v) = overrides.name_prefix {
            self.name_prefix = v;
        }
        if let Some(v) = overrides.name_suffix {
            self.name_suffix = v;
        }
        if let Some(v) = overrides.overwrite_existing {
            self.overwrite_existing = v;
        }
        if let Some(v) = overrides.include_companion {
            self.include_companion = v;
        }
        if let Some(v) = overrides.base_property_name {
            self.base_property_name = v;
        }
        if let Some(v) = overrides.companion_property_name {
            self.companion_property_name = v;
        }
        if let Some(v) = overrides.override_base_property_name {
            self.override_base_property_name = v;
        }
        if let Some(v) = overrides.override_companion_property_name {
            self.override_companion_property_name = v;
        }
        if let Some(v) = overrides.alpha_override {
            self.alpha_override = v;
        }
        if overrides.template.is_some() {
            self.template = overrides.template;
        }
        if overrides.shader.is_some() {
            self.shader = overrides.shader;
        }
        if let Some(v) = overrides.companion_suffixes {
            self.companion_suffixes = v;
        }
        if let Some(v) = overrides.artifact_extension {
            self.artifact_extension = v;
        }
    }

    /// Reject settings that would make a run meaningless
    pub fn validate(&self) -> Result<()> {
        if self.companion_suffixes.iter().any(|s| s.is_empty()) {
            return Err(MatgenError::Config(
                "companion suffixes must not be empty strings".to_string(),
            ));
        }
        if self.include_companion && self.companion_suffixes.is_empty() {
            return Err(MatgenError::Config(
                "companion matching needs at least one suffix".to_string(),
            ));
        }
        if self.override_base_property_name && self.base_property_name.trim().is_empty() {
            return Err(MatgenError::Config("base property name is empty".to_string()));
        }
        if self.override_companion_property_name && self.companion_property_name.trim().is_empty() {
            return Err(MatgenError::Config("companion property name is empty".to_string()));
        }
        let ext = matgen_asset::paths::sanitize_file_name(&self.artifact_extension);
        if ext.is_empty() || ext != self.artifact_extension {
            return Err(MatgenError::Config(format!(
                "invalid artifact extension '{}'",
                self.artifact_extension
            )));
        }
        Ok(())
    }
}

/// Partial `GenerationConfig`; one per layer, unset fields fall through
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOverrides {
    #[serde(default)]
    pub name_prefix: Option<String>,
    #[serde(default)]
    pub name_suffix: Option<String>,
    #[serde(default)]
    pub overwrite_existing: Option<bool>,
    #[serde(default)]
    pub include_companion: Option<bool>,
    #[serde(default)]
    pub base_property_name: Option<String>,
    #[serde(default)]
    pub companion_property_name: Option<String>,
    #[serde(default)]
    pub override_base_property_name: Option<bool>,
    #[serde(default)]
    pub override_companion_property_name: Option<bool>,
    #[serde(default)]
    pub alpha_override: Option<AlphaOverride>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub shader: Option<String>,
    #[serde(default)]
    pub companion_suffixes: Option<Vec<String>>,
    #[serde(default)]
    pub artifact_extension: Option<String>,
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub generation: GenerationOverrides,
    #[serde(default)]
    pub shaders: BTreeMap<String, ShaderDef>,
}

/// Resolved configuration: generation settings plus known shaders
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub generation: GenerationConfig,
    pub shaders: ShaderLibrary,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            shaders: ShaderLibrary::builtin(),
        }
    }
}

impl ProjectConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load(project_root: &Path) -> Result<Self> {
        Self::load_layers(
            Self::global_config_path().as_deref(),
            project_root,
            |key| std::env::var(key).ok(),
        )
    }

    /// Layered load with the global file and environment supplied by the caller
    pub fn load_layers<F>(global_path: Option<&Path>, project_root: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Layer 1: Global config (~/.matgen/config.toml)
        if let Some(global_path) = global_path {
            if global_path.exists() {
                config.merge_file(Self::load_file(global_path)?);
            }
        }

        // Layer 2: Project-local config (.matgen/config.toml)
        let local_path = project_root.join(".matgen").join("config.toml");
        if local_path.exists() {
            config.merge_file(Self::load_file(&local_path)?);
        }

        // Layer 3: Environment variable overrides
        config.generation.apply(env_overrides(env));

        Ok(config)
    }

    /// Load config from a specific file path only
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.merge_file(Self::load_file(path)?);
        Ok(config)
    }

    /// Apply the highest layer and check the result
    pub fn with_overrides(mut self, overrides: GenerationOverrides) -> Result<Self> {
        self.generation.apply(overrides);
        self.generation.validate()?;
        Ok(self)
    }

    fn merge_file(&mut self, file: ConfigFile) {
        self.generation.apply(file.generation);
        self.shaders.extend(file.shaders);
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".matgen").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<ConfigFile> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            MatgenError::Config(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }
}

/// Overrides taken from the environment, read through `lookup`
pub fn env_overrides<F>(lookup: F) -> GenerationOverrides
where
    F: Fn(&str) -> Option<String>,
{
    GenerationOverrides {
        name_prefix: lookup("MATGEN_NAME_PREFIX"),
        name_suffix: lookup("MATGEN_NAME_SUFFIX"),
        companion_suffixes: lookup("MATGEN_COMPANION_SUFFIXES").map(|v| parse_suffix_list(&v)),
        ..Default::default()
    }
}

/// Split a comma separated suffix list, dropping blanks
pub fn parse_suffix_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_config(content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("matgen_config_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.companion_suffixes, vec!["_n", "_normal"]);
        assert_eq!(config.base_property_name, "_MainTex");
        assert_eq!(config.companion_property_name, "_BumpMap");
        assert_eq!(config.artifact_extension, "mat");
        assert!(!config.overwrite_existing);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_from_file() {
        let config_str = r#"
[generation]
name_prefix = "M_"
include_companion = true
template = "Assets/Materials/Template.mat"
companion_suffixes = ["_nrm"]

[generation.alpha_override]
enabled = true
new_value = true

[shaders."Custom/Terrain"]
textures = ["_Albedo", "_Normal"]
main_texture = "_Albedo"
"#;
        let path = temp_config(config_str);
        let config = ProjectConfig::load_from_file(&path).unwrap();

        assert_eq!(config.generation.name_prefix, "M_");
        assert!(config.generation.include_companion);
        assert_eq!(
            config.generation.template.as_deref(),
            Some("Assets/Materials/Template.mat")
        );
        assert_eq!(config.generation.companion_suffixes, vec!["_nrm"]);
        assert!(config.generation.alpha_override.enabled);
        assert_eq!(config.generation.name_suffix, "");

        let terrain = config.shaders.get("Custom/Terrain").unwrap();
        assert_eq!(terrain.main_texture.as_deref(), Some("_Albedo"));
        assert!(config.shaders.get("Standard").is_some());

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_invalid_config_file() {
        let path = temp_config("[generation]\nname_prefix = 5\n");
        let err = ProjectConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, MatgenError::Config(_)));
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_layers_apply_in_order() {
        let global = temp_config("[generation]\nname_prefix = \"G_\"\nname_suffix = \"_global\"\n");
        let project = global.parent().unwrap().join("project");
        std::fs::create_dir_all(project.join(".matgen")).unwrap();
        std::fs::write(
            project.join(".matgen").join("config.toml"),
            "[generation]\nname_suffix = \"_mat\"\ninclude_companion = true\n",
        )
        .unwrap();

        let config = ProjectConfig::load_layers(Some(&global), &project, |key| match key {
            "MATGEN_NAME_PREFIX" => Some("E_".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.generation.name_prefix, "E_");
        assert_eq!(config.generation.name_suffix, "_mat");
        assert!(config.generation.include_companion);

        let without_global = ProjectConfig::load_layers(None, &project, |_| None).unwrap();
        assert_eq!(without_global.generation.name_prefix, "");
        assert_eq!(without_global.generation.name_suffix, "_mat");

        std::fs::remove_dir_all(global.parent().unwrap()).ok();
    }

    #[test]
    fn test_env_overrides() {
        let overrides = env_overrides(|key| match key {
            "MATGEN_NAME_PREFIX" => Some("T_".to_string()),
            "MATGEN_COMPANION_SUFFIXES" => Some(" _nrm, ,_normalmap ".to_string()),
            _ => None,
        });
        assert_eq!(overrides.name_prefix.as_deref(), Some("T_"));
        assert_eq!(overrides.name_suffix, None);

        let mut config = GenerationConfig::default();
        config.apply(overrides);
        assert_eq!(config.name_prefix, "T_");
        assert_eq!(config.companion_suffixes, vec!["_nrm", "_normalmap"]);
    }

    #[test]
    fn test_unset_overrides_leave_config_alone() {
        let mut config = GenerationConfig {
            name_prefix: "M_".to_string(),
            shader: Some("Unlit/Texture".to_string()),
            ..Default::default()
        };
        config.apply(GenerationOverrides::default());
        assert_eq!(config.name_prefix, "M_");
        assert_eq!(config.shader.as_deref(), Some("Unlit/Texture"));
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let config = GenerationConfig {
            companion_suffixes: vec!["".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GenerationConfig {
            include_companion: true,
            companion_suffixes: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GenerationConfig {
            override_base_property_name: true,
            base_property_name: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GenerationConfig {
            artifact_extension: "m/at".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_overrides_validates() {
        let result = ProjectConfig::default().with_overrides(GenerationOverrides {
            artifact_extension: Some(String::new()),
            ..Default::default()
        });
        assert!(result.is_err());

        let config = ProjectConfig::default()
            .with_overrides(GenerationOverrides {
                overwrite_existing: Some(true),
                ..Default::default()
            })
            .unwrap();
        assert!(config.generation.overwrite_existing);
    }
}
