//! Asset type definitions

use matgen_core::ContentHash;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::paths;

/// Kinds of assets the store can enumerate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Texture,
    Material,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Texture => write!(f, "texture"),
            AssetKind::Material => write!(f, "material"),
        }
    }
}

/// One enumerated source asset, identified by its store path.
///
/// The lowercase name variants are precomputed because every pairing
/// lookup compares against them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRef {
    pub path: String,
    pub name: String,
    pub name_lower: String,
    pub name_no_extension_lower: String,
}

impl AssetRef {
    /// Build a reference from a store-relative path like `Assets/Textures/rock.png`
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = paths::asset_name_from_path(&path).to_string();
        let name_lower = name.to_lowercase();
        let name_no_extension_lower = paths::file_stem(&name_lower).to_string();
        Self {
            path,
            name,
            name_lower,
            name_no_extension_lower,
        }
    }

    /// Name without extension, original case preserved
    pub fn stem(&self) -> &str {
        paths::file_stem(&self.name)
    }
}

/// A loaded source image. Pixel data is never decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    pub path: String,
    pub name: String,
    pub hash: ContentHash,
}

impl ImageHandle {
    pub fn new(path: &str, bytes: &[u8]) -> Self {
        Self {
            path: path.to_string(),
            name: paths::file_stem(paths::asset_name_from_path(path)).to_string(),
            hash: ContentHash::from_bytes(bytes),
        }
    }
}

/// How the host interprets a source image on import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureType {
    #[default]
    Default,
    NormalMap,
}

/// Import metadata stored alongside a source image
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSettings {
    #[serde(default)]
    pub texture_type: TextureType,
    #[serde(default)]
    pub alpha_is_transparency: bool,
}

/// TOML sidecar file format for import metadata (`<image>.import.toml`)
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct ImportFile {
    #[serde(default)]
    pub import: ImportSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_ref_from_path() {
        let asset = AssetRef::from_path("Assets/Textures/Rock_N.PNG");
        assert_eq!(asset.name, "Rock_N.PNG");
        assert_eq!(asset.name_lower, "rock_n.png");
        assert_eq!(asset.name_no_extension_lower, "rock_n");
        assert_eq!(asset.stem(), "Rock_N");
    }

    #[test]
    fn test_asset_ref_keeps_inner_dots() {
        let asset = AssetRef::from_path("Assets/brick.old.tga");
        assert_eq!(asset.name_no_extension_lower, "brick.old");
        assert_eq!(asset.stem(), "brick.old");
    }

    #[test]
    fn test_asset_ref_without_extension() {
        let asset = AssetRef::from_path("Assets/noext");
        assert_eq!(asset.name_no_extension_lower, "noext");
    }

    #[test]
    fn test_image_handle_name_is_stem() {
        let image = ImageHandle::new("Assets/Textures/wood.png", b"pixels");
        assert_eq!(image.name, "wood");
        assert_eq!(image.hash, ContentHash::from_bytes(b"pixels"));
    }

    #[test]
    fn test_import_file_serde() {
        let file: ImportFile = toml::from_str(
            r#"
[import]
texture_type = "normal_map"
alpha_is_transparency = true
"#,
        )
        .unwrap();
        assert_eq!(file.import.texture_type, TextureType::NormalMap);
        assert!(file.import.alpha_is_transparency);

        let empty: ImportFile = toml::from_str("").unwrap();
        assert_eq!(empty.import, ImportSettings::default());
    }
}
