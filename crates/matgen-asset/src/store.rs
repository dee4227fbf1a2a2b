//! The asset store contract consumed by the generator

use thiserror::Error;

use crate::material::Material;
use crate::types::{AssetKind, AssetRef, ImageHandle};

/// Failure of a single store call
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid store path '{0}'")]
    InvalidPath(String),

    #[error("nothing found at '{0}'")]
    NotFound(String),

    #[error("store rejected '{path}': {reason}")]
    Rejected { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize '{path}': {reason}")]
    Serialize { path: String, reason: String },

    #[error("failed to parse '{path}': {reason}")]
    Parse { path: String, reason: String },
}

/// Host asset store: enumerates sources, edits their import metadata and
/// owns generated artifacts. All paths are store-relative.
pub trait AssetStore {
    /// True if `folder` names an existing folder
    fn folder_exists(&self, folder: &str) -> bool;

    /// Assets of `kind` under `folder` (recursively), in store order
    fn enumerate(&self, folder: &str, kind: AssetKind) -> Result<Vec<AssetRef>, StoreError>;

    /// Resolve an image, `None` if it is missing or unreadable
    fn load_image(&self, path: &str) -> Option<ImageHandle>;

    /// Set the alpha-is-transparency import flag. Returns whether anything changed.
    fn set_alpha_mode(&mut self, path: &str, alpha_is_transparency: bool) -> Result<bool, StoreError>;

    /// Mark an image as a normal map on import. Returns whether anything changed.
    fn set_companion_role(&mut self, path: &str) -> Result<bool, StoreError>;

    fn exists_artifact_at(&self, path: &str) -> bool;

    fn load_artifact(&self, path: &str) -> Result<Material, StoreError>;

    /// Write an artifact, replacing whatever is at `path`
    fn create_or_overwrite_artifact(&mut self, path: &str, material: &Material) -> Result<(), StoreError>;

    /// Flush staged metadata edits and refresh cached state
    fn persist(&mut self) -> Result<(), StoreError>;
}
