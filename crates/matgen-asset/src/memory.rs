//! In-memory asset store, for tests and embedding

use std::collections::{BTreeMap, BTreeSet};

use crate::material::Material;
use crate::paths;
use crate::store::{AssetStore, StoreError};
use crate::types::{AssetKind, AssetRef, ImageHandle, ImportSettings, TextureType};

#[derive(Debug, Clone)]
struct MemoryImage {
    bytes: Vec<u8>,
    loadable: bool,
    settings: ImportSettings,
}

/// Asset store held entirely in memory.
///
/// Images enumerate in insertion order, so tests can control the order
/// pairings see. Writes to chosen paths can be made to fail.
#[derive(Debug, Default)]
pub struct MemoryStore {
    folders: BTreeSet<String>,
    image_order: Vec<String>,
    images: BTreeMap<String, MemoryImage>,
    artifacts: BTreeMap<String, Material>,
    failing_writes: BTreeSet<String>,
    persist_count: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a folder (and its parents)
    pub fn add_folder(&mut self, folder: &str) -> &mut Self {
        let mut current = folder.trim_end_matches('/');
        while !current.is_empty() {
            self.folders.insert(current.to_string());
            current = paths::parent_folder(current);
        }
        self
    }

    /// Add an image; its folder is registered too
    pub fn add_image(&mut self, path: &str, bytes: &[u8]) -> &mut Self {
        self.add_folder(paths::parent_folder(path));
        if !self.images.contains_key(path) {
            self.image_order.push(path.to_string());
        }
        self.images.insert(
            path.to_string(),
            MemoryImage {
                bytes: bytes.to_vec(),
                loadable: true,
                settings: ImportSettings::default(),
            },
        );
        self
    }

    /// Keep the image enumerable but make `load_image` fail for it
    pub fn mark_unloadable(&mut self, path: &str) -> &mut Self {
        if let Some(image) = self.images.get_mut(path) {
            image.loadable = false;
        }
        self
    }

    pub fn add_artifact(&mut self, path: &str, material: Material) -> &mut Self {
        self.add_folder(paths::parent_folder(path));
        self.artifacts.insert(path.to_string(), material);
        self
    }

    /// Make every write to `path` fail with `StoreError::Rejected`
    pub fn fail_writes_to(&mut self, path: &str) -> &mut Self {
        self.failing_writes.insert(path.to_string());
        self
    }

    pub fn artifact(&self, path: &str) -> Option<&Material> {
        self.artifacts.get(path)
    }

    pub fn artifact_paths(&self) -> Vec<&str> {
        self.artifacts.keys().map(|s| s.as_str()).collect()
    }

    pub fn import_settings(&self, path: &str) -> Option<&ImportSettings> {
        self.images.get(path).map(|i| &i.settings)
    }

    pub fn persist_count(&self) -> usize {
        self.persist_count
    }

    fn in_folder(path: &str, folder: &str) -> bool {
        let folder = folder.trim_end_matches('/');
        path.len() > folder.len() + 1
            && path.starts_with(folder)
            && path.as_bytes()[folder.len()] == b'/'
    }

    fn edit_import<F>(&mut self, path: &str, edit: F) -> Result<bool, StoreError>
    where
        F: FnOnce(&mut ImportSettings) -> bool,
    {
        let image = self
            .images
            .get_mut(path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        Ok(edit(&mut image.settings))
    }
}

impl AssetStore for MemoryStore {
    fn folder_exists(&self, folder: &str) -> bool {
        self.folders.contains(folder.trim_end_matches('/'))
    }

    fn enumerate(&self, folder: &str, kind: AssetKind) -> Result<Vec<AssetRef>, StoreError> {
        if !self.folder_exists(folder) {
            return Err(StoreError::NotFound(folder.to_string()));
        }
        let found = match kind {
            AssetKind::Texture => self
                .image_order
                .iter()
                .filter(|p| Self::in_folder(p, folder))
                .map(|p| AssetRef::from_path(p.as_str()))
                .collect(),
            AssetKind::Material => self
                .artifacts
                .keys()
                .filter(|p| Self::in_folder(p, folder))
                .map(|p| AssetRef::from_path(p.as_str()))
                .collect(),
        };
        Ok(found)
    }

    fn load_image(&self, path: &str) -> Option<ImageHandle> {
        self.images
            .get(path)
            .filter(|image| image.loadable)
            .map(|image| ImageHandle::new(path, &image.bytes))
    }

    fn set_alpha_mode(&mut self, path: &str, alpha_is_transparency: bool) -> Result<bool, StoreError> {
        self.edit_import(path, |settings| {
            let changed = settings.alpha_is_transparency != alpha_is_transparency;
            settings.alpha_is_transparency = alpha_is_transparency;
            changed
        })
    }

    fn set_companion_role(&mut self, path: &str) -> Result<bool, StoreError> {
        self.edit_import(path, |settings| {
            let changed = settings.texture_type != TextureType::NormalMap;
            settings.texture_type = TextureType::NormalMap;
            changed
        })
    }

    fn exists_artifact_at(&self, path: &str) -> bool {
        self.artifacts.contains_key(path)
    }

    fn load_artifact(&self, path: &str) -> Result<Material, StoreError> {
        self.artifacts
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    fn create_or_overwrite_artifact(&mut self, path: &str, material: &Material) -> Result<(), StoreError> {
        if self.failing_writes.contains(path) {
            return Err(StoreError::Rejected {
                path: path.to_string(),
                reason: "injected write failure".to_string(),
            });
        }
        if !self.folder_exists(paths::parent_folder(path)) {
            return Err(StoreError::Rejected {
                path: path.to_string(),
                reason: "output folder does not exist".to_string(),
            });
        }
        self.artifacts.insert(path.to_string(), material.clone());
        Ok(())
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        self.persist_count += 1;
        Ok(())
    }
}
