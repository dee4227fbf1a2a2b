//! Filesystem-backed asset store rooted at a project directory

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::material::Material;
use crate::paths;
use crate::store::{AssetStore, StoreError};
use crate::types::{AssetKind, AssetRef, ImageHandle, ImportFile, ImportSettings, TextureType};

const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "tga", "bmp", "psd", "tif", "tiff", "gif", "exr", "hdr",
];
const MATERIAL_EXTENSION: &str = "mat";
const IMPORT_SIDECAR_SUFFIX: &str = ".import.toml";

/// Asset store over a project directory.
///
/// Import metadata lives in `<image>.import.toml` sidecars. Edits are staged
/// in memory and only written by [`AssetStore::persist`].
pub struct FsAssetStore {
    root: PathBuf,
    pending: BTreeMap<String, ImportSettings>,
}

impl FsAssetStore {
    /// Create a store over the given project root
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            pending: BTreeMap::new(),
        }
    }

    /// Current import settings, including staged edits
    pub fn import_settings(&self, path: &str) -> Result<ImportSettings, StoreError> {
        if let Some(staged) = self.pending.get(path) {
            return Ok(staged.clone());
        }
        let file = self.resolve(path)?;
        let sidecar = sidecar_path(&file);
        if !sidecar.is_file() {
            return Ok(ImportSettings::default());
        }
        let content = fs::read_to_string(&sidecar)?;
        let parsed: ImportFile = toml::from_str(&content).map_err(|e| StoreError::Parse {
            path: sidecar.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(parsed.import)
    }

    /// Number of import edits waiting for `persist`
    pub fn pending_edits(&self) -> usize {
        self.pending.len()
    }

    /// Map a store path onto the filesystem, rejecting anything that escapes the root
    fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(path);
        if path.is_empty() || relative.is_absolute() {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => return Err(StoreError::InvalidPath(path.to_string())),
            }
        }
        Ok(self.root.join(relative))
    }

    fn edit_import<F>(&mut self, path: &str, edit: F) -> Result<bool, StoreError>
    where
        F: FnOnce(&mut ImportSettings) -> bool,
    {
        let file = self.resolve(path)?;
        if !file.is_file() {
            return Err(StoreError::NotFound(path.to_string()));
        }
        let mut settings = self.import_settings(path)?;
        if !edit(&mut settings) {
            return Ok(false);
        }
        self.pending.insert(path.to_string(), settings);
        Ok(true)
    }

    fn write_sidecar(&self, path: &str) -> Result<(), StoreError> {
        let Some(settings) = self.pending.get(path) else {
            return Ok(());
        };
        let sidecar = sidecar_path(&self.resolve(path)?);
        let content = toml::to_string_pretty(&ImportFile {
            import: settings.clone(),
        })
        .map_err(|e| StoreError::Serialize {
            path: sidecar.display().to_string(),
            reason: e.to_string(),
        })?;
        fs::write(&sidecar, content)?;
        Ok(())
    }

    fn scan_directory(&self, dir: &Path, kind: AssetKind, found: &mut Vec<AssetRef>) -> Result<(), StoreError> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_dir() {
                self.scan_directory(&path, kind, found)?;
            } else if matches_kind(&path, kind) {
                if let Ok(relative) = path.strip_prefix(&self.root) {
                    found.push(AssetRef::from_path(paths::path_to_store_string(relative)));
                }
            }
        }
        Ok(())
    }
}

impl AssetStore for FsAssetStore {
    fn folder_exists(&self, folder: &str) -> bool {
        self.resolve(folder).map(|p| p.is_dir()).unwrap_or(false)
    }

    fn enumerate(&self, folder: &str, kind: AssetKind) -> Result<Vec<AssetRef>, StoreError> {
        let dir = self.resolve(folder)?;
        if !dir.is_dir() {
            return Err(StoreError::NotFound(folder.to_string()));
        }
        let mut found = Vec::new();
        self.scan_directory(&dir, kind, &mut found)?;
        // read_dir order is platform dependent
        found.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(found)
    }

    fn load_image(&self, path: &str) -> Option<ImageHandle> {
        let file = self.resolve(path).ok()?;
        if !matches_kind(&file, AssetKind::Texture) {
            return None;
        }
        match fs::read(&file) {
            Ok(bytes) => Some(ImageHandle::new(path, &bytes)),
            Err(e) => {
                tracing::debug!("Could not read image {}: {}", path, e);
                None
            }
        }
    }

    fn set_alpha_mode(&mut self, path: &str, alpha_is_transparency: bool) -> Result<bool, StoreError> {
        self.edit_import(path, |settings| {
            if settings.alpha_is_transparency == alpha_is_transparency {
                return false;
            }
            settings.alpha_is_transparency = alpha_is_transparency;
            true
        })
    }

    fn set_companion_role(&mut self, path: &str) -> Result<bool, StoreError> {
        self.edit_import(path, |settings| {
            if settings.texture_type == TextureType::NormalMap {
                return false;
            }
            settings.texture_type = TextureType::NormalMap;
            true
        })
    }

    fn exists_artifact_at(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.is_file()).unwrap_or(false)
    }

    fn load_artifact(&self, path: &str) -> Result<Material, StoreError> {
        let file = self.resolve(path)?;
        if !file.is_file() {
            return Err(StoreError::NotFound(path.to_string()));
        }
        let content = fs::read_to_string(&file)?;
        Material::from_toml(&content).map_err(|e| StoreError::Parse {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    fn create_or_overwrite_artifact(&mut self, path: &str, material: &Material) -> Result<(), StoreError> {
        let file = self.resolve(path)?;
        let parent_exists = file.parent().map(|p| p.is_dir()).unwrap_or(false);
        if !parent_exists {
            return Err(StoreError::Rejected {
                path: path.to_string(),
                reason: "output folder does not exist".to_string(),
            });
        }
        if file.is_dir() {
            return Err(StoreError::Rejected {
                path: path.to_string(),
                reason: "a folder exists at this path".to_string(),
            });
        }
        let content = material.to_toml().map_err(|e| StoreError::Serialize {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        fs::write(&file, content)?;
        Ok(())
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let staged: Vec<String> = self.pending.keys().cloned().collect();
        let mut written = 0;
        let mut first_error = None;

        for path in staged {
            match self.write_sidecar(&path) {
                Ok(()) => {
                    self.pending.remove(&path);
                    written += 1;
                }
                Err(e) => {
                    tracing::warn!("Could not write import settings for {}: {}", path, e);
                    first_error.get_or_insert(e);
                }
            }
        }
        if written > 0 {
            tracing::debug!("Persisted {} import setting edit(s)", written);
        }

        // Unwritten edits stay staged for the next persist
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn sidecar_path(file: &Path) -> PathBuf {
    let mut name = file.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(IMPORT_SIDECAR_SUFFIX);
    file.with_file_name(name)
}

fn matches_kind(path: &Path, kind: AssetKind) -> bool {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_lowercase(),
        None => return false,
    };
    match kind {
        AssetKind::Texture => IMAGE_EXTENSIONS.contains(&ext.as_str()),
        AssetKind::Material => ext == MATERIAL_EXTENSION,
    }
}
