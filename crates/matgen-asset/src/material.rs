//! Material artifacts and the shaders that define their slots
//!
//! A material is written as a TOML file (`<name>.mat`):
//!
//! ```toml
//! [material]
//! shader = "Standard"
//! main_texture = "_MainTex"
//!
//! [material.textures._MainTex]
//! path = "Assets/Textures/rock.png"
//! hash = "sha256:..."
//!
//! [material.textures._BumpMap]
//!
//! [material.floats]
//! _Glossiness = 0.5
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::ImageHandle;

/// Slot bound by `Material::set_main_texture` when the shader names none
pub const DEFAULT_MAIN_TEXTURE: &str = "_MainTex";

/// Shader used when neither a template nor a shader override is given
pub const DEFAULT_SHADER: &str = "Standard";

/// Declared properties of a shader
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShaderDef {
    #[serde(default)]
    pub textures: Vec<String>,
    #[serde(default)]
    pub floats: BTreeMap<String, f64>,
    #[serde(default)]
    pub colors: BTreeMap<String, [f32; 4]>,
    #[serde(default)]
    pub main_texture: Option<String>,
}

/// Known shaders by name
#[derive(Debug, Clone)]
pub struct ShaderLibrary {
    shaders: BTreeMap<String, ShaderDef>,
}

impl ShaderLibrary {
    /// Library with the built-in shaders only
    pub fn builtin() -> Self {
        let mut shaders = BTreeMap::new();

        shaders.insert(
            DEFAULT_SHADER.to_string(),
            ShaderDef {
                textures: [
                    "_MainTex",
                    "_BumpMap",
                    "_MetallicGlossMap",
                    "_OcclusionMap",
                    "_EmissionMap",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
                floats: BTreeMap::from([
                    ("_Glossiness".to_string(), 0.5),
                    ("_Metallic".to_string(), 0.0),
                    ("_BumpScale".to_string(), 1.0),
                ]),
                colors: BTreeMap::from([("_Color".to_string(), [1.0, 1.0, 1.0, 1.0])]),
                main_texture: Some(DEFAULT_MAIN_TEXTURE.to_string()),
            },
        );

        for unlit in ["Unlit/Texture", "Unlit/Transparent"] {
            shaders.insert(
                unlit.to_string(),
                ShaderDef {
                    textures: vec![DEFAULT_MAIN_TEXTURE.to_string()],
                    main_texture: Some(DEFAULT_MAIN_TEXTURE.to_string()),
                    ..Default::default()
                },
            );
        }

        Self { shaders }
    }

    /// Add or replace shaders, e.g. from the `[shaders]` config table
    pub fn extend(&mut self, custom: impl IntoIterator<Item = (String, ShaderDef)>) {
        self.shaders.extend(custom);
    }

    pub fn get(&self, name: &str) -> Option<&ShaderDef> {
        self.shaders.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.shaders.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ShaderLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

/// A texture slot, empty until an image is bound
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureSlot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl TextureSlot {
    pub fn is_bound(&self) -> bool {
        self.path.is_some()
    }
}

impl From<&ImageHandle> for TextureSlot {
    fn from(image: &ImageHandle) -> Self {
        Self {
            path: Some(image.path.clone()),
            hash: Some(image.hash.to_prefixed_hex()),
        }
    }
}

/// A generated material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub shader: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_texture: Option<String>,
    #[serde(default)]
    pub textures: BTreeMap<String, TextureSlot>,
    #[serde(default)]
    pub floats: BTreeMap<String, f64>,
    #[serde(default)]
    pub colors: BTreeMap<String, [f32; 4]>,
}

/// TOML file format for a material artifact
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct MaterialFile {
    pub material: Material,
}

impl Material {
    /// New material with every slot the shader declares, all at defaults
    pub fn from_shader(shader: &str, def: &ShaderDef) -> Self {
        Self {
            shader: shader.to_string(),
            main_texture: def.main_texture.clone(),
            textures: def
                .textures
                .iter()
                .map(|name| (name.clone(), TextureSlot::default()))
                .collect(),
            floats: def.floats.clone(),
            colors: def.colors.clone(),
        }
    }

    /// Re-target onto another shader, keeping values for slots both declare
    pub fn with_shader(&self, shader: &str, def: &ShaderDef) -> Self {
        let mut retargeted = Self::from_shader(shader, def);
        for (name, slot) in retargeted.textures.iter_mut() {
            if let Some(existing) = self.textures.get(name) {
                *slot = existing.clone();
            }
        }
        for (name, value) in retargeted.floats.iter_mut() {
            if let Some(existing) = self.floats.get(name) {
                *value = *existing;
            }
        }
        for (name, value) in retargeted.colors.iter_mut() {
            if let Some(existing) = self.colors.get(name) {
                *value = *existing;
            }
        }
        retargeted
    }

    pub fn has_texture_slot(&self, name: &str) -> bool {
        self.textures.contains_key(name)
    }

    /// Bind an image to an existing texture slot. Returns false if there is no such slot.
    pub fn set_texture(&mut self, name: &str, image: &ImageHandle) -> bool {
        match self.textures.get_mut(name) {
            Some(slot) => {
                *slot = TextureSlot::from(image);
                true
            }
            None => false,
        }
    }

    /// Name of the conventional base slot
    pub fn main_texture_slot(&self) -> &str {
        self.main_texture.as_deref().unwrap_or(DEFAULT_MAIN_TEXTURE)
    }

    /// Bind the main texture; the slot is created if the shader lacks it
    pub fn set_main_texture(&mut self, image: &ImageHandle) -> String {
        let slot = self.main_texture_slot().to_string();
        self.textures.insert(slot.clone(), TextureSlot::from(image));
        slot
    }

    pub fn texture(&self, name: &str) -> Option<&TextureSlot> {
        self.textures.get(name)
    }

    /// Path of the image bound to a slot, if any
    pub fn texture_path(&self, name: &str) -> Option<&str> {
        self.textures.get(name).and_then(|s| s.path.as_deref())
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&MaterialFile {
            material: self.clone(),
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let file: MaterialFile = toml::from_str(content)?;
        Ok(file.material)
    }
}
