//! Property binding policy for base and companion images

use matgen_asset::{ImageHandle, Material};

use crate::config::{GenerationConfig, DEFAULT_COMPANION_PROPERTY};

/// What a binding attempt did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindOutcome {
    /// Slot the image ended up in, `None` if the binding was skipped
    pub bound_slot: Option<String>,
    /// Requested slot that the material lacks
    pub missing_property: Option<String>,
}

impl BindOutcome {
    fn bound(slot: impl Into<String>) -> Self {
        Self {
            bound_slot: Some(slot.into()),
            missing_property: None,
        }
    }
}

/// Bind the base image. Never fails: a missing custom slot falls back to
/// the material's main texture slot.
pub fn bind_base(material: &mut Material, image: &ImageHandle, config: &GenerationConfig) -> BindOutcome {
    if !config.override_base_property_name {
        return BindOutcome::bound(material.set_main_texture(image));
    }

    let requested = config.base_property_name.as_str();
    if material.set_texture(requested, image) {
        return BindOutcome::bound(requested);
    }

    let fallback = material.set_main_texture(image);
    tracing::warn!(
        "Material has no property '{}'; bound {} to default slot '{}'",
        requested,
        image.path,
        fallback
    );
    BindOutcome {
        bound_slot: Some(fallback),
        missing_property: Some(requested.to_string()),
    }
}

/// Bind the companion image. A custom slot falls back to the default
/// companion slot; if that is missing as well the binding is skipped.
pub fn bind_companion(
    material: &mut Material,
    image: &ImageHandle,
    config: &GenerationConfig,
) -> BindOutcome {
    let requested = if config.override_companion_property_name {
        config.companion_property_name.as_str()
    } else {
        DEFAULT_COMPANION_PROPERTY
    };
    if material.set_texture(requested, image) {
        return BindOutcome::bound(requested);
    }

    if requested != DEFAULT_COMPANION_PROPERTY && material.set_texture(DEFAULT_COMPANION_PROPERTY, image) {
        tracing::warn!(
            "Material has no property '{}'; bound {} to default slot '{}'",
            requested,
            image.path,
            DEFAULT_COMPANION_PROPERTY
        );
        return BindOutcome {
            bound_slot: Some(DEFAULT_COMPANION_PROPERTY.to_string()),
            missing_property: Some(requested.to_string()),
        };
    }

    tracing::warn!(
        "Material has no property '{}' for companion {}; left unbound",
        requested,
        image.path
    );
    BindOutcome {
        bound_slot: None,
        missing_property: Some(requested.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matgen_asset::material::DEFAULT_SHADER;
    use matgen_asset::{ShaderDef, ShaderLibrary};

    fn standard() -> Material {
        Material::from_shader(DEFAULT_SHADER, ShaderLibrary::builtin().get(DEFAULT_SHADER).unwrap())
    }

    fn unlit() -> Material {
        Material::from_shader("Unlit/Texture", ShaderLibrary::builtin().get("Unlit/Texture").unwrap())
    }

    fn image(path: &str) -> ImageHandle {
        ImageHandle::new(path, path.as_bytes())
    }

    #[test]
    fn test_base_default_slot() {
        let mut material = standard();
        let outcome = bind_base(&mut material, &image("A/rock.png"), &GenerationConfig::default());
        assert_eq!(outcome.bound_slot.as_deref(), Some("_MainTex"));
        assert!(outcome.missing_property.is_none());
        assert_eq!(material.texture_path("_MainTex"), Some("A/rock.png"));
    }

    #[test]
    fn test_base_custom_slot() {
        let mut material = standard();
        let config = GenerationConfig {
            override_base_property_name: true,
            base_property_name: "_EmissionMap".to_string(),
            ..Default::default()
        };
        let outcome = bind_base(&mut material, &image("A/rock.png"), &config);
        assert_eq!(outcome.bound_slot.as_deref(), Some("_EmissionMap"));
        assert!(material.texture("_MainTex").map(|s| !s.is_bound()).unwrap_or(false));
    }

    #[test]
    fn test_base_missing_slot_falls_back() {
        let mut material = standard();
        let config = GenerationConfig {
            override_base_property_name: true,
            base_property_name: "_DoesNotExist".to_string(),
            ..Default::default()
        };
        let outcome = bind_base(&mut material, &image("A/rock.png"), &config);
        assert_eq!(outcome.bound_slot.as_deref(), Some("_MainTex"));
        assert_eq!(outcome.missing_property.as_deref(), Some("_DoesNotExist"));
        assert_eq!(material.texture_path("_MainTex"), Some("A/rock.png"));
        assert!(!material.has_texture_slot("_DoesNotExist"));
    }

    #[test]
    fn test_base_uses_shader_main_texture() {
        let def = ShaderDef {
            textures: vec!["_Albedo".to_string()],
            main_texture: Some("_Albedo".to_string()),
            ..Default::default()
        };
        let mut material = Material::from_shader("Custom", &def);
        let outcome = bind_base(&mut material, &image("A/rock.png"), &GenerationConfig::default());
        assert_eq!(outcome.bound_slot.as_deref(), Some("_Albedo"));
    }

    #[test]
    fn test_companion_default_slot() {
        let mut material = standard();
        let outcome = bind_companion(&mut material, &image("A/rock_n.png"), &GenerationConfig::default());
        assert_eq!(outcome.bound_slot.as_deref(), Some("_BumpMap"));
        assert!(outcome.missing_property.is_none());
    }

    #[test]
    fn test_companion_custom_slot() {
        let mut material = standard();
        let config = GenerationConfig {
            override_companion_property_name: true,
            companion_property_name: "_OcclusionMap".to_string(),
            ..Default::default()
        };
        let outcome = bind_companion(&mut material, &image("A/rock_n.png"), &config);
        assert_eq!(outcome.bound_slot.as_deref(), Some("_OcclusionMap"));
        assert!(outcome.missing_property.is_none());
        assert_eq!(material.texture_path("_OcclusionMap"), Some("A/rock_n.png"));
        assert_eq!(material.texture_path("_BumpMap"), None);
    }

    #[test]
    fn test_companion_custom_slot_falls_back_to_default() {
        let mut material = standard();
        let config = GenerationConfig {
            override_companion_property_name: true,
            companion_property_name: "_NormalTex".to_string(),
            ..Default::default()
        };
        let outcome = bind_companion(&mut material, &image("A/rock_n.png"), &config);
        assert_eq!(outcome.bound_slot.as_deref(), Some("_BumpMap"));
        assert_eq!(outcome.missing_property.as_deref(), Some("_NormalTex"));
    }

    #[test]
    fn test_companion_skipped_without_any_slot() {
        let mut material = unlit();
        let config = GenerationConfig {
            override_companion_property_name: true,
            companion_property_name: "_NormalTex".to_string(),
            ..Default::default()
        };
        let outcome = bind_companion(&mut material, &image("A/rock_n.png"), &config);
        assert_eq!(outcome.bound_slot, None);
        assert_eq!(outcome.missing_property.as_deref(), Some("_NormalTex"));
        assert_eq!(material.textures.len(), 1);

        let outcome = bind_companion(&mut material, &image("A/rock_n.png"), &GenerationConfig::default());
        assert_eq!(outcome.bound_slot, None);
        assert_eq!(outcome.missing_property.as_deref(), Some("_BumpMap"));
    }
}
