//! Base/companion classification by file name convention
//!
//! A companion (normal map) is any image whose lowercase stem ends with one
//! of the configured suffixes. It belongs to the first base, in enumeration
//! order, whose lowercase stem it starts with. Ambiguous inputs (two
//! companions for one base) resolve to the first candidate; this is a
//! policy, not a guarantee of the "right" pairing.

use matgen_asset::AssetRef;
use std::collections::BTreeSet;

/// One artifact's worth of sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    pub base: AssetRef,
    pub companion: Option<AssetRef>,
    /// Base name without extension, original case
    pub base_output_stem: String,
}

impl Pairing {
    pub fn new(base: AssetRef, companion: Option<AssetRef>) -> Self {
        let base_output_stem = base.stem().to_string();
        Self {
            base,
            companion,
            base_output_stem,
        }
    }
}

/// Suffix/prefix matcher. Stateless apart from its suffix list.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    suffixes: Vec<String>,
}

impl NameMatcher {
    /// Suffixes are compared case-insensitively, in the given order
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            suffixes: suffixes
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// First configured suffix the asset's stem ends with
    pub fn matching_suffix(&self, asset: &AssetRef) -> Option<&str> {
        self.suffixes
            .iter()
            .find(|s| asset.name_no_extension_lower.ends_with(s.as_str()))
            .map(|s| s.as_str())
    }

    pub fn is_companion(&self, asset: &AssetRef) -> bool {
        self.matching_suffix(asset).is_some()
    }

    /// Paths of every asset classified as a companion
    pub fn classify(&self, assets: &[AssetRef]) -> BTreeSet<String> {
        assets
            .iter()
            .filter(|a| self.is_companion(a))
            .map(|a| a.path.clone())
            .collect()
    }

    /// First candidate that starts with the base's stem and ends with a suffix
    pub fn find_companion_for<'a>(
        &self,
        base: &AssetRef,
        candidates: &'a [AssetRef],
    ) -> Option<&'a AssetRef> {
        candidates.iter().find(|candidate| {
            candidate.path != base.path
                && candidate
                    .name_no_extension_lower
                    .starts_with(&base.name_no_extension_lower)
                && self.is_companion(candidate)
        })
    }

    /// One pairing per non-companion asset, in input order
    pub fn build_pairings(&self, assets: &[AssetRef]) -> Vec<Pairing> {
        let companions = self.classify(assets);

        assets
            .iter()
            .filter(|asset| !companions.contains(&asset.path))
            .map(|base| {
                let companion = self.find_companion_for(base, assets).cloned();
                if let Some(c) = &companion {
                    tracing::debug!("Paired {} with companion {}", base.path, c.path);
                }
                Pairing::new(base.clone(), companion)
            })
            .collect()
    }
}

impl Default for NameMatcher {
    fn default() -> Self {
        Self::new(crate::config::default_companion_suffixes())
    }
}
