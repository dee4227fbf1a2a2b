//! Batch material generation
//!
//! Enumerates the textures of one folder and writes one material per base
//! texture into an output folder. Per-item problems are recorded in the
//! `RunReport` and never stop the run; only unusable locations, an invalid
//! config or an unloadable template abort it up front.

use matgen_asset::material::DEFAULT_SHADER;
use matgen_asset::{AssetKind, AssetRef, AssetStore, ImageHandle, Material, ShaderLibrary};
use matgen_core::{MatgenError, Result};
use std::collections::BTreeSet;

use crate::binding::{bind_base, bind_companion, BindOutcome};
use crate::config::GenerationConfig;
use crate::matcher::{NameMatcher, Pairing};
use crate::naming::OutputNamer;
use crate::report::{ItemIssue, RunReport};

/// Sources for one artifact, resolved and ready to bind
#[derive(Debug)]
struct WorkItem {
    base: AssetRef,
    stem: String,
    base_image: ImageHandle,
    companion_image: Option<ImageHandle>,
}

/// Output naming plus the paths already claimed by earlier items of a run
struct OutputPlan<'a> {
    namer: OutputNamer,
    folder: &'a str,
    claimed: BTreeSet<String>,
}

/// Drives one batch run end to end
pub struct BatchGenerator {
    config: GenerationConfig,
    shaders: ShaderLibrary,
}

impl BatchGenerator {
    pub fn new(config: GenerationConfig, shaders: ShaderLibrary) -> Self {
        Self { config, shaders }
    }

    /// Generator that only knows the built-in shaders
    pub fn with_builtin_shaders(config: GenerationConfig) -> Self {
        Self::new(config, ShaderLibrary::builtin())
    }

    /// Enumerate `input_folder` and generate into `output_folder`
    pub fn run_folder<S>(&self, store: &mut S, input_folder: &str, output_folder: &str) -> Result<RunReport>
    where
        S: AssetStore + ?Sized,
    {
        if !store.folder_exists(input_folder) {
            return Err(MatgenError::PreconditionFailed(format!(
                "Input folder '{}' is not valid",
                input_folder
            )));
        }
        let inputs = store
            .enumerate(input_folder, AssetKind::Texture)
            .map_err(|e| {
                MatgenError::PreconditionFailed(format!(
                    "Input folder '{}' could not be listed: {}",
                    input_folder, e
                ))
            })?;
        tracing::info!("Found {} texture(s) in {}", inputs.len(), input_folder);

        self.run(&inputs, output_folder, store)
    }

    /// Generate one artifact per input (simple mode) or per pairing (paired mode)
    pub fn run<S>(&self, inputs: &[AssetRef], output_folder: &str, store: &mut S) -> Result<RunReport>
    where
        S: AssetStore + ?Sized,
    {
        self.config.validate()?;
        if !store.folder_exists(output_folder) {
            return Err(MatgenError::PreconditionFailed(format!(
                "Output folder '{}' is not valid",
                output_folder
            )));
        }
        let template = self.base_material(&*store)?;
        let mut outputs = OutputPlan {
            namer: OutputNamer::new(&self.config),
            folder: output_folder,
            claimed: BTreeSet::new(),
        };
        let mut report = RunReport::default();

        if self.config.include_companion {
            let matcher = NameMatcher::new(&self.config.companion_suffixes);
            let pairings = matcher.build_pairings(inputs);
            tracing::info!(
                "Generating {} material(s) from {} texture(s) with companions",
                pairings.len(),
                inputs.len()
            );

            let items = self.prepare_pairings(&pairings, store, &mut report);
            if report.metadata_edits > 0 {
                // Flush import changes before materials reference the textures
                if let Err(e) = store.persist() {
                    tracing::error!("Failed to persist import settings: {}", e);
                    report.persist_error = Some(e.to_string());
                }
            }
            for item in items {
                self.emit(&item, &template, &mut outputs, store, &mut report);
            }
        } else {
            tracing::info!("Generating {} material(s)", inputs.len());
            for asset in inputs {
                if let Some(item) = self.prepare_single(asset, store, &mut report) {
                    self.emit(&item, &template, &mut outputs, store, &mut report);
                }
            }
        }

        if let Err(e) = store.persist() {
            tracing::error!("Failed to persist store: {}", e);
            report.persist_error = Some(e.to_string());
        }

        tracing::info!("Batch finished: {}", report.summary());
        Ok(report)
    }

    /// Template clone or fresh material, on the override shader if one is set
    fn base_material<S>(&self, store: &S) -> Result<Material>
    where
        S: AssetStore + ?Sized,
    {
        let shader_override = match self.config.shader.as_deref() {
            Some(name) => {
                let def = self.shaders.get(name).ok_or_else(|| {
                    MatgenError::PreconditionFailed(format!(
                        "Unknown shader '{}' (known: {})",
                        name,
                        self.shaders.names().join(", ")
                    ))
                })?;
                Some((name, def))
            }
            None => None,
        };

        match self.config.template.as_deref() {
            Some(path) => {
                let template = store.load_artifact(path).map_err(|e| {
                    MatgenError::PreconditionFailed(format!(
                        "Template material '{}' could not be loaded: {}",
                        path, e
                    ))
                })?;
                Ok(match shader_override {
                    Some((name, def)) => template.with_shader(name, def),
                    None => template,
                })
            }
            None => {
                let (name, def) = match shader_override {
                    Some(pair) => pair,
                    None => {
                        let def = self.shaders.get(DEFAULT_SHADER).ok_or_else(|| {
                            MatgenError::PreconditionFailed(format!(
                                "Default shader '{}' is not available",
                                DEFAULT_SHADER
                            ))
                        })?;
                        (DEFAULT_SHADER, def)
                    }
                };
                Ok(Material::from_shader(name, def))
            }
        }
    }

    /// Load the base image and apply the alpha override
    fn prepare_base<S>(&self, base: &AssetRef, store: &mut S, report: &mut RunReport) -> Option<ImageHandle>
    where
        S: AssetStore + ?Sized,
    {
        let Some(image) = store.load_image(&base.path) else {
            report.record(ItemIssue::LoadFailure {
                path: base.path.clone(),
            });
            return None;
        };

        let alpha = self.config.alpha_override;
        if alpha.enabled {
            match store.set_alpha_mode(&base.path, alpha.new_value) {
                Ok(true) => report.metadata_edits += 1,
                Ok(false) => {}
                Err(e) => {
                    report.record(ItemIssue::ItemFailure {
                        item: base.path.clone(),
                        cause: format!("could not set alpha mode: {}", e),
                    });
                    return None;
                }
            }
        }
        Some(image)
    }

    fn prepare_single<S>(&self, asset: &AssetRef, store: &mut S, report: &mut RunReport) -> Option<WorkItem>
    where
        S: AssetStore + ?Sized,
    {
        let base_image = self.prepare_base(asset, store, report)?;
        Some(WorkItem {
            base: asset.clone(),
            stem: asset.stem().to_string(),
            base_image,
            companion_image: None,
        })
    }

    /// Resolve every pairing and apply import edits, before anything is written
    fn prepare_pairings<S>(&self, pairings: &[Pairing], store: &mut S, report: &mut RunReport) -> Vec<WorkItem>
    where
        S: AssetStore + ?Sized,
    {
        let mut items = Vec::with_capacity(pairings.len());

        for pairing in pairings {
            let Some(base_image) = self.prepare_base(&pairing.base, store, report) else {
                continue;
            };

            let companion_image = match &pairing.companion {
                Some(companion) => match store.set_companion_role(&companion.path) {
                    Ok(changed) => {
                        if changed {
                            report.metadata_edits += 1;
                        }
                        let loaded = store.load_image(&companion.path);
                        if loaded.is_none() {
                            report.record(ItemIssue::MissingCompanion {
                                item: pairing.base.path.clone(),
                                companion: companion.path.clone(),
                            });
                        }
                        loaded
                    }
                    Err(e) => {
                        report.record(ItemIssue::ItemFailure {
                            item: pairing.base.path.clone(),
                            cause: format!(
                                "could not mark {} as a normal map: {}",
                                companion.path, e
                            ),
                        });
                        continue;
                    }
                },
                None => None,
            };

            items.push(WorkItem {
                base: pairing.base.clone(),
                stem: pairing.base_output_stem.clone(),
                base_image,
                companion_image,
            });
        }

        items
    }

    /// Name, bind and write one artifact
    fn emit<S>(
        &self,
        item: &WorkItem,
        template: &Material,
        outputs: &mut OutputPlan<'_>,
        store: &mut S,
        report: &mut RunReport,
    ) where
        S: AssetStore + ?Sized,
    {
        let output_path = outputs.namer.output_path(outputs.folder, &item.stem);
        if !outputs.claimed.insert(output_path.clone()) {
            report.record(ItemIssue::DuplicateOutput {
                item: item.base.path.clone(),
                output: output_path,
            });
            return;
        }
        if !self.config.overwrite_existing && store.exists_artifact_at(&output_path) {
            tracing::debug!("Skipping {}: artifact already exists", output_path);
            report.skipped_existing.push(output_path);
            return;
        }

        let mut material = template.clone();

        let base = bind_base(&mut material, &item.base_image, &self.config);
        record_missing(report, &item.base, base);

        if let Some(companion) = &item.companion_image {
            let outcome = bind_companion(&mut material, companion, &self.config);
            record_missing(report, &item.base, outcome);
        }

        match store.create_or_overwrite_artifact(&output_path, &material) {
            Ok(()) => {
                tracing::info!("Created {}", output_path);
                report.created.push(output_path);
            }
            Err(e) => report.record(ItemIssue::ItemFailure {
                item: item.base.path.clone(),
                cause: format!("could not write {}: {}", output_path, e),
            }),
        }
    }
}

fn record_missing(report: &mut RunReport, base: &AssetRef, outcome: BindOutcome) {
    if let Some(property) = outcome.missing_property {
        report.record(ItemIssue::PropertyNotFound {
            item: base.path.clone(),
            property,
            fallback: outcome.bound_slot,
        });
    }
}
