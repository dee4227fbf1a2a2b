//! Matgen Gen - batch material generation from texture folders
//!
//! Pairs base textures with their normal-map companions by file name,
//! binds them into material templates and writes one material artifact
//! per base texture through an `AssetStore`.

pub mod batch;
pub mod binding;
pub mod config;
pub mod matcher;
pub mod naming;
pub mod report;

pub use batch::BatchGenerator;
pub use binding::{bind_base, bind_companion, BindOutcome};
pub use config::{AlphaOverride, GenerationConfig, GenerationOverrides, ProjectConfig};
pub use matcher::{NameMatcher, Pairing};
pub use naming::OutputNamer;
pub use report::{ItemIssue, RunReport};
