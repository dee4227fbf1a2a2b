//! Matgen Asset - The host asset store as seen by the generator
//!
//! This crate provides the `AssetStore` contract, a filesystem-backed and an
//! in-memory implementation, the material artifact model and the per-image
//! import metadata that the generator edits.

mod fs_store;
pub mod material;
mod memory;
pub mod paths;
mod store;
mod types;

pub use fs_store::FsAssetStore;
pub use material::{Material, ShaderDef, ShaderLibrary, TextureSlot};
pub use memory::MemoryStore;
pub use store::{AssetStore, StoreError};
pub use types::{AssetKind, AssetRef, ImageHandle, ImportSettings, TextureType};
