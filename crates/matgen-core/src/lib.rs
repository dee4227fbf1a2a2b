//! Matgen Core - Foundational types shared by the matgen crates
//!
//! - `MatgenError` / `Result` - run-level errors
//! - `ContentHash` - SHA-256 fingerprint of source image bytes

mod error;
mod hash;

pub use error::{MatgenError, Result};
pub use hash::ContentHash;
