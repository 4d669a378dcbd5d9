//! Allow-list enforcement driven by the per-root `assetscomposer.json` manifest.

mod manifest;
mod policy;

pub use manifest::{MANIFEST_FILE, ProtectionManifest, load_manifest};
pub use policy::{Environment, authorize};
