//! Strata Import - Asset import planning and shading network synthesis
//!
//! Given an asset package descriptor and an import filter, this crate picks
//! which geometry and texture files to use, drives a host application
//! through the [`SceneAuthoring`] trait to import them, and wires the loaded
//! maps into a principled material.

mod authoring;
mod filter;
mod loader;
mod planner;
pub mod recording;
mod scope;
pub mod shading;

pub use authoring::SceneAuthoring;
pub use filter::{ImportFilter, MapFormatPreference, MAX_LOD};
pub use loader::{load_asset, LoadedAsset};
pub use planner::{import_asset, ImportedAsset, ImportedModel};
pub use recording::RecordingHost;
pub use scope::{in_container, ContainerScope};
pub use shading::{build_material, BuiltMaterial, LoadedImage, LoadedImages, ShadingGraph};
