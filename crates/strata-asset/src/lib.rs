//! Strata Asset - Asset package descriptors
//!
//! This crate describes a purchased asset package: geometry variants per
//! model and LOD, texture maps per slot, and the closed enumerations used to
//! pick between them.

mod format;
mod types;

pub use format::{GeometryFormat, ImageFormat, MapSlot};
pub use types::{AssetDescriptor, FileVariant, MapDescriptor, ModelDescriptor, VariantSet};
