//! Strata Core - Foundational types for the Strata asset importer
//!
//! This crate provides the core types that all other Strata crates depend on:
//! - Opaque host handles (`ObjectHandle`, `ImageHandle`, `ContainerHandle`, ...)
//! - Error types and Result alias

mod error;
mod handle;

pub use error::{Result, StrataError};
pub use handle::{ContainerHandle, ImageHandle, MaterialHandle, NodeHandle, ObjectHandle};
