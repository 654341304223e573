//! Full asset load: geometry, material, and material assignment

use crate::authoring::SceneAuthoring;
use crate::filter::ImportFilter;
use crate::planner::{import_asset, ImportedModel};
use crate::shading::{build_material, LoadedImages, ShadingGraph};
use serde::Serialize;
use std::path::Path;
use strata_asset::AssetDescriptor;
use strata_core::{MaterialHandle, ObjectHandle, Result};

/// Everything produced by loading one asset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedAsset {
    pub objects: Vec<ObjectHandle>,
    pub models: Vec<ImportedModel>,
    pub material: MaterialHandle,
    pub images: LoadedImages,
    pub graph: ShadingGraph,
}

/// Import an asset's geometry, build its material, and give every
/// imported object that material in place of whatever the importer made.
pub fn load_asset<H: SceneAuthoring + ?Sized>(
    host: &mut H,
    asset: &AssetDescriptor,
    filter: &ImportFilter,
    base_dir: &Path,
) -> Result<LoadedAsset> {
    let imported = import_asset(host, asset, filter, base_dir)?;
    let built = build_material(host, asset, filter, base_dir)?;

    for &object in &imported.objects {
        host.assign_material(object, built.material)?;
    }

    Ok(LoadedAsset {
        objects: imported.objects,
        models: imported.models,
        material: built.material,
        images: built.images,
        graph: built.graph,
    })
}
