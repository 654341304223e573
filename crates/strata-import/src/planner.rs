//! Geometry import planning
//!
//! Picks one file per accepted (model, LOD) pair and asks the host to
//! import it, optionally grouping the results in containers.

use crate::authoring::SceneAuthoring;
use crate::filter::ImportFilter;
use crate::scope::in_container;
use serde::Serialize;
use std::path::{Path, PathBuf};
use strata_asset::{AssetDescriptor, ModelDescriptor};
use strata_core::{ObjectHandle, Result};

/// One geometry file that was imported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedModel {
    pub model: String,
    pub lod: u8,
    pub path: PathBuf,
    pub objects: Vec<ObjectHandle>,
}

/// Result of importing an asset's geometry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportedAsset {
    /// Every object the host created, in import order
    pub objects: Vec<ObjectHandle>,
    pub models: Vec<ImportedModel>,
}

/// Import the geometry of an asset.
///
/// With `group_by_model` the whole asset goes into a container named after
/// the asset; with `group_by_lod` each model's geometry goes into a
/// container named after the model key. Missing LODs or formats are skipped.
pub fn import_asset<H: SceneAuthoring + ?Sized>(
    host: &mut H,
    asset: &AssetDescriptor,
    filter: &ImportFilter,
    base_dir: &Path,
) -> Result<ImportedAsset> {
    log::debug!("loading asset {}", asset.name);

    let models = in_container(host, filter.group_by_model, &asset.name, |host| {
        let mut imported = Vec::new();
        for (key, model) in &asset.models {
            let lods = in_container(host, filter.group_by_lod, key, |host| {
                import_model(host, key, model, filter, base_dir)
            })?;
            imported.extend(lods);
        }
        Ok(imported)
    })?;

    let objects: Vec<ObjectHandle> =
        models.iter().flat_map(|m| m.objects.iter().copied()).collect();
    log::info!(
        "imported {} files ({} objects) for asset {}",
        models.len(),
        objects.len(),
        asset.name
    );

    Ok(ImportedAsset { objects, models })
}

fn import_model<H: SceneAuthoring + ?Sized>(
    host: &mut H,
    key: &str,
    model: &ModelDescriptor,
    filter: &ImportFilter,
    base_dir: &Path,
) -> Result<Vec<ImportedModel>> {
    log::debug!("loading model {}", key);

    let mut imported = Vec::new();
    for &lod in model.lods.keys() {
        if !filter.accepts_lod(lod) {
            continue;
        }
        let Some(variant) = model.variant(lod, filter.geometry_format) else {
            log::debug!("model {} has no {} variant at LOD {}", key, filter.geometry_format, lod);
            continue;
        };

        let path = variant.resolve(base_dir);
        let objects = host.import_geometry(&path, filter.geometry_format)?;
        imported.push(ImportedModel {
            model: key.to_string(),
            lod,
            path,
            objects,
        });
    }
    Ok(imported)
}
