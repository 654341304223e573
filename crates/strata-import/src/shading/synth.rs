//! Material synthesis: load maps, plan the graph, build it in the host

use super::graph::{BlendMode, NodeId, NodeKind, ShadingGraph, Socket};
use super::rules::{plan_shading_graph, SlotFormats};
use crate::authoring::SceneAuthoring;
use crate::filter::ImportFilter;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use strata_asset::{AssetDescriptor, ImageFormat, MapSlot};
use strata_core::{ImageHandle, MaterialHandle, NodeHandle, Result, StrataError};

/// An image loaded for one map slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedImage {
    pub image: ImageHandle,
    /// Format the host detected, or the variant format if it detected none
    pub format: ImageFormat,
    pub path: PathBuf,
}

/// Images loaded during one synthesis run, keyed by slot
pub type LoadedImages = BTreeMap<MapSlot, LoadedImage>;

/// Result of building an asset's material
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuiltMaterial {
    pub material: MaterialHandle,
    pub images: LoadedImages,
    pub graph: ShadingGraph,
}

/// Load the LOD 0 image of every accepted map slot.
///
/// Maps of unknown type, maps the filter rejects and maps without a variant
/// in the preferred format are skipped.
pub fn load_images<H: SceneAuthoring + ?Sized>(
    host: &mut H,
    asset: &AssetDescriptor,
    filter: &ImportFilter,
    base_dir: &Path,
) -> Result<LoadedImages> {
    let mut images = LoadedImages::new();

    for (key, map) in &asset.maps {
        let Some(slot) = map.slot() else {
            log::debug!("skipping map {} of unknown type '{}'", key, map.map_type);
            continue;
        };
        if !filter.accepts_map(slot) {
            continue;
        }
        let Some(format) = filter.map_format.resolve(map) else {
            log::debug!("map {} has no variant for {}", slot, filter.map_format);
            continue;
        };
        let Some(variant) = map.variant(0, format) else {
            continue;
        };

        log::debug!("loading map {}", slot);
        let path = variant.resolve(base_dir);
        let image = host.load_image(&path)?;
        if filter.pack_maps {
            host.pack_image(image)?;
        }

        let detected = host.image_format(image).unwrap_or(format);
        images.insert(
            slot,
            LoadedImage {
                image,
                format: detected,
                path,
            },
        );
    }

    Ok(images)
}

/// Slot formats that drive the rule table
pub fn slot_formats(images: &LoadedImages) -> SlotFormats {
    images.iter().map(|(slot, img)| (*slot, img.format)).collect()
}

/// Create the planned nodes and links in a material's node graph
pub fn realize_graph<H: SceneAuthoring + ?Sized>(
    host: &mut H,
    material: MaterialHandle,
    graph: &ShadingGraph,
    images: &LoadedImages,
) -> Result<()> {
    let root = host
        .find_node(material, &NodeKind::Principled)
        .ok_or_else(|| {
            StrataError::MissingNode(format!("principled shader in material {}", material))
        })?;

    let mut handles: Vec<NodeHandle> = Vec::with_capacity(graph.nodes.len());
    for node in &graph.nodes {
        let handle = match node.kind {
            NodeKind::Principled => root,
            kind => host.create_node(material, &kind, node.position)?,
        };

        match node.kind {
            NodeKind::Texture { slot, color_space } => {
                let loaded = images.get(&slot).ok_or_else(|| {
                    StrataError::ImportError(format!("no image loaded for {} texture", slot))
                })?;
                host.set_node_image(material, handle, loaded.image)?;
                host.set_color_space(loaded.image, color_space)?;
            }
            NodeKind::Bump { strength } => {
                host.set_input_default(material, handle, Socket::Strength, strength)?;
            }
            _ => {}
        }

        handles.push(handle);
    }

    let node_handle = |id: NodeId| {
        handles
            .get(id.0)
            .copied()
            .ok_or_else(|| StrataError::MissingNode(format!("planned node #{}", id.0)))
    };
    for link in &graph.links {
        let target = node_handle(link.to.node)?;
        let source = node_handle(link.from.node)?;
        host.connect(material, target, link.to.socket, source, link.from.socket)?;
    }

    if graph.blend_mode != BlendMode::Opaque {
        host.set_blend_mode(material, graph.blend_mode)?;
    }

    Ok(())
}

/// Build a material for an asset: load its maps, create a material named
/// `<name>_<id>`, and wire the maps into its principled shader.
pub fn build_material<H: SceneAuthoring + ?Sized>(
    host: &mut H,
    asset: &AssetDescriptor,
    filter: &ImportFilter,
    base_dir: &Path,
) -> Result<BuiltMaterial> {
    let images = load_images(host, asset, filter, base_dir)?;
    let graph = plan_shading_graph(&slot_formats(&images));

    let material = host.create_material(&asset.material_name())?;
    realize_graph(host, material, &graph, &images)?;

    log::info!(
        "built material {} with {} maps, {} nodes, {} links",
        asset.material_name(),
        images.len(),
        graph.nodes.len(),
        graph.links.len()
    );

    Ok(BuiltMaterial {
        material,
        images,
        graph,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::MapFormatPreference;
    use crate::recording::{Operation, RecordingHost};
    use crate::shading::ColorSpace;
    use std::collections::BTreeSet;
    use strata_asset::{FileVariant, MapDescriptor, VariantSet};

    fn map(slot: &str, formats: &[ImageFormat]) -> MapDescriptor {
        let variants: VariantSet = formats
            .iter()
            .map(|f| {
                let ext = match f {
                    ImageFormat::Exr => "exr",
                    ImageFormat::Jpeg => "jpg",
                };
                (f.mime().to_string(), FileVariant::new(format!("{}.{}", slot, ext)))
            })
            .collect();
        MapDescriptor {
            map_type: slot.to_string(),
            lods: vec![variants],
        }
    }

    fn asset_with(maps: &[(&str, &[ImageFormat])]) -> AssetDescriptor {
        let mut asset = AssetDescriptor::new("Bark", "b7");
        for (slot, formats) in maps {
            asset.maps.insert(slot.to_string(), map(slot, formats));
        }
        asset
    }

    fn build(host: &mut RecordingHost, asset: &AssetDescriptor) -> Result<BuiltMaterial> {
        build_material(host, asset, &ImportFilter::default(), Path::new("/tex"))
    }

    fn load_default(host: &mut RecordingHost, asset: &AssetDescriptor) -> LoadedImages {
        load_images(host, asset, &ImportFilter::default(), Path::new("/tex")).unwrap()
    }

    const JPEG: &[ImageFormat] = &[ImageFormat::Jpeg];
    const EXR: &[ImageFormat] = &[ImageFormat::Exr];
    const BOTH: &[ImageFormat] = &[ImageFormat::Jpeg, ImageFormat::Exr];

    #[test]
    fn test_load_images_respects_slot_filter() {
        let asset = asset_with(&[("albedo", JPEG), ("normal", JPEG), ("cavity", JPEG)]);
        let filter = ImportFilter {
            maps: BTreeSet::from([MapSlot::Albedo, MapSlot::Normal]),
            ..ImportFilter::default()
        };
        let mut host = RecordingHost::new();
        let images = load_images(&mut host, &asset, &filter, Path::new("/tex")).unwrap();

        assert_eq!(
            images.keys().copied().collect::<Vec<_>>(),
            vec![MapSlot::Albedo, MapSlot::Normal]
        );
        assert_eq!(images[&MapSlot::Albedo].path, PathBuf::from("/tex/albedo.jpg"));
        assert_eq!(host.loaded_image_paths().len(), 2);
    }

    #[test]
    fn test_load_images_format_resolution() {
        let asset = asset_with(&[("albedo", BOTH), ("roughness", JPEG), ("normal", EXR)]);
        let mut host = RecordingHost::new();

        let images = load_default(&mut host, &asset);
        assert_eq!(images[&MapSlot::Albedo].format, ImageFormat::Exr);
        assert_eq!(images[&MapSlot::Roughness].format, ImageFormat::Jpeg);
        assert_eq!(images[&MapSlot::Normal].format, ImageFormat::Exr);

        let filter = ImportFilter {
            map_format: MapFormatPreference::Jpeg,
            ..ImportFilter::default()
        };
        let mut host = RecordingHost::new();
        let images = load_images(&mut host, &asset, &filter, Path::new("/tex")).unwrap();
        // forcing JPEG drops the EXR-only normal map without error
        assert!(!images.contains_key(&MapSlot::Normal));
        assert_eq!(images[&MapSlot::Albedo].format, ImageFormat::Jpeg);
        assert_eq!(host.loaded_image_paths().len(), 2);
    }

    #[test]
    fn test_unknown_map_types_are_skipped() {
        let mut asset = asset_with(&[("albedo", JPEG)]);
        asset.maps.insert("sheen".to_string(), map("sheen", JPEG));
        let mut host = RecordingHost::new();
        let images = load_default(&mut host, &asset);
        assert_eq!(images.len(), 1);
    }

    #[test]
    fn test_pack_maps() {
        let asset = asset_with(&[("albedo", JPEG), ("ao", JPEG)]);
        let filter = ImportFilter {
            pack_maps: true,
            ..ImportFilter::default()
        };
        let mut host = RecordingHost::new();
        let images = load_images(&mut host, &asset, &filter, Path::new("/tex")).unwrap();
        for loaded in images.values() {
            assert!(host.is_packed(loaded.image));
        }

        let mut host = RecordingHost::new();
        let images = load_default(&mut host, &asset);
        assert!(images.values().all(|l| !host.is_packed(l.image)));
    }

    #[test]
    fn test_build_material_wires_host_graph() {
        let asset = asset_with(&[
            ("albedo", EXR),
            ("ao", JPEG),
            ("gloss", JPEG),
            ("opacity", JPEG),
        ]);
        let mut host = RecordingHost::new();
        let built = build(&mut host, &asset).unwrap();

        let material = host.material(built.material).unwrap();
        assert_eq!(material.name, "Bark_b7");
        assert_eq!(material.blend_mode, BlendMode::Hashed);
        assert_eq!(material.topology(), built.graph.topology());

        // color spaces land on the images
        let space = |slot: MapSlot| host.color_space(built.images[&slot].image);
        assert_eq!(space(MapSlot::Albedo), Some(ColorSpace::Linear));
        assert_eq!(space(MapSlot::Ao), Some(ColorSpace::NonColor));
        assert_eq!(space(MapSlot::Gloss), Some(ColorSpace::NonColor));
    }

    #[test]
    fn test_bump_strength_is_set() {
        let asset = asset_with(&[("bump", JPEG)]);
        let mut host = RecordingHost::new();
        build(&mut host, &asset).unwrap();

        assert!(host.operations().iter().any(|op| matches!(
            op,
            Operation::SetInputDefault { socket: Socket::Strength, value, .. }
                if (*value - 0.1).abs() < 1e-6
        )));
    }

    #[test]
    fn test_no_maps_builds_bare_material() {
        let asset = asset_with(&[]);
        let mut host = RecordingHost::new();
        let built = build(&mut host, &asset).unwrap();
        let material = host.material(built.material).unwrap();
        assert_eq!(material.nodes.len(), 1);
        assert!(material.links.is_empty());
        assert_eq!(material.blend_mode, BlendMode::Opaque);
    }

    #[test]
    fn test_topology_ignores_file_paths() {
        let a = asset_with(&[("albedo", JPEG), ("normal", JPEG), ("metalness", JPEG)]);
        let mut b = a.clone();
        for m in b.maps.values_mut() {
            for variants in &mut m.lods {
                for v in variants.values_mut() {
                    v.path = format!("elsewhere/{}", v.path);
                }
            }
        }

        let mut host = RecordingHost::new();
        let filter = ImportFilter::default();
        let first = build_material(&mut host, &a, &filter, Path::new("/a")).unwrap();
        let second = build_material(&mut host, &b, &filter, Path::new("/b")).unwrap();
        assert_eq!(first.graph.topology(), second.graph.topology());
    }

    #[test]
    fn test_repeated_builds_are_independent() {
        let asset = asset_with(&[("albedo", JPEG), ("ao", JPEG), ("normal", JPEG), ("bump", JPEG)]);
        let mut host = RecordingHost::new();
        let first = build(&mut host, &asset).unwrap();
        let second = build(&mut host, &asset).unwrap();

        assert_ne!(first.material, second.material);
        assert_ne!(first.images[&MapSlot::Albedo].image, second.images[&MapSlot::Albedo].image);
        assert_eq!(
            host.material(first.material).unwrap().topology(),
            host.material(second.material).unwrap().topology()
        );
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let asset = asset_with(&[("albedo", JPEG)]);
        let mut host = RecordingHost::new();
        host.without_principled_root();
        let err = build(&mut host, &asset).unwrap_err();
        assert!(matches!(err, StrataError::MissingNode(_)));
    }

    #[test]
    fn test_failed_image_load_propagates() {
        let asset = asset_with(&[("albedo", JPEG)]);
        let mut host = RecordingHost::new();
        host.fail_image_on("/tex/albedo.jpg");
        let err = build(&mut host, &asset).unwrap_err();
        assert!(matches!(err, StrataError::HostError(_)));
    }
}
