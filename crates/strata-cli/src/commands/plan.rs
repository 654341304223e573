//! Plan command: dry-run an asset load against a recording host

use crate::config::StrataConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use strata_asset::AssetDescriptor;
use strata_import::{load_asset, ImportFilter, RecordingHost};

pub struct PlanArgs {
    pub descriptor: String,
    pub base_dir: Option<String>,
    pub lods: Option<String>,
    pub maps: Option<String>,
    pub geometry: Option<String>,
    pub map_format: Option<String>,
    pub group_by_model: bool,
    pub group_by_lod: bool,
    pub pack_maps: bool,
    pub format: String,
}

pub fn run(args: PlanArgs) -> Result<()> {
    let config = StrataConfig::load().context("Failed to load config")?;
    let filter = build_filter(config.filter(), &args)?;
    filter.validate()?;

    let asset = AssetDescriptor::load(&args.descriptor)
        .with_context(|| format!("Failed to load descriptor {}", args.descriptor))?;
    asset.validate()?;

    let base_dir = match &args.base_dir {
        Some(dir) => PathBuf::from(dir),
        None => Path::new(&args.descriptor)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };

    let mut host = RecordingHost::new();
    let loaded = load_asset(&mut host, &asset, &filter, &base_dir)
        .with_context(|| format!("Failed to plan import of {}", asset.name))?;

    match args.format.as_str() {
        "text" => {
            for op in host.operations() {
                println!("{}", op);
            }
            println!();
            println!(
                "{} files, {} objects, {} maps -> material {}",
                loaded.models.len(),
                loaded.objects.len(),
                loaded.images.len(),
                asset.material_name()
            );
        }
        "json" => {
            let output = serde_json::json!({
                "filter": filter,
                "asset": loaded,
                "operations": host.operations(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        format => anyhow::bail!("Unknown format: {}", format),
    }

    Ok(())
}

/// Apply command-line flags on top of the configured defaults
fn build_filter(mut filter: ImportFilter, args: &PlanArgs) -> Result<ImportFilter> {
    if let Some(lods) = &args.lods {
        filter.lods = ImportFilter::parse_lods(lods)?;
    }
    if let Some(maps) = &args.maps {
        filter.maps = ImportFilter::parse_maps(maps)?;
    }
    if let Some(geometry) = &args.geometry {
        filter.geometry_format = geometry.parse()?;
    }
    if let Some(map_format) = &args.map_format {
        filter.map_format = map_format.parse()?;
    }
    filter.group_by_model |= args.group_by_model;
    filter.group_by_lod |= args.group_by_lod;
    filter.pack_maps |= args.pack_maps;
    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use strata_asset::{GeometryFormat, MapSlot};
    use strata_import::MapFormatPreference;

    fn args() -> PlanArgs {
        PlanArgs {
            descriptor: "asset.toml".to_string(),
            base_dir: None,
            lods: None,
            maps: None,
            geometry: None,
            map_format: None,
            group_by_model: false,
            group_by_lod: false,
            pack_maps: false,
            format: "text".to_string(),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let mut a = args();
        a.lods = Some("1,3".to_string());
        a.maps = Some("albedo, gloss".to_string());
        a.geometry = Some("abc".to_string());
        a.map_format = Some("jpg".to_string());
        a.pack_maps = true;

        let filter = build_filter(ImportFilter::default(), &a).unwrap();
        assert_eq!(filter.lods, BTreeSet::from([1, 3]));
        assert_eq!(filter.maps, BTreeSet::from([MapSlot::Albedo, MapSlot::Gloss]));
        assert_eq!(filter.geometry_format, GeometryFormat::Abc);
        assert_eq!(filter.map_format, MapFormatPreference::Jpeg);
        assert!(filter.pack_maps);
        assert!(!filter.group_by_model);
    }

    #[test]
    fn test_unset_flags_keep_config() {
        let configured = ImportFilter {
            group_by_lod: true,
            geometry_format: GeometryFormat::Obj,
            ..ImportFilter::default()
        };
        let filter = build_filter(configured.clone(), &args()).unwrap();
        assert_eq!(filter, configured);
    }

    #[test]
    fn test_unknown_geometry_flag_is_rejected() {
        let mut a = args();
        a.geometry = Some("gltf".to_string());
        assert!(build_filter(ImportFilter::default(), &a).is_err());
    }
}
