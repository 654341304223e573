//! Layered configuration system
//!
//! Import defaults are loaded with four layers of precedence (highest wins):
//! 1. Command-line flags
//! 2. Environment variables: `STRATA_GEOMETRY_FORMAT`, `STRATA_MAP_FORMAT`, `STRATA_LODS`
//! 3. Project-local: `.strata/config.toml`
//! 4. Global: `~/.strata/config.toml`
//!
//! This module handles layers 2-4; the command applies its own flags.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strata_asset::{GeometryFormat, MapSlot};
use strata_core::{Result, StrataError};
use strata_import::{ImportFilter, MapFormatPreference};

/// Import defaults; unset fields fall through to lower layers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportDefaults {
    #[serde(default)]
    pub lods: Option<Vec<u8>>,
    #[serde(default)]
    pub maps: Option<Vec<MapSlot>>,
    #[serde(default)]
    pub geometry_format: Option<GeometryFormat>,
    #[serde(default)]
    pub map_format: Option<MapFormatPreference>,
    #[serde(default)]
    pub group_by_model: Option<bool>,
    #[serde(default)]
    pub group_by_lod: Option<bool>,
    #[serde(default)]
    pub pack_maps: Option<bool>,
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrataConfigFile {
    #[serde(default)]
    pub import: ImportDefaults,
}

/// Resolved configuration with environment variable overrides applied
#[derive(Debug, Clone, Default)]
pub struct StrataConfig {
    pub import: ImportDefaults,
}

impl StrataConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut config = StrataConfigFile::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                Self::merge_into(&mut config, global);
            }
        }

        let local_path = PathBuf::from(".strata/config.toml");
        if local_path.exists() {
            let local = Self::load_file(&local_path)?;
            Self::merge_into(&mut config, local);
        }

        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

        Ok(StrataConfig { import: config.import })
    }

    /// Load config from a specific file path only (for testing)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let config = Self::load_file(path)?;
        Ok(StrataConfig { import: config.import })
    }

    /// The import filter these defaults describe
    pub fn filter(&self) -> ImportFilter {
        let defaults = ImportFilter::default();
        let import = &self.import;
        ImportFilter {
            lods: import
                .lods
                .as_ref()
                .map(|l| l.iter().copied().collect())
                .unwrap_or(defaults.lods),
            maps: import
                .maps
                .as_ref()
                .map(|m| m.iter().copied().collect())
                .unwrap_or(defaults.maps),
            geometry_format: import.geometry_format.unwrap_or(defaults.geometry_format),
            map_format: import.map_format.unwrap_or(defaults.map_format),
            group_by_model: import.group_by_model.unwrap_or(defaults.group_by_model),
            group_by_lod: import.group_by_lod.unwrap_or(defaults.group_by_lod),
            pack_maps: import.pack_maps.unwrap_or(defaults.pack_maps),
        }
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".strata").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<StrataConfigFile> {
        let content = std::fs::read_to_string(path)?;
        let config: StrataConfigFile = toml::from_str(&content).map_err(|e| {
            StrataError::ConfigError(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        Ok(config)
    }

    fn merge_into(base: &mut StrataConfigFile, overlay: StrataConfigFile) {
        let (base, overlay) = (&mut base.import, overlay.import);
        if overlay.lods.is_some() {
            base.lods = overlay.lods;
        }
        if overlay.maps.is_some() {
            base.maps = overlay.maps;
        }
        if overlay.geometry_format.is_some() {
            base.geometry_format = overlay.geometry_format;
        }
        if overlay.map_format.is_some() {
            base.map_format = overlay.map_format;
        }
        if overlay.group_by_model.is_some() {
            base.group_by_model = overlay.group_by_model;
        }
        if overlay.group_by_lod.is_some() {
            base.group_by_lod = overlay.group_by_lod;
        }
        if overlay.pack_maps.is_some() {
            base.pack_maps = overlay.pack_maps;
        }
    }

    fn apply_env_overrides(
        config: &mut StrataConfigFile,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<()> {
        if let Some(value) = var("STRATA_GEOMETRY_FORMAT") {
            config.import.geometry_format = Some(value.parse()?);
        }
        if let Some(value) = var("STRATA_MAP_FORMAT") {
            config.import.map_format = Some(value.parse()?);
        }
        if let Some(value) = var("STRATA_LODS") {
            config.import.lods = Some(ImportFilter::parse_lods(&value)?.into_iter().collect());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeSet, HashMap};
    use std::io::Write;

    fn temp_config(content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("strata_config_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    fn cleanup(path: &Path) {
        std::fs::remove_file(path).ok();
        std::fs::remove_dir(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_load_config_from_file() {
        let path = temp_config(
            r#"
[import]
lods = [0, 1]
maps = ["albedo", "normal"]
geometry_format = "obj"
map_format = "jpeg"
group_by_model = true
"#,
        );
        let config = StrataConfig::load_from_file(&path).unwrap();
        let filter = config.filter();

        assert_eq!(filter.lods, BTreeSet::from([0, 1]));
        assert_eq!(filter.maps, BTreeSet::from([MapSlot::Albedo, MapSlot::Normal]));
        assert_eq!(filter.geometry_format, GeometryFormat::Obj);
        assert_eq!(filter.map_format, MapFormatPreference::Jpeg);
        assert!(filter.group_by_model);
        assert!(!filter.group_by_lod);
        assert!(!filter.pack_maps);

        cleanup(&path);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let path = temp_config("[import]\ngeometry_format = \"usd\"\n");
        let err = StrataConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, StrataError::ConfigError(_)));
        cleanup(&path);
    }

    #[test]
    fn test_project_overrides_global() {
        let mut base = StrataConfigFile::default();
        base.import.lods = Some(vec![0]);
        base.import.pack_maps = Some(true);

        let mut overlay = StrataConfigFile::default();
        overlay.import.lods = Some(vec![2, 3]);

        StrataConfig::merge_into(&mut base, overlay);
        assert_eq!(base.import.lods, Some(vec![2, 3]));
        assert_eq!(base.import.pack_maps, Some(true));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("STRATA_GEOMETRY_FORMAT", "abc"),
            ("STRATA_MAP_FORMAT", "prefer_exr"),
            ("STRATA_LODS", "1,2"),
        ]);
        let mut config = StrataConfigFile::default();
        config.import.map_format = Some(MapFormatPreference::Jpeg);

        StrataConfig::apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.import.geometry_format, Some(GeometryFormat::Abc));
        assert_eq!(config.import.map_format, Some(MapFormatPreference::PreferExr));
        assert_eq!(config.import.lods, Some(vec![1, 2]));
    }

    #[test]
    fn test_bad_env_value_is_an_error() {
        let mut config = StrataConfigFile::default();
        let result = StrataConfig::apply_env_overrides(&mut config, |k| {
            (k == "STRATA_MAP_FORMAT").then(|| "png".to_string())
        });
        assert!(matches!(result, Err(StrataError::InvalidEnumValue { .. })));
    }

    #[test]
    fn test_empty_config_matches_filter_defaults() {
        assert_eq!(StrataConfig::default().filter(), ImportFilter::default());
    }
}
