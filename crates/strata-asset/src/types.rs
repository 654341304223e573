//! Asset descriptor definitions

use crate::format::{GeometryFormat, ImageFormat, MapSlot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use strata_core::{Result, StrataError};

/// Format variants of one asset element, keyed by MIME identifier.
///
/// Keys stay strings: packages ship formats this importer never selects
/// (TIFF maps, USD geometry, ...) and those must not fail parsing.
pub type VariantSet = BTreeMap<String, FileVariant>;

/// A single file inside the package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileVariant {
    /// Path relative to the package root
    pub path: String,
}

impl FileVariant {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Resolve against the package root. Absolute paths are kept as-is.
    pub fn resolve(&self, base_dir: &Path) -> PathBuf {
        let path = Path::new(&self.path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }
}

/// Geometry of one model, per LOD
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    #[serde(with = "lod_keys")]
    pub lods: BTreeMap<u8, VariantSet>,
}

impl ModelDescriptor {
    /// The file for a LOD in the given format, if the package ships one
    pub fn variant(&self, lod: u8, format: GeometryFormat) -> Option<&FileVariant> {
        self.lods.get(&lod).and_then(|v| v.get(format.mime()))
    }
}

/// One texture map slot with its per-LOD format variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDescriptor {
    #[serde(rename = "type")]
    pub map_type: String,
    #[serde(default)]
    pub lods: Vec<VariantSet>,
}

impl MapDescriptor {
    /// The slot this map fills, or `None` for map types the importer doesn't know
    pub fn slot(&self) -> Option<MapSlot> {
        self.map_type.parse().ok()
    }

    /// The file for a LOD in the given format, if the package ships one
    pub fn variant(&self, lod: usize, format: ImageFormat) -> Option<&FileVariant> {
        self.lods.get(lod).and_then(|v| v.get(format.mime()))
    }

    /// Whether the given LOD offers the format
    pub fn has_variant(&self, lod: usize, format: ImageFormat) -> bool {
        self.variant(lod, format).is_some()
    }
}

/// A purchased asset package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    pub name: String,
    pub id: String,
    #[serde(default)]
    pub models: BTreeMap<String, ModelDescriptor>,
    #[serde(default)]
    pub maps: BTreeMap<String, MapDescriptor>,
}

impl AssetDescriptor {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            models: BTreeMap::new(),
            maps: BTreeMap::new(),
        }
    }

    /// Name given to the material built for this asset
    pub fn material_name(&self) -> String {
        format!("{}_{}", self.name, self.id)
    }

    /// Parse a descriptor from TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse a descriptor from JSON
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a descriptor file, picking the parser from the extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            other => Err(StrataError::DescriptorError(format!(
                "Unsupported descriptor extension {:?} for {}",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }

    /// Check the structural invariants: every LOD offers at least one
    /// format and every map has at least one LOD entry.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        for (model_key, model) in &self.models {
            for (lod, variants) in &model.lods {
                if variants.is_empty() {
                    problems.push(format!("model '{}' LOD {} has no variants", model_key, lod));
                }
            }
        }

        for (map_key, map) in &self.maps {
            if map.lods.is_empty() {
                problems.push(format!("map '{}' has no LOD entries", map_key));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(StrataError::DescriptorError(problems.join("; ")))
        }
    }
}

/// LOD maps are keyed by integers, but TOML and JSON object keys are strings
mod lod_keys {
    use super::VariantSet;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        lods: &BTreeMap<u8, VariantSet>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let keyed: BTreeMap<String, &VariantSet> =
            lods.iter().map(|(k, v)| (k.to_string(), v)).collect();
        keyed.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<u8, VariantSet>, D::Error> {
        let keyed = BTreeMap::<String, VariantSet>::deserialize(deserializer)?;
        keyed
            .into_iter()
            .map(|(k, v)| {
                k.trim()
                    .parse::<u8>()
                    .map(|lod| (lod, v))
                    .map_err(|_| D::Error::custom(format!("invalid LOD key '{}'", k)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROCK_TOML: &str = r#"
name = "Mossy Rock"
id = "vdfnbhk"

[models.rock_a.lods.0]
"application/x-fbx" = { path = "rock_a_LOD0.fbx" }
"application/x-obj" = { path = "rock_a_LOD0.obj" }

[models.rock_a.lods.2]
"application/x-fbx" = { path = "rock_a_LOD2.fbx" }

[maps.albedo]
type = "albedo"
lods = [{ "image/jpeg" = { path = "Albedo.jpg" }, "image/x-exr" = { path = "Albedo.exr" } }]

[maps.thickness_tiff]
type = "sheen"
lods = [{ "image/tiff" = { path = "Sheen.tif" } }]
"#;

    #[test]
    fn test_descriptor_from_toml() {
        let asset = AssetDescriptor::from_toml_str(ROCK_TOML).unwrap();
        assert_eq!(asset.material_name(), "Mossy Rock_vdfnbhk");

        let rock = &asset.models["rock_a"];
        assert_eq!(rock.lods.keys().copied().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(
            rock.variant(0, GeometryFormat::Obj).map(|v| v.path.as_str()),
            Some("rock_a_LOD0.obj")
        );
        assert!(rock.variant(2, GeometryFormat::Obj).is_none());
        assert!(rock.variant(1, GeometryFormat::Fbx).is_none());

        let albedo = &asset.maps["albedo"];
        assert_eq!(albedo.slot(), Some(MapSlot::Albedo));
        assert!(albedo.has_variant(0, ImageFormat::Exr));
        assert!(!albedo.has_variant(1, ImageFormat::Exr));

        // unknown map types parse fine but map to no slot
        assert_eq!(asset.maps["thickness_tiff"].slot(), None);
        asset.validate().unwrap();
    }

    #[test]
    fn test_descriptor_from_json() {
        let json = r#"{
            "name": "Bench",
            "id": "abc123",
            "models": {
                "bench": {
                    "lods": { "1": { "application/x-abc": { "path": "bench.abc" } } }
                }
            }
        }"#;
        let asset = AssetDescriptor::from_json_str(json).unwrap();
        assert!(asset.maps.is_empty());
        assert!(asset.models["bench"].variant(1, GeometryFormat::Abc).is_some());
    }

    #[test]
    fn test_invalid_lod_key() {
        let toml_str = r#"
name = "x"
id = "y"
[models.m.lods.high]
"application/x-fbx" = { path = "m.fbx" }
"#;
        assert!(AssetDescriptor::from_toml_str(toml_str).is_err());
    }

    #[test]
    fn test_validate_reports_empty_entries() {
        let mut asset = AssetDescriptor::new("x", "y");
        let mut model = ModelDescriptor::default();
        model.lods.insert(0, VariantSet::new());
        asset.models.insert("m".to_string(), model);
        asset.maps.insert(
            "normal".to_string(),
            MapDescriptor {
                map_type: "normal".to_string(),
                lods: vec![],
            },
        );

        let err = asset.validate().unwrap_err().to_string();
        assert!(err.contains("model 'm' LOD 0"));
        assert!(err.contains("map 'normal'"));
    }

    #[test]
    fn test_resolve_path() {
        let rel = FileVariant::new("maps/Albedo.jpg");
        assert_eq!(
            rel.resolve(Path::new("/packs/rock")),
            PathBuf::from("/packs/rock/maps/Albedo.jpg")
        );
        let abs = FileVariant::new("/elsewhere/Albedo.jpg");
        assert_eq!(abs.resolve(Path::new("/packs/rock")), PathBuf::from("/elsewhere/Albedo.jpg"));
    }
}
