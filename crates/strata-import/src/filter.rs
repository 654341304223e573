//! Caller-supplied import configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use strata_asset::{GeometryFormat, ImageFormat, MapDescriptor, MapSlot};
use strata_core::{Result, StrataError};

/// Highest LOD index a package can ship
pub const MAX_LOD: u8 = 8;

/// Which image format to use for texture maps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MapFormatPreference {
    /// EXR when LOD 0 offers it, JPEG otherwise
    #[default]
    PreferExr,
    /// EXR only; maps without an EXR variant are skipped
    Exr,
    /// JPEG only; maps without a JPEG variant are skipped
    Jpeg,
}

impl MapFormatPreference {
    pub const ALL: [MapFormatPreference; 3] = [
        MapFormatPreference::PreferExr,
        MapFormatPreference::Exr,
        MapFormatPreference::Jpeg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MapFormatPreference::PreferExr => "prefer-exr",
            MapFormatPreference::Exr => "exr",
            MapFormatPreference::Jpeg => "jpeg",
        }
    }

    /// Pick the LOD 0 format for a map, or `None` when the map has no
    /// acceptable variant and should be left out.
    pub fn resolve(&self, map: &MapDescriptor) -> Option<ImageFormat> {
        let wanted = match self {
            MapFormatPreference::PreferExr => {
                if map.has_variant(0, ImageFormat::Exr) {
                    ImageFormat::Exr
                } else {
                    ImageFormat::Jpeg
                }
            }
            MapFormatPreference::Exr => ImageFormat::Exr,
            MapFormatPreference::Jpeg => ImageFormat::Jpeg,
        };
        map.has_variant(0, wanted).then_some(wanted)
    }
}

impl fmt::Display for MapFormatPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MapFormatPreference {
    type Err = StrataError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "prefer-exr" => Ok(MapFormatPreference::PreferExr),
            "exr" => Ok(MapFormatPreference::Exr),
            "jpeg" | "jpg" => Ok(MapFormatPreference::Jpeg),
            _ => Err(StrataError::invalid_enum(
                "map format preference",
                s,
                MapFormatPreference::ALL.iter().map(|p| p.as_str()),
            )),
        }
    }
}

/// What to import and how to group it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFilter {
    /// Accepted LOD indices
    #[serde(default = "default_lods")]
    pub lods: BTreeSet<u8>,
    /// Accepted texture map slots
    #[serde(default = "default_maps")]
    pub maps: BTreeSet<MapSlot>,
    #[serde(default = "default_geometry_format")]
    pub geometry_format: GeometryFormat,
    #[serde(default)]
    pub map_format: MapFormatPreference,
    /// Wrap the whole asset in a container named after the asset
    #[serde(default)]
    pub group_by_model: bool,
    /// Wrap each model's geometry in a container named after the model
    #[serde(default)]
    pub group_by_lod: bool,
    /// Embed loaded images in the host scene
    #[serde(default)]
    pub pack_maps: bool,
}

fn default_lods() -> BTreeSet<u8> {
    BTreeSet::from([0])
}

fn default_maps() -> BTreeSet<MapSlot> {
    MapSlot::ALL.into_iter().collect()
}

fn default_geometry_format() -> GeometryFormat {
    GeometryFormat::Fbx
}

impl Default for ImportFilter {
    fn default() -> Self {
        Self {
            lods: default_lods(),
            maps: default_maps(),
            geometry_format: default_geometry_format(),
            map_format: MapFormatPreference::default(),
            group_by_model: false,
            group_by_lod: false,
            pack_maps: false,
        }
    }
}

impl ImportFilter {
    pub fn accepts_lod(&self, lod: u8) -> bool {
        self.lods.contains(&lod)
    }

    pub fn accepts_map(&self, slot: MapSlot) -> bool {
        self.maps.contains(&slot)
    }

    /// Reject LOD indices a package can never contain
    pub fn validate(&self) -> Result<()> {
        match self.lods.iter().find(|&&lod| lod > MAX_LOD) {
            Some(&lod) => Err(StrataError::ValueOutOfRange {
                field: "lods".to_string(),
                min: 0,
                max: MAX_LOD as i64,
                value: lod as i64,
            }),
            None => Ok(()),
        }
    }

    /// Parse a comma-separated LOD list such as `0,1,4`
    pub fn parse_lods(list: &str) -> Result<BTreeSet<u8>> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<u8>()
                    .map_err(|_| StrataError::DescriptorError(format!("Invalid LOD index '{}'", s)))
            })
            .collect()
    }

    /// Parse a comma-separated slot list such as `albedo,normal`
    pub fn parse_maps(list: &str) -> Result<BTreeSet<MapSlot>> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}
