//! Closed enumerations for geometry formats, image formats and map slots

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strata_core::StrataError;

/// Geometry file formats an asset package can ship a LOD in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryFormat {
    Fbx,
    Obj,
    Abc,
}

impl GeometryFormat {
    pub const ALL: [GeometryFormat; 3] =
        [GeometryFormat::Fbx, GeometryFormat::Obj, GeometryFormat::Abc];

    /// MIME identifier used as the variant key in descriptors
    pub fn mime(&self) -> &'static str {
        match self {
            GeometryFormat::Fbx => "application/x-fbx",
            GeometryFormat::Obj => "application/x-obj",
            GeometryFormat::Abc => "application/x-abc",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryFormat::Fbx => "fbx",
            GeometryFormat::Obj => "obj",
            GeometryFormat::Abc => "abc",
        }
    }
}

impl fmt::Display for GeometryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GeometryFormat {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        GeometryFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == lower || f.mime() == lower)
            .ok_or_else(|| {
                StrataError::invalid_enum(
                    "geometry format",
                    s,
                    GeometryFormat::ALL.iter().map(|f| f.as_str()),
                )
            })
    }
}

/// Image file formats a texture map can ship in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Exr,
    Jpeg,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 2] = [ImageFormat::Exr, ImageFormat::Jpeg];

    /// MIME identifier used as the variant key in descriptors
    pub fn mime(&self) -> &'static str {
        match self {
            ImageFormat::Exr => "image/x-exr",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Exr => "exr",
            ImageFormat::Jpeg => "jpeg",
        }
    }

    /// HDR images carry linear data and must not be color managed as sRGB
    pub fn is_high_dynamic_range(&self) -> bool {
        matches!(self, ImageFormat::Exr)
    }

    /// Guess the format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "exr" => Some(ImageFormat::Exr),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ImageFormat {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "jpg" {
            return Ok(ImageFormat::Jpeg);
        }
        ImageFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == lower || f.mime() == lower)
            .ok_or_else(|| {
                let allowed = ImageFormat::ALL.iter().map(|f| f.as_str());
                StrataError::invalid_enum("image format", s, allowed)
            })
    }
}

/// Texture map slot types known to asset packages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapSlot {
    Albedo,
    Cavity,
    Curvature,
    Gloss,
    Normal,
    Displacement,
    Bump,
    Ao,
    Metalness,
    Diffuse,
    Roughness,
    Specular,
    Fuzz,
    Translucency,
    Thickness,
    Opacity,
    Brush,
    Mask,
    Transmission,
}

impl MapSlot {
    pub const ALL: [MapSlot; 19] = [
        MapSlot::Albedo,
        MapSlot::Cavity,
        MapSlot::Curvature,
        MapSlot::Gloss,
        MapSlot::Normal,
        MapSlot::Displacement,
        MapSlot::Bump,
        MapSlot::Ao,
        MapSlot::Metalness,
        MapSlot::Diffuse,
        MapSlot::Roughness,
        MapSlot::Specular,
        MapSlot::Fuzz,
        MapSlot::Translucency,
        MapSlot::Thickness,
        MapSlot::Opacity,
        MapSlot::Brush,
        MapSlot::Mask,
        MapSlot::Transmission,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MapSlot::Albedo => "albedo",
            MapSlot::Cavity => "cavity",
            MapSlot::Curvature => "curvature",
            MapSlot::Gloss => "gloss",
            MapSlot::Normal => "normal",
            MapSlot::Displacement => "displacement",
            MapSlot::Bump => "bump",
            MapSlot::Ao => "ao",
            MapSlot::Metalness => "metalness",
            MapSlot::Diffuse => "diffuse",
            MapSlot::Roughness => "roughness",
            MapSlot::Specular => "specular",
            MapSlot::Fuzz => "fuzz",
            MapSlot::Translucency => "translucency",
            MapSlot::Thickness => "thickness",
            MapSlot::Opacity => "opacity",
            MapSlot::Brush => "brush",
            MapSlot::Mask => "mask",
            MapSlot::Transmission => "transmission",
        }
    }

    /// Slots whose HDR variants are linear color rather than sRGB color
    pub fn is_color(&self) -> bool {
        matches!(self, MapSlot::Albedo | MapSlot::Specular | MapSlot::Translucency)
    }
}

impl fmt::Display for MapSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MapSlot {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        MapSlot::ALL
            .into_iter()
            .find(|slot| slot.as_str() == lower)
            .ok_or_else(|| {
                let allowed = MapSlot::ALL.iter().map(|m| m.as_str());
                StrataError::invalid_enum("map slot", s, allowed)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_format_parse() {
        assert_eq!("FBX".parse::<GeometryFormat>().unwrap(), GeometryFormat::Fbx);
        assert_eq!("application/x-obj".parse::<GeometryFormat>().unwrap(), GeometryFormat::Obj);
        let err = "usd".parse::<GeometryFormat>().unwrap_err();
        assert!(matches!(err, StrataError::InvalidEnumValue { .. }));
    }

    #[test]
    fn test_image_format_parse() {
        assert_eq!("jpg".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!("image/x-exr".parse::<ImageFormat>().unwrap(), ImageFormat::Exr);
        assert!("png".parse::<ImageFormat>().is_err());
        assert!(ImageFormat::Exr.is_high_dynamic_range());
        assert!(!ImageFormat::Jpeg.is_high_dynamic_range());
    }

    #[test]
    fn test_map_slot_names_round_trip() {
        assert_eq!(MapSlot::ALL.len(), 19);
        for slot in MapSlot::ALL {
            assert_eq!(slot.as_str().parse::<MapSlot>().unwrap(), slot);
        }
        assert!("emission".parse::<MapSlot>().is_err());
    }

    #[test]
    fn test_color_slots() {
        let color: Vec<_> = MapSlot::ALL.into_iter().filter(|s| s.is_color()).collect();
        assert_eq!(color, vec![MapSlot::Albedo, MapSlot::Specular, MapSlot::Translucency]);
    }
}
