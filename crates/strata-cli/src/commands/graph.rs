//! Graph command: print the shading network for a set of map slots

use anyhow::Result;
use strata_asset::ImageFormat;
use strata_import::shading::{plan_shading_graph, SlotFormats};
use strata_import::ImportFilter;

pub fn run(slots: &str, exr: Option<&str>, format: &str) -> Result<()> {
    let formats = slot_formats(slots, exr.unwrap_or_default())?;
    let graph = plan_shading_graph(&formats);

    match format {
        "text" => print!("{}", graph),
        "json" => println!("{}", serde_json::to_string_pretty(&graph)?),
        _ => anyhow::bail!("Unknown format: {}", format),
    }

    Ok(())
}

/// Slots listed in `exr` load as EXR, the rest as JPEG
fn slot_formats(slots: &str, exr: &str) -> Result<SlotFormats> {
    let exr = ImportFilter::parse_maps(exr)?;
    let formats = ImportFilter::parse_maps(slots)?
        .into_iter()
        .map(|slot| {
            let format = if exr.contains(&slot) {
                ImageFormat::Exr
            } else {
                ImageFormat::Jpeg
            };
            (slot, format)
        })
        .collect();
    Ok(formats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_asset::MapSlot;

    #[test]
    fn test_slot_formats() {
        let formats = slot_formats("albedo,normal,ao", "albedo").unwrap();
        assert_eq!(formats.len(), 3);
        assert_eq!(formats[&MapSlot::Albedo], ImageFormat::Exr);
        assert_eq!(formats[&MapSlot::Normal], ImageFormat::Jpeg);
        assert_eq!(formats[&MapSlot::Ao], ImageFormat::Jpeg);
    }

    #[test]
    fn test_unknown_slot_is_rejected() {
        assert!(slot_formats("albedo,sheen", "").is_err());
    }
}
