//! Slots command

use anyhow::Result;
use strata_asset::MapSlot;

pub fn run(format: &str) -> Result<()> {
    match format {
        "text" => {
            for slot in MapSlot::ALL {
                let kind = if slot.is_color() { "color" } else { "data" };
                println!("{:<14} {}", slot.as_str(), kind);
            }
        }
        "json" => println!("{}", serde_json::to_string_pretty(&MapSlot::ALL)?),
        _ => anyhow::bail!("Unknown format: {}", format),
    }
    Ok(())
}
