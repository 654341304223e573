//! Strata CLI - Plan asset imports and material networks

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{graph, plan, slots};

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Plan scanned-asset imports and their shading networks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dry-run an asset import and print the host operations it would perform
    Plan {
        /// Path to the asset descriptor (.toml or .json)
        descriptor: String,

        /// Directory variant paths are relative to (defaults to the descriptor's directory)
        #[arg(long)]
        base_dir: Option<String>,

        /// Comma-separated LOD indices to import (e.g., "0,1")
        #[arg(long)]
        lods: Option<String>,

        /// Comma-separated map slots to load (e.g., "albedo,normal")
        #[arg(long)]
        maps: Option<String>,

        /// Geometry format: fbx, obj or abc
        #[arg(long)]
        geometry: Option<String>,

        /// Map format preference: prefer-exr, exr or jpeg
        #[arg(long)]
        map_format: Option<String>,

        /// Put the whole asset in a container named after it
        #[arg(long)]
        group_by_model: bool,

        /// Put each model's LODs in a container named after the model
        #[arg(long)]
        group_by_lod: bool,

        /// Embed loaded maps in the scene
        #[arg(long)]
        pack_maps: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Print the shading network built for a set of map slots
    Graph {
        /// Comma-separated map slots that are present
        #[arg(long)]
        slots: String,

        /// Comma-separated slots whose maps are EXR (the rest are JPEG)
        #[arg(long)]
        exr: Option<String>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List the recognized map slots
    Slots {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            descriptor,
            base_dir,
            lods,
            maps,
            geometry,
            map_format,
            group_by_model,
            group_by_lod,
            pack_maps,
            format,
        } => plan::run(plan::PlanArgs {
            descriptor,
            base_dir,
            lods,
            maps,
            geometry,
            map_format,
            group_by_model,
            group_by_lod,
            pack_maps,
            format,
        }),
        Commands::Graph { slots, exr, format } => graph::run(&slots, exr.as_deref(), &format),
        Commands::Slots { format } => slots::run(&format),
    }
}
