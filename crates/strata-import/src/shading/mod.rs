//! Shading network synthesis
//!
//! - [`graph`]: host-independent node graph plan
//! - [`rules`]: presence-driven rule table producing the plan
//! - [`synth`]: image loading and realizing the plan in the host

mod graph;
mod rules;
mod synth;

pub use graph::{
    BlendMode, ColorSpace, Endpoint, GraphNode, Link, NodeId, NodeKind, ShadingGraph, Socket,
};
pub use rules::{plan_shading_graph, texture_color_space, SlotFormats, BUMP_STRENGTH, RULES};
pub use synth::{
    build_material, load_images, realize_graph, slot_formats, BuiltMaterial, LoadedImage,
    LoadedImages,
};
