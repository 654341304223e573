//! Presence-driven shading rules
//!
//! Each rule inspects which map slots were loaded (and in which format) and
//! adds its fragment of the node network. Rules never look at file paths,
//! so identical slot sets always produce identical graphs.

use super::graph::{BlendMode, ColorSpace, NodeId, NodeKind, ShadingGraph, Socket};
use std::collections::BTreeMap;
use strata_asset::{ImageFormat, MapSlot};

/// Loaded slots and the detected format of each image
pub type SlotFormats = BTreeMap<MapSlot, ImageFormat>;

/// Strength given to every bump node
pub const BUMP_STRENGTH: f32 = 0.1;

type Rule = fn(&SlotFormats, &mut ShadingGraph);

/// Rules in the order their fragments are added
pub const RULES: &[(&str, Rule)] = &[
    ("base_color", base_color),
    ("metallic", metallic),
    ("roughness", roughness),
    ("opacity", opacity),
    ("transmission", transmission),
    ("normal", normal),
];

/// Plan the node network for a set of loaded slots
pub fn plan_shading_graph(slots: &SlotFormats) -> ShadingGraph {
    let mut graph = ShadingGraph::new();
    for (name, rule) in RULES {
        let before = graph.nodes.len();
        rule(slots, &mut graph);
        log::trace!("rule {} added {} nodes", name, graph.nodes.len() - before);
    }
    graph
}

/// Color space for a texture: HDR color maps stay linear
pub fn texture_color_space(slot: MapSlot, format: ImageFormat, base: ColorSpace) -> ColorSpace {
    if slot.is_color() && format.is_high_dynamic_range() {
        ColorSpace::Linear
    } else {
        base
    }
}

/// Add a texture node for a loaded slot. Returns `None` if the slot isn't loaded.
fn add_texture(
    slots: &SlotFormats,
    graph: &mut ShadingGraph,
    slot: MapSlot,
    position: [f32; 2],
    base: ColorSpace,
) -> Option<NodeId> {
    let format = *slots.get(&slot)?;
    let color_space = texture_color_space(slot, format, base);
    Some(graph.add_node(NodeKind::Texture { slot, color_space }, position))
}

/// Wire a texture's color output into `target`, if the texture exists
fn feed(graph: &mut ShadingGraph, tex: Option<NodeId>, target: NodeId, socket: Socket) {
    if let Some(tex) = tex {
        graph.connect(target, socket, tex, Socket::Color);
    }
}

fn base_color(slots: &SlotFormats, graph: &mut ShadingGraph) {
    let root = graph.root();
    if !slots.contains_key(&MapSlot::Albedo) {
        return;
    }

    if slots.contains_key(&MapSlot::Ao) {
        let mult = graph.add_node(NodeKind::MixMultiply, [-250.0, 320.0]);
        let albedo = add_texture(slots, graph, MapSlot::Albedo, [-640.0, 460.0], ColorSpace::Srgb);
        let ao = add_texture(slots, graph, MapSlot::Ao, [-640.0, 200.0], ColorSpace::NonColor);
        feed(graph, albedo, mult, Socket::Color1);
        feed(graph, ao, mult, Socket::Color2);
        graph.connect(root, Socket::BaseColor, mult, Socket::Color);
    } else {
        let albedo = add_texture(slots, graph, MapSlot::Albedo, [-640.0, 420.0], ColorSpace::Srgb);
        feed(graph, albedo, root, Socket::BaseColor);
    }
}

fn metallic(slots: &SlotFormats, graph: &mut ShadingGraph) {
    let root = graph.root();
    let metal = add_texture(
        slots,
        graph,
        MapSlot::Metalness,
        [-1150.0, 200.0],
        ColorSpace::NonColor,
    );
    feed(graph, metal, root, Socket::Metallic);
}

fn roughness(slots: &SlotFormats, graph: &mut ShadingGraph) {
    let root = graph.root();
    if slots.contains_key(&MapSlot::Roughness) {
        let rough = add_texture(
            slots,
            graph,
            MapSlot::Roughness,
            [-1150.0, -60.0],
            ColorSpace::NonColor,
        );
        feed(graph, rough, root, Socket::Roughness);
    } else if slots.contains_key(&MapSlot::Gloss) {
        // roughness = 1 - gloss
        let gloss = add_texture(
            slots,
            graph,
            MapSlot::Gloss,
            [-1150.0, -60.0],
            ColorSpace::NonColor,
        );
        let inv = graph.add_node(NodeKind::Invert, [-250.0, 60.0]);
        feed(graph, gloss, inv, Socket::Color);
        graph.connect(root, Socket::Roughness, inv, Socket::Color);
    }
}

fn opacity(slots: &SlotFormats, graph: &mut ShadingGraph) {
    let root = graph.root();
    let alpha = add_texture(
        slots,
        graph,
        MapSlot::Opacity,
        [-1550.0, -160.0],
        ColorSpace::NonColor,
    );
    if alpha.is_some() {
        feed(graph, alpha, root, Socket::Alpha);
        graph.blend_mode = BlendMode::Hashed;
    }
}

fn transmission(slots: &SlotFormats, graph: &mut ShadingGraph) {
    let root = graph.root();
    let position = [-1550.0, -420.0];
    let tex = if slots.contains_key(&MapSlot::Translucency) {
        add_texture(slots, graph, MapSlot::Translucency, position, ColorSpace::Srgb)
    } else {
        add_texture(slots, graph, MapSlot::Transmission, position, ColorSpace::NonColor)
    };
    feed(graph, tex, root, Socket::Transmission);
}

fn normal(slots: &SlotFormats, graph: &mut ShadingGraph) {
    let root = graph.root();
    let has_normal = slots.contains_key(&MapSlot::Normal);
    let has_bump = slots.contains_key(&MapSlot::Bump);
    let bump_kind = NodeKind::Bump { strength: BUMP_STRENGTH };

    match (has_normal, has_bump) {
        (true, true) => {
            // normal map feeds the bump node's Normal input; only bump reaches the root
            let bump = graph.add_node(bump_kind, [-250.0, -170.0]);
            let normal_map = graph.add_node(NodeKind::NormalMap, [-640.0, -400.0]);
            let normal = add_texture(
                slots,
                graph,
                MapSlot::Normal,
                [-1150.0, -580.0],
                ColorSpace::NonColor,
            );
            let height = add_texture(
                slots,
                graph,
                MapSlot::Bump,
                [-640.0, -130.0],
                ColorSpace::NonColor,
            );
            feed(graph, normal, normal_map, Socket::Color);
            feed(graph, height, bump, Socket::Height);
            graph.connect(bump, Socket::Normal, normal_map, Socket::Normal);
            graph.connect(root, Socket::Normal, bump, Socket::Normal);
        }
        (true, false) => {
            let normal_map = graph.add_node(NodeKind::NormalMap, [-250.0, -170.0]);
            let normal = add_texture(
                slots,
                graph,
                MapSlot::Normal,
                [-640.0, -207.0],
                ColorSpace::NonColor,
            );
            feed(graph, normal, normal_map, Socket::Color);
            graph.connect(root, Socket::Normal, normal_map, Socket::Normal);
        }
        (false, true) => {
            let bump = graph.add_node(bump_kind, [-250.0, -170.0]);
            let height = add_texture(
                slots,
                graph,
                MapSlot::Bump,
                [-640.0, -207.0],
                ColorSpace::NonColor,
            );
            feed(graph, height, bump, Socket::Height);
            graph.connect(root, Socket::Normal, bump, Socket::Normal);
        }
        (false, false) => {}
    }
}
