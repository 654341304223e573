//! Shading graph plan
//!
//! A `ShadingGraph` is a host-independent description of the node network
//! a material should get: which nodes exist, where they sit, and which
//! output socket feeds which input socket. It is built by the rule table in
//! [`super::rules`] and handed to the host by [`super::synth`].

use serde::{Deserialize, Serialize};
use std::fmt;
use strata_asset::MapSlot;

/// Color management applied to a loaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorSpace {
    Srgb,
    NonColor,
    Linear,
}

impl ColorSpace {
    /// Host-facing name
    pub fn name(&self) -> &'static str {
        match self {
            ColorSpace::Srgb => "sRGB",
            ColorSpace::NonColor => "Non-Color",
            ColorSpace::Linear => "Linear",
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Material transparency mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    #[default]
    Opaque,
    /// Dithered (hashed) alpha
    Hashed,
}

/// Named node sockets, inputs and outputs alike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Socket {
    BaseColor,
    Metallic,
    Roughness,
    Alpha,
    Transmission,
    Normal,
    Color,
    Color1,
    Color2,
    Height,
    Strength,
}

impl Socket {
    /// Host-facing name
    pub fn name(&self) -> &'static str {
        match self {
            Socket::BaseColor => "Base Color",
            Socket::Metallic => "Metallic",
            Socket::Roughness => "Roughness",
            Socket::Alpha => "Alpha",
            Socket::Transmission => "Transmission",
            Socket::Normal => "Normal",
            Socket::Color => "Color",
            Socket::Color1 => "Color1",
            Socket::Color2 => "Color2",
            Socket::Height => "Height",
            Socket::Strength => "Strength",
        }
    }
}

impl fmt::Display for Socket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Node types the synthesizer can ask for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// The material's principled shader. Exists before synthesis starts.
    Principled,
    /// Image texture sampling the map loaded for `slot`
    Texture { slot: MapSlot, color_space: ColorSpace },
    /// RGB mix in multiply mode
    MixMultiply,
    Invert,
    Bump { strength: f32 },
    NormalMap,
}

impl NodeKind {
    /// Short role label, used in logs and graph dumps
    pub fn label(&self) -> String {
        match self {
            NodeKind::Principled => "principled".to_string(),
            NodeKind::Texture { slot, .. } => format!("texture:{}", slot),
            NodeKind::MixMultiply => "multiply".to_string(),
            NodeKind::Invert => "invert".to_string(),
            NodeKind::Bump { .. } => "bump".to_string(),
            NodeKind::NormalMap => "normal_map".to_string(),
        }
    }
}

/// Index of a node within a `ShadingGraph`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

/// A planned node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Editor layout position; cosmetic
    pub position: [f32; 2],
}

/// One end of a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Endpoint {
    pub node: NodeId,
    pub socket: Socket,
}

/// A directed link from an output socket to an input socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Link {
    pub from: Endpoint,
    pub to: Endpoint,
}

/// A complete plan for a material's node network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadingGraph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<Link>,
    pub blend_mode: BlendMode,
}

impl Default for ShadingGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ShadingGraph {
    /// A graph holding only the principled root
    pub fn new() -> Self {
        Self {
            nodes: vec![GraphNode {
                id: NodeId(0),
                kind: NodeKind::Principled,
                position: [0.0, 0.0],
            }],
            links: Vec::new(),
            blend_mode: BlendMode::Opaque,
        }
    }

    /// The principled root node
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn add_node(&mut self, kind: NodeKind, position: [f32; 2]) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(GraphNode { id, kind, position });
        id
    }

    /// Link `source.source_socket` into `target.target_socket`.
    /// Argument order follows the data flow backwards: receiver first.
    pub fn connect(
        &mut self,
        target: NodeId,
        target_socket: Socket,
        source: NodeId,
        source_socket: Socket,
    ) {
        self.links.push(Link {
            from: Endpoint { node: source, socket: source_socket },
            to: Endpoint { node: target, socket: target_socket },
        });
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id.0)
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|n| &n.kind)
    }

    /// Texture node sampling the given slot
    pub fn texture(&self, slot: MapSlot) -> Option<&GraphNode> {
        self.nodes
            .iter()
            .find(|n| matches!(n.kind, NodeKind::Texture { slot: s, .. } if s == slot))
    }

    /// Number of nodes matching a predicate
    pub fn count(&self, pred: impl Fn(&NodeKind) -> bool) -> usize {
        self.nodes.iter().filter(|n| pred(&n.kind)).count()
    }

    /// The link feeding an input socket, if any
    pub fn input(&self, node: NodeId, socket: Socket) -> Option<&Link> {
        self.links
            .iter()
            .find(|l| l.to.node == node && l.to.socket == socket)
    }

    /// Links feeding the principled root
    pub fn root_inputs(&self) -> Vec<&Link> {
        let root = self.root();
        self.links.iter().filter(|l| l.to.node == root).collect()
    }

    /// Layout-free description of the graph: every link as
    /// `(source label, source socket, target label, target socket)`.
    pub fn topology(&self) -> Vec<(String, Socket, String, Socket)> {
        let label = |id: NodeId| {
            self.kind(id)
                .map(NodeKind::label)
                .unwrap_or_else(|| format!("#{}", id.0))
        };
        let mut edges: Vec<_> = self
            .links
            .iter()
            .map(|l| (label(l.from.node), l.from.socket, label(l.to.node), l.to.socket))
            .collect();
        edges.sort();
        edges
    }
}

impl fmt::Display for ShadingGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nodes:")?;
        for node in &self.nodes {
            match node.kind {
                NodeKind::Texture { color_space, .. } => writeln!(
                    f,
                    "  #{} {} ({}) at [{}, {}]",
                    node.id.0,
                    node.kind.label(),
                    color_space,
                    node.position[0],
                    node.position[1]
                )?,
                _ => writeln!(
                    f,
                    "  #{} {} at [{}, {}]",
                    node.id.0,
                    node.kind.label(),
                    node.position[0],
                    node.position[1]
                )?,
            }
        }
        writeln!(f, "links:")?;
        for link in &self.links {
            writeln!(
                f,
                "  #{}.{} -> #{}.{}",
                link.from.node.0, link.from.socket, link.to.node.0, link.to.socket
            )?;
        }
        write!(f, "blend: {:?}", self.blend_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_graph_has_root_only() {
        let graph = ShadingGraph::new();
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.kind(graph.root()), Some(&NodeKind::Principled));
        assert!(graph.links.is_empty());
        assert_eq!(graph.blend_mode, BlendMode::Opaque);
    }

    #[test]
    fn test_connect_records_receiver_and_provider() {
        let mut graph = ShadingGraph::new();
        let tex = graph.add_node(
            NodeKind::Texture {
                slot: MapSlot::Metalness,
                color_space: ColorSpace::NonColor,
            },
            [-1150.0, 200.0],
        );
        graph.connect(graph.root(), Socket::Metallic, tex, Socket::Color);

        let link = graph.input(graph.root(), Socket::Metallic).unwrap();
        assert_eq!(link.from, Endpoint { node: tex, socket: Socket::Color });
        assert_eq!(graph.root_inputs().len(), 1);
        assert_eq!(
            graph.topology(),
            vec![(
                "texture:metalness".to_string(),
                Socket::Color,
                "principled".to_string(),
                Socket::Metallic
            )]
        );
    }

    #[test]
    fn test_display_lists_nodes_and_links() {
        let mut graph = ShadingGraph::new();
        let inv = graph.add_node(NodeKind::Invert, [-250.0, 60.0]);
        graph.connect(graph.root(), Socket::Roughness, inv, Socket::Color);
        let text = graph.to_string();
        assert!(text.contains("#1 invert"));
        assert!(text.contains("#1.Color -> #0.Roughness"));
    }
}
