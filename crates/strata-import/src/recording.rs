//! In-memory scene host that records every call
//!
//! Used for tests and dry runs. It hands out sequential handles, keeps a
//! container tree and material node graphs, and can be told to fail
//! specific imports or image loads.

use crate::authoring::SceneAuthoring;
use crate::shading::{BlendMode, ColorSpace, NodeKind, Socket};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use strata_asset::{GeometryFormat, ImageFormat};
use strata_core::{
    ContainerHandle, ImageHandle, MaterialHandle, NodeHandle, ObjectHandle, Result, StrataError,
};

/// A host call, in the order it was made
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    ImportGeometry {
        path: PathBuf,
        format: GeometryFormat,
        container: ContainerHandle,
        objects: Vec<ObjectHandle>,
    },
    LoadImage {
        path: PathBuf,
        image: ImageHandle,
    },
    PackImage {
        image: ImageHandle,
    },
    SetColorSpace {
        image: ImageHandle,
        color_space: ColorSpace,
    },
    CreateContainer {
        name: String,
        container: ContainerHandle,
        parent: ContainerHandle,
    },
    SetActiveContainer {
        container: ContainerHandle,
        previous: ContainerHandle,
    },
    CreateMaterial {
        name: String,
        material: MaterialHandle,
    },
    CreateNode {
        material: MaterialHandle,
        node: NodeHandle,
        kind: NodeKind,
        position: [f32; 2],
    },
    SetNodeImage {
        material: MaterialHandle,
        node: NodeHandle,
        image: ImageHandle,
    },
    SetInputDefault {
        material: MaterialHandle,
        node: NodeHandle,
        socket: Socket,
        value: f32,
    },
    Connect {
        material: MaterialHandle,
        target: NodeHandle,
        target_socket: Socket,
        source: NodeHandle,
        source_socket: Socket,
    },
    SetBlendMode {
        material: MaterialHandle,
        mode: BlendMode,
    },
    AssignMaterial {
        object: ObjectHandle,
        material: MaterialHandle,
    },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::ImportGeometry { path, format, container, objects } => write!(
                f,
                "import {} {} into container {} -> {} objects",
                format,
                path.display(),
                container,
                objects.len()
            ),
            Operation::LoadImage { path, image } => {
                write!(f, "load image {} as {}", path.display(), image)
            }
            Operation::PackImage { image } => write!(f, "pack image {}", image),
            Operation::SetColorSpace { image, color_space } => {
                write!(f, "image {} color space {}", image, color_space)
            }
            Operation::CreateContainer { name, container, parent } => {
                write!(f, "create container '{}' ({}) under {}", name, container, parent)
            }
            Operation::SetActiveContainer { container, previous } => {
                write!(f, "activate container {} (was {})", container, previous)
            }
            Operation::CreateMaterial { name, material } => {
                write!(f, "create material '{}' ({})", name, material)
            }
            Operation::CreateNode { node, kind, position, .. } => write!(
                f,
                "  node {} {} at [{}, {}]",
                node,
                kind.label(),
                position[0],
                position[1]
            ),
            Operation::SetNodeImage { node, image, .. } => {
                write!(f, "  node {} image {}", node, image)
            }
            Operation::SetInputDefault { node, socket, value, .. } => {
                write!(f, "  node {} {} = {}", node, socket, value)
            }
            Operation::Connect { target, target_socket, source, source_socket, .. } => write!(
                f,
                "  link {}.{} -> {}.{}",
                source, source_socket, target, target_socket
            ),
            Operation::SetBlendMode { material, mode } => {
                write!(f, "material {} blend {:?}", material, mode)
            }
            Operation::AssignMaterial { object, material } => {
                write!(f, "assign material {} to object {}", material, object)
            }
        }
    }
}

/// A node in a recorded material graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedNode {
    pub handle: NodeHandle,
    pub kind: NodeKind,
    pub position: [f32; 2],
    pub image: Option<ImageHandle>,
}

/// A link in a recorded material graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordedLink {
    pub target: NodeHandle,
    pub target_socket: Socket,
    pub source: NodeHandle,
    pub source_socket: Socket,
}

/// A material as the host sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedMaterial {
    pub name: String,
    pub nodes: Vec<RecordedNode>,
    pub links: Vec<RecordedLink>,
    pub blend_mode: BlendMode,
}

impl RecordedMaterial {
    pub fn node(&self, handle: NodeHandle) -> Option<&RecordedNode> {
        self.nodes.iter().find(|n| n.handle == handle)
    }

    /// Links as `(source label, source socket, target label, target socket)`, sorted
    pub fn topology(&self) -> Vec<(String, Socket, String, Socket)> {
        let label = |handle: NodeHandle| {
            self.node(handle)
                .map(|n| n.kind.label())
                .unwrap_or_else(|| format!("node {}", handle))
        };
        let mut edges: Vec<_> = self
            .links
            .iter()
            .map(|l| (label(l.source), l.source_socket, label(l.target), l.target_socket))
            .collect();
        edges.sort();
        edges
    }
}

#[derive(Debug, Clone)]
struct RecordedImage {
    path: PathBuf,
    packed: bool,
    color_space: Option<ColorSpace>,
}

/// A `SceneAuthoring` implementation that keeps everything in memory
#[derive(Debug)]
pub struct RecordingHost {
    next_id: u64,
    root: ContainerHandle,
    active: ContainerHandle,
    containers: Vec<(ContainerHandle, String, ContainerHandle)>,
    images: BTreeMap<ImageHandle, RecordedImage>,
    materials: BTreeMap<MaterialHandle, RecordedMaterial>,
    objects_per_import: usize,
    create_principled_root: bool,
    failing_imports: HashSet<PathBuf>,
    failing_images: HashSet<PathBuf>,
    operations: Vec<Operation>,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            root: ContainerHandle::from_raw(0),
            active: ContainerHandle::from_raw(0),
            containers: Vec::new(),
            images: BTreeMap::new(),
            materials: BTreeMap::new(),
            objects_per_import: 1,
            create_principled_root: true,
            failing_imports: HashSet::new(),
            failing_images: HashSet::new(),
            operations: Vec::new(),
        }
    }

    /// Number of objects each geometry import reports
    pub fn with_objects_per_import(mut self, count: usize) -> Self {
        self.objects_per_import = count;
        self
    }

    /// Make importing `path` fail with a host error
    pub fn fail_import_on(&mut self, path: impl Into<PathBuf>) {
        self.failing_imports.insert(path.into());
    }

    /// Make loading the image at `path` fail with a host error
    pub fn fail_image_on(&mut self, path: impl Into<PathBuf>) {
        self.failing_images.insert(path.into());
    }

    /// Create materials without a principled node
    pub fn without_principled_root(&mut self) {
        self.create_principled_root = false;
    }

    fn next(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// The scene's top-level container
    pub fn root_container(&self) -> ContainerHandle {
        self.root
    }

    pub fn active_container(&self) -> ContainerHandle {
        self.active
    }

    /// Created containers as `(handle, name, parent)`, in creation order
    pub fn containers(&self) -> Vec<(ContainerHandle, String, ContainerHandle)> {
        self.containers.clone()
    }

    pub fn container_name(&self, container: ContainerHandle) -> Option<&str> {
        self.containers
            .iter()
            .find(|(c, _, _)| *c == container)
            .map(|(_, name, _)| name.as_str())
    }

    pub fn container_parent(&self, container: ContainerHandle) -> Option<ContainerHandle> {
        self.containers
            .iter()
            .find(|(c, _, _)| *c == container)
            .map(|(_, _, parent)| *parent)
    }

    /// Geometry imports as `(path, container)`, in call order
    pub fn imports(&self) -> Vec<(PathBuf, ContainerHandle)> {
        self.operations
            .iter()
            .filter_map(|op| match op {
                Operation::ImportGeometry { path, container, .. } => {
                    Some((path.clone(), *container))
                }
                _ => None,
            })
            .collect()
    }

    pub fn imported_paths(&self) -> Vec<PathBuf> {
        self.imports().into_iter().map(|(path, _)| path).collect()
    }

    pub fn loaded_image_paths(&self) -> Vec<PathBuf> {
        self.images.values().map(|img| img.path.clone()).collect()
    }

    pub fn is_packed(&self, image: ImageHandle) -> bool {
        self.images.get(&image).map(|img| img.packed).unwrap_or(false)
    }

    pub fn color_space(&self, image: ImageHandle) -> Option<ColorSpace> {
        self.images.get(&image).and_then(|img| img.color_space)
    }

    pub fn material(&self, material: MaterialHandle) -> Option<&RecordedMaterial> {
        self.materials.get(&material)
    }

    /// Materials assigned to an object, in assignment order
    pub fn assigned_materials(&self, object: ObjectHandle) -> Vec<MaterialHandle> {
        self.operations
            .iter()
            .filter_map(|op| match op {
                Operation::AssignMaterial { object: o, material } if *o == object => {
                    Some(*material)
                }
                _ => None,
            })
            .collect()
    }

    fn material_mut(&mut self, material: MaterialHandle) -> Result<&mut RecordedMaterial> {
        self.materials
            .get_mut(&material)
            .ok_or_else(|| StrataError::HostError(format!("unknown material {}", material)))
    }

    fn image_entry(&mut self, image: ImageHandle) -> Result<&mut RecordedImage> {
        self.images
            .get_mut(&image)
            .ok_or_else(|| StrataError::HostError(format!("unknown image {}", image)))
    }
}

impl SceneAuthoring for RecordingHost {
    fn import_geometry(
        &mut self,
        path: &Path,
        format: GeometryFormat,
    ) -> Result<Vec<ObjectHandle>> {
        if self.failing_imports.contains(path) {
            return Err(StrataError::HostError(format!("cannot import {}", path.display())));
        }
        let objects: Vec<ObjectHandle> = (0..self.objects_per_import)
            .map(|_| ObjectHandle::from_raw(self.next()))
            .collect();
        self.operations.push(Operation::ImportGeometry {
            path: path.to_path_buf(),
            format,
            container: self.active,
            objects: objects.clone(),
        });
        Ok(objects)
    }

    fn load_image(&mut self, path: &Path) -> Result<ImageHandle> {
        if self.failing_images.contains(path) {
            return Err(StrataError::HostError(format!("cannot load image {}", path.display())));
        }
        let image = ImageHandle::from_raw(self.next());
        self.images.insert(
            image,
            RecordedImage {
                path: path.to_path_buf(),
                packed: false,
                color_space: None,
            },
        );
        self.operations.push(Operation::LoadImage {
            path: path.to_path_buf(),
            image,
        });
        Ok(image)
    }

    fn pack_image(&mut self, image: ImageHandle) -> Result<()> {
        self.image_entry(image)?.packed = true;
        self.operations.push(Operation::PackImage { image });
        Ok(())
    }

    fn set_color_space(&mut self, image: ImageHandle, color_space: ColorSpace) -> Result<()> {
        self.image_entry(image)?.color_space = Some(color_space);
        self.operations.push(Operation::SetColorSpace { image, color_space });
        Ok(())
    }

    fn image_format(&self, image: ImageHandle) -> Option<ImageFormat> {
        self.images
            .get(&image)
            .and_then(|img| img.path.extension())
            .and_then(|ext| ext.to_str())
            .and_then(ImageFormat::from_extension)
    }

    fn create_container(&mut self, name: &str) -> Result<ContainerHandle> {
        let container = ContainerHandle::from_raw(self.next());
        let parent = self.active;
        self.containers.push((container, name.to_string(), parent));
        self.operations.push(Operation::CreateContainer {
            name: name.to_string(),
            container,
            parent,
        });
        Ok(container)
    }

    fn set_active_container(&mut self, container: ContainerHandle) -> Result<ContainerHandle> {
        let known =
            container == self.root || self.containers.iter().any(|(c, _, _)| *c == container);
        if !known {
            return Err(StrataError::HostError(format!("unknown container {}", container)));
        }
        let previous = std::mem::replace(&mut self.active, container);
        self.operations.push(Operation::SetActiveContainer { container, previous });
        Ok(previous)
    }

    fn create_material(&mut self, name: &str) -> Result<MaterialHandle> {
        let material = MaterialHandle::from_raw(self.next());
        let mut nodes = Vec::new();
        if self.create_principled_root {
            nodes.push(RecordedNode {
                handle: NodeHandle::from_raw(self.next()),
                kind: NodeKind::Principled,
                position: [0.0, 0.0],
                image: None,
            });
        }
        self.materials.insert(
            material,
            RecordedMaterial {
                name: name.to_string(),
                nodes,
                links: Vec::new(),
                blend_mode: BlendMode::Opaque,
            },
        );
        self.operations.push(Operation::CreateMaterial {
            name: name.to_string(),
            material,
        });
        Ok(material)
    }

    fn find_node(&self, material: MaterialHandle, kind: &NodeKind) -> Option<NodeHandle> {
        self.materials
            .get(&material)
            .and_then(|m| m.nodes.iter().find(|n| n.kind == *kind))
            .map(|n| n.handle)
    }

    fn create_node(
        &mut self,
        material: MaterialHandle,
        kind: &NodeKind,
        position: [f32; 2],
    ) -> Result<NodeHandle> {
        let node = NodeHandle::from_raw(self.next());
        self.material_mut(material)?.nodes.push(RecordedNode {
            handle: node,
            kind: *kind,
            position,
            image: None,
        });
        self.operations.push(Operation::CreateNode {
            material,
            node,
            kind: *kind,
            position,
        });
        Ok(node)
    }

    fn set_node_image(
        &mut self,
        material: MaterialHandle,
        node: NodeHandle,
        image: ImageHandle,
    ) -> Result<()> {
        if !self.images.contains_key(&image) {
            return Err(StrataError::HostError(format!("unknown image {}", image)));
        }
        let entry = self
            .material_mut(material)?
            .nodes
            .iter_mut()
            .find(|n| n.handle == node)
            .ok_or_else(|| StrataError::HostError(format!("unknown node {}", node)))?;
        entry.image = Some(image);
        self.operations.push(Operation::SetNodeImage { material, node, image });
        Ok(())
    }

    fn set_input_default(
        &mut self,
        material: MaterialHandle,
        node: NodeHandle,
        socket: Socket,
        value: f32,
    ) -> Result<()> {
        if self.material_mut(material)?.node(node).is_none() {
            return Err(StrataError::HostError(format!("unknown node {}", node)));
        }
        self.operations.push(Operation::SetInputDefault {
            material,
            node,
            socket,
            value,
        });
        Ok(())
    }

    fn connect(
        &mut self,
        material: MaterialHandle,
        target: NodeHandle,
        target_socket: Socket,
        source: NodeHandle,
        source_socket: Socket,
    ) -> Result<()> {
        let recorded = self.material_mut(material)?;
        for node in [target, source] {
            if recorded.node(node).is_none() {
                return Err(StrataError::HostError(format!("unknown node {}", node)));
            }
        }
        recorded.links.push(RecordedLink {
            target,
            target_socket,
            source,
            source_socket,
        });
        self.operations.push(Operation::Connect {
            material,
            target,
            target_socket,
            source,
            source_socket,
        });
        Ok(())
    }

    fn set_blend_mode(&mut self, material: MaterialHandle, mode: BlendMode) -> Result<()> {
        self.material_mut(material)?.blend_mode = mode;
        self.operations.push(Operation::SetBlendMode { material, mode });
        Ok(())
    }

    fn assign_material(&mut self, object: ObjectHandle, material: MaterialHandle) -> Result<()> {
        if !self.materials.contains_key(&material) {
            return Err(StrataError::HostError(format!("unknown material {}", material)));
        }
        self.operations.push(Operation::AssignMaterial { object, material });
        Ok(())
    }
}
