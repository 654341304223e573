//! Scene authoring capability implemented by the host application

use crate::shading::{BlendMode, ColorSpace, NodeKind, Socket};
use std::path::Path;
use strata_asset::{GeometryFormat, ImageFormat};
use strata_core::{ContainerHandle, ImageHandle, MaterialHandle, NodeHandle, ObjectHandle, Result};

/// Everything the importer needs from the host 3D application.
///
/// Every call blocks until the host has finished. Host failures are
/// returned as errors and propagated unchanged by the importer.
pub trait SceneAuthoring {
    /// Import a geometry file into the active container, returning the
    /// objects the host created for it.
    fn import_geometry(&mut self, path: &Path, format: GeometryFormat) -> Result<Vec<ObjectHandle>>;

    fn load_image(&mut self, path: &Path) -> Result<ImageHandle>;

    /// Embed an image's pixels in the scene file
    fn pack_image(&mut self, image: ImageHandle) -> Result<()>;

    fn set_color_space(&mut self, image: ImageHandle, color_space: ColorSpace) -> Result<()>;

    /// File format the host detected when loading the image
    fn image_format(&self, image: ImageHandle) -> Option<ImageFormat>;

    /// Create a container as a child of the active one
    fn create_container(&mut self, name: &str) -> Result<ContainerHandle>;

    /// Make `container` active, returning the previously active container
    fn set_active_container(&mut self, container: ContainerHandle) -> Result<ContainerHandle>;

    /// Create a material with its node graph enabled. The graph must
    /// already contain a principled shader node.
    fn create_material(&mut self, name: &str) -> Result<MaterialHandle>;

    /// Look up an existing node of the given kind
    fn find_node(&self, material: MaterialHandle, kind: &NodeKind) -> Option<NodeHandle>;

    fn create_node(
        &mut self,
        material: MaterialHandle,
        kind: &NodeKind,
        position: [f32; 2],
    ) -> Result<NodeHandle>;

    /// Bind an image to a texture node
    fn set_node_image(
        &mut self,
        material: MaterialHandle,
        node: NodeHandle,
        image: ImageHandle,
    ) -> Result<()>;

    /// Set the unconnected default value of a node input
    fn set_input_default(
        &mut self,
        material: MaterialHandle,
        node: NodeHandle,
        socket: Socket,
        value: f32,
    ) -> Result<()>;

    /// Link `source.source_socket` into `target.target_socket`
    fn connect(
        &mut self,
        material: MaterialHandle,
        target: NodeHandle,
        target_socket: Socket,
        source: NodeHandle,
        source_socket: Socket,
    ) -> Result<()>;

    fn set_blend_mode(&mut self, material: MaterialHandle, mode: BlendMode) -> Result<()>;

    /// Replace all materials on an object with `material`
    fn assign_material(&mut self, object: ObjectHandle, material: MaterialHandle) -> Result<()>;
}
