//! Error taxonomy for scene loading and binding.
//!
//! A [`LoadError`] aborts the scene (or the primitive) it was raised for, a
//! [`BindingError`] only ever skips a single primitive. Neither is fatal for
//! the viewer: a failed scene falls back to an empty draw list.

use thiserror::Error;

use crate::data_structures::scene_graph::{ComponentType, PrimitiveMode};

/// Structural problems in the scene description itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("the scene graph does not declare a default scene")]
    NoDefaultScene,

    #[error("default scene {scene} is out of range ({count} scenes)")]
    SceneOutOfRange { scene: usize, count: usize },

    #[error("node {node} is out of range ({count} nodes)")]
    NodeOutOfRange { node: usize, count: usize },

    #[error("node {node} references mesh {mesh}, but there are only {count} meshes")]
    MeshOutOfRange { node: usize, mesh: usize, count: usize },

    #[error("accessor {accessor} is out of range ({count} accessors)")]
    AccessorOutOfRange { accessor: usize, count: usize },

    #[error("accessor {accessor} references buffer region {region}, but there are only {count} regions")]
    RegionOutOfRange {
        accessor: usize,
        region: usize,
        count: usize,
    },

    #[error("buffer region {region} does not exist ({count} regions)")]
    UnknownRegion { region: usize, count: usize },

    #[error("buffer region {region} references raw buffer {buffer}, but there are only {count} buffers")]
    BufferOutOfRange {
        region: usize,
        buffer: usize,
        count: usize,
    },

    #[error("buffer region {region} ends at byte {end}, past the end of its {len} byte buffer")]
    RegionOutOfBounds { region: usize, end: usize, len: usize },

    #[error("accessor {accessor} reads up to byte {end} of a {len} byte buffer region")]
    AccessorOutOfBounds { accessor: usize, end: usize, len: usize },

    #[error("node {node} was reached twice; the node hierarchy is cyclic")]
    CyclicGraph { node: usize },

    #[error("texture reference {index} is out of range ({count} available)")]
    TextureOutOfRange { index: usize, count: usize },

    #[error("material {index} is out of range ({count} materials)")]
    MaterialOutOfRange { index: usize, count: usize },

    #[error("image {image} has unsupported pixel format {format}")]
    UnsupportedImageFormat { image: usize, format: String },

    #[error("image {image} holds {actual} bytes, {expected} expected for its size")]
    ImageSizeMismatch {
        image: usize,
        expected: usize,
        actual: usize,
    },
}

/// Problems binding one primitive to the classified GPU buffers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("buffer region {region} has unrecognized usage tag {tag}")]
    UnrecognizedUsage { region: usize, tag: u32 },

    #[error("attribute {semantic} reads region {region}, which is not a vertex buffer")]
    NotVertexBuffer { semantic: String, region: usize },

    #[error("index accessor reads region {region}, which is not an index buffer")]
    NotIndexBuffer { region: usize },

    #[error("accessor {accessor} has no buffer region")]
    MissingBufferView { accessor: usize },

    #[error("accessor {accessor} holds {count} elements, more than a draw call can address")]
    CountOverflow { accessor: usize, count: usize },

    #[error("primitive has no POSITION attribute")]
    MissingPosition,

    #[error("attribute {semantic} has no vertex format for {components} x {component_type:?} (normalized: {normalized})")]
    UnsupportedAttributeFormat {
        semantic: String,
        component_type: ComponentType,
        components: usize,
        normalized: bool,
    },

    #[error("attribute {semantic} has offset {offset} and stride {stride}, both must be multiples of 4")]
    MisalignedAttribute {
        semantic: String,
        offset: usize,
        stride: usize,
    },

    #[error("index component type {0:?} cannot be drawn")]
    UnsupportedIndexType(ComponentType),

    #[error("primitive mode {0:?} cannot be drawn")]
    UnsupportedPrimitiveMode(PrimitiveMode),
}

/// The reason a single primitive was left out of the draw list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Binding(#[from] BindingError),
}
