//! In-memory scene description.
//!
//! `SceneGraph` is the hand-off point between an external model parser and the
//! binder: plain indices into flat tables, exactly as the file format stores
//! them. Nothing in here is validated; out-of-range indices are reported by
//! [`crate::resources::binder::SceneBinder`] when they are followed.

/// GL usage tag for vertex data (`ARRAY_BUFFER`).
pub const ARRAY_BUFFER: u32 = 34962;
/// GL usage tag for index data (`ELEMENT_ARRAY_BUFFER`).
pub const ELEMENT_ARRAY_BUFFER: u32 = 34963;

#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    pub default_scene: Option<usize>,
    pub scenes: Vec<Scene>,
    pub nodes: Vec<Node>,
    pub meshes: Vec<Mesh>,
    pub accessors: Vec<Accessor>,
    pub buffer_views: Vec<BufferView>,
    pub buffers: Vec<Vec<u8>>,
    pub materials: Vec<Material>,
    pub textures: Vec<TextureRef>,
    pub images: Vec<Image>,
}

/// A root node list.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub nodes: Vec<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct Node {
    pub name: Option<String>,
    pub mesh: Option<usize>,
    pub children: Vec<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub name: Option<String>,
    pub primitives: Vec<Primitive>,
}

#[derive(Clone, Debug)]
pub struct Primitive {
    /// Semantic name (e.g. `"POSITION"`) to accessor index, in file order.
    pub attributes: Vec<(String, usize)>,
    pub indices: Option<usize>,
    pub mode: PrimitiveMode,
    pub material: Option<usize>,
}

impl Default for Primitive {
    fn default() -> Self {
        Self {
            attributes: Vec::new(),
            indices: None,
            mode: PrimitiveMode::Triangles,
            material: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl PrimitiveMode {
    /// The matching wgpu topology. Loops and fans have none.
    pub fn topology(self) -> Option<wgpu::PrimitiveTopology> {
        match self {
            PrimitiveMode::Points => Some(wgpu::PrimitiveTopology::PointList),
            PrimitiveMode::Lines => Some(wgpu::PrimitiveTopology::LineList),
            PrimitiveMode::LineStrip => Some(wgpu::PrimitiveTopology::LineStrip),
            PrimitiveMode::Triangles => Some(wgpu::PrimitiveTopology::TriangleList),
            PrimitiveMode::TriangleStrip => Some(wgpu::PrimitiveTopology::TriangleStrip),
            PrimitiveMode::LineLoop | PrimitiveMode::TriangleFan => None,
        }
    }
}

/// A typed view over a byte range of a buffer region.
#[derive(Clone, Debug)]
pub struct Accessor {
    pub kind: AccessorKind,
    pub component_type: ComponentType,
    pub normalized: bool,
    /// Offset relative to the start of the buffer region.
    pub byte_offset: usize,
    pub count: usize,
    pub buffer_view: Option<usize>,
}

impl Accessor {
    /// Size of one tightly packed element in bytes.
    pub fn element_size(&self) -> usize {
        self.kind.components() * self.component_type.size()
    }

    /// The region's stride if it declares one, the packed element size otherwise.
    pub fn byte_stride(&self, view: &BufferView) -> usize {
        view.byte_stride.unwrap_or_else(|| self.element_size())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl AccessorKind {
    pub fn components(self) -> usize {
        match self {
            AccessorKind::Scalar => 1,
            AccessorKind::Vec2 => 2,
            AccessorKind::Vec3 => 3,
            AccessorKind::Vec4 | AccessorKind::Mat2 => 4,
            AccessorKind::Mat3 => 9,
            AccessorKind::Mat4 => 16,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentType {
    I8,
    U8,
    I16,
    U16,
    U32,
    F32,
}

impl ComponentType {
    pub fn size(self) -> usize {
        match self {
            ComponentType::I8 | ComponentType::U8 => 1,
            ComponentType::I16 | ComponentType::U16 => 2,
            ComponentType::U32 | ComponentType::F32 => 4,
        }
    }
}

/// A byte range of a raw buffer with its (untyped) usage tag.
#[derive(Clone, Debug)]
pub struct BufferView {
    pub buffer: usize,
    pub byte_offset: usize,
    pub byte_length: usize,
    pub byte_stride: Option<usize>,
    /// `None` when the file leaves the usage unspecified.
    pub target: Option<u32>,
}

impl BufferView {
    /// `None` when the end does not fit in `usize`.
    pub fn byte_range(&self) -> Option<std::ops::Range<usize>> {
        let end = self.byte_offset.checked_add(self.byte_length)?;
        Some(self.byte_offset..end)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Material {
    pub name: Option<String>,
    /// Index into [`SceneGraph::textures`].
    pub base_color_texture: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct TextureRef {
    /// Index into [`SceneGraph::images`].
    pub source: Option<usize>,
}

/// A decoded image as handed over by the parser.
#[derive(Clone, Debug)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    R8,
    R8G8,
    R8G8B8,
    R8G8B8A8,
    /// Anything wider than 8 bits per channel, named for diagnostics.
    Other(String),
}
