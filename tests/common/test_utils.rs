use morph_view::data_structures::scene_graph::{
    ARRAY_BUFFER, Accessor, AccessorKind, BufferView, ComponentType, ELEMENT_ARRAY_BUFFER, Mesh,
    Node, Primitive, Scene, SceneGraph,
};

pub const EPSILON: f32 = 1e-4;

pub fn assert_close(actual: f32, expected: f32, what: &str) {
    assert!(
        (actual - expected).abs() <= EPSILON,
        "{}: expected {}, got {}",
        what,
        expected,
        actual
    );
}

/// Small deterministic generator so randomized tests are reproducible.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    /// Uniform in `[low, high)`.
    pub fn range(&mut self, low: f32, high: f32) -> f32 {
        let unit = self.next_u32() as f32 / (1u64 << 31) as f32;
        low + unit * (high - low)
    }
}

pub fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn u16_bytes(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn region(buffer: usize, byte_offset: usize, byte_length: usize, target: Option<u32>) -> BufferView {
    BufferView {
        buffer,
        byte_offset,
        byte_length,
        byte_stride: None,
        target,
    }
}

pub fn accessor(
    kind: AccessorKind,
    component_type: ComponentType,
    count: usize,
    buffer_view: usize,
) -> Accessor {
    Accessor {
        kind,
        component_type,
        normalized: false,
        byte_offset: 0,
        count,
        buffer_view: Some(buffer_view),
    }
}

pub fn positions(accessor: usize) -> Vec<(String, usize)> {
    vec![("POSITION".to_string(), accessor)]
}

/// One triangle: three positions in region 0, three u16 indices in region 1.
///
/// Accessor 0 reads positions, accessor 1 reads indices. The scene has two
/// nodes; node 0 carries mesh 0 whose first primitive is indexed and whose
/// second is not.
pub fn two_node_scene() -> SceneGraph {
    let mut bytes = f32_bytes(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    bytes.extend(u16_bytes(&[0, 1, 2, 0]));

    SceneGraph {
        default_scene: Some(0),
        scenes: vec![Scene { nodes: vec![0] }],
        nodes: vec![
            Node {
                name: Some("root".to_string()),
                mesh: Some(0),
                children: vec![1],
            },
            Node {
                name: Some("child".to_string()),
                mesh: None,
                children: vec![],
            },
        ],
        meshes: vec![Mesh {
            name: Some("triangle".to_string()),
            primitives: vec![
                Primitive {
                    attributes: positions(0),
                    indices: Some(1),
                    ..Default::default()
                },
                Primitive {
                    attributes: positions(0),
                    ..Default::default()
                },
            ],
        }],
        accessors: vec![
            accessor(AccessorKind::Vec3, ComponentType::F32, 3, 0),
            accessor(AccessorKind::Scalar, ComponentType::U16, 3, 1),
        ],
        buffer_views: vec![
            region(0, 0, 36, Some(ARRAY_BUFFER)),
            region(0, 36, 6, Some(ELEMENT_ARRAY_BUFFER)),
        ],
        buffers: vec![bytes],
        ..Default::default()
    }
}
