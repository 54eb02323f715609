mod common;

use common::test_utils::{accessor, positions, region, two_node_scene};
use morph_view::{
    BindingError, LoadError, PrimitiveError,
    data_structures::scene_graph::{
        AccessorKind, ComponentType, Image, Material, Mesh, Node, PixelFormat, Primitive,
        PrimitiveMode, Scene, TextureRef,
    },
    resources::binder::SceneBinder,
};

#[test]
fn binds_indexed_and_plain_primitives() {
    let graph = two_node_scene();

    let binding = SceneBinder::new(&graph).bind().unwrap();

    assert_eq!(binding.batches.len(), 2);
    assert!(binding.skipped.is_empty());
    let (indexed, plain) = (&binding.batches[0], &binding.batches[1]);
    assert!(indexed.has_index());
    assert_eq!(indexed.index_count(), 3);
    assert_eq!(
        indexed.index.as_ref().map(|index| index.format),
        Some(wgpu::IndexFormat::Uint16)
    );
    assert!(!plain.has_index());
    assert_eq!(plain.index_count(), 3);
    assert_eq!(plain.primitive, 1);

    let position = &indexed.attributes[0];
    assert_eq!(position.location, 0);
    assert_eq!(position.buffer_slot, 0);
    assert_eq!(position.byte_stride, 12);
    assert_eq!(position.format, wgpu::VertexFormat::Float32x3);
}

#[test]
fn layout_leaves_missing_slots_empty() {
    let graph = two_node_scene();

    let binding = SceneBinder::new(&graph).bind().unwrap();
    let layout = binding.batches[0].layout();

    assert_eq!(layout.topology, wgpu::PrimitiveTopology::TriangleList);
    assert!(layout.slots[0].is_some());
    assert!(layout.slots[1].is_none());
    assert!(layout.slots[2].is_none());
    assert_eq!(layout, binding.batches[1].layout());
}

#[test]
fn missing_default_scene_is_reported() {
    let mut graph = two_node_scene();
    graph.default_scene = None;

    assert_eq!(
        SceneBinder::new(&graph).bind().unwrap_err(),
        LoadError::NoDefaultScene
    );
}

#[test]
fn default_scene_out_of_range_aborts_binding() {
    let mut graph = two_node_scene();
    graph.default_scene = Some(1);

    assert_eq!(
        SceneBinder::new(&graph).bind().unwrap_err(),
        LoadError::SceneOutOfRange { scene: 1, count: 1 }
    );
}

#[test]
fn node_out_of_range_aborts_binding() {
    let mut graph = two_node_scene();
    graph.nodes[1].children.push(7);

    assert_eq!(
        SceneBinder::new(&graph).bind().unwrap_err(),
        LoadError::NodeOutOfRange { node: 7, count: 2 }
    );
}

#[test]
fn mesh_out_of_range_aborts_binding() {
    let mut graph = two_node_scene();
    graph.nodes[1].mesh = Some(3);

    assert_eq!(
        SceneBinder::new(&graph).bind().unwrap_err(),
        LoadError::MeshOutOfRange {
            node: 1,
            mesh: 3,
            count: 1
        }
    );
}

#[test]
fn cyclic_hierarchy_is_rejected() {
    let mut graph = two_node_scene();
    graph.nodes[1].children.push(0);

    assert_eq!(
        SceneBinder::new(&graph).bind().unwrap_err(),
        LoadError::CyclicGraph { node: 0 }
    );
}

#[test]
fn shared_child_is_rejected() {
    let mut graph = two_node_scene();
    graph.scenes[0].nodes.push(1);

    assert_eq!(
        SceneBinder::new(&graph).bind().unwrap_err(),
        LoadError::CyclicGraph { node: 1 }
    );
}

#[test]
fn nodes_are_visited_in_preorder() {
    let mut graph = two_node_scene();
    // root(0) -> [child(1) -> [leaf(3)], sibling(2)]
    graph.nodes[1].mesh = Some(0);
    graph.nodes[1].children.push(3);
    graph.nodes[0].children.push(2);
    graph.nodes.push(Node {
        name: Some("sibling".to_string()),
        mesh: Some(0),
        children: vec![],
    });
    graph.nodes.push(Node {
        name: Some("leaf".to_string()),
        mesh: Some(0),
        children: vec![],
    });

    let binding = SceneBinder::new(&graph).bind().unwrap();
    let order: Vec<usize> = binding
        .batches
        .iter()
        .filter(|batch| batch.primitive == 0)
        .map(|batch| batch.node)
        .collect();

    assert_eq!(order, vec![0, 1, 3, 2]);
}

#[test]
fn unrecognized_usage_skips_only_that_primitive() {
    let mut graph = two_node_scene();
    graph.buffer_views.push(region(0, 0, 36, Some(4242)));
    graph
        .accessors
        .push(accessor(AccessorKind::Vec3, ComponentType::F32, 3, 2));
    graph.meshes[0].primitives.push(Primitive {
        attributes: positions(2),
        ..Default::default()
    });

    let binding = SceneBinder::new(&graph).bind().unwrap();

    assert_eq!(binding.batches.len(), 2);
    assert_eq!(binding.skipped.len(), 1);
    assert_eq!(binding.skipped[0].primitive, 2);
    assert_eq!(
        binding.skipped[0].reason,
        PrimitiveError::Binding(BindingError::UnrecognizedUsage {
            region: 2,
            tag: 4242
        })
    );
}

#[test]
fn unknown_semantics_are_ignored() {
    let mut graph = two_node_scene();
    graph.meshes[0].primitives[0]
        .attributes
        .push(("COLOR_0".to_string(), 99));

    let binding = SceneBinder::new(&graph).bind().unwrap();

    assert_eq!(binding.batches.len(), 2);
    assert_eq!(binding.batches[0].attributes.len(), 1);
}

#[test]
fn second_attribute_shares_the_position_buffer() {
    let mut graph = two_node_scene();
    let normals = accessor(AccessorKind::Vec3, ComponentType::F32, 3, 0);
    graph.accessors.push(normals);
    graph.meshes[0].primitives[0]
        .attributes
        .push(("NORMAL".to_string(), 2));

    let binding = SceneBinder::new(&graph).bind().unwrap();
    let batch = &binding.batches[0];

    assert_eq!(batch.attributes.len(), 2);
    assert_eq!(batch.attributes[1].location, 1);
    assert_eq!(batch.attributes[1].buffer_slot, batch.attributes[0].buffer_slot);
    assert!(batch.layout().slots[1].is_some());
}

#[test]
fn primitive_without_position_is_skipped() {
    let mut graph = two_node_scene();
    graph.meshes[0].primitives[1].attributes = vec![("NORMAL".to_string(), 0)];

    let binding = SceneBinder::new(&graph).bind().unwrap();

    assert_eq!(binding.batches.len(), 1);
    assert_eq!(
        binding.skipped[0].reason,
        PrimitiveError::Binding(BindingError::MissingPosition)
    );
}

#[test]
fn byte_indices_are_not_drawable() {
    let mut graph = two_node_scene();
    graph.accessors[1].component_type = ComponentType::U8;

    let binding = SceneBinder::new(&graph).bind().unwrap();

    assert_eq!(binding.batches.len(), 1);
    assert_eq!(
        binding.skipped[0].reason,
        PrimitiveError::Binding(BindingError::UnsupportedIndexType(ComponentType::U8))
    );
}

#[test]
fn triangle_fans_are_skipped() {
    let mut graph = two_node_scene();
    graph.meshes[0].primitives[1].mode = PrimitiveMode::TriangleFan;

    let binding = SceneBinder::new(&graph).bind().unwrap();

    assert_eq!(binding.batches.len(), 1);
    assert_eq!(
        binding.skipped[0].reason,
        PrimitiveError::Binding(BindingError::UnsupportedPrimitiveMode(
            PrimitiveMode::TriangleFan
        ))
    );
}

#[test]
fn misaligned_attribute_is_skipped() {
    let mut graph = two_node_scene();
    graph.accessors[0].byte_offset = 2;
    graph.accessors[0].count = 2;

    let binding = SceneBinder::new(&graph).bind().unwrap();

    assert!(binding.batches.is_empty());
    assert_eq!(binding.skipped.len(), 2);
    assert!(matches!(
        binding.skipped[0].reason,
        PrimitiveError::Binding(BindingError::MisalignedAttribute { offset: 2, .. })
    ));
}

#[test]
fn index_accessor_on_vertex_region_is_skipped() {
    let mut graph = two_node_scene();
    graph.accessors[1].buffer_view = Some(0);

    let binding = SceneBinder::new(&graph).bind().unwrap();

    assert_eq!(binding.batches.len(), 1);
    assert_eq!(
        binding.skipped[0].reason,
        PrimitiveError::Binding(BindingError::NotIndexBuffer { region: 0 })
    );
}

#[test]
fn accessor_out_of_range_is_skipped() {
    let mut graph = two_node_scene();
    graph.meshes[0].primitives[1].attributes = positions(9);

    let binding = SceneBinder::new(&graph).bind().unwrap();

    assert_eq!(binding.batches.len(), 1);
    assert_eq!(
        binding.skipped[0].reason,
        PrimitiveError::Load(LoadError::AccessorOutOfRange {
            accessor: 9,
            count: 2
        })
    );
}

#[test]
fn material_texture_resolves_to_image() {
    let mut graph = two_node_scene();
    graph.images.push(Image {
        width: 1,
        height: 1,
        format: PixelFormat::R8G8B8A8,
        pixels: vec![255; 4],
    });
    graph.textures.push(TextureRef { source: Some(0) });
    graph.materials.push(Material {
        name: None,
        base_color_texture: Some(0),
    });
    graph.meshes[0].primitives[0].material = Some(0);

    let binding = SceneBinder::new(&graph).bind().unwrap();

    assert_eq!(binding.batches[0].image, Some(0));
    assert_eq!(binding.batches[1].image, None);
    assert!(binding.texture_errors.is_empty());
}

#[test]
fn dangling_texture_draws_untextured() {
    let mut graph = two_node_scene();
    graph.textures.push(TextureRef { source: Some(4) });
    graph.materials.push(Material {
        name: None,
        base_color_texture: Some(0),
    });
    graph.meshes[0].primitives[0].material = Some(0);

    let binding = SceneBinder::new(&graph).bind().unwrap();

    assert_eq!(binding.batches.len(), 2);
    assert_eq!(binding.batches[0].image, None);
    assert_eq!(
        binding.texture_errors,
        vec![LoadError::TextureOutOfRange { index: 4, count: 0 }]
    );
}

#[test]
fn empty_scene_binds_nothing() {
    let mut graph = two_node_scene();
    graph.scenes = vec![Scene { nodes: vec![] }];
    graph.meshes.push(Mesh::default());

    let binding = SceneBinder::new(&graph).bind().unwrap();

    assert!(binding.batches.is_empty());
    assert_eq!(binding.table.vertex, vec![0]);
    assert_eq!(binding.table.index, vec![1]);
}

#[test]
fn accessor_past_its_region_is_skipped() {
    let mut graph = two_node_scene();
    graph.accessors[1].count = 4;

    let binding = SceneBinder::new(&graph).bind().unwrap();

    assert_eq!(binding.batches.len(), 1);
    assert_eq!(
        binding.skipped[0].reason,
        PrimitiveError::Load(LoadError::AccessorOutOfBounds {
            accessor: 1,
            end: 8,
            len: 6
        })
    );
}

#[test]
fn accessor_extent_overflow_is_skipped() {
    let mut graph = two_node_scene();
    graph.accessors[1].count = usize::MAX / 2 + 2;

    let binding = SceneBinder::new(&graph).bind().unwrap();

    assert_eq!(binding.batches.len(), 1);
    assert_eq!(
        binding.skipped[0].reason,
        PrimitiveError::Load(LoadError::AccessorOutOfBounds {
            accessor: 1,
            end: usize::MAX,
            len: 6
        })
    );
}

#[test]
fn empty_accessor_must_start_inside_its_region() {
    let mut graph = two_node_scene();
    graph.accessors[1].count = 0;
    graph.accessors[1].byte_offset = 6;

    let binding = SceneBinder::new(&graph).bind().unwrap();

    assert_eq!(binding.batches.len(), 1);
    assert_eq!(
        binding.skipped[0].reason,
        PrimitiveError::Load(LoadError::AccessorOutOfBounds {
            accessor: 1,
            end: 6,
            len: 6
        })
    );
}

#[test]
fn empty_accessor_on_empty_region_is_skipped() {
    let mut graph = two_node_scene();
    graph.buffer_views[1].byte_length = 0;
    graph.accessors[1].count = 0;

    let binding = SceneBinder::new(&graph).bind().unwrap();

    assert_eq!(binding.batches.len(), 1);
    assert_eq!(
        binding.skipped[0].reason,
        PrimitiveError::Load(LoadError::AccessorOutOfBounds {
            accessor: 1,
            end: 0,
            len: 0
        })
    );
}

#[cfg(target_pointer_width = "64")]
#[test]
fn count_past_u32_is_skipped() {
    let mut graph = two_node_scene();
    graph.buffer_views[0].byte_stride = Some(0);
    let count = u32::MAX as usize + 4;
    graph.accessors[0].count = count;

    let binding = SceneBinder::new(&graph).bind().unwrap();

    assert!(binding.batches.is_empty());
    assert_eq!(binding.skipped.len(), 2);
    assert_eq!(
        binding.skipped[0].reason,
        PrimitiveError::Binding(BindingError::CountOverflow { accessor: 0, count })
    );
}

#[test]
fn missing_material_is_reported_as_material() {
    let mut graph = two_node_scene();
    graph.meshes[0].primitives[0].material = Some(5);

    let binding = SceneBinder::new(&graph).bind().unwrap();

    assert_eq!(binding.batches.len(), 2);
    assert_eq!(binding.batches[0].image, None);
    assert_eq!(
        binding.texture_errors,
        vec![LoadError::MaterialOutOfRange { index: 5, count: 0 }]
    );
}
