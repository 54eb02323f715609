mod common;

use common::test_utils::{Lcg, region, two_node_scene};
use morph_view::{
    BindingError, LoadError,
    data_structures::scene_graph::{ARRAY_BUFFER, ELEMENT_ARRAY_BUFFER},
    resources::buffers::{BufferAllocator, Classification},
};

#[test]
fn classification_keeps_input_order() {
    let regions = vec![
        region(0, 0, 4, None),
        region(0, 4, 4, Some(ELEMENT_ARRAY_BUFFER)),
        region(0, 8, 4, Some(ARRAY_BUFFER)),
        region(0, 12, 4, Some(ELEMENT_ARRAY_BUFFER)),
        region(0, 16, 4, None),
    ];

    let table = BufferAllocator::classify(&regions);

    assert_eq!(table.vertex, vec![0, 2, 4]);
    assert_eq!(table.index, vec![1, 3]);
    assert_eq!(table.classification(0), Some(Classification::Vertex(0)));
    assert_eq!(table.classification(1), Some(Classification::Index(0)));
    assert_eq!(table.classification(2), Some(Classification::Vertex(1)));
    assert_eq!(table.classification(3), Some(Classification::Index(1)));
    assert_eq!(table.classification(4), Some(Classification::Vertex(2)));
    assert_eq!(table.classification(5), None);
    assert_eq!(table.len(), 5);
}

#[test]
fn classification_matches_reference_for_random_tags() {
    let mut rng = Lcg::new(7);
    let tags: Vec<Option<u32>> = (0..200)
        .map(|_| match rng.next_u32() % 4 {
            0 => None,
            1 => Some(ARRAY_BUFFER),
            2 => Some(ELEMENT_ARRAY_BUFFER),
            _ => Some(1000 + rng.next_u32() % 3),
        })
        .collect();
    let regions: Vec<_> = tags
        .iter()
        .enumerate()
        .map(|(i, tag)| region(0, i * 4, 4, *tag))
        .collect();

    let table = BufferAllocator::classify(&regions);
    let again = BufferAllocator::classify(&regions);
    assert_eq!(table, again);

    let (mut vertex, mut index) = (0, 0);
    for (i, tag) in tags.iter().enumerate() {
        let expected = match *tag {
            None | Some(ARRAY_BUFFER) => {
                vertex += 1;
                Classification::Vertex(vertex - 1)
            }
            Some(ELEMENT_ARRAY_BUFFER) => {
                index += 1;
                Classification::Index(index - 1)
            }
            Some(tag) => Classification::Rejected { tag },
        };
        assert_eq!(table.classification(i), Some(expected), "region {}", i);
    }
    assert_eq!(table.vertex.len(), vertex);
    assert_eq!(table.index.len(), index);
}

#[test]
fn unknown_tag_is_rejected_not_fatal() {
    let regions = vec![region(0, 0, 4, Some(1234)), region(0, 4, 4, None)];

    let table = BufferAllocator::classify(&regions);

    assert_eq!(table.classification(0), Some(Classification::Rejected { tag: 1234 }));
    assert_eq!(table.vertex, vec![1]);
    assert_eq!(
        table.vertex_slot(0, "POSITION"),
        Err(BindingError::UnrecognizedUsage {
            region: 0,
            tag: 1234
        })
    );
    assert_eq!(
        table.index_slot(0),
        Err(BindingError::UnrecognizedUsage {
            region: 0,
            tag: 1234
        })
    );
}

#[test]
fn slots_require_matching_classification() {
    let regions = vec![
        region(0, 0, 4, Some(ARRAY_BUFFER)),
        region(0, 4, 4, Some(ELEMENT_ARRAY_BUFFER)),
    ];
    let table = BufferAllocator::classify(&regions);

    assert_eq!(table.vertex_slot(0, "POSITION"), Ok(0));
    assert_eq!(table.index_slot(1), Ok(0));
    assert_eq!(
        table.vertex_slot(1, "NORMAL"),
        Err(BindingError::NotVertexBuffer {
            semantic: "NORMAL".to_string(),
            region: 1
        })
    );
    assert_eq!(table.index_slot(0), Err(BindingError::NotIndexBuffer { region: 0 }));
    assert_eq!(table.index_slot(9), Err(BindingError::NotIndexBuffer { region: 9 }));
}

#[test]
fn region_bytes_reads_the_region_range() {
    let graph = two_node_scene();

    let indices = BufferAllocator::region_bytes(&graph, 1).unwrap();

    assert_eq!(indices, &[0, 0, 1, 0, 2, 0]);
    assert_eq!(BufferAllocator::region_bytes(&graph, 0).unwrap().len(), 36);
}

#[test]
fn region_bytes_reports_bad_ranges() {
    let mut graph = two_node_scene();
    graph.buffer_views.push(region(0, 40, 8, None));
    graph.buffer_views.push(region(3, 0, 4, None));

    assert_eq!(
        BufferAllocator::region_bytes(&graph, 2),
        Err(LoadError::RegionOutOfBounds {
            region: 2,
            end: 48,
            len: 44
        })
    );
    assert_eq!(
        BufferAllocator::region_bytes(&graph, 3),
        Err(LoadError::BufferOutOfRange {
            region: 3,
            buffer: 3,
            count: 1
        })
    );
}

#[test]
fn region_end_past_usize_is_out_of_bounds() {
    let mut graph = two_node_scene();
    graph.buffer_views.push(region(0, usize::MAX - 2, 8, None));

    assert_eq!(
        BufferAllocator::region_bytes(&graph, 2),
        Err(LoadError::RegionOutOfBounds {
            region: 2,
            end: usize::MAX,
            len: 44
        })
    );
}

#[test]
fn region_bytes_reports_unknown_region() {
    let graph = two_node_scene();

    assert_eq!(
        BufferAllocator::region_bytes(&graph, 5),
        Err(LoadError::UnknownRegion { region: 5, count: 2 })
    );
}
