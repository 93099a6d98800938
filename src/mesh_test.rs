use super::*;
use crate::tag::{TagData, CLASS_DIM, CLASS_ID, COORDINATES};

/// Unit square: (0,0) (1,0) (1,1) (0,1), triangles {0,1,2} {0,2,3}.
fn unit_square() -> Mesh {
    let mut m = Mesh::new(2);
    m.set_ents(0, 4, vec![]).unwrap();
    m.set_ents(2, 2, vec![0, 1, 2, 0, 2, 3]).unwrap();
    m.add_tag(
        0,
        Tag::new(
            COORDINATES,
            3,
            TagData::F64(vec![
                0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0,
            ]),
        ),
    )
    .unwrap();
    m
}

#[test]
fn counts_for_vertices_and_elements() {
    let m = unit_square();
    assert_eq!(m.count(0).unwrap(), 4);
    assert_eq!(m.count(2).unwrap(), 2);
}

#[test]
fn derived_edge_count_is_five() {
    let m = unit_square();
    assert_eq!(m.count(1).unwrap(), 5);
}

#[test]
fn down_up_round_trip() {
    let m = unit_square();
    let down = m.ask_down(2, 1).unwrap();
    let up = m.ask_up(1, 2).unwrap();
    for a in 0..m.count(1).unwrap() {
        let first = up.offsets[a] as usize;
        let end = up.offsets[a + 1] as usize;
        for idx in first..end {
            let e = up.adj[idx] as usize;
            let k = up.directions[idx] as usize;
            assert_eq!(down[e * 3 + k] as usize, a);
        }
    }
}

#[test]
fn dual_is_symmetric() {
    let m = unit_square();
    let dual = m.ask_dual().unwrap();
    for e in 0..2usize {
        for k in 0..3usize {
            let nb = dual[e * 3 + k];
            if nb == adjacency::SENTINEL {
                continue;
            }
            let back = &dual[nb as usize * 3..nb as usize * 3 + 3];
            assert!(back.contains(&(e as Index)));
        }
    }
}

#[test]
fn vertex_index_out_of_range_is_rejected() {
    let mut m = Mesh::new(2);
    m.set_ents(0, 4, vec![]).unwrap();
    let err = m.set_ents(2, 1, vec![0, 1, 9]).unwrap_err();
    assert!(matches!(err, MeshError::VertexIndexOutOfRange { .. }));
}

#[test]
fn add_tag_validates_length() {
    let m = unit_square();
    let err = m
        .add_tag(0, Tag::new(CLASS_DIM, 1, TagData::U32(vec![0; 3])))
        .unwrap_err();
    assert!(matches!(err, MeshError::TagDataLengthMismatch { .. }));
}

#[test]
fn classification_tags_round_trip() {
    let m = unit_square();
    m.add_tag(0, Tag::new(CLASS_DIM, 1, TagData::U32(vec![0, 0, 0, 0])))
        .unwrap();
    m.add_tag(0, Tag::new(CLASS_ID, 1, TagData::U32(vec![1, 2, 3, 4])))
        .unwrap();
    assert_eq!(m.count_tags(0), 3);
    assert!(m.find_tag(0, CLASS_DIM).is_some());
}
