use smallvec::smallvec;

use super::*;
use crate::mesh::Mesh;
use crate::tag::COORDINATES;

fn unit_square(size: f64) -> Mesh {
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
    m.add_tag(0, Tag::new(ADAPT_SIZE, 1, TagData::F64(vec![size; 4])))
        .unwrap();
    m
}

#[test]
fn no_candidates_below_target_leaves_mesh_unchanged() {
    // target 2.0 exceeds every edge length (boundary 1.0, diagonal sqrt(2)).
    let m = unit_square(2.0);
    let (out, changed) = refine_by_size(&m, 0.0).unwrap();
    assert!(!changed);
    assert_eq!(out.count(0).unwrap(), 4);
    assert_eq!(out.count(2).unwrap(), 2);
}

#[test]
fn overlong_diagonal_is_split() {
    // target 1.0: only the diagonal (length sqrt(2)) exceeds it.
    let m = unit_square(1.0);
    let (out, changed) = refine_by_size(&m, 0.0).unwrap();
    assert!(changed);
    assert_eq!(out.count(0).unwrap(), 5);
    assert_eq!(out.count(2).unwrap(), 4);
}

#[test]
fn split_simplex_triangle_midpoint_bisects_into_two() {
    let mut edge_mid = HashMap::new();
    edge_mid.insert((0, 2), 9);
    let children = split_simplex(smallvec![0, 1, 2], &edge_mid);
    assert_eq!(children.len(), 2);
    for c in &children {
        assert_eq!(c.len(), 3);
    }
}

#[test]
fn split_simplex_with_no_selected_edge_is_unchanged() {
    let edge_mid = HashMap::new();
    let children = split_simplex(smallvec![0, 1, 2], &edge_mid);
    assert_eq!(children, vec![Row::from_slice(&[0, 1, 2])]);
}
