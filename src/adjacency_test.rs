use super::*;

/// Unit-square two-triangle mesh: verts (0,0) (1,0) (1,1) (0,1),
/// triangles {0,1,2}, {0,2,3}.
const ELEM_VERTS: [Index; 6] = [0, 1, 2, 0, 2, 3];

fn derive_edges() -> (Vec<Index>, Vec<Index>) {
    derive_entities(2, 1, 2, 3, 2, &ELEM_VERTS)
}

#[test]
fn derive_entities_dedups_shared_edge() {
    let (edge_verts, down) = derive_edges();
    assert_eq!(edge_verts.len() / 2, 5);
    assert_eq!(down, vec![0, 1, 2, 3, 4, 1]);
    assert_eq!(edge_verts, vec![1, 2, 0, 2, 0, 1, 2, 3, 0, 3]);
}

#[test]
fn upward_from_downward_matches_hand_trace() {
    let (_, down) = derive_edges();
    let up = upward_from_downward(5, 2, 3, &down);
    assert_eq!(up.offsets, vec![0, 1, 3, 4, 5, 6]);
    assert_eq!(up.adj, vec![0, 0, 1, 0, 1, 1]);
    assert_eq!(up.directions, vec![0, 1, 2, 2, 0, 1]);
}

#[test]
fn star_of_shared_edge_sees_all_four_outer_edges() {
    let (_, down) = derive_edges();
    let up = upward_from_downward(5, 2, 3, &down);
    let star = star_from_up_down(5, &up, &down, 3);
    let first = star.offsets[1] as usize;
    let end = star.offsets[2] as usize;
    let mut neighbours = star.adj[first..end].to_vec();
    neighbours.sort_unstable();
    assert_eq!(neighbours, vec![0, 2, 3, 4]);
}

fn vertex_up() -> Up {
    upward_from_downward(4, 2, 3, &ELEM_VERTS)
}

#[test]
fn dual_of_two_triangles_is_symmetric_across_shared_edge() {
    let up = vertex_up();
    let dual = dual_from_elem_verts(2, 2, &ELEM_VERTS, &up);
    assert_eq!(dual, vec![SENTINEL, 1, SENTINEL, SENTINEL, SENTINEL, 0]);
}
