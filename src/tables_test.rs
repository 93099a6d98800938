use super::*;

#[test]
fn verts_per_ent_matches_dimension() {
    assert_eq!(verts_per_ent(1), 2);
    assert_eq!(verts_per_ent(2), 3);
    assert_eq!(verts_per_ent(3), 4);
}

#[test]
fn subs_per_ent_counts() {
    assert_eq!(subs_per_ent(2, 0), 3);
    assert_eq!(subs_per_ent(2, 1), 3);
    assert_eq!(subs_per_ent(3, 0), 4);
    assert_eq!(subs_per_ent(3, 1), 6);
    assert_eq!(subs_per_ent(3, 2), 4);
}

#[test]
fn opposite_is_facet_index() {
    for i in 0..3 {
        assert_eq!(opposite(2, i), i);
    }
}

#[test]
fn triangle_facets_exclude_opposite_vertex() {
    for i in 0..3 {
        let facet: Vec<usize> = all_subs(2, 1)[i].clone();
        assert!(!facet.contains(&i));
        assert_eq!(facet.len(), 2);
    }
}

#[test]
fn tet_edges_are_lexicographic_pairs() {
    let edges = all_subs(3, 1);
    assert_eq!(edges.len(), 6);
    assert_eq!(edges[0], vec![0, 1]);
    assert_eq!(edges[5], vec![2, 3]);
}

#[test]
fn tet_facets_exclude_opposite_vertex() {
    for i in 0..4 {
        let facet = &all_subs(3, 2)[i];
        assert!(!facet.contains(&i));
        assert_eq!(facet.len(), 3);
    }
}
