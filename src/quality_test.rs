use super::*;

#[test]
fn equilateral_triangle_has_unit_quality() {
    let p0 = [0.0, 0.0, 0.0];
    let p1 = [1.0, 0.0, 0.0];
    let p2 = [0.5, 3f64.sqrt() / 2.0, 0.0];
    let q = quality(2, &[p0, p1, p2]);
    assert!((q - 1.0).abs() < 1e-9, "got {q}");
}

#[test]
fn degenerate_triangle_has_zero_quality() {
    let p0 = [0.0, 0.0, 0.0];
    let p1 = [1.0, 0.0, 0.0];
    let p2 = [2.0, 0.0, 0.0];
    assert_eq!(quality(2, &[p0, p1, p2]), 0.0);
}

#[test]
fn regular_tetrahedron_has_unit_quality() {
    // Regular tet with edge length sqrt(2), vertices at alternating
    // corners of a unit cube.
    let p0 = [0.0, 0.0, 0.0];
    let p1 = [1.0, 1.0, 0.0];
    let p2 = [1.0, 0.0, 1.0];
    let p3 = [0.0, 1.0, 1.0];
    let q = quality(3, &[p0, p1, p2, p3]);
    assert!((q - 1.0).abs() < 1e-9, "got {q}");
}

#[test]
fn edge_quality_is_always_one() {
    assert_eq!(quality(1, &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]), 1.0);
}

#[test]
fn collapse_onto_higher_dim_classification_is_rejected() {
    // u on a surface (dim 2), v on a curve (dim 1): collapsing v onto
    // u would lose the curve classification.
    assert!(!collapse_preserves_classification(2, 0, 1, 0));
    assert!(collapse_preserves_classification(1, 0, 2, 0));
    assert!(collapse_preserves_classification(1, 5, 1, 5));
    assert!(!collapse_preserves_classification(1, 5, 1, 6));
}

#[test]
fn inherit_classification_picks_min_dim_then_lowest_index() {
    let verts = [(0u32, 2u32, 9u32), (1, 1, 7), (2, 1, 3)];
    assert_eq!(inherit_classification(&verts), (1, 7));
}
