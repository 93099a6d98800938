//! The per-element shape quality functional and the classification
//! predicates that protect geometric features during mesh modification.

/// A dimensionless, scale/rotation/translation-invariant shape measure
/// in `[0, 1]`, equal to 1 for a regular simplex.
///
/// `coords` holds `d + 1` vertex positions (always 3-wide, per the
/// `coordinates` tag's fixed width, with unused trailing components
/// zero for lower-dimensional meshes). Edges have no shape to degrade
/// and always report perfect quality; triangles use an area mean-ratio,
/// tetrahedra a volume mean-ratio — both normalised so a regular
/// simplex evaluates to exactly 1.
pub fn quality(d: usize, coords: &[[f64; 3]]) -> f64 {
    match d {
        1 => 1.0,
        2 => triangle_quality(coords),
        3 => tet_quality(coords),
        _ => panic!("quality: unsupported dimension {d}"),
    }
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm_sq(a: [f64; 3]) -> f64 {
    dot(a, a)
}

fn triangle_quality(coords: &[[f64; 3]]) -> f64 {
    let (p0, p1, p2) = (coords[0], coords[1], coords[2]);
    let e1 = sub(p1, p0);
    let e2 = sub(p2, p0);
    let area = 0.5 * norm_sq(cross(e1, e2)).sqrt();
    let sum_sq = norm_sq(sub(p1, p0)) + norm_sq(sub(p2, p1)) + norm_sq(sub(p0, p2));
    if sum_sq <= 0.0 {
        return 0.0;
    }
    (4.0 * 3f64.sqrt() * area / sum_sq).clamp(0.0, 1.0)
}

fn tet_quality(coords: &[[f64; 3]]) -> f64 {
    let (p0, p1, p2, p3) = (coords[0], coords[1], coords[2], coords[3]);
    let volume = dot(sub(p1, p0), cross(sub(p2, p0), sub(p3, p0))).abs() / 6.0;
    let edges = [
        sub(p1, p0),
        sub(p2, p0),
        sub(p3, p0),
        sub(p2, p1),
        sub(p3, p1),
        sub(p3, p2),
    ];
    let sum_sq: f64 = edges.iter().map(|&e| norm_sq(e)).sum();
    if sum_sq <= 0.0 {
        return 0.0;
    }
    (12.0 * (3.0 * volume).powf(2.0 / 3.0) / sum_sq).clamp(0.0, 1.0)
}

/// Is a collapse of the classified vertex `v` (dim `class_dim_v`, id
/// `class_id_v`) onto `u` admissible? Every model entity `v` sits on
/// must also be occupied by `u`: `u`'s dimension must not exceed `v`'s,
/// and when equal, the ids must match.
pub fn collapse_preserves_classification(
    class_dim_u: u32,
    class_id_u: u32,
    class_dim_v: u32,
    class_id_v: u32,
) -> bool {
    class_dim_u < class_dim_v || (class_dim_u == class_dim_v && class_id_u == class_id_v)
}

/// The inherited `(class_dim, class_id)` of a split-generated vertex:
/// the minimum `class_dim` over the source entity's vertices, ties
/// broken by lowest vertex index (the order `verts` is given in).
pub fn inherit_classification(verts: &[(u32, u32, u32)]) -> (u32, u32) {
    // Each entry is (vertex_index, class_dim, class_id); assumed already
    // sorted by vertex_index ascending so the first minimum wins ties.
    let best = verts
        .iter()
        .min_by_key(|&&(idx, dim, _)| (dim, idx))
        .expect("inherit_classification: source entity has no vertices");
    (best.1, best.2)
}

#[cfg(test)]
#[path = "quality_test.rs"]
mod quality_test;
