use super::*;
use crate::mesh::Mesh;

fn line_mesh(x: &[f64]) -> Mesh {
    let n = x.len();
    let mut m = Mesh::new(1);
    m.set_ents(0, n, vec![]).unwrap();
    let mut elem_verts = Vec::new();
    for i in 0..n - 1 {
        elem_verts.push(i as Index);
        elem_verts.push((i + 1) as Index);
    }
    m.set_ents(1, n - 1, elem_verts).unwrap();
    let coords: Vec<f64> = x.iter().flat_map(|&xi| [xi, 0.0, 0.0]).collect();
    m.add_tag(0, Tag::new(COORDINATES, 3, TagData::F64(coords)))
        .unwrap();
    m.add_tag(0, Tag::new(ADAPT_SIZE, 1, TagData::F64(vec![1.0; n])))
        .unwrap();
    m
}

#[test]
fn uniform_spacing_has_no_candidates() {
    let m = line_mesh(&[0.0, 1.0, 2.0, 3.0]);
    let (out, changed) = coarsen_by_size(&m, 0.5, 0.0).unwrap();
    assert!(!changed);
    assert_eq!(out.count(0).unwrap(), 4);
    assert_eq!(out.count(1).unwrap(), 3);
}

#[test]
fn short_trailing_edge_collapses() {
    // Edge (2,3) has length 0.1, well under 0.5 * adapt_size(1.0).
    let m = line_mesh(&[0.0, 1.0, 2.0, 2.1]);
    let (out, changed) = coarsen_by_size(&m, 0.5, 0.0).unwrap();
    assert!(changed);
    assert_eq!(out.count(0).unwrap(), 3);
    assert_eq!(out.count(1).unwrap(), 2);
}

#[test]
fn collapse_quality_is_vacuously_perfect_when_every_incident_element_vanishes() {
    let elem_verts = vec![0, 1];
    let coords = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0];
    let (q, old_q) = collapse_quality(1, &elem_verts, &coords, &[0], 0, 1);
    assert_eq!(q, 1.0);
    assert_eq!(old_q, 1.0);
}
