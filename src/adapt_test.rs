use super::*;
use crate::mesh::Mesh;
use crate::tag::{Tag, TagData, COORDINATES};

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
    m.add_tag(0, Tag::new(crate::tag::ADAPT_SIZE, 1, TagData::F64(vec![size; 4])))
        .unwrap();
    m
}

#[test]
fn default_config_validates() {
    assert!(AdaptConfig::default().validate().is_ok());
}

#[test]
fn out_of_range_field_is_rejected() {
    let mut cfg = AdaptConfig::default();
    cfg.good_quality = 1.5;
    let err = cfg.validate().unwrap_err();
    assert!(matches!(err, MeshError::ConfigOutOfRange { field: "good_quality", .. }));
}

#[test]
fn already_adequate_mesh_converges_on_the_first_pass() {
    let m = unit_square(2.0);
    let cfg = AdaptConfig {
        good_quality: 0.0,
        ..AdaptConfig::default()
    };
    let (out, converged) = adapt(&m, &cfg).unwrap();
    assert!(converged);
    assert_eq!(out.count(0).unwrap(), 4);
    assert_eq!(out.count(2).unwrap(), 2);
}

#[test]
fn oversized_mesh_refines_then_converges() {
    let m = unit_square(1.0);
    let cfg = AdaptConfig {
        good_quality: 0.0,
        ..AdaptConfig::default()
    };
    let (out, converged) = adapt(&m, &cfg).unwrap();
    assert!(converged);
    assert!(out.count(0).unwrap() > 4);
}
