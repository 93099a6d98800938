use super::*;

#[test]
fn add_find_remove_roundtrip() {
    let mut tags = TagSet::new();
    tags.add(0, Tag::new("coordinates", 3, TagData::F64(vec![0.0; 12])))
        .unwrap();
    assert_eq!(tags.count(), 1);
    let t = tags.find("coordinates").unwrap();
    assert_eq!(t.ncomps(), 3);
    assert_eq!(t.kind(), TagKind::F64);
    let removed = tags.remove(0, "coordinates").unwrap();
    assert_eq!(removed.name(), "coordinates");
    assert!(tags.find("coordinates").is_none());
}

#[test]
fn duplicate_name_is_rejected() {
    let mut tags = TagSet::new();
    tags.add(0, Tag::new("class_dim", 1, TagData::U32(vec![0; 4])))
        .unwrap();
    let err = tags
        .add(0, Tag::new("class_dim", 1, TagData::U32(vec![0; 4])))
        .unwrap_err();
    assert!(matches!(err, MeshError::TagAlreadyExists { .. }));
}

#[test]
fn remove_missing_tag_errors() {
    let mut tags = TagSet::new();
    let err = tags.remove(0, "nope").unwrap_err();
    assert!(matches!(err, MeshError::TagNotFound { .. }));
}
