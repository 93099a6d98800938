use super::*;

#[test]
fn exscan_basic() {
    assert_eq!(exscan(&[2, 0, 3]), vec![0, 2, 2, 5]);
    assert_eq!(exscan(&[]), vec![0]);
}

#[test]
fn unscan_is_exscan_inverse() {
    let b = vec![0, 2, 2, 5];
    assert_eq!(exscan(&unscan(&b)), b);
}

#[test]
fn negate_offsets_selects_zero_repeat_slots() {
    // b has repeat counts [1, 0, 2, 0] -> kept = [0,1,0,1] -> offsets [0,0,1,1,2]
    let b = vec![0, 1, 1, 3, 3];
    assert_eq!(negate_offsets(&b), vec![0, 0, 1, 1, 2]);
}

#[test]
fn max_of_empty_is_zero() {
    assert_eq!(max(&[]), 0);
}

#[test]
fn expand_repeats_rows() {
    let a = vec![10, 20, 30];
    let offsets = vec![0, 2, 2, 3];
    assert_eq!(expand(&a, 1, &offsets), vec![10, 10, 30]);
}

#[test]
fn subset_keeps_single_step_rows() {
    let a = vec![10, 20, 30];
    let offsets = vec![0, 1, 1, 2];
    assert_eq!(subset(&a, 1, &offsets), vec![10, 30]);
}

#[test]
fn expand_then_subset_is_identity_on_step_one_offsets() {
    let a = vec![1, 2, 3, 4];
    let offsets = vec![0, 1, 2, 3, 4];
    let expanded = expand(&a, 1, &offsets);
    let subsetted = subset(&expanded, 1, &offsets);
    assert_eq!(subsetted, a);
}

#[test]
fn shuffle_reorders_rows() {
    let a = vec![1, 2, 3];
    let out_of_in = vec![2, 0, 1];
    assert_eq!(shuffle(&a, 1, &out_of_in), vec![2, 3, 1]);
}
