use super::*;

#[test]
fn path_graph_picks_alternating_lower_indices() {
    // 0-1-2-3 path, uniform goodness: deterministic tie-break selects
    // the lower-indexed vertex at each conflict.
    let offsets = vec![0, 1, 3, 5, 6];
    let adj = vec![1, 0, 2, 1, 3, 2];
    let filter = vec![1u8; 4];
    let goodness = vec![1.0; 4];
    let result = select(4, &offsets, &adj, &filter, &goodness);
    assert_eq!(result, vec![1, 0, 1, 0]);
}

#[test]
fn filtered_out_vertex_is_never_selected() {
    // single edge 0-1, vertex 1 filtered out.
    let offsets = vec![0, 1, 2];
    let adj = vec![1, 0];
    let filter = vec![1u8, 0];
    let goodness = vec![1.0, 5.0];
    let result = select(2, &offsets, &adj, &filter, &goodness);
    assert_eq!(result, vec![1, 0]);
}

#[test]
fn higher_goodness_wins_over_index() {
    let offsets = vec![0, 1, 2];
    let adj = vec![1, 0];
    let filter = vec![1u8, 1];
    let goodness = vec![1.0, 2.0];
    let result = select(2, &offsets, &adj, &filter, &goodness);
    assert_eq!(result, vec![0, 1]);
}

#[test]
fn isolated_candidates_are_all_selected() {
    let offsets = vec![0, 0, 0, 0];
    let adj: Vec<Index> = vec![];
    let filter = vec![1u8; 3];
    let goodness = vec![0.0; 3];
    let result = select(3, &offsets, &adj, &filter, &goodness);
    assert_eq!(result, vec![1, 1, 1]);
}
