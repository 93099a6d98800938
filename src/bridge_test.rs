use super::*;

#[test]
fn bridge_graph_on_path() {
    // path 0-1-2 symmetric CSR: 0:[1] 1:[0,2] 2:[1]
    let offsets = vec![0, 1, 3, 4];
    let adj = vec![1, 0, 2, 1];
    let bg = bridge_graph(3, &offsets, &adj);
    assert_eq!(bg.verts_of_edges, vec![0, 1, 1, 2]);
}

#[test]
#[should_panic(expected = "fatal invariant violation")]
fn odd_half_edge_count_is_fatal() {
    let offsets = vec![0, 1];
    let adj = vec![0];
    bridge_graph(1, &offsets, &adj);
}
