//! Maximum independent set selection by fixed-point relaxation, ported
//! from the original core's `at_vert` round function: every candidate
//! starts `UNKNOWN` and settles to `IN_SET`/`NOT_IN_SET` by comparing
//! goodness with not-yet-excluded neighbours, breaking ties on vertex
//! index.

use crate::error::{fatal, Invariant};
use crate::ints::Index;

const MAX_ROUNDS: u32 = 100;

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Unknown,
    NotInSet,
    InSet,
}

/// Select a maximal, goodness-locally-optimal independent set on the
/// CSR graph `(offsets, adj)` over `n` vertices.
///
/// `filter[v] == 0` excludes `v` from the outset (it is never in the
/// result and is not considered a blocking neighbour). Among
/// candidates, a vertex joins the set only once every neighbour either
/// yields on goodness (lower score, or equal score and higher index)
/// or has already left the running. Returns a `0/1` marker vector.
pub fn select(n: usize, offsets: &[Index], adj: &[Index], filter: &[u8], goodness: &[f64]) -> Vec<u8> {
    let mut state: Vec<State> = (0..n)
        .map(|v| {
            if filter[v] == 0 {
                State::NotInSet
            } else {
                State::Unknown
            }
        })
        .collect();

    for _round in 0..MAX_ROUNDS {
        if !state.iter().any(|s| *s == State::Unknown) {
            break;
        }
        let mut next = state.clone();
        for v in 0..n {
            if state[v] != State::Unknown {
                continue;
            }
            let first = offsets[v] as usize;
            let end = offsets[v + 1] as usize;
            let neighbours = &adj[first..end];

            if neighbours.iter().any(|&u| state[u as usize] == State::InSet) {
                next[v] = State::NotInSet;
                continue;
            }
            let beaten_by_all_live_neighbours = neighbours.iter().all(|&u| {
                let u = u as usize;
                if state[u] == State::NotInSet {
                    return true;
                }
                goodness[v] > goodness[u] || (goodness[v] == goodness[u] && v < u)
            });
            if beaten_by_all_live_neighbours {
                next[v] = State::InSet;
            }
        }
        state = next;
    }

    if state.iter().any(|s| *s == State::Unknown) {
        fatal(Invariant::IndependentSetDidNotConverge);
    }

    state
        .iter()
        .map(|s| (*s == State::InSet) as u8)
        .collect()
}

#[cfg(test)]
#[path = "indset_test.rs"]
mod indset_test;
