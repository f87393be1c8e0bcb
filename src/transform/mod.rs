//! Automaton transforms.
//!
//! Every transform reads an automaton and builds a fresh one; the input is
//! never mutated. All of them require an initial state.

mod epsilon;
mod minimize;
mod subset;

pub use epsilon::remove_epsilon;
pub use minimize::minimize;
pub use subset::determinize;

use std::collections::HashSet;

use crate::automaton::{Automaton, StateId};

/// States reachable from `state` through sigma transitions only, `state`
/// included, in depth-first pre-order.
pub(crate) fn epsilon_closure(automaton: &Automaton, state: StateId) -> Vec<StateId> {
    let mut seen = HashSet::new();
    let mut order = Vec::new();
    let mut pending = vec![state];
    while let Some(current) = pending.pop() {
        if !seen.insert(current) {
            continue;
        }
        order.push(current);
        let targets: Vec<StateId> = automaton
            .outgoing(current)
            .filter(|t| t.condition().is_sigma())
            .map(|t| t.to())
            .collect();
        // Reversed so the first transition is explored first.
        pending.extend(targets.into_iter().rev());
    }
    order
}
