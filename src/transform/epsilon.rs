use log::debug;

use super::epsilon_closure;
use crate::automaton::{Automaton, StateId};
use crate::error::Result;

/// Builds an equivalent automaton without sigma transitions.
///
/// Only the initial state and the states entered by at least one non-sigma
/// transition survive. A survivor accepts when any state of its epsilon
/// closure accepts, and takes over every non-sigma transition leaving that
/// closure.
pub fn remove_epsilon(automaton: &Automaton) -> Result<Automaton> {
    let initial = automaton.require_initial()?;
    let mut result = Automaton::new();
    let mut mapped: Vec<Option<StateId>> = vec![None; automaton.slot_count()];

    let retained: Vec<StateId> = automaton
        .states()
        .map(|s| s.id())
        .filter(|&id| id == initial || automaton.incoming(id).any(|t| !t.condition().is_sigma()))
        .collect();
    for &state in &retained {
        mapped[state.index()] = Some(result.add_state());
    }

    for &state in &retained {
        let Some(from) = mapped[state.index()] else {
            continue;
        };
        for member in epsilon_closure(automaton, state) {
            if automaton.is_accepting(member) {
                result.set_accepting(from)?;
            }
            for transition in automaton.outgoing(member) {
                if transition.condition().is_sigma() {
                    continue;
                }
                // Targets of non-sigma transitions are always retained.
                if let Some(to) = mapped[transition.to().index()] {
                    result.add_transition_dedup(from, to, transition.condition().clone())?;
                }
            }
        }
    }

    if let Some(initial) = mapped[initial.index()] {
        result.set_initial(initial)?;
    }
    debug!(
        "remove_epsilon: {} -> {} states, {} -> {} transitions",
        automaton.state_count(),
        result.state_count(),
        automaton.transition_count(),
        result.transition_count()
    );
    Ok(result)
}
