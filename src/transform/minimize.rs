//! State minimization by partition refinement.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use log::debug;

use crate::automaton::{Automaton, Condition, StateId};
use crate::class::CharSet;
use crate::error::Result;
use crate::runner::RunnerMode;

/// Identity of a non-consuming condition. Nested automata compare by address.
#[derive(Debug, PartialEq, Eq, Hash)]
enum EdgeKey {
    Sigma,
    Check {
        nested: usize,
        mode: RunnerMode,
        negate: bool,
    },
}

impl EdgeKey {
    fn of(condition: &Condition) -> Option<Self> {
        match condition {
            Condition::Sigma => Some(EdgeKey::Sigma),
            Condition::Check {
                automaton,
                mode,
                negate,
            } => Some(EdgeKey::Check {
                nested: Arc::as_ptr(automaton) as usize,
                mode: *mode,
                negate: *negate,
            }),
            Condition::Char(_) | Condition::Class(_) => None,
        }
    }
}

/// What a state looks like from the current partition: its own block, the
/// characters leading to each block and its other edges by identity.
#[derive(PartialEq, Eq, Hash)]
struct Signature {
    block: usize,
    consuming: Vec<(usize, CharSet)>,
    others: Vec<(usize, usize)>,
}

/// Merges equivalent states of a deterministic automaton.
///
/// Starts from the accepting / non-accepting split and refines it until no
/// block contains two states with different signatures. The result has one
/// state per block.
pub fn minimize(automaton: &Automaton) -> Result<Automaton> {
    let initial = automaton.require_initial()?;
    let states: Vec<StateId> = automaton.states().map(|s| s.id()).collect();

    let mut keys: HashMap<EdgeKey, usize> = HashMap::new();
    for transition in automaton.transitions() {
        if let Some(key) = EdgeKey::of(transition.condition()) {
            let next = keys.len();
            keys.entry(key).or_insert(next);
        }
    }

    let mut block = vec![0; automaton.slot_count()];
    let mut acceptance: HashMap<bool, usize> = HashMap::new();
    for &state in &states {
        let next = acceptance.len();
        block[state.index()] = *acceptance.entry(automaton.is_accepting(state)).or_insert(next);
    }

    // Blocks end up numbered by first appearance in `states`.
    let mut count = acceptance.len();
    let mut rounds = 0;
    loop {
        rounds += 1;
        let mut signatures: HashMap<Signature, usize> = HashMap::new();
        let mut refined = vec![0; automaton.slot_count()];
        for &state in &states {
            let next = signatures.len();
            refined[state.index()] = *signatures
                .entry(signature(automaton, state, &block, &keys))
                .or_insert(next);
        }
        block = refined;
        if signatures.len() == count {
            break;
        }
        count = signatures.len();
    }

    let mut result = Automaton::new();
    let mut block_states: Vec<StateId> = Vec::with_capacity(count);
    let mut representatives: Vec<StateId> = Vec::with_capacity(count);
    for &state in &states {
        if block[state.index()] == block_states.len() {
            block_states.push(result.add_state());
            representatives.push(state);
        }
    }

    for (&state, &from) in representatives.iter().zip(&block_states) {
        if automaton.is_accepting(state) {
            result.set_accepting(from)?;
        }
        let mut consuming: BTreeMap<usize, CharSet> = BTreeMap::new();
        for transition in automaton.outgoing(state) {
            let target = block[transition.to().index()];
            match transition.condition().char_set() {
                Some(set) => {
                    let merged = consuming.entry(target).or_default();
                    *merged = merged.union(&set);
                }
                None => {
                    result.add_transition_dedup(
                        from,
                        block_states[target],
                        transition.condition().clone(),
                    )?;
                }
            }
        }
        for (target, set) in consuming {
            result.add_transition(from, block_states[target], Condition::from_set(set))?;
        }
    }
    result.set_initial(block_states[block[initial.index()]])?;

    debug!(
        "minimize: {} -> {} states in {rounds} rounds",
        automaton.state_count(),
        result.state_count()
    );
    Ok(result)
}

fn signature(
    automaton: &Automaton,
    state: StateId,
    block: &[usize],
    keys: &HashMap<EdgeKey, usize>,
) -> Signature {
    let mut consuming: BTreeMap<usize, CharSet> = BTreeMap::new();
    let mut others = Vec::new();
    for transition in automaton.outgoing(state) {
        let target = block[transition.to().index()];
        match transition.condition().char_set() {
            Some(set) => {
                let merged = consuming.entry(target).or_default();
                *merged = merged.union(&set);
            }
            None => {
                if let Some(&key) = EdgeKey::of(transition.condition()).and_then(|k| keys.get(&k)) {
                    others.push((key, target));
                }
            }
        }
    }
    others.sort_unstable();
    others.dedup();
    Signature {
        block: block[state.index()],
        consuming: consuming.into_iter().collect(),
        others,
    }
}
