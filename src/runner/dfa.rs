use log::trace;

use super::{RunnerImpl, match_edge};
use crate::automaton::{Automaton, StateId};
use crate::error::{Error, Result};
use crate::util::Input;

/// Follows the single matching transition out of every state.
///
/// The automaton must be free of sigma transitions, and at most one
/// transition may match at any step; both are reported as errors rather than
/// resolved.
pub struct DfaRunner<'a> {
    automaton: &'a Automaton,
}

impl<'a> DfaRunner<'a> {
    pub fn new(automaton: &'a Automaton) -> Self {
        Self { automaton }
    }
}

impl RunnerImpl for DfaRunner<'_> {
    fn exec(&self, input: &Input<'_>) -> Result<Option<usize>> {
        let mut state = self.automaton.require_initial()?;
        let mut pos = input.span.from;
        let mut best = None;
        // States visited at the current position through zero-width edges.
        let mut seen: Vec<StateId> = Vec::new();

        loop {
            if self.automaton.is_accepting(state) {
                best = Some(pos);
                if input.first_match {
                    break;
                }
            }
            seen.push(state);

            let mut taken = None;
            for transition in self.automaton.outgoing(state) {
                if let Some(step) = match_edge(transition.condition(), input, pos)? {
                    if taken.is_some() {
                        return Err(Error::NonDeterministicAutomaton {
                            state,
                            position: pos,
                        });
                    }
                    taken = Some((transition.to(), step));
                }
            }

            let Some((next, step)) = taken else {
                break;
            };
            if step == 0 {
                if seen.contains(&next) {
                    trace!("dfa: zero-width cycle through {next} at {pos}");
                    break;
                }
            } else {
                seen.clear();
            }
            state = next;
            pos += step;
        }

        Ok(best)
    }
}
