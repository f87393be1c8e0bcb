//! A backtracking runner for possibly nondeterministic automata.

use std::collections::HashSet;

use log::trace;

use super::{RunnerImpl, match_edge};
use crate::automaton::{Automaton, StateId, TransitionId};
use crate::error::Result;
use crate::transform::epsilon_closure;
use crate::util::Input;

/// Walks the automaton depth first, trying the transitions of each state in
/// enumeration order and falling back to the most recent checkpoint when no
/// transition matches.
///
/// Sigma transitions are followed through epsilon closures, so the runner
/// works on raw Thompson automata as well as on epsilon-free ones.
pub struct NfaRunner<'a> {
    automaton: &'a Automaton,
}

/// Epsilon closure of a state, as seen by the runner.
struct Closure {
    accepting: bool,
    /// Non-sigma transitions leaving the closure, in enumeration order.
    edges: Vec<TransitionId>,
}

/// A backtracking point. `next` is the index of the next edge to retry, so a
/// checkpoint is retried at most once per transition of its closure.
#[derive(Debug)]
struct Checkpoint {
    state: StateId,
    pos: usize,
    next: usize,
}

struct Search {
    closures: Vec<Option<Closure>>,
    /// Every `(state, position)` configuration is entered at most once.
    visited: HashSet<(usize, usize)>,
    stack: Vec<Checkpoint>,
    best: Option<usize>,
}

impl<'a> NfaRunner<'a> {
    pub fn new(automaton: &'a Automaton) -> Self {
        Self { automaton }
    }

    fn closure(&self, state: StateId) -> Closure {
        let members = epsilon_closure(self.automaton, state);
        Closure {
            accepting: members.iter().any(|s| self.automaton.is_accepting(*s)),
            edges: members
                .iter()
                .flat_map(|s| self.automaton.outgoing(*s))
                .filter(|t| !t.condition().is_sigma())
                .map(|t| t.id())
                .collect(),
        }
    }

    /// Enters a configuration. Returns true when the search can stop.
    ///
    /// With `first_match`, configurations at or past the best accepting
    /// position found so far cannot improve it and are skipped.
    fn enter(&self, search: &mut Search, input: &Input<'_>, state: StateId, pos: usize) -> bool {
        if input.first_match && search.best.is_some_and(|best| pos >= best) {
            return false;
        }
        if !search.visited.insert((state.index(), pos)) {
            return false;
        }
        let closure = search.closures[state.index()].get_or_insert_with(|| self.closure(state));
        if closure.accepting {
            if input.first_match {
                search.best = Some(pos);
                return pos == input.span.from;
            }
            if search.best.is_none_or(|best| pos > best) {
                search.best = Some(pos);
            }
            if pos == input.span.to {
                return true;
            }
        }
        search.stack.push(Checkpoint { state, pos, next: 0 });
        false
    }
}

impl RunnerImpl for NfaRunner<'_> {
    fn exec(&self, input: &Input<'_>) -> Result<Option<usize>> {
        let initial = self.automaton.require_initial()?;
        let mut search = Search {
            closures: (0..self.automaton.slot_count()).map(|_| None).collect(),
            visited: HashSet::new(),
            stack: Vec::new(),
            best: None,
        };

        if self.enter(&mut search, input, initial, input.span.from) {
            return Ok(search.best);
        }

        while let Some(top) = search.stack.last_mut() {
            if input.first_match && search.best.is_some_and(|best| top.pos >= best) {
                search.stack.pop();
                continue;
            }
            let edge = search.closures[top.state.index()]
                .as_ref()
                .and_then(|c| c.edges.get(top.next).copied());
            let (pos, edge) = match edge {
                Some(edge) => {
                    top.next += 1;
                    (top.pos, edge)
                }
                None => {
                    trace!("nfa: backtracking from {} at {}", top.state, top.pos);
                    search.stack.pop();
                    continue;
                }
            };

            let Some(transition) = self.automaton.transition(edge) else {
                continue;
            };
            if let Some(step) = match_edge(transition.condition(), input, pos)? {
                if self.enter(&mut search, input, transition.to(), pos + step) {
                    return Ok(search.best);
                }
            }
        }

        Ok(search.best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Condition;

    /// `a*` with an extra zero-width loop: 0 -ε-> 1 -ε-> 0, 0 -a-> 0, 1 accepting.
    fn epsilon_cycle() -> Automaton {
        let mut fsm = Automaton::new();
        let s0 = fsm.add_state();
        let s1 = fsm.add_state();
        fsm.add_transition(s0, s1, Condition::Sigma).unwrap();
        fsm.add_transition(s1, s0, Condition::Sigma).unwrap();
        fsm.add_transition(s0, s0, Condition::Char('a')).unwrap();
        fsm.set_initial(s0).unwrap();
        fsm.set_accepting(s1).unwrap();
        fsm
    }

    #[test]
    fn terminates_on_epsilon_cycles() {
        let fsm = epsilon_cycle();
        let runner = NfaRunner::new(&fsm);
        assert_eq!(runner.exec(&Input::new("aaa")).unwrap(), Some(3));
        assert_eq!(runner.exec(&Input::new("aab")).unwrap(), Some(2));
        assert_eq!(runner.exec(&Input::new("")).unwrap(), Some(0));
    }

    #[test]
    fn backtracks_into_later_branches() {
        // 0 -a-> 1 -b-> 3, 0 -a-> 2 -c-> 3
        let mut fsm = Automaton::new();
        let s: Vec<_> = (0..4).map(|_| fsm.add_state()).collect();
        fsm.add_transition(s[0], s[1], Condition::Char('a')).unwrap();
        fsm.add_transition(s[0], s[2], Condition::Char('a')).unwrap();
        fsm.add_transition(s[1], s[3], Condition::Char('b')).unwrap();
        fsm.add_transition(s[2], s[3], Condition::Char('c')).unwrap();
        fsm.set_initial(s[0]).unwrap();
        fsm.set_accepting(s[3]).unwrap();

        let runner = NfaRunner::new(&fsm);
        assert_eq!(runner.exec(&Input::new("ac")).unwrap(), Some(2));
        assert_eq!(runner.exec(&Input::new("ab")).unwrap(), Some(2));
        assert_eq!(runner.exec(&Input::new("ad")).unwrap(), None);
    }

    #[test]
    fn first_match_stops_early() {
        let fsm = epsilon_cycle();
        let runner = NfaRunner::new(&fsm);
        let input = Input::new("aaa").first_match(true);
        assert_eq!(runner.exec(&input).unwrap(), Some(0));
    }

    #[test]
    fn first_match_is_the_earliest() {
        // ab|a with the longer branch enumerated first: 0 -a-> 1 -b-> 2, 0 -a-> 3
        let mut fsm = Automaton::new();
        let s: Vec<_> = (0..4).map(|_| fsm.add_state()).collect();
        fsm.add_transition(s[0], s[1], Condition::Char('a')).unwrap();
        fsm.add_transition(s[1], s[2], Condition::Char('b')).unwrap();
        fsm.add_transition(s[0], s[3], Condition::Char('a')).unwrap();
        fsm.set_initial(s[0]).unwrap();
        fsm.set_accepting(s[2]).unwrap();
        fsm.set_accepting(s[3]).unwrap();

        let runner = NfaRunner::new(&fsm);
        assert_eq!(runner.exec(&Input::new("ab").first_match(true)).unwrap(), Some(1));
        assert_eq!(runner.exec(&Input::new("ab")).unwrap(), Some(2));
    }
}
