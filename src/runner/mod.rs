//! Matching runners.
//!
//! Both runners share [`match_edge`], which is also where lookahead is
//! evaluated: a check transition runs its nested automaton from the current
//! position with the runner its [`RunnerMode`] selects.

mod dfa;
mod nfa;

use log::trace;

pub use dfa::DfaRunner;
pub use nfa::NfaRunner;

use crate::automaton::{Automaton, Condition};
use crate::error::{Error, Result};
use crate::util::{Input, Match};

/// Selects the transform pipeline applied by [`crate::compile`] and the runner
/// built by [`make_runner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunnerMode {
    /// Raw Thompson automaton, matched by backtracking.
    #[default]
    Nfa,
    /// Epsilon elimination and subset construction.
    Dfa,
    /// Like `Dfa`, followed by minimization.
    MinimizedDfa,
}

pub fn make_runner(automaton: &Automaton, mode: RunnerMode) -> Runner<'_> {
    let engine = match mode {
        RunnerMode::Nfa => RunnerEngine::Nfa(NfaRunner::new(automaton)),
        RunnerMode::Dfa | RunnerMode::MinimizedDfa => RunnerEngine::Dfa(DfaRunner::new(automaton)),
    };
    Runner { engine }
}

/// A runner over a borrowed automaton.
pub struct Runner<'a> {
    engine: RunnerEngine<'a>,
}

/// A runner implementation. Used to dispatch to the right version at runtime.
pub(crate) enum RunnerEngine<'a> {
    Nfa(NfaRunner<'a>),
    Dfa(DfaRunner<'a>),
}

impl<'a> Runner<'a> {
    /// Returns true iff the whole subject is accepted.
    ///
    /// # Panics
    ///
    /// On contract violations, see [`Runner::try_is_match`].
    pub fn is_match(&self, text: &str) -> bool {
        match self.try_is_match(text) {
            Ok(found) => found,
            Err(e) => panic!("{e}"),
        }
    }

    /// Anchored prefix match: the longest accepted prefix of the span, or the
    /// shortest one when `input.first_match` is set.
    ///
    /// # Panics
    ///
    /// On contract violations, see [`Runner::try_find`].
    pub fn find<'s>(&self, input: impl Into<Input<'s>>) -> Option<Match<'s>> {
        match self.try_find(input) {
            Ok(found) => found,
            Err(e) => panic!("{e}"),
        }
    }

    /// Fails when the automaton has no initial state, when a sigma transition
    /// reaches edge matching, or when the DFA runner meets nondeterminism.
    pub fn try_is_match(&self, text: &str) -> Result<bool> {
        let found = self.try_find(text)?;
        Ok(found.is_some_and(|m| m.end() == text.len()))
    }

    pub fn try_find<'s>(&self, input: impl Into<Input<'s>>) -> Result<Option<Match<'s>>> {
        let input = input.into();
        if !input.valid() {
            return Ok(None);
        }
        let end = match &self.engine {
            RunnerEngine::Nfa(nfa) => nfa.exec(&input)?,
            RunnerEngine::Dfa(dfa) => dfa.exec(&input)?,
        };
        Ok(end.map(|end| Match::new(input.subject, input.span.from..end)))
    }
}

/// The Runner impl trait
///
/// Defines the lower-level api implemented by both runners. Like the
/// [`Runner`] wrapper uses static dispatch, this is there to make sure
/// both runners maintain the same API.
pub(crate) trait RunnerImpl {
    /// Runs from `input.span.from` and returns the end of the accepted prefix,
    /// following the policy selected by `input.first_match`.
    fn exec(&self, input: &Input<'_>) -> Result<Option<usize>>;
}

/// Decides whether an edge can be taken at byte offset `pos`.
///
/// Returns the number of consumed bytes: the width of the character for
/// consuming conditions, zero for checks. `None` means the edge doesn't match.
pub(crate) fn match_edge(condition: &Condition, input: &Input<'_>, pos: usize) -> Result<Option<usize>> {
    match condition {
        Condition::Char(expected) => Ok(input
            .char_at(pos)
            .filter(|c| c == expected)
            .map(char::len_utf8)),
        Condition::Class(set) => Ok(input
            .char_at(pos)
            .filter(|c| set.contains(*c))
            .map(char::len_utf8)),
        Condition::Check {
            automaton,
            mode,
            negate,
        } => {
            let nested = Input::new(input.subject)
                .span(pos..input.span.to)
                .first_match(true);
            let found = make_runner(automaton, *mode).try_find(nested)?.is_some();
            trace!("lookahead at {pos}: nested match {found}, negate {negate}");
            Ok((found != *negate).then_some(0))
        }
        Condition::Sigma => Err(Error::UnsupportedTransition),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::class::CharSet;

    fn literal_fsm(text: &str) -> Automaton {
        let mut fsm = Automaton::new();
        let mut last = fsm.add_state();
        fsm.set_initial(last).unwrap();
        for c in text.chars() {
            let next = fsm.add_state();
            fsm.add_transition(last, next, Condition::Char(c)).unwrap();
            last = next;
        }
        fsm.set_accepting(last).unwrap();
        fsm
    }

    #[test]
    fn consuming_edges() {
        let input = Input::new("é1");
        assert_eq!(match_edge(&Condition::Char('é'), &input, 0).unwrap(), Some(2));
        assert_eq!(match_edge(&Condition::Char('e'), &input, 0).unwrap(), None);
        let digit = Condition::Class(CharSet::digit());
        assert_eq!(match_edge(&digit, &input, 2).unwrap(), Some(1));
        assert_eq!(match_edge(&digit, &input, 3).unwrap(), None);
    }

    #[test]
    fn check_edges_are_zero_width() {
        let nested = Arc::new(literal_fsm("foo"));
        let input = Input::new("xfoo");
        let check = Condition::check(nested.clone(), RunnerMode::Nfa, false);
        let check_not = Condition::check(nested, RunnerMode::Nfa, true);
        assert_eq!(match_edge(&check, &input, 1).unwrap(), Some(0));
        assert_eq!(match_edge(&check, &input, 0).unwrap(), None);
        assert_eq!(match_edge(&check_not, &input, 0).unwrap(), Some(0));
        // Checks are evaluated at the end of input too.
        assert_eq!(match_edge(&check_not, &input, 4).unwrap(), Some(0));
    }

    #[test]
    fn sigma_is_rejected() {
        let input = Input::new("a");
        assert!(matches!(
            match_edge(&Condition::Sigma, &input, 0),
            Err(Error::UnsupportedTransition)
        ));
    }

    #[test]
    fn full_and_prefix_matching() {
        let fsm = literal_fsm("ab");
        for mode in [RunnerMode::Nfa, RunnerMode::Dfa] {
            let runner = make_runner(&fsm, mode);
            assert!(runner.is_match("ab"));
            assert!(!runner.is_match("abc"));
            assert!(!runner.is_match("a"));
            assert_eq!(runner.find("abc").map(|m| m.end()), Some(2));
            assert!(runner.find("xab").is_none());
        }
    }

    #[test]
    fn missing_initial_state() {
        let fsm = Automaton::new();
        assert!(matches!(
            make_runner(&fsm, RunnerMode::Dfa).try_is_match("a"),
            Err(Error::MissingInitialState)
        ));
    }
}
