//! Error type shared by every stage of the pipeline.
//!
//! All variants except [`Error::Parse`] and [`Error::UnsupportedSyntax`] are
//! contract violations: a malformed expression or an inconsistent automaton.
//! Failing to match is never an error.

use thiserror::Error;

use crate::automaton::{StateId, TransitionId};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An element of an automaton, used to report double deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    State(StateId),
    Transition(TransitionId),
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Element::State(id) => write!(f, "state {id}"),
            Element::Transition(id) => write!(f, "transition {id}"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("state {0} belongs to another automaton")]
    ForeignState(StateId),
    #[error("transition {0} belongs to another automaton")]
    ForeignTransition(TransitionId),
    #[error("state {0} is deleted")]
    DeletedState(StateId),
    #[error("state {0} is the initial state and cannot be deleted")]
    InitialStateDeletion(StateId),
    #[error("{0} is already deleted")]
    AlreadyDeleted(Element),
    #[error("automaton has no initial state")]
    MissingInitialState,
    #[error("invalid repeat bound {{{min},{}}}", .max.map_or(String::new(), |m| m.to_string()))]
    InvalidRepeatBound { min: u32, max: Option<u32> },
    #[error("{0} must hold at least one item")]
    EmptyItems(&'static str),
    #[error("sigma transitions cannot be matched, eliminate them first")]
    UnsupportedTransition,
    #[error("automaton is not deterministic: state {state} has several viable transitions at {position}")]
    NonDeterministicAutomaton { state: StateId, position: usize },
    #[error("regex parse error: {0}")]
    Parse(#[from] regex_syntax::Error),
    #[error("unsupported syntax: {0}")]
    UnsupportedSyntax(String),
}
