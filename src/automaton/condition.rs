use std::fmt;
use std::sync::Arc;

use crate::class::CharSet;
use crate::runner::RunnerMode;

use super::Automaton;

/// What must hold for a transition to be taken.
#[derive(Debug, Clone)]
pub enum Condition {
    /// Consumes exactly this character.
    Char(char),
    /// Consumes one character of the set.
    Class(CharSet),
    /// Epsilon: consumes nothing, always taken.
    Sigma,
    /// Zero width: taken iff running `automaton` (with the runner of `mode`)
    /// from the current position finds a match, or finds none if `negate`.
    Check {
        automaton: Arc<Automaton>,
        mode: RunnerMode,
        negate: bool,
    },
}

impl Condition {
    pub fn check(automaton: Arc<Automaton>, mode: RunnerMode, negate: bool) -> Self {
        Condition::Check {
            automaton,
            mode,
            negate,
        }
    }

    /// Canonical consuming condition for a set: a `Char` when the set holds a
    /// single character.
    pub fn from_set(set: CharSet) -> Self {
        match set.as_single() {
            Some(c) => Condition::Char(c),
            None => Condition::Class(set),
        }
    }

    pub fn is_sigma(&self) -> bool {
        matches!(self, Condition::Sigma)
    }

    /// Whether taking the transition consumes a character.
    pub fn is_consuming(&self) -> bool {
        matches!(self, Condition::Char(_) | Condition::Class(_))
    }

    /// The characters accepted by a consuming condition.
    pub fn char_set(&self) -> Option<CharSet> {
        match self {
            Condition::Char(c) => Some(CharSet::single(*c)),
            Condition::Class(set) => Some(set.clone()),
            _ => None,
        }
    }
}

/// Same kind and same character, set, or nested automaton identity.
impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Condition::Char(a), Condition::Char(b)) => a == b,
            (Condition::Class(a), Condition::Class(b)) => a == b,
            (Condition::Sigma, Condition::Sigma) => true,
            (
                Condition::Check {
                    automaton: a,
                    mode: mode_a,
                    negate: negate_a,
                },
                Condition::Check {
                    automaton: b,
                    mode: mode_b,
                    negate: negate_b,
                },
            ) => Arc::ptr_eq(a, b) && mode_a == mode_b && negate_a == negate_b,
            _ => false,
        }
    }
}

impl Eq for Condition {}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Char(c) => write!(f, "{c:?}"),
            Condition::Class(set) => write!(f, "{set}"),
            Condition::Sigma => f.write_str("ε"),
            Condition::Check {
                automaton, negate, ..
            } => {
                let op = if *negate { "!" } else { "&" };
                write!(
                    f,
                    "{op}<{} states>",
                    automaton.state_count()
                )
            }
        }
    }
}
