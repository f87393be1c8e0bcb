//! Finite automata for patterns with lookahead.
//!
//! An [`Expr`] is compiled into an [`Automaton`] by Thompson construction,
//! optionally normalized (epsilon elimination, subset construction,
//! minimization) and matched with a [`Runner`]. Lookahead is kept as a
//! nested automaton evaluated on the fly by the runner.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

pub mod automaton;
pub mod class;
pub mod error;
pub mod expr;
pub mod parse;
pub mod regex;
pub mod runner;
pub mod thompson;
pub mod transform;
pub mod util;

pub use automaton::{Automaton, Condition, StateId, TransitionId};
pub use class::CharSet;
pub use error::{Error, Result};
pub use expr::{CharClass, Expr};
pub use parse::parse;
pub use regex::{Builder, Config, Regex};
pub use runner::{Runner, RunnerMode, make_runner};
pub use util::{Input, Match, Span};

use thompson::Compiler;
use transform::{determinize, minimize, remove_epsilon};

/// Compiles an expression with the transform pipeline of `mode`:
/// nothing for [`RunnerMode::Nfa`], epsilon elimination and determinization
/// for [`RunnerMode::Dfa`], plus minimization for [`RunnerMode::MinimizedDfa`].
///
/// Lookahead bodies go through the same pipeline and are compiled once per
/// distinct body.
pub fn compile(expr: &Expr, mode: RunnerMode) -> Result<Automaton> {
    let mut cache = HashMap::new();
    compile_with_cache(expr, mode, &mut cache)
}

fn compile_with_cache<'e>(
    expr: &'e Expr,
    mode: RunnerMode,
    cache: &mut HashMap<&'e Expr, Arc<Automaton>>,
) -> Result<Automaton> {
    let nfa = Compiler::new(mode, |body: &'e Expr| {
        if let Some(nested) = cache.get(body) {
            return Ok(nested.clone());
        }
        let nested = Arc::new(compile_with_cache(body, mode, cache)?);
        cache.insert(body, nested.clone());
        Ok(nested)
    })
    .compile(expr)?;

    let automaton = match mode {
        RunnerMode::Nfa => nfa,
        RunnerMode::Dfa => determinize(&remove_epsilon(&nfa)?)?,
        RunnerMode::MinimizedDfa => minimize(&determinize(&remove_epsilon(&nfa)?)?)?,
    };
    debug!(
        "compile {expr} ({mode:?}): {} states, {} transitions",
        automaton.state_count(),
        automaton.transition_count()
    );
    Ok(automaton)
}
