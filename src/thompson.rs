//! Thompson construction from [`Expr`] to an [`Automaton`].
//!
//! Every expression node compiles to a [`Fragment`], a pair of entry and exit
//! states, and fragments are glued together with sigma transitions. The
//! result is linear in the size of the expression (repeat bounds aside) and
//! generally nondeterministic.
//!
//! Lookahead nodes become a single check transition. The nested automaton is
//! not built here but requested from the caller, see [`Compiler::new`].

use std::sync::Arc;

use log::debug;

use crate::automaton::{Automaton, Condition, StateId};
use crate::error::{Error, Result};
use crate::expr::Expr;
use crate::runner::RunnerMode;

/// Entry and exit states of a compiled sub-expression.
#[derive(Debug, Clone, Copy)]
struct Fragment {
    start: StateId,
    end: StateId,
}

/// A compiler from [`Expr`] to a Thompson automaton.
pub struct Compiler<F> {
    automaton: Automaton,
    check_mode: RunnerMode,
    build_check: F,
}

impl<'e, F> Compiler<F>
where
    F: FnMut(&'e Expr) -> Result<Arc<Automaton>>,
{
    /// `build_check` is called with the body of every lookahead node and
    /// must return the automaton to run for it; check transitions record
    /// `check_mode` as the way to run it.
    pub fn new(check_mode: RunnerMode, build_check: F) -> Self {
        Self {
            automaton: Automaton::new(),
            check_mode,
            build_check,
        }
    }

    /// Compiles `expr`. The outermost entry becomes the initial state and the
    /// outermost exit the only accepting state.
    pub fn compile(mut self, expr: &'e Expr) -> Result<Automaton> {
        let fragment = self.compile_internal(expr)?;
        self.automaton.set_initial(fragment.start)?;
        self.automaton.set_accepting(fragment.end)?;
        debug!(
            "thompson: {} states, {} transitions",
            self.automaton.state_count(),
            self.automaton.transition_count()
        );
        Ok(self.automaton)
    }

    fn epsilon(&mut self, from: StateId, to: StateId) -> Result<()> {
        self.automaton.add_transition(from, to, Condition::Sigma)?;
        Ok(())
    }

    fn compile_internal(&mut self, expr: &'e Expr) -> Result<Fragment> {
        match expr {
            Expr::CharClass(class) => {
                let start = self.automaton.add_state();
                let end = self.automaton.add_state();
                self.automaton
                    .add_transition(start, end, Condition::Class(class.set.clone()))?;
                Ok(Fragment { start, end })
            }
            Expr::Literal(chars) => {
                let start = self.automaton.add_state();
                let mut end = start;
                for c in chars.chars() {
                    let next = self.automaton.add_state();
                    self.automaton.add_transition(end, next, Condition::Char(c))?;
                    end = next;
                }
                Ok(Fragment { start, end })
            }
            Expr::Sequence(items) => {
                let (first, rest) = items.split_first().ok_or(Error::EmptyItems("sequence"))?;
                let first = self.compile_internal(first)?;
                let mut end = first.end;
                for item in rest {
                    let fragment = self.compile_internal(item)?;
                    self.epsilon(end, fragment.start)?;
                    end = fragment.end;
                }
                Ok(Fragment {
                    start: first.start,
                    end,
                })
            }
            Expr::Alternatives(items) => {
                if items.is_empty() {
                    return Err(Error::EmptyItems("alternatives"));
                }
                let start = self.automaton.add_state();
                let end = self.automaton.add_state();
                for item in items {
                    let fragment = self.compile_internal(item)?;
                    self.epsilon(start, fragment.start)?;
                    self.epsilon(fragment.end, end)?;
                }
                Ok(Fragment { start, end })
            }
            Expr::Repeat { child, min, max } => self.compile_repeat(child, *min, *max),
            Expr::Lookahead { child, negate } => {
                let nested = (self.build_check)(&**child)?;
                let start = self.automaton.add_state();
                let end = self.automaton.add_state();
                self.automaton.add_transition(
                    start,
                    end,
                    Condition::check(nested, self.check_mode, *negate),
                )?;
                Ok(Fragment { start, end })
            }
        }
    }

    /// Mandatory copies are chained, then either a loop on the last copy or a
    /// ladder of optional copies that may each skip to the exit. Edges are
    /// added so that taking one more copy is tried before skipping.
    fn compile_repeat(&mut self, child: &'e Expr, min: u32, max: Option<u32>) -> Result<Fragment> {
        if max == Some(0) || max.is_some_and(|max| min > max) {
            return Err(Error::InvalidRepeatBound { min, max });
        }

        let start = self.automaton.add_state();
        let mut tail = start;
        let mut last = None;
        for _ in 0..min {
            let fragment = self.compile_internal(child)?;
            self.epsilon(tail, fragment.start)?;
            tail = fragment.end;
            last = Some(fragment);
        }

        let end = self.automaton.add_state();
        match max {
            None => {
                let body = match last {
                    Some(body) => body,
                    None => {
                        let body = self.compile_internal(child)?;
                        self.epsilon(tail, body.start)?;
                        self.epsilon(tail, end)?;
                        body
                    }
                };
                self.epsilon(body.end, body.start)?;
                self.epsilon(body.end, end)?;
            }
            Some(max) => {
                for _ in min..max {
                    let fragment = self.compile_internal(child)?;
                    self.epsilon(tail, fragment.start)?;
                    self.epsilon(tail, end)?;
                    tail = fragment.end;
                }
                self.epsilon(tail, end)?;
            }
        }
        Ok(Fragment { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::make_runner;

    fn nested(expr: &Expr) -> Result<Arc<Automaton>> {
        Compiler::new(RunnerMode::Nfa, nested).compile(expr).map(Arc::new)
    }

    fn build(expr: &Expr) -> Result<Automaton> {
        Compiler::new(RunnerMode::Nfa, nested).compile(expr)
    }

    fn check(expr: &Expr, cases: &[(&str, bool)]) {
        let fsm = build(expr).unwrap();
        let runner = make_runner(&fsm, RunnerMode::Nfa);
        for (text, expected) in cases {
            assert_eq!(runner.is_match(text), *expected, "{expr} on {text:?}");
        }
    }

    #[test]
    fn literal_is_a_chain() {
        let fsm = build(&Expr::literal("abc")).unwrap();
        assert_eq!(fsm.state_count(), 4);
        assert_eq!(fsm.transition_count(), 3);
        assert!(!fsm.has_sigma());
        assert!(fsm.transitions().all(|t| matches!(t.condition(), Condition::Char(_))));
    }

    #[test]
    fn empty_literal_accepts_empty_string() {
        check(&Expr::literal(""), &[("", true), ("a", false)]);
    }

    #[test]
    fn alternatives_and_sequence() {
        let expr = Expr::sequence([
            Expr::alternatives([Expr::literal("ab"), Expr::digit()]),
            Expr::literal("!"),
        ]);
        check(&expr, &[("ab!", true), ("7!", true), ("ab", false), ("a!", false)]);
    }

    #[test]
    fn bounded_repeat() {
        let expr = Expr::repeat(Expr::literal("a"), 2, Some(3));
        check(
            &expr,
            &[("a", false), ("aa", true), ("aaa", true), ("aaaa", false)],
        );
        let expr = Expr::repeat(Expr::literal("ab"), 0, Some(2));
        check(&expr, &[("", true), ("ab", true), ("abab", true), ("ababab", false)]);
    }

    #[test]
    fn unbounded_repeat() {
        let expr = Expr::repeat(Expr::literal("ab"), 2, None);
        check(&expr, &[("ab", false), ("abab", true), ("ababab", true), ("ababa", false)]);
        check(&Expr::star(Expr::digit()), &[("", true), ("123", true), ("12a", false)]);
    }

    #[test]
    fn nullable_loop_body() {
        let expr = Expr::star(Expr::optional(Expr::literal("a")));
        check(&expr, &[("", true), ("aaa", true), ("b", false)]);
    }

    #[test]
    fn lookahead_is_one_check_edge() {
        let expr = Expr::sequence([Expr::check_not(Expr::literal("x")), Expr::any_char()]);
        let fsm = build(&expr).unwrap();
        let checks = fsm
            .transitions()
            .filter(|t| matches!(t.condition(), Condition::Check { negate: true, .. }))
            .count();
        assert_eq!(checks, 1);
        check(&expr, &[("y", true), ("x", false)]);
    }

    #[test]
    fn rejects_invalid_repeat_bounds() {
        for (min, max) in [(0, Some(0)), (3, Some(2))] {
            let expr = Expr::repeat(Expr::literal("a"), min, max);
            assert!(matches!(
                build(&expr),
                Err(Error::InvalidRepeatBound { min: m, max: n }) if m == min && n == max
            ));
        }
    }

    #[test]
    fn rejects_empty_items() {
        assert!(matches!(
            build(&Expr::sequence(Vec::new())),
            Err(Error::EmptyItems("sequence"))
        ));
        assert!(matches!(
            build(&Expr::alternatives(Vec::new())),
            Err(Error::EmptyItems("alternatives"))
        ));
    }
}
