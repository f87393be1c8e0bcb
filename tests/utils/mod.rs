#![allow(dead_code)]

use regfsm::{Builder, Error, Expr, Input, Regex, RunnerMode};
use regex as rust_regex;

pub const MODES: [RunnerMode; 3] = [RunnerMode::Nfa, RunnerMode::Dfa, RunnerMode::MinimizedDfa];

/// Compile a given pattern in every mode. Return Some if it compiles for all
/// modes, or None if it fails to compile for all of them. Panics if an
/// inconsistency is detected.
pub fn compile_all(pattern: &str) -> Option<Vec<Regex>> {
    let mut engines = Vec::new();
    let mut must_fail = false;
    for (i, mode) in MODES.into_iter().enumerate() {
        match Builder::new(pattern).mode(mode).build() {
            Ok(re) if !must_fail => engines.push(re),
            Err(_) if i == 0 => must_fail = true,
            Err(_) if must_fail => (),
            _ => panic!("Inconsistency detected for pattern {pattern:?} in {mode:?}"),
        }
    }
    if must_fail { None } else { Some(engines) }
}

/// Reference full-match engine for a pattern.
fn anchored(pattern: &str) -> Result<rust_regex::Regex, rust_regex::Error> {
    rust_regex::Regex::new(&format!("^(?:{pattern})$"))
}

/// Match a pattern against a given input in all modes, including rust-regex,
/// and compare the result of both compilation and execution.
///
/// Only full matches can be compared directly; the longest accepted prefix is
/// checked against the longest prefix rust-regex fully matches.
pub fn check_all_engines(pattern: &str, input: &str) {
    let rust = anchored(pattern);
    let ours = compile_all(pattern);

    match (rust, ours) {
        (Ok(rust_re), Some(our_engines)) => {
            let rust_match = rust_re.is_match(input);
            let rust_prefix = input
                .char_indices()
                .map(|(i, _)| i)
                .chain(std::iter::once(input.len()))
                .filter(|&end| rust_re.is_match(&input[..end]))
                .last();
            for engine in &our_engines {
                assert_eq!(
                    engine.is_match(input),
                    rust_match,
                    "Mismatch for pattern {:?} input {:?} in {:?} (is_match)",
                    pattern,
                    input,
                    engine.mode()
                );
                assert_eq!(
                    engine.find(input).map(|m| m.end()),
                    rust_prefix,
                    "Mismatch for pattern {:?} input {:?} in {:?} (find)",
                    pattern,
                    input,
                    engine.mode()
                );
            }
        }
        (Err(_), None) => {} // All failed, that's good
        (Ok(_), None) => {
            // Look-around is the one construct we refuse on purpose.
            assert!(
                matches!(Regex::new(pattern), Err(Error::UnsupportedSyntax(_))),
                "Our engines failed to compile {pattern:?} but rust-regex succeeded"
            );
        }
        (Err(e), Some(_)) => panic!("rust-regex failed to compile but our engines succeeded: {e}"),
    }
}

/// Same as [`check_all_engines`], starting from an expression tree. The tree
/// must be free of lookahead so that its rendering is a valid rust-regex.
pub fn check_expr(expr: &Expr, input: &str) {
    assert!(!expr.contains_lookahead());
    let rust_re = anchored(&expr.to_string()).expect("rendered expression must parse");
    let expected = rust_re.is_match(input);
    for mode in MODES {
        let ours = Regex::from_expr(expr, mode).unwrap();
        assert_eq!(
            ours.is_match(input),
            expected,
            "Mismatch for expression {expr} input {input:?} in {mode:?}"
        );
    }
}

/// Compare the DFA modes with the NFA mode on an expression that may hold
/// lookahead, for full matches, longest prefixes and earliest prefixes.
pub fn check_modes_agree(expr: &Expr, input: &str) {
    let engines: Vec<Regex> = MODES
        .into_iter()
        .map(|mode| Regex::from_expr(expr, mode).unwrap())
        .collect();
    let (reference, others) = engines.split_first().unwrap();
    let expected = (
        reference.try_is_match(input).unwrap(),
        reference.try_find(input).unwrap().map(|m| m.end()),
        reference
            .try_find(Input::new(input).first_match(true))
            .unwrap()
            .map(|m| m.end()),
    );
    for engine in others {
        let ours = (
            engine.try_is_match(input).unwrap(),
            engine.try_find(input).unwrap().map(|m| m.end()),
            engine
                .try_find(Input::new(input).first_match(true))
                .unwrap()
                .map(|m| m.end()),
        );
        assert_eq!(
            ours,
            expected,
            "Mismatch for expression {} input {:?} in {:?}",
            expr,
            input,
            engine.mode()
        );
    }
}
