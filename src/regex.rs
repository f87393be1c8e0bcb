//! Types and API for Regex matching
//!
//! This module defines the [`Regex`] struct, which is a nice wrapper around a
//! compiled [`Automaton`] and the [`Runner`] its [`RunnerMode`] selects.

use crate::automaton::Automaton;
use crate::error::Result;
use crate::expr::Expr;
use crate::parse::parse_with;
use crate::runner::{Runner, RunnerMode, make_runner};
use crate::util::{Input, Match};

/// A regular expression, matched anchored at the start of the input.
#[derive(Debug)]
pub struct Regex {
    automaton: Automaton,
    mode: RunnerMode,
}

impl Regex {
    /// Parses and compiles `pattern` with the default configuration.
    pub fn new(pattern: &str) -> Result<Self> {
        Builder::new(pattern).build()
    }

    /// Compiles an expression tree, which is the only way to get lookahead.
    pub fn from_expr(expr: &Expr, mode: RunnerMode) -> Result<Self> {
        Ok(Self {
            automaton: crate::compile(expr, mode)?,
            mode,
        })
    }

    /// Returns true iff the whole text matches.
    pub fn is_match(&self, text: &str) -> bool {
        self.runner().is_match(text)
    }

    /// Match the regex against a prefix of the input and returns the bounds of
    /// the longest match, or of the shortest one with `Input::first_match`.
    pub fn find<'s>(&self, input: impl Into<Input<'s>>) -> Option<Match<'s>> {
        self.runner().find(input)
    }

    pub fn try_is_match(&self, text: &str) -> Result<bool> {
        self.runner().try_is_match(text)
    }

    pub fn try_find<'s>(&self, input: impl Into<Input<'s>>) -> Result<Option<Match<'s>>> {
        self.runner().try_find(input)
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn mode(&self) -> RunnerMode {
        self.mode
    }

    fn runner(&self) -> Runner<'_> {
        make_runner(&self.automaton, self.mode)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub unicode: bool,
    pub case_insensitive: bool,
    pub mode: RunnerMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unicode: true,
            case_insensitive: false,
            mode: RunnerMode::default(),
        }
    }
}

impl From<Config> for regex_syntax::Parser {
    fn from(value: Config) -> Self {
        regex_syntax::ParserBuilder::new()
            .unicode(value.unicode)
            .case_insensitive(value.case_insensitive)
            .build()
    }
}

#[derive(Debug, Clone)]
pub struct Builder<'s> {
    pattern: &'s str,
    config: Config,
}

impl<'s> Builder<'s> {
    pub fn new(pattern: &'s str) -> Self {
        Self {
            pattern,
            config: Config::default(),
        }
    }

    pub fn unicode(mut self, value: bool) -> Self {
        self.config.unicode = value;
        self
    }

    pub fn case_insensitive(mut self, value: bool) -> Self {
        self.config.case_insensitive = value;
        self
    }

    pub fn mode(mut self, mode: RunnerMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn build(self) -> Result<Regex> {
        let mode = self.config.mode;
        let expr = parse_with(self.pattern, self.config)?;
        Regex::from_expr(&expr, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn builder_options() {
        let re = Builder::new("abc")
            .case_insensitive(true)
            .mode(RunnerMode::MinimizedDfa)
            .build()
            .unwrap();
        assert_eq!(re.mode(), RunnerMode::MinimizedDfa);
        assert!(re.is_match("aBc"));
        assert!(!re.is_match("abcd"));
        assert!(!re.automaton().has_sigma());
    }

    #[test]
    fn find_is_anchored() {
        let re = Regex::new(r"\d+").unwrap();
        assert_eq!(re.find("123abc").map(|m| m.as_str()), Some("123"));
        assert!(re.find("abc123").is_none());
        let first = re.find(Input::new("123").first_match(true)).unwrap();
        assert_eq!(first.as_str(), "1");
    }

    #[test]
    fn reports_errors() {
        assert!(matches!(Regex::new("("), Err(Error::Parse(_))));
        assert!(matches!(Regex::new("$"), Err(Error::UnsupportedSyntax(_))));
    }
}
