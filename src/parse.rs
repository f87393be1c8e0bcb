//! Textual front-end.
//!
//! Patterns are parsed with `regex-syntax` and its high-level intermediate
//! representation is lowered to an [`Expr`]. Captures are kept as plain
//! groups, laziness is ignored (matching is always leftmost-longest) and
//! look-around assertions are rejected, since `regex-syntax` knows no
//! lookahead; lookahead expressions must be built with [`Expr::check`] and
//! [`Expr::check_not`].

use regex_syntax::Parser;
use regex_syntax::hir::{Capture, Class, Hir, HirKind, Literal, Repetition};

use crate::class::CharSet;
use crate::error::{Error, Result};
use crate::expr::Expr;
use crate::regex::Config;

/// Parses `pattern` with the default [`Config`].
pub fn parse(pattern: &str) -> Result<Expr> {
    parse_with(pattern, Config::default())
}

pub fn parse_with(pattern: &str, config: Config) -> Result<Expr> {
    let mut parser: Parser = config.into();
    let hir = parser.parse(pattern)?;
    from_hir(&hir)
}

fn from_hir(hir: &Hir) -> Result<Expr> {
    match hir.kind() {
        HirKind::Empty => Ok(Expr::literal("")),
        HirKind::Literal(Literal(bytes)) => {
            let chars = std::str::from_utf8(bytes)
                .map_err(|_| Error::UnsupportedSyntax("literal is not valid UTF-8".into()))?;
            Ok(Expr::literal(chars))
        }
        HirKind::Class(Class::Unicode(class)) => Ok(Expr::class(CharSet::from_class(class))),
        HirKind::Class(Class::Bytes(class)) => {
            let mut ranges = Vec::with_capacity(class.ranges().len());
            for range in class.ranges() {
                if !range.end().is_ascii() {
                    return Err(Error::UnsupportedSyntax(format!(
                        "byte class beyond ASCII: {:?}",
                        class
                    )));
                }
                ranges.push((char::from(range.start()), char::from(range.end())));
            }
            Ok(Expr::class(CharSet::from_ranges(ranges)))
        }
        HirKind::Look(look) => Err(Error::UnsupportedSyntax(format!(
            "look-around assertion {look:?}"
        ))),
        HirKind::Repetition(Repetition { min, max, sub, .. }) => {
            if *max == Some(0) {
                // x{0} only matches the empty string.
                return Ok(Expr::literal(""));
            }
            Ok(Expr::repeat(from_hir(sub)?, *min, *max))
        }
        HirKind::Capture(Capture { sub, .. }) => from_hir(sub),
        HirKind::Concat(hirs) => Ok(Expr::sequence(
            hirs.iter().map(from_hir).collect::<Result<Vec<_>>>()?,
        )),
        HirKind::Alternation(hirs) => Ok(Expr::alternatives(
            hirs.iter().map(from_hir).collect::<Result<Vec<_>>>()?,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowers_structure() {
        let expr = parse("ab(c|d)*").unwrap();
        let Expr::Sequence(items) = &expr else {
            panic!("expected a sequence, got {expr:?}");
        };
        assert_eq!(items[0], Expr::literal("ab"));
        assert!(matches!(
            &items[1],
            Expr::Repeat { min: 0, max: None, .. }
        ));
    }

    #[test]
    fn classes_and_bounds() {
        let expr = parse(r"\d{2,3}").unwrap();
        let Expr::Repeat { child, min, max } = expr else {
            panic!("expected a repeat");
        };
        assert_eq!((min, max), (2, Some(3)));
        assert_eq!(*child, Expr::class(CharSet::digit()));
    }

    #[test]
    fn zero_repeat_is_empty() {
        assert_eq!(parse("a{0}").unwrap(), Expr::literal(""));
        assert_eq!(parse("").unwrap(), Expr::literal(""));
    }

    #[test]
    fn case_insensitive_and_ascii() {
        let config = Config {
            case_insensitive: true,
            ..Config::default()
        };
        assert_eq!(
            parse_with("k", config).unwrap(),
            Expr::class(CharSet::from_ranges([('K', 'K'), ('k', 'k'), ('\u{212A}', '\u{212A}')]))
        );

        let config = Config {
            unicode: false,
            ..Config::default()
        };
        assert_eq!(
            parse_with(r"\d", config).unwrap(),
            Expr::class(CharSet::range('0', '9'))
        );
    }

    #[test]
    fn rejects_look_around_and_bad_patterns() {
        assert!(matches!(parse(r"^a"), Err(Error::UnsupportedSyntax(_))));
        assert!(matches!(parse(r"a\b"), Err(Error::UnsupportedSyntax(_))));
        assert!(matches!(parse("a("), Err(Error::Parse(_))));
    }
}
