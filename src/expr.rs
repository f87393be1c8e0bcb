//! The expression IR.
//!
//! An [`Expr`] is an immutable tree describing a pattern independently of any
//! matching strategy. It is produced by [`crate::parse`] or built directly
//! with the constructors below, and consumed by [`crate::thompson::Compiler`].
//! `Display` renders the tree in regex notation; lookahead-free trees render
//! to patterns that `regex-syntax` accepts.

use std::fmt::{self, Write};

use crate::class::{CharSet, write_class_char};
use crate::error::Result;

/// A character class together with the name it is displayed with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharClass {
    pub set: CharSet,
    pub name: Option<String>,
}

impl CharClass {
    pub fn new(set: CharSet) -> Self {
        Self { set, name: None }
    }

    pub fn named(set: CharSet, name: impl Into<String>) -> Self {
        Self {
            set,
            name: Some(name.into()),
        }
    }

    pub fn matches(&self, c: char) -> bool {
        self.set.contains(c)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// Exactly one character out of the class.
    CharClass(CharClass),
    /// An exact run of characters. The empty run matches the empty string.
    Literal(String),
    /// All items, one after another. Never empty.
    Sequence(Vec<Expr>),
    /// Ordered choice between the items. Never empty.
    Alternatives(Vec<Expr>),
    /// `child` repeated greedily between `min` and `max` times,
    /// `max == None` meaning unbounded.
    Repeat {
        child: Box<Expr>,
        min: u32,
        max: Option<u32>,
    },
    /// Zero-width assertion that `child` matches (or doesn't, if `negate`)
    /// at the current position.
    Lookahead { child: Box<Expr>, negate: bool },
}

impl Expr {
    pub fn literal(chars: impl Into<String>) -> Self {
        Expr::Literal(chars.into())
    }

    pub fn class(set: CharSet) -> Self {
        Expr::CharClass(CharClass::new(set))
    }

    pub fn any_char() -> Self {
        Expr::CharClass(CharClass::named(CharSet::any(), r"[\s\S]"))
    }

    pub fn chars_range(from: char, to: char) -> Self {
        Expr::class(CharSet::range(from, to))
    }

    pub fn digit() -> Self {
        Expr::CharClass(CharClass::named(CharSet::digit(), r"\d"))
    }

    pub fn not_digit() -> Self {
        Expr::CharClass(CharClass::named(CharSet::digit().negate(), r"\D"))
    }

    pub fn letter() -> Self {
        Expr::CharClass(CharClass::named(CharSet::letter(), r"\pL"))
    }

    pub fn letter_or_digit() -> Self {
        Expr::CharClass(CharClass::named(CharSet::letter_or_digit(), r"[\pL\p{Nd}]"))
    }

    pub fn number() -> Self {
        Expr::CharClass(CharClass::named(CharSet::number(), r"\pN"))
    }

    pub fn control() -> Self {
        Expr::CharClass(CharClass::named(CharSet::control(), r"\p{Cc}"))
    }

    /// A Unicode category, script or property class, see [`CharSet::unicode_class`].
    pub fn unicode_class(name: &str) -> Result<Self> {
        Ok(Expr::CharClass(CharClass::named(
            CharSet::unicode_class(name)?,
            format!(r"\p{{{name}}}"),
        )))
    }

    pub fn word() -> Self {
        Expr::CharClass(CharClass::named(CharSet::word(), r"\w"))
    }

    pub fn not_word() -> Self {
        Expr::CharClass(CharClass::named(CharSet::word().negate(), r"\W"))
    }

    pub fn whitespace() -> Self {
        Expr::CharClass(CharClass::named(CharSet::whitespace(), r"\s"))
    }

    pub fn not_whitespace() -> Self {
        Expr::CharClass(CharClass::named(CharSet::whitespace().negate(), r"\S"))
    }

    pub fn sequence(items: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Sequence(items.into_iter().collect())
    }

    pub fn alternatives(items: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Alternatives(items.into_iter().collect())
    }

    pub fn repeat(child: Expr, min: u32, max: Option<u32>) -> Self {
        Expr::Repeat {
            child: Box::new(child),
            min,
            max,
        }
    }

    pub fn star(child: Expr) -> Self {
        Self::repeat(child, 0, None)
    }

    pub fn plus(child: Expr) -> Self {
        Self::repeat(child, 1, None)
    }

    pub fn optional(child: Expr) -> Self {
        Self::repeat(child, 0, Some(1))
    }

    pub fn check(child: Expr) -> Self {
        Expr::Lookahead {
            child: Box::new(child),
            negate: false,
        }
    }

    pub fn check_not(child: Expr) -> Self {
        Expr::Lookahead {
            child: Box::new(child),
            negate: true,
        }
    }

    /// Direct sub-expressions, in order.
    pub fn children(&self) -> &[Expr] {
        match self {
            Expr::CharClass(_) | Expr::Literal(_) => &[],
            Expr::Sequence(items) | Expr::Alternatives(items) => items,
            Expr::Repeat { child, .. } | Expr::Lookahead { child, .. } => {
                std::slice::from_ref(child.as_ref())
            }
        }
    }

    /// Visits the tree in pre-order.
    pub fn walk<'e>(&'e self, visit: &mut impl FnMut(&'e Expr)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    pub fn contains_lookahead(&self) -> bool {
        let mut found = false;
        self.walk(&mut |e| found |= matches!(e, Expr::Lookahead { .. }));
        found
    }

    /// Whether the rendering of this node can take a quantifier without
    /// being wrapped in a group.
    fn is_atom(&self) -> bool {
        match self {
            Expr::CharClass(_) => true,
            Expr::Literal(chars) => chars.chars().count() == 1,
            Expr::Lookahead { .. } => true,
            _ => false,
        }
    }
}

impl From<CharSet> for Expr {
    fn from(set: CharSet) -> Self {
        Expr::class(set)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::CharClass(class) => match &class.name {
                Some(name) => f.write_str(name),
                None => write!(f, "{}", class.set),
            },
            Expr::Literal(chars) if chars.is_empty() => f.write_str("(?:)"),
            Expr::Literal(chars) => {
                for c in chars.chars() {
                    write_class_char(f, c)?;
                }
                Ok(())
            }
            Expr::Sequence(items) => {
                for item in items {
                    if matches!(item, Expr::Alternatives(_)) {
                        write!(f, "(?:{item})")?;
                    } else {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            Expr::Alternatives(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_char('|')?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Expr::Repeat { child, min, max } => {
                if child.is_atom() {
                    write!(f, "{child}")?;
                } else {
                    write!(f, "(?:{child})")?;
                }
                match (min, max) {
                    (0, None) => f.write_char('*'),
                    (1, None) => f.write_char('+'),
                    (0, Some(1)) => f.write_char('?'),
                    (min, None) => write!(f, "{{{min},}}"),
                    (min, Some(max)) if min == max => write!(f, "{{{min}}}"),
                    (min, Some(max)) => write!(f, "{{{min},{max}}}"),
                }
            }
            Expr::Lookahead { child, negate } => {
                let op = if *negate { '!' } else { '=' };
                write!(f, "(?{op}{child})")
            }
        }
    }
}
