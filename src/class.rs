//! Character sets used by class expressions and class transitions.
//!
//! A [`CharSet`] is a sorted list of disjoint, non-adjacent inclusive ranges,
//! the same layout `regex-syntax` uses for its Unicode classes. Keeping sets
//! in this canonical form makes structural equality meaningful, which the
//! determinization and minimization transforms rely on.

use std::fmt::{self, Write};
use std::sync::LazyLock;

use regex_syntax::hir::{Class, ClassUnicode, HirKind};

use crate::error::{Error, Result};

const SURROGATE_START: u32 = 0xD800;
const SURROGATE_END: u32 = 0xDFFF;

static DIGIT: LazyLock<CharSet> = LazyLock::new(|| CharSet::from_pattern(r"\d"));
static WORD: LazyLock<CharSet> = LazyLock::new(|| CharSet::from_pattern(r"\w"));
static WHITESPACE: LazyLock<CharSet> = LazyLock::new(|| CharSet::from_pattern(r"\s"));
static LETTER: LazyLock<CharSet> = LazyLock::new(|| CharSet::from_pattern(r"\pL"));
static LETTER_OR_DIGIT: LazyLock<CharSet> = LazyLock::new(|| CharSet::from_pattern(r"[\pL\p{Nd}]"));
static NUMBER: LazyLock<CharSet> = LazyLock::new(|| CharSet::from_pattern(r"\pN"));
static CONTROL: LazyLock<CharSet> = LazyLock::new(|| CharSet::from_pattern(r"\p{Cc}"));

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CharSet {
    ranges: Vec<(char, char)>,
}

impl CharSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn any() -> Self {
        Self {
            ranges: vec![('\0', char::MAX)],
        }
    }

    pub fn single(c: char) -> Self {
        Self {
            ranges: vec![(c, c)],
        }
    }

    /// Inclusive range; the bounds may be given in any order.
    pub fn range(a: char, b: char) -> Self {
        Self::from_ranges([(a, b)])
    }

    /// Unicode decimal digits (`\d`).
    pub fn digit() -> Self {
        DIGIT.clone()
    }

    /// Unicode word characters (`\w`).
    pub fn word() -> Self {
        WORD.clone()
    }

    /// Unicode whitespace (`\s`).
    pub fn whitespace() -> Self {
        WHITESPACE.clone()
    }

    /// Unicode letters (`\pL`).
    pub fn letter() -> Self {
        LETTER.clone()
    }

    /// Unicode letters and decimal digits.
    pub fn letter_or_digit() -> Self {
        LETTER_OR_DIGIT.clone()
    }

    /// Every Unicode number category (`\pN`), not only decimal digits.
    pub fn number() -> Self {
        NUMBER.clone()
    }

    /// Control characters (`\p{Cc}`).
    pub fn control() -> Self {
        CONTROL.clone()
    }

    /// The characters of a Unicode general category, script or property, by
    /// any name `\p{..}` accepts, e.g. `Lu`, `Uppercase_Letter` or `Greek`.
    pub fn unicode_class(name: &str) -> Result<Self> {
        let hir = regex_syntax::Parser::new().parse(&format!(r"\p{{{name}}}"))?;
        match hir.kind() {
            HirKind::Class(Class::Unicode(class)) => Ok(Self::from_class(class)),
            _ => Err(Error::UnsupportedSyntax(format!("unicode class {name:?}"))),
        }
    }

    pub fn from_ranges(ranges: impl IntoIterator<Item = (char, char)>) -> Self {
        let mut ranges: Vec<(char, char)> = ranges
            .into_iter()
            .map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
            .collect();
        ranges.sort_unstable();

        let mut merged: Vec<(char, char)> = Vec::with_capacity(ranges.len());
        for (start, end) in ranges {
            match merged.last_mut() {
                Some(last) if start as u32 <= next_scalar(last.1) => {
                    if end > last.1 {
                        last.1 = end;
                    }
                }
                _ => merged.push((start, end)),
            }
        }
        Self { ranges: merged }
    }

    pub(crate) fn from_class(class: &ClassUnicode) -> Self {
        Self::from_ranges(class.iter().map(|r| (r.start(), r.end())))
    }

    /// Builds a set from a single class pattern. Only used with fixed patterns.
    fn from_pattern(pattern: &str) -> Self {
        match regex_syntax::Parser::new().parse(pattern) {
            Ok(hir) => match hir.kind() {
                HirKind::Class(Class::Unicode(class)) => Self::from_class(class),
                _ => Self::empty(),
            },
            Err(_) => Self::empty(),
        }
    }

    pub fn ranges(&self) -> &[(char, char)] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn contains(&self, c: char) -> bool {
        self.ranges
            .binary_search_by(|&(start, end)| {
                if c < start {
                    std::cmp::Ordering::Greater
                } else if c > end {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// Returns the character if this set holds exactly one.
    pub fn as_single(&self) -> Option<char> {
        match self.ranges.as_slice() {
            [(a, b)] if a == b => Some(*a),
            _ => None,
        }
    }

    pub fn union(&self, other: &CharSet) -> CharSet {
        Self::from_ranges(self.ranges.iter().chain(other.ranges.iter()).copied())
    }

    pub fn negate(&self) -> CharSet {
        let mut ranges = Vec::with_capacity(self.ranges.len() + 1);
        let mut next = 0u32;
        for &(start, end) in &self.ranges {
            if (start as u32) > next {
                if let Some(range) = scalar_range(next, start as u32 - 1) {
                    ranges.push(range);
                }
            }
            next = next_scalar(end);
        }
        if let Some(range) = scalar_range(next, char::MAX as u32) {
            ranges.push(range);
        }
        Self::from_ranges(ranges)
    }
}

impl From<char> for CharSet {
    fn from(c: char) -> Self {
        Self::single(c)
    }
}

/// Renders the set as a bracketed regex class, e.g. `[a-z_]`.
impl fmt::Display for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ranges.is_empty() {
            // Matches nothing, still valid regex syntax.
            return f.write_str(r"[^\x{0}-\x{10FFFF}]");
        }
        f.write_char('[')?;
        for &(start, end) in &self.ranges {
            write_class_char(f, start)?;
            if start != end {
                f.write_char('-')?;
                write_class_char(f, end)?;
            }
        }
        f.write_char(']')
    }
}

pub(crate) fn write_class_char(f: &mut impl Write, c: char) -> fmt::Result {
    if c.is_control() || c.is_whitespace() || (c as u32) > 0xFFFF {
        write!(f, r"\x{{{:X}}}", c as u32)
    } else if regex_syntax::is_meta_character(c) {
        write!(f, "\\{c}")
    } else {
        f.write_char(c)
    }
}

/// The scalar value right after `c`, skipping the surrogate gap.
fn next_scalar(c: char) -> u32 {
    match c as u32 {
        n if n == SURROGATE_START - 1 => SURROGATE_END + 1,
        n => n + 1,
    }
}

/// Clamps a `u32` range to valid scalar values. Returns `None` when nothing is left.
pub(crate) fn scalar_range(start: u32, end: u32) -> Option<(char, char)> {
    let start = if (SURROGATE_START..=SURROGATE_END).contains(&start) {
        SURROGATE_END + 1
    } else {
        start
    };
    let end = if (SURROGATE_START..=SURROGATE_END).contains(&end) {
        SURROGATE_START - 1
    } else {
        end
    };
    if start > end {
        return None;
    }
    Some((char::from_u32(start)?, char::from_u32(end)?))
}
