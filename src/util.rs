/*!
This modules contains the input and output types shared by both runners
and by the [`crate::Regex`] facade.
*/

use std::ops::Range;

/// Defines the input parameter to most matching methods on a [`crate::Runner`]
/// or a [`crate::Regex`]. Since all values other than subject have a default
/// value it's always sufficient to only provide the subject string, but for
/// lookahead evaluation we need more control, and this type comes handy.
///
/// Matching is always anchored at `span.from`.
#[derive(Clone, Debug)]
pub struct Input<'s> {
    /// The subject string against which the automaton is run
    pub subject: &'s str,
    /// Perform the match within that span.
    /// Default: 0..subject.len()
    pub span: Span,
    /// Whenever the search should return the earliest accepting position
    /// instead of the longest match.
    /// Default: false
    pub first_match: bool,
}

impl<'s> Input<'s> {
    pub fn new(subject: &'s str) -> Self {
        Self {
            subject,
            span: (0..subject.len()).into(),
            first_match: false,
        }
    }

    pub fn span(mut self, span: impl Into<Span>) -> Self {
        self.span = span.into();
        self
    }

    pub fn first_match(mut self, value: bool) -> Self {
        self.first_match = value;
        self
    }

    pub fn valid(&self) -> bool {
        self.span.valid()
            && self.span.to <= self.subject.len()
            && self.subject.is_char_boundary(self.span.from)
            && self.subject.is_char_boundary(self.span.to)
    }

    /// The character starting at byte offset `pos`, if it lies within the span.
    pub(crate) fn char_at(&self, pos: usize) -> Option<char> {
        self.subject[pos..self.span.to].chars().next()
    }
}

impl<'s> From<&'s str> for Input<'s> {
    fn from(subject: &'s str) -> Self {
        Self::new(subject)
    }
}

/// A span in a &str. Similar to [`std::ops::Range`], but implements Copy.
#[derive(Copy, Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub from: usize,
    pub to: usize,
}

impl Span {
    pub fn empty(&self) -> bool {
        self.from == self.to
    }

    pub fn valid(&self) -> bool {
        self.from <= self.to
    }

    pub fn len(&self) -> usize {
        self.to - self.from
    }
}

impl From<Range<usize>> for Span {
    fn from(value: Range<usize>) -> Self {
        Self {
            from: value.start,
            to: value.end,
        }
    }
}

impl From<Span> for Range<usize> {
    fn from(val: Span) -> Self {
        val.from..val.to
    }
}

/// Successful match. Contains the bounds of the consumed prefix of the span.
#[derive(Copy, Debug, Clone)]
pub struct Match<'s> {
    pub subject: &'s str,
    pub span: Span,
}

impl<'s> Match<'s> {
    pub fn new(subject: &'s str, span: impl Into<Span>) -> Self {
        let span = span.into();
        Self { subject, span }
    }

    pub fn as_str(&self) -> &'s str {
        &self.subject[self.span.from..self.span.to]
    }

    /// Byte offset right after the last consumed character.
    pub fn end(&self) -> usize {
        self.span.to
    }

    /// Number of consumed bytes.
    pub fn len(&self) -> usize {
        self.span.len()
    }

    pub fn is_empty(&self) -> bool {
        self.span.empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_at_respects_span_end() {
        let input = Input::new("abc").span(0..2);
        assert_eq!(input.char_at(1), Some('b'));
        assert_eq!(input.char_at(2), None);
    }

    #[test]
    fn input_validity() {
        assert!(Input::new("héllo").valid());
        assert!(!Input::new("héllo").span(2..3).valid());
        assert!(!Input::new("abc").span(2..1).valid());
        assert!(!Input::new("abc").span(0..4).valid());
    }

    #[test]
    fn match_accessors() {
        let m = Match::new("foobar", 0..3);
        assert_eq!(m.as_str(), "foo");
        assert_eq!(m.end(), 3);
        assert_eq!(m.len(), 3);
        assert!(!m.is_empty());
    }
}
