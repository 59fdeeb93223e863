//! # Readalong
//!
//! Span annotation for synchronized text highlighting.
//!
//! This crate annotates runs of marked-up text (HTML-like tags, punctuation,
//! LaTeX/MathML fragments) at word, sentence, or paragraph granularity. The
//! relevant spans of text are wrapped in a styling container while the
//! surrounding markup and whitespace pass through untouched. The output
//! drives synchronized highlighting, such as read-aloud or progressive
//! reveal, over rich content that mixes prose, inline math, and block HTML.
//!
//! Wrap every word in its own span:
//!
//! ```
//! let got = readalong::annotate_words("Solve 3.14 now", "hl").unwrap();
//! assert_eq!(
//!     got,
//!     "<span class='hl'>Solve</span>\n <span class='hl'>3.14</span>\n <span class='hl'>now</span>\n",
//! );
//! ```
//!
//! Sentence spans end at sentence punctuation and at block-level tags, so
//! prose inside a table cell or list item is its own sentence-like unit even
//! without terminal punctuation:
//!
//! ```
//! let got = readalong::annotate_sentences("<td>Alpha</td><td>Beta</td>", "hl").unwrap();
//! assert_eq!(
//!     got,
//!     "<td><span class='hl'>Alpha</span>\n</td><td><span class='hl'>Beta</span>\n</td>",
//! );
//! ```
//!
//! Paragraph spans re-tag `<p>` elements with the style class:
//!
//! ```
//! let got = readalong::annotate_paragraphs("<p>Hi there</p>", "hl").unwrap();
//! assert_eq!(got, "<p class='hl'>Hi there</p>\n");
//! ```
//!
//! An inline `<math>` block is lexed as one opaque unit, so no pass ever
//! splits it:
//!
//! ```
//! let got = readalong::annotate_words("Solve <math><mi>x</mi></math> now", "hl").unwrap();
//! assert_eq!(
//!     got,
//!     "<span class='hl'>Solve</span>\n <math><mi>x</mi></math> <span class='hl'>now</span>\n",
//! );
//! ```
//!
//! The entity, abbreviation, and tag tables are plain data; build an
//! [`Annotator`] over custom [`Tables`] to tune them:
//!
//! ```
//! use readalong::{Annotator, Tables};
//!
//! let mut tables = Tables::default();
//! tables.abbreviations.insert("Prof".to_string());
//! let annotator = Annotator::new(tables);
//! let got = annotator.sentences("Prof. X waved.", "hl").unwrap();
//! assert_eq!(got, "<span class='hl'>Prof. X waved</span>\n.");
//! ```
//!
//! A malformed construct is fatal for the whole call; partial output would
//! corrupt highlighting downstream:
//!
//! ```
//! use readalong::Error;
//!
//! let err = readalong::annotate_words("what is &zzz; here", "hl").unwrap_err();
//! assert!(matches!(err, Error::UnknownEntity { .. }));
//! ```
//!
//! The class name is embedded verbatim into the emitted tags; callers are
//! responsible for sanitizing it if it originates from untrusted input.

pub mod annotate;
mod error;
pub mod lexer;
pub mod tables;

pub use annotate::Annotator;
pub use error::{Error, ErrorLabel};
pub use tables::Tables;

/// A span of the source string, used in error reporting.
#[derive(Debug, Clone)]
pub struct Str<'a> {
    value: &'a str,
    start: usize,
    end: usize,
}

impl<'a> Str<'a> {
    pub(crate) fn from_range(value: &'a str, start: usize, end: usize) -> Str<'a> {
        Str { value, start, end }
    }
    /// Byte range of this span in the source.
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
    /// The spanned text.
    pub fn str(&self) -> &'a str {
        &self.value[self.span()]
    }
}

impl<'a> std::fmt::Display for Str<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.str())
    }
}

impl<'a> PartialEq for Str<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.str() == other.str()
    }
}

impl<'a> Eq for Str<'a> {}

/// Wrap every word, number, and math fragment of `source` in a
/// `<span class='…'>` carrying the given style class.
///
/// Uses [`Tables::default`]; see [`Annotator::words`].
pub fn annotate_words<'s>(source: &'s str, class: &str) -> Result<String, Error<'s>> {
    Annotator::default().words(source, class)
}

/// Wrap each sentence of `source` in a `<span class='…'>` carrying the given
/// style class.
///
/// Uses [`Tables::default`]; see [`Annotator::sentences`].
pub fn annotate_sentences<'s>(source: &'s str, class: &str) -> Result<String, Error<'s>> {
    Annotator::default().sentences(source, class)
}

/// Re-tag each `<p>`…`</p>` paragraph of `source` with the given style class.
///
/// Uses [`Tables::default`]; see [`Annotator::paragraphs`].
pub fn annotate_paragraphs<'s>(source: &'s str, class: &str) -> Result<String, Error<'s>> {
    Annotator::default().paragraphs(source, class)
}
