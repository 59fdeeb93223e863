//! The three span-wrapping passes: word, sentence, paragraph.

use crate::lexer::{is_punctuation_class, Lexer};
use crate::tables::Tables;
use crate::Error;

/// Wraps spans of marked-up text for synchronized highlighting.
///
/// The three passes share one lexer and differ only in which tokens open and
/// close a highlight span. Each call is a pure function of its input; the
/// annotator itself carries nothing but the lookup tables, so one annotator
/// can serve any number of concurrent calls.
#[derive(Clone, Debug, Default)]
pub struct Annotator {
    tables: Tables,
}

impl Annotator {
    pub fn new(tables: Tables) -> Self {
        Annotator { tables }
    }

    /// Wrap every word, number, and math fragment in its own span. All other
    /// tokens, markup included, pass through verbatim, so nested markup is
    /// never split.
    pub fn words<'s>(&self, source: &'s str, class: &str) -> Result<String, Error<'s>> {
        let mut lexer = Lexer::new(source, &self.tables);
        let mut out = String::with_capacity(source.len());
        while let Some(t) = lexer.next_token()? {
            if t.is_word() {
                push_open_span(&mut out, class);
                out.push_str(&t.text);
                out.push_str("</span>\n");
            } else {
                out.push_str(&t.text);
            }
        }
        Ok(out)
    }

    /// Wrap each sentence in one span. A sentence ends at sentence
    /// punctuation or at a block-level tag in either form, so prose inside a
    /// table cell or list item is its own unit even without terminal
    /// punctuation. A sentence still open at end of input is closed.
    pub fn sentences<'s>(&self, source: &'s str, class: &str) -> Result<String, Error<'s>> {
        let mut lexer = Lexer::new(source, &self.tables);
        let mut out = String::with_capacity(source.len());
        let mut in_span = false;
        while let Some(t) = lexer.next_token()? {
            if t.is_sentence_delimiter(&self.tables) {
                // A trailing punctuation-class character (a quote, usually)
                // stays outside the span being closed.
                let trailing = match out.chars().last() {
                    Some(c) if is_punctuation_class(c) => {
                        out.pop();
                        Some(c)
                    }
                    _ => None,
                };
                if in_span {
                    out.push_str("</span>\n");
                    in_span = false;
                }
                if let Some(c) = trailing {
                    out.push(c);
                }
                out.push_str(&t.text);
            } else if t.is_whitespace() || t.is_markup() || t.is_punctuation() {
                out.push_str(&t.text);
            } else if !in_span {
                push_open_span(&mut out, class);
                out.push_str(&t.text);
                in_span = true;
            } else {
                out.push_str(&t.text);
            }
        }
        if in_span {
            // End of input with no delimiter; the last sentence still closes.
            out.push_str("</span>");
        }
        Ok(out)
    }

    /// Re-tag each paragraph with the style class: `<p>` becomes
    /// `<p class='…'>`, and a `<p>` arriving while a paragraph is still open
    /// force-closes it rather than nesting. An unterminated paragraph stays
    /// open at end of input; only the sentence pass closes there.
    pub fn paragraphs<'s>(&self, source: &'s str, class: &str) -> Result<String, Error<'s>> {
        let mut lexer = Lexer::new(source, &self.tables);
        let mut out = String::with_capacity(source.len());
        let mut in_span = false;
        while let Some(t) = lexer.next_token()? {
            if t.is_paragraph_open() {
                if in_span {
                    out.push_str("</p>");
                }
                out.push_str("<p class='");
                out.push_str(class);
                out.push_str("'>");
                in_span = true;
            } else if t.is_paragraph_close() && in_span {
                out.push_str("</p>\n");
                in_span = false;
            } else {
                out.push_str(&t.text);
            }
        }
        Ok(out)
    }
}

fn push_open_span(out: &mut String, class: &str) {
    out.push_str("<span class='");
    out.push_str(class);
    out.push_str("'>");
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! wrap_tests {
        ( $( ($name: ident, $pass: ident, $input: expr, $want: expr, ), )+ ) => {
            $(
                #[test]
                fn $name() {
                    let got = Annotator::default().$pass($input, "c").unwrap();
                    assert_eq!(got, $want);
                }
            )+
        };
    }

    wrap_tests!(
        (
            words_basic,
            words,
            "Solve 3.14 now",
            "<span class='c'>Solve</span>\n <span class='c'>3.14</span>\n <span class='c'>now</span>\n",
        ),
        (
            words_math_is_opaque,
            words,
            "Solve <math><mi>x</mi></math> now",
            "<span class='c'>Solve</span>\n <math><mi>x</mi></math> <span class='c'>now</span>\n",
        ),
        (
            words_latex_is_wrapped,
            words,
            r"area \(x^2\)",
            "<span class='c'>area</span>\n <span class='c'>\\(x^2\\)</span>\n",
        ),
        (
            words_markup_passes_through,
            words,
            "<b>bold</b> move",
            "<b><span class='c'>bold</span>\n</b> <span class='c'>move</span>\n",
        ),
        (
            sentences_basic,
            sentences,
            "Stop! Go.",
            "<span class='c'>Stop</span>\n! <span class='c'>Go</span>\n.",
        ),
        (
            sentences_abbreviation_does_not_close,
            sentences,
            "Mr. Fox left.",
            "<span class='c'>Mr. Fox left</span>\n.",
        ),
        (
            sentences_block_tags_delimit,
            sentences,
            "<td>Alpha</td><td>Beta</td>",
            "<td><span class='c'>Alpha</span>\n</td><td><span class='c'>Beta</span>\n</td>",
        ),
        (
            sentences_close_at_end_of_input,
            sentences,
            "No ending",
            "<span class='c'>No ending</span>",
        ),
        (
            sentences_trailing_quote_stays_outside,
            sentences,
            "He said 'stop'. Go.",
            "<span class='c'>He said 'stop</span>\n'. <span class='c'>Go</span>\n.",
        ),
        (
            paragraphs_basic,
            paragraphs,
            "<p>Hi there</p>",
            "<p class='c'>Hi there</p>\n",
        ),
        (
            paragraphs_force_close,
            paragraphs,
            "<p>One<p>Two</p>",
            "<p class='c'>One</p><p class='c'>Two</p>\n",
        ),
        (
            paragraphs_unmatched_close_passes_through,
            paragraphs,
            "x</p>",
            "x</p>",
        ),
        (
            paragraphs_unterminated_stays_open,
            paragraphs,
            "<p>dangling",
            "<p class='c'>dangling",
        ),
        (
            paragraphs_other_markup_passes_through,
            paragraphs,
            "<div><p>In a cell</p></div>",
            "<div><p class='c'>In a cell</p>\n</div>",
        ),
    );

    #[test]
    fn custom_sentence_delimiters() {
        let mut tables = Tables::default();
        tables.sentence_punctuation.insert(';');
        let got = Annotator::new(tables).sentences("One; Two", "c").unwrap();
        assert_eq!(got, "<span class='c'>One</span>\n; <span class='c'>Two</span>");
    }

    #[test]
    fn unknown_entity_is_fatal() {
        let annotator = Annotator::default();
        assert!(matches!(
            annotator.words("oops &zzz; here", "c"),
            Err(Error::UnknownEntity { .. })
        ));
        assert!(matches!(
            annotator.sentences("oops &zzz; here", "c"),
            Err(Error::UnknownEntity { .. })
        ));
        assert!(matches!(
            annotator.paragraphs("oops &zzz; here", "c"),
            Err(Error::UnknownEntity { .. })
        ));
    }

    #[test]
    fn spans_balance_and_never_nest() {
        let annotator = Annotator::default();
        let input = "Mr. Fox said 'hi'. <td>Cell one</td> Done";
        for got in [
            annotator.words(input, "c").unwrap(),
            annotator.sentences(input, "c").unwrap(),
        ] {
            let mut depth = 0_i32;
            let mut i = 0;
            while i < got.len() {
                if got[i..].starts_with("</span>") {
                    depth -= 1;
                    assert!(depth >= 0, "output: {got:?}");
                    i += "</span>".len();
                } else if got[i..].starts_with("<span") {
                    depth += 1;
                    assert!(depth <= 1, "output: {got:?}");
                    i += "<span".len();
                } else {
                    i += 1;
                }
            }
            assert_eq!(depth, 0, "output: {got:?}");
        }
    }
}
