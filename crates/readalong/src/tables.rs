//! Lookup tables that drive classification.

use std::collections::{HashMap, HashSet};

/// The lookup tables consulted during scanning and wrapping.
///
/// Every table is plain data, injected rather than global, so callers with
/// domain-specific content can extend a table and tests can substitute
/// alternate tables without interference. The defaults cover common English
/// prose. Entries in `block_tags` must be lowercase; lookups against tag
/// names are case-insensitive.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tables {
    /// Entity name → decoded code point, e.g. `lt` → `<`.
    pub entities: HashMap<String, char>,
    /// Words that keep a trailing period without ending the sentence.
    pub abbreviations: HashSet<String>,
    /// Tag names treated as sentence-level structural boundaries.
    pub block_tags: HashSet<String>,
    /// Punctuation characters that end a sentence.
    pub sentence_punctuation: HashSet<char>,
}

impl Default for Tables {
    fn default() -> Self {
        Tables {
            entities: [
                ("lt", '<'),
                ("gt", '>'),
                ("amp", '&'),
                ("quot", '"'),
                ("apos", '\''),
                // More entries here as content requires them.
            ]
            .into_iter()
            .map(|(name, c)| (name.to_string(), c))
            .collect(),
            abbreviations: [
                "Mr", "Mrs",
                // More entries here as content requires them.
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            block_tags: [
                "div", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ol", "p", "td", "th", "tr",
                "ul",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            sentence_punctuation: ['.', '!', '?'].into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Kind, Lexer};

    #[test]
    fn custom_abbreviation() {
        let mut tables = Tables::default();
        tables.abbreviations.insert("Prof".to_string());
        let mut lexer = Lexer::new("Prof. X", &tables);
        let t = lexer.next_token().unwrap().unwrap();
        assert_eq!((t.kind, &*t.text), (Kind::Word, "Prof."));
    }

    #[test]
    fn custom_entity() {
        let mut tables = Tables::default();
        tables.entities.insert("mdash".to_string(), '—');
        let mut lexer = Lexer::new("a&mdash;b", &tables);
        let t = lexer.next_token().unwrap().unwrap();
        // The decoded dash is not punctuation-class, so the word absorbs it.
        assert_eq!((t.kind, &*t.text), (Kind::Word, "a—b"));
    }
}
