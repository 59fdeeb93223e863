//! The readalong lexer, which reads marked-up text and produces classified tokens.
//!
//! The lexer is a lossless partition of its input: concatenating the text of
//! every token it produces, in order, reproduces the entity-decoded input
//! exactly. Character entities are collapsed *below* the lexer, by the
//! character stream, so a decoded `&lt;` behaves exactly like a literal `<`
//! and can open a markup tag. Classification itself is driven by the
//! injected [`Tables`].
//!
//! Tokens are produced just in time, one per [`Lexer::next_token`] call, and
//! each call consumes a finite prefix of the input; the lexer never re-scans.

use crate::tables::Tables;
use crate::Error;
use crate::Str;
use std::borrow::Cow;

/// The kind of a token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kind {
    Punctuation,
    Word,
    Whitespace,
    Number,
    /// A markup tag, or a whole flattened `<math>`…`</math>` subtree.
    Markup,
    /// A `\(`…`\)` block or a `\name` command.
    Latex,
}

/// A classified, contiguous lexeme of the input.
///
/// The text is the exact run of characters consumed, with entities already
/// decoded: `&lt;` contributes a literal `<`, never the escape sequence. The
/// text borrows from the source unless an entity was decoded inside it.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token<'a> {
    pub kind: Kind,
    pub text: Cow<'a, str>,
}

impl<'a> Token<'a> {
    /// True for content that is spoken aloud: words, numbers, and LaTeX
    /// fragments.
    pub fn is_word(&self) -> bool {
        matches!(self.kind, Kind::Word | Kind::Number | Kind::Latex)
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind == Kind::Whitespace
    }

    pub fn is_markup(&self) -> bool {
        self.kind == Kind::Markup
    }

    pub fn is_punctuation(&self) -> bool {
        self.kind == Kind::Punctuation
    }

    /// The tag identifier of a markup token: `td` for both `<td>` and `</td>`.
    pub fn tag_name(&self) -> Option<&str> {
        if self.kind != Kind::Markup {
            return None;
        }
        tag_name(&self.text)
    }

    /// True if this token ends the current sentence: sentence punctuation, or
    /// a block-level tag in either its opening or closing form.
    pub fn is_sentence_delimiter(&self, tables: &Tables) -> bool {
        match self.kind {
            Kind::Punctuation => {
                let mut chars = self.text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => tables.sentence_punctuation.contains(&c),
                    _ => false,
                }
            }
            Kind::Markup => self
                .tag_name()
                .is_some_and(|name| tables.block_tags.contains(name.to_ascii_lowercase().as_str())),
            _ => false,
        }
    }

    pub fn is_paragraph_open(&self) -> bool {
        self.kind == Kind::Markup
            && !is_closing(&self.text)
            && self.tag_name().is_some_and(|name| name.eq_ignore_ascii_case("p"))
    }

    pub fn is_paragraph_close(&self) -> bool {
        self.kind == Kind::Markup
            && is_closing(&self.text)
            && self.tag_name().is_some_and(|name| name.eq_ignore_ascii_case("p"))
    }
}

impl<'a> std::fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Extracts the tag identifier from markup text: the substring after `<` (and
/// after a leading `/` for closing tags) up to the first non-alphanumeric
/// character. Alphanumeric rather than alphabetic so that `h1`…`h6` have
/// usable names.
pub fn tag_name(markup: &str) -> Option<&str> {
    let rest = markup.strip_prefix('<')?;
    let rest = rest.strip_prefix('/').unwrap_or(rest);
    let end = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    if end == 0 {
        None
    } else {
        Some(&rest[..end])
    }
}

fn is_closing(markup: &str) -> bool {
    markup.starts_with("</")
}

/// The punctuation-class characters: they terminate word scanning, and the
/// sentence pass strips one of them from the tail of a span it is closing.
/// Carriage return is deliberately absent: a `\r` in the middle of a word is
/// absorbed into it.
pub(crate) fn is_punctuation_class(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t' | '\n' | '.' | ',' | '!' | '?' | '<' | '\'' | '"' | '&' | ';'
    )
}

/// A character delivered by the stream, together with where it came from.
#[derive(Clone, Copy)]
struct Decoded {
    char: char,
    /// Byte offset of the first raw character this character was decoded from.
    start: usize,
    from_entity: bool,
}

/// Entity-aware character stream over a source string.
///
/// The stream yields decoded code points: a `&name;` escape is collapsed into
/// the code point the entity table maps it to, as if that character appeared
/// literally at the escape's position. One slot of pushback and a depth-1
/// previous-character lookback are supported; anything needing more context
/// must buffer tokens, not characters.
struct CharStream<'s, 't> {
    src: &'s str,
    /// Byte offset of the next raw character to decode.
    pos: usize,
    /// The explicit one-slot pushback buffer.
    pending: Option<Decoded>,
    /// The most recently consumed character, so `push_back` can restore it.
    last: Option<Decoded>,
    /// The character consumed before `last`.
    prev: Option<char>,
    /// Number of entities consumed so far.
    entities: usize,
    tables: &'t Tables,
}

impl<'s, 't> CharStream<'s, 't> {
    fn new(src: &'s str, tables: &'t Tables) -> Self {
        CharStream {
            src,
            pos: 0,
            pending: None,
            last: None,
            prev: None,
            entities: 0,
            tables,
        }
    }

    /// Byte offset in the raw source of the next character `next` will return.
    fn offset(&self) -> usize {
        match &self.pending {
            Some(d) => d.start,
            None => self.pos,
        }
    }

    /// Number of entities consumed so far. Comparing counts around a token
    /// decides whether its lexeme can borrow from the source.
    fn entities(&self) -> usize {
        self.entities
    }

    /// The raw source between `start` and the current offset.
    fn raw(&self, start: usize) -> &'s str {
        &self.src[start..self.offset()]
    }

    fn str_range(&self, start: usize, end: usize) -> Str<'s> {
        Str::from_range(self.src, start, end)
    }

    fn str_to_end(&self, start: usize) -> Str<'s> {
        Str::from_range(self.src, start, self.src.len())
    }

    /// The character consumed immediately before the most recent one.
    /// Unavailable after a `push_back` until the next consume.
    fn prev_char(&self) -> Option<char> {
        self.prev
    }

    fn next(&mut self) -> Result<Option<char>, Error<'s>> {
        let d = match self.pending.take() {
            Some(d) => Some(d),
            None => self.decode()?,
        };
        if let Some(d) = d {
            if d.from_entity {
                self.entities += 1;
            }
            self.prev = self.last.map(|l| l.char);
            self.last = Some(d);
        }
        Ok(d.map(|d| d.char))
    }

    /// Reads one code point ahead without consuming anything.
    fn peek(&mut self) -> Result<Option<char>, Error<'s>> {
        if let Some(d) = &self.pending {
            return Ok(Some(d.char));
        }
        let save = self.pos;
        let d = self.decode()?;
        self.pos = save;
        Ok(d.map(|d| d.char))
    }

    /// Return the most recently consumed character to the stream. Backup is
    /// restricted to exactly one step.
    fn push_back(&mut self) {
        let d = self.last.take().expect("push_back follows a successful next");
        debug_assert!(self.pending.is_none());
        if d.from_entity {
            self.entities -= 1;
        }
        self.pending = Some(d);
        self.prev = None;
    }

    /// Decode the next raw character, collapsing `&name;` escapes.
    fn decode(&mut self) -> Result<Option<Decoded>, Error<'s>> {
        let start = self.pos;
        let Some(c) = self.src[self.pos..].chars().next() else {
            return Ok(None);
        };
        self.pos += c.len_utf8();
        if c != '&' {
            return Ok(Some(Decoded {
                char: c,
                start,
                from_entity: false,
            }));
        }
        let name_start = self.pos;
        loop {
            let Some(c) = self.src[self.pos..].chars().next() else {
                return Err(Error::MalformedEntity {
                    entity: self.str_to_end(start),
                });
            };
            self.pos += c.len_utf8();
            if c == ';' {
                break;
            }
        }
        let name = self.str_range(name_start, self.pos - 1);
        match self.tables.entities.get(name.str()) {
            Some(&decoded) => Ok(Some(Decoded {
                char: decoded,
                start,
                from_entity: true,
            })),
            None => Err(Error::UnknownEntity {
                entity: self.str_range(start, self.pos),
                name,
            }),
        }
    }
}

/// The readalong lexer.
pub struct Lexer<'s, 't> {
    stream: CharStream<'s, 't>,
    tables: &'t Tables,
}

impl<'s, 't> Lexer<'s, 't> {
    pub fn new(source: &'s str, tables: &'t Tables) -> Self {
        Lexer {
            stream: CharStream::new(source, tables),
            tables,
        }
    }

    /// Returns the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token<'s>>, Error<'s>> {
        let start = self.stream.offset();
        let entities = self.stream.entities();
        let Some(c) = self.stream.next()? else {
            return Ok(None);
        };
        let token = match c {
            ' ' | '\t' | '\n' | '\r' => self.single(Kind::Whitespace, c, start, entities),
            '<' => self.markup(start, entities)?,
            '\\' => self.latex(start, entities)?,
            '!' | '"' | '\'' | '(' | ')' | '*' | '+' | ',' | '-' | '.' | '/' | ';' | '=' | '?'
            | '[' | ']' | '^' | '{' | '}' | '&' => {
                self.single(Kind::Punctuation, c, start, entities)
            }
            c => self.word(c, start, entities)?,
        };
        Ok(Some(token))
    }

    /// A single-character token.
    fn single(&self, kind: Kind, c: char, start: usize, entities: usize) -> Token<'s> {
        let text = if self.stream.entities() == entities {
            Cow::Borrowed(self.stream.raw(start))
        } else {
            Cow::Owned(c.to_string())
        };
        Token { kind, text }
    }

    /// The token's text borrows from the source unless an entity was decoded
    /// inside it.
    fn text(&self, start: usize, buf: String, entities_before: usize) -> Cow<'s, str> {
        if self.stream.entities() == entities_before {
            let raw = self.stream.raw(start);
            debug_assert_eq!(raw, buf);
            Cow::Borrowed(raw)
        } else {
            Cow::Owned(buf)
        }
    }

    /// A maximal run of non-punctuation-class characters. A period continues
    /// the word when it is a decimal point between two digits, or when the
    /// lexeme so far is a known abbreviation; both checks happen while the
    /// period is the current character, using the depth-1 lookback and a peek.
    fn word(&mut self, first: char, start: usize, entities: usize) -> Result<Token<'s>, Error<'s>> {
        let mut buf = String::new();
        buf.push(first);
        loop {
            let Some(c) = self.stream.next()? else {
                break;
            };
            if !is_punctuation_class(c) {
                buf.push(c);
                continue;
            }
            if c == '.' {
                let decimal = self.stream.prev_char().is_some_and(|p| p.is_ascii_digit())
                    && self.stream.peek()?.is_some_and(|n| n.is_ascii_digit());
                if decimal || self.tables.abbreviations.contains(buf.as_str()) {
                    buf.push('.');
                    continue;
                }
            }
            self.stream.push_back();
            break;
        }
        let kind = if buf.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
            Kind::Number
        } else {
            Kind::Word
        };
        Ok(Token {
            kind,
            text: self.text(start, buf, entities),
        })
    }

    /// A tag, from `<` through the next `>` inclusive. An opening `<math>`
    /// tag swallows everything through the matching `</math>`: the whole
    /// inline-math subtree becomes one opaque token that the wrapping passes
    /// can never split.
    fn markup(&mut self, start: usize, entities: usize) -> Result<Token<'s>, Error<'s>> {
        let mut buf = String::from("<");
        loop {
            let Some(c) = self.stream.next()? else {
                return Err(Error::UnterminatedMarkup {
                    tag: self.stream.str_to_end(start),
                });
            };
            buf.push(c);
            if c == '>' {
                break;
            }
        }
        if !is_closing(&buf) && tag_name(&buf).is_some_and(|n| n.eq_ignore_ascii_case("math")) {
            let opener_end = self.stream.offset();
            loop {
                let Some(t) = self.next_token()? else {
                    return Err(Error::UnterminatedMathBlock {
                        opener: self.stream.str_range(start, opener_end),
                    });
                };
                let closes = t.kind == Kind::Markup
                    && is_closing(&t.text)
                    && t.tag_name().is_some_and(|n| n.eq_ignore_ascii_case("math"));
                buf.push_str(&t.text);
                if closes {
                    break;
                }
            }
        }
        Ok(Token {
            kind: Kind::Markup,
            text: self.text(start, buf, entities),
        })
    }

    /// `\(`…`\)` inclusive, or `\` followed by a maximal (possibly empty) run
    /// of lowercase ASCII letters.
    fn latex(&mut self, start: usize, entities: usize) -> Result<Token<'s>, Error<'s>> {
        let mut buf = String::from("\\");
        if self.stream.peek()? == Some('(') {
            self.stream.next()?;
            buf.push('(');
            let opener_end = self.stream.offset();
            loop {
                let Some(c) = self.stream.next()? else {
                    return Err(Error::UnterminatedMathBlock {
                        opener: self.stream.str_range(start, opener_end),
                    });
                };
                if c == '\\' && self.stream.peek()? == Some(')') {
                    self.stream.next()?;
                    buf.push_str("\\)");
                    break;
                }
                buf.push(c);
            }
        } else {
            loop {
                match self.stream.peek()? {
                    Some(c) if c.is_ascii_lowercase() => {
                        self.stream.next()?;
                        buf.push(c);
                    }
                    _ => break,
                }
            }
        }
        Ok(Token {
            kind: Kind::Latex,
            text: self.text(start, buf, entities),
        })
    }
}
