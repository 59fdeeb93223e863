use crate::Str;

/// Error encountered while scanning marked-up text.
///
/// All four conditions are fatal for the whole call: the scanner cannot
/// resynchronize inside a malformed construct, and partial output would
/// corrupt highlighting downstream.
#[derive(Debug, PartialEq, Eq)]
pub enum Error<'a> {
    /// A tag opened with `<` but the input ended before the closing `>`.
    UnterminatedMarkup { tag: Str<'a> },

    /// A `\(` or `<math>` block never reached its closing delimiter.
    UnterminatedMathBlock { opener: Str<'a> },

    /// An entity opened with `&` but the input ended before the closing `;`.
    MalformedEntity { entity: Str<'a> },

    /// An entity names an entry that is not in the entity table.
    UnknownEntity { entity: Str<'a>, name: Str<'a> },
}

impl<'a> Error<'a> {
    pub fn message(&self) -> String {
        use Error::*;
        match self {
            UnterminatedMarkup { .. } => "A markup tag is never closed".into(),
            UnterminatedMathBlock { .. } => "A math block is never closed".into(),
            MalformedEntity { .. } => "A character entity is missing its closing `;`".into(),
            UnknownEntity { name, .. } => {
                format!["The character entity `{name}` is not recognized"]
            }
        }
    }

    pub fn main_span(&self) -> std::ops::Range<usize> {
        use Error::*;
        match self {
            UnterminatedMarkup { tag } => tag.span(),
            UnterminatedMathBlock { opener } => opener.span(),
            MalformedEntity { entity } => entity.span(),
            UnknownEntity { entity, .. } => entity.span(),
        }
    }

    pub fn labels(&self) -> Vec<ErrorLabel> {
        use Error::*;
        match self {
            UnterminatedMarkup { tag } => vec![ErrorLabel {
                span: tag.span(),
                text: "The tag opens here and the input ends before `>`".into(),
            }],
            UnterminatedMathBlock { opener } => vec![ErrorLabel {
                span: opener.span(),
                text: "The math block opens here and is never closed".into(),
            }],
            MalformedEntity { entity } => vec![ErrorLabel {
                span: entity.span(),
                text: "The entity starts here and the input ends before `;`".into(),
            }],
            UnknownEntity { entity, name } => vec![ErrorLabel {
                span: entity.span(),
                text: format!["`{}` is not in the entity table", name.str()],
            }],
        }
    }

    pub fn notes(&self) -> Vec<String> {
        use Error::*;
        match self {
            UnknownEntity { .. } => vec![
                "The recognized entities are configured in `Tables::entities`".to_string(),
            ],
            UnterminatedMarkup { .. } | UnterminatedMathBlock { .. } | MalformedEntity { .. } => {
                vec![]
            }
        }
    }
}

/// Label on an error message.
///
/// A label identifies a particular piece of source code and some
/// information about it.
pub struct ErrorLabel {
    pub span: std::ops::Range<usize>,
    pub text: String,
}

impl<'a> Error<'a> {
    #[cfg(feature = "ariadne")]
    pub fn ariadne_report(
        &self,
        file_name: &'a str,
    ) -> ariadne::Report<'static, (&str, std::ops::Range<usize>)> {
        let mut report =
            ariadne::Report::build(ariadne::ReportKind::Error, (file_name, self.main_span()))
                .with_message(self.message());
        for label in self.labels() {
            report = report.with_label(
                ariadne::Label::new((file_name, label.span))
                    .with_message(label.text)
                    .with_color(ariadne::Color::BrightRed),
            );
        }
        for note in self.notes() {
            report = report.with_note(note);
        }
        report.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_err(source: &str) -> Error {
        crate::annotate_words(source, "c").unwrap_err()
    }

    macro_rules! error_tests {
        ( $(
            ($name: ident, $source: expr, Error:: $want_variant: ident,),
        )+ ) => {
            $(
            #[test]
            fn $name() {
                let source = $source;
                let err = get_err(source);
                println!["got: {err:?}"];
                assert!(matches!(err, Error::$want_variant {..}));
            }
            )+
        };
    }
    error_tests!(
        (
            unterminated_markup,
            "text <b unfinished",
            Error::UnterminatedMarkup,
        ),
        (
            unterminated_math_tag,
            "<math><mi>x</mi>",
            Error::UnterminatedMathBlock,
        ),
        (
            unterminated_latex_math,
            r"\(x + y",
            Error::UnterminatedMathBlock,
        ),
        (
            malformed_entity,
            "broken &am",
            Error::MalformedEntity,
        ),
        (
            unknown_entity,
            "what is &zzz; here",
            Error::UnknownEntity,
        ),
    );

    #[test]
    fn unknown_entity_span_and_message() {
        let err = get_err("ab &zzz; cd");
        assert_eq!(err.main_span(), 3..8);
        assert_eq!(err.message(), "The character entity `zzz` is not recognized");
    }

    #[test]
    fn unterminated_markup_span() {
        let err = get_err("text <b unfinished");
        assert_eq!(err.main_span(), 5..18);
    }
}
