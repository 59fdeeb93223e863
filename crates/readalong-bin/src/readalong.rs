use clap::Parser;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

/// Readalong: wrap marked-up text in highlight spans
#[derive(Parser)]
#[clap(version)]
struct Cli {
    #[clap(subcommand)]
    sub_command: SubCommand,
}

#[derive(Parser)]
enum SubCommand {
    /// Wrap every word, number, and math fragment in its own span.
    Words(Pass),
    /// Wrap each sentence in one span.
    Sentences(Pass),
    /// Re-tag each paragraph with the style class.
    Paragraphs(Pass),
}

fn main() {
    let args: Cli = Cli::parse();
    let result = match args.sub_command {
        SubCommand::Words(p) => p.run(Granularity::Words),
        SubCommand::Sentences(p) => p.run(Granularity::Sentences),
        SubCommand::Paragraphs(p) => p.run(Granularity::Paragraphs),
    };
    if let Err(err) = result {
        eprintln!["{err}"];
        std::process::exit(1);
    }
}

enum Granularity {
    Words,
    Sentences,
    Paragraphs,
}

/// Arguments shared by the three passes.
#[derive(Parser)]
struct Pass {
    /// Path to the input file; standard input when omitted.
    path: Option<PathBuf>,

    /// Style class embedded into the emitted spans.
    #[clap(long, default_value = "readalong")]
    class: String,
}

impl Pass {
    fn run(self, granularity: Granularity) -> Result<(), String> {
        let (name, source) = match &self.path {
            Some(path) => match fs::read_to_string(path) {
                Ok(source) => (path.to_string_lossy().into_owned(), source),
                Err(err) => {
                    return Err(format!["failed to open file {:?}: {err}", path]);
                }
            },
            None => {
                let mut source = String::new();
                if let Err(err) = std::io::stdin().read_to_string(&mut source) {
                    return Err(format!["failed to read standard input: {err}"]);
                }
                ("<stdin>".to_string(), source)
            }
        };
        let annotated = match granularity {
            Granularity::Words => readalong::annotate_words(&source, &self.class),
            Granularity::Sentences => readalong::annotate_sentences(&source, &self.class),
            Granularity::Paragraphs => readalong::annotate_paragraphs(&source, &self.class),
        };
        match annotated {
            Ok(annotated) => {
                print!("{annotated}");
                Ok(())
            }
            Err(err) => {
                let cache: (&str, _) = (&name, ariadne::Source::from(source.clone()));
                err.ariadne_report(&name).eprint(cache).unwrap();
                Err("the input could not be annotated".to_string())
            }
        }
    }
}
