//! Command-line front end: loads a word list, optionally counts word usage in
//! a text, then answers prefix queries once or interactively.

use std::error::Error;
use std::io::{BufRead, BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

use autocomplete_trie::{clean_word, has_special, Dictionary, PrefixAnalyzer};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "autocomplete", about = "Prefix autocomplete over a word list")]
struct Args {
    /// Vocabulary file, whitespace separated.
    #[arg(short, long)]
    words: PathBuf,

    /// Text file whose word occurrences set each word's importance.
    #[arg(short, long)]
    text: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Most important words starting with PREFIX.
    Top {
        prefix: String,

        /// Number of words to return.
        #[arg(short, default_value = "5")]
        k: NonZeroUsize,
    },
    /// Average importance of the words starting with PREFIX.
    Average { prefix: String },
    /// Most probable character after PREFIX.
    Predict { prefix: String },
    /// Read queries from stdin: `top K PREFIX`, `avg PREFIX`, `next PREFIX`, `quit`.
    Repl,
}

/// Cleans a user-supplied prefix; `None` if nothing usable is left.
fn read_prefix(raw: &str) -> Option<String> {
    let prefix = clean_word(raw);
    if prefix.is_empty() || has_special(&prefix) {
        None
    } else {
        Some(prefix)
    }
}

fn print_top<W: Write>(
    out: &mut W,
    analyzer: &PrefixAnalyzer<'_>,
    prefix: &str,
    k: usize,
) -> std::io::Result<()> {
    let words = analyzer.top_k_frequent_words_with_prefix(prefix, k);
    if words.is_empty() {
        writeln!(out, "There are no words starting with this prefix.")?;
        return Ok(());
    }
    if words.len() == k {
        writeln!(out, "The top {k} words with prefix {prefix} are:")?;
    } else {
        writeln!(out, "There are only {} words with prefix {prefix}:", words.len())?;
    }
    for word in words {
        writeln!(out, "{word}")?;
    }
    Ok(())
}

fn print_average<W: Write>(
    out: &mut W,
    analyzer: &PrefixAnalyzer<'_>,
    prefix: &str,
) -> std::io::Result<()> {
    let average = analyzer.average_frequency_of_prefix(prefix);
    writeln!(out, "The average frequency of words with prefix {prefix} is: {average}")
}

/// Returns `false` when no prediction could be made.
fn print_prediction<W: Write>(
    out: &mut W,
    analyzer: &PrefixAnalyzer<'_>,
    prefix: &str,
) -> std::io::Result<bool> {
    match analyzer.predict_next_letter(prefix) {
        Ok(c) => {
            writeln!(out, "The most probable character after prefix {prefix} is: {c}")?;
            Ok(true)
        }
        Err(e) => {
            writeln!(out, "{e}")?;
            Ok(false)
        }
    }
}

/// Answers one query per input line until `quit`, `exit` or end of input.
fn repl<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    analyzer: &PrefixAnalyzer<'_>,
) -> std::io::Result<()> {
    for line in input.lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        let args: Vec<&str> = parts.collect();

        match (command, args.as_slice()) {
            ("quit" | "exit", _) => break,
            ("top", [k, raw]) => match (k.parse::<NonZeroUsize>(), read_prefix(raw)) {
                (Ok(k), Some(prefix)) => print_top(out, analyzer, &prefix, k.get())?,
                (Err(_), _) => writeln!(out, "Invalid k {k:?}: give a number greater than 0.")?,
                (_, None) => writeln!(out, "Invalid prefix {raw:?}.")?,
            },
            ("avg", [raw]) => match read_prefix(raw) {
                Some(prefix) => print_average(out, analyzer, &prefix)?,
                None => writeln!(out, "Invalid prefix {raw:?}.")?,
            },
            ("next", [raw]) => match read_prefix(raw) {
                Some(prefix) => {
                    print_prediction(out, analyzer, &prefix)?;
                }
                None => writeln!(out, "Invalid prefix {raw:?}.")?,
            },
            _ => writeln!(out, "Commands: top K PREFIX | avg PREFIX | next PREFIX | quit")?,
        }
        writeln!(out)?;
        out.flush()?;
    }
    Ok(())
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut dictionary = Dictionary::new();
    dictionary.load_words_file(&args.words)?;
    if let Some(text) = &args.text {
        dictionary.update_importance_file(text)?;
    }
    log::info!(
        "dictionary ready: {} words in {} nodes",
        dictionary.trie().len(),
        dictionary.trie().node_count()
    );

    let analyzer = dictionary.analyzer();
    let out = std::io::stdout();
    let mut out = BufWriter::new(out.lock());

    let status = match args.command {
        Command::Repl => {
            repl(std::io::stdin().lock(), &mut out, &analyzer)?;
            ExitCode::SUCCESS
        }
        Command::Top { prefix, k } => match read_prefix(&prefix) {
            Some(prefix) => {
                print_top(&mut out, &analyzer, &prefix, k.get())?;
                ExitCode::SUCCESS
            }
            None => invalid_prefix(&prefix),
        },
        Command::Average { prefix } => match read_prefix(&prefix) {
            Some(prefix) => {
                print_average(&mut out, &analyzer, &prefix)?;
                ExitCode::SUCCESS
            }
            None => invalid_prefix(&prefix),
        },
        Command::Predict { prefix } => match read_prefix(&prefix) {
            Some(prefix) => {
                if print_prediction(&mut out, &analyzer, &prefix)? {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                }
            }
            None => invalid_prefix(&prefix),
        },
    };
    out.flush()?;
    Ok(status)
}

fn invalid_prefix(raw: &str) -> ExitCode {
    eprintln!("Invalid prefix {raw:?}: use letters only.");
    ExitCode::FAILURE
}
