use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use include_dir::{include_dir, Dir};
use itertools::Itertools;
use thiserror::Error;
use tracing::debug;

use crate::session::Pair;

static DECK_DIR: Dir = include_dir!("src/decks");

const HEADER_MARKERS: [&str; 2] = ["question", "pregunta"];

const TEMPLATE_ROWS: [(&str, &str); 5] = [
    ("What is the capital of France?", "Paris"),
    ("What is 12 x 12?", "144"),
    ("Who wrote Don Quixote?", "Miguel de Cervantes"),
    ("In which year did humans first land on the Moon?", "1969"),
    ("What is the most abundant element?", "Oxygen"),
];

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("could not read deck: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("the deck has no usable question/answer rows")]
    Empty,

    #[error("no built-in deck named {0}")]
    UnknownBuiltin(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum BuiltinDeck {
    Default,
    Demo,
}

impl BuiltinDeck {
    pub fn load(self) -> Result<Vec<Pair>, DeckError> {
        let name = format!("{self}.csv");
        let file = DECK_DIR
            .get_file(&name)
            .ok_or_else(|| DeckError::UnknownBuiltin(name.clone()))?;
        let text = file
            .contents_utf8()
            .ok_or_else(|| DeckError::UnknownBuiltin(name))?;
        parse_pairs(text)
    }
}

/// Parses `question,answer` rows.
///
/// Blank lines are ignored. The first remaining row is treated as a header
/// when it mentions "question" (or "pregunta").
/// Quoted fields may contain commas, and any columns past the second are
/// folded back into the answer. Rows missing either side are skipped.
pub fn parse_pairs(text: &str) -> Result<Vec<Pair>, DeckError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut pairs = Vec::new();
    let mut seen_content = false;
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        if !seen_content {
            seen_content = true;
            let first = record.iter().join(",").to_lowercase();
            if HEADER_MARKERS.iter().any(|m| first.contains(m)) {
                continue;
            }
        }
        if record.len() < 2 {
            debug!(row, "skipping row with fewer than two columns");
            continue;
        }

        let question = record[0].trim();
        let answer = record.iter().skip(1).join(",");
        let answer = answer.trim();
        if question.is_empty() || answer.is_empty() {
            debug!(row, "skipping row with an empty side");
            continue;
        }
        pairs.push(Pair::new(question, answer));
    }

    if pairs.is_empty() {
        return Err(DeckError::Empty);
    }
    Ok(pairs)
}

pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Vec<Pair>, DeckError> {
    let text = fs::read_to_string(path)?;
    parse_pairs(&text)
}

/// A small deck showing the expected layout.
pub fn template_csv() -> String {
    let mut writer = csv::Writer::from_writer(Vec::new());
    // Writing to an in-memory buffer cannot fail on I/O.
    let _ = writer.write_record(["question", "answer"]);
    for (q, a) in TEMPLATE_ROWS {
        let _ = writer.write_record([q, a]);
    }
    let bytes = writer.into_inner().unwrap_or_default();
    String::from_utf8(bytes).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_plain_rows() {
        let pairs = parse_pairs("a,1\nb,2\n").unwrap();
        assert_eq!(pairs, vec![Pair::new("a", "1"), Pair::new("b", "2")]);
    }

    #[test]
    fn skips_header_rows() {
        let pairs = parse_pairs("Question,Answer\nx,y\n").unwrap();
        assert_eq!(pairs, vec![Pair::new("x", "y")]);

        let pairs = parse_pairs("pregunta,respuesta\nx,y\n").unwrap();
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn header_after_leading_blank_lines_is_skipped() {
        let pairs = parse_pairs("   \nquestion,answer\nx,y\n").unwrap();
        assert_eq!(pairs, vec![Pair::new("x", "y")]);

        let pairs = parse_pairs("\n\n , \nQuestion;Answer\nx,y\n").unwrap();
        assert_eq!(pairs, vec![Pair::new("x", "y")]);
    }

    #[test]
    fn only_the_first_row_can_be_a_header() {
        let pairs = parse_pairs("a,1\nquestion,answer\n").unwrap();
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn quoted_commas_and_extra_columns() {
        let text = "\"Paris, France\",capital\nq,one,two\n";
        let pairs = parse_pairs(text).unwrap();
        assert_eq!(pairs[0], Pair::new("Paris, France", "capital"));
        assert_eq!(pairs[1], Pair::new("q", "one,two"));
    }

    #[test]
    fn blank_and_incomplete_rows_are_dropped() {
        let text = "\n  \nonly\nq,\n,a\nkeep , me \n";
        let pairs = parse_pairs(text).unwrap();
        assert_eq!(pairs, vec![Pair::new("keep", "me")]);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_matches!(parse_pairs(""), Err(DeckError::Empty));
        assert_matches!(parse_pairs("question,answer\n"), Err(DeckError::Empty));
    }

    #[test]
    fn builtin_decks_load() {
        let default = BuiltinDeck::Default.load().unwrap();
        assert_eq!(default.len(), 11);
        let demo = BuiltinDeck::Demo.load().unwrap();
        assert_eq!(demo.len(), 6);
        assert_eq!(demo[2].question, "Who wrote \"Don Quixote\"?");
    }

    #[test]
    fn template_parses_back() {
        let pairs = parse_pairs(&template_csv()).unwrap();
        assert_eq!(pairs.len(), TEMPLATE_ROWS.len());
        assert_eq!(pairs[0].answer, "Paris");
    }

    #[test]
    fn load_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.csv");
        std::fs::write(&path, "one,1\ntwo,2\n").unwrap();
        assert_eq!(load_file(&path).unwrap().len(), 2);

        assert_matches!(
            load_file(dir.path().join("missing.csv")),
            Err(DeckError::Io(_))
        );
    }
}
