//! Command-stream parsing and execution.
//!
//! A stream is whitespace-separated words: `k <key>` inserts a key and
//! `q <lo> <hi>` counts the keys in `[lo, hi]`. Any other word is reported
//! as `unknown command` and skipped, like the original driver. Malformed
//! numbers are the shell's problem, not the engine's: they abort parsing
//! with a line-numbered error before the engine sees anything.

use std::collections::BTreeSet;
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};

use ordset::OrdSet;

/// One well-typed command for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Insert(i64),
    Query(i64, i64),
}

/// One parsed stream element, unknown words preserved for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Command(Command),
    Unknown(String),
}

#[derive(Debug)]
pub enum ScriptError {
    BadNumber { line: usize, token: String },
    MissingArgument { line: usize, command: char },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::BadNumber { line, token } => {
                write!(f, "line {line}: expected a number, got {token:?}")
            }
            ScriptError::MissingArgument { line, command } => {
                write!(f, "line {line}: command '{command}' is missing an argument")
            }
        }
    }
}

impl Error for ScriptError {}

/// Parse a whole command stream. Arguments may be separated by any
/// whitespace, including newlines, matching the original token-based reader.
pub fn parse(input: &str) -> Result<Vec<Item>, ScriptError> {
    let mut tokens = input
        .lines()
        .enumerate()
        .flat_map(|(i, line)| line.split_whitespace().map(move |tok| (i + 1, tok)));

    let mut items = Vec::new();
    while let Some((line, word)) = tokens.next() {
        match word {
            "k" => {
                let key = next_number(&mut tokens, line, 'k')?;
                items.push(Item::Command(Command::Insert(key)));
            }
            "q" => {
                let lo = next_number(&mut tokens, line, 'q')?;
                let hi = next_number(&mut tokens, line, 'q')?;
                items.push(Item::Command(Command::Query(lo, hi)));
            }
            other => items.push(Item::Unknown(other.to_owned())),
        }
    }
    Ok(items)
}

fn next_number<'a>(
    tokens: &mut impl Iterator<Item = (usize, &'a str)>,
    line: usize,
    command: char,
) -> Result<i64, ScriptError> {
    let (line, token) = tokens
        .next()
        .ok_or(ScriptError::MissingArgument { line, command })?;
    token.parse().map_err(|_| ScriptError::BadNumber {
        line,
        token: token.to_owned(),
    })
}

/// The operations a command stream needs from its backing container.
/// Implemented by the red-black engine and by a `BTreeSet` reference oracle.
pub trait Engine {
    fn name(&self) -> &'static str;
    fn insert(&mut self, key: i64) -> bool;
    fn range_query(&self, lo: i64, hi: i64) -> usize;
}

#[derive(Default)]
pub struct TreeEngine {
    set: OrdSet<i64>,
}

impl Engine for TreeEngine {
    fn name(&self) -> &'static str {
        "rbtree"
    }

    fn insert(&mut self, key: i64) -> bool {
        self.set.insert(key)
    }

    fn range_query(&self, lo: i64, hi: i64) -> usize {
        self.set.range_query(&lo, &hi)
    }
}

/// Standard-library oracle with the same strict `lo < hi` range convention.
#[derive(Default)]
pub struct StdEngine {
    set: BTreeSet<i64>,
}

impl Engine for StdEngine {
    fn name(&self) -> &'static str {
        "std"
    }

    fn insert(&mut self, key: i64) -> bool {
        self.set.insert(key)
    }

    fn range_query(&self, lo: i64, hi: i64) -> usize {
        if lo < hi {
            self.set.range(lo..=hi).count()
        } else {
            0
        }
    }
}

/// What happened while feeding a stream to an engine. Query answers are in
/// stream order; the printers re-interleave them with the unknown-word
/// complaints.
pub struct RunOutcome {
    pub answers: Vec<usize>,
    pub inserted: usize,
    pub duplicates: usize,
    pub unknown: usize,
    pub elapsed: Duration,
}

pub fn execute(items: &[Item], engine: &mut dyn Engine) -> RunOutcome {
    let mut outcome = RunOutcome {
        answers: Vec::new(),
        inserted: 0,
        duplicates: 0,
        unknown: 0,
        elapsed: Duration::ZERO,
    };

    let start = Instant::now();
    for item in items {
        match item {
            Item::Command(Command::Insert(key)) => {
                if engine.insert(*key) {
                    outcome.inserted += 1;
                } else {
                    outcome.duplicates += 1;
                }
            }
            Item::Command(Command::Query(lo, hi)) => {
                outcome.answers.push(engine.range_query(*lo, *hi));
            }
            Item::Unknown(_) => outcome.unknown += 1,
        }
    }
    outcome.elapsed = start.elapsed();
    outcome
}
