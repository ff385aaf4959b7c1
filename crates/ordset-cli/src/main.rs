//! Command-line shell around the `ordset` engine: feed it command streams,
//! generate randomized end-to-end cases, and dump Graphviz visualizations.
#![forbid(unsafe_code)]

mod gen;
mod script;

use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde_derive::Serialize;

use ordset::OrdSet;
use script::{Command as StreamCommand, Engine, Item, StdEngine, TreeEngine};

// ----------------------------------------------------------------------------
// Main driver

fn main() {
    let opt = Opt::parse();
    if let Err(e) = dispatch(&opt) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn dispatch(opt: &Opt) -> Result<(), Box<dyn Error>> {
    match &opt.command {
        Cmd::Run {
            input,
            engine,
            timing,
            json,
        } => run(input.as_deref(), *engine, *timing, *json),
        Cmd::Gen {
            commands,
            max_key,
            seed,
            output,
            case,
        } => generate(*commands, *max_key, *seed, output, *case),
        Cmd::Dot { input, output, svg } => dot(input.as_deref(), output, svg.as_deref()),
    }
}

// ----------------------------------------------------------------------------
// Options

#[derive(Parser, Debug)]
#[command(
    name = "ordset-tools",
    about = "Drive the red-black ordered-set engine from k/q command streams."
)]
struct Opt {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Execute a command stream: `k <key>` inserts, `q <lo> <hi>` prints the
    /// number of keys in [lo, hi].
    Run {
        /// Read the stream from a file instead of standard input.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Container backing the stream.
        #[arg(long, value_enum, default_value_t = EngineKind::Rbtree)]
        engine: EngineKind,

        /// Suppress per-query output and print the total elapsed time.
        #[arg(long)]
        timing: bool,

        /// Emit a JSON report instead of plain text.
        #[arg(short = 'j', long)]
        json: bool,
    },
    /// Generate a random command stream plus its expected answers.
    Gen {
        /// Total number of commands to emit.
        #[arg(long, default_value_t = 1000)]
        commands: usize,

        /// Keys and bounds are drawn from 1..=MAX_KEY.
        #[arg(long = "max-key", default_value_t = 1000)]
        max_key: i64,

        /// Seed for reproducible output; random when omitted.
        #[arg(long)]
        seed: Option<u64>,

        /// Directory receiving data/<case>.dat and answ/<case>.res.
        #[arg(short, long, default_value = "cases")]
        output: PathBuf,

        /// Case index used in the file names.
        #[arg(long, default_value_t = 0)]
        case: usize,
    },
    /// Build a tree from a command stream's inserts and write a Graphviz dump.
    Dot {
        /// Read the stream from a file instead of standard input.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Path of the .gv file to write.
        #[arg(short, long)]
        output: PathBuf,

        /// Also render an SVG to this path (requires the `dot` binary).
        #[arg(long)]
        svg: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum EngineKind {
    /// The red-black tree engine.
    Rbtree,
    /// A std::collections::BTreeSet reference oracle.
    Std,
}

// ----------------------------------------------------------------------------
// run

#[derive(Serialize)]
struct RunReport<'a> {
    engine: &'a str,
    commands: usize,
    inserted: usize,
    duplicates: usize,
    unknown: usize,
    answers: &'a [usize],
    elapsed_ms: f64,
}

fn run(
    input: Option<&Path>,
    engine: EngineKind,
    timing: bool,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let text = read_stream(input)?;
    let items = script::parse(&text)?;

    let mut engine: Box<dyn Engine> = match engine {
        EngineKind::Rbtree => Box::<TreeEngine>::default(),
        EngineKind::Std => Box::<StdEngine>::default(),
    };
    let outcome = script::execute(&items, engine.as_mut());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if json {
        let report = RunReport {
            engine: engine.name(),
            commands: items.len(),
            inserted: outcome.inserted,
            duplicates: outcome.duplicates,
            unknown: outcome.unknown,
            answers: &outcome.answers,
            elapsed_ms: outcome.elapsed.as_secs_f64() * 1e3,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else if timing {
        writeln!(
            out,
            "Total time: {:.3} ms",
            outcome.elapsed.as_secs_f64() * 1e3
        )?;
    } else {
        // Replay the stream order, interleaving answers with complaints.
        let mut answers = outcome.answers.iter();
        for item in &items {
            match item {
                Item::Command(StreamCommand::Query(..)) => {
                    let n = answers.next().expect("one answer per query");
                    write!(out, "{n} ")?;
                }
                Item::Unknown(_) => writeln!(out, "unknown command")?,
                Item::Command(StreamCommand::Insert(_)) => {}
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

fn read_stream(input: Option<&Path>) -> Result<String, Box<dyn Error>> {
    match input {
        Some(path) => {
            fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()).into())
        }
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

// ----------------------------------------------------------------------------
// gen

fn generate(
    commands: usize,
    max_key: i64,
    seed: Option<u64>,
    output: &Path,
    case: usize,
) -> Result<(), Box<dyn Error>> {
    let generated = gen::generate(&gen::GenOptions {
        commands,
        max_key,
        seed,
    });

    let data_dir = output.join("data");
    let answ_dir = output.join("answ");
    fs::create_dir_all(&data_dir)?;
    fs::create_dir_all(&answ_dir)?;

    let data_path = data_dir.join(format!("{case}.dat"));
    let answ_path = answ_dir.join(format!("{case}.res"));
    fs::write(&data_path, &generated.data)?;
    fs::write(&answ_path, &generated.answers)?;

    eprintln!(
        "wrote {} and {} (seed {})",
        data_path.display(),
        answ_path.display(),
        generated.seed
    );
    Ok(())
}

// ----------------------------------------------------------------------------
// dot

fn dot(input: Option<&Path>, output: &Path, svg: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let text = read_stream(input)?;
    let items = script::parse(&text)?;

    let mut set = OrdSet::new();
    for item in &items {
        if let Item::Command(StreamCommand::Insert(key)) = item {
            set.insert(*key);
        }
    }

    let mut gv = fs::File::create(output)
        .map_err(|e| format!("{}: {e}", output.display()))?;
    ordset::write_dot(&set, &mut gv)?;

    if let Some(svg) = svg {
        let status = std::process::Command::new("dot")
            .arg(output)
            .arg("-Tsvg")
            .arg("-o")
            .arg(svg)
            .status()
            .map_err(|e| format!("running dot: {e}"))?;
        if !status.success() {
            return Err(format!("dot exited with {status}").into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_subcommand_writes_a_digraph() {
        let dir = tempfile::tempdir().unwrap();
        let stream = dir.path().join("in.dat");
        let out = dir.path().join("tree.gv");
        fs::write(&stream, "k 2 k 1 k 3 q 1 3").unwrap();

        dot(Some(stream.as_path()), &out, None).unwrap();

        let text = fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("digraph G {"));
        assert!(text.contains("key: 2"));
    }

    #[test]
    fn gen_subcommand_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        generate(30, 100, Some(11), dir.path(), 4).unwrap();

        let data = fs::read_to_string(dir.path().join("data/4.dat")).unwrap();
        let answ = fs::read_to_string(dir.path().join("answ/4.res")).unwrap();
        assert!(data.lines().all(|l| l.starts_with("k ") || l.starts_with("q ")));
        let queries = data.lines().filter(|l| l.starts_with("q ")).count();
        assert_eq!(queries, answ.lines().count());
    }
}
