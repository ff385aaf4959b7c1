//! Randomized end-to-end case generation: a command stream plus the
//! expected answers, computed against a `BTreeSet` oracle.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct GenOptions {
    /// Total commands emitted (inserts plus queries).
    pub commands: usize,
    /// Keys and query bounds are drawn from `1..=max_key`.
    pub max_key: i64,
    /// Fixed seed for reproducible cases; `None` draws one from the OS.
    pub seed: Option<u64>,
}

pub struct GeneratedCase {
    /// The `k`/`q` command stream.
    pub data: String,
    /// One expected count per query line.
    pub answers: String,
    /// The seed actually used, so a case can be regenerated.
    pub seed: u64,
}

/// Emit a command stream in the original generator's shape: roughly a third
/// of the commands are queries, duplicate keys are redrawn, and query bounds
/// are ordered. Bounds are additionally kept strictly ordered (`lo < hi`) so
/// the expected counts follow the engine's empty-single-point convention.
pub fn generate(opts: &GenOptions) -> GeneratedCase {
    let seed = opts.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut rng = StdRng::seed_from_u64(seed);

    let max_key = opts.max_key.max(2);
    let max_queries = opts.commands / 3;

    let mut data = String::new();
    let mut answers = String::new();
    let mut oracle = BTreeSet::new();

    let mut emitted = 0;
    let mut query_count = 0;
    while emitted < opts.commands {
        let is_query = query_count < max_queries && emitted > 0 && rng.gen_range(0..3) == 0;

        if is_query {
            let mut lo = rng.gen_range(1..=max_key);
            let mut hi = rng.gen_range(1..=max_key);
            if lo > hi {
                std::mem::swap(&mut lo, &mut hi);
            }
            if lo == hi {
                // Keep the bounds strictly ordered.
                if hi < max_key {
                    hi += 1;
                } else {
                    lo -= 1;
                }
            }
            writeln!(data, "q {lo} {hi}").unwrap();
            writeln!(answers, "{}", oracle.range(lo..=hi).count()).unwrap();
            query_count += 1;
            emitted += 1;
        } else {
            let key = rng.gen_range(1..=max_key);
            if oracle.insert(key) {
                writeln!(data, "k {key}").unwrap();
                emitted += 1;
            } else if oracle.len() as i64 == max_key {
                // Key space exhausted; only queries can make progress.
                query_count = 0;
            }
        }
    }

    GeneratedCase {
        data,
        answers,
        seed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{self, TreeEngine};

    #[test]
    fn generated_case_is_reproducible() {
        let opts = GenOptions {
            commands: 60,
            max_key: 100,
            seed: Some(7),
        };
        let a = generate(&opts);
        let b = generate(&opts);
        assert_eq!(a.data, b.data);
        assert_eq!(a.answers, b.answers);
        assert_eq!(a.seed, 7);
    }

    #[test]
    fn generated_answers_match_the_engine() {
        let case = generate(&GenOptions {
            commands: 200,
            max_key: 150,
            seed: Some(0xCA5E),
        });

        let items = script::parse(&case.data).expect("generator emitted a bad stream");
        let mut engine = TreeEngine::default();
        let outcome = script::execute(&items, &mut engine);

        let expected: Vec<usize> = case
            .answers
            .lines()
            .map(|l| l.parse().unwrap())
            .collect();
        assert_eq!(outcome.answers, expected);
        assert_eq!(outcome.duplicates, 0, "generator must not emit duplicates");
    }

    #[test]
    fn bounds_are_always_strictly_ordered() {
        let case = generate(&GenOptions {
            commands: 300,
            max_key: 50,
            seed: Some(3),
        });
        for line in case.data.lines().filter(|l| l.starts_with('q')) {
            let mut parts = line.split_whitespace().skip(1);
            let lo: i64 = parts.next().unwrap().parse().unwrap();
            let hi: i64 = parts.next().unwrap().parse().unwrap();
            assert!(lo < hi, "bad query bounds in {line:?}");
        }
    }
}
