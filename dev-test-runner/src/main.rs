//! Runs every conformance suite under `fixtures/`.
//!
//! ```text
//! cargo run -p dev-test-runner -- [CASE_REGEX]
//! ```
use std::path::PathBuf;
use std::process::ExitCode;

use once_cell::sync::Lazy;
use regex::Regex;
use rutypi::fixture::{discover, Suite};

static FIXTURE_DIR: Lazy<PathBuf> =
    Lazy::new(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../fixtures"));

fn main() -> ExitCode {
    let filter = match std::env::args().nth(1).map(|pattern| Regex::new(&pattern)) {
        None => None,
        Some(Ok(regex)) => Some(regex),
        Some(Err(error)) => {
            eprintln!("invalid case filter: {error}");
            return ExitCode::from(2);
        }
    };

    let suites = match discover(&FIXTURE_DIR) {
        Ok(suites) => suites,
        Err(error) => {
            eprintln!("failed to list {}: {error}", FIXTURE_DIR.display());
            return ExitCode::from(2);
        }
    };

    let mut failed = 0usize;
    let mut total = 0usize;
    for path in suites {
        let suite = match Suite::load(&path) {
            Ok(suite) => suite,
            Err(error) => {
                eprintln!("FAIL {}: {error}", path.display());
                failed += 1;
                continue;
            }
        };
        let selected = |name: &str| filter.as_ref().is_none_or(|regex| regex.is_match(name));
        total += suite.cases.iter().filter(|case| selected(&case.name)).count();
        let mismatches = suite.run_filtered(|case| selected(&case.name));
        for mismatch in &mismatches {
            let actual = serde_json::to_string_pretty(&mismatch.actual).unwrap_or_default();
            eprintln!(
                "FAIL {} :: {}\n  expected: {:?}\n  actual: {actual}",
                path.display(),
                mismatch.case,
                mismatch.expected,
            );
        }
        failed += mismatches.len();
    }

    println!("{} passed, {failed} failed", total.saturating_sub(failed));
    if failed == 0 { ExitCode::SUCCESS } else { ExitCode::from(1) }
}
