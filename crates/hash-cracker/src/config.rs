use crate::oracle::targets::TargetSet;
use crate::Result;
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use std::thread;
use tracing::{debug, info};

// region:        --- Constants

// keyspace
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";
pub const DEFAULT_LENGTH: usize = 5;

// targets used when none are configured
pub const DEFAULT_TARGETS: &[&str] = &[
    "1115dd800feaacefdf481f1f9070374a2a81e27880f187396db67958b207cbad",
    "3a7bd3e2360a3d29eea436fcfb7e44c735d117c42d1c1835420b6b9942dd4f1b",
    "74e1bb62f8dabb8125a58852b63bdf6eaef667cb56ac7f7cdba6d7305c50a22f",
    "7a68f09bd992671bb3b19a5e70b7827e",
];

// http login
pub const HTTP_REQUEST_TIMEOUT_MS: u64 = 7500;
pub const HTTP_USER_AGENT: &str = "hash-cracker";
pub const DEFAULT_FAILURE_MARKER: &str = "Username and/or password incorrect";

// endregion:     --- Constants

pub fn default_workers() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Merge literal targets with the lines of `file` (blank lines and `#`
/// comments skipped). Falls back to [`DEFAULT_TARGETS`] only when neither
/// was given, an empty file is an error.
pub fn load_targets(literals: &[String], file: Option<&Path>) -> Result<TargetSet> {
    if literals.is_empty() && file.is_none() {
        info!(
            "No target given, using the {} default targets",
            DEFAULT_TARGETS.len()
        );
        return TargetSet::parse(DEFAULT_TARGETS);
    }

    let mut items: Vec<String> = literals.to_vec();

    if let Some(path) = file {
        let content = fs::read_to_string(path)?;
        let before = items.len();
        items.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(String::from),
        );
        debug!("{} targets read from {:?}", items.len() - before, path);
    }

    TargetSet::parse(items)
}
