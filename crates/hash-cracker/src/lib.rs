//! Parallel brute-force search of passwords behind MD5 / SHA-256 digests.
//!
//! A [`Keyspace`] is split into one contiguous [`Partition`] per worker, each
//! worker asks an [`Oracle`] about every candidate of its partition and
//! streams the accepted ones back to the [`Cracker`].

pub mod config;
pub mod cracker;
pub mod digest;
pub mod keyspace;
pub mod model;
pub mod oracle;
pub mod partition;
pub mod utils;

mod error;

pub use config::{DEFAULT_ALPHABET, DEFAULT_LENGTH};
pub use cracker::{CancelToken, Cracker};
pub use digest::{hex_digest, Algorithm};
pub use error::{Error, Result};
pub use keyspace::{BruteForce, Keyspace, Wordlist};
pub use model::{MatchReport, SearchResult, WorkerSummary};
pub use oracle::http_login::HttpLoginOracle;
pub use oracle::targets::TargetSet;
pub use oracle::Oracle;
pub use partition::Partition;

/// Sweep every lowercase 5 letters candidate against `targets`.
pub fn run_search(targets: &TargetSet, worker_count: usize) -> Result<SearchResult> {
    let cracker = Cracker::new(worker_count)?;
    let keyspace = BruteForce::new(DEFAULT_ALPHABET, DEFAULT_LENGTH)?;
    cracker.run(&keyspace, targets, |_| {})
}
