pub mod http_login;
pub mod targets;

use crate::Result;

/// Answers whether a candidate is one of the secrets being searched for.
pub trait Oracle: Send + Sync {
    fn name(&self) -> String;

    /// Number of distinct secrets behind the oracle, when known.
    fn target_count(&self) -> Option<usize>;

    /// `Err` means the trial itself failed (e.g. network). It is never
    /// retried by the search and is not a verdict.
    fn verify(&self, candidate: &str) -> Result<bool>;
}
