use super::Oracle;
use crate::digest::{hex_digest, Algorithm};
use crate::{Error, Result};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Read-only set of target digests, lowercase hex.
#[derive(Debug, Clone)]
pub struct TargetSet {
    digests: HashSet<String>,
    // algorithms with at least one target, in `Algorithm::ALL` order
    algorithms: Vec<Algorithm>,
}

impl TargetSet {
    pub fn parse<I, S>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut digests = HashSet::new();
        let mut present = BTreeSet::new();

        for item in items {
            let digest = item.as_ref().trim().to_ascii_lowercase();
            let algorithm = Algorithm::from_hex_len(digest.len())
                .filter(|_| digest.chars().all(|c| c.is_ascii_hexdigit()))
                .ok_or_else(|| Error::InvalidTarget(item.as_ref().to_string()))?;

            present.insert(algorithm);
            digests.insert(digest);
        }

        if digests.is_empty() {
            return Err(Error::EmptyTargets);
        }

        let algorithms: Vec<Algorithm> = present.into_iter().collect();
        debug!("{} targets over {:?}", digests.len(), algorithms);

        Ok(Self {
            digests,
            algorithms,
        })
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    pub fn contains(&self, digest: &str) -> bool {
        self.digests.contains(digest)
    }

    pub fn algorithms(&self) -> &[Algorithm] {
        &self.algorithms
    }

    /// First algorithm whose digest of `candidate` is a target.
    pub fn matching_algorithm(&self, candidate: &str) -> Option<Algorithm> {
        let bytes = candidate.as_bytes();
        self.algorithms
            .iter()
            .copied()
            .find(|algo| self.digests.contains(&hex_digest(*algo, bytes)))
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.matching_algorithm(candidate).is_some()
    }
}

impl Oracle for TargetSet {
    fn name(&self) -> String {
        let algorithms: Vec<&str> = self.algorithms.iter().map(|algo| algo.name()).collect();
        format!("digests/{}", algorithms.join("+"))
    }

    fn target_count(&self) -> Option<usize> {
        Some(self.digests.len())
    }

    fn verify(&self, candidate: &str) -> Result<bool> {
        Ok(self.matches(candidate))
    }
}
