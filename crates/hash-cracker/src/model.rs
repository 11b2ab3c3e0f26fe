use crate::partition::Partition;
use crate::Result;
use serde::{Serialize, Serializer};
use serde_json::to_string_pretty;
use std::collections::BTreeSet;
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

// region:        --- Models

/// A candidate accepted by the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    pub worker_id: usize,
    pub candidate: String,
    /// Since the start of the reporting worker, not of the search.
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkerSummary {
    pub worker_id: usize,
    pub partition: Partition,
    pub tried: u64,
    pub failed_trials: u64,
    /// Left its partition before the end.
    pub stopped: bool,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

/// Outcome of a whole search.
///
/// `matches` is in arrival order. Workers run concurrently so the order
/// across workers changes from run to run; only the set of matches is
/// stable.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub keyspace_size: u64,
    pub matches: Vec<MatchReport>,
    /// Sorted by worker id.
    pub workers: Vec<WorkerSummary>,
    /// At least one worker stopped before the end of its partition, on
    /// cancellation or once every target was found.
    pub stopped_early: bool,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

impl SearchResult {
    pub fn candidates_tried(&self) -> u64 {
        self.workers.iter().map(|worker| worker.tried).sum()
    }

    pub fn failed_trials(&self) -> u64 {
        self.workers.iter().map(|worker| worker.failed_trials).sum()
    }

    pub fn is_exhaustive(&self) -> bool {
        self.candidates_tried() == self.keyspace_size
    }

    pub fn found(&self) -> BTreeSet<&str> {
        self.matches
            .iter()
            .map(|report| report.candidate.as_str())
            .collect()
    }
}

fn as_millis<S>(duration: &Duration, serializer: S) -> core::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}

// endregion:     --- Models

// region:        --- Exporting utils

pub fn export_to_json(result: &SearchResult, path: &Path) -> Result<()> {
    let json = to_string_pretty(result)?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

pub fn export_to_markdown(result: &SearchResult, title: &str, path: &Path) -> Result<()> {
    let md_content = render_markdown(result, title)?;
    let mut file = File::create(path)?;
    file.write_all(md_content.as_bytes())?;
    Ok(())
}

fn render_markdown(result: &SearchResult, title: &str) -> Result<String> {
    let mut md_content = String::new();
    writeln!(&mut md_content, "# Search result for `{}`", title)?;
    writeln!(&mut md_content)?;
    writeln!(
        &mut md_content,
        "{} of {} candidates tried in {} ms by {} workers.",
        result.candidates_tried(),
        result.keyspace_size,
        result.elapsed.as_millis(),
        result.workers.len()
    )?;
    if result.stopped_early {
        writeln!(&mut md_content)?;
        writeln!(
            &mut md_content,
            "*The search was stopped before the end of the keyspace.*"
        )?;
    }

    writeln!(&mut md_content)?;
    writeln!(&mut md_content, "## Matches")?;
    writeln!(&mut md_content)?;
    if result.matches.is_empty() {
        writeln!(&mut md_content, "No match found")?;
    }
    for report in &result.matches {
        writeln!(
            &mut md_content,
            "- **{}** (worker {}, {} ms)",
            report.candidate,
            report.worker_id,
            report.elapsed.as_millis()
        )?;
    }

    writeln!(&mut md_content)?;
    writeln!(&mut md_content, "## Workers")?;
    writeln!(&mut md_content)?;
    writeln!(&mut md_content, "| worker | range | tried | failed | ms |")?;
    writeln!(&mut md_content, "|---|---|---|---|---|")?;
    for worker in &result.workers {
        writeln!(
            &mut md_content,
            "| {} | {}..{} | {} | {} | {} |",
            worker.worker_id,
            worker.partition.start,
            worker.partition.end,
            worker.tried,
            worker.failed_trials,
            worker.elapsed.as_millis()
        )?;
    }

    Ok(md_content)
}

// endregion:     --- Exporting utils
