use crate::keyspace::Keyspace;
use crate::model::{MatchReport, SearchResult, WorkerSummary};
use crate::oracle::Oracle;
use crate::partition::{self, Partition};
use crate::{Error, Result};
use crossbeam_channel::{bounded, unbounded, Sender};
use rayon::ThreadPoolBuilder;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Cooperative stop flag, checked by workers between two candidates.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Splits a keyspace across a fixed number of workers and collects the
/// candidates an oracle accepts.
pub struct Cracker {
    workers: usize,
    stop_when_found: bool,
    cancel: CancelToken,
}

// region:        --- Constructors

impl Cracker {
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(Error::InvalidWorkerCount(workers));
        }

        Ok(Self {
            workers,
            stop_when_found: false,
            cancel: CancelToken::new(),
        })
    }

    /// Stop every worker once the oracle's `target_count` distinct
    /// candidates matched. Off by default, the whole keyspace is swept.
    pub fn stop_when_found(mut self, enabled: bool) -> Self {
        self.stop_when_found = enabled;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Token for stopping the search from outside. Once cancelled, every
    /// later run of this cracker stops immediately.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}

// endregion:     --- Constructors

impl Cracker {
    /// Sweep `keyspace`, calling `on_match` for each accepted candidate as
    /// soon as it arrives.
    #[instrument(name = "search", level = "info", skip_all, fields(workers = self.workers))]
    pub fn run<K, O, F>(&self, keyspace: &K, oracle: &O, mut on_match: F) -> Result<SearchResult>
    where
        K: Keyspace + ?Sized,
        O: Oracle + ?Sized,
        F: FnMut(&MatchReport),
    {
        let keyspace_size = keyspace.len();
        let partitions = partition::split(keyspace_size, self.workers)?;
        partition::check_coverage(&partitions, keyspace_size)?;

        if self.workers as u64 > keyspace_size {
            warn!(
                "{} workers for {} candidates, only the last one has work",
                self.workers, keyspace_size
            );
        }
        info!(
            "Start {} over {} ({} candidates)",
            oracle.name(),
            keyspace.describe(),
            keyspace_size
        );

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("worker-{}", i))
            .build()?;

        // one token per run: all targets found, or a worker failed
        let halt = CancelToken::new();
        let wanted = if self.stop_when_found {
            oracle.target_count()
        } else {
            None
        };

        // create 2 channels, one streaming the matches and the other
        // collecting the outcome of each worker
        let (report_tx, report_rx) = unbounded::<MatchReport>();
        let (done_tx, done_rx) = bounded::<Result<WorkerSummary>>(partitions.len());

        let search_start = Instant::now();

        let matches = pool.in_place_scope(|scope| {
            for partition in &partitions {
                let partition = *partition;
                let report_tx = report_tx.clone();
                let done_tx = done_tx.clone();
                let stop = Stop {
                    cancel: self.cancel.clone(),
                    halt: halt.clone(),
                };

                scope.spawn(move |_| {
                    let outcome = run_worker(partition, keyspace, oracle, &stop, &report_tx);
                    if let Err(err) = &outcome {
                        error!("Worker {} failed: {}", partition.worker_id, err);
                        stop.halt.cancel();
                    }
                    // one slot per worker, never blocks
                    let _ = done_tx.send(outcome);
                });
            }
            // the stream closes once the last worker drops its sender
            drop(report_tx);

            let mut matches = Vec::new();
            let mut found = HashSet::new();
            for report in report_rx.iter() {
                on_match(&report);
                found.insert(report.candidate.clone());
                if wanted.is_some_and(|count| found.len() >= count) && !halt.is_cancelled() {
                    info!("All {} targets found, stopping workers", found.len());
                    halt.cancel();
                }
                matches.push(report);
            }
            matches
        });

        // the scope joined every worker, all outcomes are queued
        let elapsed = search_start.elapsed();

        let mut workers = Vec::with_capacity(partitions.len());
        for outcome in done_rx.try_iter() {
            workers.push(outcome?);
        }
        if workers.len() != partitions.len() {
            return Err(Error::MissingWorkers {
                expected: partitions.len(),
                reported: workers.len(),
            });
        }
        workers.sort_by_key(|worker| worker.worker_id);

        // a stop raised after the last candidate leaves the sweep complete
        let stopped_early = workers.iter().any(|worker| worker.stopped);
        let result = SearchResult {
            keyspace_size,
            matches,
            workers,
            stopped_early,
            elapsed,
        };

        info!(
            "Search done, {} matches, {} of {} candidates in {:?}",
            result.matches.len(),
            result.candidates_tried(),
            keyspace_size,
            elapsed
        );
        Ok(result)
    }
}

// region:        --- Workers

struct Stop {
    cancel: CancelToken,
    halt: CancelToken,
}

impl Stop {
    fn raised(&self) -> bool {
        self.cancel.is_cancelled() || self.halt.is_cancelled()
    }
}

#[instrument(name = "worker", level = "info", skip_all, fields(worker = partition.worker_id))]
fn run_worker<K, O>(
    partition: Partition,
    keyspace: &K,
    oracle: &O,
    stop: &Stop,
    reports: &Sender<MatchReport>,
) -> Result<WorkerSummary>
where
    K: Keyspace + ?Sized,
    O: Oracle + ?Sized,
{
    let worker_start = Instant::now();

    if partition.start > partition.end || partition.end > keyspace.len() {
        return Err(Error::PartitionOutOfRange {
            worker: partition.worker_id,
            end: partition.end,
            len: keyspace.len(),
        });
    }
    debug!(
        "Partition {}..{} ({} candidates)",
        partition.start,
        partition.end,
        partition.len()
    );

    let mut candidate = String::new();
    let mut tried = 0;
    let mut failed_trials = 0;
    let mut stopped = false;

    for index in partition.range() {
        if stop.raised() {
            info!("Stopped at index {}", index);
            stopped = true;
            break;
        }

        keyspace.write_candidate(index, &mut candidate)?;
        tried += 1;

        match oracle.verify(&candidate) {
            Ok(true) => {
                let report = MatchReport {
                    worker_id: partition.worker_id,
                    candidate: candidate.clone(),
                    elapsed: worker_start.elapsed(),
                };
                debug!("Match {:?} after {:?}", report.candidate, report.elapsed);
                reports
                    .send(report)
                    .map_err(|_| Error::ReportChannelClosed)?;
            }
            Ok(false) => {}
            // not retried, the oracle owns its retry policy
            Err(err) => {
                failed_trials += 1;
                warn!("Trial {:?} failed: {}", candidate, err);
            }
        }
    }

    let summary = WorkerSummary {
        worker_id: partition.worker_id,
        partition,
        tried,
        failed_trials,
        stopped,
        elapsed: worker_start.elapsed(),
    };
    info!("Finished, {} candidates in {:?}", tried, summary.elapsed);
    Ok(summary)
}

// endregion:     --- Workers
