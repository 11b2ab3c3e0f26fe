use crate::{Error, Result};
use serde::Serialize;
use std::ops::Range;

/// Half-open range `[start, end)` of keyspace indices owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Partition {
    pub worker_id: usize,
    pub start: u64,
    pub end: u64,
}

impl Partition {
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn range(&self) -> Range<u64> {
        self.start..self.end
    }
}

/// Split `[0, keyspace_len)` into `workers` contiguous ranges. Every range
/// has `keyspace_len / workers` indices except the last, which also takes
/// the remainder.
pub fn split(keyspace_len: u64, workers: usize) -> Result<Vec<Partition>> {
    if workers == 0 {
        return Err(Error::InvalidWorkerCount(workers));
    }

    let count = workers as u64;
    let chunk = keyspace_len / count;

    let partitions = (0..workers)
        .map(|worker_id| {
            let start = worker_id as u64 * chunk;
            let end = if worker_id == workers - 1 {
                keyspace_len
            } else {
                start + chunk
            };
            Partition {
                worker_id,
                start,
                end,
            }
        })
        .collect();

    Ok(partitions)
}

/// Ensure `partitions` tile `[0, keyspace_len)` exactly, in order.
pub fn check_coverage(partitions: &[Partition], keyspace_len: u64) -> Result<()> {
    let mut expected = 0;
    for partition in partitions {
        if partition.start != expected || partition.end < partition.start {
            return Err(Error::PartitionGap {
                expected,
                found: partition.start,
            });
        }
        expected = partition.end;
    }

    if expected != keyspace_len {
        return Err(Error::PartitionGap {
            expected: keyspace_len,
            found: expected,
        });
    }
    Ok(())
}
