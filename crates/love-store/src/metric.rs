use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, SystemTime};

/// Result of a share code operation, as counted by [`ShareMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShareOutcome {
    Issued,
    Redeemed,
    NotFound,
    Failed,
}

impl fmt::Display for ShareOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShareOutcome::Issued => "issued",
            ShareOutcome::Redeemed => "redeemed",
            ShareOutcome::NotFound => "not_found",
            ShareOutcome::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// In-memory per-minute counts of share outcomes.
#[derive(Default)]
pub struct ShareMetrics {
    counts: std::sync::Mutex<HashMap<u64, HashMap<ShareOutcome, u64>>>,
}

impl ShareMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome using the current wall-clock time.
    pub fn record(&self, outcome: ShareOutcome) {
        self.record_at(outcome, SystemTime::now());
    }

    /// Record an outcome at a provided time (useful for tests).
    pub fn record_at(&self, outcome: ShareOutcome, at: SystemTime) {
        let minute = Self::minute_bucket(at);
        let mut guard = self.counts.lock().expect("metrics store poisoned");
        let per_minute = guard.entry(minute).or_default();
        *per_minute.entry(outcome).or_insert(0) += 1;
    }

    /// Snapshot counts keyed by minute since the epoch.
    pub fn snapshot(&self) -> HashMap<u64, HashMap<ShareOutcome, u64>> {
        self.counts.lock().expect("metrics store poisoned").clone()
    }

    /// Total count of an outcome across all minutes.
    pub fn total(&self, outcome: ShareOutcome) -> u64 {
        self.counts
            .lock()
            .expect("metrics store poisoned")
            .values()
            .filter_map(|per_minute| per_minute.get(&outcome))
            .sum()
    }

    fn minute_bucket(at: SystemTime) -> u64 {
        at.duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_secs()
            / 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_span_minute_boundaries() {
        let metrics = ShareMetrics::new();
        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(120);
        for secs in [0, 59, 60, 3_600] {
            metrics.record_at(ShareOutcome::Redeemed, start + Duration::from_secs(secs));
        }
        metrics.record_at(ShareOutcome::Failed, start + Duration::from_secs(61));

        // 2:00 and 2:59 share a bucket, 3:00 and 62:00 do not
        assert_eq!(metrics.snapshot().len(), 3);
        assert_eq!(metrics.total(ShareOutcome::Redeemed), 4);
        assert_eq!(metrics.total(ShareOutcome::Failed), 1);
        assert_eq!(metrics.total(ShareOutcome::NotFound), 0);
    }

    #[test]
    fn record_and_snapshot_counts() {
        let metrics = ShareMetrics::new();
        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(5);
        let t1 = SystemTime::UNIX_EPOCH + Duration::from_secs(65);

        metrics.record_at(ShareOutcome::Issued, t0);
        metrics.record_at(ShareOutcome::NotFound, t0);
        metrics.record_at(ShareOutcome::Issued, t1);

        let snap = metrics.snapshot();
        let first_min = snap.get(&0).unwrap();
        let second_min = snap.get(&1).unwrap();

        assert_eq!(first_min.get(&ShareOutcome::Issued), Some(&1));
        assert_eq!(first_min.get(&ShareOutcome::NotFound), Some(&1));
        assert_eq!(second_min.get(&ShareOutcome::Issued), Some(&1));
        assert_eq!(metrics.total(ShareOutcome::Issued), 2);
        assert_eq!(metrics.total(ShareOutcome::Failed), 0);
    }

    #[test]
    fn snapshot_empty_by_default() {
        let metrics = ShareMetrics::new();
        assert!(metrics.snapshot().is_empty());
    }
}
