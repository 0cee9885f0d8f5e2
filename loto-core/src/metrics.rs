use std::sync::atomic::{AtomicU64, Ordering};

/// Compteurs de processus, injectés par l'hôte plutôt que globaux, pour
/// garder les moteurs isolables en test.
#[derive(Debug, Default)]
pub struct Metrics {
    pub grids_generated: AtomicU64,
    pub generation_attempts: AtomicU64,
    pub degraded_generations: AtomicU64,
    pub backtested_draws: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub grids_generated: u64,
    pub generation_attempts: u64,
    pub degraded_generations: u64,
    pub backtested_draws: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_grids(&self, n: u64) {
        self.grids_generated.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_attempts(&self, n: u64) {
        self.generation_attempts.fetch_add(n, Ordering::Relaxed);
    }

    pub fn mark_degraded(&self) {
        self.degraded_generations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_backtested_draws(&self, n: u64) {
        self.backtested_draws.fetch_add(n, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            grids_generated: self.grids_generated.load(Ordering::Relaxed),
            generation_attempts: self.generation_attempts.load(Ordering::Relaxed),
            degraded_generations: self.degraded_generations.load(Ordering::Relaxed),
            backtested_draws: self.backtested_draws.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = Metrics::new();
        metrics.add_grids(3);
        metrics.add_grids(2);
        metrics.add_attempts(10);
        metrics.mark_degraded();
        let snap = metrics.snapshot();
        assert_eq!(snap.grids_generated, 5);
        assert_eq!(snap.generation_attempts, 10);
        assert_eq!(snap.degraded_generations, 1);
        assert_eq!(snap.backtested_draws, 0);
    }
}
