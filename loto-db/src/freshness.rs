use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

/// Horodatage du dernier import réussi, partagé entre le worker d'ingestion
/// et les lecteurs. Les lecteurs ne font que consulter la valeur.
#[derive(Debug, Default)]
pub struct IngestionState {
    // 0 = jamais rafraîchi
    last_refresh_epoch: AtomicI64,
}

impl IngestionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_refreshed(&self, at: DateTime<Utc>) {
        self.last_refresh_epoch
            .store(at.timestamp(), Ordering::SeqCst);
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        let epoch = self.last_refresh_epoch.load(Ordering::SeqCst);
        if epoch == 0 {
            None
        } else {
            DateTime::from_timestamp(epoch, 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_refreshed() {
        let state = IngestionState::new();
        assert!(state.last_refresh().is_none());
    }

    #[test]
    fn test_mark_then_read() {
        let state = IngestionState::new();
        let now = Utc::now();
        state.mark_refreshed(now);
        let read = state.last_refresh().expect("horodatage attendu");
        assert_eq!(read.timestamp(), now.timestamp());
    }

    #[test]
    fn test_latest_wins() {
        let state = IngestionState::new();
        let t1 = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let t2 = DateTime::from_timestamp(1_800_000_000, 0).unwrap();
        state.mark_refreshed(t1);
        state.mark_refreshed(t2);
        assert_eq!(state.last_refresh().unwrap().timestamp(), t2.timestamp());
    }
}
