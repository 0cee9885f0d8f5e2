pub mod backtest;
pub mod config;
pub mod constraints;
pub mod generator;
pub mod metrics;
pub mod sampler;
pub mod stats;
pub mod strategy;
pub mod weights;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Signal d'annulation coopératif, consulté à chaque itération des boucles
/// de génération et de backtest. Un appel annulé ne produit aucun résultat.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_flag_starts_clear() {
        let flag = CancelFlag::new();
        assert!(!flag.is_cancelled());
    }

    #[test]
    fn test_cancel_flag_shared() {
        let flag = CancelFlag::new();
        let clone = flag.clone();
        clone.cancel();
        assert!(flag.is_cancelled(), "l'annulation doit être visible via tous les clones");
    }
}
