use chrono::Days;
use loto_db::models::{Draw, Pool};
use serde::{Deserialize, Serialize};

use crate::config::PredictionOptions;
use crate::weights;

/// Schéma de pondération appliqué au tirage des grilles. Un sélecteur
/// inconnu ou absent se résout en `Uniform`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Strategy {
    #[default]
    Uniform,
    FrequencyGlobal,
    FrequencyRecent,
    Cold,
    Cooccurrence,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Uniform,
        Strategy::FrequencyGlobal,
        Strategy::FrequencyRecent,
        Strategy::Cold,
        Strategy::Cooccurrence,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Uniform => "uniform",
            Strategy::FrequencyGlobal => "frequency-global",
            Strategy::FrequencyRecent => "frequency-recent",
            Strategy::Cold => "cold",
            Strategy::Cooccurrence => "cooccurrence",
        }
    }

    pub fn from_name(name: &str) -> Strategy {
        Strategy::ALL
            .into_iter()
            .find(|s| s.name() == name.trim().to_lowercase())
            .unwrap_or_default()
    }

    /// Rang stable du sélecteur, mélangé dans le seed de backtest.
    pub fn ordinal(&self) -> u64 {
        Strategy::ALL.iter().position(|s| s == self).unwrap_or(0) as u64
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Vecteurs de poids résolus pour une stratégie. La matrice de
/// co-occurrence n'est portée que par la stratégie chaînée.
#[derive(Debug, Clone)]
pub struct StrategyWeights {
    pub main: Vec<f64>,
    pub lucky: Vec<f64>,
    pub cooccurrence: Option<Vec<Vec<u32>>>,
}

/// Une fonction pure par stratégie, sélectionnée par le variant.
pub fn resolve(strategy: Strategy, draws: &[Draw], opts: &PredictionOptions) -> StrategyWeights {
    match strategy {
        Strategy::Uniform => uniform_weights(),
        Strategy::FrequencyGlobal => frequency_global_weights(draws),
        Strategy::FrequencyRecent => frequency_recent_weights(draws, opts),
        Strategy::Cold => cold_weights(draws),
        Strategy::Cooccurrence => cooccurrence_weights(draws),
    }
}

fn uniform_weights() -> StrategyWeights {
    StrategyWeights {
        main: weights::uniform(Pool::Main),
        lucky: weights::uniform(Pool::Lucky),
        cooccurrence: None,
    }
}

fn frequency_global_weights(draws: &[Draw]) -> StrategyWeights {
    StrategyWeights {
        main: weights::frequency_weights(draws, Pool::Main),
        lucky: weights::frequency_weights(draws, Pool::Lucky),
        cooccurrence: None,
    }
}

/// Fenêtre ancrée sur la date du dernier tirage de l'instantané, jamais sur
/// l'horloge murale. Fenêtre vide : repli sur tout l'historique.
fn frequency_recent_weights(draws: &[Draw], opts: &PredictionOptions) -> StrategyWeights {
    let recent: Vec<Draw> = match draws.iter().map(|d| d.date).max() {
        Some(latest) => {
            let cutoff = latest
                .checked_sub_days(Days::new(opts.recent_window_days.max(0) as u64))
                .unwrap_or(latest);
            draws
                .iter()
                .filter(|d| d.date >= cutoff)
                .cloned()
                .collect()
        }
        None => Vec::new(),
    };

    let window = if recent.is_empty() { draws } else { &recent };
    frequency_global_weights(window)
}

fn cold_weights(draws: &[Draw]) -> StrategyWeights {
    StrategyWeights {
        main: weights::cold_weights(draws, Pool::Main),
        lucky: weights::cold_weights(draws, Pool::Lucky),
        cooccurrence: None,
    }
}

/// Fréquence globale pour le premier numéro et le numéro chance ; la
/// matrice sert aux quatre numéros suivants.
fn cooccurrence_weights(draws: &[Draw]) -> StrategyWeights {
    StrategyWeights {
        main: weights::frequency_weights(draws, Pool::Main),
        lucky: weights::frequency_weights(draws, Pool::Lucky),
        cooccurrence: Some(weights::cooccurrence_matrix(draws)),
    }
}
