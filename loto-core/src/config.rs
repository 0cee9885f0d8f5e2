/// Seuil "petit numéro" pour les motifs pairs/impairs et hauts/bas.
pub const LOW_NUMBER_THRESHOLD: u8 = 25;

/// Epsilon du modèle froid : évite la division par zéro et donne le poids
/// maximal aux numéros jamais sortis.
pub const COLD_EPSILON: f64 = 1e-3;

/// Seed fixe du sous-échantillonnage de backtest, pour des runs reproductibles.
pub const BACKTEST_SAMPLE_SEED: u64 = 1337;

/// Réglages de la génération, fournis par l'hôte.
#[derive(Debug, Clone)]
pub struct PredictionOptions {
    /// Nombre de grilles quand la requête n'en précise pas.
    pub default_count: usize,
    /// Plafond dur pour éviter les requêtes abusives.
    pub max_count: usize,
    /// Fenêtre de la stratégie FrequencyRecent, en jours.
    pub recent_window_days: i64,
    /// Nombre maximal de numéros imposés.
    pub max_include_numbers: usize,
    /// Multiplicateur appliqué au nombre demandé pour borner les tentatives.
    pub max_attempts_multiplier: usize,
    /// Largeur par défaut des tranches de sommes.
    pub pattern_bucket_size: u32,
    /// Troncature par défaut des listes de co-occurrences (<= 0 : aucune).
    pub cooccurrence_top: i64,
}

impl Default for PredictionOptions {
    fn default() -> Self {
        Self {
            default_count: 10,
            max_count: 100,
            recent_window_days: 730,
            max_include_numbers: 5,
            max_attempts_multiplier: 100,
            pattern_bucket_size: 10,
            cooccurrence_top: 15,
        }
    }
}

impl PredictionOptions {
    /// Normalise le nombre de grilles demandé : défaut si absent ou nul,
    /// plafonné à `max_count`.
    pub fn effective_count(&self, requested: Option<usize>) -> usize {
        match requested {
            None | Some(0) => self.default_count,
            Some(n) => n.min(self.max_count),
        }
    }

    pub fn attempt_budget(&self, count: usize) -> usize {
        (count * self.max_attempts_multiplier).max(count)
    }
}
