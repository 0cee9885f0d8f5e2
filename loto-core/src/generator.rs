use std::collections::HashSet;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use loto_db::models::{Draw, Pool};
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::warn;

use crate::config::PredictionOptions;
use crate::constraints::{satisfies, PredictionConstraints};
use crate::metrics::Metrics;
use crate::sampler::{sample_chained, sample_single, sample_without_replacement};
use crate::strategy::{resolve, Strategy, StrategyWeights};
use crate::CancelFlag;

/// Une grille prédite : 5 numéros distincts triés, un numéro chance et un
/// score normalisé dans [0,1].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictedGrid {
    pub numbers: [u8; 5],
    pub lucky: u8,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionBatch {
    pub generated_at: DateTime<Utc>,
    pub strategy: Strategy,
    pub requested: usize,
    pub grids: Vec<PredictedGrid>,
}

/// Simulation pondérée par l'historique ; ne garantit évidemment aucun gain
/// réel. Produire moins de grilles que demandé n'est pas une erreur.
pub fn generate(
    draws: &[Draw],
    count: usize,
    strategy: Strategy,
    constraints: Option<&PredictionConstraints>,
    opts: &PredictionOptions,
    rng: &mut StdRng,
    cancel: &CancelFlag,
    metrics: &Metrics,
) -> Result<PredictionBatch> {
    if let Some(c) = constraints {
        c.validate(opts)?;
    }

    let weights = resolve(strategy, draws, opts);
    let max_possible_score = max_possible_score(&weights);

    let budget = opts.attempt_budget(count);
    let mut grids: Vec<PredictedGrid> = Vec::with_capacity(count);
    let mut seen: HashSet<([u8; 5], u8)> = HashSet::new();
    let mut attempts = 0usize;

    while grids.len() < count && attempts < budget {
        if cancel.is_cancelled() {
            bail!("Génération annulée");
        }
        attempts += 1;

        let mut numbers = draw_main_numbers(&weights, rng);
        numbers.sort();
        let lucky = sample_single(&weights.lucky, rng);

        if !satisfies(&numbers, constraints) {
            continue;
        }
        if !seen.insert((numbers, lucky)) {
            continue;
        }

        let raw_score: f64 = numbers
            .iter()
            .map(|&n| weights.main[(n - 1) as usize])
            .sum::<f64>()
            + weights.lucky[(lucky - 1) as usize];
        let score = if max_possible_score > 0.0 {
            round4(raw_score / max_possible_score)
        } else {
            0.0
        };

        grids.push(PredictedGrid { numbers, lucky, score });
    }

    metrics.add_attempts(attempts as u64);
    metrics.add_grids(grids.len() as u64);

    if grids.len() < count {
        metrics.mark_degraded();
        warn!(
            requested = count,
            generated = grids.len(),
            attempts,
            strategy = %strategy,
            "Impossible de générer le nombre de grilles distinctes demandé"
        );
    }

    Ok(PredictionBatch {
        generated_at: Utc::now(),
        strategy,
        requested: count,
        grids,
    })
}

fn draw_main_numbers(weights: &StrategyWeights, rng: &mut StdRng) -> [u8; 5] {
    let pick = Pool::Main.pick_count();
    let picked = match &weights.cooccurrence {
        Some(matrix) => {
            let mut selected = sample_without_replacement(&weights.main, 1, rng);
            while selected.len() < pick {
                let next = sample_chained(matrix, &selected, &weights.main, rng);
                selected.push(next);
            }
            selected
        }
        None => sample_without_replacement(&weights.main, pick, rng),
    };

    let mut numbers = [0u8; 5];
    numbers.copy_from_slice(&picked);
    numbers
}

fn max_possible_score(weights: &StrategyWeights) -> f64 {
    let max_main = weights.main.iter().cloned().fold(0.0, f64::max);
    let max_lucky = weights.lucky.iter().cloned().fold(0.0, f64::max);
    max_main * Pool::Main.pick_count() as f64 + max_lucky
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}
