use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate};
use loto_db::models::Draw;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{PredictionOptions, BACKTEST_SAMPLE_SEED};
use crate::generator::generate;
use crate::metrics::Metrics;
use crate::strategy::Strategy;
use crate::CancelFlag;

#[derive(Debug, Clone, Default)]
pub struct BacktestRequest {
    pub strategy: Strategy,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub sample_size: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchDistribution {
    pub matched_main: u8,
    pub matched_lucky: bool,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BacktestResult {
    pub strategy: Strategy,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub total_draws_analyzed: usize,
    pub average_matched_main: f64,
    pub distributions: Vec<MatchDistribution>,
}

/// Dates de requête au format `yyyy-MM-dd`.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
        Ok(date) => Ok(date),
        Err(_) => bail!("Format de date invalide : '{}'. Utilisez yyyy-MM-dd.", value),
    }
}

/// Rejoue la stratégie sur chaque tirage historique retenu : une grille
/// générée par tirage, avec un seed dérivé de l'identité du tirage, puis
/// comparaison avec le tirage réel.
///
/// Les pondérations sont construites sur l'historique COMPLET, y compris
/// les tirages postérieurs au tirage évalué. Comportement hérité, conservé
/// en l'état.
pub fn backtest(
    all_draws: &[Draw],
    request: &BacktestRequest,
    opts: &PredictionOptions,
    cancel: &CancelFlag,
    metrics: &Metrics,
) -> Result<BacktestResult> {
    if let (Some(from), Some(to)) = (request.date_from, request.date_to) {
        if from > to {
            bail!("dateFrom ne peut pas être postérieure à dateTo.");
        }
    }

    let mut selected: Vec<&Draw> = all_draws
        .iter()
        .filter(|d| request.date_from.is_none_or(|from| d.date >= from))
        .filter(|d| request.date_to.is_none_or(|to| d.date <= to))
        .collect();

    if selected.is_empty() {
        info!(strategy = %request.strategy, "Backtest sans tirage dans la période demandée");
        return Ok(empty_result(request));
    }

    if let Some(sample_size) = request.sample_size {
        if sample_size > 0 && sample_size < selected.len() {
            let mut sampler = StdRng::seed_from_u64(BACKTEST_SAMPLE_SEED);
            selected.shuffle(&mut sampler);
            selected.truncate(sample_size);
        }
    }

    // Chaque tirage porte son propre seed : la réduction est commutative et
    // la parallélisation ne change pas le résultat.
    let outcomes: Vec<Option<(u8, bool)>> = selected
        .par_iter()
        .map(|draw| -> Result<Option<(u8, bool)>> {
            if cancel.is_cancelled() {
                bail!("Backtest annulé");
            }

            let seed = derive_seed(draw, request.strategy);
            let mut rng = StdRng::seed_from_u64(seed);
            let batch = generate(
                all_draws,
                1,
                request.strategy,
                None,
                opts,
                &mut rng,
                cancel,
                metrics,
            )?;

            let Some(predicted) = batch.grids.first() else {
                warn!(draw_id = draw.id, "Aucune prédiction générée pour ce tirage");
                return Ok(None);
            };

            let matched_main = draw
                .numbers
                .iter()
                .filter(|n| predicted.numbers.contains(n))
                .count() as u8;
            let matched_lucky = predicted.lucky == draw.lucky;
            Ok(Some((matched_main, matched_lucky)))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut distribution: std::collections::HashMap<(u8, bool), u32> =
        std::collections::HashMap::new();
    let mut matched_main_sum = 0u64;
    for (matched_main, matched_lucky) in outcomes.into_iter().flatten() {
        *distribution.entry((matched_main, matched_lucky)).or_insert(0) += 1;
        matched_main_sum += matched_main as u64;
    }

    let total = selected.len();
    metrics.add_backtested_draws(total as u64);

    let mut distributions: Vec<MatchDistribution> = distribution
        .into_iter()
        .map(|((matched_main, matched_lucky), count)| MatchDistribution {
            matched_main,
            matched_lucky,
            count,
        })
        .collect();
    distributions.sort_by(|a, b| {
        b.matched_main
            .cmp(&a.matched_main)
            .then(b.matched_lucky.cmp(&a.matched_lucky))
    });

    Ok(BacktestResult {
        strategy: request.strategy,
        date_from: request.date_from,
        date_to: request.date_to,
        total_draws_analyzed: total,
        average_matched_main: matched_main_sum as f64 / total as f64,
        distributions,
    })
}

fn empty_result(request: &BacktestRequest) -> BacktestResult {
    BacktestResult {
        strategy: request.strategy,
        date_from: request.date_from,
        date_to: request.date_to,
        total_draws_analyzed: 0,
        average_matched_main: 0.0,
        distributions: Vec::new(),
    }
}

/// Seed stable dérivé des champs d'identité du tirage et de la stratégie :
/// identique d'un run à l'autre, quel que soit le processus.
pub fn derive_seed(draw: &Draw, strategy: Strategy) -> u64 {
    let mut seed = 17u64;
    seed = combine(seed, draw.id as u64);
    seed = combine(seed, draw.date.num_days_from_ce() as u64);
    for &n in &draw.numbers {
        seed = combine(seed, n as u64);
    }
    seed = combine(seed, draw.lucky as u64);
    combine(seed, strategy.ordinal())
}

fn combine(seed: u64, value: u64) -> u64 {
    seed.wrapping_mul(31).wrapping_add(value)
}
