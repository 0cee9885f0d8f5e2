use std::collections::HashMap;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use loto_db::models::{Draw, Pool};
use serde::Serialize;
use tracing::debug;

use crate::config::LOW_NUMBER_THRESHOLD;
use crate::weights::count_occurrences;

const UNKNOWN_DAY: &str = "INCONNU";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayOfWeekCount {
    pub day_name: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsOverview {
    pub total_draws: usize,
    pub first_draw_date: Option<NaiveDate>,
    pub last_draw_date: Option<NaiveDate>,
    pub draws_per_day_of_week: Vec<DayOfWeekCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberFrequency {
    pub number: u8,
    pub count: u32,
    pub frequency: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsFrequencies {
    pub main_numbers: Vec<NumberFrequency>,
    pub lucky_numbers: Vec<NumberFrequency>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SumBucket {
    pub min_inclusive: u32,
    pub max_inclusive: u32,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountBucket {
    pub value: u8,
    pub count: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PatternDistribution {
    pub sum_buckets: Vec<SumBucket>,
    pub even_count_distribution: Vec<CountBucket>,
    pub low_count_distribution: Vec<CountBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CooccurringNumber {
    pub number: u8,
    pub cooccurrence_count: u32,
    pub conditional_probability: f64,
    pub global_probability: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CooccurrenceStats {
    pub base_number: u8,
    pub total_draws: usize,
    pub draws_containing_base: usize,
    pub cooccurrences: Vec<CooccurringNumber>,
}

/// Vue d'ensemble : bornes de dates et répartition par jour de tirage, les
/// jours absents étant regroupés sous "INCONNU".
pub fn overview(draws: &[Draw]) -> StatsOverview {
    if draws.is_empty() {
        debug!("Vue d'ensemble demandée sur un historique vide");
        return StatsOverview::default();
    }

    let mut per_day: HashMap<String, u32> = HashMap::new();
    for draw in draws {
        let day = draw
            .day
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(UNKNOWN_DAY);
        *per_day.entry(day.to_string()).or_insert(0) += 1;
    }

    let mut draws_per_day_of_week: Vec<DayOfWeekCount> = per_day
        .into_iter()
        .map(|(day_name, count)| DayOfWeekCount { day_name, count })
        .collect();
    draws_per_day_of_week.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.day_name.cmp(&b.day_name))
    });

    StatsOverview {
        total_draws: draws.len(),
        first_draw_date: draws.iter().map(|d| d.date).min(),
        last_draw_date: draws.iter().map(|d| d.date).max(),
        draws_per_day_of_week,
    }
}

/// Comptes et fréquences par numéro, listes triées par compte décroissant
/// (numéro croissant à compte égal).
pub fn frequencies(draws: &[Draw]) -> StatsFrequencies {
    if draws.is_empty() {
        debug!("Fréquences demandées sur un historique vide");
        return StatsFrequencies::default();
    }

    StatsFrequencies {
        main_numbers: frequency_list(draws, Pool::Main),
        lucky_numbers: frequency_list(draws, Pool::Lucky),
    }
}

fn frequency_list(draws: &[Draw], pool: Pool) -> Vec<NumberFrequency> {
    let counts = count_occurrences(draws, pool);
    let total: u32 = counts.iter().sum();

    let mut list: Vec<NumberFrequency> = counts
        .iter()
        .enumerate()
        .map(|(i, &count)| NumberFrequency {
            number: (i + 1) as u8,
            count,
            frequency: if total > 0 {
                count as f64 / total as f64
            } else {
                0.0
            },
        })
        .collect();
    list.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.number.cmp(&b.number)));
    list
}

/// Histogrammes de motifs : sommes par tranches alignées sur les multiples
/// de la largeur, nombres de pairs et de petits numéros (0 à 5).
pub fn patterns(draws: &[Draw], bucket_size: u32) -> PatternDistribution {
    if draws.is_empty() {
        debug!("Motifs demandés sur un historique vide");
        return PatternDistribution::default();
    }

    let size = if bucket_size == 0 { 10 } else { bucket_size };
    let sums: Vec<u32> = draws
        .iter()
        .map(|d| d.numbers.iter().map(|&n| n as u32).sum())
        .collect();
    let min_sum = sums.iter().copied().min().unwrap_or(0);
    let max_sum = sums.iter().copied().max().unwrap_or(0);

    let mut sum_buckets = Vec::new();
    let mut start = (min_sum / size) * size;
    while start <= max_sum {
        let end = start + size - 1;
        let count = sums.iter().filter(|&&s| s >= start && s <= end).count() as u32;
        sum_buckets.push(SumBucket {
            min_inclusive: start,
            max_inclusive: end,
            count,
        });
        start += size;
    }

    let mut even_counts = [0u32; 6];
    let mut low_counts = [0u32; 6];
    for draw in draws {
        let even = draw.numbers.iter().filter(|&&n| n % 2 == 0).count();
        let low = draw
            .numbers
            .iter()
            .filter(|&&n| n <= LOW_NUMBER_THRESHOLD)
            .count();
        even_counts[even] += 1;
        low_counts[low] += 1;
    }

    PatternDistribution {
        sum_buckets,
        even_count_distribution: count_buckets(&even_counts),
        low_count_distribution: count_buckets(&low_counts),
    }
}

fn count_buckets(counts: &[u32; 6]) -> Vec<CountBucket> {
    counts
        .iter()
        .enumerate()
        .map(|(value, &count)| CountBucket {
            value: value as u8,
            count,
        })
        .collect()
}

/// Co-occurrences d'un numéro de base : compte conjoint, probabilité
/// conditionnelle et probabilité globale, liste triée par compte
/// décroissant et tronquée à `top` (<= 0 : pas de troncature).
pub fn cooccurrence(draws: &[Draw], base_number: u8, top: i64) -> Result<CooccurrenceStats> {
    if base_number < 1 || base_number > 49 {
        bail!("Le numéro de base doit être compris entre 1 et 49.");
    }

    let total_draws = draws.len();
    if total_draws == 0 {
        debug!(base_number, "Co-occurrences demandées sur un historique vide");
        return Ok(CooccurrenceStats {
            base_number,
            total_draws: 0,
            draws_containing_base: 0,
            cooccurrences: Vec::new(),
        });
    }

    let with_base: Vec<&Draw> = draws
        .iter()
        .filter(|d| d.numbers.contains(&base_number))
        .collect();
    let draws_containing_base = with_base.len();

    let global_counts = count_occurrences(draws, Pool::Main);

    let mut co_counts = [0u32; 49];
    for draw in &with_base {
        for &n in &draw.numbers {
            if n != base_number {
                co_counts[(n - 1) as usize] += 1;
            }
        }
    }

    let mut cooccurrences: Vec<CooccurringNumber> = (1..=49u8)
        .filter(|&n| n != base_number && co_counts[(n - 1) as usize] > 0)
        .map(|n| {
            let count = co_counts[(n - 1) as usize];
            CooccurringNumber {
                number: n,
                cooccurrence_count: count,
                conditional_probability: count as f64 / draws_containing_base as f64,
                global_probability: global_counts[(n - 1) as usize] as f64 / total_draws as f64,
            }
        })
        .collect();
    cooccurrences.sort_by(|a, b| {
        b.cooccurrence_count
            .cmp(&a.cooccurrence_count)
            .then_with(|| a.number.cmp(&b.number))
    });

    if top > 0 && cooccurrences.len() > top as usize {
        cooccurrences.truncate(top as usize);
    }

    Ok(CooccurrenceStats {
        base_number,
        total_draws,
        draws_containing_base,
        cooccurrences,
    })
}
