use std::collections::HashSet;

use anyhow::{bail, Result};

use crate::config::{PredictionOptions, LOW_NUMBER_THRESHOLD};

/// Contraintes optionnelles sur les grilles générées. Une borne absente est
/// sans effet.
#[derive(Debug, Clone, Default)]
pub struct PredictionConstraints {
    pub min_sum: Option<u32>,
    pub max_sum: Option<u32>,
    pub min_even: Option<u32>,
    pub max_even: Option<u32>,
    pub min_low: Option<u32>,
    pub max_low: Option<u32>,
    pub include_numbers: HashSet<u8>,
    pub exclude_numbers: HashSet<u8>,
}

impl PredictionConstraints {
    pub fn is_empty(&self) -> bool {
        self.min_sum.is_none()
            && self.max_sum.is_none()
            && self.min_even.is_none()
            && self.max_even.is_none()
            && self.min_low.is_none()
            && self.max_low.is_none()
            && self.include_numbers.is_empty()
            && self.exclude_numbers.is_empty()
    }

    /// Rejette les contraintes incohérentes avant tout échantillonnage.
    pub fn validate(&self, opts: &PredictionOptions) -> Result<()> {
        check_bounds("somme", self.min_sum, self.max_sum)?;
        check_bounds("numéros pairs", self.min_even, self.max_even)?;
        check_bounds("petits numéros", self.min_low, self.max_low)?;

        if self.include_numbers.len() > opts.max_include_numbers {
            bail!(
                "Au plus {} numéros imposés ({} fournis)",
                opts.max_include_numbers,
                self.include_numbers.len()
            );
        }
        for &n in self.include_numbers.iter().chain(self.exclude_numbers.iter()) {
            if n < 1 || n > 49 {
                bail!("Numéro {} hors limites (1-49)", n);
            }
        }
        Ok(())
    }
}

fn check_bounds(label: &str, min: Option<u32>, max: Option<u32>) -> Result<()> {
    if let (Some(lo), Some(hi)) = (min, max) {
        if lo > hi {
            bail!("Bornes incohérentes sur {} : min {} > max {}", label, lo, hi);
        }
    }
    Ok(())
}

/// Prédicat pur : une grille absente de contraintes est toujours acceptée.
pub fn satisfies(numbers: &[u8; 5], constraints: Option<&PredictionConstraints>) -> bool {
    let Some(c) = constraints else {
        return true;
    };

    let sum: u32 = numbers.iter().map(|&n| n as u32).sum();
    if c.min_sum.is_some_and(|lo| sum < lo) || c.max_sum.is_some_and(|hi| sum > hi) {
        return false;
    }

    let even = numbers.iter().filter(|&&n| n % 2 == 0).count() as u32;
    if c.min_even.is_some_and(|lo| even < lo) || c.max_even.is_some_and(|hi| even > hi) {
        return false;
    }

    let low = numbers
        .iter()
        .filter(|&&n| n <= LOW_NUMBER_THRESHOLD)
        .count() as u32;
    if c.min_low.is_some_and(|lo| low < lo) || c.max_low.is_some_and(|hi| low > hi) {
        return false;
    }

    if !c.include_numbers.iter().all(|n| numbers.contains(n)) {
        return false;
    }
    if c.exclude_numbers.iter().any(|n| numbers.contains(n)) {
        return false;
    }

    true
}
