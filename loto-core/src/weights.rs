use loto_db::models::{Draw, Pool};

use crate::config::COLD_EPSILON;

/// Les vecteurs de poids sont indexés par numéro - 1 et somment à 1 sur
/// leur domaine (repli uniforme si la masse totale est nulle).
pub fn uniform(pool: Pool) -> Vec<f64> {
    vec![1.0 / pool.size() as f64; pool.size()]
}

pub fn count_occurrences(draws: &[Draw], pool: Pool) -> Vec<u32> {
    let mut counts = vec![0u32; pool.size()];
    for draw in draws {
        for &n in pool.numbers_from(draw) {
            let idx = (n - 1) as usize;
            if idx < counts.len() {
                counts[idx] += 1;
            }
        }
    }
    counts
}

pub fn normalize_or_uniform(mut weights: Vec<f64>) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        let n = weights.len();
        return vec![1.0 / n as f64; n];
    }
    for w in &mut weights {
        *w /= total;
    }
    weights
}

/// Poids proportionnels à la fréquence historique ; uniforme si l'historique
/// est vide.
pub fn frequency_weights(draws: &[Draw], pool: Pool) -> Vec<f64> {
    let counts = count_occurrences(draws, pool);
    normalize_or_uniform(counts.iter().map(|&c| c as f64).collect())
}

/// Poids inversement proportionnels à la fréquence : les numéros jamais
/// sortis reçoivent le poids le plus fort.
pub fn cold_weights(draws: &[Draw], pool: Pool) -> Vec<f64> {
    let counts = count_occurrences(draws, pool);
    normalize_or_uniform(
        counts
            .iter()
            .map(|&c| 1.0 / (c as f64 + COLD_EPSILON))
            .collect(),
    )
}

/// Matrice symétrique 49x49 : chaque paire non ordonnée d'un tirage
/// incrémente les deux cellules.
pub fn cooccurrence_matrix(draws: &[Draw]) -> Vec<Vec<u32>> {
    let size = Pool::Main.size();
    let mut matrix = vec![vec![0u32; size]; size];
    for draw in draws {
        for i in 0..draw.numbers.len() {
            for j in (i + 1)..draw.numbers.len() {
                let a = (draw.numbers[i] - 1) as usize;
                let b = (draw.numbers[j] - 1) as usize;
                matrix[a][b] += 1;
                matrix[b][a] += 1;
            }
        }
    }
    matrix
}
