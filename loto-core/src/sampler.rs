use rand::rngs::StdRng;
use rand::Rng;

/// Tirage pondéré sans remise : k tours de roulette sur la population
/// restante. L'ordre de sortie est l'ordre de sélection, le tri est laissé
/// à l'appelant. Si la masse restante est nulle, la fin du tirage se fait
/// en uniforme.
pub fn sample_without_replacement(weights: &[f64], k: usize, rng: &mut StdRng) -> Vec<u8> {
    let mut candidates: Vec<(u8, f64)> = weights
        .iter()
        .enumerate()
        .map(|(i, &w)| ((i + 1) as u8, w))
        .collect();

    let mut selected = Vec::with_capacity(k);

    for _ in 0..k.min(candidates.len()) {
        let mut total: f64 = candidates.iter().map(|(_, w)| *w).sum();
        if total <= 0.0 {
            let uniform = 1.0 / candidates.len() as f64;
            for c in &mut candidates {
                c.1 = uniform;
            }
            total = 1.0;
        }

        let draw = rng.random::<f64>() * total;
        let mut cumulative = 0.0;
        let mut picked = 0;
        for (i, (_, w)) in candidates.iter().enumerate() {
            cumulative += w;
            if draw <= cumulative {
                picked = i;
                break;
            }
        }

        let (number, _) = candidates.remove(picked);
        selected.push(number);
    }

    selected
}

/// Un tirage pondéré sur tout le domaine (sans rétrécissement), pour le
/// numéro chance.
pub fn sample_single(weights: &[f64], rng: &mut StdRng) -> u8 {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return rng.random_range(1..=weights.len()) as u8;
    }

    let draw = rng.random::<f64>() * total;
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if draw <= cumulative {
            return (i + 1) as u8;
        }
    }

    weights.len() as u8
}

/// Tirage chaîné par co-occurrence : le poids d'un candidat est la somme de
/// ses co-occurrences avec les numéros déjà retenus. Replis successifs sur
/// les poids de fréquence puis sur l'uniforme quand la masse est nulle.
pub fn sample_chained(
    cooccurrence: &[Vec<u32>],
    selected: &[u8],
    fallback_weights: &[f64],
    rng: &mut StdRng,
) -> u8 {
    let pool_size = cooccurrence.len();
    let candidates: Vec<u8> = (1..=pool_size as u8)
        .filter(|n| !selected.contains(n))
        .collect();

    let chained: Vec<f64> = candidates
        .iter()
        .map(|&n| {
            selected
                .iter()
                .map(|&s| cooccurrence[(s - 1) as usize][(n - 1) as usize] as f64)
                .sum()
        })
        .collect();

    if let Some(n) = pick_from(&candidates, &chained, rng) {
        return n;
    }

    let fallback: Vec<f64> = candidates
        .iter()
        .map(|&n| fallback_weights[(n - 1) as usize])
        .collect();
    if let Some(n) = pick_from(&candidates, &fallback, rng) {
        return n;
    }

    candidates[rng.random_range(0..candidates.len())]
}

fn pick_from(candidates: &[u8], weights: &[f64], rng: &mut StdRng) -> Option<u8> {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return None;
    }

    let draw = rng.random::<f64>() * total;
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if draw <= cumulative {
            return Some(candidates[i]);
        }
    }

    Some(candidates[candidates.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_sample_without_replacement_distinct() {
        let mut rng = StdRng::seed_from_u64(42);
        let weights = vec![1.0 / 49.0; 49];
        for _ in 0..100 {
            let picked = sample_without_replacement(&weights, 5, &mut rng);
            assert_eq!(picked.len(), 5);
            let mut sorted = picked.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), 5, "doublons dans {:?}", picked);
            for &n in &picked {
                assert!((1..=49).contains(&n));
            }
        }
    }

    #[test]
    fn test_sample_without_replacement_zero_mass_uniform() {
        let mut rng = StdRng::seed_from_u64(7);
        let weights = vec![0.0; 49];
        let picked = sample_without_replacement(&weights, 5, &mut rng);
        assert_eq!(picked.len(), 5);
    }

    #[test]
    fn test_sample_without_replacement_deterministic() {
        let weights: Vec<f64> = (1..=49).map(|i| i as f64 / 49.0).collect();
        let a = sample_without_replacement(&weights, 5, &mut StdRng::seed_from_u64(123));
        let b = sample_without_replacement(&weights, 5, &mut StdRng::seed_from_u64(123));
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_single_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let weights = vec![0.1; 10];
        for _ in 0..200 {
            let n = sample_single(&weights, &mut rng);
            assert!((1..=10).contains(&n));
        }
    }

    #[test]
    fn test_sample_single_zero_mass() {
        let mut rng = StdRng::seed_from_u64(42);
        let weights = vec![0.0; 10];
        for _ in 0..50 {
            let n = sample_single(&weights, &mut rng);
            assert!((1..=10).contains(&n));
        }
    }

    #[test]
    fn test_sample_single_concentrated() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut weights = vec![0.0; 10];
        weights[6] = 1.0;
        for _ in 0..50 {
            assert_eq!(sample_single(&weights, &mut rng), 7);
        }
    }

    #[test]
    fn test_sample_chained_prefers_cooccurring() {
        let mut rng = StdRng::seed_from_u64(42);
        // Le 2 co-occurre fortement avec le 1, rien d'autre.
        let mut matrix = vec![vec![0u32; 49]; 49];
        matrix[0][1] = 100;
        matrix[1][0] = 100;
        let fallback = vec![1.0 / 49.0; 49];
        for _ in 0..50 {
            let n = sample_chained(&matrix, &[1], &fallback, &mut rng);
            assert_eq!(n, 2);
        }
    }

    #[test]
    fn test_sample_chained_excludes_selected() {
        let mut rng = StdRng::seed_from_u64(42);
        let matrix = vec![vec![1u32; 49]; 49];
        let fallback = vec![1.0 / 49.0; 49];
        let selected = [1, 2, 3, 4];
        for _ in 0..100 {
            let n = sample_chained(&matrix, &selected, &fallback, &mut rng);
            assert!(!selected.contains(&n));
        }
    }

    #[test]
    fn test_sample_chained_fallback_to_frequency() {
        let mut rng = StdRng::seed_from_u64(42);
        let matrix = vec![vec![0u32; 49]; 49];
        let mut fallback = vec![0.0; 49];
        fallback[9] = 1.0;
        for _ in 0..50 {
            let n = sample_chained(&matrix, &[1], &fallback, &mut rng);
            assert_eq!(n, 10, "masse chaînée nulle : repli sur la fréquence");
        }
    }

    #[test]
    fn test_sample_chained_fallback_to_uniform() {
        let mut rng = StdRng::seed_from_u64(42);
        let matrix = vec![vec![0u32; 49]; 49];
        let fallback = vec![0.0; 49];
        for _ in 0..50 {
            let n = sample_chained(&matrix, &[1], &fallback, &mut rng);
            assert!((2..=49).contains(&n));
        }
    }

    #[test]
    fn test_uniform_marginal_chi_square_main() {
        // Khi-deux sur la marginale des 49 numéros après 4 000 grilles
        // uniformes sans remise : 48 degrés de liberté, seuil p ~ 0.001.
        let mut rng = StdRng::seed_from_u64(2025);
        let weights = vec![1.0 / 49.0; 49];
        let mut counts = [0u32; 49];
        let n_grids = 4_000;
        for _ in 0..n_grids {
            for n in sample_without_replacement(&weights, 5, &mut rng) {
                counts[(n - 1) as usize] += 1;
            }
        }
        let expected = (n_grids * 5) as f64 / 49.0;
        let chi2: f64 = counts
            .iter()
            .map(|&c| {
                let d = c as f64 - expected;
                d * d / expected
            })
            .sum();
        assert!(chi2 < 84.04, "khi-deux trop élevé : {}", chi2);
    }

    #[test]
    fn test_uniform_marginal_chi_square_lucky() {
        // Khi-deux sur 20 000 tirages uniformes du numéro chance :
        // 9 degrés de liberté, seuil large (p ~ 0.001).
        let mut rng = StdRng::seed_from_u64(2024);
        let weights = vec![0.1; 10];
        let mut counts = [0u32; 10];
        let n = 20_000;
        for _ in 0..n {
            counts[(sample_single(&weights, &mut rng) - 1) as usize] += 1;
        }
        let expected = n as f64 / 10.0;
        let chi2: f64 = counts
            .iter()
            .map(|&c| {
                let d = c as f64 - expected;
                d * d / expected
            })
            .sum();
        assert!(chi2 < 27.88, "khi-deux trop élevé : {}", chi2);
    }
}
