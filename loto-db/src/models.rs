use anyhow::{bail, Result};
use chrono::NaiveDate;

/// Un tirage historique du Loto : 5 numéros (1-49) et 1 numéro chance (1-10).
#[derive(Debug, Clone, PartialEq)]
pub struct Draw {
    pub id: i64,
    pub official_draw_id: Option<String>,
    pub day: Option<String>,
    pub date: NaiveDate,
    pub numbers: [u8; 5],
    pub lucky: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    Main,
    Lucky,
}

impl Pool {
    pub fn size(&self) -> usize {
        match self {
            Pool::Main => 49,
            Pool::Lucky => 10,
        }
    }

    pub fn pick_count(&self) -> usize {
        match self {
            Pool::Main => 5,
            Pool::Lucky => 1,
        }
    }

    pub fn numbers_from<'a>(&self, draw: &'a Draw) -> &'a [u8] {
        match self {
            Pool::Main => &draw.numbers,
            Pool::Lucky => std::slice::from_ref(&draw.lucky),
        }
    }
}

pub fn validate_draw(numbers: &[u8; 5], lucky: u8) -> Result<()> {
    for &n in numbers {
        if n < 1 || n > 49 {
            bail!("Numéro {} hors limites (1-49)", n);
        }
    }
    if lucky < 1 || lucky > 10 {
        bail!("Numéro chance {} hors limites (1-10)", lucky);
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    Ok(())
}

/// Historique synthétique pour les tests : n tirages cycliques valides.
pub fn make_test_draws(n: usize) -> Vec<Draw> {
    (0..n)
        .map(|i| {
            let base = (i % 9) as u8;
            let day = if i % 2 == 0 { "SAMEDI" } else { "MERCREDI" };
            Draw {
                id: i as i64 + 1,
                official_draw_id: Some(format!("2024{:03}", i + 1)),
                day: Some(day.to_string()),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Days::new(i as u64 * 3),
                numbers: [
                    base * 5 + 1,
                    base * 5 + 2,
                    base * 5 + 3,
                    base * 5 + 4,
                    base * 5 + 5,
                ],
                lucky: base % 10 + 1,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_draw_ok() {
        assert!(validate_draw(&[1, 2, 3, 4, 5], 1).is_ok());
        assert!(validate_draw(&[49, 48, 47, 46, 45], 10).is_ok());
    }

    #[test]
    fn test_validate_draw_number_out_of_range() {
        assert!(validate_draw(&[0, 2, 3, 4, 5], 1).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 50], 1).is_err());
    }

    #[test]
    fn test_validate_draw_lucky_out_of_range() {
        assert!(validate_draw(&[1, 2, 3, 4, 5], 0).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5], 11).is_err());
    }

    #[test]
    fn test_validate_draw_duplicate_number() {
        assert!(validate_draw(&[1, 1, 3, 4, 5], 1).is_err());
    }

    #[test]
    fn test_pool_size() {
        assert_eq!(Pool::Main.size(), 49);
        assert_eq!(Pool::Lucky.size(), 10);
    }

    #[test]
    fn test_pool_pick_count() {
        assert_eq!(Pool::Main.pick_count(), 5);
        assert_eq!(Pool::Lucky.pick_count(), 1);
    }

    #[test]
    fn test_pool_numbers_from() {
        let draw = Draw {
            id: 1,
            official_draw_id: None,
            day: Some("LUNDI".to_string()),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            numbers: [1, 2, 3, 4, 5],
            lucky: 7,
        };
        assert_eq!(Pool::Main.numbers_from(&draw), &[1, 2, 3, 4, 5]);
        assert_eq!(Pool::Lucky.numbers_from(&draw), &[7]);
    }

    #[test]
    fn test_make_test_draws_valid() {
        for draw in make_test_draws(50) {
            assert!(validate_draw(&draw.numbers, draw.lucky).is_ok());
        }
    }

    #[test]
    fn test_make_test_draws_dates_increasing() {
        let draws = make_test_draws(10);
        for pair in draws.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }
}
