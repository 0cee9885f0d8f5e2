use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use loto_core::backtest::BacktestResult;
use loto_core::generator::PredictionBatch;
use loto_core::stats::{
    CooccurrenceStats, PatternDistribution, StatsFrequencies, StatsOverview,
};
use loto_db::models::Draw;

use crate::import::ImportResult;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = new_table(vec!["Date", "Jour", "Numéros", "Chance"]);
    for draw in draws {
        let mut sorted = draw.numbers;
        sorted.sort();
        let numbers_str = sorted
            .iter()
            .map(|n| format!("{:2}", n))
            .collect::<Vec<_>>()
            .join(" - ");

        table.add_row(vec![
            draw.date.to_string(),
            draw.day.clone().unwrap_or_else(|| "—".to_string()),
            numbers_str,
            draw.lucky.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_overview(overview: &StatsOverview) {
    println!("\n📊 Vue d'ensemble\n");
    println!("  Tirages en base : {}", overview.total_draws);
    if let (Some(first), Some(last)) = (overview.first_draw_date, overview.last_draw_date) {
        println!("  Période          : {} → {}", first, last);
    }

    if !overview.draws_per_day_of_week.is_empty() {
        let mut table = new_table(vec!["Jour", "Tirages"]);
        for day in &overview.draws_per_day_of_week {
            table.add_row(vec![&day.day_name, &day.count.to_string()]);
        }
        println!("{table}");
    }
}

pub fn display_frequencies(frequencies: &StatsFrequencies) {
    println!("\n── Numéros (1-49) ──");
    let mut table = new_table(vec!["Numéro", "Sorties", "Fréquence"]);
    for f in &frequencies.main_numbers {
        table.add_row(vec![
            &format!("{:2}", f.number),
            &f.count.to_string(),
            &format!("{:.4}", f.frequency),
        ]);
    }
    println!("{table}");

    println!("\n── Numéros chance (1-10) ──");
    let mut table = new_table(vec!["Numéro", "Sorties", "Fréquence"]);
    for f in &frequencies.lucky_numbers {
        table.add_row(vec![
            &format!("{:2}", f.number),
            &f.count.to_string(),
            &format!("{:.4}", f.frequency),
        ]);
    }
    println!("{table}");
}

pub fn display_patterns(patterns: &PatternDistribution) {
    println!("\n── Sommes des 5 numéros ──");
    let mut table = new_table(vec!["Tranche", "Tirages"]);
    for bucket in &patterns.sum_buckets {
        table.add_row(vec![
            &format!("{}-{}", bucket.min_inclusive, bucket.max_inclusive),
            &bucket.count.to_string(),
        ]);
    }
    println!("{table}");

    println!("\n── Numéros pairs par tirage ──");
    let mut table = new_table(vec!["Pairs", "Tirages"]);
    for bucket in &patterns.even_count_distribution {
        table.add_row(vec![&bucket.value.to_string(), &bucket.count.to_string()]);
    }
    println!("{table}");

    println!("\n── Petits numéros (≤ 25) par tirage ──");
    let mut table = new_table(vec!["Petits", "Tirages"]);
    for bucket in &patterns.low_count_distribution {
        table.add_row(vec![&bucket.value.to_string(), &bucket.count.to_string()]);
    }
    println!("{table}");
}

pub fn display_cooccurrence(stats: &CooccurrenceStats) {
    println!(
        "\n🔗 Co-occurrences du {} ({} tirages, {} avec ce numéro)\n",
        stats.base_number, stats.total_draws, stats.draws_containing_base
    );

    if stats.cooccurrences.is_empty() {
        println!("Aucune co-occurrence.");
        return;
    }

    let mut table = new_table(vec!["Numéro", "Ensemble", "P(n | base)", "P(n)"]);
    for c in &stats.cooccurrences {
        table.add_row(vec![
            &format!("{:2}", c.number),
            &c.cooccurrence_count.to_string(),
            &format!("{:.4}", c.conditional_probability),
            &format!("{:.4}", c.global_probability),
        ]);
    }
    println!("{table}");
}

pub fn display_predictions(batch: &PredictionBatch) {
    println!(
        "\n🎰 {} grille(s) générée(s) sur {} demandée(s) — stratégie {}\n",
        batch.grids.len(),
        batch.requested,
        batch.strategy
    );

    if batch.grids.is_empty() {
        println!("Aucune grille ne satisfait les contraintes.");
        return;
    }

    let mut table = new_table(vec!["#", "Numéros", "Chance", "Score"]);
    for (i, grid) in batch.grids.iter().enumerate() {
        let numbers_str = grid
            .numbers
            .iter()
            .map(|n| format!("{:2}", n))
            .collect::<Vec<_>>()
            .join(" - ");
        table.add_row(vec![
            &(i + 1).to_string(),
            &numbers_str,
            &grid.lucky.to_string(),
            &format!("{:.4}", grid.score),
        ]);
    }
    println!("{table}");
}

pub fn display_backtest(result: &BacktestResult) {
    println!("\n📈 Backtest — stratégie {}\n", result.strategy);
    println!("  Tirages analysés      : {}", result.total_draws_analyzed);
    println!(
        "  Numéros trouvés (moy.) : {:.4}",
        result.average_matched_main
    );

    if result.distributions.is_empty() {
        return;
    }

    let mut table = new_table(vec!["Numéros trouvés", "Chance trouvée", "Tirages"]);
    for d in &result.distributions {
        table.add_row(vec![
            d.matched_main.to_string(),
            if d.matched_lucky { "oui" } else { "non" }.to_string(),
            d.count.to_string(),
        ]);
    }
    println!("{table}");
}
