use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use loto_db::db::insert_draw;
use loto_db::freshness::IngestionState;
use loto_db::models::{validate_draw, Draw};
use loto_db::rusqlite::Connection;

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

/// Import d'une archive CSV FDJ : séparateur point-virgule, colonnes
/// repérées par leur en-tête. Les lignes invalides sont comptées, pas
/// bloquantes.
pub fn import_csv(
    conn: &Connection,
    path: &Path,
    freshness: &IngestionState,
) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;

    let headers = reader
        .headers()
        .context("En-tête CSV manquant")?
        .clone();
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .with_context(|| format!("Colonne '{}' absente de l'en-tête", name))
    };

    let idx_official = column("annee_numero_de_tirage")?;
    let idx_day = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("jour_de_tirage"));
    let idx_date = column("date_de_tirage")?;
    let idx_numbers = [
        column("boule_1")?,
        column("boule_2")?,
        column("boule_3")?,
        column("boule_4")?,
        column("boule_5")?,
    ];
    let idx_lucky = column("numero_chance")?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for record in reader.records() {
        let record = record.context("Erreur de lecture CSV")?;
        result.total_records += 1;

        match parse_record(&record, idx_official, idx_day, idx_date, &idx_numbers, idx_lucky) {
            Ok(draw) => {
                if insert_draw(conn, &draw)? {
                    result.inserted += 1;
                } else {
                    result.skipped += 1;
                }
            }
            Err(err) => {
                result.errors += 1;
                eprintln!("Ligne {} ignorée : {}", result.total_records + 1, err);
            }
        }
    }

    if result.inserted > 0 {
        freshness.mark_refreshed(Utc::now());
    }

    Ok(result)
}

fn parse_record(
    record: &csv::StringRecord,
    idx_official: usize,
    idx_day: Option<usize>,
    idx_date: usize,
    idx_numbers: &[usize; 5],
    idx_lucky: usize,
) -> Result<Draw> {
    let get = |idx: usize| -> Result<&str> {
        record
            .get(idx)
            .map(str::trim)
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let get_u8 = |idx: usize| -> Result<u8> {
        let s = get(idx)?;
        s.parse::<u8>()
            .with_context(|| format!("Impossible de parser '{}' (index {})", s, idx))
    };

    let official = get(idx_official)?;
    let official_draw_id = if official.is_empty() {
        None
    } else {
        Some(official.to_string())
    };

    let day = idx_day
        .and_then(|idx| record.get(idx))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_uppercase());

    let date = parse_fdj_date(get(idx_date)?)?;

    let numbers: [u8; 5] = [
        get_u8(idx_numbers[0])?,
        get_u8(idx_numbers[1])?,
        get_u8(idx_numbers[2])?,
        get_u8(idx_numbers[3])?,
        get_u8(idx_numbers[4])?,
    ];
    let lucky = get_u8(idx_lucky)?;

    validate_draw(&numbers, lucky)?;

    Ok(Draw {
        id: 0,
        official_draw_id,
        day,
        date,
        numbers,
        lucky,
    })
}

/// Les fichiers FDJ datent en JJ/MM/AAAA.
fn parse_fdj_date(raw: &str) -> Result<NaiveDate> {
    match NaiveDate::parse_from_str(raw, "%d/%m/%Y") {
        Ok(date) => Ok(date),
        Err(_) => bail!("Format de date invalide : '{}'", raw),
    }
}
