mod display;
mod import;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

use loto_core::backtest::{backtest, parse_date, BacktestRequest};
use loto_core::config::PredictionOptions;
use loto_core::constraints::PredictionConstraints;
use loto_core::generator::generate;
use loto_core::metrics::Metrics;
use loto_core::stats;
use loto_core::strategy::Strategy;
use loto_core::CancelFlag;
use loto_db::db::{count_draws, db_path, fetch_all_draws, fetch_last_draws, migrate, open_db};
use loto_db::freshness::IngestionState;
use loto_db::rusqlite::Connection;

use crate::display::{
    display_backtest, display_cooccurrence, display_draws, display_frequencies,
    display_import_summary, display_overview, display_patterns, display_predictions,
};

#[derive(Parser)]
#[command(name = "loto", about = "Analyseur et prédicteur de tirages Loto")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer les tirages depuis une archive CSV FDJ
    Import {
        /// Chemin vers le fichier CSV
        #[arg(short, long, default_value = "assets/loto_201911.csv")]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Vue d'ensemble et fréquences par numéro
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Histogrammes de motifs (sommes, pairs, petits numéros)
    Patterns {
        /// Largeur des tranches de sommes
        #[arg(short, long, default_value = "10")]
        bucket: u32,

        #[arg(long)]
        json: bool,
    },

    /// Co-occurrences d'un numéro de base
    Cooccurrence {
        /// Numéro de base (1-49)
        base: u8,

        /// Nombre de co-occurrences affichées (<= 0 : toutes)
        #[arg(short, long, default_value = "15")]
        top: i64,

        #[arg(long)]
        json: bool,
    },

    /// Générer des grilles pondérées par l'historique
    Predict {
        /// Nombre de grilles (défaut et plafond configurés)
        #[arg(short, long)]
        count: Option<usize>,

        /// Stratégie de pondération (nom inconnu : uniform)
        #[arg(short, long, default_value = "frequency-global")]
        strategy: String,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        min_sum: Option<u32>,
        #[arg(long)]
        max_sum: Option<u32>,
        #[arg(long)]
        min_even: Option<u32>,
        #[arg(long)]
        max_even: Option<u32>,
        #[arg(long)]
        min_low: Option<u32>,
        #[arg(long)]
        max_low: Option<u32>,

        /// Numéros imposés (séparés par des virgules)
        #[arg(long, value_delimiter = ',')]
        include: Vec<u8>,

        /// Numéros exclus (séparés par des virgules)
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<u8>,

        #[arg(long)]
        json: bool,
    },

    /// Rejouer une stratégie sur l'historique réel
    Backtest {
        /// Stratégie de pondération (nom inconnu : uniform)
        #[arg(short, long, default_value = "frequency-global")]
        strategy: String,

        /// Date de début (yyyy-MM-dd)
        #[arg(long)]
        from: Option<String>,

        /// Date de fin (yyyy-MM-dd)
        #[arg(long)]
        to: Option<String>,

        /// Sous-échantillonnage déterministe des tirages analysés
        #[arg(long)]
        sample_size: Option<usize>,

        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    let opts = PredictionOptions::default();
    let metrics = Metrics::new();
    let cancel = CancelFlag::new();
    let freshness = IngestionState::new();

    match cli.command {
        Command::Import { file } => {
            let result = import::import_csv(&conn, &file, &freshness)?;
            display_import_summary(&result);
            Ok(())
        }
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Stats { json } => cmd_stats(&conn, json),
        Command::Patterns { bucket, json } => cmd_patterns(&conn, bucket, json),
        Command::Cooccurrence { base, top, json } => cmd_cooccurrence(&conn, base, top, json),
        Command::Predict {
            count,
            strategy,
            seed,
            min_sum,
            max_sum,
            min_even,
            max_even,
            min_low,
            max_low,
            include,
            exclude,
            json,
        } => {
            let constraints = PredictionConstraints {
                min_sum,
                max_sum,
                min_even,
                max_even,
                min_low,
                max_low,
                include_numbers: include.into_iter().collect(),
                exclude_numbers: exclude.into_iter().collect(),
            };
            cmd_predict(
                &conn,
                &opts,
                &metrics,
                &cancel,
                count,
                Strategy::from_name(&strategy),
                constraints,
                seed,
                json,
            )
        }
        Command::Backtest {
            strategy,
            from,
            to,
            sample_size,
            json,
        } => cmd_backtest(
            &conn,
            &opts,
            &metrics,
            &cancel,
            Strategy::from_name(&strategy),
            from,
            to,
            sample_size,
            json,
        ),
    }
}

fn ensure_draws(conn: &Connection) -> Result<bool> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : loto import");
        return Ok(false);
    }
    Ok(true)
}

fn cmd_list(conn: &Connection, last: u32) -> Result<()> {
    if !ensure_draws(conn)? {
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &Connection, json: bool) -> Result<()> {
    let draws = fetch_all_draws(conn)?;
    let overview = stats::overview(&draws);
    let frequencies = stats::frequencies(&draws);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "overview": overview,
                "frequencies": frequencies,
            }))?
        );
        return Ok(());
    }

    display_overview(&overview);
    display_frequencies(&frequencies);
    Ok(())
}

fn cmd_patterns(conn: &Connection, bucket: u32, json: bool) -> Result<()> {
    let draws = fetch_all_draws(conn)?;
    let patterns = stats::patterns(&draws, bucket);

    if json {
        println!("{}", serde_json::to_string_pretty(&patterns)?);
        return Ok(());
    }

    display_patterns(&patterns);
    Ok(())
}

fn cmd_cooccurrence(conn: &Connection, base: u8, top: i64, json: bool) -> Result<()> {
    let draws = fetch_all_draws(conn)?;
    let result = stats::cooccurrence(&draws, base, top)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    display_cooccurrence(&result);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_predict(
    conn: &Connection,
    opts: &PredictionOptions,
    metrics: &Metrics,
    cancel: &CancelFlag,
    count: Option<usize>,
    strategy: Strategy,
    constraints: PredictionConstraints,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let draws = fetch_all_draws(conn)?;
    let count = opts.effective_count(count);
    let constraints = if constraints.is_empty() {
        None
    } else {
        Some(constraints)
    };

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = StdRng::seed_from_u64(seed);

    let batch = generate(
        &draws,
        count,
        strategy,
        constraints.as_ref(),
        opts,
        &mut rng,
        cancel,
        metrics,
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
        return Ok(());
    }

    display_predictions(&batch);
    println!("  (seed : {})", seed);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_backtest(
    conn: &Connection,
    opts: &PredictionOptions,
    metrics: &Metrics,
    cancel: &CancelFlag,
    strategy: Strategy,
    from: Option<String>,
    to: Option<String>,
    sample_size: Option<usize>,
    json: bool,
) -> Result<()> {
    let draws = fetch_all_draws(conn)?;

    let request = BacktestRequest {
        strategy,
        date_from: from.as_deref().map(parse_date).transpose()?,
        date_to: to.as_deref().map(parse_date).transpose()?,
        sample_size,
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message(format!("Backtest {} en cours…", strategy));
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = backtest(&draws, &request, opts, cancel, metrics);
    spinner.finish_and_clear();
    let result = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    display_backtest(&result);
    Ok(())
}
