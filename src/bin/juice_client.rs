// src/bin/juice_client.rs
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use tokio::io::BufReader;

use juice_quality_lib::client::ApiClient;
use juice_quality_lib::exploration::{Dataset, DatasetSummary, TARGET_COLUMN};
use juice_quality_lib::features::{
    record_from_values, InputRecord, FEATURE_COUNT, FEATURE_LABELS, FEATURE_ORDER,
};
use juice_quality_lib::history::PredictionHistory;
use juice_quality_lib::prediction::PredictionResult;
use juice_quality_lib::session::{run_session, PredictionBackend, SessionEvent};
use juice_quality_lib::utils::config::{api_url_from_env, DEFAULT_MODEL_PATH};
use juice_quality_lib::utils::env::load_env;

#[derive(Parser)]
#[command(author, version, about = "Client for the juice quality prediction API", long_about = None)]
struct ClientArgs {
    /// Base URL of the API (defaults to JUICE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that the API answers on /health
    Health,
    /// Predict one sample through the API
    Predict(FeatureArgs),
    /// Predict one sample with a local model artifact
    Local {
        /// Model artifact to load
        #[arg(long, default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,
        #[command(flatten)]
        features: FeatureArgs,
    },
    /// Predict one JSON record per line, keeping a history ("clear" resets it)
    Session {
        /// Read records from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
        /// Use a local model artifact instead of the API
        #[arg(long)]
        model: Option<PathBuf>,
    },
    /// Summarize a training dataset (shape, statistics, classes, correlations)
    Explore {
        /// CSV file with one column per feature plus quality_category
        #[arg(long)]
        data: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

/// One flag per feature, defaulting to the reference sample.
#[derive(Args, Debug, Clone)]
struct FeatureArgs {
    /// Acidité fixe (g/L)
    #[arg(long, default_value_t = 7.4)]
    fixed_acidity: f64,
    /// Acidité volatile (g/L)
    #[arg(long, default_value_t = 0.7)]
    volatile_acidity: f64,
    /// Acide citrique (g/L)
    #[arg(long, default_value_t = 0.0)]
    citric_acid: f64,
    /// Sucre résiduel (g/L)
    #[arg(long, default_value_t = 1.9)]
    residual_sugar: f64,
    /// Chlorures (g/L)
    #[arg(long, default_value_t = 0.076)]
    chlorides: f64,
    /// SO2 libre (mg/L)
    #[arg(long, default_value_t = 11.0)]
    free_sulfur_dioxide: f64,
    /// SO2 total (mg/L)
    #[arg(long, default_value_t = 34.0)]
    total_sulfur_dioxide: f64,
    /// Densité (g/cm³)
    #[arg(long, default_value_t = 0.9978)]
    density: f64,
    /// pH
    #[arg(long = "ph", default_value_t = 3.51)]
    ph: f64,
    /// Sulfates (g/L)
    #[arg(long, default_value_t = 0.56)]
    sulphates: f64,
    /// Alcool (% vol)
    #[arg(long, default_value_t = 9.4)]
    alcohol: f64,
}

impl FeatureArgs {
    fn values(&self) -> [f64; FEATURE_COUNT] {
        [
            self.fixed_acidity,
            self.volatile_acidity,
            self.citric_acid,
            self.residual_sugar,
            self.chlorides,
            self.free_sulfur_dioxide,
            self.total_sulfur_dioxide,
            self.density,
            self.ph,
            self.sulphates,
            self.alcohol,
        ]
    }

    fn to_record(&self) -> InputRecord {
        record_from_values(&self.values())
    }

    fn print(&self) {
        println!("📋 Caractéristiques du jus");
        for (label, value) in FEATURE_LABELS.iter().zip(self.values().iter()) {
            println!("   {:<24} {}", label, value);
        }
    }
}

fn print_result(result: &PredictionResult) {
    let (emoji, description) = match result.label.as_str() {
        "Mauvais" => ("😞", "Qualité jugée faible."),
        "Moyen" => ("😐", "Qualité correcte."),
        "Bon" => ("😄", "Qualité élevée."),
        _ => ("🍊", "Résultat de la prédiction."),
    };
    let confidence = result
        .confidence
        .map(|c| format!("{:.1}%", c * 100.0))
        .unwrap_or_else(|| "N/A".to_string());

    println!("✅ Prédiction réussie !");
    println!("   {} {} (classe {})", emoji, result.label, result.class_index);
    println!("   {}", description);
    println!("   Confiance: {}", confidence);
}

fn print_history(history: &PredictionHistory) {
    println!();
    println!("📈 Historique ({} prédictions)", history.len());
    for entry in history.newest_first() {
        let confidence = entry
            .confidence
            .map(|c| format!("{:.1}%", c * 100.0))
            .unwrap_or_else(|| "N/A".to_string());
        println!(
            "   {}  {:<8} {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.label,
            confidence
        );
    }
    for (label, count) in history.label_counts() {
        println!("   {}: {}", label, count);
    }
}

fn format_stat(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.3}", v))
        .unwrap_or_else(|| "NaN".to_string())
}

fn print_summary(summary: &DatasetSummary) {
    println!("📊 Exploration des données");
    println!("   Nombre de lignes : {}", summary.n_rows);
    println!("   Nombre de colonnes : {}", summary.n_columns);
    println!("   Colonnes : {}", summary.columns.join(", "));

    println!();
    println!("📋 Statistiques descriptives");
    println!(
        "   {:<22} {:>6} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}",
        "", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    );
    for stats in &summary.statistics {
        println!(
            "   {:<22} {:>6} {:>9.3} {:>9} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>9.3}",
            stats.name,
            stats.count,
            stats.mean,
            format_stat(stats.std),
            stats.min,
            stats.q25,
            stats.median,
            stats.q75,
            stats.max
        );
    }

    println!();
    match &summary.class_counts {
        Some(counts) => {
            println!("🍊 Distribution de la cible ({})", TARGET_COLUMN);
            for (class, count) in counts {
                println!("   {:<8} {}", class, count);
            }
        }
        None => println!("⚠️  Colonne {} absente", TARGET_COLUMN),
    }

    println!();
    println!("🔗 Matrice de corrélation");
    for (name, row) in summary.correlation.columns.iter().zip(&summary.correlation.values) {
        let cells: Vec<String> = row.iter().map(|r| format!("{:>7}", format_stat(*r))).collect();
        println!("   {:<22} {}", name, cells.join(" "));
    }
}

fn print_event(event: &SessionEvent) {
    match event {
        SessionEvent::Predicted { result, .. } => print_result(result),
        SessionEvent::Rejected { line, message } => println!("❌ Ligne {} : {}", line, message),
        SessionEvent::Cleared => println!("🗑️  Historique effacé"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    load_env();

    let args = ClientArgs::parse();
    let api_url = args.api_url.unwrap_or_else(api_url_from_env);

    match args.command {
        Command::Health => {
            let client = ApiClient::new(&api_url)?;
            info!("Checking API at {}", client.base_url());
            match client.health().await {
                Ok(health) => {
                    println!("✅ API connectée !");
                    println!("   Statut: {}", health.status);
                    println!("   Modèle: {}", health.model_type);
                }
                Err(e) => {
                    println!("❌ {:#}", e);
                    std::process::exit(1);
                }
            }
        }
        Command::Predict(features) => {
            features.print();
            let backend = PredictionBackend::Api(ApiClient::new(&api_url)?);
            match backend.predict(&features.to_record()).await {
                Ok(result) => print_result(&result),
                Err(e) => {
                    println!("❌ {:#}", e);
                    std::process::exit(1);
                }
            }
        }
        Command::Local { model, features } => {
            features.print();
            let backend = PredictionBackend::local(&model)?;
            let result = backend.predict(&features.to_record()).await?;
            print_result(&result);
        }
        Command::Session { input, model } => {
            let backend = match model {
                Some(path) => PredictionBackend::local(&path)?,
                None => PredictionBackend::Api(ApiClient::new(&api_url)?),
            };
            info!("Session started, expecting records with fields {:?}", FEATURE_ORDER);

            let history = match input {
                Some(path) => {
                    let file = tokio::fs::File::open(&path)
                        .await
                        .with_context(|| format!("Failed to open {}", path.display()))?;
                    run_session(&backend, BufReader::new(file), print_event).await?
                }
                None => run_session(&backend, BufReader::new(tokio::io::stdin()), print_event).await?,
            };

            if history.is_empty() {
                println!("Aucune prédiction encore");
            } else {
                print_history(&history);
            }
        }
        Command::Explore { data, json } => {
            let summary = Dataset::from_path(&data)?.summarize();
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&summary).context("Failed to encode summary")?
                );
            } else {
                print_summary(&summary);
            }
        }
    }

    Ok(())
}
