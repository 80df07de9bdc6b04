// src/session.rs
//! Line-oriented prediction sessions for the command-line client.
//!
//! Each non-empty line is a JSON record. Lines starting with `#` are skipped
//! and a line reading `clear` empties the history.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::client::ApiClient;
use crate::features::InputRecord;
use crate::history::PredictionHistory;
use crate::model::load_model;
use crate::prediction::{PredictionResult, PredictionService};

/// Where predictions come from: a running API or an in-process model.
pub enum PredictionBackend {
    Api(ApiClient),
    Local(PredictionService),
}

impl PredictionBackend {
    /// Loads the artifact at `model_path` and scores in-process.
    pub fn local(model_path: &Path) -> Result<Self> {
        let model = load_model(model_path).context("Erreur de chargement du modèle")?;
        model.log_summary();
        Ok(PredictionBackend::Local(PredictionService::new(Arc::new(model))))
    }

    pub async fn predict(&self, record: &InputRecord) -> Result<PredictionResult> {
        match self {
            PredictionBackend::Api(client) => {
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.green} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                spinner.set_message("🔄 Analyse en cours...");
                spinner.enable_steady_tick(Duration::from_millis(100));
                let outcome = client.predict(record).await;
                spinner.finish_and_clear();
                Ok(PredictionResult::from(outcome?))
            }
            PredictionBackend::Local(service) => {
                service.predict_record(record).map_err(anyhow::Error::new)
            }
        }
    }
}

/// What happened to one input line.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Predicted { line: usize, result: PredictionResult },
    Rejected { line: usize, message: String },
    Cleared,
}

/// Runs every line of `reader` through `backend`, reporting each outcome to
/// `on_event`. Bad lines are reported and skipped; only successes are kept
/// in the returned history.
pub async fn run_session<R, F>(
    backend: &PredictionBackend,
    reader: R,
    mut on_event: F,
) -> Result<PredictionHistory>
where
    R: AsyncBufRead + Unpin,
    F: FnMut(&SessionEvent),
{
    let mut history = PredictionHistory::new();
    let mut lines = reader.lines();
    let mut line_number = 0usize;

    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        line_number += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line == "clear" {
            history.clear();
            on_event(&SessionEvent::Cleared);
            continue;
        }

        let outcome = match PredictionService::parse_record(line.as_bytes()) {
            Ok(record) => backend.predict(&record).await,
            Err(e) => Err(anyhow::Error::new(e)),
        };

        let event = match outcome {
            Ok(result) => {
                history.record(&result.label, result.confidence);
                SessionEvent::Predicted {
                    line: line_number,
                    result,
                }
            }
            Err(e) => {
                warn!("Line {}: {:#}", line_number, e);
                SessionEvent::Rejected {
                    line: line_number,
                    message: format!("{:#}", e),
                }
            }
        };
        on_event(&event);
    }

    Ok(history)
}
