// src/client.rs
use anyhow::{bail, Context, Result};
use log::debug;
use reqwest::StatusCode;
use std::time::Duration;
use url::Url;

use crate::api::types::{HealthResponse, PredictOutcome, PredictSuccess};
use crate::features::InputRecord;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(3);
const PREDICT_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin client for a running prediction API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid API URL '{}'", base_url))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!("API URL must use http or https, got '{}'", base_url.scheme());
        }
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `path` against the base URL, keeping any base path prefix.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path.trim_start_matches('/'))
            .with_context(|| format!("Failed to build URL for '{}'", path))
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let url = self.endpoint("health")?;
        debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .context("Impossible de se connecter à l'API")?;
        if response.status() != StatusCode::OK {
            bail!("API inaccessible (HTTP {})", response.status().as_u16());
        }
        response
            .json::<HealthResponse>()
            .await
            .context("Failed to parse health response")
    }

    pub async fn predict(&self, record: &InputRecord) -> Result<PredictSuccess> {
        let url = self.endpoint("predict")?;
        debug!("POST {}", url);
        let response = self
            .http
            .post(url)
            .timeout(PREDICT_TIMEOUT)
            .json(record)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow::anyhow!("Délai d'attente dépassé : le serveur met trop de temps à répondre")
                } else {
                    anyhow::Error::new(e).context("Impossible de se connecter à l'API")
                }
            })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .context("Failed to read prediction response")?;
        interpret_predict_response(status, &bytes)
    }
}

/// Turns a `/predict` HTTP answer into a success or a descriptive error.
pub fn interpret_predict_response(status: StatusCode, body: &[u8]) -> Result<PredictSuccess> {
    match serde_json::from_slice::<PredictOutcome>(body) {
        Ok(PredictOutcome::Success(success)) if status == StatusCode::OK && success.success => {
            Ok(success)
        }
        Ok(PredictOutcome::Failure(failure)) => bail!("Erreur retournée par l'API : {}", failure.error),
        _ => bail!("Erreur API : code {}", status.as_u16()),
    }
}
