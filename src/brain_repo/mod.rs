// Prediction service client ("the Brain") via reqwest

mod payload;

pub use payload::{PollError, decode_prediction, error_detail};

use crate::models::Prediction;
use async_trait::async_trait;
use std::time::Duration;
use tracing::instrument;

/// Source of predictions for the poller. `BrainRepo` is the HTTP implementation.
#[async_trait]
pub trait PredictionSource: Send + Sync {
    async fn fetch_prediction(&self) -> Result<Prediction, PollError>;
}

#[derive(Debug, Clone)]
pub struct BrainRepo {
    client: reqwest::Client,
    url: String,
}

impl BrainRepo {
    pub fn new(url: impl Into<String>, request_timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("building HTTP client: {}", e))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PredictionSource for BrainRepo {
    #[instrument(skip(self), fields(repo = "brain", operation = "fetch_prediction"))]
    async fn fetch_prediction(&self) -> Result<Prediction, PollError> {
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(PollError::Status {
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }

        decode_prediction(&body)
    }
}

fn transport_error(e: reqwest::Error) -> PollError {
    if e.is_timeout() {
        PollError::Timeout
    } else {
        PollError::Transport(e.to_string())
    }
}
