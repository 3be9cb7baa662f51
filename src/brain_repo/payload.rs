// Prediction body decoding and the poll error taxonomy

use serde_json::{Map, Value};

use crate::models::Prediction;

/// Max characters of a non-JSON error body carried into a `Status` error.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Why a poll produced no prediction. Every variant is non-fatal: the poll cycle is skipped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PollError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    #[error("prediction service returned {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("undecodable response: {0}")]
    Decode(String),
    #[error("response missing numeric field `{0}`")]
    MissingField(&'static str),
    /// 200 response carrying a status message instead of a prediction (e.g. no metrics scraped yet).
    #[error("prediction service reported: {0}")]
    Backend(String),
}

impl PollError {
    /// Short label for structured logs and counters.
    pub fn kind(&self) -> &'static str {
        match self {
            PollError::Transport(_) => "transport",
            PollError::Timeout => "timeout",
            PollError::Status { .. } => "status",
            PollError::Decode(_) => "decode",
            PollError::MissingField(_) => "missing_field",
            PollError::Backend(_) => "backend",
        }
    }
}

/// Decodes a 2xx body into a prediction.
pub fn decode_prediction(body: &[u8]) -> Result<Prediction, PollError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| PollError::Decode(e.to_string()))?;
    let obj = value
        .as_object()
        .ok_or_else(|| PollError::Decode(format!("expected JSON object, got {}", kind_of(&value))))?;

    if !obj.contains_key("current_cpu")
        && let Some(message) = backend_message(obj)
    {
        return Err(PollError::Backend(message));
    }

    let current_cpu = number_field(obj, "current_cpu")?;
    let predicted_cpu = number_field(obj, "predicted_cpu")?;
    // Non-string actions fall into the non-alert case.
    let action = obj.get("action").and_then(Value::as_str).map(str::to_owned);

    Ok(Prediction {
        current_cpu,
        predicted_cpu,
        action,
    })
}

/// Builds the detail for a non-2xx response: `error: details` if the body is the service's
/// JSON error object, otherwise the (truncated) body text.
pub fn error_detail(body: &[u8]) -> String {
    if let Ok(Value::Object(obj)) = serde_json::from_slice::<Value>(body) {
        let error = text_field(&obj, "error");
        let details = text_field(&obj, "details");
        match (error, details) {
            (Some(e), Some(d)) => return format!("{}: {}", e, d),
            (Some(e), None) => return e.to_string(),
            (None, Some(d)) => return d.to_string(),
            (None, None) => {}
        }
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return "empty body".to_string();
    }
    text.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

fn number_field(obj: &Map<String, Value>, name: &'static str) -> Result<f64, PollError> {
    obj.get(name)
        .and_then(Value::as_f64)
        .ok_or(PollError::MissingField(name))
}

fn backend_message(obj: &Map<String, Value>) -> Option<String> {
    let status = text_field(obj, "status");
    let message = text_field(obj, "message").or_else(|| text_field(obj, "error"));
    match (status, message) {
        (Some(status), Some(message)) => Some(format!("{}: {}", status, message)),
        (None, Some(message)) => Some(message.to_string()),
        (Some(status), None) => Some(status.to_string()),
        (None, None) => None,
    }
}

fn text_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
