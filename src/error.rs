use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong between building a client and receiving a response body.
#[derive(Debug, Error)]
pub enum Error {
    #[error("missing BEA API key (set {searched})")]
    CredentialMissing { searched: String },

    #[error("configuration error: {0:#}")]
    Config(#[from] anyhow::Error),

    /// The service answered with a non-success status. `url` excludes the query string.
    #[error("BEA request failed: HTTP {status} for url ({url}){}", fmt_message(.message))]
    Transport {
        status: StatusCode,
        url: String,
        message: String,
        body: String,
    },

    #[error("could not reach {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("dataset {dataset} requires parameter(s) {}", .missing.join(", "))]
    Validation {
        dataset: String,
        missing: Vec<String>,
    },

    #[error("unknown dataset {0:?}")]
    UnknownDataset(String),
}

impl Error {
    /// HTTP status of a failed request, if the service answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Transport { status, .. } => Some(*status),
            Error::Network { source, .. } => source.status(),
            _ => None,
        }
    }
}

fn fmt_message(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(": {}", message)
    }
}

// BEA wraps errors as {"BEAAPI": {"Error": {...}}}, sometimes under "Results".
#[derive(Debug, serde::Deserialize)]
struct BeaEnvelope {
    #[serde(rename = "BEAAPI")]
    beaapi: BeaBody,
}

#[derive(Debug, serde::Deserialize)]
struct BeaBody {
    #[serde(default, rename = "Error")]
    error: Option<BeaErrorDetail>,
    #[serde(default, rename = "Results")]
    results: Option<BeaResults>,
}

#[derive(Debug, serde::Deserialize)]
struct BeaResults {
    #[serde(default, rename = "Error")]
    error: Option<BeaErrorDetail>,
}

#[derive(Debug, serde::Deserialize)]
struct BeaErrorDetail {
    #[serde(default, rename = "APIErrorCode")]
    code: Option<serde_json::Value>,
    #[serde(default, rename = "APIErrorDescription")]
    description: Option<String>,
}

/// Best-effort summary of a BEA error document; empty when the body is something else.
pub(crate) fn bea_error_message(body: &str) -> String {
    let Ok(envelope) = serde_json::from_str::<BeaEnvelope>(body) else {
        return String::new();
    };
    let Some(detail) = envelope
        .beaapi
        .error
        .or_else(|| envelope.beaapi.results.and_then(|r| r.error))
    else {
        return String::new();
    };

    let description = detail.description.unwrap_or_default();
    match detail.code {
        Some(serde_json::Value::String(c)) => format!("[{}] {}", c, description),
        Some(serde_json::Value::Number(c)) => format!("[{}] {}", c, description),
        _ => description,
    }
}
