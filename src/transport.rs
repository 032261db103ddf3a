use anyhow::Context;
use log::{debug, warn};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::thread;
use std::time::Duration;

use crate::error::{Error, Result, bea_error_message};
use crate::params::Params;
use crate::util::{Attempt, attempt_loop, retriable_status, strip_query};

/// Status and body text of a successful request. The body is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Issues one GET with query parameters and classifies the outcome.
///
/// Implementations must return [`Error::Transport`] for non-success statuses.
pub trait Transport {
    fn get(&self, url: &str, params: &Params) -> Result<RawResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str, params: &Params) -> Result<RawResponse> {
        (**self).get(url, params)
    }
}

/// How many times a request may be attempted. The default is a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    /// Upper bound for the sleep between attempts.
    pub sleep_max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            sleep_max: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn attempts(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }
}

/// Blocking HTTP transport; the underlying connection pool lives as long as the transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: HttpClient,
    retry: RetryPolicy,
}

impl HttpTransport {
    pub fn new(timeout: Duration, verify: bool, retry: RetryPolicy) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("beaapi-rs/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("beaapi-rs")),
        );

        let mut builder = HttpClient::builder()
            .default_headers(default_headers)
            .timeout(timeout);

        if !verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder.build().context("failed to build HTTP client")?;
        Ok(Self { http, retry })
    }

    pub fn retry(&self) -> RetryPolicy {
        self.retry
    }

    fn get_once(&self, url: &str, params: &Params) -> Attempt<RawResponse, Error> {
        let resp = match self.http.get(url).query(params).send() {
            Ok(resp) => resp,
            Err(e) => {
                let err = Error::Network {
                    url: strip_query(url).to_string(),
                    source: e.without_url(),
                };
                return Attempt::Retry(Err(err));
            }
        };

        let status = resp.status();
        let body = match resp.text() {
            Ok(body) => body,
            Err(e) => {
                let err = Error::Network {
                    url: strip_query(url).to_string(),
                    source: e.without_url(),
                };
                return Attempt::Retry(Err(err));
            }
        };

        let outcome = classify(status, url, body);
        if retriable_status(status.as_u16()) {
            Attempt::Retry(outcome)
        } else {
            match outcome {
                Ok(raw) => Attempt::Done(raw),
                Err(e) => Attempt::Fail(e),
            }
        }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, params: &Params) -> Result<RawResponse> {
        attempt_loop(
            self.retry.max_attempts,
            self.retry.sleep_max,
            thread::sleep,
            |attempt| {
                if attempt > 1 {
                    warn!("retrying GET {} (attempt {})", strip_query(url), attempt);
                }
                self.get_once(url, params)
            },
        )
    }
}

/// 2xx becomes a [`RawResponse`]; anything else an [`Error::Transport`] keeping the body.
pub(crate) fn classify(
    status: reqwest::StatusCode,
    url: &str,
    body: String,
) -> Result<RawResponse> {
    if status.is_success() {
        debug!("HTTP {} from {} ({} bytes)", status, strip_query(url), body.len());
        return Ok(RawResponse {
            status: status.as_u16(),
            body,
        });
    }

    Err(Error::Transport {
        status,
        url: strip_query(url).to_string(),
        message: bea_error_message(&body),
        body,
    })
}
