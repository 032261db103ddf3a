use anyhow::{Context, bail};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::ClientConfig;
use crate::error::{Error, Result};
use crate::transport::RetryPolicy;

pub const DEFAULT_URL: &str = "https://apps.bea.gov/api/data";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// The BEA API token (`UserID`).
///
/// Its `Debug` output never shows the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[derive(Debug, Default)]
struct RcConfig {
    url: Option<String>,
    key: Option<String>,
    verify: Option<bool>,
    timeout: Option<Duration>,
}

pub(crate) fn load_config(
    key: Option<String>,
    url: Option<String>,
    verify: Option<bool>,
) -> Result<ClientConfig> {
    resolve_config(key, url, verify, |name| std::env::var(name).ok(), &rc_candidates())
}

/// Explicit arguments first, then environment, then the first rc file that exists.
fn resolve_config(
    key: Option<String>,
    url: Option<String>,
    verify: Option<bool>,
    env: impl Fn(&str) -> Option<String>,
    rc_candidates: &[PathBuf],
) -> Result<ClientConfig> {
    let mut key = key.or_else(|| env("BEA_API_KEY"));
    let mut url = url.or_else(|| env("BEA_API_URL"));
    let mut file_verify: Option<bool> = None;
    let mut timeout: Option<Duration> = None;

    for rc_path in rc_candidates {
        if rc_path.exists() {
            let cfg = read_rc(rc_path).with_context(|| {
                format!("failed to read configuration file {}", rc_path.display())
            })?;

            if key.is_none() {
                key = cfg.key;
            }
            if url.is_none() {
                url = cfg.url;
            }
            file_verify = cfg.verify;
            timeout = cfg.timeout;
            break;
        }
    }

    let key = match key.map(|k| k.trim().to_string()) {
        Some(v) if !v.is_empty() => v,
        _ => {
            let searched = if rc_candidates.is_empty() {
                "BEA_API_KEY".to_string()
            } else {
                format!(
                    "BEA_API_KEY or `key:` in one of: {}",
                    rc_candidates
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            };
            return Err(Error::CredentialMissing { searched });
        }
    };

    Ok(ClientConfig {
        url: url.unwrap_or_else(|| DEFAULT_URL.to_string()),
        key: Credential::new(key),
        verify: verify.or(file_verify).unwrap_or(true),
        timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
        retry: RetryPolicy::default(),
    })
}

fn read_rc(path: &Path) -> anyhow::Result<RcConfig> {
    let text = std::fs::read_to_string(path)?;
    let mut cfg = RcConfig::default();

    // `key:` may be alone on its line with the token on the next one.
    let mut pending_key: Option<&str> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(pk) = pending_key.take() {
            if !line.contains(':') {
                let v = strip_quotes(line);
                match pk {
                    "url" => cfg.url = Some(v.to_string()),
                    "key" => cfg.key = Some(v.to_string()),
                    _ => {}
                }
                continue;
            }
        }

        if let Some((k, v)) = line.split_once(':') {
            let k = k.trim();
            let v = strip_quotes(v.trim());
            match k {
                "url" | "key" if v.is_empty() => pending_key = Some(k),
                "url" => cfg.url = Some(v.to_string()),
                "key" => cfg.key = Some(v.to_string()),
                "verify" if !v.is_empty() => cfg.verify = Some(v != "0"),
                "timeout" if !v.is_empty() => {
                    let secs: u64 = match v.parse() {
                        Ok(s) if s > 0 => s,
                        _ => bail!("timeout must be a positive number of seconds, got {v:?}"),
                    };
                    cfg.timeout = Some(Duration::from_secs(secs));
                }
                _ => {}
            }
        }
    }

    Ok(cfg)
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn rc_candidates() -> Vec<PathBuf> {
    // 1) BEA_RC (explicit)
    // 2) ./.bearc
    // 3) ~/.bearc
    if let Ok(p) = std::env::var("BEA_RC") {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(".bearc"));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".bearc"));
    }
    v
}
