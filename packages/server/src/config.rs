//! Server configuration.
//!
//! Read from environment variables at startup. Unset or unparseable values
//! fall back to the defaults below.
//!
//! | Variable | Default |
//! |---|---|
//! | `BIND_ADDR` | `127.0.0.1` |
//! | `PORT` | `8080` |
//! | `VITIBRASIL_BASE_URL` | [`DEFAULT_BASE_URL`] |
//! | `VITIBRASIL_TIMEOUT_SECS` | `15` |
//! | `FALLBACK_PATH` | [`DEFAULT_FALLBACK_PATH`] |
//! | `FALLBACK_POLICY` | `any` |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use strum_macros::{AsRefStr, Display, EnumString};
use vitibrasil_fallback::DEFAULT_FALLBACK_PATH;
use vitibrasil_source::SourceError;
use vitibrasil_source::client::DEFAULT_TIMEOUT;
use vitibrasil_source::url::DEFAULT_BASE_URL;

/// Which failures are answered from the fallback snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, AsRefStr)]
pub enum FallbackPolicy {
    /// Any failure to produce a live report, including pages whose
    /// quantities cannot be parsed.
    #[default]
    #[strum(serialize = "any")]
    AnyFailure,
    /// Only failures to reach the portal (connection, timeout, non-2xx).
    /// Extraction errors become `500 Internal Server Error`.
    #[strum(serialize = "upstream")]
    UpstreamOnly,
}

impl FallbackPolicy {
    /// Whether `error` should be answered from the snapshot.
    #[must_use]
    pub const fn falls_back_on(self, error: &SourceError) -> bool {
        match self {
            Self::AnyFailure => true,
            Self::UpstreamOnly => error.is_upstream(),
        }
    }
}

/// Runtime configuration of the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: String,
    /// Port to bind the HTTP listener to.
    pub port: u16,
    /// Portal entry point.
    pub base_url: String,
    /// Timeout of each upstream request.
    pub timeout: Duration,
    /// Location of the fallback snapshot.
    pub fallback_path: PathBuf,
    /// Which failures are served from the snapshot.
    pub fallback_policy: FallbackPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            fallback_path: PathBuf::from(DEFAULT_FALLBACK_PATH),
            fallback_policy: FallbackPolicy::default(),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable
    /// name to its value.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: parse_or(&lookup, "PORT", defaults.port),
            base_url: lookup("VITIBRASIL_BASE_URL").unwrap_or(defaults.base_url),
            timeout: Duration::from_secs(parse_or(
                &lookup,
                "VITIBRASIL_TIMEOUT_SECS",
                defaults.timeout.as_secs(),
            )),
            fallback_path: lookup("FALLBACK_PATH").map_or(defaults.fallback_path, PathBuf::from),
            fallback_policy: parse_or(&lookup, "FALLBACK_POLICY", defaults.fallback_policy),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return default;
    };

    raw.trim().parse().unwrap_or_else(|_| {
        log::warn!("Ignoring invalid {key}='{raw}', using {default}");
        default
    })
}
