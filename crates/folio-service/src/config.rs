//! Runtime selection of the content source, read once at startup.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::errors::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/v1";
pub const DEFAULT_DATABASE_URL: &str = "folio.db";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Which backend answers content requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    Mock,
    DocumentStore,
    #[default]
    Rest,
}

impl SourceKind {
    /// Resolves the legacy boolean flags. Mock wins over the store, and REST
    /// is used when neither is set.
    pub fn from_flags(use_mock: bool, use_store: bool) -> Self {
        if use_mock {
            SourceKind::Mock
        } else if use_store {
            SourceKind::DocumentStore
        } else {
            SourceKind::Rest
        }
    }
}

impl FromStr for SourceKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(SourceKind::Mock),
            "store" | "firestore" | "document-store" => Ok(SourceKind::DocumentStore),
            "rest" | "api" => Ok(SourceKind::Rest),
            _ => Err(ConfigError::UnknownValue {
                key: "content source",
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Mock => write!(f, "mock"),
            SourceKind::DocumentStore => write!(f, "store"),
            SourceKind::Rest => write!(f, "rest"),
        }
    }
}

/// What a service does when its live backend fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Answer from mock data, fabricating a record for unknown ids.
    #[default]
    Degrade,
    /// Return the backend error to the caller.
    FailFast,
}

impl FromStr for FallbackPolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "degrade" => Ok(FallbackPolicy::Degrade),
            "fail-fast" | "failfast" => Ok(FallbackPolicy::FailFast),
            _ => Err(ConfigError::UnknownValue {
                key: "fallback policy",
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackPolicy::Degrade => write!(f, "degrade"),
            FallbackPolicy::FailFast => write!(f, "fail-fast"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    pub source: SourceKind,
    pub api_base_url: String,
    pub database_url: String,
    pub fallback: FallbackPolicy,
    pub request_timeout: Duration,
    /// Write the bundled fixtures into the store when the server starts
    pub seed_on_start: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            api_base_url: DEFAULT_API_URL.to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            fallback: FallbackPolicy::default(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            seed_on_start: false,
        }
    }
}

impl SiteConfig {
    /// Reads the process environment.
    ///
    /// - `FOLIO_CONTENT_SOURCE`: `mock`, `store` or `rest`; takes priority over
    ///   the flags below
    /// - `FOLIO_USE_MOCK`, `FOLIO_USE_STORE`: booleans
    /// - `FOLIO_API_URL`, `DATABASE_URL`
    /// - `FOLIO_FALLBACK`: `degrade` or `fail-fast`
    /// - `FOLIO_REQUEST_TIMEOUT_SECS`
    /// - `FOLIO_SEED`: boolean, seed fixtures on server start
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let flags = SourceKind::from_flags(
            parse_flag("FOLIO_USE_MOCK", lookup("FOLIO_USE_MOCK")),
            parse_flag("FOLIO_USE_STORE", lookup("FOLIO_USE_STORE")),
        );
        let source = parse_or("FOLIO_CONTENT_SOURCE", lookup("FOLIO_CONTENT_SOURCE"), flags);

        Self {
            source,
            api_base_url: lookup("FOLIO_API_URL").unwrap_or(defaults.api_base_url),
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            fallback: parse_or("FOLIO_FALLBACK", lookup("FOLIO_FALLBACK"), defaults.fallback),
            request_timeout: Duration::from_secs(parse_or(
                "FOLIO_REQUEST_TIMEOUT_SECS",
                lookup("FOLIO_REQUEST_TIMEOUT_SECS"),
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )),
            seed_on_start: parse_flag("FOLIO_SEED", lookup("FOLIO_SEED")),
        }
    }
}

/// Unset values fall back silently; unparseable ones fall back with a warning.
fn parse_or<T: FromStr + fmt::Display>(var: &str, value: Option<String>, default: T) -> T {
    let Some(value) = value else {
        return default;
    };

    match value.parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!(var, value = %value, default = %default, "invalid env var value, using default");
            default
        }
    }
}

/// `true`/`false` or `1`/`0`, defaulting to off.
fn parse_flag(var: &str, value: Option<String>) -> bool {
    let Some(value) = value else {
        return false;
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => true,
        "0" | "false" | "" => false,
        _ => {
            warn!(var, value = %value, "invalid env flag value, leaving it off");
            false
        }
    }
}
