use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ScctError;

pub const DEFAULT_WS_URL: &str = "ws://localhost:62345/score";

/// Which `MatchSource` the context builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Profile directories + TCP liveness probe (default)
    FileProbe,
    /// Legacy SCCT score WebSocket
    WebSocket,
}

impl SourceKind {
    fn parse(raw: &str) -> Result<Self, ScctError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "file" | "file_probe" => Ok(SourceKind::FileProbe),
            "ws" | "websocket" => Ok(SourceKind::WebSocket),
            other => Err(ScctError::Config(format!("unknown SCCT_SOURCE {other:?} (expected file|websocket)"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub profiles_dir: PathBuf,
    pub source: SourceKind,
    /// Per-candidate TCP connect timeout
    pub probe_timeout: Duration,
    /// Aggregate budget for one discovery scan
    pub discovery_deadline: Duration,
    pub ws_url: String,
    pub ws_timeout: Duration,
    pub ws_max_messages: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            profiles_dir: PathBuf::from("profiles"),
            source: SourceKind::FileProbe,
            probe_timeout: Duration::from_millis(100),
            discovery_deadline: Duration::from_millis(3000),
            ws_url: DEFAULT_WS_URL.to_string(),
            ws_timeout: Duration::from_secs(5),
            ws_max_messages: 3,
        }
    }
}

impl MonitorConfig {
    pub fn from_env() -> Result<Self, ScctError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, but with an injectable lookup (tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ScctError> {
        let defaults = Self::default();

        let source = match lookup("SCCT_SOURCE") {
            Some(raw) => SourceKind::parse(&raw)?,
            None => defaults.source,
        };

        let probe_timeout_ms = parse_or(&lookup, "SCCT_PROBE_TIMEOUT_MS", 100u64)?;
        let deadline_ms = parse_or(&lookup, "SCCT_DISCOVERY_DEADLINE_MS", 3000u64)?;
        let ws_timeout_secs = parse_or(&lookup, "SCCT_WS_TIMEOUT_SECS", 5u64)?;
        let ws_max_messages = parse_or(&lookup, "SCCT_WS_MAX_MESSAGES", defaults.ws_max_messages)?;

        if probe_timeout_ms == 0 || deadline_ms == 0 || ws_timeout_secs == 0 {
            return Err(ScctError::Config("timeouts must be greater than zero".to_string()));
        }
        if ws_max_messages == 0 {
            return Err(ScctError::Config("SCCT_WS_MAX_MESSAGES must be at least 1".to_string()));
        }

        Ok(Self {
            profiles_dir: lookup("SCCT_PROFILES_DIR").map(PathBuf::from).unwrap_or(defaults.profiles_dir),
            source,
            probe_timeout: Duration::from_millis(probe_timeout_ms),
            discovery_deadline: Duration::from_millis(deadline_ms),
            ws_url: lookup("SCCT_WS_URL").unwrap_or(defaults.ws_url),
            ws_timeout: Duration::from_secs(ws_timeout_secs),
            ws_max_messages,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ScctError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ScctError::Config(format!("{key}={raw:?} is not a valid number"))),
        None => Ok(default),
    }
}
