use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;

/// Prediction window limits accepted by the prediction service.
const WINDOW_RANGE: std::ops::RangeInclusive<u32> = 1..=999;

/// Prediction-side settings (kanál + délka okna).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionSettings {
    pub broadcaster: Option<String>,
    pub window_secs: u32,
}

impl PredictionSettings {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let broadcaster = lookup("PREDICTION_BROADCASTER")
            .map(|b| b.trim().to_lowercase())
            .filter(|b| !b.is_empty());

        let window_secs = match lookup("PREDICTION_WINDOW_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("PREDICTION_WINDOW_SECS={raw:?} is not a number"))?,
            None => 120,
        };
        if !WINDOW_RANGE.contains(&window_secs) {
            bail!(
                "PREDICTION_WINDOW_SECS must be between {} and {}, got {}",
                WINDOW_RANGE.start(),
                WINDOW_RANGE.end(),
                window_secs
            );
        }

        Ok(Self { broadcaster, window_secs })
    }

    pub fn require_broadcaster(&self) -> Result<&str> {
        self.broadcaster
            .as_deref()
            .context("PREDICTION_BROADCASTER is not set")
    }
}

/// Driver-only knobs: where the JSONL log goes and how often `watch` polls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverSettings {
    pub log_dir: PathBuf,
    pub poll_interval_secs: u64,
}

impl DriverSettings {
    pub fn from_env() -> Self {
        let log_dir = env::var("LOG_DIR").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("logs"));
        let poll_interval_secs = env::var("SCCT_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(15);
        Self { log_dir, poll_interval_secs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.to_string())
    }

    #[test]
    fn defaults_to_two_minute_window() {
        let settings = PredictionSettings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.window_secs, 120);
        assert!(settings.require_broadcaster().is_err());
    }

    #[test]
    fn broadcaster_is_lowercased() {
        let settings =
            PredictionSettings::from_lookup(lookup(&[("PREDICTION_BROADCASTER", " JaeDolph ")])).unwrap();
        assert_eq!(settings.require_broadcaster().unwrap(), "jaedolph");
    }

    #[test]
    fn window_out_of_range_is_rejected() {
        assert!(PredictionSettings::from_lookup(lookup(&[("PREDICTION_WINDOW_SECS", "0")])).is_err());
        assert!(PredictionSettings::from_lookup(lookup(&[("PREDICTION_WINDOW_SECS", "1000")])).is_err());
        assert!(PredictionSettings::from_lookup(lookup(&[("PREDICTION_WINDOW_SECS", "soon")])).is_err());
        let ok = PredictionSettings::from_lookup(lookup(&[("PREDICTION_WINDOW_SECS", "999")])).unwrap();
        assert_eq!(ok.window_secs, 999);
    }
}
