/// SCCT Predictions — Logger
/// JSONL event stream (one file per UTC day)

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct EventLogger {
    log_dir: PathBuf,
}

impl EventLogger {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        let dir = log_dir.into();
        fs::create_dir_all(&dir).ok();
        Self { log_dir: dir }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn log<T: Serialize>(&self, event: &T) -> Result<()> {
        let date  = Utc::now().format("%Y-%m-%d").to_string();
        let path  = self.log_dir.join(format!("{date}.jsonl"));
        let line  = serde_json::to_string(event)?;
        let mut f = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(f, "{line}")?;
        Ok(())
    }

    /// Audit zápis nesmí shodit polling — chyba jen do tracingu.
    pub fn log_or_warn<T: Serialize>(&self, event: &T) {
        if let Err(e) = self.log(event) {
            tracing::warn!("Event log write failed ({}): {}", self.log_dir.display(), e);
        }
    }
}

pub fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

// ── Event typy ────────────────────────────────────────────────────────────────

#[derive(Serialize, Debug)]
pub struct ProfileDiscoveryEvent {
    pub ts:         String,
    pub event:      &'static str,   // "PROFILE_DISCOVERY"
    pub source:     String,         // "file_probe" | "websocket"
    pub profile_id: Option<String>,
    pub port:       Option<u16>,
    pub elapsed_ms: u64,
}

#[derive(Serialize, Debug)]
pub struct MatchStateEvent {
    pub ts:            String,
    pub event:         &'static str,   // "MATCH_STATE"
    pub source:        String,
    pub team1:         String,
    pub team2:         String,
    pub bestof:        u32,
    pub score1:        u32,
    pub score2:        u32,
    pub league:        String,
    pub winning_score: u32,
    pub draw_possible: bool,
}

#[derive(Serialize, Debug)]
pub struct OutcomeResolvedEvent {
    pub ts:      String,
    pub event:   &'static str,   // "OUTCOME_RESOLVED"
    pub team1:   String,
    pub team2:   String,
    pub score1:  u32,
    pub score2:  u32,
    pub outcome: String,         // "TEAM1_WIN" | "TEAM2_WIN" | "DRAW" | "UNDETERMINED"
    pub label:   Option<String>,
}

#[derive(Serialize, Debug)]
pub struct SourceErrorEvent {
    pub ts:      String,
    pub event:   &'static str,   // "SOURCE_ERROR"
    pub source:  String,
    pub kind:    String,         // ScctError::kind()
    pub message: String,
}
