//! SCCT Predictions — SCCT Monitor
//!
//! Čte aktuální zápas ze StarCraft Casting Tool (SCCT):
//! - najde aktivní profil (hex ID adresáře = TCP port, connect = instance běží)
//! - přečte exportované soubory team1/team2/bestof/score1/score2/league
//! - postaví `MatchRecord` a vyhodnotí `Outcome`
//!
//! Žádná cache: každý dotaz znovu hledá profil a znovu čte soubory.

pub mod config;
pub mod error;
pub mod profile;
pub mod reader;
pub mod source;
pub mod websocket;

use logger::{now_iso, EventLogger, MatchStateEvent, OutcomeResolvedEvent, ProfileDiscoveryEvent, SourceErrorEvent};
use prediction_engine::{MatchRecord, Outcome};
use tracing::{info, warn};

pub use config::{MonitorConfig, SourceKind};
pub use error::ScctError;
pub use profile::{ProbeReport, Profile, ProfileLocator};
pub use reader::CastingDataReader;
pub use source::{FileProbeSource, MatchSource, SourceSnapshot};
pub use websocket::WebSocketSource;

/// Everything one operation needs. Built once by the entry point and passed by reference.
pub struct ScctContext {
    config: MonitorConfig,
    source: Box<dyn MatchSource>,
    logger: EventLogger,
}

impl ScctContext {
    pub fn new(config: MonitorConfig, logger: EventLogger) -> Self {
        let source: Box<dyn MatchSource> = match config.source {
            SourceKind::FileProbe => Box::new(FileProbeSource::from_config(&config)),
            SourceKind::WebSocket => Box::new(WebSocketSource::from_config(&config)),
        };
        Self { config, source, logger }
    }

    pub fn with_source(config: MonitorConfig, source: Box<dyn MatchSource>, logger: EventLogger) -> Self {
        Self { config, source, logger }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn source(&self) -> &dyn MatchSource {
        self.source.as_ref()
    }

    pub fn logger(&self) -> &EventLogger {
        &self.logger
    }

    /// Outcome → JSONL audit trail.
    pub fn record_outcome(&self, record: &MatchRecord, outcome: &Outcome) {
        self.logger.log_or_warn(&OutcomeResolvedEvent {
            ts: now_iso(),
            event: "OUTCOME_RESOLVED",
            team1: record.team1().to_string(),
            team2: record.team2().to_string(),
            score1: record.score1(),
            score2: record.score2(),
            outcome: outcome.kind().to_string(),
            label: outcome.label().map(str::to_string),
        });
    }
}

/// Fresh discovery + read + build on every call.
pub async fn get_current_match_state(ctx: &ScctContext) -> Result<MatchRecord, ScctError> {
    let source = ctx.source.name();

    let snapshot = match ctx.source.fetch_raw().await {
        Ok(s) => s,
        Err(e) => {
            warn!(source, kind = e.kind(), "SCCT match state unavailable: {}", e);
            log_source_error(ctx, &e);
            return Err(e);
        }
    };

    ctx.logger.log_or_warn(&ProfileDiscoveryEvent {
        ts: now_iso(),
        event: "PROFILE_DISCOVERY",
        source: source.to_string(),
        profile_id: snapshot.port.map(|_| snapshot.origin.clone()),
        port: snapshot.port,
        elapsed_ms: snapshot.elapsed.as_millis() as u64,
    });

    let record = match prediction_engine::build(&snapshot.fields) {
        Ok(r) => r,
        Err(e) => {
            let e = ScctError::from_build(e, &snapshot.origin);
            warn!(source, kind = e.kind(), "SCCT match state rejected: {}", e);
            log_source_error(ctx, &e);
            return Err(e);
        }
    };

    info!(
        "{} {} - {} {} (BO{}, {})",
        record.team1(),
        record.score1(),
        record.score2(),
        record.team2(),
        record.bestof(),
        if record.league().is_empty() { "-" } else { record.league() },
    );

    ctx.logger.log_or_warn(&MatchStateEvent {
        ts: now_iso(),
        event: "MATCH_STATE",
        source: source.to_string(),
        team1: record.team1().to_string(),
        team2: record.team2().to_string(),
        bestof: record.bestof(),
        score1: record.score1(),
        score2: record.score2(),
        league: record.league().to_string(),
        winning_score: record.winning_score(),
        draw_possible: record.draw_possible(),
    });

    Ok(record)
}

/// Pure, no I/O; safe from any number of callers.
pub fn resolve_outcome(record: &MatchRecord) -> Outcome {
    prediction_engine::resolve(record)
}

fn log_source_error(ctx: &ScctContext, err: &ScctError) {
    ctx.logger.log_or_warn(&SourceErrorEvent {
        ts: now_iso(),
        event: "SOURCE_ERROR",
        source: ctx.source.name().to_string(),
        kind: err.kind().to_string(),
        message: err.to_string(),
    });
}
