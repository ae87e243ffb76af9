//! SCCT Predictions — driver
//!
//! Co dělá:
//!   state    — přečte aktuální zápas ze SCCT a vypíše ho
//!   plan     — title + options pro novou predikci (create)
//!   resolve  — vyhodnotí výsledek zápasu pro payout
//!   probe    — vypíše všechny SCCT profily a jestli běží
//!   watch    — polluje SCCT a loguje každou změnu stavu (default)
//!
//! Exit code: 0 = ok, 1 = chyba, 2 = výsledek zatím nejde určit.
//!
//! Spuštění:
//!   cargo run -- resolve

mod settings;

use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use logger::EventLogger;
use prediction_engine::{describe_undetermined, MatchRecord, Outcome, PredictionPlan};
use scct_monitor::{
    get_current_match_state, resolve_outcome, MonitorConfig, ProfileLocator, ScctContext, SourceKind,
};
use settings::{DriverSettings, PredictionSettings};
use std::env;
use std::fs::File;
use std::process::ExitCode;
use tokio::time::{sleep, Duration};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

const EXIT_UNDETERMINED: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let command = env::args().nth(1).unwrap_or_else(|| "watch".to_string());
    let driver = DriverSettings::from_env();
    let monitor_cfg = MonitorConfig::from_env().context("invalid SCCT configuration")?;

    info!(
        "SCCT source: {:?} (profiles: {}, ws: {})",
        monitor_cfg.source,
        monitor_cfg.profiles_dir.display(),
        monitor_cfg.ws_url
    );

    // Jediný context pro celý proces, předává se do každé operace
    let ctx = ScctContext::new(monitor_cfg, EventLogger::new(&driver.log_dir));

    match command.as_str() {
        "state" => cmd_state(&ctx).await,
        "plan" => cmd_plan(&ctx).await,
        "resolve" | "payout" => cmd_resolve(&ctx).await,
        "probe" => cmd_probe(&ctx).await,
        "watch" => cmd_watch(&ctx, &driver).await,
        other => bail!("unknown command {other:?} (expected state|plan|resolve|probe|watch)"),
    }
}

async fn cmd_state(ctx: &ScctContext) -> Result<ExitCode> {
    let record = get_current_match_state(ctx).await.context("Failed to read match from SCCT")?;
    print_record(&record);
    Ok(ExitCode::SUCCESS)
}

async fn cmd_plan(ctx: &ScctContext) -> Result<ExitCode> {
    let prediction = PredictionSettings::from_lookup(|k| env::var(k).ok())?;
    let broadcaster = prediction.require_broadcaster()?;

    let record = get_current_match_state(ctx).await.context("Failed to create prediction")?;
    let plan = PredictionPlan::for_match(&record);

    println!("channel: {broadcaster}");
    println!("title:   {}", plan.title);
    println!("window:  {}s", prediction.window_secs);
    for (i, option) in plan.options.iter().enumerate() {
        println!("  [{i}] {option}");
    }
    Ok(ExitCode::SUCCESS)
}

async fn cmd_resolve(ctx: &ScctContext) -> Result<ExitCode> {
    let record = get_current_match_state(ctx).await.context("Failed to payout prediction")?;
    let outcome = resolve_outcome(&record);
    ctx.record_outcome(&record, &outcome);

    match outcome.label() {
        Some(label) => {
            let plan = PredictionPlan::for_match(&record);
            let option = plan
                .winning_option(&outcome)
                .context("Error, could not find winning outcome")?;
            println!("Outcome: {label} (prediction option {option})");
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("{}", describe_undetermined(&record));
            Ok(ExitCode::from(EXIT_UNDETERMINED))
        }
    }
}

async fn cmd_probe(ctx: &ScctContext) -> Result<ExitCode> {
    if ctx.config().source != SourceKind::FileProbe {
        bail!("probe only applies to SCCT_SOURCE=file");
    }

    let locator = ProfileLocator::from_config(ctx.config());
    let reports = locator.scan().await?;
    if reports.is_empty() {
        println!("No SCCT profiles in {}", locator.profiles_dir().display());
    }
    for r in reports {
        match r.port {
            Some(port) => println!(
                "{:<12} port {:<5} {}",
                r.id,
                port,
                if r.active { "ACTIVE" } else { "inactive" }
            ),
            None => println!("{:<12} (not a hex id, skipped)", r.id),
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn cmd_watch(ctx: &ScctContext, driver: &DriverSettings) -> Result<ExitCode> {
    // Single instance lock
    let lock_file_path = env::temp_dir().join("scct_predictions_watch.lock");
    let lock_file = File::create(&lock_file_path)
        .with_context(|| format!("Failed to create lock file at {:?}", lock_file_path))?;

    let mut lock = fd_lock::RwLock::new(lock_file);
    let _write_guard = match lock.try_write() {
        Ok(guard) => {
            info!("Acquired single-instance lock.");
            guard
        }
        Err(_) => {
            warn!("Another instance of scct-predictions watch is already running! Exiting.");
            return Ok(ExitCode::FAILURE);
        }
    };

    info!("Watching SCCT every {}s", driver.poll_interval_secs);

    let mut last: Option<(MatchRecord, Outcome)> = None;

    loop {
        match get_current_match_state(ctx).await {
            Ok(record) => {
                let outcome = resolve_outcome(&record);
                let changed = last.as_ref().map_or(true, |(r, o)| *r != record || *o != outcome);
                if changed {
                    print_record(&record);
                    if outcome.is_concluded() {
                        info!("Match decided: {}", outcome.label().unwrap_or_default());
                    }
                    ctx.record_outcome(&record, &outcome);
                    last = Some((record, outcome));
                }
            }
            Err(e) if e.is_transient() => info!("SCCT not available yet: {}", e),
            Err(e) => warn!("SCCT state broken: {}", e),
        }

        tokio::select! {
            _ = sleep(Duration::from_secs(driver.poll_interval_secs)) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-C, stopping watch.");
                return Ok(ExitCode::SUCCESS);
            }
        }
    }
}

fn print_record(record: &MatchRecord) {
    println!(
        "{} {} - {} {}  (BO{}, first to {}{})",
        record.team1(),
        record.score1(),
        record.score2(),
        record.team2(),
        record.bestof(),
        record.winning_score(),
        match record.draw_label() {
            Some(draw) => format!(", draw {draw}"),
            None => String::new(),
        },
    );
    if !record.league().is_empty() {
        println!("league: {}", record.league());
    }
}
