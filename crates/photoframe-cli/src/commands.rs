//! Lifecycle commands — install, reschedule, run, status, uninstall.
//!
//! Each command is a single pass over detector → translator → backend with
//! no retries, and all of them are safe to invoke repeatedly. The OS-level
//! job tables are the source of truth: nothing here caches a belief about
//! whether a job is installed.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::warn;

use photoframe_core::config::{self, DEFAULT_INTERVAL_MINUTES};
use photoframe_core::{paths, PhotoframeConfig};
use photoframe_scheduler::{backend, detect, translate, JobCommand, ScheduleRequest};

use crate::prompt;

/// Lines of the fetch log shown by `status`.
const STATUS_LOG_LINES: usize = 20;

// ─── Lifecycle operations ────────────────────────────────────────────────────

/// Install the recurring fetch job using the configured interval.
pub fn install() -> Result<()> {
    let Some(config) = load_or_scaffold()? else {
        return Ok(());
    };
    ensure_runtime_dirs(&config)?;

    let minutes = effective_interval(&config);
    apply_schedule(ScheduleRequest::new(minutes))?;
    println!(
        "{} fetch job scheduled every {minutes} minute(s)",
        "ok:".green().bold()
    );
    Ok(())
}

/// Apply a new interval, healing the config file first if it is missing.
pub fn reschedule(request: ScheduleRequest) -> Result<()> {
    let config_path = paths::config_path();
    if !config_path.exists() {
        config::write_template(&config_path)?;
        println!(
            "{} created {} — fill in your Discourse credentials before the job can fetch",
            "note:".yellow().bold(),
            config_path.display()
        );
    }
    apply_schedule(request)?;
    println!(
        "{} fetch job rescheduled to every {} minute(s)",
        "ok:".green().bold(),
        request.interval_minutes
    );
    Ok(())
}

/// Run the fetch job once, synchronously.
pub async fn run() -> Result<()> {
    let Some(config) = load_or_scaffold()? else {
        return Ok(());
    };
    ensure_runtime_dirs(&config)?;

    let outcome = photoframe_fetcher::run_once(&config)
        .await
        .context("fetch pass failed")?;
    println!(
        "{} {} topic(s) processed, {} image(s) downloaded, {} evicted",
        "ok:".green().bold(),
        outcome.topics,
        outcome.downloaded,
        outcome.evicted
    );
    Ok(())
}

/// Remove the scheduled job; on confirmation, also delete local data.
pub fn uninstall() -> Result<()> {
    let kind = detect();
    let command = JobCommand::current().context("cannot determine executable path")?;
    let scheduler = backend::for_kind(kind, command);
    scheduler
        .remove()
        .with_context(|| format!("removing the {} job failed", scheduler.name()))?;
    println!("{} scheduled job removed", "ok:".green().bold());

    let data_dir = paths::data_dir();
    if data_dir.exists()
        && prompt::confirm(&format!(
            "Also delete local data (images, database, logs) in {}?",
            data_dir.display()
        ))
    {
        std::fs::remove_dir_all(&data_dir)
            .with_context(|| format!("deleting {} failed", data_dir.display()))?;
        println!("{} deleted {}", "ok:".green().bold(), data_dir.display());
    }
    Ok(())
}

/// Read-only report: schedule, backend, live job state, recent log lines.
pub fn status() -> Result<()> {
    match PhotoframeConfig::load(None) {
        Ok(config) => println!(
            "Configured interval: every {} minute(s)",
            effective_interval(&config)
        ),
        Err(_) => println!(
            "Configured interval: {} (no config at {})",
            "none".dimmed(),
            paths::config_path().display()
        ),
    }

    let kind = detect();
    println!("Scheduler backend:   {kind}");

    let command = JobCommand::current().context("cannot determine executable path")?;
    let scheduler = backend::for_kind(kind, command);
    match scheduler.is_installed() {
        Ok(true) => println!("Fetch job:           {}", "installed".green()),
        Ok(false) => println!("Fetch job:           {}", "not installed".yellow()),
        Err(e) => println!("Fetch job:           unknown ({e})"),
    }

    print_log_tail(&paths::log_path());
    println!("\nCommands: install | reschedule | run | status | uninstall");
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Detect, translate, install, persist — shared by install and reschedule.
/// The interval is only persisted after the backend accepted the job, so the
/// config never points at a schedule that was refused.
fn apply_schedule(request: ScheduleRequest) -> Result<()> {
    let kind = detect();
    let expression = translate(request.interval_minutes, kind)?;
    let command = JobCommand::current().context("cannot determine executable path")?;
    let scheduler = backend::for_kind(kind, command);
    scheduler
        .install(&expression)
        .with_context(|| format!("installing the {} job failed", scheduler.name()))?;
    config::persist_interval(&paths::config_path(), request.interval_minutes)?;
    Ok(())
}

/// Load config, writing the commented template plus instructions when none
/// exists. Returns `Ok(None)` on the template path — a deliberate early
/// exit, not a failure.
fn load_or_scaffold() -> Result<Option<PhotoframeConfig>> {
    let config_path = paths::config_path();
    if !config_path.exists() {
        config::write_template(&config_path)?;
        println!("{} no configuration found", "note:".yellow().bold());
        println!("A template was written to {}.", config_path.display());
        println!("Fill in your Discourse credentials, then re-run this command.");
        return Ok(None);
    }
    let config = PhotoframeConfig::load(None).context("configuration is invalid")?;
    Ok(Some(config))
}

/// Configured interval, with absent/invalid values replaced by the default.
fn effective_interval(config: &PhotoframeConfig) -> u32 {
    let minutes = config.fetch.interval_minutes;
    if minutes == 0 {
        warn!("configured interval is 0; using default {DEFAULT_INTERVAL_MINUTES}");
        return DEFAULT_INTERVAL_MINUTES;
    }
    minutes
}

fn ensure_runtime_dirs(config: &PhotoframeConfig) -> Result<()> {
    std::fs::create_dir_all(paths::data_dir())?;
    std::fs::create_dir_all(PathBuf::from(&config.storage.image_dir))?;
    std::fs::create_dir_all(paths::log_dir())?;
    Ok(())
}

/// Print the last [`STATUS_LOG_LINES`] lines of the fetch log; a missing
/// log is reported, never an error.
fn print_log_tail(path: &Path) {
    let Ok(raw) = std::fs::read_to_string(path) else {
        println!("\nNo fetch log yet at {}", path.display());
        return;
    };
    let lines: Vec<&str> = raw.lines().collect();
    let tail = &lines[lines.len().saturating_sub(STATUS_LOG_LINES)..];
    println!("\nLast {} log line(s):", tail.len());
    for line in tail {
        println!("  {line}");
    }
}
