//! Interval translation — minutes into native schedule expressions.

use crate::error::{Result, SchedulerError};
use crate::types::SchedulerKind;

/// Minutes in the four canonical periods, which map to each backend's
/// symbolic spelling instead of a raw count.
const HOURLY: u32 = 60;
const DAILY: u32 = 1_440;
const WEEKLY: u32 = 10_080;
const MONTHLY: u32 = 43_200;

/// Convert a period in minutes into the expression `kind` understands.
///
/// Pure and total over positive inputs: every positive interval yields a
/// usable expression, falling back to a raw per-minute spelling when the
/// value does not reduce to whole hours. Only a zero interval is rejected.
pub fn translate(minutes: u32, kind: SchedulerKind) -> Result<String> {
    if minutes == 0 {
        return Err(SchedulerError::InvalidInterval(minutes));
    }
    let expression = match kind {
        SchedulerKind::Systemd => systemd_expression(minutes),
        SchedulerKind::Launchd => launchd_expression(minutes),
        // Unknown hosts install through the cron strategy, so they share
        // its spelling.
        SchedulerKind::Cron | SchedulerKind::Unknown => cron_expression(minutes),
    };
    Ok(expression)
}

/// Five-field crontab expression.
fn cron_expression(minutes: u32) -> String {
    match minutes {
        HOURLY => "0 * * * *".to_string(),
        DAILY => "0 0 * * *".to_string(),
        WEEKLY => "0 0 * * 0".to_string(),
        MONTHLY => "0 0 1 * *".to_string(),
        m if m < 60 => format!("*/{m} * * * *"),
        m if m % 60 == 0 => format!("0 */{} * * *", m / 60),
        m => format!("*/{m} * * * *"),
    }
}

/// Calendar keyword for the canonical periods, relative duration otherwise.
/// The backend picks `OnCalendar=` or `OnUnitActiveSec=` accordingly.
fn systemd_expression(minutes: u32) -> String {
    match minutes {
        HOURLY => "hourly".to_string(),
        DAILY => "daily".to_string(),
        WEEKLY => "weekly".to_string(),
        MONTHLY => "monthly".to_string(),
        m => format!("{m}min"),
    }
}

/// launchd `StartInterval` takes plain seconds.
fn launchd_expression(minutes: u32) -> String {
    (u64::from(minutes) * 60).to_string()
}
