//! Interactive prompt adapters. All stdin handling lives here so the
//! lifecycle commands take plain request values.

use std::io::Write;

use colored::Colorize;
use photoframe_core::config::DEFAULT_INTERVAL_MINUTES;
use photoframe_scheduler::ScheduleRequest;

/// Ask for a fetch interval in minutes.
pub fn interval_request() -> ScheduleRequest {
    print!("Fetch interval in minutes [{DEFAULT_INTERVAL_MINUTES}]: ");
    let _ = std::io::stdout().flush();
    let mut input = String::new();
    let _ = std::io::stdin().read_line(&mut input);
    ScheduleRequest::new(parse_interval(&input))
}

/// Parse an interval answer. Anything that is not a positive integer falls
/// back to the default with a warning rather than failing.
pub fn parse_interval(input: &str) -> u32 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return DEFAULT_INTERVAL_MINUTES;
    }
    match trimmed.parse::<u32>() {
        Ok(minutes) if minutes > 0 => minutes,
        _ => {
            println!(
                "{} `{trimmed}` is not a positive number of minutes; using {DEFAULT_INTERVAL_MINUTES}",
                "warning:".yellow().bold()
            );
            DEFAULT_INTERVAL_MINUTES
        }
    }
}

/// Read a y/n confirmation from stdin. Empty input means no.
pub fn confirm(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    let _ = std::io::stdout().flush();
    let mut input = String::new();
    if std::io::stdin().read_line(&mut input).is_err() {
        return false;
    }
    input.trim().eq_ignore_ascii_case("y")
}
