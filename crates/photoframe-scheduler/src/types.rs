use std::fmt;
use std::path::PathBuf;

/// Which native scheduling mechanism the host offers.
///
/// Derived once per command invocation by [`crate::detect::detect`] and
/// never persisted — the OS is the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerKind {
    /// Five-field user crontab.
    Cron,
    /// systemd user unit/timer pair.
    Systemd,
    /// macOS per-user launchd agent.
    Launchd,
    /// No recognised mechanism — callers fall back to the cron strategy.
    Unknown,
}

impl SchedulerKind {
    /// All variants, in detection priority order.
    pub const ALL: [SchedulerKind; 4] = [
        SchedulerKind::Launchd,
        SchedulerKind::Systemd,
        SchedulerKind::Cron,
        SchedulerKind::Unknown,
    ];
}

impl fmt::Display for SchedulerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SchedulerKind::Cron => "cron",
            SchedulerKind::Systemd => "systemd",
            SchedulerKind::Launchd => "launchd",
            SchedulerKind::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// A user-supplied "run every N minutes" request.
///
/// Built per command invocation (the interactive prompt is a thin adapter in
/// the CLI) and discarded once a job definition exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub interval_minutes: u32,
}

impl ScheduleRequest {
    pub fn new(interval_minutes: u32) -> Self {
        Self { interval_minutes }
    }
}

/// The fetch-job invocation recorded into a job definition.
///
/// Captured once at install time. The native scheduler redirects the job's
/// output streams to `log_file`; this subsystem never does.
#[derive(Debug, Clone)]
pub struct JobCommand {
    /// Absolute path of the photoframe executable.
    pub program: PathBuf,
    /// Working directory for scheduled runs (the application data dir).
    pub working_dir: PathBuf,
    /// File receiving the job's stdout and stderr.
    pub log_file: PathBuf,
}

impl JobCommand {
    /// Capture the currently running executable as the scheduled command.
    pub fn current() -> std::io::Result<Self> {
        Ok(Self {
            program: std::env::current_exe()?,
            working_dir: photoframe_core::paths::data_dir(),
            log_file: photoframe_core::paths::log_path(),
        })
    }
}
