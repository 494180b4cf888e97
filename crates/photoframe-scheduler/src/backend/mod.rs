//! Backend strategies for installing and removing the scheduled fetch job.

pub mod cron;
pub mod launchd;
pub mod systemd;

use std::path::Path;
use std::process::Command;

use tracing::warn;

use crate::error::{Result, SchedulerError};
use crate::types::{JobCommand, SchedulerKind};

/// Marker tagging this application's entry in shared scheduling stores.
/// The systemd and launchd backends use their unit/label names instead.
pub const CRON_MARKER: &str = "# photoframe";

/// One native scheduling mechanism.
///
/// Selected once per invocation via [`for_kind`]; shared logic never
/// branches on the host again. `install` replaces any previous definition
/// bearing the application marker, and `remove` is a no-op when nothing is
/// installed. Activation is always the final step, so a failure beforehand
/// leaves the previous definition untouched.
pub trait JobScheduler {
    /// Backend name used in log lines and error messages.
    fn name(&self) -> &'static str;

    /// Write and activate a job definition for `expression`, replacing any
    /// previous one.
    fn install(&self, expression: &str) -> Result<()>;

    /// Deactivate and delete the job definition, if present.
    fn remove(&self) -> Result<()>;

    /// Query the live native state for an active definition. Never trusts
    /// persisted config.
    fn is_installed(&self) -> Result<bool>;
}

/// Select the strategy for `kind`.
pub fn for_kind(kind: SchedulerKind, command: JobCommand) -> Box<dyn JobScheduler> {
    match kind {
        SchedulerKind::Systemd => Box::new(systemd::SystemdScheduler::new(command)),
        SchedulerKind::Launchd => Box::new(launchd::LaunchdScheduler::new(command)),
        SchedulerKind::Cron => Box::new(cron::CronScheduler::new(command)),
        SchedulerKind::Unknown => {
            warn!("no scheduling mechanism detected; falling back to cron");
            Box::new(cron::CronScheduler::new(command))
        }
    }
}

/// Run a native scheduling tool, mapping any failure to a backend error
/// carrying the backend name and the tool's stderr.
pub(crate) fn run_tool(backend: &'static str, program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| SchedulerError::Backend {
            backend,
            message: format!("failed to execute {program}: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SchedulerError::Backend {
            backend,
            message: format!("{program} {args:?} failed: {}", stderr.trim()),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Delete `path`, treating an already-absent file as success.
pub(crate) fn remove_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn dummy_command() -> JobCommand {
        JobCommand {
            program: PathBuf::from("/usr/local/bin/photoframe"),
            working_dir: PathBuf::from("/home/frame/.photoframe"),
            log_file: PathBuf::from("/home/frame/.photoframe/logs/photoframe.log"),
        }
    }

    #[test]
    fn every_kind_selects_a_strategy() {
        for kind in SchedulerKind::ALL {
            let scheduler = for_kind(kind, dummy_command());
            assert!(!scheduler.name().is_empty());
        }
    }

    #[test]
    fn unknown_falls_back_to_cron() {
        let scheduler = for_kind(SchedulerKind::Unknown, dummy_command());
        assert_eq!(scheduler.name(), "cron");
    }

    #[test]
    fn missing_tool_is_a_backend_error() {
        let err = run_tool("cron", "photoframe-no-such-tool", &["-l"]).unwrap_err();
        match err {
            SchedulerError::Backend { backend, message } => {
                assert_eq!(backend, "cron");
                assert!(message.contains("photoframe-no-such-tool"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn remove_if_exists_tolerates_absence() {
        let path = std::env::temp_dir().join(format!("photoframe-absent-{}", std::process::id()));
        let _ = std::fs::remove_file(&path);
        assert!(remove_if_exists(&path).is_ok());
    }
}
