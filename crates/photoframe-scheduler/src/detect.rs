//! Host capability detection.

use std::path::Path;

use tracing::debug;

use crate::types::SchedulerKind;

/// Decide which native scheduling mechanism this host offers.
///
/// Read-only and infallible: a host with no recognised mechanism reports
/// [`SchedulerKind::Unknown`] rather than erroring, and callers fall back to
/// the cron strategy. Priority: launchd on macOS, then a booted systemd,
/// then a crontab binary on PATH.
pub fn detect() -> SchedulerKind {
    let kind = if cfg!(target_os = "macos") {
        SchedulerKind::Launchd
    } else if systemd_booted() {
        SchedulerKind::Systemd
    } else if which::which("crontab").is_ok() {
        SchedulerKind::Cron
    } else {
        SchedulerKind::Unknown
    };
    debug!(%kind, "detected scheduling backend");
    kind
}

/// `/run/systemd/system` exists exactly when systemd is the running init,
/// matching the check `sd_booted(3)` performs.
fn systemd_booted() -> bool {
    Path::new("/run/systemd/system").is_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_never_panics_and_is_stable() {
        let first = detect();
        let second = detect();
        assert_eq!(first, second);
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn macos_prefers_launchd() {
        assert_eq!(detect(), SchedulerKind::Launchd);
    }
}
