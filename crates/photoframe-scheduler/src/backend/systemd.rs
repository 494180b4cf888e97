//! systemd user unit/timer backend.
//!
//! Two artifacts under `~/.config/systemd/user`: a oneshot service running
//! the fetch job and a timer triggering it. The unit name is the marker —
//! reinstalling rewrites the same pair, so at most one definition exists.

use std::path::PathBuf;

use tracing::info;

use super::{remove_if_exists, run_tool, JobScheduler};
use crate::error::Result;
use crate::types::JobCommand;

const BACKEND: &str = "systemd";
/// Unit base name locating our definition among the user's units.
const UNIT: &str = "photoframe";

pub struct SystemdScheduler {
    command: JobCommand,
    unit_dir: PathBuf,
}

impl SystemdScheduler {
    pub fn new(command: JobCommand) -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self {
            command,
            unit_dir: PathBuf::from(home).join(".config/systemd/user"),
        }
    }

    fn service_path(&self) -> PathBuf {
        self.unit_dir.join(format!("{UNIT}.service"))
    }

    fn timer_path(&self) -> PathBuf {
        self.unit_dir.join(format!("{UNIT}.timer"))
    }

    fn timer_unit(&self) -> String {
        format!("{UNIT}.timer")
    }

    fn systemctl(&self, args: &[&str]) -> Result<String> {
        let mut full: Vec<&str> = vec!["--user"];
        full.extend_from_slice(args);
        run_tool(BACKEND, "systemctl", &full)
    }
}

/// Render the oneshot service unit running the fetch job. The scheduler
/// owns stream redirection into the fetch log.
fn render_service(command: &JobCommand) -> String {
    format!(
        "[Unit]\n\
         Description=Photoframe image fetch\n\
         \n\
         [Service]\n\
         Type=oneshot\n\
         WorkingDirectory={dir}\n\
         ExecStart={program} run\n\
         StandardOutput=append:{log}\n\
         StandardError=append:{log}\n",
        dir = command.working_dir.display(),
        program = command.program.display(),
        log = command.log_file.display(),
    )
}

/// Render the timer unit for `expression` — `OnCalendar=` for the canonical
/// keywords, a relative-interval pair otherwise.
fn render_timer(expression: &str) -> String {
    let trigger = if is_calendar(expression) {
        format!("OnCalendar={expression}\nPersistent=true")
    } else {
        format!("OnBootSec={expression}\nOnUnitActiveSec={expression}")
    };
    format!(
        "[Unit]\n\
         Description=Photoframe fetch timer\n\
         \n\
         [Timer]\n\
         {trigger}\n\
         Unit={UNIT}.service\n\
         \n\
         [Install]\n\
         WantedBy=timers.target\n"
    )
}

fn is_calendar(expression: &str) -> bool {
    matches!(expression, "hourly" | "daily" | "weekly" | "monthly")
}

impl JobScheduler for SystemdScheduler {
    fn name(&self) -> &'static str {
        BACKEND
    }

    fn install(&self, expression: &str) -> Result<()> {
        // Unit files first, activation last.
        photoframe_core::paths::write_atomic(&self.service_path(), &render_service(&self.command))?;
        photoframe_core::paths::write_atomic(&self.timer_path(), &render_timer(expression))?;
        self.systemctl(&["daemon-reload"])?;
        self.systemctl(&["enable", "--now", &self.timer_unit()])?;
        info!(expression, "systemd timer installed");
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        if !self.timer_path().exists() && !self.service_path().exists() {
            return Ok(());
        }
        self.systemctl(&["disable", "--now", &self.timer_unit()])?;
        remove_if_exists(&self.timer_path())?;
        remove_if_exists(&self.service_path())?;
        self.systemctl(&["daemon-reload"])?;
        info!("systemd timer removed");
        Ok(())
    }

    fn is_installed(&self) -> Result<bool> {
        // Exit status is the answer here; an inactive or unknown timer is
        // "not installed", not a failure.
        Ok(self
            .systemctl(&["is-active", "--quiet", &self.timer_unit()])
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn command() -> JobCommand {
        JobCommand {
            program: PathBuf::from("/usr/local/bin/photoframe"),
            working_dir: PathBuf::from("/home/frame/.photoframe"),
            log_file: PathBuf::from("/home/frame/.photoframe/logs/photoframe.log"),
        }
    }

    #[test]
    fn service_unit_runs_fetch_with_log_redirection() {
        let unit = render_service(&command());
        assert!(unit.contains("Type=oneshot"));
        assert!(unit.contains("WorkingDirectory=/home/frame/.photoframe"));
        assert!(unit.contains("ExecStart=/usr/local/bin/photoframe run"));
        assert!(unit.contains("StandardOutput=append:/home/frame/.photoframe/logs/photoframe.log"));
        assert!(unit.contains("StandardError=append:/home/frame/.photoframe/logs/photoframe.log"));
    }

    #[test]
    fn canonical_keyword_becomes_calendar_trigger() {
        let unit = render_timer("daily");
        assert!(unit.contains("OnCalendar=daily"));
        assert!(unit.contains("Persistent=true"));
        assert!(!unit.contains("OnUnitActiveSec"));
        assert!(unit.contains("Unit=photoframe.service"));
    }

    #[test]
    fn relative_interval_becomes_monotonic_trigger() {
        let unit = render_timer("15min");
        assert!(unit.contains("OnBootSec=15min"));
        assert!(unit.contains("OnUnitActiveSec=15min"));
        assert!(!unit.contains("OnCalendar"));
    }

    #[test]
    fn only_the_four_keywords_are_calendar() {
        for keyword in ["hourly", "daily", "weekly", "monthly"] {
            assert!(is_calendar(keyword));
        }
        assert!(!is_calendar("15min"));
        assert!(!is_calendar("120min"));
    }
}
