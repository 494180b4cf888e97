//! macOS launchd agent backend.
//!
//! One property list under `~/Library/LaunchAgents`, identified by its
//! label. Replace semantics: unload whatever is loaded under the label,
//! rewrite the plist, load it again.

use std::path::PathBuf;

use tracing::info;

use super::{remove_if_exists, run_tool, JobScheduler};
use crate::error::Result;
use crate::types::JobCommand;

const BACKEND: &str = "launchd";
/// Agent label — the marker locating our definition in launchd.
const LABEL: &str = "com.photoframe.fetch";

pub struct LaunchdScheduler {
    command: JobCommand,
    agent_dir: PathBuf,
}

impl LaunchdScheduler {
    pub fn new(command: JobCommand) -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self {
            command,
            agent_dir: PathBuf::from(home).join("Library/LaunchAgents"),
        }
    }

    fn plist_path(&self) -> PathBuf {
        self.agent_dir.join(format!("{LABEL}.plist"))
    }

    /// Unload the agent if it is loaded. A not-loaded agent is absence, not
    /// a failure.
    fn unload(&self) {
        let plist = self.plist_path();
        let plist_path = plist.to_string_lossy();
        let _ = run_tool(BACKEND, "launchctl", &["unload", plist_path.as_ref()]);
    }
}

/// Render the launch agent property list. `interval_secs` comes from the
/// translator and is already a plain decimal seconds value.
fn render_plist(command: &JobCommand, interval_secs: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>{LABEL}</string>
    <key>ProgramArguments</key>
    <array>
        <string>{program}</string>
        <string>run</string>
    </array>
    <key>WorkingDirectory</key>
    <string>{dir}</string>
    <key>StartInterval</key>
    <integer>{interval_secs}</integer>
    <key>StandardOutPath</key>
    <string>{log}</string>
    <key>StandardErrorPath</key>
    <string>{log}</string>
</dict>
</plist>
"#,
        program = command.program.display(),
        dir = command.working_dir.display(),
        log = command.log_file.display(),
    )
}

impl JobScheduler for LaunchdScheduler {
    fn name(&self) -> &'static str {
        BACKEND
    }

    fn install(&self, expression: &str) -> Result<()> {
        let plist = self.plist_path();
        if plist.exists() {
            self.unload();
        }
        photoframe_core::paths::write_atomic(&plist, &render_plist(&self.command, expression))?;
        let plist_path = plist.to_string_lossy();
        run_tool(BACKEND, "launchctl", &["load", plist_path.as_ref()])?;
        info!(expression, "launchd agent installed");
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        let plist = self.plist_path();
        if !plist.exists() {
            return Ok(());
        }
        self.unload();
        remove_if_exists(&plist)?;
        info!("launchd agent removed");
        Ok(())
    }

    fn is_installed(&self) -> Result<bool> {
        Ok(run_tool(BACKEND, "launchctl", &["list", LABEL]).is_ok())
    }
}
