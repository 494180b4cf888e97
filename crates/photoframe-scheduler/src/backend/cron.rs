//! User-crontab backend.
//!
//! The crontab is shared state owned by the user, so entries are never
//! edited in place: the whole table is rebuilt — dropping any line tagged
//! with the application marker, appending the new one — and handed to
//! `crontab` in a single call. A concurrently firing job sees either the
//! old table or the new one, never a hybrid.

use std::fs;

use tracing::info;

use super::{run_tool, JobScheduler, CRON_MARKER};
use crate::error::Result;
use crate::types::JobCommand;

const BACKEND: &str = "cron";

pub struct CronScheduler {
    command: JobCommand,
}

impl CronScheduler {
    pub fn new(command: JobCommand) -> Self {
        Self { command }
    }

    /// The table line scheduling the fetch job.
    fn entry(&self, expression: &str) -> String {
        format!(
            "{expression} cd {dir} && {program} run >> {log} 2>&1 {CRON_MARKER}",
            dir = self.command.working_dir.display(),
            program = self.command.program.display(),
            log = self.command.log_file.display(),
        )
    }

    /// Current table contents. `crontab -l` exits non-zero when the user has
    /// no table yet, which is an empty table, not a failure.
    fn read_table(&self) -> String {
        run_tool(BACKEND, "crontab", &["-l"]).unwrap_or_default()
    }

    /// Install `table` as the user's crontab through a temporary file.
    fn write_table(&self, table: &str) -> Result<()> {
        let tmp = std::env::temp_dir().join(format!("photoframe-crontab-{}", std::process::id()));
        fs::write(&tmp, table)?;
        let tmp_path = tmp.to_string_lossy();
        let result = run_tool(BACKEND, "crontab", &[tmp_path.as_ref()]);
        let _ = fs::remove_file(&tmp);
        result.map(|_| ())
    }
}

/// Rebuild a crontab: drop marker-tagged lines, append `entry` if given.
///
/// Pure, so replace/remove semantics are testable without touching the
/// host's table.
pub(crate) fn rebuild_table(existing: &str, entry: Option<&str>) -> String {
    let mut lines: Vec<&str> = existing
        .lines()
        .filter(|line| !line.contains(CRON_MARKER))
        .collect();
    if let Some(entry) = entry {
        lines.push(entry);
    }
    let mut table = lines.join("\n");
    if !table.is_empty() {
        table.push('\n');
    }
    table
}

impl JobScheduler for CronScheduler {
    fn name(&self) -> &'static str {
        BACKEND
    }

    fn install(&self, expression: &str) -> Result<()> {
        let table = self.read_table();
        let rebuilt = rebuild_table(&table, Some(&self.entry(expression)));
        self.write_table(&rebuilt)?;
        info!(expression, "crontab entry installed");
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        let table = self.read_table();
        if !table.lines().any(|line| line.contains(CRON_MARKER)) {
            // Nothing of ours installed.
            return Ok(());
        }
        self.write_table(&rebuild_table(&table, None))?;
        info!("crontab entry removed");
        Ok(())
    }

    fn is_installed(&self) -> Result<bool> {
        Ok(self
            .read_table()
            .lines()
            .any(|line| line.contains(CRON_MARKER)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scheduler() -> CronScheduler {
        CronScheduler::new(JobCommand {
            program: PathBuf::from("/usr/local/bin/photoframe"),
            working_dir: PathBuf::from("/home/frame/.photoframe"),
            log_file: PathBuf::from("/home/frame/.photoframe/logs/photoframe.log"),
        })
    }

    fn marker_lines(table: &str) -> usize {
        table.lines().filter(|l| l.contains(CRON_MARKER)).count()
    }

    #[test]
    fn entry_carries_expression_command_and_marker() {
        let entry = scheduler().entry("*/15 * * * *");
        assert!(entry.starts_with("*/15 * * * * "));
        assert!(entry.contains("cd /home/frame/.photoframe"));
        assert!(entry.contains("/usr/local/bin/photoframe run"));
        assert!(entry.contains(">> /home/frame/.photoframe/logs/photoframe.log 2>&1"));
        assert!(entry.ends_with(CRON_MARKER));
    }

    #[test]
    fn install_into_empty_table_adds_one_entry() {
        let entry = scheduler().entry("0 * * * *");
        let table = rebuild_table("", Some(&entry));
        assert_eq!(marker_lines(&table), 1);
        assert!(table.ends_with('\n'));
    }

    #[test]
    fn reinstall_is_idempotent() {
        let entry = scheduler().entry("0 * * * *");
        let once = rebuild_table("", Some(&entry));
        let twice = rebuild_table(&once, Some(&entry));
        assert_eq!(once, twice);
        assert_eq!(marker_lines(&twice), 1);
    }

    #[test]
    fn reinstall_replaces_old_interval() {
        let s = scheduler();
        let table = rebuild_table("", Some(&s.entry("0 * * * *")));
        let table = rebuild_table(&table, Some(&s.entry("*/15 * * * *")));
        assert_eq!(marker_lines(&table), 1);
        assert!(table.contains("*/15 * * * *"));
        assert!(!table.contains("0 * * * *"));
    }

    #[test]
    fn unrelated_entries_survive() {
        let existing = "0 4 * * * /usr/bin/backup.sh\n";
        let entry = scheduler().entry("0 * * * *");
        let table = rebuild_table(existing, Some(&entry));
        assert!(table.contains("/usr/bin/backup.sh"));
        assert_eq!(marker_lines(&table), 1);

        let removed = rebuild_table(&table, None);
        assert!(removed.contains("/usr/bin/backup.sh"));
        assert_eq!(marker_lines(&removed), 0);
    }

    #[test]
    fn remove_from_table_without_marker_changes_nothing() {
        let existing = "0 4 * * * /usr/bin/backup.sh\n";
        assert_eq!(rebuild_table(existing, None), existing);
    }

    #[test]
    fn remove_from_empty_table_is_empty() {
        assert_eq!(rebuild_table("", None), "");
    }
}
