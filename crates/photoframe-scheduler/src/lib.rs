//! `photoframe-scheduler` — OS-level recurring-job lifecycle management.
//!
//! # Overview
//!
//! Turns a "run the fetch job every N minutes" request into a native
//! scheduled job, and can reverse, inspect and re-issue that installation at
//! any time. One strategy is selected per invocation from the host's
//! capabilities; shared logic never branches on the platform again.
//!
//! | Backend   | Mechanism                    | Artifact                              |
//! |-----------|------------------------------|---------------------------------------|
//! | `Cron`    | user crontab                 | one marker-tagged table line          |
//! | `Systemd` | systemd user unit/timer pair | photoframe.service + photoframe.timer |
//! | `Launchd` | macOS per-user launch agent  | com.photoframe.fetch.plist            |
//!
//! Hosts with no recognised mechanism report [`SchedulerKind::Unknown`] and
//! fall back to the cron strategy. Install always replaces any previous
//! definition bearing the application marker, never appends, so at most one
//! job exists per host.

pub mod backend;
pub mod detect;
pub mod error;
pub mod interval;
pub mod types;

pub use backend::{for_kind, JobScheduler};
pub use detect::detect;
pub use error::{Result, SchedulerError};
pub use interval::translate;
pub use types::{JobCommand, ScheduleRequest, SchedulerKind};
