//! Background job scheduling and execution system.
//!
//! Jobs run once a day at a fixed local time, one after the other, on a
//! blocking thread. A failing job is logged and does not stop the next one.

mod context;
mod job;
pub mod jobs;
mod scheduler;

pub use context::JobContext;
pub use job::{BackgroundJob, JobError};
pub use scheduler::{next_run_after, wait_for_stop, Clock, DailyScheduler, DAILY_RUN_TIME};
