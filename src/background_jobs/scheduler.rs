use super::context::JobContext;
use super::job::{BackgroundJob, JobError};
use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveTime, TimeZone};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Local time of day at which the daily jobs run.
pub const DAILY_RUN_TIME: NaiveTime = match NaiveTime::from_hms_opt(12, 0, 0) {
    Some(t) => t,
    None => panic!("invalid run time"),
};

/// Source of the current local time.
pub type Clock = Arc<dyn Fn() -> DateTime<Local> + Send + Sync>;

/// Next occurrence of `run_at` at or after `now`.
///
/// If `now` is exactly `run_at`, the run is due immediately. A `run_at` that
/// falls in a DST gap is pushed forward by an hour.
pub fn next_run_after<Tz: TimeZone>(now: &DateTime<Tz>, run_at: NaiveTime) -> DateTime<Tz> {
    let tz = now.timezone();
    let today = now.date_naive().and_time(run_at);
    let target = if now.naive_local() > today {
        today + ChronoDuration::days(1)
    } else {
        today
    };

    tz.from_local_datetime(&target)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(target + ChronoDuration::hours(1)))
                .earliest()
        })
        .unwrap_or_else(|| tz.from_utc_datetime(&target))
}

/// Waits up to `grace` for the scheduler task to finish after shutdown was
/// requested. Returns `false` if it is still running, typically because a job
/// is blocked on the database or SMTP server. The runtime cannot be dropped
/// while that job runs, so the caller has to exit the process instead.
pub async fn wait_for_stop(handle: JoinHandle<()>, grace: Duration) -> bool {
    match tokio::time::timeout(grace, handle).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            error!("Scheduler task failed: {}", e);
            true
        }
        Err(_) => {
            warn!("Scheduler did not stop within {:?}", grace);
            false
        }
    }
}

/// Runs every registered job once a day, in registration order.
pub struct DailyScheduler {
    jobs: Vec<Arc<dyn BackgroundJob>>,

    /// Local time of day of the daily run.
    run_at: NaiveTime,

    /// Token to signal scheduler shutdown.
    shutdown_token: CancellationToken,

    /// Shared context provided to jobs during execution.
    job_context: JobContext,

    clock: Clock,
}

impl DailyScheduler {
    pub fn new(shutdown_token: CancellationToken, job_context: JobContext) -> Self {
        Self::with_clock(shutdown_token, job_context, Arc::new(Local::now))
    }

    pub fn with_clock(
        shutdown_token: CancellationToken,
        job_context: JobContext,
        clock: Clock,
    ) -> Self {
        Self {
            jobs: Vec::new(),
            run_at: DAILY_RUN_TIME,
            shutdown_token,
            job_context,
            clock,
        }
    }

    /// Register a job with the scheduler.
    pub fn register_job(&mut self, job: Arc<dyn BackgroundJob>) {
        info!("Registering job: {} - {}", job.id(), job.description());
        self.jobs.push(job);
    }

    /// Get the number of registered jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Main scheduler loop. Returns once the shutdown token is cancelled.
    pub async fn run(&self) {
        info!(
            "Starting daily scheduler with {} registered jobs",
            self.jobs.len()
        );

        let mut last_run: Option<DateTime<Local>> = None;
        loop {
            let now = (self.clock)();
            let mut next = next_run_after(&now, self.run_at);
            // A run that finishes within its own trigger second must not fire twice
            if let Some(previous) = last_run {
                if next <= previous {
                    next = next_run_after(&(previous + ChronoDuration::seconds(1)), self.run_at);
                }
            }
            info!("Next run scheduled at {}", next.format("%Y-%m-%d %H:%M:%S"));

            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            debug!("Scheduler sleeping for {:?}", wait);

            tokio::select! {
                biased;
                _ = self.shutdown_token.cancelled() => {
                    info!("Scheduler received shutdown signal");
                    break;
                }
                _ = tokio::time::sleep(wait) => {}
            }

            if self.shutdown_token.is_cancelled() {
                break;
            }

            let all_succeeded = self.run_jobs().await;
            last_run = Some(next);
            if all_succeeded {
                info!("Daily tasks completed.");
            } else {
                warn!("Daily tasks finished with errors");
            }
        }

        info!("Daily scheduler stopped");
    }

    /// Runs each job on a blocking thread, one at a time. Returns `true` only
    /// if every job ran and succeeded.
    async fn run_jobs(&self) -> bool {
        let mut all_succeeded = true;
        for job in &self.jobs {
            if self.shutdown_token.is_cancelled() {
                warn!("Shutdown requested, skipping remaining jobs");
                return false;
            }

            let job_id = job.id();
            info!("Starting job: {}", job_id);

            let job = Arc::clone(job);
            let ctx = self.job_context.clone();
            let start_time = Instant::now();
            let result = tokio::task::spawn_blocking(move || job.execute(&ctx)).await;
            let elapsed = start_time.elapsed();

            match result {
                Ok(Ok(())) => {
                    info!("Job {} completed successfully in {:?}", job_id, elapsed);
                }
                Ok(Err(JobError::Cancelled)) => {
                    all_succeeded = false;
                    info!("Job {} was cancelled after {:?}", job_id, elapsed);
                }
                Ok(Err(e)) => {
                    all_succeeded = false;
                    error!("Job {} failed after {:?}: {}", job_id, elapsed, e);
                }
                Err(e) => {
                    all_succeeded = false;
                    error!("Job {} panicked after {:?}: {}", job_id, elapsed, e);
                }
            }
        }
        all_succeeded
    }
}
