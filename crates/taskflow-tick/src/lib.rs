//! Fixed-interval poll scheduler for TaskFlow.
//!
//! Drives recurring background checks (the session expiry poll) on a
//! steady cadence with pause/resume support and missed-poll accounting.
//!
//! # Disabled mode
//!
//! When the interval is zero the scheduler is disabled and
//! [`PollScheduler::wait_for_poll`] pends forever, so a `select!` loop
//! only reacts to its other branches.
//!
//! # Integration
//!
//! The scheduler sits inside a monitor actor's `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(signal) = activity_rx.recv() => { /* record activity */ }
//!         _ = scheduler.wait_for_poll() => { /* check expiry */ }
//!     }
//! }
//! ```
//!
//! Time comes from `tokio::time`, so tests run with a paused runtime
//! clock and advance it explicitly.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the poll scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Time between polls. `Duration::ZERO` disables polling.
    pub interval: Duration,
    /// Fire the first poll immediately instead of one interval from now.
    pub fire_immediately: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            fire_immediately: false,
        }
    }
}

impl PollConfig {
    /// Shortest interval accepted. Anything below is raised to this.
    pub const MIN_INTERVAL: Duration = Duration::from_millis(10);

    /// Create a config polling every `interval`.
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    /// Raise non-zero intervals below [`Self::MIN_INTERVAL`].
    ///
    /// Called automatically by [`PollScheduler::new`].
    pub fn validated(mut self) -> Self {
        if !self.interval.is_zero() && self.interval < Self::MIN_INTERVAL {
            warn!(
                interval_ms = self.interval.as_millis() as u64,
                min_ms = Self::MIN_INTERVAL.as_millis() as u64,
                "poll interval below minimum, raising"
            );
            self.interval = Self::MIN_INTERVAL;
        }
        self
    }

    /// The poll period, or `None` when disabled.
    pub fn period(&self) -> Option<Duration> {
        if self.interval.is_zero() {
            None
        } else {
            Some(self.interval)
        }
    }
}

// ---------------------------------------------------------------------------
// Poll info (returned to caller each poll)
// ---------------------------------------------------------------------------

/// Information about a fired poll, returned by [`PollScheduler::wait_for_poll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollInfo {
    /// Monotonically increasing poll number (starts at 1).
    pub poll: u64,
    /// Whole intervals that passed without a poll because the caller was
    /// late to wait (0 in normal operation).
    pub missed: u64,
}

/// Counters kept across the scheduler's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollMetrics {
    /// Polls fired.
    pub total_polls: u64,
    /// Intervals skipped because a poll fired late.
    pub total_missed: u64,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Fixed-interval poll scheduler.
///
/// Late polls never burst: after a late wake-up the next poll is
/// scheduled one interval from now and the skipped intervals are counted.
pub struct PollScheduler {
    config: PollConfig,
    period: Option<Duration>,
    poll_count: u64,
    next_poll: Option<Instant>,
    paused: bool,
    metrics: PollMetrics,
}

impl PollScheduler {
    /// Create a scheduler from config. The first poll is due one interval
    /// from now (or immediately with `fire_immediately`).
    pub fn new(config: PollConfig) -> Self {
        let config = config.validated();
        let period = config.period();
        let now = Instant::now();
        let next_poll = period.map(|p| if config.fire_immediately { now } else { now + p });

        match period {
            Some(p) => debug!(interval_ms = p.as_millis() as u64, "poll scheduler created"),
            None => debug!("poll scheduler created disabled"),
        }

        Self {
            config,
            period,
            poll_count: 0,
            next_poll,
            paused: false,
            metrics: PollMetrics::default(),
        }
    }

    /// Create a scheduler polling every `interval`.
    pub fn every(interval: Duration) -> Self {
        Self::new(PollConfig::every(interval))
    }

    /// Wait until the next poll is due.
    ///
    /// Disabled or paused schedulers pend forever. Cancel-safe: dropping
    /// the future before it resolves leaves the schedule untouched.
    pub async fn wait_for_poll(&mut self) -> PollInfo {
        let (next, period) = match (self.next_poll, self.period) {
            (Some(next), Some(period)) if !self.paused => (next, period),
            _ => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        };

        time::sleep_until(next).await;

        let now = Instant::now();
        self.poll_count += 1;

        let late_by = now.saturating_duration_since(next);
        let missed = (late_by.as_nanos() / period.as_nanos()) as u64;
        if missed > 0 {
            warn!(
                poll = self.poll_count,
                missed,
                late_ms = late_by.as_millis() as u64,
                "poll fired late, skipping ahead"
            );
            self.next_poll = Some(now + period);
        } else {
            self.next_poll = Some(next + period);
        }

        self.metrics.total_polls += 1;
        self.metrics.total_missed += missed;
        trace!(poll = self.poll_count, "poll fired");

        PollInfo {
            poll: self.poll_count,
            missed,
        }
    }

    /// Stop firing polls until [`resume`](Self::resume). Idempotent.
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            debug!(poll = self.poll_count, "poll scheduler paused");
        }
    }

    /// Resume after a pause. The next poll is due one interval from now,
    /// so time spent paused doesn't trigger a burst.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            if let Some(period) = self.period {
                self.next_poll = Some(Instant::now() + period);
            }
            debug!(poll = self.poll_count, "poll scheduler resumed");
        }
    }

    /// Whether the scheduler is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether polling is disabled (zero interval).
    pub fn is_disabled(&self) -> bool {
        self.period.is_none()
    }

    /// Polls fired so far.
    pub fn poll_count(&self) -> u64 {
        self.poll_count
    }

    /// Snapshot of the counters.
    pub fn metrics(&self) -> &PollMetrics {
        &self.metrics
    }

    /// The configured interval, or `None` when disabled.
    pub fn interval(&self) -> Option<Duration> {
        self.period
    }

    /// The effective configuration.
    pub fn config(&self) -> &PollConfig {
        &self.config
    }
}
