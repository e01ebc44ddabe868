use chrono::{DateTime, Utc};
use gloo_timers::callback::Interval;

use liftlog_domain::{elapsed_seconds, format_elapsed};

const TICK_MILLIS: u32 = 1000;

/// Ticks once per second while a workout is running.
///
/// The elapsed time is always derived from the wall clock, so delayed or skipped ticks do not
/// accumulate drift. Dropping the stopwatch cancels the interval.
pub struct Stopwatch {
    started_at: DateTime<Utc>,
    interval: Option<Interval>,
}

impl Stopwatch {
    /// Starts ticking. `on_tick` receives the elapsed seconds since `started_at`.
    pub fn start(started_at: DateTime<Utc>, on_tick: impl Fn(u64) + 'static) -> Self {
        let interval = Interval::new(TICK_MILLIS, move || {
            on_tick(elapsed_seconds(started_at, Utc::now()));
        });
        Self {
            started_at,
            interval: Some(interval),
        }
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    #[must_use]
    pub fn elapsed(&self) -> u64 {
        elapsed_seconds(self.started_at, Utc::now())
    }

    /// Elapsed time as `m:ss`.
    #[must_use]
    pub fn display(&self) -> String {
        format_elapsed(self.elapsed())
    }

    pub fn stop(&mut self) {
        if let Some(interval) = self.interval.take() {
            interval.cancel();
        }
    }
}
