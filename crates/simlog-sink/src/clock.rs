//! crates/simlog-sink/src/clock.rs
//! Simulated time source and its textual rendering.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use simlog::TimeDisplay;

/// Source of simulated time for rendered records.
pub trait SimClock: Send + Sync {
    /// Current simulated time.
    fn now(&self) -> Duration;

    /// Number of delta cycles executed at the current time.
    fn delta_count(&self) -> u64 {
        0
    }
}

/// Clock advanced explicitly by the caller.
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
    delta: AtomicU64,
}

impl ManualClock {
    /// Creates a clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Jumps to `time` and clears the delta count.
    pub fn set(&self, time: Duration) {
        self.nanos.store(saturating_nanos(time), Ordering::Relaxed);
        self.delta.store(0, Ordering::Relaxed);
    }

    /// Moves time forward by `step` and clears the delta count.
    pub fn advance(&self, step: Duration) {
        let step = saturating_nanos(step);
        let _ = self
            .nanos
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |now| {
                Some(now.saturating_add(step))
            });
        self.delta.store(0, Ordering::Relaxed);
    }

    /// Counts one delta cycle at the current time.
    pub fn next_delta(&self) {
        self.delta.fetch_add(1, Ordering::Relaxed);
    }
}

impl SimClock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Relaxed))
    }

    fn delta_count(&self) -> u64 {
        self.delta.load(Ordering::Relaxed)
    }
}

fn saturating_nanos(time: Duration) -> u64 {
    u64::try_from(time.as_nanos()).unwrap_or(u64::MAX)
}

/// Displays a simulated time stamp in the largest unit that keeps the
/// integer part non-zero, with three decimals.
///
/// ```
/// use std::time::Duration;
/// use simlog_sink::SimTime;
///
/// assert_eq!(SimTime(Duration::from_nanos(1_200)).to_string(), "1.200 us");
/// assert_eq!(SimTime(Duration::from_nanos(15)).to_string(), "15.000 ns");
/// assert_eq!(SimTime(Duration::ZERO).to_string(), "0.000 s");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SimTime(pub Duration);

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const UNITS: [(u128, &str); 4] = [
            (1_000_000_000, "s"),
            (1_000_000, "ms"),
            (1_000, "us"),
            (1, "ns"),
        ];

        let nanos = self.0.as_nanos();
        if nanos == 0 {
            return f.write_str("0.000 s");
        }
        let (scale, unit) = UNITS
            .iter()
            .copied()
            .find(|(scale, _)| nanos >= *scale)
            .unwrap_or((1, "ns"));
        let whole = nanos / scale;
        let frac = (nanos % scale) * 1_000 / scale;
        write!(f, "{whole}.{frac:03} {unit}")
    }
}

/// Renders `now` according to the registry's time display mode.
pub fn render_time(now: Duration, display: TimeDisplay) -> String {
    match display {
        TimeDisplay::SimTime => SimTime(now).to_string(),
        TimeDisplay::Cycles { period } => {
            let cycles = now.as_nanos() / period.as_nanos().max(1);
            format!("{cycles} cycles")
        }
    }
}
