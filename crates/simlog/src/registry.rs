//! crates/simlog/src/registry.rs
//! Process-wide verbosity state: global level, per-category overrides, and
//! the time display mode.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{OnceLock, PoisonError, RwLock};
use std::time::Duration;

use rustc_hash::FxHashMap;

use crate::level::LogLevel;
use crate::record::Record;
use crate::severity::Severity;
use crate::verbosity::Verbosity;

/// How timestamps are rendered by sinks that show simulated time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimeDisplay {
    /// Show the simulated time stamp.
    SimTime,
    /// Show the number of elapsed cycles of the given period.
    Cycles {
        /// Length of one cycle.
        period: Duration,
    },
}

/// Global verbosity threshold plus category overrides.
///
/// Reads are cheap: the level is an atomic and the override table is only
/// locked once at least one override has been registered. Writers take a
/// write lock, so reconfiguring while other threads log is safe, although
/// records already past their call-site check are not recalled.
#[derive(Debug)]
pub struct VerbosityRegistry {
    level: AtomicU8,
    has_overrides: AtomicBool,
    overrides: RwLock<FxHashMap<String, Verbosity>>,
    cycle_base: RwLock<Option<Duration>>,
}

impl Default for VerbosityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl VerbosityRegistry {
    /// Creates a registry at [`LogLevel::Warning`] with no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::with_level(LogLevel::Warning)
    }

    /// Creates a registry at the given global level.
    #[must_use]
    pub fn with_level(level: LogLevel) -> Self {
        Self {
            level: AtomicU8::new(level.as_int()),
            has_overrides: AtomicBool::new(false),
            overrides: RwLock::new(FxHashMap::default()),
            cycle_base: RwLock::new(None),
        }
    }

    /// Returns the process-wide registry.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<VerbosityRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    /// Returns the global level.
    pub fn level(&self) -> LogLevel {
        LogLevel::from_int(self.level.load(Ordering::Relaxed))
    }

    /// Replaces the global level. Category overrides are unaffected.
    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level.as_int(), Ordering::Relaxed);
    }

    /// Returns the global verbosity threshold.
    pub fn verbosity(&self) -> Verbosity {
        self.level().verbosity()
    }

    /// Resolves the verbosity threshold for `category`.
    ///
    /// Dotted names fall back to their parents, so `top.cpu.alu` inherits an
    /// override registered for `top.cpu` or `top`. Without a matching override,
    /// or when `category` is `None` or empty, the global threshold applies.
    pub fn verbosity_for(&self, category: Option<&str>) -> Verbosity {
        let global = self.verbosity();
        let Some(mut name) = category.filter(|name| !name.is_empty()) else {
            return global;
        };
        if !self.has_overrides.load(Ordering::Acquire) {
            return global;
        }

        let overrides = self.overrides.read().unwrap_or_else(PoisonError::into_inner);
        loop {
            if let Some(verbosity) = overrides.get(name) {
                return *verbosity;
            }
            match name.rfind('.') {
                Some(pos) => name = &name[..pos],
                None => return global,
            }
        }
    }

    /// Registers an override expressed as a level.
    pub fn set_category_level(&self, category: impl Into<String>, level: LogLevel) {
        self.set_category_verbosity(category, level.verbosity());
    }

    /// Registers an override expressed as a raw verbosity.
    pub fn set_category_verbosity(&self, category: impl Into<String>, verbosity: Verbosity) {
        let mut overrides = self.overrides.write().unwrap_or_else(PoisonError::into_inner);
        overrides.insert(category.into(), verbosity);
        self.has_overrides.store(true, Ordering::Release);
    }

    /// Removes the override for `category`, returning it if present.
    pub fn clear_category(&self, category: &str) -> Option<Verbosity> {
        let mut overrides = self.overrides.write().unwrap_or_else(PoisonError::into_inner);
        let removed = overrides.remove(category);
        self.has_overrides
            .store(!overrides.is_empty(), Ordering::Release);
        removed
    }

    /// Removes every category override.
    pub fn clear_categories(&self) {
        let mut overrides = self.overrides.write().unwrap_or_else(PoisonError::into_inner);
        overrides.clear();
        self.has_overrides.store(false, Ordering::Release);
    }

    /// Switches time display to cycle counts of `period`.
    pub fn set_cycle_base(&self, period: Duration) {
        *self.cycle_base.write().unwrap_or_else(PoisonError::into_inner) = Some(period);
    }

    /// Reverts time display to simulated time.
    pub fn clear_cycle_base(&self) {
        *self.cycle_base.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Returns the configured cycle period, if any.
    pub fn cycle_base(&self) -> Option<Duration> {
        *self.cycle_base.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the active time display mode.
    pub fn time_display(&self) -> TimeDisplay {
        match self.cycle_base() {
            Some(period) if !period.is_zero() => TimeDisplay::Cycles { period },
            _ => TimeDisplay::SimTime,
        }
    }

    /// Decides whether a sink should keep `record`.
    ///
    /// Info records are compared against their category's threshold; the
    /// other severities against the global level. Fatal records always pass.
    pub fn admits(&self, record: &Record<'_>) -> bool {
        match record.severity {
            Severity::Info => record.verbosity <= self.verbosity_for(Some(record.category)),
            Severity::Fatal => true,
            severity => self.level() >= severity.minimum_level(),
        }
    }
}

/// Returns the global level of the process-wide registry.
pub fn global_level() -> LogLevel {
    VerbosityRegistry::global().level()
}

/// Sets the global level of the process-wide registry.
pub fn set_global_level(level: LogLevel) {
    VerbosityRegistry::global().set_level(level);
}

/// Returns the global verbosity of the process-wide registry.
pub fn global_verbosity() -> Verbosity {
    VerbosityRegistry::global().verbosity()
}

/// Resolves a category's verbosity in the process-wide registry.
pub fn verbosity_for(category: Option<&str>) -> Verbosity {
    VerbosityRegistry::global().verbosity_for(category)
}

/// Switches the process-wide time display to cycle counts.
pub fn set_cycle_base(period: Duration) {
    VerbosityRegistry::global().set_cycle_base(period);
}
