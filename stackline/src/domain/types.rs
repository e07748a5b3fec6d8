//! Domain types providing compile-time safety and self-documentation
//!
//! These newtype wrappers prevent common bugs like passing a raw nanosecond
//! count where a task ID is expected, and make function signatures more
//! expressive.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Task ID
///
/// Stable identity of one task (thread of execution) across snapshots,
/// assigned by the runtime being sampled. This is the join key when folding
/// a snapshot sequence into a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task#{}", self.0)
    }
}

/// Timestamp in nanoseconds
///
/// Absolute point in time as reported by the snapshot capturer. Only
/// differences between timestamps are meaningful to reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Elapsed time since `earlier`, saturating to zero if `earlier` is
    /// actually later.
    #[must_use]
    pub fn delta_since(self, earlier: Timestamp) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }

    /// Convert to seconds (f64)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_seconds(self) -> f64 {
        self.0 as f64 / 1_000_000_000.0
    }

    /// Convert to milliseconds (f64)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_millis(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.as_seconds())
    }
}

/// Duration in nanoseconds
///
/// A time span: either an offset from a timeline's start or the length of
/// an inferred call interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Duration(pub u64);

impl Duration {
    /// Convert to milliseconds (f64)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_millis(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// Convert to seconds (f64)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_seconds(self) -> f64 {
        self.0 as f64 / 1_000_000_000.0
    }

    /// Convert to microseconds (u64)
    #[must_use]
    pub fn as_micros(self) -> u64 {
        self.0 / 1_000
    }

    /// Difference between two durations, saturating to zero.
    #[must_use]
    pub fn saturating_sub(self, other: Duration) -> Duration {
        Duration(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.as_millis();
        if ms >= 1000.0 {
            write!(f, "{:.2}s", self.as_seconds())
        } else {
            write!(f, "{ms:.2}ms")
        }
    }
}
