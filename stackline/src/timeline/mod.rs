//! Reconstructed timeline model
//!
//! A [`Timeline`] is the output of folding an ordered snapshot sequence
//! ([`create_timeline`]): for every retained task, at every observed call
//! depth, a time-ordered sequence of inferred call intervals.
//! [`simplify_timeline`] reduces a built timeline to its statistically
//! significant content without mutating the original.
//!
//! Layer 0 is a task's outermost (entry) call; each deeper layer is one more
//! level of nesting observed in at least one snapshot. Within a layer,
//! intervals never overlap: one interval's end is at most the next one's
//! start.

pub mod builder;
pub mod simplify;

pub use builder::create_timeline;
pub use simplify::simplify_timeline;

use crate::domain::{Duration, TaskId, Timestamp};
use crate::snapshot::{Args, Frame};
use serde::Serialize;
use std::collections::HashMap;

/// A time series of call stacks across every retained task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    /// Time of the first snapshot folded in.
    pub start: Timestamp,
    /// Time of the last snapshot folded in.
    pub end: Timestamp,
    /// Number of snapshots folded in.
    pub samples: usize,
    /// Per-task timelines, keyed by stable task id.
    pub tasks: HashMap<TaskId, TaskTimeline>,
}

impl Timeline {
    /// Wall-clock span covered by the snapshot sequence.
    #[must_use]
    pub fn span(&self) -> Duration {
        self.end.delta_since(self.start)
    }

    /// Tasks in ascending id order.
    ///
    /// The backing map has no meaningful iteration order; use this wherever
    /// output order matters (rendering, comparison).
    #[must_use]
    pub fn tasks_by_id(&self) -> Vec<&TaskTimeline> {
        let mut tasks: Vec<_> = self.tasks.values().collect();
        tasks.sort_unstable_by_key(|task| task.id);
        tasks
    }
}

/// Time series for an individual task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskTimeline {
    pub id: TaskId,
    /// Creation provenance recorded on first sight, innermost frame first.
    pub spawn_stack: Vec<Frame>,
    /// `layers[0]` is the outermost call; grown lazily as deeper stacks are
    /// observed.
    pub layers: Vec<Layer>,
}

/// One call-nesting depth within a task timeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layer {
    /// Inferred call intervals, time-ordered and non-overlapping.
    pub calls: Vec<Call>,
}

/// An inferred call interval within a layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Call {
    /// Module-qualified function name.
    pub name: String,
    /// Module qualifier alone; used for grouping and wrapper detection.
    pub module: String,
    /// Arguments observed when the interval was opened.
    pub args: Args,
    /// Offset of the first observation from the timeline start.
    pub start_offset: Duration,
    /// Offset of the last observation from the timeline start. `None` only
    /// while the builder is still folding; every interval in a returned
    /// timeline is closed.
    pub end_offset: Option<Duration>,
    /// Number of snapshots folded into this interval, always at least 1.
    pub samples: usize,
    /// Absolute time of the most recent observation. Exists to date the
    /// interval's end when it closes; not part of the published record.
    #[serde(skip)]
    pub(crate) last_seen: Timestamp,
}

impl Call {
    /// Observed duration, available once the interval is closed.
    ///
    /// Biased short: the end is the last time the call was actually seen,
    /// not the sample that proved it gone.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.end_offset.map(|end| end.saturating_sub(self.start_offset))
    }

    /// Whether the interval has not been closed yet.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.end_offset.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, start: u64, end: Option<u64>) -> Call {
        Call {
            name: name.to_string(),
            module: "app".to_string(),
            args: Args::default(),
            start_offset: Duration(start),
            end_offset: end.map(Duration),
            samples: 1,
            last_seen: Timestamp(0),
        }
    }

    #[test]
    fn test_call_duration_closed() {
        assert_eq!(call("app.Run", 5, Some(25)).duration(), Some(Duration(20)));
    }

    #[test]
    fn test_call_duration_open() {
        assert_eq!(call("app.Run", 5, None).duration(), None);
        assert!(call("app.Run", 5, None).is_open());
    }

    #[test]
    fn test_tasks_by_id_is_sorted() {
        let mut tasks = HashMap::new();
        for id in [9, 2, 31, 1] {
            tasks.insert(
                TaskId(id),
                TaskTimeline { id: TaskId(id), spawn_stack: vec![], layers: vec![] },
            );
        }
        let timeline =
            Timeline { start: Timestamp(0), end: Timestamp(10), samples: 2, tasks };

        let ids: Vec<u64> = timeline.tasks_by_id().iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![1, 2, 9, 31]);
    }

    #[test]
    fn test_span() {
        let timeline = Timeline {
            start: Timestamp(1_000_000),
            end: Timestamp(21_000_000),
            samples: 3,
            tasks: HashMap::new(),
        };
        assert_eq!(timeline.span(), Duration(20_000_000));
    }
}
