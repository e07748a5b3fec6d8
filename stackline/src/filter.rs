//! Frame and task noise filtering.
//!
//! Two orthogonal filters keep a reconstructed timeline focused on code the
//! user wrote:
//!
//! 1. **Frame classification** - runtime-internal frames (system-call
//!    bindings, unexported standard-library internals) carry no diagnostic
//!    value and are skipped before depth arithmetic.
//! 2. **Task exclusion** - tasks spawned by known infrastructure (signal
//!    bootstrap, the sampler itself, transport internals) are dropped
//!    wholesale; they never get a per-task timeline.

use crate::domain::TaskId;
use crate::snapshot::{Frame, TaskState};
use std::collections::HashSet;

// =============================================================================
// CLASSIFICATION TABLES
// =============================================================================

/// Module holding the runtime's system-call bindings. Every frame in it is
/// internal regardless of export status.
const SYSCALL_MODULE: &str = "syscall";

/// Source-path fragment marking the standard distribution's source tree.
const STDLIB_SRC_PATTERN: &str = "/go/src/";

/// Task creators that are almost always infrastructure rather than user
/// code: signal-handling bootstrap, trace and stack-sampler startup, logger
/// initialization, plugin stream plumbing, RPC client setup, and HTTP/2
/// transport internals.
///
/// Owned by this crate as the recommended default; callers seed a
/// [`TaskFilter`] with it via [`TaskFilter::suggested`].
pub const SUGGESTED_IGNORE: &[&str] = &[
    "signal.init.0",
    "trace.Start",
    "stacklog.Start",
    "glog.init.0",
    "localbinary.(*Plugin).AttachStream",
    "rpc.(*DefaultRPCClientDriverFactory).NewRPCClientDriver",
    "http.(*http2Transport).newClientConn",
];

// =============================================================================
// PREDICATES
// =============================================================================

/// Classify a frame as runtime-internal noise.
///
/// Internal frames are skipped during reconstruction; they never open call
/// intervals. A frame is internal when its module is the system-call binding
/// module, or when it is an unexported symbol living in the standard
/// distribution. An exported symbol is never internal, even when it resides
/// in a library path.
#[must_use]
pub fn is_internal_frame(frame: &Frame) -> bool {
    if frame.module == SYSCALL_MODULE {
        return true;
    }

    if frame.is_exported() {
        return false;
    }

    frame.stdlib || frame.source_path.contains(STDLIB_SRC_PATTERN)
}

/// Decides which tasks are folded into a timeline.
///
/// Both filters are optional: `TaskFilter::default()` retains every task.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Qualified creator names whose tasks are excluded entirely.
    pub ignore_creators: HashSet<String>,
    /// When non-empty, only tasks with these ids are retained.
    pub allowed_ids: HashSet<TaskId>,
}

impl TaskFilter {
    /// A filter seeded with [`SUGGESTED_IGNORE`] and no id restriction.
    #[must_use]
    pub fn suggested() -> Self {
        Self {
            ignore_creators: SUGGESTED_IGNORE.iter().copied().map(String::from).collect(),
            allowed_ids: HashSet::new(),
        }
    }

    /// True when `task` should be excluded from the timeline.
    ///
    /// A task is excluded when an allow-list is present and does not contain
    /// its id, or when the innermost frame of its spawn stack matches an
    /// ignored creator. A task with no spawn stack is never creator-matched.
    #[must_use]
    pub fn excludes(&self, task: &TaskState) -> bool {
        if !self.allowed_ids.is_empty() && !self.allowed_ids.contains(&task.id) {
            return true;
        }

        task.spawned_by()
            .is_some_and(|creator| self.ignore_creators.contains(&creator.qualified_name()))
    }
}
