//! # Stackline - Execution Timelines from Periodic Stack Snapshots
//!
//! Stackline reconstructs a best-effort execution timeline of a running
//! concurrent program from coarse, periodic snapshots of its call stacks.
//! Each snapshot captures, at one instant, every live task's current call
//! stack and its creation provenance. Snapshots are sparse samples rather
//! than a continuous trace, so the core problem is statistical: inferring
//! call start/end boundaries, call repetition, and noise from a sequence of
//! instantaneous observations, then reducing the reconstruction to a signal
//! worth displaying.
//!
//! ## Data Flow
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐     ┌──────────────────┐
//! │ Snapshot capture │────▶│ create_timeline  │────▶│ simplify_timeline│
//! │  (external       │     │  (streaming fold │     │  (noise floor,   │
//! │   sampler +      │     │   + merge rule)  │     │   wrapper drop)  │
//! │   dump parser)   │     └────────┬─────────┘     └────────┬─────────┘
//! └──────────────────┘              │                        │
//!                                   ▼                        ▼
//!                              raw Timeline           reduced Timeline
//!                                                   (consumed read-only
//!                                                    by renderers)
//! ```
//!
//! Capture and raw-dump parsing sit upstream; rendering (HTML, profiler
//! formats, plain text) sits downstream. Neither lives in this crate.
//!
//! ## Module Structure
//!
//! - [`snapshot`]: the immutable input model - a timestamp plus every live
//!   task's identity, spawn stack, and current call stack
//! - [`filter`]: predicates deciding which frames are runtime-internal noise
//!   and which tasks are infrastructure to exclude wholesale
//! - [`timeline`]: the reconstruction - per-task, per-depth call intervals -
//!   and the pure simplification pass over a built timeline
//! - [`domain`]: newtype wrappers (`TaskId`, `Timestamp`, `Duration`) and
//!   structured errors
//!
//! ## Sampling Caveats
//!
//! Reconstruction deliberately biases interval durations *short*: a call is
//! closed at the time it was last actually observed, not at the sample that
//! proved it gone. A layer left untouched because a task's stack shallowed
//! is indistinguishable from a call that ended between samples; no gap
//! marker is produced.

pub mod domain;
pub mod filter;
pub mod snapshot;
pub mod timeline;
