//! Streaming fold of a snapshot sequence into a [`Timeline`].
//!
//! # Merge rule
//!
//! Snapshots are sparse samples, so call boundaries must be inferred. At
//! each layer, the current observation either continues the layer's most
//! recent interval or replaces it:
//!
//! - **Continuation**: the interval is still open, has the same qualified
//!   name, and either fewer than three samples have accumulated or the
//!   observed arguments are exactly equal. The first two observations of a
//!   repeated name are not enough evidence to split "one long call whose
//!   captured arguments have not stabilized" from "a new call sharing a
//!   name"; argument equality becomes the discriminator from the third
//!   sample on.
//! - **Replacement**: anything else closes the previous interval at the
//!   time it was last actually seen and opens a new interval at the current
//!   sample. Closing at the last observation biases durations short rather
//!   than long under coarse sampling.
//!
//! A task whose stack shallows leaves its deeper layers untouched for that
//! snapshot; an open interval there closes retroactively, at its own last
//! observation, either when a later sample reoccupies the layer or in the
//! final closing pass.

use crate::domain::{TimelineError, Timestamp};
use crate::filter::{is_internal_frame, TaskFilter};
use crate::snapshot::{Frame, Snapshot, TaskState};
use crate::timeline::{Call, Layer, TaskTimeline, Timeline};
use std::collections::HashMap;

/// Samples an interval must accumulate before argument equality joins the
/// continuation test.
const ARG_CHECK_MIN_SAMPLES: usize = 3;

/// Fold an ordered snapshot sequence into a [`Timeline`].
///
/// `snapshots` must already be in non-decreasing time order; the builder
/// trusts the caller and never sorts. Tasks excluded by `filter` never get a
/// [`TaskTimeline`]. Snapshot content is never an error - tasks with missing
/// stacks are folded as if those stacks were empty.
///
/// Every interval in the returned timeline is closed, and the result does
/// not depend on iteration order of any internal map.
///
/// # Errors
///
/// [`TimelineError::EmptyInput`] when `snapshots` is empty.
pub fn create_timeline(
    snapshots: &[Snapshot],
    filter: &TaskFilter,
) -> Result<Timeline, TimelineError> {
    let (Some(first), Some(last)) = (snapshots.first(), snapshots.last()) else {
        return Err(TimelineError::EmptyInput);
    };

    let mut timeline = Timeline {
        start: first.time,
        end: last.time,
        samples: 0,
        tasks: HashMap::new(),
    };

    for snapshot in snapshots {
        timeline.samples += 1;

        for task in &snapshot.tasks {
            if filter.excludes(task) {
                continue;
            }

            let start = timeline.start;
            let task_timeline = timeline
                .tasks
                .entry(task.id)
                .or_insert_with(|| new_task_timeline(task));

            fold_stack(task_timeline, &task.frames, snapshot.time, start);
        }
    }

    close_trailing(&mut timeline);

    Ok(timeline)
}

fn new_task_timeline(task: &TaskState) -> TaskTimeline {
    TaskTimeline {
        id: task.id,
        spawn_stack: task.spawn_stack.clone(),
        layers: Vec::new(),
    }
}

/// Fold one task's current stack into its per-depth layers.
///
/// Internal frames are dropped before any depth arithmetic, so layer 0 is
/// always the outermost *surviving* frame and internal frames never leave
/// holes in the layer sequence.
fn fold_stack(task_timeline: &mut TaskTimeline, frames: &[Frame], now: Timestamp, start: Timestamp) {
    let visible: Vec<&Frame> = frames.iter().filter(|f| !is_internal_frame(f)).collect();

    // Frames arrive innermost-first; walk them outermost-first so the index
    // is the layer.
    for (level, frame) in visible.iter().rev().enumerate() {
        while task_timeline.layers.len() <= level {
            task_timeline.layers.push(Layer::default());
        }

        observe(&mut task_timeline.layers[level], frame, now, start);
    }
}

/// Apply the merge rule for one observation at one layer.
fn observe(layer: &mut Layer, frame: &Frame, now: Timestamp, start: Timestamp) {
    let name = frame.qualified_name();

    if let Some(last) = layer.calls.last_mut() {
        if last.is_open()
            && last.name == name
            && (last.samples < ARG_CHECK_MIN_SAMPLES || last.args == frame.args)
        {
            last.samples += 1;
            last.last_seen = now;
            return;
        }

        if last.is_open() {
            close(last, start);
        }
    }

    layer.calls.push(Call {
        name,
        module: frame.module.clone(),
        args: frame.args.clone(),
        start_offset: now.delta_since(start),
        end_offset: None,
        samples: 1,
        last_seen: now,
    });
}

/// Date an interval's end to the last time it was actually observed.
fn close(call: &mut Call, timeline_start: Timestamp) {
    call.end_offset = Some(call.last_seen.delta_since(timeline_start));
}

/// Close every interval still open once the input is exhausted.
///
/// Only a layer's most recent interval can be open; earlier intervals were
/// closed when their successor was pushed.
fn close_trailing(timeline: &mut Timeline) {
    let start = timeline.start;

    for task in timeline.tasks.values_mut() {
        for layer in &mut task.layers {
            if let Some(last) = layer.calls.last_mut() {
                if last.is_open() {
                    close(last, start);
                }
            }
        }
    }
}
