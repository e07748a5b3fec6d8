//! Statistical noise reduction over a built timeline.
//!
//! Reduction is pure: the input is read-only and a smaller timeline is
//! produced. Three rules, applied per task in layer order:
//!
//! 1. An interval observed in under 0.4% of the timeline's samples is below
//!    the confident-detection floor and dropped.
//! 2. On middle layers, an interval exactly matching an interval of the
//!    nearest *surviving* shallower layer on start, end, and module is a
//!    pass-through wrapper that adds nothing beyond its caller, and is
//!    dropped. Judging against the reduced output rather than the raw input
//!    keeps the pass idempotent: re-running it never finds new wrappers.
//! 3. Layers left without calls are dropped, then tasks left without layers.
//!
//! Every drop is logged at debug level so callers who opt into logging can
//! audit the reduction; the log output is not part of the contract.

use crate::timeline::{Call, Layer, TaskTimeline, Timeline};
use log::debug;
use std::collections::HashMap;

/// Inverse of the noise floor: an interval is kept only while
/// `samples * NOISE_FLOOR_DIVISOR >= timeline.samples` (i.e. at least 0.4%
/// of all snapshots saw it).
const NOISE_FLOOR_DIVISOR: usize = 250;

/// Produce a reduced copy of `timeline`.
///
/// `start`, `end`, and `samples` are preserved unchanged; only the per-task
/// structure shrinks. The input is never mutated.
#[must_use]
pub fn simplify_timeline(timeline: &Timeline) -> Timeline {
    let mut tasks = HashMap::new();

    for (id, task) in &timeline.tasks {
        let mut layers = Vec::new();

        for (level, layer) in task.layers.iter().enumerate() {
            let mut calls = Vec::new();

            for call in &layer.calls {
                if call.samples * NOISE_FLOOR_DIVISOR < timeline.samples {
                    debug!(
                        "{id}: dropping {} below noise floor ({} of {} samples)",
                        call.name, call.samples, timeline.samples
                    );
                    continue;
                }

                // First and last layers always carry information: the entry
                // point and the innermost activity.
                let middle = level > 0 && level != task.layers.len() - 1;
                if middle && layers.last().is_some_and(|shallower| is_wrapper(call, shallower)) {
                    debug!("{id}: dropping pass-through wrapper {}", call.name);
                    continue;
                }

                calls.push(call.clone());
            }

            if calls.is_empty() {
                debug!("{id}: dropping layer {level} with no significant calls");
                continue;
            }

            layers.push(Layer { calls });
        }

        if layers.is_empty() {
            debug!("{id}: dropping task with no significant layers");
            continue;
        }

        tasks.insert(
            *id,
            TaskTimeline { id: task.id, spawn_stack: task.spawn_stack.clone(), layers },
        );
    }

    debug!("simplified {} tasks down to {}", timeline.tasks.len(), tasks.len());

    Timeline { start: timeline.start, end: timeline.end, samples: timeline.samples, tasks }
}

/// A wrapper mirrors its surviving caller exactly: same start, same end,
/// same module.
fn is_wrapper(call: &Call, shallower: &Layer) -> bool {
    shallower.calls.iter().any(|above| {
        above.start_offset == call.start_offset
            && above.end_offset == call.end_offset
            && above.module == call.module
    })
}
