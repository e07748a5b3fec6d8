//! Snapshot input model
//!
//! A [`Snapshot`] is one instantaneous capture of every live task: its
//! stable id, the call stack that spawned it, and its current call stack.
//! Snapshots are produced externally (a periodic sampler plus a stack-dump
//! parser) and consumed here in caller-provided, non-decreasing time order.
//!
//! The model is tolerant of sparse capture: any stack the capturer could not
//! attribute simply deserializes as empty, never as an error.

use crate::domain::{LoadError, TaskId, Timestamp};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

/// Captured argument values for one call frame.
///
/// `elided` is set when the capturer truncated the list. Equality is exact:
/// same elision flag, same length, pointwise-equal values - a truncated
/// list never equals an untruncated one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Args {
    pub values: Vec<String>,
    pub elided: bool,
}

/// One call frame as reported by the upstream dump parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Function name without its module qualifier, e.g. `(*Conn).Serve`.
    pub function: String,
    /// Module the function lives in, e.g. `http`.
    pub module: String,
    /// Source file the frame resolves to.
    #[serde(default)]
    pub source_path: String,
    /// Line within `source_path`.
    #[serde(default)]
    pub line: u32,
    /// Arguments observed at capture time.
    #[serde(default)]
    pub args: Args,
    /// Set by the capturer when the frame resolved into the standard
    /// library distribution.
    #[serde(default)]
    pub stdlib: bool,
}

impl Frame {
    /// Module-qualified name, e.g. `http.(*Conn).Serve`.
    ///
    /// This is the identity used for interval merging and for matching
    /// creators against an ignore list.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.module, self.function)
    }

    /// Whether the symbol is exported (user-visible).
    ///
    /// Follows the upstream dump convention: the final segment of the
    /// function name starts with an uppercase letter. Compiler-generated
    /// suffixes like `init.0` are unexported.
    #[must_use]
    pub fn is_exported(&self) -> bool {
        self.function
            .rsplit('.')
            .next()
            .unwrap_or(&self.function)
            .chars()
            .next()
            .is_some_and(char::is_uppercase)
    }
}

/// One task's state within a single snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskState {
    pub id: TaskId,
    /// Call stack that spawned this task, innermost frame first. Empty when
    /// the capturer could not attribute creation.
    #[serde(default)]
    pub spawn_stack: Vec<Frame>,
    /// Current call stack, innermost frame first.
    #[serde(default)]
    pub frames: Vec<Frame>,
}

impl TaskState {
    /// The frame that spawned this task, if creation was captured.
    #[must_use]
    pub fn spawned_by(&self) -> Option<&Frame> {
        self.spawn_stack.first()
    }
}

/// A single point-in-time capture of every live task's call stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time: Timestamp,
    pub tasks: Vec<TaskState>,
}

/// Read a structured snapshot log (a JSON array of snapshots) from a reader.
///
/// This reads the already-structured model written by an external capture
/// pipeline; it does not parse raw textual stack dumps. Snapshots are
/// returned in input order - the caller is responsible for handing the
/// builder a non-decreasing time sequence.
///
/// # Errors
///
/// [`LoadError`] on read failures or malformed JSON.
pub fn read_snapshots<R: io::Read>(reader: R) -> Result<Vec<Snapshot>, LoadError> {
    Ok(serde_json::from_reader(io::BufReader::new(reader))?)
}

/// Load a structured snapshot log from a file.
///
/// Thin wrapper opening `path` and handing the file to [`read_snapshots`].
///
/// # Errors
///
/// [`LoadError`] on unreadable files or malformed JSON.
pub fn load_snapshots(path: impl AsRef<Path>) -> Result<Vec<Snapshot>, LoadError> {
    read_snapshots(std::fs::File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(module: &str, function: &str) -> Frame {
        Frame {
            function: function.to_string(),
            module: module.to_string(),
            source_path: String::new(),
            line: 0,
            args: Args::default(),
            stdlib: false,
        }
    }

    #[test]
    fn test_args_equality_exact_match() {
        let a = Args { values: vec!["0x1".into(), "0x2".into()], elided: false };
        let b = Args { values: vec!["0x1".into(), "0x2".into()], elided: false };
        assert_eq!(a, b);
    }

    #[test]
    fn test_args_inequality_on_elision() {
        let a = Args { values: vec!["0x1".into()], elided: false };
        let b = Args { values: vec!["0x1".into()], elided: true };
        assert_ne!(a, b);
    }

    #[test]
    fn test_args_inequality_on_length() {
        let a = Args { values: vec!["0x1".into()], elided: false };
        let b = Args { values: vec!["0x1".into(), "0x2".into()], elided: false };
        assert_ne!(a, b);
    }

    #[test]
    fn test_args_inequality_on_value() {
        let a = Args { values: vec!["0x1".into()], elided: false };
        let b = Args { values: vec!["0x2".into()], elided: false };
        assert_ne!(a, b);
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(frame("http", "(*Conn).Serve").qualified_name(), "http.(*Conn).Serve");
    }

    #[test]
    fn test_exported_method() {
        assert!(frame("rpc", "(*Client).Call").is_exported());
    }

    #[test]
    fn test_unexported_function() {
        assert!(!frame("http", "(*conn).serve").is_exported());
    }

    #[test]
    fn test_generated_symbol_is_unexported() {
        assert!(!frame("signal", "init.0").is_exported());
    }

    #[test]
    fn test_spawned_by_is_innermost() {
        let task = TaskState {
            id: TaskId(7),
            spawn_stack: vec![frame("app", "StartWorker"), frame("app", "Main")],
            frames: vec![],
        };
        assert_eq!(task.spawned_by().unwrap().function, "StartWorker");
    }

    #[test]
    fn test_spawned_by_tolerates_missing_stack() {
        let task = TaskState { id: TaskId(7), spawn_stack: vec![], frames: vec![] };
        assert!(task.spawned_by().is_none());
    }

    #[test]
    fn test_snapshot_deserializes_with_missing_fields() {
        // A capturer that lost the spawn stack and frame details still
        // yields a usable snapshot.
        let json = r#"{
            "time": 1000,
            "tasks": [
                { "id": 1, "frames": [{ "function": "Run", "module": "app" }] },
                { "id": 2 }
            ]
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.time, Timestamp(1000));
        assert_eq!(snapshot.tasks.len(), 2);
        assert_eq!(snapshot.tasks[0].frames[0].qualified_name(), "app.Run");
        assert!(snapshot.tasks[1].frames.is_empty());
        assert!(snapshot.tasks[1].spawn_stack.is_empty());
    }
}
