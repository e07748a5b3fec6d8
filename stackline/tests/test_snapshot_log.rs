use stackline::domain::{LoadError, TaskId, Timestamp};
use stackline::filter::TaskFilter;
use stackline::snapshot::{load_snapshots, read_snapshots, Args, Frame, Snapshot, TaskState};
use stackline::timeline::create_timeline;

fn sample_log() -> Vec<Snapshot> {
    let frame = |function: &str| Frame {
        function: function.to_string(),
        module: "app".to_string(),
        source_path: "app/server.go".to_string(),
        line: 27,
        args: Args { values: vec!["0xc0000b4000".to_string()], elided: false },
        stdlib: false,
    };

    [0u64, 10, 20]
        .into_iter()
        .map(|ms| Snapshot {
            time: Timestamp(ms * 1_000_000),
            tasks: vec![TaskState {
                id: TaskId(1),
                spawn_stack: vec![frame("Main")],
                frames: vec![frame("Serve")],
            }],
        })
        .collect()
}

#[test]
fn test_log_round_trips_through_file() {
    let snapshots = sample_log();
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), serde_json::to_string_pretty(&snapshots).unwrap()).unwrap();

    let loaded = load_snapshots(file.path()).unwrap();
    assert_eq!(loaded, snapshots);
}

#[test]
fn test_log_reads_from_any_reader() {
    let snapshots = sample_log();
    let json = serde_json::to_string(&snapshots).unwrap();

    let loaded = read_snapshots(json.as_bytes()).unwrap();
    assert_eq!(loaded, snapshots);
}

#[test]
fn test_loaded_log_feeds_the_builder() {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), serde_json::to_string(&sample_log()).unwrap()).unwrap();

    let loaded = load_snapshots(file.path()).unwrap();
    let timeline = create_timeline(&loaded, &TaskFilter::default()).unwrap();

    assert_eq!(timeline.samples, 3);
    assert_eq!(timeline.tasks[&TaskId(1)].layers[0].calls[0].name, "app.Serve");
}

#[test]
fn test_missing_file_is_io_error() {
    let err = load_snapshots("does/not/exist.json").unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}

#[test]
fn test_malformed_log_is_json_error() {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "{ not a snapshot log").unwrap();

    let err = load_snapshots(file.path()).unwrap_err();
    assert!(matches!(err, LoadError::Json(_)));
}
