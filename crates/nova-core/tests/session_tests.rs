use nova_core::{
    models::{LogEntry, Severity, Visual},
    Database, History, Milestone, MilestoneStatus, Plan, ProjectFile, ProjectState,
    ProjectStatus,
};
use tempfile::NamedTempFile;

/// Helper function to create a temporary database for testing
fn create_test_db() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let db = Database::new(temp_file.path()).expect("Failed to create test database");
    (temp_file, db)
}

fn sample_state() -> ProjectState {
    let mut state = ProjectState {
        status: ProjectStatus::Completed,
        prompt: "A weather dashboard".to_string(),
        plan: Plan::from(vec![
            Milestone::new("a", "Scaffold").with_status(MilestoneStatus::Done),
            Milestone::new("b", "Charts")
                .with_description("Render forecasts")
                .with_dependencies(["a"])
                .with_status(MilestoneStatus::Done),
        ]),
        files: vec![
            ProjectFile::new("index.html", "<html></html>").with_language("html"),
            ProjectFile::new("src/charts.ts", "export const charts = [];"),
        ],
        visuals: vec![Visual::diagram(Visual::BLUEPRINT_TITLE, "<svg/>")],
        ..Default::default()
    };
    state.log("Planner", "Architecture roadmap finalized.", Severity::Success);
    state.log("Tester", "Charts verified successfully.", Severity::Success);
    state
}

#[test]
fn test_database_initialization() {
    let (temp_file, db) = create_test_db();
    assert!(temp_file.path().exists());
    assert!(db.session_keys().unwrap().is_empty());
}

#[test]
fn test_round_trip_preserves_state_and_history() {
    let (_temp_file, mut db) = create_test_db();
    let state = sample_state();
    let mut history = History::new();
    history.snapshot_before_change(&Plan::new());

    db.save_session("project", &state, &history).unwrap();
    let stored = db.load_session("project").unwrap().expect("session stored");

    assert_eq!(stored.state, state);
    assert_eq!(stored.history, history);
    assert!(stored.history.can_undo());
}

#[test]
fn test_timestamps_keep_their_instant() {
    let (_temp_file, mut db) = create_test_db();
    let state = sample_state();
    let original: Vec<_> = state.logs.iter().map(|e| e.timestamp).collect();

    db.save_session("project", &state, &History::new()).unwrap();
    let stored = db.load_session("project").unwrap().unwrap();
    let revived: Vec<_> = stored.state.logs.iter().map(|e| e.timestamp).collect();

    assert_eq!(revived, original);
}

#[test]
fn test_sessions_are_keyed() {
    let (_temp_file, mut db) = create_test_db();
    db.save_session("one", &sample_state(), &History::new()).unwrap();
    db.save_session("two", &ProjectState::default(), &History::new()).unwrap();

    let mut keys = db.session_keys().unwrap();
    keys.sort();
    assert_eq!(keys, vec!["one", "two"]);

    assert!(db.delete_session("one").unwrap());
    assert!(!db.delete_session("one").unwrap());
    assert!(db.load_session("one").unwrap().is_none());
    assert!(db.load_session("two").unwrap().is_some());
}

#[test]
fn test_reopening_sees_saved_session() {
    let (temp_file, mut db) = create_test_db();
    let state = sample_state();
    db.save_session("project", &state, &History::new()).unwrap();
    drop(db);

    let db = Database::new(temp_file.path()).unwrap();
    let stored = db.load_session("project").unwrap().unwrap();
    assert_eq!(stored.state.plan.len(), 2);
    let latest: &LogEntry = stored.state.logs.latest().unwrap();
    assert_eq!(latest.message, "Charts verified successfully.");
}
