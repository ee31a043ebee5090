use chrono::NaiveDate;
use gridplan_core::error::Error;
use gridplan_core::plan::{ProjectStatus, Task};
use gridplan_core::session::Planner;
use gridplan_core::status::Category;
use gridplan_core::store::{DOC_FILE, DataStore};
use tempfile::tempdir;

fn date(s: &str) -> NaiveDate {
    s.parse().expect("date")
}

#[test]
fn mutation_then_reload_round_trip() {
    let temp = tempdir().expect("tempdir");
    let today = date("2024-03-01");

    let store = DataStore::open(temp.path()).expect("open datastore");
    let mut planner = Planner::new(store, today);
    planner
        .add_task(date("2024-03-05"), "storyboard review")
        .expect("add");
    planner.add_task(date("2024-03-05"), "color pass").expect("add");
    planner.toggle_task(date("2024-03-05"), 0, true).expect("toggle");

    // a fresh session sees exactly what was persisted
    let store = DataStore::open(temp.path()).expect("reopen datastore");
    let planner = Planner::new(store, today);
    let tasks = planner.doc().day(date("2024-03-05"));
    assert_eq!(tasks.len(), 2);
    assert!(tasks[0].done);
    assert_eq!(
        tasks.last(),
        Some(&Task {
            name: "color pass".to_string(),
            done: false,
        })
    );
}

#[test]
fn corrupt_document_loads_as_the_empty_document() {
    let temp = tempdir().expect("tempdir");
    std::fs::write(temp.path().join(DOC_FILE), "{definitely not json").expect("write");

    let store = DataStore::open(temp.path()).expect("open datastore");
    let doc = store.load();
    assert!(doc.daily_plans.is_empty());
    assert!(doc.projects.is_empty());
}

#[test]
fn missing_document_loads_as_the_empty_document() {
    let temp = tempdir().expect("tempdir");
    let store = DataStore::open(temp.path()).expect("open datastore");
    let doc = store.load();
    assert!(doc.daily_plans.is_empty());
    assert!(doc.projects.is_empty());
}

#[test]
fn persist_failure_surfaces_without_dropping_the_change() {
    let temp = tempdir().expect("tempdir");
    let store = DataStore::open(temp.path()).expect("open datastore");
    // a directory squatting on the document path makes every save fail
    std::fs::create_dir(temp.path().join(DOC_FILE)).expect("block doc path");

    let mut planner = Planner::new(store, date("2024-03-01"));
    let err = planner
        .add_task(date("2024-03-05"), "storyboard review")
        .expect_err("save against a blocked path");
    assert!(matches!(err, Error::StorageUnavailable { .. }));

    // the in-memory change is kept for the caller to report or retry
    let tasks = planner.doc().day(date("2024-03-05"));
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].name, "storyboard review");
}

#[test]
fn project_board_survives_a_reload() {
    let temp = tempdir().expect("tempdir");
    let today = date("2024-03-01");

    let store = DataStore::open(temp.path()).expect("open datastore");
    let mut planner = Planner::new(store, today);
    planner.add_project("Skit pilot", Some("Short")).expect("add");
    planner
        .set_project_status(0, ProjectStatus::Active)
        .expect("activate");

    let store = DataStore::open(temp.path()).expect("reopen datastore");
    let planner = Planner::new(store, today);
    let project = &planner.doc().projects[0];
    assert_eq!(project.name, "Skit pilot");
    assert_eq!(project.format.as_deref(), Some("Short"));
    assert_eq!(project.status, ProjectStatus::Active);
}

#[test]
fn grid_reflects_persisted_completion_state() {
    let temp = tempdir().expect("tempdir");
    let today = date("2024-03-01");

    let store = DataStore::open(temp.path()).expect("open datastore");
    let mut planner = Planner::new(store, today);
    for name in ["a", "b", "c", "d"] {
        planner.add_task(today, name).expect("add");
    }
    planner.toggle_task(today, 0, true).expect("toggle");
    planner.toggle_task(today, 1, true).expect("toggle");

    let store = DataStore::open(temp.path()).expect("reopen datastore");
    let planner = Planner::new(store, today);
    let tiles = gridplan_core::grid::rolling_window(planner.doc(), today);
    assert_eq!(tiles[0].status.category, Category::Mid);
    assert_eq!(tiles[1].status.category, Category::Empty);
}
