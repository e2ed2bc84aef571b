use lazyplan_core::{
    EntityRef, JsonFileBackend, LoadStatus, MemoryBackend, NewEvent, NewGoal, NewTodo, Planner,
    StoreBackend,
};
use std::fs;

#[test]
fn file_round_trip_restores_identical_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planner.json");

    let (mut planner, status) = Planner::open(JsonFileBackend::new(&path));
    assert_eq!(status, LoadStatus::Missing);

    let mut todo = NewTodo::new("Pack boxes");
    todo.due_date = Some("2026-02-20T18:00:00".to_string());
    todo.tags = vec!["Move".to_string()];
    planner.add_todo(todo).unwrap();
    planner.add_goal(NewGoal::new("Move apartment")).unwrap();
    planner
        .add_event(NewEvent::new("Truck pickup", "2026-03-01T08:00:00"))
        .unwrap();
    planner.link_todo_to_goal(1, 1).unwrap();
    planner
        .add_dependent_note("tape", "two rolls", EntityRef::todo(1))
        .unwrap();

    let (reloaded, status) = Planner::open(JsonFileBackend::new(&path));
    match status {
        LoadStatus::Loaded(counts) => {
            assert_eq!(counts.todos, 1);
            assert_eq!(counts.links, 1);
            assert_eq!(counts.dependent_notes, 1);
        }
        other => panic!("unexpected status: {other:?}"),
    }
    assert_eq!(reloaded.store(), planner.store());
}

#[test]
fn document_uses_snake_case_collections_and_null_optionals() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planner.json");
    let (mut planner, _) = Planner::open(JsonFileBackend::new(&path));
    planner.add_todo(NewTodo::new("Pack boxes")).unwrap();

    let document: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    for key in ["notes", "dependent_notes", "todos", "goals", "events", "links"] {
        assert!(document[key].is_array(), "missing collection {key}");
    }
    assert!(document["todos"][0]["due_date"].is_null());
    assert_eq!(document["sequences"]["todos"], 1);
}

#[test]
fn ids_are_not_reused_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planner.json");

    let (mut planner, _) = Planner::open(JsonFileBackend::new(&path));
    planner.add_todo(NewTodo::new("a")).unwrap();
    planner.add_todo(NewTodo::new("b")).unwrap();
    planner.delete_todo(2).unwrap();

    let (mut reopened, _) = Planner::open(JsonFileBackend::new(&path));
    let created = reopened.add_todo(NewTodo::new("c")).unwrap();
    assert_eq!(created.todo.id, 3);
}

#[test]
fn legacy_document_is_migrated_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.json");
    fs::write(
        &path,
        r#"{
            "notes": [],
            "todos": [
                {"id": 4, "title": "Pay rent", "description": "", "priority": 2,
                 "due_date": null, "completed": false, "attached_to_goal_id": 1,
                 "tags": ["Rent", "rent", " RENT "]}
            ],
            "goals": [
                {"id": 1, "title": "Budget", "description": "", "priority": 3,
                 "due_date": null, "completed": false, "attached_todo_ids": [4],
                 "attached_event_ids": []}
            ],
            "events": [
                {"id": 2, "title": "Landlord visit", "date": "2026-02-10T14:00:00",
                 "description": "", "attached_goal_ids": [1]}
            ]
        }"#,
    )
    .unwrap();

    let (mut planner, status) = Planner::open(JsonFileBackend::new(&path));
    assert!(matches!(status, LoadStatus::Loaded(_)));

    let todo = planner.todo(4).unwrap();
    assert_eq!(todo.todo.tags, vec!["rent".to_string()]);
    let event = planner.event(2).unwrap();
    assert_eq!(event.event.start, event.event.end);
    assert!(planner.store().links().is_empty());

    let next = planner.add_todo(NewTodo::new("Pay deposit")).unwrap();
    assert_eq!(next.todo.id, 5);

    let rewritten = fs::read_to_string(&path).unwrap();
    assert!(!rewritten.contains("attached_to_goal_id"));
    assert!(!rewritten.contains("attached_todo_ids"));
}

#[test]
fn corrupt_document_recovers_to_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planner.json");
    fs::write(&path, "{ this is not json").unwrap();

    let backend = JsonFileBackend::new(&path);
    let outcome = backend.load();
    assert!(matches!(outcome.status, LoadStatus::Recovered { .. }));
    assert!(outcome.store.todos().is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), "{ this is not json");
}

#[test]
fn bad_record_keeps_records_decoded_before_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planner.json");
    fs::write(
        &path,
        r#"{"todos": [
            {"id": 1, "title": "ok"},
            {"id": "two", "title": "broken"},
            {"id": 3, "title": "never reached"}
        ]}"#,
    )
    .unwrap();

    let (planner, status) = Planner::open(JsonFileBackend::new(&path));
    assert!(matches!(status, LoadStatus::Recovered { .. }));
    assert_eq!(planner.store().todos().len(), 1);
    assert_eq!(planner.store().todos()[0].title, "ok");
}

#[test]
fn save_replaces_file_without_leaving_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planner.json");
    let (mut planner, _) = Planner::open(JsonFileBackend::new(&path));
    planner.add_todo(NewTodo::new("Pack boxes")).unwrap();
    planner.add_todo(NewTodo::new("Call movers")).unwrap();

    let names = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["planner.json".to_string()]);
}

#[test]
fn memory_backend_document_reopens_with_same_sequences() {
    let (mut planner, _) = Planner::open(MemoryBackend::new());
    assert!(planner.backend().document().is_none());

    planner.add_todo(NewTodo::new("Pack boxes")).unwrap();
    planner.add_todo(NewTodo::new("Label boxes")).unwrap();
    assert!(planner.delete_todo(2).unwrap());

    let document = planner.backend().document().unwrap();
    let (mut reopened, status) = Planner::open(MemoryBackend::with_document(document));
    assert!(matches!(status, LoadStatus::Loaded(_)));
    assert_eq!(reopened.all_todos().len(), 1);
    assert_eq!(reopened.add_todo(NewTodo::new("Tape")).unwrap().todo.id, 3);
}
