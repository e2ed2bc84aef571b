use lazyplan_core::{MemoryBackend, NewEvent, NewGoal, NewTodo, Planner};

fn tagged_todo(title: &str, tags: &[&str]) -> NewTodo {
    let mut request = NewTodo::new(title);
    request.tags = tags.iter().map(|tag| tag.to_string()).collect();
    request
}

#[test]
fn move_apartment_end_to_end() {
    let (mut planner, _) = Planner::open(MemoryBackend::new());

    let mut goal = NewGoal::new("Move apartment");
    goal.tags = vec!["apartment".to_string()];
    let goal = planner.add_goal(goal).unwrap();
    let todo = planner
        .add_todo(tagged_todo("Pack boxes", &["apartment"]))
        .unwrap();

    let outcome = planner
        .link_todo_to_goal(todo.todo.id, goal.goal.id)
        .unwrap();
    assert!(outcome.success);

    let details = planner.goal_details(goal.goal.id).unwrap();
    assert_eq!(details.goal.goal.title, "Move apartment");
    assert_eq!(details.todos.len(), 1);
    assert_eq!(details.todos[0].todo.title, "Pack boxes");

    let found = planner.search_all_by_tag("apartment");
    assert_eq!(found.todos.len(), 1);
    assert_eq!(found.goals.len(), 1);
    assert!(found.events.is_empty());
    assert_eq!(found.len(), 2);
}

#[test]
fn tag_search_is_exact_and_case_insensitive() {
    let (mut planner, _) = Planner::open(MemoryBackend::new());
    planner
        .add_todo(tagged_todo("Pay rent", &["Rent", "rent", " RENT "]))
        .unwrap();
    planner
        .add_todo(tagged_todo("Find flat", &["apartment"]))
        .unwrap();

    assert_eq!(planner.todo(1).unwrap().todo.tags, vec!["rent".to_string()]);
    assert_eq!(planner.search_todos_by_tag("RENT").len(), 1);
    assert_eq!(planner.search_todos_by_tag(" rent ").len(), 1);
    assert!(planner.search_todos_by_tag("apt").is_empty());
    assert!(planner.search_todos_by_tag("ren").is_empty());
}

#[test]
fn cross_kind_search_covers_events() {
    let (mut planner, _) = Planner::open(MemoryBackend::new());
    let mut event = NewEvent::new("Viewing", "2026-02-14T11:00:00");
    event.tags = vec!["Apartment".to_string()];
    planner.add_event(event).unwrap();

    let found = planner.search_all_by_tag("apartment");
    assert_eq!(found.events.len(), 1);
    assert_eq!(found.events[0].event.tags, vec!["apartment".to_string()]);
    assert!(planner.search_all_by_tag("garage").is_empty());
}
