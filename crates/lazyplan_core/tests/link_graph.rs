use lazyplan_core::{
    EntityKind, EntityRef, MemoryBackend, NewEvent, NewGoal, NewNote, NewTodo, Planner,
};

fn planner_with(todos: &[&str], goals: &[&str]) -> Planner<MemoryBackend> {
    let (mut planner, _) = Planner::open(MemoryBackend::new());
    for title in todos {
        planner.add_todo(NewTodo::new(*title)).unwrap();
    }
    for title in goals {
        planner.add_goal(NewGoal::new(*title)).unwrap();
    }
    planner
}

#[test]
fn todo_to_goal_link_points_from_goal_to_todo() {
    let mut planner = planner_with(&["Pack boxes"], &["Move apartment"]);

    let outcome = planner.link_todo_to_goal(1, 1).unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.message, "Linked todo 'Pack boxes' to goal 'Move apartment'");
    let link = outcome.link.unwrap();
    assert_eq!(link.source(), EntityRef::goal(1));
    assert_eq!(link.target(), EntityRef::todo(1));

    assert_eq!(planner.related_todos(EntityRef::goal(1)).len(), 1);
    assert!(planner.related_goals(EntityRef::todo(1)).is_empty());
}

#[test]
fn missing_endpoints_are_named_and_nothing_is_stored() {
    let mut planner = planner_with(&["Pack boxes"], &[]);
    let saves = planner.backend().save_count();

    let outcome = planner.link_todo_to_goal(3, 9).unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Todo 3 and Goal 9 not found");
    assert_eq!(outcome.missing, vec![EntityRef::todo(3), EntityRef::goal(9)]);

    let outcome = planner.link_todo_to_goal(1, 9).unwrap();
    assert_eq!(outcome.message, "Goal 9 not found");

    assert!(planner.store().links().is_empty());
    assert_eq!(planner.backend().save_count(), saves);
}

#[test]
fn named_links_use_their_own_messages() {
    let mut planner = planner_with(&["Move", "Pack boxes"], &["Settle in", "Unpack"]);
    planner
        .add_event(NewEvent::new("Truck pickup", "2026-03-01T08:00:00"))
        .unwrap();
    planner
        .add_note(NewNote {
            title: "Checklist".to_string(),
            note_type: "list".to_string(),
            content: String::new(),
        })
        .unwrap();

    let subtask = planner.link_todo_to_todo(1, 2).unwrap();
    assert_eq!(subtask.message, "Linked 'Pack boxes' as subtask of 'Move'");
    assert_eq!(subtask.link.unwrap().source(), EntityRef::todo(1));

    let sub_goal = planner.link_goal_to_goal(1, 2).unwrap();
    assert_eq!(sub_goal.message, "Linked 'Unpack' as sub-goal of 'Settle in'");

    let event_goal = planner.link_event_to_goal(1, 1).unwrap();
    assert_eq!(event_goal.message, "Linked event 'Truck pickup' to goal 'Settle in'");
    assert_eq!(event_goal.link.unwrap().source(), EntityRef::goal(1));

    let todo_event = planner.link_todo_to_event(2, 1).unwrap();
    assert_eq!(todo_event.message, "Linked todo 'Pack boxes' to event 'Truck pickup'");

    let todo_note = planner.link_todo_to_note(2, 1).unwrap();
    assert_eq!(todo_note.message, "Linked todo 'Pack boxes' to note 'Checklist'");
    assert_eq!(todo_note.link.unwrap().target(), EntityRef::note(1));
}

#[test]
fn goal_details_follow_outgoing_links_only() {
    let mut planner = planner_with(&["Pack boxes"], &["Move apartment", "Declutter"]);
    planner
        .add_event(NewEvent::new("Truck pickup", "2026-03-01T08:00:00"))
        .unwrap();
    planner.link_todo_to_goal(1, 1).unwrap();
    planner.link_event_to_goal(1, 1).unwrap();
    planner.link_goal_to_goal(1, 2).unwrap();

    let details = planner.goal_details(1).unwrap();
    assert_eq!(details.goal.goal.title, "Move apartment");
    assert_eq!(details.todos.len(), 1);
    assert_eq!(details.events.len(), 1);
    assert_eq!(details.sub_goals[0].goal.title, "Declutter");

    let sub = planner.goal_details(2).unwrap();
    assert!(sub.sub_goals.is_empty());
    assert!(planner.goal_details(7).is_none());
}

#[test]
fn duplicate_links_are_stored_but_related_once() {
    let mut planner = planner_with(&["Pack boxes"], &["Move apartment"]);
    planner.link_todo_to_goal(1, 1).unwrap();
    planner.link_todo_to_goal(1, 1).unwrap();

    assert_eq!(planner.links_from(EntityRef::goal(1)).len(), 2);
    assert_eq!(planner.related_todos(EntityRef::goal(1)).len(), 1);
}

#[test]
fn unlink_removes_one_matching_link() {
    let mut planner = planner_with(&["Pack boxes"], &["Move apartment"]);
    planner.link_todo_to_goal(1, 1).unwrap();

    assert!(!planner
        .unlink_items(EntityRef::todo(1), EntityRef::goal(1))
        .unwrap());
    assert!(planner
        .unlink_items(EntityRef::goal(1), EntityRef::todo(1))
        .unwrap());
    assert!(planner.store().links().is_empty());
}

#[test]
fn raw_links_are_not_validated() {
    let mut planner = planner_with(&[], &[]);
    let link = planner
        .create_link(EntityRef::goal(5), EntityRef::todo(6))
        .unwrap();

    assert_eq!(planner.links_to(EntityRef::todo(6)), vec![link.clone()]);
    assert!(planner.linked_items(EntityRef::goal(5)).links_from.is_empty());
    assert!(planner.delete_link(link.id).unwrap());
    assert!(!planner.delete_link(link.id).unwrap());
}

#[test]
fn linked_items_lists_both_directions() {
    let mut planner = planner_with(&["Pack boxes"], &["Move apartment"]);
    planner
        .add_event(NewEvent::new("Truck pickup", "2026-03-01T08:00:00"))
        .unwrap();
    planner.link_todo_to_goal(1, 1).unwrap();
    planner.link_todo_to_event(1, 1).unwrap();

    let items = planner.linked_items(EntityRef::todo(1));
    assert_eq!(items.item, EntityRef::todo(1));
    assert_eq!(items.links_from.len(), 1);
    assert_eq!(items.links_from[0].kind, EntityKind::Event);
    assert_eq!(items.links_from[0].relationship, "todo -> event");
    assert_eq!(items.links_to.len(), 1);
    assert_eq!(items.links_to[0].title, "Move apartment");
    assert_eq!(items.links_to[0].relationship, "goal -> todo");
}

#[test]
fn parent_goal_follows_named_goal_link() {
    let mut planner = planner_with(&["Pack boxes"], &["Move apartment", "Declutter"]);
    assert!(planner.parent_goal(1).is_none());

    planner.link_todo_to_goal(1, 2).unwrap();
    assert_eq!(planner.parent_goal(1).unwrap().goal.title, "Declutter");
    assert!(planner.parent_goal(2).is_none());
}

#[test]
fn parent_goal_prefers_goal_to_todo_over_raw_reverse_link() {
    let mut planner = planner_with(&["Pack boxes"], &["Move apartment", "Declutter"]);

    planner
        .create_link(EntityRef::todo(1), EntityRef::goal(1))
        .unwrap();
    assert_eq!(planner.parent_goal(1).unwrap().goal.title, "Move apartment");

    planner.link_todo_to_goal(1, 2).unwrap();
    assert_eq!(planner.parent_goal(1).unwrap().goal.title, "Declutter");
}

#[test]
fn deleting_goal_cascades_links_and_dependent_notes_only() {
    let mut planner = planner_with(&["Pack boxes"], &["Move apartment"]);
    planner.link_todo_to_goal(1, 1).unwrap();
    planner
        .add_dependent_note("budget", "keep under 2k", EntityRef::goal(1))
        .unwrap();
    planner
        .add_dependent_note("tape", "buy more", EntityRef::todo(1))
        .unwrap();

    assert!(planner.delete_goal(1).unwrap());

    assert!(planner.goal(1).is_none());
    assert!(planner.todo(1).is_some());
    assert!(planner.store().links().is_empty());
    let remaining = planner.dependent_notes(None);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].parent(), EntityRef::todo(1));
}
