use super::*;

#[test]
fn render_system_status_without_snapshot() {
    let out = render_system_status(1_700_000_000_000, None);
    assert_eq!(out, "<system-status timestamp=\"1700000000000\"></system-status>");
}

#[test]
fn render_system_status_with_snapshot() {
    let out = render_system_status(
        1_700_000_000_000,
        Some(ResourceSnapshot {
            cpu_percent: 0.823,
            memory_percent: 0.5,
        }),
    );
    assert!(out.contains("cpu=\"82.3\""));
    assert!(out.contains("memory=\"50.0\""));
}

#[test]
fn render_todo_context_empty_is_none() {
    assert_eq!(render_todo_context(&[]), None);
}

#[test]
fn render_todo_context_orders_by_ordering_field() {
    let todos = vec![
        Todo {
            id: 2,
            content: "second".to_string(),
            active_form: "doing second".to_string(),
            status: TodoStatus::Pending,
            ordering: 1,
        },
        Todo {
            id: 1,
            content: "first".to_string(),
            active_form: "doing first".to_string(),
            status: TodoStatus::Completed,
            ordering: 0,
        },
    ];
    let rendered = render_todo_context(&todos).unwrap();
    let first_idx = rendered.find("first").unwrap();
    let second_idx = rendered.find("second").unwrap();
    assert!(first_idx < second_idx);
    assert!(rendered.contains("[x] first"));
    assert!(rendered.contains("[ ] second"));
}
