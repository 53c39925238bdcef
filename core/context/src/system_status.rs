//! The "system status block" and "todo-context block" prepended to
//! user/system messages (spec §4.7).

use relay_protocol::ResourceSnapshot;
use relay_protocol::Todo;
use relay_protocol::TodoStatus;

/// Renders the compact `<system-status>` block: timestamp plus, if a
/// resource snapshot was captured with the message, CPU/memory percentages.
pub fn render_system_status(timestamp_ms: i64, snapshot: Option<ResourceSnapshot>) -> String {
    let mut out = format!("<system-status timestamp=\"{timestamp_ms}\"");
    if let Some(snapshot) = snapshot {
        out.push_str(&format!(
            " cpu=\"{:.1}\" memory=\"{:.1}\"",
            snapshot.cpu_percent * 100.0,
            snapshot.memory_percent * 100.0
        ));
    }
    out.push_str("></system-status>");
    out
}

/// Renders a compact rendering of the current todo list, one line per item,
/// ordered by [`Todo::ordering`]. Returns `None` for an empty list so callers
/// can skip emitting an empty block.
pub fn render_todo_context(todos: &[Todo]) -> Option<String> {
    if todos.is_empty() {
        return None;
    }
    let mut ordered: Vec<&Todo> = todos.iter().collect();
    ordered.sort_by_key(|t| t.ordering);

    let mut out = String::from("<todos>\n");
    for todo in ordered {
        let marker = match todo.status {
            TodoStatus::Pending => "[ ]",
            TodoStatus::InProgress => "[~]",
            TodoStatus::Completed => "[x]",
        };
        out.push_str(&format!("{marker} {}\n", todo.content));
    }
    out.push_str("</todos>");
    Some(out)
}

#[cfg(test)]
#[path = "system_status.test.rs"]
mod tests;
