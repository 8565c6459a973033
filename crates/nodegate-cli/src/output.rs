//! Output formatting utilities.

use nodegate_canonical::GlobalId;
use nodegate_graph::{KindInfo, ObjectType};
use serde::Serialize;

/// Formats any value as pretty JSON.
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

/// Formats a decoded global ID as aligned key/value lines.
pub fn format_global_id(id: &GlobalId) -> String {
    format!(
        "{:<12}{}\n{:<12}{}\n{:<12}{}",
        "tag:",
        id.tag(),
        "namespace:",
        id.namespace(),
        "components:",
        id.components().join(", ")
    )
}

/// Formats a registered kind as a table row.
pub fn format_kind_row(kind: &KindInfo, object: Option<&ObjectType>) -> String {
    let fields = object
        .map(|o| o.field_names().join(","))
        .unwrap_or_default();
    format!(
        "{:<14} {:<14} {}",
        kind.type_name,
        kind.tags.join(","),
        truncate(&fields, 60)
    )
}

/// Prints the kinds table header.
#[allow(clippy::print_literal)]
pub fn print_kinds_header() {
    println!("{:<14} {:<14} {}", "TYPE", "TAGS", "FIELDS");
    println!("{}", "-".repeat(80));
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}
