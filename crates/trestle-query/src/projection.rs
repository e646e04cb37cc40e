//! Field projection: wire-shaped objects carrying only requested fields.

use serde_json::{Map, Value};
use trestle_core::records::Task;

/// Project tasks down to `selected` fields plus an always-present `id`.
///
/// Field names are wire names (camelCase). A requested field the record
/// does not carry comes back as explicit `null`, so the output shape is
/// stable across records. An empty selection is a no-op: full objects.
pub fn project_fields(tasks: &[Task], selected: &[String]) -> Vec<Value> {
    if selected.is_empty() {
        return tasks
            .iter()
            .map(|task| serde_json::to_value(task).unwrap_or_default())
            .collect();
    }

    tasks
        .iter()
        .map(|task| {
            let full = serde_json::to_value(task).unwrap_or_default();
            let mut out = Map::new();
            if let Value::Object(fields) = full {
                if let Some(id) = fields.get("id") {
                    out.insert("id".to_owned(), id.clone());
                }
                for name in selected {
                    if name == "id" {
                        continue;
                    }
                    let value = fields.get(name).cloned().unwrap_or(Value::Null);
                    out.insert(name.clone(), value);
                }
            }
            Value::Object(out)
        })
        .collect()
}
