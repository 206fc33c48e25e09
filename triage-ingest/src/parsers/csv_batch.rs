//! CSV batch documents: one task per row, header row required.
//!
//! Known columns (any order, case-insensitive):
//!   id,title,due_date,estimated_hours,importance,dependencies
//!
//! `dependencies` lists ids separated by `;` or whitespace. Empty cells are
//! treated as absent. Unknown columns are kept as extra string fields.

use serde_json::Value;
use tracing::debug;
use triage_core::{RawTask, RawValue, TaskId};

use crate::error::IngestError;

const KNOWN_COLUMNS: [&str; 6] = [
    "id",
    "title",
    "due_date",
    "estimated_hours",
    "importance",
    "dependencies",
];

pub fn parse_csv_batch(text: &str) -> Result<Vec<RawTask>, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    // (original header, lowercase key)
    let headers: Vec<(String, String)> = rdr
        .headers()?
        .iter()
        .map(|h| (h.to_string(), h.to_lowercase()))
        .collect();

    if !headers
        .iter()
        .any(|(_, key)| KNOWN_COLUMNS.contains(&key.as_str()))
    {
        return Err(IngestError::MissingHeader);
    }

    let mut tasks = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        let mut task = RawTask::default();
        for ((header, key), cell) in headers.iter().zip(record.iter()) {
            if cell.is_empty() {
                continue;
            }
            match key.as_str() {
                "id" => task.id = Some(parse_id(cell)),
                "title" => task.title = cell.to_string(),
                "due_date" => task.due_date = Some(RawValue::Text(cell.to_string())),
                "estimated_hours" => task.estimated_hours = Some(parse_scalar(cell)),
                "importance" => task.importance = Some(parse_scalar(cell)),
                "dependencies" => task.dependencies = parse_dependencies(cell),
                _ => {
                    task.extra
                        .insert(header.clone(), Value::String(cell.to_string()));
                }
            }
        }
        tasks.push(task);
    }

    debug!(tasks = tasks.len(), "parsed CSV batch");
    Ok(tasks)
}

fn parse_id(cell: &str) -> TaskId {
    cell.parse::<i64>()
        .map(TaskId::Num)
        .unwrap_or_else(|_| TaskId::Name(cell.to_string()))
}

fn parse_scalar(cell: &str) -> RawValue {
    if let Ok(n) = cell.parse::<i64>() {
        RawValue::Int(n)
    } else if let Ok(f) = cell.parse::<f64>() {
        RawValue::Float(f)
    } else {
        RawValue::Text(cell.to_string())
    }
}

fn parse_dependencies(cell: &str) -> Vec<TaskId> {
    cell.split(|c: char| c == ';' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(parse_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_known_columns_in_any_order() {
        let text = "\
Title,ID,Importance,Estimated_Hours,Due_Date,Dependencies
Write draft,1,8,2.5,2026-03-01,
Review, 2 ,x,3,,1; 3
";
        let tasks = parse_csv_batch(text).unwrap();
        assert_eq!(tasks.len(), 2);

        assert_eq!(tasks[0].title, "Write draft");
        assert_eq!(tasks[0].id, Some(TaskId::Num(1)));
        assert_eq!(tasks[0].importance, Some(RawValue::Int(8)));
        assert_eq!(tasks[0].estimated_hours, Some(RawValue::Float(2.5)));
        assert_eq!(tasks[0].due_date, Some(RawValue::Text("2026-03-01".into())));
        assert!(tasks[0].dependencies.is_empty());

        assert_eq!(tasks[1].id, Some(TaskId::Num(2)));
        assert_eq!(tasks[1].importance, Some(RawValue::Text("x".into())));
        assert_eq!(tasks[1].due_date, None);
        assert_eq!(tasks[1].dependencies, vec![TaskId::Num(1), TaskId::Num(3)]);
    }

    #[test]
    fn unknown_columns_become_extras() {
        let text = "title,owner\nShip,lee\n";
        let tasks = parse_csv_batch(text).unwrap();
        assert_eq!(tasks[0].extra.get("owner"), Some(&Value::String("lee".into())));
        assert_eq!(tasks[0].id, None);
    }

    #[test]
    fn named_ids_and_space_separated_dependencies() {
        let text = "id,title,dependencies\ndeploy,Deploy,build test\n";
        let tasks = parse_csv_batch(text).unwrap();
        assert_eq!(tasks[0].id, Some(TaskId::from("deploy")));
        assert_eq!(
            tasks[0].dependencies,
            vec![TaskId::from("build"), TaskId::from("test")]
        );
    }

    #[test]
    fn short_rows_are_tolerated() {
        let text = "id,title,importance\n1,only id and title\n";
        let tasks = parse_csv_batch(text).unwrap();
        assert_eq!(tasks[0].importance, None);
    }

    #[test]
    fn header_without_known_columns_is_rejected() {
        assert!(matches!(
            parse_csv_batch("1,foo,2\n2,bar,3\n"),
            Err(IngestError::MissingHeader)
        ));
        assert!(matches!(parse_csv_batch(""), Err(IngestError::MissingHeader)));
    }
}
