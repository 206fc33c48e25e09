//! Task model for the scoring engine.
//!
//! `RawTask` is the loosely-typed record accepted at the boundary: every
//! scalar field may be missing or of the wrong type. `Task` is what the
//! normalizer turns it into, and the only shape the scorers ever see.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use crate::normalize::{DEFAULT_HOURS, DEFAULT_IMPORTANCE};

/// Task identifier: numeric ids as used by most task stores, or free-form names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Num(i64),
    Name(String),
}

impl TaskId {
    /// Id from an arbitrary JSON value. Integers (integral floats included)
    /// and strings are ids; anything else is not.
    pub fn from_value(value: &Value) -> Option<TaskId> {
        match value {
            Value::Number(n) => n.as_i64().map(TaskId::Num).or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                    .map(|f| TaskId::Num(f as i64))
            }),
            Value::String(s) => Some(TaskId::Name(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Num(n) => write!(f, "{n}"),
            TaskId::Name(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TaskId {
    fn from(n: i64) -> Self {
        TaskId::Num(n)
    }
}

impl From<i32> for TaskId {
    fn from(n: i32) -> Self {
        TaskId::Num(i64::from(n))
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId::Name(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId::Name(s)
    }
}

/// A scalar as it arrives from an external document.
///
/// Variant order matters for deserialization: strings that are valid ISO
/// dates land in `Date`, everything else falls through to `Text`, and
/// anything non-scalar ends up in `Other` instead of failing the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    Text(String),
    Other(serde_json::Value),
}

impl From<Value> for RawValue {
    /// Same classification the untagged derive applies to a JSON scalar.
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(b) => RawValue::Bool(b),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => RawValue::Int(i),
                (None, Some(f)) => RawValue::Float(f),
                (None, None) => RawValue::Other(Value::Number(n)),
            },
            Value::String(s) => match s.parse::<NaiveDate>() {
                Ok(d) => RawValue::Date(d),
                Err(_) => RawValue::Text(s),
            },
            other => RawValue::Other(other),
        }
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Int(n)
    }
}

impl From<i32> for RawValue {
    fn from(n: i32) -> Self {
        RawValue::Int(i64::from(n))
    }
}

impl From<f64> for RawValue {
    fn from(f: f64) -> Self {
        RawValue::Float(f)
    }
}

impl From<NaiveDate> for RawValue {
    fn from(d: NaiveDate) -> Self {
        RawValue::Date(d)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

// Field readers for `RawTask`. Each accepts any JSON value so that one
// badly typed field degrades to its default instead of failing the batch.

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<TaskId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let id = TaskId::from_value(&value);
    if id.is_none() && !value.is_null() {
        debug!(%value, "unusable task id, assigning positional id");
    }
    Ok(id)
}

fn lenient_title<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_dependencies<'de, D>(deserializer: D) -> Result<Vec<TaskId>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items.iter().filter_map(TaskId::from_value).collect()),
        Value::Null => Ok(Vec::new()),
        other => {
            debug!(%other, "dependencies is not a list, ignoring");
            Ok(Vec::new())
        }
    }
}

/// Boundary task record. Nothing here is validated yet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawTask {
    #[serde(
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<TaskId>,

    #[serde(default, deserialize_with = "lenient_title")]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<RawValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<RawValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<RawValue>,

    #[serde(default, deserialize_with = "lenient_dependencies")]
    pub dependencies: Vec<TaskId>,

    /// Fields the engine does not interpret; echoed back on output.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RawTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<TaskId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_due_date(mut self, due: impl Into<RawValue>) -> Self {
        self.due_date = Some(due.into());
        self
    }

    pub fn with_hours(mut self, hours: impl Into<RawValue>) -> Self {
        self.estimated_hours = Some(hours.into());
        self
    }

    pub fn with_importance(mut self, importance: impl Into<RawValue>) -> Self {
        self.importance = Some(importance.into());
        self
    }

    pub fn with_dependencies<I, T>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TaskId>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }
}

/// Normalized task.
///
/// Invariants: `importance` is in 1..=10, `estimated_hours` is finite and >= 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,

    /// Calendar due date, if any.
    pub due_date: Option<NaiveDate>,

    /// Hours.
    pub estimated_hours: f64,

    /// 1-10, higher means more important.
    pub importance: u8,

    /// Ids this task waits on.
    pub dependencies: Vec<TaskId>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            due_date: None,
            estimated_hours: DEFAULT_HOURS,
            importance: DEFAULT_IMPORTANCE,
            dependencies: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = hours;
        self
    }

    pub fn with_importance(mut self, importance: u8) -> Self {
        self.importance = importance;
        self
    }

    pub fn with_dependencies<I, T>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TaskId>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_task_accepts_loose_scalars() {
        let raw: RawTask = serde_json::from_value(json!({
            "id": 3,
            "title": "Write report",
            "due_date": "2026-02-20",
            "estimated_hours": "2.5",
            "importance": 7.9,
            "dependencies": [1, "setup"],
            "owner": "sam"
        }))
        .unwrap();

        assert_eq!(raw.id, Some(TaskId::Num(3)));
        assert_eq!(
            raw.due_date,
            Some(RawValue::Date(NaiveDate::from_ymd_opt(2026, 2, 20).unwrap()))
        );
        assert_eq!(raw.estimated_hours, Some(RawValue::Text("2.5".into())));
        assert_eq!(raw.importance, Some(RawValue::Float(7.9)));
        assert_eq!(raw.dependencies, vec![TaskId::Num(1), TaskId::from("setup")]);
        assert_eq!(raw.extra.get("owner"), Some(&json!("sam")));
    }

    #[test]
    fn raw_task_tolerates_nulls_and_odd_shapes() {
        let raw: RawTask = serde_json::from_value(json!({
            "title": null,
            "due_date": null,
            "estimated_hours": [1, 2],
            "dependencies": null
        }))
        .unwrap();

        assert_eq!(raw.id, None);
        assert_eq!(raw.title, "");
        assert_eq!(raw.due_date, None);
        assert!(matches!(raw.estimated_hours, Some(RawValue::Other(_))));
        assert!(raw.dependencies.is_empty());
    }

    #[test]
    fn unparseable_date_string_stays_text() {
        let raw: RawTask = serde_json::from_value(json!({"due_date": "next week"})).unwrap();
        assert_eq!(raw.due_date, Some(RawValue::Text("next week".into())));
    }

    #[test]
    fn raw_task_tolerates_wrongly_typed_fields() {
        let raw: RawTask = serde_json::from_value(json!({
            "id": 1.5,
            "title": 42,
            "dependencies": "2"
        }))
        .unwrap();

        assert_eq!(raw.id, None);
        assert_eq!(raw.title, "42");
        assert!(raw.dependencies.is_empty());
    }

    #[test]
    fn dependency_entries_that_are_not_ids_are_skipped() {
        let raw: RawTask = serde_json::from_value(json!({
            "id": 4.0,
            "title": {"nested": true},
            "dependencies": [1, null, "setup", 2.5, [3], 3.0]
        }))
        .unwrap();

        assert_eq!(raw.id, Some(TaskId::Num(4)));
        assert_eq!(raw.title, "");
        assert_eq!(
            raw.dependencies,
            vec![TaskId::Num(1), TaskId::from("setup"), TaskId::Num(3)]
        );
    }

    #[test]
    fn raw_value_from_json_matches_untagged_shapes() {
        assert_eq!(RawValue::from(json!(3)), RawValue::Int(3));
        assert_eq!(RawValue::from(json!(2.5)), RawValue::Float(2.5));
        assert_eq!(RawValue::from(json!(true)), RawValue::Bool(true));
        assert_eq!(
            RawValue::from(json!("2026-02-20")),
            RawValue::Date(NaiveDate::from_ymd_opt(2026, 2, 20).unwrap())
        );
        assert_eq!(RawValue::from(json!("soon")), RawValue::Text("soon".into()));
        assert_eq!(RawValue::from(json!([1])), RawValue::Other(json!([1])));
    }

    #[test]
    fn task_id_displays_bare_value() {
        assert_eq!(TaskId::Num(42).to_string(), "42");
        assert_eq!(TaskId::from("deploy").to_string(), "deploy");
    }
}
