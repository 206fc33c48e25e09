//! FieldNormalizer: coerce raw task fields into well-formed values.
//!
//! Every function here is total. A malformed field degrades to a fixed
//! default and the fallback is logged at debug level; nothing is rejected.
//!
//! Rules:
//! - due_date: native date or `YYYY-MM-DD` text, otherwise no due date
//! - estimated_hours: any number-like value, negated if negative, otherwise 1.0
//! - importance: any integer-like value (floats truncate), otherwise 5; clamped to 1..=10
//! - id: positional `index + 1` when absent

use chrono::NaiveDate;
use tracing::debug;

use crate::task::{RawTask, RawValue, Task, TaskId};

pub const DEFAULT_HOURS: f64 = 1.0;
pub const DEFAULT_IMPORTANCE: u8 = 5;
pub const MIN_IMPORTANCE: u8 = 1;
pub const MAX_IMPORTANCE: u8 = 10;

/// Output keys added by the aggregator; extra input fields with these names are dropped.
const RESERVED_OUTPUT_KEYS: [&str; 3] = ["score", "breakdown", "reason"];

/// Normalize a whole batch, assigning positional ids where missing.
pub fn normalize_batch(raw: Vec<RawTask>) -> Vec<Task> {
    raw.into_iter()
        .enumerate()
        .map(|(index, task)| normalize_task(task, index))
        .collect()
}

/// Normalize one record. `index` is its 0-based position in the batch.
pub fn normalize_task(raw: RawTask, index: usize) -> Task {
    let id = raw.id.unwrap_or_else(|| fallback_id(index));
    let due_date = parse_due_date(raw.due_date.as_ref());
    let estimated_hours = coerce_hours(raw.estimated_hours.as_ref());
    let importance = coerce_importance(raw.importance.as_ref());

    let mut extra = raw.extra;
    extra.retain(|key, _| !RESERVED_OUTPUT_KEYS.contains(&key.as_str()));

    Task {
        id,
        title: raw.title,
        due_date,
        estimated_hours,
        importance,
        dependencies: raw.dependencies,
        extra,
    }
}

fn fallback_id(index: usize) -> TaskId {
    TaskId::Num(i64::try_from(index).map_or(i64::MAX, |i| i.saturating_add(1)))
}

/// Parse a due date. Unparseable or missing values mean "no due date".
pub fn parse_due_date(value: Option<&RawValue>) -> Option<NaiveDate> {
    match value? {
        RawValue::Date(d) => Some(*d),
        RawValue::Text(s) => {
            let parsed = parse_iso_date(s);
            if parsed.is_none() {
                debug!(value = %s, "unparseable due_date, treating as no due date");
            }
            parsed
        }
        other => {
            debug!(?other, "non-date due_date, treating as no due date");
            None
        }
    }
}

/// `YYYY-M-D`, each component an integer (surrounding whitespace allowed).
fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let mut parts = s.split('-');
    let year: i32 = parts.next()?.trim().parse().ok()?;
    let month: u32 = parts.next()?.trim().parse().ok()?;
    let day: u32 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Coerce estimated hours to a finite, non-negative number.
pub fn coerce_hours(value: Option<&RawValue>) -> f64 {
    let Some(value) = value else {
        return DEFAULT_HOURS;
    };

    let hours = match value {
        RawValue::Int(n) => Some(*n as f64),
        RawValue::Float(f) => Some(*f),
        RawValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        RawValue::Text(s) => s.trim().parse::<f64>().ok(),
        RawValue::Date(_) | RawValue::Other(_) => None,
    };

    match hours {
        Some(h) if h.is_finite() => h.abs(),
        _ => {
            debug!(?value, default = DEFAULT_HOURS, "invalid estimated_hours");
            DEFAULT_HOURS
        }
    }
}

/// Coerce importance to an integer in `MIN_IMPORTANCE..=MAX_IMPORTANCE`.
pub fn coerce_importance(value: Option<&RawValue>) -> u8 {
    let Some(value) = value else {
        return DEFAULT_IMPORTANCE;
    };

    let level = match value {
        RawValue::Int(n) => Some(*n),
        // `as` saturates, so huge floats still clamp to the top of the range.
        RawValue::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        RawValue::Bool(b) => Some(i64::from(*b)),
        RawValue::Text(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    let level = level.unwrap_or_else(|| {
        debug!(?value, default = DEFAULT_IMPORTANCE, "invalid importance");
        i64::from(DEFAULT_IMPORTANCE)
    });

    // Clamped into 1..=10 first, so the narrowing cast is lossless.
    level.clamp(i64::from(MIN_IMPORTANCE), i64::from(MAX_IMPORTANCE)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn due_date_accepts_native_and_iso_text() {
        let native = RawValue::Date(ymd(2026, 3, 1));
        assert_eq!(parse_due_date(Some(&native)), Some(ymd(2026, 3, 1)));
        assert_eq!(parse_due_date(Some(&"2026-03-01".into())), Some(ymd(2026, 3, 1)));
        assert_eq!(parse_due_date(Some(&"2026-3-1".into())), Some(ymd(2026, 3, 1)));
    }

    #[test]
    fn due_date_falls_back_to_none() {
        assert_eq!(parse_due_date(None), None);
        assert_eq!(parse_due_date(Some(&"tomorrow".into())), None);
        assert_eq!(parse_due_date(Some(&"2026-02-30".into())), None);
        assert_eq!(parse_due_date(Some(&"2026-02-10-1".into())), None);
        assert_eq!(parse_due_date(Some(&RawValue::Int(20260210))), None);
    }

    #[test]
    fn hours_are_coerced_and_made_non_negative() {
        assert_eq!(coerce_hours(None), 1.0);
        assert_eq!(coerce_hours(Some(&RawValue::Int(3))), 3.0);
        assert_eq!(coerce_hours(Some(&RawValue::Float(-2.5))), 2.5);
        assert_eq!(coerce_hours(Some(&" 4.5 ".into())), 4.5);
        assert_eq!(coerce_hours(Some(&RawValue::Bool(false))), 0.0);
    }

    #[test]
    fn bad_hours_default_to_one() {
        assert_eq!(coerce_hours(Some(&"a while".into())), 1.0);
        assert_eq!(coerce_hours(Some(&"NaN".into())), 1.0);
        assert_eq!(coerce_hours(Some(&RawValue::Float(f64::INFINITY))), 1.0);
        assert_eq!(coerce_hours(Some(&RawValue::Other(json!({"h": 2})))), 1.0);
    }

    #[test]
    fn importance_is_truncated_defaulted_and_clamped() {
        assert_eq!(coerce_importance(None), 5);
        assert_eq!(coerce_importance(Some(&RawValue::Float(7.9))), 7);
        assert_eq!(coerce_importance(Some(&"8".into())), 8);
        assert_eq!(coerce_importance(Some(&"7.5".into())), 5);
        assert_eq!(coerce_importance(Some(&RawValue::Int(42))), 10);
        assert_eq!(coerce_importance(Some(&RawValue::Int(-3))), 1);
        assert_eq!(coerce_importance(Some(&RawValue::Float(1e300))), 10);
        assert_eq!(coerce_importance(Some(&RawValue::Float(f64::NAN))), 5);
    }

    #[test]
    fn missing_ids_are_positional() {
        let tasks = normalize_batch(vec![
            RawTask::new("a"),
            RawTask::new("b").with_id(10),
            RawTask::new("c"),
        ]);
        let ids: Vec<TaskId> = tasks.into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TaskId::Num(1), TaskId::Num(10), TaskId::Num(3)]);
    }

    #[test]
    fn reserved_output_keys_are_dropped_from_extras() {
        let mut raw = RawTask::new("a");
        raw.extra.insert("score".into(), json!(99));
        raw.extra.insert("owner".into(), json!("kim"));

        let task = normalize_task(raw, 0);
        assert!(!task.extra.contains_key("score"));
        assert_eq!(task.extra.get("owner"), Some(&json!("kim")));
    }
}
