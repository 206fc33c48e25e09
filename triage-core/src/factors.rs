//! Factor scorers. Each maps one normalized input to a 0-100 score.
//!
//! All four are pure and total; the reference date for urgency is always
//! passed in, never read from the clock here.

use chrono::NaiveDate;

/// Urgency for a task without a due date.
pub const NO_DUE_DATE_URGENCY: f64 = 30.0;

/// Where a due date sits relative to the reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    NoDueDate,
    /// Days past the due date (> 0).
    Overdue(i64),
    DueToday,
    /// Days until the due date (> 0).
    DueIn(i64),
}

impl DueStatus {
    pub fn classify(due: Option<NaiveDate>, today: NaiveDate) -> Self {
        let Some(due) = due else {
            return DueStatus::NoDueDate;
        };
        let days_left = (due - today).num_days();
        match days_left {
            d if d < 0 => DueStatus::Overdue(-d),
            0 => DueStatus::DueToday,
            d => DueStatus::DueIn(d),
        }
    }

    /// Reason clause for this status.
    pub fn describe(&self) -> String {
        match self {
            DueStatus::NoDueDate => "No due date — moderate urgency".to_string(),
            DueStatus::Overdue(d) => format!("Overdue by {d} day(s)"),
            DueStatus::DueToday => "Due today".to_string(),
            DueStatus::DueIn(d) => format!("Due in {d} day(s)"),
        }
    }

    pub fn urgency(&self) -> f64 {
        match *self {
            DueStatus::NoDueDate => NO_DUE_DATE_URGENCY,
            // Overdue tasks start at 90 and gain a point per day, up to 100.
            DueStatus::Overdue(d) => (90.0 + d.min(10) as f64).min(100.0),
            DueStatus::DueToday | DueStatus::DueIn(1) => 90.0,
            DueStatus::DueIn(n) => (90.0 - 6.0 * n as f64).max(0.0),
        }
    }
}

pub fn urgency_score(due: Option<NaiveDate>, today: NaiveDate) -> f64 {
    DueStatus::classify(due, today).urgency()
}

/// Linear map of 1..=10 onto 0..=100.
pub fn importance_score(importance: u8) -> f64 {
    let importance = importance.clamp(1, 10);
    f64::from(importance - 1) / 9.0 * 100.0
}

/// Quick-win bias: less effort scores higher, never below 5.
pub fn effort_score(hours: f64) -> f64 {
    if hours <= 1.0 {
        90.0
    } else if hours <= 4.0 {
        70.0
    } else if hours <= 8.0 {
        50.0
    } else {
        (35.0 - 2.0 * (hours - 8.0)).max(5.0)
    }
}

/// 20 points per blocked task, capped at 100.
pub fn dependency_score(blocked_count: usize) -> f64 {
    (20.0 * blocked_count as f64).min(100.0)
}
