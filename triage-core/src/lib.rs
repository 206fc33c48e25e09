//! triage-core: task prioritization engine.
//!
//! Scores a batch of tasks on urgency, importance, effort and dependency
//! impact, ranks them, and flags dependency cycles. Stateless: every call
//! builds its own graph and discards it.

pub mod factors;
pub mod graph;
pub mod normalize;
pub mod scoring;
pub mod task;
pub mod time;
pub mod weights;

pub use factors::{dependency_score, effort_score, importance_score, urgency_score, DueStatus};
pub use graph::{detect_cycle, Cycle, CycleReport, DependencyGraph};
pub use normalize::{normalize_batch, normalize_task};
pub use scoring::{analyze, score_tasks, Analysis, ScoreBreakdown, ScoredTask, ScoringRequest};
pub use task::{RawTask, RawValue, Task, TaskId};
pub use weights::{Strategy, WeightInput, Weights, WEIGHT_KEYS};
