//! ScoreAggregator: weighted sum of the four factor scores, a per-task
//! breakdown and reason, and the batch ranked by descending score.
//!
//! Entry points:
//! - `score_tasks`: raw records in, ranked `ScoredTask`s out
//! - `analyze`: same ranking plus the batch's cycle report

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, warn};

use crate::factors::{dependency_score, effort_score, importance_score, DueStatus};
use crate::graph::{CycleReport, DependencyGraph};
use crate::normalize::normalize_batch;
use crate::task::{RawTask, Task};
use crate::weights::{deserialize_weight_input, Strategy, WeightInput, Weights};

/// Individual factor scores (rounded to 2 decimals) and the weights applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub urgency_score: f64,
    pub importance_score: f64,
    pub effort_score: f64,
    pub dependency_score: f64,
    pub weights: Weights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTask {
    #[serde(flatten)]
    pub task: Task,
    /// 0-100, rounded to 2 decimals.
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    pub reason: String,
}

/// One scoring call as it crosses the boundary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoringRequest {
    #[serde(default)]
    pub tasks: Vec<RawTask>,
    #[serde(
        default,
        deserialize_with = "deserialize_weight_input",
        skip_serializing_if = "Option::is_none"
    )]
    pub weights: Option<WeightInput>,
    /// `None` means the caller did not choose; scoring then uses `Smart`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
}

impl ScoringRequest {
    pub fn new(tasks: Vec<RawTask>) -> Self {
        Self {
            tasks,
            ..Self::default()
        }
    }

    pub fn with_weights(mut self, weights: WeightInput) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }
}

/// Ranked batch plus its dependency-cycle report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub tasks: Vec<ScoredTask>,
    pub cycles: CycleReport,
}

/// Two-decimal rounding; exact halves go to the even neighbour.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}

/// Score and rank a batch. Equal scores keep their input order.
pub fn score_tasks(
    raw: Vec<RawTask>,
    weights: Option<&WeightInput>,
    strategy: Strategy,
    today: NaiveDate,
) -> Vec<ScoredTask> {
    let tasks = normalize_batch(raw);
    let graph = DependencyGraph::from_tasks(&tasks);
    let weights = Weights::resolve(weights, strategy);
    rank(tasks, &graph, &weights, today)
}

/// Score, rank and cycle-check a request in one pass over the batch.
pub fn analyze(request: ScoringRequest, today: NaiveDate) -> Analysis {
    let strategy = request.strategy.unwrap_or_default();
    let span = info_span!("analyze", tasks = request.tasks.len(), %strategy, %today);
    let _enter = span.enter();

    let tasks = normalize_batch(request.tasks);
    let graph = DependencyGraph::from_tasks(&tasks);
    let weights = Weights::resolve(request.weights.as_ref(), strategy);

    let cycles = graph.detect_cycle();
    if let Some(cycle) = cycles.cycles.first() {
        warn!(%cycle, "dependency cycle in batch");
    }

    Analysis {
        tasks: rank(tasks, &graph, &weights, today),
        cycles,
    }
}

fn rank(
    tasks: Vec<Task>,
    graph: &DependencyGraph,
    weights: &Weights,
    today: NaiveDate,
) -> Vec<ScoredTask> {
    let mut scored: Vec<ScoredTask> = tasks
        .into_iter()
        .map(|task| {
            let blocked = graph.blocked_count(&task.id);
            score_task(task, blocked, weights, today)
        })
        .collect();

    // `sort_by` is stable, so ties keep input order.
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    debug!(count = scored.len(), "batch ranked");
    scored
}

/// Score one normalized task given its blocked count.
pub fn score_task(task: Task, blocked: usize, weights: &Weights, today: NaiveDate) -> ScoredTask {
    let due = DueStatus::classify(task.due_date, today);

    let urgency = due.urgency();
    let importance = importance_score(task.importance);
    let effort = effort_score(task.estimated_hours);
    let dependency = dependency_score(blocked);

    let score = urgency * weights.urgency
        + importance * weights.importance
        + effort * weights.effort
        + dependency * weights.dependency;

    let reason = explain(due, task.importance, task.estimated_hours, blocked);

    ScoredTask {
        task,
        score: round2(score),
        breakdown: ScoreBreakdown {
            urgency_score: round2(urgency),
            importance_score: round2(importance),
            effort_score: round2(effort),
            dependency_score: round2(dependency),
            weights: *weights,
        },
        reason,
    }
}

/// Human-readable reason, clauses in fixed order joined by "; ".
pub fn explain(due: DueStatus, importance: u8, hours: f64, blocked: usize) -> String {
    let mut reasons = vec![due.describe()];

    if importance >= 8 {
        reasons.push("High importance".to_string());
    } else if importance <= 3 {
        reasons.push("Low importance".to_string());
    }

    if hours <= 1.0 {
        reasons.push("Quick win (low effort)".to_string());
    } else if hours > 8.0 {
        reasons.push("High effort".to_string());
    }

    if blocked > 0 {
        reasons.push(format!("Blocks {blocked} task(s)"));
    }

    if reasons.is_empty() {
        "Balanced factors".to_string()
    } else {
        reasons.join("; ")
    }
}
