//! DependencyGraphAnalyzer: directed task to dependency graph for one batch.
//!
//! Edges point from a task to the tasks it waits on. Two queries:
//! - `blocked_count(id)`: how many other tasks list `id` as a dependency
//! - `detect_cycle()`: first dependency loop found by a depth-first walk
//!
//! Dependencies on ids that are not in the batch are kept as edges but
//! are inert: they have no outgoing edges and count towards nothing.
//!
//! Cycle detection stops at the first cycle in the whole walk. Graphs with
//! several disjoint loops report only one of them.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;

use crate::task::{Task, TaskId};

/// A dependency loop: ids in walk order, with the first id repeated at the end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cycle(pub Vec<TaskId>);

impl Cycle {
    pub fn nodes(&self) -> &[TaskId] {
        &self.0
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.0.contains(id)
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    pub has_cycle: bool,
    pub cycles: Vec<Cycle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    // Ids in first-appearance order; the walk starts from these in order.
    order: Vec<TaskId>,
    edges: HashMap<TaskId, Vec<TaskId>>,
    blocked: HashMap<TaskId, usize>,
}

impl DependencyGraph {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        Self::from_edges(tasks.iter().map(|t| (t.id.clone(), t.dependencies.clone())))
    }

    /// Build from `(task id, dependency ids)` pairs, one pair per task record.
    ///
    /// Records sharing an id are merged: their dependency lists are
    /// concatenated and they share one blocked count.
    pub fn from_edges<I, T, D>(records: I) -> Self
    where
        I: IntoIterator<Item = (T, D)>,
        T: Into<TaskId>,
        D: IntoIterator,
        D::Item: Into<TaskId>,
    {
        let records: Vec<(TaskId, Vec<TaskId>)> = records
            .into_iter()
            .map(|(id, deps)| (id.into(), deps.into_iter().map(Into::into).collect()))
            .collect();

        let mut graph = Self::default();
        for (id, _) in &records {
            if !graph.blocked.contains_key(id) {
                graph.order.push(id.clone());
                graph.blocked.insert(id.clone(), 0);
            }
        }

        for (id, deps) in records {
            // Each dependent record counts once per dependency, never for itself.
            {
                let mut seen: HashSet<&TaskId> = HashSet::new();
                for dep in &deps {
                    if dep == &id || !seen.insert(dep) {
                        continue;
                    }
                    if let Some(count) = graph.blocked.get_mut(dep) {
                        *count += 1;
                    }
                }
            }
            graph.edges.entry(id).or_default().extend(deps);
        }

        graph
    }

    /// Number of distinct tasks in the batch.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Dependencies of `id`, in the order they were listed.
    pub fn dependencies_of(&self, id: &TaskId) -> &[TaskId] {
        self.edges.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// How many other tasks in the batch wait on `id`. Unknown ids block nothing.
    pub fn blocked_count(&self, id: &TaskId) -> usize {
        self.blocked.get(id).copied().unwrap_or(0)
    }

    /// Depth-first search for a dependency loop.
    ///
    /// Nodes are visited in batch order and neighbors in list order, so the
    /// result is deterministic. The walk uses an explicit stack; long
    /// dependency chains do not grow the call stack.
    pub fn detect_cycle(&self) -> CycleReport {
        let mut marks: HashMap<&TaskId, Mark> = HashMap::new();
        // (node, index of the next dependency to explore); doubles as the current path.
        let mut path: Vec<(&TaskId, usize)> = Vec::new();

        for start in &self.order {
            if marks.contains_key(start) {
                continue;
            }
            marks.insert(start, Mark::InProgress);
            path.push((start, 0));

            while let Some(frame) = path.last_mut() {
                let node = frame.0;
                let Some(next) = self.dependencies_of(node).get(frame.1) else {
                    marks.insert(node, Mark::Done);
                    path.pop();
                    continue;
                };
                frame.1 += 1;

                match marks.get(next).copied() {
                    None => {
                        marks.insert(next, Mark::InProgress);
                        path.push((next, 0));
                    }
                    Some(Mark::InProgress) => {
                        let from = path.iter().position(|(n, _)| *n == next).unwrap_or(0);
                        let mut nodes: Vec<TaskId> =
                            path[from..].iter().map(|(n, _)| (*n).clone()).collect();
                        nodes.push(next.clone());

                        let cycle = Cycle(nodes);
                        debug!(%cycle, "dependency cycle found");
                        return CycleReport {
                            has_cycle: true,
                            cycles: vec![cycle],
                        };
                    }
                    Some(Mark::Done) => {}
                }
            }
        }

        CycleReport::default()
    }
}

/// Convenience: cycle check for a normalized batch.
pub fn detect_cycle(tasks: &[Task]) -> CycleReport {
    DependencyGraph::from_tasks(tasks).detect_cycle()
}
