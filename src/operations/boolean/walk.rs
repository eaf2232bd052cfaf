//! Branching cycle walk over a directed arrangement.
//!
//! At a vertex with several boundary continuations the walk forks into one
//! world per continuation. A world that comes back to its start emits a
//! closed cycle; one that reaches any other vertex twice is dropped.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::math::{Point2, PointKey};

/// Directed graph over coincident-merged points.
#[derive(Debug, Clone, Default)]
pub(crate) struct Arrangement {
    points: Vec<Point2>,
    index: HashMap<PointKey, usize>,
    out: Vec<Vec<usize>>,
}

impl Arrangement {
    /// Builds the arrangement holding every edge in both directions.
    pub(crate) fn from_edges(edges: impl IntoIterator<Item = (Point2, Point2)>) -> Self {
        let mut graph = Self::default();
        for (a, b) in edges {
            let u = graph.node(a);
            let v = graph.node(b);
            if u != v {
                graph.add_edge(u, v);
                graph.add_edge(v, u);
            }
        }
        graph
    }

    /// Returns the node at `point`, creating it on first sight.
    pub(crate) fn node(&mut self, point: Point2) -> usize {
        let key = PointKey::new(&point);
        if let Some(&i) = self.index.get(&key) {
            return i;
        }
        let i = self.points.len();
        self.points.push(point);
        self.out.push(Vec::new());
        self.index.insert(key, i);
        i
    }

    pub(crate) fn add_edge(&mut self, from: usize, to: usize) {
        let out = &mut self.out[from];
        if !out.contains(&to) {
            out.push(to);
        }
    }

    pub(crate) fn point(&self, node: usize) -> &Point2 {
        &self.points[node]
    }

    pub(crate) fn successors(&self, node: usize) -> &[usize] {
        &self.out[node]
    }

    pub(crate) fn node_count(&self) -> usize {
        self.points.len()
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.out.iter().map(Vec::len).sum()
    }

    /// Same nodes, keeping only the edges `keep` accepts.
    pub(crate) fn filtered(&self, mut keep: impl FnMut(&Point2, &Point2) -> bool) -> Self {
        let out = self
            .out
            .iter()
            .enumerate()
            .map(|(u, targets)| {
                targets
                    .iter()
                    .copied()
                    .filter(|&v| keep(&self.points[u], &self.points[v]))
                    .collect()
            })
            .collect();
        Self {
            points: self.points.clone(),
            index: self.index.clone(),
            out,
        }
    }
}

/// One world of the walk: where it started and where it has been.
#[derive(Debug, Clone)]
struct Walk {
    start: usize,
    path: Vec<usize>,
    on_path: HashSet<usize>,
}

impl Walk {
    fn new(start: usize) -> Self {
        Self {
            start,
            path: vec![start],
            on_path: HashSet::from([start]),
        }
    }

    fn push(&mut self, node: usize) {
        self.path.push(node);
        self.on_path.insert(node);
    }

    fn fork(&self, node: usize) -> Self {
        let mut world = self.clone();
        world.push(node);
        world
    }
}

/// Accepted cycles, and whether the walk stopped at its world budget.
#[derive(Debug, Default)]
pub(crate) struct WalkOutcome {
    pub cycles: Vec<Vec<usize>>,
    pub exhausted: bool,
}

/// Rotates a cycle to begin at its smallest node.
fn canonical(cycle: &[usize]) -> Vec<usize> {
    let pivot = cycle
        .iter()
        .enumerate()
        .min_by_key(|&(_, &node)| node)
        .map_or(0, |(i, _)| i);
    cycle[pivot..].iter().chain(&cycle[..pivot]).copied().collect()
}

/// Walks every world from every vertex not yet on an accepted cycle.
///
/// A closed world is offered to `accept`; accepted cycles are deduplicated
/// by rotation and mark their vertices visited. A world with one way on
/// extends in place. At a fork it follows the first continuation and spawns
/// a new world for each other one; at most `max_walks` worlds are spawned in
/// total.
pub(crate) fn walk_cycles(
    graph: &Arrangement,
    max_walks: usize,
    mut accept: impl FnMut(&[usize]) -> bool,
) -> WalkOutcome {
    let mut outcome = WalkOutcome::default();
    let mut visited = vec![false; graph.node_count()];
    let mut seen: HashSet<Vec<usize>> = HashSet::new();
    let mut spawned = 0usize;
    let mut ways = Vec::new();

    'starts: for start in 0..graph.node_count() {
        if visited[start] || graph.successors(start).is_empty() {
            continue;
        }

        let mut worlds = vec![Walk::new(start)];
        while let Some(mut walk) = worlds.pop() {
            while let Some(&current) = walk.path.last() {
                ways.clear();
                for &next in graph.successors(current) {
                    if next == walk.start {
                        if walk.path.len() >= 3 && accept(&walk.path) {
                            let cycle = canonical(&walk.path);
                            if seen.insert(cycle.clone()) {
                                for &node in &cycle {
                                    visited[node] = true;
                                }
                                trace!(start, len = cycle.len(), "cycle closed");
                                outcome.cycles.push(cycle);
                            }
                        }
                    } else if !walk.on_path.contains(&next) {
                        ways.push(next);
                    }
                }

                let Some((&first, rest)) = ways.split_first() else {
                    break;
                };
                spawned += rest.len();
                if spawned > max_walks {
                    outcome.exhausted = true;
                    break 'starts;
                }
                worlds.extend(rest.iter().map(|&next| walk.fork(next)));
                walk.push(first);
            }
        }
    }

    outcome
}
