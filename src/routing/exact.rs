//! Exhaustive route search

use super::Route;
use crate::fleet::geometry::distance;
use crate::fleet::types::{Point, Task};

/// Iterative Heap's algorithm over `0..n`. Visits the identity first and
/// every other permutation exactly once, in a fixed order.
pub(crate) struct HeapPermutations {
    perm: Vec<usize>,
    counters: Vec<usize>,
    index: usize,
    started: bool,
}

impl HeapPermutations {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            perm: (0..n).collect(),
            counters: vec![0; n],
            index: 1,
            started: false,
        }
    }

    /// Advance to the next permutation; `None` once all have been visited.
    pub(crate) fn next_perm(&mut self) -> Option<&[usize]> {
        if !self.started {
            self.started = true;
            return Some(&self.perm);
        }
        let n = self.perm.len();
        while self.index < n {
            let i = self.index;
            if self.counters[i] < i {
                if i % 2 == 0 {
                    self.perm.swap(0, i);
                } else {
                    self.perm.swap(self.counters[i], i);
                }
                self.counters[i] += 1;
                self.index = 1;
                return Some(&self.perm);
            }
            self.counters[i] = 0;
            self.index += 1;
        }
        None
    }
}

fn indexed_cost(start: Point, tasks: &[Task], perm: &[usize]) -> f64 {
    let mut current = start;
    let mut total = 0.0;
    for &i in perm {
        let task = &tasks[i];
        total += distance(current, task.pickup()) + task.cost();
        current = task.dropoff();
    }
    total
}

/// Cheapest order over all permutations of `tasks`. Ties keep the first
/// permutation found. O(n! * n), so callers keep batches small.
pub fn order(tasks: &[Task], start: Point) -> Route {
    if tasks.is_empty() {
        return Route::empty();
    }

    let mut permutations = HeapPermutations::new(tasks.len());
    let mut best: Option<(f64, Vec<usize>)> = None;

    while let Some(perm) = permutations.next_perm() {
        let cost = indexed_cost(start, tasks, perm);
        let improves = best
            .as_ref()
            .is_none_or(|(best_cost, _)| cost < *best_cost);
        if improves {
            best = Some((cost, perm.to_vec()));
        }
    }

    let order = best
        .map(|(_, perm)| perm.into_iter().map(|i| tasks[i].clone()).collect())
        .unwrap_or_default();
    Route::from_order(start, order)
}
