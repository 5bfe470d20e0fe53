//! Route ordering for a single agent
//!
//! Given an unordered batch of tasks and a starting point, pick the order
//! that keeps total travel low. Three strategies are available:
//!
//! - [`RouteStrategy::Exact`] enumerates every permutation. The caller bounds
//!   the batch size; anything past about 8 tasks gets slow fast.
//! - [`RouteStrategy::Greedy`] always heads for the nearest pickup.
//! - [`RouteStrategy::Approximate`] runs a spanning tree, odd-vertex matching
//!   and Euler-tour shortcut. Serving a task is bundled into the edge cost,
//!   which breaks the triangle inequality, so the usual 1.5x bound does not
//!   hold here.
//!
//! Every strategy reports a cost computed by [`route_cost`] on the order it
//! returns.

pub mod approx;
pub mod exact;
pub mod greedy;

use crate::error::Result;
use crate::fleet::geometry::distance;
use crate::fleet::types::{Agent, Point, Task};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStrategy {
    Exact,
    Greedy,
    Approximate,
}

impl std::fmt::Display for RouteStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Exact => "exact",
            Self::Greedy => "greedy",
            Self::Approximate => "approximate",
        };
        f.write_str(name)
    }
}

/// An ordered task sequence and its total travel cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub order: Vec<Task>,
    pub cost: f64,
}

impl Route {
    pub fn empty() -> Self {
        Self {
            order: Vec::new(),
            cost: 0.0,
        }
    }

    pub(crate) fn from_order(start: Point, order: Vec<Task>) -> Self {
        let cost = route_cost(start, &order);
        Self { order, cost }
    }
}

/// Cost of serving `tasks` in order from `start`: for each task, the trip to
/// its pickup plus the task's own pickup to drop-off distance.
pub fn route_cost(start: Point, tasks: &[Task]) -> f64 {
    let mut current = start;
    let mut total = 0.0;
    for task in tasks {
        total += distance(current, task.pickup()) + task.cost();
        current = task.dropoff();
    }
    total
}

pub fn compute_route(tasks: &[Task], start: Point, strategy: RouteStrategy) -> Result<Route> {
    match strategy {
        RouteStrategy::Exact => Ok(exact::order(tasks, start)),
        RouteStrategy::Greedy => Ok(greedy::order(tasks, start)),
        RouteStrategy::Approximate => approx::order(tasks, start),
    }
}

/// Like [`compute_route`], but an approximate-routing failure falls back to
/// the greedy ordering instead of surfacing.
pub fn compute_route_or_fallback(
    tasks: &[Task],
    start: Point,
    strategy: RouteStrategy,
) -> Result<Route> {
    match compute_route(tasks, start, strategy) {
        Err(e) if e.is_route_failure() => {
            warn!(
                target: "fleetalloc",
                "{} routing failed for {} tasks ({}), using greedy order",
                strategy,
                tasks.len(),
                e
            );
            Ok(greedy::order(tasks, start))
        }
        other => other,
    }
}

/// Re-order an agent's queue from its current position and update its cost.
pub fn resequence(agent: &mut Agent, strategy: RouteStrategy) -> Result<f64> {
    let route = compute_route_or_fallback(&agent.queue, agent.position, strategy)?;
    let cost = route.cost;
    agent.replace_queue(route.order, route.cost);
    Ok(cost)
}
