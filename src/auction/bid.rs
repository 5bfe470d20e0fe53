//! Marginal-cost estimates used as auction bids
//!
//! Estimates only read the agent; they never touch its queue or cost.

use crate::fleet::geometry::distance;
use crate::fleet::types::{Agent, Bid, Task};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    /// Distance from the closest point the agent already reaches to the pickup.
    NearestConnection,
    /// Cheapest of the evaluated insertion points in the current queue.
    #[default]
    CheapestInsertion,
}

impl std::fmt::Display for Heuristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NearestConnection => "nearest_connection",
            Self::CheapestInsertion => "cheapest_insertion",
        };
        f.write_str(name)
    }
}

/// Lower-bound style estimate: how close does the agent get to the pickup,
/// either from where it ends up or from any queued drop-off. Detour length
/// is ignored.
pub fn nearest_connection(agent: &Agent, task: &Task) -> f64 {
    let pickup = task.pickup();
    agent
        .queue
        .iter()
        .map(|queued| distance(queued.dropoff(), pickup))
        .fold(distance(agent.effective_position(), pickup), f64::min)
}

/// Cheapest of the insertion points the estimator evaluates.
///
/// With `pos0` the agent's effective position:
/// - next to queued task `q`: `d(pos0, q.pickup) + d(task.pickup, q.pickup) + d(task.dropoff, q.dropoff)`
/// - before the first task: `d(pos0, first.pickup) + d(task.dropoff, first.pickup)`
/// - after the last task: `d(last.dropoff, pos0) + d(last.dropoff, task.pickup)`
///
/// An empty queue costs the trip to the pickup plus the task itself.
pub fn cheapest_insertion(agent: &Agent, task: &Task) -> f64 {
    let (Some(first), Some(last)) = (agent.queue.first(), agent.queue.last()) else {
        return distance(agent.position, task.pickup()) + task.cost();
    };
    let pos0 = agent.effective_position();

    let between = agent.queue.iter().map(|queued| {
        distance(pos0, queued.pickup())
            + distance(task.pickup(), queued.pickup())
            + distance(task.dropoff(), queued.dropoff())
    });
    let before = distance(pos0, first.pickup()) + distance(task.dropoff(), first.pickup());
    let after = distance(last.dropoff(), pos0) + distance(last.dropoff(), task.pickup());

    between.fold(before.min(after), f64::min)
}

pub fn estimate_bid(agent: &Agent, task: &Task, heuristic: Heuristic) -> f64 {
    match heuristic {
        Heuristic::NearestConnection => nearest_connection(agent, task),
        Heuristic::CheapestInsertion => cheapest_insertion(agent, task),
    }
}

pub fn bid(agent: &Agent, task: &Task, heuristic: Heuristic) -> Bid {
    Bid {
        task: task.id(),
        agent: agent.id,
        cost: estimate_bid(agent, task, heuristic),
    }
}

/// The agent's cheapest bid over `tasks`; ties go to the lower task id.
pub fn best_bid(agent: &Agent, tasks: &[Task], heuristic: Heuristic) -> Option<Bid> {
    tasks
        .iter()
        .map(|task| bid(agent, task, heuristic))
        .reduce(|best, candidate| if candidate.beats(&best) { candidate } else { best })
}

/// The winning bid for `task` across the fleet; ties go to the lower agent id.
pub fn lowest_bid(agents: &[Agent], task: &Task, heuristic: Heuristic) -> Option<Bid> {
    agents
        .iter()
        .map(|agent| bid(agent, task, heuristic))
        .reduce(|best, candidate| if candidate.beats(&best) { candidate } else { best })
}
