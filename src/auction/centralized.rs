//! Centralized allocation by full re-routing
//!
//! Each task, in arrival order, is tried on every agent: the agent's whole
//! queue plus the new task is re-ordered from the agent's position, and the
//! agent with the lowest resulting route cost takes the task and the new
//! order. With exact ordering this is O(tasks * agents * n!), so it is only
//! meant for small batches.

use super::agent_mut;
use crate::alloc_debug;
use crate::error::{Error, Result};
use crate::fleet::types::{Agent, AgentId, Assignment, Task};
use crate::routing::{Route, RouteStrategy, compute_route_or_fallback};

struct Candidate {
    agent: AgentId,
    route: Route,
}

fn best_candidate(agents: &[Agent], task: &Task, strategy: RouteStrategy) -> Result<Candidate> {
    let mut best: Option<Candidate> = None;
    for agent in agents {
        let mut tasks = agent.queue.clone();
        tasks.push(task.clone());
        let route = compute_route_or_fallback(&tasks, agent.position, strategy)?;
        alloc_debug!("  {} would route {} for {:.2}", agent, task, route.cost);

        let better = best.as_ref().is_none_or(|current| {
            route
                .cost
                .total_cmp(&current.route.cost)
                .then(agent.id.cmp(&current.agent))
                .is_lt()
        });
        if better {
            best = Some(Candidate {
                agent: agent.id,
                route,
            });
        }
    }
    best.ok_or(Error::EmptyFleet)
}

pub fn allocate(
    pending: &mut Vec<Task>,
    agents: &mut [Agent],
    strategy: RouteStrategy,
) -> Result<Assignment> {
    let mut assignment = Assignment::default();
    let batch = std::mem::take(pending);

    for (index, task) in batch.iter().enumerate() {
        let candidate = match best_candidate(agents, task, strategy) {
            Ok(candidate) => candidate,
            Err(e) => {
                // hand the unassigned remainder back to the caller
                pending.extend(batch[index..].iter().cloned());
                return Err(e);
            }
        };
        let agent = agent_mut(agents, candidate.agent)?;
        alloc_debug!(
            "{} assigned to {} ({} ordering, cost {:.2})",
            task,
            agent,
            strategy,
            candidate.route.cost
        );
        agent.replace_queue(candidate.route.order, candidate.route.cost);
        assignment.grant(candidate.agent, task.id());
    }
    Ok(assignment)
}
