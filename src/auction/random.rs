use crate::alloc_debug;
use crate::error::{Error, Result};
use crate::fleet::types::{Agent, Assignment, Task};
use rand::Rng;

/// Hand each task to a uniformly chosen agent, appended without reordering.
pub fn allocate<R: Rng + ?Sized>(
    pending: &mut Vec<Task>,
    agents: &mut [Agent],
    rng: &mut R,
) -> Result<Assignment> {
    if agents.is_empty() {
        return Err(Error::EmptyFleet);
    }

    let mut assignment = Assignment::default();
    for task in pending.drain(..) {
        let agent = &mut agents[rng.random_range(0..agents.len())];
        alloc_debug!("{} randomly assigned to {}", task, agent);
        assignment.grant(agent.id, task.id());
        agent.assign(task);
    }
    Ok(assignment)
}
