use crate::fleet::types::{Agent, Assignment};

#[macro_export]
macro_rules! alloc_info {
    ($($arg:tt)+) => {
        tracing::info!(target: "fleetalloc", $($arg)+)
    }
}

#[macro_export]
macro_rules! alloc_debug {
    ($($arg:tt)+) => {
        tracing::debug!(target: "fleetalloc", $($arg)+)
    }
}

/// Log every agent's queue and accumulated cost
pub fn log_fleet_status(agents: &[Agent]) {
    let mut fleet_cost = 0.0;
    for agent in agents {
        let queue_str = agent
            .queue
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        alloc_info!(
            "  {} at {} queue: [{}] cost: {:.2}",
            agent,
            agent.position,
            queue_str,
            agent.cost
        );
        fleet_cost += agent.cost;
    }
    alloc_info!("  Fleet cost: {:.2}", fleet_cost);
}

/// Log the task to agent table of one allocation call
pub fn log_assignment_table(assignment: &Assignment) {
    let mut rows: Vec<_> = assignment
        .iter()
        .flat_map(|(agent, tasks)| tasks.iter().map(move |task| (*task, *agent)))
        .collect();
    rows.sort_by_key(|(task, _)| *task);

    for (task, agent) in rows {
        alloc_info!("T{}: A{}", task, agent);
    }
}
