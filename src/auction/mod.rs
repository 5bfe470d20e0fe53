//! Task allocation across a fleet
//!
//! Every mechanism consumes the whole pending batch, mutates the agents'
//! queues and costs in place, and reports which agent got which task. After
//! a call, each agent that received tasks satisfies
//! `agent.cost == route_cost(agent.position, &agent.queue)`.

pub mod bid;
pub mod centralized;
pub mod logging;
pub mod psi;
pub mod random;
pub mod regret;
pub mod ssi;

pub use bid::{Heuristic, estimate_bid};
pub use logging::*;

use crate::alloc_info;
use crate::error::{Error, Result};
use crate::fleet::types::{Agent, AgentId, Assignment, Task, TaskId};
use crate::routing::RouteStrategy;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mechanism {
    Random,
    CentralizedOptimal,
    CentralizedGreedy,
    #[default]
    Psi,
    Ssi,
    SsiRegret,
}

impl Mechanism {
    pub const ALL: [Mechanism; 6] = [
        Mechanism::Random,
        Mechanism::CentralizedOptimal,
        Mechanism::CentralizedGreedy,
        Mechanism::Psi,
        Mechanism::Ssi,
        Mechanism::SsiRegret,
    ];
}

impl std::fmt::Display for Mechanism {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Random => "random",
            Self::CentralizedOptimal => "centralized_optimal",
            Self::CentralizedGreedy => "centralized_greedy",
            Self::Psi => "psi",
            Self::Ssi => "ssi",
            Self::SsiRegret => "ssi_regret",
        };
        f.write_str(name)
    }
}

/// Configuration for one allocation call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocConfig {
    pub mechanism: Mechanism,
    /// Bid heuristic for the auction mechanisms. Fixed for the whole call so
    /// bids within a round stay comparable.
    pub heuristic: Heuristic,
    /// Ordering used by the centralized mechanisms. Defaults to exact search
    /// for `CentralizedOptimal` and nearest-neighbour for `CentralizedGreedy`.
    pub route_strategy: Option<RouteStrategy>,
}

impl AllocConfig {
    pub fn new(mechanism: Mechanism) -> Self {
        Self {
            mechanism,
            ..Self::default()
        }
    }

    pub fn with_mechanism(mut self, mechanism: Mechanism) -> Self {
        self.mechanism = mechanism;
        self
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_route_strategy(mut self, strategy: RouteStrategy) -> Self {
        self.route_strategy = Some(strategy);
        self
    }

    /// Ordering strategy the centralized mechanisms should use.
    pub fn centralized_strategy(&self) -> RouteStrategy {
        self.route_strategy.unwrap_or(match self.mechanism {
            Mechanism::CentralizedGreedy => RouteStrategy::Greedy,
            _ => RouteStrategy::Exact,
        })
    }
}

/// Allocate every pending task to the fleet.
///
/// `pending` is empty on success. `rng` drives the random mechanism and the
/// regret tie-break; pass a seeded generator for reproducible runs.
pub fn allocate<R: Rng + ?Sized>(
    pending: &mut Vec<Task>,
    agents: &mut [Agent],
    config: &AllocConfig,
    rng: &mut R,
) -> Result<Assignment> {
    if pending.is_empty() {
        return Ok(Assignment::default());
    }
    if agents.is_empty() {
        return Err(Error::EmptyFleet);
    }
    validate_roster(agents)?;
    validate_batch(pending)?;

    let batch_size = pending.len();
    let assignment = match config.mechanism {
        Mechanism::Random => random::allocate(pending, agents, rng)?,
        Mechanism::CentralizedOptimal | Mechanism::CentralizedGreedy => {
            centralized::allocate(pending, agents, config.centralized_strategy())?
        }
        Mechanism::Psi => psi::allocate(pending, agents, config.heuristic)?,
        Mechanism::Ssi => ssi::allocate(pending, agents, config.heuristic)?,
        Mechanism::SsiRegret => regret::allocate(pending, agents, config.heuristic, rng)?,
    };

    alloc_info!(
        "{} allocated {} of {} tasks across {} agents",
        config.mechanism,
        assignment.len(),
        batch_size,
        agents.len()
    );
    Ok(assignment)
}

fn validate_roster(agents: &[Agent]) -> Result<()> {
    let mut seen = HashSet::with_capacity(agents.len());
    for agent in agents {
        if !seen.insert(agent.id) {
            return Err(Error::ConfigurationError(format!(
                "agent id {} appears more than once in the fleet",
                agent.id
            )));
        }
    }
    Ok(())
}

/// Wins are committed by task id, so ids must be unique within a batch.
fn validate_batch(pending: &[Task]) -> Result<()> {
    let mut seen = HashSet::with_capacity(pending.len());
    for task in pending {
        if !seen.insert(task.id()) {
            return Err(Error::ValidationError(format!(
                "task id {} appears more than once in the pending batch",
                task.id()
            )));
        }
    }
    Ok(())
}

pub(crate) fn agent_mut(agents: &mut [Agent], id: AgentId) -> Result<&mut Agent> {
    agents
        .iter_mut()
        .find(|agent| agent.id == id)
        .ok_or(Error::UnknownAgent(id))
}

/// Remove a task from the pending batch by id.
pub(crate) fn take_task(pending: &mut Vec<Task>, id: TaskId) -> Option<Task> {
    let index = pending.iter().position(|task| task.id() == id)?;
    Some(pending.remove(index))
}

/// Commit one won task: retire it from `pending` and append it to the winner.
pub(crate) fn commit(
    pending: &mut Vec<Task>,
    agents: &mut [Agent],
    assignment: &mut Assignment,
    winner: AgentId,
    task_id: TaskId,
) -> Result<()> {
    let agent = agent_mut(agents, winner)?;
    let Some(task) = take_task(pending, task_id) else {
        return Err(Error::ValidationError(format!(
            "task {} is not pending",
            task_id
        )));
    };
    agent.assign(task);
    assignment.grant(winner, task_id);
    Ok(())
}
