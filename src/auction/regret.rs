//! Sequential single-item auction with regret
//!
//! Each round builds the full bid matrix and commits the task whose best
//! and second-best bids are furthest apart, since delaying it would cost the
//! most. Ties between equally contested tasks are broken with the caller's
//! RNG.

use super::bid::{Heuristic, bid};
use super::commit;
use crate::alloc_debug;
use crate::error::{Error, Result};
use crate::fleet::types::{Agent, Assignment, Bid, Task};
use rand::Rng;

/// Lowest bid for one task and the gap to the runner-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contest {
    pub winner: Bid,
    pub regret: f64,
}

/// Contest for `task` across the fleet. Regret is 0 with a single bidder.
pub fn contest(agents: &[Agent], task: &Task, heuristic: Heuristic) -> Option<Contest> {
    let mut bids: Vec<Bid> = agents
        .iter()
        .map(|agent| bid(agent, task, heuristic))
        .collect();
    bids.sort_by(|a, b| a.cost.total_cmp(&b.cost).then(a.agent.cmp(&b.agent)));

    let winner = *bids.first()?;
    let regret = bids
        .get(1)
        .map(|second| (second.cost - winner.cost).abs())
        .unwrap_or(0.0);
    Some(Contest { winner, regret })
}

/// Pick the most contested task of the round.
fn select<R: Rng + ?Sized>(contests: &[Contest], rng: &mut R) -> Option<Contest> {
    let max_regret = contests
        .iter()
        .map(|c| c.regret)
        .max_by(|a, b| a.total_cmp(b))?;
    let tied: Vec<&Contest> = contests
        .iter()
        .filter(|c| c.regret.total_cmp(&max_regret).is_eq())
        .collect();

    let chosen = if tied.len() > 1 {
        tied[rng.random_range(0..tied.len())]
    } else {
        tied[0]
    };
    Some(*chosen)
}

pub fn allocate<R: Rng + ?Sized>(
    pending: &mut Vec<Task>,
    agents: &mut [Agent],
    heuristic: Heuristic,
    rng: &mut R,
) -> Result<Assignment> {
    let mut assignment = Assignment::default();
    let mut round = 0;

    while !pending.is_empty() {
        round += 1;
        let contests: Vec<Contest> = pending
            .iter()
            .filter_map(|task| contest(agents, task, heuristic))
            .collect();
        let chosen = select(&contests, rng).ok_or(Error::EmptyFleet)?;
        alloc_debug!(
            "round {}: T{} to A{} with bid {:.2} (regret {:.2})",
            round,
            chosen.winner.task,
            chosen.winner.agent,
            chosen.winner.cost,
            chosen.regret
        );
        commit(
            pending,
            agents,
            &mut assignment,
            chosen.winner.agent,
            chosen.winner.task,
        )?;
    }
    Ok(assignment)
}
