//! Parallel single-item auction
//!
//! One simultaneous round: every agent bids on every task against its state
//! from before the round, each task goes to its lowest bidder, and only then
//! are the wins applied. An agent can win several tasks without its later
//! bids seeing the earlier wins; that is the nature of a parallel auction.

use super::bid::{Heuristic, lowest_bid};
use super::commit;
use crate::alloc_debug;
use crate::error::{Error, Result};
use crate::fleet::types::{Agent, Assignment, Bid, Task};

pub fn allocate(
    pending: &mut Vec<Task>,
    agents: &mut [Agent],
    heuristic: Heuristic,
) -> Result<Assignment> {
    // Phase 1: collect winners against the pre-round state
    let mut winners: Vec<Bid> = Vec::with_capacity(pending.len());
    for task in pending.iter() {
        let winner = lowest_bid(agents, task, heuristic).ok_or(Error::EmptyFleet)?;
        alloc_debug!("{} won by A{} with bid {:.2}", task, winner.agent, winner.cost);
        winners.push(winner);
    }

    // Phase 2: apply
    let mut assignment = Assignment::default();
    for winner in winners {
        commit(pending, agents, &mut assignment, winner.agent, winner.task)?;
    }
    Ok(assignment)
}
