//! Sequential single-item auction
//!
//! Each round every agent names its cheapest remaining task, the overall
//! cheapest bid wins, and the win is committed before the next round so
//! later bids see it.

use super::bid::{Heuristic, best_bid};
use super::commit;
use crate::alloc_debug;
use crate::error::{Error, Result};
use crate::fleet::types::{Agent, Assignment, Bid, Task};

/// Winner of one round: the lowest of the agents' best bids.
pub fn round_winner(agents: &[Agent], pending: &[Task], heuristic: Heuristic) -> Option<Bid> {
    agents
        .iter()
        .filter_map(|agent| best_bid(agent, pending, heuristic))
        .reduce(|best, candidate| if candidate.beats(&best) { candidate } else { best })
}

pub fn allocate(
    pending: &mut Vec<Task>,
    agents: &mut [Agent],
    heuristic: Heuristic,
) -> Result<Assignment> {
    let mut assignment = Assignment::default();
    let mut round = 0;

    while !pending.is_empty() {
        round += 1;
        let winner = round_winner(agents, pending, heuristic).ok_or(Error::EmptyFleet)?;
        alloc_debug!(
            "round {}: T{} to A{} with bid {:.2}",
            round,
            winner.task,
            winner.agent,
            winner.cost
        );
        commit(pending, agents, &mut assignment, winner.agent, winner.task)?;
    }
    Ok(assignment)
}
