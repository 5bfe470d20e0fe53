//! Bid estimator tests

use fleetalloc::auction::bid::{
    best_bid, cheapest_insertion, lowest_bid, nearest_connection,
};
use fleetalloc::*;

fn task(id: u32, pickup: (f64, f64), dropoff: (f64, f64)) -> Task {
    Task::new(TaskId(id), pickup.into(), dropoff.into()).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

fn agent(id: u32, x: f64, y: f64) -> Agent {
    Agent::new(AgentId(id), Point::new(x, y)).unwrap()
}

#[test]
fn test_empty_queue_bids() {
    let a = agent(0, 0.0, 0.0);
    let t = task(0, (3.0, 4.0), (3.0, 6.0));

    assert!(close(nearest_connection(&a, &t), 5.0));
    assert!(close(cheapest_insertion(&a, &t), 7.0));
    assert!(close(estimate_bid(&a, &t, Heuristic::NearestConnection), 5.0));
    assert!(close(estimate_bid(&a, &t, Heuristic::CheapestInsertion), 7.0));
}

#[test]
fn test_nearest_connection_uses_queued_dropoffs() {
    let mut a = agent(0, 0.0, 0.0);
    a.assign(task(0, (0.0, 1.0), (9.0, 9.0)));
    a.assign(task(1, (9.0, 8.0), (0.0, 20.0)));

    // effective position (0,20) is far, the first drop-off (9,9) is 1 away
    let t = task(2, (9.0, 10.0), (9.0, 11.0));
    assert!(close(nearest_connection(&a, &t), 1.0));
}

#[test]
fn test_cheapest_insertion_with_queue() {
    let mut a = agent(0, 0.0, 0.0);
    a.assign(task(0, (0.0, 2.0), (0.0, 4.0)));
    let t = task(1, (3.0, 4.0), (3.0, 0.0));

    // between: 2 + sqrt(13) + 5, before: 2 + sqrt(13), after: 0 + 3
    assert!(close(cheapest_insertion(&a, &t), 3.0));
}

#[test]
fn test_estimates_do_not_mutate() {
    let mut a = agent(0, 1.0, 1.0);
    a.assign(task(0, (2.0, 2.0), (5.0, 5.0)));
    let queue_before = a.task_ids();
    let cost_before = a.cost;
    let t = task(1, (6.0, 6.0), (7.0, 7.0));

    for heuristic in [Heuristic::NearestConnection, Heuristic::CheapestInsertion] {
        let _ = estimate_bid(&a, &t, heuristic);
    }
    assert_eq!(a.task_ids(), queue_before);
    assert_eq!(a.cost, cost_before);
}

#[test]
fn test_bid_tie_breaks() {
    let agents = vec![agent(2, 0.0, 0.0), agent(1, 2.0, 0.0)];
    let t = task(0, (1.0, 0.0), (1.0, 1.0));
    let winner = lowest_bid(&agents, &t, Heuristic::NearestConnection).unwrap();
    assert_eq!(winner.agent, AgentId(1));

    let a = agent(0, 0.0, 0.0);
    let tasks = vec![task(5, (0.0, 1.0), (0.0, 2.0)), task(4, (1.0, 0.0), (2.0, 0.0))];
    let best = best_bid(&a, &tasks, Heuristic::NearestConnection).unwrap();
    assert_eq!(best.task, TaskId(4));
    assert!(close(best.cost, 1.0));
}
