//! Allocation mechanism tests

use fleetalloc::fleet::data::{GridParams, Instance};
use fleetalloc::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

fn task(id: u32, pickup: (f64, f64), dropoff: (f64, f64)) -> Task {
    Task::new(TaskId(id), pickup.into(), dropoff.into()).unwrap()
}

fn agent(id: u32, x: f64, y: f64) -> Agent {
    Agent::new(AgentId(id), Point::new(x, y)).unwrap()
}

fn instance(seed: u64, agents: usize, tasks: usize) -> Instance {
    let params = GridParams {
        size: 20,
        task_count: tasks,
        agent_count: agents,
    };
    Instance::generate(&params, &mut StdRng::seed_from_u64(seed))
}

fn dominated_pair() -> (Vec<Agent>, Vec<Task>) {
    let agents = vec![agent(0, 0.0, 0.0), agent(1, 10.0, 0.0)];
    let tasks = vec![
        task(0, (2.0, 0.0), (2.0, 1.0)),
        task(1, (0.0, 3.0), (0.0, 4.0)),
    ];
    (agents, tasks)
}

#[test]
fn test_every_task_assigned_exactly_once() {
    for mechanism in Mechanism::ALL {
        for heuristic in [Heuristic::NearestConnection, Heuristic::CheapestInsertion] {
            let Instance {
                mut agents,
                tasks,
            } = instance(11, 3, 5);
            let mut pending = tasks.clone();
            let config = AllocConfig::new(mechanism).with_heuristic(heuristic);
            let mut rng = StdRng::seed_from_u64(3);

            let assignment = allocate(&mut pending, &mut agents, &config, &mut rng).unwrap();

            assert!(pending.is_empty(), "{}", mechanism);
            assert_eq!(assignment.len(), tasks.len(), "{}", mechanism);
            let queued: Vec<TaskId> = agents.iter().flat_map(Agent::task_ids).collect();
            let unique: HashSet<TaskId> = queued.iter().copied().collect();
            assert_eq!(queued.len(), tasks.len(), "{}", mechanism);
            assert_eq!(unique.len(), tasks.len(), "{}", mechanism);
            for t in &tasks {
                let owner = assignment.agent_of(t.id()).unwrap();
                let holder = agents.iter().find(|a| a.id == owner).unwrap();
                assert!(holder.task_ids().contains(&t.id()), "{}", mechanism);
            }
        }
    }
}

#[test]
fn test_cost_matches_queue_after_allocation() {
    for mechanism in Mechanism::ALL {
        let Instance {
            mut agents,
            mut tasks,
        } = instance(29, 3, 5);
        let config = AllocConfig::new(mechanism);
        let mut rng = StdRng::seed_from_u64(1);
        allocate(&mut tasks, &mut agents, &config, &mut rng).unwrap();

        for a in &agents {
            assert!(
                close(a.cost, a.queue_cost()),
                "{} {}: {} vs {}",
                mechanism,
                a,
                a.cost,
                a.queue_cost()
            );
        }
    }
}

#[test]
fn test_repeated_batches_keep_cost_consistent() {
    let Instance { mut agents, .. } = instance(5, 3, 0);
    let mut rng = StdRng::seed_from_u64(9);
    for (round, mechanism) in Mechanism::ALL.into_iter().enumerate() {
        let params = GridParams {
            size: 20,
            task_count: 2,
            agent_count: 0,
        };
        let mut batch = fleetalloc::fleet::data::generate_tasks(
            &params,
            (round * 2) as u32,
            &mut rng,
        );
        allocate(&mut batch, &mut agents, &AllocConfig::new(mechanism), &mut rng).unwrap();
    }
    let total: usize = agents.iter().map(|a| a.queue.len()).sum();
    assert_eq!(total, 12);
    for a in &agents {
        assert!(close(a.cost, a.queue_cost()));
    }
}

#[test]
fn test_empty_batch_is_noop() {
    let mut agents = vec![agent(0, 0.0, 0.0)];
    let mut pending = Vec::new();
    let mut rng = StdRng::seed_from_u64(0);
    let assignment =
        allocate(&mut pending, &mut agents, &AllocConfig::default(), &mut rng).unwrap();
    assert!(assignment.is_empty());
    assert!(agents[0].queue.is_empty());
}

#[test]
fn test_empty_fleet_is_an_error() {
    let mut agents: Vec<Agent> = Vec::new();
    let mut pending = vec![task(0, (1.0, 1.0), (2.0, 2.0))];
    let mut rng = StdRng::seed_from_u64(0);
    for mechanism in Mechanism::ALL {
        let err = allocate(&mut pending, &mut agents, &AllocConfig::new(mechanism), &mut rng)
            .unwrap_err();
        assert_eq!(err, Error::EmptyFleet);
        assert_eq!(pending.len(), 1);
    }
}

#[test]
fn test_duplicate_agent_ids_rejected() {
    let mut agents = vec![agent(0, 0.0, 0.0), agent(0, 5.0, 5.0)];
    let mut pending = vec![task(0, (1.0, 1.0), (2.0, 2.0))];
    let mut rng = StdRng::seed_from_u64(0);
    let err = allocate(&mut pending, &mut agents, &AllocConfig::default(), &mut rng).unwrap_err();
    assert!(matches!(err, Error::ConfigurationError(_)));
    assert_eq!(pending.len(), 1);
}

#[test]
fn test_random_mechanism_rejects_empty_fleet() {
    let mut agents: Vec<Agent> = Vec::new();
    let mut pending = vec![task(0, (1.0, 1.0), (2.0, 2.0))];
    let mut rng = StdRng::seed_from_u64(0);
    let err = fleetalloc::auction::random::allocate(&mut pending, &mut agents, &mut rng)
        .unwrap_err();
    assert_eq!(err, Error::EmptyFleet);
    assert_eq!(pending.len(), 1);
}

#[test]
fn test_duplicate_task_ids_rejected() {
    let mut agents = vec![agent(0, 0.0, 0.0), agent(1, 100.0, 0.0)];
    let mut pending = vec![
        task(7, (99.0, 0.0), (99.0, 0.0)),
        task(7, (1.0, 0.0), (1.0, 0.0)),
    ];
    let mut rng = StdRng::seed_from_u64(0);
    for mechanism in Mechanism::ALL {
        let err = allocate(&mut pending, &mut agents, &AllocConfig::new(mechanism), &mut rng)
            .unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)), "{}", mechanism);
        assert_eq!(pending.len(), 2);
        assert!(agents.iter().all(|a| a.queue.is_empty()));
    }
}

#[test]
fn test_closest_agent_wins_single_task() {
    for mechanism in [Mechanism::CentralizedOptimal, Mechanism::Psi] {
        let mut agents = vec![agent(0, 0.0, 0.0), agent(1, 10.0, 10.0)];
        let mut pending = vec![task(0, (1.0, 1.0), (2.0, 2.0))];
        let mut rng = StdRng::seed_from_u64(0);
        let assignment =
            allocate(&mut pending, &mut agents, &AllocConfig::new(mechanism), &mut rng).unwrap();
        assert_eq!(assignment.agent_of(TaskId(0)), Some(AgentId(0)), "{}", mechanism);
        assert_eq!(agents[0].task_ids(), vec![TaskId(0)]);
        assert!(agents[1].queue.is_empty());
    }
}

#[test]
fn test_psi_lets_one_agent_win_everything() {
    let (mut agents, mut pending) = dominated_pair();
    let config = AllocConfig::new(Mechanism::Psi).with_heuristic(Heuristic::NearestConnection);
    let mut rng = StdRng::seed_from_u64(0);
    let assignment = allocate(&mut pending, &mut agents, &config, &mut rng).unwrap();

    assert_eq!(assignment.granted(AgentId(0)), &[TaskId(0), TaskId(1)]);
    assert!(assignment.granted(AgentId(1)).is_empty());
    assert_eq!(agents[0].trajectory.len(), 4);
}

#[test]
fn test_ssi_commits_cheapest_bid_first() {
    let (mut agents, mut pending) = dominated_pair();
    let config = AllocConfig::new(Mechanism::Ssi).with_heuristic(Heuristic::NearestConnection);
    let mut rng = StdRng::seed_from_u64(0);
    let assignment = allocate(&mut pending, &mut agents, &config, &mut rng).unwrap();

    assert_eq!(assignment.granted(AgentId(0)), &[TaskId(0), TaskId(1)]);
    assert_eq!(assignment.len(), 2);
}

#[test]
fn test_regret_commits_most_contested_first() {
    let (mut agents, mut pending) = dominated_pair();
    let config =
        AllocConfig::new(Mechanism::SsiRegret).with_heuristic(Heuristic::NearestConnection);
    let mut rng = StdRng::seed_from_u64(0);
    let assignment = allocate(&mut pending, &mut agents, &config, &mut rng).unwrap();

    // T1 has regret ~7.44 against T0's 6, so it goes first
    assert_eq!(assignment.granted(AgentId(0)), &[TaskId(1), TaskId(0)]);
    assert_eq!(agents[0].task_ids(), vec![TaskId(1), TaskId(0)]);
    assert!(close(agents[0].cost, agents[0].queue_cost()));
}

#[test]
fn test_ssi_rounds_reflect_earlier_wins() {
    // agent 0 is closest to both pickups up front, but once it commits to T0
    // it ends up at (-3, 0) and agent 1 becomes the cheaper bidder for T1
    let build = || {
        (
            vec![agent(0, 0.0, 0.0), agent(1, 25.0, 0.0)],
            vec![
                task(0, (-1.0, 0.0), (-3.0, 0.0)),
                task(1, (12.0, 0.0), (12.0, 0.0)),
            ],
        )
    };
    let mut rng = StdRng::seed_from_u64(0);

    let (mut agents, mut pending) = build();
    let config = AllocConfig::new(Mechanism::Ssi).with_heuristic(Heuristic::NearestConnection);
    let sequential = allocate(&mut pending, &mut agents, &config, &mut rng).unwrap();
    assert_eq!(sequential.granted(AgentId(0)), &[TaskId(0)]);
    assert_eq!(sequential.granted(AgentId(1)), &[TaskId(1)]);

    let (mut agents, mut pending) = build();
    let config = config.with_mechanism(Mechanism::Psi);
    let parallel = allocate(&mut pending, &mut agents, &config, &mut rng).unwrap();
    assert_eq!(parallel.granted(AgentId(0)), &[TaskId(0), TaskId(1)]);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    for mechanism in [Mechanism::Random, Mechanism::SsiRegret] {
        let run = || {
            let Instance {
                mut agents,
                mut tasks,
            } = instance(77, 4, 8);
            let mut rng = StdRng::seed_from_u64(123);
            allocate(&mut tasks, &mut agents, &AllocConfig::new(mechanism), &mut rng).unwrap()
        };
        assert_eq!(run(), run(), "{}", mechanism);
    }
}

#[test]
fn test_regret_tie_break_uses_rng() {
    // two identical contests; either may go first, but the seed decides
    let build = || {
        (
            vec![agent(0, 0.0, 0.0), agent(1, 10.0, 0.0)],
            vec![
                task(0, (0.0, 1.0), (0.0, 1.0)),
                task(1, (0.0, -1.0), (0.0, -1.0)),
            ],
        )
    };
    let config =
        AllocConfig::new(Mechanism::SsiRegret).with_heuristic(Heuristic::NearestConnection);
    let mut orders = HashSet::new();
    for seed in 0..32 {
        let (mut agents, mut pending) = build();
        let mut rng = StdRng::seed_from_u64(seed);
        let assignment = allocate(&mut pending, &mut agents, &config, &mut rng).unwrap();
        assert_eq!(assignment.len(), 2);
        orders.insert(assignment.granted(AgentId(0)).first().copied());
    }
    assert_eq!(orders.len(), 2);
}

#[test]
fn test_centralized_greedy_and_approximate_fallback() {
    for config in [
        AllocConfig::new(Mechanism::CentralizedGreedy),
        AllocConfig::new(Mechanism::CentralizedOptimal)
            .with_route_strategy(RouteStrategy::Approximate),
    ] {
        let Instance {
            mut agents,
            mut tasks,
        } = instance(3, 2, 6);
        let mut rng = StdRng::seed_from_u64(0);
        let assignment = allocate(&mut tasks, &mut agents, &config, &mut rng).unwrap();
        assert_eq!(assignment.len(), 6);
        for a in &agents {
            assert!(close(a.cost, a.queue_cost()));
        }
    }
}

#[test]
fn test_centralized_strategy_defaults() {
    assert_eq!(
        AllocConfig::new(Mechanism::CentralizedOptimal).centralized_strategy(),
        RouteStrategy::Exact
    );
    assert_eq!(
        AllocConfig::new(Mechanism::CentralizedGreedy).centralized_strategy(),
        RouteStrategy::Greedy
    );
    assert_eq!(
        AllocConfig::new(Mechanism::CentralizedGreedy)
            .with_route_strategy(RouteStrategy::Exact)
            .centralized_strategy(),
        RouteStrategy::Exact
    );
}
