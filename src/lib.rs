//! # fleetalloc - task allocation and route ordering for a pickup/drop-off fleet
//!
//! A stream of transport tasks (pickup and drop-off points) is shared out
//! among a fixed fleet of agents, and each agent's accepted tasks are
//! sequenced to keep travel short.
//!
//! ## Modules
//!
//! - [`fleet`] - Tasks, agents, bids, assignments, geometry and instance data
//! - [`routing`] - Exact, greedy and approximate route ordering
//! - [`auction`] - Random, centralized, PSI, SSI and SSI-with-regret allocation
//! - [`error`] - Error types and handling
//! - [`config`] - Configuration loading
//! - [`logger`] - Logging setup
//!
//! ## Quick Start
//!
//! ```rust
//! use fleetalloc::*;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut agents = vec![
//!     Agent::new(AgentId(0), Point::new(0.0, 0.0)).unwrap(),
//!     Agent::new(AgentId(1), Point::new(10.0, 10.0)).unwrap(),
//! ];
//! let mut pending = vec![
//!     Task::new(TaskId(0), Point::new(1.0, 1.0), Point::new(2.0, 1.0)).unwrap(),
//! ];
//!
//! let config = AllocConfig::new(Mechanism::Ssi).with_heuristic(Heuristic::CheapestInsertion);
//! let mut rng = StdRng::seed_from_u64(7);
//! let assignment = allocate(&mut pending, &mut agents, &config, &mut rng).unwrap();
//!
//! assert!(pending.is_empty());
//! assert_eq!(assignment.agent_of(TaskId(0)), Some(AgentId(0)));
//!
//! let route = compute_route(&agents[0].queue, agents[0].position, RouteStrategy::Exact).unwrap();
//! assert!((route.cost - agents[0].cost).abs() < 1e-9);
//! ```

pub mod auction;
pub mod config;
pub mod error;
pub mod fleet;
pub mod logger;
pub mod routing;

pub use auction::{AllocConfig, Heuristic, Mechanism, allocate, estimate_bid};
pub use error::{Error, Result};
pub use fleet::types::{Agent, AgentId, Assignment, Bid, Leg, Point, Task, TaskId};
pub use fleet::geometry::distance;
pub use routing::{
    Route, RouteStrategy, compute_route, compute_route_or_fallback, resequence, route_cost,
};
