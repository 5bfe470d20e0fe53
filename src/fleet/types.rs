//! Task, agent and allocation records

use super::geometry::distance;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct TaskId(pub u32);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct AgentId(pub u32);

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pickup/drop-off transport request.
///
/// Two tasks may share coordinates, so equality, ordering and hashing only
/// look at the id. `cost` is the pickup to drop-off distance, fixed at
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord", into = "TaskRecord")]
pub struct Task {
    id: TaskId,
    pickup: Point,
    dropoff: Point,
    cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TaskRecord {
    id: TaskId,
    pickup: Point,
    dropoff: Point,
}

impl TryFrom<TaskRecord> for Task {
    type Error = Error;

    fn try_from(record: TaskRecord) -> Result<Self, Error> {
        Task::new(record.id, record.pickup, record.dropoff)
    }
}

impl From<Task> for TaskRecord {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            pickup: task.pickup,
            dropoff: task.dropoff,
        }
    }
}

impl Task {
    pub fn new(id: TaskId, pickup: Point, dropoff: Point) -> Result<Self, Error> {
        if !pickup.is_finite() || !dropoff.is_finite() {
            return Err(Error::ValidationError(format!(
                "task {} has non-finite coordinates",
                id
            )));
        }
        Ok(Self {
            id,
            pickup,
            dropoff,
            cost: distance(pickup, dropoff),
        })
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn pickup(&self) -> Point {
        self.pickup
    }

    pub fn dropoff(&self) -> Point {
        self.dropoff
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "T{}", self.id)
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Task {}

impl PartialOrd for Task {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Task {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl std::hash::Hash for Task {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A travel segment, kept for visualisation by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub from: Point,
    pub to: Point,
}

impl Leg {
    pub fn length(&self) -> f64 {
        distance(self.from, self.to)
    }
}

/// A fleet unit with an ordered queue of accepted tasks.
///
/// `cost` is bookkeeping owned by whoever mutates the queue: every
/// allocation and reordering call leaves it equal to [`Agent::queue_cost`].
/// The position is only moved by the caller as tasks execute.
///
/// Only id, position and queue are stored; cost and trajectory are rebuilt
/// from the queue when loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "AgentRecord", into = "AgentRecord")]
pub struct Agent {
    pub id: AgentId,
    pub position: Point,
    pub queue: Vec<Task>,
    pub cost: f64,
    pub trajectory: Vec<Leg>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AgentRecord {
    id: AgentId,
    position: Point,
    #[serde(default)]
    queue: Vec<Task>,
}

impl TryFrom<AgentRecord> for Agent {
    type Error = Error;

    fn try_from(record: AgentRecord) -> Result<Self, Error> {
        let mut agent = Agent::new(record.id, record.position)?;
        let cost = crate::routing::route_cost(agent.position, &record.queue);
        agent.replace_queue(record.queue, cost);
        Ok(agent)
    }
}

impl From<Agent> for AgentRecord {
    fn from(agent: Agent) -> Self {
        Self {
            id: agent.id,
            position: agent.position,
            queue: agent.queue,
        }
    }
}

impl Agent {
    pub fn new(id: AgentId, position: Point) -> Result<Self, Error> {
        if !position.is_finite() {
            return Err(Error::ValidationError(format!(
                "agent {} has a non-finite position",
                id
            )));
        }
        Ok(Self {
            id,
            position,
            queue: Vec::new(),
            cost: 0.0,
            trajectory: Vec::new(),
        })
    }

    /// Where the agent will be once its current queue is done.
    pub fn effective_position(&self) -> Point {
        self.queue
            .last()
            .map(Task::dropoff)
            .unwrap_or(self.position)
    }

    /// Cost of the queue walked from the current position.
    pub fn queue_cost(&self) -> f64 {
        crate::routing::route_cost(self.position, &self.queue)
    }

    /// Append a task and account for the two legs it adds.
    pub fn assign(&mut self, task: Task) {
        let approach = Leg {
            from: self.effective_position(),
            to: task.pickup(),
        };
        let service = Leg {
            from: task.pickup(),
            to: task.dropoff(),
        };
        self.cost += approach.length() + task.cost();
        self.trajectory.push(approach);
        self.trajectory.push(service);
        self.queue.push(task);
    }

    /// Install a re-ordered queue together with its cost.
    pub fn replace_queue(&mut self, order: Vec<Task>, cost: f64) {
        let mut trajectory = Vec::with_capacity(order.len() * 2);
        let mut current = self.position;
        for task in &order {
            trajectory.push(Leg {
                from: current,
                to: task.pickup(),
            });
            trajectory.push(Leg {
                from: task.pickup(),
                to: task.dropoff(),
            });
            current = task.dropoff();
        }
        self.queue = order;
        self.cost = cost;
        self.trajectory = trajectory;
    }

    pub fn task_ids(&self) -> Vec<TaskId> {
        self.queue.iter().map(Task::id).collect()
    }
}

impl std::fmt::Display for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "A{}", self.id)
    }
}

/// An agent's estimated marginal cost for one task. Only lives for the
/// duration of an auction round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bid {
    pub task: TaskId,
    pub agent: AgentId,
    pub cost: f64,
}

impl Bid {
    /// Lower cost wins; equal costs go to the lower agent id, then the lower task id.
    pub fn beats(&self, other: &Bid) -> bool {
        self.cost
            .total_cmp(&other.cost)
            .then(self.agent.cmp(&other.agent))
            .then(self.task.cmp(&other.task))
            .is_lt()
    }
}

/// Tasks newly granted to each agent by one allocation call, in commit order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment(BTreeMap<AgentId, Vec<TaskId>>);

impl Assignment {
    pub fn grant(&mut self, agent: AgentId, task: TaskId) {
        self.0.entry(agent).or_default().push(task);
    }

    pub fn granted(&self, agent: AgentId) -> &[TaskId] {
        self.0.get(&agent).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn agent_of(&self, task: TaskId) -> Option<AgentId> {
        self.0
            .iter()
            .find(|(_, tasks)| tasks.contains(&task))
            .map(|(agent, _)| *agent)
    }

    /// Number of granted tasks.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AgentId, &Vec<TaskId>)> {
        self.0.iter()
    }
}
