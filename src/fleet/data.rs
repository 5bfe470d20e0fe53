use super::types::{Agent, AgentId, Point, Task, TaskId};
use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Square grid the random instances are drawn from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridParams {
    pub size: u32,
    pub task_count: usize,
    pub agent_count: usize,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            size: 20,
            task_count: 6,
            agent_count: 3,
        }
    }
}

fn random_point<R: Rng + ?Sized>(size: u32, rng: &mut R) -> Point {
    let size = size.max(1);
    Point::new(
        rng.random_range(0..size) as f64,
        rng.random_range(0..size) as f64,
    )
}

/// Random tasks on integer grid points, ids starting at `first_id`.
pub fn generate_tasks<R: Rng + ?Sized>(
    params: &GridParams,
    first_id: u32,
    rng: &mut R,
) -> Vec<Task> {
    let mut tasks = Vec::with_capacity(params.task_count);
    for i in 0..params.task_count {
        let pickup = random_point(params.size, rng);
        let dropoff = random_point(params.size, rng);
        // grid points are always finite
        if let Ok(task) = Task::new(TaskId(first_id + i as u32), pickup, dropoff) {
            tasks.push(task);
        }
    }
    tasks
}

pub fn generate_agents<R: Rng + ?Sized>(params: &GridParams, rng: &mut R) -> Vec<Agent> {
    let mut agents = Vec::with_capacity(params.agent_count);
    for i in 0..params.agent_count {
        if let Ok(agent) = Agent::new(AgentId(i as u32), random_point(params.size, rng)) {
            agents.push(agent);
        }
    }
    agents
}

/// A fleet together with a batch of pending tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub agents: Vec<Agent>,
    pub tasks: Vec<Task>,
}

impl Instance {
    pub fn generate<R: Rng + ?Sized>(params: &GridParams, rng: &mut R) -> Self {
        let agents = generate_agents(params, rng);
        let tasks = generate_tasks(params, 0, rng);
        Self { agents, tasks }
    }
}

pub fn load_instance(path: &Path) -> Result<Instance> {
    let json = fs::read_to_string(path).context("Failed to read instance file")?;
    let instance: Instance =
        serde_json::from_str(&json).context("Failed to parse instance json")?;
    Ok(instance)
}

pub fn save_instance(instance: &Instance, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(instance).context("Failed to serialize instance")?;
    fs::write(path, json).context("Failed to write instance file")?;
    Ok(())
}
