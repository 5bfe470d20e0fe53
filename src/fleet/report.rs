use super::types::Agent;
use crate::auction::{Heuristic, Mechanism};
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Serialize)]
pub struct AgentSummary {
    pub agent_id: u32,
    pub tasks: Vec<u32>,
    pub cost: f64,
}

#[derive(Debug, Serialize)]
pub struct MechanismRun {
    pub mechanism: Mechanism,
    pub heuristic: Heuristic,
    pub total_cost: f64,
    pub per_agent: Vec<AgentSummary>,
    pub elapsed_ms: f64,
}

#[derive(Debug, Serialize)]
pub struct ComparisonReport {
    pub runs: Vec<MechanismRun>,
    pub agent_count: usize,
    pub task_count: usize,
}

/// Summarise the fleet after one mechanism has run.
pub fn build_run(
    mechanism: Mechanism,
    heuristic: Heuristic,
    agents: &[Agent],
    started: Instant,
) -> MechanismRun {
    let per_agent: Vec<AgentSummary> = agents
        .iter()
        .map(|agent| AgentSummary {
            agent_id: agent.id.0,
            tasks: agent.queue.iter().map(|t| t.id().0).collect(),
            cost: agent.cost,
        })
        .collect();
    let total_cost = per_agent.iter().map(|a| a.cost).sum();

    MechanismRun {
        mechanism,
        heuristic,
        total_cost,
        per_agent,
        elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
    }
}

impl ComparisonReport {
    /// Run with the lowest fleet cost.
    pub fn best(&self) -> Option<&MechanismRun> {
        self.runs
            .iter()
            .min_by(|a, b| a.total_cost.total_cmp(&b.total_cost))
    }
}

pub fn write_report_json<P: AsRef<Path>>(
    report: &ComparisonReport,
    result_dir: P,
) -> std::io::Result<PathBuf> {
    let summary_path = result_dir.as_ref().join("summary.json");
    let mut summary_file = File::create(&summary_path)?;
    serde_json::to_writer_pretty(&mut summary_file, report)?;
    Ok(summary_path)
}
