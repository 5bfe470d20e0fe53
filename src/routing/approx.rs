//! Spanning-tree based route approximation
//!
//! The start point becomes a depot vertex next to one vertex per task. The
//! undirected weight between two vertices is the cheaper of the two possible
//! hand-overs (drop-off of one to pickup of the other). A minimum spanning
//! tree is made even by a minimum-weight perfect matching on its odd-degree
//! vertices, the Euler circuit of the union is walked from the depot, and
//! repeated vertices are skipped. Both directions of the resulting cycle are
//! costed and the cheaper is kept.

use super::Route;
use crate::error::{Error, Result};
use crate::fleet::geometry::distance;
use crate::fleet::types::{Point, Task};
use tracing::debug;

/// Above this many odd vertices the matching is built greedily.
const EXACT_MATCHING_LIMIT: usize = 20;

const DEPOT: usize = 0;

struct TaskGraph<'a> {
    start: Point,
    tasks: &'a [Task],
}

impl TaskGraph<'_> {
    fn vertex_count(&self) -> usize {
        self.tasks.len() + 1
    }

    fn pickup(&self, v: usize) -> Point {
        if v == DEPOT {
            self.start
        } else {
            self.tasks[v - 1].pickup()
        }
    }

    fn dropoff(&self, v: usize) -> Point {
        if v == DEPOT {
            self.start
        } else {
            self.tasks[v - 1].dropoff()
        }
    }

    fn weight(&self, u: usize, v: usize) -> f64 {
        let forward = distance(self.dropoff(u), self.pickup(v));
        let backward = distance(self.dropoff(v), self.pickup(u));
        forward.min(backward)
    }

    /// Prim's algorithm rooted at the depot.
    fn spanning_tree(&self) -> Vec<(usize, usize)> {
        let n = self.vertex_count();
        let mut in_tree = vec![false; n];
        let mut best = vec![f64::INFINITY; n];
        let mut parent = vec![DEPOT; n];
        let mut edges = Vec::with_capacity(n.saturating_sub(1));
        best[DEPOT] = 0.0;

        for _ in 0..n {
            let mut next = None;
            let mut min_val = f64::INFINITY;
            for v in 0..n {
                if !in_tree[v] && best[v] < min_val {
                    min_val = best[v];
                    next = Some(v);
                }
            }
            let Some(u) = next else { break };

            in_tree[u] = true;
            if u != DEPOT {
                edges.push((parent[u], u));
            }
            for v in 0..n {
                if !in_tree[v] {
                    let w = self.weight(u, v);
                    if w < best[v] {
                        best[v] = w;
                        parent[v] = u;
                    }
                }
            }
        }
        edges
    }
}

fn degrees(vertex_count: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let mut degree = vec![0; vertex_count];
    for &(u, v) in edges {
        degree[u] += 1;
        degree[v] += 1;
    }
    degree
}

/// Minimum-weight perfect matching over `vertices` (even count).
///
/// Exact bitmask dynamic programming up to [`EXACT_MATCHING_LIMIT`]
/// vertices, greedy cheapest-pair-first beyond.
pub(crate) fn min_weight_matching<F>(vertices: &[usize], weight: F) -> Vec<(usize, usize)>
where
    F: Fn(usize, usize) -> f64,
{
    let k = vertices.len();
    if k == 0 {
        return Vec::new();
    }
    if k > EXACT_MATCHING_LIMIT {
        debug!(target: "fleetalloc", "{} odd vertices, using greedy matching", k);
        return greedy_matching(vertices, weight);
    }

    let full = (1usize << k) - 1;
    let mut cost = vec![f64::INFINITY; full + 1];
    let mut choice: Vec<(u8, u8)> = vec![(0, 0); full + 1];
    cost[0] = 0.0;

    for mask in 0..full {
        if !cost[mask].is_finite() {
            continue;
        }
        // always pair the lowest unmatched vertex
        let i = (!mask).trailing_zeros() as usize;
        if i >= k {
            continue;
        }
        for j in (i + 1)..k {
            if mask & (1 << j) != 0 {
                continue;
            }
            let next = mask | (1 << i) | (1 << j);
            let candidate = cost[mask] + weight(vertices[i], vertices[j]);
            if candidate < cost[next] {
                cost[next] = candidate;
                choice[next] = (i as u8, j as u8);
            }
        }
    }

    let mut pairs = Vec::with_capacity(k / 2);
    let mut mask = full;
    while mask != 0 {
        let (i, j) = choice[mask];
        pairs.push((vertices[i as usize], vertices[j as usize]));
        mask &= !((1 << i) | (1 << j));
    }
    pairs
}

fn greedy_matching<F>(vertices: &[usize], weight: F) -> Vec<(usize, usize)>
where
    F: Fn(usize, usize) -> f64,
{
    let mut candidates = Vec::new();
    for (a, &u) in vertices.iter().enumerate() {
        for &v in &vertices[a + 1..] {
            candidates.push((weight(u, v), u, v));
        }
    }
    candidates.sort_by(|x, y| {
        x.0.total_cmp(&y.0)
            .then(x.1.cmp(&y.1))
            .then(x.2.cmp(&y.2))
    });

    let mut matched = std::collections::HashSet::new();
    let mut pairs = Vec::with_capacity(vertices.len() / 2);
    for (_, u, v) in candidates {
        if !matched.contains(&u) && !matched.contains(&v) {
            matched.insert(u);
            matched.insert(v);
            pairs.push((u, v));
        }
    }
    pairs
}

fn check_eulerian(vertex_count: usize, edges: &[(usize, usize)]) -> Result<()> {
    let degree = degrees(vertex_count, edges);
    if let Some(v) = degree.iter().position(|d| d % 2 != 0) {
        return Err(Error::RouteComputation(format!(
            "vertex {} has odd degree {} after matching",
            v, degree[v]
        )));
    }

    let mut adjacency = vec![Vec::new(); vertex_count];
    for &(u, v) in edges {
        adjacency[u].push(v);
        adjacency[v].push(u);
    }
    let mut seen = vec![false; vertex_count];
    let mut stack = vec![DEPOT];
    seen[DEPOT] = true;
    while let Some(u) = stack.pop() {
        for &v in &adjacency[u] {
            if !seen[v] {
                seen[v] = true;
                stack.push(v);
            }
        }
    }
    if let Some(v) = seen.iter().position(|s| !s) {
        return Err(Error::RouteComputation(format!(
            "vertex {} is not connected to the depot",
            v
        )));
    }
    Ok(())
}

/// Hierholzer's algorithm over a multigraph given as an edge list.
pub(crate) fn euler_circuit(
    vertex_count: usize,
    edges: &[(usize, usize)],
    start: usize,
) -> Result<Vec<usize>> {
    let mut adjacency: Vec<Vec<(usize, usize)>> = vec![Vec::new(); vertex_count];
    for (id, &(u, v)) in edges.iter().enumerate() {
        adjacency[u].push((v, id));
        adjacency[v].push((u, id));
    }
    let mut used = vec![false; edges.len()];
    let mut cursor = vec![0usize; vertex_count];
    let mut stack = vec![start];
    let mut circuit = Vec::with_capacity(edges.len() + 1);

    while let Some(&u) = stack.last() {
        let mut advanced = false;
        while cursor[u] < adjacency[u].len() {
            let (v, id) = adjacency[u][cursor[u]];
            cursor[u] += 1;
            if !used[id] {
                used[id] = true;
                stack.push(v);
                advanced = true;
                break;
            }
        }
        if !advanced {
            stack.pop();
            circuit.push(u);
        }
    }

    if circuit.len() != edges.len() + 1 {
        return Err(Error::RouteComputation(format!(
            "euler circuit covered {} of {} edges",
            circuit.len().saturating_sub(1),
            edges.len()
        )));
    }
    circuit.reverse();
    Ok(circuit)
}

/// Keep the first visit of every vertex, dropping the depot.
fn shortcut(circuit: &[usize], vertex_count: usize) -> Vec<usize> {
    let mut visited = vec![false; vertex_count];
    let mut order = Vec::with_capacity(vertex_count);
    for &v in circuit {
        if !visited[v] {
            visited[v] = true;
            if v != DEPOT {
                order.push(v);
            }
        }
    }
    order
}

pub fn order(tasks: &[Task], start: Point) -> Result<Route> {
    if tasks.len() < 2 {
        return Err(Error::InsufficientTasks {
            strategy: "approximate",
            required: 2,
            found: tasks.len(),
        });
    }

    let graph = TaskGraph { start, tasks };
    let n = graph.vertex_count();

    let mut edges = graph.spanning_tree();
    let degree = degrees(n, &edges);
    let odd: Vec<usize> = (0..n).filter(|&v| degree[v] % 2 == 1).collect();
    let matching = min_weight_matching(&odd, |u, v| graph.weight(u, v));
    edges.extend(matching);

    check_eulerian(n, &edges)?;
    let circuit = euler_circuit(n, &edges, DEPOT)?;
    let visits = shortcut(&circuit, n);
    if visits.len() != tasks.len() {
        return Err(Error::RouteComputation(format!(
            "tour visits {} of {} tasks",
            visits.len(),
            tasks.len()
        )));
    }

    let forward: Vec<Task> = visits.iter().map(|&v| tasks[v - 1].clone()).collect();
    let backward: Vec<Task> = visits.iter().rev().map(|&v| tasks[v - 1].clone()).collect();
    let forward = Route::from_order(start, forward);
    let backward = Route::from_order(start, backward);

    Ok(if backward.cost < forward.cost {
        backward
    } else {
        forward
    })
}
