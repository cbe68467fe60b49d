//! Min-cost flow by successive shortest augmenting paths.
//!
//! Costs may be negative, so the first set of node potentials comes from
//! Bellman-Ford. Every later search runs Dijkstra on costs scaled by the
//! potentials (`cost + p(u) - p(v)`, never negative), and the distances it
//! finds are folded back into the potentials.

use std::cmp::Reverse;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, trace};
use petgraph::graph::EdgeIndex;
use petgraph::visit::EdgeRef;
use priority_queue::PriorityQueue;

use crate::common::EntityId;
use crate::config::AssignerConfig;
use crate::error::AssignError;
use crate::network::FlowNetwork;

/// Wall-clock limit, augmentation limit and interrupt flag, checked between
/// augmentations.
#[derive(Debug, Clone)]
pub struct Budget {
    start: Instant,
    time_limit: Option<Duration>,
    augmentation_limit: Option<usize>,
    interrupt: Option<Arc<AtomicBool>>,
}

impl Budget {
    pub fn unlimited() -> Self {
        Budget {
            start: Instant::now(),
            time_limit: None,
            augmentation_limit: None,
            interrupt: None,
        }
    }
    pub fn from_config(config: &AssignerConfig) -> Self {
        Budget {
            start: Instant::now(),
            time_limit: config.time_limit,
            augmentation_limit: config.augmentation_limit,
            interrupt: config.interrupt.clone(),
        }
    }
    pub fn with_augmentation_limit(mut self, limit: usize) -> Self {
        self.augmentation_limit = Some(limit);
        self
    }
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
    /// Whether the run must stop after `augmentations` completed augmentations.
    pub fn is_exhausted(&self, augmentations: usize) -> bool {
        let interrupted = self
            .interrupt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed));
        interrupted
            || self.augmentation_limit.is_some_and(|limit| augmentations >= limit)
            || self.time_limit.is_some_and(|limit| self.elapsed() >= limit)
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self::unlimited()
    }
}

/// Optimal flow, one entry per network edge.
#[derive(Debug, Clone)]
pub struct FlowSolution {
    flow: Vec<i64>,
    total_cost: i64,
    augmentations: usize,
}

impl FlowSolution {
    /// Flow on `edge`, `None` when the edge is not part of the solved network.
    pub fn flow(&self, edge: EdgeIndex) -> Option<i64> {
        self.flow.get(edge.index()).copied()
    }
    pub fn edge_count(&self) -> usize {
        self.flow.len()
    }
    pub fn total_cost(&self) -> i64 {
        self.total_cost
    }
    pub fn augmentations(&self) -> usize {
        self.augmentations
    }
}

#[derive(Debug, Clone, Copy)]
struct ResidualArc {
    to: usize,
    capacity: i64,
    cost: i64,
}

/// Residual graph over the network nodes plus a super source and sink.
///
/// Arcs are stored in pairs: `2k` is forward, `2k + 1` its reverse, and the
/// first pairs mirror the network edges in index order.
struct Residual {
    out: Vec<Vec<usize>>,
    arcs: Vec<ResidualArc>,
    source: usize,
    sink: usize,
}

impl Residual {
    fn new<T: EntityId>(network: &FlowNetwork<T>) -> Self {
        let nodes = network.node_count();
        let mut residual = Residual {
            out: vec![Vec::new(); nodes + 2],
            arcs: Vec::with_capacity(2 * (network.edge_count() + nodes)),
            source: nodes,
            sink: nodes + 1,
        };
        for edge in network.graph().edge_references() {
            let arc = edge.weight();
            residual.add_pair(
                edge.source().index(),
                edge.target().index(),
                arc.capacity,
                arc.cost,
            );
        }
        for index in network.graph().node_indices() {
            let supply = network.node(index).supply;
            if supply > 0 {
                residual.add_pair(residual.source, index.index(), supply, 0);
            } else if supply < 0 {
                residual.add_pair(index.index(), residual.sink, -supply, 0);
            }
        }
        residual
    }
    fn add_pair(&mut self, from: usize, to: usize, capacity: i64, cost: i64) {
        self.out[from].push(self.arcs.len());
        self.arcs.push(ResidualArc { to, capacity, cost });
        self.out[to].push(self.arcs.len());
        self.arcs.push(ResidualArc {
            to: from,
            capacity: 0,
            cost: -cost,
        });
    }
    fn node_count(&self) -> usize {
        self.out.len()
    }
    fn tail(&self, arc: usize) -> usize {
        self.arcs[arc ^ 1].to
    }
    /// Potentials satisfying `p(v) <= p(u) + cost` on every arc with capacity left.
    fn initial_potentials(&self) -> Result<Vec<i64>, AssignError> {
        let n = self.node_count();
        let mut potential = vec![0; n];
        for round in 0..=n {
            let mut changed = false;
            for (a, arc) in self.arcs.iter().enumerate() {
                if arc.capacity == 0 {
                    continue;
                }
                let candidate = potential[self.tail(a)] + arc.cost;
                if candidate < potential[arc.to] {
                    potential[arc.to] = candidate;
                    changed = true;
                }
            }
            if !changed {
                trace!("bellman-ford settled after {} rounds", round + 1);
                return Ok(potential);
            }
        }
        Err(AssignError::InternalInvariant(
            "negative cost cycle in the residual network".to_owned(),
        ))
    }
    /// Dijkstra from the source on potential-scaled costs.
    ///
    /// Returns the scaled distance and the arc used to enter each reached node.
    /// Ties are broken by node index so the search is deterministic.
    fn shortest_paths(&self, potential: &[i64]) -> (Vec<Option<i64>>, Vec<Option<usize>>) {
        let n = self.node_count();
        let mut dist: Vec<Option<i64>> = vec![None; n];
        let mut parent: Vec<Option<usize>> = vec![None; n];
        let mut visited = vec![false; n];
        let mut q: PriorityQueue<usize, Reverse<(i64, usize)>> = PriorityQueue::new();
        dist[self.source] = Some(0);
        q.push(self.source, Reverse((0, self.source)));
        while let Some((x, Reverse((s2x_scaled, _)))) = q.pop() {
            visited[x] = true;
            for &a in &self.out[x] {
                let arc = self.arcs[a];
                let y = arc.to;
                if arc.capacity == 0 || visited[y] {
                    continue;
                }
                let x2y_scaled = arc.cost + potential[x] - potential[y];
                let s2y_scaled = s2x_scaled + x2y_scaled;
                if dist[y].map_or(true, |current| s2y_scaled < current) {
                    dist[y] = Some(s2y_scaled);
                    parent[y] = Some(a);
                    q.push_increase(y, Reverse((s2y_scaled, y)));
                }
            }
        }
        (dist, parent)
    }
    /// Arcs of the source-to-sink path, sink end first.
    fn path_to_sink(&self, parent: &[Option<usize>]) -> Result<Vec<usize>, AssignError> {
        let mut path = Vec::new();
        let mut node = self.sink;
        while node != self.source {
            let Some(a) = parent[node] else {
                return Err(AssignError::InternalInvariant(format!(
                    "broken predecessor chain at residual node {node}"
                )));
            };
            path.push(a);
            node = self.tail(a);
        }
        Ok(path)
    }
    fn push(&mut self, arc: usize, amount: i64) {
        self.arcs[arc].capacity -= amount;
        self.arcs[arc ^ 1].capacity += amount;
    }
}

/// Routes every unit of supply at minimum total cost.
///
/// Fails with [`AssignError::InternalInvariant`] when the network is not
/// feasible (the builder produced something it should not have) and with
/// [`AssignError::Timeout`] when `budget` runs out first. A partial flow is
/// never returned.
pub fn solve<T: EntityId>(
    network: &FlowNetwork<T>,
    budget: &Budget,
) -> Result<FlowSolution, AssignError> {
    if !network.is_balanced() {
        return Err(AssignError::InternalInvariant(
            "network supply and demand differ".to_owned(),
        ));
    }
    let mut residual = Residual::new(network);
    let mut potential = residual.initial_potentials()?;
    let required = network.total_supply();
    let mut routed = 0;
    let mut total_cost = 0;
    let mut augmentations = 0;

    while routed < required {
        if budget.is_exhausted(augmentations) {
            return Err(AssignError::Timeout {
                elapsed: budget.elapsed(),
                augmentations,
            });
        }
        let (dist, parent) = residual.shortest_paths(&potential);
        if dist[residual.sink].is_none() {
            return Err(AssignError::InternalInvariant(format!(
                "sink unreachable with {routed} of {required} units routed"
            )));
        }
        for (p, d) in potential.iter_mut().zip(&dist) {
            if let Some(d) = d {
                *p += d;
            }
        }

        let path = residual.path_to_sink(&parent)?;
        let amount = path
            .iter()
            .map(|&a| residual.arcs[a].capacity)
            .min()
            .unwrap_or(0)
            .min(required - routed);
        if amount <= 0 {
            return Err(AssignError::InternalInvariant(
                "augmenting path without residual capacity".to_owned(),
            ));
        }
        let path_cost: i64 = path.iter().map(|&a| residual.arcs[a].cost).sum();
        total_cost = amount
            .checked_mul(path_cost)
            .and_then(|c| c.checked_add(total_cost))
            .ok_or_else(|| {
                AssignError::InternalInvariant(format!(
                    "total cost overflows after {augmentations} augmentations"
                ))
            })?;
        for &a in &path {
            residual.push(a, amount);
        }
        routed += amount;
        augmentations += 1;
        trace!(
            "augmentation {augmentations}: {amount} unit(s) at cost {path_cost}, {routed}/{required} routed"
        );
    }

    let flow = (0..network.edge_count())
        .map(|e| residual.arcs[2 * e + 1].capacity)
        .collect();
    debug!(
        "min-cost flow: {routed} units, cost {total_cost}, {augmentations} augmentations in {:?}",
        budget.elapsed()
    );
    Ok(FlowSolution {
        flow,
        total_cost,
        augmentations,
    })
}
