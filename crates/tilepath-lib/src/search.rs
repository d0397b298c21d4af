use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::graph::{EdgeKind, NeighborSource};
use crate::grid::{Grid, NodeId};
use crate::path::{reconstruct_path, Path};

/// Per-search bookkeeping for one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScratchRecord {
    /// Accumulated cost of the best known route from the origin.
    pub cost_from_origin: f64,
    /// Heuristic estimate of the remaining cost (zero for uniform-cost search).
    pub cost_to_destination: f64,
    /// Node this one was last reached from.
    pub parent: Option<NodeId>,
    /// Edge used to reach this node from `parent`.
    pub via: Option<EdgeKind>,
}

impl ScratchRecord {
    /// Record for the node a search starts from.
    pub fn origin() -> Self {
        Self {
            cost_from_origin: 0.0,
            cost_to_destination: 0.0,
            parent: None,
            via: None,
        }
    }

    pub fn total_cost(&self) -> f64 {
        self.cost_from_origin + self.cost_to_destination
    }
}

/// Scratch state of a single search, keyed by node identity.
///
/// A fresh tree is created for every search and dropped with it, so no cost
/// or parent ever leaks from one search into the next.
#[derive(Debug, Clone, Default)]
pub struct SearchTree {
    records: HashMap<NodeId, ScratchRecord>,
    expanded: usize,
}

impl SearchTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: NodeId, record: ScratchRecord) {
        self.records.insert(node, record);
    }

    pub fn record(&self, node: NodeId) -> Option<&ScratchRecord> {
        self.records.get(&node)
    }

    /// Number of nodes the search assigned a cost to.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of nodes removed from the frontier and expanded.
    pub fn expanded(&self) -> usize {
        self.expanded
    }
}

/// Run best-first search guided by straight-line distance to the destination.
///
/// Nodes move to a closed set once expanded and are never reopened. A
/// neighbour's cost is replaced when it is not on the frontier yet or when
/// the new route into it is strictly cheaper.
pub fn find_path_best_first<N: NeighborSource + ?Sized>(
    grid: &Grid,
    neighbors: &N,
    origin: NodeId,
    destination: NodeId,
) -> Result<Option<Path>> {
    let Some(tree) = search_best_first(grid, neighbors, origin, destination)? else {
        return Ok(None);
    };
    reconstruct_path(&tree, origin, destination, grid.len()).map(Some)
}

/// Run uniform-cost search (Dijkstra) from `origin` to `destination`.
///
/// Any node, expanded or not, is re-relaxed whenever a strictly cheaper route
/// into it appears, so the returned path is optimal for non-negative costs
/// regardless of links.
pub fn find_path_dijkstra<N: NeighborSource + ?Sized>(
    grid: &Grid,
    neighbors: &N,
    origin: NodeId,
    destination: NodeId,
) -> Result<Option<Path>> {
    let Some(tree) = search_dijkstra(grid, neighbors, origin, destination)? else {
        return Ok(None);
    };
    reconstruct_path(&tree, origin, destination, grid.len()).map(Some)
}

/// Best-first search returning the raw scratch tree instead of a path.
pub fn search_best_first<N: NeighborSource + ?Sized>(
    grid: &Grid,
    neighbors: &N,
    origin: NodeId,
    destination: NodeId,
) -> Result<Option<SearchTree>> {
    let step = step_distance(grid, origin)?;
    let goal = grid.node(destination)?.position();

    debug!(%origin, %destination, step, "starting best-first search");

    let mut tree = SearchTree::new();
    let mut open: HashSet<NodeId> = HashSet::new();
    let mut closed: HashSet<NodeId> = HashSet::new();
    let mut queue = BinaryHeap::new();

    tree.insert(origin, ScratchRecord::origin());
    open.insert(origin);
    queue.push(QueueEntry::new(origin, 0.0));

    while let Some(entry) = queue.pop() {
        if !open.contains(&entry.node) {
            continue;
        }
        let Some(current) = tree.record(entry.node).copied() else {
            continue;
        };
        // Superseded by a cheaper entry for the same node.
        if entry.cost.0.total_cmp(&current.total_cost()) != Ordering::Equal {
            continue;
        }

        open.remove(&entry.node);
        closed.insert(entry.node);
        tree.expanded += 1;

        if entry.node == destination {
            debug!(
                expanded = tree.expanded,
                cost = current.cost_from_origin,
                "best-first search reached destination"
            );
            return Ok(Some(tree));
        }

        for edge in neighbors.neighbors(grid, entry.node)? {
            let next = edge.target;
            if closed.contains(&next) {
                continue;
            }

            let candidate = current.cost_from_origin + grid.node(next)?.terrain_cost() + step;
            let in_open = open.contains(&next);
            if in_open {
                let known = tree
                    .record(next)
                    .map_or(f64::INFINITY, |record| record.cost_from_origin);
                if candidate >= known {
                    continue;
                }
            }

            let record = ScratchRecord {
                cost_from_origin: candidate,
                cost_to_destination: grid.node(next)?.position().distance_to(&goal),
                parent: Some(entry.node),
                via: Some(edge.kind),
            };
            trace!(from = %entry.node, to = %next, cost = candidate, kind = ?edge.kind, "admitted neighbour");

            tree.insert(next, record);
            open.insert(next);
            queue.push(QueueEntry::new(next, record.total_cost()));
        }
    }

    debug!(
        expanded = tree.expanded,
        "open set exhausted before reaching destination"
    );
    Ok(None)
}

/// Dijkstra search returning the raw scratch tree instead of a path.
pub fn search_dijkstra<N: NeighborSource + ?Sized>(
    grid: &Grid,
    neighbors: &N,
    origin: NodeId,
    destination: NodeId,
) -> Result<Option<SearchTree>> {
    let step = step_distance(grid, origin)?;
    grid.node(destination)?;

    debug!(%origin, %destination, step, "starting dijkstra search");

    let mut tree = SearchTree::new();
    let mut queue = BinaryHeap::new();

    tree.insert(origin, ScratchRecord::origin());
    queue.push(QueueEntry::new(origin, 0.0));

    while let Some(entry) = queue.pop() {
        let Some(current) = tree.record(entry.node).copied() else {
            continue;
        };
        if entry.cost.0 > current.cost_from_origin {
            continue;
        }
        tree.expanded += 1;

        if entry.node == destination {
            debug!(
                expanded = tree.expanded,
                cost = current.cost_from_origin,
                "dijkstra search reached destination"
            );
            return Ok(Some(tree));
        }

        for edge in neighbors.neighbors(grid, entry.node)? {
            let next = edge.target;
            let candidate = current.cost_from_origin + grid.node(next)?.terrain_cost() + step;
            let known = tree
                .record(next)
                .map_or(f64::INFINITY, |record| record.cost_from_origin);
            if candidate >= known {
                continue;
            }

            trace!(from = %entry.node, to = %next, cost = candidate, kind = ?edge.kind, "relaxed neighbour");
            tree.insert(
                next,
                ScratchRecord {
                    cost_from_origin: candidate,
                    cost_to_destination: 0.0,
                    parent: Some(entry.node),
                    via: Some(edge.kind),
                },
            );
            queue.push(QueueEntry::new(next, candidate));
        }
    }

    debug!(
        expanded = tree.expanded,
        "queue exhausted before reaching destination"
    );
    Ok(None)
}

/// Per-step cost shared by every move of a search, taken from the origin's
/// footprint.
fn step_distance(grid: &Grid, origin: NodeId) -> Result<f64> {
    grid.node(origin)?
        .extents()
        .map(|extents| extents.step_distance())
        .ok_or(Error::MissingExtents { node: origin })
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: NodeId,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: NodeId, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost; equal
        // costs pop the lowest node id first.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
