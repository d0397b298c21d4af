use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::EdgeKind;
use crate::grid::NodeId;
use crate::search::SearchTree;

/// One node of a computed path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathStep {
    pub node: NodeId,
    /// Accumulated cost on arrival at this node.
    pub cost_from_origin: f64,
    /// Edge taken into this node; `None` for the origin.
    pub via: Option<EdgeKind>,
}

/// Ordered, non-empty sequence of nodes from a search's origin to its
/// destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    /// Wrap pre-built steps, rejecting empty sequences.
    pub fn from_steps(steps: Vec<PathStep>) -> Result<Self> {
        if steps.is_empty() {
            return Err(Error::EmptyPath);
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathStep> {
        self.steps.iter()
    }

    pub fn nodes(&self) -> Vec<NodeId> {
        self.steps.iter().map(|step| step.node).collect()
    }

    pub fn origin(&self) -> NodeId {
        self.steps[0].node
    }

    pub fn destination(&self) -> NodeId {
        self.steps[self.steps.len() - 1].node
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.steps.iter().any(|step| step.node == node)
    }

    /// Number of moves in the path.
    pub fn hop_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Accumulated cost on arrival at the destination.
    pub fn total_cost(&self) -> f64 {
        self.steps
            .last()
            .map(|step| step.cost_from_origin)
            .unwrap_or(0.0)
    }

    /// Number of moves taken through direct links.
    pub fn link_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| step.via == Some(EdgeKind::Link))
            .count()
    }
}

/// Receives every path a [`crate::Pathfinder`] finds.
///
/// Observers are notified once per successful search and cannot influence
/// the result. Closures taking `&Path` implement this trait.
pub trait PathObserver {
    fn on_path_found(&mut self, path: &Path);
}

impl<F: FnMut(&Path)> PathObserver for F {
    fn on_path_found(&mut self, path: &Path) {
        self(path)
    }
}

/// Observer that logs each path at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PathObserver for TracingObserver {
    fn on_path_found(&mut self, path: &Path) {
        debug!(
            origin = %path.origin(),
            destination = %path.destination(),
            hops = path.hop_count(),
            links = path.link_count(),
            cost = path.total_cost(),
            nodes = ?path.nodes(),
            "path found"
        );
    }
}

/// Walk parent pointers from `destination` back to `origin`.
///
/// Fails with [`Error::BrokenPathChain`] when a node other than the origin
/// has no parent, and with [`Error::PathChainCycle`] after `max_steps` moves
/// without reaching the origin.
pub fn reconstruct_path(
    tree: &SearchTree,
    origin: NodeId,
    destination: NodeId,
    max_steps: usize,
) -> Result<Path> {
    let mut steps = Vec::new();
    let mut current = destination;

    while current != origin {
        if steps.len() >= max_steps {
            return Err(Error::PathChainCycle {
                origin,
                destination,
                steps: steps.len(),
            });
        }

        let broken = Error::BrokenPathChain {
            origin,
            destination,
            stalled_at: current,
        };
        let Some(record) = tree.record(current) else {
            return Err(broken);
        };
        let Some(parent) = record.parent else {
            return Err(broken);
        };

        steps.push(PathStep {
            node: current,
            cost_from_origin: record.cost_from_origin,
            via: record.via,
        });
        current = parent;
    }

    steps.push(PathStep {
        node: origin,
        cost_from_origin: tree
            .record(origin)
            .map_or(0.0, |record| record.cost_from_origin),
        via: None,
    });
    steps.reverse();

    Ok(Path { steps })
}
