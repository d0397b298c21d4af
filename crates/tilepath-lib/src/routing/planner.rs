//! Search strategies implementing the Strategy pattern.
//!
//! This module provides the `SearchPlanner` trait and one implementation per
//! [`SearchStrategy`]. [`crate::Pathfinder`] picks a planner per call through
//! [`select_planner`], so new strategies never touch the façade.

use crate::config::SearchStrategy;
use crate::error::Result;
use crate::graph::NeighborSource;
use crate::grid::{Grid, NodeId};
use crate::path::Path;
use crate::search::{find_path_best_first, find_path_dijkstra};

/// Trait for search strategies.
pub trait SearchPlanner: Send + Sync {
    /// The strategy identifier for this planner.
    fn strategy(&self) -> SearchStrategy;

    /// Execute the search over the neighbours produced by `neighbors`.
    ///
    /// Returns `Ok(None)` when the destination is unreachable.
    fn find_path(
        &self,
        grid: &Grid,
        neighbors: &dyn NeighborSource,
        origin: NodeId,
        destination: NodeId,
    ) -> Result<Option<Path>>;

    /// Whether the planner orders its frontier with a distance heuristic.
    fn uses_heuristic(&self) -> bool {
        false
    }
}

/// Best-first planner guided by straight-line distance.
///
/// Expands few nodes on open ground but may return a costlier route when a
/// link jumps away from the destination.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestFirstPlanner;

impl SearchPlanner for BestFirstPlanner {
    fn strategy(&self) -> SearchStrategy {
        SearchStrategy::BestFirst
    }

    fn find_path(
        &self,
        grid: &Grid,
        neighbors: &dyn NeighborSource,
        origin: NodeId,
        destination: NodeId,
    ) -> Result<Option<Path>> {
        find_path_best_first(grid, neighbors, origin, destination)
    }

    fn uses_heuristic(&self) -> bool {
        true
    }
}

/// Uniform-cost planner; always returns a cheapest route.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraPlanner;

impl SearchPlanner for DijkstraPlanner {
    fn strategy(&self) -> SearchStrategy {
        SearchStrategy::Dijkstra
    }

    fn find_path(
        &self,
        grid: &Grid,
        neighbors: &dyn NeighborSource,
        origin: NodeId,
        destination: NodeId,
    ) -> Result<Option<Path>> {
        find_path_dijkstra(grid, neighbors, origin, destination)
    }
}

/// Select the planner for a strategy.
pub fn select_planner(strategy: SearchStrategy) -> Box<dyn SearchPlanner> {
    match strategy {
        SearchStrategy::BestFirst => Box::new(BestFirstPlanner),
        SearchStrategy::Dijkstra => Box::new(DijkstraPlanner),
    }
}
