//! Path finding façade.
//!
//! This module provides:
//! - [`Pathfinder`] - owns a surface probe and configuration, runs searches
//! - [`SearchPlanner`] - strategy trait implemented per [`SearchStrategy`]
//! - [`select_planner`] - maps a strategy to its planner
//!
//! # Example
//!
//! ```
//! use tilepath_lib::{Extents, Grid, GridNode, LayerMask, Pathfinder, PathfinderConfig, Position, SurfaceIndex};
//!
//! # fn main() -> tilepath_lib::Result<()> {
//! let mut grid = Grid::new();
//! let tile = Extents::new(0.5, 0.1, 0.5);
//! let a = grid.add_node(GridNode::new(Position::new(0.0, 0.0, 0.0), tile))?;
//! let b = grid.add_node(GridNode::new(Position::new(1.0, 0.0, 0.0), tile))?;
//!
//! let surfaces = SurfaceIndex::from_grid(&grid, LayerMask::TILES);
//! let pathfinder = Pathfinder::new(surfaces, PathfinderConfig::default())?;
//! let path = pathfinder.find_path(&grid, a, b)?.expect("adjacent tiles connect");
//! assert_eq!(path.nodes(), vec![a, b]);
//! # Ok(())
//! # }
//! ```

mod planner;

pub use planner::{select_planner, BestFirstPlanner, DijkstraPlanner, SearchPlanner};

use tracing::debug;

use crate::config::{PathfinderConfig, SearchStrategy};
use crate::error::{Error, Result};
use crate::geometry::Position;
use crate::graph::{Edge, NeighborResolver, NeighborSource};
use crate::grid::{Grid, NodeId};
use crate::path::{Path, PathObserver};
use crate::spatial::{DownwardRay, SurfaceProbe};

/// How far below a point [`Pathfinder::node_beneath`] looks for a surface.
pub const NODE_SEARCH_DEPTH: f64 = 50.0;

/// Entry point for hosts: pairs a [`SurfaceProbe`] with configuration.
#[derive(Debug)]
pub struct Pathfinder<P> {
    probe: P,
    config: PathfinderConfig,
}

impl<P: SurfaceProbe> Pathfinder<P> {
    /// Create a pathfinder after validating `config`.
    pub fn new(probe: P, config: PathfinderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { probe, config })
    }

    pub fn config(&self) -> &PathfinderConfig {
        &self.config
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Strategy used by [`Pathfinder::find_path`].
    pub fn strategy(&self) -> SearchStrategy {
        self.config.strategy
    }

    pub fn resolver(&self) -> NeighborResolver<'_, P> {
        NeighborResolver::new(&self.probe, &self.config.probe, self.config.link_occupancy)
    }

    /// Nodes reachable in one step from `node`.
    pub fn neighbors(&self, grid: &Grid, node: NodeId) -> Result<Vec<Edge>> {
        self.resolver().neighbors(grid, node)
    }

    /// Search for a route using the configured strategy.
    ///
    /// `Ok(None)` means no route exists. Errors signal malformed input such
    /// as unknown nodes, nodes without extents or unbound colliders.
    pub fn find_path(
        &self,
        grid: &Grid,
        origin: NodeId,
        destination: NodeId,
    ) -> Result<Option<Path>> {
        self.find_path_with(self.config.strategy, grid, origin, destination)
    }

    /// Search with an explicit strategy, ignoring the configured one.
    pub fn find_path_with(
        &self,
        strategy: SearchStrategy,
        grid: &Grid,
        origin: NodeId,
        destination: NodeId,
    ) -> Result<Option<Path>> {
        let planner = select_planner(strategy);
        let resolver = self.resolver();
        let path = planner.find_path(grid, &resolver, origin, destination)?;

        match &path {
            Some(path) => debug!(
                %origin,
                %destination,
                %strategy,
                hops = path.hop_count(),
                cost = path.total_cost(),
                "route found"
            ),
            None => debug!(%origin, %destination, %strategy, "no route"),
        }

        Ok(path)
    }

    /// Like [`Pathfinder::find_path`], notifying `observer` once on success.
    pub fn find_path_observed(
        &self,
        grid: &Grid,
        origin: NodeId,
        destination: NodeId,
        observer: &mut dyn PathObserver,
    ) -> Result<Option<Path>> {
        let path = self.find_path(grid, origin, destination)?;
        if let Some(path) = &path {
            observer.on_path_found(path);
        }
        Ok(path)
    }

    /// Like [`Pathfinder::find_path`] but reports an unreachable destination
    /// as [`Error::NoRoute`].
    pub fn route(&self, grid: &Grid, origin: NodeId, destination: NodeId) -> Result<Path> {
        self.find_path(grid, origin, destination)?
            .ok_or(Error::NoRoute {
                origin,
                destination,
            })
    }

    /// Node whose surface lies directly below `position`, within
    /// [`NODE_SEARCH_DEPTH`].
    pub fn node_beneath(&self, grid: &Grid, position: Position) -> Result<Option<NodeId>> {
        let ray = DownwardRay {
            origin: position,
            length: NODE_SEARCH_DEPTH,
        };
        self.probe
            .cast_down(&ray, self.config.probe.surface_mask)
            .map(|hit| grid.node_for_collider(hit.collider))
            .transpose()
    }
}
