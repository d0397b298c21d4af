//! tilepath library entry points.
//!
//! This crate finds low-cost routes across a grid of spatially placed nodes.
//! Edges are derived lazily: each node probes its surroundings through a
//! [`SurfaceProbe`] and may additionally carry a direct link (ladders,
//! teleports). Higher-level consumers (the CLI, game hosts) should only depend
//! on the items exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod config;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod grid;
pub mod output;
pub mod path;
pub mod routing;
pub mod search;
pub mod spatial;

pub use config::{
    LayerMask, LinkOccupancy, PathfinderConfig, ProbeConfig, SearchStrategy, MAX_PROBES,
};
pub use error::{Error, Result};
pub use geometry::{Extents, Position};
pub use graph::{Edge, EdgeKind, NeighborResolver, NeighborSource};
pub use grid::{ColliderId, Grid, GridNode, MoverId, NodeId};
pub use output::{RouteOutputFormat, RouteStepSummary, RouteSummary, StepMethod};
pub use path::{reconstruct_path, Path, PathObserver, PathStep, TracingObserver};
pub use routing::{
    select_planner, BestFirstPlanner, DijkstraPlanner, Pathfinder,
    SearchPlanner, NODE_SEARCH_DEPTH,
};
pub use search::{find_path_best_first, find_path_dijkstra, ScratchRecord, SearchTree};
pub use spatial::{DownwardRay, ProbeHit, Surface, SurfaceIndex, SurfaceProbe};
