//! Lazily derived routing graph.
//!
//! Edges are never stored. When a search expands a node, [`NeighborResolver`]
//! casts downward probes in a ring around it and adds the node's direct link.

use serde::Serialize;
use tracing::trace;

use crate::config::{LinkOccupancy, ProbeConfig};
use crate::error::{Error, Result};
use crate::geometry::Position;
use crate::grid::{Grid, NodeId};
use crate::spatial::{DownwardRay, SurfaceProbe};

/// Classification for the edge used to reach a neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Found by a spatial probe next to the node.
    Spatial,
    /// The node's direct link (ladder, teleport).
    Link,
}

/// Edge from an expanded node to one of its neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub target: NodeId,
    pub kind: EdgeKind,
}

/// Source of one-step neighbours for the search algorithms.
pub trait NeighborSource {
    /// Return the nodes reachable in one step from `node`.
    fn neighbors(&self, grid: &Grid, node: NodeId) -> Result<Vec<Edge>>;
}

/// Derives neighbours from surface probes plus direct links.
#[derive(Debug)]
pub struct NeighborResolver<'a, P: ?Sized> {
    probe: &'a P,
    config: &'a ProbeConfig,
    link_occupancy: LinkOccupancy,
}

impl<'a, P: SurfaceProbe + ?Sized> NeighborResolver<'a, P> {
    pub fn new(probe: &'a P, config: &'a ProbeConfig, link_occupancy: LinkOccupancy) -> Self {
        Self {
            probe,
            config,
            link_occupancy,
        }
    }

    /// Ray for probe `step` (1-based) around a node at `center`.
    fn ray(&self, center: Position, reach: f64, step: usize) -> DownwardRay {
        let heading = Position::heading(self.config.angle_step_degrees * step as f64);
        let above = (center + heading.scale(reach)).with_y(center.y + self.config.height_margin);
        DownwardRay {
            origin: above,
            length: self.config.probe_length,
        }
    }
}

impl<P: SurfaceProbe + ?Sized> NeighborSource for NeighborResolver<'_, P> {
    fn neighbors(&self, grid: &Grid, node_id: NodeId) -> Result<Vec<Edge>> {
        let node = grid.node(node_id)?;
        let extents = node
            .extents()
            .ok_or(Error::MissingExtents { node: node_id })?;
        let reach = extents.probe_reach();

        let mut edges = Vec::with_capacity(self.config.probe_count + 1);

        for step in 1..=self.config.probe_count {
            let ray = self.ray(node.position(), reach, step);
            let Some(hit) = self.probe.cast_down(&ray, self.config.surface_mask) else {
                continue;
            };

            let target = grid.node_for_collider(hit.collider)?;
            if grid.node(target)?.is_occupied() {
                trace!(from = %node_id, to = %target, "skipping occupied neighbour");
                continue;
            }
            edges.push(Edge {
                target,
                kind: EdgeKind::Spatial,
            });
        }

        if let Some(target) = node.link() {
            let blocked = self.link_occupancy == LinkOccupancy::Respect
                && grid.node(target)?.is_occupied();
            if blocked {
                trace!(from = %node_id, to = %target, "skipping occupied link");
            } else {
                edges.push(Edge {
                    target,
                    kind: EdgeKind::Link,
                });
            }
        }

        Ok(edges)
    }
}

impl<S: NeighborSource + ?Sized> NeighborSource for &S {
    fn neighbors(&self, grid: &Grid, node: NodeId) -> Result<Vec<Edge>> {
        (**self).neighbors(grid, node)
    }
}
