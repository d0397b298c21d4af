use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::{Extents, Position};

/// Identifier of a node within a [`Grid`]. Assigned sequentially from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle of a mover (character, unit) standing on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoverId(pub u64);

impl fmt::Display for MoverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// Handle of a physical surface that spatial probes can hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColliderId(pub u64);

impl fmt::Display for ColliderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<NodeId> for ColliderId {
    fn from(node: NodeId) -> Self {
        ColliderId(u64::from(node.0))
    }
}

/// A traversable cell of the grid.
///
/// Nodes carry only persistent data. Search bookkeeping (costs, parents) lives
/// in a per-search [`crate::SearchTree`] so repeated searches never observe
/// each other's state.
#[derive(Debug, Clone, PartialEq)]
pub struct GridNode {
    name: Option<String>,
    position: Position,
    extents: Option<Extents>,
    terrain_cost: f64,
    occupant: Option<MoverId>,
    link: Option<NodeId>,
}

impl GridNode {
    pub fn new(position: Position, extents: Extents) -> Self {
        Self {
            name: None,
            position,
            extents: Some(extents),
            terrain_cost: 0.0,
            occupant: None,
            link: None,
        }
    }

    /// A node placed without footprint geometry. Probing from it, or starting
    /// a search at it, fails with [`Error::MissingExtents`].
    pub fn without_extents(position: Position) -> Self {
        Self {
            extents: None,
            ..Self::new(position, Extents::new(0.0, 0.0, 0.0))
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the initial terrain cost. Validated by [`Grid::add_node`].
    pub fn with_terrain_cost(mut self, cost: f64) -> Self {
        self.terrain_cost = cost;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn extents(&self) -> Option<Extents> {
        self.extents
    }

    pub fn terrain_cost(&self) -> f64 {
        self.terrain_cost
    }

    pub fn occupant(&self) -> Option<MoverId> {
        self.occupant
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Direct connection to a non-adjacent node, if any.
    pub fn link(&self) -> Option<NodeId> {
        self.link
    }
}

/// Arena of grid nodes plus the mapping from physical colliders to nodes.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    nodes: Vec<GridNode>,
    colliders: HashMap<ColliderId, NodeId>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node and bind a collider with the same numeric id to it.
    pub fn add_node(&mut self, node: GridNode) -> Result<NodeId> {
        validate_terrain_cost(node.terrain_cost)?;

        let id = NodeId(self.nodes.len() as u32);
        let collider = ColliderId::from(id);
        if let Some(&owner) = self.colliders.get(&collider) {
            return Err(Error::ColliderBound {
                collider,
                node: owner,
            });
        }
        self.nodes.push(node);
        self.colliders.insert(collider, id);
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Result<&GridNode> {
        self.nodes
            .get(id.index())
            .ok_or(Error::UnknownNode { node: id })
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut GridNode> {
        self.nodes
            .get_mut(id.index())
            .ok_or(Error::UnknownNode { node: id })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &GridNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index as u32), node))
    }

    /// Lookup a node identifier by its case-sensitive name.
    pub fn node_id_by_name(&self, name: &str) -> Option<NodeId> {
        self.iter()
            .find(|(_, node)| node.name() == Some(name))
            .map(|(id, _)| id)
    }

    /// Connect `from` to `to` in one direction, replacing any previous link.
    pub fn link(&mut self, from: NodeId, to: NodeId) -> Result<()> {
        self.node(to)?;
        self.node_mut(from)?.link = Some(to);
        Ok(())
    }

    /// Connect two nodes in both directions.
    pub fn link_both(&mut self, a: NodeId, b: NodeId) -> Result<()> {
        self.link(a, b)?;
        self.link(b, a)
    }

    /// Remove the link leaving `from`, returning its former target.
    pub fn unlink(&mut self, from: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node_mut(from)?.link.take())
    }

    pub fn set_terrain_cost(&mut self, id: NodeId, cost: f64) -> Result<()> {
        validate_terrain_cost(cost)?;
        self.node_mut(id)?.terrain_cost = cost;
        Ok(())
    }

    /// Record that `mover` now stands on `id`.
    ///
    /// A mover stands on at most one node: occupying a new node vacates the
    /// one it held before. Re-occupying the same node is a no-op.
    pub fn occupy(&mut self, id: NodeId, mover: MoverId) -> Result<()> {
        if let Some(occupant) = self.node(id)?.occupant {
            if occupant != mover {
                return Err(Error::NodeOccupied { node: id, occupant });
            }
            return Ok(());
        }

        if let Some(previous) = self.position_of(mover) {
            self.node_mut(previous)?.occupant = None;
            debug!(%mover, from = %previous, to = %id, "mover moved");
        }
        self.node_mut(id)?.occupant = Some(mover);
        Ok(())
    }

    /// Clear occupancy of `id`, returning the mover that stood there.
    pub fn vacate(&mut self, id: NodeId) -> Result<Option<MoverId>> {
        Ok(self.node_mut(id)?.occupant.take())
    }

    /// Node currently holding `mover`, if any.
    pub fn position_of(&self, mover: MoverId) -> Option<NodeId> {
        self.iter()
            .find(|(_, node)| node.occupant == Some(mover))
            .map(|(id, _)| id)
    }

    /// Bind an additional collider to a node.
    ///
    /// A collider belongs to one node; binding it to a second node fails with
    /// [`Error::ColliderBound`]. Binding it again to its owner is a no-op.
    pub fn bind_collider(&mut self, collider: ColliderId, node: NodeId) -> Result<()> {
        self.node(node)?;
        match self.colliders.get(&collider) {
            Some(&owner) if owner != node => Err(Error::ColliderBound {
                collider,
                node: owner,
            }),
            _ => {
                self.colliders.insert(collider, node);
                Ok(())
            }
        }
    }

    pub fn node_for_collider(&self, collider: ColliderId) -> Result<NodeId> {
        self.colliders
            .get(&collider)
            .copied()
            .ok_or(Error::UnmappedCollider { collider })
    }

    /// All collider bindings, sorted by collider id.
    pub fn colliders(&self) -> Vec<(ColliderId, NodeId)> {
        let mut bindings: Vec<_> = self
            .colliders
            .iter()
            .map(|(collider, node)| (*collider, *node))
            .collect();
        bindings.sort_unstable();
        bindings
    }
}

fn validate_terrain_cost(cost: f64) -> Result<()> {
    if cost.is_finite() && cost >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidTerrainCost { cost })
    }
}
