use thiserror::Error;

use crate::grid::{ColliderId, MoverId, NodeId};

/// Convenient result alias for the tilepath library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// A search that simply cannot reach its destination is not an error: the
/// search functions return `Ok(None)` for that case. [`Error::NoRoute`] only
/// exists for callers that opt into [`crate::Pathfinder::route`].
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a node identifier does not belong to the grid.
    #[error("unknown node {node}")]
    UnknownNode { node: NodeId },

    /// Raised when a node lacks the footprint needed to derive probe reach or
    /// step distance.
    #[error("node {node} has no footprint extents")]
    MissingExtents { node: NodeId },

    /// Raised when a probe hits a traversable surface that no node owns.
    #[error("collider {collider} is not bound to any node")]
    UnmappedCollider { collider: ColliderId },

    /// Raised when a terrain cost is negative or not finite.
    #[error("invalid terrain cost {cost}; expected a finite value >= 0")]
    InvalidTerrainCost { cost: f64 },

    /// Raised when placing a mover on a node held by another mover.
    #[error("node {node} is already occupied by mover {occupant}")]
    NodeOccupied { node: NodeId, occupant: MoverId },

    /// Raised when binding a collider that another node already owns.
    #[error("collider {collider} is already bound to node {node}")]
    ColliderBound { collider: ColliderId, node: NodeId },

    /// Raised when reconstruction reaches a node without a parent before
    /// arriving back at the origin.
    #[error("parent chain from {destination} broke at {stalled_at} before reaching {origin}")]
    BrokenPathChain {
        origin: NodeId,
        destination: NodeId,
        stalled_at: NodeId,
    },

    /// Raised when reconstruction takes more steps than there are nodes.
    #[error("parent chain from {destination} to {origin} exceeded {steps} steps")]
    PathChainCycle {
        origin: NodeId,
        destination: NodeId,
        steps: usize,
    },

    /// Raised when no route could be found between two nodes.
    #[error("no route found between {origin} and {destination}")]
    NoRoute { origin: NodeId, destination: NodeId },

    /// Raised when a computed path lacks any steps.
    #[error("path was empty")]
    EmptyPath,

    /// Raised when a route summary cannot be serialised.
    #[error("failed to serialise route summary: {message}")]
    Serialization { message: String },

    /// Raised when pathfinder configuration fails validation.
    #[error("invalid pathfinder configuration: {message}")]
    InvalidConfig { message: String },
}
