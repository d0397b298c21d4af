//! JSON scene files.
//!
//! A scene lists the tiles of a level together with optional pathfinder
//! configuration:
//!
//! ```json
//! {
//!   "config": { "strategy": "dijkstra" },
//!   "nodes": [
//!     { "name": "gate", "position": [0, 0, 0], "extents": [0.5, 0.1, 0.5] },
//!     { "position": [1, 0, 0], "extents": [0.5, 0.1, 0.5], "link": "gate" }
//!   ]
//! }
//! ```
//!
//! Links and CLI node arguments refer to nodes either by name or by their
//! index in `nodes`.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use tracing::debug;

use tilepath_lib::{
    Extents, Grid, GridNode, MoverId, NodeId, Pathfinder, PathfinderConfig, Position,
    SurfaceIndex,
};

/// Reference to a node by index or name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NodeRef {
    Index(u32),
    Name(String),
}

/// One tile as written in a scene file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneNode {
    #[serde(default)]
    pub name: Option<String>,
    pub position: [f64; 3],
    #[serde(default)]
    pub extents: Option<[f64; 3]>,
    #[serde(default)]
    pub terrain_cost: f64,
    #[serde(default)]
    pub occupant: Option<u64>,
    #[serde(default)]
    pub link: Option<NodeRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneFile {
    #[serde(default)]
    pub config: PathfinderConfig,
    pub nodes: Vec<SceneNode>,
}

/// A loaded scene: the grid plus the configuration it was authored with.
#[derive(Debug)]
pub struct Scene {
    pub grid: Grid,
    pub config: PathfinderConfig,
}

impl Scene {
    /// Read and build a scene from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read scene file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("failed to load scene {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let file: SceneFile = serde_json::from_str(raw).context("failed to parse scene JSON")?;
        Self::from_file(file)
    }

    pub fn from_file(file: SceneFile) -> Result<Self> {
        let mut grid = Grid::new();

        for (index, node) in file.nodes.iter().enumerate() {
            let position = Position::from(node.position);
            let mut grid_node = match node.extents {
                Some(extents) => GridNode::new(position, Extents::from(extents)),
                None => GridNode::without_extents(position),
            };
            if let Some(name) = &node.name {
                grid_node = grid_node.with_name(name.clone());
            }
            grid.add_node(grid_node.with_terrain_cost(node.terrain_cost))
                .with_context(|| format!("invalid node at index {index}"))?;
        }

        for (index, node) in file.nodes.iter().enumerate() {
            let id = NodeId(index as u32);
            if let Some(target) = &node.link {
                let target = resolve_ref(&grid, target)
                    .with_context(|| format!("invalid link on node at index {index}"))?;
                grid.link(id, target)?;
            }
            if let Some(occupant) = node.occupant {
                let mover = MoverId(occupant);
                if let Some(held) = grid.position_of(mover) {
                    bail!("mover {mover} on node at index {index} already stands on node {held}");
                }
                grid.occupy(id, mover)
                    .with_context(|| format!("invalid occupant on node at index {index}"))?;
            }
        }

        debug!(nodes = grid.len(), "scene loaded");

        Ok(Self {
            grid,
            config: file.config,
        })
    }

    /// Resolve a command-line node argument: a node name, or a numeric index.
    pub fn resolve(&self, reference: &str) -> Result<NodeId> {
        if let Some(id) = self.grid.node_id_by_name(reference) {
            return Ok(id);
        }
        match reference.parse::<u32>() {
            Ok(index) => resolve_ref(&self.grid, &NodeRef::Index(index)),
            Err(_) => Err(anyhow!("Unknown node '{reference}'")),
        }
    }

    /// Display label for a node: its name, or its identifier.
    pub fn label(&self, id: NodeId) -> String {
        self.grid
            .node(id)
            .ok()
            .and_then(|node| node.name())
            .map_or_else(|| id.to_string(), str::to_string)
    }

    /// Build a pathfinder over this scene's tiles using the bundled
    /// [`SurfaceIndex`].
    pub fn pathfinder(&self, config: PathfinderConfig) -> Result<Pathfinder<SurfaceIndex>> {
        let surfaces = SurfaceIndex::from_grid(&self.grid, config.probe.surface_mask);
        Pathfinder::new(surfaces, config).context("invalid pathfinder configuration")
    }
}

fn resolve_ref(grid: &Grid, reference: &NodeRef) -> Result<NodeId> {
    match reference {
        NodeRef::Index(index) => {
            let id = NodeId(*index);
            if !grid.contains(id) {
                bail!("Unknown node index {index}");
            }
            Ok(id)
        }
        NodeRef::Name(name) => grid
            .node_id_by_name(name)
            .ok_or_else(|| anyhow!("Unknown node '{name}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilepath_lib::SearchStrategy;

    const SCENE: &str = r#"{
        "config": { "strategy": "best-first", "probe": { "probe_length": 6.0 } },
        "nodes": [
            { "name": "a", "position": [0, 0, 0], "extents": [0.5, 0.1, 0.5], "link": 2 },
            { "position": [1, 0, 0], "extents": [0.5, 0.1, 0.5], "terrain_cost": 2.5, "occupant": 4 },
            { "name": "c", "position": [9, 0, 0], "extents": [0.5, 0.1, 0.5], "link": "a" }
        ]
    }"#;

    #[test]
    fn builds_grid_links_and_occupants() {
        let scene = Scene::from_json(SCENE).unwrap();
        let grid = &scene.grid;

        assert_eq!(grid.len(), 3);
        assert_eq!(grid.node(NodeId(0)).unwrap().link(), Some(NodeId(2)));
        assert_eq!(grid.node(NodeId(2)).unwrap().link(), Some(NodeId(0)));
        assert_eq!(grid.node(NodeId(1)).unwrap().occupant(), Some(MoverId(4)));
        assert_eq!(grid.node(NodeId(1)).unwrap().terrain_cost(), 2.5);
        assert_eq!(scene.config.strategy, SearchStrategy::BestFirst);
        assert_eq!(scene.config.probe.probe_length, 6.0);
        assert_eq!(scene.config.probe.probe_count, 8);
    }

    #[test]
    fn resolves_names_before_indices() {
        let scene = Scene::from_json(SCENE).unwrap();
        assert_eq!(scene.resolve("c").unwrap(), NodeId(2));
        assert_eq!(scene.resolve("1").unwrap(), NodeId(1));
        assert!(scene.resolve("7").is_err());
        assert!(scene.resolve("nowhere").is_err());
        assert_eq!(scene.label(NodeId(1)), "#1");
        assert_eq!(scene.label(NodeId(2)), "c");
    }

    #[test]
    fn rejects_dangling_links_and_negative_costs() {
        let dangling = r#"{ "nodes": [ { "position": [0, 0, 0], "link": "ghost" } ] }"#;
        assert!(Scene::from_json(dangling).is_err());

        let negative = r#"{ "nodes": [ { "position": [0, 0, 0], "terrain_cost": -1 } ] }"#;
        assert!(Scene::from_json(negative).is_err());
    }

    #[test]
    fn rejects_a_mover_placed_twice() {
        let twice = r#"{ "nodes": [
            { "position": [0, 0, 0], "occupant": 5 },
            { "position": [1, 0, 0], "occupant": 5 }
        ] }"#;
        let err = Scene::from_json(twice).unwrap_err();
        assert!(format!("{err:#}").contains("already stands on node #0"));
    }
}
