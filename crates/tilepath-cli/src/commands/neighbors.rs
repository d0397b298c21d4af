//! Neighbors command handler: lists the one-step moves from a tile.

use std::fmt::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use tilepath_lib::{EdgeKind, NodeId};

use crate::output::OutputFormat;
use crate::scene::Scene;

#[derive(Debug, Serialize)]
struct NeighborRow {
    node: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    kind: EdgeKind,
}

/// Handle the neighbors subcommand.
pub fn handle_neighbors_command(scene_path: &Path, node: &str, format: OutputFormat) -> Result<()> {
    let scene = Scene::load(scene_path)?;
    let text = list_neighbors(&scene, node, format)?;
    print!("{text}");
    Ok(())
}

pub fn list_neighbors(scene: &Scene, node: &str, format: OutputFormat) -> Result<String> {
    let id = scene.resolve(node)?;
    let pathfinder = scene.pathfinder(scene.config.clone())?;
    let edges = pathfinder
        .neighbors(&scene.grid, id)
        .with_context(|| format!("failed to resolve neighbours of '{node}'"))?;

    let rows = edges
        .iter()
        .map(|edge| NeighborRow {
            node: edge.target,
            name: scene
                .grid
                .node(edge.target)
                .ok()
                .and_then(|target| target.name())
                .map(str::to_string),
            kind: edge.kind,
        })
        .collect::<Vec<_>>();

    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&rows)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Text => {
            let mut buffer = String::new();
            let _ = writeln!(buffer, "Neighbours of {} ({}):", scene.label(id), rows.len());
            for row in &rows {
                let kind = match row.kind {
                    EdgeKind::Spatial => "spatial",
                    EdgeKind::Link => "link",
                };
                let _ = writeln!(buffer, "- {} [{kind}]", scene.label(row.node));
            }
            Ok(buffer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"{
        "nodes": [
            { "name": "hub", "position": [0, 0, 0], "extents": [0.5, 0.1, 0.5], "link": "roof" },
            { "position": [1, 0, 0], "extents": [0.5, 0.1, 0.5] },
            { "position": [0, 0, 1], "extents": [0.5, 0.1, 0.5], "occupant": 1 },
            { "name": "roof", "position": [0, 6, 20], "extents": [0.5, 0.1, 0.5] }
        ]
    }"#;

    #[test]
    fn lists_spatial_and_link_neighbours() {
        let scene = Scene::from_json(SCENE).unwrap();
        let text = list_neighbors(&scene, "hub", OutputFormat::Text).unwrap();

        assert!(text.starts_with("Neighbours of hub (2):"));
        assert!(text.contains("- #1 [spatial]"));
        assert!(text.contains("- roof [link]"));
        assert!(!text.contains("#2"));
    }

    #[test]
    fn json_rows_carry_edge_kind() {
        let scene = Scene::from_json(SCENE).unwrap();
        let json = list_neighbors(&scene, "0", OutputFormat::Json).unwrap();
        let rows: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(rows.as_array().map(Vec::len), Some(2));
        assert_eq!(rows[1]["kind"], "link");
        assert_eq!(rows[1]["name"], "roof");
    }
}
