use std::fmt::Write;

use serde::Serialize;

use crate::config::SearchStrategy;
use crate::error::{Error, Result};
use crate::geometry::Position;
use crate::graph::EdgeKind;
use crate::grid::{Grid, NodeId};
use crate::path::Path;

/// Output format accepted by [`RouteSummary::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteOutputFormat {
    #[default]
    Text,
    Json,
}

/// How a step of a route was entered.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepMethod {
    Origin,
    Spatial,
    Link,
}

impl StepMethod {
    fn label(self) -> &'static str {
        match self {
            StepMethod::Origin => "start",
            StepMethod::Spatial => "walk",
            StepMethod::Link => "link",
        }
    }
}

impl From<Option<EdgeKind>> for StepMethod {
    fn from(via: Option<EdgeKind>) -> Self {
        match via {
            None => StepMethod::Origin,
            Some(EdgeKind::Spatial) => StepMethod::Spatial,
            Some(EdgeKind::Link) => StepMethod::Link,
        }
    }
}

/// Step taken during traversal of a route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteStepSummary {
    pub index: usize,
    pub node: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub position: Position,
    pub terrain_cost: f64,
    pub cumulative_cost: f64,
    pub method: StepMethod,
}

impl RouteStepSummary {
    fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.node.to_string(),
        }
    }
}

/// Structured representation of a route that consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub strategy: SearchStrategy,
    pub hops: usize,
    pub links: usize,
    pub total_cost: f64,
    pub steps: Vec<RouteStepSummary>,
}

impl RouteSummary {
    /// Convert a [`Path`] into a summary with node names and positions
    /// resolved against `grid`.
    pub fn from_path(grid: &Grid, path: &Path, strategy: SearchStrategy) -> Result<Self> {
        if path.is_empty() {
            return Err(Error::EmptyPath);
        }

        let steps = path
            .iter()
            .enumerate()
            .map(|(index, step)| {
                let node = grid.node(step.node)?;
                Ok(RouteStepSummary {
                    index,
                    node: step.node,
                    name: node.name().map(str::to_string),
                    position: node.position(),
                    terrain_cost: node.terrain_cost(),
                    cumulative_cost: step.cost_from_origin,
                    method: step.via.into(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            strategy,
            hops: path.hop_count(),
            links: path.link_count(),
            total_cost: path.total_cost(),
            steps,
        })
    }

    pub fn start(&self) -> &RouteStepSummary {
        &self.steps[0]
    }

    pub fn goal(&self) -> &RouteStepSummary {
        &self.steps[self.steps.len() - 1]
    }

    /// Render the summary in the requested format.
    pub fn render(&self, format: RouteOutputFormat) -> Result<String> {
        match format {
            RouteOutputFormat::Text => Ok(self.render_plain()),
            RouteOutputFormat::Json => self.to_json(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|err| Error::Serialization {
            message: err.to_string(),
        })
    }

    pub fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Route: {} -> {} ({} hops, {} links, cost {:.2}, strategy: {})",
            self.start().display_name(),
            self.goal().display_name(),
            self.hops,
            self.links,
            self.total_cost,
            self.strategy
        );
        for step in &self.steps {
            let _ = writeln!(
                buffer,
                "{:>3}: {} [{}] at ({:.2}, {:.2}, {:.2}) cost {:.2}",
                step.index,
                step.display_name(),
                step.method.label(),
                step.position.x,
                step.position.y,
                step.position.z,
                step.cumulative_cost
            );
        }
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Extents;
    use crate::grid::GridNode;
    use crate::path::PathStep;

    fn grid() -> Grid {
        let mut grid = Grid::new();
        let tile = Extents::new(0.5, 0.1, 0.5);
        grid.add_node(GridNode::new(Position::new(0.0, 0.0, 0.0), tile).with_name("gate"))
            .unwrap();
        grid.add_node(GridNode::new(Position::new(1.0, 0.0, 0.0), tile).with_terrain_cost(2.0))
            .unwrap();
        grid.add_node(GridNode::new(Position::new(5.0, 3.0, 0.0), tile).with_name("roof"))
            .unwrap();
        grid
    }

    fn path() -> Path {
        Path::from_steps(vec![
            PathStep {
                node: NodeId(0),
                cost_from_origin: 0.0,
                via: None,
            },
            PathStep {
                node: NodeId(1),
                cost_from_origin: 3.0,
                via: Some(EdgeKind::Spatial),
            },
            PathStep {
                node: NodeId(2),
                cost_from_origin: 4.0,
                via: Some(EdgeKind::Link),
            },
        ])
        .unwrap()
    }

    #[test]
    fn summary_resolves_names_and_costs() {
        let summary = RouteSummary::from_path(&grid(), &path(), SearchStrategy::Dijkstra).unwrap();

        assert_eq!(summary.hops, 2);
        assert_eq!(summary.links, 1);
        assert_eq!(summary.total_cost, 4.0);
        assert_eq!(summary.start().name.as_deref(), Some("gate"));
        assert_eq!(summary.goal().name.as_deref(), Some("roof"));
        assert_eq!(summary.steps[1].name, None);
        assert_eq!(summary.steps[1].terrain_cost, 2.0);
        assert_eq!(summary.steps[0].method, StepMethod::Origin);
        assert_eq!(summary.steps[2].method, StepMethod::Link);
    }

    #[test]
    fn plain_rendering_lists_every_step() {
        let summary = RouteSummary::from_path(&grid(), &path(), SearchStrategy::BestFirst).unwrap();
        let text = summary.render(RouteOutputFormat::Text).unwrap();

        assert!(text.starts_with("Route: gate -> roof (2 hops, 1 links, cost 4.00, strategy: best-first)"));
        assert!(text.contains("  1: #1 [walk]"));
        assert!(text.contains("  2: roof [link] at (5.00, 3.00, 0.00) cost 4.00"));
    }

    #[test]
    fn json_rendering_uses_snake_case_methods() {
        let summary = RouteSummary::from_path(&grid(), &path(), SearchStrategy::Dijkstra).unwrap();
        let json = summary.render(RouteOutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["strategy"], "dijkstra");
        assert_eq!(value["steps"][2]["method"], "link");
        assert_eq!(value["steps"][0]["position"]["x"], 0.0);
        assert!(value["steps"][1].get("name").is_none());
    }

    #[test]
    fn unknown_nodes_fail_summary() {
        let mut small = Grid::new();
        small
            .add_node(GridNode::new(Position::ORIGIN, Extents::new(0.5, 0.1, 0.5)))
            .unwrap();
        assert!(matches!(
            RouteSummary::from_path(&small, &path(), SearchStrategy::Dijkstra),
            Err(Error::UnknownNode { .. })
        ));
    }
}
