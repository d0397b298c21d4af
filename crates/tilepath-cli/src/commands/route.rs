//! Route command handler for computing paths between scene tiles.

use std::path::Path;

use anyhow::{bail, Context, Result};

use tilepath_lib::{RouteSummary, SearchStrategy, TracingObserver};

use crate::output::OutputFormat;
use crate::scene::Scene;

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Starting node name or index.
    pub from: String,
    /// Destination node name or index.
    pub to: String,
    /// Overrides the strategy from the scene configuration.
    pub strategy: Option<SearchStrategy>,
    pub format: OutputFormat,
}

/// Handle the route subcommand: load the scene, search, print the summary.
pub fn handle_route_command(scene_path: &Path, args: &RouteCommandArgs) -> Result<()> {
    let scene = Scene::load(scene_path)?;
    let text = plan_route(&scene, args)?;
    print!("{text}");
    Ok(())
}

/// Run the search and render the result without printing it.
pub fn plan_route(scene: &Scene, args: &RouteCommandArgs) -> Result<String> {
    let origin = scene.resolve(&args.from)?;
    let destination = scene.resolve(&args.to)?;

    let mut config = scene.config.clone();
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    let pathfinder = scene.pathfinder(config)?;

    let found = pathfinder
        .find_path_observed(&scene.grid, origin, destination, &mut TracingObserver)
        .with_context(|| format!("failed to plan route from '{}' to '{}'", args.from, args.to))?;
    let Some(path) = found else {
        bail!(
            "No route found from '{}' to '{}'. The destination may be occupied or unreachable.",
            scene.label(origin),
            scene.label(destination)
        );
    };

    let summary = RouteSummary::from_path(&scene.grid, &path, pathfinder.strategy())?;
    let mut rendered = summary.render(args.format.into())?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"{
        "nodes": [
            { "name": "start", "position": [0, 0, 0], "extents": [0.5, 0.1, 0.5] },
            { "position": [1, 0, 0], "extents": [0.5, 0.1, 0.5] },
            { "name": "end", "position": [2, 0, 0], "extents": [0.5, 0.1, 0.5] },
            { "name": "far", "position": [50, 0, 0], "extents": [0.5, 0.1, 0.5] }
        ]
    }"#;

    fn args(from: &str, to: &str) -> RouteCommandArgs {
        RouteCommandArgs {
            from: from.to_string(),
            to: to.to_string(),
            strategy: None,
            format: OutputFormat::Text,
        }
    }

    #[test]
    fn renders_text_route() {
        let scene = Scene::from_json(SCENE).unwrap();
        let text = plan_route(&scene, &args("start", "end")).unwrap();
        assert!(text.starts_with("Route: start -> end (2 hops"));
        assert!(text.contains("strategy: dijkstra"));
    }

    #[test]
    fn unreachable_destination_is_reported_by_name() {
        let scene = Scene::from_json(SCENE).unwrap();
        let err = plan_route(&scene, &args("start", "far")).unwrap_err();
        assert!(err.to_string().contains("No route found from 'start' to 'far'"));
    }
}
