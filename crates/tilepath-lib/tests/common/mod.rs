#![allow(dead_code)]

use tilepath_lib::{
    Extents, Grid, GridNode, LayerMask, Pathfinder, PathfinderConfig, Position, SurfaceIndex,
};

/// Half-size of every fixture tile: 1.0 wide, 0.2 tall, 1.0 deep.
pub const TILE: Extents = Extents::new(0.5, 0.1, 0.5);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Three tiles in a row along +x (nodes 0..=2), followed by three isolated
/// tiles far away (nodes 3..=5).
pub fn line_with_islands() -> Grid {
    let mut grid = Grid::new();
    for x in [0.0, 1.0, 2.0, 20.0, 40.0, 60.0] {
        grid.add_node(GridNode::new(Position::new(x, 0.0, 0.0), TILE))
            .expect("fixture node");
    }
    grid
}

/// `width` x `depth` block of unit tiles; node `z * width + x` sits at `(x, 0, z)`.
pub fn block(width: usize, depth: usize) -> Grid {
    let mut grid = Grid::new();
    for z in 0..depth {
        for x in 0..width {
            grid.add_node(
                GridNode::new(Position::new(x as f64, 0.0, z as f64), TILE)
                    .with_name(format!("t{x}_{z}")),
            )
            .expect("fixture node");
        }
    }
    grid
}

pub fn pathfinder(grid: &Grid, config: PathfinderConfig) -> Pathfinder<SurfaceIndex> {
    let index = SurfaceIndex::from_grid(grid, LayerMask::TILES);
    Pathfinder::new(index, config).expect("valid config")
}
