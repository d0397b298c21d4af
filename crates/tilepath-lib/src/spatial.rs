//! Downward surface probing backed by a KD-tree.
//!
//! Neighbour discovery never inspects the grid's layout directly. It asks a
//! [`SurfaceProbe`] what lies beneath a point, exactly like a game host would
//! ask its physics engine for a raycast. [`SurfaceIndex`] is the bundled
//! implementation: a 2-D KD-tree over surface centres on the horizontal plane,
//! refined by exact footprint, layer and height checks.
//!
//! # Hit rules
//!
//! A ray starting at `origin` and travelling `length` units down hits a
//! surface when:
//!
//! - `(origin.x, origin.z)` lies inside the surface footprint
//! - the surface's layers intersect the probe mask
//! - the surface top (`center.y + extents.y`) lies in `[origin.y - length, origin.y]`
//!
//! The highest qualifying surface wins; ties resolve to the lowest collider id.

use std::collections::HashMap;

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use tracing::{info, warn};

use crate::config::LayerMask;
use crate::geometry::{Extents, Position};
use crate::grid::{ColliderId, Grid};

/// KD-tree bucket size (kiddo default).
const BUCKET_SIZE: usize = 32;

/// Extra search radius so footprint borders are never missed.
const RADIUS_SLACK: f64 = 1e-3;

/// Per-item offset applied to tree keys. kiddo panics when more than
/// `BUCKET_SIZE` items share a value on one axis, which every tile row does.
const KEY_OFFSET_STEP: f64 = 1e-7;

/// A vertical probe pointing straight down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DownwardRay {
    pub origin: Position,
    pub length: f64,
}

/// Result of a successful probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    pub collider: ColliderId,
    /// Distance travelled from the ray origin to the surface.
    pub distance: f64,
    pub point: Position,
}

/// Anything that can answer "what traversable surface lies below this point".
pub trait SurfaceProbe {
    fn cast_down(&self, ray: &DownwardRay, mask: LayerMask) -> Option<ProbeHit>;
}

impl<P: SurfaceProbe + ?Sized> SurfaceProbe for &P {
    fn cast_down(&self, ray: &DownwardRay, mask: LayerMask) -> Option<ProbeHit> {
        (**self).cast_down(ray, mask)
    }
}

/// Axis-aligned box a probe can land on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub collider: ColliderId,
    pub center: Position,
    pub extents: Extents,
    pub layers: LayerMask,
}

impl Surface {
    pub fn top(&self) -> f64 {
        self.center.y + self.extents.y
    }
}

/// Precomputed spatial index of probe-able surfaces.
pub struct SurfaceIndex {
    /// KD-tree over offset (x, z) centres. Items index into `surfaces`.
    tree: KdTree<f64, usize, 2, BUCKET_SIZE, u32>,
    surfaces: Vec<Surface>,
    /// Largest horizontal radius of any surface; bounds the tree query.
    reach: f64,
    /// Largest key offset applied so far.
    key_offset: f64,
    by_collider: HashMap<ColliderId, usize>,
}

impl SurfaceIndex {
    /// Build an index from explicit surfaces.
    pub fn build(surfaces: impl IntoIterator<Item = Surface>) -> Self {
        let mut index = Self {
            tree: KdTree::new(),
            surfaces: Vec::new(),
            reach: 0.0,
            key_offset: 0.0,
            by_collider: HashMap::new(),
        };

        for surface in surfaces {
            index.insert(surface);
        }

        info!(
            surface_count = index.surfaces.len(),
            reach = index.reach,
            "built surface index"
        );
        index
    }

    /// Build one surface per collider bound in `grid`.
    ///
    /// Surfaces take the owning node's position and extents. Nodes without
    /// extents have nothing to land on and are skipped.
    pub fn from_grid(grid: &Grid, layers: LayerMask) -> Self {
        let mut surfaces = Vec::new();
        for (collider, node_id) in grid.colliders() {
            let Ok(node) = grid.node(node_id) else {
                continue;
            };
            let Some(extents) = node.extents() else {
                warn!(node = %node_id, %collider, "node has no extents; not indexed");
                continue;
            };
            surfaces.push(Surface {
                collider,
                center: node.position(),
                extents,
                layers,
            });
        }
        Self::build(surfaces)
    }

    fn insert(&mut self, surface: Surface) {
        let index = self.surfaces.len();
        let offset = index as f64 * KEY_OFFSET_STEP;
        let [x, z] = horizontal_coords(&surface.center);
        self.tree.add(&[x + offset, z + offset], index);
        self.key_offset = offset;
        self.reach = self.reach.max(surface.extents.horizontal_radius());
        if self.by_collider.insert(surface.collider, index).is_some() {
            warn!(collider = %surface.collider, "duplicate collider in surface index");
        }
        self.surfaces.push(surface);
    }

    /// Number of indexed surfaces.
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn surface(&self, collider: ColliderId) -> Option<&Surface> {
        self.by_collider
            .get(&collider)
            .map(|&index| &self.surfaces[index])
    }
}

impl SurfaceProbe for SurfaceIndex {
    fn cast_down(&self, ray: &DownwardRay, mask: LayerMask) -> Option<ProbeHit> {
        if self.surfaces.is_empty() || ray.length < 0.0 {
            return None;
        }

        let radius = self.reach + self.key_offset * std::f64::consts::SQRT_2 + RADIUS_SLACK;
        let candidates = self
            .tree
            .within::<SquaredEuclidean>(&horizontal_coords(&ray.origin), radius * radius);

        candidates
            .into_iter()
            .filter_map(|neighbour| {
                let surface = &self.surfaces[neighbour.item];
                if !surface.layers.intersects(mask) {
                    return None;
                }
                let dx = ray.origin.x - surface.center.x;
                let dz = ray.origin.z - surface.center.z;
                if !surface.extents.contains_horizontal(dx, dz) {
                    return None;
                }
                let drop = ray.origin.y - surface.top();
                if drop < 0.0 || drop > ray.length {
                    return None;
                }
                Some(ProbeHit {
                    collider: surface.collider,
                    distance: drop,
                    point: ray.origin.with_y(surface.top()),
                })
            })
            .min_by(|a, b| {
                a.distance
                    .total_cmp(&b.distance)
                    .then_with(|| a.collider.cmp(&b.collider))
            })
    }
}

impl std::fmt::Debug for SurfaceIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceIndex")
            .field("surface_count", &self.surfaces.len())
            .field("reach", &self.reach)
            .finish()
    }
}

fn horizontal_coords(position: &Position) -> [f64; 2] {
    [position.x, position.z]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(id: u64, x: f64, y: f64, z: f64) -> Surface {
        Surface {
            collider: ColliderId(id),
            center: Position::new(x, y, z),
            extents: Extents::new(0.5, 0.1, 0.5),
            layers: LayerMask::TILES,
        }
    }

    fn ray(x: f64, y: f64, z: f64, length: f64) -> DownwardRay {
        DownwardRay {
            origin: Position::new(x, y, z),
            length,
        }
    }

    #[test]
    fn empty_index_never_hits() {
        let index = SurfaceIndex::build(Vec::new());
        assert!(index.is_empty());
        assert!(index.cast_down(&ray(0.0, 1.0, 0.0, 4.0), LayerMask::ALL).is_none());
    }

    #[test]
    fn ray_hits_surface_below_it() {
        let index = SurfaceIndex::build(vec![tile(1, 0.0, 0.0, 0.0), tile(2, 1.0, 0.0, 0.0)]);

        let hit = index
            .cast_down(&ray(1.2, 1.0, 0.3, 4.0), LayerMask::TILES)
            .expect("surface below");
        assert_eq!(hit.collider, ColliderId(2));
        assert!((hit.distance - 0.9).abs() < 1e-9);
        assert!((hit.point.y - 0.1).abs() < 1e-9);
    }

    #[test]
    fn ray_misses_outside_footprint_and_length() {
        let index = SurfaceIndex::build(vec![tile(1, 0.0, 0.0, 0.0)]);

        assert!(index.cast_down(&ray(0.6, 1.0, 0.0, 4.0), LayerMask::TILES).is_none());
        assert!(index.cast_down(&ray(0.0, 10.0, 0.0, 4.0), LayerMask::TILES).is_none());
        // Surfaces above the ray origin are never hit.
        assert!(index.cast_down(&ray(0.0, -1.0, 0.0, 4.0), LayerMask::TILES).is_none());
    }

    #[test]
    fn mask_filters_layers() {
        let mut ladder = tile(5, 0.0, 0.0, 0.0);
        ladder.layers = LayerMask::layer(4).unwrap();
        let index = SurfaceIndex::build(vec![ladder]);

        assert!(index.cast_down(&ray(0.0, 1.0, 0.0, 4.0), LayerMask::TILES).is_none());
        assert!(index
            .cast_down(&ray(0.0, 1.0, 0.0, 4.0), LayerMask::layer(4).unwrap())
            .is_some());
    }

    #[test]
    fn highest_surface_wins() {
        let index = SurfaceIndex::build(vec![tile(1, 0.0, -2.0, 0.0), tile(2, 0.0, 0.0, 0.0)]);
        let hit = index
            .cast_down(&ray(0.0, 1.0, 0.0, 4.0), LayerMask::TILES)
            .expect("stacked surfaces");
        assert_eq!(hit.collider, ColliderId(2));
    }

    #[test]
    fn long_rows_sharing_a_coordinate_are_indexed() {
        let surfaces = (0..200).map(|i| tile(i, i as f64, 0.0, 0.0));
        let index = SurfaceIndex::build(surfaces);

        assert_eq!(index.len(), 200);
        let hit = index
            .cast_down(&ray(150.3, 1.0, 0.0, 4.0), LayerMask::TILES)
            .expect("tile in the row");
        assert_eq!(hit.collider, ColliderId(150));
    }

    #[test]
    fn from_grid_skips_nodes_without_extents() {
        use crate::grid::GridNode;

        let mut grid = Grid::new();
        grid.add_node(GridNode::new(
            Position::new(0.0, 0.0, 0.0),
            Extents::new(0.5, 0.1, 0.5),
        ))
        .unwrap();
        grid.add_node(GridNode::without_extents(Position::new(3.0, 0.0, 0.0)))
            .unwrap();

        let index = SurfaceIndex::from_grid(&grid, LayerMask::TILES);
        assert_eq!(index.len(), 1);
        assert!(index.surface(ColliderId(0)).is_some());
        assert!(index.surface(ColliderId(1)).is_none());
    }
}
