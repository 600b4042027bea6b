//! Uniform-grid spatial index over a point set.
//!
//! With the cell size equal to the query radius, every neighbor of a point
//! lies in the 3×3 block of cells around it, so a radius query touches a
//! handful of buckets instead of the whole frame.

use std::collections::HashMap;

use crate::prelude::Point;

/// Below this many points a brute-force scan beats building the grid.
pub const MIN_POINTS_FOR_GRID: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct CellCoord {
    x: i64,
    y: i64,
}

impl CellCoord {
    #[inline]
    fn of(point: &Point, inv_cell_size: f64) -> Self {
        Self {
            x: (point.x * inv_cell_size).floor() as i64,
            y: (point.y * inv_cell_size).floor() as i64,
        }
    }

    #[inline]
    fn block(self) -> impl Iterator<Item = CellCoord> {
        (-1..=1).flat_map(move |dx| {
            (-1..=1).map(move |dy| CellCoord {
                x: self.x.saturating_add(dx),
                y: self.y.saturating_add(dy),
            })
        })
    }
}

/// Buckets point indices by grid cell for fixed-radius neighbor queries.
#[derive(Clone, Debug)]
pub struct PointGrid<'a> {
    points: &'a [Point],
    inv_cell_size: f64,
    cells: HashMap<CellCoord, Vec<usize>>,
}

impl<'a> PointGrid<'a> {
    /// Indexes `points` with square cells of side `cell_size` (must be > 0).
    pub fn build(points: &'a [Point], cell_size: f64) -> Self {
        let inv_cell_size = 1.0 / cell_size;
        let mut cells: HashMap<CellCoord, Vec<usize>> = HashMap::new();
        for (idx, point) in points.iter().enumerate() {
            cells
                .entry(CellCoord::of(point, inv_cell_size))
                .or_default()
                .push(idx);
        }
        Self {
            points,
            inv_cell_size,
            cells,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Indices of all points within `radius` of point `idx` (itself
    /// included), ascending. `radius` must not exceed the cell size.
    pub fn within(&self, idx: usize, radius: f64) -> Vec<usize> {
        let origin = &self.points[idx];
        let radius_sq = radius * radius;
        let mut found: Vec<usize> = CellCoord::of(origin, self.inv_cell_size)
            .block()
            .filter_map(|cell| self.cells.get(&cell))
            .flatten()
            .copied()
            .filter(|&j| origin.distance_sq(&self.points[j]) <= radius_sq)
            .collect();
        found.sort_unstable();
        found
    }
}
