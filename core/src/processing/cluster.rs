//! Density-based clustering of a single frame.
//!
//! A point is a *core* point when at least `min_points` points (itself
//! included) lie within `eps` of it. Core points within `eps` of each other
//! are density-connected; connectivity is transitive, so each connected
//! component of the core graph becomes one cluster. A non-core point within
//! `eps` of some core point is a *border* point. When core points of several
//! clusters reach it, it joins the lowest-numbered one. Everything else is
//! noise.
//!
//! # Algorithm
//!
//! 1. **Neighborhoods**: radius query per point, either brute force or via a
//!    uniform grid with cell size `eps`. Both return ascending indices, so the
//!    labels never depend on the search strategy.
//! 2. **Core points**: neighborhood size `>= min_points`.
//! 3. **Connectivity**: union-find over core-core neighbor pairs.
//! 4. **Labels**: clusters are numbered `0, 1, ...` in order of their
//!    lowest-index core point; border points follow; the rest get [`NOISE`].

use crate::math::grid::{PointGrid, MIN_POINTS_FOR_GRID};
use crate::math::union_find::UnionFind;
use crate::prelude::{
    ClusterLabel, NeighborSearch, PipelineConfig, Point, ProcessingStage, StageResult, NOISE,
};
use crate::telemetry::log::LogManager;

/// Clusters `points` with an automatically chosen neighbor search.
///
/// Returns one label per input point, in input order.
pub fn cluster(points: &[Point], eps: f64, min_points: usize) -> Vec<ClusterLabel> {
    cluster_with(points, eps, min_points, NeighborSearch::Auto)
}

/// Clusters `points` using the given neighbor search strategy.
pub fn cluster_with(
    points: &[Point],
    eps: f64,
    min_points: usize,
    search: NeighborSearch,
) -> Vec<ClusterLabel> {
    let n = points.len();
    if n == 0 {
        return Vec::new();
    }

    let eps = eps.max(0.0);
    let neighbors = neighborhoods(points, eps, resolve_search(search, n, eps));

    let is_core: Vec<bool> = neighbors
        .iter()
        .map(|neigh| neigh.len() >= min_points)
        .collect();

    let mut uf = UnionFind::new(n);
    for i in (0..n).filter(|&i| is_core[i]) {
        for &j in neighbors[i].iter().filter(|&&j| j > i && is_core[j]) {
            uf.union(i, j);
        }
    }

    // Roots are point indices, so a flat table maps them to cluster ids.
    let mut root_label = vec![NOISE; n];
    let mut next_label: ClusterLabel = 0;
    let mut labels = vec![NOISE; n];

    for i in (0..n).filter(|&i| is_core[i]) {
        let root = uf.find(i);
        if root_label[root] == NOISE {
            root_label[root] = next_label;
            next_label += 1;
        }
        labels[i] = root_label[root];
    }

    // Lowest label wins: that cluster is the first one whose expansion
    // reaches the border point.
    for i in (0..n).filter(|&i| !is_core[i]) {
        if let Some(label) = neighbors[i]
            .iter()
            .filter(|&&j| is_core[j])
            .map(|&j| root_label[uf.find(j)])
            .min()
        {
            labels[i] = label;
        }
    }

    labels
}

/// Number of distinct clusters in a label sequence, noise excluded.
pub fn cluster_count(labels: &[ClusterLabel]) -> usize {
    let mut ids: Vec<ClusterLabel> = labels.iter().copied().filter(|&l| l != NOISE).collect();
    ids.sort_unstable();
    ids.dedup();
    ids.len()
}

fn resolve_search(search: NeighborSearch, n: usize, eps: f64) -> NeighborSearch {
    let grid_usable = eps.is_finite() && eps > 0.0;
    match search {
        NeighborSearch::Grid if grid_usable => NeighborSearch::Grid,
        NeighborSearch::Auto if grid_usable && n >= MIN_POINTS_FOR_GRID => NeighborSearch::Grid,
        _ => NeighborSearch::BruteForce,
    }
}

fn neighborhoods(points: &[Point], eps: f64, search: NeighborSearch) -> Vec<Vec<usize>> {
    match search {
        NeighborSearch::Grid => {
            let grid = PointGrid::build(points, eps);
            (0..points.len()).map(|i| grid.within(i, eps)).collect()
        }
        _ => {
            let eps_sq = eps * eps;
            points
                .iter()
                .map(|p| {
                    points
                        .iter()
                        .enumerate()
                        .filter(|(_, q)| p.distance_sq(q) <= eps_sq)
                        .map(|(j, _)| j)
                        .collect()
                })
                .collect()
        }
    }
}

/// Clustering stage with radius and density threshold fixed at construction.
pub struct ClusterEngine {
    eps: f64,
    min_points: usize,
    search: NeighborSearch,
    logger: LogManager,
}

impl ClusterEngine {
    pub fn new(eps: f64, min_points: usize, search: NeighborSearch) -> Self {
        Self {
            eps,
            min_points,
            search,
            logger: LogManager::new("cluster"),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            config.cluster_eps,
            config.cluster_min_points,
            config.neighbor_search,
        )
    }

    pub fn eps(&self) -> f64 {
        self.eps
    }

    pub fn min_points(&self) -> usize {
        self.min_points
    }

    /// Labels one frame. Clustering has no failure mode; the stage impl only
    /// wraps this in `Ok`.
    pub fn label(&mut self, points: &[Point]) -> Vec<ClusterLabel> {
        let labels = cluster_with(points, self.eps, self.min_points, self.search);
        let noise = labels.iter().filter(|&&l| l == NOISE).count();
        self.logger.trace(&format!(
            "{} points -> {} clusters, {} noise",
            points.len(),
            cluster_count(&labels),
            noise
        ));
        labels
    }
}

impl<'a> ProcessingStage<&'a [Point]> for ClusterEngine {
    type Output = Vec<ClusterLabel>;

    fn execute(&mut self, points: &'a [Point]) -> StageResult<Vec<ClusterLabel>> {
        Ok(self.label(points))
    }
}
