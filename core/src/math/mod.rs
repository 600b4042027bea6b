pub mod geometry;
pub mod grid;
pub mod stats;
pub mod union_find;

pub use geometry::GeometryHelper;
pub use grid::PointGrid;
pub use stats::StatsHelper;
pub use union_find::UnionFind;
