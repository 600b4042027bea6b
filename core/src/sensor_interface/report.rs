use serde::{Deserialize, Serialize};

use crate::prelude::{ClusterLabel, PointSet, NOISE};

/// Output record published once per processed scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    /// The point set that was clustered, if the scan had usable data.
    pub points: Option<PointSet>,
    pub labels: Option<Vec<ClusterLabel>>,
    pub alarm: bool,
    /// Whether `points` is the median of a full smoothing window.
    pub smoothed: bool,
    pub cluster_count: usize,
}

impl FrameReport {
    /// Report for a cycle that produced no usable points.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_data(&self) -> bool {
        self.points.is_some()
    }

    /// Iterates the points that belong to a cluster, with their label.
    pub fn clustered_points(&self) -> impl Iterator<Item = (f64, f64, ClusterLabel)> + '_ {
        let points = self.points.as_deref().unwrap_or_default();
        let labels = self.labels.as_deref().unwrap_or_default();
        points
            .iter()
            .zip(labels.iter())
            .filter(|&(_, &label)| label != NOISE)
            .map(|(p, &label)| (p.x, p.y, label))
    }
}
