use crate::prelude::{ClusterLabel, Point, Zone, NOISE};

/// True if any clustered (non-noise) point lies inside `zone`.
///
/// Only the common prefix of `points` and `labels` is inspected.
pub fn in_danger_zone(points: &[Point], labels: &[ClusterLabel], zone: &Zone) -> bool {
    points
        .iter()
        .zip(labels)
        .any(|(point, &label)| label != NOISE && zone.contains(point))
}

/// Labels of the clusters that reach into `zone`, ascending.
pub fn intruding_clusters(
    points: &[Point],
    labels: &[ClusterLabel],
    zone: &Zone,
) -> Vec<ClusterLabel> {
    let mut hits: Vec<ClusterLabel> = points
        .iter()
        .zip(labels)
        .filter(|&(point, &label)| label != NOISE && zone.contains(point))
        .map(|(_, &label)| label)
        .collect();
    hits.sort_unstable();
    hits.dedup();
    hits
}
