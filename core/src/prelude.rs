use serde::{Deserialize, Serialize};

/// Label reserved for points that belong to no dense region.
pub const NOISE: ClusterLabel = -1;

/// Per-point cluster tag, positionally aligned with the point set it came from.
pub type ClusterLabel = i32;

/// Ordered point collection; index `i` in one frame lines up with index `i`
/// in another only when both frames have the same length.
pub type PointSet = Vec<Point>;

/// Cartesian point in the sensor frame, origin at the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance_sq(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned danger-zone rectangle, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Zone {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    #[inline]
    pub fn contains(&self, point: &Point) -> bool {
        self.x_min <= point.x
            && point.x <= self.x_max
            && self.y_min <= point.y
            && point.y <= self.y_max
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [self.x_min, self.x_max, self.y_min, self.y_max]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.x_min > self.x_max || self.y_min > self.y_max {
            return Err(ConfigError::InvalidZone(*self));
        }
        Ok(())
    }
}

impl Default for Zone {
    fn default() -> Self {
        Self::new(500.0, 1500.0, -500.0, 500.0)
    }
}

/// Neighbor lookup used by the cluster engine. Every strategy yields the
/// same labels; only the cost differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NeighborSearch {
    #[default]
    Auto,
    BruteForce,
    Grid,
}

/// Construction-time configuration shared by every processing stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub quality_min: u8,
    pub cluster_eps: f64,
    pub cluster_min_points: usize,
    pub window_size: usize,
    pub zone: Zone,
    /// Cluster the temporally smoothed frame instead of the raw one.
    pub smoothing: bool,
    pub neighbor_search: NeighborSearch,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            quality_min: 3,
            cluster_eps: 200.0,
            cluster_min_points: 6,
            window_size: 3,
            zone: Zone::default(),
            smoothing: true,
            neighbor_search: NeighborSearch::Auto,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cluster_eps.is_finite() && self.cluster_eps > 0.0) {
            return Err(ConfigError::InvalidRadius(self.cluster_eps));
        }
        if self.cluster_min_points == 0 {
            return Err(ConfigError::ZeroMinPoints);
        }
        if self.window_size == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        self.zone.validate()
    }
}

/// Per-cycle conditions. These never escape the pipeline; they collapse into
/// an empty frame report.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum StageError {
    #[error("no usable measurements in scan")]
    NoUsableData,
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("frame shape mismatch: {0}")]
    ShapeMismatch(String),
}

pub type StageResult<T> = Result<T, StageError>;

/// Misconfiguration detected before a pipeline is built.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("clustering radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
    #[error("minimum cluster size must be at least one point")]
    ZeroMinPoints,
    #[error("smoothing window must hold at least one frame")]
    ZeroWindow,
    #[error("zone bounds are inverted or not finite: {0:?}")]
    InvalidZone(Zone),
}

/// A single step of the scan pipeline.
pub trait ProcessingStage<I> {
    type Output;

    fn execute(&mut self, input: I) -> StageResult<Self::Output>;

    /// Drops any state carried between cycles.
    fn cleanup(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.quality_min, 3);
        assert_eq!(config.cluster_min_points, 6);
        assert_eq!(config.window_size, 3);
    }

    #[test]
    fn config_rejects_bad_radius_and_window() {
        let config = PipelineConfig {
            cluster_eps: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidRadius(0.0)));

        let config = PipelineConfig {
            cluster_eps: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRadius(_))
        ));

        let config = PipelineConfig {
            window_size: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroWindow));

        let config = PipelineConfig {
            cluster_min_points: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroMinPoints));
    }

    #[test]
    fn zone_rejects_inverted_bounds() {
        let zone = Zone::new(1500.0, 500.0, -500.0, 500.0);
        assert_eq!(zone.validate(), Err(ConfigError::InvalidZone(zone)));
        assert!(Zone::new(0.0, 0.0, 0.0, 0.0).validate().is_ok());
    }

    #[test]
    fn zone_bounds_are_inclusive() {
        let zone = Zone::default();
        assert!(zone.contains(&Point::new(500.0, -500.0)));
        assert!(zone.contains(&Point::new(1500.0, 500.0)));
        assert!(!zone.contains(&Point::new(1500.1, 0.0)));
    }
}
