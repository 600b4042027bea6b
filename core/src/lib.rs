//! Scan-processing core for a rotating range sensor danger-zone monitor.
//!
//! Each scan flows through quality filtering, polar-to-Cartesian transform,
//! temporal median smoothing, density clustering and a rectangle test. The
//! result is one [`FrameReport`] per scan for the presentation layer.

pub mod math;
pub mod prelude;
pub mod processing;
pub mod sensor_interface;
pub mod telemetry;

pub use prelude::{
    ClusterLabel, ConfigError, NeighborSearch, PipelineConfig, Point, PointSet, ProcessingStage,
    StageError, Zone, NOISE,
};
pub use processing::Pipeline;
pub use sensor_interface::{FrameReport, Measurement, Scan};
