use serde::{Deserialize, Serialize};
use zonecore::prelude::{ClusterLabel, Zone};
use zonecore::sensor_interface::FrameReport;

/// Plot extent around the sensor, in millimeters.
pub const DISPLAY_RANGE_MM: f64 = 4000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
    pub label: ClusterLabel,
}

/// What the presentation layer draws for one frame: clustered points only,
/// the zone outline and the alarm state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationModel {
    pub frame: usize,
    pub points: Vec<PlotPoint>,
    pub cluster_count: usize,
    pub alarm: bool,
    pub smoothed: bool,
    pub zone: Zone,
    pub display_range_mm: f64,
}

impl VisualizationModel {
    pub fn new(zone: Zone) -> Self {
        Self {
            frame: 0,
            points: Vec::new(),
            cluster_count: 0,
            alarm: false,
            smoothed: false,
            zone,
            display_range_mm: DISPLAY_RANGE_MM,
        }
    }

    /// Applies `report`. A report without data leaves the previous points
    /// on screen and only clears the alarm.
    pub fn update(&mut self, frame: usize, report: &FrameReport) {
        self.frame = frame;
        self.alarm = report.alarm;
        if report.has_data() {
            self.points = report
                .clustered_points()
                .map(|(x, y, label)| PlotPoint { x, y, label })
                .collect();
            self.cluster_count = report.cluster_count;
            self.smoothed = report.smoothed;
        }
    }
}

impl Default for VisualizationModel {
    fn default() -> Self {
        Self::new(Zone::default())
    }
}
