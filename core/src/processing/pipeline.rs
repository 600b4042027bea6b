use crate::prelude::{ClusterLabel, ConfigError, PipelineConfig, Point, ProcessingStage, Zone};
use crate::processing::cluster::{cluster_count, ClusterEngine};
use crate::processing::preprocess::ScanPreprocessor;
use crate::processing::smoother::FrameSmoother;
use crate::processing::zone::intruding_clusters;
use crate::sensor_interface::{FrameReport, Measurement};
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::{MetricsRecorder, MetricsSnapshot};

/// Per-scan orchestration: preprocess, smooth, cluster, evaluate the zone.
///
/// One pipeline owns one smoothing history; feed it scans from a single
/// sensor, in order.
pub struct Pipeline {
    config: PipelineConfig,
    preprocessor: ScanPreprocessor,
    smoother: FrameSmoother,
    engine: ClusterEngine,
    metrics: MetricsRecorder,
    logger: LogManager,
    alarm_active: bool,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let logger = LogManager::new("pipeline");
        logger.record(&format!(
            "quality>={} eps={} min_points={} window={} smoothing={} zone={:?}",
            config.quality_min,
            config.cluster_eps,
            config.cluster_min_points,
            config.window_size,
            config.smoothing,
            config.zone
        ));
        Ok(Self {
            preprocessor: ScanPreprocessor::new(config.quality_min),
            smoother: FrameSmoother::new(config.window_size),
            engine: ClusterEngine::from_config(&config),
            metrics: MetricsRecorder::new(),
            logger,
            alarm_active: false,
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Processes one scan against the configured danger zone.
    pub fn process_scan(&mut self, scan: &[Measurement]) -> FrameReport {
        let zone = self.config.zone;
        self.process(scan, &zone)
    }

    /// Processes one scan against `zone`. Never fails: a scan without usable
    /// data yields an empty, non-alarming report.
    pub fn process(&mut self, scan: &[Measurement], zone: &Zone) -> FrameReport {
        self.metrics.record_processed();

        let raw = match self.preprocessor.execute(scan) {
            Ok(points) => points,
            Err(err) => {
                self.metrics.record_empty();
                self.logger.trace(&format!("no usable data: {}", err));
                return FrameReport::empty();
            }
        };

        let (points, smoothed) = self.select_frame(raw);
        if smoothed {
            self.metrics.record_smoothed();
        }

        let labels = self.engine.label(&points);

        let intruders = intruding_clusters(&points, &labels, zone);
        let alarm = !intruders.is_empty();
        self.track_alarm(alarm, &intruders);

        FrameReport {
            cluster_count: cluster_count(&labels),
            points: Some(points),
            labels: Some(labels),
            alarm,
            smoothed,
        }
    }

    /// Drops the smoothing history, e.g. after the sensor reconnects.
    pub fn reset(&mut self) {
        self.smoother.cleanup();
        self.alarm_active = false;
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Picks the frame to cluster: the window median once the smoother is
    /// warm, the raw frame otherwise or when smoothing is off.
    fn select_frame(&mut self, raw: Vec<Point>) -> (Vec<Point>, bool) {
        if !self.config.smoothing {
            return (raw, false);
        }
        match self.smoother.push_and_smooth(&raw) {
            Some(smoothed) => (smoothed, true),
            None => (raw, false),
        }
    }

    fn track_alarm(&mut self, alarm: bool, intruders: &[ClusterLabel]) {
        if alarm {
            self.metrics.record_alarm();
            if !self.alarm_active {
                self.logger.alert(&format!(
                    "object inside danger zone (clusters {:?})",
                    intruders
                ));
            }
        } else if self.alarm_active {
            self.logger.record("danger zone clear");
        }
        self.alarm_active = alarm;
    }
}
