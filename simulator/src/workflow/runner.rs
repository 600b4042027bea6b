use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use log::{debug, warn};
use zonecore::processing::Pipeline;
use zonecore::sensor_interface::{FrameReport, Measurement, Scan};

/// Outcome of an offline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: usize,
    pub skipped: usize,
    pub empty: usize,
    pub smoothed: usize,
    pub alarm_frames: usize,
    pub first_alarm: Option<usize>,
}

/// Feeds scans through one pipeline, discarding truncated sweeps.
pub struct Runner {
    pipeline: Pipeline,
    min_scan_len: usize,
    frames_seen: usize,
}

impl Runner {
    pub fn new(config: &WorkflowConfig) -> anyhow::Result<Self> {
        let pipeline = Pipeline::new(config.pipeline.clone()).context("building scan pipeline")?;
        Ok(Self {
            pipeline,
            min_scan_len: config.min_scan_len,
            frames_seen: 0,
        })
    }

    pub fn frames_seen(&self) -> usize {
        self.frames_seen
    }

    /// Processes one scan. Returns `None` when the scan is too short to be a
    /// full sweep.
    pub fn step(&mut self, scan: &[Measurement]) -> Option<FrameReport> {
        let frame = self.frames_seen;
        self.frames_seen += 1;
        if scan.len() < self.min_scan_len {
            debug!(
                "frame {}: discarding short scan ({} < {})",
                frame,
                scan.len(),
                self.min_scan_len
            );
            return None;
        }

        let report = self.pipeline.process_scan(scan);
        if report.alarm {
            warn!("ALARM: moving object inside danger zone (frame {})", frame);
        }
        Some(report)
    }

    pub fn execute<I>(&mut self, scans: I, frames: usize) -> RunSummary
    where
        I: IntoIterator<Item = Scan>,
    {
        let mut summary = RunSummary::default();
        for scan in scans.into_iter().take(frames) {
            let frame = summary.frames;
            summary.frames += 1;
            match self.step(&scan) {
                None => summary.skipped += 1,
                Some(report) => {
                    if !report.has_data() {
                        summary.empty += 1;
                    }
                    if report.smoothed {
                        summary.smoothed += 1;
                    }
                    if report.alarm {
                        summary.alarm_frames += 1;
                        summary.first_alarm.get_or_insert(frame);
                    }
                }
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::scene::{ScanGenerator, SceneConfig};

    #[test]
    fn runner_detects_target_crossing_zone() {
        let cfg = WorkflowConfig::default();
        let mut runner = Runner::new(&cfg).unwrap();
        let generator = ScanGenerator::new(cfg.scene.clone());
        let summary = runner.execute(generator, 40);

        assert_eq!(summary.frames, 40);
        assert_eq!(summary.skipped, 0);
        assert!(summary.alarm_frames > 0);
        // Target starts 2.5m off axis and reaches the zone mid-pass.
        let first = summary.first_alarm.unwrap();
        assert!(first > 5 && first < 20, "first alarm at {}", first);
        assert!(summary.alarm_frames < 40);
    }

    #[test]
    fn runner_stays_quiet_when_target_misses_zone() {
        let mut cfg = WorkflowConfig::default();
        cfg.scene = SceneConfig {
            target_start_mm: [-1000.0, -2500.0],
            target_end_mm: [-1000.0, 2500.0],
            ..Default::default()
        };
        let mut runner = Runner::new(&cfg).unwrap();
        let summary = runner.execute(ScanGenerator::new(cfg.scene.clone()), 40);
        assert_eq!(summary.alarm_frames, 0);
        assert_eq!(summary.first_alarm, None);
    }

    #[test]
    fn runner_discards_short_scans() {
        let cfg = WorkflowConfig {
            min_scan_len: 10,
            ..Default::default()
        };
        let mut runner = Runner::new(&cfg).unwrap();
        let short = vec![Measurement::new(15, 0.0, 1000.0); 3];
        assert!(runner.step(&short).is_none());
        assert_eq!(runner.frames_seen(), 1);

        let summary = runner.execute(vec![short.clone(), short], 5);
        assert_eq!(summary.frames, 2);
        assert_eq!(summary.skipped, 2);
    }

    #[test]
    fn runner_counts_empty_frames() {
        let cfg = WorkflowConfig {
            min_scan_len: 1,
            ..Default::default()
        };
        let mut runner = Runner::new(&cfg).unwrap();
        let unusable = vec![Measurement::new(0, 0.0, 1000.0); 4];
        let summary = runner.execute(vec![unusable], 1);
        assert_eq!(summary.empty, 1);
        assert_eq!(summary.alarm_frames, 0);
    }

    #[test]
    fn invalid_pipeline_config_fails_runner_construction() {
        let mut cfg = WorkflowConfig::default();
        cfg.pipeline.cluster_eps = -1.0;
        assert!(Runner::new(&cfg).is_err());
    }
}
