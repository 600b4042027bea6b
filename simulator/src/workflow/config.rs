use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use zonecore::prelude::PipelineConfig;

use crate::generator::scene::SceneConfig;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub pipeline: PipelineConfig,
    pub scene: SceneConfig,
    /// Scans to process in an offline run.
    pub frames: usize,
    /// Period between generated scans when serving.
    pub frame_interval_ms: u64,
    /// Scans with fewer measurements are discarded before processing.
    pub min_scan_len: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            scene: SceneConfig::default(),
            frames: 100,
            frame_interval_ms: 100,
            min_scan_len: 50,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        quality_min: u8,
        cluster_eps: f64,
        cluster_min_points: usize,
        window_size: usize,
        smoothing: bool,
    ) -> Self {
        Self {
            pipeline: PipelineConfig {
                quality_min,
                cluster_eps,
                cluster_min_points,
                window_size,
                smoothing,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.pipeline
            .validate()
            .context("invalid pipeline configuration")?;
        Ok(())
    }
}
