use log::{debug, info, warn};

/// Thin wrapper over the `log` facade that tags records with the emitting
/// stage.
pub struct LogManager {
    stage: &'static str,
}

impl LogManager {
    pub fn new(stage: &'static str) -> Self {
        Self { stage }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.stage, message);
    }

    pub fn trace(&self, message: &str) {
        debug!("[{}] {}", self.stage, message);
    }

    pub fn alert(&self, message: &str) {
        warn!("[{}] {}", self.stage, message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("pipeline")
    }
}
