use std::sync::Mutex;

/// Per-pipeline frame counters.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub processed: usize,
    pub empty: usize,
    pub smoothed: usize,
    pub alarms: usize,
}

#[derive(Default)]
struct Metrics {
    processed: usize,
    empty: usize,
    smoothed: usize,
    alarms: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_processed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.processed += 1;
        }
    }

    pub fn record_empty(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.empty += 1;
        }
    }

    pub fn record_smoothed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.smoothed += 1;
        }
    }

    pub fn record_alarm(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.alarms += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            MetricsSnapshot {
                processed: metrics.processed,
                empty: metrics.empty,
                smoothed: metrics.smoothed,
                alarms: metrics.alarms,
            }
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_count_each_event() {
        let metrics = MetricsRecorder::new();
        metrics.record_processed();
        metrics.record_processed();
        metrics.record_empty();
        metrics.record_alarm();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.processed, 2);
        assert_eq!(snapshot.empty, 1);
        assert_eq!(snapshot.smoothed, 0);
        assert_eq!(snapshot.alarms, 1);
    }
}
