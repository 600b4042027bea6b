use ndarray::{stack, Axis};

use crate::math::stats::StatsHelper;
use crate::prelude::{Point, PointSet, ProcessingStage, StageError, StageResult};
use crate::processing::frame_history::FrameHistory;
use crate::telemetry::log::LogManager;

/// Temporal median filter over the last `window` frames.
///
/// Smoothing is positional: index `i` of the output is the per-axis median of
/// index `i` across the window. A frame whose length differs from the held
/// frames cannot be aligned with them, so it clears the history and starts a
/// new warm-up.
pub struct FrameSmoother {
    history: FrameHistory,
    logger: LogManager,
}

impl FrameSmoother {
    pub fn new(window_size: usize) -> Self {
        Self {
            history: FrameHistory::with_capacity(window_size),
            logger: LogManager::new("smoother"),
        }
    }

    pub fn window_size(&self) -> usize {
        self.history.capacity()
    }

    /// Frames currently held.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// True once the window is full and pushes yield smoothed frames.
    pub fn is_warm(&self) -> bool {
        self.history.is_full()
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Records `points` and returns the smoothed frame, or `None` while the
    /// window is still filling.
    pub fn push_and_smooth(&mut self, points: &[Point]) -> Option<PointSet> {
        match self.execute(points) {
            Ok(smoothed) => smoothed,
            Err(err) => {
                self.logger.trace(&format!("smoothing skipped: {}", err));
                None
            }
        }
    }

    fn median_frame(&self) -> StageResult<PointSet> {
        let views = self.history.views();
        let stacked =
            stack(Axis(0), &views[..]).map_err(|err| StageError::ShapeMismatch(err.to_string()))?;
        let median = stacked.map_axis(Axis(0), |lane| {
            let mut samples = lane.to_vec();
            StatsHelper::median(&mut samples)
        });
        Ok(median
            .rows()
            .into_iter()
            .map(|row| Point::new(row[0], row[1]))
            .collect())
    }
}

impl<'a> ProcessingStage<&'a [Point]> for FrameSmoother {
    type Output = Option<PointSet>;

    fn execute(&mut self, points: &'a [Point]) -> StageResult<Option<PointSet>> {
        if let Some(held) = self.history.frame_len() {
            if held != points.len() {
                self.logger.trace(&format!(
                    "frame length changed {} -> {}, restarting window",
                    held,
                    points.len()
                ));
                self.history.clear();
            }
        }

        self.history.push(points);
        if !self.history.is_full() {
            return Ok(None);
        }
        self.median_frame().map(Some)
    }

    fn cleanup(&mut self) {
        self.reset();
    }
}
