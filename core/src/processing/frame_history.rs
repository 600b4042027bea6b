use ndarray::{Array2, ArrayView2};

use crate::prelude::Point;

/// Fixed-capacity ring of recent frames, each held as an `n × 2` array.
///
/// Once the ring is full a new frame overwrites the oldest slot in place, so
/// steady-state operation with a constant point count does not reallocate.
pub struct FrameHistory {
    slots: Vec<Array2<f64>>,
    capacity: usize,
    cursor: usize,
}

impl FrameHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    /// Point count shared by the held frames.
    pub fn frame_len(&self) -> Option<usize> {
        self.slots.first().map(|slot| slot.nrows())
    }

    /// Appends a frame, evicting the oldest one when the ring is full.
    pub fn push(&mut self, points: &[Point]) {
        if self.slots.len() < self.capacity {
            self.slots.push(frame_to_array(points));
        } else {
            let slot = &mut self.slots[self.cursor];
            if slot.nrows() == points.len() {
                for (mut row, point) in slot.rows_mut().into_iter().zip(points) {
                    row[0] = point.x;
                    row[1] = point.y;
                }
            } else {
                *slot = frame_to_array(points);
            }
        }
        self.cursor = (self.cursor + 1) % self.capacity;
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.cursor = 0;
    }

    /// Views of the held frames, in slot order.
    pub fn views(&self) -> Vec<ArrayView2<'_, f64>> {
        self.slots.iter().map(|slot| slot.view()).collect()
    }
}

fn frame_to_array(points: &[Point]) -> Array2<f64> {
    Array2::from_shape_fn((points.len(), 2), |(i, axis)| {
        if axis == 0 {
            points[i].x
        } else {
            points[i].y
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(x: f64) -> Vec<Point> {
        vec![Point::new(x, 0.0), Point::new(x, 1.0)]
    }

    #[test]
    fn history_evicts_oldest_frame() {
        let mut history = FrameHistory::with_capacity(2);
        assert!(history.is_empty());
        history.push(&frame(1.0));
        history.push(&frame(2.0));
        assert!(history.is_full());
        history.push(&frame(3.0));
        assert_eq!(history.len(), 2);

        let mut firsts: Vec<f64> = history.views().iter().map(|v| v[[0, 0]]).collect();
        firsts.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(firsts, vec![2.0, 3.0]);
    }

    #[test]
    fn history_clear_resets_cursor() {
        let mut history = FrameHistory::with_capacity(3);
        history.push(&frame(1.0));
        history.push(&frame(2.0));
        history.clear();
        assert_eq!(history.frame_len(), None);
        history.push(&[Point::new(5.0, 5.0)]);
        assert_eq!(history.frame_len(), Some(1));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut history = FrameHistory::with_capacity(0);
        assert_eq!(history.capacity(), 1);
        history.push(&frame(1.0));
        history.push(&frame(2.0));
        assert_eq!(history.len(), 1);
        assert_eq!(history.views()[0][[1, 0]], 2.0);
    }
}
