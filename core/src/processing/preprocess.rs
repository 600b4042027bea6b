use crate::math::geometry::GeometryHelper;
use crate::prelude::{PointSet, ProcessingStage, StageError, StageResult};
use crate::sensor_interface::Measurement;
use crate::telemetry::log::LogManager;

/// Quality/range filter followed by the polar-to-Cartesian transform.
pub struct ScanPreprocessor {
    quality_min: u8,
    logger: LogManager,
}

impl ScanPreprocessor {
    pub fn new(quality_min: u8) -> Self {
        Self {
            quality_min,
            logger: LogManager::new("preprocess"),
        }
    }

    pub fn quality_min(&self) -> u8 {
        self.quality_min
    }
}

/// Filters and converts one scan.
///
/// Returns `NoUsableData` when nothing survives the filter and
/// `MalformedInput` when a surviving measurement cannot be transformed.
pub fn convert_scan(scan: &[Measurement], quality_min: u8) -> StageResult<PointSet> {
    let mut points = PointSet::with_capacity(scan.len());
    for (idx, measurement) in scan.iter().enumerate() {
        if !measurement.is_usable(quality_min) {
            continue;
        }
        if !measurement.angle_deg.is_finite() || !measurement.distance_mm.is_finite() {
            return Err(StageError::MalformedInput(format!(
                "measurement {} has angle {} and distance {}",
                idx, measurement.angle_deg, measurement.distance_mm
            )));
        }
        let point =
            GeometryHelper::polar_to_cartesian(measurement.angle_deg, measurement.distance_mm);
        if !point.is_finite() {
            return Err(StageError::MalformedInput(format!(
                "measurement {} produced a non-finite point",
                idx
            )));
        }
        points.push(point);
    }

    if points.is_empty() {
        return Err(StageError::NoUsableData);
    }
    Ok(points)
}

/// Pure form of the preprocessing stage: any per-scan failure is reported
/// as "no data this cycle".
pub fn preprocess(scan: &[Measurement], quality_min: u8) -> Option<PointSet> {
    convert_scan(scan, quality_min).ok()
}

impl<'a> ProcessingStage<&'a [Measurement]> for ScanPreprocessor {
    type Output = PointSet;

    fn execute(&mut self, scan: &'a [Measurement]) -> StageResult<PointSet> {
        let result = convert_scan(scan, self.quality_min);
        match &result {
            Ok(points) => self.logger.trace(&format!(
                "kept {} of {} measurements",
                points.len(),
                scan.len()
            )),
            Err(err) => self.logger.trace(&format!("dropping scan: {}", err)),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn preprocess_filters_quality_and_distance() {
        let scan = vec![
            Measurement::new(15, 0.0, 1000.0),
            Measurement::new(2, 45.0, 1000.0),
            Measurement::new(15, 90.0, 0.0),
            Measurement::new(3, 90.0, 1000.0),
        ];
        let points = preprocess(&scan, 3).unwrap();
        assert_eq!(points.len(), 2);
        assert!((points[0].x - 1000.0).abs() < TOL && points[0].y.abs() < TOL);
        assert!(points[1].x.abs() < TOL && (points[1].y - 1000.0).abs() < TOL);
    }

    #[test]
    fn preprocess_returns_none_without_survivors() {
        let scan = vec![
            Measurement::new(0, 10.0, 500.0),
            Measurement::new(20, 20.0, 0.0),
        ];
        assert!(preprocess(&scan, 3).is_none());
        assert!(preprocess(&[], 3).is_none());
        assert_eq!(convert_scan(&scan, 3), Err(StageError::NoUsableData));
    }

    #[test]
    fn preprocess_rejects_negative_distances() {
        let scan: Vec<Measurement> = (0..4)
            .map(|i| Measurement::new(15, i as f64 * 90.0, -1000.0))
            .collect();
        assert!(preprocess(&scan, 3).is_none());
        assert_eq!(convert_scan(&scan, 3), Err(StageError::NoUsableData));
    }

    #[test]
    fn preprocess_keeps_only_positive_distances() {
        let scan = vec![
            Measurement::new(15, 0.0, -1000.0),
            Measurement::new(15, 90.0, 500.0),
            Measurement::new(15, 180.0, -0.5),
            Measurement::new(15, 270.0, 750.0),
        ];
        let points = preprocess(&scan, 3).unwrap();
        assert_eq!(points.len(), 2);
        assert!(points[0].x.abs() < TOL && (points[0].y - 500.0).abs() < TOL);
        assert!(points[1].x.abs() < TOL && (points[1].y + 750.0).abs() < TOL);
    }

    #[test]
    fn preprocess_absorbs_malformed_measurements() {
        let scan = vec![
            Measurement::new(15, 0.0, 1000.0),
            Measurement::new(15, f64::NAN, 1000.0),
        ];
        assert!(preprocess(&scan, 3).is_none());
        assert!(matches!(
            convert_scan(&scan, 3),
            Err(StageError::MalformedInput(_))
        ));

        let scan = vec![Measurement::new(15, 10.0, f64::INFINITY)];
        assert!(preprocess(&scan, 3).is_none());
    }

    #[test]
    fn preprocess_keeps_scan_order() {
        let scan: Vec<Measurement> = (0..4)
            .map(|i| Measurement::new(10, i as f64 * 90.0, 100.0 + i as f64))
            .collect();
        let points = preprocess(&scan, 3).unwrap();
        assert_eq!(points.len(), 4);
        assert!(points[2].x < 0.0);
        assert!(points[3].y < 0.0);
    }

    #[test]
    fn stage_execute_matches_pure_function() {
        let mut stage = ScanPreprocessor::new(5);
        let scan = vec![
            Measurement::new(4, 0.0, 1000.0),
            Measurement::new(5, 180.0, 200.0),
        ];
        let points = stage.execute(scan.as_slice()).unwrap();
        assert_eq!(Some(points), preprocess(&scan, 5));
        assert_eq!(stage.quality_min(), 5);
    }
}
