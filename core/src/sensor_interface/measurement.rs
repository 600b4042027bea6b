use serde::{Deserialize, Serialize};

/// One polar range return as delivered by the sensor transport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub quality: u8,
    /// Bearing in degrees, nominally in `[0, 360)`.
    pub angle_deg: f64,
    /// Range in millimeters; zero means no return.
    pub distance_mm: f64,
}

impl Measurement {
    pub fn new(quality: u8, angle_deg: f64, distance_mm: f64) -> Self {
        Self {
            quality,
            angle_deg,
            distance_mm,
        }
    }

    /// A return worth converting: a real echo at or above the quality floor.
    #[inline]
    pub fn is_usable(&self, quality_min: u8) -> bool {
        self.distance_mm > 0.0 && self.quality >= quality_min
    }
}

impl From<(u8, f64, f64)> for Measurement {
    fn from((quality, angle_deg, distance_mm): (u8, f64, f64)) -> Self {
        Self::new(quality, angle_deg, distance_mm)
    }
}

/// One full or partial sweep, in acquisition order.
pub type Scan = Vec<Measurement>;
