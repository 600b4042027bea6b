use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use zonecore::sensor_interface::{Measurement, Scan};

/// Synthetic room seen by a rotating range sensor: a circular wall and one
/// round target sweeping back and forth along a straight path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub samples_per_scan: usize,
    pub room_radius_mm: f64,
    pub range_noise_mm: f64,
    /// Chance that a bearing produces no return at all.
    pub dropout_rate: f64,
    /// Chance that a return is reported with a quality below 3.
    pub low_quality_rate: f64,
    pub target_radius_mm: f64,
    pub target_start_mm: [f64; 2],
    pub target_end_mm: [f64; 2],
    /// Scans needed for the target to travel from start to end.
    pub frames_per_pass: usize,
    pub quality: u8,
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            samples_per_scan: 360,
            room_radius_mm: 3500.0,
            range_noise_mm: 5.0,
            dropout_rate: 0.0,
            low_quality_rate: 0.0,
            target_radius_mm: 150.0,
            target_start_mm: [1000.0, -2500.0],
            target_end_mm: [1000.0, 2500.0],
            frames_per_pass: 40,
            quality: 15,
            seed: 0,
        }
    }
}

impl SceneConfig {
    fn normalized_samples(&self) -> usize {
        self.samples_per_scan.max(1)
    }

    fn normalized_pass(&self) -> usize {
        self.frames_per_pass.max(1)
    }
}

/// Deterministic scan source driven by a seeded RNG.
pub struct ScanGenerator {
    config: SceneConfig,
    rng: StdRng,
    frame: usize,
}

impl ScanGenerator {
    pub fn new(config: SceneConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            frame: 0,
        }
    }

    /// Target center at `frame`; the target walks start→end, then back.
    pub fn target_position(&self, frame: usize) -> [f64; 2] {
        let pass = self.config.normalized_pass();
        let phase = frame % (2 * pass);
        let t = if phase <= pass {
            phase as f64 / pass as f64
        } else {
            (2 * pass - phase) as f64 / pass as f64
        };
        let [sx, sy] = self.config.target_start_mm;
        let [ex, ey] = self.config.target_end_mm;
        [sx + (ex - sx) * t, sy + (ey - sy) * t]
    }

    pub fn next_scan(&mut self) -> Scan {
        let samples = self.config.normalized_samples();
        let target = self.target_position(self.frame);
        let step = 360.0 / samples as f64;

        let mut scan = Scan::with_capacity(samples);
        for k in 0..samples {
            if self.config.dropout_rate > 0.0
                && self.rng.gen_bool(self.config.dropout_rate.min(1.0))
            {
                continue;
            }
            let angle_deg = k as f64 * step;
            let true_range = self.range_at(angle_deg, target);
            let noise = if self.config.range_noise_mm > 0.0 {
                self.rng
                    .gen_range(-self.config.range_noise_mm..self.config.range_noise_mm)
            } else {
                0.0
            };
            let quality = if self.config.low_quality_rate > 0.0
                && self.rng.gen_bool(self.config.low_quality_rate.min(1.0))
            {
                self.rng.gen_range(0..3)
            } else {
                self.config.quality
            };
            scan.push(Measurement::new(
                quality,
                angle_deg,
                (true_range + noise).max(0.0),
            ));
        }

        self.frame += 1;
        scan
    }

    /// First hit along the ray at `angle_deg`: the target disc or the wall.
    fn range_at(&self, angle_deg: f64, target: [f64; 2]) -> f64 {
        let wall = self.config.room_radius_mm;
        let theta = angle_deg.to_radians();
        let (dx, dy) = (theta.cos(), theta.sin());
        let along = dx * target[0] + dy * target[1];
        let center_sq = target[0] * target[0] + target[1] * target[1];
        let radius = self.config.target_radius_mm;
        let disc = along * along - (center_sq - radius * radius);
        if disc < 0.0 {
            return wall;
        }
        let hit = along - disc.sqrt();
        if hit > 0.0 && hit < wall {
            hit
        } else {
            wall
        }
    }
}

impl Iterator for ScanGenerator {
    type Item = Scan;

    fn next(&mut self) -> Option<Scan> {
        Some(self.next_scan())
    }
}
