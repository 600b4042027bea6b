pub struct StatsHelper;

impl StatsHelper {
    /// Median of `samples`, reordering them in place. Even-length input
    /// yields the mean of the two middle values.
    pub fn median(samples: &mut [f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.sort_unstable_by(|a, b| a.total_cmp(b));
        let mid = samples.len() / 2;
        if samples.len() % 2 == 0 {
            (samples[mid - 1] + samples[mid]) / 2.0
        } else {
            samples[mid]
        }
    }
}
