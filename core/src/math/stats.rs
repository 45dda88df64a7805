use ndarray::ArrayView2;
use num_complex::Complex32;

pub struct StatsHelper;

impl StatsHelper {
    /// Linearly interpolated percentile of `values`, `q` in [0, 100].
    ///
    /// Returns 0.0 for an empty input so callers can threshold uniformly.
    pub fn percentile(values: &[f32], q: f64) -> f32 {
        if values.is_empty() {
            return 0.0;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let rank = q.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = rank.ceil() as usize;
        if lower == upper {
            return sorted[lower];
        }
        let weight = (rank - lower as f64) as f32;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }

    /// Index of the maximum-magnitude cell of a complex window, or `None`
    /// when the window has zero area.
    pub fn argmax_magnitude(window: ArrayView2<'_, Complex32>) -> Option<(usize, usize)> {
        let mut best: Option<((usize, usize), f32)> = None;
        for ((row, col), value) in window.indexed_iter() {
            let mag = value.norm();
            match best {
                Some((_, peak)) if peak >= mag => {}
                _ => best = Some(((row, col), mag)),
            }
        }
        best.map(|(idx, _)| idx)
    }
}
