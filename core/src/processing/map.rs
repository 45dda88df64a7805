use crate::math::StatsHelper;
use crate::prelude::{BatchError, BatchResult};
use crate::processing::mtd::DopplerSpectrum;
use ndarray::{Array1, Array2, Array3, Axis};

/// Columns zeroed before the zero-Doppler column.
const NOTCH_BEFORE: usize = 4;
/// Columns zeroed from the zero-Doppler column onward.
const NOTCH_AFTER: usize = 3;

/// Single-channel magnitude map over the retained velocity band.
#[derive(Debug, Clone)]
pub struct RangeDopplerMap {
    /// Magnitudes, shape (31, kept_bins, 1).
    pub data: Array3<f32>,
    /// Velocity per kept Doppler column in m/s.
    pub velocity: Array1<f64>,
}

/// Turns a centered Doppler spectrum into the emitted magnitude map:
/// velocity-band crop, ground-clutter notch, adaptive noise floor.
pub struct MapBuilder {
    velocity_limit: f64,
    noise_percentile: f64,
}

impl MapBuilder {
    pub fn new(velocity_limit: f64, noise_percentile: f64) -> Self {
        Self {
            velocity_limit,
            noise_percentile,
        }
    }

    /// Builds one map. The caller guarantees the velocity axis carries an
    /// exact zero column inside the band; its absence is a structural batch
    /// failure, not a frame skip.
    pub fn build(&self, spectrum: &DopplerSpectrum) -> BatchResult<RangeDopplerMap> {
        let kept: Vec<usize> = spectrum
            .velocity
            .iter()
            .enumerate()
            .filter(|(_, v)| v.abs() < self.velocity_limit)
            .map(|(col, _)| col)
            .collect();

        let gates = spectrum.data.nrows();
        let mut magnitude = Array2::<f32>::zeros((gates, kept.len()));
        for (out_col, &src_col) in kept.iter().enumerate() {
            for gate in 0..gates {
                magnitude[[gate, out_col]] = spectrum.data[[gate, src_col]].norm();
            }
        }
        let velocity = Array1::from_iter(kept.iter().map(|&col| spectrum.velocity[col]));

        let zero_col = velocity
            .iter()
            .position(|&v| v == 0.0)
            .ok_or(BatchError::MissingZeroDoppler)?;
        let notch_start = zero_col.saturating_sub(NOTCH_BEFORE);
        let notch_end = (zero_col + NOTCH_AFTER).min(velocity.len());
        for col in notch_start..notch_end {
            for gate in 0..gates {
                magnitude[[gate, col]] = 0.0;
            }
        }

        let cells: Vec<f32> = magnitude.iter().copied().collect();
        let floor = StatsHelper::percentile(&cells, self.noise_percentile);
        magnitude.mapv_inplace(|v| if v < floor { 0.0 } else { v });

        Ok(RangeDopplerMap {
            data: magnitude.insert_axis(Axis(2)),
            velocity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use num_complex::Complex32;

    fn spectrum(prt_num: usize, delta_v: f64) -> DopplerSpectrum {
        let half = (prt_num / 2) as i64;
        let velocity =
            Array1::from_iter((0..prt_num).map(|i| (i as i64 - half) as f64 * delta_v));
        let data = Array2::from_shape_fn((4, prt_num), |(gate, col)| {
            Complex32::new((gate * prt_num + col) as f32 + 1.0, 0.0)
        });
        DopplerSpectrum {
            data,
            velocity,
            delta_v,
        }
    }

    #[test]
    fn keeps_only_the_velocity_band() {
        // Velocities -160..150 step 10; |v| < 56 keeps -50..50, 11 columns.
        let builder = MapBuilder::new(56.0, 0.0);
        let map = builder.build(&spectrum(32, 10.0)).unwrap();
        assert_eq!(map.data.shape(), &[4, 11, 1]);
        assert_eq!(map.velocity.len(), 11);
        assert_eq!(map.velocity[0], -50.0);
        assert_eq!(map.velocity[10], 50.0);
    }

    #[test]
    fn notches_exactly_seven_columns_around_zero_doppler() {
        let builder = MapBuilder::new(56.0, 0.0);
        let map = builder.build(&spectrum(32, 10.0)).unwrap();
        let zero_col = 5;
        for gate in 0..4 {
            for col in 0..11 {
                let notched = col >= zero_col - 4 && col < zero_col + 3;
                let value = map.data[[gate, col, 0]];
                if notched {
                    assert_eq!(value, 0.0, "column {col} must be notched");
                } else {
                    assert!(value > 0.0, "column {col} must survive");
                }
            }
        }
    }

    #[test]
    fn noise_floor_zeroes_everything_below_the_percentile() {
        // 223 kept columns, so the 28 notched zeros sit below the 5th
        // percentile and the floor lands inside the positive population.
        let prt_num = 1000;
        let builder = MapBuilder::new(56.0, 5.0);
        let map = builder.build(&spectrum(prt_num, 0.5)).unwrap();
        assert_eq!(map.data.shape(), &[4, 223, 1]);

        // Reconstruct the post-notch population the builder thresholds on.
        let mut expected = Vec::new();
        for gate in 0..4 {
            for kept in 0..223 {
                let src = 389 + kept; // |(src - 500) * 0.5| < 56
                let notched = (107..114).contains(&kept);
                let value = if notched {
                    0.0
                } else {
                    (gate * prt_num + src) as f32 + 1.0
                };
                expected.push(value);
            }
        }
        let floor = StatsHelper::percentile(&expected, 5.0);
        assert!(floor > 0.0);

        for (cell, raw) in map.data.iter().zip(&expected) {
            let suppressed = if *raw < floor { 0.0 } else { *raw };
            assert_eq!(*cell, suppressed);
        }
    }

    #[test]
    fn notch_clamps_at_the_band_edge() {
        // delta_v 50 keeps only |v| < 56: columns at -50, 0, 50.
        let builder = MapBuilder::new(56.0, 0.0);
        let map = builder.build(&spectrum(8, 50.0)).unwrap();
        assert_eq!(map.data.shape(), &[4, 3, 1]);
        // Zero column is index 1; the notch covers the whole short band.
        assert!(map.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn missing_zero_velocity_column_is_structural() {
        let mut spec = spectrum(32, 10.0);
        spec.velocity.mapv_inplace(|v| v + 1.0);
        let builder = MapBuilder::new(56.0, 5.0);
        assert!(matches!(
            builder.build(&spec),
            Err(BatchError::MissingZeroDoppler)
        ));
    }
}
