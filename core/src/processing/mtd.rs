use crate::ingest::{IqMatrix, Parameters};
use crate::math::fft::{fftshift_rows, FftHelper};
use crate::math::window;
use crate::prelude::{SkipReason, SPEED_OF_LIGHT};
use crate::telemetry::LogManager;
use ndarray::{Array1, Array2};
use num_complex::Complex32;

/// Near-in side-lobe terms of the pulse-dimension Taylor taper.
const TAYLOR_NBAR: usize = 4;
/// Side-lobe suppression of the taper in dB.
const TAYLOR_SLL_DB: f64 = 30.0;
/// Velocity resolutions above this are physically impossible for this radar.
const MAX_DELTA_V: f64 = 10_000.0;

/// Zero-centered Doppler spectrum of one frame plus its velocity axis.
#[derive(Debug, Clone)]
pub struct DopplerSpectrum {
    /// Complex spectrum, 31 range gates by `prt_num` Doppler bins, with zero
    /// Doppler at column `prt_num / 2`.
    pub data: Array2<Complex32>,
    /// Velocity per Doppler bin in m/s, antisymmetric about the center bin.
    pub velocity: Array1<f64>,
    /// Velocity resolution per bin in m/s.
    pub delta_v: f64,
}

/// Moving-target-detection stage: amplitude taper, pulse-axis FFT, centered
/// spectrum, and the physical velocity axis.
pub struct MtdProcessor {
    helper: Option<FftHelper>,
    logger: LogManager,
}

impl MtdProcessor {
    pub fn new() -> Self {
        Self {
            helper: None,
            logger: LogManager::new(),
        }
    }

    /// Consumes one frame's IQ matrix and produces its centered Doppler
    /// spectrum, or a skip when the derived velocity axis is implausible.
    pub fn process(
        &mut self,
        params: &Parameters,
        mut iq: IqMatrix,
    ) -> Result<DopplerSpectrum, SkipReason> {
        let prt_num = params.prt_num;
        let taper = window::taylor(prt_num, TAYLOR_NBAR, TAYLOR_SLL_DB);
        for mut row in iq.rows_mut() {
            for (cell, coeff) in row.iter_mut().zip(&taper) {
                *cell *= *coeff as f32;
            }
        }

        if self.helper.as_ref().map_or(true, |h| h.size() != prt_num) {
            self.helper = None;
        }
        let helper = self.helper.get_or_insert_with(|| FftHelper::new(prt_num));
        helper.forward_rows(&mut iq);
        fftshift_rows(&mut iq);

        let delta_v =
            SPEED_OF_LIGHT / (2.0 * prt_num as f64 * params.prt * params.freq);
        if !delta_v.is_finite() || delta_v <= 0.0 || delta_v > MAX_DELTA_V {
            self.logger.alert(&format!(
                "implausible velocity resolution {delta_v} for cpi {}",
                params.cpi_count
            ));
            return Err(SkipReason::VelocityResolution);
        }

        let half = (prt_num / 2) as i64;
        let velocity =
            Array1::from_iter((0..prt_num).map(|i| (i as i64 - half) as f64 * delta_v));
        if velocity.len() != prt_num || velocity.iter().any(|v| !v.is_finite()) {
            self.logger.alert(&format!(
                "degenerate velocity axis for cpi {}",
                params.cpi_count
            ));
            return Err(SkipReason::VelocityAxis);
        }

        Ok(DopplerSpectrum {
            data: iq,
            velocity,
            delta_v,
        })
    }
}

impl Default for MtdProcessor {
    fn default() -> Self {
        Self::new()
    }
}
