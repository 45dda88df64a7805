use crate::ingest::TrackHint;
use crate::math::StatsHelper;
use crate::prelude::{SkipReason, RANGE_GATES, RANGE_RESOLUTION};
use crate::processing::mtd::DopplerSpectrum;
use crate::telemetry::LogManager;
use ndarray::s;

/// Refined target location in local-gate / global-Doppler coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Localization {
    /// Range gate within the 31-gate capture window.
    pub local_gate: usize,
    /// Doppler bin into the centered spectrum.
    pub doppler_bin: usize,
    /// Absolute target range in meters.
    pub range_m: f64,
    /// Radial velocity at the peak in m/s.
    pub velocity_mps: f64,
}

/// Peak search seeded by the upstream track hint.
///
/// The hint's Doppler bin uses a frame-relative wrap-around convention with
/// 1-based indexing: bins above `prt_num / 2` shift down by that half, bins
/// at or below it shift up, then everything converts to 0-based and clamps.
/// This is a fixed transform of the hint source, not inferred intent.
pub struct TargetLocalizer {
    center_gate: usize,
    local_radius: usize,
    logger: LogManager,
}

impl TargetLocalizer {
    pub fn new(center_gate: usize, local_radius: usize) -> Self {
        Self {
            center_gate,
            local_radius,
            logger: LogManager::new(),
        }
    }

    /// Finds the peak-magnitude cell in the hint-centered window, mapping it
    /// back to global coordinates. The capture is pre-centered in range, so
    /// the range window always opens around the fixed center gate.
    pub fn localize(
        &self,
        spectrum: &DopplerSpectrum,
        hint: &TrackHint,
    ) -> Result<Localization, SkipReason> {
        let (gates, prt_num) = spectrum.data.dim();
        let half = (prt_num / 2) as i64;

        let raw = i64::from(hint.doppler_bin);
        let recentered = if raw > half { raw - half } else { raw + half };
        let doppler_center = (recentered - 1).clamp(0, prt_num as i64 - 1) as usize;

        let row_start = self.center_gate.saturating_sub(self.local_radius);
        let row_end = (self.center_gate + self.local_radius + 1).min(gates);
        let col_start = doppler_center.saturating_sub(self.local_radius);
        let col_end = (doppler_center + self.local_radius + 1).min(prt_num);
        if row_start >= row_end || col_start >= col_end {
            return Err(SkipReason::EmptyWindow);
        }

        let window = spectrum.data.slice(s![row_start..row_end, col_start..col_end]);
        let (peak_row, peak_col) =
            StatsHelper::argmax_magnitude(window).ok_or(SkipReason::EmptyWindow)?;

        let local_gate = row_start + peak_row;
        let doppler_bin = col_start + peak_col;
        if local_gate >= RANGE_GATES || doppler_bin >= spectrum.velocity.len() {
            return Err(SkipReason::PeakOutOfBounds);
        }

        let global_gate =
            i64::from(hint.range_bin) - self.center_gate as i64 + local_gate as i64;
        let range_m = global_gate as f64 * RANGE_RESOLUTION;
        let velocity_mps = spectrum.velocity[doppler_bin];
        self.logger.trace(&format!(
            "peak at gate {local_gate}, bin {doppler_bin}: {range_m:.1} m, {velocity_mps:.1} m/s"
        ));

        Ok(Localization {
            local_gate,
            doppler_bin,
            range_m,
            velocity_mps,
        })
    }
}
