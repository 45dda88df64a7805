use crate::prelude::SkipReason;
use serde::{Deserialize, Serialize};

/// Scalar parameters decoded once per frame, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Electronic scan azimuth in degrees (raw word times 0.01).
    pub e_scan_az: f64,
    /// Track-hint words, four per reported target.
    pub track_no_info: Vec<u32>,
    /// Carrier frequency in Hz (raw word times 1e6).
    pub freq: f64,
    /// Opaque coherent-processing-interval sequence id.
    pub cpi_count: u32,
    /// Pulses per frame; the Doppler FFT length.
    pub prt_num: usize,
    /// Pulse repetition interval in seconds (raw word times 0.0125e-6).
    pub prt: f64,
    /// Range-dimension sample count as declared by the recorder.
    pub data_length: u32,
}

impl Parameters {
    /// First track hint carried by the frame, if one is present.
    pub fn track_hint(&self) -> Option<TrackHint> {
        if self.track_no_info.len() < 4 {
            return None;
        }
        Some(TrackHint {
            range_bin: self.track_no_info[2],
            doppler_bin: self.track_no_info[3],
        })
    }
}

/// Global range/Doppler location reported by the upstream tracker. Seeds the
/// local peak search and is never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackHint {
    pub range_bin: u32,
    pub doppler_bin: u32,
}

/// Pure predicate over decoded parameters. Rejections are steady-state
/// behavior for this stream format, counted rather than reported.
pub struct ParameterValidator;

impl ParameterValidator {
    pub fn check(params: &Parameters) -> Result<(), SkipReason> {
        if params.prt_num < 1 || params.prt_num > 10_000 {
            return Err(SkipReason::PulseCount);
        }
        if !(params.prt > 0.0 && params.prt <= 1.0) {
            return Err(SkipReason::PulseInterval);
        }
        if !(params.freq > 0.0 && params.freq <= 1.0e12) {
            return Err(SkipReason::CarrierFreq);
        }
        if params.track_no_info.len() < 4 {
            return Err(SkipReason::TrackHint);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_params() -> Parameters {
        Parameters {
            e_scan_az: 123.45,
            track_no_info: vec![7, 0, 100, 10],
            freq: 1.0e9,
            cpi_count: 42,
            prt_num: 64,
            prt: 1.0e-3,
            data_length: 31,
        }
    }

    #[test]
    fn validator_accepts_plausible_parameters() {
        assert!(ParameterValidator::check(&valid_params()).is_ok());
    }

    #[test]
    fn validator_accepts_boundary_values() {
        let mut p = valid_params();
        p.prt_num = 1;
        assert!(ParameterValidator::check(&p).is_ok());
        p.prt_num = 10_000;
        assert!(ParameterValidator::check(&p).is_ok());
        p.prt = 1.0;
        assert!(ParameterValidator::check(&p).is_ok());
        p.freq = 1.0e12;
        assert!(ParameterValidator::check(&p).is_ok());
    }

    #[test]
    fn validator_rejects_pulse_count_extremes() {
        let mut p = valid_params();
        p.prt_num = 0;
        assert_eq!(
            ParameterValidator::check(&p),
            Err(SkipReason::PulseCount)
        );
        p.prt_num = 10_001;
        assert_eq!(
            ParameterValidator::check(&p),
            Err(SkipReason::PulseCount)
        );
    }

    #[test]
    fn validator_rejects_nonpositive_interval_and_frequency() {
        let mut p = valid_params();
        p.prt = 0.0;
        assert_eq!(
            ParameterValidator::check(&p),
            Err(SkipReason::PulseInterval)
        );

        let mut p = valid_params();
        p.freq = 0.0;
        assert_eq!(
            ParameterValidator::check(&p),
            Err(SkipReason::CarrierFreq)
        );
    }

    #[test]
    fn validator_rejects_missing_track_hint() {
        let mut p = valid_params();
        p.track_no_info = vec![7, 0, 100];
        assert_eq!(ParameterValidator::check(&p), Err(SkipReason::TrackHint));
        assert!(p.track_hint().is_none());
    }

    #[test]
    fn track_hint_reads_third_and_fourth_words() {
        let hint = valid_params().track_hint().unwrap();
        assert_eq!(hint.range_bin, 100);
        assert_eq!(hint.doppler_bin, 10);
    }
}
