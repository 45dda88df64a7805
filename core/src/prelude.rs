use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Speed of light in m/s, used for Doppler-velocity conversion.
pub const SPEED_OF_LIGHT: f64 = 3.0e8;

/// Range-dimension sample rate of the echo recorder in Hz.
pub const SAMPLE_RATE: f64 = 20.0e6;

/// Range resolution per gate in meters.
pub const RANGE_RESOLUTION: f64 = SPEED_OF_LIGHT / (2.0 * SAMPLE_RATE);

/// Fixed number of range gates captured around the tracked target.
pub const RANGE_GATES: usize = 31;

/// Shared configuration for one extraction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Fixed output sequence length per batch.
    pub seq_len: usize,
    /// Velocity band kept in the emitted maps, in m/s.
    pub velocity_limit: f64,
    /// Percentile of map magnitudes used as the adaptive noise floor.
    pub noise_percentile: f64,
    /// Search radius (gates and Doppler bins) around the track hint.
    pub local_radius: usize,
    /// Local range gate the capture is centered on.
    pub center_gate: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            seq_len: 180,
            velocity_limit: 56.0,
            noise_percentile: 5.0,
            local_radius: 5,
            center_gate: 15,
        }
    }
}

/// Reason a single frame was dropped without failing the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Declared target count outside [0, 1000].
    TrackCount,
    /// Pulse count outside [1, 10000].
    PulseCount,
    /// Pulse repetition interval outside (0, 1] seconds.
    PulseInterval,
    /// Carrier frequency outside (0, 1e12] Hz.
    CarrierFreq,
    /// Fewer than four track-hint words, no target to localize.
    TrackHint,
    /// Velocity resolution non-finite or outside (0, 10000] m/s.
    VelocityResolution,
    /// Velocity axis wrong length or non-finite.
    VelocityAxis,
    /// Local search window had zero area.
    EmptyWindow,
    /// Refined peak fell outside the range or velocity axes.
    PeakOutOfBounds,
}

impl SkipReason {
    /// True for the physical-implausibility class of skips, which warrant a
    /// warning diagnostic rather than a silent count.
    pub fn is_physical(self) -> bool {
        matches!(self, Self::VelocityResolution | Self::VelocityAxis)
    }
}

/// Batch-level failure taxonomy. Frame-level skips never surface here.
#[derive(thiserror::Error, Debug)]
pub enum BatchError {
    #[error("opening echo stream {path}: {source}")]
    StreamOpen {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("stream read failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("no valid frames found in batch")]
    EmptyBatch,
    #[error("masked velocity axis has no zero-Doppler column")]
    MissingZeroDoppler,
    #[error("map shape {found:?} does not match batch shape {expected:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },
}

pub type BatchResult<T> = Result<T, BatchError>;
