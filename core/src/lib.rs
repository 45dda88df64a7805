//! Processing core for radar echo sequence extraction.
//!
//! The modules take a proprietary binary echo stream from frame
//! synchronization through MTD processing to fixed-length sequences of
//! target-centered range-Doppler maps, with scoped per-batch buffers and
//! well-defined skip semantics for corrupt or implausible frames.

pub mod ingest;
pub mod math;
pub mod pipeline;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use pipeline::{BatchProcessor, MapTransform, SequenceSample};
pub use prelude::{BatchError, BatchResult, PipelineConfig, SkipReason};
