use crate::catalog::BatchFile;
use crate::workflow::config::WorkflowConfig;
use log::{info, warn};
use rdcore::pipeline::BatchProcessor;
use rdcore::telemetry::FrameMetricsSnapshot;
use serde::Serialize;

/// Failure of one batch, recorded without aborting the run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub batch_num: u32,
    pub label: u32,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub sequences: usize,
    pub failures: Vec<BatchFailure>,
    pub metrics: FrameMetricsSnapshot,
}

pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Processes every batch in order. Batch failures are collected in the
    /// summary; frame-level skips never surface past the core.
    pub fn execute(&self, batches: &[BatchFile]) -> RunSummary {
        let mut processor = BatchProcessor::new(&self.config.to_pipeline_config());
        let mut sequences = 0;
        let mut failures = Vec::new();

        for batch in batches {
            match processor.process_file(&batch.raw_file, batch.label, None) {
                Ok(sample) => {
                    let valid = sample
                        .sequence
                        .mask
                        .iter()
                        .filter(|&&m| m)
                        .count();
                    info!(
                        "batch {} label {}: {} valid frames of {}",
                        batch.batch_num,
                        batch.label,
                        valid,
                        sample.sequence.frames.len()
                    );
                    sequences += 1;
                }
                Err(err) => {
                    warn!("batch {} label {}: {}", batch.batch_num, batch.label, err);
                    failures.push(BatchFailure {
                        batch_num: batch.batch_num,
                        label: batch.label,
                        error: err.to_string(),
                    });
                }
            }
        }

        RunSummary {
            sequences,
            failures,
            metrics: processor.metrics(),
        }
    }
}
