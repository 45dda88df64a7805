//! Per-batch orchestration: locate, decode, validate, MTD, localize, map,
//! assemble. Frame-level failures are absorbed here; only batch-level
//! failures cross this boundary.

use crate::ingest::{decode_frame, DecodeOutcome, DecodedFrame, FrameLocator};
use crate::prelude::{BatchError, BatchResult, PipelineConfig, SkipReason};
use crate::processing::{
    MapBuilder, MtdProcessor, RangeDopplerMap, Sequence, SequenceAssembler, TargetLocalizer,
};
use crate::telemetry::{FrameMetrics, FrameMetricsSnapshot, LogManager};
use ndarray::Array3;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Hook applied to each map before accumulation.
pub trait MapTransform {
    fn apply(&self, map: RangeDopplerMap) -> RangeDopplerMap;
}

impl<F> MapTransform for F
where
    F: Fn(RangeDopplerMap) -> RangeDopplerMap,
{
    fn apply(&self, map: RangeDopplerMap) -> RangeDopplerMap {
        self(map)
    }
}

/// Assembled output for one batch file.
#[derive(Debug, Clone)]
pub struct SequenceSample {
    pub sequence: Sequence,
    pub label: u32,
}

/// Drives one echo stream at a time through the full extraction pipeline.
/// Metrics accumulate across batches for the lifetime of the processor.
pub struct BatchProcessor {
    mtd: MtdProcessor,
    localizer: TargetLocalizer,
    builder: MapBuilder,
    assembler: SequenceAssembler,
    metrics: FrameMetrics,
    logger: LogManager,
}

impl BatchProcessor {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            mtd: MtdProcessor::new(),
            localizer: TargetLocalizer::new(config.center_gate, config.local_radius),
            builder: MapBuilder::new(config.velocity_limit, config.noise_percentile),
            assembler: SequenceAssembler::new(config.seq_len),
            metrics: FrameMetrics::new(),
            logger: LogManager::new(),
        }
    }

    pub fn metrics(&self) -> FrameMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Processes one batch file into a labeled sequence. The file handle is
    /// scoped to this call and closed on every exit path.
    pub fn process_file(
        &mut self,
        path: &Path,
        label: u32,
        transform: Option<&dyn MapTransform>,
    ) -> BatchResult<SequenceSample> {
        let file = File::open(path).map_err(|source| BatchError::StreamOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let total_len = file.metadata()?.len();
        let sequence = self.process_stream(BufReader::new(file), total_len, transform)?;
        Ok(SequenceSample { sequence, label })
    }

    /// Stream-level entry point, also used by tests over in-memory cursors.
    pub fn process_stream<R: Read + Seek>(
        &mut self,
        mut reader: R,
        total_len: u64,
        transform: Option<&dyn MapTransform>,
    ) -> BatchResult<Sequence> {
        let maps = self.collect_maps(&mut reader, total_len, transform)?;
        self.logger
            .record(&format!("batch complete: {} maps accumulated", maps.len()));
        self.assembler.assemble(maps)
    }

    fn collect_maps<R: Read + Seek>(
        &mut self,
        reader: &mut R,
        total_len: u64,
        transform: Option<&dyn MapTransform>,
    ) -> BatchResult<Vec<Array3<f32>>> {
        let locator = FrameLocator::new(total_len);
        let mut maps = Vec::new();
        loop {
            let located = match locator.locate(reader)? {
                Some(frame) => frame,
                None => break,
            };
            self.metrics.record_located();

            match decode_frame(reader)? {
                DecodeOutcome::Truncated => break,
                DecodeOutcome::Skip(reason) => {
                    self.note_skip(reason);
                    // The payload was not consumed; jump to the frame end so
                    // the next scan starts past it.
                    reader.seek(SeekFrom::Start(located.offset + located.length))?;
                }
                DecodeOutcome::Frame(frame) => {
                    if let Some(map) = self.process_frame(frame, transform)? {
                        maps.push(map);
                        self.metrics.record_emitted();
                    }
                }
            }
        }
        Ok(maps)
    }

    fn process_frame(
        &mut self,
        frame: DecodedFrame,
        transform: Option<&dyn MapTransform>,
    ) -> BatchResult<Option<Array3<f32>>> {
        let hint = match frame.params.track_hint() {
            Some(hint) => hint,
            None => {
                self.note_skip(SkipReason::TrackHint);
                return Ok(None);
            }
        };

        let spectrum = match self.mtd.process(&frame.params, frame.iq) {
            Ok(spectrum) => spectrum,
            Err(reason) => {
                self.note_skip(reason);
                return Ok(None);
            }
        };

        let location = match self.localizer.localize(&spectrum, &hint) {
            Ok(location) => location,
            Err(reason) => {
                self.note_skip(reason);
                return Ok(None);
            }
        };
        self.logger.trace(&format!(
            "cpi {}: target {:.1} m at {:.1} m/s",
            frame.params.cpi_count, location.range_m, location.velocity_mps
        ));

        // A structurally broken velocity axis fails the batch, not the frame.
        let map = self.builder.build(&spectrum)?;
        let map = match transform {
            Some(transform) => transform.apply(map),
            None => map,
        };
        Ok(Some(map.data))
    }

    fn note_skip(&self, reason: SkipReason) {
        self.metrics.record_skip(reason);
        if reason.is_physical() {
            self.logger.alert(&format!("frame skipped: {:?}", reason));
        } else {
            self.logger.trace(&format!("frame skipped: {:?}", reason));
        }
    }
}
