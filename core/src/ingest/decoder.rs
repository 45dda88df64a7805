use crate::ingest::params::{ParameterValidator, Parameters};
use crate::prelude::{SkipReason, RANGE_GATES};
use ndarray::Array2;
use num_complex::Complex32;
use std::io::{self, Read};

/// Complex echo samples, range-major: 31 gates by `prt_num` pulses.
pub type IqMatrix = Array2<Complex32>;

/// One fully decoded frame: scalar parameters plus the IQ payload.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    pub params: Parameters,
    pub iq: IqMatrix,
}

/// Result of decoding a located frame.
#[derive(Debug)]
pub enum DecodeOutcome {
    /// Structurally complete frame with plausible parameters.
    Frame(DecodedFrame),
    /// Parameters out of range; the caller advances to the next frame.
    Skip(SkipReason),
    /// Short read. Treated as normal end-of-stream, not an error.
    Truncated,
}

/// Decodes the frame the cursor is positioned on (first payload word, eight
/// bytes past the header sentinel).
///
/// The parameter predicate runs before the IQ block is read, so a frame with
/// an implausible pulse count is skipped without a payload-sized read. The
/// trailing trailer word is consumed on success, leaving the cursor ready for
/// the next header scan.
pub fn decode_frame<R: Read>(reader: &mut R) -> io::Result<DecodeOutcome> {
    // Scan index placeholder, azimuth, target count.
    let lead = match read_words(reader, 3)? {
        Some(words) => words,
        None => return Ok(DecodeOutcome::Truncated),
    };
    let e_scan_az = f64::from(lead[1]) * 0.01;
    let target_count = lead[2] as usize;
    if target_count > 1000 {
        return Ok(DecodeOutcome::Skip(SkipReason::TrackCount));
    }

    let words = match read_words(reader, target_count * 4 + 5)? {
        Some(words) => words,
        None => return Ok(DecodeOutcome::Truncated),
    };
    let (track, tail) = words.split_at(target_count * 4);
    let params = Parameters {
        e_scan_az,
        track_no_info: track.to_vec(),
        freq: f64::from(tail[0]) * 1.0e6,
        cpi_count: tail[1],
        prt_num: tail[2] as usize,
        prt: f64::from(tail[3]) * 0.0125e-6,
        data_length: tail[4],
    };
    if let Err(reason) = ParameterValidator::check(&params) {
        return Ok(DecodeOutcome::Skip(reason));
    }

    let sample_words = params.prt_num * RANGE_GATES * 2;
    let mut raw = vec![0u8; sample_words * 4];
    match reader.read_exact(&mut raw) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
            return Ok(DecodeOutcome::Truncated)
        }
        Err(err) => return Err(err),
    }

    let mut cells = Vec::with_capacity(sample_words / 2);
    for pair in raw.chunks_exact(8) {
        let re = f32::from_le_bytes([pair[0], pair[1], pair[2], pair[3]]);
        let im = f32::from_le_bytes([pair[4], pair[5], pair[6], pair[7]]);
        cells.push(Complex32::new(re, im));
    }
    let iq = Array2::from_shape_vec((RANGE_GATES, params.prt_num), cells)
        .expect("cell count matches 31 x prt_num by construction");

    // Consume the trailer word already verified by the locator. End-of-stream
    // here still yields a complete frame.
    let mut trailer = [0u8; 4];
    match reader.read_exact(&mut trailer) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {}
        Err(err) => return Err(err),
    }

    Ok(DecodeOutcome::Frame(DecodedFrame { params, iq }))
}

fn read_words<R: Read>(reader: &mut R, count: usize) -> io::Result<Option<Vec<u32>>> {
    let mut raw = vec![0u8; count * 4];
    match reader.read_exact(&mut raw) {
        Ok(()) => Ok(Some(
            raw.chunks_exact(4)
                .map(|word| u32::from_le_bytes([word[0], word[1], word[2], word[3]]))
                .collect(),
        )),
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(err) => Err(err),
    }
}
