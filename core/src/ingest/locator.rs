use std::io::{self, Read, Seek, SeekFrom};

/// Sentinel opening every well-formed frame (little-endian on the wire).
pub const FRAME_HEADER: u32 = 0xFA55_FA55;
/// Sentinel closing every well-formed frame.
pub const FRAME_TRAILER: u32 = 0x55FA_55FA;
/// Upper bound on a plausible declared frame length in bytes.
pub const MAX_FRAME_BYTES: u64 = 1_000_000;

/// Structurally confirmed frame: header offset and declared byte length.
/// The trailer sentinel sits at `offset + length - 4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatedFrame {
    pub offset: u64,
    pub length: u64,
}

enum ScanState {
    SeekHeader,
    VerifyTrailer { header: u64, length: u64 },
}

/// Self-synchronizing frame scanner.
///
/// The stream is expected to contain intermittent sync loss, so the scan is
/// byte-granular: a header candidate that fails trailer verification is
/// treated as a false positive and the search resumes one byte past it
/// (`SEEK_HEADER -> VERIFY_TRAILER -> EMIT | RESYNC`).
pub struct FrameLocator {
    total_len: u64,
}

impl FrameLocator {
    pub fn new(total_len: u64) -> Self {
        Self { total_len }
    }

    /// Scans forward from the reader's current position for the next
    /// structurally valid frame.
    ///
    /// Returns `Ok(None)` once the stream is exhausted or a declared length
    /// falls outside `(0, 1_000_000]` bytes. On success the cursor is left at
    /// `offset + 8`, the first payload word.
    pub fn locate<R: Read + Seek>(&self, reader: &mut R) -> io::Result<Option<LocatedFrame>> {
        let mut pos = reader.stream_position()?;
        let mut state = ScanState::SeekHeader;
        loop {
            state = match state {
                ScanState::SeekHeader => {
                    loop {
                        if pos + 4 > self.total_len {
                            return Ok(None);
                        }
                        match read_word_at(reader, pos)? {
                            Some(word) if word == FRAME_HEADER => break,
                            Some(_) => pos += 1,
                            None => return Ok(None),
                        }
                    }
                    let header = pos;
                    let raw_len = match read_word_at(reader, header + 4)? {
                        Some(word) => word,
                        None => return Ok(None),
                    };
                    let length = u64::from(raw_len) * 4;
                    if length == 0 || length > MAX_FRAME_BYTES {
                        return Ok(None);
                    }
                    ScanState::VerifyTrailer { header, length }
                }
                ScanState::VerifyTrailer { header, length } => {
                    let trailer_at = header + length - 4;
                    if trailer_at + 4 > self.total_len {
                        return Ok(None);
                    }
                    match read_word_at(reader, trailer_at)? {
                        Some(word) if word == FRAME_TRAILER => {
                            reader.seek(SeekFrom::Start(header + 8))?;
                            return Ok(Some(LocatedFrame {
                                offset: header,
                                length,
                            }));
                        }
                        Some(_) => {
                            pos = header + 1;
                            ScanState::SeekHeader
                        }
                        None => return Ok(None),
                    }
                }
            };
        }
    }
}

fn read_word_at<R: Read + Seek>(reader: &mut R, pos: u64) -> io::Result<Option<u32>> {
    reader.seek(SeekFrom::Start(pos))?;
    let mut word = [0u8; 4];
    match reader.read_exact(&mut word) {
        Ok(()) => Ok(Some(u32::from_le_bytes(word))),
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(err) => Err(err),
    }
}
