pub mod decoder;
pub mod locator;
pub mod params;

pub use decoder::{decode_frame, DecodeOutcome, DecodedFrame, IqMatrix};
pub use locator::{FrameLocator, LocatedFrame};
pub use params::{ParameterValidator, Parameters, TrackHint};
