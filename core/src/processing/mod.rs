pub mod localize;
pub mod map;
pub mod mtd;
pub mod sequence;

pub use localize::{Localization, TargetLocalizer};
pub use map::{MapBuilder, RangeDopplerMap};
pub use mtd::{DopplerSpectrum, MtdProcessor};
pub use sequence::{Sequence, SequenceAssembler};
