pub mod align;
pub mod clean;
pub mod label;
pub mod segment;

pub use align::align;
pub use clean::{clean, format_sentence_lines, split_sentences, CleanConfig, CleanResult};
pub use label::{HeaderLabeler, LabelConfig};
pub use segment::{segment, SegmentConfig};
