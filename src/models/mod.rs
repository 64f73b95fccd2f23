pub mod segment;
pub mod sentence;
pub mod timeline;

pub use segment::Segment;
pub use sentence::{Paragraph, Sentence};
pub use timeline::{SpeakerInterval, SpeakerTimeline};
