pub mod input;
pub mod output;

pub use input::{
    default_output_path, default_stripped_path, load_transcript, looks_like_subtitles,
    read_input_file, strip_subtitle_markup,
};
pub use output::StructuredDocument;
