//! Delimited table reading.

mod reader;
mod separator;

pub use reader::{NULL_TOKENS, normalize_header, read_table, read_table_with_separator};
pub use separator::{
    DEFAULT_SAMPLE_SIZE, Separator, detect_separator, detect_separator_with_sample,
    sniff_separator,
};
