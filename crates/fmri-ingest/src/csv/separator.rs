//! Field separator detection.
//!
//! Detection is a heuristic over a bounded prefix of the file: it counts tabs
//! and commas in the first [`DEFAULT_SAMPLE_SIZE`] characters and picks tab
//! only when tabs strictly outnumber commas. A file whose separator usage is
//! skewed outside that window can be mis-detected; callers that know the
//! format should pass the separator explicitly instead.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of characters inspected when sniffing a separator.
pub const DEFAULT_SAMPLE_SIZE: usize = 1024;

/// Field separator of a delimited text table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Separator {
    Tab,
    #[default]
    Comma,
}

impl Separator {
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Tab => b'\t',
            Self::Comma => b',',
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tab => f.write_str("tab"),
            Self::Comma => f.write_str("comma"),
        }
    }
}

/// Picks a separator from a text sample: tab if tabs strictly outnumber
/// commas, comma otherwise (including ties and empty samples).
pub fn sniff_separator(sample: &str) -> Separator {
    let mut tabs = 0usize;
    let mut commas = 0usize;
    for ch in sample.chars() {
        match ch {
            '\t' => tabs += 1,
            ',' => commas += 1,
            _ => {}
        }
    }
    if tabs > commas {
        Separator::Tab
    } else {
        Separator::Comma
    }
}

/// Detects the separator of a file from its first [`DEFAULT_SAMPLE_SIZE`] characters.
///
/// Never fails: an unreadable file yields [`Separator::Comma`].
pub fn detect_separator(path: &Path) -> Separator {
    detect_separator_with_sample(path, DEFAULT_SAMPLE_SIZE)
}

/// Detects the separator of a file from its first `sample_size` characters.
pub fn detect_separator_with_sample(path: &Path, sample_size: usize) -> Separator {
    match read_sample(path, sample_size) {
        Ok(sample) => {
            let separator = sniff_separator(&sample);
            debug!(
                path = %path.display(),
                sample_chars = sample.chars().count(),
                %separator,
                "detected table separator"
            );
            separator
        }
        Err(error) => {
            debug!(
                path = %path.display(),
                %error,
                "separator detection failed, defaulting to comma"
            );
            Separator::Comma
        }
    }
}

fn read_sample(path: &Path, sample_size: usize) -> io::Result<String> {
    let file = File::open(path)?;
    let mut bytes = Vec::new();
    // A UTF-8 character takes at most four bytes.
    file.take((sample_size as u64).saturating_mul(4))
        .read_to_end(&mut bytes)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text.chars().take(sample_size).collect())
}
