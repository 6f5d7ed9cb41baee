/// Module containing the error types for wavstream
use std::io::{self, ErrorKind};

use thiserror::Error;

use crate::chunk::{ChunkTag, TagKind};

pub type WavResult<T> = Result<T, WavError>;

/// Error types for wavstream
#[derive(Error, Debug)]
pub enum WavError {
    /// The source failed or ran out of bytes while reading `field`.
    #[error("error reading {field}: {}", io_reason(.source))]
    Read {
        field: &'static str,
        source: io::Error,
    },
    #[error("invalid {kind} of {actual}; should be '{}'", expected_tag(.kind))]
    InvalidTag { kind: TagKind, actual: ChunkTag },
    #[error("expected {expected} channels; found {found}")]
    ChannelCountMismatch { expected: usize, found: usize },
    #[error("expected {expected} bytes per sample but only found {found}")]
    SampleByteCountMismatch { expected: usize, found: usize },
    /// A positioned write into the sink failed. Insufficient capacity shows up as
    /// [`ErrorKind::WriteZero`].
    #[error("error writing {field} at offset {offset}: {source}")]
    Write {
        field: &'static str,
        offset: u64,
        source: io::Error,
    },
}

impl WavError {
    pub(crate) fn read(field: &'static str, source: io::Error) -> Self {
        WavError::Read { field, source }
    }

    pub(crate) fn write(field: &'static str, offset: u64, source: io::Error) -> Self {
        WavError::Write {
            field,
            offset,
            source,
        }
    }

    /// True when the error is a read that hit the end of the source.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, WavError::Read { source, .. } if source.kind() == ErrorKind::UnexpectedEof)
    }

    /// The underlying I/O error for read and write failures.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            WavError::Read { source, .. } | WavError::Write { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn expected_tag(kind: &TagKind) -> ChunkTag {
    kind.expected()
}

fn io_reason(err: &io::Error) -> String {
    match err.kind() {
        ErrorKind::UnexpectedEof => "unexpected EOF".to_string(),
        _ => err.to_string(),
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn eof_reads_are_flagged() {
        let err = WavError::read("FourCC", io::Error::from(ErrorKind::UnexpectedEof));
        assert!(err.is_end_of_stream());
        assert_eq!(err.to_string(), "error reading FourCC: unexpected EOF");
    }

    #[test]
    fn other_errors_are_not_end_of_stream() {
        let err = WavError::read("FourCC", io::Error::new(ErrorKind::Other, "disk on fire"));
        assert!(!err.is_end_of_stream());
        assert!(err.to_string().contains("disk on fire"));

        let err = WavError::ChannelCountMismatch {
            expected: 2,
            found: 1,
        };
        assert!(!err.is_end_of_stream());
        assert!(err.io_error().is_none());
    }

    #[test]
    fn tag_error_message() {
        let err = WavError::InvalidTag {
            kind: TagKind::Riff,
            actual: ChunkTag::from(*b"RIFD"),
        };
        assert_eq!(
            err.to_string(),
            "invalid RIFF chunk ID of RIFD; should be 'RIFF'"
        );
    }
}
