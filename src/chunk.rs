//! The chunk grammar shared by the reader and the writer.
//!
//! Every sub-chunk in a RIFF container starts with the same 8 bytes: a FourCC tag
//! stored most-significant-byte first, followed by the little-endian length of the
//! payload that comes after the header.
use std::fmt::{Display, Formatter};
use std::io::Read;

use num_traits::FromBytes;

use crate::error::{WavError, WavResult};

// 100% necessary to have these chunks
pub const RIFF: [u8; 4] = *b"RIFF";
pub const WAVE: [u8; 4] = *b"WAVE";
pub const FMT: [u8; 4] = *b"fmt ";
pub const DATA: [u8; 4] = *b"data";

/// Size of a tag plus its length field.
pub const SUB_CHUNK_HEADER_SIZE: usize = 8;

/// Wrapper around a 4 byte buffer. Used for comparing and displaying the FourCC of a chunk.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ChunkTag([u8; 4]);

impl ChunkTag {
    pub const fn new(identifier: [u8; 4]) -> Self {
        ChunkTag(identifier)
    }

    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// The tag read as a big-endian integer.
    pub const fn to_be_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

impl From<[u8; 4]> for ChunkTag {
    fn from(identifier: [u8; 4]) -> Self {
        ChunkTag(identifier)
    }
}

impl From<&[u8; 4]> for ChunkTag {
    fn from(identifier: &[u8; 4]) -> Self {
        ChunkTag(*identifier)
    }
}

impl From<u32> for ChunkTag {
    fn from(value: u32) -> Self {
        ChunkTag(value.to_be_bytes())
    }
}

impl PartialEq<[u8; 4]> for ChunkTag {
    fn eq(&self, other: &[u8; 4]) -> bool {
        self.0 == *other
    }
}

impl Display for ChunkTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&tag_to_string(self))
    }
}

/// Reinterprets the tag's bytes, in stored order, as ASCII text.
///
/// Non-ASCII bytes are replaced rather than rejected so that a corrupt tag can
/// still be reported in an error message.
pub fn tag_to_string(tag: &ChunkTag) -> String {
    String::from_utf8_lossy(tag.as_bytes()).into_owned()
}

/// The four tags a canonical WAVE container is checked against.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TagKind {
    Riff,
    Wave,
    Fmt,
    Data,
}

impl TagKind {
    pub const fn expected(self) -> ChunkTag {
        match self {
            TagKind::Riff => ChunkTag(RIFF),
            TagKind::Wave => ChunkTag(WAVE),
            TagKind::Fmt => ChunkTag(FMT),
            TagKind::Data => ChunkTag(DATA),
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            TagKind::Riff => "RIFF chunk ID",
            TagKind::Wave => "RIFF format",
            TagKind::Fmt => "fmt chunk ID",
            TagKind::Data => "data chunk ID",
        }
    }
}

impl Display for TagKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// Checks `actual` against the literal tag for `kind`. Comparison is byte-exact and case-sensitive.
pub fn validate_tag(actual: ChunkTag, kind: TagKind) -> WavResult<()> {
    match actual == kind.expected() {
        true => Ok(()),
        false => Err(WavError::InvalidTag { kind, actual }),
    }
}

/// The common header of every sub-chunk.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubChunkHeader {
    pub tag: ChunkTag,
    /// Payload length in bytes, not counting this header.
    pub length: u32,
}

impl SubChunkHeader {
    pub const fn new(tag: [u8; 4], length: u32) -> Self {
        SubChunkHeader {
            tag: ChunkTag(tag),
            length,
        }
    }
}

impl Display for SubChunkHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (length: {})", self.tag, self.length)
    }
}

/// Reads a FourCC. A short read surfaces as an end-of-stream [`WavError::Read`].
pub fn read_tag<R: Read>(reader: &mut R, field: &'static str) -> WavResult<ChunkTag> {
    let mut buf = [0; 4];
    reader
        .read_exact(&mut buf)
        .map_err(|e| WavError::read(field, e))?;
    Ok(ChunkTag(buf))
}

/// Reads a little-endian integer of whatever width `T` has.
pub fn read_le<T, R>(reader: &mut R, field: &'static str) -> WavResult<T>
where
    T: FromBytes,
    T::Bytes: Default,
    R: Read,
{
    let mut buf = T::Bytes::default();
    reader
        .read_exact(buf.as_mut())
        .map_err(|e| WavError::read(field, e))?;
    Ok(T::from_le_bytes(&buf))
}

/// Reads the tag then the length of the next sub-chunk. Does not validate the tag.
pub fn read_sub_chunk_header<R: Read>(reader: &mut R) -> WavResult<SubChunkHeader> {
    let tag = read_tag(reader, "FourCC")?;
    let length: u32 = read_le(reader, "chunk size")?;
    Ok(SubChunkHeader { tag, length })
}
