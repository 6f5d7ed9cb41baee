///
/// Module containing the header structs of a canonical WAVE container and the
/// fixed byte layout the writer produces.
///
use std::fmt::{Display, Formatter};

#[cfg(feature = "colored")]
use colored::Colorize;

use crate::chunk::{ChunkTag, SubChunkHeader, DATA, FMT, RIFF, SUB_CHUNK_HEADER_SIZE, WAVE};

/// Size of the fixed part of the fmt chunk payload.
pub const FMT_PAYLOAD_SIZE: usize = 16;
/// RIFF size of a container holding no frames: "WAVE" + fmt chunk + empty data chunk header.
pub const EMPTY_RIFF_SIZE: u32 = (4 + SUB_CHUNK_HEADER_SIZE + FMT_PAYLOAD_SIZE + SUB_CHUNK_HEADER_SIZE) as u32;
/// Offset of the first frame.
pub const DATA_OFFSET: u64 = 44;

pub const AUDIO_FORMAT_PCM: u16 = 1;

/// A field at a fixed position in the 44 byte container prefix.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FieldSlot {
    pub name: &'static str,
    pub offset: u64,
    pub size: usize,
    pub encoding: FieldEncoding,
}

/// How a field's bytes are laid out on disk.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FieldEncoding {
    /// FourCC, stored in reading order.
    Tag,
    LittleEndian,
}

impl FieldSlot {
    const fn new(name: &'static str, offset: u64, size: usize, encoding: FieldEncoding) -> Self {
        FieldSlot {
            name,
            offset,
            size,
            encoding,
        }
    }
}

pub const RIFF_ID: FieldSlot = FieldSlot::new("RIFF chunk ID", 0, 4, FieldEncoding::Tag);
pub const RIFF_SIZE: FieldSlot = FieldSlot::new("RIFF size", 4, 4, FieldEncoding::LittleEndian);
pub const RIFF_FORMAT: FieldSlot = FieldSlot::new("RIFF format", 8, 4, FieldEncoding::Tag);
pub const FMT_ID: FieldSlot = FieldSlot::new("fmt chunk ID", 12, 4, FieldEncoding::Tag);
pub const FMT_SIZE: FieldSlot = FieldSlot::new("fmt size", 16, 4, FieldEncoding::LittleEndian);
pub const FMT_PAYLOAD: FieldSlot = FieldSlot::new(
    "fmt payload",
    20,
    FMT_PAYLOAD_SIZE,
    FieldEncoding::LittleEndian,
);
pub const DATA_ID: FieldSlot = FieldSlot::new("data chunk ID", 36, 4, FieldEncoding::Tag);
pub const DATA_SIZE: FieldSlot = FieldSlot::new("data size", 40, 4, FieldEncoding::LittleEndian);

/// The container prefix in on-disk order.
pub const INITIAL_LAYOUT: [FieldSlot; 8] = [
    RIFF_ID,
    RIFF_SIZE,
    RIFF_FORMAT,
    FMT_ID,
    FMT_SIZE,
    FMT_PAYLOAD,
    DATA_ID,
    DATA_SIZE,
];

/// The first chunk of a WAVE file. `header.length` is the size of the whole file minus 8.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RiffHeader {
    pub header: SubChunkHeader,
    pub format: ChunkTag,
}

impl RiffHeader {
    /// Header of a container holding a 16 byte fmt chunk and no frames.
    pub const fn for_empty_container() -> Self {
        RiffHeader {
            header: SubChunkHeader::new(RIFF, EMPTY_RIFF_SIZE),
            format: ChunkTag::new(WAVE),
        }
    }
}

impl Display for RiffHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "RiffHeader: {} format: {}", self.header, self.format)
    }
}

///
/// The fmt chunk. The audio format is kept as the raw code found in the file;
/// only linear PCM framing is assumed when frames are read or written.
///
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub header: SubChunkHeader,
    /// 1 for PCM.
    pub audio_format: u16,
    pub num_channels: u16,
    pub sample_rate: u32,
    /// sample_rate * block_align
    pub byte_rate: u32,
    /// num_channels * bits_per_sample / 8
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl FormatDescriptor {
    /// Constructs a new descriptor, deriving the block align and byte rate from the other fields.
    pub fn new(audio_format: u16, num_channels: u16, sample_rate: u32, bits_per_sample: u16) -> Self {
        let block_align = num_channels.wrapping_mul(bits_per_sample / 8);
        let byte_rate = sample_rate.wrapping_mul(block_align as u32);
        FormatDescriptor {
            header: SubChunkHeader::new(FMT, FMT_PAYLOAD_SIZE as u32),
            audio_format,
            num_channels,
            sample_rate,
            byte_rate,
            block_align,
            bits_per_sample,
        }
    }

    /// Builds a descriptor from a fmt chunk header and its fixed 16 byte payload.
    pub fn from_bytes(header: SubChunkHeader, bytes: &[u8; FMT_PAYLOAD_SIZE]) -> Self {
        FormatDescriptor {
            header,
            audio_format: u16::from_le_bytes([bytes[0], bytes[1]]),
            num_channels: u16::from_le_bytes([bytes[2], bytes[3]]),
            sample_rate: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            byte_rate: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            block_align: u16::from_le_bytes([bytes[12], bytes[13]]),
            bits_per_sample: u16::from_le_bytes([bytes[14], bytes[15]]),
        }
    }

    /// The 16 byte payload, without the chunk header.
    pub fn to_bytes(&self) -> [u8; FMT_PAYLOAD_SIZE] {
        let mut bytes = [0; FMT_PAYLOAD_SIZE];
        bytes[0..2].copy_from_slice(&self.audio_format.to_le_bytes());
        bytes[2..4].copy_from_slice(&self.num_channels.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.sample_rate.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.byte_rate.to_le_bytes());
        bytes[12..14].copy_from_slice(&self.block_align.to_le_bytes());
        bytes[14..16].copy_from_slice(&self.bits_per_sample.to_le_bytes());
        bytes
    }

    /// Bytes held by one channel of one frame.
    pub fn bytes_per_channel_sample(&self) -> usize {
        (self.bits_per_sample / 8) as usize
    }

    /// Bytes held by one frame across all channels.
    pub fn frame_size(&self) -> usize {
        self.bytes_per_channel_sample() * self.num_channels as usize
    }

    /// Whether block align and byte rate agree with the channel count, bit depth and sample rate.
    pub fn is_consistent(&self) -> bool {
        let frame_size = self.frame_size() as u64;
        self.block_align as u64 == frame_size
            && self.byte_rate as u64 == self.sample_rate as u64 * frame_size
    }

    pub fn is_pcm(&self) -> bool {
        self.audio_format == AUDIO_FORMAT_PCM
    }
}

impl Default for FormatDescriptor {
    /// 16 bit stereo PCM at 44.1kHz.
    fn default() -> Self {
        FormatDescriptor::new(AUDIO_FORMAT_PCM, 2, 44100, 16)
    }
}

#[cfg(feature = "colored")]
impl Display for FormatDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\n\t{} {}\n\t{} {}\n\t{} {}\n\t{} {}\n\t{} {}\n\t{} {}",
            "FormatDescriptor:".white().bold().underline(),
            "audio_format:".green().bold(),
            self.audio_format.to_string().white(),
            "num_channels:".green().bold(),
            self.num_channels.to_string().white(),
            "sample_rate:".green().bold(),
            self.sample_rate.to_string().white(),
            "byte_rate:".green().bold(),
            self.byte_rate.to_string().white(),
            "block_align:".green().bold(),
            self.block_align.to_string().white(),
            "bits_per_sample:".green().bold(),
            self.bits_per_sample.to_string().white(),
        )
    }
}

#[cfg(not(feature = "colored"))]
impl Display for FormatDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FormatDescriptor: audio_format: {}, num_channels: {}, sample_rate: {}, byte_rate: {}, block_align: {}, bits_per_sample: {}",
            self.audio_format,
            self.num_channels,
            self.sample_rate,
            self.byte_rate,
            self.block_align,
            self.bits_per_sample
        )
    }
}

/// Header of the data chunk. Frames themselves are never buffered here.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DataChunkHeader {
    pub header: SubChunkHeader,
}

impl DataChunkHeader {
    pub const fn empty() -> Self {
        DataChunkHeader {
            header: SubChunkHeader::new(DATA, 0),
        }
    }

    /// Declared payload size in bytes.
    pub fn length(&self) -> u32 {
        self.header.length
    }
}

impl Display for DataChunkHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "DataChunkHeader: {}", self.header)
    }
}

#[cfg(test)]
mod header_tests {
    use super::*;

    const ONE_CHANNEL_FMT: FormatDescriptor = FormatDescriptor {
        header: SubChunkHeader::new(FMT, 16),
        audio_format: 1,
        num_channels: 1,
        sample_rate: 16000,
        byte_rate: 16000 * 2,
        block_align: 2,
        bits_per_sample: 16,
    };

    #[test]
    fn default_is_cd_quality_stereo() {
        let fmt = FormatDescriptor::default();
        assert_eq!(fmt.header, SubChunkHeader::new(FMT, 16));
        assert_eq!(fmt.audio_format, 1);
        assert_eq!(fmt.num_channels, 2);
        assert_eq!(fmt.sample_rate, 44100);
        assert_eq!(fmt.byte_rate, 176400);
        assert_eq!(fmt.block_align, 4);
        assert_eq!(fmt.bits_per_sample, 16);
        assert!(fmt.is_consistent());
        assert!(fmt.is_pcm());
    }

    #[test]
    fn new_derives_block_align_and_byte_rate() {
        assert_eq!(FormatDescriptor::new(1, 1, 16000, 16), ONE_CHANNEL_FMT);
        let fmt = FormatDescriptor::new(1, 6, 48000, 24);
        assert_eq!(fmt.block_align, 18);
        assert_eq!(fmt.byte_rate, 48000 * 18);
        assert_eq!(fmt.frame_size(), 18);
        assert_eq!(fmt.bytes_per_channel_sample(), 3);
    }

    #[test]
    fn payload_layout_is_little_endian() {
        let bytes = FormatDescriptor::default().to_bytes();
        assert_eq!(
            bytes,
            [
                0x01, 0x00, // audio format
                0x02, 0x00, // num channels
                0x44, 0xac, 0x00, 0x00, // sample rate
                0x10, 0xb1, 0x02, 0x00, // byte rate
                0x04, 0x00, // block align
                0x10, 0x00, // bits per sample
            ]
        );
    }

    #[test]
    fn can_convert_to_and_from_bytes() {
        let fmt = FormatDescriptor {
            audio_format: 111,
            byte_rate: 56000,
            block_align: 12,
            ..FormatDescriptor::new(1, 2, 44000, 16)
        };
        let decoded = FormatDescriptor::from_bytes(fmt.header, &fmt.to_bytes());
        assert_eq!(decoded, fmt);
        assert!(!decoded.is_consistent());
    }

    #[test]
    fn layout_is_contiguous() {
        let mut expected_offset = 0;
        for slot in INITIAL_LAYOUT {
            assert_eq!(slot.offset, expected_offset, "{}", slot.name);
            expected_offset += slot.size as u64;
        }
        assert_eq!(expected_offset, DATA_OFFSET);
        assert_eq!(EMPTY_RIFF_SIZE as u64, DATA_OFFSET - 8);
    }

    #[test]
    fn empty_container_headers() {
        let riff = RiffHeader::for_empty_container();
        assert_eq!(riff.header.tag, RIFF);
        assert_eq!(riff.header.length, 36);
        assert_eq!(riff.format, WAVE);
        assert_eq!(DataChunkHeader::empty().length(), 0);
        assert_eq!(DataChunkHeader::empty().header.tag, DATA);
    }
}
