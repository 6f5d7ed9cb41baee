/// Module containing ``WavWriter``, which lays down a complete empty container and then
/// appends frames, patching the two running size fields in place after each one.
use std::fs::File;
use std::io::{self, BufWriter, ErrorKind, Seek, SeekFrom, Write};
use std::path::Path;

use num_traits::ToBytes;

use crate::chunk::{SubChunkHeader, FMT};
use crate::error::{WavError, WavResult};
use crate::frame::Frame;
use crate::header::{
    DataChunkHeader, FieldSlot, FormatDescriptor, RiffHeader, DATA_ID, DATA_OFFSET, DATA_SIZE,
    FMT_ID, FMT_PAYLOAD, FMT_PAYLOAD_SIZE, FMT_SIZE, RIFF_FORMAT, RIFF_ID, RIFF_SIZE,
};

/// A sink supporting writes at arbitrary offsets.
pub trait WriteSeek: Write + Seek {}

impl<T: Write + Seek> WriteSeek for T {}

/// Writes a RIFF/WAVE container incrementally.
///
/// The header is always the canonical 44 bytes, so frames start at offset 44 and the
/// only fields that ever change after construction are the RIFF size (offset 4) and
/// the data size (offset 40).
///
/// ```no_run
/// use wavstream::{Frame, WavWriter};
///
/// let mut writer = WavWriter::create("out.wav", None)?;
/// writer.add_sample(Frame::from_samples(&[123i16, -123]))?;
/// writer.finish()?;
/// # Ok::<(), wavstream::WavError>(())
/// ```
pub struct WavWriter<W: WriteSeek> {
    riff_header: RiffHeader,
    format: FormatDescriptor,
    data_header: DataChunkHeader,
    frames: Vec<Frame>,
    writer: W,
}

impl<W: WriteSeek> WavWriter<W> {
    /// Writes an empty but valid container into `sink`, using the default format
    /// when `format` is `None`. The fmt chunk header is always written as a 16 byte chunk.
    pub fn new(sink: W, format: Option<FormatDescriptor>) -> WavResult<Self> {
        let mut format = format.unwrap_or_default();
        format.header = SubChunkHeader::new(FMT, FMT_PAYLOAD_SIZE as u32);

        let mut wav_writer = WavWriter {
            riff_header: RiffHeader::for_empty_container(),
            format,
            data_header: DataChunkHeader::empty(),
            frames: Vec::new(),
            writer: sink,
        };
        wav_writer.write_initial_data()?;
        log!(
            log::Level::Debug,
            "Wrote empty wav container\n{}",
            wav_writer.format
        );
        Ok(wav_writer)
    }

    fn write_initial_data(&mut self) -> WavResult<()> {
        let riff = self.riff_header;
        let fmt = self.format.header;
        let data = self.data_header;
        let fmt_payload = self.format.to_bytes();

        self.write_field(RIFF_ID, riff.header.tag.as_bytes())?;
        self.write_le(RIFF_SIZE, riff.header.length)?;
        self.write_field(RIFF_FORMAT, riff.format.as_bytes())?;

        self.write_field(FMT_ID, fmt.tag.as_bytes())?;
        self.write_le(FMT_SIZE, fmt.length)?;
        self.write_field(FMT_PAYLOAD, &fmt_payload)?;

        self.write_field(DATA_ID, data.header.tag.as_bytes())?;
        self.write_le(DATA_SIZE, data.header.length)?;
        Ok(())
    }

    /// Appends one frame.
    ///
    /// The frame must have one group per channel and `block_align` bytes in total;
    /// both are checked, channels first, before anything is written. The payload is
    /// written at the current end of the data chunk, then the RIFF size and the data
    /// size are patched. A failed write is returned as is: if the payload landed but a
    /// size patch did not, the declared sizes lag behind the bytes in the sink.
    pub fn add_sample(&mut self, frame: Frame) -> WavResult<()> {
        let expected_channels = self.format.num_channels as usize;
        if frame.num_channels() != expected_channels {
            return Err(WavError::ChannelCountMismatch {
                expected: expected_channels,
                found: frame.num_channels(),
            });
        }

        let expected_bytes = self.format.frame_size();
        let counted = frame.byte_len();
        if counted != expected_bytes {
            return Err(WavError::SampleByteCountMismatch {
                expected: expected_bytes,
                found: counted,
            });
        }

        let added = counted as u32;
        let (riff_size, data_size) = match (
            self.riff_header.header.length.checked_add(added),
            self.data_header.header.length.checked_add(added),
        ) {
            (Some(riff_size), Some(data_size)) if counted <= u32::MAX as usize => {
                (riff_size, data_size)
            }
            _ => {
                return Err(WavError::write(
                    DATA_SIZE.name,
                    DATA_SIZE.offset,
                    io::Error::new(ErrorKind::InvalidInput, "data chunk would exceed 4 GiB"),
                ))
            }
        };

        let offset = DATA_OFFSET + self.data_header.header.length as u64;
        self.write_at("sample", offset, &frame.to_bytes())?;

        self.frames.push(frame);
        self.riff_header.header.length = riff_size;
        self.data_header.header.length = data_size;

        self.write_le(RIFF_SIZE, riff_size)?;
        self.write_le(DATA_SIZE, data_size)?;
        log!(
            log::Level::Trace,
            "Appended frame at offset {}, data size now {}",
            offset,
            data_size
        );
        Ok(())
    }

    /// Appends frames in order, stopping at the first failure. Returns how many were written.
    pub fn add_samples<I>(&mut self, frames: I) -> WavResult<usize>
    where
        I: IntoIterator<Item = Frame>,
    {
        let mut written = 0;
        for frame in frames {
            self.add_sample(frame)?;
            written += 1;
        }
        Ok(written)
    }

    pub fn flush(&mut self) -> WavResult<()> {
        let end = self.end_offset();
        self.writer
            .flush()
            .map_err(|e| WavError::write("sink", end, e))
    }

    /// Flushes the sink and hands it back.
    pub fn finish(mut self) -> WavResult<W> {
        self.flush()?;
        log!(
            log::Level::Debug,
            "Finished wav container with {} frames ({} data bytes)",
            self.frames.len(),
            self.data_header.length()
        );
        Ok(self.writer)
    }

    pub fn riff_header(&self) -> &RiffHeader {
        &self.riff_header
    }

    pub fn format(&self) -> &FormatDescriptor {
        &self.format
    }

    pub fn data_header(&self) -> &DataChunkHeader {
        &self.data_header
    }

    /// Every frame appended so far, oldest first.
    pub fn frames_written(&self) -> &[Frame] {
        &self.frames
    }

    /// Bytes of frame payload written so far.
    pub fn data_size(&self) -> u32 {
        self.data_header.length()
    }

    fn end_offset(&self) -> u64 {
        DATA_OFFSET + self.data_header.length() as u64
    }

    fn write_le<T: ToBytes>(&mut self, slot: FieldSlot, value: T) -> WavResult<()> {
        self.write_field(slot, value.to_le_bytes().as_ref())
    }

    fn write_field(&mut self, slot: FieldSlot, bytes: &[u8]) -> WavResult<()> {
        debug_assert_eq!(bytes.len(), slot.size, "{}", slot.name);
        self.write_at(slot.name, slot.offset, bytes)
    }

    fn write_at(&mut self, field: &'static str, offset: u64, bytes: &[u8]) -> WavResult<()> {
        self.writer
            .seek(SeekFrom::Start(offset))
            .and_then(|_| self.writer.write_all(bytes))
            .map_err(|e| WavError::write(field, offset, e))
    }
}

impl WavWriter<BufWriter<File>> {
    /// Creates (or truncates) the file at `path` and writes an empty container into it.
    pub fn create<P: AsRef<Path>>(path: P, format: Option<FormatDescriptor>) -> WavResult<Self> {
        let f = File::create(path).map_err(|e| WavError::write("file", 0, e))?;
        Self::new(BufWriter::new(f), format)
    }
}
