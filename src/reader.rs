/// Module containing ``WavReader``, which validates the container headers up front
/// and then decodes frames lazily from a forward-only source.
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use crate::chunk::{read_sub_chunk_header, read_tag, validate_tag, TagKind};
use crate::error::{WavError, WavResult};
use crate::frame::Frame;
use crate::header::{DataChunkHeader, FormatDescriptor, RiffHeader, FMT_PAYLOAD_SIZE};

/// Reads a RIFF/WAVE container one frame at a time.
///
/// Construction reads and validates the RIFF header, the fmt chunk and the data
/// chunk header. Nothing of the data chunk payload is read until
/// [`WavReader::get_sample`] is called.
///
/// ```no_run
/// use wavstream::WavReader;
///
/// let mut reader = WavReader::from_path("input.wav")?;
/// println!("{}", reader.format());
/// while let Some(frame) = reader.get_sample()? {
///     println!("{}", frame);
/// }
/// # Ok::<(), wavstream::WavError>(())
/// ```
pub struct WavReader<R: Read> {
    riff_header: RiffHeader,
    format: FormatDescriptor,
    data_header: DataChunkHeader,
    frames: Vec<Frame>,
    exhausted: bool,
    reader: BufReader<R>,
}

impl<R: Read> WavReader<R> {
    /// Validates the container headers of `source`. Any failure is returned before a reader exists.
    pub fn new(source: R) -> WavResult<Self> {
        Self::from_buf_reader(BufReader::new(source))
    }

    /// Same as [`WavReader::new`] with a read buffer of `capacity` bytes.
    pub fn with_capacity(capacity: usize, source: R) -> WavResult<Self> {
        Self::from_buf_reader(BufReader::with_capacity(capacity, source))
    }

    fn from_buf_reader(mut reader: BufReader<R>) -> WavResult<Self> {
        let riff_header = read_riff_header(&mut reader)?;
        let format = read_format_chunk(&mut reader)?;
        let data_header = read_data_chunk_header(&mut reader)?;
        log!(
            log::Level::Debug,
            "Opened wav stream\n{}\n{}\n{}",
            riff_header,
            format,
            data_header
        );

        Ok(WavReader {
            riff_header,
            format,
            data_header,
            frames: Vec::new(),
            exhausted: false,
            reader,
        })
    }

    /// Decodes the next frame: `num_channels` groups of `bits_per_sample / 8` bytes each.
    ///
    /// Returns `Ok(None)` once the source cannot supply a whole frame. A source that
    /// ends partway through a frame is reported the same way as one that ends
    /// cleanly between frames, and the partial bytes are discarded. After that every
    /// call returns `Ok(None)` without touching the source.
    pub fn get_sample(&mut self) -> WavResult<Option<Frame>> {
        let bytes_per_sample = self.format.bytes_per_channel_sample();
        let num_channels = self.format.num_channels as usize;
        if self.exhausted || bytes_per_sample * num_channels == 0 {
            self.exhausted = true;
            return Ok(None);
        }

        let mut channels = Vec::with_capacity(num_channels);
        for _ in 0..num_channels {
            let mut group = vec![0; bytes_per_sample];
            match self.reader.read_exact(&mut group) {
                Ok(()) => channels.push(group),
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                    self.exhausted = true;
                    return Ok(None);
                }
                Err(e) => return Err(WavError::read("sample", e)),
            }
        }

        let frame = Frame::new(channels);
        self.frames.push(frame.clone());
        Ok(Some(frame))
    }

    /// Iterator over the remaining frames. Stops at end-of-stream, or after yielding the first error.
    pub fn frames(&mut self) -> FrameIterator<'_, R> {
        FrameIterator::new(self)
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

    /// Every frame decoded so far, oldest first.
    pub fn frames_read(&self) -> &[Frame] {
        &self.frames
    }

    /// True once the source has run out of frames.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

impl WavReader<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> WavResult<Self> {
        let f = File::open(path).map_err(|e| WavError::read("file", e))?;
        Self::new(f)
    }
}

fn read_riff_header<R: Read>(reader: &mut R) -> WavResult<RiffHeader> {
    let header = read_sub_chunk_header(reader)?;
    validate_tag(header.tag, TagKind::Riff)?;
    let format = read_tag(reader, "RIFF format")?;
    validate_tag(format, TagKind::Wave)?;
    Ok(RiffHeader { header, format })
}

// Only the fixed 16 bytes are consumed, whatever length the header declares.
fn read_format_chunk<R: Read>(reader: &mut R) -> WavResult<FormatDescriptor> {
    let header = read_sub_chunk_header(reader)?;
    validate_tag(header.tag, TagKind::Fmt)?;
    let mut payload = [0; FMT_PAYLOAD_SIZE];
    reader
        .read_exact(&mut payload)
        .map_err(|e| WavError::read("fmt payload", e))?;
    Ok(FormatDescriptor::from_bytes(header, &payload))
}

fn read_data_chunk_header<R: Read>(reader: &mut R) -> WavResult<DataChunkHeader> {
    let header = read_sub_chunk_header(reader)?;
    validate_tag(header.tag, TagKind::Data)?;
    Ok(DataChunkHeader { header })
}

/// A frame iterator for the WavReader.
/// Yields `Ok(frame)` until the source is exhausted. A read error is yielded once and ends the iteration.
pub struct FrameIterator<'a, R: Read> {
    reader: &'a mut WavReader<R>,
    failed: bool,
}

impl<'a, R: Read> FrameIterator<'a, R> {
    pub fn new(reader: &'a mut WavReader<R>) -> FrameIterator<'a, R> {
        FrameIterator {
            reader,
            failed: false,
        }
    }
}

impl<'a, R: Read> Iterator for FrameIterator<'a, R> {
    type Item = WavResult<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.reader.get_sample() {
            Ok(frame) => frame.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
