//! # wavstream
//!
//! wavstream reads and writes RIFF/WAVE containers incrementally. It validates the
//! container's chunk structure, gives typed access to the fmt chunk and streams raw
//! PCM frames in and out without holding the audio payload in memory.
//!
//! ## Core Features
//!
//! - **Eager header validation**: the RIFF header, fmt chunk and data chunk header are
//!   checked before a reader exists. Any bad tag or short read aborts construction.
//! - **Lazy frame decoding**: frames are read one at a time from a forward-only source.
//! - **Incremental writing**: the writer lays down a complete, empty 44 byte container
//!   and keeps both size fields correct as each frame is appended.
//! - **Raw frames**: a [`Frame`] is a list of per-channel byte groups. Converting to
//!   numbers is left to the caller ([`Frame::to_samples`] helps with that).
//!
//! ## Optional Features
//!
//! - `logging`: debug and trace records through the `log` crate
//! - `colored`: coloured `Display` output for the fmt chunk
//!
//! ## Quick Examples
//!
//! ### Reading Audio
//!
//! ```no_run
//! use wavstream::WavReader;
//!
//! let mut reader = WavReader::from_path("input.wav")?;
//! println!("Channels: {}", reader.format().num_channels);
//! println!("Sample Rate: {}", reader.format().sample_rate);
//!
//! for frame in reader.frames() {
//!     let samples: Vec<i16> = frame?.to_samples()?;
//!     // Process one frame...
//! }
//! # Ok::<(), wavstream::WavError>(())
//! ```
//!
//! ### Writing Audio
//!
//! ```no_run
//! use wavstream::{Frame, FormatDescriptor, WavWriter};
//!
//! let format = FormatDescriptor::new(1, 1, 16000, 16);
//! let mut writer = WavWriter::create("sine.wav", Some(format))?;
//! for i in 0..16000 {
//!     let t = i as f32 / 16000.0;
//!     let s = ((t * 440.0 * 2.0 * std::f32::consts::PI).sin() * i16::MAX as f32) as i16;
//!     writer.add_sample(Frame::from_samples(&[s]))?;
//! }
//! writer.finish()?;
//! # Ok::<(), wavstream::WavError>(())
//! ```
//!
//! ## Error Handling
//!
//! wavstream uses the `WavResult<T>` type alias for operations that can fail:
//!
//! ```no_run
//! pub type WavResult<T> = Result<T, WavError>;
//! ```
//!
//! Running out of input while reading headers is a [`WavError::Read`] for which
//! [`WavError::is_end_of_stream`] is true. Running out of input between frames is not an
//! error at all: [`WavReader::get_sample`] returns `Ok(None)`.

/// A macro for logging messages if the logging feature is enabled.
macro_rules! log {
    ($level:expr, $($arg:tt)+) => {
        #[cfg(feature = "logging")]
        log::log!($level, $($arg)+);
    };
}

pub mod chunk;
pub mod error;
pub mod frame;
pub mod header;
pub mod reader;
pub mod writer;

use std::path::Path;

pub use crate::chunk::{ChunkTag, SubChunkHeader, TagKind, DATA, FMT, RIFF, WAVE};
pub use crate::error::{WavError, WavResult};
pub use crate::frame::Frame;
pub use crate::header::{DataChunkHeader, FormatDescriptor, RiffHeader};
pub use crate::reader::{FrameIterator, WavReader};
pub use crate::writer::{WavWriter, WriteSeek};

/// Reads every frame of a wav file.
///
/// # Examples
///
/// ```no_run
/// use wavstream::read;
///
/// let (format, frames) = read("path/to/wav.wav")?;
/// println!("{} frames at {} Hz", frames.len(), format.sample_rate);
/// # Ok::<(), wavstream::WavError>(())
/// ```
pub fn read<P: AsRef<Path>>(path: P) -> WavResult<(FormatDescriptor, Vec<Frame>)> {
    let mut reader = WavReader::from_path(&path)?;
    let frames = reader.frames().collect::<WavResult<Vec<Frame>>>()?;
    log!(
        log::Level::Debug,
        "Read {} frames from {}",
        frames.len(),
        path.as_ref().display()
    );
    Ok((*reader.format(), frames))
}

/// Writes frames to a new wav file, using the default format when `format` is `None`.
///
/// # Examples
///
/// ```no_run
/// use wavstream::{write, Frame};
///
/// let frames = (0..100i16).map(|i| Frame::from_samples(&[i, -i]));
/// write("./wav.wav", frames, None)?;
/// # Ok::<(), wavstream::WavError>(())
/// ```
pub fn write<P, I>(path: P, frames: I, format: Option<FormatDescriptor>) -> WavResult<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = Frame>,
{
    let mut writer = WavWriter::create(&path, format)?;
    writer.add_samples(frames)?;
    writer.finish()?;
    log!(
        log::Level::Debug,
        "Wrote wav file to {}",
        path.as_ref().display()
    );
    Ok(())
}

#[cfg(test)]
mod lib_tests {
    use super::*;
    use std::path::PathBuf;

    fn tmp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("wavstream_{}_{}.wav", std::process::id(), name))
    }

    #[test]
    fn write_then_read_file() {
        let out_path = tmp_path("stereo_i16");
        let frames: Vec<Frame> = (0..64i16)
            .map(|i| Frame::from_samples(&[i * 100, -i * 100]))
            .collect();

        write(&out_path, frames.clone(), None).expect("Failed to write data");
        let (format, read_frames) = read(&out_path).expect("Failed to read data");

        assert_eq!(format, FormatDescriptor::default());
        assert_eq!(read_frames, frames);
        let file_len = std::fs::metadata(&out_path).unwrap().len();
        assert_eq!(file_len, 44 + 64 * 4);
        std::fs::remove_file(&out_path).unwrap();
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = read(tmp_path("does_not_exist")).unwrap_err();
        assert!(matches!(err, WavError::Read { field: "file", .. }));
    }

    #[test]
    fn invalid_frame_aborts_write() {
        let out_path = tmp_path("invalid_frame");
        let frames = vec![Frame::from_samples(&[1i16, 2, 3])];
        let err = write(&out_path, frames, None).unwrap_err();
        assert!(matches!(
            err,
            WavError::ChannelCountMismatch {
                expected: 2,
                found: 3
            }
        ));
        std::fs::remove_file(&out_path).unwrap();
    }

    macro_rules! round_trip_tests {
        ($(($T:ident, $bits:literal, $channels:literal)), *) => {
            $(
                paste::item! {
                    #[test]
                    fn [<round_trip_ $T _with_ $channels _channels>]() {
                        let out_path = tmp_path(&format!("{}_{}", stringify!($T), $channels));
                        let format = FormatDescriptor::new(1, $channels, 8000, $bits);
                        let samples: Vec<Vec<$T>> = (0..32)
                            .map(|i| (0..$channels).map(|c| (i * 3 + c) as $T).collect())
                            .collect();

                        write(
                            &out_path,
                            samples.iter().map(|s| Frame::from_samples(s)),
                            Some(format),
                        )
                        .expect("Failed to write file");
                        let (read_format, frames) = read(&out_path).expect("Failed to read file");
                        assert_eq!(read_format, format);

                        let decoded: Vec<Vec<$T>> = frames
                            .iter()
                            .map(|f| f.to_samples::<$T>().unwrap())
                            .collect();
                        assert_eq!(decoded, samples);
                        std::fs::remove_file(&out_path).unwrap();
                    }
                }
            )*
        };
    }

    round_trip_tests!((u8, 8, 1), (i16, 16, 2), (i32, 32, 2), (i16, 16, 6));
}
