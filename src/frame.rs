//! One sample instant across all channels.
use std::fmt::Display;
use std::ops::Deref;

use num_traits::{FromBytes, ToBytes};

use crate::error::{WavError, WavResult};

/// An ordered list of per-channel byte groups.
///
/// The bytes are raw little-endian PCM and are never interpreted by the reader or
/// the writer. [`Frame::from_samples`] and [`Frame::to_samples`] are provided for
/// callers who want typed values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    channels: Vec<Vec<u8>>,
}

impl Frame {
    pub fn new(channels: Vec<Vec<u8>>) -> Self {
        Frame { channels }
    }

    /// Encodes one typed sample per channel, little-endian.
    ///
    /// ```no_run
    /// use wavstream::Frame;
    ///
    /// let frame = Frame::from_samples(&[123i16, -123]);
    /// assert_eq!(frame.to_bytes(), vec![0x7b, 0x00, 0x85, 0xff]);
    /// ```
    pub fn from_samples<T: ToBytes>(samples: &[T]) -> Self {
        Frame {
            channels: samples
                .iter()
                .map(|s| s.to_le_bytes().as_ref().to_vec())
                .collect(),
        }
    }

    /// Decodes each channel as a little-endian `T`. Fails if a channel is not exactly `T`'s width.
    pub fn to_samples<T>(&self) -> WavResult<Vec<T>>
    where
        T: FromBytes,
        T::Bytes: Default,
    {
        let mut samples = Vec::with_capacity(self.channels.len());
        for group in &self.channels {
            let mut buf = T::Bytes::default();
            let width = buf.as_ref().len();
            if group.len() != width {
                return Err(WavError::SampleByteCountMismatch {
                    expected: width,
                    found: group.len(),
                });
            }
            buf.as_mut().copy_from_slice(group);
            samples.push(T::from_le_bytes(&buf));
        }
        Ok(samples)
    }

    pub fn channels(&self) -> &[Vec<u8>] {
        &self.channels
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Total bytes across all channel groups.
    pub fn byte_len(&self) -> usize {
        self.channels.iter().map(Vec::len).sum()
    }

    /// The channel groups concatenated in order, as they appear in the data chunk.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.byte_len());
        for group in &self.channels {
            bytes.extend_from_slice(group);
        }
        bytes
    }

    pub fn into_inner(self) -> Vec<Vec<u8>> {
        self.channels
    }
}

impl Deref for Frame {
    type Target = [Vec<u8>];

    fn deref(&self) -> &Self::Target {
        &self.channels
    }
}

impl AsRef<[Vec<u8>]> for Frame {
    fn as_ref(&self) -> &[Vec<u8>] {
        &self.channels
    }
}

impl From<Vec<Vec<u8>>> for Frame {
    fn from(channels: Vec<Vec<u8>>) -> Self {
        Frame { channels }
    }
}

impl Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", &self.channels)
    }
}

#[cfg(test)]
mod frame_tests {
    use super::*;

    #[test]
    fn samples_are_little_endian() {
        let frame = Frame::from_samples(&[123i16, -123]);
        assert_eq!(frame.channels(), &[vec![0x7b, 0x00], vec![0x85, 0xff]]);
        assert_eq!(frame.byte_len(), 4);
        assert_eq!(frame.num_channels(), 2);
        assert_eq!(frame.to_bytes(), vec![0x7b, 0x00, 0x85, 0xff]);
    }

    #[test]
    fn decode_matches_encode() {
        let frame = Frame::from_samples(&[321i32, -321, i32::MAX]);
        assert_eq!(frame.to_samples::<i32>().unwrap(), vec![321, -321, i32::MAX]);
    }

    #[test]
    fn decode_rejects_wrong_width() {
        let frame = Frame::new(vec![vec![1, 2, 3]]);
        match frame.to_samples::<i16>() {
            Err(WavError::SampleByteCountMismatch { expected, found }) => {
                assert_eq!((expected, found), (2, 3));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn ragged_channels_concatenate_in_order() {
        let frame = Frame::from(vec![vec![1], vec![2, 3], vec![]]);
        assert_eq!(frame.byte_len(), 3);
        assert_eq!(frame.to_bytes(), vec![1, 2, 3]);
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.into_inner()[1], vec![2, 3]);
    }
}
