//! Stream configuration and negotiated parameters.
//!
//! Opening a writer takes a [`WriterConfig`] in which every option is
//! explicitly `Option`-marked — unset fields are negotiated from the
//! container's defaults at open time rather than smuggled through sentinel
//! zeros. Once a stream is open (for reading or writing) its properties are
//! exposed as a fully-populated, read-only [`StreamParameters`].

use std::time::Duration;

use crate::codec::{AudioChannels, AudioCodec, VideoCodec};
use crate::rational::Rational;

/// Writer configuration with explicit unset markers.
///
/// All fields are optional; unset fields are filled in from the target
/// container's defaults when the writer opens. Width and height have no
/// meaningful default for a pure frame sink, so leaving them unset (or
/// zero) makes `open` fail.
///
/// # Example
///
/// ```
/// use reframe::{Rational, VideoCodec, WriterConfig};
///
/// let config = WriterConfig::new()
///     .width(800)
///     .height(600)
///     .frame_rate(Rational::from(29.97))
///     .video_codec(VideoCodec::Mpeg4)
///     .bit_rate(1_200_000);
/// assert_eq!(config.width, Some(800));
/// assert_eq!(config.video_codec, Some(VideoCodec::Mpeg4));
/// ```
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct WriterConfig {
    /// Frame width in pixels. Required (no negotiable default).
    pub width: Option<u32>,
    /// Frame height in pixels. Required (no negotiable default).
    pub height: Option<u32>,
    /// Target frame rate. Defaults to 25/1 when unset.
    pub frame_rate: Option<Rational>,
    /// Video codec. Defaults to the container's preferred codec.
    pub video_codec: Option<VideoCodec>,
    /// Target bit rate in bits per second. When unset the encoder's own
    /// rate control decides.
    pub bit_rate: Option<usize>,
    /// Audio codec. Defaults to the container's audio codec.
    pub audio_codec: Option<AudioCodec>,
    /// Audio sample rate in hertz. Defaults to the container's value.
    pub audio_sample_rate: Option<u32>,
    /// Audio channel layout. Defaults to the container's value.
    pub audio_channels: Option<AudioChannels>,
}

impl WriterConfig {
    /// Create an empty configuration; every field is unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the frame width in pixels.
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the frame height in pixels.
    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Set the frame rate.
    pub fn frame_rate<R: Into<Rational>>(mut self, rate: R) -> Self {
        self.frame_rate = Some(rate.into());
        self
    }

    /// Set the video codec.
    pub fn video_codec(mut self, codec: VideoCodec) -> Self {
        self.video_codec = Some(codec);
        self
    }

    /// Set the target bit rate in bits per second.
    pub fn bit_rate(mut self, bit_rate: usize) -> Self {
        self.bit_rate = Some(bit_rate);
        self
    }

    /// Set the audio codec.
    pub fn audio_codec(mut self, codec: AudioCodec) -> Self {
        self.audio_codec = Some(codec);
        self
    }

    /// Set the audio sample rate in hertz.
    pub fn audio_sample_rate(mut self, rate: u32) -> Self {
        self.audio_sample_rate = Some(rate);
        self
    }

    /// Set the audio channel layout.
    pub fn audio_channels(mut self, channels: AudioChannels) -> Self {
        self.audio_channels = Some(channels);
        self
    }
}

/// Negotiated properties of an open video stream.
///
/// Populated by the writer after `open` (caller-requested values plus
/// container defaults for everything left unset) or by the reader after
/// probing the input. Width and height are fixed for the lifetime of the
/// stream; every frame written or read matches them exactly.
#[derive(Debug, Clone)]
#[must_use]
pub struct StreamParameters {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Exact frame rate.
    pub frame_rate: Rational,
    /// Bit rate in bits per second. Zero when the encoder/decoder does not
    /// report one.
    pub bit_rate: usize,
    /// Video codec, when it is one of the supported identifiers.
    pub video_codec: Option<VideoCodec>,
    /// FFmpeg's name for the video codec (e.g. `"h264"`, `"ffvhuff"`).
    pub codec_name: String,
    /// Audio parameters: the input's audio stream (reader) or the
    /// container's defaults (writer). `None` only for inputs with no audio
    /// stream at all.
    pub audio: Option<AudioParameters>,
    /// Total media duration: the container's reported duration for readers,
    /// the accumulated written duration for writers. Zero when unknown.
    pub duration: Duration,
}

/// Negotiated audio stream properties.
#[derive(Debug, Clone)]
#[must_use]
pub struct AudioParameters {
    /// Audio codec, when it is one of the supported identifiers.
    pub codec: Option<AudioCodec>,
    /// FFmpeg's name for the audio codec (e.g. `"mp3"`, `"aac"`).
    pub codec_name: String,
    /// Sample rate in hertz.
    pub sample_rate: u32,
    /// Channel layout.
    pub channels: AudioChannels,
}
