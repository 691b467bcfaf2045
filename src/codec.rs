//! Codec and container identifiers.
//!
//! Video files pair a container format (inferred from the file extension)
//! with a video codec. This module defines the supported identifiers, their
//! mapping to FFmpeg codec IDs, and the per-container defaults that fill in
//! options the caller leaves unset.

use std::path::Path;

use ffmpeg_next::codec::Id;
use ffmpeg_next::format::Pixel;

use crate::error::VideoError;

/// Supported video codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoCodec {
    /// MPEG-4 Part 2 (DivX/Xvid family).
    Mpeg4,
    /// H.264 / AVC.
    H264,
    /// H.265 / HEVC.
    Hevc,
    /// VP8.
    Vp8,
    /// VP9.
    Vp9,
    /// Theora.
    Theora,
    /// FFVHUFF — FFmpeg's lossless Huffman codec, useful for exact
    /// round-trip testing.
    FfvHuff,
}

impl VideoCodec {
    /// Map to the corresponding FFmpeg codec ID.
    pub(crate) fn to_codec_id(self) -> Id {
        match self {
            VideoCodec::Mpeg4 => Id::MPEG4,
            VideoCodec::H264 => Id::H264,
            VideoCodec::Hevc => Id::HEVC,
            VideoCodec::Vp8 => Id::VP8,
            VideoCodec::Vp9 => Id::VP9,
            VideoCodec::Theora => Id::THEORA,
            VideoCodec::FfvHuff => Id::FFVHUFF,
        }
    }

    /// Map a probed FFmpeg codec ID back to a known codec, if any.
    ///
    /// Streams encoded with codecs outside this set are still readable;
    /// they are reported by name only.
    pub(crate) fn from_codec_id(id: Id) -> Option<Self> {
        match id {
            Id::MPEG4 => Some(VideoCodec::Mpeg4),
            Id::H264 => Some(VideoCodec::H264),
            Id::HEVC => Some(VideoCodec::Hevc),
            Id::VP8 => Some(VideoCodec::Vp8),
            Id::VP9 => Some(VideoCodec::Vp9),
            Id::THEORA => Some(VideoCodec::Theora),
            Id::FFVHUFF => Some(VideoCodec::FfvHuff),
            _ => None,
        }
    }

    /// The pixel format frames are converted to before encoding.
    ///
    /// Every codec in the supported set accepts planar YUV 4:2:0.
    pub(crate) fn input_pixel_format(self) -> Pixel {
        Pixel::YUV420P
    }

    /// Parse a codec from its lowercase short name (CLI input).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "mpeg4" => Some(VideoCodec::Mpeg4),
            "h264" | "avc" => Some(VideoCodec::H264),
            "h265" | "hevc" => Some(VideoCodec::Hevc),
            "vp8" => Some(VideoCodec::Vp8),
            "vp9" => Some(VideoCodec::Vp9),
            "theora" => Some(VideoCodec::Theora),
            "ffvhuff" => Some(VideoCodec::FfvHuff),
            _ => None,
        }
    }

    /// The codec's lowercase short name.
    pub fn name(self) -> &'static str {
        match self {
            VideoCodec::Mpeg4 => "mpeg4",
            VideoCodec::H264 => "h264",
            VideoCodec::Hevc => "hevc",
            VideoCodec::Vp8 => "vp8",
            VideoCodec::Vp9 => "vp9",
            VideoCodec::Theora => "theora",
            VideoCodec::FfvHuff => "ffvhuff",
        }
    }
}

/// Supported audio codecs.
///
/// The crate does not encode audio (a non-goal); these identifiers exist so
/// the per-container audio defaults are readable after a writer opens, and
/// so probed input files can report their audio codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCodec {
    /// MP3 (MPEG audio layer 3).
    Mp3,
    /// AAC (Advanced Audio Coding).
    Aac,
    /// Vorbis.
    Vorbis,
}

impl AudioCodec {
    /// The codec's lowercase short name.
    pub fn name(self) -> &'static str {
        match self {
            AudioCodec::Mp3 => "mp3",
            AudioCodec::Aac => "aac",
            AudioCodec::Vorbis => "vorbis",
        }
    }
}

/// Audio channel layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioChannels {
    /// One channel.
    Mono,
    /// Two channels.
    Stereo,
}

impl AudioChannels {
    /// Number of channels in the layout.
    pub fn count(self) -> u16 {
        match self {
            AudioChannels::Mono => 1,
            AudioChannels::Stereo => 2,
        }
    }
}

/// Container formats, determined by the output file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    /// Audio Video Interleave (`.avi`).
    Avi,
    /// ISO Base Media / MPEG-4 Part 14 (`.mp4`).
    Mp4,
    /// Matroska (`.mkv`).
    Mkv,
    /// WebM (`.webm`).
    WebM,
    /// Ogg (`.ogg`, `.ogv`).
    Ogg,
    /// QuickTime (`.mov`).
    Mov,
}

impl Container {
    /// Infer the container from a path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`VideoError::UnsupportedContainer`] when the extension is
    /// missing or unrecognized.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, VideoError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .ok_or_else(|| VideoError::UnsupportedContainer {
                path: path.to_path_buf(),
                reason: "missing file extension".to_string(),
            })?;

        match extension.as_str() {
            "avi" => Ok(Container::Avi),
            "mp4" | "m4v" => Ok(Container::Mp4),
            "mkv" => Ok(Container::Mkv),
            "webm" => Ok(Container::WebM),
            "ogg" | "ogv" => Ok(Container::Ogg),
            "mov" => Ok(Container::Mov),
            _ => Err(VideoError::UnsupportedContainer {
                path: path.to_path_buf(),
                reason: format!("unrecognized extension '.{extension}'"),
            }),
        }
    }

    /// The video codec used when the caller does not request one.
    pub fn default_video_codec(self) -> VideoCodec {
        match self {
            Container::Avi => VideoCodec::Mpeg4,
            Container::Mp4 | Container::Mkv | Container::Mov => VideoCodec::H264,
            Container::WebM => VideoCodec::Vp8,
            Container::Ogg => VideoCodec::Theora,
        }
    }

    /// The audio parameters FFmpeg would negotiate for this container:
    /// `(codec, sample_rate, channels)`.
    ///
    /// These are readable after a writer opens even though the crate never
    /// muxes an audio stream.
    pub fn default_audio(self) -> (AudioCodec, u32, AudioChannels) {
        match self {
            Container::Avi => (AudioCodec::Mp3, 44_100, AudioChannels::Stereo),
            Container::Mp4 | Container::Mkv | Container::Mov => {
                (AudioCodec::Aac, 44_100, AudioChannels::Stereo)
            }
            Container::WebM | Container::Ogg => {
                (AudioCodec::Vorbis, 44_100, AudioChannels::Stereo)
            }
        }
    }

    /// Whether this container can store the given video codec.
    pub fn supports(self, codec: VideoCodec) -> bool {
        match self {
            // AVI is a generic RIFF container; everything but Theora is
            // commonly stored in it.
            Container::Avi => codec != VideoCodec::Theora,
            Container::Mp4 | Container::Mov => matches!(
                codec,
                VideoCodec::H264 | VideoCodec::Hevc | VideoCodec::Mpeg4 | VideoCodec::Vp9
            ),
            Container::Mkv => true,
            Container::WebM => matches!(codec, VideoCodec::Vp8 | VideoCodec::Vp9),
            Container::Ogg => matches!(codec, VideoCodec::Theora | VideoCodec::Vp8),
        }
    }

    /// The container's canonical extension.
    pub fn extension(self) -> &'static str {
        match self {
            Container::Avi => "avi",
            Container::Mp4 => "mp4",
            Container::Mkv => "mkv",
            Container::WebM => "webm",
            Container::Ogg => "ogg",
            Container::Mov => "mov",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_from_extension() {
        assert_eq!(Container::from_path("out.avi").unwrap(), Container::Avi);
        assert_eq!(Container::from_path("out.MP4").unwrap(), Container::Mp4);
        assert_eq!(Container::from_path("a/b/c.webm").unwrap(), Container::WebM);
        assert_eq!(Container::from_path("clip.ogv").unwrap(), Container::Ogg);
    }

    #[test]
    fn unrecognized_extension_fails() {
        let err = Container::from_path("out.xyz").unwrap_err();
        assert!(matches!(err, VideoError::UnsupportedContainer { .. }));

        let err = Container::from_path("no_extension").unwrap_err();
        assert!(matches!(err, VideoError::UnsupportedContainer { .. }));
    }

    #[test]
    fn webm_rejects_h264() {
        assert!(!Container::WebM.supports(VideoCodec::H264));
        assert!(Container::WebM.supports(VideoCodec::Vp8));
        assert!(Container::WebM.supports(VideoCodec::Vp9));
    }

    #[test]
    fn avi_audio_defaults_are_mp3_stereo() {
        let (codec, sample_rate, channels) = Container::Avi.default_audio();
        assert_eq!(codec, AudioCodec::Mp3);
        assert_eq!(sample_rate, 44_100);
        assert_eq!(channels, AudioChannels::Stereo);
    }

    #[test]
    fn codec_names_round_trip() {
        for codec in [
            VideoCodec::Mpeg4,
            VideoCodec::H264,
            VideoCodec::Hevc,
            VideoCodec::Vp8,
            VideoCodec::Vp9,
            VideoCodec::Theora,
            VideoCodec::FfvHuff,
        ] {
            assert_eq!(VideoCodec::from_name(codec.name()), Some(codec));
        }
        assert_eq!(VideoCodec::from_name("divx"), None);
    }
}
