//! Lazy, frame-sequenced video file reader.
//!
//! [`VideoFileReader`] opens an input container, exposes its negotiated
//! stream properties, and produces decoded frames one at a time until the
//! stream is exhausted. Exhaustion is signaled by `Ok(None)` — a sentinel,
//! not an error — and repeats on every subsequent call.
//!
//! # Example
//!
//! ```no_run
//! use reframe::VideoFileReader;
//!
//! let mut reader = VideoFileReader::new();
//! reader.open("input.mp4")?;
//!
//! let parameters = reader.parameters().unwrap();
//! println!(
//!     "{}x{} @ {} fps",
//!     parameters.width, parameters.height, parameters.frame_rate
//! );
//!
//! while let Some(frame) = reader.read_video_frame()? {
//!     // frame is an image::DynamicImage
//!     drop(frame);
//! }
//! reader.close();
//! # Ok::<(), reframe::VideoError>(())
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use ffmpeg_next::Error as FfmpegError;
use ffmpeg_next::Packet;
use ffmpeg_next::codec::context::Context as CodecContext;
use ffmpeg_next::decoder::Video as VideoDecoder;
use ffmpeg_next::format::Pixel;
use ffmpeg_next::format::context::Input;
use ffmpeg_next::frame::Video as VideoFrame;
use ffmpeg_next::media::Type;
use ffmpeg_next::software::scaling::{Context as ScalingContext, Flags as ScalingFlags};
use image::{DynamicImage, RgbImage};

use crate::codec::{AudioChannels, AudioCodec, VideoCodec};
use crate::convert::frame_to_rgb_buffer;
use crate::error::VideoError;
use crate::parameters::{AudioParameters, StreamParameters};
use crate::rational::Rational;

/// Reads a video file frame by frame.
///
/// The reader is a Closed → Open → Closed state machine: construct it,
/// [`open`](VideoFileReader::open) it on an input path, pull frames with
/// [`read_video_frame`](VideoFileReader::read_video_frame) until the
/// end-of-stream sentinel, then [`close`](VideoFileReader::close) (or let
/// drop do it). The decoded sequence is finite and non-restartable; to read
/// the file again, open a new reader.
///
/// Independent readers on distinct files share no state. A single reader
/// instance is not synchronized; callers must serialize access to it.
pub struct VideoFileReader {
    state: Option<OpenState>,
    /// Negotiated parameters, retained after close for inspection.
    parameters: Option<StreamParameters>,
    /// Latched once the decoder is fully drained.
    exhausted: bool,
}

struct OpenState {
    input: Input,
    decoder: VideoDecoder,
    scaler: ScalingContext,
    stream_index: usize,
    decoded: VideoFrame,
    scaled: VideoFrame,
    eof_sent: bool,
    path: PathBuf,
}

impl VideoFileReader {
    /// Create a reader in the closed state.
    pub fn new() -> Self {
        Self {
            state: None,
            parameters: None,
            exhausted: false,
        }
    }

    /// Whether the reader currently has an open stream.
    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    /// Negotiated stream parameters.
    ///
    /// `None` until the first successful [`open`](VideoFileReader::open);
    /// afterwards the parameters remain readable even once the reader is
    /// closed.
    pub fn parameters(&self) -> Option<&StreamParameters> {
        self.parameters.as_ref()
    }

    /// Open an input file and probe its streams.
    ///
    /// Locates the best video stream, prepares a decoder and an RGB
    /// converter, and snapshots the negotiated [`StreamParameters`] —
    /// including the frame rate as an exact [`Rational`].
    ///
    /// # Errors
    ///
    /// [`VideoError::Open`] when the file is absent, unreadable, not a
    /// recognizable media file, or contains no decodable video stream.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<(), VideoError> {
        let path = path.as_ref().to_path_buf();

        if self.state.is_some() {
            return Err(VideoError::Open {
                path,
                reason: "reader is already open".to_string(),
            });
        }

        log::debug!("Opening reader: {}", path.display());

        ffmpeg_next::init().map_err(|error| VideoError::Open {
            path: path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input = ffmpeg_next::format::input(&path).map_err(|error| VideoError::Open {
            path: path.clone(),
            reason: error.to_string(),
        })?;

        let stream = input
            .streams()
            .best(Type::Video)
            .ok_or_else(|| VideoError::Open {
                path: path.clone(),
                reason: "no decodable video stream".to_string(),
            })?;
        let stream_index = stream.index();

        // Exact frame rate from the stream, with the raw rate field as a
        // fallback for containers that omit the average.
        let average = stream.avg_frame_rate();
        let frame_rate = if average.denominator() != 0 && average.numerator() != 0 {
            Rational::from(average)
        } else {
            Rational::from(stream.rate())
        };

        let decoder = CodecContext::from_parameters(stream.parameters())
            .map_err(|error| VideoError::Open {
                path: path.clone(),
                reason: format!("cannot read video codec parameters: {error}"),
            })?
            .decoder()
            .video()
            .map_err(|error| VideoError::Open {
                path: path.clone(),
                reason: format!("cannot create video decoder: {error}"),
            })?;

        let width = decoder.width();
        let height = decoder.height();
        if width == 0 || height == 0 {
            return Err(VideoError::Open {
                path,
                reason: "video stream reports zero dimensions".to_string(),
            });
        }

        let codec_name = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let video_codec = VideoCodec::from_codec_id(decoder.id());
        let bit_rate = decoder.bit_rate();

        let scaler = ScalingContext::get(
            decoder.format(),
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )
        .map_err(|error| VideoError::Open {
            path: path.clone(),
            reason: format!("cannot create pixel format converter: {error}"),
        })?;

        let duration_microseconds = input.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let audio = Self::probe_audio(&input);

        self.parameters = Some(StreamParameters {
            width,
            height,
            frame_rate,
            bit_rate,
            video_codec,
            codec_name,
            audio,
            duration,
        });
        self.exhausted = false;
        self.state = Some(OpenState {
            input,
            decoder,
            scaler,
            stream_index,
            decoded: VideoFrame::empty(),
            scaled: VideoFrame::empty(),
            eof_sent: false,
            path: path.clone(),
        });

        let parameters = self.parameters.as_ref().unwrap();
        log::info!(
            "Opened reader: {} ({}x{} @ {} fps, codec={})",
            path.display(),
            parameters.width,
            parameters.height,
            parameters.frame_rate,
            parameters.codec_name,
        );
        Ok(())
    }

    /// Produce the next decoded frame in presentation order.
    ///
    /// Returns `Ok(Some(frame))` while frames remain and `Ok(None)` once
    /// the stream is exhausted — and on every call after that. Errors are
    /// surfaced, never silently skipped.
    ///
    /// # Errors
    ///
    /// - [`VideoError::NotOpen`] when the reader was never opened or was
    ///   closed before exhaustion.
    /// - [`VideoError::Decode`] on corrupt or truncated input.
    pub fn read_video_frame(&mut self) -> Result<Option<DynamicImage>, VideoError> {
        if self.exhausted {
            return Ok(None);
        }
        let state = self.state.as_mut().ok_or(VideoError::NotOpen)?;

        loop {
            // Drain any frame the decoder already holds.
            match state.decoder.receive_frame(&mut state.decoded) {
                Ok(()) => {
                    state
                        .scaler
                        .run(&state.decoded, &mut state.scaled)
                        .map_err(|error| {
                            VideoError::Decode(format!("pixel conversion failed: {error}"))
                        })?;

                    let width = state.decoded.width();
                    let height = state.decoded.height();
                    let buffer = frame_to_rgb_buffer(&state.scaled, width, height);
                    let image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
                        VideoError::Decode(
                            "failed to assemble RGB image from decoded frame data".to_string(),
                        )
                    })?;
                    return Ok(Some(DynamicImage::ImageRgb8(image)));
                }
                // EAGAIN means the decoder wants more input; EOF means it
                // is drained. Anything else is corruption and must surface.
                Err(FfmpegError::Other { errno })
                    if errno == ffmpeg_sys_next::EAGAIN as i32 => {}
                Err(FfmpegError::Eof) => {}
                Err(error) => {
                    return Err(VideoError::Decode(format!("frame decode failed: {error}")));
                }
            }

            if state.eof_sent {
                // Decoder fully drained: latch the sentinel.
                self.exhausted = true;
                log::debug!("Reader exhausted: {}", state.path.display());
                return Ok(None);
            }

            let mut packet = Packet::empty();
            match packet.read(&mut state.input) {
                Ok(()) => {
                    if packet.stream() == state.stream_index {
                        state.decoder.send_packet(&packet).map_err(|error| {
                            VideoError::Decode(format!("corrupt packet: {error}"))
                        })?;
                    }
                    // Packets of other streams are not ours to decode.
                }
                Err(FfmpegError::Eof) => {
                    state
                        .decoder
                        .send_eof()
                        .map_err(|error| VideoError::Decode(error.to_string()))?;
                    state.eof_sent = true;
                }
                Err(error) => {
                    return Err(VideoError::Decode(format!("packet read failed: {error}")));
                }
            }
        }
    }

    /// Iterate over the remaining frames.
    ///
    /// The iterator yields `Result<DynamicImage, VideoError>` and ends at
    /// the end-of-stream sentinel. It borrows the reader mutably, so no
    /// other operation can run while it is alive.
    pub fn frames(&mut self) -> Frames<'_> {
        Frames { reader: self }
    }

    /// Release the demuxer and decoder resources.
    ///
    /// Idempotent: closing an already-closed reader is a no-op. The
    /// negotiated [`parameters()`](Self::parameters) remain readable.
    pub fn close(&mut self) {
        if let Some(state) = self.state.take() {
            log::debug!("Closed reader: {}", state.path.display());
        }
    }

    /// Probe the best audio stream's parameters, if one exists.
    fn probe_audio(input: &Input) -> Option<AudioParameters> {
        let stream = input.streams().best(Type::Audio)?;
        let decoder = CodecContext::from_parameters(stream.parameters())
            .ok()?
            .decoder()
            .audio()
            .ok()?;

        let codec_name = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let codec = match decoder.id() {
            ffmpeg_next::codec::Id::MP3 => Some(AudioCodec::Mp3),
            ffmpeg_next::codec::Id::AAC => Some(AudioCodec::Aac),
            ffmpeg_next::codec::Id::VORBIS => Some(AudioCodec::Vorbis),
            _ => None,
        };
        let channels = if decoder.channels() <= 1 {
            AudioChannels::Mono
        } else {
            AudioChannels::Stereo
        };

        Some(AudioParameters {
            codec,
            codec_name,
            sample_rate: decoder.rate(),
            channels,
        })
    }
}

impl Default for VideoFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for VideoFileReader {
    fn drop(&mut self) {
        self.close();
    }
}

/// Iterator over a reader's remaining frames.
///
/// Created by [`VideoFileReader::frames`].
pub struct Frames<'a> {
    reader: &'a mut VideoFileReader,
}

impl Iterator for Frames<'_> {
    type Item = Result<DynamicImage, VideoError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_video_frame().transpose()
    }
}
