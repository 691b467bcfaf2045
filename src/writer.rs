//! Frame-sequenced video file writer.
//!
//! [`VideoFileWriter`] opens an output container/codec pair, accepts a
//! sequence of still images with optional per-frame durations, and finalizes
//! the file on close. The container is inferred from the output path's
//! extension; options left unset in the [`WriterConfig`] are negotiated from
//! the container's defaults and become readable through
//! [`parameters()`](VideoFileWriter::parameters) once the stream is open.
//!
//! # Example
//!
//! ```no_run
//! use image::{DynamicImage, RgbImage};
//! use reframe::{Rational, VideoCodec, VideoFileWriter, WriterConfig};
//!
//! let mut writer = VideoFileWriter::new();
//! writer.open(
//!     "output.avi",
//!     WriterConfig::new()
//!         .width(800)
//!         .height(600)
//!         .frame_rate(Rational::from(24))
//!         .video_codec(VideoCodec::Mpeg4)
//!         .bit_rate(1_200_000),
//! )?;
//!
//! let frame = DynamicImage::ImageRgb8(RgbImage::new(800, 600));
//! writer.write_video_frame(&frame)?;
//! writer.close()?;
//! # Ok::<(), reframe::VideoError>(())
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use ffmpeg_next::Rational as FfmpegRational;
use ffmpeg_next::codec::context::Context as CodecContext;
use ffmpeg_next::encoder::video::Encoder as OpenedVideoEncoder;
use ffmpeg_next::format::context::Output;
use ffmpeg_next::format::{Flags as FormatFlags, Pixel};
use ffmpeg_next::frame::Video as VideoFrame;
use ffmpeg_next::software::scaling::{Context as ScalingContext, Flags as ScalingFlags};
use ffmpeg_next::Packet;
use image::DynamicImage;

use crate::codec::Container;
use crate::convert::{duration_to_timestamp, rgb_image_to_frame};
use crate::error::VideoError;
use crate::parameters::{AudioParameters, StreamParameters, WriterConfig};
use crate::rational::Rational;

/// Writes a sequence of still images into a video file.
///
/// The writer is a Closed → Open → Closed state machine: construct it,
/// [`open`](VideoFileWriter::open) it with a target path and configuration,
/// push frames with [`write_video_frame`](VideoFileWriter::write_video_frame),
/// then [`close`](VideoFileWriter::close) to flush and finalize the
/// container. Dropping an open writer performs a best-effort close, but an
/// explicit `close()` is the only way to observe flush errors.
///
/// Independent writers on distinct files share no state and may run on
/// separate threads without coordination. A single writer instance is not
/// synchronized; callers must serialize access to it.
pub struct VideoFileWriter {
    state: Option<OpenState>,
    /// Negotiated parameters, retained after close for inspection.
    parameters: Option<StreamParameters>,
    /// Cumulative sum of all written frame durations.
    elapsed: Duration,
}

struct OpenState {
    output: Output,
    encoder: OpenedVideoEncoder,
    scaler: ScalingContext,
    stream_index: usize,
    /// Time base the encoder was configured with (one nominal frame).
    encoder_time_base: FfmpegRational,
    /// Last PTS handed to the encoder, for monotonicity enforcement.
    last_pts: Option<i64>,
    path: PathBuf,
}

impl VideoFileWriter {
    /// Create a writer in the closed state.
    pub fn new() -> Self {
        Self {
            state: None,
            parameters: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Whether the writer currently has an open stream.
    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    /// Negotiated stream parameters.
    ///
    /// `None` until the first successful [`open`](VideoFileWriter::open);
    /// afterwards the parameters remain readable even once the writer is
    /// closed.
    pub fn parameters(&self) -> Option<&StreamParameters> {
        self.parameters.as_ref()
    }

    /// Total duration written so far: the exact sum of every frame duration
    /// passed to (or defaulted by) the write calls. Monotonically
    /// non-decreasing; still readable after close.
    pub fn duration(&self) -> Duration {
        self.elapsed
    }

    /// Open an output file for writing.
    ///
    /// The container format is inferred from the path's extension. Options
    /// left unset in `config` are filled from the container's defaults;
    /// width and height have no negotiable default and must be set to
    /// non-zero values.
    ///
    /// # Errors
    ///
    /// - [`VideoError::UnsupportedContainer`] for an unrecognized extension
    ///   or a codec the container cannot store.
    /// - [`VideoError::Open`] for inconsistent parameters (zero or unset
    ///   width/height), an unwritable path, or an unavailable encoder.
    pub fn open<P: AsRef<Path>>(
        &mut self,
        path: P,
        config: WriterConfig,
    ) -> Result<(), VideoError> {
        let path = path.as_ref().to_path_buf();

        if self.state.is_some() {
            return Err(VideoError::Open {
                path,
                reason: "writer is already open".to_string(),
            });
        }

        let container = Container::from_path(&path)?;
        let codec = config
            .video_codec
            .unwrap_or_else(|| container.default_video_codec());

        if !container.supports(codec) {
            return Err(VideoError::UnsupportedContainer {
                path,
                reason: format!(
                    "codec {} cannot be stored in a .{} container",
                    codec.name(),
                    container.extension(),
                ),
            });
        }

        let width = config.width.unwrap_or(0);
        let height = config.height.unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(VideoError::Open {
                path,
                reason: format!("invalid frame size {width}x{height}"),
            });
        }

        // FFmpeg's own default for an unset rate.
        let frame_rate = config.frame_rate.unwrap_or_else(|| Rational::new(25, 1));
        if frame_rate.numerator() <= 0 {
            return Err(VideoError::Open {
                path,
                reason: format!("invalid frame rate {frame_rate}"),
            });
        }

        log::debug!(
            "Opening writer: {} ({}x{} @ {} fps, codec={})",
            path.display(),
            width,
            height,
            frame_rate,
            codec.name(),
        );

        ffmpeg_next::init().map_err(|error| VideoError::Open {
            path: path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let mut output = ffmpeg_next::format::output(&path).map_err(|error| VideoError::Open {
            path: path.clone(),
            reason: error.to_string(),
        })?;

        // Check the global-header requirement before adding the stream to
        // avoid a borrow conflict with the format context.
        let needs_global_header = output.format().flags().contains(FormatFlags::GLOBAL_HEADER);

        let codec_id = codec.to_codec_id();
        let encoder_codec =
            ffmpeg_next::encoder::find(codec_id).ok_or_else(|| VideoError::Open {
                path: path.clone(),
                reason: format!("encoder for codec {} not available", codec.name()),
            })?;

        let mut stream = output
            .add_stream(encoder_codec)
            .map_err(|error| VideoError::Open {
                path: path.clone(),
                reason: format!("cannot add video stream: {error}"),
            })?;
        let stream_index = stream.index();

        let mut encoder = CodecContext::from_parameters(stream.parameters())
            .map_err(|error| VideoError::Open {
                path: path.clone(),
                reason: format!("cannot create codec context: {error}"),
            })?
            .encoder()
            .video()
            .map_err(|error| VideoError::Open {
                path: path.clone(),
                reason: format!("cannot create video encoder: {error}"),
            })?;

        // One tick of the encoder clock is one nominal frame.
        let encoder_time_base: FfmpegRational = frame_rate.invert().into();
        let ffmpeg_rate: FfmpegRational = frame_rate.into();

        encoder.set_width(width);
        encoder.set_height(height);
        encoder.set_format(codec.input_pixel_format());
        encoder.set_time_base(encoder_time_base);
        encoder.set_frame_rate(Some(ffmpeg_rate));

        if let Some(bit_rate) = config.bit_rate {
            encoder.set_bit_rate(bit_rate);
        }

        if needs_global_header {
            unsafe {
                (*encoder.as_mut_ptr()).flags |=
                    ffmpeg_sys_next::AV_CODEC_FLAG_GLOBAL_HEADER as i32;
            }
        }

        let encoder = encoder
            .open_as(encoder_codec)
            .map_err(|error| VideoError::Open {
                path: path.clone(),
                reason: format!("cannot open {} encoder: {error}", codec.name()),
            })?;

        stream.set_parameters(&encoder);
        stream.set_time_base(encoder_time_base);
        unsafe {
            let raw_stream = stream.as_mut_ptr();
            (*raw_stream).r_frame_rate = ffmpeg_rate.into();
            (*raw_stream).avg_frame_rate = ffmpeg_rate.into();
        }

        output.write_header().map_err(|error| VideoError::Open {
            path: path.clone(),
            reason: format!("cannot write container header: {error}"),
        })?;

        let scaler = ScalingContext::get(
            Pixel::RGB24,
            width,
            height,
            codec.input_pixel_format(),
            width,
            height,
            ScalingFlags::BILINEAR,
        )
        .map_err(|error| VideoError::Open {
            path: path.clone(),
            reason: format!("cannot create pixel format converter: {error}"),
        })?;

        // The opened encoder context carries whatever rate its own rate
        // control settled on when the caller did not request one.
        let negotiated_bit_rate = unsafe { (*encoder.as_ptr()).bit_rate } as usize;
        let bit_rate = config.bit_rate.unwrap_or(negotiated_bit_rate);
        let (audio_codec, audio_sample_rate, audio_channels) = container.default_audio();

        self.parameters = Some(StreamParameters {
            width,
            height,
            frame_rate,
            bit_rate,
            video_codec: Some(codec),
            codec_name: codec.name().to_string(),
            audio: Some(AudioParameters {
                codec: Some(config.audio_codec.unwrap_or(audio_codec)),
                codec_name: config.audio_codec.unwrap_or(audio_codec).name().to_string(),
                sample_rate: config.audio_sample_rate.unwrap_or(audio_sample_rate),
                channels: config.audio_channels.unwrap_or(audio_channels),
            }),
            duration: Duration::ZERO,
        });
        self.elapsed = Duration::ZERO;
        self.state = Some(OpenState {
            output,
            encoder,
            scaler,
            stream_index,
            encoder_time_base,
            last_pts: None,
            path: path.clone(),
        });

        log::info!("Opened writer: {}", path.display());
        Ok(())
    }

    /// Write a frame that stays on screen for one nominal frame interval
    /// (`1 / frame_rate`).
    ///
    /// See [`write_video_frame_with_duration`](Self::write_video_frame_with_duration).
    pub fn write_video_frame(&mut self, frame: &DynamicImage) -> Result<(), VideoError> {
        let frame_rate = self
            .parameters
            .as_ref()
            .filter(|_| self.state.is_some())
            .map(|parameters| parameters.frame_rate)
            .ok_or(VideoError::NotOpen)?;

        let nominal = Duration::from_secs_f64(
            frame_rate.denominator() as f64 / frame_rate.numerator() as f64,
        );
        self.write_video_frame_with_duration(frame, nominal)
    }

    /// Write a frame with an explicit presentation duration.
    ///
    /// The frame's dimensions must exactly match the stream's negotiated
    /// width and height. The duration is added to the cumulative total
    /// returned by [`duration()`](Self::duration).
    ///
    /// # Errors
    ///
    /// - [`VideoError::NotOpen`] when the writer is closed.
    /// - [`VideoError::FrameMismatch`] on a dimension mismatch. The check
    ///   runs before the frame reaches the encoder, so the stream stays
    ///   usable and subsequent correctly-sized writes succeed.
    /// - [`VideoError::Encode`] when the encoder rejects the frame.
    pub fn write_video_frame_with_duration(
        &mut self,
        frame: &DynamicImage,
        duration: Duration,
    ) -> Result<(), VideoError> {
        let state = self.state.as_mut().ok_or(VideoError::NotOpen)?;
        let parameters = self.parameters.as_ref().ok_or(VideoError::NotOpen)?;

        if frame.width() != parameters.width || frame.height() != parameters.height {
            return Err(VideoError::FrameMismatch {
                expected_width: parameters.width,
                expected_height: parameters.height,
                actual_width: frame.width(),
                actual_height: frame.height(),
            });
        }

        let rgb = frame.to_rgb8();
        let source = rgb_image_to_frame(&rgb, parameters.width, parameters.height);

        let mut scaled = VideoFrame::empty();
        state
            .scaler
            .run(&source, &mut scaled)
            .map_err(|error| VideoError::Encode(format!("pixel conversion failed: {error}")))?;

        // Presentation timestamp from the cumulative elapsed time, nudged
        // forward when rounding would collide with the previous frame.
        let mut pts = duration_to_timestamp(self.elapsed, state.encoder_time_base);
        if let Some(last) = state.last_pts {
            if pts <= last {
                pts = last + 1;
            }
        }
        scaled.set_pts(Some(pts));
        state.last_pts = Some(pts);

        state
            .encoder
            .send_frame(&scaled)
            .map_err(|error| VideoError::Encode(format!("send_frame failed: {error}")))?;

        Self::drain_packets(state)?;

        self.elapsed += duration;
        if let Some(parameters) = self.parameters.as_mut() {
            parameters.duration = self.elapsed;
        }
        Ok(())
    }

    /// Flush the encoder, write the container trailer, and close the file.
    ///
    /// Idempotent: closing an already-closed writer is a no-op. The
    /// accumulated [`duration()`](Self::duration) and negotiated
    /// [`parameters()`](Self::parameters) remain readable afterwards.
    ///
    /// # Errors
    ///
    /// [`VideoError::Encode`] or [`VideoError::Ffmpeg`] when flushing fails;
    /// the writer transitions to closed either way.
    pub fn close(&mut self) -> Result<(), VideoError> {
        let Some(mut state) = self.state.take() else {
            return Ok(());
        };

        log::debug!("Closing writer: {}", state.path.display());

        state
            .encoder
            .send_eof()
            .map_err(|error| VideoError::Encode(format!("send_eof failed: {error}")))?;
        Self::drain_packets(&mut state)?;

        state
            .output
            .write_trailer()
            .map_err(|error| VideoError::Ffmpeg(format!("cannot write trailer: {error}")))?;

        log::info!(
            "Closed writer: {} ({:.2}s written)",
            state.path.display(),
            self.elapsed.as_secs_f64(),
        );
        Ok(())
    }

    /// Receive every packet the encoder currently has and interleave it
    /// into the container, rescaling timestamps from the encoder clock to
    /// the muxer-chosen stream time base.
    fn drain_packets(state: &mut OpenState) -> Result<(), VideoError> {
        let mut packet = Packet::empty();
        while state.encoder.receive_packet(&mut packet).is_ok() {
            packet.set_stream(state.stream_index);
            let stream_time_base = state
                .output
                .stream(state.stream_index)
                .ok_or(VideoError::NotOpen)?
                .time_base();
            packet.rescale_ts(state.encoder_time_base, stream_time_base);
            packet
                .write_interleaved(&mut state.output)
                .map_err(|error| VideoError::Ffmpeg(format!("write packet failed: {error}")))?;
        }
        Ok(())
    }
}

impl Default for VideoFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for VideoFileWriter {
    fn drop(&mut self) {
        if self.state.is_some() {
            if let Err(error) = self.close() {
                log::warn!("Writer dropped while open; close failed: {error}");
            }
        }
    }
}
