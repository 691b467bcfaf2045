//! # reframe
//!
//! Read, write, and re-encode video files frame by frame with exact
//! rational frame rates.
//!
//! `reframe` provides a small, ergonomic façade over FFmpeg (via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate) for
//! frame-sequenced video I/O: push [`image::DynamicImage`] frames into a
//! container, pull decoded frames back out, and shuttle frames between the
//! two to re-encode across codecs and containers. All actual encoding,
//! decoding, muxing, and color-space conversion is delegated to the linked
//! FFmpeg libraries.
//!
//! ## Quick Start
//!
//! ### Write frames
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
//! ).unwrap();
//!
//! for shade in 0u8..255 {
//!     let frame = DynamicImage::ImageRgb8(RgbImage::from_pixel(
//!         800, 600, image::Rgb([shade, shade, shade]),
//!     ));
//!     writer.write_video_frame(&frame).unwrap();
//! }
//! writer.close().unwrap();
//! ```
//!
//! ### Read frames back
//!
//! ```no_run
//! use reframe::VideoFileReader;
//!
//! let mut reader = VideoFileReader::new();
//! reader.open("output.avi").unwrap();
//! while let Some(frame) = reader.read_video_frame().unwrap() {
//!     println!("{}x{}", frame.width(), frame.height());
//! }
//! ```
//!
//! ### Re-encode
//!
//! ```no_run
//! use reframe::{VideoCodec, reencode};
//!
//! reencode("input.mp4", "output.webm", VideoCodec::Vp8).unwrap();
//! ```
//!
//! ## Exact frame rates
//!
//! Frame rates are carried as [`Rational`] values — exact integer ratios,
//! not floats — so 29.97 fps is stored as 2997/100 and survives a
//! write→close→read round trip without drift.
//!
//! ## Concurrency
//!
//! All calls are synchronous and blocking. A single [`VideoFileWriter`] or
//! [`VideoFileReader`] instance must not be used from multiple threads
//! concurrently; distinct instances on distinct files are fully
//! independent.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system for
//! `ffmpeg-sys-next` to link against.

pub mod codec;
mod convert;
pub mod error;
pub mod ffmpeg;
pub mod parameters;
pub mod probe;
pub mod rational;
pub mod reader;
pub mod reencode;
pub mod writer;

pub use codec::{AudioChannels, AudioCodec, Container, VideoCodec};
pub use error::VideoError;
pub use ffmpeg::{LogLevel, native_log_level, set_native_log_level};
pub use parameters::{AudioParameters, StreamParameters, WriterConfig};
pub use probe::probe;
pub use rational::Rational;
pub use reader::{Frames, VideoFileReader};
pub use reencode::{ReencodeSummary, reencode};
pub use writer::VideoFileWriter;
