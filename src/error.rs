//! Error types for the `reframe` crate.
//!
//! This module defines [`VideoError`], the unified error type returned by all
//! fallible operations in the crate. Errors carry rich context to aid
//! debugging, including file paths, stream dimensions, and upstream error
//! messages.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use thiserror::Error;

/// The unified error type for all `reframe` operations.
///
/// Every public method that can fail returns `Result<T, VideoError>`.
/// Variants carry enough context to diagnose the problem without needing
/// additional logging at the call site.
///
/// No error is retried internally. After any error the stream that produced
/// it should be considered unusable and closed — the single exception is
/// [`FrameMismatch`](VideoError::FrameMismatch), which is raised before the
/// frame reaches the encoder and leaves the stream intact.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VideoError {
    /// The video file could not be opened for reading or writing.
    #[error("Failed to open video file at {path}: {reason}")]
    Open {
        /// Path that was passed to `open`.
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file extension does not map to a supported container, or the
    /// requested codec cannot be stored in that container.
    #[error("Unsupported container for {path}: {reason}")]
    UnsupportedContainer {
        /// Path whose extension was inspected.
        path: PathBuf,
        /// Why the container/codec combination was rejected.
        reason: String,
    },

    /// A frame's dimensions do not match the open stream's negotiated size.
    #[error(
        "Frame size {actual_width}x{actual_height} does not match stream size {expected_width}x{expected_height}"
    )]
    FrameMismatch {
        /// Width negotiated at open time.
        expected_width: u32,
        /// Height negotiated at open time.
        expected_height: u32,
        /// Width of the rejected frame.
        actual_width: u32,
        /// Height of the rejected frame.
        actual_height: u32,
    },

    /// A video frame could not be decoded (corrupt or truncated input).
    #[error("Failed to decode video frame: {0}")]
    Decode(String),

    /// A video frame could not be encoded.
    #[error("Failed to encode video frame: {0}")]
    Encode(String),

    /// The operation requires an open stream, but the stream is closed.
    #[error("Stream is not open")]
    NotOpen,

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),
}

impl From<FfmpegError> for VideoError {
    fn from(error: FfmpegError) -> Self {
        VideoError::Ffmpeg(error.to_string())
    }
}
