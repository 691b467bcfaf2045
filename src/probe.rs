//! Lightweight stream probing.
//!
//! [`probe`] extracts a file's negotiated [`StreamParameters`] without
//! keeping the demuxer open — useful for quickly inspecting many files or
//! verifying a file just written, without holding an FFmpeg input context
//! per file. For frame access, use [`VideoFileReader`](crate::VideoFileReader).

use std::path::Path;

use crate::error::VideoError;
use crate::parameters::StreamParameters;
use crate::reader::VideoFileReader;

/// Probe a video file and return its negotiated stream parameters.
///
/// Opens the file, snapshots the parameters, and immediately releases the
/// demuxer. The returned [`StreamParameters`] is owned and independent of
/// any file handle.
///
/// # Errors
///
/// Returns [`VideoError::Open`] if the file cannot be opened or contains no
/// decodable video stream.
///
/// # Example
///
/// ```no_run
/// use reframe::probe;
///
/// let parameters = probe("input.mp4")?;
/// println!(
///     "{}x{} @ {} fps ({})",
///     parameters.width, parameters.height, parameters.frame_rate, parameters.codec_name
/// );
/// # Ok::<(), reframe::VideoError>(())
/// ```
pub fn probe<P: AsRef<Path>>(path: P) -> Result<StreamParameters, VideoError> {
    let mut reader = VideoFileReader::new();
    reader.open(path)?;
    let parameters = reader.parameters().ok_or(VideoError::NotOpen)?.clone();
    reader.close();
    Ok(parameters)
}
