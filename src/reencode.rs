//! Re-encode a video file across codecs and containers.
//!
//! This module composes a [`VideoFileReader`] and a [`VideoFileWriter`]:
//! frames flow reader → writer with no codec logic in between. The output
//! inherits the input's negotiated width, height, and exact frame rate;
//! only the codec (and, via the output extension, the container) changes.
//!
//! # Example
//!
//! ```no_run
//! use reframe::{VideoCodec, reencode};
//!
//! let summary = reencode("fireplace.mp4", "fireplace.webm", VideoCodec::Vp8)?;
//! println!("copied {} frames", summary.frames);
//! # Ok::<(), reframe::VideoError>(())
//! ```

use std::path::Path;
use std::time::Duration;

use crate::codec::VideoCodec;
use crate::error::VideoError;
use crate::parameters::WriterConfig;
use crate::reader::VideoFileReader;
use crate::writer::VideoFileWriter;

/// What a [`reencode`] run produced.
#[derive(Debug, Clone)]
#[must_use]
pub struct ReencodeSummary {
    /// Number of frames shuttled from the input to the output.
    pub frames: u64,
    /// Total duration written, as accumulated by the writer.
    pub duration: Duration,
}

/// Re-encode `input` into `output` with the given video codec.
///
/// Opens a reader on the input, opens a writer on the output using the
/// reader's negotiated width/height/frame rate, copies every decoded frame
/// across, and closes both streams. The output container is inferred from
/// the output path's extension.
///
/// # Errors
///
/// Any error from opening either file, decoding a frame, or encoding a
/// frame is surfaced immediately; both streams are closed by drop on the
/// error path.
pub fn reencode<P1: AsRef<Path>, P2: AsRef<Path>>(
    input: P1,
    output: P2,
    codec: VideoCodec,
) -> Result<ReencodeSummary, VideoError> {
    let input = input.as_ref();
    let output = output.as_ref();

    log::info!(
        "Re-encoding {} -> {} (codec={})",
        input.display(),
        output.display(),
        codec.name(),
    );

    let mut reader = VideoFileReader::new();
    reader.open(input)?;

    let parameters = reader.parameters().ok_or(VideoError::NotOpen)?.clone();

    let mut writer = VideoFileWriter::new();
    writer.open(
        output,
        WriterConfig::new()
            .width(parameters.width)
            .height(parameters.height)
            .frame_rate(parameters.frame_rate)
            .video_codec(codec),
    )?;

    let mut frames: u64 = 0;
    while let Some(frame) = reader.read_video_frame()? {
        writer.write_video_frame(&frame)?;
        frames += 1;
    }

    let duration = writer.duration();
    writer.close()?;
    reader.close();

    log::info!(
        "Re-encoded {} frames ({:.2}s) into {}",
        frames,
        duration.as_secs_f64(),
        output.display(),
    );

    Ok(ReencodeSummary { frames, duration })
}
