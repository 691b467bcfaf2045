//! Internal pixel-data and timestamp conversion helpers.
//!
//! Shared between the reader (FFmpeg frame → `image` buffer) and the writer
//! (`image` buffer → FFmpeg frame, elapsed time → PTS).

use std::time::Duration;

use ffmpeg_next::Rational as FfmpegRational;
use ffmpeg_next::format::Pixel;
use ffmpeg_next::frame::Video as VideoFrame;
use image::RgbImage;

/// Copy pixel data from an FFmpeg RGB24 frame into a tightly-packed buffer.
///
/// FFmpeg frames frequently carry per-row padding (stride > width × 3);
/// this strips it so the result can be handed to
/// [`image::RgbImage::from_raw`].
pub(crate) fn frame_to_rgb_buffer(video_frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let expected_stride = (width as usize) * 3;
    let data = video_frame.data(0);

    if stride == expected_stride {
        // No padding — copy the entire plane at once.
        data[..expected_stride * (height as usize)].to_vec()
    } else {
        // Stride includes padding bytes — copy row by row.
        let mut buffer = Vec::with_capacity(expected_stride * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + expected_stride]);
        }
        buffer
    }
}

/// Copy a tightly-packed RGB image into a freshly allocated RGB24 FFmpeg
/// frame, honoring the frame's stride.
pub(crate) fn rgb_image_to_frame(image: &RgbImage, width: u32, height: u32) -> VideoFrame {
    let mut frame = VideoFrame::new(Pixel::RGB24, width, height);
    let stride = frame.stride(0);
    let row_len = (width as usize) * 3;
    let pixels = image.as_raw();
    let data = frame.data_mut(0);

    for row in 0..(height as usize) {
        let src_start = row * row_len;
        let dst_start = row * stride;
        data[dst_start..dst_start + row_len]
            .copy_from_slice(&pixels[src_start..src_start + row_len]);
    }

    frame
}

/// Convert an elapsed [`Duration`] to a timestamp in the given time base.
pub(crate) fn duration_to_timestamp(elapsed: Duration, time_base: FfmpegRational) -> i64 {
    let seconds = elapsed.as_secs_f64();
    let numerator = time_base.numerator() as f64;
    let denominator = time_base.denominator() as f64;
    (seconds * denominator / numerator).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_frames_land_on_exact_ticks() {
        // Time base of one nominal frame at 24 fps.
        let tick = FfmpegRational::new(1, 24);
        assert_eq!(duration_to_timestamp(Duration::ZERO, tick), 0);
        assert_eq!(duration_to_timestamp(Duration::from_secs(1), tick), 24);
        assert_eq!(duration_to_timestamp(Duration::from_secs(255), tick), 6120);
    }

    #[test]
    fn ntsc_tick_rounds_to_nearest() {
        let tick = FfmpegRational::new(100, 2997);
        // One second is 29.97 ticks.
        assert_eq!(duration_to_timestamp(Duration::from_secs(1), tick), 30);
        assert_eq!(duration_to_timestamp(Duration::from_secs(100), tick), 2997);
    }
}
