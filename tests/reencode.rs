//! Re-encode integration tests.
//!
//! Each test writes a 2997/100 FFVHUFF AVI with the crate's own writer,
//! re-encodes it into a target codec/container, and verifies the output's
//! negotiated parameters. Codecs missing from the local FFmpeg build are
//! skipped.

use std::path::Path;

use image::{DynamicImage, Rgb, RgbImage};
use reframe::{Rational, VideoCodec, VideoError, VideoFileWriter, WriterConfig, probe, reencode};

const FRAMES: u8 = 15;

fn solid_frame(width: u32, height: u32, shade: u8) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(
        width,
        height,
        Rgb([shade, shade, shade]),
    ))
}

fn encoder_unavailable(error: &VideoError) -> bool {
    let message = format!("{error}");
    message.contains("not available") || message.contains("cannot open")
}

/// Write the shared NTSC-rate input; returns `false` (skip) when FFVHUFF
/// is unavailable.
fn write_input(path: &Path) -> bool {
    let mut writer = VideoFileWriter::new();
    let result = writer.open(
        path,
        WriterConfig::new()
            .width(64)
            .height(48)
            .frame_rate(Rational::from(29.97))
            .video_codec(VideoCodec::FfvHuff),
    );
    if let Err(ref error) = result {
        if encoder_unavailable(error) {
            eprintln!("Skipping: FFVHUFF encoder not available ({error})");
            return false;
        }
    }
    result.expect("open input writer");

    for shade in 0..FRAMES {
        writer
            .write_video_frame(&solid_frame(64, 48, shade))
            .expect("write input frame");
    }
    writer.close().expect("close input writer");
    true
}

/// Re-encode the shared input into `extension` with `codec` and check the
/// preserved parameters.
fn reencode_and_verify(codec: VideoCodec, extension: &str) {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("input.avi");
    if !write_input(&input) {
        return;
    }

    let output = dir.path().join(format!("output.{extension}"));
    let result = reencode(&input, &output, codec);
    if let Err(ref error) = result {
        if encoder_unavailable(error) {
            eprintln!("Skipping: {} encoder not available ({error})", codec.name());
            return;
        }
    }
    let summary = result.expect("reencode");
    assert_eq!(summary.frames, FRAMES as u64);

    let parameters = probe(&output).expect("probe output");
    assert_eq!(parameters.width, 64);
    assert_eq!(parameters.height, 48);

    // Some encoders normalize 2997/100 to the exact NTSC ratio, so the
    // rate is compared as a floating value.
    let fps = parameters.frame_rate.value();
    assert!(
        (fps - 29.97).abs() < 0.01,
        "output frame rate drifted to {fps}"
    );
}

#[test]
fn reencode_mpeg4_avi() {
    reencode_and_verify(VideoCodec::Mpeg4, "avi");
}

#[test]
fn reencode_h264_avi() {
    reencode_and_verify(VideoCodec::H264, "avi");
}

#[test]
fn reencode_h264_mp4() {
    reencode_and_verify(VideoCodec::H264, "mp4");
}

#[test]
fn reencode_vp8_webm() {
    reencode_and_verify(VideoCodec::Vp8, "webm");
}

#[test]
fn reencode_vp9_webm() {
    reencode_and_verify(VideoCodec::Vp9, "webm");
}

#[test]
fn reencode_theora_ogg() {
    reencode_and_verify(VideoCodec::Theora, "ogg");
}

#[test]
fn reencode_ffvhuff_mkv() {
    reencode_and_verify(VideoCodec::FfvHuff, "mkv");
}

#[test]
fn reencode_missing_input_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("out.avi");
    let error = reencode("no/such/input.mp4", &output, VideoCodec::Mpeg4)
        .expect_err("missing input");
    assert!(matches!(error, VideoError::Open { .. }));
}

#[test]
fn reencode_rejects_incompatible_target() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("input.avi");
    if !write_input(&input) {
        return;
    }

    let output = dir.path().join("output.webm");
    let error = reencode(&input, &output, VideoCodec::H264)
        .expect_err("H264 cannot be stored in WebM");
    assert!(matches!(error, VideoError::UnsupportedContainer { .. }));
}
