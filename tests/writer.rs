//! Writer integration tests.
//!
//! Output files are written into a scratch directory; tests that need a
//! specific encoder skip gracefully when the local FFmpeg build lacks it.

use std::time::Duration;

use image::{DynamicImage, Rgb, RgbImage};
use reframe::{
    AudioChannels, AudioCodec, Rational, VideoCodec, VideoError, VideoFileWriter, WriterConfig,
};

fn solid_frame(width: u32, height: u32, shade: u8) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(
        width,
        height,
        Rgb([shade, shade, shade]),
    ))
}

/// Returns `true` when the error indicates the encoder is missing from the
/// local FFmpeg build, in which case the test should be skipped.
fn encoder_unavailable(error: &VideoError) -> bool {
    let message = format!("{error}");
    message.contains("not available") || message.contains("cannot open")
}

#[test]
fn write_video_new_api() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("output.avi");

    let mut writer = VideoFileWriter::new();
    let result = writer.open(
        &path,
        WriterConfig::new()
            .width(64)
            .height(48)
            .frame_rate(Rational::from(24))
            .video_codec(VideoCodec::Mpeg4)
            .bit_rate(1_200_000),
    );
    if let Err(ref error) = result {
        if encoder_unavailable(error) {
            eprintln!("Skipping: MPEG4 encoder not available ({error})");
            return;
        }
    }
    result.expect("open writer");

    // Requested values are readable back.
    let parameters = writer.parameters().expect("parameters after open").clone();
    assert_eq!(parameters.width, 64);
    assert_eq!(parameters.height, 48);
    assert_eq!(parameters.frame_rate, Rational::new(24, 1));
    assert_eq!(parameters.bit_rate, 1_200_000);
    assert_eq!(parameters.video_codec, Some(VideoCodec::Mpeg4));

    // Values never requested are negotiated from the container's defaults.
    let audio = parameters.audio.expect("negotiated audio defaults");
    assert_eq!(audio.codec, Some(AudioCodec::Mp3));
    assert_eq!(audio.sample_rate, 44_100);
    assert_eq!(audio.channels, AudioChannels::Stereo);

    for shade in 0u8..255 {
        writer
            .write_video_frame_with_duration(&solid_frame(64, 48, shade), Duration::from_secs(1))
            .expect("write frame");
    }

    // 255 frames of exactly one second each.
    assert_eq!(writer.duration(), Duration::from_secs(255));

    writer.close().expect("close writer");
    assert!(path.exists());
    assert!(std::fs::metadata(&path).expect("metadata").len() > 0);

    // Duration and parameters stay readable after close.
    assert_eq!(writer.duration(), Duration::from_secs(255));
    assert!(writer.parameters().is_some());
}

#[test]
fn mismatched_frame_does_not_corrupt_stream() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("mismatch.avi");

    let mut writer = VideoFileWriter::new();
    let result = writer.open(
        &path,
        WriterConfig::new()
            .width(64)
            .height(48)
            .frame_rate(Rational::from(24))
            .video_codec(VideoCodec::FfvHuff),
    );
    if let Err(ref error) = result {
        if encoder_unavailable(error) {
            eprintln!("Skipping: FFVHUFF encoder not available ({error})");
            return;
        }
    }
    result.expect("open writer");

    writer
        .write_video_frame(&solid_frame(64, 48, 10))
        .expect("first correct write");

    let error = writer
        .write_video_frame(&solid_frame(32, 32, 20))
        .expect_err("mismatched write must fail");
    match error {
        VideoError::FrameMismatch {
            expected_width,
            expected_height,
            actual_width,
            actual_height,
        } => {
            assert_eq!((expected_width, expected_height), (64, 48));
            assert_eq!((actual_width, actual_height), (32, 32));
        }
        other => panic!("expected FrameMismatch, got {other}"),
    }

    // The stream stays usable after the mismatch.
    writer
        .write_video_frame(&solid_frame(64, 48, 30))
        .expect("write after mismatch");

    writer.close().expect("close");
    assert!(path.exists());
}

#[test]
fn default_duration_follows_frame_rate() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("paced.avi");

    let mut writer = VideoFileWriter::new();
    let result = writer.open(
        &path,
        WriterConfig::new()
            .width(64)
            .height(48)
            .frame_rate(Rational::from(24))
            .video_codec(VideoCodec::FfvHuff),
    );
    if let Err(ref error) = result {
        if encoder_unavailable(error) {
            eprintln!("Skipping: FFVHUFF encoder not available ({error})");
            return;
        }
    }
    result.expect("open writer");

    for shade in 0u8..24 {
        writer
            .write_video_frame(&solid_frame(64, 48, shade))
            .expect("write frame");
    }

    // 24 frames at 24 fps is one second, within nanosecond rounding.
    let total = writer.duration().as_secs_f64();
    assert!((total - 1.0).abs() < 1e-6, "duration was {total}");

    writer.close().expect("close");
}

#[test]
fn write_before_open_is_rejected() {
    let mut writer = VideoFileWriter::new();
    let error = writer
        .write_video_frame(&solid_frame(64, 48, 0))
        .expect_err("write on closed writer");
    assert!(matches!(error, VideoError::NotOpen));
}

#[test]
fn close_is_idempotent() {
    let mut writer = VideoFileWriter::new();
    writer.close().expect("closing a closed writer is a no-op");
    writer.close().expect("and stays a no-op");
}

#[test]
fn zero_dimensions_are_inconsistent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.avi");

    let mut writer = VideoFileWriter::new();
    let error = writer
        .open(&path, WriterConfig::new().width(0).height(480))
        .expect_err("zero width");
    assert!(matches!(error, VideoError::Open { .. }));

    let error = writer
        .open(&path, WriterConfig::new().height(480))
        .expect_err("unset width");
    assert!(matches!(error, VideoError::Open { .. }));
}

#[test]
fn unrecognized_extension_is_rejected() {
    let mut writer = VideoFileWriter::new();
    let error = writer
        .open("output.xyz", WriterConfig::new().width(64).height(48))
        .expect_err("unknown extension");
    assert!(matches!(error, VideoError::UnsupportedContainer { .. }));
}

#[test]
fn incompatible_codec_for_container_is_rejected() {
    let mut writer = VideoFileWriter::new();
    let error = writer
        .open(
            "output.webm",
            WriterConfig::new()
                .width(64)
                .height(48)
                .video_codec(VideoCodec::H264),
        )
        .expect_err("H264 in WebM");
    assert!(matches!(error, VideoError::UnsupportedContainer { .. }));
}

#[test]
fn writer_config_builder() {
    let config = WriterConfig::new()
        .width(1920)
        .height(1080)
        .frame_rate(Rational::from(29.97))
        .video_codec(VideoCodec::H264)
        .bit_rate(5_000_000)
        .audio_codec(AudioCodec::Mp3)
        .audio_sample_rate(48_000)
        .audio_channels(AudioChannels::Mono);

    assert_eq!(config.width, Some(1920));
    assert_eq!(config.height, Some(1080));
    assert_eq!(config.frame_rate, Some(Rational::new(2997, 100)));
    assert_eq!(config.video_codec, Some(VideoCodec::H264));
    assert_eq!(config.bit_rate, Some(5_000_000));
    assert_eq!(config.audio_codec, Some(AudioCodec::Mp3));
    assert_eq!(config.audio_sample_rate, Some(48_000));
    assert_eq!(config.audio_channels, Some(AudioChannels::Mono));
}
