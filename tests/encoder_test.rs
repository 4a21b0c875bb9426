//! Integration tests for the ffmpeg video writer

mod common;

use common::*;
use newsreel::encoder::ffmpeg::{find_ffmpeg, FfmpegVideoWriter};
use newsreel::encoder::{EncoderConfig, FrameSink};
use newsreel::image_loader::LoadedImage;
use newsreel::muxer::inspect;
use newsreel::{available, AssemblyConfig, Codec};
use tempfile::TempDir;

fn small_encoder_config(codec: Codec) -> EncoderConfig {
    EncoderConfig {
        width: 320,
        height: 240,
        fps: 24,
        codec,
        quality: 50,
    }
}

fn frame(width: u32, height: u32) -> LoadedImage {
    LoadedImage::from_dynamic_image(image::DynamicImage::ImageRgba8(generate_test_image(
        width,
        height,
        [200, 50, 50, 255],
    )))
}

#[test]
fn test_h264_available() {
    // Depends on the local ffmpeg build
    let result = available(Codec::H264, None);
    println!("H.264 availability: {:?}", result);
}

#[test]
fn test_writer_produces_one_sample_per_frame() {
    if !ffmpeg_available() {
        return;
    }
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("silent.mp4");
    let ffmpeg = find_ffmpeg(None).unwrap();

    let mut writer = FfmpegVideoWriter::new(ffmpeg, small_encoder_config(Codec::H264), &path);
    let image = frame(320, 240);
    for _ in 0..48 {
        writer.write_frame(&image).unwrap();
    }
    writer.finalize().unwrap();

    assert_eq!(writer.frames_written(), 48);
    assert!(verify_mp4_header(&path));

    let summary = inspect(&path).unwrap();
    let video = summary.video.expect("video track");
    assert_eq!(video.sample_count, 48);
    assert!((video.duration_seconds - 2.0).abs() < 0.05);
    assert!(summary.audio.is_none());
}

#[test]
fn test_mpeg4_writer() {
    if !ffmpeg_available() || available(Codec::Mpeg4, None).is_err() {
        return;
    }
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("silent_mp4v.mp4");
    let ffmpeg = find_ffmpeg(None).unwrap();

    let mut writer = FfmpegVideoWriter::new(ffmpeg, small_encoder_config(Codec::Mpeg4), &path);
    let image = frame(320, 240);
    for _ in 0..24 {
        writer.write_frame(&image).unwrap();
    }
    writer.finalize().unwrap();

    assert!(verify_mp4_header(&path));
}

/// A writer dropped mid-run still leaves a playable file
#[test]
fn test_dropped_writer_flushes_trailer() {
    if !ffmpeg_available() {
        return;
    }
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("interrupted.mp4");
    let ffmpeg = find_ffmpeg(None).unwrap();

    {
        let mut writer =
            FfmpegVideoWriter::new(ffmpeg, small_encoder_config(Codec::H264), &path);
        let image = frame(320, 240);
        for _ in 0..12 {
            writer.write_frame(&image).unwrap();
        }
    }

    let summary = inspect(&path).unwrap();
    assert_eq!(summary.video.map(|v| v.sample_count), Some(12));
}

#[test]
fn test_write_after_finalize_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = AssemblyConfig::default();
    let mut writer = FfmpegVideoWriter::new(
        "ffmpeg".into(),
        EncoderConfig::from(&config),
        temp_dir.path().join("done.mp4"),
    );
    writer.finalize().unwrap();
    assert!(writer.write_frame(&frame(1280, 720)).is_err());
}
