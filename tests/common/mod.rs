//! Common test utilities

#![allow(dead_code)]

use image::{ImageBuffer, Rgba, RgbaImage};
use newsreel::encoder::ffmpeg::check_pipeline_encoders;
use newsreel::AssemblyConfig;
use std::f32::consts::PI;
use std::path::{Path, PathBuf};

/// Generate a test image with a solid color and a subtle gradient
pub fn generate_test_image(width: u32, height: u32, base_color: [u8; 4]) -> RgbaImage {
    let mut img = ImageBuffer::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let r = base_color[0].saturating_add((x % 50) as u8);
        let g = base_color[1].saturating_add((y % 50) as u8);
        let b = base_color[2];
        let a = base_color[3];
        *pixel = Rgba([r, g, b, a]);
    }

    img
}

/// Generate a numbered test image (one color per article)
pub fn generate_numbered_image(width: u32, height: u32, number: u32) -> RgbaImage {
    let colors = [
        [255, 100, 100, 255], // Red-ish
        [100, 255, 100, 255], // Green-ish
        [100, 100, 255, 255], // Blue-ish
        [255, 255, 100, 255], // Yellow-ish
        [255, 100, 255, 255], // Magenta-ish
    ];

    let color = colors[(number as usize) % colors.len()];
    generate_test_image(width, height, color)
}

/// Save a test image as JPEG
pub fn save_jpeg<P: AsRef<Path>>(img: &RgbaImage, path: P, quality: u8) -> std::io::Result<()> {
    let rgb_img: image::RgbImage = image::DynamicImage::ImageRgba8(img.clone()).to_rgb8();

    let file = std::fs::File::create(path)?;
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(file, quality);
    encoder
        .encode_image(&rgb_img)
        .map_err(std::io::Error::other)?;

    Ok(())
}

/// Save a test image as PNG
pub fn save_png<P: AsRef<Path>>(img: &RgbaImage, path: P) -> std::io::Result<()> {
    img.save(path).map_err(std::io::Error::other)
}

/// Write `count` numbered JPEG images named like downloaded article images
pub fn write_article_images(dir: &Path, count: u32) -> Vec<PathBuf> {
    (0..count)
        .map(|i| {
            let path = dir.join(format!("news_{}.jpg", i + 1));
            let img = generate_numbered_image(640, 480, i);
            save_jpeg(&img, &path, 85).unwrap();
            path
        })
        .collect()
}

/// Write a sine tone WAV of the given length
pub fn write_tone_wav<P: AsRef<Path>>(
    path: P,
    seconds: f64,
    sample_rate: u32,
    channels: u16,
) -> PathBuf {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path.as_ref(), spec).unwrap();

    let frames = (seconds * sample_rate as f64).round() as u32;
    for n in 0..frames {
        let t = n as f32 / sample_rate as f32;
        let sample = ((2.0 * PI * 440.0 * t).sin() * 0.3 * i16::MAX as f32) as i16;
        for _ in 0..channels {
            writer.write_sample(sample).unwrap();
        }
    }
    writer.finalize().unwrap();

    path.as_ref().to_path_buf()
}

/// Config writing into `dir`
pub fn test_config(dir: &Path) -> AssemblyConfig {
    AssemblyConfig::default().with_output_dir(dir)
}

/// Whether ffmpeg with libx264, libmp3lame and aac is installed
pub fn ffmpeg_available() -> bool {
    match check_pipeline_encoders(&AssemblyConfig::default()) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Skipping: {}", e);
            false
        }
    }
}

/// Verify that a file exists and has non-zero size
pub fn verify_file_exists_with_size<P: AsRef<Path>>(path: P) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) => meta.len() > 0,
        Err(_) => false,
    }
}

/// Parse MP4 header to verify it's a valid MP4 file
pub fn verify_mp4_header<P: AsRef<Path>>(path: P) -> bool {
    use std::io::Read;

    let mut file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };

    let mut header = [0u8; 12];
    if file.read_exact(&mut header).is_err() {
        return false;
    }

    // MP4 files have 'ftyp' box at offset 4
    &header[4..8] == b"ftyp"
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_test_image() {
        let img = generate_test_image(100, 100, [255, 0, 0, 255]);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 100);
    }

    #[test]
    fn test_write_tone_wav() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_tone_wav(temp_dir.path().join("tone.wav"), 0.5, 8000, 1);

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.duration(), 4000);
    }
}
