//! Video encoder sinks

pub mod ffmpeg;

use crate::image_loader::LoadedImage;
use crate::{AssemblyConfig, Codec, Result};
use std::path::Path;

/// Destination for raw video frames
///
/// Frames are written in presentation order. A sink must be finalized once
/// all frames are written; until then the container may be unplayable.
pub trait FrameSink {
    /// Append one frame
    fn write_frame(&mut self, frame: &LoadedImage) -> Result<()>;

    /// Number of frames written so far
    fn frames_written(&self) -> u64;

    /// Flush and close the output
    fn finalize(&mut self) -> Result<()>;
}

/// Encoder configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Frame rate (frames per second)
    pub fps: u32,
    /// Video codec
    pub codec: Codec,
    /// Quality (0-100)
    pub quality: u8,
}

impl From<&AssemblyConfig> for EncoderConfig {
    fn from(config: &AssemblyConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            fps: config.fps,
            codec: config.codec,
            quality: config.quality,
        }
    }
}

/// Create the video sink for a pipeline run
pub fn create_sink<P: AsRef<Path>>(
    config: &AssemblyConfig,
    output_path: P,
) -> Result<Box<dyn FrameSink>> {
    let ffmpeg = ffmpeg::find_ffmpeg(config.ffmpeg_path.as_deref())?;
    Ok(Box::new(ffmpeg::FfmpegVideoWriter::new(
        ffmpeg,
        EncoderConfig::from(config),
        output_path,
    )))
}
