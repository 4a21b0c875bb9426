//! Assembly configuration

use crate::{Codec, Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything one pipeline run needs to know about its environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    /// Path to the ffmpeg executable (searched in PATH when unset)
    pub ffmpeg_path: Option<PathBuf>,
    /// Path to the ffprobe executable (next to ffmpeg, then PATH, when unset)
    pub ffprobe_path: Option<PathBuf>,
    /// Directory receiving all output files
    pub output_dir: PathBuf,
    /// File name of the silent video
    pub silent_video_name: String,
    /// File name of the combined narration track
    pub narration_name: String,
    /// File name of the final artifact
    pub final_video_name: String,
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Frame rate (frames per second)
    pub fps: u32,
    /// Pause between consecutive segments, in seconds
    pub gap_seconds: f64,
    /// Whether the last segment's display time also includes the gap
    pub trailing_gap: bool,
    /// Video codec of the silent video
    pub codec: Codec,
    /// Quality (0-100, where 100 is highest quality)
    pub quality: u8,
    /// Bitrate of the combined narration MP3, in kbit/s
    pub narration_bitrate_kbps: u32,
    /// Bitrate of the AAC track in the final artifact, in kbit/s
    pub final_audio_bitrate_kbps: u32,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: None,
            ffprobe_path: None,
            output_dir: PathBuf::from("."),
            silent_video_name: "final_news_video.mp4".to_string(),
            narration_name: "final_narration.mp3".to_string(),
            final_video_name: "final_news_video_with_audio.mp4".to_string(),
            width: 1280,
            height: 720,
            fps: 24,
            gap_seconds: 3.0,
            trailing_gap: true,
            codec: Codec::H264,
            quality: 70,
            narration_bitrate_kbps: 128,
            final_audio_bitrate_kbps: 192,
        }
    }
}

impl AssemblyConfig {
    /// Load configuration from a TOML file
    ///
    /// Missing fields use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: AssemblyConfig = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, or defaults if the file doesn't exist
    ///
    /// Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            other => other,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Config(format!(
                "Resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        // yuv420p needs even dimensions
        if self.codec == Codec::H264 && (self.width % 2 != 0 || self.height % 2 != 0) {
            return Err(Error::UnsupportedResolution {
                codec: self.codec,
                width: self.width,
                height: self.height,
            });
        }
        if self.fps == 0 {
            return Err(Error::Config("Frame rate must be positive".to_string()));
        }
        if !self.gap_seconds.is_finite() || self.gap_seconds < 0.0 {
            return Err(Error::Config(format!(
                "Gap must be a non-negative number of seconds, got {}",
                self.gap_seconds
            )));
        }
        if self.quality > 100 {
            return Err(Error::Config(format!(
                "Quality must be within 0-100, got {}",
                self.quality
            )));
        }
        Ok(())
    }

    pub fn silent_video_path(&self) -> PathBuf {
        self.output_dir.join(&self.silent_video_name)
    }

    pub fn narration_path(&self) -> PathBuf {
        self.output_dir.join(&self.narration_name)
    }

    pub fn final_video_path(&self) -> PathBuf {
        self.output_dir.join(&self.final_video_name)
    }

    /// Configuration writing every output into `dir`
    pub fn with_output_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AssemblyConfig::default();
        assert_eq!((config.width, config.height, config.fps), (1280, 720, 24));
        assert_eq!(config.gap_seconds, 3.0);
        assert!(config.trailing_gap);
        assert!(config.validate().is_ok());
        assert_eq!(
            config.final_video_path(),
            PathBuf::from("./final_news_video_with_audio.mp4")
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AssemblyConfig = toml::from_str(
            r#"
            output_dir = "/tmp/news"
            fps = 30
            codec = "mpeg4"
            "#,
        )
        .unwrap();
        assert_eq!(config.fps, 30);
        assert_eq!(config.codec, Codec::Mpeg4);
        assert_eq!(config.width, 1280);
        assert_eq!(config.narration_path(), PathBuf::from("/tmp/news/final_narration.mp3"));
    }

    #[test]
    fn test_validate_rejects_odd_h264_resolution() {
        let config = AssemblyConfig {
            width: 1281,
            ..AssemblyConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::UnsupportedResolution { .. })
        ));

        let config = AssemblyConfig {
            width: 1281,
            codec: Codec::Mpeg4,
            ..AssemblyConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_gap() {
        let config = AssemblyConfig {
            gap_seconds: -1.0,
            ..AssemblyConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AssemblyConfig::load_or_default(Path::new("/nonexistent/newsreel.toml"))
            .unwrap();
        assert_eq!(config, AssemblyConfig::default());
    }
}
