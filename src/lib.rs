//! newsreel - Narrated news video assembly
//!
//! The library turns a batch of articles, one image per article and one
//! narration clip per article into a single video:
//! - `timing`: per-segment display durations
//! - `sequencer`: per-segment frame streams
//! - `slideshow`: the silent video, written through an `encoder` sink
//! - `audio`: the combined narration track
//! - `muxer`: the final artifact (video stream copy + AAC audio)
//! - `pipeline`: all of the above in order

pub mod audio;
pub mod config;
pub mod encoder;
pub mod error;
pub mod ffi;
pub mod image_loader;
pub mod metadata;
pub mod muxer;
pub mod pipeline;
pub mod sequencer;
pub mod timing;

mod slideshow;

pub use audio::{build_combined_audio, CombinedAudio};
pub use config::AssemblyConfig;
pub use error::{Error, Result};
pub use metadata::UploadMetadata;
pub use muxer::{mux, FinalArtifact};
pub use pipeline::{AssemblyJob, AssemblyReport, Pipeline};
pub use sequencer::{SegmentFrames, SkipReason};
pub use slideshow::{render_silent_video, SilentVideo};
pub use timing::{Segment, Timeline};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Maximum number of articles in one video
pub const MAX_ARTICLES: usize = 5;

/// Description narrated when an article has none
pub const PLACEHOLDER_DESCRIPTION: &str = "No description available.";

/// Video codec types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(C)]
pub enum Codec {
    /// H.264 via libx264, stored as `avc1`
    #[default]
    H264 = 0,
    /// MPEG-4 Part 2, stored as `mp4v`
    Mpeg4 = 1,
}

impl Codec {
    /// ffmpeg encoder name
    pub fn ffmpeg_encoder(&self) -> &'static str {
        match self {
            Codec::H264 => "libx264",
            Codec::Mpeg4 => "mpeg4",
        }
    }

    /// Sample entry fourcc written into the MP4
    pub fn fourcc(&self) -> &'static str {
        match self {
            Codec::H264 => "avc1",
            Codec::Mpeg4 => "mp4v",
        }
    }
}

/// One news item selected for narration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Article {
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
        }
    }

    /// Description, or the placeholder when the source had none
    pub fn description_or_placeholder(&self) -> &str {
        self.description
            .as_deref()
            .unwrap_or(PLACEHOLDER_DESCRIPTION)
    }

    /// Text handed to the speech synthesizer for this article
    pub fn narration_text(&self) -> String {
        format!(
            "Title: {}. Description: {}",
            self.title,
            self.description_or_placeholder()
        )
    }
}

/// Ordered batch of at most [`MAX_ARTICLES`] articles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleBatch {
    articles: Vec<Article>,
}

impl ArticleBatch {
    /// Keep the first [`MAX_ARTICLES`] articles, in order
    pub fn new(mut articles: Vec<Article>) -> Self {
        articles.truncate(MAX_ARTICLES);
        Self { articles }
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Article> {
        self.articles.iter()
    }

    pub fn as_slice(&self) -> &[Article] {
        &self.articles
    }
}

/// Downloaded image for one article; `None` when the download failed
pub type ImageAsset = Option<PathBuf>;

/// Synthesized narration for one article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrationClip {
    /// Path to the audio file
    pub path: PathBuf,
    /// Duration in seconds
    pub duration_seconds: f64,
}

impl NarrationClip {
    pub fn new<P: AsRef<Path>>(path: P, duration_seconds: f64) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            duration_seconds,
        }
    }
}

/// Check if a codec can be encoded on the current system
pub fn available(codec: Codec, ffmpeg_path: Option<&Path>) -> Result<()> {
    encoder::ffmpeg::check_available(codec, ffmpeg_path)
}
