//! End-to-end assembly
//!
//! Timing, silent video, narration track and mux run one after another on a
//! single thread. Intermediate files stay on disk whether or not the run
//! succeeds.

use crate::audio::{build_combined_audio, CombinedAudio};
use crate::metadata::UploadMetadata;
use crate::muxer::{mux, FinalArtifact};
use crate::slideshow::{render_silent_video, SilentVideo};
use crate::timing::Timeline;
use crate::{
    Article, ArticleBatch, AssemblyConfig, Error, ImageAsset, NarrationClip, Result, MAX_ARTICLES,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Everything the upstream collaborators hand over for one video
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyJob {
    pub articles: ArticleBatch,
    pub images: Vec<ImageAsset>,
    pub clips: Vec<NarrationClip>,
}

impl AssemblyJob {
    /// Bundle per-article inputs; all three lists must line up
    ///
    /// Entries past [`MAX_ARTICLES`] are dropped from every list.
    pub fn new(
        articles: Vec<Article>,
        mut images: Vec<ImageAsset>,
        mut clips: Vec<NarrationClip>,
    ) -> Result<Self> {
        if articles.len() != images.len() || articles.len() != clips.len() {
            return Err(Error::InvalidInput(format!(
                "{} articles, {} images and {} narration clips do not line up",
                articles.len(),
                images.len(),
                clips.len()
            )));
        }

        if articles.len() > MAX_ARTICLES {
            warn!(
                articles = articles.len(),
                kept = MAX_ARTICLES,
                "Too many articles, keeping the first ones"
            );
            images.truncate(MAX_ARTICLES);
            clips.truncate(MAX_ARTICLES);
        }

        Ok(Self {
            articles: ArticleBatch::new(articles),
            images,
            clips,
        })
    }

    /// Load a job from a TOML manifest
    ///
    /// Relative paths are taken relative to the manifest. Clips without a
    /// `duration` are probed.
    pub fn load(path: &Path, config: &AssemblyConfig) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let manifest: JobManifest = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_manifest(manifest, base, config)
    }

    pub fn from_manifest(
        manifest: JobManifest,
        base: &Path,
        config: &AssemblyConfig,
    ) -> Result<Self> {
        let mut articles = Vec::with_capacity(manifest.article.len());
        let mut images = Vec::with_capacity(manifest.article.len());
        let mut clips = Vec::with_capacity(manifest.article.len());

        for entry in manifest.article {
            let narration = base.join(&entry.narration);
            let clip = match entry.duration {
                Some(duration) => NarrationClip::new(narration, duration),
                None => NarrationClip::probe(narration, config)?,
            };

            images.push(entry.image.map(|image| base.join(image)));
            clips.push(clip);
            articles.push(Article::new(entry.title, entry.description));
        }

        Self::new(articles, images, clips)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Narration durations, shared by the timeline and the audio track
    pub fn durations(&self) -> Vec<f64> {
        self.clips.iter().map(|c| c.duration_seconds).collect()
    }
}

/// TOML form of an [`AssemblyJob`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobManifest {
    #[serde(default)]
    pub article: Vec<ManifestEntry>,
}

/// One `[[article]]` table of a manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<PathBuf>,
    pub narration: PathBuf,
    #[serde(default)]
    pub duration: Option<f64>,
}

/// What one run produced
#[derive(Debug, Clone)]
pub struct AssemblyReport {
    pub timeline: Timeline,
    pub video: SilentVideo,
    pub audio: CombinedAudio,
    pub artifact: FinalArtifact,
    pub metadata: UploadMetadata,
}

/// Media assembly with a fixed configuration
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: AssemblyConfig,
}

impl Pipeline {
    pub fn new(config: AssemblyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    /// Verify ffmpeg has every encoder a run needs
    pub fn check_tools(&self) -> Result<()> {
        crate::encoder::ffmpeg::check_pipeline_encoders(&self.config)
    }

    /// Build the final video for `job`
    pub fn run(&self, job: &AssemblyJob) -> Result<AssemblyReport> {
        let config = &self.config;
        fs::create_dir_all(&config.output_dir)?;

        info!(articles = job.len(), "Assembling news video");

        let durations = job.durations();
        let timeline = Timeline::build(&job.images, &durations, config)?;

        let video = render_silent_video(&timeline, config)?;
        let audio = build_combined_audio(&job.clips, config)?;

        if (video.duration_seconds() - audio.duration_seconds()).abs() > config.gap_seconds {
            warn!(
                video_seconds = video.duration_seconds(),
                audio_seconds = audio.duration_seconds(),
                "Video and narration lengths differ"
            );
        }

        let artifact = mux(&video, &audio, config)?;
        info!(path = %artifact.path.display(), "Final video ready");

        Ok(AssemblyReport {
            timeline,
            video,
            audio,
            artifact,
            metadata: UploadMetadata::now(),
        })
    }
}
