//! Final muxing
//!
//! One blocking ffmpeg run: the video stream is copied as-is, the narration
//! is transcoded to AAC. Nothing is trimmed, padded or realigned, so streams
//! of different lengths simply end at different times.

pub mod mp4;

use crate::encoder::ffmpeg::{find_ffmpeg, run_tool, ProcessOutput};
use crate::{AssemblyConfig, CombinedAudio, Result, SilentVideo};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub use self::mp4::{inspect, video_samples, Mp4Summary, TrackSummary};

/// The deliverable video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalArtifact {
    /// Output file
    pub path: PathBuf,
    /// Whether the file carries the image stream
    pub has_video: bool,
    /// Whether the file carries the narration
    pub has_audio: bool,
}

/// Command line muxing `video` and `audio` into `output`
///
/// Either input may be left out; at least one must be given.
pub fn mux_args(
    video: Option<&Path>,
    audio: Option<&Path>,
    output: &Path,
    audio_bitrate_kbps: u32,
) -> Vec<String> {
    let mut args: Vec<String> = ["-hide_banner", "-loglevel", "error", "-nostats", "-y"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut input = 0;
    let mut maps = Vec::new();

    if let Some(video) = video {
        args.extend(["-i".to_string(), video.to_string_lossy().into_owned()]);
        maps.extend([
            "-map".to_string(),
            format!("{}:v:0", input),
            "-c:v".to_string(),
            "copy".to_string(),
        ]);
        input += 1;
    }

    if let Some(audio) = audio {
        args.extend(["-i".to_string(), audio.to_string_lossy().into_owned()]);
        maps.extend([
            "-map".to_string(),
            format!("{}:a:0", input),
            "-c:a".to_string(),
            "aac".to_string(),
            "-b:a".to_string(),
            format!("{}k", audio_bitrate_kbps),
        ]);
    }

    args.extend(maps);
    args.extend(["-f".to_string(), "mp4".to_string()]);
    args.push(output.to_string_lossy().into_owned());
    args
}

/// Run ffmpeg over the given inputs
///
/// A non-zero exit comes back as [`crate::Error::ProcessFailed`] carrying
/// ffmpeg's stderr.
pub fn mux_files(
    video: Option<&Path>,
    audio: Option<&Path>,
    output: &Path,
    config: &AssemblyConfig,
) -> Result<ProcessOutput> {
    let ffmpeg = find_ffmpeg(config.ffmpeg_path.as_deref())?;
    let args = mux_args(video, audio, output, config.final_audio_bitrate_kbps);
    run_tool(&ffmpeg, &args)?.into_result()
}

/// Combine the silent video and the narration into the final artifact
///
/// A stream with nothing in it is left out rather than muxed; with neither
/// stream an empty file is written.
pub fn mux(
    video: &SilentVideo,
    audio: &CombinedAudio,
    config: &AssemblyConfig,
) -> Result<FinalArtifact> {
    let output = config.final_video_path();
    let has_video = !video.is_empty();
    let has_audio = !audio.is_empty();

    info!(
        output = %output.display(),
        video_seconds = video.duration_seconds(),
        audio_seconds = audio.duration_seconds(),
        "Merging audio and video"
    );

    if !has_video {
        warn!("Silent video has no frames, final artifact carries audio only");
    }
    if !has_audio {
        warn!("No narration, final artifact carries video only");
    }

    if !has_video && !has_audio {
        File::create(&output)?;
        return Ok(FinalArtifact {
            path: output,
            has_video,
            has_audio,
        });
    }

    mux_files(
        has_video.then_some(video.path.as_path()),
        has_audio.then_some(audio.path.as_path()),
        &output,
        config,
    )?;

    Ok(FinalArtifact {
        path: output,
        has_video,
        has_audio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mux_args_copy_video_transcode_audio() {
        let args = mux_args(
            Some(Path::new("v.mp4")),
            Some(Path::new("a.mp3")),
            Path::new("out.mp4"),
            192,
        );
        let joined = args.join(" ");
        assert!(joined.contains("-i v.mp4 -i a.mp3"));
        assert!(joined.contains("-map 0:v:0 -c:v copy"));
        assert!(joined.contains("-map 1:a:0 -c:a aac -b:a 192k"));
        assert!(!joined.contains("-shortest"));
        assert_eq!(args.last().map(String::as_str), Some("out.mp4"));
    }

    #[test]
    fn test_mux_args_audio_only() {
        let joined = mux_args(None, Some(Path::new("a.mp3")), Path::new("out.mp4"), 128).join(" ");
        assert!(joined.contains("-map 0:a:0 -c:a aac"));
        assert!(!joined.contains("-c:v"));
    }

    #[test]
    fn test_mux_nothing_writes_empty_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = AssemblyConfig::default().with_output_dir(dir.path());
        let video = SilentVideo {
            path: config.silent_video_path(),
            width: 1280,
            height: 720,
            fps: 24,
            segment_frames: vec![],
            frame_count: 0,
        };
        let audio = CombinedAudio {
            path: config.narration_path(),
            clip_durations: vec![],
            gap_seconds: 3.0,
        };

        let artifact = mux(&video, &audio, &config).unwrap();
        assert!(!artifact.has_video && !artifact.has_audio);
        assert_eq!(std::fs::metadata(&artifact.path).unwrap().len(), 0);
    }
}
