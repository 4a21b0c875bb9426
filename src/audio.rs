//! Narration track assembly
//!
//! Clips are joined in order with a fixed silence between neighbours and no
//! silence after the last one. Durations come from the clips as given; the
//! built track is never measured to recover them.

use crate::encoder::ffmpeg::{find_ffmpeg, find_ffprobe, run_tool};
use crate::{AssemblyConfig, Error, NarrationClip, Result};
use hound::WavReader;
use std::ffi::OsStr;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The joined narration track
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedAudio {
    /// Output file
    pub path: PathBuf,
    /// Duration of each clip, in clip order
    pub clip_durations: Vec<f64>,
    /// Silence between consecutive clips, in seconds
    pub gap_seconds: f64,
}

impl CombinedAudio {
    pub fn clip_count(&self) -> usize {
        self.clip_durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clip_durations.is_empty()
    }

    /// Total length in seconds
    pub fn duration_seconds(&self) -> f64 {
        combined_duration(&self.clip_durations, self.gap_seconds)
    }
}

/// Length of `durations` joined with `gap_seconds` between neighbours
pub fn combined_duration(durations: &[f64], gap_seconds: f64) -> f64 {
    if durations.is_empty() {
        return 0.0;
    }
    durations.iter().sum::<f64>() + gap_seconds * (durations.len() - 1) as f64
}

/// ffmpeg filter graph joining `clip_count` inputs with silence between them
///
/// Every input is normalized to 44.1 kHz stereo so `concat` accepts it.
pub fn concat_filter(clip_count: usize, gap_seconds: f64) -> String {
    let mut graph = String::new();
    let mut labels = String::new();

    for i in 0..clip_count {
        graph.push_str(&format!(
            "[{i}:a]aresample=44100,aformat=sample_fmts=fltp:channel_layouts=stereo"
        ));
        if i + 1 < clip_count && gap_seconds > 0.0 {
            graph.push_str(&format!(",apad=pad_dur={gap_seconds}"));
        }
        graph.push_str(&format!("[a{i}];"));
        labels.push_str(&format!("[a{i}]"));
    }

    graph.push_str(&format!("{labels}concat=n={clip_count}:v=0:a=1[out]"));
    graph
}

/// Join the clips into the configured narration file (MP3)
///
/// With no clips an empty file is written and no process is started.
pub fn build_combined_audio(
    clips: &[NarrationClip],
    config: &AssemblyConfig,
) -> Result<CombinedAudio> {
    let path = config.narration_path();
    let clip_durations: Vec<f64> = clips.iter().map(|c| c.duration_seconds).collect();

    let combined = CombinedAudio {
        path: path.clone(),
        clip_durations,
        gap_seconds: config.gap_seconds,
    };

    if clips.is_empty() {
        info!(path = %path.display(), "No narration clips, writing empty track");
        File::create(&path)?;
        return Ok(combined);
    }

    info!(
        path = %path.display(),
        clips = clips.len(),
        seconds = combined.duration_seconds(),
        "Generating narration track"
    );

    let ffmpeg = find_ffmpeg(config.ffmpeg_path.as_deref())?;

    let mut args: Vec<String> = ["-hide_banner", "-loglevel", "error", "-nostats", "-y"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for clip in clips {
        args.push("-i".to_string());
        args.push(clip.path.to_string_lossy().into_owned());
    }
    args.extend([
        "-filter_complex".to_string(),
        concat_filter(clips.len(), config.gap_seconds),
        "-map".to_string(),
        "[out]".to_string(),
        "-c:a".to_string(),
        "libmp3lame".to_string(),
        "-b:a".to_string(),
        format!("{}k", config.narration_bitrate_kbps),
        "-f".to_string(),
        "mp3".to_string(),
        path.to_string_lossy().into_owned(),
    ]);

    run_tool(&ffmpeg, &args)?.into_result()?;
    debug!(path = %path.display(), "Narration track written");

    Ok(combined)
}

/// Measure an audio file's duration in seconds
///
/// WAV files are read directly; everything else goes through ffprobe.
pub fn probe_duration<P: AsRef<Path>>(path: P, config: &AssemblyConfig) -> Result<f64> {
    let path = path.as_ref();
    let is_wav = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("wav"))
        .unwrap_or(false);

    if is_wav {
        return wav_duration(path);
    }

    let ffprobe = find_ffprobe(config)?;
    let args = [
        OsStr::new("-v"),
        OsStr::new("error"),
        OsStr::new("-show_entries"),
        OsStr::new("format=duration"),
        OsStr::new("-of"),
        OsStr::new("default=noprint_wrappers=1:nokey=1"),
        path.as_os_str(),
    ];
    let output = run_tool(&ffprobe, &args)?.into_result()?;

    let text = output.stdout.trim();
    text.parse::<f64>().map_err(|_| {
        Error::Probe(format!(
            "Unexpected ffprobe duration {:?} for {}",
            text,
            path.display()
        ))
    })
}

/// Duration of a WAV file from its header
pub fn wav_duration<P: AsRef<Path>>(path: P) -> Result<f64> {
    let path = path.as_ref();
    let reader = WavReader::open(path)
        .map_err(|e| Error::Probe(format!("{}: {}", path.display(), e)))?;
    let spec = reader.spec();
    Ok(reader.duration() as f64 / spec.sample_rate as f64)
}

impl NarrationClip {
    /// Build a clip from a file, measuring its duration
    pub fn probe<P: AsRef<Path>>(path: P, config: &AssemblyConfig) -> Result<Self> {
        let duration = probe_duration(path.as_ref(), config)?;
        Ok(Self::new(path, duration))
    }
}
