//! ffmpeg process helpers and the ffmpeg-backed video writer

use super::{EncoderConfig, FrameSink};
use crate::image_loader::LoadedImage;
use crate::{AssemblyConfig, Codec, Error, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use tracing::{debug, warn};

/// Exit status and diagnostics of a finished process
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub program: String,
    pub success: bool,
    pub status: String,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Turn an unsuccessful exit into [`Error::ProcessFailed`]
    pub fn into_result(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(Error::ProcessFailed {
                program: self.program,
                status: self.status,
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

/// Run a process to completion, capturing its output
pub fn run_tool<S: AsRef<std::ffi::OsStr>>(program: &Path, args: &[S]) -> Result<ProcessOutput> {
    let name = program.display().to_string();
    debug!(
        program = %name,
        args = ?args.iter().map(|a| a.as_ref().to_string_lossy().into_owned()).collect::<Vec<_>>(),
        "Running external tool"
    );

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| Error::Ffmpeg(format!("Failed to start {}: {}", name, e)))?;

    Ok(ProcessOutput {
        program: name,
        success: output.status.success(),
        status: output.status.to_string(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// ffmpeg-based video writer
///
/// Raw RGBA frames go to ffmpeg's stdin; ffmpeg writes the MP4. The process
/// starts with the first frame.
pub struct FfmpegVideoWriter {
    ffmpeg: PathBuf,
    config: EncoderConfig,
    output_path: PathBuf,
    process: Option<Child>,
    frames_written: u64,
    finalized: bool,
}

impl FfmpegVideoWriter {
    pub fn new<P: AsRef<Path>>(ffmpeg: PathBuf, config: EncoderConfig, output_path: P) -> Self {
        Self {
            ffmpeg,
            config,
            output_path: output_path.as_ref().to_path_buf(),
            process: None,
            frames_written: 0,
            finalized: false,
        }
    }

    /// Command line for the encoding process
    pub fn args(&self) -> Vec<String> {
        let config = &self.config;
        let mut args: Vec<String> = [
            "-hide_banner",
            "-loglevel",
            "error",
            "-nostats",
            "-y",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        args.push(format!("{}x{}", config.width, config.height));
        args.extend(["-r".to_string(), config.fps.to_string()]);
        args.extend(["-i".to_string(), "pipe:0".to_string()]);
        args.extend(["-an".to_string(), "-c:v".to_string()]);
        args.push(config.codec.ffmpeg_encoder().to_string());

        match config.codec {
            Codec::H264 => {
                // Map quality (0-100) to CRF (51-0)
                let crf = ((100 - config.quality.min(100)) as u32 * 51) / 100;
                args.extend(["-preset".to_string(), "medium".to_string()]);
                args.extend(["-crf".to_string(), crf.to_string()]);
            }
            Codec::Mpeg4 => {
                // Map quality (0-100) to qscale (31-2)
                let qscale = 31 - (config.quality.min(100) as u32 * 29) / 100;
                args.extend(["-q:v".to_string(), qscale.to_string()]);
            }
        }

        args.extend(["-tag:v".to_string(), config.codec.fourcc().to_string()]);
        args.extend(["-pix_fmt".to_string(), "yuv420p".to_string()]);
        args.extend(["-r".to_string(), config.fps.to_string()]);
        args.extend(["-f".to_string(), "mp4".to_string()]);
        args.push(self.output_path.to_string_lossy().into_owned());
        args
    }

    fn spawn(&mut self) -> Result<&mut Child> {
        if self.process.is_none() {
            let args = self.args();
            debug!(ffmpeg = %self.ffmpeg.display(), ?args, "Starting video encoder");

            let process = Command::new(&self.ffmpeg)
                .args(&args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::piped())
                .spawn()
                .map_err(|e| Error::Ffmpeg(format!("Failed to start ffmpeg: {}", e)))?;

            self.process = Some(process);
        }

        self.process
            .as_mut()
            .ok_or_else(|| Error::Ffmpeg("FFmpeg process not running".to_string()))
    }

    /// Close stdin and wait for ffmpeg to write the trailer
    fn finish(&mut self) -> Result<()> {
        self.finalized = true;

        let mut process = match self.process.take() {
            Some(process) => process,
            None => {
                // Nothing was encoded; leave an empty file where the video would be
                File::create(&self.output_path)?;
                return Ok(());
            }
        };

        drop(process.stdin.take());

        let output = process
            .wait_with_output()
            .map_err(|e| Error::Ffmpeg(format!("FFmpeg process error: {}", e)))?;

        ProcessOutput {
            program: self.ffmpeg.display().to_string(),
            success: output.status.success(),
            status: output.status.to_string(),
            stdout: String::new(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
        .into_result()?;

        Ok(())
    }
}

impl FrameSink for FfmpegVideoWriter {
    fn write_frame(&mut self, frame: &LoadedImage) -> Result<()> {
        if self.finalized {
            return Err(Error::Encode("Writer already finalized".to_string()));
        }
        if frame.width != self.config.width || frame.height != self.config.height {
            return Err(Error::Encode(format!(
                "Frame is {}x{}, writer expects {}x{}",
                frame.width, frame.height, self.config.width, self.config.height
            )));
        }

        let process = self.spawn()?;
        let stdin = process
            .stdin
            .as_mut()
            .ok_or_else(|| Error::Ffmpeg("FFmpeg stdin not available".to_string()))?;

        if let Err(e) = stdin.write_all(&frame.data) {
            // ffmpeg went away; its stderr says why
            return Err(match self.finish() {
                Err(process_err) => process_err,
                Ok(()) => Error::Ffmpeg(format!("Failed to write frame: {}", e)),
            });
        }

        self.frames_written += 1;
        Ok(())
    }

    fn frames_written(&self) -> u64 {
        self.frames_written
    }

    fn finalize(&mut self) -> Result<()> {
        if self.finalized {
            return Ok(());
        }
        self.finish()
    }
}

impl Drop for FfmpegVideoWriter {
    fn drop(&mut self) {
        if !self.finalized && self.process.is_some() {
            warn!(
                path = %self.output_path.display(),
                "Video writer dropped before finalize, flushing"
            );
            let _ = self.finish();
        }
    }
}

/// Find ffmpeg executable
pub fn find_ffmpeg(custom_path: Option<&Path>) -> Result<PathBuf> {
    find_tool("ffmpeg", custom_path)
}

/// Find ffprobe, preferring the configured path, then the one next to ffmpeg
pub fn find_ffprobe(config: &AssemblyConfig) -> Result<PathBuf> {
    if let Some(path) = config.ffprobe_path.as_deref() {
        return find_tool("ffprobe", Some(path));
    }

    if let Some(ffmpeg) = config.ffmpeg_path.as_deref() {
        let mut sibling = ffmpeg.with_file_name("ffprobe");
        if let Some(ext) = ffmpeg.extension() {
            sibling.set_extension(ext);
        }
        if sibling.exists() {
            return Ok(sibling);
        }
    }

    find_tool("ffprobe", None)
}

fn find_tool(name: &str, custom_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = custom_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(Error::Ffmpeg(format!(
            "{} not found at: {}",
            name,
            path.display()
        )));
    }

    // Try PATH first, then the usual install locations
    let candidates = [
        PathBuf::from(name),
        Path::new("/usr/bin").join(name),
        Path::new("/usr/local/bin").join(name),
        Path::new("/opt/homebrew/bin").join(name),
    ];

    for candidate in candidates {
        if Command::new(&candidate)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
        {
            return Ok(candidate);
        }
    }

    Err(Error::CodecUnavailable(format!("{} not found in PATH", name)))
}

/// Check that ffmpeg has every named encoder
pub fn check_encoders(ffmpeg: &Path, encoders: &[&str]) -> Result<()> {
    let output = run_tool(ffmpeg, &["-hide_banner", "-encoders"])?.into_result()?;

    let missing: Vec<&str> = encoders
        .iter()
        .copied()
        .filter(|name| {
            !output
                .stdout
                .lines()
                .any(|line| line.split_whitespace().nth(1) == Some(*name))
        })
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::CodecUnavailable(format!(
            "FFmpeg lacks encoders: {}",
            missing.join(", ")
        )))
    }
}

/// Check if ffmpeg can encode the given codec
pub fn check_available(codec: Codec, ffmpeg_path: Option<&Path>) -> Result<()> {
    let ffmpeg = find_ffmpeg(ffmpeg_path)?;
    check_encoders(&ffmpeg, &[codec.ffmpeg_encoder()])
}

/// Check every encoder a pipeline run needs
pub fn check_pipeline_encoders(config: &AssemblyConfig) -> Result<()> {
    let ffmpeg = find_ffmpeg(config.ffmpeg_path.as_deref())?;
    check_encoders(
        &ffmpeg,
        &[config.codec.ffmpeg_encoder(), "libmp3lame", "aac"],
    )
}
