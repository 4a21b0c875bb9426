//! Silent video generation
//!
//! Walks the timeline in order, sequencing each segment and feeding its
//! frames to the encoder sink.

use crate::encoder::{create_sink, FrameSink};
use crate::sequencer::{sequence_segment, SegmentFrames};
use crate::timing::Timeline;
use crate::{AssemblyConfig, Result};
use std::path::PathBuf;
use tracing::{debug, info};

/// The image-only video
#[derive(Debug, Clone, PartialEq)]
pub struct SilentVideo {
    /// Output file
    pub path: PathBuf,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Frame rate
    pub fps: u32,
    /// Frames written per segment, in timeline order (0 for skipped segments)
    pub segment_frames: Vec<u64>,
    /// Total frames written
    pub frame_count: u64,
}

impl SilentVideo {
    /// Playback length in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.frame_count as f64 / self.fps as f64
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count == 0
    }
}

/// Write every segment of the timeline into `sink`
///
/// Returns the frame count of each segment. The sink is not finalized.
pub fn write_timeline(
    timeline: &Timeline,
    config: &AssemblyConfig,
    sink: &mut dyn FrameSink,
) -> Result<Vec<u64>> {
    let mut counts = Vec::with_capacity(timeline.len());

    for segment in &timeline.segments {
        let frames = sequence_segment(segment, config);

        if let SegmentFrames::Skipped { .. } = frames {
            counts.push(0);
            continue;
        }

        for frame in frames.frames() {
            sink.write_frame(frame)?;
        }

        debug!(
            segment = segment.index,
            seconds = segment.display_seconds,
            frames = frames.frame_count(),
            "Segment written"
        );
        counts.push(frames.frame_count());
    }

    Ok(counts)
}

/// Render the timeline into the configured silent video file
pub fn render_silent_video(timeline: &Timeline, config: &AssemblyConfig) -> Result<SilentVideo> {
    config.validate()?;

    let path = config.silent_video_path();
    info!(
        path = %path.display(),
        segments = timeline.len(),
        "Creating video from images"
    );

    let mut sink = create_sink(config, &path)?;
    let segment_frames = write_timeline(timeline, config, sink.as_mut())?;
    sink.finalize()?;

    let frame_count = sink.frames_written();
    info!(frames = frame_count, "Silent video written");

    Ok(SilentVideo {
        path,
        width: config.width,
        height: config.height,
        fps: config.fps,
        segment_frames,
        frame_count,
    })
}
