//! MP4 inspection
//!
//! Reads back what ffmpeg wrote: track layout, sample counts and raw video
//! samples.

use crate::{Error, Result};
use mp4::{Mp4Reader, TrackType};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One track of an MP4 file
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSummary {
    pub track_id: u32,
    pub sample_count: u32,
    pub duration_seconds: f64,
}

/// Track layout of an MP4 file
#[derive(Debug, Clone, PartialEq)]
pub struct Mp4Summary {
    pub duration_seconds: f64,
    pub video: Option<TrackSummary>,
    pub audio: Option<TrackSummary>,
}

fn open<P: AsRef<Path>>(path: P) -> Result<Mp4Reader<BufReader<File>>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let size = file.metadata()?.len();

    Mp4Reader::read_header(BufReader::new(file), size)
        .map_err(|e| Error::Mux(format!("Failed to read MP4 {}: {}", path.display(), e)))
}

fn first_track(
    reader: &Mp4Reader<BufReader<File>>,
    wanted: TrackType,
) -> Option<TrackSummary> {
    let mut tracks: Vec<_> = reader
        .tracks()
        .values()
        .filter(|t| matches!(t.track_type(), Ok(kind) if kind == wanted))
        .collect();
    tracks.sort_by_key(|t| t.track_id());

    tracks.first().map(|t| TrackSummary {
        track_id: t.track_id(),
        sample_count: t.sample_count(),
        duration_seconds: t.duration().as_secs_f64(),
    })
}

/// Summarize the first video and audio track of an MP4 file
pub fn inspect<P: AsRef<Path>>(path: P) -> Result<Mp4Summary> {
    let reader = open(path)?;

    Ok(Mp4Summary {
        duration_seconds: reader.duration().as_secs_f64(),
        video: first_track(&reader, TrackType::Video),
        audio: first_track(&reader, TrackType::Audio),
    })
}

/// Raw payload of every sample in the first video track, in decode order
pub fn video_samples<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<u8>>> {
    let path = path.as_ref();
    let mut reader = open(path)?;
    let track = first_track(&reader, TrackType::Video)
        .ok_or_else(|| Error::Mux(format!("No video track in {}", path.display())))?;

    let mut samples = Vec::with_capacity(track.sample_count as usize);
    // mp4 sample ids start at 1
    for sample_id in 1..=track.sample_count {
        let sample = reader
            .read_sample(track.track_id, sample_id)
            .map_err(|e| Error::Mux(format!("Failed to read sample {}: {}", sample_id, e)))?
            .ok_or_else(|| Error::Mux(format!("Missing sample {}", sample_id)))?;
        samples.push(sample.bytes.to_vec());
    }

    Ok(samples)
}
