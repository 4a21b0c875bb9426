//! Segment timing
//!
//! Each article's image stays on screen for its narration plus the gap. The
//! same duration list feeds the audio timeline builder.

use crate::{AssemblyConfig, Error, ImageAsset, Result};

/// Display duration of every segment
///
/// With `trailing_gap` the last segment gets the gap as well, so the video
/// outlasts the narration track by one gap.
pub fn display_durations(
    narration_seconds: &[f64],
    gap_seconds: f64,
    trailing_gap: bool,
) -> Vec<f64> {
    let last = narration_seconds.len().saturating_sub(1);
    narration_seconds
        .iter()
        .enumerate()
        .map(|(i, d)| {
            if i == last && !trailing_gap {
                *d
            } else {
                d + gap_seconds
            }
        })
        .collect()
}

/// One article's slot in the video
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Position in the article batch
    pub index: usize,
    /// Image shown during this segment
    pub image: ImageAsset,
    /// On-screen time in seconds
    pub display_seconds: f64,
}

/// Ordered segments plus the gap they were computed with
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub segments: Vec<Segment>,
    pub gap_seconds: f64,
}

impl Timeline {
    /// Pair images with their display durations
    pub fn build(
        images: &[ImageAsset],
        narration_seconds: &[f64],
        config: &AssemblyConfig,
    ) -> Result<Self> {
        if images.len() != narration_seconds.len() {
            return Err(Error::InvalidInput(format!(
                "{} images for {} narration clips",
                images.len(),
                narration_seconds.len()
            )));
        }

        let segments = images
            .iter()
            .zip(display_durations(
                narration_seconds,
                config.gap_seconds,
                config.trailing_gap,
            ))
            .enumerate()
            .map(|(index, (image, display_seconds))| Segment {
                index,
                image: image.clone(),
                display_seconds,
            })
            .collect();

        Ok(Self {
            segments,
            gap_seconds: config.gap_seconds,
        })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Sum of all display durations
    pub fn total_seconds(&self) -> f64 {
        self.segments.iter().map(|s| s.display_seconds).sum()
    }
}
