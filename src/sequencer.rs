//! Frame sequencing
//!
//! A segment becomes either a run of identical frames of its resized image,
//! or nothing at all when the image is missing or unreadable.

use crate::image_loader::LoadedImage;
use crate::timing::Segment;
use crate::AssemblyConfig;
use std::iter::{repeat, Repeat, Take};
use tracing::warn;

/// Number of frames covering `seconds` at `fps`
///
/// Truncates toward zero. Negative and NaN durations give 0 frames.
pub fn frame_count(seconds: f64, fps: u32) -> u64 {
    // float -> int casts saturate, so negatives and NaN land on 0
    (seconds * fps as f64).floor() as u64
}

/// Why a segment produced no frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No image was downloaded for the article
    MissingAsset,
    /// The image file could not be read or decoded
    Undecodable(String),
}

/// Frames of one segment
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentFrames {
    Present {
        index: usize,
        image: LoadedImage,
        count: u64,
    },
    Skipped {
        index: usize,
        reason: SkipReason,
    },
}

impl SegmentFrames {
    pub fn index(&self) -> usize {
        match self {
            SegmentFrames::Present { index, .. } | SegmentFrames::Skipped { index, .. } => *index,
        }
    }

    /// Number of frames this segment emits
    pub fn frame_count(&self) -> u64 {
        match self {
            SegmentFrames::Present { count, .. } => *count,
            SegmentFrames::Skipped { .. } => 0,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, SegmentFrames::Skipped { .. })
    }

    /// Lazy stream of this segment's frames, in order
    pub fn frames(&self) -> Frames<'_> {
        match self {
            SegmentFrames::Present { image, count, .. } => Frames {
                inner: Some(repeat(image).take(*count as usize)),
            },
            SegmentFrames::Skipped { .. } => Frames { inner: None },
        }
    }
}

/// Iterator over the frames of one segment
pub struct Frames<'a> {
    inner: Option<Take<Repeat<&'a LoadedImage>>>,
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a LoadedImage;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.as_mut()?.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            Some(inner) => inner.size_hint(),
            None => (0, Some(0)),
        }
    }
}

/// Load and resize a segment's image and work out its frame count
///
/// Never fails: unreadable images turn into [`SegmentFrames::Skipped`].
pub fn sequence_segment(segment: &Segment, config: &AssemblyConfig) -> SegmentFrames {
    let path = match &segment.image {
        Some(path) => path,
        None => {
            warn!(segment = segment.index, "No image for segment, skipping");
            return SegmentFrames::Skipped {
                index: segment.index,
                reason: SkipReason::MissingAsset,
            };
        }
    };

    match LoadedImage::load_resized(path, config.width, config.height) {
        Ok(image) => SegmentFrames::Present {
            index: segment.index,
            image,
            count: frame_count(segment.display_seconds, config.fps),
        },
        Err(e) => {
            warn!(
                segment = segment.index,
                path = %path.display(),
                error = %e,
                "Could not decode image, skipping segment"
            );
            SegmentFrames::Skipped {
                index: segment.index,
                reason: SkipReason::Undecodable(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_frame_count_truncates() {
        assert_eq!(frame_count(8.0, 24), 192);
        assert_eq!(frame_count(10.0, 24), 240);
        assert_eq!(frame_count(8.1, 24), 194);
        assert_eq!(frame_count(0.04, 24), 0);
    }

    #[test]
    fn test_frame_count_degenerate() {
        assert_eq!(frame_count(0.0, 24), 0);
        assert_eq!(frame_count(-3.0, 24), 0);
        assert_eq!(frame_count(f64::NAN, 24), 0);
    }

    #[test]
    fn test_missing_image_is_skipped() {
        let segment = Segment {
            index: 2,
            image: None,
            display_seconds: 7.0,
        };
        let frames = sequence_segment(&segment, &AssemblyConfig::default());
        assert_eq!(
            frames,
            SegmentFrames::Skipped {
                index: 2,
                reason: SkipReason::MissingAsset
            }
        );
        assert_eq!(frames.frames().count(), 0);
    }

    #[test]
    fn test_unreadable_image_is_skipped() {
        let segment = Segment {
            index: 0,
            image: Some(PathBuf::from("/nonexistent/news_1.jpg")),
            display_seconds: 7.0,
        };
        let frames = sequence_segment(&segment, &AssemblyConfig::default());
        assert!(matches!(
            frames,
            SegmentFrames::Skipped {
                reason: SkipReason::Undecodable(_),
                ..
            }
        ));
        assert_eq!(frames.frame_count(), 0);
    }

    #[test]
    fn test_present_frames_repeat_image() {
        let image = LoadedImage {
            width: 1,
            height: 1,
            data: vec![10, 20, 30, 255],
        };
        let frames = SegmentFrames::Present {
            index: 0,
            image: image.clone(),
            count: 3,
        };
        let emitted: Vec<_> = frames.frames().collect();
        assert_eq!(emitted.len(), 3);
        assert!(emitted.iter().all(|f| **f == image));
        assert_eq!(frames.frames().size_hint(), (3, Some(3)));
    }
}
