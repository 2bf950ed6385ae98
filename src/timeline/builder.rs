//! Timeline Builder.
//!
//! Turns two probed video sources and an optional audio source into an
//! immutable [`CompositionDescriptor`]: sequential track placements, per-track
//! layer instructions (transform and opacity keyframes), and the overall
//! composition time range. The build is a pure one-shot transformation: it
//! either fails before producing anything or hands back a complete
//! descriptor for the export engine to consume.

use serde::{Deserialize, Serialize};

use crate::error::TimelineError;
use crate::media::types::{MediaKind, MediaSource};
use crate::timeline::orientation::corrected_transform;
use crate::timeline::time::{FrameRate, MediaTime, TimeRange};
use crate::timeline::transform::{AffineTransform, Dimensions};

/// Placement of one source on the composition timeline.
///
/// `time_range` selects from the source's own timeline and is mapped into the
/// composition starting at `start_offset`. Its duration never exceeds the
/// source duration; here it always equals it, since the full clip is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPlacement {
    /// The placed source
    pub source: MediaSource,
    /// Where the placed range starts on the composition timeline
    pub start_offset: MediaTime,
    /// The range of the source's own timeline being placed
    pub time_range: TimeRange,
}

impl TrackPlacement {
    /// The interval this placement occupies on the composition timeline.
    pub fn composition_range(&self) -> TimeRange {
        TimeRange::new(self.start_offset, self.time_range.duration)
    }
}

/// Per-track render directives: transform and opacity over time.
///
/// Keyframe times are monotonically non-decreasing; the setters keep the
/// invariant because the builder emits keyframes in timeline order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerInstruction {
    /// Index of the placement this layer renders
    pub track_index: usize,
    /// Transform keyframes, ordered by time
    transform_keyframes: Vec<(MediaTime, AffineTransform)>,
    /// Opacity keyframes, ordered by time, values in [0, 1]
    opacity_keyframes: Vec<(MediaTime, f32)>,
}

impl LayerInstruction {
    /// Create an empty layer instruction for a track.
    pub fn new(track_index: usize) -> Self {
        Self {
            track_index,
            transform_keyframes: Vec::new(),
            opacity_keyframes: Vec::new(),
        }
    }

    /// Append a transform keyframe. Times must not decrease.
    pub fn set_transform(&mut self, time: MediaTime, transform: AffineTransform) {
        debug_assert!(
            self.transform_keyframes
                .last()
                .map_or(true, |(last, _)| *last <= time),
            "transform keyframes must be appended in time order"
        );
        self.transform_keyframes.push((time, transform));
    }

    /// Append an opacity keyframe. Times must not decrease.
    pub fn set_opacity(&mut self, time: MediaTime, opacity: f32) {
        debug_assert!((0.0..=1.0).contains(&opacity));
        debug_assert!(
            self.opacity_keyframes
                .last()
                .map_or(true, |(last, _)| *last <= time),
            "opacity keyframes must be appended in time order"
        );
        self.opacity_keyframes.push((time, opacity));
    }

    /// Transform keyframes in time order.
    pub fn transform_keyframes(&self) -> &[(MediaTime, AffineTransform)] {
        &self.transform_keyframes
    }

    /// Opacity keyframes in time order.
    pub fn opacity_keyframes(&self) -> &[(MediaTime, f32)] {
        &self.opacity_keyframes
    }
}

/// The complete, immutable description of one merge: placements, layers,
/// optional audio, and the render parameters. Built once per request and
/// consumed exactly once by the export engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionDescriptor {
    /// Overall composition interval `[0, sum of video durations)`
    pub time_range: TimeRange,
    /// Video placements in composition order
    pub placements: Vec<TrackPlacement>,
    /// One layer instruction per placement, same order
    pub layers: Vec<LayerInstruction>,
    /// Audio placement, trimmed to the composition interval
    pub audio: Option<TrackPlacement>,
    /// Render target size
    pub render_size: Dimensions,
    /// Output frame rate
    pub frame_rate: FrameRate,
}

impl CompositionDescriptor {
    /// Total duration of the composition.
    pub fn duration(&self) -> MediaTime {
        self.time_range.duration
    }
}

fn missing_track(source: &MediaSource, kind: MediaKind) -> TimelineError {
    TimelineError::MissingTrack {
        kind,
        path: source.path.display().to_string(),
    }
}

/// Build the composition for a two-clip merge.
///
/// The first clip is placed at offset zero, the second starts the instant the
/// first ends, and the optional audio spans the combined video duration. The
/// first layer carries an opacity keyframe of `0.0` at exactly
/// `first.duration`: a hard cut through the opacity primitive, so the track
/// disappears the instant its range ends instead of bleeding into the second
/// clip's frames.
pub fn build_composition(
    first: &MediaSource,
    second: &MediaSource,
    audio: Option<&MediaSource>,
    render_size: Dimensions,
) -> Result<CompositionDescriptor, TimelineError> {
    let first_video = first
        .video_stream()
        .ok_or_else(|| missing_track(first, MediaKind::Video))?;
    let second_video = second
        .video_stream()
        .ok_or_else(|| missing_track(second, MediaKind::Video))?;
    if let Some(audio) = audio {
        if !audio.has_audio {
            return Err(missing_track(audio, MediaKind::Audio));
        }
    }
    if render_size.width <= 0.0 || render_size.height <= 0.0 {
        return Err(TimelineError::InvalidParameters {
            details: format!("render size must be positive, got {}", render_size),
        });
    }

    let total = first.duration + second.duration;

    let placements = vec![
        TrackPlacement {
            source: first.clone(),
            start_offset: MediaTime::ZERO,
            time_range: TimeRange::new(MediaTime::ZERO, first.duration),
        },
        TrackPlacement {
            source: second.clone(),
            start_offset: first.duration,
            time_range: TimeRange::new(MediaTime::ZERO, second.duration),
        },
    ];

    let mut layers = Vec::with_capacity(placements.len());
    for (index, video) in [first_video, second_video].into_iter().enumerate() {
        let mut layer = LayerInstruction::new(index);
        layer.set_transform(MediaTime::ZERO, corrected_transform(video, render_size));
        layers.push(layer);
    }

    // Hide the first track the instant its range ends
    layers[0].set_opacity(first.duration, 0.0);

    let audio = audio.map(|source| TrackPlacement {
        source: source.clone(),
        start_offset: MediaTime::ZERO,
        time_range: TimeRange::new(MediaTime::ZERO, total),
    });

    Ok(CompositionDescriptor {
        time_range: TimeRange::new(MediaTime::ZERO, total),
        placements,
        layers,
        audio,
        render_size,
        frame_rate: FrameRate::FPS_30,
    })
}
