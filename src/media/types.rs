use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::timeline::time::MediaTime;
use crate::timeline::transform::{AffineTransform, Dimensions};

/// Kind of media track within a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Video,
    Audio,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Audio => write!(f, "audio"),
        }
    }
}

/// Metadata of a source's video track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoStream {
    /// Stored pixel dimensions, before any display rotation is applied
    pub natural_size: Dimensions,
    /// Display transform declared by the container
    pub preferred_transform: AffineTransform,
}

impl VideoStream {
    /// Create a new video stream description.
    pub fn new(natural_size: Dimensions, preferred_transform: AffineTransform) -> Self {
        Self {
            natural_size,
            preferred_transform,
        }
    }
}

/// One input clip: an opaque file handle plus the metadata the timeline
/// needs. Immutable once probed; the builder only borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaSource {
    /// Path to the media file
    pub path: PathBuf,
    /// Total duration of the source
    pub duration: MediaTime,
    /// Video track metadata, if the source has a video track
    pub video: Option<VideoStream>,
    /// Whether the source has at least one audio track
    pub has_audio: bool,
}

impl MediaSource {
    /// Create a new media source.
    pub fn new<P: Into<PathBuf>>(
        path: P,
        duration: MediaTime,
        video: Option<VideoStream>,
        has_audio: bool,
    ) -> Self {
        Self {
            path: path.into(),
            duration,
            video,
            has_audio,
        }
    }

    /// The video track, or `None` for audio-only sources.
    pub fn video_stream(&self) -> Option<&VideoStream> {
        self.video.as_ref()
    }

    /// Source file name for log output.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("<unnamed>")
            .to_string()
    }
}
