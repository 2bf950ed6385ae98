//! # Media Sources
//!
//! Source descriptors and metadata probing. A [`MediaSource`] is the probed,
//! immutable view of one input file: its duration, its video track's natural
//! size and display transform, and whether it carries audio. Probing shells
//! out to ffprobe; the parse layer is pure and testable on its own.

pub mod probe;
pub mod types;

pub use probe::{parse_probe_output, MediaProber};
pub use types::{MediaKind, MediaSource, VideoStream};
