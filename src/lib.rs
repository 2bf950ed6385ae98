//! # Clipmerge
//!
//! Merge two video clips and an optional audio track into a single exported
//! movie file.
//!
//! The second clip starts the instant the first ends, portrait and landscape
//! sources are normalized to render upright in a fixed-size target, and the
//! optional audio track is trimmed to the combined video duration. The heavy
//! lifting (decode, encode, mux) is delegated to FFmpeg running as a
//! subprocess; this library owns the timeline arithmetic that drives it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clipmerge::{
//!     config::Config,
//!     merge::{MergeEngine, MergeRequest},
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let engine = MergeEngine::new(Config::default());
//! let outcome = engine
//!     .merge(&MergeRequest {
//!         first: "clips/first.mov".into(),
//!         second: "clips/second.mov".into(),
//!         audio: Some("clips/song.m4a".into()),
//!         output_dir: "exports".into(),
//!     })
//!     .await?;
//! println!("merged into {:?}", outcome.movie.path);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - [`timeline`] - The pure core: rational time, transforms, orientation
//!   normalization, and the composition builder
//! - [`media`] - Source descriptors and ffprobe-backed metadata probing
//! - [`export`] - FFmpeg-backed export of a composition descriptor
//! - [`library`] - Authorization-gated media library imports
//! - [`merge`] - The engine wiring the pipeline together
//! - [`config`] - Configuration management
//!
//! ## Using the core directly
//!
//! The timeline core is synchronous and I/O-free, so descriptors can be built
//! and inspected without touching FFmpeg:
//!
//! ```rust
//! use clipmerge::media::{MediaSource, VideoStream};
//! use clipmerge::timeline::{
//!     build_composition, AffineTransform, Dimensions, MediaTime,
//! };
//!
//! let first = MediaSource::new(
//!     "first.mov",
//!     MediaTime::from_secs(5),
//!     Some(VideoStream::new(
//!         Dimensions::new(1920.0, 1080.0),
//!         AffineTransform::IDENTITY,
//!     )),
//!     true,
//! );
//! let second = MediaSource::new(
//!     "second.mov",
//!     MediaTime::from_secs(3),
//!     Some(VideoStream::new(
//!         Dimensions::new(1920.0, 1080.0),
//!         AffineTransform::IDENTITY,
//!     )),
//!     true,
//! );
//!
//! let descriptor =
//!     build_composition(&first, &second, None, Dimensions::new(390.0, 844.0)).unwrap();
//! assert_eq!(descriptor.duration(), MediaTime::from_secs(8));
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod library;
pub mod media;
pub mod merge;
pub mod timeline;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{MergerError, Result},
    media::MediaSource,
    merge::{MergeEngine, MergeRequest},
    timeline::{build_composition, CompositionDescriptor},
};
