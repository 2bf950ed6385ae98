//! # Export Engine
//!
//! The external collaborator that turns a composition descriptor into a movie
//! file. All encoding and muxing is delegated to FFmpeg running as a
//! subprocess; this module only lowers the descriptor into an argument list
//! and supervises the run.

pub mod exporter;

pub use exporter::{build_ffmpeg_args, ExportedMovie, Exporter};
