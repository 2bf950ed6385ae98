use std::path::PathBuf;

use tracing::{debug, info};

use crate::{
    config::Config,
    error::Result,
    export::{ExportedMovie, Exporter},
    library::{Authorization, MediaLibrary},
    media::{MediaProber, MediaSource},
    timeline::{build_composition, CompositionDescriptor},
};

/// One merge request: everything a merge needs, carried explicitly.
///
/// Keeping the sources in a request object instead of shared mutable slots
/// means two requests can't trample each other's sources.
#[derive(Debug, Clone)]
pub struct MergeRequest {
    /// First video clip
    pub first: PathBuf,
    /// Second video clip, appended after the first
    pub second: PathBuf,
    /// Optional audio track laid under the combined video
    pub audio: Option<PathBuf>,
    /// Directory for the exported movie
    pub output_dir: PathBuf,
}

/// What a finished merge produced.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// The exported movie file
    pub movie: ExportedMovie,
    /// Where the movie landed in the media library, if saving was enabled
    pub library_path: Option<PathBuf>,
}

/// Merge engine that orchestrates the entire clip-merge process
///
/// The engine follows a clear pipeline:
/// 1. Probing - Load duration, size, and display-transform metadata
/// 2. Timeline Build - Derive placements, layer instructions, and time range
/// 3. Export - Render the composition through the external engine
/// 4. Library - Import the finished movie, if configured
///
/// Steps 1 and 3 cross the subprocess boundary and are async; step 2 is the
/// pure core and stays synchronous. The engine holds no per-request state, so
/// one engine can serve requests back to back; run one merge at a time per
/// output path.
pub struct MergeEngine {
    config: Config,
    prober: MediaProber,
}

impl MergeEngine {
    /// Create a new merge engine with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            prober: MediaProber::new(),
        }
    }

    /// Run a merge request through the full pipeline.
    pub async fn merge(&self, request: &MergeRequest) -> Result<MergeOutcome> {
        info!("🎬 Starting merge");
        info!("   First:  {:?}", request.first);
        info!("   Second: {:?}", request.second);
        if let Some(audio) = &request.audio {
            info!("   Audio:  {:?}", audio);
        }

        let (first, second, audio) = self.probe_sources(request).await?;
        let descriptor = self.build_timeline(&first, &second, audio.as_ref())?;
        let movie = self.export(&descriptor, request).await?;
        let library_path = self.save_to_library(&movie)?;

        info!("🎉 Merge complete! Output saved to: {:?}", movie.path);
        Ok(MergeOutcome {
            movie,
            library_path,
        })
    }

    // ==========================================
    // PIPELINE STEP 1: PROBING
    // ==========================================

    async fn probe_sources(
        &self,
        request: &MergeRequest,
    ) -> Result<(MediaSource, MediaSource, Option<MediaSource>)> {
        info!("🔍 Step 1: Probing sources...");

        let first = self.prober.probe(&request.first).await?;
        let second = self.prober.probe(&request.second).await?;
        let audio = match &request.audio {
            Some(path) => Some(self.prober.probe(path).await?),
            None => None,
        };

        info!(
            "   ✅ Probed: {} ({}) + {} ({})",
            first.display_name(),
            first.duration,
            second.display_name(),
            second.duration
        );
        if let Some(audio) = &audio {
            info!("      Audio: {} ({})", audio.display_name(), audio.duration);
        }

        Ok((first, second, audio))
    }

    // ==========================================
    // PIPELINE STEP 2: TIMELINE BUILD
    // ==========================================

    fn build_timeline(
        &self,
        first: &MediaSource,
        second: &MediaSource,
        audio: Option<&MediaSource>,
    ) -> Result<CompositionDescriptor> {
        info!("⏱️  Step 2: Building composition timeline...");

        let render_size = self.config.render.dimensions();
        let descriptor = build_composition(first, second, audio, render_size)?;

        info!("   ✅ Timeline built:");
        info!("      Range: {}", descriptor.time_range);
        info!("      Render: {} at {}", descriptor.render_size, descriptor.frame_rate);
        debug!(
            "      Layers: {} video, audio {}",
            descriptor.layers.len(),
            if descriptor.audio.is_some() { "yes" } else { "no" }
        );

        Ok(descriptor)
    }

    // ==========================================
    // PIPELINE STEP 3: EXPORT
    // ==========================================

    async fn export(
        &self,
        descriptor: &CompositionDescriptor,
        request: &MergeRequest,
    ) -> Result<ExportedMovie> {
        info!("📼 Step 3: Exporting...");

        let exporter = Exporter::new(self.config.export.clone());
        let output_path = exporter.timestamped_output_path(&request.output_dir);

        std::fs::create_dir_all(&request.output_dir)?;
        let movie = exporter.export(descriptor, &output_path).await?;

        info!("   ✅ Exported {:.1}s to {:?}", movie.duration, movie.path);
        Ok(movie)
    }

    // ==========================================
    // PIPELINE STEP 4: LIBRARY
    // ==========================================

    fn save_to_library(&self, movie: &ExportedMovie) -> Result<Option<PathBuf>> {
        if !self.config.library.save_to_library {
            return Ok(None);
        }

        info!("📚 Step 4: Saving to media library...");

        let mut library = MediaLibrary::new(
            self.config.library.directory(),
            Authorization::NotDetermined,
        );
        let imported = library.import(&movie.path)?;

        info!("   ✅ Saved to library: {:?}", imported);
        Ok(Some(imported))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::types::VideoStream;
    use crate::timeline::{AffineTransform, Dimensions, MediaTime, TimeRange};

    fn engine() -> MergeEngine {
        MergeEngine::new(Config::default())
    }

    fn video(name: &str, seconds: i64) -> MediaSource {
        MediaSource::new(
            name,
            MediaTime::from_secs(seconds),
            Some(VideoStream::new(
                Dimensions::new(1920.0, 1080.0),
                AffineTransform::IDENTITY,
            )),
            true,
        )
    }

    #[test]
    fn test_build_timeline_uses_configured_render_size() {
        let engine = engine();
        let first = video("a.mov", 5);
        let second = video("b.mov", 3);

        let descriptor = engine.build_timeline(&first, &second, None).unwrap();
        assert_eq!(descriptor.render_size, Dimensions::new(390.0, 844.0));
        assert_eq!(
            descriptor.time_range,
            TimeRange::new(MediaTime::ZERO, MediaTime::from_secs(8))
        );
    }

    #[test]
    fn test_build_timeline_rejects_audio_only_video_slot() {
        let engine = engine();
        let first = video("a.mov", 5);
        let audio_only = MediaSource::new("song.m4a", MediaTime::from_secs(30), None, true);

        assert!(engine.build_timeline(&first, &audio_only, None).is_err());
    }
}
