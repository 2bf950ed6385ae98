use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use chrono::Local;
use tokio::task;
use tracing::{debug, info};

use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::timeline::builder::CompositionDescriptor;
use crate::timeline::orientation::{classify, Orientation};

/// A finished export on disk
#[derive(Debug, Clone)]
pub struct ExportedMovie {
    pub path: PathBuf,
    pub duration: f64,
    pub file_size: u64,
}

/// Renders a [`CompositionDescriptor`] to a movie file via external FFmpeg.
///
/// The exporter owns the whole async boundary: the core hands it an immutable
/// descriptor and gets the outcome back through the returned future, with no
/// callbacks and no shared state. Cancellation and timeouts are left to the
/// engine's own behavior.
pub struct Exporter {
    settings: ExportConfig,
}

impl Exporter {
    pub fn new(settings: ExportConfig) -> Self {
        Self { settings }
    }

    pub fn check_ffmpeg_available() -> bool {
        Command::new("ffmpeg")
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// A timestamped output path in the given directory, matching the
    /// `mergedVideo-<date>` naming of finished merges.
    pub fn timestamped_output_path(&self, directory: &Path) -> PathBuf {
        let stamp = Local::now().format("%Y-%m-%d-%H%M%S");
        directory.join(format!("mergedVideo-{}.{}", stamp, self.settings.container))
    }

    /// Render the composition into `output_path`.
    pub async fn export(
        &self,
        descriptor: &CompositionDescriptor,
        output_path: &Path,
    ) -> Result<ExportedMovie, ExportError> {
        if !Self::check_ffmpeg_available() {
            return Err(ExportError::EngineUnavailable);
        }

        let args = build_ffmpeg_args(descriptor, output_path, &self.settings);
        debug!("ffmpeg args: {:?}", args);

        let mut cmd = Command::new("ffmpeg");
        cmd.args(&args);

        let output = task::spawn_blocking(move || cmd.output())
            .await
            .map_err(|e| ExportError::ExportFailed {
                reason: format!("Failed to spawn FFmpeg process: {}", e),
            })?
            .map_err(|e| ExportError::ExportFailed {
                reason: format!("FFmpeg execution failed: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExportError::ExportFailed {
                reason: format!("FFmpeg failed: {}", stderr),
            });
        }

        let metadata =
            std::fs::metadata(output_path).map_err(|e| ExportError::ExportFailed {
                reason: format!("Output file missing after export: {}", e),
            })?;

        let movie = ExportedMovie {
            path: output_path.to_path_buf(),
            duration: descriptor.duration().to_seconds_f64(),
            file_size: metadata.len(),
        };

        info!(
            "Export complete: {:?} ({:.1} MB)",
            movie.path,
            movie.file_size as f64 / 1024.0 / 1024.0
        );

        Ok(movie)
    }
}

/// Lower the descriptor into an ffmpeg argument list. Pure, for testability.
///
/// Each video layer becomes a filter chain derived from its source's
/// classified orientation (transpose/flip), scaled and padded into the render
/// target; the chains are concatenated in placement order. Audio, when
/// present, is mapped from its own input and trimmed with the composition
/// duration. If the audio runs short the engine simply stops it there, which
/// is the trim-by-truncation contract.
pub fn build_ffmpeg_args(
    descriptor: &CompositionDescriptor,
    output_path: &Path,
    settings: &ExportConfig,
) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();

    for placement in &descriptor.placements {
        args.push("-i".to_string());
        args.push(placement.source.path.display().to_string());
    }

    let audio_input = descriptor.audio.as_ref().map(|placement| {
        args.push("-i".to_string());
        args.push(placement.source.path.display().to_string());
        descriptor.placements.len()
    });

    let width = descriptor.render_size.width.round() as i64;
    let height = descriptor.render_size.height.round() as i64;
    let fps = descriptor.frame_rate.to_fps_f64().round() as i64;

    let mut filter = String::new();
    for (index, layer) in descriptor.layers.iter().enumerate() {
        let orientation = descriptor.placements[layer.track_index]
            .source
            .video_stream()
            .map(|video| classify(&video.preferred_transform).orientation)
            .unwrap_or(Orientation::Up);

        let mut chain: Vec<String> = Vec::new();
        match orientation {
            Orientation::Right => chain.push("transpose=1".to_string()),
            Orientation::Left => chain.push("transpose=2".to_string()),
            Orientation::Down => chain.push("hflip,vflip".to_string()),
            Orientation::Up => {}
        }
        chain.push(format!(
            "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,setsar=1,fps={fps}",
            w = width,
            h = height,
            fps = fps,
        ));

        filter.push_str(&format!("[{}:v]{}[v{}];", index, chain.join(","), index));
    }

    for index in 0..descriptor.layers.len() {
        filter.push_str(&format!("[v{}]", index));
    }
    filter.push_str(&format!(
        "concat=n={}:v=1:a=0[vout]",
        descriptor.layers.len()
    ));

    args.push("-filter_complex".to_string());
    args.push(filter);
    args.push("-map".to_string());
    args.push("[vout]".to_string());

    if let Some(input) = audio_input {
        args.push("-map".to_string());
        args.push(format!("{}:a:0", input));
        args.push("-c:a".to_string());
        args.push("aac".to_string());
    }

    args.push("-c:v".to_string());
    args.push("libx264".to_string());
    args.push("-crf".to_string());
    args.push(quality_to_crf(settings.quality).to_string());
    args.push("-pix_fmt".to_string());
    args.push("yuv420p".to_string());

    if settings.optimize_for_streaming {
        args.push("-movflags".to_string());
        args.push("+faststart".to_string());
    }

    // Trim everything, audio included, to the composition range
    args.push("-t".to_string());
    args.push(format!("{:.6}", descriptor.duration().to_seconds_f64()));

    args.push("-y".to_string());
    args.push(output_path.display().to_string());

    args
}

fn quality_to_crf(quality: u8) -> u8 {
    (51 - ((quality as f32 / 100.0) * 51.0) as u8).clamp(0, 51)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::types::{MediaSource, VideoStream};
    use crate::timeline::builder::build_composition;
    use crate::timeline::time::MediaTime;
    use crate::timeline::transform::Dimensions;

    fn source(name: &str, seconds: i64, orientation: Orientation) -> MediaSource {
        MediaSource::new(
            name,
            MediaTime::from_secs(seconds),
            Some(VideoStream::new(
                Dimensions::new(1920.0, 1080.0),
                orientation.preferred_transform(),
            )),
            true,
        )
    }

    fn descriptor(audio: Option<&MediaSource>) -> CompositionDescriptor {
        let first = source("first.mov", 5, Orientation::Up);
        let second = source("second.mov", 3, Orientation::Right);
        build_composition(&first, &second, audio, Dimensions::new(390.0, 844.0)).unwrap()
    }

    #[test]
    fn test_args_without_audio() {
        let descriptor = descriptor(None);
        let args = build_ffmpeg_args(&descriptor, Path::new("out.mov"), &ExportConfig::default());

        let inputs = args.iter().filter(|a| *a == "-i").count();
        assert_eq!(inputs, 2);

        let filter = &args[args.iter().position(|a| a == "-filter_complex").unwrap() + 1];
        assert!(filter.contains("concat=n=2:v=1:a=0[vout]"));
        // Second clip is a quarter turn clockwise
        assert!(filter.contains("[1:v]transpose=1"));
        assert!(!filter.contains("[0:v]transpose"));

        assert!(!args.iter().any(|a| a == "aac"));
        assert!(args.contains(&"+faststart".to_string()));
        assert_eq!(args.last().unwrap(), "out.mov");
    }

    #[test]
    fn test_args_with_audio() {
        let audio = MediaSource::new("song.m4a", MediaTime::from_secs(30), None, true);
        let descriptor = descriptor(Some(&audio));
        let args = build_ffmpeg_args(&descriptor, Path::new("out.mov"), &ExportConfig::default());

        let inputs = args.iter().filter(|a| *a == "-i").count();
        assert_eq!(inputs, 3);
        // Audio is the third input, mapped and trimmed with the video
        assert!(args.contains(&"2:a:0".to_string()));
        assert!(args.contains(&"8.000000".to_string()));
    }

    #[test]
    fn test_streaming_flag_respects_settings() {
        let descriptor = descriptor(None);
        let settings = ExportConfig {
            optimize_for_streaming: false,
            ..ExportConfig::default()
        };
        let args = build_ffmpeg_args(&descriptor, Path::new("out.mov"), &settings);
        assert!(!args.contains(&"+faststart".to_string()));
    }

    #[test]
    fn test_quality_to_crf() {
        assert_eq!(quality_to_crf(100), 0);
        assert_eq!(quality_to_crf(0), 51);
        assert!(quality_to_crf(85) < quality_to_crf(50));
    }

    #[test]
    fn test_timestamped_output_path() {
        let exporter = Exporter::new(ExportConfig::default());
        let path = exporter.timestamped_output_path(Path::new("/tmp/exports"));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("mergedVideo-"));
        assert!(name.ends_with(".mov"));
        assert!(path.starts_with("/tmp/exports"));
    }
}
