//! Media metadata probing via ffprobe.
//!
//! The picker hands us file paths; the timeline needs durations, natural
//! sizes, and display transforms. ffprobe supplies all three as JSON, and the
//! parse layer is a pure function of that JSON so it can be tested without a
//! subprocess.

use std::path::Path;
use std::process::{Command, Stdio};

use serde::Deserialize;
use tokio::task;
use tracing::{debug, warn};

use crate::error::ProbeError;
use crate::media::types::{MediaSource, VideoStream};
use crate::timeline::orientation::Orientation;
use crate::timeline::time::MediaTime;
use crate::timeline::transform::Dimensions;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
    #[serde(default)]
    side_data_list: Vec<ProbeSideData>,
    tags: Option<ProbeStreamTags>,
}

#[derive(Debug, Deserialize)]
struct ProbeSideData {
    // Display Matrix side data: counter-clockwise degrees
    rotation: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ProbeStreamTags {
    // Legacy rotate tag: clockwise degrees, as a string
    rotate: Option<String>,
}

impl ProbeStream {
    fn is_video(&self) -> bool {
        self.codec_type.as_deref() == Some("video")
    }

    fn is_audio(&self) -> bool {
        self.codec_type.as_deref() == Some("audio")
    }

    /// Clockwise display rotation in degrees, from either metadata form.
    fn rotation_degrees(&self) -> i64 {
        if let Some(rotate) = self
            .tags
            .as_ref()
            .and_then(|tags| tags.rotate.as_deref())
            .and_then(|value| value.parse::<i64>().ok())
        {
            return rotate;
        }
        self.side_data_list
            .iter()
            .find_map(|side_data| side_data.rotation)
            .map(|ccw| (-ccw).round() as i64)
            .unwrap_or(0)
    }
}

/// Probes media files for the metadata the Timeline Builder consumes.
pub struct MediaProber;

impl MediaProber {
    pub fn new() -> Self {
        Self
    }

    /// Check whether ffprobe can be spawned at all.
    pub fn check_ffprobe_available() -> bool {
        Command::new("ffprobe")
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Probe a media file, producing an immutable [`MediaSource`].
    pub async fn probe<P: AsRef<Path>>(&self, path: P) -> Result<MediaSource, ProbeError> {
        let path = path.as_ref().to_path_buf();

        if !Self::check_ffprobe_available() {
            return Err(ProbeError::ProberUnavailable);
        }

        debug!("Probing media file: {:?}", path);

        let command_path = path.clone();
        let output = task::spawn_blocking(move || {
            Command::new("ffprobe")
                .args([
                    "-v",
                    "quiet",
                    "-print_format",
                    "json",
                    "-show_format",
                    "-show_streams",
                ])
                .arg(&command_path)
                .output()
        })
        .await
        .map_err(|_| ProbeError::ProbeFailed {
            path: path.display().to_string(),
        })?
        .map_err(|_| ProbeError::ProbeFailed {
            path: path.display().to_string(),
        })?;

        if !output.status.success() {
            return Err(ProbeError::ProbeFailed {
                path: path.display().to_string(),
            });
        }

        let json = String::from_utf8_lossy(&output.stdout);
        parse_probe_output(&path, &json)
    }
}

impl Default for MediaProber {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse ffprobe JSON into a [`MediaSource`]. Pure; no subprocess involved.
pub fn parse_probe_output(path: &Path, json: &str) -> Result<MediaSource, ProbeError> {
    let parsed: ProbeOutput = serde_json::from_str(json).map_err(|e| {
        ProbeError::MalformedOutput {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
    })?;

    let video_stream = parsed.streams.iter().find(|stream| stream.is_video());
    let has_audio = parsed.streams.iter().any(|stream| stream.is_audio());

    let duration = parsed
        .format
        .as_ref()
        .and_then(|format| format.duration.as_deref())
        .or_else(|| video_stream.and_then(|stream| stream.duration.as_deref()))
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|seconds| *seconds > 0.0)
        .map(MediaTime::from_seconds_f64)
        .ok_or_else(|| ProbeError::MissingDuration {
            path: path.display().to_string(),
        })?;

    let video = match video_stream {
        Some(stream) => {
            let (width, height) = match (stream.width, stream.height) {
                (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
                _ => {
                    return Err(ProbeError::MalformedOutput {
                        path: path.display().to_string(),
                        reason: "video stream has no dimensions".to_string(),
                    })
                }
            };

            let degrees = stream.rotation_degrees();
            let orientation = Orientation::from_rotation_degrees(degrees).unwrap_or_else(|| {
                warn!(
                    "non-quarter-turn rotation {}° in {:?}, treating as unrotated",
                    degrees, path
                );
                Orientation::Up
            });

            Some(VideoStream::new(
                Dimensions::new(width as f64, height as f64),
                orientation.preferred_transform(),
            ))
        }
        None => None,
    };

    Ok(MediaSource::new(path, duration, video, has_audio))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::orientation::classify;

    fn probe_json(streams: &str, duration: &str) -> String {
        format!(
            r#"{{ "streams": [{streams}], "format": {{ "duration": "{duration}" }} }}"#
        )
    }

    #[test]
    fn test_parse_landscape_with_audio() {
        let json = probe_json(
            r#"{ "codec_type": "video", "width": 1920, "height": 1080 },
               { "codec_type": "audio" }"#,
            "5.000000",
        );

        let source = parse_probe_output(Path::new("clip.mov"), &json).unwrap();
        assert_eq!(source.duration, MediaTime::from_secs(5));
        assert!(source.has_audio);

        let stream = source.video_stream().unwrap();
        assert_eq!(stream.natural_size, Dimensions::new(1920.0, 1080.0));
        assert_eq!(classify(&stream.preferred_transform).orientation, Orientation::Up);
    }

    #[test]
    fn test_parse_rotate_tag() {
        let json = probe_json(
            r#"{ "codec_type": "video", "width": 1080, "height": 1920,
                 "tags": { "rotate": "90" } }"#,
            "3.2",
        );

        let source = parse_probe_output(Path::new("portrait.mov"), &json).unwrap();
        let result = classify(&source.video_stream().unwrap().preferred_transform);
        assert_eq!(result.orientation, Orientation::Right);
        assert!(result.is_portrait);
    }

    #[test]
    fn test_parse_display_matrix_rotation() {
        // Display Matrix side data reports counter-clockwise degrees
        let json = probe_json(
            r#"{ "codec_type": "video", "width": 1920, "height": 1080,
                 "side_data_list": [{ "side_data_type": "Display Matrix", "rotation": -90 }] }"#,
            "4.0",
        );

        let source = parse_probe_output(Path::new("clip.mp4"), &json).unwrap();
        let result = classify(&source.video_stream().unwrap().preferred_transform);
        assert_eq!(result.orientation, Orientation::Right);
    }

    #[test]
    fn test_parse_audio_only() {
        let json = probe_json(r#"{ "codec_type": "audio" }"#, "187.2");

        let source = parse_probe_output(Path::new("song.m4a"), &json).unwrap();
        assert!(source.video.is_none());
        assert!(source.has_audio);
        assert!((source.duration.to_seconds_f64() - 187.2).abs() < 1e-6);
    }

    #[test]
    fn test_parse_missing_duration() {
        let json = r#"{ "streams": [{ "codec_type": "video", "width": 640, "height": 480 }], "format": {} }"#;
        let err = parse_probe_output(Path::new("broken.mov"), json).unwrap_err();
        assert!(matches!(err, ProbeError::MissingDuration { .. }));
    }

    #[test]
    fn test_parse_garbage() {
        let err = parse_probe_output(Path::new("x"), "not json").unwrap_err();
        assert!(matches!(err, ProbeError::MalformedOutput { .. }));
    }

    #[test]
    fn test_stream_duration_fallback() {
        let json = r#"{ "streams": [{ "codec_type": "video", "width": 640, "height": 480, "duration": "2.5" }] }"#;
        let source = parse_probe_output(Path::new("clip.avi"), json).unwrap();
        assert!((source.duration.to_seconds_f64() - 2.5).abs() < 1e-6);
    }
}
