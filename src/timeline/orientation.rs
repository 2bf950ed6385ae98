//! Orientation classification and correction.
//!
//! Containers record camera rotation as a display transform on the video
//! track rather than rotating the stored pixels. Rendering a track upright
//! into a fixed-size target therefore needs two things: classifying the
//! declared transform into one of the four canonical rotations, and deriving
//! the corrected transform (rotation + scale + translation) that maps the
//! stored pixels onto the render target.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::media::types::VideoStream;
use crate::timeline::transform::{AffineTransform, Dimensions};

/// Canonical display rotation of a video track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// No rotation (0°)
    Up,
    /// Upside down (180°)
    Down,
    /// Rotated a quarter turn counter-clockwise (-90°)
    Left,
    /// Rotated a quarter turn clockwise (+90°)
    Right,
}

impl Orientation {
    /// Rotation in degrees, clockwise positive.
    pub fn rotation_degrees(self) -> i32 {
        match self {
            Self::Up => 0,
            Self::Down => 180,
            Self::Left => -90,
            Self::Right => 90,
        }
    }

    /// Map a container rotation tag (degrees, any sign) onto an orientation.
    /// Returns `None` for rotations that are not a multiple of 90°.
    pub fn from_rotation_degrees(degrees: i64) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Self::Up),
            90 => Some(Self::Right),
            180 => Some(Self::Down),
            270 => Some(Self::Left),
            _ => None,
        }
    }

    /// The canonical preferred transform declaring this rotation.
    pub fn preferred_transform(self) -> AffineTransform {
        match self {
            Self::Up => AffineTransform::from_coefficients(1.0, 0.0, 0.0, 1.0),
            Self::Down => AffineTransform::from_coefficients(-1.0, 0.0, 0.0, -1.0),
            Self::Left => AffineTransform::from_coefficients(0.0, -1.0, 1.0, 0.0),
            Self::Right => AffineTransform::from_coefficients(0.0, 1.0, -1.0, 0.0),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Result of classifying a track's preferred transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrientationResult {
    pub orientation: Orientation,
    pub is_portrait: bool,
}

/// Classify a preferred transform into rotation and portrait-ness.
///
/// Only the four canonical coefficient tuples are recognized. Anything else
/// (shear, non-unit scale baked into the display matrix) is treated as
/// unrotated landscape; that case is logged rather than silently absorbed.
pub fn classify(transform: &AffineTransform) -> OrientationResult {
    let (orientation, is_portrait) = match transform.coefficients() {
        (a, b, c, d) if a == 0.0 && b == 1.0 && c == -1.0 && d == 0.0 => (Orientation::Right, true),
        (a, b, c, d) if a == 0.0 && b == -1.0 && c == 1.0 && d == 0.0 => (Orientation::Left, true),
        (a, b, c, d) if a == 1.0 && b == 0.0 && c == 0.0 && d == 1.0 => (Orientation::Up, false),
        (a, b, c, d) if a == -1.0 && b == 0.0 && c == 0.0 && d == -1.0 => {
            (Orientation::Down, false)
        }
        (a, b, c, d) => {
            warn!(
                "unrecognized display transform ({}, {}, {}, {}), treating as unrotated",
                a, b, c, d
            );
            (Orientation::Up, false)
        }
    };

    OrientationResult {
        orientation,
        is_portrait,
    }
}

/// Derive the transform that renders `video` upright, scaled to fit the
/// render target's width.
///
/// Portrait sources scale by `target width / natural height` (the natural
/// height is the on-screen width once the quarter turn is applied). Landscape
/// sources scale by `target width / natural width` and are vertically
/// centered; upside-down sources additionally need a half-turn and a
/// recentering translation that uses the un-rotated natural size and the
/// render target's height.
pub fn corrected_transform(video: &VideoStream, render: Dimensions) -> AffineTransform {
    let result = classify(&video.preferred_transform);
    let natural = video.natural_size;

    if result.is_portrait {
        let ratio = render.width / natural.height;
        return video
            .preferred_transform
            .then(AffineTransform::scale(ratio));
    }

    let ratio = render.width / natural.width;
    let scale = AffineTransform::scale(ratio);

    if result.orientation == Orientation::Down {
        let recenter =
            AffineTransform::translation(natural.width, natural.height + render.height);
        return AffineTransform::rotation(std::f64::consts::PI)
            .then(recenter)
            .then(scale);
    }

    video
        .preferred_transform
        .then(scale)
        .then(AffineTransform::translation(0.0, render.width / 2.0))
}
