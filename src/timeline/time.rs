//! Time representation for the composition timeline.
//!
//! Durations and offsets are rational numbers so that sequential placement
//! arithmetic stays exact. Summing float durations drifts after enough
//! additions, and placement boundaries must line up to the sample.

use num_rational::Rational64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A rational time value in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MediaTime {
    value: Rational64,
}

impl MediaTime {
    /// Create a time of `numerator / denominator` seconds.
    #[inline]
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            value: Rational64::new(numerator, denominator),
        }
    }

    /// Create a time from whole seconds.
    #[inline]
    pub fn from_secs(seconds: i64) -> Self {
        Self::new(seconds, 1)
    }

    /// Create a time from seconds as a float.
    /// Note: may introduce small precision errors.
    pub fn from_seconds_f64(seconds: f64) -> Self {
        const PRECISION: i64 = 1_000_000;
        Self {
            value: Rational64::new((seconds * PRECISION as f64).round() as i64, PRECISION),
        }
    }

    /// Convert to seconds as f64.
    #[inline]
    pub fn to_seconds_f64(self) -> f64 {
        *self.value.numer() as f64 / *self.value.denom() as f64
    }

    /// Zero time constant.
    pub const ZERO: Self = Self {
        value: Rational64::new_raw(0, 1),
    };

    /// Check if this time is zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        *self.value.numer() == 0
    }

    /// Check if this time is strictly positive.
    #[inline]
    pub fn is_positive(self) -> bool {
        *self.value.numer() > 0
    }
}

impl Default for MediaTime {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for MediaTime {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            value: self.value + rhs.value,
        }
    }
}

impl Sub for MediaTime {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            value: self.value - rhs.value,
        }
    }
}

impl fmt::Display for MediaTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.to_seconds_f64())
    }
}

/// Frame rate as a rational number (e.g. 30000/1001 for 29.97 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    /// Numerator (e.g. 30)
    pub numerator: u32,
    /// Denominator (e.g. 1)
    pub denominator: u32,
}

impl FrameRate {
    /// Create a new frame rate.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Convert to frames per second as f64.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Duration of a single frame.
    #[inline]
    pub fn frame_duration(self) -> MediaTime {
        MediaTime::new(self.denominator as i64, self.numerator as i64)
    }

    /// The fixed composition frame rate.
    pub const FPS_30: Self = Self::new(30, 1);
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.to_fps_f64();
        if (fps - fps.round()).abs() < 0.001 {
            write!(f, "{} fps", fps.round() as u32)
        } else {
            write!(f, "{:.3} fps", fps)
        }
    }
}

/// A half-open time interval `[start, start + duration)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start time (inclusive)
    pub start: MediaTime,
    /// Duration of the range
    pub duration: MediaTime,
}

impl TimeRange {
    /// Create a new time range from start and duration.
    #[inline]
    pub fn new(start: MediaTime, duration: MediaTime) -> Self {
        Self { start, duration }
    }

    /// Create a time range from start and end times.
    #[inline]
    pub fn from_start_end(start: MediaTime, end: MediaTime) -> Self {
        Self {
            start,
            duration: end - start,
        }
    }

    /// End time (exclusive).
    #[inline]
    pub fn end(self) -> MediaTime {
        self.start + self.duration
    }

    /// Check if a time is within this range.
    #[inline]
    pub fn contains(self, time: MediaTime) -> bool {
        time >= self.start && time < self.end()
    }

    /// Check if two ranges overlap.
    pub fn overlaps(self, other: Self) -> bool {
        self.start < other.end() && other.start < self.end()
    }

    /// Empty range starting at zero.
    pub const EMPTY: Self = Self {
        start: MediaTime::ZERO,
        duration: MediaTime::ZERO,
    };
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_arithmetic() {
        let a = MediaTime::new(1, 2); // 0.5 seconds
        let b = MediaTime::new(1, 4); // 0.25 seconds
        assert_eq!((a + b).to_seconds_f64(), 0.75);
        assert_eq!((a - b).to_seconds_f64(), 0.25);
    }

    #[test]
    fn test_sum_is_exact() {
        // 1/30 added thirty times is exactly one second
        let frame = FrameRate::FPS_30.frame_duration();
        let mut total = MediaTime::ZERO;
        for _ in 0..30 {
            total = total + frame;
        }
        assert_eq!(total, MediaTime::from_secs(1));
    }

    #[test]
    fn test_frame_rate() {
        let rate = FrameRate::FPS_30;
        assert_eq!(rate.to_fps_f64(), 30.0);
        assert_eq!(rate.frame_duration(), MediaTime::new(1, 30));
        assert_eq!(rate.to_string(), "30 fps");
    }

    #[test]
    fn test_range_is_half_open() {
        let range = TimeRange::new(MediaTime::ZERO, MediaTime::from_secs(5));
        assert!(range.contains(MediaTime::ZERO));
        assert!(range.contains(MediaTime::new(49, 10)));
        assert!(!range.contains(MediaTime::from_secs(5)));
    }

    #[test]
    fn test_range_overlap() {
        let a = TimeRange::new(MediaTime::ZERO, MediaTime::from_secs(5));
        let b = TimeRange::new(MediaTime::from_secs(5), MediaTime::from_secs(3));
        // Sequential placements share a boundary but never overlap
        assert!(!a.overlaps(b));

        let c = TimeRange::new(MediaTime::new(9, 2), MediaTime::from_secs(1));
        assert!(a.overlaps(c));
    }

    #[test]
    fn test_from_start_end() {
        let range = TimeRange::from_start_end(MediaTime::from_secs(5), MediaTime::from_secs(8));
        assert_eq!(range.duration, MediaTime::from_secs(3));
        assert_eq!(range.end(), MediaTime::from_secs(8));
    }
}
