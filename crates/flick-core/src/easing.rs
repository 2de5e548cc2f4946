//! Easing curves mapping normalized time to normalized time.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Easing type for tweens.
#[derive(Clone, Copy, Default)]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    /// Arbitrary curve. Has no name form.
    Custom(fn(f32) -> f32),
}

impl Easing {
    /// Applies the easing function to a normalized time value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadIn => t * t,
            Self::QuadOut => t * (2.0 - t),
            Self::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Self::CubicIn => t * t * t,
            Self::CubicOut => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Self::Custom(f) => f(t),
        }
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("Linear"),
            Self::QuadIn => f.write_str("QuadIn"),
            Self::QuadOut => f.write_str("QuadOut"),
            Self::QuadInOut => f.write_str("QuadInOut"),
            Self::CubicIn => f.write_str("CubicIn"),
            Self::CubicOut => f.write_str("CubicOut"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl FromStr for Easing {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Self::Linear),
            "quadIn" => Ok(Self::QuadIn),
            "quadOut" => Ok(Self::QuadOut),
            "quadInOut" => Ok(Self::QuadInOut),
            "cubicIn" => Ok(Self::CubicIn),
            "cubicOut" => Ok(Self::CubicOut),
            other => Err(ConfigError::UnknownEasing(other.to_string())),
        }
    }
}
