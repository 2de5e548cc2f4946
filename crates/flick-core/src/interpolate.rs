//! Interpolators: map `(start, end, t)` to a value.
//!
//! A tween never inspects its values; it hands normalized (already eased) time to
//! an [`Interpolator`]. Any closure `Fn(&T, &T, f32) -> T` is an interpolator, and
//! two common ones are provided:
//! - [`Linear`] for every type implementing [`Lerp`]
//! - [`Steps`] for quantized numeric values such as sprite-sheet offsets

use crate::color::Color;

/// Computes a value between `start` and `end` for normalized time `t`.
pub trait Interpolator<T> {
    fn interpolate(&self, start: &T, end: &T, t: f32) -> T;
}

impl<T, F> Interpolator<T> for F
where
    F: Fn(&T, &T, f32) -> T,
{
    fn interpolate(&self, start: &T, end: &T, t: f32) -> T {
        self(start, end, t)
    }
}

/// Values with a natural linear blend.
pub trait Lerp: Sized {
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + t * (other - self)
    }
}

impl Lerp for [f32; 2] {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        [self[0].lerp(&other[0], t), self[1].lerp(&other[1], t)]
    }
}

impl Lerp for Color {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let channel = |a: u8, b: u8| f32::from(a).lerp(&f32::from(b), t).round().clamp(0.0, 255.0) as u8;
        Color::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
            channel(self.a, other.a),
        )
    }
}

/// Plain linear interpolation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

impl<T: Lerp> Interpolator<T> for Linear {
    fn interpolate(&self, start: &T, end: &T, t: f32) -> T {
        start.lerp(end, t)
    }
}

/// Quantizes the blend into `count` equal steps.
///
/// With `count = 4` the output only takes the values at t = 0, 0.25, 0.5 and 0.75
/// until `t` reaches 1.
#[derive(Debug, Clone, Copy)]
pub struct Steps {
    count: u32,
}

impl Steps {
    /// `count` is clamped to at least one step.
    pub fn new(count: u32) -> Self {
        Self {
            count: count.max(1),
        }
    }
}

impl Interpolator<f32> for Steps {
    fn interpolate(&self, start: &f32, end: &f32, t: f32) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let n = self.count as f32;
        let quantized = (t * n).floor() / n;
        start.lerp(end, quantized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_numbers() {
        assert_eq!(Linear.interpolate(&10.0_f32, &20.0, 0.25), 12.5);
        assert_eq!(Linear.interpolate(&[0.0_f32, 10.0], &[10.0, 0.0], 0.5), [5.0, 5.0]);
    }

    #[test]
    fn test_color_blend() {
        let black = Color::rgb(0, 0, 0);
        let mid = Linear.interpolate(&black, &Color::WHITE, 0.5);
        assert_eq!(mid, Color::rgb(128, 128, 128));
    }

    #[test]
    fn test_steps_quantize() {
        let steps = Steps::new(32);
        // 256 / 32 = 8 px per frame
        assert_eq!(steps.interpolate(&0.0, &256.0, 0.0), 0.0);
        assert_eq!(steps.interpolate(&0.0, &256.0, 0.03), 0.0);
        assert_eq!(steps.interpolate(&0.0, &256.0, 0.04), 8.0);
        assert_eq!(steps.interpolate(&0.0, &256.0, 0.99), 248.0);
        assert_eq!(steps.interpolate(&0.0, &256.0, 1.0), 256.0);
    }

    #[test]
    fn test_closure_interpolator() {
        let pick_end = |_: &u8, e: &u8, _t: f32| *e;
        assert_eq!(pick_end.interpolate(&1, &7, 0.1), 7);
    }
}
