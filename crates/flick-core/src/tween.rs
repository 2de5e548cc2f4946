//! Timed interpolation of a single value.
//!
//! A [`Tween`] only knows how much time has passed since it was created. Time is
//! split into segments of `duration` length; the [`LoopMode`] decides which
//! segments run forward, which run backward, and when the tween terminates:
//!
//! ```text
//! t=0
//! |   0              1              0              1
//! |---|--------------|--------------|--------------|---
//! |   |  segment 0   |  segment 1   |  segment 2   |
//! ```
//!
//! A `Single` tween has one forward segment, `Reverse` has a forward and a backward
//! one, `Loop` repeats the forward segment and `LoopReverse` alternates.

use std::fmt;
use std::str::FromStr;

use crate::easing::Easing;
use crate::error::ConfigError;
use crate::interpolate::{Interpolator, Lerp, Linear};

/// Repetition policy of a tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Play forward once, then hold the end value.
    #[default]
    Single,
    /// Play forward then backward once, then hold the start value.
    Reverse,
    /// Play forward `loop_count` times, then hold the end value.
    Loop,
    /// Alternate forward/backward `loop_count` times, then hold the start value.
    LoopReverse,
}

impl FromStr for LoopMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "reverse" => Ok(Self::Reverse),
            "loop" => Ok(Self::Loop),
            "loopReverse" => Ok(Self::LoopReverse),
            other => Err(ConfigError::InvalidLoopMode(other.to_string())),
        }
    }
}

/// Anything the [`Timeline`](crate::timeline::Timeline) can drive.
pub trait Animation {
    /// Feeds elapsed time.
    fn advance(&mut self, dt: f32);

    /// True once the animation will never change again.
    fn is_ended(&self) -> bool;
}

type ChangeListener<T> = Box<dyn FnMut(&T)>;
type EndListener = Box<dyn FnMut()>;

/// A value evolving over time.
pub struct Tween<T> {
    start_value: T,
    end_value: T,
    duration: f32,
    start_time: f32,
    loop_mode: LoopMode,
    /// `None` loops forever.
    loop_count: Option<u32>,
    easing: Easing,
    interpolator: Box<dyn Interpolator<T>>,
    absolute_elapsed: f32,
    last_emitted: Option<T>,
    ended: bool,
    change_listeners: Vec<ChangeListener<T>>,
    end_listeners: Vec<EndListener>,
}

impl<T: fmt::Debug> fmt::Debug for Tween<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("start_value", &self.start_value)
            .field("end_value", &self.end_value)
            .field("duration", &self.duration)
            .field("start_time", &self.start_time)
            .field("loop_mode", &self.loop_mode)
            .field("loop_count", &self.loop_count)
            .field("easing", &self.easing)
            .field("absolute_elapsed", &self.absolute_elapsed)
            .field("ended", &self.ended)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + PartialEq + Lerp + 'static> Tween<T> {
    /// Starts building a linearly interpolated tween.
    pub fn builder(start_value: T, end_value: T) -> TweenBuilder<T> {
        TweenBuilder::new(start_value, end_value, Box::new(Linear))
    }
}

impl<T: Clone + PartialEq + 'static> Tween<T> {
    /// Starts building a tween for a type without a [`Lerp`] impl.
    pub fn builder_with(
        start_value: T,
        end_value: T,
        interpolator: impl Interpolator<T> + 'static,
    ) -> TweenBuilder<T> {
        TweenBuilder::new(start_value, end_value, Box::new(interpolator))
    }

    pub(crate) fn builder_boxed(
        start_value: T,
        end_value: T,
        interpolator: Box<dyn Interpolator<T>>,
    ) -> TweenBuilder<T> {
        TweenBuilder::new(start_value, end_value, interpolator)
    }

    /// Registers a listener fired every time the value changes.
    pub fn on_change(&mut self, listener: impl FnMut(&T) + 'static) -> &mut Self {
        self.change_listeners.push(Box::new(listener));
        self
    }

    /// Registers a listener fired once, when the tween terminates.
    pub fn on_end(&mut self, listener: impl FnMut() + 'static) -> &mut Self {
        self.end_listeners.push(Box::new(listener));
        self
    }

    /// Builder-style [`Tween::on_change`].
    #[must_use]
    pub fn with_on_change(mut self, listener: impl FnMut(&T) + 'static) -> Self {
        self.on_change(listener);
        self
    }

    /// The last emitted value, or the start value before the first advance.
    pub fn value(&self) -> &T {
        self.last_emitted.as_ref().unwrap_or(&self.start_value)
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn start_time(&self) -> f32 {
        self.start_time
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    /// Total time fed through [`Tween::advance`] until it ended.
    pub fn elapsed(&self) -> f32 {
        self.absolute_elapsed
    }

    /// Samples the value at an absolute elapsed time without touching any state.
    /// Returns the value and whether it is terminal.
    pub fn value_at(&self, elapsed: f32) -> (T, bool) {
        let t = elapsed - self.start_time;
        if t < 0.0 {
            return (self.start_value.clone(), false);
        }

        let segment = (t / self.duration).floor();
        let phase = (t % self.duration) / self.duration;

        match self.loop_mode {
            LoopMode::Single => {
                if segment >= 1.0 {
                    (self.end_value.clone(), true)
                } else {
                    (self.forward(phase), false)
                }
            }
            LoopMode::Reverse => {
                if segment >= 2.0 {
                    (self.start_value.clone(), true)
                } else if segment < 1.0 {
                    (self.forward(phase), false)
                } else {
                    (self.backward(phase), false)
                }
            }
            LoopMode::Loop => match self.loop_count {
                #[allow(clippy::cast_precision_loss)]
                Some(count) if segment >= count as f32 => (self.end_value.clone(), true),
                _ => (self.forward(phase), false),
            },
            LoopMode::LoopReverse => match self.loop_count {
                #[allow(clippy::cast_precision_loss)]
                Some(count) if segment >= 2.0 * count as f32 => (self.start_value.clone(), true),
                _ => {
                    if segment % 2.0 < 1.0 {
                        (self.forward(phase), false)
                    } else {
                        (self.backward(phase), false)
                    }
                }
            },
        }
    }

    /// Notifies the tween that time has passed, emitting `change`/`end` as needed.
    pub fn advance(&mut self, dt: f32) {
        if self.ended {
            return;
        }

        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.absolute_elapsed += dt;

        let (value, terminal) = self.value_at(self.absolute_elapsed);

        if self.last_emitted.as_ref() != Some(&value) {
            for listener in &mut self.change_listeners {
                listener(&value);
            }
            self.last_emitted = Some(value);
        }

        if terminal {
            self.ended = true;
            for listener in &mut self.end_listeners {
                listener();
            }
        }
    }

    fn forward(&self, phase: f32) -> T {
        self.interpolator
            .interpolate(&self.start_value, &self.end_value, self.easing.apply(phase))
    }

    fn backward(&self, phase: f32) -> T {
        self.interpolator
            .interpolate(&self.start_value, &self.end_value, self.easing.apply(1.0 - phase))
    }
}

impl<T: Clone + PartialEq + 'static> Animation for Tween<T> {
    fn advance(&mut self, dt: f32) {
        Tween::advance(self, dt);
    }

    fn is_ended(&self) -> bool {
        self.ended
    }
}

/// Chainable construction of a [`Tween`], validated in [`TweenBuilder::build`].
pub struct TweenBuilder<T> {
    start_value: T,
    end_value: T,
    duration: f32,
    start_time: f32,
    loop_mode: LoopMode,
    loop_count: Option<u32>,
    easing: Easing,
    interpolator: Box<dyn Interpolator<T>>,
}

impl<T: Clone + PartialEq + 'static> TweenBuilder<T> {
    fn new(start_value: T, end_value: T, interpolator: Box<dyn Interpolator<T>>) -> Self {
        Self {
            start_value,
            end_value,
            duration: 1.0,
            start_time: 0.0,
            loop_mode: LoopMode::Single,
            loop_count: None,
            easing: Easing::Linear,
            interpolator,
        }
    }

    #[must_use]
    pub fn duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn start_time(mut self, start_time: f32) -> Self {
        self.start_time = start_time;
        self
    }

    #[must_use]
    pub fn loop_mode(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = loop_mode;
        self
    }

    /// Parses the loop mode from its configuration name.
    pub fn loop_mode_named(self, name: &str) -> Result<Self, ConfigError> {
        Ok(self.loop_mode(name.parse()?))
    }

    /// Repetitions for `Loop`/`LoopReverse`. `None` loops forever.
    #[must_use]
    pub fn loop_count(mut self, loop_count: Option<u32>) -> Self {
        self.loop_count = loop_count;
        self
    }

    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    #[must_use]
    pub fn interpolator(mut self, interpolator: impl Interpolator<T> + 'static) -> Self {
        self.interpolator = Box::new(interpolator);
        self
    }

    pub fn build(self) -> Result<Tween<T>, ConfigError> {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(ConfigError::NonPositiveDuration(self.duration));
        }
        if self.loop_count == Some(0) {
            return Err(ConfigError::ZeroLoopCount);
        }

        Ok(Tween {
            start_value: self.start_value,
            end_value: self.end_value,
            duration: self.duration,
            start_time: if self.start_time.is_finite() { self.start_time } else { 0.0 },
            loop_mode: self.loop_mode,
            loop_count: self.loop_count,
            easing: self.easing,
            interpolator: self.interpolator,
            absolute_elapsed: 0.0,
            last_emitted: None,
            ended: false,
            change_listeners: Vec::new(),
            end_listeners: Vec::new(),
        })
    }
}
