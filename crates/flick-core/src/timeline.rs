//! Fixed-step scheduler for tweens.
//!
//! The timeline owns its tweens, advances them with one shared delta and prunes
//! the finished ones at the end of each step. Values are written back into
//! [`Property`] slots shared with whoever renders them.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::easing::Easing;
use crate::error::ConfigError;
use crate::interpolate::{Interpolator, Lerp, Linear};
use crate::tween::{Animation, LoopMode, Tween};

/// Shared, single-threaded animated value.
pub struct Property<T>(Rc<RefCell<T>>);

impl<T> Property<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    pub fn set(&self, value: T) {
        *self.0.borrow_mut() = value;
    }
}

impl<T: Clone> Property<T> {
    pub fn get(&self) -> T {
        self.0.borrow().clone()
    }
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Property").field(&*self.0.borrow()).finish()
    }
}

/// Identity of a tween registered on a [`Timeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(u64);

/// Optional tween parameters for [`Timeline::animate_to`].
pub struct TweenOptions<T> {
    pub loop_mode: LoopMode,
    pub loop_count: Option<u32>,
    pub easing: Easing,
    /// Extra offset on top of the schedule cursor.
    pub start_time: f32,
    pub interpolator: Box<dyn Interpolator<T>>,
    /// Fired once when the scheduled tween ends.
    pub on_end: Option<Box<dyn FnMut()>>,
}

impl<T: Lerp + 'static> Default for TweenOptions<T> {
    fn default() -> Self {
        Self {
            loop_mode: LoopMode::Single,
            loop_count: None,
            easing: Easing::Linear,
            start_time: 0.0,
            interpolator: Box::new(Linear),
            on_end: None,
        }
    }
}

impl<T> TweenOptions<T> {
    /// Options for a type that has no linear blend.
    pub fn with_interpolator(interpolator: impl Interpolator<T> + 'static) -> Self {
        Self {
            loop_mode: LoopMode::Single,
            loop_count: None,
            easing: Easing::Linear,
            start_time: 0.0,
            interpolator: Box::new(interpolator),
            on_end: None,
        }
    }

    #[must_use]
    pub fn loop_mode(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = loop_mode;
        self
    }

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
    pub fn start_time(mut self, start_time: f32) -> Self {
        self.start_time = start_time;
        self
    }

    #[must_use]
    pub fn interpolator(mut self, interpolator: impl Interpolator<T> + 'static) -> Self {
        self.interpolator = Box::new(interpolator);
        self
    }

    #[must_use]
    pub fn on_end(mut self, listener: impl FnMut() + 'static) -> Self {
        self.on_end = Some(Box::new(listener));
        self
    }
}

struct Entry {
    id: TweenId,
    animation: Box<dyn Animation>,
}

/// Manager and runner for tweens.
pub struct Timeline {
    entries: Vec<Entry>,
    next_id: u64,
    step: f32,
    time: f32,
    running: bool,
    ended: bool,
    /// Set when completion (not an external `stop`) halted the clock.
    stopped_by_completion: bool,
    end_listeners: Vec<Box<dyn FnMut()>>,
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("tweens", &self.entries.len())
            .field("step", &self.step)
            .field("time", &self.time)
            .field("running", &self.running)
            .field("ended", &self.ended)
            .finish_non_exhaustive()
    }
}

impl Timeline {
    /// Creates an empty, stopped timeline ticking in increments of `step`.
    pub fn new(step: f32) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            step,
            time: 0.0,
            running: false,
            ended: false,
            stopped_by_completion: false,
            end_listeners: Vec::new(),
        }
    }

    /// Creates a timeline with an initial set of animations.
    pub fn with_animations<I, A>(step: f32, animations: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Animation + 'static,
    {
        let mut timeline = Self::new(step);
        for animation in animations {
            timeline.add(animation);
        }
        timeline
    }

    pub fn start(&mut self) -> &mut Self {
        self.running = true;
        self.stopped_by_completion = false;
        self
    }

    /// Halts the clock. Members keep their state and resume on [`Timeline::start`].
    pub fn stop(&mut self) -> &mut Self {
        self.running = false;
        self.stopped_by_completion = false;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Total time advanced so far.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: TweenId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Registers a listener fired each time every member has ended.
    pub fn on_end(&mut self, listener: impl FnMut() + 'static) -> &mut Self {
        self.end_listeners.push(Box::new(listener));
        self
    }

    /// Adds an animation; it is pruned automatically once it ends.
    pub fn add(&mut self, animation: impl Animation + 'static) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            animation: Box::new(animation),
        });

        if self.ended {
            self.ended = false;
            if self.stopped_by_completion {
                self.running = true;
                self.stopped_by_completion = false;
            }
        }
        id
    }

    /// Deregisters an animation immediately, whatever its state.
    pub fn remove(&mut self, id: TweenId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Advances by one fixed step if the clock is running.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.advance(self.step);
        true
    }

    /// Advances every live member by `dt`, then prunes the ones that ended.
    pub fn advance(&mut self, dt: f32) {
        self.time += dt;

        let mut any_ended = false;
        for entry in &mut self.entries {
            if entry.animation.is_ended() {
                continue;
            }
            entry.animation.advance(dt);
            any_ended |= entry.animation.is_ended();
        }

        self.entries.retain(|e| !e.animation.is_ended());

        if any_ended && self.entries.is_empty() && !self.ended {
            self.ended = true;
            if self.running {
                self.running = false;
                self.stopped_by_completion = true;
            }
            tracing::trace!(time = self.time, "timeline ended");
            for listener in &mut self.end_listeners {
                listener();
            }
        }
    }

    /// Animates `target` from its current value to `end_value`.
    pub fn animate_to<T>(
        &mut self,
        target: &Property<T>,
        end_value: T,
        duration: f32,
        options: TweenOptions<T>,
    ) -> Result<TweenId, ConfigError>
    where
        T: Clone + PartialEq + 'static,
    {
        self.schedule().animate_to(target, end_value, duration, options)
    }

    /// Opens a schedule cursor at offset zero.
    pub fn schedule(&mut self) -> Schedule<'_> {
        self.schedule_at(0.0)
    }

    /// Opens a schedule cursor at an explicit offset.
    pub fn schedule_at(&mut self, offset: f32) -> Schedule<'_> {
        Schedule {
            timeline: self,
            cursor: offset,
        }
    }
}

/// Cursor for building sequential chains of tweens.
///
/// `delay` only moves this cursor; tweens scheduled earlier keep their start time.
pub struct Schedule<'a> {
    timeline: &'a mut Timeline,
    cursor: f32,
}

impl Schedule<'_> {
    /// Current offset applied to newly scheduled tweens.
    pub fn offset(&self) -> f32 {
        self.cursor
    }

    pub fn delay(&mut self, amount: f32) -> &mut Self {
        self.cursor += amount;
        self
    }

    /// Same as [`Timeline::animate_to`], starting at the cursor.
    pub fn animate_to<T>(
        &mut self,
        target: &Property<T>,
        end_value: T,
        duration: f32,
        options: TweenOptions<T>,
    ) -> Result<TweenId, ConfigError>
    where
        T: Clone + PartialEq + 'static,
    {
        let TweenOptions {
            loop_mode,
            loop_count,
            easing,
            start_time,
            interpolator,
            on_end,
        } = options;

        let writer = target.clone();
        let mut tween = Tween::builder_boxed(target.get(), end_value, interpolator)
            .duration(duration)
            .start_time(self.cursor + start_time)
            .loop_mode(loop_mode)
            .loop_count(loop_count)
            .easing(easing)
            .build()?
            .with_on_change(move |value: &T| writer.set(value.clone()));
        if let Some(listener) = on_end {
            tween.on_end(listener);
        }

        Ok(self.timeline.add(tween))
    }
}
