//! Visual effects driven by the level timeline.
//!
//! Effects own [`Property`] slots animated by tweens registered on the level's
//! [`Timeline`]; the level draws them after each physics step.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::assets::AssetSource;
use crate::color::Color;
use crate::error::{AssetError, ConfigError};
use crate::interpolate::Steps;
use crate::render::{DrawSurface, Rect};
use crate::timeline::{Property, Timeline, TweenId, TweenOptions};
use crate::tween::LoopMode;

/// Image name of the spinning coin sprite strip.
pub const COIN_SPRITE: &str = "coin";

const RING_DURATION: f32 = 0.8;
const RING_LINE_WIDTH: f32 = 5.0;

const COIN_FRAMES: u32 = 32;
const COIN_FRAME_WIDTH: f32 = 8.0;
const COIN_FRAME_HEIGHT: f32 = 16.0;
const COIN_STRIP_WIDTH: f32 = 256.0;
const SPIN_DURATION: f32 = 0.2;
const RISE_HEIGHT: f32 = 30.0;
const RISE_DELAY: f32 = 0.5;
const RISE_DURATION: f32 = 1.0;

const SPARK_HALF_SIZE: f32 = 3.0;
const SPARK_SPEED: f32 = 7.0;
const SPARK_GRAVITY: f32 = 0.15;
const SPARK_DRAG: f32 = 0.97;

/// Common surface of every effect the level keeps alive.
pub trait Effect {
    /// Deregisters the effect's tweens immediately.
    fn stop(&mut self, timeline: &mut Timeline);

    fn is_finished(&self) -> bool;

    /// Per-tick update for effects not driven by tweens.
    fn tick(&mut self) {}

    fn draw(&self, surface: &mut dyn DrawSurface, assets: &dyn AssetSource) -> Result<(), AssetError>;
}

/// Countdown shared by the stages of a multi-tween effect.
///
/// Each stage calls [`Completion::arrive`] once; listeners fire when the last
/// stage arrives.
#[derive(Clone)]
pub struct Completion(Rc<CompletionState>);

struct CompletionState {
    remaining: Cell<usize>,
    listeners: RefCell<Vec<Box<dyn FnMut()>>>,
}

impl Completion {
    pub fn new(stages: usize) -> Self {
        Self(Rc::new(CompletionState {
            remaining: Cell::new(stages),
            listeners: RefCell::new(Vec::new()),
        }))
    }

    pub fn arrive(&self) {
        let remaining = self.0.remaining.get();
        if remaining == 0 {
            return;
        }
        self.0.remaining.set(remaining - 1);
        if remaining == 1 {
            let mut listeners = std::mem::take(&mut *self.0.listeners.borrow_mut());
            for listener in &mut listeners {
                listener();
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.0.remaining.get() == 0
    }

    /// Registers a one-shot listener. Fires immediately if already finished.
    pub fn on_finished(&self, mut listener: impl FnMut() + 'static) {
        if self.is_finished() {
            listener();
        } else {
            self.0.listeners.borrow_mut().push(Box::new(listener));
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("remaining", &self.0.remaining.get())
            .finish_non_exhaustive()
    }
}

/// Which way a ring pulses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingDirection {
    Outwards,
    Inwards,
}

/// Endless pulsing circle, fading as it grows.
#[derive(Debug)]
pub struct RingEffect {
    center: [f32; 2],
    radius: f32,
    color: Color,
    current: Property<f32>,
    tween: TweenId,
    stopped: bool,
}

impl RingEffect {
    pub fn spawn(
        timeline: &mut Timeline,
        center: [f32; 2],
        radius: f32,
        color: Color,
        direction: RingDirection,
    ) -> Result<Self, ConfigError> {
        let (from, to) = match direction {
            RingDirection::Outwards => (0.0, radius),
            RingDirection::Inwards => (radius, 0.0),
        };
        let current = Property::new(from);
        let tween = timeline.animate_to(
            &current,
            to,
            RING_DURATION,
            TweenOptions::default().loop_mode(LoopMode::Loop),
        )?;

        Ok(Self {
            center,
            radius,
            color,
            current,
            tween,
            stopped: false,
        })
    }

    pub fn current_radius(&self) -> f32 {
        self.current.get()
    }

    pub fn alpha(&self) -> f32 {
        1.0 - self.current_radius() / self.radius
    }
}

impl Effect for RingEffect {
    fn stop(&mut self, timeline: &mut Timeline) {
        timeline.remove(self.tween);
        self.stopped = true;
    }

    fn is_finished(&self) -> bool {
        self.stopped
    }

    fn draw(&self, surface: &mut dyn DrawSurface, _assets: &dyn AssetSource) -> Result<(), AssetError> {
        let radius = self.current_radius();
        if self.stopped || radius <= 0.0 {
            return Ok(());
        }
        surface.set_alpha(self.alpha());
        surface.stroke_circle(self.center, radius, RING_LINE_WIDTH, self.color);
        Ok(())
    }
}

/// A collected coin spinning in place, then rising while it fades out.
#[derive(Debug)]
pub struct FadingCoinEffect {
    position: [f32; 2],
    frame: Property<f32>,
    rise: Property<f32>,
    spin_tween: TweenId,
    rise_tween: TweenId,
    completion: Completion,
    stopped: bool,
}

impl FadingCoinEffect {
    pub fn spawn(timeline: &mut Timeline, position: [f32; 2]) -> Result<Self, ConfigError> {
        let frame = Property::new(0.0_f32);
        let rise = Property::new(0.0_f32);
        let completion = Completion::new(2);

        // Keep spinning until the rise is over
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let spin_loops = ((RISE_DELAY + RISE_DURATION) / SPIN_DURATION).ceil() as u32;

        let mut schedule = timeline.schedule();
        let spin_done = completion.clone();
        let spin_tween = schedule.animate_to(
            &frame,
            COIN_STRIP_WIDTH,
            SPIN_DURATION,
            TweenOptions::default()
                .loop_mode(LoopMode::Loop)
                .loop_count(Some(spin_loops))
                .interpolator(Steps::new(COIN_FRAMES))
                .on_end(move || spin_done.arrive()),
        )?;

        let rise_done = completion.clone();
        let rise_tween = schedule.delay(RISE_DELAY).animate_to(
            &rise,
            RISE_HEIGHT,
            RISE_DURATION,
            TweenOptions::default().on_end(move || rise_done.arrive()),
        )?;

        Ok(Self {
            position,
            frame,
            rise,
            spin_tween,
            rise_tween,
            completion,
            stopped: false,
        })
    }

    pub fn completion(&self) -> &Completion {
        &self.completion
    }

    /// Horizontal offset of the current sprite frame.
    pub fn frame_offset(&self) -> f32 {
        self.frame.get()
    }

    pub fn rise(&self) -> f32 {
        self.rise.get()
    }

    pub fn alpha(&self) -> f32 {
        1.0 - self.rise() / RISE_HEIGHT
    }
}

impl Effect for FadingCoinEffect {
    fn stop(&mut self, timeline: &mut Timeline) {
        timeline.remove(self.spin_tween);
        timeline.remove(self.rise_tween);
        self.stopped = true;
    }

    fn is_finished(&self) -> bool {
        self.stopped || self.completion.is_finished()
    }

    fn draw(&self, surface: &mut dyn DrawSurface, assets: &dyn AssetSource) -> Result<(), AssetError> {
        if self.is_finished() {
            return Ok(());
        }
        let sprite = assets.image(COIN_SPRITE)?;
        let rise = self.rise();
        // The last step lands one frame past the strip
        let sx = self.frame_offset() % COIN_STRIP_WIDTH;

        surface.set_alpha(self.alpha());
        surface.draw_image(
            &sprite,
            Rect::new(sx, 0.0, COIN_FRAME_WIDTH, COIN_FRAME_HEIGHT),
            Rect::centered(
                [self.position[0], self.position[1] - rise],
                COIN_FRAME_WIDTH,
                COIN_FRAME_HEIGHT,
            ),
        );
        Ok(())
    }
}

/// One confetti square.
#[derive(Debug, Clone, PartialEq)]
pub struct Spark {
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub color: Color,
    pub ttl: u32,
}

/// Burst of confetti thrown out of a collected coin.
///
/// Purely presentational: sparks never enter the physics world.
#[derive(Debug)]
pub struct SparkBurst {
    sparks: Vec<Spark>,
    ttl: u32,
}

impl SparkBurst {
    pub fn spawn(origin: [f32; 2], count: usize, ttl: u32, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let sparks = (0..count)
            .map(|_| {
                let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                let vx = SPARK_SPEED * rng.random::<f32>() * sign;
                let vy = -SPARK_SPEED * rng.random::<f32>();
                Spark {
                    position: origin,
                    velocity: [vx, vy],
                    color: Color::rgb(
                        rng.random_range(1..=255),
                        rng.random_range(1..=255),
                        rng.random_range(1..=255),
                    ),
                    ttl,
                }
            })
            .collect();

        Self { sparks, ttl }
    }

    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    pub fn live_count(&self) -> usize {
        self.sparks.iter().filter(|s| s.ttl > 0).count()
    }
}

impl Effect for SparkBurst {
    fn stop(&mut self, _timeline: &mut Timeline) {
        self.sparks.clear();
    }

    fn is_finished(&self) -> bool {
        self.sparks.iter().all(|s| s.ttl == 0)
    }

    fn tick(&mut self) {
        for spark in self.sparks.iter_mut().filter(|s| s.ttl > 0) {
            spark.position[0] += spark.velocity[0];
            spark.position[1] += spark.velocity[1];
            spark.velocity[0] *= SPARK_DRAG;
            spark.velocity[1] = spark.velocity[1] * SPARK_DRAG + SPARK_GRAVITY;
            spark.ttl -= 1;
        }
    }

    fn draw(&self, surface: &mut dyn DrawSurface, _assets: &dyn AssetSource) -> Result<(), AssetError> {
        for spark in self.sparks.iter().filter(|s| s.ttl > 0) {
            #[allow(clippy::cast_precision_loss)]
            surface.set_alpha(spark.ttl as f32 / self.ttl as f32);
            surface.fill_rect(
                Rect::centered(spark.position, SPARK_HALF_SIZE * 2.0, SPARK_HALF_SIZE * 2.0),
                spark.color,
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetRegistry;
    use crate::render::RecordingSurface;

    const STEP: f32 = 1.0 / 60.0;

    fn run(timeline: &mut Timeline, seconds: f32) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let ticks = (seconds / STEP).round() as u32;
        for _ in 0..ticks {
            timeline.tick();
        }
    }

    #[test]
    fn test_completion_fires_once_after_all_stages() {
        let completion = Completion::new(2);
        let fired = Rc::new(Cell::new(0));
        let f = Rc::clone(&fired);
        completion.on_finished(move || f.set(f.get() + 1));

        completion.arrive();
        assert!(!completion.is_finished());
        assert_eq!(fired.get(), 0);
        completion.arrive();
        completion.arrive();
        assert!(completion.is_finished());
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_ring_alpha_follows_radius() {
        let mut timeline = Timeline::new(0.2);
        timeline.start();
        let ring = RingEffect::spawn(
            &mut timeline,
            [10.0, 10.0],
            20.0,
            Color::GOLD,
            RingDirection::Outwards,
        )
        .unwrap();
        timeline.tick();
        assert_eq!(ring.current_radius(), 5.0);
        assert_eq!(ring.alpha(), 0.75);

        // Looping forever
        for _ in 0..100 {
            timeline.tick();
        }
        assert!(!timeline.is_ended());
        assert!(!ring.is_finished());
    }

    #[test]
    fn test_inwards_ring_shrinks() {
        let mut timeline = Timeline::new(0.2);
        let ring = RingEffect::spawn(
            &mut timeline,
            [0.0, 0.0],
            15.0,
            Color::TEAL,
            RingDirection::Inwards,
        )
        .unwrap();
        assert_eq!(ring.current_radius(), 15.0);
        timeline.advance(0.4);
        assert_eq!(ring.current_radius(), 7.5);
    }

    #[test]
    fn test_ring_stop_removes_tween() {
        let mut timeline = Timeline::new(0.2);
        let mut ring = RingEffect::spawn(
            &mut timeline,
            [0.0, 0.0],
            15.0,
            Color::GOLD,
            RingDirection::Outwards,
        )
        .unwrap();
        assert_eq!(timeline.len(), 1);
        ring.stop(&mut timeline);
        assert!(timeline.is_empty());
        assert!(ring.is_finished());

        let mut surface = RecordingSurface::new();
        ring.draw(&mut surface, &AssetRegistry::new()).unwrap();
        assert!(surface.commands.is_empty());
    }

    #[test]
    fn test_fading_coin_finishes_after_both_stages() {
        let mut timeline = Timeline::new(STEP);
        timeline.start();
        let coin = FadingCoinEffect::spawn(&mut timeline, [100.0, 100.0]).unwrap();
        let finished = Rc::new(Cell::new(0));
        let f = Rc::clone(&finished);
        coin.completion().on_finished(move || f.set(f.get() + 1));

        run(&mut timeline, 0.3);
        assert_eq!(coin.rise(), 0.0);
        assert!(coin.frame_offset() > 0.0);

        run(&mut timeline, 0.7);
        assert!(coin.rise() > 0.0 && coin.rise() < RISE_HEIGHT);
        assert!(!coin.is_finished());

        run(&mut timeline, 1.0);
        assert_eq!(coin.rise(), RISE_HEIGHT);
        assert_eq!(coin.alpha(), 0.0);
        assert!(coin.is_finished());
        assert_eq!(finished.get(), 1);
        assert!(timeline.is_ended());
    }

    #[test]
    fn test_fading_coin_stop_never_signals_finished() {
        let mut timeline = Timeline::new(STEP);
        let mut coin = FadingCoinEffect::spawn(&mut timeline, [0.0, 0.0]).unwrap();
        coin.stop(&mut timeline);
        assert!(timeline.is_empty());
        assert!(!coin.completion().is_finished());
        assert!(coin.is_finished());
    }

    #[test]
    fn test_fading_coin_needs_sprite() {
        let mut timeline = Timeline::new(STEP);
        let coin = FadingCoinEffect::spawn(&mut timeline, [0.0, 0.0]).unwrap();
        let mut surface = RecordingSurface::new();
        assert_eq!(
            coin.draw(&mut surface, &AssetRegistry::new()),
            Err(AssetError::MissingImage(COIN_SPRITE.to_string()))
        );
        coin.draw(&mut surface, &AssetRegistry::with_defaults()).unwrap();
        assert_eq!(surface.images().collect::<Vec<_>>(), [COIN_SPRITE]);
    }

    #[test]
    fn test_spark_burst_is_seeded_and_expires() {
        let a = SparkBurst::spawn([50.0, 50.0], 30, 100, 7);
        let b = SparkBurst::spawn([50.0, 50.0], 30, 100, 7);
        assert_eq!(a.sparks(), b.sparks());
        assert_eq!(a.live_count(), 30);

        let mut burst = a;
        for _ in 0..99 {
            burst.tick();
        }
        assert!(!burst.is_finished());
        burst.tick();
        assert!(burst.is_finished());
        assert_eq!(burst.live_count(), 0);
    }
}
