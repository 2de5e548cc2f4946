//! Game state machine: phases, the fixed-step clock, input and level lifecycle.

use std::fmt;

use crate::assets::{AssetRegistry, AssetSource};
use crate::clock::FixedClock;
use crate::config::GameConfig;
use crate::error::{AssetError, GameError};
use crate::level::{Level, LevelEvent, Outcome};
use crate::level_data::LevelDescription;
use crate::physics::Collision;
use crate::render::DrawSurface;

/// Game phase representing the current state of the game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GamePhase {
    /// Level built, waiting for the player to start.
    #[default]
    BeforeStart,
    Playing,
    Paused,
    Won,
    Lost,
}

impl GamePhase {
    /// Whether `self -> next` is a legal transition.
    ///
    /// Going back to `BeforeStart` is handled by replay and level changes, not here.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::BeforeStart | Self::Paused, Self::Playing)
                | (Self::Playing, Self::Paused | Self::Won | Self::Lost)
        )
    }

    pub fn is_over(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One playthrough of a level at a time.
pub struct Game<A = AssetRegistry> {
    config: GameConfig,
    description: LevelDescription,
    level: Level,
    phase: GamePhase,
    shots: u32,
    clock: FixedClock,
    generation: u32,
    assets: A,
}

impl<A> fmt::Debug for Game<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("phase", &self.phase)
            .field("shots", &self.shots)
            .field("generation", &self.generation)
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

impl<A: AssetSource> Game<A> {
    /// Builds the first level. The game starts in `BeforeStart`.
    pub fn new(
        description: LevelDescription,
        config: GameConfig,
        assets: A,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let generation = 1;
        let level = Level::build(&description, &config, generation)?;
        let clock = FixedClock::new(config.fixed_step, config.max_substeps);

        Ok(Self {
            config,
            description,
            level,
            phase: GamePhase::BeforeStart,
            shots: 0,
            clock,
            generation,
            assets,
        })
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn shots(&self) -> u32 {
        self.shots
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn description(&self) -> &LevelDescription {
        &self.description
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn assets(&self) -> &A {
        &self.assets
    }

    pub fn coins_collected(&self) -> usize {
        self.level.coins_collected()
    }

    /// Stars earned with the current shot count.
    pub fn stars(&self) -> u32 {
        self.level.compute_stars(self.shots)
    }

    /// BeforeStart -> Playing. A paused game is resumed with [`Game::resume`].
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::BeforeStart {
            tracing::debug!(from = ?self.phase, "start ignored");
            return false;
        }
        self.transition(GamePhase::Playing)
    }

    pub fn pause(&mut self) -> bool {
        self.transition(GamePhase::Paused)
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            tracing::debug!(from = ?self.phase, "resume ignored");
            return false;
        }
        self.transition(GamePhase::Playing)
    }

    fn transition(&mut self, next: GamePhase) -> bool {
        if !self.phase.can_transition_to(next) {
            tracing::debug!(from = ?self.phase, to = ?next, "illegal phase transition ignored");
            return false;
        }
        tracing::debug!(from = ?self.phase, to = ?next, "phase transition");
        self.enter(next);
        true
    }

    fn enter(&mut self, phase: GamePhase) {
        self.phase = phase;
        if phase == GamePhase::Playing {
            self.clock.start();
            self.level.start();
        } else {
            self.clock.stop();
            self.level.stop();
        }
        if phase.is_over() {
            self.level.clear_aim();
        }
    }

    /// Feeds wall-clock time. Runs fixed steps only while playing.
    ///
    /// Returns the level events produced, in order.
    pub fn update(&mut self, elapsed: f32) -> Vec<LevelEvent> {
        let steps = self.clock.advance(elapsed);
        let mut produced = Vec::new();

        for _ in 0..steps {
            if self.phase != GamePhase::Playing {
                break;
            }
            for event in self.level.step() {
                self.apply_event(event);
                produced.push(event);
            }
        }
        produced
    }

    fn apply_event(&mut self, event: LevelEvent) {
        match event {
            LevelEvent::CoinCollected { .. } => self.play_sound("coin"),
            LevelEvent::Won => {
                if self.transition(GamePhase::Won) {
                    self.play_sound("win");
                    tracing::info!(
                        level = %self.level.name(),
                        shots = self.shots,
                        stars = self.stars(),
                        "level won"
                    );
                }
            }
            LevelEvent::Lost => {
                if self.transition(GamePhase::Lost) {
                    self.play_sound("lose");
                    tracing::info!(level = %self.level.name(), shots = self.shots, "level lost");
                }
            }
        }
    }

    fn play_sound(&mut self, name: &str) {
        if let Err(err) = self.assets.play_sound(name) {
            tracing::warn!(%err, "failed to play sound");
        }
    }

    /// Applies a collision notification from outside the physics step.
    /// Ignored unless playing.
    pub fn notify(&mut self, collision: Collision) -> Vec<LevelEvent> {
        if self.phase != GamePhase::Playing {
            return Vec::new();
        }
        let events = self.level.handle_collision(collision);
        for &event in &events {
            self.apply_event(event);
        }
        events
    }

    /// Updates the aim indicator. Ignored unless playing.
    pub fn aim(&mut self, point: [f32; 2]) {
        if self.phase == GamePhase::Playing {
            self.level.aim(point);
        }
    }

    /// Flicks the hero away from `target`. Ignored unless playing.
    pub fn shoot(&mut self, target: [f32; 2]) -> bool {
        if self.phase != GamePhase::Playing {
            tracing::debug!(phase = ?self.phase, "shot ignored");
            return false;
        }

        let hero = self.level.hero_position();
        let dx = hero[0] - target[0];
        let dy = hero[1] - target[1];
        let distance = (dx * dx + dy * dy).sqrt();
        if distance > f32::EPSILON {
            let magnitude = (distance * self.config.shot_power).min(self.config.max_impulse);
            self.level
                .apply_impulse([dx / distance * magnitude, dy / distance * magnitude]);
        }

        self.shots += 1;
        self.level.clear_aim();
        tracing::debug!(shots = self.shots, ?target, "shot");
        true
    }

    /// Restarts the current level from scratch.
    pub fn replay(&mut self) -> Result<(), GameError> {
        let description = self.description.clone();
        self.rebuild(description)
    }

    /// Switches to another level.
    pub fn load_level(&mut self, description: LevelDescription) -> Result<(), GameError> {
        self.rebuild(description)
    }

    fn rebuild(&mut self, description: LevelDescription) -> Result<(), GameError> {
        let generation = self.generation.wrapping_add(1);
        let level = Level::build(&description, &self.config, generation)?;

        self.level.stop();
        self.level = level;
        self.description = description;
        self.generation = generation;
        self.shots = 0;
        tracing::debug!(from = ?self.phase, generation, "level rebuilt");
        self.enter(GamePhase::BeforeStart);
        Ok(())
    }

    /// Render hook: paints the level overlays for the current frame.
    pub fn frame_drawn(&self, surface: &mut dyn DrawSurface) -> Result<(), AssetError> {
        self.level.draw(surface, &self.assets)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.level.outcome()
    }
}
