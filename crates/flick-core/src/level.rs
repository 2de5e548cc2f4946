//! Level orchestration: turns a [`LevelDescription`] into a physics world and binds
//! collisions to score, outcome and effects.

use std::collections::VecDeque;
use std::fmt;

use rapier2d::prelude::*;

use crate::assets::AssetSource;
use crate::color::Color;
use crate::config::GameConfig;
use crate::effects::{Effect, FadingCoinEffect, RingDirection, RingEffect, SparkBurst};
use crate::error::{AssetError, ConfigError};
use crate::level_data::LevelDescription;
use crate::physics::{Collision, EntityId, EntityKind, EntityTag, PhysicsWorld};
use crate::render::DrawSurface;
use crate::timeline::Timeline;

pub const WALL_THICKNESS: f32 = 20.0;
pub const HERO_SIZE: f32 = 20.0;
pub const COIN_RADIUS: f32 = 7.0;
pub const GOAL_RADIUS: f32 = 15.0;

const SEGMENT_HALF_THICKNESS: f32 = 2.0;
const COIN_RING_RADIUS: f32 = 20.0;
const GOAL_RING_RADIUS: f32 = 40.0;
const ATTRACTOR_MIN_DISTANCE: f32 = 1.0;
const TRAIL_WIDTH: f32 = 2.0;
const AIM_WIDTH: f32 = 1.0;

/// Something that happened in the level during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEvent {
    CoinCollected {
        coin: EntityId,
        collected: usize,
        total: usize,
    },
    Won,
    Lost,
}

/// Final result of a level, recorded once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

/// Star rating for `shots` given ascending thresholds.
///
/// The best rating is `thresholds.len()`; zero when every threshold is exceeded.
pub fn compute_stars(thresholds: &[u32], shots: u32) -> u32 {
    let count = thresholds.len();
    thresholds
        .iter()
        .position(|&threshold| shots <= threshold)
        .map_or(0, |i| u32::try_from(count - i).unwrap_or(u32::MAX))
}

struct CoinSlot {
    id: EntityId,
    position: [f32; 2],
    collider: ColliderHandle,
    collected: bool,
    ring: RingEffect,
}

#[derive(Debug, Clone, Copy)]
struct Attractor {
    position: [f32; 2],
    /// Precomputed `density * radius²`.
    mass: f32,
}

/// Live state of one level build.
pub struct Level {
    name: String,
    generation: u32,
    world: PhysicsWorld,
    timeline: Timeline,
    hero: RigidBodyHandle,
    hero_id: EntityId,
    goal_id: EntityId,
    goal_position: [f32; 2],
    /// Collider waiting for the last coin; taken when inserted.
    pending_goal: Option<Collider>,
    goal_collider: Option<ColliderHandle>,
    goal_ring: RingEffect,
    coins: Vec<CoinSlot>,
    coins_collected: usize,
    attractors: Vec<Attractor>,
    segments: Vec<([f32; 2], [f32; 2])>,
    spikes: Vec<([f32; 2], [f32; 2])>,
    entity_ids: Vec<EntityId>,
    effects: Vec<Box<dyn Effect>>,
    outcome: Option<Outcome>,
    stars: Vec<u32>,
    trail: VecDeque<[f32; 2]>,
    aim: Option<[f32; 2]>,
    steps: u64,
    config: GameConfig,
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Level")
            .field("name", &self.name)
            .field("generation", &self.generation)
            .field("coins_collected", &self.coins_collected)
            .field("total_coins", &self.coins.len())
            .field("goal_inserted", &self.goal_inserted())
            .field("outcome", &self.outcome)
            .field("effects", &self.effects.len())
            .field("world", &self.world)
            .finish_non_exhaustive()
    }
}

/// Allocates entity ids within one generation.
struct IdAllocator {
    generation: u32,
    next: u32,
    issued: Vec<EntityId>,
}

impl IdAllocator {
    fn next(&mut self) -> EntityId {
        let id = EntityId::new(self.generation, self.next);
        self.next += 1;
        self.issued.push(id);
        id
    }
}

/// Thin static box between two points, laid along the segment.
fn segment_collider(start: [f32; 2], end: [f32; 2]) -> ColliderBuilder {
    let mid = [
        f32::midpoint(start[0], end[0]),
        f32::midpoint(start[1], end[1]),
    ];
    let dx = end[0] - start[0];
    let dy = end[1] - start[1];
    let length = (dx * dx + dy * dy).sqrt();
    let angle = dy.atan2(dx);

    ColliderBuilder::cuboid(length / 2.0, SEGMENT_HALF_THICKNESS)
        .translation(Vector::new(mid[0], mid[1]))
        .rotation(angle)
}

impl Level {
    /// Builds a fresh world for `description`.
    ///
    /// `generation` must differ from the live build so stale entity ids are rejected.
    pub fn build(
        description: &LevelDescription,
        config: &GameConfig,
        generation: u32,
    ) -> Result<Self, ConfigError> {
        description.validate()?;

        let gravity = Vector::new(description.gravity.x, description.gravity.y);
        let mut world = PhysicsWorld::with_gravity(gravity, config.fixed_step);
        let mut timeline = Timeline::new(config.fixed_step);
        let mut ids = IdAllocator {
            generation,
            next: 0,
            issued: Vec::new(),
        };

        // Cage around the world bounds
        let width = description.world_size.width;
        let height = description.world_size.height;
        let half = WALL_THICKNESS / 2.0;
        let cage = [
            ([width / 2.0, -half], [width / 2.0 + WALL_THICKNESS, half]),
            ([width / 2.0, height + half], [width / 2.0 + WALL_THICKNESS, half]),
            ([-half, height / 2.0], [half, height / 2.0 + WALL_THICKNESS]),
            ([width + half, height / 2.0], [half, height / 2.0 + WALL_THICKNESS]),
        ];
        for (center, extents) in cage {
            let collider = ColliderBuilder::cuboid(extents[0], extents[1])
                .translation(Vector::new(center[0], center[1]))
                .friction(0.3)
                .restitution(0.5)
                .build();
            world.add_static_collider(collider, EntityTag::new(EntityKind::Wall, ids.next()));
        }

        // Hero
        let hero_id = ids.next();
        let hero_position = description.hero_position.to_array();
        let hero = world.add_rigid_body(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(hero_position[0], hero_position[1]))
                .linear_damping(config.hero_linear_damping)
                .angular_damping(config.hero_angular_damping)
                .ccd_enabled(true)
                .build(),
        );
        world.add_collider(
            ColliderBuilder::cuboid(HERO_SIZE / 2.0, HERO_SIZE / 2.0)
                .friction(0.3)
                .restitution(0.5)
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .build(),
            hero,
            EntityTag::new(EntityKind::Hero, hero_id),
        );

        // Coins
        let mut coins = Vec::with_capacity(description.coins.len());
        for coin in &description.coins {
            let id = ids.next();
            let position = coin.to_array();
            let collider = world.add_static_collider(
                ColliderBuilder::ball(COIN_RADIUS)
                    .translation(Vector::new(position[0], position[1]))
                    .sensor(true)
                    .active_events(ActiveEvents::COLLISION_EVENTS)
                    .build(),
                EntityTag::new(EntityKind::Coin, id),
            );
            let ring = RingEffect::spawn(
                &mut timeline,
                position,
                COIN_RING_RADIUS,
                Color::GOLD,
                RingDirection::Outwards,
            )?;
            coins.push(CoinSlot {
                id,
                position,
                collider,
                collected: false,
                ring,
            });
        }

        // Goal, held back until every coin is collected
        let goal_id = ids.next();
        let goal_position = description.goal_position.to_array();
        let mut goal = ColliderBuilder::ball(GOAL_RADIUS)
            .translation(Vector::new(goal_position[0], goal_position[1]))
            .sensor(true)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        goal.user_data = EntityTag::new(EntityKind::Goal, goal_id).encode();
        let goal_ring = RingEffect::spawn(
            &mut timeline,
            goal_position,
            GOAL_RING_RADIUS,
            Color::TEAL,
            RingDirection::Inwards,
        )?;

        // Walls
        let mut segments = Vec::new();
        for wall in &description.walls {
            for pair in wall.windows(2) {
                let (start, end) = (pair[0].to_array(), pair[1].to_array());
                world.add_static_collider(
                    segment_collider(start, end)
                        .friction(0.3)
                        .restitution(0.5)
                        .build(),
                    EntityTag::new(EntityKind::Wall, ids.next()),
                );
                segments.push((start, end));
            }
        }

        // Spikes
        let mut spikes = Vec::with_capacity(description.spikes.len());
        for spike in &description.spikes {
            world.add_static_collider(
                segment_collider(spike.start(), spike.end())
                    .sensor(true)
                    .active_events(ActiveEvents::COLLISION_EVENTS)
                    .build(),
                EntityTag::new(EntityKind::Spike, ids.next()),
            );
            spikes.push((spike.start(), spike.end()));
        }

        // Attractors
        let mut attractors = Vec::with_capacity(description.attractors.len());
        for attractor in &description.attractors {
            world.add_static_collider(
                ColliderBuilder::ball(attractor.radius)
                    .translation(Vector::new(attractor.x, attractor.y))
                    .friction(0.3)
                    .restitution(0.6)
                    .build(),
                EntityTag::new(EntityKind::Attractor, ids.next()),
            );
            attractors.push(Attractor {
                position: [attractor.x, attractor.y],
                mass: attractor.density * attractor.radius * attractor.radius,
            });
        }

        let mut level = Self {
            name: description.display_name().to_string(),
            generation,
            world,
            timeline,
            hero,
            hero_id,
            goal_id,
            goal_position,
            pending_goal: Some(goal),
            goal_collider: None,
            goal_ring,
            coins,
            coins_collected: 0,
            attractors,
            segments,
            spikes,
            entity_ids: ids.issued,
            effects: Vec::new(),
            outcome: None,
            stars: description.stars.clone(),
            trail: VecDeque::with_capacity(config.trail_capacity),
            aim: None,
            steps: 0,
            config: config.clone(),
        };

        if level.coins.is_empty() {
            level.insert_goal();
        }
        level.timeline.start();

        tracing::info!(
            level = %level.name,
            generation,
            coins = level.coins.len(),
            colliders = level.world.collider_set.len(),
            "level built"
        );
        Ok(level)
    }

    /// Runs one fixed step and returns the events it produced.
    pub fn step(&mut self) -> Vec<LevelEvent> {
        self.apply_attractor_forces();
        self.sample_trail();

        let mut events = Vec::new();
        for collision in self.world.step_with_events() {
            events.extend(self.handle_collision(collision));
        }

        self.timeline.tick();
        for effect in &mut self.effects {
            effect.tick();
        }
        self.effects.retain(|effect| !effect.is_finished());

        events
    }

    /// Applies one collision notification. Duplicates and stale notifications are
    /// no-ops.
    pub fn handle_collision(&mut self, collision: Collision) -> Vec<LevelEvent> {
        let Some(other) = collision.other_than(EntityKind::Hero) else {
            return Vec::new();
        };
        let hero_side = if collision.body1.kind == EntityKind::Hero {
            collision.body1
        } else {
            collision.body2
        };
        if hero_side.id != self.hero_id || other.id.generation != self.generation {
            tracing::trace!(?collision, generation = self.generation, "ignoring stale collision");
            return Vec::new();
        }
        if self.outcome.is_some() {
            return Vec::new();
        }

        match other.kind {
            EntityKind::Coin => self.collect_coin(other.id).into_iter().collect(),
            EntityKind::Spike => {
                self.outcome = Some(Outcome::Lost);
                tracing::info!(level = %self.name, "hero hit a spike");
                vec![LevelEvent::Lost]
            }
            EntityKind::Goal => {
                self.outcome = Some(Outcome::Won);
                self.goal_ring.stop(&mut self.timeline);
                tracing::info!(level = %self.name, "goal reached");
                vec![LevelEvent::Won]
            }
            EntityKind::Hero | EntityKind::Wall | EntityKind::Attractor => Vec::new(),
        }
    }

    fn collect_coin(&mut self, id: EntityId) -> Option<LevelEvent> {
        let slot = self.coins.iter_mut().find(|slot| slot.id == id)?;
        if slot.collected {
            return None;
        }
        slot.collected = true;
        self.world.remove_collider(slot.collider);
        slot.ring.stop(&mut self.timeline);
        let position = slot.position;
        self.coins_collected += 1;

        match FadingCoinEffect::spawn(&mut self.timeline, position) {
            Ok(effect) => self.effects.push(Box::new(effect)),
            Err(err) => tracing::warn!(%err, "failed to spawn coin effect"),
        }
        let seed = (u64::from(self.generation) << 32) | u64::from(id.index);
        self.effects.push(Box::new(SparkBurst::spawn(
            position,
            self.config.spark_count,
            self.config.spark_ttl,
            seed,
        )));

        tracing::debug!(
            coin = %id,
            collected = self.coins_collected,
            total = self.coins.len(),
            "coin collected"
        );
        if self.coins_collected == self.coins.len() {
            self.insert_goal();
        }

        Some(LevelEvent::CoinCollected {
            coin: id,
            collected: self.coins_collected,
            total: self.coins.len(),
        })
    }

    fn insert_goal(&mut self) {
        if let Some(goal) = self.pending_goal.take() {
            let tag = EntityTag::new(EntityKind::Goal, self.goal_id);
            self.goal_collider = Some(self.world.add_static_collider(goal, tag));
            tracing::debug!(level = %self.name, "goal inserted");
        }
    }

    fn apply_attractor_forces(&mut self) {
        let Some(body) = self.world.get_rigid_body_mut(self.hero) else {
            return;
        };
        body.reset_forces(false);

        let hero = body.translation();
        let (hx, hy) = (hero.x, hero.y);
        let gravity = self.config.attractor_gravity;
        for attractor in &self.attractors {
            let dx = attractor.position[0] - hx;
            let dy = attractor.position[1] - hy;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance < ATTRACTOR_MIN_DISTANCE {
                continue;
            }
            let magnitude = gravity * attractor.mass / (distance * distance);
            body.add_force(
                Vector::new(dx / distance * magnitude, dy / distance * magnitude),
                true,
            );
        }
    }

    fn sample_trail(&mut self) {
        self.steps += 1;
        if self.steps % u64::from(self.config.trail_interval.max(1)) != 0 {
            return;
        }
        let position = self.hero_position();
        if self.trail.len() >= self.config.trail_capacity {
            self.trail.pop_front();
        }
        if self.config.trail_capacity > 0 {
            self.trail.push_back(position);
        }
    }

    pub fn apply_impulse(&mut self, impulse: [f32; 2]) {
        if let Some(body) = self.world.get_rigid_body_mut(self.hero) {
            body.apply_impulse(Vector::new(impulse[0], impulse[1]), true);
        }
    }

    pub fn hero_position(&self) -> [f32; 2] {
        self.world
            .get_rigid_body(self.hero)
            .map_or([0.0, 0.0], |body| {
                let pos = body.translation();
                [pos.x, pos.y]
            })
    }

    pub fn hero_velocity(&self) -> [f32; 2] {
        self.world
            .get_rigid_body(self.hero)
            .map_or([0.0, 0.0], |body| {
                let vel = body.linvel();
                [vel.x, vel.y]
            })
    }

    /// Shows the aim indicator towards `point`.
    pub fn aim(&mut self, point: [f32; 2]) {
        self.aim = Some(point);
    }

    pub fn clear_aim(&mut self) {
        self.aim = None;
    }

    pub fn aim_point(&self) -> Option<[f32; 2]> {
        self.aim
    }

    pub fn compute_stars(&self, shots: u32) -> u32 {
        compute_stars(&self.stars, shots)
    }

    pub fn coins_collected(&self) -> usize {
        self.coins_collected
    }

    pub fn total_coins(&self) -> usize {
        self.coins.len()
    }

    pub fn goal_inserted(&self) -> bool {
        self.goal_collider.is_some()
    }

    pub fn goal_position(&self) -> [f32; 2] {
        self.goal_position
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every entity id issued by this build, including the goal before insertion.
    pub fn entity_ids(&self) -> &[EntityId] {
        &self.entity_ids
    }

    pub fn hero_tag(&self) -> EntityTag {
        EntityTag::new(EntityKind::Hero, self.hero_id)
    }

    pub fn goal_tag(&self) -> EntityTag {
        EntityTag::new(EntityKind::Goal, self.goal_id)
    }

    pub fn coin_tags(&self) -> impl Iterator<Item = EntityTag> + '_ {
        self.coins
            .iter()
            .map(|slot| EntityTag::new(EntityKind::Coin, slot.id))
    }

    /// Sampled hero positions, oldest first.
    pub fn trail(&self) -> impl ExactSizeIterator<Item = &[f32; 2]> {
        self.trail.iter()
    }

    pub fn active_effects(&self) -> usize {
        self.effects.len()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    /// Halts the level's animations. Score and outcome are untouched.
    pub fn stop(&mut self) {
        self.timeline.stop();
    }

    pub fn start(&mut self) {
        self.timeline.start();
    }

    /// Paints the level overlays: trail, rings, effects and aim indicator.
    pub fn draw(&self, surface: &mut dyn DrawSurface, assets: &dyn AssetSource) -> Result<(), AssetError> {
        #[allow(clippy::cast_precision_loss)]
        let trail_len = self.trail.len() as f32;
        for (i, pair) in self.trail.iter().collect::<Vec<_>>().windows(2).enumerate() {
            #[allow(clippy::cast_precision_loss)]
            surface.set_alpha((i + 1) as f32 / trail_len);
            surface.line(*pair[0], *pair[1], TRAIL_WIDTH, Color::WHITE);
        }

        surface.set_alpha(1.0);
        for (start, end) in &self.segments {
            surface.line(*start, *end, SEGMENT_HALF_THICKNESS * 2.0, Color::WHITE);
        }
        for (start, end) in &self.spikes {
            surface.line(*start, *end, SEGMENT_HALF_THICKNESS * 2.0, Color::SPIKE);
        }

        for slot in self.coins.iter().filter(|slot| !slot.collected) {
            slot.ring.draw(surface, assets)?;
        }
        if self.goal_inserted() {
            self.goal_ring.draw(surface, assets)?;
        }
        for effect in &self.effects {
            effect.draw(surface, assets)?;
        }

        if let Some(point) = self.aim {
            surface.set_alpha(1.0);
            surface.line(self.hero_position(), point, AIM_WIDTH, Color::AIM);
        }
        surface.set_alpha(1.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level_data::Point;

    fn description(coins: usize) -> LevelDescription {
        let coins = (0..coins)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let x = 200.0 + 60.0 * i as f32;
                Point::new(x, 400.0)
            })
            .collect();
        LevelDescription {
            name: Some("test".to_string()),
            world_size: Default::default(),
            hero_position: Point::new(100.0, 100.0),
            goal_position: Point::new(500.0, 100.0),
            coins,
            walls: vec![vec![Point::new(300.0, 0.0), Point::new(300.0, 50.0)]],
            spikes: Vec::new(),
            attractors: Vec::new(),
            stars: vec![3, 6, 10],
            gravity: Point::new(0.0, 0.0),
        }
    }

    fn hit(level: &Level, other: EntityTag) -> Collision {
        Collision {
            body1: other,
            body2: level.hero_tag(),
        }
    }

    #[test]
    fn test_compute_stars() {
        let thresholds = [3, 6, 10];
        assert_eq!(compute_stars(&thresholds, 2), 3);
        assert_eq!(compute_stars(&thresholds, 3), 3);
        assert_eq!(compute_stars(&thresholds, 5), 2);
        assert_eq!(compute_stars(&thresholds, 9), 1);
        assert_eq!(compute_stars(&thresholds, 15), 0);
        assert_eq!(compute_stars(&[], 0), 0);
    }

    #[test]
    fn test_build_creates_world() {
        let level = Level::build(&description(3), &GameConfig::default(), 1).unwrap();
        // 4 cage walls + hero + 3 coins + 1 wall segment, goal held back
        assert_eq!(level.world().collider_set.len(), 9);
        assert!(!level.goal_inserted());
        assert_eq!(level.total_coins(), 3);
        assert_eq!(level.hero_position(), [100.0, 100.0]);
        // 3 coin rings + goal ring
        assert_eq!(level.timeline().len(), 4);
        assert!(level.timeline().is_running());
        assert!(level.entity_ids().iter().all(|id| id.generation == 1));
    }

    #[test]
    fn test_goal_inserted_once_after_last_coin() {
        let mut level = Level::build(&description(3), &GameConfig::default(), 1).unwrap();
        let coins: Vec<_> = level.coin_tags().collect();

        for (i, coin) in coins.iter().enumerate() {
            assert!(!level.goal_inserted());
            let events = level.handle_collision(hit(&level, *coin));
            assert_eq!(
                events,
                [LevelEvent::CoinCollected {
                    coin: coin.id,
                    collected: i + 1,
                    total: 3,
                }]
            );
            // Duplicate notification
            assert!(level.handle_collision(hit(&level, *coin)).is_empty());
        }

        assert!(level.goal_inserted());
        assert_eq!(level.coins_collected(), 3);
        let goals = level
            .world()
            .entity_tags()
            .filter(|tag| tag.kind == EntityKind::Goal)
            .count();
        assert_eq!(goals, 1);
        assert!(level.handle_collision(hit(&level, coins[2])).is_empty());
    }

    #[test]
    fn test_level_without_coins_has_goal() {
        let level = Level::build(&description(0), &GameConfig::default(), 1).unwrap();
        assert!(level.goal_inserted());
    }

    #[test]
    fn test_outcome_recorded_once() {
        let mut level = Level::build(&description(0), &GameConfig::default(), 1).unwrap();
        let goal = level.goal_tag();
        assert_eq!(level.handle_collision(hit(&level, goal)), [LevelEvent::Won]);
        assert!(level.handle_collision(hit(&level, goal)).is_empty());

        let spike = EntityTag::new(EntityKind::Spike, EntityId::new(1, 99));
        assert!(level.handle_collision(hit(&level, spike)).is_empty());
        assert_eq!(level.outcome(), Some(Outcome::Won));
    }

    #[test]
    fn test_stale_and_unrelated_collisions_ignored() {
        let mut level = Level::build(&description(1), &GameConfig::default(), 2).unwrap();
        let coin = level.coin_tags().next().unwrap();

        let stale = EntityTag::new(EntityKind::Coin, EntityId::new(1, coin.id.index));
        assert!(level.handle_collision(hit(&level, stale)).is_empty());

        let wall = EntityTag::new(EntityKind::Wall, EntityId::new(2, 0));
        let no_hero = Collision {
            body1: coin,
            body2: wall,
        };
        assert!(level.handle_collision(no_hero).is_empty());
        assert_eq!(level.coins_collected(), 0);
    }

    #[test]
    fn test_coin_spawns_effects_and_stops_ring() {
        let mut level = Level::build(&description(2), &GameConfig::default(), 1).unwrap();
        let coin = level.coin_tags().next().unwrap();
        level.handle_collision(hit(&level, coin));

        // fading coin + spark burst
        assert_eq!(level.active_effects(), 2);
        // 2 coin rings + goal ring, one ring removed, spin and rise added
        assert_eq!(level.timeline().len(), 4);
    }

    #[test]
    fn test_trail_sampling_is_capped() {
        let config = GameConfig {
            trail_interval: 5,
            trail_capacity: 10,
            ..GameConfig::default()
        };
        let mut level = Level::build(&description(0), &config, 1).unwrap();
        for _ in 0..4 {
            level.step();
        }
        assert_eq!(level.trail().len(), 0);
        level.step();
        assert_eq!(level.trail().len(), 1);
        for _ in 0..100 {
            level.step();
        }
        assert_eq!(level.trail().len(), 10);
    }

    #[test]
    fn test_attractor_pulls_hero() {
        let mut desc = description(0);
        desc.attractors.push(crate::level_data::AttractorDescription {
            x: 300.0,
            y: 100.0,
            radius: 20.0,
            density: 1.0,
        });
        let mut level = Level::build(&desc, &GameConfig::default(), 1).unwrap();
        for _ in 0..30 {
            level.step();
        }
        assert!(level.hero_position()[0] > 100.0);
        assert!(level.hero_velocity()[0] > 0.0);
    }

    #[test]
    fn test_stop_keeps_score() {
        let mut level = Level::build(&description(2), &GameConfig::default(), 1).unwrap();
        let coin = level.coin_tags().next().unwrap();
        level.handle_collision(hit(&level, coin));
        level.stop();
        assert!(!level.timeline().is_running());
        assert_eq!(level.coins_collected(), 1);
        level.start();
        assert!(level.timeline().is_running());
    }
}
