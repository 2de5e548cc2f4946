//! Flick Core Library
//!
//! Runtime for a physics puzzle game: the player flicks a box ("hero") through a
//! level with `Rapier2D`, collecting coins before the goal opens, while a tween
//! timeline drives the visual effects.
//!
//! - [`tween`] and [`timeline`]: value animation over elapsed time
//! - [`level`]: builds a level world and turns collisions into [`LevelEvent`]s
//! - [`game`]: phases, fixed-step clock, input and level lifecycle

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod assets;
pub mod clock;
pub mod color;
pub mod config;
pub mod easing;
pub mod effects;
pub mod error;
pub mod game;
pub mod interpolate;
pub mod level;
pub mod level_data;
pub mod physics;
pub mod render;
pub mod timeline;
pub mod tween;

pub use assets::{AssetRegistry, AssetSource, ImageHandle};
pub use clock::FixedClock;
pub use color::Color;
pub use config::{FIXED_STEP, GameConfig};
pub use easing::Easing;
pub use effects::{Completion, Effect, FadingCoinEffect, RingDirection, RingEffect, SparkBurst};
pub use error::{AssetError, ConfigError, GameError};
pub use game::{Game, GamePhase};
pub use interpolate::{Interpolator, Lerp, Linear, Steps};
pub use level::{Level, LevelEvent, Outcome, compute_stars};
pub use level_data::{LevelCatalog, LevelDescription, Point};
pub use physics::{Collision, EntityId, EntityKind, EntityTag, PhysicsWorld};
pub use render::{DrawSurface, RecordingSurface, Rect};
pub use timeline::{Property, Schedule, Timeline, TweenId, TweenOptions};
pub use tween::{Animation, LoopMode, Tween, TweenBuilder};
