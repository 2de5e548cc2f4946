//! Error types shared across the crate.

/// Invalid construction parameters. Always fatal for whatever was being built.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid loop mode: {0}")]
    InvalidLoopMode(String),
    #[error("loop count must be positive")]
    ZeroLoopCount,
    #[error("tween duration must be positive and finite, got {0}")]
    NonPositiveDuration(f32),
    #[error("unknown easing: {0}")]
    UnknownEasing(String),
    #[error("invalid game config: {0}")]
    Invalid(String),
    #[error("malformed level description: {0}")]
    MalformedLevel(String),
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Lookup failure reported by an [`AssetSource`](crate::assets::AssetSource).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    #[error("image not found: {0}")]
    MissingImage(String),
    #[error("sound not found: {0}")]
    MissingSound(String),
}

/// Errors surfaced by [`Game`](crate::game::Game).
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}
