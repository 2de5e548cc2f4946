//! Image and sound lookup.

use std::collections::{HashMap, HashSet};

use crate::error::AssetError;

/// Handle to a loaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    name: String,
    width: u32,
    height: u32,
}

impl ImageHandle {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Source of images and sounds used by the level overlays.
pub trait AssetSource {
    fn image(&self, name: &str) -> Result<ImageHandle, AssetError>;

    fn play_sound(&mut self, name: &str) -> Result<(), AssetError>;
}

/// In-memory asset table.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    images: HashMap<String, ImageHandle>,
    sounds: HashSet<String>,
    played: Vec<String>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the images and sounds the stock levels use.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.insert_image(ImageHandle::new(crate::effects::COIN_SPRITE, 256, 16));
        for sound in ["coin", "win", "lose"] {
            registry.insert_sound(sound);
        }
        registry
    }

    pub fn insert_image(&mut self, image: ImageHandle) {
        self.images.insert(image.name.clone(), image);
    }

    pub fn insert_sound(&mut self, name: impl Into<String>) {
        self.sounds.insert(name.into());
    }

    /// Names of the sounds played so far, oldest first.
    pub fn played(&self) -> &[String] {
        &self.played
    }
}

impl AssetSource for AssetRegistry {
    fn image(&self, name: &str) -> Result<ImageHandle, AssetError> {
        self.images
            .get(name)
            .cloned()
            .ok_or_else(|| AssetError::MissingImage(name.to_string()))
    }

    fn play_sound(&mut self, name: &str) -> Result<(), AssetError> {
        if !self.sounds.contains(name) {
            return Err(AssetError::MissingSound(name.to_string()));
        }
        tracing::trace!(sound = name, "play sound");
        self.played.push(name.to_string());
        Ok(())
    }
}
