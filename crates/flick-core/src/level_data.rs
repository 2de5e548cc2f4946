//! Level description format.
//!
//! A level is a JSON document in camelCase listing the hero start, the goal, coins,
//! hazards and static geometry. A catalog is a JSON array of such documents.

use serde::Deserialize;

use crate::error::ConfigError;

/// Point in world pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WorldSize {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldSize {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
        }
    }
}

/// Deadly segment. `flip` selects which side the teeth are drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SpikeDescription {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    #[serde(default)]
    pub flip: bool,
}

impl SpikeDescription {
    pub fn start(&self) -> [f32; 2] {
        [self.x1, self.y1]
    }

    pub fn end(&self) -> [f32; 2] {
        [self.x2, self.y2]
    }
}

/// Static circle pulling the hero with an inverse-square force.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AttractorDescription {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    #[serde(default = "default_density")]
    pub density: f32,
}

fn default_density() -> f32 {
    1.0
}

/// Complete description of one level.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDescription {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub world_size: WorldSize,
    pub hero_position: Point,
    pub goal_position: Point,
    #[serde(default)]
    pub coins: Vec<Point>,
    /// Each wall is a polyline.
    #[serde(default)]
    pub walls: Vec<Vec<Point>>,
    #[serde(default)]
    pub spikes: Vec<SpikeDescription>,
    #[serde(default)]
    pub attractors: Vec<AttractorDescription>,
    /// Ascending shot thresholds for 3, 2, 1 stars.
    #[serde(default)]
    pub stars: Vec<u32>,
    #[serde(default = "default_level_gravity")]
    pub gravity: Point,
}

fn default_level_gravity() -> Point {
    Point::new(0.0, 0.0)
}

impl LevelDescription {
    /// Parses and validates a single level.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let level: Self = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    /// Display name, falling back to a placeholder for untitled levels.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("untitled")
    }

    /// Checks the invariants level construction relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let malformed = |msg: String| Err(ConfigError::MalformedLevel(msg));

        let WorldSize { width, height } = self.world_size;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return malformed(format!("world size must be positive, got {width}x{height}"));
        }
        if !self.hero_position.is_finite() || !self.goal_position.is_finite() {
            return malformed("hero and goal positions must be finite".to_string());
        }
        if !self.gravity.is_finite() {
            return malformed("gravity must be finite".to_string());
        }
        if let Some(i) = self.coins.iter().position(|c| !c.is_finite()) {
            return malformed(format!("coin {i} has a non-finite position"));
        }

        for (i, wall) in self.walls.iter().enumerate() {
            if wall.len() < 2 {
                return malformed(format!("wall {i} needs at least 2 points"));
            }
            if wall.iter().any(|p| !p.is_finite()) {
                return malformed(format!("wall {i} has a non-finite point"));
            }
        }

        for (i, spike) in self.spikes.iter().enumerate() {
            let coords = [spike.x1, spike.y1, spike.x2, spike.y2];
            if coords.iter().any(|v| !v.is_finite()) {
                return malformed(format!("spike {i} has a non-finite endpoint"));
            }
        }

        for (i, attractor) in self.attractors.iter().enumerate() {
            if !(attractor.radius.is_finite() && attractor.radius > 0.0) {
                return malformed(format!("attractor {i} radius must be positive"));
            }
            if !(attractor.density.is_finite() && attractor.density >= 0.0) {
                return malformed(format!("attractor {i} density must be non-negative"));
            }
            if !(attractor.x.is_finite() && attractor.y.is_finite()) {
                return malformed(format!("attractor {i} has a non-finite position"));
            }
        }

        if self.stars.windows(2).any(|w| w[0] > w[1]) {
            return malformed(format!(
                "star thresholds must be ascending, got {:?}",
                self.stars
            ));
        }

        Ok(())
    }
}

/// Ordered list of levels.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct LevelCatalog {
    levels: Vec<LevelDescription>,
}

impl LevelCatalog {
    /// Parses a JSON array of levels, validating every entry.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let catalog: Self = serde_json::from_str(json)?;
        for (i, level) in catalog.levels.iter().enumerate() {
            level.validate().map_err(|e| match e {
                ConfigError::MalformedLevel(msg) => {
                    ConfigError::MalformedLevel(format!("level {i}: {msg}"))
                }
                other => other,
            })?;
        }
        Ok(catalog)
    }

    /// Levels bundled with the crate.
    pub fn builtin() -> Result<Self, ConfigError> {
        const BUILTIN_LEVELS_JSON: &str = include_str!("../levels/default.json");
        Self::from_json(BUILTIN_LEVELS_JSON)
    }

    pub fn get(&self, index: usize) -> Option<&LevelDescription> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDescription> {
        self.levels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "heroPosition": { "x": 100, "y": 100 },
        "goalPosition": { "x": 500, "y": 300 }
    }"#;

    #[test]
    fn test_minimal_level_defaults() {
        let level = LevelDescription::from_json(MINIMAL).unwrap();
        assert_eq!(level.world_size, WorldSize::default());
        assert_eq!(level.gravity, Point::new(0.0, 0.0));
        assert!(level.coins.is_empty());
        assert!(level.stars.is_empty());
        assert_eq!(level.display_name(), "untitled");
    }

    #[test]
    fn test_full_level_parsing() {
        let json = r#"{
            "name": "Detour",
            "worldSize": { "width": 800, "height": 600 },
            "heroPosition": { "x": 40, "y": 40 },
            "goalPosition": { "x": 700, "y": 500 },
            "coins": [{ "x": 200, "y": 200 }, { "x": 300, "y": 100 }],
            "walls": [[{ "x": 0, "y": 300 }, { "x": 400, "y": 300 }, { "x": 400, "y": 200 }]],
            "spikes": [{ "x1": 500, "y1": 0, "x2": 500, "y2": 200, "flip": true }],
            "attractors": [{ "x": 600, "y": 100, "radius": 25, "density": 2 }],
            "stars": [2, 4, 8],
            "gravity": { "x": 0, "y": 50 }
        }"#;
        let level = LevelDescription::from_json(json).unwrap();
        assert_eq!(level.display_name(), "Detour");
        assert_eq!(level.coins.len(), 2);
        assert_eq!(level.walls[0].len(), 3);
        assert!(level.spikes[0].flip);
        assert_eq!(level.attractors[0].density, 2.0);
        assert_eq!(level.gravity, Point::new(0.0, 50.0));
    }

    #[test]
    fn test_rejects_malformed_levels() {
        let short_wall = r#"{
            "heroPosition": { "x": 1, "y": 1 },
            "goalPosition": { "x": 2, "y": 2 },
            "walls": [[{ "x": 0, "y": 0 }]]
        }"#;
        assert!(matches!(
            LevelDescription::from_json(short_wall),
            Err(ConfigError::MalformedLevel(_))
        ));

        let unordered_stars = r#"{
            "heroPosition": { "x": 1, "y": 1 },
            "goalPosition": { "x": 2, "y": 2 },
            "stars": [5, 3]
        }"#;
        assert!(matches!(
            LevelDescription::from_json(unordered_stars),
            Err(ConfigError::MalformedLevel(_))
        ));

        let flat_world = r#"{
            "worldSize": { "width": 0, "height": 480 },
            "heroPosition": { "x": 1, "y": 1 },
            "goalPosition": { "x": 2, "y": 2 }
        }"#;
        assert!(matches!(
            LevelDescription::from_json(flat_world),
            Err(ConfigError::MalformedLevel(_))
        ));

        assert!(matches!(
            LevelDescription::from_json(r#"{ "heroPosition": {} }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_catalog_reports_level_index() {
        let json = format!(
            r#"[{MINIMAL}, {{
                "heroPosition": {{ "x": 1, "y": 1 }},
                "goalPosition": {{ "x": 2, "y": 2 }},
                "attractors": [{{ "x": 0, "y": 0, "radius": -1 }}]
            }}]"#
        );
        match LevelCatalog::from_json(&json) {
            Err(ConfigError::MalformedLevel(msg)) => assert!(msg.starts_with("level 1:")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = LevelCatalog::builtin().unwrap();
        assert!(catalog.len() >= 3);
        assert!(catalog.iter().all(|level| level.name.is_some()));
        assert!(catalog.get(catalog.len()).is_none());
    }
}
