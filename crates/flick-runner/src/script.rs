//! Shot scripts: timed flicks played against a level.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

/// One flick, fired after waiting `wait` seconds of play.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScriptedShot {
    #[serde(default)]
    pub wait: f32,
    pub target: [f32; 2],
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ShotScript {
    pub shots: Vec<ScriptedShot>,
}

impl ShotScript {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read shot script {}", path.display()))?;
        Self::parse(&json).with_context(|| format!("invalid shot script {}", path.display()))
    }

    pub fn parse(json: &str) -> anyhow::Result<Self> {
        let script: Self = serde_json::from_str(json)?;
        if let Some(shot) = script.shots.iter().find(|s| !(s.wait.is_finite() && s.wait >= 0.0)) {
            anyhow::bail!("shot wait must be a non-negative number, got {}", shot.wait);
        }
        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let script = ShotScript::parse(
            r#"[{ "wait": 0.5, "target": [50, 240] }, { "target": [10, 10] }]"#,
        )
        .unwrap();
        assert_eq!(script.shots.len(), 2);
        assert_eq!(script.shots[0].wait, 0.5);
        assert_eq!(script.shots[1].wait, 0.0);
    }

    #[test]
    fn test_rejects_negative_wait() {
        assert!(ShotScript::parse(r#"[{ "wait": -1, "target": [0, 0] }]"#).is_err());
    }
}
