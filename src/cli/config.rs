use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::game::GameConfig;
use crate::planner::PlannerConfig;

/// Settings a binary reads from its `--config` file. Missing sections
/// and fields fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub game: GameConfig,
    pub planner: PlannerConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

impl RunConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::MapType;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = RunConfig::from_json(
            r#"{"game": {"map_type": "Tournament", "seed": 9}, "planner": {"lookahead": false}}"#,
        )
        .expect("valid json");
        assert_eq!(config.game.map_type, MapType::Tournament);
        assert_eq!(config.game.seed, 9);
        assert_eq!(config.game.num_players, 4);
        assert!(!config.planner.lookahead);
        assert_eq!(config.planner.roll_limit, 40);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = RunConfig::load(Some(Path::new("/nonexistent/run.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert_eq!(RunConfig::load(None).expect("defaults"), RunConfig::default());
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(RunConfig::from_json("{"), Err(ConfigError::Json(_))));
    }
}
