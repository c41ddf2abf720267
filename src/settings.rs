//! Game settings and balance
//!
//! Loaded from an optional JSON file; any missing field falls back to the
//! built-in defaults from `consts`.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Sprite sizes per entity kind, used for bounds and grid sizing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteSizes {
    /// Also the grid cell size
    pub mushroom: Vec2,
    pub segment: Vec2,
    pub spider: Vec2,
    pub blaster: Vec2,
    pub blast: Vec2,
}

impl Default for SpriteSizes {
    fn default() -> Self {
        Self {
            mushroom: Vec2::from(MUSHROOM_SIZE),
            segment: Vec2::from(SEGMENT_SIZE),
            spider: Vec2::from(SPIDER_SIZE),
            blaster: Vec2::from(BLASTER_SIZE),
            blast: Vec2::from(BLAST_SIZE),
        }
    }
}

/// Gameplay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,
    pub sprites: SpriteSizes,
    /// Mushrooms placed when a field is generated
    pub mushroom_count: usize,

    // === Centipede ===
    pub centipede_length: usize,
    pub centipede_speed: f32,

    // === Spider ===
    pub spider_speed: f32,
    /// Seconds before a dead spider respawns
    pub spider_respawn_delay: f32,
    /// Chance per tick of picking a new random direction
    pub spider_turn_chance: f64,

    // === Player ===
    pub blaster_speed: f32,
    pub blast_speed: f32,
    /// Seconds between shots
    pub reload_time: f32,
    pub starting_lives: u8,

    /// Speed added to centipede and spider per cleared wave
    pub speed_increment: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            sprites: SpriteSizes::default(),
            mushroom_count: MUSHROOM_COUNT,

            centipede_length: CENTIPEDE_LENGTH,
            centipede_speed: CENTIPEDE_SPEED,

            spider_speed: SPIDER_SPEED,
            spider_respawn_delay: SPIDER_RESPAWN_DELAY,
            spider_turn_chance: SPIDER_TURN_CHANCE,

            blaster_speed: BLASTER_SPEED,
            blast_speed: BLAST_SPEED,
            reload_time: RELOAD_TIME,
            starting_lives: STARTING_LIVES,

            speed_increment: SPEED_INCREMENT,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(SettingsError::Invalid {
                    field,
                    reason: "must be positive",
                })
            }
        }

        positive("field_width", self.field_width)?;
        positive("field_height", self.field_height)?;
        positive("centipede_speed", self.centipede_speed)?;
        positive("spider_speed", self.spider_speed)?;
        positive("blaster_speed", self.blaster_speed)?;
        positive("blast_speed", self.blast_speed)?;

        if !(self.speed_increment >= 0.0 && self.speed_increment.is_finite()) {
            return Err(SettingsError::Invalid {
                field: "speed_increment",
                reason: "must be zero or positive",
            });
        }
        if self.centipede_length == 0 {
            return Err(SettingsError::Invalid {
                field: "centipede_length",
                reason: "must be at least 1",
            });
        }
        if self.starting_lives == 0 {
            return Err(SettingsError::Invalid {
                field: "starting_lives",
                reason: "must be at least 1",
            });
        }

        if !(0.0..=1.0).contains(&self.spider_turn_chance) {
            return Err(SettingsError::Invalid {
                field: "spider_turn_chance",
                reason: "must be between 0 and 1",
            });
        }

        let sprites = &self.sprites;
        for (field, size) in [
            ("sprites.mushroom", sprites.mushroom),
            ("sprites.segment", sprites.segment),
            ("sprites.spider", sprites.spider),
            ("sprites.blaster", sprites.blaster),
            ("sprites.blast", sprites.blast),
        ] {
            positive(field, size.x)?;
            positive(field, size.y)?;
        }

        if sprites.segment.x > self.field_width || sprites.segment.y > self.field_height {
            return Err(SettingsError::Invalid {
                field: "sprites.segment",
                reason: "larger than the field",
            });
        }
        // Heads snap to rows of the mushroom grid
        if sprites.segment != self.cell() {
            return Err(SettingsError::Invalid {
                field: "sprites.segment",
                reason: "must match the mushroom size",
            });
        }

        Ok(())
    }

    /// Grid cell size (one mushroom sprite)
    pub fn cell(&self) -> Vec2 {
        self.sprites.mushroom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "centipede_length": 4, "field_width": 400 }"#)
            .expect("valid settings");
        assert_eq!(settings.centipede_length, 4);
        assert_eq!(settings.field_width, 400.0);
        assert_eq!(settings.field_height, FIELD_HEIGHT);
        assert_eq!(settings.sprites, SpriteSizes::default());
    }

    #[test]
    fn test_rejects_zero_speed() {
        let err = Settings::from_json(r#"{ "centipede_speed": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "centipede_speed",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_turn_chance_above_one() {
        let err = Settings::from_json(r#"{ "spider_turn_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "spider_turn_chance",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_negative_speed_increment() {
        let err = Settings::from_json(r#"{ "speed_increment": -2 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "speed_increment",
                ..
            }
        ));

        // No difficulty ramp at all is fine
        let settings = Settings::from_json(r#"{ "speed_increment": 0 }"#).expect("valid settings");
        assert_eq!(settings.speed_increment, 0.0);
    }

    #[test]
    fn test_rejects_empty_centipede() {
        let err = Settings::from_json(r#"{ "centipede_length": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "centipede_length",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_lives() {
        let err = Settings::from_json(r#"{ "starting_lives": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "starting_lives",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_segment_off_grid() {
        let err = Settings::from_json(r#"{ "sprites": { "segment": [24.0, 24.0] } }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "sprites.segment",
                ..
            }
        ));

        // Resizing both keeps them on one grid
        let settings = Settings::from_json(
            r#"{ "sprites": { "segment": [24.0, 24.0], "mushroom": [24.0, 24.0] } }"#,
        )
        .expect("valid settings");
        assert_eq!(settings.cell(), Vec2::splat(24.0));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load("/nonexistent/centipede.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
