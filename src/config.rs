/// Tuning constants and level rosters.
///
/// Every field has a default matching the stock game, so a config file only
/// needs to name what it overrides.  `validate` runs once, when a game is
/// initialised.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::entities::CollectibleKind;

/// Number of regular waves before the boss level.
pub const WAVE_LEVELS: usize = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("screen size must be positive (got {width}x{height})")]
    InvalidScreen { width: f32, height: f32 },
    #[error("expected 3 wave rosters, got {0}")]
    WaveCount(usize),
    #[error("level {level} has no enemies")]
    EmptyWave { level: usize },
    #[error("level {level} enemy row does not fit on screen")]
    WaveOutOfBounds { level: usize },
    #[error("boss volley has no projectile offsets")]
    EmptySpread,
}

// ── Sub-tables ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub start_x: f32,
    pub start_y: f32,
    pub width: f32,
    pub height: f32,
    /// px/s
    pub speed: f32,
    pub max_health: u32,
    pub lives: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        PlayerTuning {
            start_x: 100.0,
            start_y: 500.0,
            width: 50.0,
            height: 30.0,
            speed: 300.0,
            max_health: 100,
            lives: 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub max_health: u32,
    pub shoot_delay_ms: u64,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        EnemyTuning {
            width: 50.0,
            height: 30.0,
            speed: 180.0,
            max_health: 50,
            shoot_delay_ms: 1500,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    pub width: f32,
    pub height: f32,
    pub y: f32,
    pub speed: f32,
    pub max_health: u32,
    pub shoot_delay_ms: u64,
    /// Horizontal offsets from the boss centre for the regular volley.
    pub spread_offsets: Vec<f32>,
    pub invincibility_ms: u64,
    pub special_delay_ms: u64,
    pub special_shots: u32,
    /// Candidate offsets; each special shot picks one at random.
    pub special_offsets: Vec<f32>,
}

impl Default for BossTuning {
    fn default() -> Self {
        BossTuning {
            width: 100.0,
            height: 60.0,
            y: 50.0,
            speed: 120.0,
            max_health: 1000,
            shoot_delay_ms: 1500,
            spread_offsets: vec![-40.0, -20.0, 0.0, 20.0, 40.0],
            invincibility_ms: 500,
            special_delay_ms: 5000,
            special_shots: 5,
            special_offsets: vec![-30.0, 0.0, 30.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub width: f32,
    pub height: f32,
    /// Negative: player shots travel up.
    pub player_speed: f32,
    pub enemy_speed: f32,
    /// Damage a player shot deals to the boss.
    pub player_damage: u32,
    /// Damage an enemy shot deals to the player.
    pub enemy_damage: u32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        ProjectileTuning {
            width: 10.0,
            height: 20.0,
            player_speed: -600.0,
            enemy_speed: 300.0,
            player_damage: 50,
            enemy_damage: 20,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectibleTuning {
    pub size: f32,
    pub fall_speed: f32,
    pub health_restore: u32,
}

impl Default for CollectibleTuning {
    fn default() -> Self {
        CollectibleTuning { size: 20.0, fall_speed: 60.0, health_restore: 20 }
    }
}

/// A pickup placed by a wave: centred on `x`, bottom edge at `y`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PickupSpawn {
    pub kind: CollectibleKind,
    pub x: f32,
    pub y: f32,
}

/// One horizontal row of enemies plus its pickups.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveRoster {
    pub enemy_count: u32,
    pub origin_x: f32,
    pub spacing: f32,
    pub row_y: f32,
    #[serde(default)]
    pub pickups: Vec<PickupSpawn>,
}

impl WaveRoster {
    /// Left edge of the `i`th enemy in the row.
    pub fn slot_x(&self, i: u32) -> f32 {
        self.origin_x + i as f32 * self.spacing
    }
}

fn default_waves() -> Vec<WaveRoster> {
    vec![
        WaveRoster {
            enemy_count: 5,
            origin_x: 100.0,
            spacing: 150.0,
            row_y: 400.0,
            pickups: vec![PickupSpawn { kind: CollectibleKind::Health, x: 300.0, y: 400.0 }],
        },
        WaveRoster {
            enemy_count: 8,
            origin_x: 50.0,
            spacing: 100.0,
            row_y: 300.0,
            pickups: vec![PickupSpawn { kind: CollectibleKind::Life, x: 600.0, y: 300.0 }],
        },
        WaveRoster {
            enemy_count: 12,
            origin_x: 20.0,
            spacing: 70.0,
            row_y: 200.0,
            pickups: vec![
                PickupSpawn { kind: CollectibleKind::Health, x: 400.0, y: 200.0 },
                PickupSpawn { kind: CollectibleKind::Life, x: 700.0, y: 200.0 },
            ],
        },
    ]
}

// ── Master config ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub boss: BossTuning,
    pub projectile: ProjectileTuning,
    pub collectible: CollectibleTuning,
    /// Damage the player takes from touching an enemy.
    pub contact_damage: u32,
    pub kill_score: u32,
    pub boss_score: u32,
    /// Upper bound on the per-tick delta.
    pub max_frame_ms: u64,
    /// Rosters for levels 1 through 3; level 4 is always the boss.
    pub waves: Vec<WaveRoster>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            screen_width: 1280.0,
            screen_height: 720.0,
            player: PlayerTuning::default(),
            enemy: EnemyTuning::default(),
            boss: BossTuning::default(),
            projectile: ProjectileTuning::default(),
            collectible: CollectibleTuning::default(),
            contact_damage: 20,
            kill_score: 10,
            boss_score: 10,
            max_frame_ms: 100,
            waves: default_waves(),
        }
    }
}

impl GameConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Load and validate a RON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_ron_str(&text)?;
        config.validate()?;
        info!(path = %path.display(), "loaded game config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen_width <= 0.0 || self.screen_height <= 0.0 {
            return Err(ConfigError::InvalidScreen {
                width: self.screen_width,
                height: self.screen_height,
            });
        }
        if self.waves.len() != WAVE_LEVELS {
            return Err(ConfigError::WaveCount(self.waves.len()));
        }
        for (i, wave) in self.waves.iter().enumerate() {
            let level = i + 1;
            if wave.enemy_count == 0 {
                return Err(ConfigError::EmptyWave { level });
            }
            let last_right = wave.slot_x(wave.enemy_count - 1) + self.enemy.width;
            if wave.origin_x < 0.0 || last_right > self.screen_width {
                return Err(ConfigError::WaveOutOfBounds { level });
            }
        }
        if self.boss.spread_offsets.is_empty() || self.boss.special_offsets.is_empty() {
            return Err(ConfigError::EmptySpread);
        }
        Ok(())
    }

    /// Roster for a regular level (1-based).  `None` for the boss level.
    pub fn wave(&self, level: u8) -> Option<&WaveRoster> {
        (level as usize).checked_sub(1).and_then(|i| self.waves.get(i))
    }
}
