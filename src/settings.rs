//! Climb settings
//!
//! Read once at startup from a flat JSON file with `Physics`, `Game World`
//! and `Colors` sections. Every key is required: a missing key fails the
//! load. `Settings::default()` is the factory preset used to write a fresh
//! file, never a silent fallback.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Failure while loading or saving settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to access settings file '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON, wrong types or missing keys
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// RGB color; accepts 3 or more numeric components (alpha is dropped)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "[u8; 3]")]
pub struct Rgb(pub [u8; 3]);

impl TryFrom<Vec<f32>> for Rgb {
    type Error = String;

    fn try_from(v: Vec<f32>) -> Result<Self, Self::Error> {
        if v.len() < 3 {
            return Err(format!("color needs at least 3 components, got {}", v.len()));
        }
        // Editors write floats like 255.0; truncate the same way they are read back
        let channel = |c: f32| c.clamp(0.0, 255.0) as u8;
        Ok(Rgb([channel(v[0]), channel(v[1]), channel(v[2])]))
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        c.0
    }
}

impl Rgb {
    /// Per-channel linear blend, truncated to integers
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
        Rgb([
            mix(self.0[0], other.0[0]),
            mix(self.0[1], other.0[1]),
            mix(self.0[2], other.0[2]),
        ])
    }
}

/// Player physics constants (per 60 fps frame)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Physics {
    /// Added to vertical velocity every frame (screen y grows downward)
    pub gravity: f32,
    /// Vertical velocity at jump start (negative is up)
    pub base_jump: f32,
    /// Jump boost per unit of horizontal speed
    pub vertical_speed_jump_increase: f32,
    pub friction: f32,
    pub acceleration: f32,
}

/// World dimensions, spawning and difficulty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct GameWorld {
    pub screen_width: f32,
    pub screen_height: f32,
    pub player_size: f32,
    pub platform_height: f32,
    /// Distance kept between the player and the top of the view
    pub camera_threshold: f32,
    pub platform_spacing: f32,
    pub base_platform_width: f32,
    pub min_platform_width: f32,
    pub max_speed_level: u32,
    /// Milliseconds a platform shakes before it falls
    pub platform_shake_duration: f32,
    /// Seconds between difficulty increases
    pub difficulty_increase_timer: f32,
    pub platform_reduction_coef: f32,
    /// Milliseconds before an idle combo resolves
    pub combo_timeout: f32,
    pub dark_mode_chance: f32,
    /// Milliseconds dark mode stays on
    pub dark_mode_duration: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Colors {
    pub player_color: Rgb,
    pub platform_color: Rgb,
    pub gradient_top_color: Rgb,
    pub gradient_bottom_color: Rgb,
}

/// Complete settings record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "Physics")]
    pub physics: Physics,
    #[serde(rename = "Game World")]
    pub world: GameWorld,
    #[serde(rename = "Colors")]
    pub colors: Colors,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            physics: Physics {
                gravity: 0.9,
                base_jump: -15.0,
                vertical_speed_jump_increase: 0.2,
                friction: 0.15,
                acceleration: 0.3,
            },
            world: GameWorld {
                screen_width: 700.0,
                screen_height: 800.0,
                player_size: 25.0,
                platform_height: 20.0,
                camera_threshold: 200.0,
                platform_spacing: 80.0,
                base_platform_width: 200.0,
                min_platform_width: 20.0,
                max_speed_level: 15,
                platform_shake_duration: 1500.0,
                difficulty_increase_timer: 30.0,
                platform_reduction_coef: 0.95,
                combo_timeout: 3000.0,
                dark_mode_chance: 0.05,
                dark_mode_duration: 10000.0,
            },
            colors: Colors {
                player_color: Rgb([255, 0, 0]),
                platform_color: Rgb([0, 0, 255]),
                gradient_top_color: Rgb([135, 206, 235]),
                gradient_bottom_color: Rgb([25, 25, 112]),
            },
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SettingsError::Invalid {
            field,
            reason: format!("must be positive, got {value}"),
        })
    }
}

fn probability(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::Invalid {
            field,
            reason: format!("must be within [0, 1], got {value}"),
        })
    }
}

impl Settings {
    /// Parse and validate settings from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Check value ranges the simulation relies on
    pub fn validate(&self) -> Result<(), SettingsError> {
        let w = &self.world;
        positive("SCREEN_WIDTH", w.screen_width)?;
        positive("SCREEN_HEIGHT", w.screen_height)?;
        positive("PLAYER_SIZE", w.player_size)?;
        positive("PLATFORM_HEIGHT", w.platform_height)?;
        positive("PLATFORM_SPACING", w.platform_spacing)?;
        positive("BASE_PLATFORM_WIDTH", w.base_platform_width)?;
        positive("MIN_PLATFORM_WIDTH", w.min_platform_width)?;
        if w.min_platform_width > w.base_platform_width {
            return Err(SettingsError::Invalid {
                field: "MIN_PLATFORM_WIDTH",
                reason: format!(
                    "{} exceeds BASE_PLATFORM_WIDTH {}",
                    w.min_platform_width, w.base_platform_width
                ),
            });
        }
        if w.base_platform_width > w.screen_width {
            return Err(SettingsError::Invalid {
                field: "BASE_PLATFORM_WIDTH",
                reason: format!("{} exceeds SCREEN_WIDTH {}", w.base_platform_width, w.screen_width),
            });
        }
        if !(w.platform_reduction_coef > 0.0 && w.platform_reduction_coef <= 1.0) {
            return Err(SettingsError::Invalid {
                field: "PLATFORM_REDUCTION_COEF",
                reason: format!("must be within (0, 1], got {}", w.platform_reduction_coef),
            });
        }
        probability("DARK_MODE_CHANCE", w.dark_mode_chance)?;
        positive("COMBO_TIMEOUT", w.combo_timeout)?;
        positive("DARK_MODE_DURATION", w.dark_mode_duration)?;
        positive("DIFFICULTY_INCREASE_TIMER", w.difficulty_increase_timer)?;
        Ok(())
    }
}
