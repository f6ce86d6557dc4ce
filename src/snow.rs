//! Snowfall particle field
//!
//! Flakes drift down a 2D field (y up) under depth-scaled gravity and
//! jitter, and are blown away from the pointer while it is pressed. `dt`
//! is in seconds here, unlike the frame-scaled platformer tick.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Every depth-scaled force is multiplied by this
const DEPTH_GAIN: f32 = 1.2;
/// Horizontal jitter bound per step (before depth scaling)
const JITTER: f32 = 4.0;
/// New flakes appear this far above the top edge
const SPAWN_HEIGHT_OFFSET: f32 = 30.0;
/// Flakes are dropped this far outside the field
const PRUNE_MARGIN: f32 = 50.0;

/// Rejected snowfall tuning
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SnowConfigError {
    #[error("snow setting {field} must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("snow setting {field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },
}

/// Field tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowConfig {
    pub width: f32,
    pub height: f32,
    pub gravity: f32,
    pub wind_strength: f32,
    pub wind_radius: f32,
    /// Spin speed of close flakes (degrees per second)
    pub rotation_speed: f32,
    pub flakes_per_frame: usize,
    /// Spawning pauses above this count
    pub max_flakes: usize,
}

impl SnowConfig {
    /// Check the ranges the spawn and wind math rely on
    pub fn validate(&self) -> Result<(), SnowConfigError> {
        let positive = |field: &'static str, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(SnowConfigError::NotPositive { field, value })
            }
        };
        let finite = |field: &'static str, value: f32| {
            if value.is_finite() {
                Ok(())
            } else {
                Err(SnowConfigError::NotFinite { field, value })
            }
        };
        positive("width", self.width)?;
        positive("height", self.height)?;
        finite("gravity", self.gravity)?;
        finite("wind_strength", self.wind_strength)?;
        finite("wind_radius", self.wind_radius)?;
        finite("rotation_speed", self.rotation_speed)?;
        Ok(())
    }
}

impl Default for SnowConfig {
    fn default() -> Self {
        Self {
            width: 1300.0,
            height: 700.0,
            gravity: -80.0,
            wind_strength: 3000.0,
            wind_radius: 50.0,
            rotation_speed: 30.0,
            flakes_per_frame: 2,
            max_flakes: 2000,
        }
    }
}

/// Draw layer, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepthLayer {
    Far,
    Middle,
    Close,
}

impl DepthLayer {
    pub fn from_depth(depth: f32) -> Self {
        if depth < 0.4 {
            DepthLayer::Far
        } else if depth < 0.7 {
            DepthLayer::Middle
        } else {
            DepthLayer::Close
        }
    }

    /// How much slower than `rotation_speed` this layer spins
    fn spin_reduction(self) -> f32 {
        match self {
            DepthLayer::Far => 10.0,
            DepthLayer::Middle => 5.0,
            DepthLayer::Close => 0.0,
        }
    }
}

/// A single flake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snowflake {
    pub pos: Vec2,
    pub vel: Vec2,
    /// In `[0.01, 1]`; nearer flakes are larger, brighter and faster
    pub depth: f32,
    pub layer: DepthLayer,
    /// Degrees
    pub rotation: f32,
    pub rotation_speed: f32,
    pub scale: f32,
    pub opacity: u8,
}

impl Snowflake {
    fn spawn(rng: &mut Pcg32, config: &SnowConfig) -> Self {
        let depth = rng.random_range(0.01..=1.0f32);
        let layer = DepthLayer::from_depth(depth);
        let spin = config.rotation_speed - layer.spin_reduction();
        let rotation_speed = if rng.random::<bool>() { spin } else { -spin };
        let x = rng.random_range(0.0..=config.width);

        Self {
            pos: Vec2::new(x, config.height + SPAWN_HEIGHT_OFFSET),
            vel: Vec2::ZERO,
            depth,
            layer,
            rotation: 0.0,
            rotation_speed,
            scale: 0.05 + 0.1 * depth,
            opacity: (255.0 * depth) as u8,
        }
    }

    fn step(&mut self, rng: &mut Pcg32, config: &SnowConfig, pointer: &Pointer, dt: f32) {
        let gain = self.depth * DEPTH_GAIN;
        self.vel.y += config.gravity * dt * gain;
        self.vel.x += rng.random_range(-JITTER..=JITTER) * gain;

        if pointer.pressed {
            let away = self.pos - pointer.pos;
            if away.length() < config.wind_radius {
                // Zero direction when sitting exactly on the pointer
                self.vel += away.normalize_or_zero() * config.wind_strength * dt * gain;
            }
        }

        self.pos += self.vel * dt;
        self.rotation = (self.rotation + self.rotation_speed * dt).rem_euclid(360.0);
    }

    fn is_outside(&self, config: &SnowConfig) -> bool {
        self.pos.y < -PRUNE_MARGIN || self.pos.x < -PRUNE_MARGIN || self.pos.x > config.width + PRUNE_MARGIN
    }
}

/// Pointer state in field coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    pub pressed: bool,
    pub pos: Vec2,
}

/// The whole snowfall
#[derive(Debug, Clone)]
pub struct Snowfield {
    config: SnowConfig,
    flakes: Vec<Snowflake>,
    rng: Pcg32,
}

impl Snowfield {
    pub fn new(seed: u64) -> Self {
        Self::build(SnowConfig::default(), seed)
    }

    /// Field with custom tuning; rejects sizes the spawner cannot sample
    pub fn with_config(config: SnowConfig, seed: u64) -> Result<Self, SnowConfigError> {
        config.validate()?;
        Ok(Self::build(config, seed))
    }

    fn build(config: SnowConfig, seed: u64) -> Self {
        log::info!(
            "Snowfield {}x{} (max {} flakes, seed {})",
            config.width,
            config.height,
            config.max_flakes,
            seed
        );
        Self {
            config,
            flakes: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &SnowConfig {
        &self.config
    }

    pub fn flakes(&self) -> &[Snowflake] {
        &self.flakes
    }

    pub fn len(&self) -> usize {
        self.flakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flakes.is_empty()
    }

    /// Flakes of one layer, for back-to-front drawing
    pub fn layer(&self, layer: DepthLayer) -> impl Iterator<Item = &Snowflake> {
        self.flakes.iter().filter(move |f| f.layer == layer)
    }

    /// Add flakes directly (tests and scripted scenes)
    pub fn push(&mut self, flake: Snowflake) {
        self.flakes.push(flake);
    }

    /// Spawn, move and prune; returns how many flakes were removed
    pub fn step(&mut self, dt: f32, pointer: &Pointer) -> usize {
        if self.flakes.len() <= self.config.max_flakes {
            for _ in 0..self.config.flakes_per_frame {
                let flake = Snowflake::spawn(&mut self.rng, &self.config);
                self.flakes.push(flake);
            }
        }

        for flake in self.flakes.iter_mut() {
            flake.step(&mut self.rng, &self.config, pointer, dt);
        }

        let config = &self.config;
        let before = self.flakes.len();
        self.flakes.retain(|f| !f.is_outside(config));
        before - self.flakes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn quiet_field() -> Snowfield {
        Snowfield::with_config(
            SnowConfig {
                flakes_per_frame: 0,
                ..Default::default()
            },
            1,
        )
        .unwrap()
    }

    fn flake_at(x: f32, y: f32, depth: f32) -> Snowflake {
        Snowflake {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            depth,
            layer: DepthLayer::from_depth(depth),
            rotation: 0.0,
            rotation_speed: 30.0,
            scale: 0.05 + 0.1 * depth,
            opacity: (255.0 * depth) as u8,
        }
    }

    #[test]
    fn test_spawns_above_top_edge() {
        let mut field = Snowfield::new(7);
        field.step(DT, &Pointer::default());
        assert_eq!(field.len(), 2);
        for flake in field.flakes() {
            assert!(flake.pos.y > 700.0);
            assert!((0.01..=1.0).contains(&flake.depth));
            assert_eq!(flake.layer, DepthLayer::from_depth(flake.depth));
            assert!((flake.scale - (0.05 + 0.1 * flake.depth)).abs() < 1e-6);
            let spin = flake.rotation_speed.abs();
            let expected = match flake.layer {
                DepthLayer::Far => 20.0,
                DepthLayer::Middle => 25.0,
                DepthLayer::Close => 30.0,
            };
            assert_eq!(spin, expected);
        }
    }

    #[test]
    fn test_spawning_pauses_over_cap() {
        let mut field = Snowfield::new(7);
        for _ in 0..2001 {
            field.push(flake_at(650.0, 350.0, 0.5));
        }
        field.step(DT, &Pointer::default());
        assert_eq!(field.len(), 2001);
    }

    #[test]
    fn test_prunes_outside_flakes() {
        let mut field = quiet_field();
        field.push(flake_at(650.0, -60.0, 0.5));
        field.push(flake_at(-60.0, 300.0, 0.5));
        field.push(flake_at(1360.0, 300.0, 0.5));
        field.push(flake_at(650.0, 300.0, 0.5));
        assert_eq!(field.step(DT, &Pointer::default()), 3);
        assert_eq!(field.len(), 1);
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut field = quiet_field();
        field.push(flake_at(650.0, 300.0, 1.0));
        for _ in 0..30 {
            field.step(DT, &Pointer::default());
        }
        assert!(field.flakes()[0].vel.y < 0.0);
        assert!(field.flakes()[0].pos.y < 300.0);
    }

    #[test]
    fn test_wind_pushes_away_from_pointer() {
        let mut field = quiet_field();
        field.push(flake_at(660.0, 300.0, 1.0));
        field.push(flake_at(650.0, 300.0, 1.0));
        field.push(flake_at(800.0, 300.0, 1.0));
        let pointer = Pointer {
            pressed: true,
            pos: Vec2::new(650.0, 300.0),
        };
        field.step(DT, &pointer);

        let flakes = field.flakes();
        // Wind adds 60 px/s against at most 4.8 px/s of jitter
        assert!(flakes[0].vel.x > 50.0);
        // On the pointer itself: no wind and no NaN
        assert!(flakes[1].vel.x.abs() <= 4.8 + 1e-4);
        assert!(flakes[1].pos.is_finite());
        // Out of range
        assert!(flakes[2].vel.x.abs() <= 4.8 + 1e-4);
    }

    #[test]
    fn test_released_pointer_has_no_wind() {
        let mut field = quiet_field();
        field.push(flake_at(660.0, 300.0, 1.0));
        let pointer = Pointer {
            pressed: false,
            pos: Vec2::new(650.0, 300.0),
        };
        field.step(DT, &pointer);
        assert!(field.flakes()[0].vel.x.abs() <= 4.8 + 1e-4);
    }

    #[test]
    fn test_layers_partition_flakes() {
        let mut field = Snowfield::new(3);
        for _ in 0..50 {
            field.step(DT, &Pointer::default());
        }
        let total: usize = [DepthLayer::Far, DepthLayer::Middle, DepthLayer::Close]
            .iter()
            .map(|&l| field.layer(l).count())
            .sum();
        assert_eq!(total, field.len());
    }

    #[test]
    fn test_rejects_unsampleable_config() {
        for width in [-1.0, 0.0, f32::NAN, f32::INFINITY] {
            let config = SnowConfig {
                width,
                ..Default::default()
            };
            assert!(matches!(
                Snowfield::with_config(config, 1),
                Err(SnowConfigError::NotPositive { field: "width", .. })
            ));
        }
        let config = SnowConfig {
            gravity: f32::NAN,
            ..Default::default()
        };
        assert!(Snowfield::with_config(config, 1).is_err());
        assert!(Snowfield::with_config(SnowConfig::default(), 1).is_ok());
    }

    #[test]
    fn test_determinism() {
        let mut a = Snowfield::new(99);
        let mut b = Snowfield::new(99);
        let pointer = Pointer {
            pressed: true,
            pos: Vec2::new(400.0, 650.0),
        };
        for _ in 0..200 {
            a.step(DT, &pointer);
            b.step(DT, &pointer);
        }
        assert_eq!(a.flakes(), b.flakes());
    }
}
