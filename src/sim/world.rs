//! World: everything a climb run owns
//!
//! Player, platform arena, scoring state, camera, clock and RNG live in one
//! owned context that `tick` advances.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::player::Player;
use super::state::{
    ColorTag, GameEvent, GamePhase, GameState, Platform, PlatformArena, PlatformId, Rect,
};
use crate::consts::*;
use crate::settings::Settings;

/// A complete climb run
#[derive(Debug, Clone)]
pub struct World {
    pub settings: Settings,
    pub state: GameState,
    pub player: Player,
    pub platforms: PlatformArena,
    /// World y at the top of the view (decreases as the view climbs)
    pub camera_offset: f32,
    pub phase: GamePhase,
    /// Simulation clock in milliseconds
    pub time_ms: f64,
    pub time_ticks: u64,
    /// Events raised by the latest tick
    pub events: Vec<GameEvent>,
    rng: Pcg32,
}

impl World {
    /// Create a run with a seeded RNG
    pub fn new(settings: Settings, seed: u64) -> Self {
        log::info!("Climb started with seed {}", seed);
        Self::with_rng(settings, Pcg32::seed_from_u64(seed))
    }

    /// Create a run drawing randomness from `rng`
    pub fn with_rng(settings: Settings, mut rng: Pcg32) -> Self {
        let w = &settings.world;
        let state = GameState::new();
        let mut platforms = PlatformArena::new();

        let ground = platforms
            .insert(
                Rect::new(0.0, w.screen_height - GROUND_OFFSET, w.screen_width, w.platform_height),
                ColorTag::Red,
                0,
            )
            .clone();
        let player = Player::new(&ground, w.player_size, w.screen_width);

        let width = state.platform_width(w);
        let mut below = ground;
        for _ in 0..INITIAL_PLATFORMS {
            below = spawn_above(&mut platforms, &mut rng, &settings, &below, width).clone();
        }

        Self {
            settings,
            state,
            player,
            platforms,
            camera_offset: 0.0,
            phase: GamePhase::Playing,
            time_ms: 0.0,
            time_ticks: 0,
            events: Vec::new(),
            rng,
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Uniform sample in `[0, 1)` from the run's RNG
    pub(crate) fn roll(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Follow the player upward, then apply the forced scroll
    pub(crate) fn update_camera(&mut self, dt: f32) {
        let desired = self.player.rect.top() - self.settings.world.camera_threshold;
        if desired < self.camera_offset {
            self.camera_offset = desired;
        }
        if self.player.current_platform.floor >= SCROLL_START_FLOOR {
            self.camera_offset -= self.state.scroll_speed() * dt;
        }
    }

    /// Keep platforms stacked up to one screen above the player
    pub(crate) fn spawn_platforms(&mut self) -> usize {
        let limit = self.player.rect.y - self.settings.world.screen_height;
        let width = self.state.platform_width(&self.settings.world);
        let mut spawned = 0;

        while let Some(highest) = self.platforms.highest().cloned() {
            if highest.rect.y <= limit {
                break;
            }
            spawn_above(&mut self.platforms, &mut self.rng, &self.settings, &highest, width);
            spawned += 1;
        }

        if spawned > 0 {
            log::debug!("Spawned {} platforms (width {})", spawned, width);
        }
        spawned
    }

    /// Drop platforms that scrolled well below the view
    pub(crate) fn prune_platforms(&mut self) -> usize {
        let cutoff = self.camera_offset + self.settings.world.screen_height + PRUNE_MARGIN;
        let pruned = self.platforms.retain(|p| p.rect.top() < cutoff);
        if pruned > 0 {
            log::debug!("Pruned {} platforms", pruned);
        }
        pruned
    }

    /// True when the player has dropped out of the bottom of the view
    pub(crate) fn player_fell_out(&self) -> bool {
        self.player.rect.bottom() - self.camera_offset
            > self.settings.world.screen_height + GAME_OVER_MARGIN
    }

    /// Start the shake-then-fall sequence on a platform; false if it is gone
    pub fn shake_platform(&mut self, id: PlatformId) -> bool {
        let duration = self.settings.world.platform_shake_duration;
        match self.platforms.get_mut(id) {
            Some(platform) => {
                platform.start_shaking(duration);
                true
            }
            None => false,
        }
    }
}

/// Insert a random platform one floor above `below`
fn spawn_above<'a>(
    platforms: &'a mut PlatformArena,
    rng: &mut Pcg32,
    settings: &Settings,
    below: &Platform,
    width: f32,
) -> &'a Platform {
    let w = &settings.world;
    let max_x = (w.screen_width - width).max(0.0).floor() as u32;
    let x = rng.random_range(0..=max_x) as f32;
    let jitter = rng.random_range(0..=PLATFORM_SPACING_JITTER) as f32;
    let y = below.rect.y - w.platform_spacing - jitter;
    let color = if rng.random::<bool>() {
        ColorTag::Red
    } else {
        ColorTag::Blue
    };
    platforms.insert(Rect::new(x, y, width, w.platform_height), color, below.floor + 1)
}
