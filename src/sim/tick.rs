//! Frame-stepped simulation tick
//!
//! Advances a climb run by one caller-supplied frame delta.

use super::state::{GameEvent, GamePhase};
use super::world::World;
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Jump (only acts while on ground)
    pub jump: bool,
    /// Flip between the two colors
    pub toggle_color: bool,
}

/// What happened to the player during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// True only on the frame the player touched down
    pub just_landed: bool,
    /// Floors gained by that landing
    pub multi_jump: i32,
    pub game_over: bool,
}

/// Advance the run by `dt` frames (1.0 == one 60 fps frame)
pub fn tick(world: &mut World, input: &TickInput, dt: f32) -> TickReport {
    world.events.clear();

    if world.phase == GamePhase::GameOver {
        return TickReport {
            game_over: true,
            ..Default::default()
        };
    }

    world.time_ticks += 1;
    world.time_ms += dt as f64 * FRAME_MS;
    let now = world.time_ms;

    // Player
    world.player.apply_input(input, &world.settings.physics, dt);
    let just_landed = world.player.step(
        &world.platforms,
        &world.settings.physics,
        world.settings.world.screen_width,
        dt,
    );

    let mut report = TickReport::default();
    if just_landed {
        let floor = world.player.current_platform.floor;
        let multi_jump = world.player.multi_jump;
        log::debug!("Landed on floor {} (jump {})", floor, multi_jump);
        world.events.push(GameEvent::Landed { floor, multi_jump });
        world.state.on_landing(multi_jump, now, &mut world.events);

        let roll = world.roll();
        let chance = world.settings.world.dark_mode_chance;
        world.state.roll_dark_mode(roll, chance, now, &mut world.events);

        report.just_landed = true;
        report.multi_jump = multi_jump;
    }

    // Scoring
    let timeout = world.settings.world.combo_timeout as f64;
    world.state.expire_combo(now, timeout, &mut world.events);
    let duration = world.settings.world.dark_mode_duration as f64;
    world.state.update_dark_mode(now, duration, &mut world.events);
    world.state.record_floor(world.player.max_floor, &mut world.events);

    let current_floor = world.player.current_platform.floor;
    if let Some(level) = world
        .state
        .ramp_difficulty(now, current_floor, &world.settings.world)
    {
        world.events.push(GameEvent::SpeedLevelUp { level });
    }

    // World
    for platform in world.platforms.iter_mut() {
        platform.update(dt);
    }
    world.update_camera(dt);
    world.spawn_platforms();
    world.prune_platforms();

    if world.player_fell_out() {
        world.phase = GamePhase::GameOver;
        let score = world.state.score;
        let max_floor = world.player.max_floor;
        log::info!("Game over: score {} at floor {}", score, max_floor);
        world.events.push(GameEvent::GameOver { score, max_floor });
        report.game_over = true;
    }

    report
}
