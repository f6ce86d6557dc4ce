//! Demo autopilot
//!
//! Generates `TickInput` from the world state so headless runs and attract
//! screens can play without a human. Deterministic: reads state only.

use super::state::Platform;
use super::tick::TickInput;
use super::world::World;

/// Horizontal slack (px) around the target center before steering
const STEER_DEADZONE: f32 = 8.0;

/// Pick the input that heads for the next floor up
pub fn autopilot(world: &World) -> TickInput {
    let mut input = TickInput::default();
    let player = &world.player;

    let Some(target) = next_platform(world) else {
        return input;
    };

    let center = player.rect.center().x;
    let dx = target.rect.center().x - center;
    if dx > STEER_DEADZONE {
        input.right = true;
    } else if dx < -STEER_DEADZONE {
        input.left = true;
    }

    if player.on_ground {
        // Jump once the player is under the target
        input.jump = center > target.rect.left() && center < target.rect.right();
    } else if player.color != target.color && player.rect.bottom() <= target.rect.top() {
        // Only switch once clear of the target so the landing counts
        input.toggle_color = true;
    }

    input
}

/// Lowest platform above the one the player stands on
fn next_platform(world: &World) -> Option<&Platform> {
    let floor = world.player.current_platform.floor;
    world
        .platforms
        .iter()
        .filter(|p| p.floor > floor)
        .min_by_key(|p| p.floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::ColorTag;
    use crate::sim::tick::tick;

    fn world_with_target(color: ColorTag, x: f32) -> World {
        let mut world = World::new(Settings::default(), 11);
        for p in world.platforms.iter_mut().filter(|p| p.floor == 1) {
            p.color = color;
            p.rect.x = x;
        }
        world
    }

    #[test]
    fn test_steers_toward_target() {
        let world = world_with_target(ColorTag::Red, 0.0);
        let input = autopilot(&world);
        assert!(input.left && !input.right);
        assert!(!input.jump);

        let world = world_with_target(ColorTag::Red, 500.0);
        let input = autopilot(&world);
        assert!(input.right && !input.left);
    }

    #[test]
    fn test_jumps_when_under_target() {
        let world = world_with_target(ColorTag::Red, 270.0);
        let input = autopilot(&world);
        assert!(input.jump);
        assert!(!input.toggle_color);
    }

    #[test]
    fn test_toggles_color_above_mismatched_target() {
        let mut world = world_with_target(ColorTag::Blue, 270.0);
        world.player.on_ground = false;
        world.player.rect.y = 500.0;
        assert!(autopilot(&world).toggle_color);

        // Still below the target: keep the current color
        world.player.rect.y = 700.0;
        assert!(!autopilot(&world).toggle_color);
    }

    #[test]
    fn test_autopilot_runs_deterministically() {
        let mut a = World::new(Settings::default(), 2024);
        let mut b = World::new(Settings::default(), 2024);
        for _ in 0..600 {
            let input = autopilot(&a);
            assert!(!(input.left && input.right));
            assert_eq!(input, autopilot(&b));
            tick(&mut a, &input, 1.0);
            tick(&mut b, &input, 1.0);
        }
        assert_eq!(a.state, b.state);
        assert_eq!(a.player.max_floor, b.player.max_floor);
    }
}
