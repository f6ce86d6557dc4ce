//! The player: input response, physics integration, landing and trail

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::lands_on;
use super::state::{ColorTag, Platform, PlatformArena, PlatformRef, Rect};
use super::tick::TickInput;
use crate::consts::*;
use crate::settings::{Colors, Physics, Rgb};

/// Trail sample for rendering (oldest first)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub color: ColorTag,
}

/// The player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    /// Horizontal velocity in px per frame, vertical in px per update
    pub vel: Vec2,
    pub on_ground: bool,
    pub was_on_ground: bool,
    /// Platform last landed on
    pub current_platform: PlatformRef,
    /// Platform landed on before `current_platform`
    pub past_platform: Option<PlatformRef>,
    /// Highest floor ever landed on
    pub max_floor: u32,
    /// Floors gained by the last landing (negative when landing lower)
    pub multi_jump: i32,
    pub color: ColorTag,
    /// Spin angle in degrees, `[0, 360)`
    pub rotation: f32,
    pub rotating: bool,
    /// Remaining trail tint fade after a color change (1 = just changed)
    pub tint_fade: f32,
    /// Recent positions (bounded FIFO, oldest at the front)
    #[serde(skip)]
    pub trail: VecDeque<TrailPoint>,
}

impl Player {
    /// Spawn standing on `start`, horizontally at the middle of the screen
    pub fn new(start: &Platform, size: f32, screen_width: f32) -> Self {
        let mut rect = Rect::new((screen_width / 2.0).floor(), 0.0, size, size);
        rect.set_bottom(start.rect.top());
        Self {
            rect,
            vel: Vec2::ZERO,
            on_ground: true,
            was_on_ground: true,
            current_platform: start.to_ref(),
            past_platform: None,
            max_floor: start.floor,
            multi_jump: 0,
            color: ColorTag::Red,
            rotation: 0.0,
            rotating: false,
            tint_fade: 0.0,
            trail: VecDeque::new(),
        }
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Trail length allowed at the current speed: `floor(speed²)`
    pub fn trail_capacity(&self) -> usize {
        let speed = self.speed();
        (speed * speed).floor() as usize
    }

    pub fn toggle_color(&mut self) {
        self.color = self.color.toggled();
        self.tint_fade = 1.0;
    }

    /// Trail tint blending from the previous color toward the current one
    pub fn trail_tint(&self, colors: &Colors) -> Rgb {
        let to = self.color.rgb(colors);
        if self.tint_fade <= 0.0 {
            return to;
        }
        let from = self.color.toggled().rgb(colors);
        from.lerp(to, 1.0 - self.tint_fade)
    }

    /// Apply one frame of input: color toggle, jump and horizontal control
    pub fn apply_input(&mut self, input: &TickInput, physics: &Physics, dt: f32) {
        if input.toggle_color {
            self.toggle_color();
        }

        if input.jump && self.on_ground {
            self.vel.y = physics.base_jump * (1.0 + self.vel.x.abs() * physics.vertical_speed_jump_increase);
            self.on_ground = false;
        }

        if self.on_ground {
            if input.left {
                self.vel.x -= physics.acceleration * dt;
            }
            if input.right {
                self.vel.x += physics.acceleration * dt;
            }
            if self.vel.x > 0.0 {
                self.vel.x -= physics.friction * dt;
            } else if self.vel.x < 0.0 {
                self.vel.x += physics.friction * dt;
            }
        } else {
            if !input.left && !input.right && self.vel.x != 0.0 {
                self.vel.x = AIR_DRIFT_SPEED.copysign(self.vel.x);
            }
            if input.left {
                self.vel.x -= physics.acceleration * AIR_CONTROL * dt;
            } else if input.right {
                self.vel.x += physics.acceleration * AIR_CONTROL * dt;
            }
        }
    }

    /// Integrate one frame, resolve landings and update spin and trail.
    ///
    /// Returns true only on the frame the player touches down.
    pub fn step(&mut self, platforms: &PlatformArena, physics: &Physics, screen_width: f32, dt: f32) -> bool {
        self.vel.y += physics.gravity * dt;
        self.rect.y += self.vel.y;
        self.rect.x += self.vel.x * dt;

        if self.rect.left() < 0.0 {
            self.rect.set_left(0.0);
            self.vel.x *= -WALL_RESTITUTION;
        } else if self.rect.right() > screen_width {
            self.rect.set_right(screen_width);
            self.vel.x *= -WALL_RESTITUTION;
        }

        self.on_ground = false;
        if let Some(platform) = platforms
            .iter()
            .find(|p| lands_on(&self.rect, self.vel.y, self.color, p))
        {
            self.land_on(platform);
        }

        if self.vel.y.abs() >= ROTATION_TRIGGER_SPEED {
            self.rotating = true;
        }
        if self.rotating {
            self.rotation = (self.rotation + ROTATION_RATE * dt) % 360.0;
        }

        self.record_trail();

        if self.tint_fade > 0.0 {
            self.tint_fade = (self.tint_fade - TINT_FADE_RATE * dt).max(0.0);
        }

        let just_landed = self.on_ground && !self.was_on_ground;
        self.was_on_ground = self.on_ground;
        just_landed
    }

    fn land_on(&mut self, platform: &Platform) {
        self.rect.set_bottom(platform.rect.top());
        self.vel.y = 0.0;
        self.on_ground = true;
        self.rotating = false;
        self.rotation = 0.0;

        let past = self.current_platform;
        self.past_platform = Some(past);
        self.current_platform = platform.to_ref();
        self.max_floor = self.max_floor.max(platform.floor);
        self.multi_jump = platform.floor as i32 - past.floor as i32;
    }

    /// Append the current position and evict the oldest samples beyond capacity
    fn record_trail(&mut self) {
        self.trail.push_back(TrailPoint {
            pos: self.rect.center(),
            color: self.color,
        });
        let capacity = self.trail_capacity();
        while self.trail.len() > capacity {
            self.trail.pop_front();
        }
    }
}
