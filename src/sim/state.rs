//! Climb entities and scoring state
//!
//! Screen coordinates: x grows right, y grows down. Higher floors have
//! smaller y.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::{Colors, GameWorld, Rgb};

/// Player/platform color; the player only lands on its own color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorTag {
    Red,
    Blue,
}

impl ColorTag {
    pub fn toggled(self) -> Self {
        match self {
            ColorTag::Red => ColorTag::Blue,
            ColorTag::Blue => ColorTag::Red,
        }
    }

    /// Display color from the configured palette
    pub fn rgb(self, colors: &Colors) -> Rgb {
        match self {
            ColorTag::Red => colors.player_color,
            ColorTag::Blue => colors.platform_color,
        }
    }
}

/// Axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn set_left(&mut self, left: f32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.w;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    /// Strict overlap: touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Stable platform identifier (survives pruning of other platforms)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlatformId(pub u32);

/// Non-owning reference to a platform, with the floor copied out so it stays
/// usable after the platform is pruned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformRef {
    pub id: PlatformId,
    pub floor: u32,
}

/// Platform lifecycle. Only `Normal` is produced by the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PlatformState {
    #[default]
    Normal,
    /// Counting down (ms) before falling
    Shaking { timer: f32 },
    /// Dropping with a growing speed (px per frame)
    Falling { speed: f32 },
}

/// A platform entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: PlatformId,
    pub rect: Rect,
    pub color: ColorTag,
    /// Floor number, 0 for the ground, +1 per platform above
    pub floor: u32,
    #[serde(default)]
    pub state: PlatformState,
}

impl Platform {
    pub fn to_ref(&self) -> PlatformRef {
        PlatformRef {
            id: self.id,
            floor: self.floor,
        }
    }

    /// Begin the shake-then-fall sequence
    pub fn start_shaking(&mut self, duration_ms: f32) {
        if self.state == PlatformState::Normal {
            self.state = PlatformState::Shaking { timer: duration_ms };
        }
    }

    /// Advance the lifecycle by `dt` frames
    pub fn update(&mut self, dt: f32) {
        match self.state {
            PlatformState::Normal => {}
            PlatformState::Shaking { timer } => {
                let timer = timer - dt * FRAME_MS as f32;
                self.state = if timer <= 0.0 {
                    PlatformState::Falling {
                        speed: PLATFORM_FALL_START_SPEED,
                    }
                } else {
                    PlatformState::Shaking { timer }
                };
            }
            PlatformState::Falling { speed } => {
                let speed = speed + PLATFORM_FALL_ACCELERATION * dt;
                self.rect.y += speed * dt;
                self.state = PlatformState::Falling { speed };
            }
        }
    }
}

/// Platforms ordered by id, with explicit insert and prune steps
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformArena {
    platforms: Vec<Platform>,
    next_id: u32,
}

impl PlatformArena {
    pub fn new() -> Self {
        Self {
            platforms: Vec::new(),
            next_id: 1,
        }
    }

    /// Add a platform; ids only grow so the list stays sorted
    pub fn insert(&mut self, rect: Rect, color: ColorTag, floor: u32) -> &Platform {
        let id = PlatformId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        self.platforms.push(Platform {
            id,
            rect,
            color,
            floor,
            state: PlatformState::Normal,
        });
        &self.platforms[self.platforms.len() - 1]
    }

    pub fn get(&self, id: PlatformId) -> Option<&Platform> {
        self.platforms
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|i| &self.platforms[i])
    }

    pub fn get_mut(&mut self, id: PlatformId) -> Option<&mut Platform> {
        self.platforms
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|i| &mut self.platforms[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Platform> {
        self.platforms.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Platform> {
        self.platforms.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    /// Platform with the smallest y (highest on screen)
    pub fn highest(&self) -> Option<&Platform> {
        self.platforms
            .iter()
            .min_by(|a, b| a.rect.y.total_cmp(&b.rect.y))
    }

    /// Keep platforms matching `keep`; returns how many were dropped
    pub fn retain(&mut self, keep: impl FnMut(&Platform) -> bool) -> usize {
        let before = self.platforms.len();
        self.platforms.retain(keep);
        before - self.platforms.len()
    }
}

/// Run phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    GameOver,
}

/// Notable things that happened during a tick (HUD/audio/log consumers)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Landed { floor: u32, multi_jump: i32 },
    ComboExtended { combo: u32 },
    ComboResolved { combo: u32, points: u64, timed_out: bool },
    FloorsClimbed { floors: u32, points: u64 },
    DarkModeStarted,
    DarkModeEnded,
    SpeedLevelUp { level: u32 },
    GameOver { score: u64, max_floor: u32 },
}

/// Scoring, combo, dark mode and difficulty state.
///
/// Timestamps are simulation milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Never decreases within a run
    pub score: u64,
    pub combo: u32,
    pub combo_start_ms: f64,
    /// Highest floor already paid out
    pub floors_climbed: u32,
    pub speed_level: u32,
    pub last_speed_increase_ms: f64,
    /// Multiplier applied to the base width of newly spawned platforms
    pub platform_reduction_ratio: f32,
    pub dark_mode: bool,
    pub dark_mode_start_ms: f64,
    /// Visibility radius around the player while dark mode is on
    pub light_radius: f32,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            score: 0,
            combo: 0,
            combo_start_ms: 0.0,
            floors_climbed: 0,
            speed_level: 0,
            last_speed_increase_ms: 0.0,
            platform_reduction_ratio: 1.0,
            dark_mode: false,
            dark_mode_start_ms: 0.0,
            light_radius: BASE_LIGHT_RADIUS,
        }
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply combo rules for a landing that jumped `multi_jump` floors
    pub fn on_landing(&mut self, multi_jump: i32, now_ms: f64, events: &mut Vec<GameEvent>) {
        if multi_jump >= COMBO_MIN_JUMP {
            self.combo += multi_jump as u32;
            self.combo_start_ms = now_ms;
            log::debug!("Combo extended by {} to {}", multi_jump, self.combo);
            events.push(GameEvent::ComboExtended { combo: self.combo });
        } else if self.combo > 0 {
            self.resolve_combo(false, events);
        }
    }

    /// Resolve an active combo that has gone `timeout_ms` without extension
    pub fn expire_combo(&mut self, now_ms: f64, timeout_ms: f64, events: &mut Vec<GameEvent>) {
        if self.combo > 0 && now_ms - self.combo_start_ms >= timeout_ms {
            self.resolve_combo(true, events);
        }
    }

    /// Pay out the combo and reset it; returns the points awarded
    pub fn resolve_combo(&mut self, timed_out: bool, events: &mut Vec<GameEvent>) -> u64 {
        let combo = self.combo;
        if combo == 0 {
            return 0;
        }
        let points = combo_points(combo);
        self.score += points;
        self.combo = 0;
        log::debug!("Combo {} resolved for {} points (timed out: {})", combo, points, timed_out);
        events.push(GameEvent::ComboResolved {
            combo,
            points,
            timed_out,
        });
        points
    }

    /// Pay for floors above the high-water mark; returns the points awarded
    pub fn record_floor(&mut self, max_floor: u32, events: &mut Vec<GameEvent>) -> u64 {
        if max_floor <= self.floors_climbed {
            return 0;
        }
        let floors = max_floor - self.floors_climbed;
        let points = POINTS_PER_FLOOR * floors as u64;
        self.score += points;
        self.floors_climbed = max_floor;
        events.push(GameEvent::FloorsClimbed { floors, points });
        points
    }

    /// Possibly switch dark mode on after a landing; `roll` is uniform in `[0, 1)`
    pub fn roll_dark_mode(&mut self, roll: f32, chance: f32, now_ms: f64, events: &mut Vec<GameEvent>) {
        if !self.dark_mode && roll < chance {
            self.dark_mode = true;
            self.dark_mode_start_ms = now_ms;
            log::info!("Dark mode on");
            events.push(GameEvent::DarkModeStarted);
        }
    }

    /// Switch dark mode off after `duration_ms` and refresh the light radius
    pub fn update_dark_mode(&mut self, now_ms: f64, duration_ms: f64, events: &mut Vec<GameEvent>) {
        if self.dark_mode && now_ms - self.dark_mode_start_ms > duration_ms {
            self.dark_mode = false;
            log::info!("Dark mode off");
            events.push(GameEvent::DarkModeEnded);
        }
        if self.dark_mode {
            self.light_radius = light_radius(self.combo);
        }
    }

    /// Raise the speed level if the interval has passed; returns the new level
    pub fn ramp_difficulty(&mut self, now_ms: f64, current_floor: u32, world: &GameWorld) -> Option<u32> {
        if current_floor < SCROLL_START_FLOOR || self.speed_level >= world.max_speed_level {
            return None;
        }
        if now_ms - self.last_speed_increase_ms <= world.difficulty_increase_timer as f64 * 1000.0 {
            return None;
        }
        self.speed_level += 1;
        self.last_speed_increase_ms = now_ms;
        if world.base_platform_width * self.platform_reduction_ratio > world.min_platform_width {
            self.platform_reduction_ratio *= world.platform_reduction_coef;
        }
        log::info!(
            "Speed level {} (platform ratio {:.3})",
            self.speed_level,
            self.platform_reduction_ratio
        );
        Some(self.speed_level)
    }

    /// Forced camera scroll per frame once past the scroll floor
    pub fn scroll_speed(&self) -> f32 {
        BASE_SCROLL_SPEED + self.speed_level as f32 * SCROLL_SPEED_PER_LEVEL
    }

    /// Width for the next spawned platform
    pub fn platform_width(&self, world: &GameWorld) -> f32 {
        (world.base_platform_width * self.platform_reduction_ratio)
            .floor()
            .max(world.min_platform_width)
    }
}

/// `floor(combo ^ 1.5)`
pub fn combo_points(combo: u32) -> u64 {
    (combo as f64).powf(COMBO_EXPONENT).floor() as u64
}

/// Light radius for a combo size
pub fn light_radius(combo: u32) -> f32 {
    BASE_LIGHT_RADIUS + combo as f32 * LIGHT_RADIUS_PER_COMBO
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn test_combo_sequence_resolves_on_small_jump() {
        let mut state = GameState::new();
        let mut events = Vec::new();

        state.on_landing(3, 100.0, &mut events);
        assert_eq!(state.combo, 3);
        state.on_landing(2, 200.0, &mut events);
        assert_eq!(state.combo, 5);
        assert_eq!(state.combo_start_ms, 200.0);
        assert_eq!(state.score, 0);

        state.on_landing(1, 300.0, &mut events);
        assert_eq!(state.combo, 0);
        assert_eq!(state.score, 11);
        assert_eq!(
            events.last(),
            Some(&GameEvent::ComboResolved {
                combo: 5,
                points: 11,
                timed_out: false
            })
        );
    }

    #[test]
    fn test_negative_jump_resolves_combo() {
        let mut state = GameState::new();
        let mut events = Vec::new();
        state.on_landing(4, 0.0, &mut events);
        state.on_landing(-2, 10.0, &mut events);
        assert_eq!(state.combo, 0);
        assert_eq!(state.score, 8);
    }

    #[test]
    fn test_small_jump_without_combo_is_noop() {
        let mut state = GameState::new();
        let mut events = Vec::new();
        state.on_landing(1, 0.0, &mut events);
        state.on_landing(0, 0.0, &mut events);
        assert_eq!(state, GameState::new());
        assert!(events.is_empty());
    }

    #[test]
    fn test_combo_timeout() {
        let mut state = GameState::new();
        let mut events = Vec::new();
        state.on_landing(2, 1000.0, &mut events);
        state.expire_combo(3999.0, 3000.0, &mut events);
        assert_eq!(state.combo, 2);
        state.expire_combo(4000.0, 3000.0, &mut events);
        assert_eq!(state.combo, 0);
        assert_eq!(state.score, 2);
        assert!(matches!(
            events.last(),
            Some(GameEvent::ComboResolved { timed_out: true, .. })
        ));
    }

    #[test]
    fn test_floor_score_uses_high_water_mark() {
        let mut state = GameState::new();
        let mut events = Vec::new();
        assert_eq!(state.record_floor(3, &mut events), 30);
        assert_eq!(state.record_floor(2, &mut events), 0);
        assert_eq!(state.record_floor(3, &mut events), 0);
        assert_eq!(state.record_floor(5, &mut events), 20);
        assert_eq!(state.score, 50);
    }

    #[test]
    fn test_dark_mode_cycle() {
        let mut state = GameState::new();
        let mut events = Vec::new();
        state.roll_dark_mode(0.5, 0.05, 0.0, &mut events);
        assert!(!state.dark_mode);
        state.roll_dark_mode(0.01, 0.05, 100.0, &mut events);
        assert!(state.dark_mode);
        // Already on: a second roll does not restart the timer
        state.roll_dark_mode(0.0, 0.05, 5000.0, &mut events);
        assert_eq!(state.dark_mode_start_ms, 100.0);

        state.combo = 4;
        state.update_dark_mode(10_100.0, 10_000.0, &mut events);
        assert!(state.dark_mode);
        assert_eq!(state.light_radius, 120.0);
        state.update_dark_mode(10_101.0, 10_000.0, &mut events);
        assert!(!state.dark_mode);
        assert_eq!(events, vec![GameEvent::DarkModeStarted, GameEvent::DarkModeEnded]);
    }

    #[test]
    fn test_difficulty_ramp() {
        let world = Settings::default().world;
        let mut state = GameState::new();

        // Below the scroll floor nothing happens
        assert_eq!(state.ramp_difficulty(60_000.0, 4, &world), None);
        // Interval not yet passed
        assert_eq!(state.ramp_difficulty(30_000.0, 5, &world), None);
        assert_eq!(state.ramp_difficulty(30_001.0, 5, &world), Some(1));
        assert!((state.platform_reduction_ratio - 0.95).abs() < 1e-6);
        assert_eq!(state.ramp_difficulty(45_000.0, 6, &world), None);
        assert_eq!(state.ramp_difficulty(60_002.0, 6, &world), Some(2));
        assert_eq!(state.scroll_speed(), 1.5);
    }

    #[test]
    fn test_difficulty_caps() {
        let world = Settings::default().world;
        let mut state = GameState::new();
        let mut now = 0.0;
        for _ in 0..100 {
            now += 31_000.0;
            state.ramp_difficulty(now, 10, &world);
        }
        assert_eq!(state.speed_level, world.max_speed_level);
        assert!(state.platform_width(&world) >= world.min_platform_width);
    }

    #[test]
    fn test_platform_width_floors_at_minimum() {
        let world = Settings::default().world;
        let mut state = GameState::new();
        assert_eq!(state.platform_width(&world), 200.0);
        state.platform_reduction_ratio = 0.01;
        assert_eq!(state.platform_width(&world), world.min_platform_width);
    }

    #[test]
    fn test_combo_points() {
        assert_eq!(combo_points(0), 0);
        assert_eq!(combo_points(4), 8);
        assert_eq!(combo_points(5), 11);
    }

    #[test]
    fn test_rect_overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_arena_ids_and_prune() {
        let mut arena = PlatformArena::new();
        let a = arena.insert(Rect::new(0.0, 100.0, 50.0, 10.0), ColorTag::Red, 0).id;
        let b = arena.insert(Rect::new(0.0, 20.0, 50.0, 10.0), ColorTag::Blue, 1).id;
        let c = arena.insert(Rect::new(0.0, 60.0, 50.0, 10.0), ColorTag::Red, 2).id;
        assert!(a < b && b < c);
        assert_eq!(arena.highest().map(|p| p.id), Some(b));

        assert_eq!(arena.retain(|p| p.rect.y < 80.0), 1);
        assert!(arena.get(a).is_none());
        assert_eq!(arena.get(c).map(|p| p.floor), Some(2));
        let d = arena.insert(Rect::default(), ColorTag::Blue, 3).id;
        assert!(d > c);
    }

    #[test]
    fn test_platform_shake_then_fall() {
        let mut arena = PlatformArena::new();
        let id = arena.insert(Rect::new(0.0, 0.0, 50.0, 10.0), ColorTag::Red, 1).id;
        let platform = arena.get_mut(id).unwrap();

        platform.start_shaking(100.0);
        platform.update(3.0); // 50 ms
        assert!(matches!(platform.state, PlatformState::Shaking { .. }));
        platform.update(3.0);
        assert_eq!(
            platform.state,
            PlatformState::Falling {
                speed: PLATFORM_FALL_START_SPEED
            }
        );
        assert_eq!(platform.rect.y, 0.0);

        platform.update(1.0);
        platform.update(1.0);
        assert!(platform.rect.y > 2.0 * PLATFORM_FALL_START_SPEED);
    }
}
