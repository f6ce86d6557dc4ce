//! Climb Curves - small deterministic simulation cores
//!
//! Core modules:
//! - `spline`: Uniform cubic B-spline evaluation and path animation
//! - `sim`: Vertical platformer (physics, collisions, scoring, difficulty)
//! - `snow`: 2D snowfall particles with pointer wind
//! - `assets`: OBJ import for control points and meshes
//! - `settings`: Typed platformer configuration
//!
//! Nothing here draws. Renderers read the public state after each tick.

pub mod assets;
pub mod settings;
pub mod sim;
pub mod snow;
pub mod spline;

pub use assets::{AssetError, Mesh};
pub use settings::{Settings, SettingsError};

/// Simulation constants that are not part of the settings file
pub mod consts {
    /// Milliseconds in one 60 fps frame; `dt == 1.0` is one such frame
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Parameter samples per curve segment
    pub const SAMPLES_PER_SEGMENT: usize = 20;

    /// Vertical speed at which the player starts spinning
    pub const ROTATION_TRIGGER_SPEED: f32 = 15.0;
    /// Spin rate (degrees per frame)
    pub const ROTATION_RATE: f32 = 10.0;
    /// Horizontal velocity kept (and inverted) on wall contact
    pub const WALL_RESTITUTION: f32 = 0.9;
    /// Horizontal speed the player drifts at in air without input
    pub const AIR_DRIFT_SPEED: f32 = 1.0;
    /// Fraction of ground acceleration available in air
    pub const AIR_CONTROL: f32 = 0.5;
    /// Extra slack (px) on top of one frame's fall for landing detection
    pub const LANDING_TOLERANCE: f32 = 1.0;
    /// Trail tint fade progress per frame
    pub const TINT_FADE_RATE: f32 = 0.01;

    /// Smallest floor jump that feeds a combo
    pub const COMBO_MIN_JUMP: i32 = 2;
    /// Combo payout is `floor(combo ^ COMBO_EXPONENT)`
    pub const COMBO_EXPONENT: f64 = 1.5;
    /// Score per new floor reached
    pub const POINTS_PER_FLOOR: u64 = 10;

    /// Dark mode light radius with no combo
    pub const BASE_LIGHT_RADIUS: f32 = 100.0;
    pub const LIGHT_RADIUS_PER_COMBO: f32 = 5.0;

    /// Floor from which the camera scrolls on its own
    pub const SCROLL_START_FLOOR: u32 = 5;
    pub const BASE_SCROLL_SPEED: f32 = 0.5;
    pub const SCROLL_SPEED_PER_LEVEL: f32 = 0.5;

    /// Ground platform top sits this far above the bottom of the screen
    pub const GROUND_OFFSET: f32 = 50.0;
    /// Platforms stacked above the ground at start
    pub const INITIAL_PLATFORMS: u32 = 12;
    /// Extra random vertical gap between platforms (px, inclusive)
    pub const PLATFORM_SPACING_JITTER: u32 = 20;
    /// Platforms this far below the view are dropped
    pub const PRUNE_MARGIN: f32 = 100.0;
    /// The run ends when the player is this far below the view
    pub const GAME_OVER_MARGIN: f32 = 10.0;

    /// Initial fall speed of a platform after shaking
    pub const PLATFORM_FALL_START_SPEED: f32 = 3.0;
    pub const PLATFORM_FALL_ACCELERATION: f32 = 0.2;
}
