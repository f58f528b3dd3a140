//! Sky Defense - a single-screen tap-to-detonate arcade game
//!
//! Core modules:
//! - `sim`: Simulation core (pools, spawning, bombs, shockwaves, session state)
//! - `renderer`: Render command stream for an external scene graph
//! - `audio`: Fire-and-forget sound cues
//! - `platform`: Input delivery (taps)
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use error::{SimError, SimResult};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Design resolution (portrait)
    pub const SCREEN_WIDTH: f32 = 768.0;
    pub const SCREEN_HEIGHT: f32 = 1024.0;
    /// Ground line as a fraction of screen height
    pub const GROUND_FRACTION: f32 = 0.15;

    /// Pool capacities
    pub const METEOR_POOL_SIZE: usize = 50;
    pub const PICKUP_POOL_SIZE: usize = 20;

    /// Energy meter
    pub const MAX_ENERGY: i32 = 100;
    pub const METEOR_PENALTY: i32 = 15;
    pub const PICKUP_HEAL: i32 = 25;
    pub const METEOR_REWARD: u64 = 13;

    /// Bomb growth: scale 0.1 -> 1.0 over 6 seconds
    pub const BOMB_MIN_SCALE: f32 = 0.1;
    pub const BOMB_MAX_SCALE: f32 = 1.0;
    pub const BOMB_GROW_SECS: f32 = 6.0;
    /// Minimum bomb scale for a successful detonation
    pub const BOMB_ARMED_SCALE: f32 = 0.3;
    /// Opacity of a freshly placed bomb (50 / 255)
    pub const BOMB_OPACITY: f32 = 50.0 / 255.0;
    /// Halo/sparkle spin, degrees per second (-90 every 0.5s)
    pub const BOMB_SPIN_DEG_PER_SEC: f32 = -180.0;

    /// Shockwave
    pub const SHOCKWAVE_START_SCALE: f32 = 0.1;
    pub const SHOCKWAVE_SCALE_FACTOR: f32 = 2.0;
    pub const SHOCKWAVE_EXPAND_SECS: f32 = 0.5;
    pub const SHOCKWAVE_FADE_SECS: f32 = 1.0;
    /// Shockwave radius at scale 1.0, world units
    pub const SHOCKWAVE_BASE_RADIUS: f32 = 120.0;

    /// Half-extent of meteor and pickup sprites
    pub const METEOR_RADIUS: f32 = 28.0;
    pub const PICKUP_RADIUS: f32 = 24.0;
}
