//! Game balance and layout constants
//!
//! `Tuning::default()` is the shipped balance. Hosts may load overrides from
//! JSON at startup; nothing here changes while a session runs.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SimError, SimResult};

/// Play area layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenTuning {
    pub width: f32,
    pub height: f32,
    /// Ground line as a fraction of height
    pub ground_fraction: f32,
    /// Horizontal spawn band as fractions of width
    pub spawn_min_x: f32,
    pub spawn_max_x: f32,
}

impl Default for ScreenTuning {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            ground_fraction: GROUND_FRACTION,
            spawn_min_x: 0.1,
            spawn_max_x: 0.9,
        }
    }
}

impl ScreenTuning {
    /// Y coordinate of the ground line
    pub fn ground_y(&self) -> f32 {
        self.height * self.ground_fraction
    }
}

/// Spawn timer curve for one entity kind
///
/// Interval and fall time both shrink by a fixed step per difficulty tier
/// until they hit their floors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnTuning {
    pub initial_interval: f32,
    pub interval_step: f32,
    pub min_interval: f32,
    /// Seconds to fall from the top to the ground
    pub initial_fall_secs: f32,
    pub fall_secs_step: f32,
    pub min_fall_secs: f32,
    /// Accumulator at session start, as a fraction of the interval
    pub initial_timer_fraction: f32,
}

impl SpawnTuning {
    pub fn meteor() -> Self {
        Self {
            initial_interval: 2.5,
            interval_step: 0.15,
            min_interval: 0.25,
            initial_fall_secs: 10.0,
            fall_secs_step: 1.0,
            min_fall_secs: 4.0,
            initial_timer_fraction: 0.99,
        }
    }

    pub fn pickup() -> Self {
        Self {
            initial_interval: 20.0,
            interval_step: 0.0,
            min_interval: 20.0,
            initial_fall_secs: 15.0,
            fall_secs_step: 1.0,
            min_fall_secs: 8.0,
            initial_timer_fraction: 0.0,
        }
    }

    pub fn interval_for_tier(&self, tier: u32) -> f32 {
        (self.initial_interval - self.interval_step * tier as f32).max(self.min_interval)
    }

    pub fn fall_secs_for_tier(&self, tier: u32) -> f32 {
        (self.initial_fall_secs - self.fall_secs_step * tier as f32).max(self.min_fall_secs)
    }

    fn validate(&self, name: &str) -> SimResult<()> {
        if !(self.min_interval > 0.0) || !(self.min_fall_secs > 0.0) {
            return Err(SimError::InvalidTuning(format!(
                "{name}: interval and fall time floors must be positive"
            )));
        }
        if self.min_interval > self.initial_interval || self.min_fall_secs > self.initial_fall_secs {
            return Err(SimError::InvalidTuning(format!(
                "{name}: floors must not exceed initial values"
            )));
        }
        if self.interval_step < 0.0 || self.fall_secs_step < 0.0 {
            return Err(SimError::InvalidTuning(format!(
                "{name}: difficulty steps must not be negative"
            )));
        }
        if !(0.0..1.0).contains(&self.initial_timer_fraction) {
            return Err(SimError::InvalidTuning(format!(
                "{name}: initial_timer_fraction must be in [0, 1)"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BombTuning {
    pub min_scale: f32,
    pub max_scale: f32,
    pub grow_secs: f32,
    pub armed_scale: f32,
    pub opacity: f32,
    pub spin_deg_per_sec: f32,
}

impl Default for BombTuning {
    fn default() -> Self {
        Self {
            min_scale: BOMB_MIN_SCALE,
            max_scale: BOMB_MAX_SCALE,
            grow_secs: BOMB_GROW_SECS,
            armed_scale: BOMB_ARMED_SCALE,
            opacity: BOMB_OPACITY,
            spin_deg_per_sec: BOMB_SPIN_DEG_PER_SEC,
        }
    }
}

impl BombTuning {
    /// Scale reached after `elapsed` seconds of growth
    pub fn scale_at(&self, elapsed: f32) -> f32 {
        let t = (elapsed / self.grow_secs).clamp(0.0, 1.0);
        self.min_scale + (self.max_scale - self.min_scale) * t
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShockwaveTuning {
    pub start_scale: f32,
    /// Final scale as a multiple of the bomb's scale at trigger time
    pub scale_factor: f32,
    pub expand_secs: f32,
    pub fade_secs: f32,
    pub base_radius: f32,
}

impl Default for ShockwaveTuning {
    fn default() -> Self {
        Self {
            start_scale: SHOCKWAVE_START_SCALE,
            scale_factor: SHOCKWAVE_SCALE_FACTOR,
            expand_secs: SHOCKWAVE_EXPAND_SECS,
            fade_secs: SHOCKWAVE_FADE_SECS,
            base_radius: SHOCKWAVE_BASE_RADIUS,
        }
    }
}

impl ShockwaveTuning {
    /// Time until the shockwave has finished both expanding and fading
    pub fn lifetime(&self) -> f32 {
        self.expand_secs.max(self.fade_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    pub max_energy: i32,
    pub meteor_penalty: i32,
    pub pickup_heal: i32,
    pub meteor_reward: u64,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            max_energy: MAX_ENERGY,
            meteor_penalty: METEOR_PENALTY,
            pickup_heal: PICKUP_HEAL,
            meteor_reward: METEOR_REWARD,
        }
    }
}

/// Falling entity look and feel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityTuning {
    pub meteor_radius: f32,
    pub pickup_radius: f32,
    pub meteor_spin_deg_per_sec: f32,
    /// Pickups swing between +/- this angle
    pub pickup_swing_deg: f32,
    pub pickup_swing_period: f32,
}

impl Default for EntityTuning {
    fn default() -> Self {
        Self {
            meteor_radius: METEOR_RADIUS,
            pickup_radius: PICKUP_RADIUS,
            meteor_spin_deg_per_sec: -180.0,
            pickup_swing_deg: 10.0,
            pickup_swing_period: 2.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTuning {
    pub explosion_secs: f32,
    pub explosion_frames: u32,
    pub ground_hit_secs: f32,
    pub ground_hit_frames: u32,
    /// Ground hit animation is lifted by this fraction of screen height
    pub ground_hit_lift: f32,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            explosion_secs: 0.5,
            explosion_frames: 8,
            ground_hit_secs: 1.0,
            ground_hit_frames: 10,
            ground_hit_lift: 0.12,
        }
    }
}

/// Complete set of startup constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub screen: ScreenTuning,
    pub meteor_pool: usize,
    pub pickup_pool: usize,
    pub meteor: SpawnTuning,
    pub pickup: SpawnTuning,
    /// Seconds of running time per difficulty tier
    pub difficulty_interval: f32,
    pub entities: EntityTuning,
    pub bomb: BombTuning,
    pub shockwave: ShockwaveTuning,
    pub scoring: ScoringTuning,
    pub effects: EffectTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen: ScreenTuning::default(),
            meteor_pool: METEOR_POOL_SIZE,
            pickup_pool: PICKUP_POOL_SIZE,
            meteor: SpawnTuning::meteor(),
            pickup: SpawnTuning::pickup(),
            difficulty_interval: 60.0,
            entities: EntityTuning::default(),
            bomb: BombTuning::default(),
            shockwave: ShockwaveTuning::default(),
            scoring: ScoringTuning::default(),
            effects: EffectTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse overrides from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> SimResult<Self> {
        let tuning: Self =
            serde_json::from_str(json).map_err(|e| SimError::TuningParse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> SimResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SimError::TuningParse(e.to_string()))
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> SimResult<()> {
        let invalid = |msg: &str| Err(SimError::InvalidTuning(msg.to_string()));

        if self.meteor_pool == 0 || self.pickup_pool == 0 {
            return invalid("pool sizes must be non-zero");
        }
        if !(self.screen.width > 0.0 && self.screen.height > 0.0) {
            return invalid("screen dimensions must be positive");
        }
        if !(0.0..1.0).contains(&self.screen.ground_fraction) {
            return invalid("ground_fraction must be in [0, 1)");
        }
        if !(self.screen.spawn_min_x < self.screen.spawn_max_x) {
            return invalid("spawn band is empty");
        }
        if !(self.difficulty_interval > 0.0) {
            return invalid("difficulty_interval must be positive");
        }
        self.meteor.validate("meteor")?;
        self.pickup.validate("pickup")?;

        let bomb = &self.bomb;
        if !(bomb.grow_secs > 0.0) || !(bomb.min_scale > 0.0) || bomb.min_scale >= bomb.max_scale {
            return invalid("bomb growth must be positive and increasing");
        }
        if !(bomb.min_scale..bomb.max_scale).contains(&bomb.armed_scale) {
            return invalid("armed_scale must lie within the bomb's growth range");
        }
        let wave = &self.shockwave;
        if !(wave.expand_secs > 0.0 && wave.fade_secs > 0.0 && wave.base_radius > 0.0) {
            return invalid("shockwave durations and radius must be positive");
        }
        let scoring = &self.scoring;
        if scoring.max_energy <= 0 || scoring.meteor_penalty < 0 || scoring.pickup_heal < 0 {
            return invalid("energy values must be non-negative with a positive maximum");
        }
        let fx = &self.effects;
        if !(fx.explosion_secs > 0.0 && fx.ground_hit_secs > 0.0) {
            return invalid("effect durations must be positive");
        }
        if fx.explosion_frames == 0 || fx.ground_hit_frames == 0 {
            return invalid("effects need at least one frame");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_difficulty_curve_is_monotonic_with_floor() {
        let meteor = SpawnTuning::meteor();
        let mut last_interval = f32::MAX;
        let mut last_fall = f32::MAX;
        for tier in 0..100 {
            let interval = meteor.interval_for_tier(tier);
            let fall = meteor.fall_secs_for_tier(tier);
            assert!(interval <= last_interval);
            assert!(fall <= last_fall);
            assert!(interval >= meteor.min_interval);
            assert!(fall >= meteor.min_fall_secs);
            last_interval = interval;
            last_fall = fall;
        }
        assert_eq!(meteor.interval_for_tier(99), 0.25);
        assert_eq!(meteor.fall_secs_for_tier(99), 4.0);
    }

    #[test]
    fn test_bomb_scale_curve() {
        let bomb = BombTuning::default();
        assert!((bomb.scale_at(0.0) - 0.1).abs() < 1e-6);
        assert!((bomb.scale_at(2.0) - 0.4).abs() < 1e-6);
        assert!((bomb.scale_at(6.0) - 1.0).abs() < 1e-6);
        assert!((bomb.scale_at(60.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "meteor_pool": 10, "difficulty_interval": 30.0 }"#)
            .expect("valid tuning");
        assert_eq!(tuning.meteor_pool, 10);
        assert_eq!(tuning.difficulty_interval, 30.0);
        assert_eq!(tuning.pickup_pool, PICKUP_POOL_SIZE);
        assert_eq!(tuning.bomb, BombTuning::default());
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = Tuning::default();
        let json = tuning.to_json().expect("serializes");
        assert_eq!(Tuning::from_json(&json).expect("parses"), tuning);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "meteor_pool": 0 }"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidTuning(_)));

        let err = Tuning::from_json(r#"{ "bomb": { "armed_scale": 2.0 } }"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidTuning(_)));

        let err = Tuning::from_json("not json").unwrap_err();
        assert!(matches!(err, SimError::TuningParse(_)));
    }
}
