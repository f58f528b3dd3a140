//! Timer-driven spawn scheduling
//!
//! One accumulator per entity kind. Each tick adds dt; every full interval
//! in the accumulator fires one spawn and keeps the remainder.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::EntityKind;
use crate::tuning::{ScreenTuning, SpawnTuning, Tuning};

/// A spawn the scheduler wants placed this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub kind: EntityKind,
    /// Start point just above the top edge
    pub from: Vec2,
    /// Landing point, bottom of the sprite on the ground line
    pub to: Vec2,
    pub fall_secs: f32,
}

/// Accumulator for one entity kind
#[derive(Debug, Clone)]
pub struct SpawnTimer {
    pub kind: EntityKind,
    curve: SpawnTuning,
    /// Current seconds between spawns
    pub interval: f32,
    /// Seconds accumulated toward the next spawn, never negative
    pub elapsed: f32,
    /// Current seconds to fall from top to ground
    pub fall_secs: f32,
    tier: u32,
}

impl SpawnTimer {
    pub fn new(kind: EntityKind, curve: SpawnTuning) -> Self {
        let mut timer = Self {
            kind,
            curve,
            interval: curve.initial_interval,
            elapsed: 0.0,
            fall_secs: curve.initial_fall_secs,
            tier: 0,
        };
        timer.reset();
        timer
    }

    /// Back to tier 0 with the configured head start
    pub fn reset(&mut self) {
        self.tier = 0;
        self.interval = self.curve.interval_for_tier(0);
        self.fall_secs = self.curve.fall_secs_for_tier(0);
        self.elapsed = self.interval * self.curve.initial_timer_fraction;
    }

    pub fn tier(&self) -> u32 {
        self.tier
    }

    /// Recompute interval and fall time for a difficulty tier
    pub fn set_tier(&mut self, tier: u32) {
        self.tier = tier;
        self.interval = self.curve.interval_for_tier(tier);
        self.fall_secs = self.curve.fall_secs_for_tier(tier);
    }

    /// Accumulate dt and return how many spawns fired. Runs in constant time
    /// however large dt is; the count saturates at `u32::MAX`.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.elapsed += dt;
        if self.elapsed < self.interval {
            return 0;
        }
        let fired = (self.elapsed / self.interval).floor() as u32;
        self.elapsed = self.elapsed.rem_euclid(self.interval);
        if !self.elapsed.is_finite() {
            self.elapsed = 0.0;
        }
        fired
    }
}

/// Spawn timers for both kinds plus the seeded RNG that places spawns
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    pub meteor: SpawnTimer,
    pub pickup: SpawnTimer,
    screen: ScreenTuning,
    meteor_radius: f32,
    pickup_radius: f32,
    /// Most requests per kind in one tick; more could never be placed
    meteor_cap: u32,
    pickup_cap: u32,
    rng: Pcg32,
}

impl SpawnScheduler {
    pub fn new(tuning: &Tuning, seed: u64) -> Self {
        Self {
            meteor: SpawnTimer::new(EntityKind::Meteor, tuning.meteor),
            pickup: SpawnTimer::new(EntityKind::Pickup, tuning.pickup),
            screen: tuning.screen,
            meteor_radius: tuning.entities.meteor_radius,
            pickup_radius: tuning.entities.pickup_radius,
            meteor_cap: u32::try_from(tuning.meteor_pool).unwrap_or(u32::MAX),
            pickup_cap: u32::try_from(tuning.pickup_pool).unwrap_or(u32::MAX),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn reset(&mut self) {
        self.meteor.reset();
        self.pickup.reset();
    }

    pub fn set_tier(&mut self, tier: u32) {
        self.meteor.set_tier(tier);
        self.pickup.set_tier(tier);
        log::debug!(
            "Tier {}: meteor every {:.2}s falling {:.1}s, pickup every {:.1}s falling {:.1}s",
            tier,
            self.meteor.interval,
            self.meteor.fall_secs,
            self.pickup.interval,
            self.pickup.fall_secs
        );
    }

    /// Advance both timers, appending one request per fired spawn, at most a
    /// pool's worth per kind
    pub fn advance(&mut self, dt: f32, out: &mut Vec<SpawnRequest>) {
        let meteors = capped(self.meteor.advance(dt), self.meteor_cap, EntityKind::Meteor);
        for _ in 0..meteors {
            let request = self.request(EntityKind::Meteor, self.meteor.fall_secs);
            out.push(request);
        }
        let pickups = capped(self.pickup.advance(dt), self.pickup_cap, EntityKind::Pickup);
        for _ in 0..pickups {
            let request = self.request(EntityKind::Pickup, self.pickup.fall_secs);
            out.push(request);
        }
    }

    fn request(&mut self, kind: EntityKind, fall_secs: f32) -> SpawnRequest {
        let radius = match kind {
            EntityKind::Meteor => self.meteor_radius,
            EntityKind::Pickup => self.pickup_radius,
        };
        let min_x = self.screen.width * self.screen.spawn_min_x;
        let max_x = self.screen.width * self.screen.spawn_max_x;
        let start_x = self.rng.random_range(min_x..max_x);
        let target_x = self.rng.random_range(min_x..max_x);

        SpawnRequest {
            kind,
            from: Vec2::new(start_x, self.screen.height + radius),
            to: Vec2::new(target_x, self.screen.ground_y() + radius),
            fall_secs,
        }
    }
}

fn capped(fired: u32, cap: u32, kind: EntityKind) -> u32 {
    if fired > cap {
        log::debug!("Dropping {} {} spawns beyond pool capacity", fired - cap, kind.as_str());
    }
    fired.min(cap)
}
