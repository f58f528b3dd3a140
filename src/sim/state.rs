//! Game state and core simulation types
//!
//! `GameState` is the whole session context: pools, timers, bomb, effects and
//! counters. It is passed explicitly into `tick`, so tests can build one
//! without any scene.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bomb::BombController;
use super::collision::Hit;
use super::effects::{EffectKind, Effects};
use super::falling::FallingEntitySimulator;
use super::pool::{EntityPool, Poolable, SlotId};
use super::spawn::{SpawnRequest, SpawnScheduler};
use crate::error::SimResult;
use crate::renderer::{SpriteKind, VisualAllocator, VisualHandle};
use crate::tuning::Tuning;

/// Which pool a falling entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Hazard: damages energy when it reaches the ground
    Meteor,
    /// Health pickup: heals when caught by a shockwave
    Pickup,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Meteor => "meteor",
            EntityKind::Pickup => "pickup",
        }
    }
}

/// A pooled falling object
#[derive(Debug, Clone)]
pub struct FallingEntity {
    pub kind: EntityKind,
    pub visual: VisualHandle,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Length of `vel`
    pub speed: f32,
    /// Half-extent of the sprite
    pub radius: f32,
    /// Degrees
    pub rotation: f32,
    /// Seconds since spawn
    pub age: f32,
}

impl FallingEntity {
    pub fn new(kind: EntityKind, visual: VisualHandle, radius: f32) -> Self {
        Self {
            kind,
            visual,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            speed: 0.0,
            radius,
            rotation: 0.0,
            age: 0.0,
        }
    }

    /// Start a straight fall from `from` to `to` lasting `fall_secs`
    pub fn launch(&mut self, from: Vec2, to: Vec2, fall_secs: f32) {
        self.pos = from;
        self.vel = (to - from) / fall_secs;
        self.speed = self.vel.length();
        self.rotation = 0.0;
        self.age = 0.0;
    }

    /// Lowest point of the sprite
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y - self.radius
    }
}

impl Poolable for FallingEntity {
    fn reset(&mut self) {
        self.pos = Vec2::ZERO;
        self.vel = Vec2::ZERO;
        self.speed = 0.0;
        self.rotation = 0.0;
        self.age = 0.0;
    }
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first tap; nothing advances
    Idle,
    /// All subsystems advance each tick
    Running,
    /// Energy ran out; waiting for a tap to reset
    GameOver,
}

/// Full-screen message currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Overlay {
    None,
    Intro,
    GameOver,
}

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Game core created; background music starts
    Booted,
    OverlayDismissed { overlay: Overlay },
    SessionStarted,
    DifficultyRaised { tier: u32 },
    Spawned { kind: EntityKind, slot: SlotId },
    /// Pool exhausted, spawn skipped
    SpawnSkipped { kind: EntityKind },
    MeteorMissed { slot: SlotId, pos: Vec2, energy: i32 },
    PickupExpired { slot: SlotId },
    BombPlaced { pos: Vec2 },
    BombReleased { pos: Vec2, target_scale: f32 },
    BombFailed { pos: Vec2, scale: f32 },
    MeteorDestroyed { slot: SlotId, pos: Vec2, score: u64 },
    PickupCollected { slot: SlotId, pos: Vec2, energy: i32 },
    /// Shockwave finished expanding and fading
    ShockwaveDone { hits: u32 },
    AnimationDone { kind: EffectKind, slot: SlotId },
    GameOver { score: u64, survived_secs: f32 },
}

/// Score, energy and lifecycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub score: u64,
    pub energy: i32,
    pub phase: GamePhase,
    pub overlay: Overlay,
    /// Running time of the current session, seconds
    pub elapsed: f32,
    max_energy: i32,
    difficulty_interval: f32,
}

impl GameSession {
    pub fn new(max_energy: i32, difficulty_interval: f32) -> Self {
        Self {
            score: 0,
            energy: max_energy,
            phase: GamePhase::Idle,
            overlay: Overlay::Intro,
            elapsed: 0.0,
            max_energy,
            difficulty_interval,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn max_energy(&self) -> i32 {
        self.max_energy
    }

    /// Fresh session: full energy, zero score, clock at zero
    pub fn start(&mut self) {
        self.score = 0;
        self.energy = self.max_energy;
        self.elapsed = 0.0;
        self.overlay = Overlay::None;
        self.phase = GamePhase::Running;
    }

    /// Difficulty tier derived from running time
    pub fn tier(&self) -> u32 {
        (self.elapsed / self.difficulty_interval) as u32
    }

    /// Advance the running clock; returns the new tier when it changes
    pub fn advance_clock(&mut self, dt: f32) -> Option<u32> {
        if !self.is_running() {
            return None;
        }
        let before = self.tier();
        self.elapsed += dt;
        let after = self.tier();
        (after != before).then_some(after)
    }

    pub fn add_score(&mut self, points: u64) {
        if self.is_running() {
            self.score = self.score.saturating_add(points);
        }
    }

    pub fn heal(&mut self, amount: i32) {
        if self.is_running() {
            self.energy = (self.energy + amount).clamp(0, self.max_energy);
        }
    }

    /// Drain energy. Returns true when this call ended the session.
    pub fn damage(&mut self, amount: i32) -> bool {
        if !self.is_running() {
            return false;
        }
        self.energy = (self.energy - amount).clamp(0, self.max_energy);
        if self.energy == 0 {
            self.phase = GamePhase::GameOver;
            self.overlay = Overlay::GameOver;
            return true;
        }
        false
    }
}

/// Complete game context
#[derive(Debug)]
pub struct GameState {
    pub seed: u64,
    pub tuning: Tuning,
    pub session: GameSession,
    pub meteors: EntityPool<FallingEntity>,
    pub pickups: EntityPool<FallingEntity>,
    pub scheduler: SpawnScheduler,
    pub falling: FallingEntitySimulator,
    pub bomb: BombController,
    pub effects: Effects,
    pub intro_visual: VisualHandle,
    pub game_over_visual: VisualHandle,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    pub(crate) spawn_buf: Vec<SpawnRequest>,
    pub(crate) hit_buf: Vec<Hit>,
    pub(crate) landed_buf: Vec<(SlotId, Vec2)>,
    pub(crate) done_buf: Vec<(SlotId, EffectKind)>,
    visual_count: u32,
}

impl GameState {
    /// Create a game with the default balance
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    /// Create a game with custom tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> SimResult<Self> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        let mut visuals = VisualAllocator::new();

        let intro_visual = visuals.allocate(SpriteKind::IntroMessage);
        let game_over_visual = visuals.allocate(SpriteKind::GameOverMessage);
        let bomb = BombController::new(&tuning, &mut visuals);

        let meteor_radius = tuning.entities.meteor_radius;
        let meteors = EntityPool::new(EntityKind::Meteor.as_str(), tuning.meteor_pool, |_| {
            let visual = visuals.allocate(SpriteKind::Meteor);
            FallingEntity::new(EntityKind::Meteor, visual, meteor_radius)
        });
        let pickup_radius = tuning.entities.pickup_radius;
        let pickups = EntityPool::new(EntityKind::Pickup.as_str(), tuning.pickup_pool, |_| {
            let visual = visuals.allocate(SpriteKind::Health);
            FallingEntity::new(EntityKind::Pickup, visual, pickup_radius)
        });
        // One effect per meteor is the most that can be in flight
        let effects = Effects::new(&tuning, tuning.meteor_pool, &mut visuals);

        let capacity = tuning.meteor_pool + tuning.pickup_pool;
        let mut state = Self {
            seed,
            session: GameSession::new(tuning.scoring.max_energy, tuning.difficulty_interval),
            scheduler: SpawnScheduler::new(&tuning, seed),
            falling: FallingEntitySimulator::new(&tuning),
            meteors,
            pickups,
            bomb,
            effects,
            intro_visual,
            game_over_visual,
            time_ticks: 0,
            events: Vec::with_capacity(64),
            spawn_buf: Vec::with_capacity(8),
            hit_buf: Vec::with_capacity(capacity),
            landed_buf: Vec::with_capacity(capacity),
            done_buf: Vec::with_capacity(tuning.meteor_pool),
            visual_count: visuals.count(),
            tuning,
        };

        log::info!(
            "Game core ready: seed={}, {} meteor slots, {} pickup slots, {} visuals",
            seed,
            state.meteors.capacity(),
            state.pickups.capacity(),
            state.visual_count
        );
        state.events.push(GameEvent::Booted);
        state
    }

    /// Total number of visual handles owned by this game
    pub fn visual_count(&self) -> u32 {
        self.visual_count
    }

    pub fn pool(&self, kind: EntityKind) -> &EntityPool<FallingEntity> {
        match kind {
            EntityKind::Meteor => &self.meteors,
            EntityKind::Pickup => &self.pickups,
        }
    }

    pub fn pool_mut(&mut self, kind: EntityKind) -> &mut EntityPool<FallingEntity> {
        match kind {
            EntityKind::Meteor => &mut self.meteors,
            EntityKind::Pickup => &mut self.pickups,
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Reset everything for a new run and enter Running
    pub fn start_session(&mut self) {
        self.bomb.cancel();
        self.effects.clear();
        self.meteors.release_all();
        self.pickups.release_all();
        self.scheduler.reset();
        self.session.start();
        log::info!("Session started");
        self.events.push(GameEvent::SessionStarted);
    }

    /// Enter GameOver: cancel bomb animations and clear the sky
    pub(crate) fn end_session(&mut self) {
        self.bomb.cancel();
        let cleared = self.meteors.release_all() + self.pickups.release_all();
        log::info!(
            "Game over: score={}, survived {:.1}s, cleared {} entities",
            self.session.score,
            self.session.elapsed,
            cleared
        );
        self.events.push(GameEvent::GameOver {
            score: self.session.score,
            survived_secs: self.session.elapsed,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle_with_intro() {
        let state = GameState::new(7);
        assert_eq!(state.session.phase, GamePhase::Idle);
        assert_eq!(state.session.overlay, Overlay::Intro);
        assert_eq!(state.session.energy, 100);
        assert_eq!(state.meteors.capacity(), 50);
        assert_eq!(state.pickups.capacity(), 20);
        assert_eq!(state.events, vec![GameEvent::Booted]);
    }

    #[test]
    fn test_visual_handles_are_unique() {
        let state = GameState::new(7);
        let mut ids: Vec<u32> = state
            .meteors
            .iter_slots()
            .chain(state.pickups.iter_slots())
            .map(|(_, _, e)| e.visual.id)
            .collect();
        ids.push(state.intro_visual.id);
        ids.push(state.game_over_visual.id);
        let count = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), count);
        assert!(state.visual_count() as usize >= count);
    }

    #[test]
    fn test_damage_clamps_and_ends_once() {
        let mut session = GameSession::new(100, 60.0);
        session.start();
        assert!(!session.damage(60));
        assert_eq!(session.energy, 40);
        assert!(session.damage(60));
        assert_eq!(session.energy, 0);
        assert_eq!(session.phase, GamePhase::GameOver);
        // Already over: no second transition
        assert!(!session.damage(10));
        assert_eq!(session.energy, 0);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut session = GameSession::new(100, 60.0);
        session.start();
        session.damage(10);
        session.heal(25);
        assert_eq!(session.energy, 100);
    }

    #[test]
    fn test_tier_follows_running_clock() {
        let mut session = GameSession::new(100, 60.0);
        assert_eq!(session.advance_clock(100.0), None);
        session.start();
        assert_eq!(session.advance_clock(59.0), None);
        assert_eq!(session.advance_clock(2.0), Some(1));
        assert_eq!(session.advance_clock(125.0), Some(3));
        assert_eq!(session.tier(), 3);
    }

    #[test]
    fn test_score_only_counts_while_running() {
        let mut session = GameSession::new(100, 60.0);
        session.add_score(13);
        assert_eq!(session.score, 0);
        session.start();
        session.add_score(13);
        assert_eq!(session.score, 13);
    }

    #[test]
    fn test_custom_tuning_is_validated() {
        let mut tuning = Tuning::default();
        tuning.pickup_pool = 0;
        assert!(GameState::with_tuning(1, tuning).is_err());

        let mut tuning = Tuning::default();
        tuning.meteor_pool = 5;
        let state = GameState::with_tuning(1, tuning).expect("valid tuning");
        assert_eq!(state.meteors.capacity(), 5);
    }
}
