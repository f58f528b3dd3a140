//! Per-frame simulation tick
//!
//! Single entry point that advances every subsystem in a fixed order:
//! spawn, fall, ground penalties, bomb/shockwave, collision, effects.

use glam::Vec2;

use super::bomb::{BombState, Detonation, TapOutcome};
use super::collision::resolve_shockwave;
use super::effects::EffectKind;
use super::state::{EntityKind, GameEvent, GamePhase, GameState, Overlay};

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tap position in world coordinates (first touch only)
    pub tap: Option<Vec2>,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

/// Bomb scale the autopilot waits for before detonating
const AUTOPILOT_TRIGGER_SCALE: f32 = 0.55;
/// How far ahead the autopilot leads a falling meteor, seconds
const AUTOPILOT_LEAD_SECS: f32 = 2.8;

/// Advance the game by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // A stalled frame just means a bigger step; garbage means no step
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    state.time_ticks += 1;

    let tap = match input.tap {
        Some(pos) => Some(pos),
        None if input.idle_mode => autopilot(state),
        None => None,
    };
    if let Some(pos) = tap {
        handle_tap(state, pos);
    }

    advance_effects(state, dt);

    if !state.session.is_running() {
        return;
    }

    if let Some(tier) = state.session.advance_clock(dt) {
        state.scheduler.set_tier(tier);
        log::info!("Difficulty raised to tier {}", tier);
        state.events.push(GameEvent::DifficultyRaised { tier });
    }

    spawn_entities(state, dt);

    if advance_falling(state, dt) {
        return;
    }

    if let Some(hits) = state.bomb.advance(dt) {
        state.events.push(GameEvent::ShockwaveDone { hits });
    }

    resolve_shockwave(state);
}

/// Route a tap: outside a run it dismisses the overlay and starts a new
/// session; during a run it places or detonates the bomb.
pub fn handle_tap(state: &mut GameState, pos: Vec2) {
    match state.session.phase {
        GamePhase::Idle | GamePhase::GameOver => {
            let overlay = state.session.overlay;
            if overlay != Overlay::None {
                state.events.push(GameEvent::OverlayDismissed { overlay });
            }
            state.start_session();
        }
        GamePhase::Running => match state.bomb.tap(pos) {
            TapOutcome::Placed { pos } => {
                log::trace!("Bomb placed at ({:.0}, {:.0})", pos.x, pos.y);
                state.events.push(GameEvent::BombPlaced { pos });
            }
            TapOutcome::Detonated(Detonation::Released { pos, target_scale }) => {
                state.events.push(GameEvent::BombReleased { pos, target_scale });
            }
            TapOutcome::Detonated(Detonation::Failed { pos, scale }) => {
                state.events.push(GameEvent::BombFailed { pos, scale });
            }
            TapOutcome::Ignored => log::trace!("Tap ignored by bomb"),
        },
    }
}

fn spawn_entities(state: &mut GameState, dt: f32) {
    let mut requests = std::mem::take(&mut state.spawn_buf);
    requests.clear();
    state.scheduler.advance(dt, &mut requests);

    for request in &requests {
        match state.pool_mut(request.kind).acquire() {
            Ok((slot, entity)) => {
                entity.launch(request.from, request.to, request.fall_secs);
                state.events.push(GameEvent::Spawned {
                    kind: request.kind,
                    slot,
                });
            }
            Err(err) => {
                log::debug!("Spawn skipped: {}", err);
                state.events.push(GameEvent::SpawnSkipped { kind: request.kind });
            }
        }
    }

    state.spawn_buf = requests;
}

/// Move everything down and apply ground penalties. Returns true if the
/// session ended this tick.
fn advance_falling(state: &mut GameState, dt: f32) -> bool {
    let mut landed = std::mem::take(&mut state.landed_buf);
    landed.clear();
    state.falling.advance(&mut state.meteors, dt, &mut landed);
    let meteor_count = landed.len();
    state.falling.advance(&mut state.pickups, dt, &mut landed);

    let penalty = state.tuning.scoring.meteor_penalty;
    let mut ended = false;
    for (i, &(slot, pos)) in landed.iter().enumerate() {
        if i < meteor_count {
            state.effects.spawn(EffectKind::GroundHit, pos);
            ended |= state.session.damage(penalty);
            state.events.push(GameEvent::MeteorMissed {
                slot,
                pos,
                energy: state.session.energy,
            });
        } else {
            state.events.push(GameEvent::PickupExpired { slot });
        }
    }
    state.landed_buf = landed;

    if ended {
        state.end_session();
    }
    ended
}

fn advance_effects(state: &mut GameState, dt: f32) {
    let mut done = std::mem::take(&mut state.done_buf);
    done.clear();
    state.effects.advance(dt, &mut done);
    for &(slot, kind) in &done {
        state.events.push(GameEvent::AnimationDone { kind, slot });
    }
    state.done_buf = done;
}

/// Pick a tap for idle mode: start a run, bomb the lowest meteor, detonate
/// once the bomb has grown enough.
fn autopilot(state: &GameState) -> Option<Vec2> {
    match state.session.phase {
        GamePhase::Idle | GamePhase::GameOver => {
            let screen = &state.tuning.screen;
            Some(Vec2::new(screen.width * 0.5, screen.height * 0.5))
        }
        GamePhase::Running => match state.bomb.state() {
            BombState::Inactive => state
                .meteors
                .iter_active()
                .map(|(_, meteor)| meteor)
                .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .map(|meteor| meteor.pos + meteor.vel * AUTOPILOT_LEAD_SECS),
            BombState::Growing if state.bomb.bomb.scale >= AUTOPILOT_TRIGGER_SCALE => {
                Some(state.bomb.bomb.pos)
            }
            _ => None,
        },
    }
}

impl GameState {
    /// Advance one frame with no input
    pub fn update(&mut self, dt: f32) {
        tick(self, &TickInput::default(), dt);
    }

    /// Deliver a tap immediately
    pub fn tap(&mut self, pos: Vec2) {
        handle_tap(self, pos);
    }

    /// Active entity count for one kind
    pub fn active(&self, kind: EntityKind) -> usize {
        self.pool(kind).active_count()
    }
}
