//! Bomb placement, growth, detonation and shockwave expansion
//!
//! Tap while no bomb exists places one; tap while it grows detonates it.
//! All animation is progress driven by dt, so cancelling is just a state
//! reset and no completion can fire afterwards.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::renderer::{SpriteKind, VisualAllocator, VisualHandle};
use crate::tuning::{BombTuning, ShockwaveTuning, Tuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BombState {
    /// No bomb on screen; a tap places one
    Inactive,
    /// Growing toward full scale; a tap detonates
    Growing,
}

impl BombState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BombState::Inactive => "inactive",
            BombState::Growing => "growing",
        }
    }
}

/// A decoration that spins while the bomb grows
#[derive(Debug, Clone)]
pub struct Spinner {
    pub visual: VisualHandle,
    /// Degrees
    pub angle: f32,
}

impl Spinner {
    fn new(visual: VisualHandle) -> Self {
        Self { visual, angle: 0.0 }
    }
}

#[derive(Debug, Clone)]
pub struct Bomb {
    pub state: BombState,
    pub pos: Vec2,
    pub scale: f32,
    pub opacity: f32,
    /// Seconds spent growing
    pub grow_elapsed: f32,
    pub visual: VisualHandle,
    pub halo: Spinner,
    pub sparkle: Spinner,
}

impl Bomb {
    /// Bomb sprite and its children are on screen
    pub fn is_visible(&self) -> bool {
        self.state == BombState::Growing
    }
}

#[derive(Debug, Clone)]
pub struct Shockwave {
    pub active: bool,
    pub pos: Vec2,
    pub scale: f32,
    pub start_scale: f32,
    pub target_scale: f32,
    pub opacity: f32,
    /// Seconds since detonation
    pub elapsed: f32,
    /// Entities caught during this shockwave's lifetime
    pub hits: u32,
    pub visual: VisualHandle,
}

/// Result of triggering a growing bomb
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Detonation {
    /// Shockwave created, expanding to `target_scale`
    Released { pos: Vec2, target_scale: f32 },
    /// Bomb was too small; no shockwave
    Failed { pos: Vec2, scale: f32 },
}

/// What a tap did to the bomb
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapOutcome {
    Placed { pos: Vec2 },
    Detonated(Detonation),
    /// The bomb could not take the tap
    Ignored,
}

#[derive(Debug, Clone)]
pub struct BombController {
    pub bomb: Bomb,
    pub shockwave: Shockwave,
    tuning: BombTuning,
    wave: ShockwaveTuning,
}

impl BombController {
    pub fn new(tuning: &Tuning, visuals: &mut VisualAllocator) -> Self {
        let bomb = Bomb {
            state: BombState::Inactive,
            pos: Vec2::ZERO,
            scale: tuning.bomb.min_scale,
            opacity: tuning.bomb.opacity,
            grow_elapsed: 0.0,
            visual: visuals.allocate(SpriteKind::Bomb),
            halo: Spinner::new(visuals.allocate(SpriteKind::Halo)),
            sparkle: Spinner::new(visuals.allocate(SpriteKind::Sparkle)),
        };
        let shockwave = Shockwave {
            active: false,
            pos: Vec2::ZERO,
            scale: tuning.shockwave.start_scale,
            start_scale: tuning.shockwave.start_scale,
            target_scale: tuning.shockwave.start_scale,
            opacity: 1.0,
            elapsed: 0.0,
            hits: 0,
            visual: visuals.allocate(SpriteKind::Shockwave),
        };
        Self {
            bomb,
            shockwave,
            tuning: tuning.bomb,
            wave: tuning.shockwave,
        }
    }

    pub fn state(&self) -> BombState {
        self.bomb.state
    }

    /// Route a tap: place when idle, detonate when growing
    pub fn tap(&mut self, pos: Vec2) -> TapOutcome {
        match self.bomb.state {
            BombState::Inactive => match self.place(pos) {
                Ok(()) => TapOutcome::Placed { pos },
                Err(_) => TapOutcome::Ignored,
            },
            BombState::Growing => match self.trigger() {
                Ok(detonation) => TapOutcome::Detonated(detonation),
                Err(_) => TapOutcome::Ignored,
            },
        }
    }

    /// Place a new bomb at `pos` and start growing it
    pub fn place(&mut self, pos: Vec2) -> SimResult<()> {
        if self.bomb.state != BombState::Inactive {
            return Err(SimError::InvalidStateTransition {
                from: self.bomb.state.as_str(),
                action: "place a bomb",
            });
        }
        let bomb = &mut self.bomb;
        bomb.state = BombState::Growing;
        bomb.pos = pos;
        bomb.scale = self.tuning.min_scale;
        bomb.opacity = self.tuning.opacity;
        bomb.grow_elapsed = 0.0;
        bomb.halo.angle = 0.0;
        bomb.sparkle.angle = 0.0;
        Ok(())
    }

    /// Halt growth and detonate at the current scale
    pub fn trigger(&mut self) -> SimResult<Detonation> {
        if self.bomb.state != BombState::Growing {
            return Err(SimError::InvalidStateTransition {
                from: self.bomb.state.as_str(),
                action: "trigger the bomb",
            });
        }
        // Growth halts and the bomb is hidden; the next tap places a new one
        self.bomb.state = BombState::Inactive;

        let pos = self.bomb.pos;
        let scale = self.bomb.scale;
        if scale > self.tuning.armed_scale {
            let target_scale = scale * self.wave.scale_factor;
            let wave = &mut self.shockwave;
            wave.active = true;
            wave.pos = pos;
            wave.start_scale = self.wave.start_scale;
            wave.scale = self.wave.start_scale;
            wave.target_scale = target_scale;
            wave.opacity = 1.0;
            wave.elapsed = 0.0;
            wave.hits = 0;
            log::debug!("Bomb released at ({:.0}, {:.0}), scale {:.2}", pos.x, pos.y, scale);
            Ok(Detonation::Released { pos, target_scale })
        } else {
            log::debug!("Bomb fizzled at scale {:.2}", scale);
            Ok(Detonation::Failed { pos, scale })
        }
    }

    /// Advance growth and shockwave animation. Returns the hit count when
    /// the shockwave finishes this frame.
    pub fn advance(&mut self, dt: f32) -> Option<u32> {
        match self.bomb.state {
            BombState::Growing => {
                let bomb = &mut self.bomb;
                bomb.grow_elapsed += dt;
                bomb.scale = self.tuning.scale_at(bomb.grow_elapsed);
                let spin = self.tuning.spin_deg_per_sec * dt;
                bomb.halo.angle = (bomb.halo.angle + spin).rem_euclid(360.0);
                bomb.sparkle.angle = (bomb.sparkle.angle + spin).rem_euclid(360.0);
            }
            BombState::Inactive => {}
        }

        if !self.shockwave.active {
            return None;
        }
        let wave = &mut self.shockwave;
        wave.elapsed += dt;
        let expand = (wave.elapsed / self.wave.expand_secs).min(1.0);
        wave.scale = wave.start_scale + (wave.target_scale - wave.start_scale) * expand;
        wave.opacity = 1.0 - (wave.elapsed / self.wave.fade_secs).min(1.0);

        if wave.elapsed >= self.wave.lifetime() {
            wave.active = false;
            log::trace!("Shockwave done with {} hits", wave.hits);
            return Some(wave.hits);
        }
        None
    }

    /// Current hit region, if a shockwave is live
    pub fn blast(&self) -> Option<(Vec2, f32)> {
        self.shockwave
            .active
            .then(|| (self.shockwave.pos, self.shockwave.scale * self.wave.base_radius))
    }

    pub fn record_hit(&mut self) {
        self.shockwave.hits += 1;
    }

    /// Stop every bomb and shockwave animation immediately and hide both
    pub fn cancel(&mut self) {
        self.bomb.state = BombState::Inactive;
        self.bomb.scale = self.tuning.min_scale;
        self.bomb.grow_elapsed = 0.0;
        self.shockwave.active = false;
        self.shockwave.elapsed = 0.0;
        self.shockwave.hits = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> BombController {
        BombController::new(&Tuning::default(), &mut VisualAllocator::new())
    }

    fn grow(ctrl: &mut BombController, secs: f32) {
        let steps = (secs / 0.05).round() as u32;
        for _ in 0..steps {
            ctrl.advance(0.05);
        }
    }

    #[test]
    fn test_place_then_grow() {
        let mut ctrl = controller();
        assert_eq!(
            ctrl.tap(Vec2::new(100.0, 200.0)),
            TapOutcome::Placed {
                pos: Vec2::new(100.0, 200.0)
            }
        );
        assert_eq!(ctrl.state(), BombState::Growing);
        assert!((ctrl.bomb.scale - 0.1).abs() < 1e-6);
        assert!((ctrl.bomb.opacity - 50.0 / 255.0).abs() < 1e-6);

        grow(&mut ctrl, 3.0);
        assert!((ctrl.bomb.scale - 0.55).abs() < 1e-3);
        assert!(ctrl.bomb.halo.angle != 0.0);

        grow(&mut ctrl, 10.0);
        assert!((ctrl.bomb.scale - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_place_rejected_unless_inactive() {
        let mut ctrl = controller();
        ctrl.place(Vec2::ZERO).unwrap();
        let err = ctrl.place(Vec2::ONE).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidStateTransition {
                from: "growing",
                ..
            }
        ));
        assert_eq!(ctrl.bomb.pos, Vec2::ZERO);
        assert!(ctrl.trigger().is_ok());
        assert!(ctrl.trigger().is_err());

        // Detonation parks the bomb right away
        assert_eq!(ctrl.state(), BombState::Inactive);
        assert_eq!(ctrl.tap(Vec2::ONE), TapOutcome::Placed { pos: Vec2::ONE });
        assert_eq!(ctrl.state(), BombState::Growing);
    }

    #[test]
    fn test_small_bomb_fails() {
        let mut ctrl = controller();
        ctrl.place(Vec2::new(50.0, 50.0)).unwrap();
        grow(&mut ctrl, 1.0);
        let outcome = ctrl.tap(Vec2::ZERO);
        assert!(matches!(
            outcome,
            TapOutcome::Detonated(Detonation::Failed { .. })
        ));
        assert!(!ctrl.shockwave.active);
        assert!(ctrl.blast().is_none());
        assert_eq!(ctrl.advance(0.016), None);
        assert_eq!(ctrl.state(), BombState::Inactive);
    }

    #[test]
    fn test_shockwave_expands_fades_and_hides() {
        let mut ctrl = controller();
        ctrl.place(Vec2::new(300.0, 400.0)).unwrap();
        grow(&mut ctrl, 2.0);
        let bomb_scale = ctrl.bomb.scale;
        assert!(bomb_scale > 0.3);

        let Detonation::Released { pos, target_scale } = ctrl.trigger().unwrap() else {
            panic!("expected a shockwave");
        };
        assert_eq!(pos, Vec2::new(300.0, 400.0));
        assert!((target_scale - bomb_scale * 2.0).abs() < 1e-6);
        let (_, radius) = ctrl.blast().unwrap();
        assert!((radius - 0.1 * 120.0).abs() < 1e-4);

        // Growth stays frozen after trigger
        ctrl.advance(0.25);
        assert!((ctrl.bomb.scale - bomb_scale).abs() < 1e-6);
        assert!(ctrl.shockwave.scale > 0.1 && ctrl.shockwave.scale < target_scale);

        ctrl.advance(0.25);
        assert!((ctrl.shockwave.scale - target_scale).abs() < 1e-4);
        assert!(ctrl.shockwave.active);
        assert!((ctrl.shockwave.opacity - 0.5).abs() < 1e-4);

        ctrl.record_hit();
        assert_eq!(ctrl.advance(0.49), None);
        assert_eq!(ctrl.advance(0.02), Some(1));
        assert!(!ctrl.shockwave.active);
        assert!(ctrl.blast().is_none());
    }

    #[test]
    fn test_cancel_stops_everything() {
        let mut ctrl = controller();
        ctrl.place(Vec2::ZERO).unwrap();
        grow(&mut ctrl, 4.0);
        ctrl.trigger().unwrap();
        // Fresh bomb on top of a live shockwave
        ctrl.advance(0.016);
        ctrl.place(Vec2::new(10.0, 10.0)).unwrap();
        ctrl.cancel();
        assert_eq!(ctrl.state(), BombState::Inactive);
        assert!(!ctrl.bomb.is_visible());
        assert!(!ctrl.shockwave.active);
        // No completion after cancellation
        for _ in 0..100 {
            assert_eq!(ctrl.advance(0.1), None);
        }
    }
}
