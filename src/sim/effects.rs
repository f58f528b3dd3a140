//! One-shot frame animations (meteor explosions and ground hits)

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pool::{EntityPool, Poolable, SlotId};
use crate::renderer::{Animation, SpriteKind, VisualAllocator, VisualHandle};
use crate::tuning::{EffectTuning, Tuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Meteor destroyed by a shockwave
    Explosion,
    /// Meteor reached the ground
    GroundHit,
}

impl EffectKind {
    pub fn animation(&self) -> Animation {
        match self {
            EffectKind::Explosion => Animation::Explosion,
            EffectKind::GroundHit => Animation::GroundHit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Effect {
    pub kind: EffectKind,
    pub pos: Vec2,
    pub elapsed: f32,
    pub duration: f32,
    pub frames: u32,
    pub visual: VisualHandle,
}

impl Effect {
    /// Frame index to display, clamped to the last frame
    pub fn frame(&self) -> u32 {
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        ((t * self.frames as f32) as u32).min(self.frames.saturating_sub(1))
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

impl Poolable for Effect {
    fn reset(&mut self) {
        self.pos = Vec2::ZERO;
        self.elapsed = 0.0;
    }
}

#[derive(Debug, Clone)]
pub struct Effects {
    pub pool: EntityPool<Effect>,
    tuning: EffectTuning,
    /// Ground hits play this far above the impact point
    ground_lift: f32,
}

impl Effects {
    pub fn new(tuning: &Tuning, capacity: usize, visuals: &mut VisualAllocator) -> Self {
        let pool = EntityPool::new("effect", capacity, |_| Effect {
            kind: EffectKind::Explosion,
            pos: Vec2::ZERO,
            elapsed: 0.0,
            duration: tuning.effects.explosion_secs,
            frames: tuning.effects.explosion_frames,
            visual: visuals.allocate(SpriteKind::Effect),
        });
        Self {
            pool,
            tuning: tuning.effects,
            ground_lift: tuning.screen.height * tuning.effects.ground_hit_lift,
        }
    }

    /// Start an effect; skipped when every effect slot is busy
    pub fn spawn(&mut self, kind: EffectKind, pos: Vec2) -> Option<SlotId> {
        let (duration, frames, pos) = match kind {
            EffectKind::Explosion => (self.tuning.explosion_secs, self.tuning.explosion_frames, pos),
            EffectKind::GroundHit => (
                self.tuning.ground_hit_secs,
                self.tuning.ground_hit_frames,
                pos + Vec2::new(0.0, self.ground_lift),
            ),
        };
        match self.pool.acquire() {
            Ok((slot, effect)) => {
                effect.kind = kind;
                effect.pos = pos;
                effect.elapsed = 0.0;
                effect.duration = duration;
                effect.frames = frames;
                Some(slot)
            }
            Err(err) => {
                log::debug!("Skipping {:?}: {}", kind, err);
                None
            }
        }
    }

    /// Advance all effects; finished ones are released and reported
    pub fn advance(&mut self, dt: f32, done: &mut Vec<(SlotId, EffectKind)>) {
        let start = done.len();
        self.pool.for_each_active(|slot, effect| {
            effect.elapsed += dt;
            if effect.is_done() {
                done.push((slot, effect.kind));
            }
        });
        for &(slot, _) in &done[start..] {
            if let Err(err) = self.pool.release(slot) {
                log::trace!("effect: {}", err);
            }
        }
    }

    pub fn clear(&mut self) {
        self.pool.release_all();
    }
}
