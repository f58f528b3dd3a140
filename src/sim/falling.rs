//! Falling entity motion and ground detection

use glam::Vec2;

use super::pool::{EntityPool, SlotId};
use super::state::{EntityKind, FallingEntity};
use crate::tuning::{EntityTuning, Tuning};

/// Moves every active entity and pulls out the ones that reached the ground
#[derive(Debug, Clone)]
pub struct FallingEntitySimulator {
    ground_y: f32,
    look: EntityTuning,
}

impl FallingEntitySimulator {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            ground_y: tuning.screen.ground_y(),
            look: tuning.entities,
        }
    }

    pub fn ground_y(&self) -> f32 {
        self.ground_y
    }

    /// Advance one pool by dt. Entities whose bottom crossed the ground are
    /// released back to the pool and reported in `landed` with their final
    /// position.
    pub fn advance(
        &self,
        pool: &mut EntityPool<FallingEntity>,
        dt: f32,
        landed: &mut Vec<(SlotId, Vec2)>,
    ) {
        let start = landed.len();
        pool.for_each_active(|slot, entity| {
            entity.pos += entity.vel * dt;
            entity.age += dt;
            entity.rotation = self.rotation_for(entity);
            if entity.bottom() <= self.ground_y {
                landed.push((slot, entity.pos));
            }
        });

        for &(slot, _) in &landed[start..] {
            if let Err(err) = pool.release(slot) {
                log::trace!("{}: {}", pool.name(), err);
            }
        }
    }

    fn rotation_for(&self, entity: &FallingEntity) -> f32 {
        match entity.kind {
            EntityKind::Meteor => {
                (entity.age * self.look.meteor_spin_deg_per_sec).rem_euclid(360.0)
            }
            // Swing back and forth between +/- pickup_swing_deg
            EntityKind::Pickup => {
                let phase = entity.age / self.look.pickup_swing_period * std::f32::consts::TAU;
                self.look.pickup_swing_deg * phase.sin()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{SpriteKind, VisualAllocator};
    use crate::sim::pool::Poolable;

    fn meteor_pool(capacity: usize) -> EntityPool<FallingEntity> {
        let mut visuals = VisualAllocator::new();
        EntityPool::new("meteor", capacity, |_| {
            FallingEntity::new(EntityKind::Meteor, visuals.allocate(SpriteKind::Meteor), 28.0)
        })
    }

    #[test]
    fn test_entities_fall_toward_target() {
        let tuning = Tuning::default();
        let sim = FallingEntitySimulator::new(&tuning);
        let mut pool = meteor_pool(2);
        let (id, meteor) = pool.acquire().unwrap();
        meteor.launch(Vec2::new(100.0, 1050.0), Vec2::new(300.0, 50.0), 10.0);
        assert!((meteor.speed - Vec2::new(20.0, -100.0).length()).abs() < 1e-3);

        let mut landed = Vec::new();
        sim.advance(&mut pool, 1.0, &mut landed);
        assert!(landed.is_empty());
        let meteor = pool.get(id).unwrap();
        assert!((meteor.pos - Vec2::new(120.0, 950.0)).length() < 1e-3);
        assert!(meteor.rotation > 0.0);
    }

    #[test]
    fn test_ground_crossing_releases_and_reports() {
        let tuning = Tuning::default();
        let sim = FallingEntitySimulator::new(&tuning);
        let ground = sim.ground_y();
        let mut pool = meteor_pool(3);

        let (a, meteor) = pool.acquire().unwrap();
        meteor.launch(Vec2::new(200.0, ground + 40.0), Vec2::new(200.0, ground - 60.0), 1.0);
        let (b, meteor) = pool.acquire().unwrap();
        meteor.launch(Vec2::new(400.0, 900.0), Vec2::new(400.0, 800.0), 10.0);

        let mut landed = Vec::new();
        sim.advance(&mut pool, 0.2, &mut landed);
        assert_eq!(landed.len(), 1);
        assert_eq!(landed[0].0, a);
        assert!(!pool.is_active(a));
        assert!(pool.is_active(b));
        assert_eq!(pool.active_count(), 1);

        // Released entity is not reported again
        sim.advance(&mut pool, 0.2, &mut landed);
        assert_eq!(landed.len(), 1);
    }

    #[test]
    fn test_full_fall_lands_on_schedule() {
        let tuning = Tuning::default();
        let sim = FallingEntitySimulator::new(&tuning);
        let mut pool = meteor_pool(1);
        let (_, meteor) = pool.acquire().unwrap();
        let radius = meteor.radius;
        meteor.launch(
            Vec2::new(300.0, tuning.screen.height + radius),
            Vec2::new(500.0, sim.ground_y() + radius),
            4.0,
        );

        let mut landed = Vec::new();
        let mut t = 0.0_f32;
        while landed.is_empty() && t < 10.0 {
            sim.advance(&mut pool, 0.05, &mut landed);
            t += 0.05;
        }
        assert!((t - 4.0).abs() < 0.11, "landed after {t}s");
    }

    #[test]
    fn test_pickup_swing_is_bounded() {
        let tuning = Tuning::default();
        let sim = FallingEntitySimulator::new(&tuning);
        let mut entity = FallingEntity::new(
            EntityKind::Pickup,
            VisualAllocator::new().allocate(SpriteKind::Health),
            24.0,
        );
        for step in 0..100 {
            entity.age = step as f32 * 0.07;
            let angle = sim.rotation_for(&entity);
            assert!(angle.abs() <= tuning.entities.pickup_swing_deg + 1e-4);
        }
        entity.reset();
        assert_eq!(entity.age, 0.0);
    }
}
