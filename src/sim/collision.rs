//! Shockwave hit detection and resolution
//!
//! Pure geometric containment: an entity is hit when its center lies inside
//! the shockwave's current radius. No velocity prediction.

use glam::Vec2;

use super::effects::EffectKind;
use super::pool::{EntityPool, SlotId};
use super::state::{EntityKind, FallingEntity, GameEvent, GameState};

/// An entity caught by the shockwave this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub kind: EntityKind,
    pub slot: SlotId,
    pub pos: Vec2,
}

/// Check whether `point` lies within `radius` of `center` (boundary included)
#[inline]
pub fn circle_contains(center: Vec2, radius: f32, point: Vec2) -> bool {
    center.distance_squared(point) <= radius * radius
}

/// Append every active entity inside the blast circle to `out`
pub fn find_hits(
    center: Vec2,
    radius: f32,
    pool: &EntityPool<FallingEntity>,
    out: &mut Vec<Hit>,
) {
    out.extend(
        pool.iter_active()
            .filter(|(_, entity)| circle_contains(center, radius, entity.pos))
            .map(|(slot, entity)| Hit {
                kind: entity.kind,
                slot,
                pos: entity.pos,
            }),
    );
}

/// Test the live shockwave against both pools and apply the results:
/// meteors score and explode, pickups heal. Each entity is released as it
/// is consumed, so no entity can be hit twice by the same shockwave.
///
/// Returns the number of hits applied.
pub fn resolve_shockwave(state: &mut GameState) -> usize {
    let Some((center, radius)) = state.bomb.blast() else {
        return 0;
    };

    let mut hits = std::mem::take(&mut state.hit_buf);
    hits.clear();
    find_hits(center, radius, &state.meteors, &mut hits);
    find_hits(center, radius, &state.pickups, &mut hits);

    let scoring = state.tuning.scoring;
    let mut applied = 0;
    for hit in &hits {
        // Already consumed this tick: nothing to do
        if state.pool_mut(hit.kind).release(hit.slot).is_err() {
            continue;
        }
        applied += 1;
        state.bomb.record_hit();

        match hit.kind {
            EntityKind::Meteor => {
                state.session.add_score(scoring.meteor_reward);
                state.effects.spawn(EffectKind::Explosion, hit.pos);
                log::trace!("Meteor {:?} destroyed, score {}", hit.slot, state.session.score);
                state.events.push(GameEvent::MeteorDestroyed {
                    slot: hit.slot,
                    pos: hit.pos,
                    score: state.session.score,
                });
            }
            EntityKind::Pickup => {
                state.session.heal(scoring.pickup_heal);
                log::trace!("Pickup {:?} collected, energy {}", hit.slot, state.session.energy);
                state.events.push(GameEvent::PickupCollected {
                    slot: hit.slot,
                    pos: hit.pos,
                    energy: state.session.energy,
                });
            }
        }
    }

    state.hit_buf = hits;
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;

    fn running_state() -> GameState {
        let mut state = GameState::new(1);
        state.start_session();
        state.events.clear();
        state
    }

    fn park(state: &mut GameState, kind: EntityKind, pos: Vec2) -> SlotId {
        let (slot, entity) = state.pool_mut(kind).acquire().unwrap();
        entity.launch(pos, pos, 1.0);
        slot
    }

    fn detonate_at(state: &mut GameState, pos: Vec2) {
        state.bomb.place(pos).unwrap();
        for _ in 0..120 {
            state.bomb.advance(1.0 / 30.0);
        }
        state.bomb.trigger().unwrap();
        // Expand fully so the radius is at its maximum
        state.bomb.advance(0.5);
    }

    #[test]
    fn test_circle_contains_boundary() {
        let center = Vec2::new(10.0, 10.0);
        assert!(circle_contains(center, 5.0, Vec2::new(15.0, 10.0)));
        assert!(circle_contains(center, 5.0, center));
        assert!(!circle_contains(center, 5.0, Vec2::new(15.1, 10.0)));
    }

    #[test]
    fn test_no_shockwave_no_hits() {
        let mut state = running_state();
        park(&mut state, EntityKind::Meteor, Vec2::new(100.0, 100.0));
        assert_eq!(resolve_shockwave(&mut state), 0);
        assert_eq!(state.meteors.active_count(), 1);
    }

    #[test]
    fn test_overlapping_entities_each_hit_once() {
        let mut state = running_state();
        let center = Vec2::new(384.0, 500.0);
        let meteors: Vec<_> = (0..3)
            .map(|i| park(&mut state, EntityKind::Meteor, center + Vec2::new(i as f32, 0.0)))
            .collect();
        let far = park(&mut state, EntityKind::Meteor, Vec2::new(10.0, 1000.0));
        state.session.damage(40);
        let pickup = park(&mut state, EntityKind::Pickup, center + Vec2::new(0.0, 5.0));

        detonate_at(&mut state, center);
        let first = resolve_shockwave(&mut state);
        assert_eq!(first, 4);
        // Repeated resolution on later ticks finds nothing new
        assert_eq!(resolve_shockwave(&mut state), 0);
        assert_eq!(resolve_shockwave(&mut state), 0);

        let destroyed: Vec<_> = state
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::MeteorDestroyed { slot, .. } => Some(*slot),
                _ => None,
            })
            .collect();
        assert_eq!(destroyed, meteors);
        let collected = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::PickupCollected { slot, .. } if *slot == pickup))
            .count();
        assert_eq!(collected, 1);

        assert_eq!(state.session.score, 3 * 13);
        assert_eq!(state.session.energy, 85);
        assert_eq!(state.bomb.shockwave.hits, 4);
        assert!(state.meteors.is_active(far));
        assert_eq!(state.effects.pool.active_count(), 3);
        assert_eq!(state.session.phase, GamePhase::Running);
    }

    #[test]
    fn test_heal_caps_at_max_energy() {
        let mut state = running_state();
        let center = Vec2::new(300.0, 600.0);
        park(&mut state, EntityKind::Pickup, center);
        detonate_at(&mut state, center);
        resolve_shockwave(&mut state);
        assert_eq!(state.session.energy, 100);
    }
}
