//! Simulation state -> render command diffing
//!
//! Visibility is tracked per handle so Show/Hide are only issued on change.
//! Visible objects get a `Place` every frame.

use glam::Vec2;

use super::{Presenter, RenderCommand, VisualHandle};
use crate::sim::state::{GameState, Overlay};

#[derive(Debug, Clone, Copy)]
struct Placement {
    pos: Vec2,
    scale: f32,
    opacity: f32,
    rotation: f32,
}

impl Placement {
    fn at(pos: Vec2) -> Self {
        Self {
            pos,
            scale: 1.0,
            opacity: 1.0,
            rotation: 0.0,
        }
    }
}

#[derive(Debug, Default)]
pub struct SceneSync {
    created: bool,
    /// Last visibility sent, indexed by handle id
    visible: Vec<bool>,
    hud: Option<(u64, i32)>,
}

impl SceneSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit the commands that bring the host scene in line with `state`
    pub fn sync<P: Presenter>(&mut self, state: &GameState, out: &mut P) {
        if !self.created {
            self.create_all(state, out);
        }

        let screen = &state.tuning.screen;
        let center = Vec2::new(screen.width * 0.5, screen.height * 0.5);
        let session = &state.session;

        let intro = (session.overlay == Overlay::Intro)
            .then(|| Placement::at(Vec2::new(center.x, screen.height * 0.6)));
        self.update(state.intro_visual, intro, out);
        let game_over = (session.overlay == Overlay::GameOver)
            .then(|| Placement::at(Vec2::new(center.x, screen.height * 0.65)));
        self.update(state.game_over_visual, game_over, out);

        let bomb = &state.bomb.bomb;
        let visible = bomb.is_visible();
        let bomb_place = |rotation: f32| {
            visible.then_some(Placement {
                pos: bomb.pos,
                scale: bomb.scale,
                opacity: bomb.opacity,
                rotation,
            })
        };
        self.update(bomb.visual, bomb_place(0.0), out);
        self.update(bomb.halo.visual, bomb_place(bomb.halo.angle), out);
        self.update(bomb.sparkle.visual, bomb_place(bomb.sparkle.angle), out);

        let wave = &state.bomb.shockwave;
        let wave_place = wave.active.then_some(Placement {
            pos: wave.pos,
            scale: wave.scale,
            opacity: wave.opacity,
            rotation: 0.0,
        });
        self.update(wave.visual, wave_place, out);

        for pool in [&state.meteors, &state.pickups] {
            for (_, active, entity) in pool.iter_slots() {
                let place = active.then_some(Placement {
                    pos: entity.pos,
                    scale: 1.0,
                    opacity: 1.0,
                    rotation: entity.rotation,
                });
                self.update(entity.visual, place, out);
            }
        }

        for (_, active, effect) in state.effects.pool.iter_slots() {
            self.update(effect.visual, active.then(|| Placement::at(effect.pos)), out);
            if active {
                out.present(RenderCommand::Frame {
                    handle: effect.visual,
                    animation: effect.kind.animation(),
                    index: effect.frame(),
                });
            }
        }

        let hud = (session.score, session.energy);
        if self.hud != Some(hud) {
            self.hud = Some(hud);
            out.present(RenderCommand::Hud {
                score: hud.0,
                energy: hud.1,
            });
        }
    }

    fn create_all<P: Presenter>(&mut self, state: &GameState, out: &mut P) {
        let mut handles = vec![
            state.intro_visual,
            state.game_over_visual,
            state.bomb.bomb.visual,
            state.bomb.bomb.halo.visual,
            state.bomb.bomb.sparkle.visual,
            state.bomb.shockwave.visual,
        ];
        handles.extend(state.meteors.iter_slots().map(|(_, _, e)| e.visual));
        handles.extend(state.pickups.iter_slots().map(|(_, _, e)| e.visual));
        handles.extend(state.effects.pool.iter_slots().map(|(_, _, e)| e.visual));
        handles.sort_by_key(|h| h.id);

        self.visible = vec![false; state.visual_count() as usize];
        for handle in handles {
            out.present(RenderCommand::Create { handle });
        }
        self.created = true;
    }

    fn update<P: Presenter>(
        &mut self,
        handle: VisualHandle,
        placement: Option<Placement>,
        out: &mut P,
    ) {
        let Some(was_visible) = self.visible.get_mut(handle.id as usize) else {
            log::warn!("Unknown visual {:?}", handle);
            return;
        };
        let now_visible = placement.is_some();
        if now_visible != *was_visible {
            *was_visible = now_visible;
            out.present(if now_visible {
                RenderCommand::Show { handle }
            } else {
                RenderCommand::Hide { handle }
            });
        }
        if let Some(p) = placement {
            out.present(RenderCommand::Place {
                handle,
                pos: p.pos,
                scale: p.scale,
                opacity: p.opacity,
                rotation: p.rotation,
            });
        }
    }
}
