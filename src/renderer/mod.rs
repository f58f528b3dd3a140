//! Rendering boundary
//!
//! The simulation never owns presentation objects. Every renderable is a
//! `VisualHandle` allocated once at boot; a `SceneSync` turns simulation
//! state into a stream of `RenderCommand`s for whatever scene graph the host
//! uses.

pub mod scene;

pub use scene::SceneSync;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Sprite art a visual is created from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKind {
    Meteor,
    Health,
    Bomb,
    /// Rotating halo inside the bomb
    Halo,
    /// Rotating sparkle inside the bomb
    Sparkle,
    Shockwave,
    /// Frame-animated one-shot (explosion or ground hit)
    Effect,
    IntroMessage,
    GameOverMessage,
}

/// Opaque reference to a renderable owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualHandle {
    pub id: u32,
    pub sprite: SpriteKind,
}

/// Hands out sequential visual IDs
#[derive(Debug, Default)]
pub struct VisualAllocator {
    next: u32,
}

impl VisualAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, sprite: SpriteKind) -> VisualHandle {
        let id = self.next;
        self.next += 1;
        VisualHandle { id, sprite }
    }

    /// Number of handles allocated so far
    pub fn count(&self) -> u32 {
        self.next
    }
}

/// Named frame animations the host must provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Animation {
    /// `explosion_small0..7`
    Explosion,
    /// `boom1..10`
    GroundHit,
}

/// Commands issued to the rendering collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Create the visual (hidden). Issued once per handle.
    Create { handle: VisualHandle },
    Show { handle: VisualHandle },
    Hide { handle: VisualHandle },
    /// Transform and opacity of a visible object. Rotation in degrees.
    Place {
        handle: VisualHandle,
        pos: Vec2,
        scale: f32,
        opacity: f32,
        rotation: f32,
    },
    /// Show a specific frame of a named animation
    Frame {
        handle: VisualHandle,
        animation: Animation,
        index: u32,
    },
    /// Score and energy readouts changed
    Hud { score: u64, energy: i32 },
}

/// Receiver for render commands
pub trait Presenter {
    fn present(&mut self, command: RenderCommand);
}

impl Presenter for Vec<RenderCommand> {
    fn present(&mut self, command: RenderCommand) {
        self.push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_is_sequential() {
        let mut alloc = VisualAllocator::new();
        let a = alloc.allocate(SpriteKind::Bomb);
        let b = alloc.allocate(SpriteKind::Meteor);
        assert_eq!(a.id, 0);
        assert_eq!(b.id, 1);
        assert_eq!(b.sprite, SpriteKind::Meteor);
        assert_eq!(alloc.count(), 2);
    }
}
