//! Simulation core
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Advanced only through `tick` with an explicit dt
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering, audio or platform dependencies

pub mod bomb;
pub mod collision;
pub mod effects;
pub mod falling;
pub mod pool;
pub mod spawn;
pub mod state;
pub mod tick;

pub use bomb::{Bomb, BombController, BombState, Detonation, Shockwave, Spinner, TapOutcome};
pub use collision::{Hit, circle_contains, find_hits, resolve_shockwave};
pub use effects::{Effect, EffectKind, Effects};
pub use falling::FallingEntitySimulator;
pub use pool::{EntityPool, Poolable, SlotId};
pub use spawn::{SpawnRequest, SpawnScheduler, SpawnTimer};
pub use state::{
    EntityKind, FallingEntity, GameEvent, GamePhase, GameSession, GameState, Overlay,
};
pub use tick::{TickInput, handle_tap, tick};
