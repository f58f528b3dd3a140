//! Error taxonomy for the game core
//!
//! None of these reach the player. Simulation code logs them and carries on
//! with "no change this tick"; only tuning loading hands them to the host.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// Every slot of a pool is in use; the spawn is skipped
    #[error("{pool} pool exhausted ({capacity} slots in use)")]
    PoolExhausted { pool: &'static str, capacity: usize },

    /// A state machine was asked to do something its current state forbids
    #[error("invalid state transition: cannot {action} while {from}")]
    InvalidStateTransition {
        from: &'static str,
        action: &'static str,
    },

    /// Slot was already back in the pool (or never handed out)
    #[error("slot {slot} is already released")]
    AlreadyReleased { slot: usize },

    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("failed to parse tuning: {0}")]
    TuningParse(String),
}

pub type SimResult<T> = Result<T, SimError>;
