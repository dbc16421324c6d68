//! Unified error types surfaced by the runtime API.
use std::time::Duration;

use thiserror::Error;
use tokio::sync::oneshot;

use duel_core::BattleSetupError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("battle {id} rejected")]
    Setup {
        id: u64,
        #[source]
        source: BattleSetupError,
    },

    #[error("battle {id} did not finish within {after:?}")]
    Timeout { id: u64, after: Duration },

    #[error("battle worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("battle result reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("arena is closed")]
    ArenaClosed,

    #[error("failed to encode battle {id} result")]
    Digest {
        id: u64,
        #[source]
        source: bincode::Error,
    },

    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: &'static str, value: String },
}

impl RuntimeError {
    /// Battle id the error belongs to, when there is one.
    pub fn battle_id(&self) -> Option<u64> {
        match self {
            RuntimeError::Setup { id, .. }
            | RuntimeError::Timeout { id, .. }
            | RuntimeError::Digest { id, .. } => Some(*id),
            _ => None,
        }
    }
}
