use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Transport,
    Timeout,
    Status,
    Decode,
}

/// Failures talking to the catalog or category source. None of them is fatal
/// to a browse session.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Transport(String),
    #[error("catalog request timed out after {0:?}")]
    Timeout(Duration),
    #[error("catalog responded with status {status}")]
    Status { status: u16 },
    #[error("catalog response could not be decoded: {0}")]
    Decode(String),
}

impl CatalogError {
    pub fn kind(&self) -> FailureKind {
        match self {
            CatalogError::Transport(_) => FailureKind::Transport,
            CatalogError::Timeout(_) => FailureKind::Timeout,
            CatalogError::Status { .. } => FailureKind::Status,
            CatalogError::Decode(_) => FailureKind::Decode,
        }
    }
}
