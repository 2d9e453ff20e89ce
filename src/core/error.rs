use thiserror::Error;

use crate::core::types::UnitId;

#[derive(Error, Debug)]
pub enum PrincessError {
    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    #[error("Unit {0} is not deployed on the board")]
    UnitNotDeployed(UnitId),

    #[error("Precognition worker is not running")]
    WorkerDisconnected,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PrincessError>;
