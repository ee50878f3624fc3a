//! Error type for the `circuitkit` crate.

use circuitkit_core::{CalldataError, R1csError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CircuitkitError {
  #[error(transparent)]
  Io(#[from] std::io::Error),

  #[error(transparent)]
  SerdeJson(#[from] serde_json::Error),

  #[error(transparent)]
  R1cs(#[from] R1csError),

  #[error(transparent)]
  Calldata(#[from] CalldataError),

  /// The circuit has no entry in the circuit registry
  #[error("Circuit `{0}` not found in the circuit registry")]
  CircuitNotFound(String),

  #[error("Invalid config: {0}")]
  InvalidConfig(String),

  /// An external program exited unsuccessfully
  #[error("`{program}` failed with {status}: {stderr}")]
  CommandFailed { program: String, status: String, stderr: String },
}
