//! Error types for the `circuitkit-core` crate.
//!
//! - `R1csError`: failures while walking the binary R1CS header.
//! - `CalldataError`: failures while turning a proof into verifier calldata.

use thiserror::Error;

/// Represents the failure conditions of the R1CS header reader.
#[derive(Debug, Error)]
pub enum R1csError {
  /// The error is a std::io::Error raised while opening or reading the file
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// A read asked for more bytes than the file holds
  #[error("R1CS file truncated: wanted {wanted} bytes at offset {offset}")]
  Truncated { offset: u64, wanted: u64 },

  /// A section declares a body smaller than the fields it must contain
  #[error("Malformed R1CS section {section}: declared size {size}, needs at least {needed}")]
  MalformedSection { section: u32, size: u64, needed: u64 },
}

/// Represents the failure conditions of the calldata encoder.
#[derive(Debug, Error)]
pub enum CalldataError {
  /// A value does not fit into 256 bits
  #[error("Value does not fit in uint256: {0}")]
  Overflow(String),

  /// The proof carries a protocol tag that has no encoder
  #[error("Unknown protocol: {0}")]
  UnknownProtocol(String),

  /// A proof field is shorter than its layout requires
  #[error("Proof is missing element: {0}")]
  MissingElement(String),

  /// A value could not be parsed as a non-negative integer
  #[error("Invalid numeric value: {0}")]
  InvalidValue(String),

  /// Serde operation failed
  #[error(transparent)]
  Serde(#[from] serde_json::Error),
}
