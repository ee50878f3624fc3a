//! Core of the circuit toolkit: reading compiled R1CS metadata and encoding proofs as verifier
//! calldata. Nothing here spawns processes or touches configuration.

pub mod calldata;
pub mod error;
pub mod primes;
pub mod proof;
pub mod r1cs;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use calldata::{encode_calldata, encode_calldata_json, values_to_padded_uint256s};
pub use error::{CalldataError, R1csError};
pub use primes::{prime_name, PrimeName};
pub use proof::{LargeInt, ProofRecord, Protocol, PublicSignals};
pub use r1cs::{read_header, read_header_from, R1csMetadata};
