//! Field primes known to the circuit compiler.
//!
//! The R1CS header only stores the raw modulus, so the name is recovered by matching its decimal
//! form against this table.

use std::{fmt, str::FromStr};

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Names of the fields a circuit can be compiled against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrimeName {
  #[default]
  Bn128,
  Bls12381,
  Goldilocks,
  Grumpkin,
  Pallas,
  Vesta,
  Secq256r1,
}

/// Name and decimal modulus of every supported field.
pub const PRIMES: [(PrimeName, &str); 7] = [
  (
    PrimeName::Bn128,
    "21888242871839275222246405745257275088548364400416034343698204186575808495617",
  ),
  (
    PrimeName::Bls12381,
    "52435875175126190479447740508185965837690552500527637822603658699938581184513",
  ),
  (PrimeName::Goldilocks, "18446744069414584321"),
  (
    PrimeName::Grumpkin,
    "21888242871839275222246405745257275088696311157297823662689037894645226208583",
  ),
  (
    PrimeName::Pallas,
    "28948022309329048855892746252171976963363056481941560715954676764349967630337",
  ),
  (
    PrimeName::Vesta,
    "28948022309329048855892746252171976963363056481941647379679742748393362948097",
  ),
  (
    PrimeName::Secq256r1,
    "115792089210356248762697446949407573530086143415290314195533631308867097853951",
  ),
];

impl PrimeName {
  /// The name as passed to the compiler's `--prime` flag.
  pub fn as_str(&self) -> &'static str {
    match self {
      PrimeName::Bn128 => "bn128",
      PrimeName::Bls12381 => "bls12381",
      PrimeName::Goldilocks => "goldilocks",
      PrimeName::Grumpkin => "grumpkin",
      PrimeName::Pallas => "pallas",
      PrimeName::Vesta => "vesta",
      PrimeName::Secq256r1 => "secq256r1",
    }
  }

  /// The field modulus in decimal.
  pub fn as_decimal(&self) -> &'static str {
    PRIMES.iter().find(|(name, _)| name == self).map(|(_, decimal)| *decimal).unwrap_or_default()
  }

  /// The field modulus.
  pub fn value(&self) -> BigUint {
    BigUint::parse_bytes(self.as_decimal().as_bytes(), 10).unwrap_or_default()
  }
}

impl fmt::Display for PrimeName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for PrimeName {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    PRIMES
      .iter()
      .map(|(name, _)| *name)
      .find(|name| name.as_str() == s)
      .ok_or_else(|| format!("unknown prime: {s}"))
  }
}

/// Looks up the name of a field modulus. Unknown primes yield `None`; callers decide whether that
/// is acceptable.
pub fn prime_name(prime: &BigUint) -> Option<PrimeName> {
  let decimal = prime.to_str_radix(10);
  PRIMES.iter().find(|(_, value)| *value == decimal).map(|(name, _)| *name)
}
