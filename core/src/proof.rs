//! Proof records as emitted by the proving tool, and the integers they are made of.
//!
//! Proof files are JSON. Every number in them is a decimal string, but values produced elsewhere
//! may arrive as `0x` hex strings or plain JSON numbers, so [`LargeInt`] accepts all three.

use std::{fmt, str::FromStr};

use num_bigint::BigUint;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::CalldataError;

/// A non-negative integer of arbitrary size.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LargeInt(pub BigUint);

impl FromStr for LargeInt {
  type Err = CalldataError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let trimmed = s.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
      Some(hex) => BigUint::parse_bytes(hex.as_bytes(), 16),
      None => BigUint::parse_bytes(trimmed.as_bytes(), 10),
    };
    parsed.map(LargeInt).ok_or_else(|| CalldataError::InvalidValue(s.to_string()))
  }
}

impl From<BigUint> for LargeInt {
  fn from(value: BigUint) -> Self { LargeInt(value) }
}

impl From<u64> for LargeInt {
  fn from(value: u64) -> Self { LargeInt(BigUint::from(value)) }
}

impl fmt::Display for LargeInt {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl Serialize for LargeInt {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.0.to_str_radix(10))
  }
}

impl<'de> Deserialize<'de> for LargeInt {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
      Text(String),
      Number(u64),
    }

    match Raw::deserialize(deserializer)? {
      Raw::Text(text) => text.parse().map_err(de::Error::custom),
      Raw::Number(number) => Ok(LargeInt::from(number)),
    }
  }
}

/// Public inputs and outputs of a circuit, in order.
pub type PublicSignals = Vec<LargeInt>;

/// Proof systems the toolkit can drive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
  #[default]
  Groth16,
  Plonk,
  Fflonk,
}

impl Protocol {
  pub fn as_str(&self) -> &'static str {
    match self {
      Protocol::Groth16 => "groth16",
      Protocol::Plonk => "plonk",
      Protocol::Fflonk => "fflonk",
    }
  }
}

impl fmt::Display for Protocol {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Protocol {
  type Err = CalldataError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "groth16" => Ok(Protocol::Groth16),
      "plonk" => Ok(Protocol::Plonk),
      "fflonk" => Ok(Protocol::Fflonk),
      _ => Err(CalldataError::UnknownProtocol(s.to_string())),
    }
  }
}

/// Groth16 proof. Points are stored in projective form, `pi_b` over the quadratic extension.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Groth16Proof {
  pub pi_a: Vec<LargeInt>,
  pub pi_b: Vec<Vec<LargeInt>>,
  pub pi_c: Vec<LargeInt>,
}

/// PLONK proof: nine commitments followed by six evaluations.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlonkProof {
  #[serde(rename = "A")]
  pub a:       Vec<LargeInt>,
  #[serde(rename = "B")]
  pub b:       Vec<LargeInt>,
  #[serde(rename = "C")]
  pub c:       Vec<LargeInt>,
  #[serde(rename = "Z")]
  pub z:       Vec<LargeInt>,
  #[serde(rename = "T1")]
  pub t1:      Vec<LargeInt>,
  #[serde(rename = "T2")]
  pub t2:      Vec<LargeInt>,
  #[serde(rename = "T3")]
  pub t3:      Vec<LargeInt>,
  #[serde(rename = "Wxi")]
  pub wxi:     Vec<LargeInt>,
  #[serde(rename = "Wxiw")]
  pub wxiw:    Vec<LargeInt>,
  pub eval_a:  LargeInt,
  pub eval_b:  LargeInt,
  pub eval_c:  LargeInt,
  pub eval_s1: LargeInt,
  pub eval_s2: LargeInt,
  pub eval_zw: LargeInt,
}

/// FFLONK commitments.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FflonkPolynomials {
  #[serde(rename = "C1")]
  pub c1: Vec<LargeInt>,
  #[serde(rename = "C2")]
  pub c2: Vec<LargeInt>,
  #[serde(rename = "W1")]
  pub w1: Vec<LargeInt>,
  #[serde(rename = "W2")]
  pub w2: Vec<LargeInt>,
}

/// FFLONK opening evaluations.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FflonkEvaluations {
  pub ql:  LargeInt,
  pub qr:  LargeInt,
  pub qm:  LargeInt,
  pub qo:  LargeInt,
  pub qc:  LargeInt,
  pub s1:  LargeInt,
  pub s2:  LargeInt,
  pub s3:  LargeInt,
  pub a:   LargeInt,
  pub b:   LargeInt,
  pub c:   LargeInt,
  pub z:   LargeInt,
  pub zw:  LargeInt,
  pub t1w: LargeInt,
  pub t2w: LargeInt,
  pub inv: LargeInt,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FflonkProof {
  pub polynomials: FflonkPolynomials,
  pub evaluations: FflonkEvaluations,
}

/// A proof of one of the supported protocols.
#[derive(Clone, Debug, PartialEq)]
pub enum ProofRecord {
  Groth16(Groth16Proof),
  Plonk(PlonkProof),
  Fflonk(FflonkProof),
}

impl ProofRecord {
  pub fn protocol(&self) -> Protocol {
    match self {
      ProofRecord::Groth16(_) => Protocol::Groth16,
      ProofRecord::Plonk(_) => Protocol::Plonk,
      ProofRecord::Fflonk(_) => Protocol::Fflonk,
    }
  }

  /// Builds a proof from the proving tool's JSON output, dispatching on its `protocol` field.
  pub fn from_json(value: &Value) -> Result<Self, CalldataError> {
    let tag = value
      .get("protocol")
      .and_then(Value::as_str)
      .ok_or_else(|| CalldataError::MissingElement("protocol".to_string()))?;

    Ok(match tag.parse::<Protocol>()? {
      Protocol::Groth16 => ProofRecord::Groth16(serde_json::from_value(value.clone())?),
      Protocol::Plonk => ProofRecord::Plonk(serde_json::from_value(value.clone())?),
      Protocol::Fflonk => ProofRecord::Fflonk(serde_json::from_value(value.clone())?),
    })
  }
}
