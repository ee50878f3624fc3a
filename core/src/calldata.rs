//! # Calldata Module
//!
//! Turns a proof and its public signals into the arguments of an on-chain verifier call. Every
//! value becomes a 32 byte big-endian word written as `0x` followed by 64 lowercase hex digits.
//!
//! Two output modes are supported: a compact one with quoted values, suitable for passing to a
//! contract call on the command line, and a pretty one that renders Solidity array declarations
//! ready to paste into a test contract.

use serde_json::Value;
use tracing::debug;

use crate::{
  error::CalldataError,
  proof::{FflonkProof, Groth16Proof, LargeInt, PlonkProof, ProofRecord},
};

const UINT256_HEX_DIGITS: usize = 64;

/// Number of words in PLONK and FFLONK proofs.
pub const PROOF_WORDS: usize = 24;

/// Renders each value as a `0x`-prefixed, zero-padded 64 digit hex word.
///
/// Fails with [`CalldataError::Overflow`] on the first value that needs more than 256 bits; no
/// partial result is returned.
pub fn values_to_padded_uint256s<'a, I>(values: I) -> Result<Vec<String>, CalldataError>
where I: IntoIterator<Item = &'a LargeInt> {
  values.into_iter().map(to_padded_uint256).collect()
}

fn to_padded_uint256(value: &LargeInt) -> Result<String, CalldataError> {
  let hex = value.0.to_str_radix(16);
  if hex.len() > UINT256_HEX_DIGITS {
    return Err(CalldataError::Overflow(value.to_string()));
  }
  Ok(format!("0x{hex:0>width$}", width = UINT256_HEX_DIGITS))
}

/// Encodes a proof and its public signals as verifier calldata.
pub fn encode_calldata(
  proof: &ProofRecord,
  public_signals: &[LargeInt],
  pretty: bool,
) -> Result<String, CalldataError> {
  debug!("encoding {} calldata, pretty={}", proof.protocol(), pretty);
  let proof_calldata = match proof {
    ProofRecord::Groth16(proof) => groth16_calldata(proof, pretty)?,
    ProofRecord::Plonk(proof) => plonk_calldata(proof, pretty)?,
    ProofRecord::Fflonk(proof) => fflonk_calldata(proof, pretty)?,
  };
  let signals_calldata = public_signals_calldata(public_signals, pretty)?;
  Ok(format!("\n{proof_calldata}\n\n{signals_calldata}\n"))
}

/// Same as [`encode_calldata`], starting from the proving tool's JSON files.
pub fn encode_calldata_json(
  proof: &Value,
  public_signals: &Value,
  pretty: bool,
) -> Result<String, CalldataError> {
  let proof = ProofRecord::from_json(proof)?;
  let public_signals: Vec<LargeInt> = serde_json::from_value(public_signals.clone())?;
  encode_calldata(&proof, &public_signals, pretty)
}

fn public_signals_calldata(
  public_signals: &[LargeInt],
  pretty: bool,
) -> Result<String, CalldataError> {
  let words = values_to_padded_uint256s(public_signals)?;
  Ok(if pretty {
    format!("uint[{}] memory pubs = {};", words.len(), multiline(&words))
  } else {
    quoted(&words)
  })
}

fn groth16_calldata(proof: &Groth16Proof, pretty: bool) -> Result<String, CalldataError> {
  let [a_x, a_y] = coordinates(&proof.pi_a, "pi_a")?;
  let [c_x, c_y] = coordinates(&proof.pi_c, "pi_c")?;
  let b_x = proof.pi_b.first().ok_or_else(|| missing("pi_b[0]"))?;
  let b_y = proof.pi_b.get(1).ok_or_else(|| missing("pi_b[1]"))?;
  let [b_x0, b_x1] = coordinates(b_x, "pi_b[0]")?;
  let [b_y0, b_y1] = coordinates(b_y, "pi_b[1]")?;

  let p_a = values_to_padded_uint256s([a_x, a_y])?;
  // The verifier expects Fq2 coordinates in the reverse order of the proof file.
  let p_b = [values_to_padded_uint256s([b_x1, b_x0])?, values_to_padded_uint256s([b_y1, b_y0])?];
  let p_c = values_to_padded_uint256s([c_x, c_y])?;

  Ok(if pretty {
    [
      format!("uint[2] memory pA = [{}];", p_a.join(", ")),
      format!("uint[2][2] memory pB = [[{}], [{}]];", p_b[0].join(", "), p_b[1].join(", ")),
      format!("uint[2] memory pC = [{}];", p_c.join(", ")),
    ]
    .join("\n")
  } else {
    [quoted(&p_a), format!("[{},{}]", quoted(&p_b[0]), quoted(&p_b[1])), quoted(&p_c)].join("\n")
  })
}

fn plonk_calldata(proof: &PlonkProof, pretty: bool) -> Result<String, CalldataError> {
  let points = [
    (&proof.a, "A"),
    (&proof.b, "B"),
    (&proof.c, "C"),
    (&proof.z, "Z"),
    (&proof.t1, "T1"),
    (&proof.t2, "T2"),
    (&proof.t3, "T3"),
    (&proof.wxi, "Wxi"),
    (&proof.wxiw, "Wxiw"),
  ];
  let evaluations =
    [&proof.eval_a, &proof.eval_b, &proof.eval_c, &proof.eval_s1, &proof.eval_s2, &proof.eval_zw];
  proof_words(&points, &evaluations, pretty)
}

fn fflonk_calldata(proof: &FflonkProof, pretty: bool) -> Result<String, CalldataError> {
  let polynomials = &proof.polynomials;
  let points = [
    (&polynomials.c1, "C1"),
    (&polynomials.c2, "C2"),
    (&polynomials.w1, "W1"),
    (&polynomials.w2, "W2"),
  ];
  let e = &proof.evaluations;
  let evaluations = [
    &e.ql, &e.qr, &e.qm, &e.qo, &e.qc, &e.s1, &e.s2, &e.s3, &e.a, &e.b, &e.c, &e.z, &e.zw, &e.t1w,
    &e.t2w, &e.inv,
  ];
  proof_words(&points, &evaluations, pretty)
}

/// Lays out point coordinates followed by scalar evaluations as one `uint256[24]` array.
fn proof_words(
  points: &[(&Vec<LargeInt>, &str)],
  evaluations: &[&LargeInt],
  pretty: bool,
) -> Result<String, CalldataError> {
  let mut values = Vec::with_capacity(PROOF_WORDS);
  for (point, name) in points {
    values.extend(coordinates(point, name)?);
  }
  values.extend(evaluations.iter().copied());
  let words = values_to_padded_uint256s(values)?;

  Ok(if pretty {
    format!("uint256[{}] memory proof = {};", words.len(), multiline(&words))
  } else {
    quoted(&words)
  })
}

/// Affine coordinates of a point, dropping the projective one if present.
fn coordinates<'a>(point: &'a [LargeInt], name: &str) -> Result<[&'a LargeInt; 2], CalldataError> {
  match point {
    [x, y, ..] => Ok([x, y]),
    _ => Err(missing(name)),
  }
}

fn missing(name: &str) -> CalldataError { CalldataError::MissingElement(name.to_string()) }

fn quoted(words: &[String]) -> String {
  let quoted: Vec<String> = words.iter().map(|word| format!("\"{word}\"")).collect();
  format!("[{}]", quoted.join(","))
}

fn multiline(words: &[String]) -> String {
  if words.is_empty() {
    return "[]".to_string();
  }
  format!("[\n    {}\n]", words.join(",\n    "))
}

#[cfg(test)]
mod tests {
  use num_bigint::BigUint;
  use serde_json::json;

  use super::*;

  fn word(value: u64) -> String { format!("0x{value:064x}") }

  fn plonk_json() -> Value {
    let point = |n: u64| json!([n.to_string(), (n + 1).to_string(), "1"]);
    json!({
      "A": point(1), "B": point(3), "C": point(5), "Z": point(7), "T1": point(9),
      "T2": point(11), "T3": point(13), "Wxi": point(15), "Wxiw": point(17),
      "eval_a": "19", "eval_b": "20", "eval_c": "21", "eval_s1": "22", "eval_s2": "23",
      "eval_zw": "24",
      "protocol": "plonk",
      "curve": "bn128"
    })
  }

  fn fflonk_json() -> Value {
    let point = |n: u64| json!([n.to_string(), (n + 1).to_string(), "1"]);
    let mut evaluations = serde_json::Map::new();
    let names = [
      "ql", "qr", "qm", "qo", "qc", "s1", "s2", "s3", "a", "b", "c", "z", "zw", "t1w", "t2w", "inv",
    ];
    for (i, name) in names.iter().enumerate() {
      evaluations.insert(name.to_string(), json!((9 + i).to_string()));
    }
    json!({
      "polynomials": { "C1": point(1), "C2": point(3), "W1": point(5), "W2": point(7) },
      "evaluations": evaluations,
      "protocol": "fflonk",
      "curve": "bn128"
    })
  }

  fn groth16_json() -> Value {
    json!({
      "pi_a": ["10", "11", "1"],
      "pi_b": [["1", "2"], ["3", "4"], ["1", "0"]],
      "pi_c": ["12", "13", "1"],
      "protocol": "groth16",
      "curve": "bn128"
    })
  }

  fn proof_block(calldata: &str) -> &str {
    calldata.trim_start_matches('\n').split("\n\n").next().unwrap()
  }

  #[test]
  fn test_padding_round_trip() {
    let prime = "21888242871839275222246405745257275088548364400416034343698204186575808495617";
    let values: Vec<LargeInt> = [
      BigUint::from(0u32),
      BigUint::from(1u32),
      BigUint::from(u64::MAX),
      BigUint::parse_bytes(prime.as_bytes(), 10).unwrap(),
      BigUint::from(1u32) << 255,
      (BigUint::from(1u32) << 256) - BigUint::from(1u32),
    ]
    .into_iter()
    .map(LargeInt)
    .collect();

    let words = values_to_padded_uint256s(&values).unwrap();
    for (word, value) in words.iter().zip(&values) {
      assert_eq!(word.len(), 66);
      assert!(word.starts_with("0x"));
      assert_eq!(word[2..].to_lowercase(), word[2..]);
      assert_eq!(BigUint::parse_bytes(word[2..].as_bytes(), 16).unwrap(), value.0);
    }
  }

  #[test]
  fn test_padding_overflow_boundary() {
    let max = LargeInt((BigUint::from(1u32) << 256) - BigUint::from(1u32));
    assert_eq!(values_to_padded_uint256s([&max]).unwrap(), vec![format!("0x{}", "f".repeat(64))]);

    let overflow = LargeInt(BigUint::from(1u32) << 256);
    let result = values_to_padded_uint256s([&LargeInt::from(1u64), &overflow]);
    assert!(matches!(result, Err(CalldataError::Overflow(_))));
  }

  #[test]
  fn test_padding_accepts_hex_and_decimal() {
    let values: Vec<LargeInt> = serde_json::from_value(json!(["0x1f", "31", 31])).unwrap();
    let words = values_to_padded_uint256s(&values).unwrap();
    assert!(words.iter().all(|w| *w == word(31)));
  }

  #[test]
  #[tracing_test::traced_test]
  fn test_groth16_swaps_pi_b_coordinates() {
    let calldata = encode_calldata_json(&groth16_json(), &json!(["5"]), false).unwrap();
    let expected_b = format!(
      "[[\"{}\",\"{}\"],[\"{}\",\"{}\"]]",
      word(2),
      word(1),
      word(4),
      word(3)
    );
    let lines: Vec<&str> = proof_block(&calldata).lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], format!("[\"{}\",\"{}\"]", word(10), word(11)));
    assert_eq!(lines[1], expected_b);
    assert_eq!(lines[2], format!("[\"{}\",\"{}\"]", word(12), word(13)));
    assert!(calldata.ends_with(&format!("\n\n[\"{}\"]\n", word(5))));
  }

  #[test]
  fn test_groth16_pretty() {
    let calldata = encode_calldata_json(&groth16_json(), &json!(["5", "6"]), true).unwrap();
    assert!(calldata.contains(&format!("uint[2] memory pA = [{}, {}];", word(10), word(11))));
    assert!(calldata.contains(&format!(
      "uint[2][2] memory pB = [[{}, {}], [{}, {}]];",
      word(2),
      word(1),
      word(4),
      word(3)
    )));
    assert!(calldata.contains(&format!("uint[2] memory pC = [{}, {}];", word(12), word(13))));
    assert!(calldata.contains(&format!(
      "uint[2] memory pubs = [\n    {},\n    {}\n];",
      word(5),
      word(6)
    )));
    assert!(!calldata.contains('"'));
  }

  #[test]
  fn test_plonk_has_24_words_in_both_modes() {
    for pretty in [false, true] {
      let calldata = encode_calldata_json(&plonk_json(), &json!(["1"]), pretty).unwrap();
      assert_eq!(proof_block(&calldata).matches("0x").count(), PROOF_WORDS);
    }
  }

  #[test]
  fn test_plonk_ordering() {
    let calldata = encode_calldata_json(&plonk_json(), &json!([]), false).unwrap();
    let expected: Vec<String> = (1..=24).map(word).collect();
    assert_eq!(proof_block(&calldata), quoted(&expected));
    assert!(calldata.ends_with("\n\n[]\n"));
  }

  #[test]
  fn test_plonk_pretty() {
    let calldata = encode_calldata_json(&plonk_json(), &json!(["7"]), true).unwrap();
    assert!(calldata.contains(&format!("uint256[24] memory proof = [\n    {},\n", word(1))));
    assert!(calldata.contains(&format!("    {}\n];", word(24))));
    assert!(calldata.contains(&format!("uint[1] memory pubs = [\n    {}\n];", word(7))));
  }

  #[test]
  fn test_fflonk_ordering() {
    let calldata = encode_calldata_json(&fflonk_json(), &json!(["3"]), false).unwrap();
    let expected: Vec<String> = (1..=24).map(word).collect();
    assert_eq!(proof_block(&calldata), quoted(&expected));
  }

  #[test]
  fn test_compact_encoding_is_idempotent() {
    let proof = ProofRecord::from_json(&fflonk_json()).unwrap();
    let signals = vec![LargeInt::from(1u64), LargeInt::from(2u64)];
    let first = encode_calldata(&proof, &signals, false).unwrap();
    let second = encode_calldata(&proof, &signals, false).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn test_unknown_protocol() {
    let result = encode_calldata_json(&json!({ "protocol": "unknown" }), &json!(["1"]), false);
    match result {
      Err(CalldataError::UnknownProtocol(tag)) => assert_eq!(tag, "unknown"),
      other => panic!("unexpected result: {other:?}"),
    }
  }

  #[test]
  fn test_overflowing_signal_aborts_encoding() {
    let overflow = format!("0x1{}", "0".repeat(64));
    let result = encode_calldata_json(&groth16_json(), &json!(["1", overflow]), false);
    assert!(matches!(result, Err(CalldataError::Overflow(_))));
  }

  #[test]
  fn test_short_point_is_missing_element() {
    let mut proof = groth16_json();
    proof["pi_b"] = json!([["1", "2"]]);
    let result = encode_calldata_json(&proof, &json!([]), false);
    assert!(matches!(result, Err(CalldataError::MissingElement(name)) if name == "pi_b[1]"));

    let mut proof = plonk_json();
    proof["Wxi"] = json!(["1"]);
    let result = encode_calldata_json(&proof, &json!([]), true);
    assert!(matches!(result, Err(CalldataError::MissingElement(name)) if name == "Wxi"));
  }
}
