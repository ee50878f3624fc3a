//! Builders for synthetic R1CS files.

use byteorder::{LittleEndian, WriteBytesExt};
use num_bigint::BigUint;

use crate::r1cs::HEADER_SECTION;

/// Counts written into a synthetic header section.
#[derive(Clone, Copy, Debug)]
pub struct HeaderCounts {
  pub wires:          u32,
  pub public_outputs: u32,
  pub public_inputs:  u32,
  pub private_inputs: u32,
  pub labels:         u64,
  pub constraints:    u32,
}

pub const COUNTS: HeaderCounts = HeaderCounts {
  wires:          7,
  public_outputs: 1,
  public_inputs:  2,
  private_inputs: 3,
  labels:         9,
  constraints:    42,
};

/// Body of a header section with a 32 byte field.
pub fn header_body(prime: &BigUint, counts: &HeaderCounts) -> Vec<u8> {
  let mut body = vec![];
  body.write_u32::<LittleEndian>(32).unwrap();
  let mut prime_bytes = prime.to_bytes_le();
  prime_bytes.resize(32, 0);
  body.extend_from_slice(&prime_bytes);
  body.write_u32::<LittleEndian>(counts.wires).unwrap();
  body.write_u32::<LittleEndian>(counts.public_outputs).unwrap();
  body.write_u32::<LittleEndian>(counts.public_inputs).unwrap();
  body.write_u32::<LittleEndian>(counts.private_inputs).unwrap();
  body.write_u64::<LittleEndian>(counts.labels).unwrap();
  body.write_u32::<LittleEndian>(counts.constraints).unwrap();
  body
}

/// A complete file declaring `section_count` sections, followed by `sections` as given.
pub fn r1cs_bytes(section_count: u32, sections: &[(u32, Vec<u8>)]) -> Vec<u8> {
  let mut bytes = b"r1cs".to_vec();
  bytes.write_u32::<LittleEndian>(1).unwrap();
  bytes.write_u32::<LittleEndian>(section_count).unwrap();
  for (section_type, body) in sections {
    bytes.write_u32::<LittleEndian>(*section_type).unwrap();
    bytes.write_u64::<LittleEndian>(body.len() as u64).unwrap();
    bytes.extend_from_slice(body);
  }
  bytes
}

/// A file holding a single header section.
pub fn header_only(prime: &BigUint, counts: &HeaderCounts) -> Vec<u8> {
  r1cs_bytes(1, &[(HEADER_SECTION, header_body(prime, counts))])
}
