//! # R1CS Module
//!
//! Reads the metadata of a compiled circuit straight from the compiler's binary `.r1cs` output
//! without touching the constraint list, which can be arbitrarily large.
//!
//! ## Layout
//!
//! All integers are little-endian. The file starts with a 4 byte magic, a 4 byte version and a
//! 4 byte section count, followed by sections of the form `type: u32, size: u64, body`.
//!
//! - Section `1` (header): field width, 32 byte prime, wire count, public output count, public
//!   input count, private input count, label count (`u64`) and constraint count.
//! - Section `4` (custom gates used): a 4 byte flag.
//! - Every other section is skipped by its declared size.
//!
//! ## Functions
//!
//! - `read_header`: Opens a file and reads its metadata.
//! - `read_header_from`: Reads metadata from any reader.
//! - `le_bytes_to_uint`: Decodes a little-endian byte string of any width.
use std::{
  fs::OpenOptions,
  io::{self, BufReader, Read},
  path::Path,
};

use num_bigint::BigUint;
use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use crate::{
  error::R1csError,
  primes::{prime_name, PrimeName},
};

/// Section holding the field and the circuit counts
pub const HEADER_SECTION: u32 = 1;
/// Section flagging whether custom gates are used
pub const CUSTOM_GATES_USED_SECTION: u32 = 4;

/// Bytes of the header section that are interpreted: field width, prime, five `u32` counts and
/// one `u64` label count.
const HEADER_SECTION_LEN: u64 = 4 + 32 + 4 * 5 + 8;
const PRIME_LEN: usize = 32;

/// Metadata of a compiled circuit
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct R1csMetadata {
  /// Number of wires
  pub wires:            u32,
  /// Number of constraints
  pub constraints:      u32,
  /// Number of private inputs
  pub private_inputs:   u32,
  /// Number of public inputs
  pub public_inputs:    u32,
  /// Number of public outputs
  pub public_outputs:   u32,
  /// Number of labels
  pub labels:           u64,
  /// Whether the circuit uses custom gates
  pub use_custom_gates: bool,
  /// Field modulus
  #[serde(serialize_with = "serialize_decimal")]
  pub prime:            BigUint,
  /// Name of the field modulus, if it is a known one
  pub prime_name:       Option<PrimeName>,
}

fn serialize_decimal<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
  serializer.serialize_str(&value.to_str_radix(10))
}

/// Decodes little-endian bytes by reversing them and reading the result as a big-endian integer.
/// Every field of the header, whatever its width, goes through here.
pub fn le_bytes_to_uint(bytes: &[u8]) -> BigUint {
  let mut big_endian = bytes.to_vec();
  big_endian.reverse();
  BigUint::from_bytes_be(&big_endian)
}

/// Reads the metadata of the R1CS file at `path`.
pub fn read_header(path: impl AsRef<Path>) -> Result<R1csMetadata, R1csError> {
  let path = path.as_ref();
  debug!("reading r1cs header from {:?}", path);
  let reader = BufReader::new(OpenOptions::new().read(true).open(path)?);
  read_header_from(reader)
}

/// Reads the metadata of an R1CS file from a reader.
///
/// The section loop runs `section_count + 1` times so that a trailing section is still picked
/// up. When no trailing section exists the extra pass finds a clean end of file and stops.
pub fn read_header_from<R: Read>(reader: R) -> Result<R1csMetadata, R1csError> {
  let mut reader = SectionReader::new(reader);

  let magic = reader.read_bytes(4)?;
  let version = reader.read_u32()?;
  trace!("magic={:?}, version={}", magic, version);

  let section_count = reader.read_u32()?;
  debug!("section_count={}", section_count);

  let mut metadata = R1csMetadata::default();
  for index in 0..=section_count {
    let section_type = if index == section_count {
      match reader.try_read_u32()? {
        Some(section_type) => section_type,
        None => break,
      }
    } else {
      reader.read_u32()?
    };
    let section_size = reader.read_u64()?;
    trace!(
      "section {}: type={}, size={}, offset={}",
      index,
      section_type,
      section_size,
      reader.offset
    );

    match section_type {
      HEADER_SECTION => {
        check_size(section_type, section_size, HEADER_SECTION_LEN)?;
        read_header_section(&mut reader, &mut metadata)?;
        reader.skip(section_size - HEADER_SECTION_LEN)?;
      },
      CUSTOM_GATES_USED_SECTION => {
        check_size(section_type, section_size, 4)?;
        metadata.use_custom_gates = reader.read_u32()? != 0;
        reader.skip(section_size - 4)?;
      },
      _ => reader.skip(section_size)?,
    }
  }

  metadata.prime_name = prime_name(&metadata.prime);
  debug!(
    "r1cs: wires={}, constraints={}, prime={:?}",
    metadata.wires, metadata.constraints, metadata.prime_name
  );
  Ok(metadata)
}

fn check_size(section: u32, size: u64, needed: u64) -> Result<(), R1csError> {
  if size < needed {
    return Err(R1csError::MalformedSection { section, size, needed });
  }
  Ok(())
}

fn read_header_section<R: Read>(
  reader: &mut SectionReader<R>,
  metadata: &mut R1csMetadata,
) -> Result<(), R1csError> {
  let field_size = reader.read_u32()?;
  trace!("field_size={}", field_size);
  metadata.prime = reader.read_uint(PRIME_LEN)?;
  metadata.wires = reader.read_u32()?;
  metadata.public_outputs = reader.read_u32()?;
  metadata.public_inputs = reader.read_u32()?;
  metadata.private_inputs = reader.read_u32()?;
  metadata.labels = reader.read_u64()?;
  metadata.constraints = reader.read_u32()?;
  Ok(())
}

/// Lowest 64 bits of a value decoded from at most 8 bytes.
fn low_u64(value: &BigUint) -> u64 { value.iter_u64_digits().next().unwrap_or_default() }

/// Sequential reader that keeps track of its offset so truncation errors can say where they
/// happened.
struct SectionReader<R> {
  inner:  R,
  offset: u64,
}

impl<R: Read> SectionReader<R> {
  fn new(inner: R) -> Self { Self { inner, offset: 0 } }

  fn read_bytes(&mut self, width: usize) -> Result<Vec<u8>, R1csError> {
    let mut buf = vec![0u8; width];
    self.inner.read_exact(&mut buf).map_err(|err| match err.kind() {
      io::ErrorKind::UnexpectedEof =>
        R1csError::Truncated { offset: self.offset, wanted: width as u64 },
      _ => R1csError::Io(err),
    })?;
    self.offset += width as u64;
    Ok(buf)
  }

  fn read_uint(&mut self, width: usize) -> Result<BigUint, R1csError> {
    Ok(le_bytes_to_uint(&self.read_bytes(width)?))
  }

  fn read_u32(&mut self) -> Result<u32, R1csError> { Ok(low_u64(&self.read_uint(4)?) as u32) }

  fn read_u64(&mut self) -> Result<u64, R1csError> { Ok(low_u64(&self.read_uint(8)?)) }

  /// Like `read_u32`, but returns `None` if the reader is exactly at end of file.
  fn try_read_u32(&mut self) -> Result<Option<u32>, R1csError> {
    let mut buf = [0u8; 4];
    let mut filled = 0;
    while filled < buf.len() {
      match self.inner.read(&mut buf[filled..]) {
        Ok(0) => break,
        Ok(n) => filled += n,
        Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
        Err(err) => return Err(R1csError::Io(err)),
      }
    }
    match filled {
      0 => Ok(None),
      4 => {
        self.offset += 4;
        Ok(Some(low_u64(&le_bytes_to_uint(&buf)) as u32))
      },
      _ => Err(R1csError::Truncated { offset: self.offset, wanted: 4 }),
    }
  }

  fn skip(&mut self, len: u64) -> Result<(), R1csError> {
    let skipped = io::copy(&mut self.inner.by_ref().take(len), &mut io::sink())?;
    if skipped < len {
      return Err(R1csError::Truncated { offset: self.offset + skipped, wanted: len - skipped });
    }
    self.offset += len;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::{fs, io::Cursor};

  use byteorder::{LittleEndian, WriteBytesExt};
  use tempdir::TempDir;

  use super::*;
  use crate::test_utils::{header_body, header_only, r1cs_bytes, HeaderCounts, COUNTS};

  fn bn128() -> BigUint { PrimeName::Bn128.value() }

  #[test]
  fn test_le_bytes_to_uint() {
    assert_eq!(le_bytes_to_uint(&[42, 0, 0, 0]), BigUint::from(42u32));
    assert_eq!(le_bytes_to_uint(&[1, 0, 0, 0, 0, 0, 0, 1]), BigUint::from((1u64 << 56) + 1));
    assert_eq!(le_bytes_to_uint(&[0xff; 8]), BigUint::from(u64::MAX));
    assert_eq!(le_bytes_to_uint(&[]), BigUint::from(0u32));

    let mut prime_bytes = bn128().to_bytes_le();
    prime_bytes.resize(32, 0);
    assert_eq!(le_bytes_to_uint(&prime_bytes), bn128());
  }

  #[test]
  #[tracing_test::traced_test]
  fn test_single_header_section() {
    let bytes = header_only(&bn128(), &COUNTS);
    let metadata = read_header_from(Cursor::new(bytes)).unwrap();

    assert_eq!(metadata.constraints, 42);
    assert_eq!(metadata.wires, 7);
    assert_eq!(metadata.public_outputs, 1);
    assert_eq!(metadata.public_inputs, 2);
    assert_eq!(metadata.private_inputs, 3);
    assert_eq!(metadata.labels, 9);
    assert!(!metadata.use_custom_gates);
    assert_eq!(metadata.prime, bn128());
    assert_eq!(metadata.prime_name, Some(PrimeName::Bn128));
  }

  #[test]
  fn test_large_label_count() {
    let counts = HeaderCounts { labels: u64::from(u32::MAX) + 5, ..COUNTS };
    let bytes = header_only(&bn128(), &counts);
    let metadata = read_header_from(Cursor::new(bytes)).unwrap();
    assert_eq!(metadata.labels, u64::from(u32::MAX) + 5);
  }

  #[test]
  fn test_skips_other_sections_and_reads_custom_gates() {
    let mut gates = vec![];
    gates.write_u32::<LittleEndian>(1).unwrap();
    gates.extend_from_slice(&[0xaa; 12]);

    let bytes = r1cs_bytes(3, &[
      (2, vec![0xff; 40]),
      (HEADER_SECTION, header_body(&bn128(), &COUNTS)),
      (CUSTOM_GATES_USED_SECTION, gates),
    ]);
    let metadata = read_header_from(Cursor::new(bytes)).unwrap();
    assert!(metadata.use_custom_gates);
    assert_eq!(metadata.constraints, 42);
  }

  #[test]
  fn test_custom_gates_flag_zero() {
    let bytes = r1cs_bytes(2, &[
      (HEADER_SECTION, header_body(&bn128(), &COUNTS)),
      (CUSTOM_GATES_USED_SECTION, vec![0, 0, 0, 0]),
    ]);
    assert!(!read_header_from(Cursor::new(bytes)).unwrap().use_custom_gates);
  }

  #[test]
  fn test_trailing_section_beyond_count_is_read() {
    let bytes = r1cs_bytes(1, &[
      (HEADER_SECTION, header_body(&bn128(), &COUNTS)),
      (CUSTOM_GATES_USED_SECTION, vec![1, 0, 0, 0]),
    ]);
    assert!(read_header_from(Cursor::new(bytes)).unwrap().use_custom_gates);
  }

  #[test]
  fn test_header_section_padding_is_skipped() {
    let mut body = header_body(&bn128(), &COUNTS);
    body.extend_from_slice(&[0; 8]);
    let gates = vec![1, 0, 0, 0];
    let bytes = r1cs_bytes(2, &[(HEADER_SECTION, body), (CUSTOM_GATES_USED_SECTION, gates)]);
    let metadata = read_header_from(Cursor::new(bytes)).unwrap();
    assert_eq!(metadata.constraints, 42);
    assert!(metadata.use_custom_gates);
  }

  #[test]
  fn test_unknown_prime_has_no_name() {
    let bytes = header_only(&BigUint::from(1u32), &COUNTS);
    let metadata = read_header_from(Cursor::new(bytes)).unwrap();
    assert_eq!(metadata.prime, BigUint::from(1u32));
    assert_eq!(metadata.prime_name, None);
  }

  #[test]
  fn test_truncated_header() {
    let mut bytes = header_only(&bn128(), &COUNTS);
    bytes.truncate(12 + 12 + 40);
    assert!(matches!(read_header_from(Cursor::new(bytes)), Err(R1csError::Truncated { .. })));
  }

  #[test]
  fn test_truncated_skipped_section() {
    let mut bytes = r1cs_bytes(1, &[(2, vec![0; 100])]);
    bytes.truncate(bytes.len() - 10);
    let err = read_header_from(Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, R1csError::Truncated { wanted: 10, .. }));
  }

  #[test]
  fn test_missing_declared_section_is_truncation() {
    let bytes = r1cs_bytes(2, &[(HEADER_SECTION, header_body(&bn128(), &COUNTS))]);
    assert!(matches!(read_header_from(Cursor::new(bytes)), Err(R1csError::Truncated { .. })));
  }

  #[test]
  fn test_undersized_header_section() {
    let bytes = r1cs_bytes(1, &[(HEADER_SECTION, vec![0; 10])]);
    assert!(matches!(
      read_header_from(Cursor::new(bytes)),
      Err(R1csError::MalformedSection { section: 1, size: 10, needed: 64 })
    ));
  }

  #[test]
  #[tracing_test::traced_test]
  fn test_read_header_from_file() {
    let dir = TempDir::new("r1cs").unwrap();
    let path = dir.path().join("circuit.r1cs");
    fs::write(&path, header_only(&bn128(), &COUNTS)).unwrap();

    let metadata = read_header(&path).unwrap();
    assert_eq!(metadata.constraints, 42);

    let missing = read_header(dir.path().join("missing.r1cs"));
    assert!(matches!(missing, Err(R1csError::Io(_))));
  }

  #[test]
  fn test_metadata_json() {
    let bytes = header_only(&bn128(), &COUNTS);
    let json = serde_json::to_value(read_header_from(Cursor::new(bytes)).unwrap()).unwrap();
    assert_eq!(json["constraints"], 42);
    assert_eq!(json["primeName"], "bn128");
    assert_eq!(json["prime"], PrimeName::Bn128.as_decimal());
  }
}
