//! Toolkit configuration and the circuit registry.
//!
//! Both are JSON files. The configuration file is optional and only needs the keys it wants to
//! change; everything else falls back to [`Config::default`].

use std::{
  collections::BTreeMap,
  fs, io,
  path::{Path, PathBuf},
};

use circuitkit_core::{PrimeName, Protocol};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::Level;

use crate::errors::CircuitkitError;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "circuitkit.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
  /// Proof system used for setup, proving and verification
  pub protocol:     Protocol,
  /// Field the circuits are compiled against
  pub prime:        PrimeName,
  /// Compiler version written into generated main components
  pub version:      String,
  /// Path to the circuit registry
  pub circuits:     PathBuf,
  pub dir_ptau:     PathBuf,
  pub dir_circuits: PathBuf,
  pub dir_inputs:   PathBuf,
  pub dir_build:    PathBuf,
  /// Compiler optimization level, `0`, `1`, `2` or a number of `--O2` rounds above that
  pub optimization: u8,
  /// Ask the compiler to report unconstrained signals
  pub inspect:      bool,
  /// Library search paths passed to the compiler
  pub include:      Vec<PathBuf>,
  /// Also build the C++ witness generator
  pub c_witness:    bool,
  pub log_level:    String,
  pub circom_path:  String,
  pub snarkjs_path: String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      protocol:     Protocol::Groth16,
      prime:        PrimeName::Bn128,
      version:      "2.1.0".to_string(),
      circuits:     PathBuf::from("./circuits.json"),
      dir_ptau:     PathBuf::from("./ptau"),
      dir_circuits: PathBuf::from("./circuits"),
      dir_inputs:   PathBuf::from("./inputs"),
      dir_build:    PathBuf::from("./build"),
      optimization: 1,
      inspect:      true,
      include:      vec![PathBuf::from("./node_modules")],
      c_witness:    false,
      log_level:    "info".to_string(),
      circom_path:  "circom".to_string(),
      snarkjs_path: "snarkjs".to_string(),
    }
  }
}

impl Config {
  /// Parses a (possibly partial) configuration, filling in defaults for missing keys.
  pub fn from_json(json: &str) -> Result<Self, CircuitkitError> {
    let config: Config = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
  }

  /// Loads the configuration file at `path`. A missing file yields the defaults.
  pub fn from_file(path: &Path) -> Result<Self, CircuitkitError> {
    match fs::read_to_string(path) {
      Ok(json) => Self::from_json(&json),
      Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
      Err(err) => Err(err.into()),
    }
  }

  /// Checks combinations the proving tool does not support.
  pub fn validate(&self) -> Result<(), CircuitkitError> {
    if self.protocol == Protocol::Fflonk && self.prime != PrimeName::Bn128 {
      return Err(CircuitkitError::InvalidConfig(format!(
        "fflonk only supports bn128, got {}",
        self.prime
      )));
    }
    Ok(())
  }

  /// Log level named by `log_level`, falling back to `INFO`.
  pub fn level(&self) -> Level { parse_level(&self.log_level) }
}

/// Parses a log level name case-insensitively. Unknown names map to `INFO`.
pub fn parse_level(level: &str) -> Level {
  match level.to_lowercase().as_str() {
    "error" => Level::ERROR,
    "warn" => Level::WARN,
    "debug" => Level::DEBUG,
    "trace" => Level::TRACE,
    _ => Level::INFO,
  }
}

/// Registry entry describing how to instantiate a circuit's main component
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CircuitConfig {
  /// File under the circuits directory, without the `.circom` extension
  pub file:     String,
  /// Template to instantiate as `main`
  pub template: String,
  /// Template parameters
  #[serde(default)]
  pub params:   Vec<Value>,
  /// Input signals made public
  #[serde(default)]
  pub pubs:     Vec<String>,
}

/// Circuit name to circuit configuration
pub type CircuitRegistry = BTreeMap<String, CircuitConfig>;

/// Reads the circuit registry from `path`.
pub fn read_circuits(path: &Path) -> Result<CircuitRegistry, CircuitkitError> {
  let json = fs::read_to_string(path)?;
  Ok(serde_json::from_str(&json)?)
}
