//! Orchestration layer of the circuit toolkit.
//!
//! [`Circuitkit`] ties the configuration, the artifact layout and the external tools together.
//! Compilation is delegated to `circom`, witness generation and all proof-system work to
//! `snarkjs`; reading R1CS metadata and encoding calldata happen in-process through
//! `circuitkit_core`.

use std::{
  fs, io,
  path::{Path, PathBuf},
};

use circuitkit_core::{encode_calldata_json, read_header, R1csMetadata};
use serde_json::Value;
use tracing::{debug, info, warn};

pub mod config;
pub mod errors;
pub mod instantiate;
pub mod paths;
pub mod process;

use crate::{
  config::{read_circuits, CircuitRegistry, Config},
  errors::CircuitkitError,
  paths::CircuitPaths,
  process::{Completion, Invocation},
};

/// What the proving tool prints when it rejects a proof.
const INVALID_PROOF: &str = "Invalid proof";

pub struct Circuitkit {
  pub config: Config,
}

impl Circuitkit {
  pub fn new(config: Config) -> Result<Self, CircuitkitError> {
    config.validate()?;
    Ok(Self { config })
  }

  pub fn paths(&self, circuit: &str) -> CircuitPaths { CircuitPaths::new(&self.config, circuit) }

  pub fn circuits(&self) -> Result<CircuitRegistry, CircuitkitError> {
    read_circuits(&self.config.circuits)
  }

  /// Writes the main component of `circuit` from its registry entry and returns its path.
  pub fn instantiate(&self, circuit: &str) -> Result<PathBuf, CircuitkitError> {
    let circuits = self.circuits()?;
    let circuit_config =
      circuits.get(circuit).ok_or_else(|| CircuitkitError::CircuitNotFound(circuit.to_string()))?;

    let paths = self.paths(circuit);
    fs::create_dir_all(paths.main_dir())?;
    let target = paths.main_component();
    fs::write(&target, instantiate::render_main_component(circuit_config, &self.config.version))?;
    info!("instantiated {} at {:?}", circuit, target);
    Ok(target)
  }

  /// Instantiates and compiles `circuit`, returning its build directory.
  pub fn compile(&self, circuit: &str) -> Result<PathBuf, CircuitkitError> {
    self.instantiate(circuit)?;
    let paths = self.paths(circuit);
    fs::create_dir_all(paths.build_dir())?;
    self.compile_invocation(&paths).run()?;
    info!("compiled {} into {:?}", circuit, paths.build_dir());
    Ok(paths.build_dir().to_path_buf())
  }

  /// Reads the metadata of the compiled `circuit`.
  pub fn info(&self, circuit: &str) -> Result<R1csMetadata, CircuitkitError> {
    let metadata = read_header(self.paths(circuit).r1cs())?;
    match metadata.prime_name {
      None => warn!("{} was compiled against an unknown prime {}", circuit, metadata.prime),
      Some(prime) if prime != self.config.prime =>
        warn!("{} was compiled against {}, config says {}", circuit, prime, self.config.prime),
      Some(_) => {},
    }
    Ok(metadata)
  }

  /// Computes the witness of `circuit` for the named input.
  pub fn witness(&self, circuit: &str, input: &str) -> Result<PathBuf, CircuitkitError> {
    let paths = self.paths(circuit);
    fs::create_dir_all(paths.input_dir(input))?;
    self.witness_invocation(&paths, input).run()?;
    Ok(paths.witness(input))
  }

  /// Creates the proving and verification keys of `circuit` from a powers-of-tau file.
  ///
  /// Phase-2 contributions are left to the proving tool; the keys are suitable for development.
  pub fn setup(&self, circuit: &str, ptau: &str) -> Result<PathBuf, CircuitkitError> {
    let paths = self.paths(circuit);
    self.setup_invocation(&paths, ptau).run()?;
    self.export_vkey_invocation(&paths).run()?;
    info!("created {:?} and {:?}", paths.pkey(), paths.vkey());
    Ok(paths.pkey())
  }

  /// Proves `circuit` on the named input, computing the witness first if needed.
  pub fn prove(&self, circuit: &str, input: &str) -> Result<PathBuf, CircuitkitError> {
    let paths = self.paths(circuit);
    if !paths.witness(input).exists() {
      debug!("no witness for {}/{}, computing it", circuit, input);
      self.witness(circuit, input)?;
    }
    self.prove_invocation(&paths, input).run()?;
    Ok(paths.proof(input))
  }

  /// Verifies the proof of `circuit` on the named input.
  ///
  /// `Ok(false)` means the tool ran and rejected the proof. Missing artifacts and tool failures
  /// are errors.
  pub fn verify(&self, circuit: &str, input: &str) -> Result<bool, CircuitkitError> {
    let paths = self.paths(circuit);
    for artifact in [paths.vkey(), paths.public_signals(input), paths.proof(input)] {
      require(&artifact)?;
    }
    let verified = verification_outcome(self.verify_invocation(&paths, input).complete()?)?;
    info!("{}/{} verified: {}", circuit, input, verified);
    Ok(verified)
  }

  /// Exports a Solidity verifier for `circuit`.
  pub fn contract(&self, circuit: &str) -> Result<PathBuf, CircuitkitError> {
    let paths = self.paths(circuit);
    self.contract_invocation(&paths).run()?;
    Ok(paths.verifier_contract())
  }

  /// Encodes the proof of `circuit` on the named input as verifier calldata, saving a copy next
  /// to the proof.
  pub fn calldata(
    &self,
    circuit: &str,
    input: &str,
    pretty: bool,
  ) -> Result<String, CircuitkitError> {
    let paths = self.paths(circuit);
    let proof: Value = serde_json::from_str(&fs::read_to_string(paths.proof(input))?)?;
    let public_signals: Value =
      serde_json::from_str(&fs::read_to_string(paths.public_signals(input))?)?;
    let calldata = encode_calldata_json(&proof, &public_signals, pretty)?;
    fs::write(paths.calldata(input), &calldata)?;
    Ok(calldata)
  }

  /// Removes the build directory and main component of `circuit`.
  pub fn clean(&self, circuit: &str) -> Result<(), CircuitkitError> {
    let paths = self.paths(circuit);
    if paths.build_dir().exists() {
      fs::remove_dir_all(paths.build_dir())?;
    }
    if paths.main_component().exists() {
      fs::remove_file(paths.main_component())?;
    }
    info!("cleaned {}", circuit);
    Ok(())
  }

  fn compile_invocation(&self, paths: &CircuitPaths) -> Invocation {
    let config = &self.config;
    let mut invocation = Invocation::new(&config.circom_path)
      .arg(paths.main_component())
      .arg("-o")
      .arg(paths.build_dir())
      .args(["-p", config.prime.as_str()])
      .args(["--r1cs", "--sym", "--wasm"]);

    invocation = match config.optimization {
      0 => invocation.arg("--O0"),
      1 => invocation.arg("--O1"),
      2 => invocation.arg("--O2"),
      rounds => invocation.arg("--O2round").arg(rounds.to_string()),
    };
    if config.inspect {
      invocation = invocation.arg("--inspect");
    }
    if config.c_witness {
      invocation = invocation.arg("--c");
    }
    for include in &config.include {
      invocation = invocation.arg("-l").arg(include);
    }
    invocation
  }

  fn snarkjs(&self) -> Invocation { Invocation::new(&self.config.snarkjs_path) }

  fn witness_invocation(&self, paths: &CircuitPaths, input: &str) -> Invocation {
    self
      .snarkjs()
      .args(["wtns", "calculate"])
      .arg(paths.wasm())
      .arg(paths.input(input))
      .arg(paths.witness(input))
  }

  fn setup_invocation(&self, paths: &CircuitPaths, ptau: &str) -> Invocation {
    self
      .snarkjs()
      .args([self.config.protocol.as_str(), "setup"])
      .arg(paths.r1cs())
      .arg(paths.ptau(ptau))
      .arg(paths.pkey())
  }

  fn export_vkey_invocation(&self, paths: &CircuitPaths) -> Invocation {
    self.snarkjs().args(["zkey", "export", "verificationkey"]).arg(paths.pkey()).arg(paths.vkey())
  }

  fn prove_invocation(&self, paths: &CircuitPaths, input: &str) -> Invocation {
    self
      .snarkjs()
      .args([self.config.protocol.as_str(), "prove"])
      .arg(paths.pkey())
      .arg(paths.witness(input))
      .arg(paths.proof(input))
      .arg(paths.public_signals(input))
  }

  fn verify_invocation(&self, paths: &CircuitPaths, input: &str) -> Invocation {
    self
      .snarkjs()
      .args([self.config.protocol.as_str(), "verify"])
      .arg(paths.vkey())
      .arg(paths.public_signals(input))
      .arg(paths.proof(input))
  }

  fn contract_invocation(&self, paths: &CircuitPaths) -> Invocation {
    self
      .snarkjs()
      .args(["zkey", "export", "solidityverifier"])
      .arg(paths.pkey())
      .arg(paths.verifier_contract())
  }
}

fn require(artifact: &Path) -> Result<(), CircuitkitError> {
  if artifact.exists() {
    return Ok(());
  }
  Err(io::Error::new(io::ErrorKind::NotFound, format!("{} not found", artifact.display())).into())
}

/// Accepted, rejected, or the tool itself failed.
fn verification_outcome(completion: Completion) -> Result<bool, CircuitkitError> {
  if completion.success {
    return Ok(true);
  }
  if completion.mentions(INVALID_PROOF) {
    return Ok(false);
  }
  completion.into_result().map(|_| false)
}
