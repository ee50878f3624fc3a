//! Where every artifact of a circuit lives.
//!
//! ```text
//! <dirCircuits>/main/<circuit>.circom
//! <dirInputs>/<circuit>/<input>.json
//! <dirBuild>/<circuit>/<circuit>.r1cs
//! <dirBuild>/<circuit>/<circuit>.sym
//! <dirBuild>/<circuit>/<circuit>_js/<circuit>.wasm
//! <dirBuild>/<circuit>/<protocol>_pkey.zkey
//! <dirBuild>/<circuit>/<protocol>_vkey.json
//! <dirBuild>/<circuit>/<protocol>_verifier.sol
//! <dirBuild>/<circuit>/<input>/witness.wtns
//! <dirBuild>/<circuit>/<input>/<protocol>_proof.json
//! <dirBuild>/<circuit>/<input>/public.json
//! <dirBuild>/<circuit>/<input>/<protocol>_calldata.txt
//! ```

use std::path::{Path, PathBuf};

use circuitkit_core::Protocol;

use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitPaths {
  circuit:      String,
  protocol:     Protocol,
  dir_circuits: PathBuf,
  dir_inputs:   PathBuf,
  dir_ptau:     PathBuf,
  build_dir:    PathBuf,
}

impl CircuitPaths {
  pub fn new(config: &Config, circuit: &str) -> Self {
    Self {
      circuit:      circuit.to_string(),
      protocol:     config.protocol,
      dir_circuits: config.dir_circuits.clone(),
      dir_inputs:   config.dir_inputs.clone(),
      dir_ptau:     config.dir_ptau.clone(),
      build_dir:    config.dir_build.join(circuit),
    }
  }

  pub fn main_dir(&self) -> PathBuf { self.dir_circuits.join("main") }

  pub fn main_component(&self) -> PathBuf {
    self.main_dir().join(format!("{}.circom", self.circuit))
  }

  pub fn build_dir(&self) -> &Path { &self.build_dir }

  pub fn r1cs(&self) -> PathBuf { self.build_dir.join(format!("{}.r1cs", self.circuit)) }

  pub fn wasm(&self) -> PathBuf {
    self.build_dir.join(format!("{}_js", self.circuit)).join(format!("{}.wasm", self.circuit))
  }

  pub fn pkey(&self) -> PathBuf { self.build_dir.join(format!("{}_pkey.zkey", self.protocol)) }

  pub fn vkey(&self) -> PathBuf { self.build_dir.join(format!("{}_vkey.json", self.protocol)) }

  pub fn verifier_contract(&self) -> PathBuf {
    self.build_dir.join(format!("{}_verifier.sol", self.protocol))
  }

  pub fn input(&self, input: &str) -> PathBuf {
    self.dir_inputs.join(&self.circuit).join(format!("{input}.json"))
  }

  /// Directory holding everything produced for one input
  pub fn input_dir(&self, input: &str) -> PathBuf { self.build_dir.join(input) }

  pub fn witness(&self, input: &str) -> PathBuf { self.input_dir(input).join("witness.wtns") }

  pub fn proof(&self, input: &str) -> PathBuf {
    self.input_dir(input).join(format!("{}_proof.json", self.protocol))
  }

  pub fn public_signals(&self, input: &str) -> PathBuf { self.input_dir(input).join("public.json") }

  pub fn calldata(&self, input: &str) -> PathBuf {
    self.input_dir(input).join(format!("{}_calldata.txt", self.protocol))
  }

  pub fn ptau(&self, ptau: &str) -> PathBuf { self.dir_ptau.join(ptau) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_layout() {
    let paths = CircuitPaths::new(&Config::default(), "multiplier_3");

    assert_eq!(paths.main_component(), PathBuf::from("./circuits/main/multiplier_3.circom"));
    assert_eq!(paths.build_dir(), Path::new("./build/multiplier_3"));
    assert_eq!(paths.r1cs(), PathBuf::from("./build/multiplier_3/multiplier_3.r1cs"));
    assert_eq!(
      paths.wasm(),
      PathBuf::from("./build/multiplier_3/multiplier_3_js/multiplier_3.wasm")
    );
    assert_eq!(paths.pkey(), PathBuf::from("./build/multiplier_3/groth16_pkey.zkey"));
    assert_eq!(paths.vkey(), PathBuf::from("./build/multiplier_3/groth16_vkey.json"));
    assert_eq!(
      paths.verifier_contract(),
      PathBuf::from("./build/multiplier_3/groth16_verifier.sol")
    );
    assert_eq!(paths.input("default"), PathBuf::from("./inputs/multiplier_3/default.json"));
    assert_eq!(
      paths.witness("default"),
      PathBuf::from("./build/multiplier_3/default/witness.wtns")
    );
    assert_eq!(
      paths.proof("default"),
      PathBuf::from("./build/multiplier_3/default/groth16_proof.json")
    );
    assert_eq!(
      paths.public_signals("default"),
      PathBuf::from("./build/multiplier_3/default/public.json")
    );
    assert_eq!(paths.ptau("hez_final_08.ptau"), PathBuf::from("./ptau/hez_final_08.ptau"));
  }

  #[test]
  fn test_protocol_prefixes_follow_config() {
    let config = Config { protocol: Protocol::Plonk, ..Config::default() };
    let paths = CircuitPaths::new(&config, "sha256");
    assert_eq!(paths.pkey(), PathBuf::from("./build/sha256/plonk_pkey.zkey"));
    assert_eq!(paths.calldata("x"), PathBuf::from("./build/sha256/x/plonk_calldata.txt"));
  }
}
