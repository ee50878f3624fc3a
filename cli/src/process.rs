//! Invocations of the external compiler and proving tool.

use std::{
  ffi::{OsStr, OsString},
  process::Command,
};

use tracing::{debug, error, info};

use crate::errors::CircuitkitError;

/// A program and its arguments, built up front so it can be inspected before it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub program: String,
  pub args:    Vec<OsString>,
}

impl Invocation {
  pub fn new(program: impl Into<String>) -> Self { Self { program: program.into(), args: vec![] } }

  pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
    self.args.push(arg.as_ref().to_os_string());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>, {
    self.args.extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
    self
  }

  /// Runs the program to completion and returns its stdout. A non-zero exit is an error carrying
  /// the program's stderr.
  pub fn run(&self) -> Result<String, CircuitkitError> { self.complete()?.into_result() }

  /// Runs the program to completion and captures its output, whatever its exit status.
  pub fn complete(&self) -> Result<Completion, CircuitkitError> {
    info!("running {}", self);
    let output = Command::new(&self.program).args(&self.args).output()?;
    let completion = Completion {
      program: self.program.clone(),
      success: output.status.success(),
      status:  output.status.to_string(),
      stdout:  String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr:  String::from_utf8_lossy(&output.stderr).trim().to_string(),
    };
    if !completion.stdout.is_empty() {
      debug!("{}", completion.stdout.trim_end());
    }
    if !completion.stderr.is_empty() {
      debug!("{}", completion.stderr);
    }
    Ok(completion)
  }
}

impl std::fmt::Display for Invocation {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      write!(f, " {}", arg.to_string_lossy())?;
    }
    Ok(())
  }
}

/// Exit status and captured output of a finished program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
  pub program: String,
  pub success: bool,
  pub status:  String,
  pub stdout:  String,
  pub stderr:  String,
}

impl Completion {
  /// Whether `text` appears in either output stream.
  pub fn mentions(&self, text: &str) -> bool {
    self.stdout.contains(text) || self.stderr.contains(text)
  }

  /// Stdout on success, `CommandFailed` otherwise.
  pub fn into_result(self) -> Result<String, CircuitkitError> {
    if self.success {
      return Ok(self.stdout);
    }
    error!("{} failed: {}", self.program, self.stderr);
    Err(CircuitkitError::CommandFailed {
      program: self.program,
      status:  self.status,
      stderr:  self.stderr,
    })
  }
}
