//! Generates the `main` component file the compiler is pointed at.

use serde_json::Value;

use crate::config::CircuitConfig;

/// Renders a main component instantiating `circuit.template` with its parameters and public
/// signals. The file is written one directory below the circuits directory, hence the `../`
/// include.
pub fn render_main_component(circuit: &CircuitConfig, version: &str) -> String {
  let params: Vec<String> = circuit.params.iter().map(render_param).collect();
  let public = if circuit.pubs.is_empty() {
    String::new()
  } else {
    format!(" {{public[{}]}}", circuit.pubs.join(", "))
  };

  format!(
    "// auto-generated by circuitkit\npragma circom {version};\n\ninclude \"../{file}.circom\";\n\n\
     component main{public} = {template}({params});\n",
    file = circuit.file,
    template = circuit.template,
    params = params.join(", "),
  )
}

/// Numbers and arrays are written as JSON; strings are written verbatim so they can hold
/// expressions such as `2**8`.
fn render_param(param: &Value) -> String {
  match param {
    Value::String(expression) => expression.clone(),
    Value::Array(items) =>
      format!("[{}]", items.iter().map(render_param).collect::<Vec<_>>().join(", ")),
    other => other.to_string(),
  }
}
