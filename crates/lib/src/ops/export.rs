//! Export formats for pulled env content.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use super::OpError;
use crate::options::ExportFormat;
use crate::records;

#[derive(Serialize)]
struct EnvValue<'a> {
  name: &'a str,
  value: &'a str,
}

#[derive(Serialize)]
struct SecretRef<'a> {
  name: &'a str,
  #[serde(rename = "valueFrom")]
  value_from: &'a str,
}

fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>, OpError> {
  let mut out = Vec::new();
  let mut serializer = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
  value
    .serialize(&mut serializer)
    .map_err(|e| OpError::Export(e.to_string()))?;
  Ok(out)
}

fn shell_quote(value: &str) -> String {
  format!("'{}'", value.replace('\'', r"'\''"))
}

/// Render concatenated env content in `format`. Records keep file order.
pub fn format_export(format: ExportFormat, env: &[u8]) -> Result<Vec<u8>, OpError> {
  let records = records::parse(env).map_err(|e| OpError::Export(e.to_string()))?;

  match format {
    ExportFormat::TerminalExport => {
      let mut out = String::new();
      for (name, value) in &records {
        out.push_str(&format!("export {}={}\n", name, shell_quote(value)));
      }
      Ok(out.into_bytes())
    }
    ExportFormat::JsonObject => {
      let object: Map<String, Value> = records
        .into_iter()
        .map(|(name, value)| (name, Value::String(value)))
        .collect();
      to_json(&object)
    }
    ExportFormat::TaskDefEnv => {
      let env: Vec<EnvValue<'_>> = records
        .iter()
        .map(|(name, value)| EnvValue { name, value })
        .collect();
      to_json(&env)
    }
    ExportFormat::TaskDefSecrets => {
      let secrets: Vec<SecretRef<'_>> = records
        .iter()
        .map(|(name, value)| SecretRef { name, value_from: value })
        .collect();
      to_json(&secrets)
    }
  }
}
