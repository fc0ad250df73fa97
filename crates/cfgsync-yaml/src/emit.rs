//! Single-value serialization.
//!
//! Everything here goes through `yaml_rust2::YamlEmitter` so quoting follows
//! the emitter's rules. The only hand-written form is [`dump_flow`], which
//! the emitter has no option for.

use crate::value::{Scalar, Value, key_yaml};
use crate::Result;
use yaml_rust2::{Yaml, YamlEmitter};

/// Dump a single node, without the document start marker.
fn emit(node: &Yaml) -> Result<String> {
    let mut out = String::new();
    {
        let mut emitter = YamlEmitter::new(&mut out);
        emitter.dump(node)?;
    }
    let body = out.strip_prefix("---").unwrap_or(&out);
    let body = body
        .strip_prefix('\n')
        .or_else(|| body.strip_prefix(' '))
        .unwrap_or(body);
    Ok(body.to_string())
}

/// Dump a value on its own, as block YAML.
pub fn dump(value: &Value) -> Result<String> {
    emit(&value.to_yaml())
}

/// Dump `key: value` as a single-entry mapping.
///
/// Scalars stay on the key line; sections and non-empty lists continue on
/// following lines, indented relative to the key. There is no trailing newline.
pub fn dump_entry(key: &str, value: &Value) -> Result<String> {
    let mut hash = yaml_rust2::yaml::Hash::new();
    hash.insert(key_yaml(key), value.to_yaml());
    emit(&Yaml::Hash(hash))
}

/// The text a key segment is written as in front of its `:`.
pub fn format_key(segment: &str) -> Result<String> {
    emit(&key_yaml(segment))
}

/// Dump a value in flow style (`[a, b]`, `{k: v}`) on a single line.
pub fn dump_flow(value: &Value) -> Result<String> {
    match value {
        Value::Scalar(scalar) => dump_scalar(scalar),
        Value::List(items) => {
            let parts = items.iter().map(dump_flow).collect::<Result<Vec<_>>>()?;
            Ok(format!("[{}]", parts.join(", ")))
        }
        Value::Section(section) => {
            let parts = section
                .iter()
                .map(|(key, value)| Ok(format!("{}: {}", format_key(key)?, dump_flow(value)?)))
                .collect::<Result<Vec<_>>>()?;
            Ok(format!("{{{}}}", parts.join(", ")))
        }
    }
}

pub fn dump_scalar(scalar: &Scalar) -> Result<String> {
    emit(&scalar.to_yaml())
}

/// Single-quote a string (`'it''s'`).
///
/// Returns `None` when the string holds control characters such as line
/// breaks, which single-quoted scalars cannot carry verbatim.
pub fn single_quoted(s: &str) -> Option<String> {
    if s.chars().any(char::is_control) {
        return None;
    }
    Some(format!("'{}'", s.replace('\'', "''")))
}
