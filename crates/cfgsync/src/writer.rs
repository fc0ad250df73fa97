//! Value serialization for merged output.
//!
//! Scalars (and the rare section that reaches this point) are dumped by the
//! document model as a one-entry mapping and re-indented. Lists are written
//! by hand: one `- item` line per element, two spaces deeper than the key,
//! strings single-quoted and nested collections in flow style.

use cfgsync_yaml::{Scalar, Value, emit};

use crate::Result;

/// Append `key: value` at the given indentation, ending with a newline.
pub fn write_value(out: &mut String, indent: &str, key: &str, value: &Value) -> Result<()> {
    if let Value::List(items) = value {
        return write_list(out, indent, key, items);
    }

    let dumped = emit::dump_entry(key, value)?;
    for (idx, line) in dumped.lines().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(indent);
        out.push_str(line);
    }
    out.push('\n');
    Ok(())
}

fn write_list(out: &mut String, indent: &str, key: &str, items: &[Value]) -> Result<()> {
    let key = emit::format_key(key)?;
    if items.is_empty() {
        out.push_str(&format!("{}{}: []\n", indent, key));
        return Ok(());
    }

    out.push_str(&format!("{}{}:\n", indent, key));
    for item in items {
        out.push_str(&format!("{}  - {}\n", indent, list_item(item)?));
    }
    Ok(())
}

fn list_item(item: &Value) -> Result<String> {
    let text = match item {
        Value::Scalar(Scalar::String(s)) => match emit::single_quoted(s) {
            Some(quoted) => quoted,
            None => emit::dump_scalar(&Scalar::String(s.clone()))?,
        },
        Value::Scalar(scalar) => emit::dump_scalar(scalar)?,
        nested => emit::dump_flow(nested)?,
    };
    Ok(text)
}
