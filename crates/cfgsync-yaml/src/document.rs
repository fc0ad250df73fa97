//! Document loading and key enumeration.

use crate::path;
use crate::value::{Section, Value};
use crate::{Error, Result};
use yaml_rust2::{Yaml, YamlLoader};

/// A loaded document: an ordered root section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    root: Section,
}

impl Document {
    /// Parse a document from text.
    ///
    /// Only the first YAML document in the text is used. Empty input (or a
    /// document that is just `~`) yields an empty root section.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for invalid YAML and [`Error::InvalidStructure`]
    /// when the root is not a mapping.
    pub fn parse(text: &str) -> Result<Self> {
        let mut docs = YamlLoader::load_from_str(text)?;
        if docs.is_empty() {
            return Ok(Self::default());
        }

        match Value::from_yaml(docs.swap_remove(0)) {
            Value::Section(root) => Ok(Self { root }),
            Value::Scalar(crate::Scalar::Null) => Ok(Self::default()),
            other => Err(Error::InvalidStructure(format!(
                "document root must be a mapping, found {:?}",
                other.kind()
            ))),
        }
    }

    pub fn from_section(root: Section) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Section {
        &self.root
    }

    /// Enumerate key paths in document order.
    ///
    /// With `deep`, the enumeration is pre-order: every section path comes
    /// before the paths of its descendants. List elements are never keys.
    pub fn keys(&self, deep: bool) -> Vec<String> {
        let mut out = Vec::new();
        collect_keys(&self.root, "", deep, &mut out);
        out
    }

    pub fn get(&self, key_path: &str) -> Option<&Value> {
        self.root.get_path(key_path)
    }

    pub fn contains(&self, key_path: &str) -> bool {
        self.get(key_path).is_some()
    }

    /// Whether the path resolves to a section.
    pub fn is_section(&self, key_path: &str) -> bool {
        self.get(key_path).is_some_and(Value::is_section)
    }

    /// Convert back to a `yaml-rust2` node.
    pub fn to_yaml(&self) -> Yaml {
        Value::Section(self.root.clone()).to_yaml()
    }
}

fn collect_keys(section: &Section, prefix: &str, deep: bool, out: &mut Vec<String>) {
    for (key, value) in section.iter() {
        let full = path::join(prefix, key);
        out.push(full.clone());
        if deep {
            if let Value::Section(child) = value {
                collect_keys(child, &full, deep, out);
            }
        }
    }
}
