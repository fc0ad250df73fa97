//! Core value types.

use indexmap::IndexMap;
use yaml_rust2::Yaml;

/// An atomic value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    /// Reals keep their source spelling so `1.50` is not rewritten as `1.5`.
    Real(String),
    String(String),
}

/// A document value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    List(Vec<Value>),
    Section(Section),
}

/// The variant tag of a [`Value`], used for type-compatibility checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Integer,
    Real,
    String,
    List,
    Section,
}

/// An insertion-ordered mapping from key segment to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    entries: IndexMap<String, Value>,
}

impl Value {
    /// Convenience constructor for string scalars.
    pub fn string(s: impl Into<String>) -> Self {
        Value::Scalar(Scalar::String(s.into()))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Scalar(Scalar::Null) => ValueKind::Null,
            Value::Scalar(Scalar::Bool(_)) => ValueKind::Bool,
            Value::Scalar(Scalar::Integer(_)) => ValueKind::Integer,
            Value::Scalar(Scalar::Real(_)) => ValueKind::Real,
            Value::Scalar(Scalar::String(_)) => ValueKind::String,
            Value::List(_) => ValueKind::List,
            Value::Section(_) => ValueKind::Section,
        }
    }

    /// Whether this value may stand in for `expected` during a merge.
    ///
    /// Only identical variant tags are compatible: an integer does not stand
    /// in for a real, and nothing but null stands in for null.
    pub fn is_compatible_with(&self, expected: &Value) -> bool {
        self.kind() == expected.kind()
    }

    pub fn as_section(&self) -> Option<&Section> {
        match self {
            Value::Section(section) => Some(section),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self, Value::Section(_))
    }

    /// Convert a `yaml-rust2` node into a value.
    ///
    /// Mapping keys become segments through [`key_segment`]; entries with
    /// collection keys are dropped. Aliases that the loader left unresolved
    /// and bad values become null.
    pub fn from_yaml(yaml: Yaml) -> Self {
        match yaml {
            Yaml::Real(s) => Value::Scalar(Scalar::Real(s)),
            Yaml::Integer(i) => Value::Scalar(Scalar::Integer(i)),
            Yaml::String(s) => Value::Scalar(Scalar::String(s)),
            Yaml::Boolean(b) => Value::Scalar(Scalar::Bool(b)),
            Yaml::Array(items) => Value::List(items.into_iter().map(Value::from_yaml).collect()),
            Yaml::Hash(hash) => {
                let mut section = Section::new();
                for (key, value) in hash {
                    if let Some(segment) = key_segment(&key) {
                        section.insert(segment, Value::from_yaml(value));
                    }
                }
                Value::Section(section)
            }
            Yaml::Null | Yaml::Alias(_) | Yaml::BadValue => Value::Scalar(Scalar::Null),
        }
    }

    /// Convert back into a `yaml-rust2` node for emitting.
    pub fn to_yaml(&self) -> Yaml {
        match self {
            Value::Scalar(scalar) => scalar.to_yaml(),
            Value::List(items) => Yaml::Array(items.iter().map(Value::to_yaml).collect()),
            Value::Section(section) => {
                let mut hash = yaml_rust2::yaml::Hash::new();
                for (key, value) in section.iter() {
                    hash.insert(key_yaml(key), value.to_yaml());
                }
                Yaml::Hash(hash)
            }
        }
    }
}

impl Scalar {
    pub fn to_yaml(&self) -> Yaml {
        match self {
            Scalar::Null => Yaml::Null,
            Scalar::Bool(b) => Yaml::Boolean(*b),
            Scalar::Integer(i) => Yaml::Integer(*i),
            Scalar::Real(s) => Yaml::Real(s.clone()),
            Scalar::String(s) => Yaml::String(s.clone()),
        }
    }
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Resolve a dotted key path relative to this section.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = crate::path::segments(path);
        let first = segments.next()?;
        let mut current = self.get(first)?;
        for segment in segments {
            current = current.as_section()?.get(segment)?;
        }
        Some(current)
    }
}

impl FromIterator<(String, Value)> for Section {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Section {
            entries: iter.into_iter().collect(),
        }
    }
}

/// The textual segment for a mapping key, or `None` for collection keys.
pub(crate) fn key_segment(key: &Yaml) -> Option<String> {
    match key {
        Yaml::String(s) | Yaml::Real(s) => Some(s.clone()),
        Yaml::Integer(i) => Some(i.to_string()),
        Yaml::Boolean(b) => Some(b.to_string()),
        Yaml::Null => Some("null".to_string()),
        _ => None,
    }
}

/// The node a segment is written back as.
///
/// Segments are re-resolved the way a plain scalar would be, so a key read
/// as `1:` is written as `1:` rather than `"1":`.
pub(crate) fn key_yaml(segment: &str) -> Yaml {
    match Yaml::from_str(segment) {
        Yaml::Null if segment != "null" && segment != "~" => Yaml::String(segment.to_string()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_compatibility() {
        let flag = Value::Scalar(Scalar::Bool(true));
        let text = Value::string("yes");
        assert!(!text.is_compatible_with(&flag));
        assert!(Value::Scalar(Scalar::Bool(false)).is_compatible_with(&flag));
    }

    #[test]
    fn test_integer_rejected_for_real() {
        let real = Value::Scalar(Scalar::Real("1.5".into()));
        let int = Value::Scalar(Scalar::Integer(2));
        assert!(!int.is_compatible_with(&real));
        assert!(!real.is_compatible_with(&int));
    }

    #[test]
    fn test_null_default_accepts_only_null() {
        let null = Value::Scalar(Scalar::Null);
        assert!(Value::Scalar(Scalar::Null).is_compatible_with(&null));
        assert!(!Value::string("x").is_compatible_with(&null));
        assert!(!Value::List(vec![]).is_compatible_with(&null));
        assert!(!Value::Section(Section::new()).is_compatible_with(&null));
    }

    #[test]
    fn test_from_yaml_keeps_key_order() {
        let docs = yaml_rust2::YamlLoader::load_from_str("z: 1\na: 2\nm: 3").unwrap();
        let value = Value::from_yaml(docs[0].clone());
        let keys: Vec<&str> = value.as_section().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_non_string_keys_become_segments() {
        let docs = yaml_rust2::YamlLoader::load_from_str("1: one\ntrue: yes").unwrap();
        let value = Value::from_yaml(docs[0].clone());
        let section = value.as_section().unwrap();
        assert!(section.contains_key("1"));
        assert!(section.contains_key("true"));
    }

    #[test]
    fn test_get_path() {
        let docs = yaml_rust2::YamlLoader::load_from_str("a:\n  b:\n    c: 3").unwrap();
        let value = Value::from_yaml(docs[0].clone());
        let section = value.as_section().unwrap();
        assert_eq!(
            section.get_path("a.b.c"),
            Some(&Value::Scalar(Scalar::Integer(3)))
        );
        assert!(section.get_path("a.b.c.d").is_none());
        assert!(section.get_path("a.x").is_none());
    }

    #[test]
    fn test_key_yaml_round_trip() {
        assert_eq!(key_yaml("1"), Yaml::Integer(1));
        assert_eq!(key_yaml("name"), Yaml::String("name".into()));
        assert_eq!(key_yaml("null"), Yaml::Null);
    }
}
