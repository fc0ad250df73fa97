//! # cfgsync-yaml
//!
//! Ordered YAML document model for the cfgsync merge engine.
//!
//! This crate wraps `yaml-rust2` into a small closed value model:
//!
//! - [`Value`]: `Scalar`, `List` or `Section` (a nested, insertion-ordered mapping)
//! - [`Document`]: the root section plus depth-first [key path](path) enumeration
//! - [`emit`]: single-value serialization through `yaml_rust2::YamlEmitter`
//!
//! Key paths join segments with [`path::SEPARATOR`]. Segment names must not
//! contain the separator; this is not validated.
//!
//! ## Example
//!
//! ```rust
//! use cfgsync_yaml::Document;
//!
//! let doc = Document::parse("server:\n  port: 8080\n  tls: false\n").unwrap();
//! assert_eq!(doc.keys(true), vec!["server", "server.port", "server.tls"]);
//! assert!(doc.get("server.port").is_some());
//! ```

mod document;
mod error;
mod value;

pub mod emit;
pub mod path;

pub use document::Document;
pub use error::{Error, Result};
pub use value::{Scalar, Section, Value, ValueKind};
