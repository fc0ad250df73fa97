//! The `cfgsync.toml` job manifest.
//!
//! ```toml
//! resource_dir = "defaults"
//!
//! [[file]]
//! resource = "config.yml"
//! target = "plugins/example/config.yml"
//! ignored_sections = ["messages"]
//! override_sections = ["config-version"]
//! create_missing = true
//! ```
//!
//! Relative paths are resolved against the directory holding the manifest.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Directory the `resource` names are looked up in
    #[serde(default = "default_resource_dir")]
    pub resource_dir: PathBuf,

    #[serde(default, rename = "file")]
    pub files: Vec<FileJob>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileJob {
    pub resource: String,
    pub target: PathBuf,
    #[serde(default)]
    pub ignored_sections: Vec<String>,
    #[serde(default)]
    pub override_sections: Vec<String>,
    #[serde(default)]
    pub create_missing: bool,
}

fn default_resource_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Manifest {
    /// Read a manifest and resolve its paths against its own directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        let manifest = Self::parse(&text)
            .with_context(|| format!("Invalid manifest {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(manifest.resolve(base))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Make relative paths relative to `base`.
    pub fn resolve(mut self, base: &Path) -> Self {
        self.resource_dir = base.join(&self.resource_dir);
        for job in &mut self.files {
            job.target = base.join(&job.target);
        }
        self
    }
}
