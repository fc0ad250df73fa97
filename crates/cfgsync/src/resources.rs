//! Where default documents come from.
//!
//! The updater is handed a [`ResourceProvider`] when it is constructed and
//! asks it for the shipped default by name. Providers are chosen once by the
//! caller; [`Resources`] bundles the built-in ones for callers that decide
//! at runtime.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use include_dir::Dir;

use crate::{Result, SyncError};

/// A source of shipped default documents.
pub trait ResourceProvider {
    /// Load the text of the resource called `name`.
    ///
    /// # Errors
    ///
    /// [`SyncError::ResourceNotFound`] if there is no such resource.
    fn load(&self, name: &str) -> Result<String>;
}

impl<T: ResourceProvider + ?Sized> ResourceProvider for &T {
    fn load(&self, name: &str) -> Result<String> {
        (**self).load(name)
    }
}

impl<T: ResourceProvider + ?Sized> ResourceProvider for Box<T> {
    fn load(&self, name: &str) -> Result<String> {
        (**self).load(name)
    }
}

/// Resources stored as files under a directory.
#[derive(Debug, Clone)]
pub struct DirectoryResources {
    root: PathBuf,
}

impl DirectoryResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceProvider for DirectoryResources {
    fn load(&self, name: &str) -> Result<String> {
        let path = self.root.join(name);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(SyncError::ResourceNotFound(name.to_string()))
            }
            Err(err) => Err(SyncError::io(path, err)),
        }
    }
}

/// Resources embedded at compile time with `include_dir!`.
///
/// ```rust,ignore
/// static DEFAULTS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/defaults");
/// let resources = EmbeddedResources::new(&DEFAULTS);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedResources {
    dir: &'static Dir<'static>,
}

impl EmbeddedResources {
    /// This is `const` so it can be used in static initialization.
    pub const fn new(dir: &'static Dir<'static>) -> Self {
        Self { dir }
    }

    /// Names of every embedded file, relative to the embedded root.
    pub fn names(&self) -> Vec<String> {
        let mut names = Vec::new();
        collect_files(self.dir, &mut names);
        names.sort();
        names
    }
}

impl ResourceProvider for EmbeddedResources {
    fn load(&self, name: &str) -> Result<String> {
        let file = self
            .dir
            .get_file(name)
            .ok_or_else(|| SyncError::ResourceNotFound(name.to_string()))?;
        file.contents_utf8().map(str::to_string).ok_or_else(|| {
            SyncError::io(
                name,
                io::Error::new(io::ErrorKind::InvalidData, "resource is not valid UTF-8"),
            )
        })
    }
}

fn collect_files(dir: &Dir<'static>, names: &mut Vec<String>) {
    for file in dir.files() {
        names.push(file.path().to_string_lossy().to_string());
    }
    for subdir in dir.dirs() {
        collect_files(subdir, names);
    }
}

/// Resources held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryResources {
    files: HashMap<String, String>,
}

impl MemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.files.insert(name.into(), text.into());
    }
}

impl ResourceProvider for MemoryResources {
    fn load(&self, name: &str) -> Result<String> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| SyncError::ResourceNotFound(name.to_string()))
    }
}

/// One of the built-in providers, picked at startup.
#[derive(Debug, Clone)]
pub enum Resources {
    Directory(DirectoryResources),
    Embedded(EmbeddedResources),
    Memory(MemoryResources),
}

impl ResourceProvider for Resources {
    fn load(&self, name: &str) -> Result<String> {
        match self {
            Resources::Directory(provider) => provider.load(name),
            Resources::Embedded(provider) => provider.load(name),
            Resources::Memory(provider) => provider.load(name),
        }
    }
}

impl From<DirectoryResources> for Resources {
    fn from(provider: DirectoryResources) -> Self {
        Resources::Directory(provider)
    }
}

impl From<EmbeddedResources> for Resources {
    fn from(provider: EmbeddedResources) -> Self {
        Resources::Embedded(provider)
    }
}

impl From<MemoryResources> for Resources {
    fn from(provider: MemoryResources) -> Self {
        Resources::Memory(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_resources() {
        let resources = MemoryResources::new().with("config.yml", "a: 1\n");
        assert_eq!(resources.load("config.yml").unwrap(), "a: 1\n");
        assert!(matches!(
            resources.load("missing.yml"),
            Err(SyncError::ResourceNotFound(name)) if name == "missing.yml"
        ));
    }

    #[test]
    fn test_directory_resources() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.yml"), "a: 1\n").unwrap();

        let resources = DirectoryResources::new(temp.path());
        assert_eq!(resources.load("config.yml").unwrap(), "a: 1\n");
        assert!(matches!(
            resources.load("other.yml"),
            Err(SyncError::ResourceNotFound(_))
        ));
    }

    #[test]
    fn test_enum_dispatch() {
        let resources: Resources = MemoryResources::new().with("x", "y: 1\n").into();
        assert_eq!(resources.load("x").unwrap(), "y: 1\n");
        let boxed: Box<dyn ResourceProvider> = Box::new(resources);
        assert_eq!(boxed.load("x").unwrap(), "y: 1\n");
    }
}
