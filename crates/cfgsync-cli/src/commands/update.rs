//! Update command implementation.
//!
//! Merges one default document into one configuration file, or prints the
//! merged text with `--dry-run`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use cfgsync::{ConfigUpdater, DirectoryResources, UpdateOutcome};
use tracing::debug;

/// Where the default document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultSource {
    /// A single file given with `--default`
    File(PathBuf),
    /// A named resource inside a directory
    Resource { dir: PathBuf, name: String },
}

impl DefaultSource {
    pub fn from_args(
        default: Option<PathBuf>,
        resource_dir: Option<PathBuf>,
        resource: Option<String>,
    ) -> Result<Self> {
        match (default, resource_dir, resource) {
            (Some(file), None, None) => Ok(DefaultSource::File(file)),
            (None, Some(dir), Some(name)) => Ok(DefaultSource::Resource { dir, name }),
            _ => anyhow::bail!("Pass either --default FILE or --resource-dir DIR --resource NAME"),
        }
    }

    /// Split into a directory provider and the resource name to load from it.
    pub fn into_provider(self) -> Result<(DirectoryResources, String)> {
        match self {
            DefaultSource::File(file) => {
                let name = file
                    .file_name()
                    .and_then(|n| n.to_str())
                    .with_context(|| format!("Not a file name: {}", file.display()))?
                    .to_string();
                let dir = match file.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                    _ => PathBuf::from("."),
                };
                Ok((DirectoryResources::new(dir), name))
            }
            DefaultSource::Resource { dir, name } => Ok((DirectoryResources::new(dir), name)),
        }
    }
}

/// Arguments for the update command
#[derive(Debug)]
pub struct UpdateArgs {
    pub target: PathBuf,
    pub source: DefaultSource,
    pub ignored_sections: Vec<String>,
    pub override_sections: Vec<String>,
    pub create_missing: bool,
    /// Print the merged text instead of writing it
    pub dry_run: bool,
}

/// Execute the update command
pub fn execute(args: UpdateArgs) -> Result<()> {
    let (resources, resource) = args.source.into_provider()?;
    debug!(root = %resources.root().display(), resource = %resource, "resolved default");

    let updater = ConfigUpdater::new(resources)
        .ignore_sections(args.ignored_sections)
        .override_sections(args.override_sections)
        .create_missing(args.create_missing);

    if args.dry_run {
        let text = updater
            .render(&resource, &args.target)
            .with_context(|| format!("Failed to render {}", args.target.display()))?;
        print!("{}", text);
        return Ok(());
    }

    let outcome = updater
        .update(&resource, &args.target)
        .with_context(|| format!("Failed to update {}", args.target.display()))?;
    println!("{}: {}", args.target.display(), describe(outcome));
    Ok(())
}

/// Short label for reporting an outcome.
pub fn describe(outcome: UpdateOutcome) -> &'static str {
    match outcome {
        UpdateOutcome::Unchanged => "unchanged",
        UpdateOutcome::Updated => "updated",
        UpdateOutcome::Created => "created",
    }
}
