//! The update entry points.

use std::fs;
use std::io;
use std::path::Path;

use cfgsync_yaml::Document;
use tracing::{debug, info};

use crate::comments::CommentIndex;
use crate::merge::{self, MergeSources};
use crate::resources::ResourceProvider;
use crate::snapshot::IgnoredSections;
use crate::{Result, SyncError};

/// What [`ConfigUpdater::update`] did to the target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The file already matched the merged content and was not touched
    Unchanged,
    /// The file was rewritten with the merged content
    Updated,
    /// The file did not exist and was created from the default
    Created,
}

/// Merge two document texts.
///
/// This is the whole algorithm without any file access: `default_text` is
/// the shipped document, `current_text` the user's edited one. Override
/// paths not present in the default are dropped.
///
/// # Errors
///
/// Fails if either text is not a valid document, or if an ignored path does
/// not name a section of the current document.
pub fn merge_documents(
    default_text: &str,
    current_text: &str,
    ignored_sections: &[String],
    override_sections: &[String],
) -> Result<String> {
    let default = Document::parse(default_text)?;
    let current = Document::parse(current_text)?;

    let comments = CommentIndex::extract(default_text, &default.keys(true));
    let ignored = if ignored_sections.is_empty() {
        IgnoredSections::default()
    } else {
        let current_comments = CommentIndex::extract(current_text, &current.keys(true));
        IgnoredSections::capture(&current, &[&current_comments, &comments], ignored_sections)?
    };

    let overrides: Vec<String> = override_sections
        .iter()
        .filter(|section| {
            let present = default.contains(section);
            if !present {
                debug!(section = %section, "override section not in the default, skipping");
            }
            present
        })
        .cloned()
        .collect();

    merge::write_merged(&MergeSources {
        default: &default,
        current: &current,
        comments: &comments,
        ignored: &ignored,
        overrides: &overrides,
    })
}

/// Keeps a configuration file in sync with its shipped default.
///
/// # Example
///
/// ```rust,no_run
/// use cfgsync::{ConfigUpdater, DirectoryResources};
///
/// let outcome = ConfigUpdater::new(DirectoryResources::new("defaults"))
///     .ignore_section("messages")
///     .override_section("config-version")
///     .update("config.yml", "plugins/example/config.yml".as_ref())?;
/// println!("{:?}", outcome);
/// # Ok::<(), cfgsync::SyncError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigUpdater<R> {
    resources: R,
    ignored_sections: Vec<String>,
    override_sections: Vec<String>,
    create_missing: bool,
}

impl<R: ResourceProvider> ConfigUpdater<R> {
    pub fn new(resources: R) -> Self {
        Self {
            resources,
            ignored_sections: Vec::new(),
            override_sections: Vec::new(),
            create_missing: false,
        }
    }

    /// Keep this section exactly as the current file has it.
    pub fn ignore_section(mut self, section: impl Into<String>) -> Self {
        self.ignored_sections.push(section.into());
        self
    }

    pub fn ignore_sections<I, S>(mut self, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_sections.extend(sections.into_iter().map(Into::into));
        self
    }

    /// Force this section to the default's value.
    pub fn override_section(mut self, section: impl Into<String>) -> Self {
        self.override_sections.push(section.into());
        self
    }

    pub fn override_sections<I, S>(mut self, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.override_sections.extend(sections.into_iter().map(Into::into));
        self
    }

    /// Write the default verbatim when the target does not exist, instead
    /// of failing with [`SyncError::MissingFile`].
    pub fn create_missing(mut self, create: bool) -> Self {
        self.create_missing = create;
        self
    }

    pub fn resources(&self) -> &R {
        &self.resources
    }

    /// Compute the text [`update`](Self::update) would leave in `target`,
    /// without writing anything.
    pub fn render(&self, resource: &str, target: &Path) -> Result<String> {
        let default_text = self.resources.load(resource)?;
        if self.create_missing && !target.exists() {
            return Ok(default_text);
        }
        let current = read_current(target)?;
        merge_documents(
            &default_text,
            decode(target, &current)?,
            &self.ignored_sections,
            &self.override_sections,
        )
    }

    /// Merge the default named `resource` into `target`, rewriting the file
    /// only if the merged text differs from its current bytes.
    ///
    /// The write is a plain overwrite; callers that update the same file
    /// from several threads must serialize those calls.
    pub fn update(&self, resource: &str, target: &Path) -> Result<UpdateOutcome> {
        let default_text = self.resources.load(resource)?;

        if !target.exists() {
            if !self.create_missing {
                return Err(SyncError::MissingFile(target.to_path_buf()));
            }
            if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| SyncError::io(parent, e))?;
            }
            fs::write(target, default_text.as_bytes()).map_err(|e| SyncError::io(target, e))?;
            info!(path = %target.display(), resource, "created configuration from default");
            return Ok(UpdateOutcome::Created);
        }

        let current = read_current(target)?;
        let merged = merge_documents(
            &default_text,
            decode(target, &current)?,
            &self.ignored_sections,
            &self.override_sections,
        )?;

        if merged.as_bytes() == current.as_slice() {
            debug!(path = %target.display(), "configuration already up to date");
            return Ok(UpdateOutcome::Unchanged);
        }

        fs::write(target, merged.as_bytes()).map_err(|e| SyncError::io(target, e))?;
        info!(path = %target.display(), resource, "updated configuration");
        Ok(UpdateOutcome::Updated)
    }
}

fn read_current(target: &Path) -> Result<Vec<u8>> {
    if !target.exists() {
        return Err(SyncError::MissingFile(target.to_path_buf()));
    }
    fs::read(target).map_err(|e| SyncError::io(target, e))
}

fn decode<'a>(target: &Path, bytes: &'a [u8]) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|err| {
        SyncError::io(target, io::Error::new(io::ErrorKind::InvalidData, err))
    })
}
