//! Ignored-section snapshots.
//!
//! An ignored section is owned by whoever edits the file: it is taken from
//! the current document as-is and re-serialized into literal text, with
//! comments re-applied and indentation derived from key depth. The merge
//! driver splices that text in place of the section and never looks inside.

use cfgsync_yaml::{Document, Section, Value, emit, path};
use indexmap::IndexMap;
use tracing::debug;

use crate::comments::{self, CommentIndex};
use crate::writer;
use crate::{Result, SyncError};

/// How a key path relates to the captured snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage<'a> {
    /// Not inside any ignored section
    Uncovered,
    /// The root of an ignored section; carries the snapshot text
    Root(&'a str),
    /// Strictly inside an ignored section
    Descendant,
}

/// Snapshot text per ignored section path, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoredSections {
    entries: IndexMap<String, String>,
}

impl IgnoredSections {
    /// Capture the requested sections from the current document.
    ///
    /// Comments are looked up in `comment_indexes` in order. A requested path
    /// below another requested path is subsumed by the outer one, and an
    /// empty section contributes nothing.
    ///
    /// # Errors
    ///
    /// [`SyncError::InvalidIgnoredSection`] if the path does not resolve in the
    /// current document, [`SyncError::NotASection`] if it names a value.
    pub fn capture(
        current: &Document,
        comment_indexes: &[&CommentIndex],
        requested: &[String],
    ) -> Result<Self> {
        let mut entries = IndexMap::new();

        for section_path in requested {
            if requested.iter().any(|other| path::is_sub_key_of(other, section_path)) {
                debug!(section = %section_path, "ignored section is inside another ignored section");
                continue;
            }
            if entries.contains_key(section_path) {
                continue;
            }

            let section = resolve_section(current, section_path)?;
            if section.is_empty() {
                debug!(section = %section_path, "ignored section is empty, nothing to keep");
                continue;
            }

            let mut text = String::new();
            write_section(
                &mut text,
                section_path,
                path::last_segment(section_path),
                section,
                comment_indexes,
            )?;
            entries.insert(section_path.clone(), text);
        }

        Ok(Self { entries })
    }

    pub fn get(&self, section_path: &str) -> Option<&str> {
        self.entries.get(section_path).map(String::as_str)
    }

    /// Classify `key` against the captured sections.
    pub fn coverage(&self, key: &str) -> Coverage<'_> {
        if self.entries.keys().any(|root| path::is_sub_key_of(root, key)) {
            return Coverage::Descendant;
        }
        match self.entries.get(key) {
            Some(text) => Coverage::Root(text),
            None => Coverage::Uncovered,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn resolve_section<'a>(doc: &'a Document, section_path: &str) -> Result<&'a Section> {
    let mut section = doc.root();
    let mut walked = String::new();
    let mut segments = path::segments(section_path).peekable();

    while let Some(segment) = segments.next() {
        walked = path::join(&walked, segment);
        let is_last = segments.peek().is_none();
        match section.get(segment) {
            Some(Value::Section(child)) => section = child,
            Some(_) if is_last => {
                return Err(SyncError::NotASection(section_path.to_string()));
            }
            Some(_) | None => {
                return Err(SyncError::InvalidIgnoredSection(walked));
            }
        }
    }
    Ok(section)
}

fn write_section(
    out: &mut String,
    full_path: &str,
    key: &str,
    section: &Section,
    comment_indexes: &[&CommentIndex],
) -> Result<()> {
    let indent = path::indent(full_path);
    if let Some(comment) = comments::lookup(comment_indexes, full_path) {
        out.push_str(&comments::reindent(comment, &indent));
    }

    out.push_str(&indent);
    out.push_str(&emit::format_key(key)?);
    if section.is_empty() {
        out.push_str(": {}\n");
        return Ok(());
    }
    out.push_str(":\n");

    for (child_key, child) in section.iter() {
        let child_path = path::join(full_path, child_key);
        match child {
            Value::Section(nested) => {
                write_section(out, &child_path, child_key, nested, comment_indexes)?;
            }
            value => {
                let child_indent = path::indent(&child_path);
                if let Some(comment) = comments::lookup(comment_indexes, &child_path) {
                    out.push_str(&comments::reindent(comment, &child_indent));
                }
                writer::write_value(out, &child_indent, child_key, value)?;
            }
        }
    }
    Ok(())
}
