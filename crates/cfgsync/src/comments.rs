//! Comment extraction from raw document text.
//!
//! A comment block is a run of blank and `#` lines. Each block is attached to
//! the key line that follows it; a block left over at end of file is the
//! dangling comment.
//!
//! Key paths are tracked with [`KeyPathBuilder`]. After every key line the
//! scan looks at the next key of the canonical enumeration and pops segments
//! until that key lies under the builder's path, re-pushing the current
//! top-level key if the stack empties. This resynchronizes across sibling
//! section boundaries without a full parse. It is a heuristic: unusual
//! layouts (for example flow collections spread over several lines) can
//! attach a block to the wrong key.

use std::collections::HashMap;

use cfgsync_yaml::path;

use crate::keypath::{KeyLine, KeyPathBuilder};

/// Comment blocks keyed by the key path they precede.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentIndex {
    comments: HashMap<String, String>,
    dangling: Option<String>,
}

/// Lines that belong to a value rather than to the mapping structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    /// Body of a `|` or `>` scalar
    BlockScalar,
    /// Items of a block sequence and their nested content
    Sequence,
}

impl CommentIndex {
    /// Scan `raw` and attach every comment block to a key.
    ///
    /// `keys` is the canonical deep enumeration of the document parsed from
    /// the same text. Stored blocks hold trimmed lines, each ending in `\n`.
    pub fn extract(raw: &str, keys: &[String]) -> Self {
        let positions: HashMap<&str, usize> = keys
            .iter()
            .enumerate()
            .map(|(idx, key)| (key.as_str(), idx))
            .collect();

        let mut index = CommentIndex::default();
        let mut buffer = String::new();
        let mut builder = KeyPathBuilder::new();
        let mut current_top: Option<String> = None;
        let mut region: Option<(usize, Region)> = None;

        for line in raw.lines() {
            let trimmed = line.trim();
            let indent = line.len() - line.trim_start_matches(' ').len();

            if let Some((floor, kind)) = region {
                if trimmed.is_empty() {
                    if kind == Region::Sequence {
                        push_line(&mut buffer, trimmed);
                    }
                    continue;
                }
                if indent > floor {
                    if kind == Region::Sequence && trimmed.starts_with('#') {
                        push_line(&mut buffer, trimmed);
                    }
                    continue;
                }
                region = None;
            }

            if trimmed.is_empty() || trimmed.starts_with('#') {
                push_line(&mut buffer, trimmed);
                continue;
            }
            if is_document_marker(trimmed) {
                continue;
            }
            if trimmed.starts_with('-') {
                region = Some((indent, Region::Sequence));
                continue;
            }

            let Some(key) = KeyLine::parse(line) else {
                continue;
            };
            if key.opens_block_scalar() {
                region = Some((key.indent, Region::BlockScalar));
            }
            if key.indent == 0 {
                current_top = Some(key.name.clone());
            }

            builder.push(key.indent, key.name);
            let full = builder.path();

            if !buffer.is_empty() {
                index.comments.insert(full.clone(), std::mem::take(&mut buffer));
            }

            let next = positions.get(full.as_str()).and_then(|idx| keys.get(idx + 1));
            if let Some(next) = next {
                while !builder.is_empty() && !path::is_same_or_sub_key_of(&builder.path(), next) {
                    builder.remove_last_key();
                }
                if builder.is_empty() {
                    if let Some(top) = &current_top {
                        builder.push(0, top.clone());
                    }
                }
            }
        }

        if !buffer.is_empty() {
            index.dangling = Some(buffer);
        }
        index
    }

    /// The block preceding `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.comments.get(key).map(String::as_str)
    }

    /// The block after the last key.
    pub fn dangling(&self) -> Option<&str> {
        self.dangling.as_deref()
    }

    /// Number of keyed blocks (the dangling block is not counted).
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty() && self.dangling.is_none()
    }
}

/// Look a key up in several indexes; the first hit wins.
pub fn lookup<'a>(indexes: &[&'a CommentIndex], key: &str) -> Option<&'a str> {
    indexes.iter().find_map(|index| index.get(key))
}

/// Indent every non-blank line of a comment block.
pub fn reindent(comment: &str, indent: &str) -> String {
    let mut out = String::with_capacity(comment.len());
    for line in comment.lines() {
        if !line.is_empty() {
            out.push_str(indent);
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

fn push_line(buffer: &mut String, trimmed: &str) {
    buffer.push_str(trimmed);
    buffer.push('\n');
}

fn is_document_marker(trimmed: &str) -> bool {
    trimmed == "---" || trimmed == "..." || trimmed.starts_with("--- ")
}
