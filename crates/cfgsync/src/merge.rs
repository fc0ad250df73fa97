//! The merge/write pass.
//!
//! Output is driven entirely by the default document's deep key enumeration:
//! order and the set of keys come from the default, values come from the
//! current document where they are type-compatible, and comments come from
//! the default's raw text.

use std::collections::{HashMap, HashSet};

use cfgsync_yaml::{Document, Value, emit, path};
use tracing::debug;

use crate::comments::{self, CommentIndex};
use crate::snapshot::{Coverage, IgnoredSections};
use crate::writer;
use crate::{Result, SyncError};

/// Everything the write pass reads.
#[derive(Debug, Clone, Copy)]
pub struct MergeSources<'a> {
    pub default: &'a Document,
    pub current: &'a Document,
    /// Comments extracted from the default document's raw text
    pub comments: &'a CommentIndex,
    pub ignored: &'a IgnoredSections,
    /// Override paths, already filtered to paths present in the default
    pub overrides: &'a [String],
}

/// Pick the value written for `key`.
///
/// Override paths always take the default. Otherwise the current value is
/// kept when present and type-compatible, and the default is used when it
/// is missing or mismatched.
pub fn effective_value<'a>(
    key: &str,
    default: &'a Value,
    current: Option<&'a Value>,
    overrides: &[String],
) -> &'a Value {
    if overrides.iter().any(|o| path::is_same_or_sub_key_of(o, key)) {
        return default;
    }
    match current {
        Some(value) if value.is_compatible_with(default) => value,
        Some(value) => {
            debug!(
                key,
                expected = ?default.kind(),
                found = ?value.kind(),
                "value type does not match the default, using the default"
            );
            default
        }
        None => default,
    }
}

/// Produce the merged document text.
pub fn write_merged(sources: &MergeSources<'_>) -> Result<String> {
    let keys = sources.default.keys(true);
    let placements = place_orphans(sources.default, &keys, sources.ignored)?;
    let mut out = String::new();

    for (idx, key) in keys.iter().enumerate() {
        write_key(&mut out, key, sources, &placements.anchors)?;
        if let Some(texts) = placements.after.get(&idx) {
            for text in texts {
                out.push_str(text);
            }
        }
    }
    for text in &placements.trailing {
        out.push_str(text);
    }

    if let Some(dangling) = sources.comments.dangling() {
        out.push_str(dangling);
    }
    Ok(out)
}

fn write_key(
    out: &mut String,
    key: &str,
    sources: &MergeSources<'_>,
    anchors: &HashSet<String>,
) -> Result<()> {
    match sources.ignored.coverage(key) {
        Coverage::Root(text) => {
            out.push_str(text);
            return Ok(());
        }
        Coverage::Descendant => return Ok(()),
        Coverage::Uncovered => {}
    }

    let Some(default_value) = sources.default.get(key) else {
        return Ok(());
    };

    let indent = path::indent(key);
    if let Some(comment) = sources.comments.get(key) {
        out.push_str(&comments::reindent(comment, &indent));
    }

    let value = effective_value(key, default_value, sources.current.get(key), sources.overrides);
    let trailing_key = path::last_segment(key);

    if value.is_section() {
        // Children come from the default's enumeration or from ignored
        // sections placed under this one.
        let has_children = default_value.as_section().is_some_and(|s| !s.is_empty())
            || anchors.contains(key);
        out.push_str(&indent);
        out.push_str(&emit::format_key(trailing_key)?);
        out.push_str(if has_children { ":\n" } else { ": {}\n" });
        return Ok(());
    }

    writer::write_value(out, &indent, trailing_key, value)
}

/// Where snapshots of ignored sections missing from the default go.
#[derive(Debug, Default)]
struct Placements {
    /// Index into the key enumeration after which to emit
    after: HashMap<usize, Vec<String>>,
    /// Emitted after the last key
    trailing: Vec<String>,
    /// Default sections that receive at least one placed snapshot
    anchors: HashSet<String>,
}

/// An ignored section that the default does not have is emitted after the
/// last key of its nearest ancestor that the default does have, with headers
/// for any intermediate sections the default lacks.
///
/// # Errors
///
/// [`SyncError::InvalidIgnoredSection`] if that ancestor is a value in the
/// default.
fn place_orphans(
    default: &Document,
    keys: &[String],
    ignored: &IgnoredSections,
) -> Result<Placements> {
    let mut placements = Placements::default();

    for (section_path, text) in ignored.iter() {
        if default.contains(section_path) {
            continue;
        }

        let anchor = path::ancestors(section_path).find(|a| default.contains(a));
        if let Some(anchor) = anchor {
            if !default.is_section(anchor) {
                return Err(SyncError::InvalidIgnoredSection(section_path.to_string()));
            }
            placements.anchors.insert(anchor.to_string());
        }

        let missing: Vec<&str> = path::ancestors(section_path)
            .take_while(|a| Some(*a) != anchor)
            .collect();
        let mut block = String::new();
        for header in missing.iter().rev() {
            block.push_str(&path::indent(header));
            block.push_str(&emit::format_key(path::last_segment(header))?);
            block.push_str(":\n");
        }
        block.push_str(text);

        let position = anchor.and_then(|a| {
            keys.iter()
                .rposition(|k| path::is_same_or_sub_key_of(a, k))
        });
        match position {
            Some(idx) => placements.after.entry(idx).or_default().push(block),
            None => placements.trailing.push(block),
        }
    }

    Ok(placements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfgsync_yaml::Scalar;

    fn merge(default_raw: &str, current_raw: &str, ignored: &[&str], overrides: &[&str]) -> String {
        let default = Document::parse(default_raw).unwrap();
        let current = Document::parse(current_raw).unwrap();
        let comments = CommentIndex::extract(default_raw, &default.keys(true));
        let current_comments = CommentIndex::extract(current_raw, &current.keys(true));
        let ignored: Vec<String> = ignored.iter().map(|s| s.to_string()).collect();
        let ignored =
            IgnoredSections::capture(&current, &[&current_comments, &comments], &ignored).unwrap();
        let overrides: Vec<String> = overrides.iter().map(|s| s.to_string()).collect();
        write_merged(&MergeSources {
            default: &default,
            current: &current,
            comments: &comments,
            ignored: &ignored,
            overrides: &overrides,
        })
        .unwrap()
    }

    #[test]
    fn test_effective_value_rules() {
        let default = Value::Scalar(Scalar::Bool(true));
        let same = Value::Scalar(Scalar::Bool(false));
        let wrong = Value::string("yes");
        let none: &[String] = &[];

        assert_eq!(effective_value("k", &default, Some(&same), none), &same);
        assert_eq!(effective_value("k", &default, Some(&wrong), none), &default);
        assert_eq!(effective_value("k", &default, None, none), &default);

        let overrides = vec!["k".to_string()];
        assert_eq!(effective_value("k", &default, Some(&same), &overrides), &default);
    }

    #[test]
    fn test_override_applies_to_descendants_only() {
        let default = Value::Scalar(Scalar::Integer(1));
        let current = Value::Scalar(Scalar::Integer(2));
        let overrides = vec!["a.b".to_string()];
        assert_eq!(effective_value("a.b.c", &default, Some(&current), &overrides), &default);
        assert_eq!(effective_value("a.bc", &default, Some(&current), &overrides), &current);
    }

    #[test]
    fn test_new_key_insertion() {
        assert_eq!(merge("a: 1\nb: 2\n", "a: 1\n", &[], &[]), "a: 1\nb: 2\n");
    }

    #[test]
    fn test_type_mismatch_falls_back() {
        assert_eq!(merge("enabled: true\n", "enabled: yes\n", &[], &[]), "enabled: true\n");
    }

    #[test]
    fn test_numeric_and_null_kinds_are_strict() {
        assert_eq!(merge("ratio: 1.5\n", "ratio: 2\n", &[], &[]), "ratio: 1.5\n");
        assert_eq!(merge("x: ~\n", "x: hello\n", &[], &[]), "x: ~\n");
    }

    #[test]
    fn test_user_values_and_default_order() {
        let out = merge("a: 1\nb:\n  c: x\n", "b:\n  c: y\na: 5\nstale: 1\n", &[], &[]);
        assert_eq!(out, "a: 5\nb:\n  c: y\n");
    }

    #[test]
    fn test_list_from_default() {
        assert_eq!(
            merge("names:\n  - x\n  - y\n", "other: 1\n", &[], &[]),
            "names:\n  - 'x'\n  - 'y'\n"
        );
    }

    #[test]
    fn test_dangling_comment_written_once() {
        let out = merge("a: 1\n# footer note\n", "a: 2\n# old footer\n", &[], &[]);
        assert_eq!(out, "a: 2\n# footer note\n");
    }

    #[test]
    fn test_comments_follow_default() {
        let default = "# top\na: 1\nb:\n  # inner\n  c: true\n";
        let out = merge(default, "b:\n  c: false\na: 3\n", &[], &[]);
        assert_eq!(out, "# top\na: 3\nb:\n  # inner\n  c: false\n");
    }

    #[test]
    fn test_empty_default_section() {
        assert_eq!(merge("extra: {}\n", "extra:\n  mine: 1\n", &[], &[]), "extra: {}\n");
    }

    #[test]
    fn test_ignored_section_missing_from_default() {
        let out = merge(
            "a:\n  x: 1\nb: 2\n",
            "a:\n  x: 1\n  custom:\n    k: v\nb: 2\n",
            &["a.custom"],
            &[],
        );
        assert_eq!(out, "a:\n  x: 1\n  custom:\n    k: v\nb: 2\n");
    }

    #[test]
    fn test_ignored_section_with_missing_parents() {
        let out = merge("a: 1\n", "a: 1\nb:\n  c:\n    d: 1\n", &["b.c"], &[]);
        assert_eq!(out, "a: 1\nb:\n  c:\n    d: 1\n");
    }

    #[test]
    fn test_ignored_section_under_default_value_is_rejected() {
        let default = Document::parse("a: 1\n").unwrap();
        let current_raw = "a:\n  b:\n    c: 1\n";
        let current = Document::parse(current_raw).unwrap();
        let comments = CommentIndex::extract("a: 1\n", &default.keys(true));
        let ignored =
            IgnoredSections::capture(&current, &[&comments], &["a.b".to_string()]).unwrap();

        let err = write_merged(&MergeSources {
            default: &default,
            current: &current,
            comments: &comments,
            ignored: &ignored,
            overrides: &[],
        })
        .unwrap_err();
        assert!(matches!(err, SyncError::InvalidIgnoredSection(p) if p == "a.b"));
    }

    #[test]
    fn test_ignored_section_under_empty_default_section() {
        let out = merge("a: {}\nz: 1\n", "a:\n  b:\n    c: 1\nz: 1\n", &["a.b"], &[]);
        assert_eq!(out, "a:\n  b:\n    c: 1\nz: 1\n");
    }

    /// Merged output must load again and be a fixed point of the merge.
    fn assert_stable(default: &str, current: &str, ignored: &[&str]) {
        let out = merge(default, current, ignored, &[]);
        let reparsed = Document::parse(&out).unwrap();
        for section in ignored {
            assert_eq!(
                reparsed.get(section),
                Document::parse(current).unwrap().get(section),
                "ignored section {} changed in:\n{}",
                section,
                out
            );
        }
        assert_eq!(merge(default, &out, ignored, &[]), out);
    }

    #[test]
    fn test_orphan_placements_round_trip() {
        // under an empty default section
        assert_stable("a: {}\nz: 1\n", "a:\n  b:\n    c: 1\nz: 1\n", &["a.b"]);
        // after the last key of a populated ancestor
        assert_stable(
            "a:\n  x: 1\nb: 2\n",
            "a:\n  x: 1\n  custom:\n    k: v\nb: 2\n",
            &["a.custom"],
        );
        // with synthesized intermediate headers at the end
        assert_stable("a: 1\n", "a: 1\nb:\n  c:\n    d: 1\n", &["b.c"]);
        // two snapshots under the same empty section
        assert_stable(
            "a: {}\n# footer\n",
            "a:\n  p:\n    x: 1\n  q:\n    y: [1, 2]\n",
            &["a.p", "a.q"],
        );
    }
}
