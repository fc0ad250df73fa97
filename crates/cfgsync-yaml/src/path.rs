//! Key path helpers.
//!
//! A key path joins the segments leading to a value with [`SEPARATOR`],
//! e.g. `database.pool.size`. Nesting depth is the number of separators,
//! and each level is indented by [`INDENT_WIDTH`] spaces on output.

/// Separator between key path segments.
pub const SEPARATOR: char = '.';

/// Number of spaces per nesting level in written documents.
pub const INDENT_WIDTH: usize = 2;

/// Iterate over the segments of a key path.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR)
}

/// Nesting depth of a key path (0 for top-level keys).
pub fn depth(path: &str) -> usize {
    path.matches(SEPARATOR).count()
}

/// The indentation string for a key at this path.
pub fn indent(path: &str) -> String {
    " ".repeat(depth(path) * INDENT_WIDTH)
}

/// The trailing segment of a key path.
pub fn last_segment(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(idx) => &path[idx + SEPARATOR.len_utf8()..],
        None => path,
    }
}

/// The parent path, or `None` for top-level keys.
pub fn parent(path: &str) -> Option<&str> {
    path.rfind(SEPARATOR).map(|idx| &path[..idx])
}

/// Append a segment to a (possibly empty) parent path.
pub fn join(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{}{}{}", parent, SEPARATOR, segment)
    }
}

/// True if `key` lies strictly below `parent`.
///
/// Matching is segment-aware: `a.bc` is not a sub key of `a.b`.
pub fn is_sub_key_of(parent: &str, key: &str) -> bool {
    if parent.is_empty() {
        return false;
    }
    key.len() > parent.len()
        && key.starts_with(parent)
        && key[parent.len()..].starts_with(SEPARATOR)
}

/// True if `key` is `parent` itself or lies below it.
pub fn is_same_or_sub_key_of(parent: &str, key: &str) -> bool {
    key == parent || is_sub_key_of(parent, key)
}

/// Every proper ancestor of a path, nearest first.
pub fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    std::iter::successors(parent(path), |p| parent(*p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_and_indent() {
        assert_eq!(depth("a"), 0);
        assert_eq!(depth("a.b.c"), 2);
        assert_eq!(indent("a"), "");
        assert_eq!(indent("a.b.c"), "    ");
    }

    #[test]
    fn test_last_segment_and_parent() {
        assert_eq!(last_segment("a.b.c"), "c");
        assert_eq!(last_segment("top"), "top");
        assert_eq!(parent("a.b.c"), Some("a.b"));
        assert_eq!(parent("top"), None);
    }

    #[test]
    fn test_join() {
        assert_eq!(join("", "a"), "a");
        assert_eq!(join("a.b", "c"), "a.b.c");
    }

    #[test]
    fn test_sub_key_is_segment_aware() {
        assert!(is_sub_key_of("a.b", "a.b.c"));
        assert!(!is_sub_key_of("a.b", "a.bc"));
        assert!(!is_sub_key_of("a.b", "a.b"));
        assert!(!is_sub_key_of("", "a"));
        assert!(is_same_or_sub_key_of("a.b", "a.b"));
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let found: Vec<&str> = ancestors("a.b.c").collect();
        assert_eq!(found, vec!["a.b", "a"]);
        assert_eq!(ancestors("a").count(), 0);
    }
}
