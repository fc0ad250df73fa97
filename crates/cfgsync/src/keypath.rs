//! Key path tracking for line-by-line scans of raw document text.
//!
//! [`KeyPathBuilder`] keeps a stack of `(indentation, segment)` pairs. Each
//! key line pops every entry at the same or deeper indentation and then
//! pushes itself, so the stack always spells the full path of the last key.

use std::fmt;

use cfgsync_yaml::path::SEPARATOR;

/// The working nesting stack of a raw-text scan.
#[derive(Debug, Clone, Default)]
pub struct KeyPathBuilder {
    stack: Vec<(usize, String)>,
}

impl KeyPathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw line. Returns `false` (leaving the stack alone) if the
    /// line is not a `key:` line.
    pub fn parse_line(&mut self, line: &str) -> bool {
        match KeyLine::parse(line) {
            Some(key) => {
                self.push(key.indent, key.name);
                true
            }
            None => false,
        }
    }

    /// Register a key found at `indent` columns.
    pub fn push(&mut self, indent: usize, name: impl Into<String>) {
        while self.stack.last().is_some_and(|(depth, _)| *depth >= indent) {
            self.stack.pop();
        }
        self.stack.push((indent, name.into()));
    }

    /// Drop the innermost segment.
    pub fn remove_last_key(&mut self) -> Option<String> {
        self.stack.pop().map(|(_, name)| name)
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// The full key path spelled by the stack.
    pub fn path(&self) -> String {
        let mut out = String::new();
        for (idx, (_, name)) in self.stack.iter().enumerate() {
            if idx > 0 {
                out.push(SEPARATOR);
            }
            out.push_str(name);
        }
        out
    }
}

impl fmt::Display for KeyPathBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// A `key: value` line split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeyLine<'a> {
    /// Leading spaces
    pub indent: usize,
    /// Unquoted key name
    pub name: String,
    /// Everything after the `:`, trimmed (may include an inline comment)
    pub value: &'a str,
}

impl<'a> KeyLine<'a> {
    /// Parse a raw line as a mapping key line.
    ///
    /// Blank lines, comments, sequence entries and flow collections are not
    /// key lines.
    pub fn parse(line: &'a str) -> Option<Self> {
        let content = line.trim_start_matches(' ');
        let indent = line.len() - content.len();
        let content = content.trim_end();

        let (name, rest) = match content.chars().next()? {
            '#' | '-' | '[' | '{' | '?' | '|' | '>' => return None,
            '\'' => split_single_quoted(content)?,
            '"' => split_double_quoted(content)?,
            _ => split_plain(content)?,
        };

        let rest = rest.trim_start().strip_prefix(':')?;
        if !(rest.is_empty() || rest.starts_with([' ', '\t'])) {
            return None;
        }

        Some(KeyLine {
            indent,
            name,
            value: rest.trim(),
        })
    }

    /// Whether the value is a block scalar header (`|`, `>-`, ...), meaning
    /// the following more-indented lines are scalar content.
    pub fn opens_block_scalar(&self) -> bool {
        self.value.starts_with(['|', '>'])
    }
}

fn split_plain(content: &str) -> Option<(String, &str)> {
    let bytes = content.as_bytes();
    for (idx, byte) in bytes.iter().enumerate() {
        if *byte == b':' && matches!(bytes.get(idx + 1), None | Some(b' ') | Some(b'\t')) {
            let name = content[..idx].trim_end();
            if name.is_empty() {
                return None;
            }
            return Some((name.to_string(), &content[idx..]));
        }
        if *byte == b'#' && idx > 0 && bytes[idx - 1] == b' ' {
            return None;
        }
    }
    None
}

fn split_single_quoted(content: &str) -> Option<(String, &str)> {
    let inner = &content[1..];
    let mut name = String::new();
    let mut chars = inner.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        if ch == '\'' {
            if matches!(chars.peek(), Some((_, '\''))) {
                chars.next();
                name.push('\'');
                continue;
            }
            return Some((name, &inner[idx + 1..]));
        }
        name.push(ch);
    }
    None
}

fn split_double_quoted(content: &str) -> Option<(String, &str)> {
    let inner = &content[1..];
    let mut name = String::new();
    let mut chars = inner.char_indices();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, 'n')) => name.push('\n'),
                Some((_, 't')) => name.push('\t'),
                Some((_, escaped)) => name.push(escaped),
                None => return None,
            },
            '"' => return Some((name, &inner[idx + 1..])),
            _ => name.push(ch),
        }
    }
    None
}
