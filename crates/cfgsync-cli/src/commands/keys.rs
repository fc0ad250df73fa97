//! Keys command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use cfgsync_yaml::Document;

/// Execute the keys command
pub fn execute(file: &Path, top_level: bool) -> Result<()> {
    for key in list_keys(file, top_level)? {
        println!("{}", key);
    }
    Ok(())
}

fn list_keys(file: &Path, top_level: bool) -> Result<Vec<String>> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let doc = Document::parse(&text).with_context(|| format!("Failed to parse {}", file.display()))?;
    Ok(doc.keys(!top_level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_keys() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.yml");
        fs::write(&file, "a:\n  b: 1\n  c:\n    - x\nd: 2\n").unwrap();

        assert_eq!(list_keys(&file, false).unwrap(), vec!["a", "a.b", "a.c", "d"]);
        assert_eq!(list_keys(&file, true).unwrap(), vec!["a", "d"]);
    }

    #[test]
    fn test_missing_file() {
        assert!(list_keys(Path::new("/nonexistent/a.yml"), false).is_err());
    }
}
