//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Find files matching a glob pattern relative to a base directory.
///
/// Results are sorted so repeated calls over an unchanged tree agree.
pub fn glob_pattern(base: &Path, pattern: &str) -> Result<Vec<PathBuf>, glob::PatternError> {
    let full_pattern = base.join(pattern);
    let pattern_str = full_pattern.to_string_lossy();

    let mut results = Vec::new();
    for entry in glob(&pattern_str)? {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    results.push(path);
                }
            }
            Err(e) => {
                tracing::warn!("glob error: {}", e);
            }
        }
    }

    results.sort();
    Ok(results)
}

/// Canonicalize a path, but don't fail if it doesn't exist yet.
/// Returns the path as-is if canonicalization fails.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_glob_pattern() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("main.c"), "int main() {}").unwrap();
        fs::write(src.join("util.c"), "void util() {}").unwrap();
        fs::write(src.join("readme.txt"), "readme").unwrap();

        let files = glob_pattern(tmp.path(), "src/**/*.c").unwrap();
        assert_eq!(files, vec![src.join("main.c"), src.join("util.c")]);
    }

    #[test]
    fn test_glob_pattern_skips_directories() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("src/nested.c")).unwrap();

        let files = glob_pattern(tmp.path(), "src/*.c").unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(glob_pattern(Path::new("/"), "src/[*.c").is_err());
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a/b/c");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_dir(&nested).unwrap();
    }
}
