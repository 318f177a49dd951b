//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /home/user/site/content/posts/  ← cwd
/// /home/user/site/site.toml       ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_file_from(&cwd, config_name)
}

/// Same as [`find_config_file`], starting at `start` instead of the cwd.
pub fn find_config_file_from(start: &Path, config_name: &Path) -> Option<PathBuf> {
    // Absolute path: no search
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    // Walk up from start looking for config file
    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        // Move to parent directory
        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_parent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("content/posts");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("site.toml"), "").unwrap();

        let found = find_config_file_from(&nested, Path::new("site.toml")).unwrap();
        assert_eq!(found, dir.path().join("site.toml"));
    }

    #[test]
    fn test_find_config_missing() {
        let dir = TempDir::new().unwrap();
        assert!(find_config_file_from(dir.path(), Path::new("no-such-config-file.toml")).is_none());
    }

    #[test]
    fn test_find_config_absolute() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        assert!(find_config_file_from(Path::new("/"), &path).is_none());

        fs::write(&path, "").unwrap();
        assert_eq!(find_config_file_from(Path::new("/"), &path), Some(path));
    }
}
