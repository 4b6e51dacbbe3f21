use intake_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the engine config file.
///
/// Priority:
/// 1. `--config` flag / `INTAKE_CONFIG` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.intake/config.yaml`
/// 3. `cwd/.intake/config.yaml` (may not exist; defaults apply)
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_config_upward(&cwd).unwrap_or_else(|| paths::config_path(&cwd))
}

fn find_config_upward(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let candidate = paths::config_path(&dir);
        if candidate.is_file() {
            return Some(candidate);
        }
        match dir.parent() {
            Some(p) => dir = p.to_path_buf(),
            None => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_path_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.yaml");
        assert_eq!(resolve_config_path(Some(&path)), path);
    }

    #[test]
    fn finds_config_in_ancestor() {
        let dir = TempDir::new().unwrap();
        let config = paths::config_path(dir.path());
        std::fs::create_dir_all(config.parent().unwrap()).unwrap();
        std::fs::write(&config, "{}").unwrap();
        let deep = dir.path().join("a/b/c");
        std::fs::create_dir_all(&deep).unwrap();

        assert_eq!(find_config_upward(&deep), Some(config));
    }

    #[test]
    fn none_when_absent() {
        let dir = TempDir::new().unwrap();
        assert_eq!(find_config_upward(dir.path()), None);
    }
}
