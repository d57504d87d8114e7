use anyhow::Result;
use std::path::{Path, PathBuf};

/// Base directory override taken from `AXIOM_BASE_PATH`, if set and non-empty.
pub fn base_path_override() -> Option<PathBuf> {
    std::env::var("AXIOM_BASE_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}

#[derive(Debug, Clone)]
pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("axiom");

        Ok(Self::with_base(base_dir))
    }

    /// Lay out all directories under a single base (containers, tests).
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn from_env() -> Option<Self> {
        base_path_override().map(Self::with_base)
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn snapshot_dir(&self) -> PathBuf {
        self.data_dir.join("snapshots")
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        std::fs::create_dir_all(self.snapshot_dir())?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        if let Some(paths) = Self::from_env() {
            return paths;
        }

        // No config dir (e.g. HOME unset): fall back to the working directory.
        Self::new().unwrap_or_else(|_| Self::with_base(".axiom"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_base() {
        let paths = PathManager::with_base("/tmp/axiom-test");
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/axiom-test/config.toml"));
        assert_eq!(paths.snapshot_dir(), PathBuf::from("/tmp/axiom-test/data/snapshots"));
        assert_eq!(paths.log_dir(), Path::new("/tmp/axiom-test/logs"));
    }

    #[test]
    fn test_ensure_directories() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathManager::with_base(dir.path());
        paths.ensure_directories().unwrap();
        assert!(paths.snapshot_dir().is_dir());
        assert!(paths.log_dir().is_dir());
    }
}
