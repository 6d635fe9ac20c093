// File: ./src/context.rs
/*! Application context abstraction for filesystem paths.

The converter reads its inputs and writes its outputs relative to a working
directory, and looks for its configuration there first. `AppContext`
encapsulates that lookup so tests can run against an isolated directory:

- `StandardContext`: the current directory, or an override root given on the
  command line. Falls back to the per-user config directory for the config
  file.
- `TestContext`: a unique temporary directory, removed when dropped.
*/

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "m21cal.toml";

/// Defines the file system context for a conversion run.
pub trait AppContext: Send + Sync + std::fmt::Debug {
    fn get_work_dir(&self) -> Result<PathBuf>;

    fn get_config_file_path(&self) -> Result<PathBuf> {
        Ok(self.get_work_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Resolves a file name from the configuration against the working
    /// directory. Absolute names are returned unchanged.
    fn resolve(&self, file_name: &str) -> Result<PathBuf> {
        let path = PathBuf::from(file_name);
        if path.is_absolute() {
            return Ok(path);
        }
        Ok(self.get_work_dir()?.join(path))
    }
}

// --- Production Implementation ---

#[derive(Clone, Debug)]
pub struct StandardContext {
    override_root: Option<PathBuf>,
}

impl StandardContext {
    /// When `override_root` is `Some(path)`, inputs, outputs and the config
    /// file are all looked up under that directory.
    pub fn new(override_root: Option<PathBuf>) -> Self {
        Self { override_root }
    }

    fn get_proj_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("de", "m21", "m21cal")
    }
}

impl AppContext for StandardContext {
    fn get_work_dir(&self) -> Result<PathBuf> {
        if let Some(root) = &self.override_root {
            if !root.is_dir() {
                anyhow::bail!("Root directory does not exist: {}", root.display());
            }
            return Ok(root.clone());
        }
        std::env::current_dir().context("Failed to determine current directory")
    }

    fn get_config_file_path(&self) -> Result<PathBuf> {
        let local = self.get_work_dir()?.join(CONFIG_FILE_NAME);
        if local.exists() || self.override_root.is_some() {
            return Ok(local);
        }
        match Self::get_proj_dirs() {
            Some(proj) => {
                let user = proj.config_dir().join(CONFIG_FILE_NAME);
                Ok(if user.exists() { user } else { local })
            }
            None => Ok(local),
        }
    }
}

// --- Test Implementation ---

#[derive(Clone, Debug)]
pub struct TestContext {
    pub root: PathBuf,
}

impl TestContext {
    /// Creates a new TestContext backed by a unique temporary directory.
    ///
    /// The directory is created immediately and removed when the `TestContext`
    /// is dropped.
    pub fn new() -> Self {
        let uuid = uuid::Uuid::new_v4();
        let root = std::env::temp_dir().join(format!("m21cal_test_{}", uuid));
        std::fs::create_dir_all(&root).expect("failed to create TestContext temp dir");
        Self { root }
    }

    /// Writes `contents` to `name` inside the test directory.
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.root.join(name);
        std::fs::write(&path, contents).expect("failed to write test file");
        path
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext for TestContext {
    fn get_work_dir(&self) -> Result<PathBuf> {
        Ok(self.root.clone())
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        // Best-effort cleanup; ignore errors.
        let _ = std::fs::remove_dir_all(&self.root);
    }
}
