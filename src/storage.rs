// Writes generated files (calendar, HTML tables, converted CSV) to disk.
use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs;
use std::path::{Path, PathBuf};

pub struct LocalStorage;

impl LocalStorage {
    fn lock_dir() -> PathBuf {
        std::env::temp_dir().join("m21cal-locks")
    }

    /// Lock files are kept out of the output directory. The name encodes the
    /// full target path so distinct targets never share a lock.
    fn get_lock_path(file_path: &Path) -> Result<PathBuf> {
        let absolute = std::path::absolute(file_path)
            .with_context(|| format!("Failed to resolve {}", file_path.display()))?;
        let name: String = absolute
            .to_string_lossy()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();
        Ok(Self::lock_dir().join(format!("{}.lock", name)))
    }

    /// Runs `f` while holding an exclusive lock for `file_path`, so two runs
    /// writing the same output do not interleave.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path)?;
        fs::create_dir_all(Self::lock_dir())?;
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive()?;
        let result = f();
        FileExt::unlock(&file)?;
        result
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    /// Locked atomic write with the target path in the error message.
    pub fn write_output<C: AsRef<[u8]>>(path: &Path, contents: C) -> Result<()> {
        Self::with_lock(path, || Self::atomic_write(path, contents))
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    #[test]
    fn test_write_output_replaces_content() {
        let ctx = TestContext::new();
        let target = ctx.root.join("out.ics");
        LocalStorage::write_output(&target, "first").unwrap();
        LocalStorage::write_output(&target, "second").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "second");
        assert!(!ctx.root.join("out.tmp").exists());
    }

    #[test]
    fn test_no_lock_file_next_to_output() {
        let ctx = TestContext::new();
        let target = ctx.root.join("m21-termine.ics");
        LocalStorage::write_output(&target, "BEGIN:VCALENDAR").unwrap();

        let names: Vec<_> = fs::read_dir(&ctx.root)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("m21-termine.ics")]);
    }

    #[test]
    fn test_lock_paths_differ_per_target() {
        let a = LocalStorage::get_lock_path(Path::new("/srv/www/a.ics")).unwrap();
        let b = LocalStorage::get_lock_path(Path::new("/srv/www/b.ics")).unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with(LocalStorage::lock_dir()));
        assert!(a.to_string_lossy().ends_with("a.ics.lock"));
    }
}
