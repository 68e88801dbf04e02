use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use tempfile::Builder;

/// Owns the private temporary file namespace of one sort invocation.
///
/// Every run file is created through this context and stays registered in `live` until the
/// stage that consumed it deletes it, so a failing pipeline can remove everything it created
/// so far in one sweep. Unique names come from `tempfile`, which guarantees no collision with
/// concurrent or repeated invocations in the same directory.
pub(crate) struct TempContext {
    dir: PathBuf,
    prefix: String,
    suffix: String,
    live: Vec<PathBuf>,
}

impl TempContext {
    pub(crate) fn new(dir: &Path, prefix: &str, suffix: &str) -> TempContext {
        TempContext {
            dir: dir.to_path_buf(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            live: Vec::new(),
        }
    }

    /// Create a new persisted temp file and register it as live.
    pub(crate) fn create(&mut self) -> Result<(File, PathBuf), anyhow::Error> {
        let tmp_file = Builder::new()
            .prefix(self.prefix.as_str())
            .suffix(self.suffix.as_str())
            .tempfile_in(&self.dir)
            .with_context(|| format!("create temp file in {}", self.dir.display()))?;
        let (file, path) = tmp_file
            .keep()
            .map_err(|e| anyhow!("persist temp file: {}", e))?;
        self.live.push(path.clone());
        Ok((file, path))
    }

    /// Delete a fully consumed run file and drop it from the live list.
    pub(crate) fn remove(&mut self, path: &Path) -> Result<(), anyhow::Error> {
        std::fs::remove_file(path)
            .with_context(|| format!("remove consumed run {}", path.display()))?;
        self.forget(path);
        Ok(())
    }

    /// Drop a path from the live list without deleting it. Used for the final run after it
    /// has been renamed to the output path.
    pub(crate) fn forget(&mut self, path: &Path) {
        self.live.retain(|p| p != path);
    }

    /// Best effort removal of every live temp file. Called on the error path only; removal
    /// failures are logged and swallowed because the original error is the one to report.
    pub(crate) fn cleanup(&mut self) {
        for path in self.live.drain(..) {
            if let Err(e) = std::fs::remove_file(&path) {
                log::warn!("Failed to remove temp file {}: {}", path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TempContext;

    #[test]
    fn test_create_unique_and_cleanup() -> Result<(), anyhow::Error> {
        let tmp_dir = tempfile::tempdir()?;
        let mut context = TempContext::new(tmp_dir.path(), "run-", ".tmp");
        let (_f1, p1) = context.create()?;
        let (_f2, p2) = context.create()?;
        assert_ne!(p1, p2);
        assert!(p1.exists());
        assert!(p2.exists());
        context.cleanup();
        assert!(!p1.exists());
        assert!(!p2.exists());
        Ok(())
    }

    #[test]
    fn test_forget_keeps_file() -> Result<(), anyhow::Error> {
        let tmp_dir = tempfile::tempdir()?;
        let mut context = TempContext::new(tmp_dir.path(), "run-", ".tmp");
        let (_f, p) = context.create()?;
        context.forget(&p);
        context.cleanup();
        assert!(p.exists());
        Ok(())
    }
}
