//! All-or-nothing file writes.
//!
//! ```text
//! create(path)   -> opens <path>.tmp
//! write(..)      -> goes to the temp file only
//! commit()       -> flush, fsync, rename <path>.tmp onto <path>
//! drop w/o commit-> temp file removed, <path> untouched
//! ```

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::InfraResult;

/// Scoped writer that replaces its target only on [`SafeWriter::commit`].
#[derive(Debug)]
pub struct SafeWriter {
    target: PathBuf,
    temp: PathBuf,
    file: Option<BufWriter<File>>,
    committed: bool,
}

impl SafeWriter {
    pub fn create(path: impl AsRef<Path>) -> InfraResult<Self> {
        let target = path.as_ref().to_path_buf();
        let temp = temp_path(&target);
        let file = File::create(&temp)?;

        tracing::debug!(path = %target.display(), temp = %temp.display(), "safe write started");

        Ok(Self {
            target,
            temp,
            file: Some(BufWriter::new(file)),
            committed: false,
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp
    }

    /// Flush, sync and atomically move the temp file onto the target.
    pub fn commit(mut self) -> InfraResult<()> {
        // `file` is only taken here and in `drop`.
        if let Some(file) = self.file.take() {
            let file = file.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }

        fs::rename(&self.temp, &self.target)?;
        self.committed = true;

        tracing::debug!(path = %self.target.display(), "safe write committed");
        Ok(())
    }

    fn file(&mut self) -> io::Result<&mut BufWriter<File>> {
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::other("writer already finished"))
    }
}

impl Write for SafeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file()?.flush()
    }
}

impl Drop for SafeWriter {
    fn drop(&mut self) {
        if self.committed {
            return;
        }

        // Close the handle before unlinking (required on Windows).
        self.file.take();
        if let Err(e) = fs::remove_file(&self.temp) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(temp = %self.temp.display(), error = %e, "failed to remove temp file");
            }
        }
        tracing::warn!(path = %self.target.display(), "write aborted; target left intact");
    }
}

/// Run `write` against a [`SafeWriter`] for `path`: `Ok` commits, `Err` aborts.
pub fn write_atomically<T, F>(path: impl AsRef<Path>, write: F) -> InfraResult<T>
where
    F: FnOnce(&mut SafeWriter) -> InfraResult<T>,
{
    let mut writer = SafeWriter::create(path)?;
    let value = write(&mut writer)?;
    writer.commit()?;
    Ok(value)
}

fn temp_path(target: &Path) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InfraError;

    #[test]
    fn commit_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("safe_output.txt");
        fs::write(&path, "old").unwrap();

        let mut writer = SafeWriter::create(&path).unwrap();
        writer.write_all(b"written safely\n").unwrap();
        writer.write_all(b"only kept once complete").unwrap();
        let temp = writer.temp_path().to_path_buf();
        assert!(temp.exists());
        writer.commit().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "written safely\nonly kept once complete"
        );
        assert!(!temp.exists());
    }

    #[test]
    fn dropping_without_commit_leaves_target_intact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "original").unwrap();

        {
            let mut writer = SafeWriter::create(&path).unwrap();
            writer.write_all(b"half a docu").unwrap();
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
        assert!(!dir.path().join("config.json.tmp").exists());
    }

    #[test]
    fn failing_closure_aborts_the_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        fs::write(&path, "keep me").unwrap();

        let result: InfraResult<()> = write_atomically(&path, |w| {
            w.write_all(b"partial")?;
            Err(io::Error::other("simulated failure").into())
        });

        assert!(matches!(result, Err(InfraError::Io(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");
        assert!(!dir.path().join("report.txt.tmp").exists());
    }

    #[test]
    fn write_atomically_creates_missing_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.txt");

        let n = write_atomically(&path, |w| {
            w.write_all(b"hello")?;
            Ok(5)
        })
        .unwrap();

        assert_eq!(n, 5);
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target_dir");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("occupant.txt"), "in the way").unwrap();

        let result = write_atomically(&target, |w| {
            w.write_all(b"cannot land on a non-empty directory")?;
            Ok(())
        });

        assert!(matches!(result, Err(InfraError::Io(_))));
        assert!(target.is_dir());
        assert_eq!(
            fs::read_to_string(target.join("occupant.txt")).unwrap(),
            "in the way"
        );
        assert!(!dir.path().join("target_dir.tmp").exists());
    }

    #[test]
    fn create_fails_when_directory_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");

        assert!(matches!(SafeWriter::create(&path), Err(InfraError::Io(_))));
    }
}
