//! Read-only precondition checks on base and per-account directories.

use std::io;
use std::path::{Path, PathBuf};

/// Result of probing a per-account path.
#[derive(Debug)]
pub enum PathAccess {
    /// Nothing exists at the path. Per-account directories are created
    /// lazily, so this is acceptable.
    Absent,
    /// A directory the current process can write into and traverse.
    Accessible,
    /// Something other than a directory exists at the path.
    NotADirectory,
    /// The path exists but cannot be stat'ed or lacks write/execute access.
    Denied(io::Error),
}

impl PathAccess {
    /// Returns `true` if the path does not block a deletion.
    pub fn is_ok(&self) -> bool {
        matches!(self, PathAccess::Absent | PathAccess::Accessible)
    }
}

/// Returns the first path that does not exist on disk.
///
/// A path whose existence cannot be determined counts as missing.
pub async fn find_first_missing(paths: &[PathBuf]) -> Option<PathBuf> {
    for path in paths {
        if !matches!(tokio::fs::try_exists(path).await, Ok(true)) {
            return Some(path.clone());
        }
    }
    None
}

/// Returns the first path that exists but is not an accessible directory.
///
/// Absent paths are skipped. Checks run in input order and stop at the
/// first failure.
pub async fn find_first_inaccessible(paths: &[PathBuf]) -> Option<PathBuf> {
    for path in paths {
        let access = probe(path).await;
        if !access.is_ok() {
            tracing::debug!(path = %path.display(), ?access, "inaccessible account directory");
            return Some(path.clone());
        }
    }
    None
}

/// Probes a single path: existence, directory-ness, then write+execute access.
pub async fn probe(path: &Path) -> PathAccess {
    let meta = match tokio::fs::metadata(path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return PathAccess::Absent,
        Err(e) => return PathAccess::Denied(e),
    };

    if !meta.is_dir() {
        return PathAccess::NotADirectory;
    }

    match check_write_exec(path) {
        Ok(()) => PathAccess::Accessible,
        // Removed between stat and access.
        Err(e) if e.kind() == io::ErrorKind::NotFound => PathAccess::Absent,
        Err(e) => PathAccess::Denied(e),
    }
}

#[cfg(unix)]
fn check_write_exec(path: &Path) -> io::Result<()> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // SAFETY: `c_path` is a valid NUL-terminated string that outlives the call.
    let rc = unsafe { libc::access(c_path.as_ptr(), libc::W_OK | libc::X_OK) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn check_write_exec(path: &Path) -> io::Result<()> {
    let meta = std::fs::metadata(path)?;
    if meta.permissions().readonly() {
        return Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "directory is read-only",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_none_when_all_exist() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let paths = vec![a.path().to_path_buf(), b.path().to_path_buf()];
        assert!(find_first_missing(&paths).await.is_none());
    }

    #[tokio::test]
    async fn missing_reports_first_absent_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let first = tmp.path().join("attachments");
        let second = tmp.path().join("previews");
        let paths = vec![first.clone(), second];
        assert_eq!(find_first_missing(&paths).await, Some(first));
    }

    #[tokio::test]
    async fn missing_skips_existing_prefix() {
        let tmp = tempfile::tempdir().unwrap();
        let previews = tmp.path().join("previews");
        let paths = vec![tmp.path().to_path_buf(), previews.clone()];
        assert_eq!(find_first_missing(&paths).await, Some(previews));
    }

    #[tokio::test]
    async fn inaccessible_skips_absent_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = vec![tmp.path().join("u1"), tmp.path().join("u2")];
        assert!(find_first_inaccessible(&paths).await.is_none());
    }

    #[tokio::test]
    async fn inaccessible_accepts_writable_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("u1");
        std::fs::create_dir(&dir).unwrap();
        assert!(matches!(probe(&dir).await, PathAccess::Accessible));
        assert!(find_first_inaccessible(&[dir]).await.is_none());
    }

    #[tokio::test]
    async fn inaccessible_flags_regular_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("u1");
        std::fs::write(&file, b"not a dir").unwrap();

        assert!(matches!(probe(&file).await, PathAccess::NotADirectory));
        assert_eq!(find_first_inaccessible(&[file.clone()]).await, Some(file));
    }

    #[tokio::test]
    async fn inaccessible_short_circuits_on_first_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let absent = tmp.path().join("absent");
        let bad_a = tmp.path().join("bad_a");
        let bad_b = tmp.path().join("bad_b");
        std::fs::write(&bad_a, b"x").unwrap();
        std::fs::write(&bad_b, b"x").unwrap();

        let paths = vec![absent, bad_a.clone(), bad_b];
        assert_eq!(find_first_inaccessible(&paths).await, Some(bad_a));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn inaccessible_flags_read_only_directory() {
        use std::os::unix::fs::PermissionsExt;

        // Root bypasses permission bits.
        if unsafe { libc::geteuid() } == 0 {
            return;
        }

        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("u1");
        std::fs::create_dir(&dir).unwrap();
        std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o500)).unwrap();

        let access = probe(&dir).await;
        std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(access, PathAccess::Denied(_)));
    }
}
