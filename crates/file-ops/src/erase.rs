//! Recursive removal of per-account directories.

use std::ffi::OsStr;
use std::io;
use std::path::{Component, Path, PathBuf};

use futures_util::future::join_all;

use crate::error::FileOpsError;

/// Derives the per-account directory under `base`.
///
/// The account id must be a single plain path component: no separators,
/// no `.` or `..`, not empty. Glob metacharacters are kept literally.
pub fn account_path(base: &Path, account_id: &str) -> Result<PathBuf, FileOpsError> {
    let mut components = Path::new(account_id).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == OsStr::new(account_id) => {
            Ok(base.join(name))
        }
        _ => Err(FileOpsError::InvalidAccountId(account_id.to_string())),
    }
}

/// Derives the per-account directory under every base path, in order.
pub fn account_paths(bases: &[PathBuf], account_id: &str) -> Result<Vec<PathBuf>, FileOpsError> {
    bases
        .iter()
        .map(|base| account_path(base, account_id))
        .collect()
}

/// Removes every path recursively, concurrently.
///
/// Paths that do not exist are skipped. All removals are attempted even if
/// one fails; the first failure in input order is returned. On success
/// returns how many paths were actually removed.
pub async fn remove_all(paths: &[PathBuf]) -> Result<usize, FileOpsError> {
    let results = join_all(paths.iter().map(|p| remove_one(p))).await;

    let mut removed = 0;
    let mut first_err = None;
    for result in results {
        match result {
            Ok(true) => removed += 1,
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(error = %e, "account directory removal failed");
                first_err.get_or_insert(e);
            }
        }
    }

    match first_err {
        Some(e) => Err(e),
        None => Ok(removed),
    }
}

/// Removes a single path. Returns `false` if it was already absent.
async fn remove_one(path: &Path) -> Result<bool, FileOpsError> {
    let wrap = |source: io::Error| FileOpsError::Remove {
        path: path.to_path_buf(),
        source,
    };

    // symlink_metadata: a link is unlinked, never followed.
    let meta = match tokio::fs::symlink_metadata(path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "account directory already absent");
            return Ok(false);
        }
        Err(e) => return Err(wrap(e)),
    };

    let result = if meta.is_dir() {
        tokio::fs::remove_dir_all(path).await
    } else {
        tokio::fs::remove_file(path).await
    };

    match result {
        Ok(()) => {
            tracing::info!(path = %path.display(), "removed account directory");
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(wrap(e)),
    }
}
