//! Subcommand implementations. Nothing here modifies the filesystem.

use std::fmt;
use std::path::PathBuf;

use anyhow::Result;
use userpurge_deletion::DeletionConfig;
use userpurge_file_ops::{PathAccess, account_paths, find_first_missing, probe};
use userpurge_protocol::series_namespace;

/// Outcome of a preflight check over one or more accounts.
#[derive(Debug, Default)]
pub struct CheckReport {
    /// First base directory that does not exist. Nothing else is checked.
    pub missing_base: Option<PathBuf>,
    pub accounts: Vec<AccountCheck>,
}

#[derive(Debug)]
pub struct AccountCheck {
    pub account_id: String,
    pub result: Result<Vec<(PathBuf, PathAccess)>, String>,
}

impl AccountCheck {
    fn passed(&self) -> bool {
        matches!(&self.result, Ok(paths) if paths.iter().all(|(_, access)| access.is_ok()))
    }
}

impl CheckReport {
    pub fn passed(&self) -> bool {
        self.missing_base.is_none() && self.accounts.iter().all(AccountCheck::passed)
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(base) = &self.missing_base {
            return writeln!(f, "FAIL base directory {} does not exist", base.display());
        }
        for account in &self.accounts {
            let verdict = if account.passed() { "ok" } else { "FAIL" };
            writeln!(f, "{verdict} {}", account.account_id)?;
            match &account.result {
                Ok(paths) => {
                    for (path, access) in paths {
                        writeln!(f, "  {} {}", path.display(), describe(access))?;
                    }
                }
                Err(reason) => writeln!(f, "  {reason}")?,
            }
        }
        Ok(())
    }
}

fn describe(access: &PathAccess) -> String {
    match access {
        PathAccess::Absent => "absent".into(),
        PathAccess::Accessible => "accessible".into(),
        PathAccess::NotADirectory => "not a directory".into(),
        PathAccess::Denied(e) => format!("denied ({e})"),
    }
}

/// Runs the filesystem gate for each account id.
///
/// Unlike a deletion, every path of every account is probed so the report
/// lists all problems at once.
pub async fn check(config: &DeletionConfig, account_ids: &[String]) -> CheckReport {
    if let Some(base) = find_first_missing(&config.base_paths).await {
        tracing::warn!(path = %base.display(), "base directory missing");
        return CheckReport {
            missing_base: Some(base),
            accounts: Vec::new(),
        };
    }

    let mut accounts = Vec::with_capacity(account_ids.len());
    for id in account_ids {
        let result = match account_paths(&config.base_paths, id) {
            Ok(paths) => {
                let mut probed = Vec::with_capacity(paths.len());
                for path in paths {
                    let access = probe(&path).await;
                    probed.push((path, access));
                }
                Ok(probed)
            }
            Err(e) => Err(e.to_string()),
        };
        accounts.push(AccountCheck {
            account_id: id.clone(),
            result,
        });
    }

    CheckReport {
        missing_base: None,
        accounts,
    }
}

/// Per-account directories a deletion of `account_id` would remove.
pub fn paths(config: &DeletionConfig, account_id: &str) -> Result<Vec<PathBuf>> {
    Ok(account_paths(&config.base_paths, account_id)?)
}

pub fn namespace(username: &str) -> String {
    series_namespace(username)
}
