//! Version-control gateway.
//!
//! Shells out to `git` for the two operations the store needs: bringing a
//! checkout up to date and recording one ticket file per commit.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{PagOffError, Result};

/// Version-control operations used by the mutation protocol and the CLI.
pub trait VersionControl {
    /// Rebase the checkout at `dir` onto its upstream.
    ///
    /// # Errors
    ///
    /// Returns `CommandFailed` if the pull fails.
    fn pull_rebase(&self, dir: &Path) -> Result<()>;

    /// Commit exactly the file at `path` with `message`.
    ///
    /// # Errors
    ///
    /// Returns `CommandFailed` if the commit fails.
    fn commit_file(&self, path: &Path, message: &str) -> Result<()>;
}

/// Run `command` in `dir`, capturing both output streams.
///
/// Returns the trimmed stdout when `capture_stdout` is set.
///
/// # Errors
///
/// Returns `CommandFailed` with the captured stderr if the command exits
/// non-zero, or with the spawn error if it cannot be started.
pub fn run(command: &[&str], dir: &Path, capture_stdout: bool) -> Result<Option<String>> {
    let shown = command.join(" ");
    let Some((program, args)) = command.split_first() else {
        return Err(PagOffError::validation("command", "is empty"));
    };

    tracing::debug!(command = %shown, dir = %dir.display(), "Running command");
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| PagOffError::CommandFailed {
            command: shown.clone(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::debug!(command = %shown, status = ?output.status, "Command failed");
        return Err(PagOffError::CommandFailed {
            command: shown,
            stderr,
        });
    }

    if capture_stdout {
        Ok(Some(
            String::from_utf8_lossy(&output.stdout).trim().to_string(),
        ))
    } else {
        Ok(None)
    }
}

/// The `git` command-line client.
#[derive(Debug, Clone, Default)]
pub struct Git;

impl VersionControl for Git {
    fn pull_rebase(&self, dir: &Path) -> Result<()> {
        tracing::info!(dir = %dir.display(), "Pulling with rebase");
        run(&["git", "pull", "--rebase"], dir, false).map(|_| ())
    }

    fn commit_file(&self, path: &Path, message: &str) -> Result<()> {
        let (dir, name) = split_path(path)?;
        tracing::info!(file = %name, "Committing ticket file");
        run(&["git", "commit", "-m", message, "--", name.as_str()], dir, false).map(|_| ())
    }
}

/// Split a ticket path into its working directory and file name.
fn split_path(path: &Path) -> Result<(&Path, String)> {
    let name = path
        .file_name()
        .ok_or_else(|| PagOffError::validation("path", "has no file name"))?
        .to_string_lossy()
        .into_owned();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok((dir, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .is_ok_and(|o| o.status.success())
    }

    fn init_repo(dir: &Path) {
        for args in [
            vec!["git", "init", "-q"],
            vec!["git", "config", "user.name", "Test"],
            vec!["git", "config", "user.email", "test@example.com"],
            vec!["git", "config", "commit.gpgsign", "false"],
        ] {
            run(&args, dir, false).unwrap();
        }
    }

    #[test]
    fn test_run_captures_stdout() {
        let dir = tempfile::tempdir().unwrap();
        if !git_available() {
            return;
        }
        let out = run(&["git", "--version"], dir.path(), true).unwrap();
        assert!(out.unwrap().starts_with("git version"));
        assert!(run(&["git", "--version"], dir.path(), false).unwrap().is_none());
    }

    #[test]
    fn test_run_failure_carries_stderr() {
        let dir = tempfile::tempdir().unwrap();
        if !git_available() {
            return;
        }
        let err = run(&["git", "no-such-subcommand"], dir.path(), false).unwrap_err();
        match err {
            PagOffError::CommandFailed { command, stderr } => {
                assert_eq!(command, "git no-such-subcommand");
                assert!(!stderr.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_run_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&["pag-off-no-such-binary", "--flag"], dir.path(), false).unwrap_err();
        match &err {
            PagOffError::CommandFailed { command, .. } => {
                assert_eq!(command, "pag-off-no-such-binary --flag");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(
            err.to_string()
                .starts_with("The command \"pag-off-no-such-binary --flag\" failed with")
        );
    }

    #[test]
    fn test_run_empty_command() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(&[], dir.path(), false).is_err());
    }

    #[test]
    fn test_commit_file_is_scoped() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());
        fs::write(dir.path().join("ticket"), "{}").unwrap();
        fs::write(dir.path().join("other"), "a").unwrap();
        run(&["git", "add", "ticket", "other"], dir.path(), false).unwrap();
        run(&["git", "commit", "-q", "-m", "init"], dir.path(), false).unwrap();

        fs::write(dir.path().join("ticket"), "{\"id\": 1}").unwrap();
        fs::write(dir.path().join("other"), "b").unwrap();

        Git.commit_file(&dir.path().join("ticket"), "Updated issue ticket: T")
            .unwrap();

        let subject = run(&["git", "log", "-1", "--format=%s"], dir.path(), true)
            .unwrap()
            .unwrap();
        assert_eq!(subject, "Updated issue ticket: T");
        let dirty = run(&["git", "status", "--porcelain"], dir.path(), true)
            .unwrap()
            .unwrap();
        assert_eq!(dirty, "M other");
    }

    #[test]
    fn test_pull_without_upstream_fails() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());
        let err = Git.pull_rebase(dir.path()).unwrap_err();
        assert!(matches!(err, PagOffError::CommandFailed { .. }));
    }

    #[test]
    fn test_split_path() {
        let (dir, name) = split_path(Path::new("/tmp/tickets/abc")).unwrap();
        assert_eq!(dir, Path::new("/tmp/tickets"));
        assert_eq!(name, "abc");
        let (dir, _) = split_path(Path::new("abc")).unwrap();
        assert_eq!(dir, Path::new("."));
    }
}
