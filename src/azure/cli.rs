//! Azure CLI command execution.
//!
//! Runs `az` with an explicit argument list, captures stdout and enforces a
//! per-command timeout.

use crate::error::{AuditError, Result};
use colored::Colorize;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;
use tokio::process::Command;

/// Longest command line shown in logs and error messages.
const MAX_DISPLAY_LEN: usize = 120;

static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_whitespace_regex() -> &'static Regex {
    WHITESPACE_REGEX.get_or_init(|| Regex::new(r"\s+").expect("Invalid Regex"))
}

/// Handle on the az executable.
#[derive(Debug, Clone)]
pub struct AzCli {
    program: PathBuf,
    timeout: Duration,
}

impl AzCli {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        AzCli {
            program: program.into(),
            timeout,
        }
    }

    /// Run the command and return its stdout.
    ///
    /// A non-zero exit maps to [`AuditError::Command`] carrying stderr, an
    /// expired timeout to [`AuditError::Timeout`]. The child is killed when
    /// the timeout fires.
    pub async fn run(&self, args: &[String]) -> Result<String> {
        let shown = display_command(&self.program, args);
        log::debug!("run({cmd})", cmd = shown.on_blue());

        let mut command = Command::new(&self.program);
        command.args(args).kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(result) => result.map_err(|e| {
                log::error!("Command execution failed: {}", e);
                AuditError::command(format!(
                    "Failed to execute {}: {e}",
                    self.program.display()
                ))
            })?,
            Err(_) => {
                log::warn!("{} {shown}", "timeout".on_red());
                return Err(AuditError::Timeout {
                    what: shown,
                    secs: self.timeout.as_secs(),
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::trace!(
                "code={code:?}, status={status}\n┎######\nstderr=\n{stderr}\n┖######",
                code = output.status.code(),
                status = output.status,
                stderr = stderr.red()
            );
            log::warn!(
                "{failed} to run {cmd}",
                failed = "failed".on_red(),
                cmd = shown.on_blue()
            );
            return Err(AuditError::command(stderr.trim().to_string()));
        }

        log::debug!("Success output.stdout.len(): {}", output.stdout.len());
        String::from_utf8(output.stdout)
            .map_err(|e| AuditError::command(format!("Invalid UTF-8 from {shown}: {e}")))
    }
}

/// One-line rendering of a command for logs. Multi-line KQL is collapsed and
/// the whole line is cut to [`MAX_DISPLAY_LEN`] characters.
fn display_command(program: &Path, args: &[String]) -> String {
    let joined = std::iter::once(program.display().to_string())
        .chain(args.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ");
    let collapsed = get_whitespace_regex().replace_all(joined.trim(), " ");
    if collapsed.chars().count() > MAX_DISPLAY_LEN {
        let cut: String = collapsed.chars().take(MAX_DISPLAY_LEN).collect();
        format!("{cut}...")
    } else {
        collapsed.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_display_command_collapses_whitespace() {
        let shown = display_command(
            Path::new("az"),
            &args(&["graph", "query", "-q", "resources\n| project   name\n"]),
        );
        assert_eq!(shown, "az graph query -q resources | project name");
    }

    #[test]
    fn test_display_command_truncates() {
        let long = "x".repeat(500);
        let shown = display_command(Path::new("az"), &args(&[&long]));
        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().count(), MAX_DISPLAY_LEN + 3);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_captures_stdout() {
        let cli = AzCli::new("echo", Duration::from_secs(5));
        let out = cli.run(&args(&["hello"])).await.unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_non_zero_exit_is_command_error() {
        let cli = AzCli::new("false", Duration::from_secs(5));
        let err = cli.run(&[]).await.unwrap_err();
        assert!(matches!(err, AuditError::Command(_)), "got {err:?}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_times_out() {
        let cli = AzCli::new("sleep", Duration::from_millis(100));
        let err = cli.run(&args(&["5"])).await.unwrap_err();
        assert!(matches!(err, AuditError::Timeout { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_run_missing_program() {
        let cli = AzCli::new("definitely-not-an-az-binary", Duration::from_secs(5));
        let err = cli.run(&[]).await.unwrap_err();
        assert!(err.to_string().contains("Failed to execute"));
    }
}
