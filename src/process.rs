//! # External Commands
//!
//! Async wrappers around child processes, shaped to be used as task bodies
//! for the runners: each resolves to `Ok(())` on a zero exit status and to a
//! [`ProcessError`] otherwise.
//!
//! ```rust,no_run
//! use salticidae::process;
//! use salticidae::sequence::{run_in_sequence, RunOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tasks: Vec<_> = ["alpha", "beta"]
//!     .into_iter()
//!     .map(|name| move || process::spawn("mkdir", ["-p", name]))
//!     .collect();
//!
//! run_in_sequence(tasks, &RunOptions::new()).await?;
//! # Ok(())
//! # }
//! ```

use std::ffi::OsStr;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::debug;

use crate::error::{ProcessError, ProcessResult};

/// Shell used by [`exec`] to interpret a command string
#[cfg(not(windows))]
const SHELL: (&str, &str) = ("sh", "-c");
#[cfg(windows)]
const SHELL: (&str, &str) = ("cmd", "/C");

/// Run a full command line through the platform shell
///
/// Output is captured rather than shown; on failure the captured stderr is
/// kept in [`ProcessError::NonZeroExit`].
pub async fn exec(command: &str) -> ProcessResult<()> {
    let (shell, flag) = SHELL;
    debug!(command = command, "Executing shell command");

    let output = Command::new(shell)
        .arg(flag)
        .arg(command)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| ProcessError::Spawn {
            command: command.to_string(),
            source,
        })?;

    check_status(
        command,
        output.status,
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

/// Run `program` with `args`, inheriting this process's stdio
pub async fn spawn<I, S>(program: &str, args: I) -> ProcessResult<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    debug!(program = program, "Spawning process");

    let status = Command::new(program)
        .args(args)
        .status()
        .await
        .map_err(|source| ProcessError::Spawn {
            command: program.to_string(),
            source,
        })?;

    check_status(program, status, String::new())
}

fn check_status(command: &str, status: ExitStatus, stderr: String) -> ProcessResult<()> {
    if status.success() {
        debug!(command = command, "Process exited successfully");
        return Ok(());
    }

    debug!(command = command, code = ?status.code(), "Process exited unsuccessfully");
    Err(ProcessError::NonZeroExit {
        command: command.to_string(),
        code: status.code(),
        stderr,
    })
}
