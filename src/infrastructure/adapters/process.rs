//! 外部命令执行
//!
//! 带超时的子进程调用，超时后子进程随 future 析构被终止

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("cannot start {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("timed out after {0}s")]
    Timeout(u64),

    #[error("exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
}

/// 执行命令并等待完成，非零退出码视为失败
pub async fn run_tool<I, S>(program: &Path, args: I, timeout: Duration) -> Result<Output, ProcessError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let started = Instant::now();
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    tracing::debug!(command = ?command.as_std(), "Running external tool");

    let child = command.spawn().map_err(|e| ProcessError::Spawn {
        program: program.display().to_string(),
        reason: e.to_string(),
    })?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| ProcessError::Spawn {
            program: program.display().to_string(),
            reason: e.to_string(),
        })?,
        Err(_) => return Err(ProcessError::Timeout(timeout.as_secs())),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::error!(
            program = %program.display(),
            status = %output.status,
            stderr = %stderr,
            "External tool failed"
        );
        return Err(ProcessError::Failed {
            status: output.status.to_string(),
            stderr,
        });
    }

    tracing::debug!(
        program = %program.display(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "External tool finished"
    );

    Ok(output)
}
