//! Command execution tool: run_command
//!
//! Runs `sh -c <command>` in the working directory. The child is hard-killed
//! when the timeout expires; whatever it printed up to that point is
//! returned as a successful, truncated result.

use shipwright_domain::tool::{
    ExecutionContext, RiskLevel, ToolCall, ToolDefinition, ToolError, ToolKind, ToolParameter,
    ToolResult, ToolResultMetadata,
};
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const RUN_COMMAND: &str = "run_command";

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Maximum combined output size (1 MiB)
const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

/// How long to wait for pipes to drain once the shell itself has exited.
const DRAIN_GRACE: Duration = Duration::from_secs(1);

pub fn run_command_definition() -> ToolDefinition {
    ToolDefinition::new(
        RUN_COMMAND,
        "Execute a shell command in the working directory and return its output",
        RiskLevel::Medium,
    )
    .with_kind(ToolKind::Command)
    .with_parameter(ToolParameter::new("command", "The command to execute", true))
    .with_parameter(
        ToolParameter::new("timeout_secs", "Timeout in seconds (default: 60)", false)
            .with_type("integer"),
    )
}

type Buffer = Arc<Mutex<Vec<u8>>>;

/// Copy a pipe into `buf`, keeping at most one byte past the cap so the
/// caller can tell the output was cut.
fn pump<R>(reader: Option<R>, buf: Buffer) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let Some(mut reader) = reader else {
            return;
        };
        let mut chunk = [0u8; 8192];
        loop {
            match reader.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if let Ok(mut b) = buf.lock() {
                        let room = (MAX_OUTPUT_SIZE + 1).saturating_sub(b.len());
                        b.extend_from_slice(&chunk[..n.min(room)]);
                    }
                }
            }
        }
    })
}

fn take(buf: &Buffer) -> Vec<u8> {
    buf.lock().map(|mut b| std::mem::take(&mut *b)).unwrap_or_default()
}

#[cfg(target_os = "linux")]
fn kill_group(pid: Option<u32>) {
    if let Some(pid) = pid {
        // SAFETY: plain kill(2) on the process group created for this child
        unsafe {
            libc::kill(-(pid as i32), libc::SIGKILL);
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn kill_group(_pid: Option<u32>) {}

pub async fn execute_run_command(
    call: &ToolCall,
    ctx: &ExecutionContext,
    default_timeout: Duration,
) -> ToolResult {
    let start = Instant::now();

    let command = match call.require_string("command") {
        Ok(c) => c,
        Err(e) => return ToolResult::failure(RUN_COMMAND, ToolError::invalid_argument(e)),
    };

    let timeout = call
        .get_i64("timeout_secs")
        .filter(|secs| *secs > 0)
        .map(|secs| Duration::from_secs(secs as u64))
        .unwrap_or(default_timeout);

    if !ctx.working_dir().is_dir() {
        return ToolResult::failure(
            RUN_COMMAND,
            ToolError::not_found(format!(
                "Working directory does not exist: {}",
                ctx.working_dir().display()
            )),
        );
    }

    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(command)
        .current_dir(ctx.working_dir())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    cmd.process_group(0);

    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            return ToolResult::failure(
                RUN_COMMAND,
                ToolError::execution_failed(format!("Failed to spawn command: {}", e)),
            );
        }
    };
    debug!(command, pid = ?child.id(), "Spawned command");

    let stdout_buf = Buffer::default();
    let stderr_buf = Buffer::default();
    let stdout_task = pump(child.stdout.take(), stdout_buf.clone());
    let stderr_task = pump(child.stderr.take(), stderr_buf.clone());

    let pid = child.id();
    let waited = tokio::time::timeout(timeout, child.wait()).await;
    let status = match waited {
        Ok(Ok(status)) => Some(status),
        Ok(Err(e)) => {
            return ToolResult::failure(
                RUN_COMMAND,
                ToolError::execution_failed(format!("Failed to wait for process: {}", e)),
            );
        }
        Err(_) => {
            warn!(command, timeout_secs = timeout.as_secs(), "Command timed out, killing");
            kill_group(pid);
            let _ = child.kill().await;
            None
        }
    };

    // Background grandchildren may still hold the pipes open.
    for task in [stdout_task, stderr_task] {
        let abort = task.abort_handle();
        if tokio::time::timeout(DRAIN_GRACE, task).await.is_err() {
            abort.abort();
        }
    }

    let stdout = take(&stdout_buf);
    let stderr = take(&stderr_buf);

    let mut combined = String::from_utf8_lossy(&stdout).into_owned();
    if !stderr.is_empty() {
        if !combined.is_empty() {
            combined.push_str("\n--- stderr ---\n");
        }
        combined.push_str(&String::from_utf8_lossy(&stderr));
    }

    let mut truncated = status.is_none();
    if combined.len() > MAX_OUTPUT_SIZE {
        let mut end = MAX_OUTPUT_SIZE;
        while !combined.is_char_boundary(end) {
            end -= 1;
        }
        combined.truncate(end);
        combined.push_str("\n... (output truncated)");
        truncated = true;
    }

    let exit_code = status.and_then(|s| s.code());
    let output = match status {
        None => format!(
            "Command timed out after {} seconds\n{}",
            timeout.as_secs(),
            combined
        ),
        Some(s) if !s.success() => format!(
            "Command exited with code {}\n{}",
            exit_code.map_or_else(|| "unknown".to_string(), |c| c.to_string()),
            combined
        ),
        Some(_) => combined,
    };

    let bytes = output.len();
    ToolResult::success(RUN_COMMAND, output).with_metadata(ToolResultMetadata {
        duration_ms: Some(start.elapsed().as_millis() as u64),
        bytes: Some(bytes),
        exit_code,
        truncated,
        ..Default::default()
    })
}
