//! Process execution: captured child runs and detached terminal windows.

use std::process::Stdio;

use command_group::AsyncCommandGroup;
use tokio::{io::AsyncReadExt, process::Command};
use utils::{encoding::normalize_bytes, shell::get_shell_command};

use crate::{error::ExecutorError, invocation::ShellInvocation};

/// Outcome of one captured child run: exit status plus the combined,
/// encoding-normalized stdout and stderr.
#[derive(Debug, Clone)]
pub struct CapturedRun {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub output: String,
}

impl CapturedRun {
    /// Failure message: the captured output, or a generic exit-code message
    /// when the process produced none.
    pub fn failure_message(&self) -> String {
        if !self.output.trim().is_empty() {
            return self.output.clone();
        }
        match self.exit_code {
            Some(code) => format!("execution failed with exit code {code}"),
            None => "execution was terminated before exiting".to_string(),
        }
    }
}

/// Run the invocation through the OS shell with stdout/stderr piped, wait for
/// exit, and return the combined output. Shell operators inside the command
/// string are honored by the shell itself.
pub async fn run_captured(invocation: &ShellInvocation) -> Result<CapturedRun, ExecutorError> {
    let (shell_cmd, shell_arg) = get_shell_command();
    let mut command = Command::new(shell_cmd);
    command
        .kill_on_drop(false)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .arg(shell_arg)
        .arg(&invocation.command);

    if let Some(dir) = invocation
        .working_dir
        .as_deref()
        .filter(|dir| !dir.trim().is_empty())
    {
        command.current_dir(dir);
    }

    tracing::info!(command = %invocation.command, "executing command");

    let mut child = command.group_spawn().map_err(ExecutorError::Spawn)?;

    let inner = child.inner();
    let mut stdout = inner.stdout.take();
    let mut stderr = inner.stderr.take();

    let mut stdout_buf = Vec::new();
    let mut stderr_buf = Vec::new();
    let (stdout_read, stderr_read) = tokio::join!(
        async {
            match stdout.as_mut() {
                Some(pipe) => pipe.read_to_end(&mut stdout_buf).await.map(|_| ()),
                None => Ok(()),
            }
        },
        async {
            match stderr.as_mut() {
                Some(pipe) => pipe.read_to_end(&mut stderr_buf).await.map(|_| ()),
                None => Ok(()),
            }
        }
    );
    stdout_read?;
    stderr_read?;

    let status = child.wait().await?;

    // Streams are normalized separately: each may carry its own encoding.
    let output = format!(
        "{}{}",
        normalize_bytes(&stdout_buf),
        normalize_bytes(&stderr_buf)
    );

    Ok(CapturedRun {
        success: status.success(),
        exit_code: status.code(),
        output,
    })
}

/// Full `cmd /k` session string for a terminal-mode run: switch the console
/// code page to UTF-8, prefix PATH with the interpreter directory, change to
/// the working directory, then run the command. The window stays open.
pub fn terminal_session_command(
    invocation: &ShellInvocation,
    path_prefix: Option<&str>,
) -> String {
    let mut session = String::from("chcp 65001 >nul");
    if let Some(dir) = path_prefix.filter(|dir| !dir.trim().is_empty()) {
        session.push_str(&format!(" & set \"PATH={dir};%PATH%\""));
    }
    if let Some(dir) = invocation
        .working_dir
        .as_deref()
        .filter(|dir| !dir.trim().is_empty())
    {
        session.push_str(&format!(" & cd /d \"{dir}\""));
    }
    session.push_str(" & ");
    session.push_str(&invocation.command);
    session
}

/// Open a new visible terminal window running the command under a persistent
/// shell session. Fire-and-forget: no handle, no captured result; failures
/// inside the window are visible only to the user.
#[cfg(windows)]
pub async fn launch_terminal(
    invocation: &ShellInvocation,
    path_prefix: Option<&str>,
) -> Result<(), ExecutorError> {
    let session = terminal_session_command(invocation, path_prefix);
    tracing::info!(command = %session, "launching terminal session");

    let mut command = Command::new("cmd.exe");
    command
        .args(["/c", "start", "Runner", "cmd", "/k", session.as_str()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(false);
    command.spawn().map_err(ExecutorError::Spawn)?;
    Ok(())
}

#[cfg(not(windows))]
pub async fn launch_terminal(
    _invocation: &ShellInvocation,
    _path_prefix: Option<&str>,
) -> Result<(), ExecutorError> {
    Err(ExecutorError::TerminalUnsupported)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(command: &str, working_dir: Option<&str>) -> ShellInvocation {
        ShellInvocation {
            command: command.to_string(),
            working_dir: working_dir.map(str::to_string),
        }
    }

    #[test]
    fn session_includes_codepage_path_and_cd_steps() {
        let session = terminal_session_command(
            &invocation("\"C:\\t\\a.exe\" -v", Some(r"C:\t")),
            Some(r"C:\Python311"),
        );
        assert_eq!(
            session,
            "chcp 65001 >nul & set \"PATH=C:\\Python311;%PATH%\" & cd /d \"C:\\t\" & \"C:\\t\\a.exe\" -v"
        );
    }

    #[test]
    fn session_omits_optional_steps_when_absent() {
        let session = terminal_session_command(&invocation("whoami", None), None);
        assert_eq!(session, "chcp 65001 >nul & whoami");
    }

    #[tokio::test]
    async fn captured_run_collects_stdout() {
        let run = run_captured(&invocation("echo OK", None)).await.unwrap();
        assert!(run.success);
        assert_eq!(run.output.trim(), "OK");
    }

    #[tokio::test]
    async fn captured_run_reports_exit_code_when_output_is_empty() {
        let run = run_captured(&invocation("exit 2", None)).await.unwrap();
        assert!(!run.success);
        assert_eq!(run.exit_code, Some(2));
        assert!(run.failure_message().contains('2'));
    }
}
