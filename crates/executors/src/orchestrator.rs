//! Per-item-type dispatch: decides which build/run path applies and reports
//! outcomes to the notification and window-control collaborators.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    env::EnvironmentConfig,
    error::ExecutorError,
    invocation::{LaunchPlan, ShellInvocation, build},
    item::{ItemType, LaunchableItem},
    runner::{launch_terminal, run_captured},
};

/// How long interpreter launches get before success is assumed. Interpreter
/// startup is typically fast; blocking the UI on full completion of
/// long-running scripts is worse than an occasional premature success.
pub const OPTIMISTIC_SUCCESS_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

/// Outcome of one run. `Launched` means the process detached (terminal mode
/// or optimistic interpreter start) and no final status is known. `Warning`
/// is reserved for items that were never executed (unknown type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
    Launched,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub outcome: Outcome,
    /// Combined, encoding-normalized stdout+stderr; captured runs only.
    pub output: String,
    pub message: String,
}

impl ExecutionResult {
    fn success(message: impl Into<String>, output: String) -> Self {
        Self {
            outcome: Outcome::Success,
            output,
            message: message.into(),
        }
    }

    fn launched(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Launched,
            output: String::new(),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>, output: String) -> Self {
        Self {
            outcome: Outcome::Failure,
            output,
            message: message.into(),
        }
    }
}

/// Outcome reporting, implemented by the UI layer.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, title: &str, message: &str, severity: Severity);
}

/// Window management, implemented by the UI layer.
#[async_trait]
pub trait WindowControl: Send + Sync {
    async fn minimize_window(&self);
}

/// Drives one run per call. No retries, no cancellation, no state shared
/// across runs; every collaborator error is converted into a failure outcome
/// at this boundary.
pub struct ItemLauncher {
    notifications: Arc<dyn NotificationSink>,
    window: Arc<dyn WindowControl>,
}

impl ItemLauncher {
    pub fn new(notifications: Arc<dyn NotificationSink>, window: Arc<dyn WindowControl>) -> Self {
        Self {
            notifications,
            window,
        }
    }

    /// Run one item to its reportable outcome. For captured `command` runs
    /// this resolves when the child closes; for terminal, application and
    /// optimistic interpreter runs it resolves as soon as the launch is
    /// acknowledged.
    pub async fn run(
        &self,
        item: &LaunchableItem,
        env: &EnvironmentConfig,
        auto_minimize: bool,
    ) -> ExecutionResult {
        if item.item_type == ItemType::Unknown {
            let result = ExecutionResult {
                outcome: Outcome::Warning,
                output: String::new(),
                message: format!("unknown item type for '{}'", item.name),
            };
            self.notifications
                .notify("Notice", &result.message, Severity::Warning)
                .await;
            return result;
        }

        let result = match self.dispatch(item, env).await {
            Ok(result) => result,
            Err(err) => ExecutionResult::failure(
                format!("failed to run '{}': {err}", item.name),
                String::new(),
            ),
        };

        self.report(&result).await;
        if auto_minimize && matches!(result.outcome, Outcome::Success | Outcome::Launched) {
            self.window.minimize_window().await;
        }
        result
    }

    async fn dispatch(
        &self,
        item: &LaunchableItem,
        env: &EnvironmentConfig,
    ) -> Result<ExecutionResult, ExecutorError> {
        let plan = build(item, env)?;
        match plan {
            LaunchPlan::OpenUrl(url) => {
                open_target(url).await?;
                Ok(ExecutionResult::success(
                    format!("URL opened: {}", item.name),
                    String::new(),
                ))
            }
            LaunchPlan::OpenPath(path) => {
                open_target(path).await?;
                let kind = if item.item_type == ItemType::File {
                    "file"
                } else {
                    "folder"
                };
                Ok(ExecutionResult::success(
                    format!("{kind} opened: {}", item.name),
                    String::new(),
                ))
            }
            LaunchPlan::Shell {
                invocation,
                path_prefix,
            } => {
                self.run_shell(item, invocation, path_prefix.as_deref())
                    .await
            }
        }
    }

    async fn run_shell(
        &self,
        item: &LaunchableItem,
        invocation: ShellInvocation,
        path_prefix: Option<&str>,
    ) -> Result<ExecutionResult, ExecutorError> {
        if item.run_in_terminal && terminal_capable(item.item_type) {
            launch_terminal(&invocation, path_prefix).await?;
            return Ok(ExecutionResult::launched(format!(
                "launched in terminal: {}",
                item.name
            )));
        }

        match item.item_type {
            ItemType::Command => {
                let run = run_captured(&invocation).await?;
                if run.success {
                    Ok(ExecutionResult::success(
                        format!("command completed: {}", item.name),
                        run.output,
                    ))
                } else {
                    let message = run.failure_message();
                    tracing::error!(item = %item.name, %message, "command failed");
                    Ok(ExecutionResult::failure(message, run.output))
                }
            }
            ItemType::Python | ItemType::Java => self.run_optimistic(item, invocation).await,
            ItemType::Application => {
                // Fire-and-forget: spawn errors are logged, never surfaced.
                let name = item.name.clone();
                tokio::spawn(async move {
                    match run_captured(&invocation).await {
                        Ok(run) if !run.success => {
                            tracing::error!(item = %name, message = %run.failure_message(), "application exited with failure");
                        }
                        Err(err) => {
                            tracing::error!(item = %name, %err, "application failed to start");
                        }
                        Ok(_) => {}
                    }
                });
                Ok(ExecutionResult::success(
                    format!("application started: {}", item.name),
                    String::new(),
                ))
            }
            _ => Err(ExecutorError::UnsupportedItemType),
        }
    }

    /// Captured interpreter run with deferred optimistic success: race the
    /// child against a short delay, first to finish wins. A failure arriving
    /// after the optimistic success fired is logged and swallowed.
    async fn run_optimistic(
        &self,
        item: &LaunchableItem,
        invocation: ShellInvocation,
    ) -> Result<ExecutionResult, ExecutorError> {
        let kind = item.item_type;
        let mut child = tokio::spawn(async move { run_captured(&invocation).await });

        tokio::select! {
            joined = &mut child => {
                let run = joined
                    .map_err(|err| ExecutorError::Io(std::io::Error::other(err)))??;
                if run.success {
                    Ok(ExecutionResult::success(
                        format!("{kind} run completed: {}", item.name),
                        run.output,
                    ))
                } else {
                    Ok(ExecutionResult::failure(
                        format!("{kind} run failed: {}", run.failure_message()),
                        run.output,
                    ))
                }
            }
            _ = tokio::time::sleep(OPTIMISTIC_SUCCESS_DELAY) => {
                let name = item.name.clone();
                tokio::spawn(async move {
                    match child.await {
                        Ok(Ok(run)) if !run.success => {
                            tracing::warn!(item = %name, message = %run.failure_message(), "late failure after optimistic success");
                        }
                        Ok(Err(err)) => {
                            tracing::warn!(item = %name, %err, "late spawn failure after optimistic success");
                        }
                        _ => {}
                    }
                });
                Ok(ExecutionResult::success(
                    format!("{kind} started: {}", item.name),
                    String::new(),
                ))
            }
        }
    }

    async fn report(&self, result: &ExecutionResult) {
        let (title, severity) = match result.outcome {
            Outcome::Success | Outcome::Launched => ("Success", Severity::Success),
            Outcome::Failure => ("Error", Severity::Error),
            Outcome::Warning => ("Notice", Severity::Warning),
        };
        self.notifications
            .notify(title, &result.message, severity)
            .await;
    }
}

/// Only command, python and java items honor the terminal flag.
fn terminal_capable(item_type: ItemType) -> bool {
    matches!(
        item_type,
        ItemType::Command | ItemType::Python | ItemType::Java
    )
}

/// Hand a URL or path to the OS open association on a blocking thread.
async fn open_target(target: String) -> Result<(), ExecutorError> {
    tokio::task::spawn_blocking(move || open::that(target))
        .await
        .map_err(|err| ExecutorError::Open(std::io::Error::other(err)))?
        .map_err(ExecutorError::Open)
}
