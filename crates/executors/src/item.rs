use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ExecutorError;

/// Shell metacharacters that are rejected in stored commands for every item
/// type except `url`. Rejected at validation time, before any spawn attempt.
pub const FORBIDDEN_SHELL_CHARS: [char; 7] = ['&', '|', '<', '>', '(', ')', '^'];

/// The closed set of shortcut kinds. Persisted values outside the set
/// deserialize to `Unknown` and are reported as a warning, never executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Command,
    Application,
    Python,
    Java,
    File,
    Folder,
    Url,
    #[serde(other)]
    Unknown,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Command => "command",
            ItemType::Application => "application",
            ItemType::Python => "python",
            ItemType::Java => "java",
            ItemType::File => "file",
            ItemType::Folder => "folder",
            ItemType::Url => "url",
            ItemType::Unknown => "unknown",
        }
    }

    /// Total parse: anything unrecognized becomes `Unknown`.
    pub fn parse(value: &str) -> ItemType {
        match value {
            "command" => ItemType::Command,
            "application" => ItemType::Application,
            "python" => ItemType::Python,
            "java" => ItemType::Java,
            "file" => ItemType::File,
            "folder" => ItemType::Folder,
            "url" => ItemType::Url,
            _ => ItemType::Unknown,
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user-defined shortcut as handed to the execution pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchableItem {
    pub id: Uuid,
    pub name: String,
    pub item_type: ItemType,
    /// Raw user-entered string: shell command, file path, URL or JAR/script
    /// path depending on `item_type`.
    pub command: String,
    pub launch_params: Option<String>,
    pub run_in_terminal: bool,
    pub java_environment_id: Option<String>,
}

impl LaunchableItem {
    /// Re-checks the forbidden-character invariant. URL items are exempt;
    /// every other type is rejected before a command is ever built.
    pub fn validate(&self) -> Result<(), ExecutorError> {
        if self.command.trim().is_empty() {
            return Err(ExecutorError::EmptyCommand);
        }
        if self.item_type != ItemType::Url
            && let Some(c) = self
                .command
                .chars()
                .find(|c| FORBIDDEN_SHELL_CHARS.contains(c))
        {
            return Err(ExecutorError::ForbiddenCharacter(c));
        }
        Ok(())
    }

    /// Launch params with a leading space, ready to append to a command
    /// string, or empty when unset.
    pub(crate) fn params_suffix(&self) -> String {
        match self.launch_params.as_deref().map(str::trim) {
            Some(params) if !params.is_empty() => format!(" {params}"),
            _ => String::new(),
        }
    }
}
