use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("command must not be empty")]
    EmptyCommand,
    #[error("command contains forbidden shell character '{0}'")]
    ForbiddenCharacter(char),
    #[error("item type cannot be executed")]
    UnsupportedItemType,
    #[error("failed to spawn process: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("opening a terminal window is only supported on Windows")]
    TerminalUnsupported,
    #[error("failed to open target: {0}")]
    Open(#[source] std::io::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
