use crate::kernel::services::ports::{PortError, RuntimeEventKind};

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Debug)]
pub enum SyncError {
    AlreadyAttached,
    NotAttached,
    PromptIdle,
    PromptAlreadyActive,
    Listener {
        kind: RuntimeEventKind,
        source: PortError,
    },
    Surface(PortError),
}

impl SyncError {
    /// Contract violations are fatal to the engine instance; everything else is a collaborator failure.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            SyncError::AlreadyAttached
                | SyncError::NotAttached
                | SyncError::PromptIdle
                | SyncError::PromptAlreadyActive
        )
    }
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::AlreadyAttached => write!(f, "runtime already attached"),
            SyncError::NotAttached => write!(f, "no runtime attached"),
            SyncError::PromptIdle => write!(f, "no prompt is awaiting a reply"),
            SyncError::PromptAlreadyActive => write!(f, "a prompt is already awaiting a reply"),
            SyncError::Listener { kind, source } => {
                write!(f, "registering {} listener failed: {}", kind.name(), source)
            }
            SyncError::Surface(err) => write!(f, "editor surface error: {}", err),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Listener { source, .. } => Some(source),
            SyncError::Surface(err) => Some(err),
            _ => None,
        }
    }
}
