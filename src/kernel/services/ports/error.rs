#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortError {
    ListenerRejected(String),
    InvalidTree(String),
    Disconnected,
}

impl std::fmt::Display for PortError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortError::ListenerRejected(reason) => write!(f, "listener rejected: {}", reason),
            PortError::InvalidTree(reason) => write!(f, "invalid program tree: {}", reason),
            PortError::Disconnected => write!(f, "collaborator disconnected"),
        }
    }
}

impl std::error::Error for PortError {}
