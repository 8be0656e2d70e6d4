//! Headless synchronization core (state/action/effect).

pub mod action;
pub mod debounce;
pub mod effect;
pub mod error;
pub mod metrics;
pub mod prompt;
pub mod services;
pub mod state;
pub mod store;
pub mod toolbox;

pub use action::{Action, BlocksInfoOrigin};
pub use debounce::Debounced;
pub use effect::{ContainerRequest, Effect};
pub use error::SyncError;
pub use metrics::{WorkspaceMetrics, WorkspaceMetricsStore};
pub use prompt::{ActivePrompt, PromptController};
pub use state::{BlocksProps, SyncState, TargetsSnapshot};
pub use store::{DispatchResult, Store};
pub use toolbox::{build_toolbox, position_shadow_id, ToolboxDescription};
