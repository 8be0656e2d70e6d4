//! Service ports: collaborator traits + data contracts.

pub mod error;
pub mod runtime;
pub mod settings;
pub mod surface;

pub use error::PortError;
pub use runtime::{
    BlockEdit, BlockEditKind, BlockId, BlockInfo, EditSource, Messages, Runtime, RuntimeEvent,
    RuntimeEventKind, TargetInfo,
};
pub use settings::{
    ColourOptions, GridOptions, Settings, WorkspaceOptions, ZoomOptions,
};
pub use surface::{Callback, EditorSurface, InjectConfig, PromptRequest, SurfaceEvent, SurfaceHooks};
