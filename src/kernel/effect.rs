use std::sync::Arc;

use crate::kernel::metrics::WorkspaceMetrics;
use crate::kernel::services::ports::{BlockEdit, BlockId, Callback, EditSource, Messages};
use crate::kernel::toolbox::ToolboxDescription;

/// Outputs for the presentation container.
#[derive(Debug)]
pub enum ContainerRequest {
    ToolboxUpdated(Arc<ToolboxDescription>),
    ActivateCustomProcedures {
        mutation: String,
        callback: Callback<Option<String>>,
    },
    CloseCustomProcedures {
        mutation: Option<String>,
    },
    ActivateColorPicker {
        callback: Callback<String>,
    },
}

#[derive(Debug)]
pub enum Effect {
    SetEditListener {
        source: EditSource,
        attached: bool,
    },
    SetHooks {
        installed: bool,
    },
    LoadWorkspace {
        xml: String,
    },
    GlowStack {
        id: BlockId,
        on: bool,
    },
    GlowBlock {
        id: BlockId,
        on: bool,
    },
    ReportValue {
        id: BlockId,
        value: String,
    },
    SetViewport(WorkspaceMetrics),
    Resize,
    /// Read the surface viewport and feed it back as `Action::ViewportChanged`.
    CaptureViewport,
    DefineBlocks {
        templates: Vec<serde_json::Value>,
    },
    UpdateToolbox(Arc<ToolboxDescription>),
    SetFlyoutFieldValue {
        block_id: String,
        value: String,
    },
    SelectCategory {
        name: String,
    },
    RefreshToolboxSelection,
    ScrollToCategory {
        name: String,
    },
    SetVisible(bool),
    SetLocale {
        locale: String,
        messages: Arc<Messages>,
    },
    RefreshWorkspace,
    ForwardEdit {
        source: EditSource,
        edit: BlockEdit,
    },
    Request(ContainerRequest),
}
