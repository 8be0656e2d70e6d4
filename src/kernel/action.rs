use std::time::Instant;

use crate::kernel::metrics::WorkspaceMetrics;
use crate::kernel::services::ports::{
    BlockEdit, BlockId, BlockInfo, Callback, EditSource, PromptRequest, TargetInfo,
};
use crate::kernel::state::{BlocksProps, TargetsSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlocksInfoOrigin {
    ExtensionAdded,
    InfoUpdate,
}

#[derive(Debug)]
pub enum Action {
    Attached {
        editing_target: Option<TargetInfo>,
        dynamic_blocks_xml: String,
    },
    Detached,
    ScriptGlow {
        id: BlockId,
        on: bool,
    },
    BlockGlow {
        id: BlockId,
        on: bool,
    },
    VisualReport {
        id: BlockId,
        value: String,
    },
    WorkspaceUpdate {
        xml: String,
        editing_target: Option<TargetInfo>,
        dynamic_blocks_xml: String,
    },
    TargetsUpdate {
        snapshot: TargetsSnapshot,
        now: Instant,
    },
    Tick {
        now: Instant,
    },
    BlocksInfo {
        origin: BlocksInfoOrigin,
        blocks: Vec<BlockInfo>,
        dynamic_blocks_xml: String,
    },
    ViewportChanged {
        metrics: WorkspaceMetrics,
    },
    UserEdit {
        source: EditSource,
        edit: BlockEdit,
    },
    PromptRequested(PromptRequest),
    PromptConfirmed {
        value: String,
    },
    PromptCancelled,
    ProcedureDefRequested {
        mutation: String,
        callback: Callback<Option<String>>,
    },
    CustomProceduresClosed {
        mutation: Option<String>,
    },
    EyedropperRequested {
        callback: Callback<String>,
    },
    CategorySelected {
        name: String,
    },
    SetProps(BlocksProps),
}
