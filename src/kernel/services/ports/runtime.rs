use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::PortError;
use crate::kernel::services::bus::KernelBusSender;

pub type BlockId = CompactString;
pub type Messages = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuntimeEventKind {
    ScriptGlowOn,
    ScriptGlowOff,
    BlockGlowOn,
    BlockGlowOff,
    VisualReport,
    WorkspaceUpdate,
    TargetsUpdate,
    ExtensionAdded,
    BlocksInfoUpdate,
}

impl RuntimeEventKind {
    pub const ALL: [RuntimeEventKind; 9] = [
        RuntimeEventKind::ScriptGlowOn,
        RuntimeEventKind::ScriptGlowOff,
        RuntimeEventKind::BlockGlowOn,
        RuntimeEventKind::BlockGlowOff,
        RuntimeEventKind::VisualReport,
        RuntimeEventKind::WorkspaceUpdate,
        RuntimeEventKind::TargetsUpdate,
        RuntimeEventKind::ExtensionAdded,
        RuntimeEventKind::BlocksInfoUpdate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RuntimeEventKind::ScriptGlowOn => "SCRIPT_GLOW_ON",
            RuntimeEventKind::ScriptGlowOff => "SCRIPT_GLOW_OFF",
            RuntimeEventKind::BlockGlowOn => "BLOCK_GLOW_ON",
            RuntimeEventKind::BlockGlowOff => "BLOCK_GLOW_OFF",
            RuntimeEventKind::VisualReport => "VISUAL_REPORT",
            RuntimeEventKind::WorkspaceUpdate => "workspaceUpdate",
            RuntimeEventKind::TargetsUpdate => "targetsUpdate",
            RuntimeEventKind::ExtensionAdded => "EXTENSION_ADDED",
            RuntimeEventKind::BlocksInfoUpdate => "BLOCKSINFO_UPDATE",
        }
    }
}

/// Events the runtime pushes into the kernel bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RuntimeEvent {
    ScriptGlowOn { id: BlockId },
    ScriptGlowOff { id: BlockId },
    BlockGlowOn { id: BlockId },
    BlockGlowOff { id: BlockId },
    VisualReport { id: BlockId, value: String },
    /// The editing target's program changed wholesale (target switch, project load).
    WorkspaceUpdate { xml: String },
    TargetsUpdate {
        targets: Vec<TargetInfo>,
        #[serde(default)]
        editing_target: Option<CompactString>,
    },
    ExtensionAdded { blocks: Vec<BlockInfo> },
    BlocksInfoUpdate { blocks: Vec<BlockInfo> },
}

impl RuntimeEvent {
    pub fn kind(&self) -> RuntimeEventKind {
        match self {
            RuntimeEvent::ScriptGlowOn { .. } => RuntimeEventKind::ScriptGlowOn,
            RuntimeEvent::ScriptGlowOff { .. } => RuntimeEventKind::ScriptGlowOff,
            RuntimeEvent::BlockGlowOn { .. } => RuntimeEventKind::BlockGlowOn,
            RuntimeEvent::BlockGlowOff { .. } => RuntimeEventKind::BlockGlowOff,
            RuntimeEvent::VisualReport { .. } => RuntimeEventKind::VisualReport,
            RuntimeEvent::WorkspaceUpdate { .. } => RuntimeEventKind::WorkspaceUpdate,
            RuntimeEvent::TargetsUpdate { .. } => RuntimeEventKind::TargetsUpdate,
            RuntimeEvent::ExtensionAdded { .. } => RuntimeEventKind::ExtensionAdded,
            RuntimeEvent::BlocksInfoUpdate { .. } => RuntimeEventKind::BlocksInfoUpdate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetInfo {
    pub id: CompactString,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_stage: bool,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub current_costume: usize,
}

impl TargetInfo {
    pub fn sprite(id: &str, x: f64, y: f64) -> Self {
        Self {
            id: CompactString::from(id),
            name: id.to_string(),
            is_stage: false,
            x,
            y,
            current_costume: 0,
        }
    }

    pub fn stage(id: &str) -> Self {
        Self {
            id: CompactString::from(id),
            name: "Stage".to_string(),
            is_stage: true,
            x: 0.0,
            y: 0.0,
            current_costume: 0,
        }
    }
}

/// A block template contributed by an extension, in the editor's JSON block format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub json: serde_json::Value,
}

impl BlockInfo {
    pub fn opcode(&self) -> Option<&str> {
        self.json.get("type").and_then(serde_json::Value::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditSource {
    Workspace,
    /// Palette and monitor checkbox edits.
    Flyout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockEditKind {
    Create,
    Delete,
    Move,
    Change,
    VarCreate,
    VarRename,
    VarDelete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockEdit {
    pub kind: BlockEditKind,
    pub block_id: BlockId,
    #[serde(default)]
    pub detail: serde_json::Value,
}

impl BlockEdit {
    pub fn new(kind: BlockEditKind, block_id: &str) -> Self {
        Self {
            kind,
            block_id: BlockId::from(block_id),
            detail: serde_json::Value::Null,
        }
    }
}

/// The execution engine the surface mirrors.
pub trait Runtime {
    /// Events sent to `sink` must carry the editing target and dynamic blocks of the moment
    /// they were emitted.
    fn add_listener(&mut self, kind: RuntimeEventKind, sink: KernelBusSender) -> Result<(), PortError>;
    /// Removing a listener that was never added is a no-op.
    fn remove_listener(&mut self, kind: RuntimeEventKind);

    fn editing_target(&self) -> Option<TargetInfo>;
    /// Toolbox XML for every loaded extension category.
    fn dynamic_blocks_xml(&self) -> String;

    fn set_locale(&mut self, locale: &str, messages: &Messages);
    fn refresh_workspace(&mut self);
    fn apply_edit(&mut self, source: EditSource, edit: BlockEdit);
}
