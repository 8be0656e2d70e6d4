use compact_str::CompactString;
use rustc_hash::FxHashSet;
use std::sync::Arc;
use std::time::Duration;

use super::debounce::Debounced;
use super::metrics::WorkspaceMetricsStore;
use super::prompt::PromptController;
use super::services::ports::{Messages, Settings, TargetInfo};
use super::toolbox::ToolboxDescription;

/// Inputs owned by the presentation container.
#[derive(Debug, Clone)]
pub struct BlocksProps {
    pub visible: bool,
    pub toolbox: Arc<ToolboxDescription>,
    pub extension_library_visible: bool,
    pub custom_procedures_visible: bool,
    pub locale: String,
    pub messages: Arc<Messages>,
}

impl Default for BlocksProps {
    fn default() -> Self {
        Self {
            visible: true,
            toolbox: Arc::new(ToolboxDescription::default()),
            extension_library_visible: false,
            custom_procedures_visible: false,
            locale: "en".to_string(),
            messages: Arc::new(Messages::new()),
        }
    }
}

impl BlocksProps {
    /// Whether moving from `self` to `next` changes anything the component renders.
    pub fn needs_render(&self, next: &BlocksProps) -> bool {
        self.visible != next.visible
            || !same_toolbox(&self.toolbox, &next.toolbox)
            || self.extension_library_visible != next.extension_library_visible
            || self.custom_procedures_visible != next.custom_procedures_visible
            || self.locale != next.locale
    }

    pub fn with_toolbox(&self, toolbox: Arc<ToolboxDescription>) -> Self {
        Self {
            toolbox,
            ..self.clone()
        }
    }
}

pub(crate) fn same_toolbox(a: &Arc<ToolboxDescription>, b: &Arc<ToolboxDescription>) -> bool {
    Arc::ptr_eq(a, b) || a == b
}

/// Payload of one target-set update, as captured when the runtime emitted it.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetsSnapshot {
    pub targets: Vec<TargetInfo>,
    pub editing_target: Option<CompactString>,
    pub dynamic_blocks_xml: String,
}

#[derive(Debug)]
pub struct SyncState {
    pub attached: bool,
    pub props: BlocksProps,
    pub editing_target: Option<TargetInfo>,
    pub dynamic_blocks_xml: String,
    pub published_toolbox: Option<Arc<ToolboxDescription>>,
    pub metrics: WorkspaceMetricsStore,
    pub prompt: PromptController,
    pub pending_targets: Debounced<TargetsSnapshot>,
    pub known_templates: FxHashSet<CompactString>,
    pub workspace_listener_attached: bool,
    pub my_blocks_category: String,
}

impl SyncState {
    pub fn new(settings: &Settings, props: BlocksProps) -> Self {
        Self {
            attached: false,
            props,
            editing_target: None,
            dynamic_blocks_xml: String::new(),
            published_toolbox: None,
            metrics: WorkspaceMetricsStore::new(),
            prompt: PromptController::new(),
            pending_targets: Debounced::new(Duration::from_millis(settings.debounce_ms)),
            known_templates: FxHashSet::default(),
            workspace_listener_attached: false,
            my_blocks_category: settings.my_blocks_category.clone(),
        }
    }

    pub fn editing_target_id(&self) -> Option<&str> {
        self.editing_target.as_ref().map(|t| t.id.as_str())
    }
}
