//! In-memory runtime: holds listeners and records what the engine asks of it.

use rustc_hash::FxHashMap;

use crate::kernel::services::bus::{EmitContext, KernelBusSender};
use crate::kernel::services::ports::{
    BlockEdit, EditSource, Messages, PortError, Runtime, RuntimeEvent, RuntimeEventKind,
    TargetInfo,
};

#[derive(Default)]
pub struct HeadlessRuntime {
    listeners: FxHashMap<RuntimeEventKind, KernelBusSender>,
    editing_target: Option<TargetInfo>,
    dynamic_blocks_xml: String,
    locale: Option<(String, Messages)>,
    edits: Vec<(EditSource, BlockEdit)>,
    refresh_count: usize,
    reject: Option<RuntimeEventKind>,
}

impl HeadlessRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `add_listener` fail for `kind`.
    pub fn rejecting(kind: RuntimeEventKind) -> Self {
        Self {
            reject: Some(kind),
            ..Self::default()
        }
    }

    pub fn set_editing_target(&mut self, target: Option<TargetInfo>) {
        self.editing_target = target;
    }

    pub fn set_dynamic_blocks_xml(&mut self, xml: impl Into<String>) {
        self.dynamic_blocks_xml = xml.into();
    }

    /// Delivers `event` to the listener registered for its kind, stamped with the current
    /// editing target and dynamic blocks. Returns false when nobody listens.
    pub fn emit(&mut self, event: RuntimeEvent) -> bool {
        if let RuntimeEvent::TargetsUpdate {
            targets,
            editing_target: Some(editing_id),
        } = &event
        {
            if let Some(target) = targets.iter().find(|t| &t.id == editing_id) {
                self.editing_target = Some(target.clone());
            }
        }

        let Some(sink) = self.listeners.get(&event.kind()) else {
            return false;
        };
        let context = EmitContext {
            editing_target: self.editing_target.clone(),
            dynamic_blocks_xml: self.dynamic_blocks_xml.clone(),
        };
        sink.send_runtime(event, context).is_ok()
    }

    pub fn has_listener(&self, kind: RuntimeEventKind) -> bool {
        self.listeners.contains_key(&kind)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_ref().map(|(locale, _)| locale.as_str())
    }

    pub fn edits(&self) -> &[(EditSource, BlockEdit)] {
        &self.edits
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_count
    }
}

impl Runtime for HeadlessRuntime {
    fn add_listener(&mut self, kind: RuntimeEventKind, sink: KernelBusSender) -> Result<(), PortError> {
        if self.reject == Some(kind) {
            return Err(PortError::ListenerRejected(kind.name().to_string()));
        }
        self.listeners.insert(kind, sink);
        Ok(())
    }

    fn remove_listener(&mut self, kind: RuntimeEventKind) {
        self.listeners.remove(&kind);
    }

    fn editing_target(&self) -> Option<TargetInfo> {
        self.editing_target.clone()
    }

    fn dynamic_blocks_xml(&self) -> String {
        self.dynamic_blocks_xml.clone()
    }

    fn set_locale(&mut self, locale: &str, messages: &Messages) {
        self.locale = Some((locale.to_string(), messages.clone()));
    }

    fn refresh_workspace(&mut self) {
        self.refresh_count += 1;
    }

    fn apply_edit(&mut self, source: EditSource, edit: BlockEdit) {
        self.edits.push((source, edit));
    }
}
