//! In-memory editor surface.
//!
//! Tracks which block ids exist after a load, what glows, what was reported and which
//! toolbox category is selected, and keeps an operation log for inspection.

use compact_str::CompactString;
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use std::sync::OnceLock;

use crate::kernel::metrics::WorkspaceMetrics;
use crate::kernel::services::bus::KernelBusSender;
use crate::kernel::services::ports::{
    BlockEdit, BlockEditKind, EditSource, EditorSurface, InjectConfig, PortError, SurfaceEvent,
    SurfaceHooks, WorkspaceOptions,
};
use crate::kernel::toolbox::ToolboxDescription;

const MIN_SCALE: f64 = 0.3;
const MAX_SCALE: f64 = 3.0;
const SCALE_SPEED: f64 = 1.2;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SurfaceOp {
    Inject,
    Dispose,
    SetListener { source: EditSource, attached: bool },
    SetHooks { installed: bool },
    Load { blocks: usize },
    GlowStack { id: String, on: bool, applied: bool },
    GlowBlock { id: String, on: bool, applied: bool },
    Report { id: String, value: String, applied: bool },
    SetFlyoutField { id: String, value: String, applied: bool },
    SetToolbox { categories: usize },
    SelectCategory { name: String },
    ScrollToCategory { name: String },
    RefreshToolboxSelection,
    DefineBlocks { opcodes: Vec<String> },
    SetViewport { metrics: WorkspaceMetrics },
    Resize,
    Translate { x: f64, y: f64 },
    Zoom { scale: f64 },
    SetVisible { visible: bool },
}

#[derive(Default)]
pub struct HeadlessSurface {
    options: Option<WorkspaceOptions>,
    disposed: bool,
    blocks: FxHashSet<CompactString>,
    glowing_stacks: FxHashSet<CompactString>,
    glowing_blocks: FxHashSet<CompactString>,
    reports: FxHashMap<CompactString, String>,
    toolbox: Option<ToolboxDescription>,
    flyout_fields: FxHashMap<String, String>,
    selected_category: Option<String>,
    viewport: WorkspaceMetrics,
    visible: bool,
    listeners: FxHashMap<EditSource, KernelBusSender>,
    hooks: Option<SurfaceHooks>,
    defined: FxHashMap<String, serde_json::Value>,
    ops: Vec<SurfaceOp>,
}

fn block_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<(?:block|shadow)\b[^>]*?\bid="([^"]+)""#).expect("block id pattern")
    })
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_injected(&self) -> bool {
        self.options.is_some() && !self.disposed
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn options(&self) -> Option<&WorkspaceOptions> {
        self.options.as_ref()
    }

    pub fn has_block(&self, id: &str) -> bool {
        self.blocks.contains(id)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_stack_glowing(&self, id: &str) -> bool {
        self.glowing_stacks.contains(id)
    }

    pub fn is_block_glowing(&self, id: &str) -> bool {
        self.glowing_blocks.contains(id)
    }

    pub fn reported_value(&self, id: &str) -> Option<&str> {
        self.reports.get(id).map(String::as_str)
    }

    pub fn flyout_field(&self, id: &str) -> Option<&str> {
        self.flyout_fields.get(id).map(String::as_str)
    }

    pub fn toolbox(&self) -> Option<&ToolboxDescription> {
        self.toolbox.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_listening(&self, source: EditSource) -> bool {
        self.listeners.contains_key(&source)
    }

    pub fn hooks(&self) -> Option<&SurfaceHooks> {
        self.hooks.as_ref()
    }

    pub fn defined_block(&self, opcode: &str) -> Option<&serde_json::Value> {
        self.defined.get(opcode)
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    /// Simulates the user editing the workspace or the flyout.
    pub fn user_edit(&mut self, source: EditSource, edit: BlockEdit) -> bool {
        if source == EditSource::Workspace {
            match edit.kind {
                BlockEditKind::Create => {
                    self.blocks.insert(edit.block_id.clone());
                }
                BlockEditKind::Delete => {
                    self.blocks.remove(&edit.block_id);
                }
                _ => {}
            }
        }
        self.notify_edit(source, edit)
    }

    fn notify_edit(&self, source: EditSource, edit: BlockEdit) -> bool {
        let Some(sink) = self.listeners.get(&source) else {
            return false;
        };
        sink.send_surface(SurfaceEvent::Edit { source, edit }).is_ok()
    }
}

impl EditorSurface for HeadlessSurface {
    fn inject(&mut self, config: &InjectConfig) {
        self.viewport = WorkspaceMetrics {
            scroll_x: 0.0,
            scroll_y: 0.0,
            scale: config.options.zoom.start_scale,
        };
        self.options = Some(config.options.clone());
        self.disposed = false;
        self.visible = true;
        self.ops.push(SurfaceOp::Inject);
        self.set_toolbox(&config.toolbox);
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.listeners.clear();
        self.hooks = None;
        self.ops.push(SurfaceOp::Dispose);
    }

    fn set_change_listener(&mut self, source: EditSource, sink: Option<KernelBusSender>) {
        let attached = sink.is_some();
        match sink {
            Some(sink) => {
                self.listeners.insert(source, sink);
            }
            None => {
                self.listeners.remove(&source);
            }
        }
        self.ops.push(SurfaceOp::SetListener { source, attached });
    }

    fn set_hooks(&mut self, hooks: Option<SurfaceHooks>) {
        let installed = hooks.is_some();
        self.hooks = hooks;
        self.ops.push(SurfaceOp::SetHooks { installed });
    }

    fn load_from_tree(&mut self, xml: &str) -> Result<(), PortError> {
        if !xml.trim_start().starts_with("<xml") {
            return Err(PortError::InvalidTree("missing <xml> root".to_string()));
        }

        self.blocks.clear();
        self.glowing_stacks.clear();
        self.glowing_blocks.clear();
        self.reports.clear();

        let ids: Vec<CompactString> = block_id_pattern()
            .captures_iter(xml)
            .filter_map(|caps| caps.get(1))
            .map(|m| CompactString::from(m.as_str()))
            .collect();

        // Creating blocks fires create events, exactly like an interactive edit would.
        for id in &ids {
            self.blocks.insert(id.clone());
            self.notify_edit(
                EditSource::Workspace,
                BlockEdit::new(BlockEditKind::Create, id),
            );
        }

        self.ops.push(SurfaceOp::Load {
            blocks: self.blocks.len(),
        });
        Ok(())
    }

    fn glow_stack(&mut self, id: &str, on: bool) -> bool {
        let applied = self.blocks.contains(id);
        if applied {
            if on {
                self.glowing_stacks.insert(CompactString::from(id));
            } else {
                self.glowing_stacks.remove(id);
            }
        }
        self.ops.push(SurfaceOp::GlowStack {
            id: id.to_string(),
            on,
            applied,
        });
        applied
    }

    fn glow_block(&mut self, id: &str, on: bool) -> bool {
        let applied = self.blocks.contains(id);
        if applied {
            if on {
                self.glowing_blocks.insert(CompactString::from(id));
            } else {
                self.glowing_blocks.remove(id);
            }
        }
        self.ops.push(SurfaceOp::GlowBlock {
            id: id.to_string(),
            on,
            applied,
        });
        applied
    }

    fn report_value(&mut self, id: &str, value: &str) -> bool {
        let applied = self.blocks.contains(id);
        if applied {
            self.reports
                .insert(CompactString::from(id), value.to_string());
        }
        self.ops.push(SurfaceOp::Report {
            id: id.to_string(),
            value: value.to_string(),
            applied,
        });
        applied
    }

    fn set_flyout_field_value(&mut self, block_id: &str, value: &str) -> bool {
        let applied = match self.flyout_fields.get_mut(block_id) {
            Some(slot) => {
                *slot = value.to_string();
                true
            }
            None => false,
        };
        self.ops.push(SurfaceOp::SetFlyoutField {
            id: block_id.to_string(),
            value: value.to_string(),
            applied,
        });
        applied
    }

    fn set_toolbox(&mut self, toolbox: &ToolboxDescription) {
        self.flyout_fields = toolbox
            .shadow_defaults()
            .into_iter()
            .map(|(id, value)| (id.to_string(), value.to_string()))
            .collect();
        // A fresh toolbox starts on its first category.
        self.selected_category = toolbox.category_names().next().map(str::to_string);
        self.toolbox = Some(toolbox.clone());
        self.ops.push(SurfaceOp::SetToolbox {
            categories: toolbox.categories.len(),
        });
    }

    fn selected_category(&self) -> Option<String> {
        self.selected_category.clone()
    }

    fn select_category(&mut self, name: &str) {
        let known = self
            .toolbox
            .as_ref()
            .is_some_and(|toolbox| toolbox.category(name).is_some());
        if known {
            self.selected_category = Some(name.to_string());
        }
        self.ops.push(SurfaceOp::SelectCategory {
            name: name.to_string(),
        });
    }

    fn scroll_to_category(&mut self, name: &str) {
        let known = self
            .toolbox
            .as_ref()
            .is_some_and(|toolbox| toolbox.category(name).is_some());
        if known {
            self.selected_category = Some(name.to_string());
        }
        self.ops.push(SurfaceOp::ScrollToCategory {
            name: name.to_string(),
        });
    }

    fn refresh_toolbox_selection(&mut self) {
        self.ops.push(SurfaceOp::RefreshToolboxSelection);
    }

    fn define_blocks(&mut self, templates: &[serde_json::Value]) {
        let mut opcodes = Vec::with_capacity(templates.len());
        for template in templates {
            let Some(opcode) = template.get("type").and_then(serde_json::Value::as_str) else {
                continue;
            };
            opcodes.push(opcode.to_string());
            self.defined.insert(opcode.to_string(), template.clone());
        }
        self.ops.push(SurfaceOp::DefineBlocks { opcodes });
    }

    fn viewport(&self) -> WorkspaceMetrics {
        self.viewport
    }

    fn set_viewport(&mut self, metrics: WorkspaceMetrics) {
        self.viewport = metrics;
        self.ops.push(SurfaceOp::SetViewport { metrics });
    }

    fn resize(&mut self) {
        self.ops.push(SurfaceOp::Resize);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.viewport.scroll_x = x;
        self.viewport.scroll_y = y;
        self.ops.push(SurfaceOp::Translate { x, y });
    }

    fn zoom(&mut self, center_x: f64, center_y: f64, amount: f64) -> f64 {
        let old = self.viewport.scale;
        let scale = (old * SCALE_SPEED.powf(amount)).clamp(MIN_SCALE, MAX_SCALE);
        let ratio = scale / old;
        self.viewport.scroll_x = center_x - (center_x - self.viewport.scroll_x) * ratio;
        self.viewport.scroll_y = center_y - (center_y - self.viewport.scroll_y) * ratio;
        self.viewport.scale = scale;
        self.ops.push(SurfaceOp::Zoom { scale });
        scale
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.ops.push(SurfaceOp::SetVisible { visible });
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/headless_surface.rs"]
mod tests;
