use std::sync::Arc;

use super::runtime::{BlockEdit, EditSource};
use super::settings::WorkspaceOptions;
use super::PortError;
use crate::kernel::metrics::WorkspaceMetrics;
use crate::kernel::services::bus::KernelBusSender;
use crate::kernel::toolbox::ToolboxDescription;

/// One-shot reply slot handed over by the editor library.
pub struct Callback<T>(Box<dyn FnOnce(T) + Send>);

impl<T> Callback<T> {
    pub fn new(f: impl FnOnce(T) + Send + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn call(self, value: T) {
        (self.0)(value)
    }
}

impl<T> std::fmt::Debug for Callback<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Callback")
    }
}

#[derive(Debug)]
pub struct PromptRequest {
    pub message: String,
    pub default_value: String,
    pub title: Option<String>,
    pub variable_type: Option<String>,
    pub callback: Callback<String>,
}

/// Events the surface pushes into the kernel bus.
#[derive(Debug)]
pub enum SurfaceEvent {
    Edit {
        source: EditSource,
        edit: BlockEdit,
    },
    PromptRequested(PromptRequest),
    /// "Define procedure" was invoked from inside the editor.
    ProcedureDefRequested {
        mutation: String,
        callback: Callback<Option<String>>,
    },
    EyedropperRequested {
        callback: Callback<String>,
    },
}

/// Hook slots the surface calls instead of opening its own dialogs.
#[derive(Clone, Debug)]
pub struct SurfaceHooks {
    sink: KernelBusSender,
}

impl SurfaceHooks {
    pub fn new(sink: KernelBusSender) -> Self {
        Self { sink }
    }

    pub fn prompt(
        &self,
        message: &str,
        default_value: &str,
        callback: Callback<String>,
        title: Option<&str>,
        variable_type: Option<&str>,
    ) {
        let request = PromptRequest {
            message: message.to_string(),
            default_value: default_value.to_string(),
            title: title.map(str::to_string),
            variable_type: variable_type.map(str::to_string),
            callback,
        };
        let _ = self.sink.send_surface(SurfaceEvent::PromptRequested(request));
    }

    pub fn define_procedure(&self, mutation: &str, callback: Callback<Option<String>>) {
        let _ = self.sink.send_surface(SurfaceEvent::ProcedureDefRequested {
            mutation: mutation.to_string(),
            callback,
        });
    }

    pub fn activate_eyedropper(&self, callback: Callback<String>) {
        let _ = self
            .sink
            .send_surface(SurfaceEvent::EyedropperRequested { callback });
    }
}

#[derive(Debug, Clone)]
pub struct InjectConfig {
    pub options: WorkspaceOptions,
    pub toolbox: Arc<ToolboxDescription>,
}

/// The live block-editing surface.
///
/// Patch methods return `false` when the id is not present; callers treat that as a no-op.
pub trait EditorSurface {
    fn inject(&mut self, config: &InjectConfig);
    fn dispose(&mut self);

    fn set_change_listener(&mut self, source: EditSource, sink: Option<KernelBusSender>);
    fn set_hooks(&mut self, hooks: Option<SurfaceHooks>);

    /// Clears the workspace and rebuilds it from a serialized program.
    fn load_from_tree(&mut self, xml: &str) -> Result<(), PortError>;

    fn glow_stack(&mut self, id: &str, on: bool) -> bool;
    fn glow_block(&mut self, id: &str, on: bool) -> bool;
    fn report_value(&mut self, id: &str, value: &str) -> bool;
    fn set_flyout_field_value(&mut self, block_id: &str, value: &str) -> bool;

    fn set_toolbox(&mut self, toolbox: &ToolboxDescription);
    fn selected_category(&self) -> Option<String>;
    fn select_category(&mut self, name: &str);
    fn scroll_to_category(&mut self, name: &str);
    fn refresh_toolbox_selection(&mut self);
    fn define_blocks(&mut self, templates: &[serde_json::Value]);

    fn viewport(&self) -> WorkspaceMetrics;
    fn set_viewport(&mut self, metrics: WorkspaceMetrics);
    fn resize(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    /// Returns the resulting scale.
    fn zoom(&mut self, center_x: f64, center_y: f64, amount: f64) -> f64;
    fn set_visible(&mut self, visible: bool);
}
