//! The only place that talks to both the runtime and the surface.

use std::time::Instant;

use super::SyncEngine;
use crate::kernel::error::{Result, SyncError};
use crate::kernel::services::ports::{
    EditorSurface, Runtime, RuntimeEvent, SurfaceEvent, SurfaceHooks,
};
use crate::kernel::services::{EmitContext, KernelMessage};
use crate::kernel::{Action, BlocksInfoOrigin, Effect, TargetsSnapshot};

impl<R: Runtime, S: EditorSurface> SyncEngine<R, S> {
    /// Reduces `action` and applies every resulting effect before returning.
    ///
    /// A failing effect does not stop the ones after it; the first failure is returned.
    pub(super) fn dispatch_kernel(&mut self, action: Action) -> Result<bool> {
        let result = self.store.dispatch(action)?;

        let mut first_error = None;
        for effect in result.effects {
            if let Err(err) = self.run_effect(effect) {
                tracing::error!(error = %err, "effect failed");
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(result.state_changed),
        }
    }

    /// Handles `event` as if the runtime emitted it right now.
    pub fn handle_runtime_event(&mut self, event: RuntimeEvent, now: Instant) -> Result<bool> {
        let context = self.current_context();
        self.dispatch_kernel(runtime_action(event, context, now))
    }

    pub(super) fn handle_message(&mut self, msg: KernelMessage, now: Instant) -> Result<bool> {
        match msg {
            KernelMessage::Runtime { event, context } => {
                self.dispatch_kernel(runtime_action(event, context, now))
            }
            KernelMessage::Surface(event) => self.dispatch_kernel(surface_action(event)),
        }
    }

    /// Runs a surface entry point, then records the viewport it left behind.
    /// The entry point's own result is handed back untouched.
    pub(super) fn observe_viewport<T>(&mut self, call: impl FnOnce(&mut S) -> T) -> Result<T> {
        let result = call(&mut self.surface);
        let metrics = self.surface.viewport();
        self.dispatch_kernel(Action::ViewportChanged { metrics })?;
        Ok(result)
    }

    fn current_context(&self) -> EmitContext {
        match self.runtime.as_ref() {
            Some(rt) => EmitContext {
                editing_target: rt.editing_target(),
                dynamic_blocks_xml: rt.dynamic_blocks_xml(),
            },
            None => EmitContext::default(),
        }
    }

    fn run_effect(&mut self, effect: Effect) -> Result<()> {
        match effect {
            Effect::SetEditListener { source, attached } => {
                let sink = attached.then(|| self.bus.clone());
                self.surface.set_change_listener(source, sink);
            }
            Effect::SetHooks { installed } => {
                let hooks = installed.then(|| SurfaceHooks::new(self.bus.clone()));
                self.surface.set_hooks(hooks);
            }
            Effect::LoadWorkspace { xml } => {
                self.surface
                    .load_from_tree(&xml)
                    .map_err(SyncError::Surface)?;
            }
            Effect::GlowStack { id, on } => {
                if !self.surface.glow_stack(&id, on) {
                    tracing::debug!(%id, on, "script glow for unknown id ignored");
                }
            }
            Effect::GlowBlock { id, on } => {
                if !self.surface.glow_block(&id, on) {
                    tracing::debug!(%id, on, "block glow for unknown id ignored");
                }
            }
            Effect::ReportValue { id, value } => {
                if !self.surface.report_value(&id, &value) {
                    tracing::debug!(%id, "value report for unknown id ignored");
                }
            }
            Effect::SetViewport(metrics) => self.surface.set_viewport(metrics),
            Effect::Resize => self.surface.resize(),
            Effect::CaptureViewport => {
                let metrics = self.surface.viewport();
                self.dispatch_kernel(Action::ViewportChanged { metrics })?;
            }
            Effect::DefineBlocks { templates } => self.surface.define_blocks(&templates),
            Effect::UpdateToolbox(toolbox) => {
                let selected = self.surface.selected_category();
                self.surface.set_toolbox(&toolbox);
                if let Some(name) = selected {
                    self.surface.select_category(&name);
                }
            }
            Effect::SetFlyoutFieldValue { block_id, value } => {
                if !self.surface.set_flyout_field_value(&block_id, &value) {
                    tracing::debug!(%block_id, "flyout field not in toolbox");
                }
            }
            Effect::SelectCategory { name } => self.surface.select_category(&name),
            Effect::RefreshToolboxSelection => self.surface.refresh_toolbox_selection(),
            Effect::ScrollToCategory { name } => self.surface.scroll_to_category(&name),
            Effect::SetVisible(visible) => self.surface.set_visible(visible),
            Effect::SetLocale { locale, messages } => {
                if let Some(runtime) = self.runtime.as_mut() {
                    runtime.set_locale(&locale, &messages);
                }
            }
            Effect::RefreshWorkspace => {
                if let Some(runtime) = self.runtime.as_mut() {
                    runtime.refresh_workspace();
                }
            }
            Effect::ForwardEdit { source, edit } => match self.runtime.as_mut() {
                Some(runtime) => runtime.apply_edit(source, edit),
                None => return Err(SyncError::NotAttached),
            },
            Effect::Request(request) => self.outbox.push_back(request),
        }
        Ok(())
    }
}

/// Queued events are translated against their emission context, so a target switch that
/// happened after an event was queued does not leak into it.
fn runtime_action(event: RuntimeEvent, context: EmitContext, now: Instant) -> Action {
    let EmitContext {
        editing_target,
        dynamic_blocks_xml,
    } = context;
    match event {
        RuntimeEvent::ScriptGlowOn { id } => Action::ScriptGlow { id, on: true },
        RuntimeEvent::ScriptGlowOff { id } => Action::ScriptGlow { id, on: false },
        RuntimeEvent::BlockGlowOn { id } => Action::BlockGlow { id, on: true },
        RuntimeEvent::BlockGlowOff { id } => Action::BlockGlow { id, on: false },
        RuntimeEvent::VisualReport { id, value } => Action::VisualReport { id, value },
        RuntimeEvent::WorkspaceUpdate { xml } => Action::WorkspaceUpdate {
            xml,
            editing_target,
            dynamic_blocks_xml,
        },
        RuntimeEvent::TargetsUpdate {
            targets,
            editing_target,
        } => Action::TargetsUpdate {
            snapshot: TargetsSnapshot {
                targets,
                editing_target,
                dynamic_blocks_xml,
            },
            now,
        },
        RuntimeEvent::ExtensionAdded { blocks } => Action::BlocksInfo {
            origin: BlocksInfoOrigin::ExtensionAdded,
            blocks,
            dynamic_blocks_xml,
        },
        RuntimeEvent::BlocksInfoUpdate { blocks } => Action::BlocksInfo {
            origin: BlocksInfoOrigin::InfoUpdate,
            blocks,
            dynamic_blocks_xml,
        },
    }
}

fn surface_action(event: SurfaceEvent) -> Action {
    match event {
        SurfaceEvent::Edit { source, edit } => Action::UserEdit { source, edit },
        SurfaceEvent::PromptRequested(request) => Action::PromptRequested(request),
        SurfaceEvent::ProcedureDefRequested { mutation, callback } => {
            Action::ProcedureDefRequested { mutation, callback }
        }
        SurfaceEvent::EyedropperRequested { callback } => {
            Action::EyedropperRequested { callback }
        }
    }
}
