//! Synchronization engine: binds one editor surface to one runtime.
//!
//! Everything runs on the caller's thread. Collaborators push events into the kernel bus;
//! `tick`/`pump` drain it in order, and each event's effects are applied end-to-end before
//! the next event is looked at.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::kernel::error::{Result, SyncError};
use crate::kernel::services::ports::{
    EditorSurface, InjectConfig, Runtime, RuntimeEventKind, Settings,
};
use crate::kernel::services::{kernel_bus, KernelBusReceiver, KernelBusSender};
use crate::kernel::{Action, BlocksProps, ContainerRequest, Store, SyncState};

mod bridge;
mod tick;

pub struct SyncEngine<R: Runtime, S: EditorSurface> {
    store: Store,
    surface: S,
    runtime: Option<R>,
    registered: Vec<RuntimeEventKind>,
    bus: KernelBusSender,
    rx: KernelBusReceiver,
    outbox: VecDeque<ContainerRequest>,
    rendered_prompt_revision: u64,
}

impl<R: Runtime, S: EditorSurface> SyncEngine<R, S> {
    /// Injects the surface with the workspace options and the container's current toolbox.
    pub fn mount(mut surface: S, settings: &Settings, props: BlocksProps) -> Self {
        let config = InjectConfig {
            options: settings.workspace.clone(),
            toolbox: Arc::clone(&props.toolbox),
        };
        surface.inject(&config);

        let (bus, rx) = kernel_bus();
        tracing::info!(debounce_ms = settings.debounce_ms, "editor surface mounted");

        Self {
            store: Store::new(SyncState::new(settings, props)),
            surface,
            runtime: None,
            registered: Vec::new(),
            bus,
            rx,
            outbox: VecDeque::new(),
            rendered_prompt_revision: 0,
        }
    }

    /// Registers one listener per runtime event kind and hooks the surface up.
    ///
    /// A second attach without a detach is a contract violation. When a registration fails
    /// the runtime is kept so that `detach` can undo the listeners that did register.
    pub fn attach(&mut self, mut runtime: R) -> Result<()> {
        if self.runtime.is_some() || self.store.state().attached {
            return Err(SyncError::AlreadyAttached);
        }

        for kind in RuntimeEventKind::ALL {
            if let Err(source) = runtime.add_listener(kind, self.bus.clone()) {
                tracing::warn!(kind = kind.name(), error = %source, "listener registration failed");
                self.runtime = Some(runtime);
                return Err(SyncError::Listener { kind, source });
            }
            self.registered.push(kind);
        }

        let editing_target = runtime.editing_target();
        let dynamic_blocks_xml = runtime.dynamic_blocks_xml();
        self.runtime = Some(runtime);
        self.dispatch_kernel(Action::Attached {
            editing_target,
            dynamic_blocks_xml,
        })?;

        tracing::info!(listeners = self.registered.len(), "runtime attached");
        Ok(())
    }

    /// Safe to call at any point, including after a failed attach.
    pub fn detach(&mut self) -> Option<R> {
        if let Err(err) = self.dispatch_kernel(Action::Detached) {
            tracing::warn!(error = %err, "detach effects failed");
        }

        let mut runtime = self.runtime.take()?;
        for kind in self.registered.drain(..) {
            runtime.remove_listener(kind);
        }

        let mut dropped = 0usize;
        while self.rx.try_recv().is_ok() {
            dropped += 1;
        }
        tracing::info!(dropped, "runtime detached");
        Some(runtime)
    }

    pub fn unmount(mut self) -> (S, Option<R>) {
        let runtime = self.detach();
        self.surface.dispose();
        (self.surface, runtime)
    }

    pub fn is_attached(&self) -> bool {
        self.store.state().attached
    }

    pub fn state(&self) -> &SyncState {
        self.store.state()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn runtime(&self) -> Option<&R> {
        self.runtime.as_ref()
    }

    pub fn runtime_mut(&mut self) -> Option<&mut R> {
        self.runtime.as_mut()
    }

    pub fn set_props(&mut self, props: BlocksProps) -> Result<bool> {
        self.dispatch_kernel(Action::SetProps(props))
    }

    /// Whether the wrapping component has to re-render for `next`.
    pub fn needs_render(&self, next: &BlocksProps) -> bool {
        let state = self.store.state();
        state.props.needs_render(next) || state.prompt.revision() != self.rendered_prompt_revision
    }

    pub fn mark_rendered(&mut self) {
        self.rendered_prompt_revision = self.store.state().prompt.revision();
    }

    pub fn confirm_prompt(&mut self, value: impl Into<String>) -> Result<()> {
        self.dispatch_kernel(Action::PromptConfirmed {
            value: value.into(),
        })
        .map(|_| ())
    }

    pub fn cancel_prompt(&mut self) -> Result<()> {
        self.dispatch_kernel(Action::PromptCancelled).map(|_| ())
    }

    pub fn close_custom_procedures(&mut self, mutation: Option<String>) -> Result<()> {
        self.dispatch_kernel(Action::CustomProceduresClosed { mutation })
            .map(|_| ())
    }

    /// A category picked in the extension library.
    pub fn select_category(&mut self, name: impl Into<String>) -> Result<()> {
        self.dispatch_kernel(Action::CategorySelected { name: name.into() })
            .map(|_| ())
    }

    pub fn translate(&mut self, x: f64, y: f64) -> Result<()> {
        self.observe_viewport(|surface| surface.translate(x, y))
    }

    pub fn zoom(&mut self, center_x: f64, center_y: f64, amount: f64) -> Result<f64> {
        self.observe_viewport(|surface| surface.zoom(center_x, center_y, amount))
    }

    pub fn take_requests(&mut self) -> Vec<ContainerRequest> {
        self.outbox.drain(..).collect()
    }
}
