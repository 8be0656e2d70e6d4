use std::sync::Arc;

use super::error::{Result, SyncError};
use super::services::ports::EditSource;
use super::toolbox::build_toolbox;
use super::{Action, ContainerRequest, Effect, SyncState};

mod props;
mod runtime_events;
mod surface_events;

pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

impl DispatchResult {
    fn unchanged() -> Self {
        Self {
            effects: Vec::new(),
            state_changed: false,
        }
    }
}

pub struct Store {
    state: SyncState,
}

impl Store {
    pub fn new(state: SyncState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> Result<DispatchResult> {
        match action {
            Action::Attached {
                editing_target,
                dynamic_blocks_xml,
            } => {
                if self.state.attached {
                    return Err(SyncError::AlreadyAttached);
                }

                self.state.attached = true;
                self.state.workspace_listener_attached = true;
                self.state.editing_target = editing_target;
                self.state.dynamic_blocks_xml = dynamic_blocks_xml;

                Ok(DispatchResult {
                    effects: vec![
                        Effect::SetEditListener {
                            source: EditSource::Workspace,
                            attached: true,
                        },
                        Effect::SetEditListener {
                            source: EditSource::Flyout,
                            attached: true,
                        },
                        Effect::SetHooks { installed: true },
                        Effect::SetLocale {
                            locale: self.state.props.locale.clone(),
                            messages: Arc::clone(&self.state.props.messages),
                        },
                    ],
                    state_changed: true,
                })
            }
            Action::Detached => {
                if !self.state.attached {
                    return Ok(DispatchResult::unchanged());
                }

                if self.state.pending_targets.cancel() {
                    tracing::debug!("pending targets update dropped on detach");
                }
                self.state.attached = false;
                self.state.workspace_listener_attached = false;

                Ok(DispatchResult {
                    effects: vec![
                        Effect::SetEditListener {
                            source: EditSource::Workspace,
                            attached: false,
                        },
                        Effect::SetEditListener {
                            source: EditSource::Flyout,
                            attached: false,
                        },
                        Effect::SetHooks { installed: false },
                    ],
                    state_changed: true,
                })
            }
            Action::SetProps(props) => Ok(self.reduce_props(props)),
            action @ (Action::ScriptGlow { .. }
            | Action::BlockGlow { .. }
            | Action::VisualReport { .. }
            | Action::WorkspaceUpdate { .. }
            | Action::TargetsUpdate { .. }
            | Action::Tick { .. }
            | Action::BlocksInfo { .. }) => Ok(self.reduce_runtime_action(action)),
            action => self.reduce_surface_action(action),
        }
    }

    /// Rebuilds the toolbox for the editing target and publishes it when it differs from the last one.
    fn publish_toolbox(&mut self, effects: &mut Vec<Effect>) -> bool {
        let Some(target) = self.state.editing_target.as_ref() else {
            return false;
        };

        let next = build_toolbox(target.is_stage, &target.id, &self.state.dynamic_blocks_xml);
        if self.state.published_toolbox.as_deref() == Some(&next) {
            tracing::debug!(target_id = %target.id, "toolbox unchanged, publish skipped");
            return false;
        }

        let next = Arc::new(next);
        self.state.published_toolbox = Some(Arc::clone(&next));
        effects.push(Effect::Request(ContainerRequest::ToolboxUpdated(next)));
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
