use crate::kernel::error::Result;
use crate::kernel::services::ports::EditSource;
use crate::kernel::{Action, ContainerRequest, Effect};

impl super::Store {
    pub(super) fn reduce_surface_action(&mut self, action: Action) -> Result<super::DispatchResult> {
        match action {
            Action::ViewportChanged { metrics } => {
                let Some(target_id) = self.state.editing_target.as_ref().map(|t| t.id.clone()) else {
                    return Ok(super::DispatchResult::unchanged());
                };
                if self.state.metrics.get(&target_id) == Some(metrics) {
                    return Ok(super::DispatchResult::unchanged());
                }
                self.state.metrics = self.state.metrics.set(&target_id, metrics);
                Ok(super::DispatchResult {
                    effects: Vec::new(),
                    state_changed: true,
                })
            }
            Action::UserEdit { source, edit } => {
                let listening = match source {
                    EditSource::Workspace => self.state.workspace_listener_attached,
                    EditSource::Flyout => self.state.attached,
                };
                if !self.state.attached || !listening {
                    tracing::debug!(?source, block_id = %edit.block_id, "edit without listener, dropped");
                    return Ok(super::DispatchResult::unchanged());
                }
                Ok(super::DispatchResult {
                    effects: vec![Effect::ForwardEdit { source, edit }],
                    state_changed: false,
                })
            }
            Action::PromptRequested(request) => {
                self.state.prompt.request(request)?;
                Ok(super::DispatchResult {
                    effects: Vec::new(),
                    state_changed: true,
                })
            }
            Action::PromptConfirmed { value } => {
                self.state.prompt.resolve(value)?;
                Ok(super::DispatchResult {
                    effects: Vec::new(),
                    state_changed: true,
                })
            }
            Action::PromptCancelled => {
                self.state.prompt.cancel()?;
                Ok(super::DispatchResult {
                    effects: Vec::new(),
                    state_changed: true,
                })
            }
            Action::ProcedureDefRequested { mutation, callback } => Ok(super::DispatchResult {
                effects: vec![Effect::Request(
                    ContainerRequest::ActivateCustomProcedures { mutation, callback },
                )],
                state_changed: false,
            }),
            Action::CustomProceduresClosed { mutation } => Ok(super::DispatchResult {
                effects: vec![
                    Effect::Request(ContainerRequest::CloseCustomProcedures { mutation }),
                    Effect::RefreshToolboxSelection,
                    Effect::ScrollToCategory {
                        name: self.state.my_blocks_category.clone(),
                    },
                ],
                state_changed: false,
            }),
            Action::EyedropperRequested { callback } => Ok(super::DispatchResult {
                effects: vec![Effect::Request(ContainerRequest::ActivateColorPicker {
                    callback,
                })],
                state_changed: false,
            }),
            Action::CategorySelected { name } => Ok(super::DispatchResult {
                effects: vec![Effect::SelectCategory { name }],
                state_changed: false,
            }),
            other => {
                tracing::debug!(action = ?other, "not a surface action");
                Ok(super::DispatchResult::unchanged())
            }
        }
    }
}
