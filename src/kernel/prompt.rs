//! Single pending text-input request raised by the editor surface.

use crate::kernel::error::{Result, SyncError};
use crate::kernel::services::ports::{Callback, PromptRequest};

pub const VARIABLE_MODAL_TITLE: &str = "New Variable";
pub const BROADCAST_MESSAGE_VARIABLE_TYPE: &str = "broadcast_msg";

#[derive(Debug)]
pub struct ActivePrompt {
    pub message: String,
    pub default_value: String,
    pub title: String,
    pub show_more_options: bool,
    callback: Callback<String>,
}

#[derive(Debug, Default)]
enum PromptState {
    #[default]
    Idle,
    Awaiting(ActivePrompt),
}

#[derive(Debug, Default)]
pub struct PromptController {
    state: PromptState,
    revision: u64,
}

impl PromptController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self.state, PromptState::Awaiting(_))
    }

    pub fn active(&self) -> Option<&ActivePrompt> {
        match &self.state {
            PromptState::Awaiting(prompt) => Some(prompt),
            PromptState::Idle => None,
        }
    }

    /// Bumped on every state transition.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn request(&mut self, request: PromptRequest) -> Result<()> {
        if self.is_awaiting() {
            return Err(SyncError::PromptAlreadyActive);
        }

        let PromptRequest {
            message,
            default_value,
            title,
            variable_type,
            callback,
        } = request;
        let show_more_options =
            variable_type.as_deref() != Some(BROADCAST_MESSAGE_VARIABLE_TYPE);
        let title = title
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| VARIABLE_MODAL_TITLE.to_string());

        self.state = PromptState::Awaiting(ActivePrompt {
            message,
            default_value,
            title,
            show_more_options,
            callback,
        });
        self.revision += 1;
        Ok(())
    }

    pub fn resolve(&mut self, value: String) -> Result<()> {
        let PromptState::Awaiting(prompt) = std::mem::take(&mut self.state) else {
            return Err(SyncError::PromptIdle);
        };
        self.revision += 1;
        prompt.callback.call(value);
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<()> {
        let PromptState::Awaiting(_) = std::mem::take(&mut self.state) else {
            return Err(SyncError::PromptIdle);
        };
        self.revision += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/prompt.rs"]
mod tests;
