use std::sync::Arc;

use crate::kernel::state::{same_toolbox, BlocksProps};
use crate::kernel::Effect;

impl super::Store {
    pub(super) fn reduce_props(&mut self, next: BlocksProps) -> super::DispatchResult {
        let prev = std::mem::replace(&mut self.state.props, next);
        let next = &self.state.props;
        let mut effects = Vec::new();

        if prev.locale != next.locale && self.state.attached {
            effects.push(Effect::SetLocale {
                locale: next.locale.clone(),
                messages: Arc::clone(&next.messages),
            });
        }

        if !same_toolbox(&prev.toolbox, &next.toolbox) {
            effects.push(Effect::UpdateToolbox(Arc::clone(&next.toolbox)));
        }

        if prev.visible != next.visible {
            if next.visible {
                // Resizes that happened while hidden were missed.
                effects.push(Effect::SetVisible(true));
                effects.push(Effect::RefreshWorkspace);
                effects.push(Effect::Resize);
            } else {
                effects.push(Effect::SetVisible(false));
            }
        }

        super::DispatchResult {
            effects,
            state_changed: prev.needs_render(next),
        }
    }
}
