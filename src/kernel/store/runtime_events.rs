use compact_str::CompactString;

use crate::kernel::services::ports::{EditSource, TargetInfo};
use crate::kernel::state::TargetsSnapshot;
use crate::kernel::toolbox::position_shadow_id;
use crate::kernel::{Action, Effect};

const POSITION_PREFIXES: [&str; 3] = ["glide", "move", "set"];

impl super::Store {
    pub(super) fn reduce_runtime_action(&mut self, action: Action) -> super::DispatchResult {
        if !self.state.attached {
            tracing::debug!(?action, "runtime action while detached, dropped");
            return super::DispatchResult::unchanged();
        }

        match action {
            Action::ScriptGlow { id, on } => super::DispatchResult {
                effects: vec![Effect::GlowStack { id, on }],
                state_changed: false,
            },
            Action::BlockGlow { id, on } => super::DispatchResult {
                effects: vec![Effect::GlowBlock { id, on }],
                state_changed: false,
            },
            Action::VisualReport { id, value } => super::DispatchResult {
                effects: vec![Effect::ReportValue { id, value }],
                state_changed: false,
            },
            Action::WorkspaceUpdate {
                xml,
                editing_target,
                dynamic_blocks_xml,
            } => {
                self.state.editing_target = editing_target;
                self.state.dynamic_blocks_xml = dynamic_blocks_xml;

                let mut effects = Vec::new();
                self.publish_toolbox(&mut effects);

                // The reload must not echo back into the runtime as user edits.
                effects.push(Effect::SetEditListener {
                    source: EditSource::Workspace,
                    attached: false,
                });
                effects.push(Effect::LoadWorkspace { xml });
                effects.push(Effect::SetEditListener {
                    source: EditSource::Workspace,
                    attached: true,
                });

                if let Some(target_id) = self.state.editing_target_id() {
                    match self.state.metrics.get(target_id) {
                        Some(metrics) => {
                            effects.push(Effect::SetViewport(metrics));
                            effects.push(Effect::Resize);
                        }
                        None => effects.push(Effect::CaptureViewport),
                    }
                }

                super::DispatchResult {
                    effects,
                    state_changed: true,
                }
            }
            Action::TargetsUpdate { snapshot, now } => {
                self.state.pending_targets.schedule(snapshot, now);
                super::DispatchResult::unchanged()
            }
            Action::Tick { now } => match self.state.pending_targets.poll(now) {
                Some(snapshot) => self.settle_targets(snapshot),
                None => super::DispatchResult::unchanged(),
            },
            Action::BlocksInfo {
                origin,
                blocks,
                dynamic_blocks_xml,
            } => {
                let mut templates = Vec::with_capacity(blocks.len());
                for info in blocks {
                    match info.opcode() {
                        Some(opcode) => {
                            if !self
                                .state
                                .known_templates
                                .insert(CompactString::from(opcode))
                            {
                                tracing::warn!(opcode, ?origin, "redefining block template");
                            }
                        }
                        None => tracing::warn!(?origin, "block template without a type"),
                    }
                    templates.push(info.json);
                }

                let mut effects = vec![Effect::DefineBlocks { templates }];
                self.state.dynamic_blocks_xml = dynamic_blocks_xml;
                self.publish_toolbox(&mut effects);

                super::DispatchResult {
                    effects,
                    state_changed: true,
                }
            }
            other => {
                tracing::debug!(action = ?other, "not a runtime action");
                super::DispatchResult::unchanged()
            }
        }
    }

    /// Applies the last targets update of a debounce window.
    fn settle_targets(&mut self, snapshot: TargetsSnapshot) -> super::DispatchResult {
        let TargetsSnapshot {
            targets,
            editing_target,
            dynamic_blocks_xml,
        } = snapshot;

        let editing_id = self
            .state
            .editing_target
            .as_ref()
            .map(|t| t.id.clone())
            .or(editing_target);
        let Some(editing_id) = editing_id else {
            return super::DispatchResult::unchanged();
        };
        let Some(target) = targets.into_iter().find(|t| t.id == editing_id) else {
            tracing::debug!(target_id = %editing_id, "editing target missing from targets update, dropped");
            return super::DispatchResult::unchanged();
        };

        let mut effects = Vec::new();
        self.state.editing_target = Some(target.clone());
        if dynamic_blocks_xml != self.state.dynamic_blocks_xml {
            self.state.dynamic_blocks_xml = dynamic_blocks_xml;
            self.publish_toolbox(&mut effects);
        }

        if !target.is_stage {
            push_position_fields(&mut effects, &target);
        }

        super::DispatchResult {
            effects,
            state_changed: true,
        }
    }
}

fn push_position_fields(effects: &mut Vec<Effect>, target: &TargetInfo) {
    let x = js_round(target.x);
    let y = js_round(target.y);
    for prefix in POSITION_PREFIXES {
        effects.push(Effect::SetFlyoutFieldValue {
            block_id: position_shadow_id(&target.id, &format!("{prefix}x")),
            value: x.clone(),
        });
        effects.push(Effect::SetFlyoutFieldValue {
            block_id: position_shadow_id(&target.id, &format!("{prefix}y")),
            value: y.clone(),
        });
    }
}

/// Half-up rounding, so -0.5 becomes 0 rather than -1.
fn js_round(value: f64) -> String {
    ((value + 0.5).floor() as i64).to_string()
}
