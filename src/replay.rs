//! Scripted replay of runtime and user activity against the headless adapters.
//!
//! A script is a JSON document: the starting editing target, container props and a list of
//! steps. Time only moves on `advance` steps, so debounce behaviour is reproducible.

use serde::{Deserialize, Serialize};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app::SyncEngine;
use crate::kernel::error::{Result, SyncError};
use crate::kernel::services::adapters::{HeadlessRuntime, HeadlessSurface, SurfaceOp};
use crate::kernel::services::ports::{
    BlockEdit, Callback, EditSource, Messages, RuntimeEvent, Settings, TargetInfo,
};
use crate::kernel::{build_toolbox, BlocksProps, ContainerRequest, ToolboxDescription};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReplayScript {
    pub editing_target: Option<TargetInfo>,
    pub dynamic_blocks_xml: String,
    pub locale: Option<String>,
    pub messages: Messages,
    pub steps: Vec<ReplayStep>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ReplayStep {
    Runtime(RuntimeEvent),
    Advance {
        ms: u64,
    },
    Translate {
        x: f64,
        y: f64,
    },
    Zoom {
        x: f64,
        y: f64,
        amount: f64,
    },
    Edit {
        source: EditSource,
        edit: BlockEdit,
    },
    Prompt {
        message: String,
        #[serde(default)]
        default_value: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        variable_type: Option<String>,
    },
    ConfirmPrompt {
        value: String,
    },
    CancelPrompt,
    DefineProcedure {
        mutation: String,
    },
    CloseCustomProcedures {
        #[serde(default)]
        mutation: Option<String>,
    },
    Eyedropper,
    SelectCategory {
        name: String,
    },
    SetEditingTarget {
        target: Option<TargetInfo>,
    },
    SetDynamicBlocks {
        xml: String,
    },
    SetLocale {
        locale: String,
    },
    SetVisible {
        visible: bool,
    },
    Detach,
    Attach,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum RequestRecord {
    ToolboxUpdated { categories: Vec<String> },
    ActivateCustomProcedures { mutation: String },
    CloseCustomProcedures { mutation: Option<String> },
    ActivateColorPicker,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayReport {
    pub ops: Vec<SurfaceOp>,
    pub requests: Vec<RequestRecord>,
    pub prompt_replies: Vec<String>,
    pub forwarded_edits: Vec<(EditSource, BlockEdit)>,
    /// The palette the surface showed when the run ended.
    pub toolbox_xml: Option<String>,
    /// Step failures by step index.
    pub errors: Vec<(usize, String)>,
}

type ReplayEngine = SyncEngine<HeadlessRuntime, HeadlessSurface>;

struct Replay {
    engine: ReplayEngine,
    parked: Option<HeadlessRuntime>,
    now: Instant,
    replies: mpsc::Sender<String>,
    report: ReplayReport,
}

/// Runs `script` to completion. Step failures are recorded in the report and the run goes on;
/// only failing to attach the runtime or to apply a published toolbox ends it early.
pub fn run(script: &ReplayScript, settings: &Settings) -> Result<ReplayReport> {
    let mut props = BlocksProps {
        messages: Arc::new(script.messages.clone()),
        ..BlocksProps::default()
    };
    if let Some(locale) = &script.locale {
        props.locale = locale.clone();
    }
    if let Some(target) = &script.editing_target {
        props.toolbox = Arc::new(build_toolbox(
            target.is_stage,
            &target.id,
            &script.dynamic_blocks_xml,
        ));
    }

    let mut runtime = HeadlessRuntime::new();
    runtime.set_editing_target(script.editing_target.clone());
    runtime.set_dynamic_blocks_xml(script.dynamic_blocks_xml.clone());

    let (replies, replies_rx) = mpsc::channel();
    let mut replay = Replay {
        engine: SyncEngine::mount(HeadlessSurface::new(), settings, props),
        parked: None,
        now: Instant::now(),
        replies,
        report: ReplayReport::default(),
    };
    replay.engine.attach(runtime)?;

    for (index, step) in script.steps.iter().enumerate() {
        tracing::debug!(index, ?step, "replay step");
        let outcome = replay
            .step(step)
            .and_then(|_| replay.engine.tick(replay.now).map(|_| ()));
        if let Err(err) = outcome {
            tracing::warn!(
                index,
                error = %err,
                contract = err.is_contract_violation(),
                "replay step failed"
            );
            replay.report.errors.push((index, err.to_string()));
        }
        replay.drain_requests()?;
    }

    if let Some(deadline) = replay.engine.next_deadline() {
        replay.now = replay.now.max(deadline);
        replay.engine.tick(replay.now)?;
        replay.drain_requests()?;
    }

    let Replay {
        engine,
        parked,
        mut report,
        ..
    } = replay;
    report.toolbox_xml = engine.surface().toolbox().map(ToolboxDescription::to_xml);
    let (mut surface, runtime) = engine.unmount();
    if let Some(runtime) = runtime.or(parked) {
        report.forwarded_edits = runtime.edits().to_vec();
    }
    report.ops = surface.take_ops();
    report.prompt_replies = replies_rx.try_iter().collect();

    tracing::info!(
        ops = report.ops.len(),
        requests = report.requests.len(),
        errors = report.errors.len(),
        "replay finished"
    );
    Ok(report)
}

impl Replay {
    fn step(&mut self, step: &ReplayStep) -> Result<()> {
        match step {
            ReplayStep::Runtime(event) => {
                let runtime = self.runtime_mut().ok_or(SyncError::NotAttached)?;
                if !runtime.emit(event.clone()) {
                    tracing::debug!(kind = event.kind().name(), "runtime event without listener");
                }
            }
            ReplayStep::Advance { ms } => {
                self.now += Duration::from_millis(*ms);
            }
            ReplayStep::Translate { x, y } => self.engine.translate(*x, *y)?,
            ReplayStep::Zoom { x, y, amount } => {
                let scale = self.engine.zoom(*x, *y, *amount)?;
                tracing::debug!(scale, "zoomed");
            }
            ReplayStep::Edit { source, edit } => {
                self.engine.surface_mut().user_edit(*source, edit.clone());
            }
            ReplayStep::Prompt {
                message,
                default_value,
                title,
                variable_type,
            } => {
                let hooks = self
                    .engine
                    .surface()
                    .hooks()
                    .cloned()
                    .ok_or(SyncError::NotAttached)?;
                let replies = self.replies.clone();
                hooks.prompt(
                    message,
                    default_value,
                    Callback::new(move |value| {
                        let _ = replies.send(value);
                    }),
                    title.as_deref(),
                    variable_type.as_deref(),
                );
            }
            ReplayStep::ConfirmPrompt { value } => self.engine.confirm_prompt(value.clone())?,
            ReplayStep::CancelPrompt => self.engine.cancel_prompt()?,
            ReplayStep::DefineProcedure { mutation } => {
                let hooks = self
                    .engine
                    .surface()
                    .hooks()
                    .cloned()
                    .ok_or(SyncError::NotAttached)?;
                hooks.define_procedure(mutation, Callback::new(|_| {}));
            }
            ReplayStep::CloseCustomProcedures { mutation } => {
                self.engine.close_custom_procedures(mutation.clone())?
            }
            ReplayStep::Eyedropper => {
                let hooks = self
                    .engine
                    .surface()
                    .hooks()
                    .cloned()
                    .ok_or(SyncError::NotAttached)?;
                hooks.activate_eyedropper(Callback::new(|_| {}));
            }
            ReplayStep::SelectCategory { name } => self.engine.select_category(name.clone())?,
            ReplayStep::SetEditingTarget { target } => {
                if let Some(runtime) = self.runtime_mut() {
                    runtime.set_editing_target(target.clone());
                }
            }
            ReplayStep::SetDynamicBlocks { xml } => {
                if let Some(runtime) = self.runtime_mut() {
                    runtime.set_dynamic_blocks_xml(xml.clone());
                }
            }
            ReplayStep::SetLocale { locale } => {
                let mut props = self.engine.state().props.clone();
                props.locale = locale.clone();
                self.engine.set_props(props)?;
            }
            ReplayStep::SetVisible { visible } => {
                let mut props = self.engine.state().props.clone();
                props.visible = *visible;
                self.engine.set_props(props)?;
            }
            ReplayStep::Detach => {
                if let Some(runtime) = self.engine.detach() {
                    self.parked = Some(runtime);
                }
            }
            ReplayStep::Attach => {
                let runtime = self.parked.take().unwrap_or_default();
                self.engine.attach(runtime)?;
            }
        }
        Ok(())
    }

    /// The attached runtime, or the parked one while detached.
    fn runtime_mut(&mut self) -> Option<&mut HeadlessRuntime> {
        match self.engine.runtime_mut() {
            Some(runtime) => Some(runtime),
            None => self.parked.as_mut(),
        }
    }

    /// Acts as the container: published toolboxes are fed back as props, the rest is recorded.
    fn drain_requests(&mut self) -> Result<()> {
        for request in self.engine.take_requests() {
            let record = match request {
                ContainerRequest::ToolboxUpdated(toolbox) => {
                    let categories = toolbox.category_names().map(str::to_string).collect();
                    let props = self.engine.state().props.with_toolbox(toolbox);
                    self.engine.set_props(props)?;
                    RequestRecord::ToolboxUpdated { categories }
                }
                ContainerRequest::ActivateCustomProcedures { mutation, .. } => {
                    RequestRecord::ActivateCustomProcedures { mutation }
                }
                ContainerRequest::CloseCustomProcedures { mutation } => {
                    RequestRecord::CloseCustomProcedures { mutation }
                }
                ContainerRequest::ActivateColorPicker { .. } => RequestRecord::ActivateColorPicker,
            };
            self.report.requests.push(record);
        }
        Ok(())
    }
}

pub fn parse_script(json: &str) -> serde_json::Result<ReplayScript> {
    serde_json::from_str(json)
}
