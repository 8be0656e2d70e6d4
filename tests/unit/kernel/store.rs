use super::*;
use crate::kernel::services::ports::{
    BlockEdit, BlockEditKind, BlockInfo, Settings, TargetInfo,
};
use crate::kernel::{BlocksInfoOrigin, BlocksProps, TargetsSnapshot, WorkspaceMetrics};
use std::time::{Duration, Instant};

fn new_store() -> Store {
    Store::new(SyncState::new(&Settings::default(), BlocksProps::default()))
}

fn attached_store(target: TargetInfo) -> Store {
    let mut store = new_store();
    store
        .dispatch(Action::Attached {
            editing_target: Some(target),
            dynamic_blocks_xml: String::new(),
        })
        .unwrap();
    store
}

fn workspace_update(store: &Store, xml: &str) -> Action {
    Action::WorkspaceUpdate {
        xml: xml.to_string(),
        editing_target: store.state().editing_target.clone(),
        dynamic_blocks_xml: store.state().dynamic_blocks_xml.clone(),
    }
}

#[test]
fn test_attach_emits_listeners_hooks_and_locale() {
    let mut store = new_store();

    let result = store
        .dispatch(Action::Attached {
            editing_target: None,
            dynamic_blocks_xml: String::new(),
        })
        .unwrap();

    assert!(result.state_changed);
    assert!(matches!(
        result.effects.as_slice(),
        [
            Effect::SetEditListener {
                source: EditSource::Workspace,
                attached: true
            },
            Effect::SetEditListener {
                source: EditSource::Flyout,
                attached: true
            },
            Effect::SetHooks { installed: true },
            Effect::SetLocale { .. },
        ]
    ));
    assert!(matches!(
        store.dispatch(Action::Attached {
            editing_target: None,
            dynamic_blocks_xml: String::new(),
        }),
        Err(SyncError::AlreadyAttached)
    ));
}

#[test]
fn test_runtime_actions_dropped_while_detached() {
    let mut store = new_store();

    let result = store
        .dispatch(Action::ScriptGlow {
            id: "b1".into(),
            on: true,
        })
        .unwrap();

    assert!(result.effects.is_empty());
    assert!(!result.state_changed);
}

#[test]
fn test_workspace_update_brackets_load_with_listener_toggle() {
    let mut store = attached_store(TargetInfo::sprite("s1", 0.0, 0.0));

    let action = workspace_update(&store, "<xml></xml>");
    let result = store.dispatch(action).unwrap();

    assert!(matches!(
        result.effects.as_slice(),
        [
            Effect::Request(ContainerRequest::ToolboxUpdated(_)),
            Effect::SetEditListener {
                source: EditSource::Workspace,
                attached: false
            },
            Effect::LoadWorkspace { .. },
            Effect::SetEditListener {
                source: EditSource::Workspace,
                attached: true
            },
            Effect::CaptureViewport,
        ]
    ));
}

#[test]
fn test_workspace_update_restores_saved_viewport() {
    let mut store = attached_store(TargetInfo::sprite("s1", 0.0, 0.0));
    let saved = WorkspaceMetrics {
        scroll_x: 12.0,
        scroll_y: 34.0,
        scale: 0.9,
    };
    store
        .dispatch(Action::ViewportChanged { metrics: saved })
        .unwrap();

    let action = workspace_update(&store, "<xml></xml>");
    let result = store.dispatch(action).unwrap();

    let tail = &result.effects[result.effects.len() - 2..];
    assert!(matches!(tail, [Effect::SetViewport(m), Effect::Resize] if *m == saved));
}

#[test]
fn test_same_toolbox_not_republished() {
    let mut store = attached_store(TargetInfo::sprite("s1", 0.0, 0.0));

    let first = workspace_update(&store, "<xml></xml>");
    store.dispatch(first).unwrap();
    let second = workspace_update(&store, "<xml></xml>");
    let result = store.dispatch(second).unwrap();

    assert!(!result
        .effects
        .iter()
        .any(|e| matches!(e, Effect::Request(ContainerRequest::ToolboxUpdated(_)))));
}

#[test]
fn test_targets_update_settles_after_window() {
    let mut store = attached_store(TargetInfo::sprite("s1", 0.0, 0.0));
    let t0 = Instant::now();

    let result = store
        .dispatch(Action::TargetsUpdate {
            snapshot: TargetsSnapshot {
                targets: vec![TargetInfo::sprite("s1", -10.5, 2.4)],
                editing_target: Some("s1".into()),
                dynamic_blocks_xml: String::new(),
            },
            now: t0,
        })
        .unwrap();
    assert!(result.effects.is_empty());

    let early = store
        .dispatch(Action::Tick {
            now: t0 + Duration::from_millis(50),
        })
        .unwrap();
    assert!(early.effects.is_empty());

    let settled = store
        .dispatch(Action::Tick {
            now: t0 + Duration::from_millis(100),
        })
        .unwrap();
    let fields: Vec<(&str, &str)> = settled
        .effects
        .iter()
        .filter_map(|e| match e {
            Effect::SetFlyoutFieldValue { block_id, value } => {
                Some((block_id.as_str(), value.as_str()))
            }
            _ => None,
        })
        .collect();

    assert_eq!(
        fields,
        vec![
            ("s1_glidex", "-10"),
            ("s1_glidey", "2"),
            ("s1_movex", "-10"),
            ("s1_movey", "2"),
            ("s1_setx", "-10"),
            ("s1_sety", "2"),
        ]
    );
    assert_eq!(store.state().editing_target.as_ref().unwrap().x, -10.5);
}

#[test]
fn test_targets_update_republishes_on_new_extension_xml() {
    let mut store = attached_store(TargetInfo::sprite("s1", 0.0, 0.0));
    let t0 = Instant::now();

    store
        .dispatch(Action::TargetsUpdate {
            snapshot: TargetsSnapshot {
                targets: vec![TargetInfo::sprite("s1", 0.0, 0.0)],
                editing_target: Some("s1".into()),
                dynamic_blocks_xml: "<category name=\"Pen\"></category>".to_string(),
            },
            now: t0,
        })
        .unwrap();
    let settled = store
        .dispatch(Action::Tick {
            now: t0 + Duration::from_millis(100),
        })
        .unwrap();

    assert!(matches!(
        settled.effects.first(),
        Some(Effect::Request(ContainerRequest::ToolboxUpdated(toolbox))) if toolbox.dynamic_xml.contains("Pen")
    ));
}

#[test]
fn test_blocks_info_defines_templates_before_publish() {
    let mut store = attached_store(TargetInfo::sprite("s1", 0.0, 0.0));

    let result = store
        .dispatch(Action::BlocksInfo {
            origin: BlocksInfoOrigin::ExtensionAdded,
            blocks: vec![BlockInfo {
                json: serde_json::json!({ "type": "pen_clear" }),
            }],
            dynamic_blocks_xml: "<category name=\"Pen\"></category>".to_string(),
        })
        .unwrap();

    assert!(matches!(
        result.effects.as_slice(),
        [
            Effect::DefineBlocks { templates },
            Effect::Request(ContainerRequest::ToolboxUpdated(_)),
        ] if templates.len() == 1
    ));
    assert!(store.state().known_templates.contains("pen_clear"));
}

#[test]
fn test_user_edit_forwarded_only_when_listening() {
    let mut detached = new_store();
    let dropped = detached
        .dispatch(Action::UserEdit {
            source: EditSource::Workspace,
            edit: BlockEdit::new(BlockEditKind::Move, "b1"),
        })
        .unwrap();
    assert!(dropped.effects.is_empty());

    let mut store = attached_store(TargetInfo::sprite("s1", 0.0, 0.0));
    let forwarded = store
        .dispatch(Action::UserEdit {
            source: EditSource::Workspace,
            edit: BlockEdit::new(BlockEditKind::Move, "b1"),
        })
        .unwrap();
    assert!(matches!(
        forwarded.effects.as_slice(),
        [Effect::ForwardEdit {
            source: EditSource::Workspace,
            ..
        }]
    ));
}

#[test]
fn test_props_change_effects() {
    let mut store = attached_store(TargetInfo::sprite("s1", 0.0, 0.0));

    let mut next = store.state().props.clone();
    next.custom_procedures_visible = true;
    let result = store.dispatch(Action::SetProps(next.clone())).unwrap();
    assert!(result.state_changed);
    assert!(result.effects.is_empty());

    next.visible = false;
    next.locale = "ja".to_string();
    let result = store.dispatch(Action::SetProps(next)).unwrap();
    assert!(matches!(
        result.effects.as_slice(),
        [Effect::SetLocale { locale, .. }, Effect::SetVisible(false)] if locale == "ja"
    ));
}

#[test]
fn test_detach_is_idempotent() {
    let mut store = attached_store(TargetInfo::sprite("s1", 0.0, 0.0));

    let first = store.dispatch(Action::Detached).unwrap();
    let second = store.dispatch(Action::Detached).unwrap();

    assert_eq!(first.effects.len(), 3);
    assert!(second.effects.is_empty());
    assert!(!store.state().attached);
}

#[test]
fn test_viewport_change_without_editing_target_ignored() {
    let mut store = new_store();

    let result = store
        .dispatch(Action::ViewportChanged {
            metrics: WorkspaceMetrics::default(),
        })
        .unwrap();

    assert!(!result.state_changed);
    assert!(store.state().metrics.is_empty());
}
