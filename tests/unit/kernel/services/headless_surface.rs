use super::*;
use crate::kernel::build_toolbox;
use crate::kernel::services::bus::{kernel_bus, KernelMessage};
use crate::kernel::services::ports::Settings;
use std::sync::Arc;

fn injected() -> HeadlessSurface {
    let mut surface = HeadlessSurface::new();
    surface.inject(&InjectConfig {
        options: Settings::default().workspace,
        toolbox: Arc::new(build_toolbox(false, "s1", "")),
    });
    surface
}

#[test]
fn test_inject_applies_start_scale_and_toolbox() {
    let surface = injected();

    assert!(surface.is_injected());
    assert!(surface.is_visible());
    assert_eq!(surface.viewport().scale, 0.675);
    assert_eq!(surface.selected_category().as_deref(), Some("Motion"));
    assert_eq!(surface.flyout_field("s1_setx"), Some("0"));
}

#[test]
fn test_load_requires_xml_root() {
    let mut surface = injected();

    let err = surface.load_from_tree("<block id=\"a\"/>").unwrap_err();
    assert!(matches!(err, PortError::InvalidTree(_)));

    surface
        .load_from_tree("<xml><block id=\"a\"/><shadow id=\"b\"/></xml>")
        .unwrap();
    assert_eq!(surface.block_count(), 2);
    assert!(surface.has_block("b"));
}

#[test]
fn test_load_notifies_workspace_listener() {
    let mut surface = injected();
    let (tx, mut rx) = kernel_bus();
    surface.set_change_listener(EditSource::Workspace, Some(tx));

    surface
        .load_from_tree("<xml><block type=\"x\" id=\"a\"></block></xml>")
        .unwrap();

    match rx.try_recv().unwrap() {
        KernelMessage::Surface(SurfaceEvent::Edit { source, edit }) => {
            assert_eq!(source, EditSource::Workspace);
            assert_eq!(edit.kind, BlockEditKind::Create);
            assert_eq!(edit.block_id, "a");
        }
        other => panic!("unexpected message: {other:?}"),
    }
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_load_clears_previous_patches() {
    let mut surface = injected();
    surface.load_from_tree("<xml><block id=\"a\"/></xml>").unwrap();
    assert!(surface.glow_stack("a", true));
    assert!(surface.report_value("a", "5"));

    surface.load_from_tree("<xml><block id=\"a\"/></xml>").unwrap();

    assert!(!surface.is_stack_glowing("a"));
    assert_eq!(surface.reported_value("a"), None);
}

#[test]
fn test_glow_off_and_unknown_ids() {
    let mut surface = injected();
    surface.load_from_tree("<xml><block id=\"a\"/></xml>").unwrap();

    assert!(surface.glow_block("a", true));
    assert!(surface.is_block_glowing("a"));
    assert!(surface.glow_block("a", false));
    assert!(!surface.is_block_glowing("a"));
    assert!(!surface.glow_stack("missing", true));
    assert!(!surface.set_flyout_field_value("s2_setx", "4"));
}

#[test]
fn test_unknown_category_keeps_selection() {
    let mut surface = injected();

    surface.select_category("Sound");
    surface.select_category("Nope");
    assert_eq!(surface.selected_category().as_deref(), Some("Sound"));

    surface.scroll_to_category("My Blocks");
    assert_eq!(surface.selected_category().as_deref(), Some("My Blocks"));
}

#[test]
fn test_zoom_is_clamped() {
    let mut surface = injected();

    let scale = surface.zoom(0.0, 0.0, 50.0);
    assert_eq!(scale, 3.0);
    let scale = surface.zoom(0.0, 0.0, -50.0);
    assert_eq!(scale, 0.3);
}

#[test]
fn test_define_blocks_skips_untyped_templates() {
    let mut surface = injected();

    surface.define_blocks(&[
        serde_json::json!({ "type": "pen_up" }),
        serde_json::json!({ "message0": "no type" }),
    ]);

    assert!(surface.defined_block("pen_up").is_some());
    assert_eq!(
        surface.ops().last(),
        Some(&SurfaceOp::DefineBlocks {
            opcodes: vec!["pen_up".to_string()]
        })
    );
}

#[test]
fn test_dispose_drops_listeners() {
    let mut surface = injected();
    let (tx, _rx) = kernel_bus();
    surface.set_change_listener(EditSource::Flyout, Some(tx));

    surface.dispose();

    assert!(surface.is_disposed());
    assert!(!surface.is_listening(EditSource::Flyout));
    assert!(!surface.user_edit(EditSource::Flyout, BlockEdit::new(BlockEditKind::Change, "m")));
}

#[test]
fn test_ops_serialize_with_tag() {
    let json = serde_json::to_value(SurfaceOp::GlowStack {
        id: "a".to_string(),
        on: true,
        applied: false,
    })
    .unwrap();

    assert_eq!(
        json,
        serde_json::json!({ "op": "glow_stack", "id": "a", "on": true, "applied": false })
    );
}
