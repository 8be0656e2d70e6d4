use super::*;

#[test]
fn test_sprite_toolbox_categories() {
    let toolbox = build_toolbox(false, "sprite1", "");
    let names: Vec<&str> = toolbox.category_names().collect();

    assert_eq!(
        names,
        vec![
            "Motion",
            "Looks",
            "Sound",
            "Events",
            "Control",
            "Sensing",
            "Operators",
            "Variables",
            "My Blocks",
        ]
    );
    assert_eq!(toolbox.category("Variables").unwrap().custom.as_deref(), Some("VARIABLE"));
    assert_eq!(toolbox.category("My Blocks").unwrap().custom.as_deref(), Some("PROCEDURE"));
}

#[test]
fn test_position_shadows_scoped_to_target() {
    let toolbox = build_toolbox(false, "sprite1", "");
    let defaults = toolbox.shadow_defaults();

    for key in POSITION_SHADOW_KEYS {
        let id = position_shadow_id("sprite1", key);
        assert!(
            defaults.iter().any(|(shadow, value)| *shadow == id && *value == "0"),
            "missing shadow {id}"
        );
    }
    assert_eq!(defaults.len(), POSITION_SHADOW_KEYS.len());
}

#[test]
fn test_stage_has_no_motion_blocks() {
    let toolbox = build_toolbox(true, "stage", "");
    let motion = toolbox.category("Motion").unwrap();

    assert_eq!(
        motion.items,
        vec![ToolboxItem::Label {
            text: "Stage selected: no motion blocks".to_string()
        }]
    );
    assert!(toolbox.shadow_defaults().is_empty());
    assert_ne!(toolbox, build_toolbox(false, "stage", ""));
}

#[test]
fn test_build_is_deterministic() {
    let dynamic = "  <category name=\"Pen\" id=\"pen\"></category>\n";
    let a = build_toolbox(false, "s", dynamic);
    let b = build_toolbox(false, "s", dynamic);

    assert_eq!(a, b);
    assert_eq!(a.to_xml(), b.to_xml());
    assert_eq!(a.dynamic_xml, "<category name=\"Pen\" id=\"pen\"></category>");
}

#[test]
fn test_target_id_only_changes_shadow_ids() {
    let a = build_toolbox(false, "a", "");
    let b = build_toolbox(false, "b", "");

    assert_ne!(a, b);
    let names_a: Vec<&str> = a.category_names().collect();
    let names_b: Vec<&str> = b.category_names().collect();
    assert_eq!(names_a, names_b);
    assert_eq!(
        a.to_xml().replace("\"a_", "\"b_"),
        b.to_xml()
    );
}

#[test]
fn test_xml_contains_dynamic_categories_and_escapes() {
    let toolbox = build_toolbox(false, "x&y", "<category name=\"Pen\"></category>");
    let xml = toolbox.to_xml();

    assert!(xml.starts_with("<xml"));
    assert!(xml.ends_with("</xml>"));
    assert!(xml.contains("<category name=\"Pen\"></category>"));
    assert!(xml.contains("id=\"x&amp;y_movex\""));
    assert!(xml.contains("<category name=\"My Blocks\" id=\"more\""));
}
