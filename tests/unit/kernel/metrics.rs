use super::*;

fn metrics(x: f64, y: f64, scale: f64) -> WorkspaceMetrics {
    WorkspaceMetrics {
        scroll_x: x,
        scroll_y: y,
        scale,
    }
}

#[test]
fn test_default_metrics_have_unit_scale() {
    assert_eq!(WorkspaceMetrics::default(), metrics(0.0, 0.0, 1.0));
}

#[test]
fn test_set_returns_new_store() {
    let empty = WorkspaceMetricsStore::new();
    let one = empty.set("sprite1", metrics(10.0, 20.0, 0.5));

    assert!(empty.is_empty());
    assert_eq!(one.len(), 1);
    assert_eq!(one.get("sprite1"), Some(metrics(10.0, 20.0, 0.5)));
    assert_eq!(one.get("sprite2"), None);
    assert!(one.contains("sprite1"));
}

#[test]
fn test_older_snapshot_unaffected_by_overwrite() {
    let first = WorkspaceMetricsStore::new().set("a", metrics(1.0, 1.0, 1.0));
    let second = first.set("a", metrics(2.0, 2.0, 2.0)).set("b", metrics(3.0, 3.0, 3.0));

    assert_eq!(first.get("a"), Some(metrics(1.0, 1.0, 1.0)));
    assert!(!first.contains("b"));
    assert_eq!(second.get("a"), Some(metrics(2.0, 2.0, 2.0)));
    assert_eq!(second.len(), 2);
}

#[test]
fn test_metrics_json_shape() {
    let json = serde_json::to_value(metrics(1.5, -2.0, 0.675)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "scroll_x": 1.5, "scroll_y": -2.0, "scale": 0.675 })
    );
}
