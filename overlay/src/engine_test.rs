#![allow(clippy::float_cmp)]

use super::*;
use crate::geometry::Point;
use crate::gesture::Contact;
use crate::surface::Raster;

// =============================================================
// Helpers
// =============================================================

fn core() -> EngineCore<Raster> {
    EngineCore::new(Raster::new(60, 60), OverlayConfig::default()).unwrap()
}

fn loaded() -> EngineCore<Raster> {
    let mut core = core();
    core.import_image("image/png").unwrap();
    core
}

fn touch(core: &mut EngineCore<Raster>, event: ContactEvent) -> Vec<Action> {
    core.on_contacts(&event).unwrap()
}

fn drag(core: &mut EngineCore<Raster>, from: (f64, f64), to: (f64, f64)) -> Vec<Action> {
    let mut actions = touch(core, ContactEvent::start(vec![Contact::new(1, from.0, from.1)]));
    actions.extend(touch(core, ContactEvent::moved(vec![Contact::new(1, to.0, to.1)])));
    actions.extend(touch(core, ContactEvent::end(vec![])));
    actions
}

fn has_transform_changed(actions: &[Action]) -> bool {
    actions.iter().any(|a| matches!(a, Action::TransformChanged(_)))
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_starts_at_rest_without_overlay() {
    let core = core();
    assert!(!core.overlay_loaded());
    assert_eq!(core.transform, TransformState::with_opacity(100));
    assert_eq!(core.tool, Tool::Move);
    assert!(!core.can_undo());
    assert_eq!(core.gesture_state(), GestureState::Idle);
}

#[test]
fn new_rejects_invalid_config() {
    let config = OverlayConfig { min_scale: 0.0, ..OverlayConfig::default() };
    assert!(EngineCore::new(Raster::new(4, 4), config).is_err());
}

#[test]
fn new_uses_configured_brush() {
    let config = OverlayConfig { brush_color: "#f00".into(), brush_width: 9.0, ..OverlayConfig::default() };
    let core = EngineCore::new(Raster::new(4, 4), config).unwrap();
    assert_eq!(core.drawing().style().color, Color { r: 255, g: 0, b: 0 });
    assert_eq!(core.drawing().style().width, 9.0);
}

// =============================================================
// Import
// =============================================================

#[test]
fn import_image_marks_loaded_and_resets() {
    let mut core = loaded();
    core.toggle_blur();
    drag(&mut core, (0.0, 0.0), (10.0, 10.0));
    let actions = core.import_image("image/jpeg").unwrap();
    assert_eq!(actions[0], Action::OverlayLoaded);
    assert!(actions.contains(&Action::FilterChanged(OverlayFilter { blurred: false })));
    assert_eq!(core.transform, TransformState::with_opacity(100));
}

#[test]
fn import_rejects_non_image_without_mutation() {
    let mut core = core();
    let err = core.import_image("application/pdf").unwrap_err();
    assert!(matches!(err, OverlayError::UnsupportedFile(ref m) if m == "application/pdf"));
    assert!(!core.overlay_loaded());
}

#[test]
fn import_rejection_keeps_existing_overlay_state() {
    let mut core = loaded();
    core.set_opacity(40);
    assert!(core.import_image("text/plain").is_err());
    assert!(core.overlay_loaded());
    assert_eq!(core.transform.opacity, 40);
}

#[test]
fn import_applies_configured_default_opacity() {
    let config = OverlayConfig { default_opacity: 50, ..OverlayConfig::default() };
    let mut core = EngineCore::new(Raster::new(10, 10), config).unwrap();
    core.import_image("image/webp").unwrap();
    assert_eq!(core.transform.opacity, 50);
    core.set_opacity(90);
    core.reset_opacity();
    assert_eq!(core.transform.opacity, 50);
}

// =============================================================
// Gestures
// =============================================================

#[test]
fn drag_pans_loaded_overlay() {
    let mut core = loaded();
    let actions = drag(&mut core, (100.0, 100.0), (150.0, 130.0));
    assert!(has_transform_changed(&actions));
    assert_eq!(core.transform.translation, Point::new(50.0, 30.0));
    assert_eq!(core.gesture_state(), GestureState::Idle);
}

#[test]
fn drag_without_overlay_does_nothing() {
    let mut core = core();
    let actions = drag(&mut core, (100.0, 100.0), (150.0, 130.0));
    assert!(actions.is_empty());
    assert_eq!(core.transform.translation, Point::default());
}

#[test]
fn pinch_zooms_loaded_overlay() {
    let mut core = loaded();
    touch(&mut core, ContactEvent::start(vec![Contact::new(1, 0.0, 0.0), Contact::new(2, 100.0, 0.0)]));
    let actions = touch(&mut core, ContactEvent::moved(vec![Contact::new(1, 0.0, 0.0), Contact::new(2, 200.0, 0.0)]));
    assert!(has_transform_changed(&actions));
    assert!((core.transform.scale - 2.0).abs() < 1e-9);
}

#[test]
fn brush_drag_paints_and_enables_undo() {
    let mut core = loaded();
    core.set_tool(Tool::Brush);
    let actions = drag(&mut core, (5.0, 30.0), (55.0, 30.0));
    assert!(actions.contains(&Action::SurfaceChanged));
    assert!(actions.contains(&Action::UndoAvailable(true)));
    assert!(core.drawing().surface().painted_count() > 0);
    assert_eq!(core.transform.translation, Point::default());
}

#[test]
fn pointer_leave_ends_stroke() {
    let mut core = core();
    core.set_tool(Tool::Brush);
    touch(&mut core, ContactEvent::start(vec![Contact::new(1, 5.0, 5.0)]));
    touch(&mut core, ContactEvent::moved(vec![Contact::new(1, 20.0, 5.0)]));
    let actions = core.on_pointer_leave().unwrap();
    assert_eq!(actions, vec![Action::UndoAvailable(true)]);
    assert!(!core.drawing().is_stroking());
}

#[test]
fn eraser_removes_paint() {
    let mut core = core();
    core.set_tool(Tool::Brush);
    drag(&mut core, (0.0, 30.0), (60.0, 30.0));
    core.set_tool(Tool::Eraser);
    drag(&mut core, (30.0, 0.0), (30.0, 60.0));
    assert_eq!(core.drawing().surface().pixel(30, 30), Some([0, 0, 0, 0]));
}

// =============================================================
// Tools
// =============================================================

#[test]
fn choosing_color_switches_to_brush() {
    let mut core = core();
    core.set_tool(Tool::Eraser);
    core.set_brush_color("#00ff00").unwrap();
    assert_eq!(core.tool, Tool::Brush);
    assert_eq!(core.drawing().style().mode, StrokeMode::Draw);
    assert_eq!(core.drawing().style().color, Color { r: 0, g: 255, b: 0 });
}

#[test]
fn invalid_color_keeps_tool() {
    let mut core = core();
    assert!(core.set_brush_color("green").is_err());
    assert_eq!(core.tool, Tool::Move);
}

#[test]
fn brush_width_is_validated() {
    let mut core = core();
    core.set_brush_width(12.0).unwrap();
    assert_eq!(core.drawing().style().width, 12.0);
    assert!(core.set_brush_width(-1.0).is_err());
}

// =============================================================
// Overlay controls
// =============================================================

#[test]
fn rotation_controls_per_axis() {
    let mut core = loaded();
    core.set_rotation(Axis::X, 30.0);
    core.set_rotation(Axis::Y, -15.0);
    assert_eq!(core.transform.rotation.get(Axis::X), 30.0);
    core.reset_rotation(Axis::X);
    assert_eq!(core.transform.rotation.x, 0.0);
    assert_eq!(core.transform.rotation.y, -15.0);
}

#[test]
fn quarter_turn_wraps() {
    let mut core = loaded();
    for _ in 0..4 {
        core.rotate_quarter_turn();
    }
    assert_eq!(core.transform.rotation.z, 0.0);
}

#[test]
fn mirror_and_blur_toggle() {
    let mut core = loaded();
    core.toggle_mirror();
    assert!(core.transform.mirrored);
    assert_eq!(core.toggle_blur(), vec![Action::FilterChanged(OverlayFilter { blurred: true })]);
    assert_eq!(core.filter.css_filter(core.config.blur_radius_px), "blur(5px)");
}

#[test]
fn opacity_is_clamped() {
    let mut core = loaded();
    core.set_opacity(250);
    assert_eq!(core.transform.opacity, 100);
}

#[test]
fn brightness_set_and_reset() {
    let mut core = core();
    assert_eq!(core.set_brightness(140), vec![Action::CameraStyleChanged(CameraStyle { brightness: 140 })]);
    core.reset_brightness();
    assert_eq!(core.camera.css_filter(), "brightness(100%)");
}

// =============================================================
// History
// =============================================================

#[test]
fn undo_reports_availability() {
    let mut core = core();
    core.set_tool(Tool::Brush);
    drag(&mut core, (0.0, 10.0), (60.0, 10.0));
    let actions = core.undo().unwrap();
    assert_eq!(actions, vec![Action::SurfaceChanged, Action::UndoAvailable(false)]);
    assert_eq!(core.drawing().surface().painted_count(), 0);
}

#[test]
fn clear_is_undoable() {
    let mut core = core();
    core.set_tool(Tool::Brush);
    drag(&mut core, (0.0, 10.0), (60.0, 10.0));
    core.clear().unwrap();
    assert_eq!(core.drawing().surface().painted_count(), 0);
    core.undo().unwrap();
    assert!(core.drawing().surface().painted_count() > 0);
}

#[test]
fn resize_blanks_surface() {
    let mut core = core();
    core.set_tool(Tool::Brush);
    drag(&mut core, (0.0, 10.0), (60.0, 10.0));
    core.resize(30, 20).unwrap();
    assert_eq!(core.drawing().surface().width(), 30);
    assert_eq!(core.drawing().surface().painted_count(), 0);
    assert!(core.can_undo());
}

// =============================================================
// Actions JSON
// =============================================================

#[test]
fn actions_json_tags_each_action() {
    let json = actions_json(&[Action::SurfaceChanged, Action::UndoAvailable(true)]).unwrap();
    assert_eq!(json, r#"[{"type":"surface_changed"},{"type":"undo_available","value":true}]"#);
}

#[test]
fn actions_json_carries_transform_fields() {
    let mut t = TransformState::default();
    t.scale = 2.0;
    t.rotation.z = 90.0;
    let json = actions_json(&[Action::TransformChanged(t)]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value[0]["type"], "transform_changed");
    assert_eq!(value[0]["value"]["scale"], 2.0);
    assert_eq!(value[0]["value"]["rotation"]["z"], 90.0);
}

#[test]
fn actions_json_empty_is_empty_array() {
    assert_eq!(actions_json(&[]).unwrap(), "[]");
}

// =============================================================
// Export
// =============================================================

#[test]
fn export_file_name_uses_date_part() {
    assert_eq!(export_file_name("2024-03-09T17:45:12.000Z"), "ar-drawing-2024-03-09.png");
}
