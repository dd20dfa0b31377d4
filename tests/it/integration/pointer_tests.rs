//! Pointer and zoom integration tests.

use crate::helpers::{TestViewerBuilder, placement};
use fieldboard::constants::{MAX_ZOOM, MIN_FIELD_SIZE, MIN_ZOOM, RESIZE_HANDLE_SIZE};
use fieldboard::input::InputState;
use fieldboard::types::{CanvasPoint, Placement};
use fieldboard::{FieldType, ViewerError};

#[test]
fn test_drag_moves_field_and_drawable() {
    let mut viewer = TestViewerBuilder::new().build();
    let field = viewer.add_field(FieldType::Input, placement(0, 100.0, 100.0)).unwrap();
    let handle = field.object.handle().unwrap();

    let selected = viewer.pointer_down(CanvasPoint::new(110.0, 105.0)).unwrap();
    assert_eq!(selected.as_ref(), Some(&field.id));
    assert!(matches!(viewer.input_state(), InputState::DraggingField { .. }));

    assert!(viewer.pointer_move(CanvasPoint::new(160.0, 205.0)).unwrap());
    assert_eq!(viewer.pointer_up(), Some(field.id.clone()));

    let moved = viewer.field(&field.id).unwrap();
    assert_eq!(moved.placement.position, (150.0, 200.0));
    assert_eq!(viewer.surface().drawable(handle).unwrap().position, (150.0, 200.0));
    assert!(viewer.input_state().is_idle());
}

#[test]
fn test_drag_respects_zoom_and_pan() {
    let mut viewer = TestViewerBuilder::new().build();
    let field = viewer.add_field(FieldType::Input, placement(0, 100.0, 100.0)).unwrap();
    viewer.set_zoom(2.0).unwrap();
    viewer.pan_by(10.0, 20.0).unwrap();

    // Page (110, 110) is screen (230, 240) at zoom 2 with offset (10, 20)
    viewer.pointer_down(CanvasPoint::new(230.0, 240.0)).unwrap();
    viewer.pointer_move(CanvasPoint::new(250.0, 240.0)).unwrap();
    viewer.pointer_up();

    assert_eq!(viewer.field(&field.id).unwrap().placement.position, (110.0, 100.0));
}

#[test]
fn test_resize_from_handle() {
    let mut viewer = TestViewerBuilder::new().build();
    let field = viewer
        .add_field(FieldType::Input, Placement::new(0, (100.0, 100.0), (200.0, 24.0)))
        .unwrap();

    viewer.pointer_down(CanvasPoint::new(300.0, 124.0)).unwrap();
    assert!(matches!(viewer.input_state(), InputState::ResizingField { .. }));

    viewer.pointer_move(CanvasPoint::new(350.0, 140.0)).unwrap();
    viewer.pointer_up();

    assert_eq!(viewer.field(&field.id).unwrap().placement.size, (250.0, 40.0));
}

#[test]
fn test_resize_handle_reaches_outside_the_field() {
    let mut viewer = TestViewerBuilder::new().build();
    viewer
        .add_field(FieldType::Input, Placement::new(0, (100.0, 100.0), (200.0, 24.0)))
        .unwrap();

    let just_outside = CanvasPoint::new(300.0 + RESIZE_HANDLE_SIZE / 2.0, 124.0 + RESIZE_HANDLE_SIZE / 2.0);
    assert!(viewer.pointer_down(just_outside).unwrap().is_some());
    assert!(matches!(viewer.input_state(), InputState::ResizingField { .. }));
}

#[test]
fn test_resize_is_clamped_to_minimum_size() {
    let mut viewer = TestViewerBuilder::new().build();
    let field = viewer
        .add_field(FieldType::Input, Placement::new(0, (100.0, 100.0), (200.0, 24.0)))
        .unwrap();

    viewer.pointer_down(CanvasPoint::new(300.0, 124.0)).unwrap();
    viewer.pointer_move(CanvasPoint::new(0.0, 0.0)).unwrap();
    viewer.pointer_up();

    assert_eq!(
        viewer.field(&field.id).unwrap().placement.size,
        (MIN_FIELD_SIZE, MIN_FIELD_SIZE)
    );
}

#[test]
fn test_pointer_on_empty_page_clears_selection() {
    let mut viewer = TestViewerBuilder::new().build();
    let field = viewer.add_field(FieldType::Input, placement(0, 100.0, 100.0)).unwrap();

    viewer.pointer_down(CanvasPoint::new(110.0, 110.0)).unwrap();
    viewer.pointer_up();
    assert_eq!(viewer.selected_field(), Some(&field.id));

    assert_eq!(viewer.pointer_down(CanvasPoint::new(500.0, 700.0)).unwrap(), None);
    assert_eq!(viewer.selected_field(), None);
    assert!(!viewer.pointer_move(CanvasPoint::new(510.0, 710.0)).unwrap());
}

#[test]
fn test_topmost_field_wins() {
    let mut viewer = TestViewerBuilder::new().build();
    let _below = viewer.add_field(FieldType::Input, placement(0, 100.0, 100.0)).unwrap();
    let above = viewer.add_field(FieldType::Input, placement(0, 150.0, 100.0)).unwrap();

    let point = CanvasPoint::new(160.0, 110.0);
    assert_eq!(viewer.field_at(point).map(|f| f.id.clone()), Some(above.id.clone()));
    assert_eq!(viewer.pointer_down(point).unwrap(), Some(above.id));
}

#[test]
fn test_fields_on_other_pages_are_not_hit() {
    let mut viewer = TestViewerBuilder::new().with_pages(2).build();
    viewer.add_field(FieldType::Input, placement(1, 100.0, 100.0)).unwrap();

    assert!(viewer.field_at(CanvasPoint::new(110.0, 110.0)).is_none());
    viewer.render_page(1).unwrap();
    assert!(viewer.field_at(CanvasPoint::new(110.0, 110.0)).is_some());
}

#[test]
fn test_read_only_selects_without_dragging() {
    let mut viewer = TestViewerBuilder::new().build();
    let field = viewer.add_field(FieldType::Input, placement(0, 100.0, 100.0)).unwrap();
    viewer.set_read_only(true);

    assert_eq!(viewer.pointer_down(CanvasPoint::new(110.0, 110.0)).unwrap(), Some(field.id.clone()));
    assert!(viewer.input_state().is_idle());
    assert!(!viewer.pointer_move(CanvasPoint::new(200.0, 200.0)).unwrap());
    assert_eq!(viewer.field(&field.id).unwrap().placement.position, (100.0, 100.0));
}

#[test]
fn test_zoom_in_and_out_are_bounded() {
    let mut viewer = TestViewerBuilder::new().build();

    while viewer.zoom_in().unwrap() {}
    assert_eq!(viewer.transform().zoom, MAX_ZOOM);

    while viewer.zoom_out().unwrap() {}
    assert_eq!(viewer.transform().zoom, MIN_ZOOM);

    viewer.set_zoom(100.0).unwrap();
    assert_eq!(viewer.transform().zoom, MAX_ZOOM);

    viewer.zoom_reset().unwrap();
    assert_eq!(viewer.transform().zoom, 1.0);
    assert_eq!(viewer.transform().offset, (0.0, 0.0));
}

#[test]
fn test_view_changes_rerender_current_page() {
    let mut viewer = TestViewerBuilder::new().build();
    let draws = viewer.surface().draw_count();

    viewer.set_zoom(1.5).unwrap();
    viewer.pan_by(5.0, 5.0).unwrap();

    assert_eq!(viewer.surface().draw_count(), draws + 2);
    let frame = viewer.surface().current_page().unwrap();
    assert_eq!(frame.scale, 1.5);
    assert_eq!(frame.transform.offset, (5.0, 5.0));
}

#[test]
fn test_pointer_after_dispose_is_not_ready() {
    let mut viewer = TestViewerBuilder::new().build();
    viewer.dispose();

    assert!(matches!(
        viewer.pointer_down(CanvasPoint::new(0.0, 0.0)),
        Err(ViewerError::NotReady { .. })
    ));
    assert!(matches!(viewer.zoom_in(), Err(ViewerError::NotReady { .. })));
}

#[test]
fn test_unusable_zoom_is_rejected_and_view_survives() {
    let mut viewer = TestViewerBuilder::new().build();
    let field = viewer.add_field(FieldType::Input, placement(0, 100.0, 100.0)).unwrap();
    viewer.set_zoom(2.0).unwrap();
    let before = viewer.transform();

    assert!(matches!(viewer.set_zoom(f32::NAN), Err(ViewerError::InvalidTransform(_))));
    assert!(matches!(viewer.set_zoom(-1.0), Err(ViewerError::InvalidTransform(_))));
    assert!(matches!(
        viewer.zoom_at(f32::NAN, CanvasPoint::new(0.0, 0.0)),
        Err(ViewerError::InvalidTransform(_))
    ));
    assert!(matches!(
        viewer.zoom_at(0.0, CanvasPoint::new(0.0, 0.0)),
        Err(ViewerError::InvalidTransform(_))
    ));
    assert!(matches!(viewer.pan_by(f32::INFINITY, 0.0), Err(ViewerError::InvalidTransform(_))));
    assert_eq!(viewer.transform(), before);

    // Page (110, 110) is still screen (220, 220)
    assert_eq!(viewer.pointer_down(CanvasPoint::new(220.0, 220.0)).unwrap(), Some(field.id));
    assert_eq!(viewer.surface().current_page().unwrap().scale, 2.0);
}

#[test]
fn test_drag_stops_at_page_edge() {
    let mut viewer = TestViewerBuilder::new().build();
    let field = viewer.add_field(FieldType::Input, placement(0, 100.0, 100.0)).unwrap();

    viewer.pointer_down(CanvasPoint::new(110.0, 110.0)).unwrap();
    assert!(viewer.pointer_move(CanvasPoint::new(5000.0, -400.0)).unwrap());
    viewer.pointer_up();

    // Letter is 612 x 792; the default field is 200 x 24
    assert_eq!(viewer.field(&field.id).unwrap().placement.position, (412.0, 0.0));
}

#[test]
fn test_resize_stops_at_page_edge() {
    let mut viewer = TestViewerBuilder::new().build();
    let field = viewer
        .add_field(FieldType::Input, Placement::new(0, (500.0, 700.0), (100.0, 24.0)))
        .unwrap();

    viewer.pointer_down(CanvasPoint::new(600.0, 724.0)).unwrap();
    assert!(matches!(viewer.input_state(), InputState::ResizingField { .. }));
    viewer.pointer_move(CanvasPoint::new(900.0, 900.0)).unwrap();
    viewer.pointer_up();

    assert_eq!(viewer.field(&field.id).unwrap().placement.size, (112.0, 92.0));
}
