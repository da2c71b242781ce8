//! Integration tests for editing sessions.
//!
//! These tests verify that:
//! - Drags commit only valid drop positions
//! - Layer removal cascades and the last layer is protected
//! - Duplicated yards are independent copies
//! - Selection and view framing follow the open yard

use pretty_assertions::assert_eq;

use yard_planner::{
    DragSession, EditorConfig, EditorError, EditorState, PlacementError, Point, Unit, ViewTransform,
    Viewport, YardBook,
};

fn state_with_yard() -> (EditorState, String) {
    let config = EditorConfig::default();
    let mut book = YardBook::default();
    let id = book
        .create_yard("Main", 100.0, 60.0, Unit::Ft, &config.container_types)
        .unwrap();
    (EditorState::new(book, config), id)
}

/// Place a container of `key` on the active layer of the open yard
fn place(state: &mut EditorState, key: &str, x: f64, y: f64) -> String {
    let options = state.placement_options();
    let kind = state.config.container_type(key).unwrap().clone();
    let yard = state.book.active_yard_mut().unwrap();
    let layer = yard.active_layer_id.clone();
    yard.place_new_container(&kind, &layer, Point::new(x, y), options)
        .unwrap()
        .id
}

#[test]
fn test_drag_over_blocker_is_discarded() {
    let (mut state, _) = state_with_yard();
    place(&mut state, "20ft", 0.0, 0.0);
    let dragged = place(&mut state, "20ft", 40.0, 0.0);
    let options = state.placement_options();

    let yard = state.book.active_yard_mut().unwrap();
    let mut drag = DragSession::begin(yard, &dragged, Point::new(45.0, 4.0)).unwrap();
    let preview = drag.update(yard, Point::new(15.0, 4.0), options);
    assert_eq!((preview.x, preview.y), (10.0, 0.0));
    assert!(!drag.is_valid());
    assert_eq!(drag.last_valid(), Point::new(40.0, 0.0));

    let err = drag.finish(yard).unwrap_err();
    assert!(matches!(err, EditorError::Placement(PlacementError::Blocked)));
    let c = yard.container(&dragged).unwrap();
    assert_eq!((c.x, c.y), (40.0, 0.0));
}

#[test]
fn test_drag_commits_snapped_position() {
    let (mut state, _) = state_with_yard();
    let dragged = place(&mut state, "10ft", 0.0, 0.0);
    let options = state.placement_options();

    let yard = state.book.active_yard_mut().unwrap();
    let mut drag = DragSession::begin(yard, &dragged, Point::new(5.0, 4.0)).unwrap();
    drag.update(yard, Point::new(30.4, 20.2), options);
    // pushed past the right wall, then clamped back inside
    drag.update(yard, Point::new(500.0, 24.0), options);
    assert!(drag.is_valid());
    assert_eq!(drag.preview(), Point::new(90.0, 20.0));

    let at = drag.finish(yard).unwrap();
    assert_eq!(at, Point::new(90.0, 20.0));
    assert_eq!(yard.container(&dragged).unwrap().x, 90.0);
}

#[test]
fn test_layer_removal_cascades() {
    let (mut state, _) = state_with_yard();
    place(&mut state, "40ft", 0.0, 0.0);

    let yard = state.book.active_yard_mut().unwrap();
    let ground = yard.active_layer_id.clone();
    let upper = yard.add_layer("");
    assert_eq!(yard.layer(&upper).unwrap().name, "Layer 2");
    place(&mut state, "40ft", 0.0, 0.0);
    place(&mut state, "10ft", 50.0, 20.0);

    let yard = state.book.active_yard_mut().unwrap();
    assert_eq!(yard.next_container_number, 4);
    let removed = yard.remove_layer(&upper).unwrap();
    assert_eq!(removed.containers.len(), 2);
    assert_eq!(yard.active_layer_id, ground);
    assert_eq!(yard.next_container_number, 2);

    let err = yard.remove_layer(&ground).unwrap_err();
    assert!(matches!(err, EditorError::StructuralInvariant { .. }));
    assert_eq!(yard.layers.len(), 1);
    assert_eq!(yard.containers().count(), 1);
}

#[test]
fn test_duplicate_yard_is_independent() {
    let (mut state, original) = state_with_yard();
    place(&mut state, "20ft", 0.0, 0.0);
    {
        let yard = state.book.active_yard_mut().unwrap();
        let id = yard.containers().next().unwrap().id.clone();
        yard.add_door(&id).unwrap();
        yard.add_layer("Deck");
    }

    let copy = state.book.duplicate_yard(&original).unwrap();
    assert_eq!(state.book.active_yard_id(), Some(copy.as_str()));

    let source = state.book.yard(&original).unwrap().clone();
    let duplicate = state.book.yard(&copy).unwrap();
    assert_eq!(duplicate.name, "Main Copy");
    assert_eq!(duplicate.layer(&duplicate.active_layer_id).unwrap().name, "Deck");
    assert_ne!(duplicate.layers[0].id, source.layers[0].id);

    let a = source.containers().next().unwrap();
    let b = duplicate.containers().next().unwrap();
    assert_ne!(a.id, b.id);
    assert_ne!(a.doors[0].id, b.doors[0].id);
    assert_eq!((a.x, a.y, &a.label), (b.x, b.y, &b.label));

    state.book.delete_yard(&copy).unwrap();
    assert_eq!(state.book.active_yard_id(), Some(original.as_str()));
    assert_eq!(state.book.yard(&original).unwrap(), &source);
}

#[test]
fn test_selection_is_scoped_to_active_layer() {
    let (mut state, _) = state_with_yard();
    let bottom = place(&mut state, "10ft", 0.0, 0.0);
    state.select(&bottom).unwrap();
    assert_eq!(state.selected_container().unwrap().id, bottom);

    state.book.active_yard_mut().unwrap().add_layer("Upper");
    assert!(state.select(&bottom).unwrap_err().is_not_found());

    let catalog = state.config.container_types.clone();
    let other = state
        .book
        .create_yard("", 20.0, 20.0, Unit::M, &catalog)
        .unwrap();
    assert_eq!(state.book.yard(&other).unwrap().name, "Yard 2");
    state.open_yard(&other).unwrap();
    assert_eq!(state.selected_container_id, None);
}

#[test]
fn test_view_fits_and_zooms_about_pointer() {
    let (state, _) = state_with_yard();
    let yard = state.book.active_yard().unwrap();
    let mut view = ViewTransform::from_config(&state.config);

    view.fit(yard, Viewport::new(1032.0, 632.0));
    assert_eq!(view.base_scale, 10.0);
    assert_eq!((view.pan_x, view.pan_y), (16.0, 16.0));
    assert_eq!(view.screen_to_yard(Point::new(216.0, 116.0)), Point::new(20.0, 10.0));

    let pointer = Point::new(300.0, 200.0);
    let anchor = view.screen_to_yard(pointer);
    view.wheel(pointer, -500.0);
    assert!(view.zoom > 2.7 && view.zoom < 2.72);
    let after = view.screen_to_yard(pointer);
    assert!((after.x - anchor.x).abs() < 1e-9);
    assert!((after.y - anchor.y).abs() < 1e-9);

    view.wheel(pointer, -1.0e6);
    assert_eq!(view.zoom, EditorConfig::default().zoom_max);
    view.set_zoom(0.0);
    assert_eq!(view.zoom, EditorConfig::default().zoom_min);
}
