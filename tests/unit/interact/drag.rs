use super::*;

const CANVAS: CanvasSize = CanvasSize {
    width: 400,
    height: 200,
};

#[test]
fn press_outside_lamp_stays_idle() {
    let store = SettingsStore::default();
    let mut drag = DragController::new();
    // Default lamp box on 400x200 spans x 140..=260, y 70..=130.
    assert!(!drag.press(Point::new(10.0, 10.0), &store, CANVAS));
    assert_eq!(drag.state(), DragState::Idle);
}

#[test]
fn move_while_idle_changes_nothing() {
    let mut store = SettingsStore::default();
    let mut drag = DragController::new();
    assert!(!drag.move_to(Point::new(300.0, 100.0), &mut store, CANVAS));
    assert_eq!(store.len(), 1);
}

#[test]
fn drag_delta_is_independent_of_grab_point() {
    for grab in [Point::new(150.0, 100.0), Point::new(250.0, 125.0)] {
        let mut store = SettingsStore::default();
        let mut drag = DragController::new();
        assert!(drag.press(grab, &store, CANVAS));

        drag.move_to(Point::new(grab.x + 10.0, grab.y), &mut store, CANVAS);
        let pos = store.current().position;
        assert!((pos.x - 52.5).abs() < 1e-9, "x was {}", pos.x);
        assert!((pos.y - 50.0).abs() < 1e-9);
    }
}

#[test]
fn deltas_are_incremental_and_each_move_is_a_history_entry() {
    let mut store = SettingsStore::default();
    let mut drag = DragController::new();
    drag.press(Point::new(200.0, 100.0), &store, CANVAS);

    drag.move_to(Point::new(210.0, 100.0), &mut store, CANVAS);
    drag.move_to(Point::new(220.0, 110.0), &mut store, CANVAS);
    drag.move_to(Point::new(220.0, 110.0), &mut store, CANVAS);

    let pos = store.current().position;
    assert!((pos.x - 55.0).abs() < 1e-9);
    assert!((pos.y - 55.0).abs() < 1e-9);
    assert_eq!(store.len(), 4);
    assert_eq!(
        drag.state(),
        DragState::Dragging {
            anchor: Point::new(220.0, 110.0)
        }
    );
}

#[test]
fn position_is_clamped_while_dragging() {
    let mut store = SettingsStore::default();
    let mut drag = DragController::new();
    drag.press(Point::new(200.0, 100.0), &store, CANVAS);
    drag.move_to(Point::new(2000.0, -900.0), &mut store, CANVAS);
    assert_eq!(store.current().position, NormPoint::new(100.0, 0.0));
}

#[test]
fn non_finite_pointer_keeps_previous_axis_value() {
    let mut store = SettingsStore::default();
    let mut drag = DragController::new();
    assert!(drag.press(Point::new(200.0, 100.0), &store, CANVAS));

    drag.move_to(Point::new(f64::NAN, 110.0), &mut store, CANVAS);
    let pos = store.current().position;
    assert_eq!(pos.x, 50.0);
    assert!((pos.y - 55.0).abs() < 1e-9, "y was {}", pos.y);

    // The anchor stayed at the last finite point.
    drag.move_to(Point::new(210.0, 100.0), &mut store, CANVAS);
    let pos = store.current().position;
    assert!((pos.x - 52.5).abs() < 1e-9, "x was {}", pos.x);
    assert!((pos.y - 55.0).abs() < 1e-9, "y was {}", pos.y);
}

#[test]
fn release_and_leave_end_the_session() {
    let mut store = SettingsStore::default();
    let mut drag = DragController::new();

    drag.press(Point::new(200.0, 100.0), &store, CANVAS);
    drag.release();
    assert!(!drag.is_dragging());
    assert!(!drag.move_to(Point::new(260.0, 100.0), &mut store, CANVAS));

    drag.press(Point::new(200.0, 100.0), &store, CANVAS);
    drag.leave();
    assert_eq!(drag.state(), DragState::Idle);

    drag.release();
    assert_eq!(drag.state(), DragState::Idle);
}
