use std::io::Cursor;

use super::*;
use crate::{
    export::share::{ShareMetadata, ShareStatus, UnsupportedShareSink},
    foundation::{core::CanvasSize, error::LampError},
    interact::drag::DragState,
};

fn png(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn session(w: u32, h: u32) -> LampSession {
    let config = SessionConfig {
        canvas: CanvasSize::new(w, h),
        ..SessionConfig::default()
    };
    LampSession::new(config).unwrap()
}

fn with_lamp(w: u32, h: u32) -> LampSession {
    let mut s = session(w, h);
    assert!(s.upload_background("image/png", "room.png", png(4, 2, [200, 200, 200, 255])));
    assert!(s.upload_sprite("image/png", "lamp.png", png(4, 4, [0, 0, 255, 255])));
    s
}

#[test]
fn non_image_upload_is_ignored() {
    let mut s = session(100, 100);
    assert!(!s.upload_background("text/plain", "notes.txt", b"hello".to_vec()));
    assert!(!s.upload_sprite("application/pdf", "x.pdf", vec![1, 2, 3]));
    assert!(s.background().is_none());
    assert!(s.sprite().is_none());
}

#[test]
fn press_is_ignored_without_a_sprite() {
    let mut s = session(400, 200);
    assert!(!s.pointer_down(Point::new(200.0, 100.0)));
    assert_eq!(s.drag().state(), DragState::Idle);
}

#[test]
fn press_is_ignored_when_sprite_fails_to_decode() {
    let mut s = session(400, 200);
    assert!(s.upload_sprite("image/png", "broken.png", vec![0, 1, 2]));
    assert!(!s.sprite_loaded());
    assert!(!s.pointer_down(Point::new(200.0, 100.0)));
}

#[test]
fn drag_moves_lamp_and_records_history() {
    let mut s = with_lamp(400, 200);
    assert!(s.pointer_down(Point::new(210.0, 95.0)));
    assert!(s.pointer_move(Point::new(220.0, 95.0)));
    assert!(s.pointer_move(Point::new(230.0, 95.0)));
    s.pointer_up();

    assert!((s.settings().position.x - 55.0).abs() < 1e-9);
    assert_eq!(s.settings().position.y, 50.0);
    assert_eq!(s.store().len(), 3);
    assert!(!s.pointer_move(Point::new(300.0, 95.0)));

    s.undo();
    assert!((s.settings().position.x - 52.5).abs() < 1e-9);
    s.redo();
    assert!((s.settings().position.x - 55.0).abs() < 1e-9);
}

#[test]
fn pointer_leave_ends_drag() {
    let mut s = with_lamp(400, 200);
    assert!(s.pointer_down(Point::new(200.0, 100.0)));
    s.pointer_leave();
    assert!(!s.drag().is_dragging());
}

#[test]
fn preset_selection_validates_index() {
    let mut s = session(100, 100);
    s.select_preset(3).unwrap();
    assert_eq!(
        s.sprite().map(ImageSource::describe).as_deref(),
        Some("preset lamp 3")
    );
    assert!(matches!(s.select_preset(0), Err(LampError::Validation(_))));
    assert!(matches!(s.select_preset(4), Err(LampError::Validation(_))));
}

#[test]
fn dark_mode_changes_placeholder() {
    let mut s = session(20, 10);
    assert!(!s.is_dark_mode());
    let light = s.render().unwrap();
    assert_eq!(light.frame.pixel(0, 0), Some([0xF3, 0xF4, 0xF6, 255]));

    assert!(s.toggle_dark_mode());
    let dark = s.render().unwrap();
    assert_eq!(dark.frame.pixel(0, 0), Some([0x1F, 0x29, 0x37, 255]));
    assert_eq!(s.latest_frame(), Some(dark.frame));
}

#[test]
fn render_publishes_its_own_ticket() {
    let mut s = session(20, 10);
    s.render().unwrap();
    let ticket = s.scheduler().latest_ticket().unwrap();
    assert!(s.scheduler().is_current(ticket));

    // A ticket begun elsewhere is superseded by the next render and cannot overwrite its frame.
    let external = s.scheduler().begin();
    assert!(!s.scheduler().is_current(ticket));
    let fresh = s.render().unwrap();
    assert!(!s.scheduler().complete(external, fresh.frame.clone()));
    assert_eq!(s.latest_frame(), Some(fresh.frame));
}

#[test]
fn render_uses_device_scale() {
    let config = SessionConfig {
        canvas: CanvasSize::new(30, 20),
        device_scale: 2.0,
        ..SessionConfig::default()
    };
    let mut s = LampSession::new(config).unwrap();
    let out = s.render().unwrap();
    assert_eq!((out.frame.width, out.frame.height), (60, 40));
}

#[test]
fn export_without_content_is_empty_export() {
    let mut s = session(50, 50);
    let err = s.export_png().unwrap_err();
    assert!(matches!(err, LampError::EmptyExport));
    assert!(err.is_user_facing());
}

#[test]
fn export_is_trimmed_to_visible_content_at_export_scale() {
    // At 2x the 4x2 room covers rows 50..150 of a 200x200 surface. The lamp box spans rows
    // 70..130 and the light cone runs from its bottom edge down to the last row.
    let mut s = with_lamp(100, 100);
    let frame = s.export_frame().unwrap();
    assert_eq!((frame.width, frame.height), (200, 150));

    let png_bytes = s.export_png().unwrap();
    let decoded = image::load_from_memory(&png_bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (200, 150));
}

#[test]
fn export_with_light_off_keeps_whole_dimmed_canvas() {
    let mut s = with_lamp(100, 100);
    s.apply_action(&LampAction::ToggleLight);
    let frame = s.export_frame().unwrap();
    assert_eq!((frame.width, frame.height), (200, 200));
}

#[test]
fn reset_restores_defaults() {
    let mut s = session(100, 100);
    s.apply_action(&LampAction::Rotate);
    s.apply(&LampPatch {
        size: Some(80.0),
        ..LampPatch::default()
    });
    s.undo();
    s.reset();
    assert_eq!(s.settings(), &LampSettings::default());
    assert_eq!(s.store().len(), 1);
}

#[derive(Default)]
struct Recorder {
    shares: Vec<(Vec<u8>, ShareMetadata)>,
}

impl ShareSink for Recorder {
    fn share(&mut self, bytes: &[u8], metadata: &ShareMetadata) -> LampResult<ShareStatus> {
        self.shares.push((bytes.to_vec(), metadata.clone()));
        Ok(ShareStatus::Shared)
    }
}

#[test]
fn share_sends_on_screen_frame() {
    let mut s = with_lamp(40, 30);
    let mut sink = Recorder::default();
    s.share(&mut sink).unwrap();

    assert_eq!(sink.shares.len(), 1);
    let (bytes, meta) = &sink.shares[0];
    assert_eq!(meta.mime, "image/png");
    let decoded = image::load_from_memory(bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (40, 30));
}

#[test]
fn share_without_capability_reports_failure() {
    let mut s = with_lamp(40, 30);
    let err = s.share(&mut UnsupportedShareSink).unwrap_err();
    assert!(matches!(err, LampError::ShareUnsupported));
}

#[test]
fn missing_placeholder_font_fails_session_creation() {
    let config = SessionConfig {
        placeholder_font: Some("definitely/not/here.ttf".into()),
        ..SessionConfig::default()
    };
    assert!(matches!(LampSession::new(config), Err(LampError::Other(_))));
}
