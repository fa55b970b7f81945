use std::collections::HashMap;

use super::*;
use crate::foundation::core::NormPoint;

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> Raster {
    let data = rgba
        .iter()
        .copied()
        .cycle()
        .take((w * h * 4) as usize)
        .collect();
    Raster::from_straight(w, h, data).unwrap()
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= 2)
}

fn opts(w: u32, h: u32) -> RenderOptions {
    RenderOptions::new(CanvasSize::new(w, h))
}

#[test]
fn placeholder_fill_follows_theme() {
    let settings = LampSettings::default();
    let scene = Scene {
        settings: &settings,
        background: None,
        sprite: None,
    };
    let mut r = SceneRenderer::new();

    let light = r.compose(&scene, &opts(40, 20)).unwrap();
    assert_eq!(light.pixel(0, 0), Some([0xF3, 0xF4, 0xF6, 255]));
    assert_eq!(light.pixel(39, 19), Some([0xF3, 0xF4, 0xF6, 255]));

    let dark = r
        .compose(&scene, &opts(40, 20).with_theme(Theme::Dark))
        .unwrap();
    assert_eq!(dark.pixel(20, 10), Some([0x1F, 0x29, 0x37, 255]));
}

#[test]
fn sprite_without_background_is_never_drawn() {
    let settings = LampSettings::default();
    let sprite = solid(4, 4, [0, 0, 255, 255]);
    let scene = Scene {
        settings: &settings,
        background: None,
        sprite: Some(&sprite),
    };
    let frame = SceneRenderer::new().compose(&scene, &opts(100, 100)).unwrap();
    assert_eq!(frame.pixel(50, 50), Some([0xF3, 0xF4, 0xF6, 255]));
}

#[test]
fn transparent_backdrop_without_background_is_empty() {
    let settings = LampSettings::default();
    let scene = Scene {
        settings: &settings,
        background: None,
        sprite: None,
    };
    let frame = SceneRenderer::new()
        .compose(&scene, &opts(30, 30).with_backdrop(Backdrop::Transparent))
        .unwrap();
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn background_is_fitted_and_centered() {
    let settings = LampSettings::default();
    let bg = solid(2, 1, [255, 0, 0, 255]);
    let scene = Scene {
        settings: &settings,
        background: Some(&bg),
        sprite: None,
    };
    let frame = SceneRenderer::new()
        .compose(&scene, &opts(100, 100).with_backdrop(Backdrop::Transparent))
        .unwrap();
    // 2:1 image in a square canvas occupies rows 25..75.
    assert!(close(frame.pixel(50, 50).unwrap(), [255, 0, 0, 255]));
    assert!(close(frame.pixel(1, 30).unwrap(), [255, 0, 0, 255]));
    assert_eq!(frame.pixel(50, 5), Some([0, 0, 0, 0]));
    assert_eq!(frame.pixel(50, 95), Some([0, 0, 0, 0]));
}

#[test]
fn background_only_scene_is_not_dimmed() {
    let settings = LampSettings {
        is_light_on: false,
        ..LampSettings::default()
    };
    let bg = solid(4, 4, [200, 200, 200, 255]);
    let scene = Scene {
        settings: &settings,
        background: Some(&bg),
        sprite: None,
    };
    let frame = SceneRenderer::new().compose(&scene, &opts(50, 50)).unwrap();
    assert!(close(frame.pixel(25, 25).unwrap(), [200, 200, 200, 255]));
}

#[test]
fn light_off_dims_scene_and_lamp() {
    let settings = LampSettings {
        is_light_on: false,
        ..LampSettings::default()
    };
    let bg = solid(4, 4, [255, 255, 255, 255]);
    let sprite = solid(4, 4, [0, 0, 255, 255]);
    let scene = Scene {
        settings: &settings,
        background: Some(&bg),
        sprite: Some(&sprite),
    };
    let frame = SceneRenderer::new().compose(&scene, &opts(100, 100)).unwrap();
    assert!(close(frame.pixel(5, 5).unwrap(), [178, 178, 178, 255]));
    assert!(close(frame.pixel(50, 50).unwrap(), [0, 0, 178, 255]));
}

#[test]
fn light_cone_brightens_below_lamp_only() {
    let settings = LampSettings::default();
    let bg = solid(4, 4, [50, 50, 50, 255]);
    let sprite = solid(10, 10, [0, 0, 255, 255]);
    let scene = Scene {
        settings: &settings,
        background: Some(&bg),
        sprite: Some(&sprite),
    };
    let frame = SceneRenderer::new().compose(&scene, &opts(100, 100)).unwrap();

    // Default lamp box spans 35..65; the apex sits on its bottom edge at (50, 65).
    let lit = frame.pixel(50, 75).unwrap();
    assert!(lit[0] > 60 && lit[1] > 60, "{lit:?}");
    assert!(lit[0] > lit[2] && lit[1] > lit[2], "{lit:?}");
    assert_eq!(lit[3], 255);

    assert!(close(frame.pixel(2, 2).unwrap(), [50, 50, 50, 255]));
    assert!(close(frame.pixel(97, 20).unwrap(), [50, 50, 50, 255]));
    assert!(close(frame.pixel(50, 50).unwrap(), [0, 0, 255, 255]));
}

#[test]
fn rotation_turns_sprite_about_box_center() {
    let bg = solid(4, 4, [255, 255, 255, 255]);
    let sprite = solid(10, 40, [0, 0, 0, 255]);
    let base = LampSettings {
        size: 10.0,
        position: NormPoint::new(50.0, 50.0),
        ..LampSettings::default()
    };
    let mut r = SceneRenderer::new();
    let o = opts(200, 200).with_backdrop(Backdrop::Transparent);

    // Box is 20x80 around (100, 100).
    let upright = r
        .compose(
            &Scene {
                settings: &base,
                background: Some(&bg),
                sprite: Some(&sprite),
            },
            &o,
        )
        .unwrap();
    assert!(close(upright.pixel(100, 70).unwrap(), [0, 0, 0, 255]));
    assert!(close(upright.pixel(130, 100).unwrap(), [255, 255, 255, 255]));

    let turned_settings = LampSettings {
        rotation: 90.0,
        is_light_on: true,
        ..base
    };
    let turned = r
        .compose(
            &Scene {
                settings: &turned_settings,
                background: Some(&bg),
                sprite: Some(&sprite),
            },
            &o,
        )
        .unwrap();
    assert!(close(turned.pixel(130, 100).unwrap(), [0, 0, 0, 255]));
    assert!(close(turned.pixel(100, 70).unwrap(), [255, 255, 255, 255]));
}

#[test]
fn scale_multiplies_surface_size() {
    let settings = LampSettings::default();
    let scene = Scene {
        settings: &settings,
        background: None,
        sprite: None,
    };
    let frame = SceneRenderer::new()
        .compose(&scene, &opts(30, 20).with_scale(2.0))
        .unwrap();
    assert_eq!((frame.width, frame.height), (60, 40));
    assert!(frame.premultiplied);
}

#[test]
fn unusable_surface_is_canvas_error() {
    let settings = LampSettings::default();
    let scene = Scene {
        settings: &settings,
        background: None,
        sprite: None,
    };
    let mut r = SceneRenderer::new();
    for o in [opts(0, 10), opts(70_000, 10), opts(10, 10).with_scale(0.0)] {
        let err = r.compose(&scene, &o).unwrap_err();
        assert!(matches!(err, LampError::CanvasContextUnavailable(_)), "{err}");
    }
}

#[test]
fn invalid_placeholder_font_falls_back_to_fill() {
    let settings = LampSettings::default();
    let scene = Scene {
        settings: &settings,
        background: None,
        sprite: None,
    };
    let mut r = SceneRenderer::new().with_placeholder_font(vec![1u8, 2, 3, 4]);
    let frame = r.compose(&scene, &opts(40, 20)).unwrap();
    assert!(
        frame
            .data
            .chunks_exact(4)
            .all(|px| px == [0xF3, 0xF4, 0xF6, 255])
    );
}

struct MapLoader(HashMap<u64, LampResult<Raster>>);

impl ImageLoader for MapLoader {
    fn load(&self, source: &ImageSource) -> LampResult<Raster> {
        match self.0.get(&source.cache_key()) {
            Some(Ok(r)) => Ok(r.clone()),
            _ => Err(LampError::decode(format!("no image for {}", source.describe()))),
        }
    }
}

#[test]
fn render_recovers_from_sprite_decode_failure() {
    let bg_src = ImageSource::File("room.png".into());
    let sprite_src = ImageSource::File("broken.png".into());
    let loader = MapLoader(HashMap::from([(
        bg_src.cache_key(),
        Ok(solid(4, 4, [10, 20, 30, 255])),
    )]));
    let settings = LampSettings {
        is_light_on: false,
        ..LampSettings::default()
    };
    let out = SceneRenderer::new()
        .render(
            &loader,
            &RenderRequest {
                settings: &settings,
                background: Some(&bg_src),
                sprite: Some(&sprite_src),
                options: opts(50, 50),
            },
        )
        .unwrap();
    assert!(out.background_error.is_none());
    assert!(matches!(out.sprite_error, Some(LampError::ImageDecode(_))));
    assert!(!out.is_complete());
    // Background only: no lamp and no dim overlay.
    assert!(close(out.frame.pixel(25, 25).unwrap(), [10, 20, 30, 255]));
}

#[test]
fn render_keeps_placeholder_when_background_fails() {
    let bg_src = ImageSource::File("missing.png".into());
    let loader = MapLoader(HashMap::new());
    let settings = LampSettings::default();
    let out = SceneRenderer::new()
        .render(
            &loader,
            &RenderRequest {
                settings: &settings,
                background: Some(&bg_src),
                sprite: None,
                options: opts(20, 20).with_theme(Theme::Dark),
            },
        )
        .unwrap();
    assert!(out.background_error.is_some());
    assert!(out.sprite_error.is_none());
    assert_eq!(out.frame.pixel(10, 10), Some([0x1F, 0x29, 0x37, 255]));
}

#[test]
fn render_fails_fast_on_unusable_surface() {
    let loader = MapLoader(HashMap::new());
    let settings = LampSettings::default();
    let err = SceneRenderer::new()
        .render(
            &loader,
            &RenderRequest {
                settings: &settings,
                background: None,
                sprite: None,
                options: opts(0, 0),
            },
        )
        .unwrap_err();
    assert!(matches!(err, LampError::CanvasContextUnavailable(_)));
}

#[test]
fn radial_gradient_fades_from_apex() {
    let cone = LightCone {
        apex: crate::foundation::core::Point::new(0.5, 0.5),
        base_left: crate::foundation::core::Point::new(0.0, 10.0),
        base_right: crate::foundation::core::Point::new(10.0, 10.0),
        radius: 4.0,
    };
    let bytes = radial_gradient_rgba8_premul(10, 1, &cone, [200, 100, 0, 200]);
    assert_eq!(&bytes[0..4], &[200, 100, 0, 200]);
    assert_eq!(&bytes[8..12], &[100, 50, 0, 100]);
    assert_eq!(&bytes[16..20], &[0, 0, 0, 0]);
    assert_eq!(&bytes[36..40], &[0, 0, 0, 0]);
}
