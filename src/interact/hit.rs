use crate::{
    foundation::core::{CanvasSize, NormPoint, Point, Rect},
    settings::model::LampSettings,
};

/// Map a canvas pixel position to normalized (percent) coordinates.
///
/// Not clamped: points outside the canvas map outside `[0, 100]`. An empty canvas maps
/// everything to the origin.
pub fn to_normalized(p: Point, canvas: CanvasSize) -> NormPoint {
    if canvas.is_empty() {
        return NormPoint::new(0.0, 0.0);
    }
    NormPoint::new(p.x / canvas.w() * 100.0, p.y / canvas.h() * 100.0)
}

/// The clickable box of the lamp, in canvas pixels.
///
/// `size` percent of the canvas width by `size` percent of the canvas height, centered on the lamp
/// position. Rotation is not applied and neither is the sprite's aspect ratio, so at steep angles
/// or for tall sprites the box and the drawn sprite disagree.
pub fn lamp_hit_box(settings: &LampSettings, canvas: CanvasSize) -> Rect {
    let w = settings.size / 100.0 * canvas.w();
    let h = settings.size / 100.0 * canvas.h();
    let center = settings.position.to_pixels(canvas);
    Rect::new(
        center.x - w / 2.0,
        center.y - h / 2.0,
        center.x + w / 2.0,
        center.y + h / 2.0,
    )
}

/// Whether `p` falls inside the lamp's hit box. Edges count as inside.
pub fn hit_test(p: Point, settings: &LampSettings, canvas: CanvasSize) -> bool {
    let b = lamp_hit_box(settings, canvas);
    p.x >= b.x0 && p.x <= b.x1 && p.y >= b.y0 && p.y <= b.y1
}

#[cfg(test)]
#[path = "../../tests/unit/interact/hit.rs"]
mod tests;
