use crate::{
    foundation::core::{Affine, BezPath, CanvasSize, Point, Rect, Vec2},
    settings::model::LampSettings,
};

/// Where a `img_w x img_h` image lands when fitted into `canvas`: uniform scale
/// `min(cw / iw, ch / ih)`, centered, no cropping.
pub fn fit_rect(img_w: u32, img_h: u32, canvas: CanvasSize) -> Rect {
    let (iw, ih) = (f64::from(img_w), f64::from(img_h));
    if iw <= 0.0 || ih <= 0.0 {
        return Rect::ZERO;
    }
    let scale = (canvas.w() / iw).min(canvas.h() / ih);
    let (w, h) = (iw * scale, ih * scale);
    let x = (canvas.w() - w) / 2.0;
    let y = (canvas.h() - h) / 2.0;
    Rect::new(x, y, x + w, y + h)
}

/// Transform mapping image pixel space onto `dst`.
pub fn image_to_rect(img_w: u32, img_h: u32, dst: Rect) -> Affine {
    let sx = dst.width() / f64::from(img_w.max(1));
    let sy = dst.height() / f64::from(img_h.max(1));
    Affine::translate(Vec2::new(dst.x0, dst.y0)) * Affine::scale_non_uniform(sx, sy)
}

/// The drawn lamp box: `size` percent of the canvas width, height following the sprite's own
/// aspect ratio (`sprite_aspect = h / w`), centered on the lamp position.
pub fn lamp_box(settings: &LampSettings, sprite_aspect: f64, canvas: CanvasSize) -> Rect {
    let w = settings.size / 100.0 * canvas.w();
    let h = w * sprite_aspect;
    let center = settings.position.to_pixels(canvas);
    Rect::new(
        center.x - w / 2.0,
        center.y - h / 2.0,
        center.x + w / 2.0,
        center.y + h / 2.0,
    )
}

/// Transform placing a `img_w x img_h` sprite into `lamp`, rotated clockwise by `rotation_deg`
/// about the box center.
pub fn sprite_transform(img_w: u32, img_h: u32, lamp: Rect, rotation_deg: f64) -> Affine {
    let center = lamp.center();
    let half = Vec2::new(lamp.width() / 2.0, lamp.height() / 2.0);
    Affine::translate(center.to_vec2())
        * Affine::rotate(rotation_deg.to_radians())
        * Affine::translate(-half)
        * Affine::scale_non_uniform(
            lamp.width() / f64::from(img_w.max(1)),
            lamp.height() / f64::from(img_h.max(1)),
        )
}

/// Geometry of the light cone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightCone {
    /// Cone tip and gradient center.
    pub apex: Point,
    /// Bottom-left corner, on the canvas bottom edge.
    pub base_left: Point,
    /// Bottom-right corner, on the canvas bottom edge.
    pub base_right: Point,
    /// Gradient radius: fully transparent at this distance from the apex.
    pub radius: f64,
}

impl LightCone {
    /// Cone for `settings` given the drawn lamp box.
    ///
    /// The apex sits on the box's vertical center line, `light_start_y` percent of the box height
    /// down from its top. The base spans `light_width / 200` of the canvas width each side.
    pub fn new(settings: &LampSettings, lamp: Rect, canvas: CanvasSize) -> Self {
        let apex = Point::new(
            lamp.center().x,
            lamp.y0 + settings.light_start_y / 100.0 * lamp.height(),
        );
        let half_base = canvas.w() * settings.light_width / 200.0;
        Self {
            apex,
            base_left: Point::new(apex.x - half_base, canvas.h()),
            base_right: Point::new(apex.x + half_base, canvas.h()),
            radius: canvas.h() * settings.light_width / 100.0,
        }
    }

    /// Closed triangle path.
    pub fn path(&self) -> BezPath {
        let mut p = BezPath::new();
        p.move_to(self.apex);
        p.line_to(self.base_left);
        p.line_to(self.base_right);
        p.close_path();
        p
    }

    /// Gradient position in `[0, 1]` at `p`: 0 at the apex, 1 at `radius` and beyond.
    pub fn gradient_t(&self, p: Point) -> f64 {
        if self.radius <= 0.0 {
            return 1.0;
        }
        (p.distance(self.apex) / self.radius).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
