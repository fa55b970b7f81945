use std::sync::Arc;

use rayon::prelude::*;

use crate::{
    assets::{color::HexColor, decode::Raster, loader::ImageLoader, source::ImageSource},
    foundation::{
        core::{Affine, BezPath, CanvasSize, FrameRGBA},
        error::{LampError, LampResult},
    },
    render::{
        composite::{fill_over_in_place, over_in_place, premul, screen_in_place},
        layout::{LightCone, fit_rect, image_to_rect, lamp_box, sprite_transform},
        text::{PLACEHOLDER_FONT_PX, PLACEHOLDER_TEXT, TextBrushRgba8, TextLayoutEngine, draw_text},
    },
    settings::model::LampSettings,
};

/// Flat black at 30% opacity laid over the whole scene while the light is off.
pub const DIM_OVERLAY: [u8; 4] = [0, 0, 0, 77];

/// Color theme; only affects the placeholder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    /// Light placeholder.
    #[default]
    Light,
    /// Dark placeholder.
    Dark,
}

impl Theme {
    /// Theme for a dark-mode flag.
    pub fn from_dark_mode(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }

    /// Placeholder fill.
    pub fn placeholder_fill(self) -> HexColor {
        match self {
            Self::Light => HexColor::rgb(0xF3, 0xF4, 0xF6),
            Self::Dark => HexColor::rgb(0x1F, 0x29, 0x37),
        }
    }

    /// Placeholder text color.
    pub fn placeholder_text(self) -> HexColor {
        match self {
            Self::Light => HexColor::rgb(0x9C, 0xA3, 0xAF),
            Self::Dark => HexColor::rgb(0x4B, 0x55, 0x63),
        }
    }
}

/// What sits behind the scene when no background image is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Backdrop {
    /// Themed placeholder fill and message (on-screen).
    #[default]
    Placeholder,
    /// Nothing; used for exports so only real content is opaque.
    Transparent,
}

/// Target surface and styling for one render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderOptions {
    /// Canvas size in CSS pixels.
    pub canvas: CanvasSize,
    /// Device scale; the surface is `canvas * scale` pixels.
    pub scale: f64,
    /// Placeholder theme.
    pub theme: Theme,
    /// Backdrop mode.
    pub backdrop: Backdrop,
}

impl RenderOptions {
    /// On-screen options at scale 1 with the light theme.
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            canvas,
            scale: 1.0,
            theme: Theme::Light,
            backdrop: Backdrop::Placeholder,
        }
    }

    /// Builder-style scale override.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Builder-style theme override.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Builder-style backdrop override.
    pub fn with_backdrop(mut self, backdrop: Backdrop) -> Self {
        self.backdrop = backdrop;
        self
    }

    /// Device-scaled surface size.
    pub fn target_size(&self) -> LampResult<CanvasSize> {
        self.canvas
            .scaled(self.scale)
            .map_err(|e| LampError::canvas(e.to_string()))
    }
}

/// Decoded inputs for [`SceneRenderer::compose`].
#[derive(Clone, Copy, Debug)]
pub struct Scene<'a> {
    /// Lamp settings to draw.
    pub settings: &'a LampSettings,
    /// Room image; `None` draws the backdrop only.
    pub background: Option<&'a Raster>,
    /// Lamp sprite; `None` draws the background only.
    pub sprite: Option<&'a Raster>,
}

/// Undecoded inputs for [`SceneRenderer::render`].
#[derive(Clone, Copy, Debug)]
pub struct RenderRequest<'a> {
    /// Lamp settings to draw.
    pub settings: &'a LampSettings,
    /// Room image source.
    pub background: Option<&'a ImageSource>,
    /// Lamp sprite source.
    pub sprite: Option<&'a ImageSource>,
    /// Target surface and styling.
    pub options: RenderOptions,
}

/// A finished frame plus the decode failures that were recovered while producing it.
#[derive(Debug)]
pub struct RenderOutcome {
    /// The composited frame (premultiplied).
    pub frame: FrameRGBA,
    /// Background decode failure; the frame shows the backdrop instead.
    pub background_error: Option<LampError>,
    /// Sprite decode failure; the frame shows the background without lamp or light.
    pub sprite_error: Option<LampError>,
}

impl RenderOutcome {
    /// Whether both images (when requested) decoded.
    pub fn is_complete(&self) -> bool {
        self.background_error.is_none() && self.sprite_error.is_none()
    }
}

/// CPU scene compositor.
///
/// Each layer (backdrop, background, light cone, sprite) is rasterized into its own transparent
/// `vello_cpu` surface and composited onto the frame in order, so the light can use a screen blend
/// while everything else is plain source-over.
pub struct SceneRenderer {
    ctx: Option<vello_cpu::RenderContext>,
    text: TextLayoutEngine,
    placeholder_font: Option<Arc<[u8]>>,
}

impl Default for SceneRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneRenderer {
    /// A renderer without a placeholder font (the placeholder is drawn as a plain fill).
    pub fn new() -> Self {
        Self {
            ctx: None,
            text: TextLayoutEngine::new(),
            placeholder_font: None,
        }
    }

    /// Use `font_bytes` for the placeholder message.
    pub fn with_placeholder_font(mut self, font_bytes: impl Into<Arc<[u8]>>) -> Self {
        self.placeholder_font = Some(font_bytes.into());
        self
    }

    /// Decode the requested images, then composite.
    ///
    /// Background and sprite decode concurrently; compositing only starts once both are done and
    /// then runs background first. Decode failures are recovered and reported in the outcome; an
    /// unusable surface fails before any decoding starts.
    #[tracing::instrument(skip_all, fields(canvas_w = req.options.canvas.width, canvas_h = req.options.canvas.height))]
    pub fn render(
        &mut self,
        loader: &dyn ImageLoader,
        req: &RenderRequest<'_>,
    ) -> LampResult<RenderOutcome> {
        surface_dims(req.options.target_size()?)?;

        let (background, sprite) = rayon::join(
            || req.background.map(|s| loader.load(s)),
            || req.sprite.map(|s| loader.load(s)),
        );

        let (background, background_error) = split_decode(background, req.background, "background");
        let (sprite, sprite_error) = split_decode(sprite, req.sprite, "sprite");

        let frame = self.compose(
            &Scene {
                settings: req.settings,
                background: background.as_ref(),
                sprite: sprite.as_ref(),
            },
            &req.options,
        )?;

        Ok(RenderOutcome {
            frame,
            background_error,
            sprite_error,
        })
    }

    /// Composite already-decoded inputs into a new frame.
    pub fn compose(&mut self, scene: &Scene<'_>, opts: &RenderOptions) -> LampResult<FrameRGBA> {
        let target = opts.target_size()?;
        let (w16, h16) = surface_dims(target)?;
        let mut frame = FrameRGBA::transparent(target.width, target.height);

        let Some(background) = scene.background else {
            if opts.backdrop == Backdrop::Placeholder {
                self.draw_placeholder(&mut frame, opts, w16, h16)?;
            }
            return Ok(frame);
        };

        let dst = fit_rect(background.width, background.height, target);
        let layer = self.raster_layer(
            w16,
            h16,
            background,
            image_to_rect(background.width, background.height, dst),
        )?;
        over_in_place(&mut frame.data, &layer)?;

        let Some(sprite) = scene.sprite else {
            return Ok(frame);
        };

        let settings = scene.settings;
        let lamp = lamp_box(settings, sprite.aspect(), target);

        if settings.is_light_on {
            let cone = LightCone::new(settings, lamp, target);
            let layer = self.cone_layer(w16, h16, &cone, settings.light_color.light_apex())?;
            screen_in_place(&mut frame.data, &layer)?;
        }

        let layer = self.raster_layer(
            w16,
            h16,
            sprite,
            sprite_transform(sprite.width, sprite.height, lamp, settings.rotation),
        )?;
        over_in_place(&mut frame.data, &layer)?;

        if !settings.is_light_on {
            fill_over_in_place(&mut frame.data, DIM_OVERLAY)?;
        }

        Ok(frame)
    }

    fn draw_placeholder(
        &mut self,
        frame: &mut FrameRGBA,
        opts: &RenderOptions,
        w16: u16,
        h16: u16,
    ) -> LampResult<()> {
        fill_over_in_place(&mut frame.data, premul(opts.theme.placeholder_fill().to_array()))?;

        let Some(font) = self.placeholder_font.clone() else {
            return Ok(());
        };
        let size_px = PLACEHOLDER_FONT_PX * opts.scale as f32;
        let brush = TextBrushRgba8::from(opts.theme.placeholder_text().to_array());
        let shaped = match self.text.shape_line(PLACEHOLDER_TEXT, &font, size_px, brush) {
            Ok(shaped) => shaped,
            Err(e) => {
                tracing::warn!(error = %e, "placeholder text skipped");
                return Ok(());
            }
        };

        let x = (f64::from(w16) - f64::from(shaped.width())) / 2.0;
        let y = (f64::from(h16) - f64::from(shaped.height())) / 2.0;
        let layer = self.paint_layer(w16, h16, |ctx| {
            ctx.set_transform(affine_to_cpu(Affine::translate((x, y))));
            draw_text(ctx, &shaped);
            Ok(())
        })?;
        over_in_place(&mut frame.data, &layer)
    }

    fn raster_layer(
        &mut self,
        w16: u16,
        h16: u16,
        raster: &Raster,
        transform: Affine,
    ) -> LampResult<Vec<u8>> {
        let image = raster_to_image(raster)?;
        self.paint_layer(w16, h16, |ctx| {
            ctx.set_transform(affine_to_cpu(transform));
            ctx.set_paint(image);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(raster.width),
                f64::from(raster.height),
            ));
            Ok(())
        })
    }

    fn cone_layer(
        &mut self,
        w16: u16,
        h16: u16,
        cone: &LightCone,
        apex_color: HexColor,
    ) -> LampResult<Vec<u8>> {
        let gradient = radial_gradient_rgba8_premul(
            u32::from(w16),
            u32::from(h16),
            cone,
            premul(apex_color.to_array()),
        );
        let image = premul_bytes_to_image(&gradient, u32::from(w16), u32::from(h16))?;
        let path = bezpath_to_cpu(&cone.path());
        self.paint_layer(w16, h16, |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(image);
            ctx.fill_path(&path);
            Ok(())
        })
    }

    /// Run `draw` against a reset context and return the resulting premultiplied pixels.
    fn paint_layer(
        &mut self,
        w16: u16,
        h16: u16,
        draw: impl FnOnce(&mut vello_cpu::RenderContext) -> LampResult<()>,
    ) -> LampResult<Vec<u8>> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w16 && ctx.height() == h16 => ctx,
            _ => vello_cpu::RenderContext::new(w16, h16),
        };
        ctx.reset();
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        draw(&mut ctx)?;
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);
        Ok(pixmap.data_as_u8_slice().to_vec())
    }
}

fn split_decode(
    result: Option<LampResult<Raster>>,
    source: Option<&ImageSource>,
    role: &'static str,
) -> (Option<Raster>, Option<LampError>) {
    match result {
        None => (None, None),
        Some(Ok(raster)) => (Some(raster), None),
        Some(Err(e)) => {
            let what = source.map(ImageSource::describe).unwrap_or_default();
            tracing::warn!(role, source = %what, error = %e, "image decode failed; layer skipped");
            (None, Some(e))
        }
    }
}

fn surface_dims(size: CanvasSize) -> LampResult<(u16, u16)> {
    if size.is_empty() {
        return Err(LampError::canvas(format!(
            "surface {}x{} has no pixels",
            size.width, size.height
        )));
    }
    let w: u16 = size
        .width
        .try_into()
        .map_err(|_| LampError::canvas("surface width exceeds u16"))?;
    let h: u16 = size
        .height
        .try_into()
        .map_err(|_| LampError::canvas("surface height exceeds u16"))?;
    Ok((w, h))
}

/// Radial falloff from `start` at the apex to transparent at `cone.radius`, sampled at pixel
/// centers and interpolated in premultiplied space.
fn radial_gradient_rgba8_premul(width: u32, height: u32, cone: &LightCone, start: [u8; 4]) -> Vec<u8> {
    let mut bytes = vec![0u8; (width as usize) * (height as usize) * 4];
    let row_len = (width as usize) * 4;
    bytes
        .par_chunks_exact_mut(row_len.max(4))
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let p = crate::foundation::core::Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let k = 1.0 - cone.gradient_t(p);
                for (dst, &src) in px.iter_mut().zip(start.iter()) {
                    *dst = (f64::from(src) * k).round().clamp(0.0, 255.0) as u8;
                }
            }
        });
    bytes
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn raster_to_image(raster: &Raster) -> LampResult<vello_cpu::Image> {
    premul_bytes_to_image(&raster.rgba8_premul, raster.width, raster.height)
}

fn premul_bytes_to_image(bytes: &[u8], width: u32, height: u32) -> LampResult<vello_cpu::Image> {
    let w: u16 = width
        .try_into()
        .map_err(|_| LampError::canvas("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| LampError::canvas("image height exceeds u16"))?;
    if bytes.len() != (width as usize) * (height as usize) * 4 {
        return Err(LampError::canvas("image byte length mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
