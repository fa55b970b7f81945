//! The interactive session: one object per visualizer view.

use std::sync::Arc;

use anyhow::Context as _;

use crate::{
    assets::{
        loader::{CachingLoader, FsImageLoader, ImageLoader},
        source::{ImageSource, LampPreset, accept_upload},
    },
    export::{
        png::encode_png,
        share::{ShareSink, share_png},
        trim::trim,
    },
    foundation::{
        config::SessionConfig,
        core::{FrameRGBA, Point},
        error::LampResult,
    },
    interact::drag::DragController,
    render::{
        cpu::{Backdrop, RenderOptions, RenderOutcome, RenderRequest, SceneRenderer, Theme},
        scheduler::RenderScheduler,
    },
    settings::{
        model::{LampAction, LampPatch, LampSettings},
        store::SettingsStore,
    },
};

/// Everything one visualizer view holds: settings history, drag state, the two image slots and
/// the renderer.
///
/// Methods mirror UI events. Pointer coordinates are CSS pixels on [`SessionConfig::canvas`].
pub struct LampSession<L = CachingLoader<FsImageLoader>> {
    config: SessionConfig,
    store: SettingsStore,
    drag: DragController,
    background: Option<ImageSource>,
    sprite: Option<ImageSource>,
    dark_mode: bool,
    loader: L,
    renderer: SceneRenderer,
    scheduler: RenderScheduler,
}

impl LampSession {
    /// A session loading images from disk under `config.assets_root`, keeping up to
    /// `config.image_cache_capacity` decoded images cached.
    pub fn new(config: SessionConfig) -> LampResult<Self> {
        let loader = CachingLoader::with_capacity(
            FsImageLoader::new(config.assets_root.clone()),
            config.image_cache_capacity,
        );
        Self::with_loader(config, loader)
    }
}

impl<L: ImageLoader> LampSession<L> {
    /// A session using a custom image loader.
    pub fn with_loader(config: SessionConfig, loader: L) -> LampResult<Self> {
        config.validate()?;

        let mut renderer = SceneRenderer::new();
        if let Some(path) = &config.placeholder_font {
            let bytes = std::fs::read(path)
                .with_context(|| format!("read placeholder font '{}'", path.display()))?;
            renderer = renderer.with_placeholder_font(Arc::<[u8]>::from(bytes));
        }

        Ok(Self {
            dark_mode: config.dark_mode,
            config,
            store: SettingsStore::default(),
            drag: DragController::new(),
            background: None,
            sprite: None,
            loader,
            renderer,
            scheduler: RenderScheduler::new(),
        })
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current lamp settings.
    pub fn settings(&self) -> &LampSettings {
        self.store.current()
    }

    /// The settings history.
    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    /// Drag controller state.
    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Merge a partial update (one history entry).
    pub fn apply(&mut self, patch: &LampPatch) -> &LampSettings {
        self.store.apply(patch)
    }

    /// Apply a discrete action (one history entry).
    pub fn apply_action(&mut self, action: &LampAction) -> &LampSettings {
        self.store.apply_action(action)
    }

    /// Step back in history.
    pub fn undo(&mut self) -> &LampSettings {
        self.store.undo()
    }

    /// Step forward in history.
    pub fn redo(&mut self) -> &LampSettings {
        self.store.redo()
    }

    /// Back to default settings with a fresh history.
    pub fn reset(&mut self) -> &LampSettings {
        self.store.reset()
    }

    /// Replace the whole history with a single snapshot, e.g. settings loaded from a file.
    pub fn load_settings(&mut self, settings: LampSettings) {
        self.store = SettingsStore::starting_at(settings);
    }

    /// Current room image source.
    pub fn background(&self) -> Option<&ImageSource> {
        self.background.as_ref()
    }

    /// Set or clear the room image.
    pub fn set_background(&mut self, source: Option<ImageSource>) {
        self.background = source;
    }

    /// Current lamp sprite source.
    pub fn sprite(&self) -> Option<&ImageSource> {
        self.sprite.as_ref()
    }

    /// Set or clear the lamp sprite.
    pub fn set_sprite(&mut self, source: Option<ImageSource>) {
        self.drag.release();
        self.sprite = source;
    }

    /// Use bundled lamp `index` (1-based).
    pub fn select_preset(&mut self, index: u8) -> LampResult<()> {
        let preset = LampPreset::from_index(index)?;
        self.set_sprite(Some(ImageSource::Preset(preset)));
        Ok(())
    }

    /// Offer an uploaded file as the room image. Non-image MIME types are ignored.
    pub fn upload_background(&mut self, mime: &str, name: &str, bytes: Vec<u8>) -> bool {
        match accept_upload(mime, name, bytes) {
            Some(source) => {
                self.set_background(Some(source));
                true
            }
            None => false,
        }
    }

    /// Offer an uploaded file as the lamp sprite. Non-image MIME types are ignored.
    pub fn upload_sprite(&mut self, mime: &str, name: &str, bytes: Vec<u8>) -> bool {
        match accept_upload(mime, name, bytes) {
            Some(source) => {
                self.set_sprite(Some(source));
                true
            }
            None => false,
        }
    }

    /// Whether a lamp sprite is set and decodes.
    pub fn sprite_loaded(&self) -> bool {
        self.sprite
            .as_ref()
            .is_some_and(|s| self.loader.load(s).is_ok())
    }

    /// Dark-mode flag.
    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Flip dark mode. Returns the new value.
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }

    /// Pointer pressed. Starts a drag when a lamp is on screen and the press hits it.
    pub fn pointer_down(&mut self, p: Point) -> bool {
        if !self.sprite_loaded() {
            return false;
        }
        self.drag.press(p, &self.store, self.config.canvas)
    }

    /// Pointer moved. Returns whether the lamp moved.
    pub fn pointer_move(&mut self, p: Point) -> bool {
        self.drag.move_to(p, &mut self.store, self.config.canvas)
    }

    /// Pointer released.
    pub fn pointer_up(&mut self) {
        self.drag.release();
    }

    /// Pointer left the canvas.
    pub fn pointer_leave(&mut self) {
        self.drag.leave();
    }

    /// Options for the on-screen canvas.
    pub fn screen_options(&self) -> RenderOptions {
        RenderOptions::new(self.config.canvas)
            .with_scale(self.config.device_scale)
            .with_theme(Theme::from_dark_mode(self.dark_mode))
    }

    /// Options for exports: export scale, no placeholder.
    pub fn export_options(&self) -> RenderOptions {
        RenderOptions::new(self.config.canvas)
            .with_scale(self.config.export_scale)
            .with_theme(Theme::from_dark_mode(self.dark_mode))
            .with_backdrop(Backdrop::Transparent)
    }

    /// Render the on-screen frame and publish it through the scheduler.
    ///
    /// The render runs synchronously under `&mut self`, so no newer ticket can be issued by this
    /// session before it completes and the frame is always published. Tickets begun elsewhere on
    /// [`scheduler`](Self::scheduler) can supersede it; the outcome is still returned, but
    /// [`latest_frame`](Self::latest_frame) keeps the newer frame.
    pub fn render(&mut self) -> LampResult<RenderOutcome> {
        let ticket = self.scheduler.begin();
        let options = self.screen_options();
        let outcome = self.render_with(options)?;
        if !self.scheduler.complete(ticket, outcome.frame.clone()) {
            tracing::debug!(ticket = ticket.get(), "on-screen frame superseded");
        }
        Ok(outcome)
    }

    /// The most recently published on-screen frame.
    pub fn latest_frame(&self) -> Option<FrameRGBA> {
        self.scheduler.latest_frame()
    }

    /// The render scheduler guarding on-screen frames.
    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    /// Render at export scale on a transparent backdrop, trim to content, and encode as PNG.
    #[tracing::instrument(skip(self))]
    pub fn export_png(&mut self) -> LampResult<Vec<u8>> {
        let frame = self.export_frame()?;
        encode_png(&frame)
    }

    /// The trimmed export raster, before encoding.
    pub fn export_frame(&mut self) -> LampResult<FrameRGBA> {
        let options = self.export_options();
        let outcome = self.render_with(options)?;
        trim(&outcome.frame)
    }

    /// Share the current on-screen frame as a PNG through `sink`.
    #[tracing::instrument(skip_all)]
    pub fn share(&mut self, sink: &mut dyn ShareSink) -> LampResult<()> {
        let frame = self.render()?.frame;
        let png = encode_png(&frame)?;
        share_png(sink, &png)
    }

    fn render_with(&mut self, options: RenderOptions) -> LampResult<RenderOutcome> {
        let request = RenderRequest {
            settings: self.store.current(),
            background: self.background.as_ref(),
            sprite: self.sprite.as_ref(),
            options,
        };
        self.renderer.render(&self.loader, &request)
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
