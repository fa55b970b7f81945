//! lampviz places a lamp sprite on a room photo and renders the light it casts.
//!
//! The crate is organized around a single interactive session:
//!
//! 1. **Settings**: [`LampSettings`] snapshots in a [`SettingsStore`] with linear undo/redo.
//! 2. **Interaction**: [`hit_test`] and [`DragController`] turn pointer events into settings edits.
//! 3. **Render**: [`SceneRenderer`] composites background, light cone, sprite and dim overlay into
//!    a premultiplied [`FrameRGBA`]; [`RenderScheduler`] drops superseded frames.
//! 4. **Export**: [`trim`] crops an export render to its visible pixels, [`encode_png`] writes it,
//!    and a [`ShareSink`] can receive the on-screen frame.
//!
//! [`LampSession`] ties these together behind UI-shaped methods. Image IO is confined to
//! [`ImageLoader`] implementations; renderers only see decoded [`Raster`]s.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod assets;
pub mod export;
pub mod foundation;
pub mod interact;
pub mod render;
pub mod session;
pub mod settings;

pub use assets::color::{HexColor, LIGHT_APEX_OPACITY};
pub use assets::decode::{MAX_IMAGE_DIM, Raster, decode_image};
pub use assets::loader::{CachingLoader, DEFAULT_IMAGE_CACHE_CAPACITY, FsImageLoader, ImageLoader};
pub use assets::source::{ImageSource, LAMP_PRESET_COUNT, LampPreset, accept_upload};
pub use export::png::{EXPORT_FILE_NAME, PNG_MIME, encode_png};
pub use export::share::{
    SHARE_TEXT, SHARE_TITLE, ShareMetadata, ShareSink, ShareStatus, UnsupportedShareSink,
    share_png,
};
pub use export::trim::{ContentBounds, content_bounds, trim};
pub use foundation::config::{ENV_DEVICE_SCALE, ENV_EXPORT_SCALE, SessionConfig};
pub use foundation::core::{
    Affine, BezPath, CanvasSize, FrameRGBA, NormPoint, Point, Rect, Vec2, clamp_or, wrap_degrees,
};
pub use foundation::error::{LampError, LampResult};
pub use interact::drag::{DragController, DragState};
pub use interact::hit::{hit_test, lamp_hit_box, to_normalized};
pub use render::cpu::{
    Backdrop, DIM_OVERLAY, RenderOptions, RenderOutcome, RenderRequest, Scene, SceneRenderer,
    Theme,
};
pub use render::layout::{LightCone, fit_rect, image_to_rect, lamp_box, sprite_transform};
pub use render::scheduler::{RenderScheduler, RenderTicket};
pub use render::text::{PLACEHOLDER_FONT_PX, PLACEHOLDER_TEXT};
pub use session::LampSession;
pub use settings::model::{
    Direction, LampAction, LampPatch, LampSettings, MAX_PERCENT, MIN_SPAN, NUDGE_STEP,
    ROTATE_STEP,
};
pub use settings::store::SettingsStore;
