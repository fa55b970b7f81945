use std::str::FromStr;

use crate::{
    assets::color::HexColor,
    foundation::{
        core::{NormPoint, clamp_or, wrap_degrees},
        error::{LampError, LampResult},
    },
};

/// Lower bound for [`LampSettings::size`] and [`LampSettings::light_width`].
pub const MIN_SPAN: f64 = 10.0;
/// Upper bound for every percentage field.
pub const MAX_PERCENT: f64 = 100.0;
/// Percentage points moved or resized per button action.
pub const NUDGE_STEP: f64 = 5.0;
/// Degrees added per rotate action.
pub const ROTATE_STEP: f64 = 15.0;

/// Everything about the lamp that the user can edit. One value is one history snapshot.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LampSettings {
    /// Lamp center, percent of canvas width/height, each in `[0, 100]`.
    pub position: NormPoint,
    /// Lamp width as percent of canvas width, in `[10, 100]`.
    pub size: f64,
    /// Clockwise rotation in degrees, in `[0, 360)`.
    pub rotation: f64,
    /// Where the cone starts, percent of the lamp box height from its top, in `[0, 100]`.
    pub light_start_y: f64,
    /// Cone spread, percent of canvas width (base) and height (gradient radius), in `[10, 100]`.
    pub light_width: f64,
    /// Light color; the cone starts at 80% of its opacity.
    pub light_color: HexColor,
    /// Whether the cone is drawn. When off, the whole scene is dimmed instead.
    pub is_light_on: bool,
}

impl Default for LampSettings {
    fn default() -> Self {
        Self {
            position: NormPoint::new(50.0, 50.0),
            size: 30.0,
            rotation: 0.0,
            light_start_y: 100.0,
            light_width: 50.0,
            light_color: HexColor::rgb(0xFF, 0xD7, 0x00),
            is_light_on: true,
        }
    }
}

impl LampSettings {
    /// Parse settings JSON and clamp it into range. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> LampResult<Self> {
        let patch: LampPatch = serde_json::from_str(s)
            .map_err(|e| LampError::validation(format!("invalid lamp settings: {e}")))?;
        Ok(patch.merge_into(&Self::default()))
    }

    /// Settings with every field clamped (rotation wrapped). Non-finite values fall back to
    /// `fallback`'s value for that field.
    pub fn normalized(self, fallback: &Self) -> Self {
        Self {
            position: NormPoint::new(
                clamp_or(self.position.x, 0.0, MAX_PERCENT, fallback.position.x),
                clamp_or(self.position.y, 0.0, MAX_PERCENT, fallback.position.y),
            ),
            size: clamp_or(self.size, MIN_SPAN, MAX_PERCENT, fallback.size),
            rotation: wrap_degrees(self.rotation, fallback.rotation),
            light_start_y: clamp_or(self.light_start_y, 0.0, MAX_PERCENT, fallback.light_start_y),
            light_width: clamp_or(self.light_width, MIN_SPAN, MAX_PERCENT, fallback.light_width),
            light_color: self.light_color,
            is_light_on: self.is_light_on,
        }
    }
}

/// A partial update: `Some` fields replace the current value, `None` fields are kept.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct LampPatch {
    /// New lamp center.
    pub position: Option<NormPoint>,
    /// New lamp size.
    pub size: Option<f64>,
    /// New rotation (wrapped, not clamped).
    pub rotation: Option<f64>,
    /// New cone start.
    pub light_start_y: Option<f64>,
    /// New cone width.
    pub light_width: Option<f64>,
    /// New light color.
    pub light_color: Option<HexColor>,
    /// New on/off state.
    pub is_light_on: Option<bool>,
}

impl LampPatch {
    /// Patch that only moves the lamp.
    pub fn position(p: NormPoint) -> Self {
        Self {
            position: Some(p),
            ..Self::default()
        }
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge onto `base` and clamp the result.
    pub fn merge_into(&self, base: &LampSettings) -> LampSettings {
        LampSettings {
            position: self.position.unwrap_or(base.position),
            size: self.size.unwrap_or(base.size),
            rotation: self.rotation.unwrap_or(base.rotation),
            light_start_y: self.light_start_y.unwrap_or(base.light_start_y),
            light_width: self.light_width.unwrap_or(base.light_width),
            light_color: self.light_color.unwrap_or(base.light_color),
            is_light_on: self.is_light_on.unwrap_or(base.is_light_on),
        }
        .normalized(base)
    }
}

/// Arrow-button direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Decrease x.
    Left,
    /// Increase x.
    Right,
    /// Decrease y.
    Up,
    /// Increase y.
    Down,
}

/// A discrete edit, as issued by the control buttons and sliders.
#[derive(Clone, Debug, PartialEq)]
pub enum LampAction {
    /// Nudge the lamp by [`NUDGE_STEP`].
    Move(Direction),
    /// Grow by [`NUDGE_STEP`].
    Grow,
    /// Shrink by [`NUDGE_STEP`].
    Shrink,
    /// Rotate clockwise by [`ROTATE_STEP`].
    Rotate,
    /// Flip the light on/off.
    ToggleLight,
    /// Place the lamp center.
    SetPosition(NormPoint),
    /// Set the cone start.
    SetLightStart(f64),
    /// Set the cone width.
    SetLightWidth(f64),
    /// Set the light color.
    SetLightColor(HexColor),
}

impl LampAction {
    /// The patch this action applies on top of `current`.
    pub fn to_patch(&self, current: &LampSettings) -> LampPatch {
        let mut patch = LampPatch::default();
        match self {
            Self::Move(dir) => {
                let NormPoint { x, y } = current.position;
                let moved = match dir {
                    Direction::Left => NormPoint::new(x - NUDGE_STEP, y),
                    Direction::Right => NormPoint::new(x + NUDGE_STEP, y),
                    Direction::Up => NormPoint::new(x, y - NUDGE_STEP),
                    Direction::Down => NormPoint::new(x, y + NUDGE_STEP),
                };
                patch.position = Some(moved);
            }
            Self::Grow => patch.size = Some(current.size + NUDGE_STEP),
            Self::Shrink => patch.size = Some(current.size - NUDGE_STEP),
            Self::Rotate => patch.rotation = Some(current.rotation + ROTATE_STEP),
            Self::ToggleLight => patch.is_light_on = Some(!current.is_light_on),
            Self::SetPosition(p) => patch.position = Some(*p),
            Self::SetLightStart(v) => patch.light_start_y = Some(*v),
            Self::SetLightWidth(v) => patch.light_width = Some(*v),
            Self::SetLightColor(c) => patch.light_color = Some(*c),
        }
        patch
    }
}

impl FromStr for LampAction {
    type Err = LampError;

    /// Parse `left|right|up|down|grow|shrink|rotate|toggle-light`, or `key=value` for
    /// `position=x,y`, `light-start=v`, `light-width=v`, `light-color=#hex`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let number = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| LampError::validation(format!("invalid number '{v}' in action '{s}'")))
        };

        if let Some((key, value)) = s.split_once('=') {
            return match key.trim() {
                "position" => {
                    let (x, y) = value.split_once(',').ok_or_else(|| {
                        LampError::validation("position action expects 'position=x,y'")
                    })?;
                    Ok(Self::SetPosition(NormPoint::new(number(x)?, number(y)?)))
                }
                "light-start" => Ok(Self::SetLightStart(number(value)?)),
                "light-width" => Ok(Self::SetLightWidth(number(value)?)),
                "light-color" => Ok(Self::SetLightColor(HexColor::parse(value)?)),
                other => Err(LampError::validation(format!("unknown action '{other}'"))),
            };
        }

        match s {
            "left" => Ok(Self::Move(Direction::Left)),
            "right" => Ok(Self::Move(Direction::Right)),
            "up" => Ok(Self::Move(Direction::Up)),
            "down" => Ok(Self::Move(Direction::Down)),
            "grow" => Ok(Self::Grow),
            "shrink" => Ok(Self::Shrink),
            "rotate" => Ok(Self::Rotate),
            "toggle-light" => Ok(Self::ToggleLight),
            other => Err(LampError::validation(format!("unknown action '{other}'"))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/model.rs"]
mod tests;
