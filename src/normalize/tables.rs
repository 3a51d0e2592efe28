//! Declarative raw-string → model mappings.
//!
//! Lookups are ASCII case-insensitive. A key absent from its table is treated by the caller as
//! "unsupported" (for paints/effects) or as the table's default (for alignment-like enums).

use crate::document::model::{
    Align, FlowMode, Justify, ScaleMode, StrokeAlign, TextAlign, TextCase, TextDecoration,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum KindRule {
    Container,
    Text,
    Vector,
    /// `image` when the node carries a visible image fill, otherwise `container`.
    ImageIfImageFill,
    /// Exists in the tree but never paints (slices and similar helpers).
    NonVisual,
}

pub(crate) const NODE_KINDS: &[(&str, KindRule)] = &[
    ("DOCUMENT", KindRule::Container),
    ("CANVAS", KindRule::Container),
    ("FRAME", KindRule::Container),
    ("GROUP", KindRule::Container),
    ("SECTION", KindRule::Container),
    ("COMPONENT", KindRule::Container),
    ("COMPONENT_SET", KindRule::Container),
    ("INSTANCE", KindRule::Container),
    ("TEXT", KindRule::Text),
    ("VECTOR", KindRule::Vector),
    ("BOOLEAN_OPERATION", KindRule::Vector),
    ("STAR", KindRule::Vector),
    ("LINE", KindRule::Vector),
    ("ELLIPSE", KindRule::Vector),
    ("REGULAR_POLYGON", KindRule::Vector),
    ("RECTANGLE", KindRule::ImageIfImageFill),
    ("SLICE", KindRule::NonVisual),
];

pub(crate) const LAYOUT_MODES: &[(&str, FlowMode)] = &[
    ("NONE", FlowMode::None),
    ("HORIZONTAL", FlowMode::Row),
    ("VERTICAL", FlowMode::Column),
];

pub(crate) const PRIMARY_AXIS: &[(&str, Justify)] = &[
    ("MIN", Justify::Start),
    ("CENTER", Justify::Center),
    ("MAX", Justify::End),
    ("SPACE_BETWEEN", Justify::SpaceBetween),
];

/// No flow model distributes the cross axis, so `SPACE_BETWEEN` degrades to stretch.
pub(crate) const COUNTER_AXIS: &[(&str, Align)] = &[
    ("MIN", Align::Start),
    ("CENTER", Align::Center),
    ("MAX", Align::End),
    ("BASELINE", Align::Baseline),
    ("SPACE_BETWEEN", Align::Stretch),
];

pub(crate) const STROKE_ALIGNS: &[(&str, StrokeAlign)] = &[
    ("CENTER", StrokeAlign::Center),
    ("INSIDE", StrokeAlign::Inside),
    ("OUTSIDE", StrokeAlign::Outside),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PaintKind {
    Solid,
    Linear,
    Radial,
    Angular,
    Diamond,
    Image,
}

pub(crate) const PAINT_KINDS: &[(&str, PaintKind)] = &[
    ("SOLID", PaintKind::Solid),
    ("GRADIENT_LINEAR", PaintKind::Linear),
    ("GRADIENT_RADIAL", PaintKind::Radial),
    ("GRADIENT_ANGULAR", PaintKind::Angular),
    ("GRADIENT_DIAMOND", PaintKind::Diamond),
    ("IMAGE", PaintKind::Image),
];

pub(crate) const SCALE_MODES: &[(&str, ScaleMode)] = &[
    ("FILL", ScaleMode::Fill),
    ("FIT", ScaleMode::Fit),
    ("TILE", ScaleMode::Tile),
    ("CROP", ScaleMode::Crop),
    ("STRETCH", ScaleMode::Crop),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EffectKind {
    DropShadow,
    InnerShadow,
    LayerBlur,
    BackgroundBlur,
}

pub(crate) const EFFECT_KINDS: &[(&str, EffectKind)] = &[
    ("DROP_SHADOW", EffectKind::DropShadow),
    ("INNER_SHADOW", EffectKind::InnerShadow),
    ("LAYER_BLUR", EffectKind::LayerBlur),
    ("BACKGROUND_BLUR", EffectKind::BackgroundBlur),
];

pub(crate) const TEXT_CASES: &[(&str, TextCase)] = &[
    ("ORIGINAL", TextCase::Original),
    ("UPPER", TextCase::Upper),
    ("LOWER", TextCase::Lower),
    ("TITLE", TextCase::Title),
    ("SMALL_CAPS", TextCase::SmallCaps),
    ("SMALL_CAPS_FORCED", TextCase::SmallCaps),
];

pub(crate) const TEXT_DECORATIONS: &[(&str, TextDecoration)] = &[
    ("NONE", TextDecoration::None),
    ("UNDERLINE", TextDecoration::Underline),
    ("STRIKETHROUGH", TextDecoration::Strikethrough),
];

pub(crate) const TEXT_ALIGNS: &[(&str, TextAlign)] = &[
    ("LEFT", TextAlign::Left),
    ("CENTER", TextAlign::Center),
    ("RIGHT", TextAlign::Right),
    ("JUSTIFIED", TextAlign::Justified),
];

pub(crate) fn lookup<T: Copy>(table: &[(&str, T)], key: &str) -> Option<T> {
    let key = key.trim();
    table
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|&(_, v)| v)
}

/// Lookup with a default for absent or unknown keys.
pub(crate) fn lookup_or<T: Copy>(table: &[(&str, T)], key: Option<&str>, default: T) -> T {
    key.and_then(|k| lookup(table, k)).unwrap_or(default)
}

/// `PASS_THROUGH` → `pass-through`, `COLOR_DODGE` → `color-dodge`.
pub(crate) fn normalize_blend_mode(raw: &str) -> Option<String> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    Some(s.to_ascii_lowercase().replace('_', "-"))
}
