//! Geometry/Style Mapper: pure functions from one raw node to the typed layout and style model.

use std::collections::BTreeMap;

use crate::document::model::{
    ColorStop, CornerRadius, Dimension, Effect, Fill, FlowDirection, FlowMode, LayoutModel,
    LineHeight, NodeKind, ScaleMode, Shadow, Stroke, StrokeAlign, StrokePaint, StyleModel,
    TextContent, TextRun, Typography, TypographyOverride,
};
use crate::document::raw::{RawColor, RawEffect, RawNode, RawPaint, RawTypeStyle, RawVector};
use crate::foundation::core::{Affine, Color, Edges, Point, Rect, Size, Vec2};
use crate::foundation::math::{css_gradient_angle, finite_or, unit};
use crate::normalize::tables::{
    self, COUNTER_AXIS, EFFECT_KINDS, EffectKind, KindRule, LAYOUT_MODES, NODE_KINDS,
    PAINT_KINDS, PRIMARY_AXIS, PaintKind, SCALE_MODES, STROKE_ALIGNS, TEXT_ALIGNS, TEXT_CASES,
    TEXT_DECORATIONS, lookup, lookup_or,
};

/// Default shadow color when an effect omits one.
const DEFAULT_SHADOW: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.25,
};

/// Result of the kind table lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MappedKind {
    Node(NodeKind),
    /// Present in the tree but never painted; skipped.
    NonVisual,
    /// Unknown or unsupported raw kind; dropped with its subtree.
    Unrenderable,
}

/// Layout, style and text content of one node plus any warnings raised while mapping it.
#[derive(Clone, Debug)]
pub(crate) struct MappedNode {
    pub(crate) layout: LayoutModel,
    pub(crate) style: StyleModel,
    pub(crate) text: Option<TextContent>,
    pub(crate) warnings: Vec<String>,
}

pub(crate) fn map_kind(raw: &RawNode) -> MappedKind {
    let Some(rule) = raw.kind.as_deref().and_then(|k| lookup(NODE_KINDS, k)) else {
        return MappedKind::Unrenderable;
    };
    match rule {
        KindRule::Container => MappedKind::Node(NodeKind::Container),
        KindRule::Text => MappedKind::Node(NodeKind::Text),
        KindRule::Vector => MappedKind::Node(NodeKind::Vector),
        KindRule::ImageIfImageFill => {
            if has_visible_image_fill(raw) {
                MappedKind::Node(NodeKind::Image)
            } else {
                MappedKind::Node(NodeKind::Container)
            }
        }
        KindRule::NonVisual => MappedKind::NonVisual,
    }
}

fn has_visible_image_fill(raw: &RawNode) -> bool {
    raw.fills.iter().flatten().any(|p| {
        is_visible(p.visible) && p.kind.as_deref().and_then(|k| lookup(PAINT_KINDS, k))
            == Some(PaintKind::Image)
    })
}

fn is_visible(flag: Option<bool>) -> bool {
    flag != Some(false)
}

/// Absolute bounding box, or `None` when the node declares none.
pub(crate) fn node_box(raw: &RawNode) -> Option<Rect> {
    let b = raw.absolute_bounding_box?;
    let origin = Point::new(finite_or(b.x, 0.0), finite_or(b.y, 0.0));
    let size = Size::new(
        finite_or(b.width, 0.0).max(0.0),
        finite_or(b.height, 0.0).max(0.0),
    );
    Some(Rect::from_origin_size(origin, size))
}

pub(crate) fn map_node(
    raw: &RawNode,
    id: &str,
    kind: NodeKind,
    parent_box: Option<Rect>,
    parent_flow: FlowMode,
) -> MappedNode {
    let mut warnings = Vec::new();
    let layout = map_layout(raw, parent_box, parent_flow);
    let mut style = map_style(raw, id, &mut warnings);
    let text = if kind == NodeKind::Text {
        let (typography, text) = map_text(raw);
        style.typography = Some(typography);
        Some(text)
    } else {
        None
    };
    MappedNode {
        layout,
        style,
        text,
        warnings,
    }
}

pub(crate) fn map_layout(
    raw: &RawNode,
    parent_box: Option<Rect>,
    parent_flow: FlowMode,
) -> LayoutModel {
    let own_box = node_box(raw);
    let width = own_box.map(|b| b.width()).unwrap_or(0.0);
    let height = own_box.map(|b| b.height()).unwrap_or(0.0);

    let own_flow = lookup_or(LAYOUT_MODES, raw.layout_mode.as_deref(), FlowMode::None);
    let direction = match own_flow {
        FlowMode::Row => Some(FlowDirection::Row),
        FlowMode::Column => Some(FlowDirection::Column),
        FlowMode::None => None,
    };

    let opted_out = raw
        .layout_positioning
        .as_deref()
        .is_some_and(|p| p.trim().eq_ignore_ascii_case("ABSOLUTE"));
    let placed_by_parent = parent_flow != FlowMode::None && !opted_out;
    let origin = own_box.map(|b| b.origin()).unwrap_or(Point::ZERO);
    let parent_origin = parent_box.map(|b| b.origin()).unwrap_or(Point::ZERO);
    let rel = origin - parent_origin;

    if let Some(direction) = direction {
        return LayoutModel::Flow {
            origin: (!placed_by_parent).then_some(Point::new(rel.x, rel.y)),
            direction,
            gap: finite_or(raw.item_spacing, 0.0),
            padding: Edges {
                top: finite_or(raw.padding_top, 0.0),
                right: finite_or(raw.padding_right, 0.0),
                bottom: finite_or(raw.padding_bottom, 0.0),
                left: finite_or(raw.padding_left, 0.0),
            },
            align: lookup_or(
                COUNTER_AXIS,
                raw.counter_axis_align_items.as_deref(),
                Default::default(),
            ),
            justify: lookup_or(
                PRIMARY_AXIS,
                raw.primary_axis_align_items.as_deref(),
                Default::default(),
            ),
            width,
            height: if height > 0.0 {
                Dimension::Px(height)
            } else {
                Dimension::Auto
            },
        };
    }

    if placed_by_parent {
        return LayoutModel::FlowItem { width, height };
    }
    LayoutModel::Absolute {
        x: rel.x,
        y: rel.y,
        width,
        height,
    }
}

pub(crate) fn map_style(raw: &RawNode, id: &str, warnings: &mut Vec<String>) -> StyleModel {
    let mut fills = Vec::new();
    for paint in raw.fills.iter().flatten().filter(|p| is_visible(p.visible)) {
        match map_fill(paint) {
            Some(fill) => fills.push(fill),
            None => warnings.push(unsupported(id, "fill", paint.kind.as_deref())),
        }
    }

    let align = lookup_or(STROKE_ALIGNS, raw.stroke_align.as_deref(), StrokeAlign::Center);
    let width = finite_or(raw.stroke_weight, 1.0).max(0.0);
    let dashes: Vec<f64> = raw
        .stroke_dashes
        .iter()
        .flatten()
        .copied()
        .filter(|d| d.is_finite() && *d > 0.0)
        .collect();
    let mut strokes = Vec::new();
    for paint in raw.strokes.iter().flatten().filter(|p| is_visible(p.visible)) {
        match map_stroke_paint(paint) {
            Some(paint) => strokes.push(Stroke {
                align,
                width,
                paint,
                dashes: dashes.clone(),
            }),
            None => warnings.push(unsupported(id, "stroke", paint.kind.as_deref())),
        }
    }

    let mut effects = Vec::new();
    for effect in raw.effects.iter().flatten().filter(|e| is_visible(e.visible)) {
        match map_effect(effect) {
            Some(effect) => effects.push(effect),
            None => warnings.push(unsupported(id, "effect", effect.kind.as_deref())),
        }
    }

    StyleModel {
        fills,
        strokes,
        effects,
        corner_radius: map_corner_radius(raw),
        typography: None,
        opacity: unit(finite_or(raw.opacity, 1.0)),
        blend_mode: raw
            .blend_mode
            .as_deref()
            .and_then(tables::normalize_blend_mode),
        is_mask: raw.is_mask.unwrap_or(false),
    }
}

fn unsupported(id: &str, what: &str, kind: Option<&str>) -> String {
    format!(
        "node {id}: unsupported {what} kind '{}'",
        kind.unwrap_or("<missing>")
    )
}

fn map_color(c: Option<&RawColor>) -> Color {
    match c {
        Some(c) => Color::rgba(
            finite_or(c.r, 0.0),
            finite_or(c.g, 0.0),
            finite_or(c.b, 0.0),
            finite_or(c.a, 1.0),
        ),
        None => Color::BLACK,
    }
}

fn paint_opacity(paint: &RawPaint) -> f64 {
    unit(finite_or(paint.opacity, 1.0))
}

fn map_stops(paint: &RawPaint) -> Vec<ColorStop> {
    let opacity = paint_opacity(paint);
    paint
        .gradient_stops
        .iter()
        .flatten()
        .map(|s| ColorStop {
            position: unit(finite_or(s.position, 0.0)),
            color: map_color(s.color.as_ref()).with_opacity(opacity),
        })
        .collect()
}

/// Direction of the gradient: the transform's first column, else the first handle pair.
fn gradient_direction(paint: &RawPaint) -> Vec2 {
    fn cell(row: &[f64], i: usize) -> f64 {
        row.get(i).copied().unwrap_or(0.0)
    }

    if let Some([row0, row1, ..]) = paint.gradient_transform.as_deref() {
        // Rows are [a, c, e] and [b, d, f].
        let affine = Affine::new([
            cell(row0, 0),
            cell(row1, 0),
            cell(row0, 1),
            cell(row1, 1),
            cell(row0, 2),
            cell(row1, 2),
        ]);
        return (affine * Point::new(1.0, 0.0)) - (affine * Point::ZERO);
    }
    if let Some([from, to, ..]) = paint.gradient_handle_positions.as_deref() {
        let p = |v: &RawVector| Point::new(finite_or(v.x, 0.0), finite_or(v.y, 0.0));
        return p(to) - p(from);
    }
    Vec2::ZERO
}

/// Stylesheet gradient angle (0° up, clockwise) derived from the paint's direction.
pub(crate) fn gradient_angle(paint: &RawPaint) -> f64 {
    css_gradient_angle(gradient_direction(paint))
}

pub(crate) fn map_fill(paint: &RawPaint) -> Option<Fill> {
    let kind = lookup(PAINT_KINDS, paint.kind.as_deref()?)?;
    Some(match kind {
        PaintKind::Solid => Fill::Solid {
            color: map_color(paint.color.as_ref()),
            opacity: paint_opacity(paint),
        },
        PaintKind::Linear => Fill::LinearGradient {
            angle_deg: gradient_angle(paint),
            stops: map_stops(paint),
        },
        PaintKind::Radial => Fill::RadialGradient {
            stops: map_stops(paint),
        },
        PaintKind::Angular => Fill::ConicGradient {
            angle_deg: gradient_angle(paint),
            stops: map_stops(paint),
        },
        PaintKind::Diamond => Fill::DiamondGradient {
            stops: map_stops(paint),
        },
        PaintKind::Image => Fill::Image {
            image_ref: paint.image_ref.clone().filter(|r| !r.is_empty()),
            scale_mode: lookup_or(SCALE_MODES, paint.scale_mode.as_deref(), ScaleMode::Fill),
        },
    })
}

fn map_stroke_paint(paint: &RawPaint) -> Option<StrokePaint> {
    let kind = lookup(PAINT_KINDS, paint.kind.as_deref()?)?;
    match kind {
        PaintKind::Solid => Some(StrokePaint::Solid {
            color: map_color(paint.color.as_ref()).with_opacity(paint_opacity(paint)),
        }),
        PaintKind::Linear | PaintKind::Radial | PaintKind::Angular | PaintKind::Diamond => {
            Some(StrokePaint::Gradient {
                stops: map_stops(paint),
            })
        }
        PaintKind::Image => None,
    }
}

fn map_effect(effect: &RawEffect) -> Option<Effect> {
    let kind = lookup(EFFECT_KINDS, effect.kind.as_deref()?)?;
    let radius = finite_or(effect.radius, 0.0).max(0.0);
    let shadow = || {
        let offset = effect.offset.unwrap_or_default();
        Shadow {
            offset_x: finite_or(offset.x, 0.0),
            offset_y: finite_or(offset.y, 0.0),
            blur: radius,
            spread: finite_or(effect.spread, 0.0),
            color: effect
                .color
                .as_ref()
                .map(|c| map_color(Some(c)))
                .unwrap_or(DEFAULT_SHADOW),
        }
    };
    Some(match kind {
        EffectKind::DropShadow => Effect::DropShadow(shadow()),
        EffectKind::InnerShadow => Effect::InnerShadow(shadow()),
        EffectKind::LayerBlur => Effect::LayerBlur { radius },
        EffectKind::BackgroundBlur => Effect::BackgroundBlur { radius },
    })
}

pub(crate) fn map_corner_radius(raw: &RawNode) -> Option<CornerRadius> {
    let uniform = finite_or(raw.corner_radius, 0.0);
    if uniform > 0.0 {
        return Some(CornerRadius::Uniform(uniform));
    }
    let radii = raw.rectangle_corner_radii.as_deref()?;
    if radii.len() < 4 {
        return None;
    }
    let corners = [0, 1, 2, 3].map(|i| finite_or(Some(radii[i]), 0.0).max(0.0));
    if corners.iter().any(|r| *r != 0.0) {
        Some(CornerRadius::PerCorner(corners))
    } else {
        None
    }
}

fn map_line_height(style: &RawTypeStyle) -> Option<LineHeight> {
    let px = style.line_height_px.filter(|v| v.is_finite() && *v > 0.0);
    let pct = style
        .line_height_percent_font_size
        .filter(|v| v.is_finite() && *v > 0.0);
    match style.line_height_unit.as_deref().map(str::trim) {
        Some(u) if u.eq_ignore_ascii_case("INTRINSIC_%") => Some(LineHeight::Auto),
        Some(u) if u.eq_ignore_ascii_case("FONT_SIZE_%") => pct.map(LineHeight::Percent),
        _ => px.map(LineHeight::Px).or_else(|| pct.map(LineHeight::Percent)),
    }
}

pub(crate) fn map_typography(style: &RawTypeStyle) -> Typography {
    Typography {
        family: style.font_family.clone().filter(|f| !f.trim().is_empty()),
        weight: style.font_weight.filter(|w| w.is_finite()),
        size: style.font_size.filter(|s| s.is_finite() && *s > 0.0),
        italic: style.italic.unwrap_or(false),
        line_height: map_line_height(style).unwrap_or_default(),
        letter_spacing: finite_or(style.letter_spacing, 0.0),
        case: lookup_or(TEXT_CASES, style.text_case.as_deref(), Default::default()),
        decoration: lookup_or(
            TEXT_DECORATIONS,
            style.text_decoration.as_deref(),
            Default::default(),
        ),
        align: lookup_or(TEXT_ALIGNS, style.text_align_horizontal.as_deref(), Default::default()),
    }
}

fn map_override(style: &RawTypeStyle) -> TypographyOverride {
    TypographyOverride {
        family: style.font_family.clone().filter(|f| !f.trim().is_empty()),
        weight: style.font_weight.filter(|w| w.is_finite()),
        size: style.font_size.filter(|s| s.is_finite() && *s > 0.0),
        italic: style.italic,
        line_height: map_line_height(style),
        letter_spacing: style.letter_spacing.filter(|v| v.is_finite()),
        case: style.text_case.as_deref().and_then(|k| lookup(TEXT_CASES, k)),
        decoration: style
            .text_decoration
            .as_deref()
            .and_then(|k| lookup(TEXT_DECORATIONS, k)),
    }
}

fn first_solid(paints: Option<&Vec<RawPaint>>) -> Option<Color> {
    paints.into_iter().flatten().find_map(|p| {
        if !is_visible(p.visible) {
            return None;
        }
        match map_fill(p)? {
            Fill::Solid { color, opacity } => Some(color.with_opacity(opacity)),
            _ => None,
        }
    })
}

fn apply_override(base: &mut Typography, o: &TypographyOverride) {
    if let Some(family) = &o.family {
        base.family = Some(family.clone());
    }
    if o.weight.is_some() {
        base.weight = o.weight;
    }
    if o.size.is_some() {
        base.size = o.size;
    }
    if let Some(italic) = o.italic {
        base.italic = italic;
    }
    if let Some(lh) = o.line_height {
        base.line_height = lh;
    }
    if let Some(ls) = o.letter_spacing {
        base.letter_spacing = ls;
    }
    if let Some(case) = o.case {
        base.case = case;
    }
    if let Some(decoration) = o.decoration {
        base.decoration = decoration;
    }
}

/// Base typography plus content split into styled runs.
///
/// Override indices address `char`s. Characters past the end of the override list use the base
/// style (index 0). A single styled run is folded into the base typography.
pub(crate) fn map_text(raw: &RawNode) -> (Typography, TextContent) {
    let mut typography = raw
        .style
        .as_ref()
        .map(map_typography)
        .unwrap_or_else(|| map_typography(&RawTypeStyle::default()));
    let characters = raw.characters.clone().unwrap_or_default();

    let overrides = raw.character_style_overrides.as_deref().unwrap_or_default();
    let empty = BTreeMap::new();
    let table = raw.style_override_table.as_ref().unwrap_or(&empty);

    let mut groups: Vec<(u32, String)> = Vec::new();
    for (i, ch) in characters.chars().enumerate() {
        let key = overrides.get(i).copied().unwrap_or(0);
        match groups.last_mut() {
            Some((k, text)) if *k == key => text.push(ch),
            _ => groups.push((key, ch.to_string())),
        }
    }

    let styled = groups.iter().any(|(k, _)| *k != 0);
    let mut runs: Vec<TextRun> = if styled {
        groups
            .into_iter()
            .map(|(key, text)| {
                let style = (key != 0).then(|| table.get(&key.to_string())).flatten();
                TextRun {
                    text,
                    overrides: style.map(map_override).unwrap_or_default(),
                    color: style.and_then(|s| first_solid(s.fills.as_ref())),
                }
            })
            .collect()
    } else {
        Vec::new()
    };

    if runs.len() == 1 {
        let only = runs.remove(0);
        apply_override(&mut typography, &only.overrides);
    }

    (typography, TextContent { characters, runs })
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/mapper.rs"]
mod tests;
