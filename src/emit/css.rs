//! Stylesheet value formatting and declaration blocks.

use std::fmt::Write as _;

use crate::document::model::{
    Align, ColorStop, CornerRadius, Dimension, Fill, FlowDirection, Justify, LineHeight,
    ScaleMode, Shadow, TextAlign, TextCase, TextDecoration,
};
use crate::foundation::core::{Color, Edges};
use crate::foundation::math::{fmt_num, normalize_deg, px, unit};

/// Ordered `property: value` pairs for one selector.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeclarationBlock {
    decls: Vec<(&'static str, String)>,
}

impl DeclarationBlock {
    pub fn push(&mut self, property: &'static str, value: impl Into<String>) {
        self.decls.push((property, value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.decls
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Append the rule to `out`; empty blocks are skipped.
    pub fn write_rule(&self, selector: &str, out: &mut String) {
        if self.is_empty() {
            return;
        }
        let _ = writeln!(out, "{selector} {{");
        for (property, value) in &self.decls {
            let _ = writeln!(out, "  {property}: {value};");
        }
        out.push_str("}\n");
    }
}

/// `rgba(R, G, B, A)` with 0..255 channels and a three-decimal alpha.
pub fn rgba(color: Color) -> String {
    let c = color.to_rgba8();
    format!(
        "rgba({}, {}, {}, {})",
        c.r,
        c.g,
        c.b,
        fmt_num(unit(color.a), 3)
    )
}

pub fn deg(angle: f64) -> String {
    format!("{}deg", fmt_num(normalize_deg(angle), 2))
}

fn stop_list(stops: &[ColorStop]) -> Option<String> {
    match stops {
        [] => None,
        [only] => Some(format!("{c} 0%, {c} 100%", c = rgba(only.color))),
        _ => Some(
            stops
                .iter()
                .map(|s| format!("{} {}%", rgba(s.color), fmt_num(unit(s.position) * 100.0, 2)))
                .collect::<Vec<_>>()
                .join(", "),
        ),
    }
}

/// One `background` layer for a paint-only fill. `bottom` marks the last listed layer, the only
/// one where a bare color is valid.
pub fn fill_layer(fill: &Fill, bottom: bool) -> Option<String> {
    match fill {
        Fill::Solid { color, opacity } => {
            let c = rgba(color.with_opacity(*opacity));
            Some(if bottom {
                c
            } else {
                format!("linear-gradient({c}, {c})")
            })
        }
        Fill::LinearGradient { angle_deg, stops } => {
            Some(format!("linear-gradient({}, {})", deg(*angle_deg), stop_list(stops)?))
        }
        Fill::RadialGradient { stops } => Some(format!(
            "radial-gradient(ellipse at 50% 50%, {})",
            stop_list(stops)?
        )),
        Fill::ConicGradient { angle_deg, stops } => Some(format!(
            "conic-gradient(from {} at 50% 50%, {})",
            deg(*angle_deg),
            stop_list(stops)?
        )),
        Fill::DiamondGradient { .. } | Fill::Image { .. } => None,
    }
}

/// Background layer for a resolved image fill.
pub fn image_layer(url: &str, scale_mode: ScaleMode) -> String {
    let url = format!("url(\"{}\")", escape_css_string(url));
    match scale_mode {
        ScaleMode::Fill | ScaleMode::Crop => format!("{url} center / cover no-repeat"),
        ScaleMode::Fit => format!("{url} center / contain no-repeat"),
        ScaleMode::Tile => format!("{url} repeat"),
    }
}

pub fn shadow(s: &Shadow, inset: bool) -> String {
    let mut v = format!(
        "{} {} {} {} {}",
        px(s.offset_x),
        px(s.offset_y),
        px(s.blur),
        px(s.spread),
        rgba(s.color)
    );
    if inset {
        v.push_str(" inset");
    }
    v
}

pub fn text_shadow(s: &Shadow) -> String {
    format!(
        "{} {} {} {}",
        px(s.offset_x),
        px(s.offset_y),
        px(s.blur),
        rgba(s.color)
    )
}

/// Zero-blur ring standing in for an inside or outside stroke.
pub fn stroke_ring(width: f64, color: Color, inset: bool) -> String {
    let mut v = format!("0 0 0 {} {}", px(width), rgba(color));
    if inset {
        v.push_str(" inset");
    }
    v
}

pub fn border(width: f64, color: Color) -> String {
    format!("{} solid {}", px(width), rgba(color))
}

pub fn padding(e: &Edges) -> String {
    format!("{} {} {} {}", px(e.top), px(e.right), px(e.bottom), px(e.left))
}

pub fn radius(r: &CornerRadius) -> String {
    match r {
        CornerRadius::Uniform(r) => px(*r),
        CornerRadius::PerCorner([tl, tr, br, bl]) => {
            format!("{} {} {} {}", px(*tl), px(*tr), px(*br), px(*bl))
        }
    }
}

pub fn dimension(d: Dimension) -> String {
    match d {
        Dimension::Px(v) => px(v),
        Dimension::Auto => "auto".to_owned(),
    }
}

pub fn flex_direction(d: FlowDirection) -> &'static str {
    match d {
        FlowDirection::Row => "row",
        FlowDirection::Column => "column",
    }
}

pub fn justify_content(j: Justify) -> &'static str {
    match j {
        Justify::Start => "flex-start",
        Justify::Center => "center",
        Justify::End => "flex-end",
        Justify::SpaceBetween => "space-between",
    }
}

pub fn align_items(a: Align) -> &'static str {
    match a {
        Align::Start => "flex-start",
        Align::Center => "center",
        Align::End => "flex-end",
        Align::Baseline => "baseline",
        Align::Stretch => "stretch",
    }
}

pub fn font_family(family: Option<&str>, fallback: &str) -> String {
    match family {
        Some(f) => format!("\"{}\", {fallback}", escape_css_string(f)),
        None => fallback.to_owned(),
    }
}

/// `None` for `auto`, which is the stylesheet default.
pub fn line_height(lh: LineHeight) -> Option<String> {
    match lh {
        LineHeight::Auto => None,
        LineHeight::Px(v) => Some(px(v)),
        LineHeight::Percent(p) => Some(format!("{}%", fmt_num(p, 2))),
    }
}

pub fn text_align(a: TextAlign) -> &'static str {
    match a {
        TextAlign::Left => "left",
        TextAlign::Center => "center",
        TextAlign::Right => "right",
        TextAlign::Justified => "justify",
    }
}

pub fn text_decoration(d: TextDecoration) -> &'static str {
    match d {
        TextDecoration::None => "none",
        TextDecoration::Underline => "underline",
        TextDecoration::Strikethrough => "line-through",
    }
}

/// Property and value expressing a text case.
pub fn text_case(case: TextCase) -> (&'static str, &'static str) {
    match case {
        TextCase::Original => ("text-transform", "none"),
        TextCase::Upper => ("text-transform", "uppercase"),
        TextCase::Lower => ("text-transform", "lowercase"),
        TextCase::Title => ("text-transform", "capitalize"),
        TextCase::SmallCaps => ("font-variant", "small-caps"),
    }
}

/// Body of a double-quoted CSS string. Control characters become hex escapes (`\a ` for a
/// newline).
pub fn escape_css_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c if c.is_control() => {
                let _ = write!(out, "\\{:x} ", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/emit/css.rs"]
mod tests;
