use std::collections::BTreeMap;

use crate::classify::classifier::{ClassifiedNode, RenderStrategy};
use crate::document::model::{
    Effect, Fill, LayoutModel, NodeKind, ScaleMode, StrokeAlign, Typography, TypographyOverride,
};
use crate::emit::css::{self, DeclarationBlock};
use crate::foundation::math::{fmt_num, px, unit};
use crate::foundation::naming::{class_name, run_class_name};

/// Class of the rendered image inside a fallback node that keeps live children.
pub const ASSET_OVERLAY_CLASS: &str = "figdom-asset";

/// Inputs shared by every rule of one stylesheet.
#[derive(Clone, Copy, Debug)]
pub struct StylesheetContext<'a> {
    /// Prefix of every generated class.
    pub class_prefix: &'a str,
    /// Generic family appended after a node's own font family.
    pub fallback_font_family: &'a str,
    /// Resolved image-fill references: `imageRef` → URL relative to the markup.
    pub image_urls: &'a BTreeMap<String, String>,
}

/// Emit the stylesheet for a classified tree: preamble, one rule per node in pre-order, then the
/// rules of each text node's styled runs right after its own.
#[tracing::instrument(skip_all, fields(root = %root.id))]
pub fn emit_stylesheet(root: &ClassifiedNode, ctx: &StylesheetContext<'_>) -> String {
    let mut out = String::new();

    let mut reset = DeclarationBlock::default();
    reset.push("box-sizing", "border-box");
    reset.push("margin", "0");
    reset.write_rule("*, *::before, *::after", &mut out);

    let mut overlay = DeclarationBlock::default();
    overlay.push("position", "absolute");
    overlay.push("left", "0");
    overlay.push("top", "0");
    overlay.push("width", "100%");
    overlay.push("height", "100%");
    overlay.write_rule(&format!(".{ASSET_OVERLAY_CLASS}"), &mut out);

    let mut rules = 0usize;
    root.walk(&mut |node| {
        let block = node_block(node, ctx);
        if !block.is_empty() {
            rules += 1;
        }
        block.write_rule(&format!(".{}", class_name(ctx.class_prefix, &node.id)), &mut out);

        if node.strategy != RenderStrategy::Text {
            return;
        }
        let Some(text) = &node.text else {
            return;
        };
        for (index, run) in text.runs.iter().enumerate() {
            let mut block = DeclarationBlock::default();
            override_decls(&run.overrides, ctx, &mut block);
            if let Some(color) = run.color {
                block.push("color", css::rgba(color));
            }
            block.write_rule(
                &format!(".{}", run_class_name(ctx.class_prefix, &node.id, index)),
                &mut out,
            );
        }
    });

    tracing::debug!(rules, bytes = out.len(), "emitted stylesheet");
    out
}

/// Declarations for one node in fixed order: layout, visual, stroke, effects, opacity, radius,
/// typography.
pub fn node_block(node: &ClassifiedNode, ctx: &StylesheetContext<'_>) -> DeclarationBlock {
    let mut block = DeclarationBlock::default();
    layout_decls(node, &mut block);

    let live = node.strategy != RenderStrategy::ImageFallback;
    let is_text = node.kind == NodeKind::Text;
    let mut shadows = Vec::new();

    if live {
        if is_text {
            if let Some(color) = node.style.first_solid_color() {
                block.push("color", css::rgba(color));
            }
        } else {
            background_decls(node, ctx, &mut block);
            for stroke in &node.style.strokes {
                let color = stroke.paint.color();
                match stroke.align {
                    StrokeAlign::Center => block.push("border", css::border(stroke.width, color)),
                    StrokeAlign::Inside => {
                        shadows.push(css::stroke_ring(stroke.width, color, true))
                    }
                    StrokeAlign::Outside => {
                        shadows.push(css::stroke_ring(stroke.width, color, false))
                    }
                }
            }
        }

        let mut text_shadows = Vec::new();
        for effect in &node.style.effects {
            match effect {
                Effect::DropShadow(s) if is_text => text_shadows.push(css::text_shadow(s)),
                Effect::DropShadow(s) => shadows.push(css::shadow(s, false)),
                Effect::InnerShadow(s) if !is_text => shadows.push(css::shadow(s, true)),
                Effect::InnerShadow(_)
                | Effect::LayerBlur { .. }
                | Effect::BackgroundBlur { .. } => {}
            }
        }
        if !shadows.is_empty() {
            block.push("box-shadow", shadows.join(", "));
        }
        if !text_shadows.is_empty() {
            block.push("text-shadow", text_shadows.join(", "));
        }
    }

    let opacity = unit(node.style.opacity);
    if opacity < 1.0 {
        block.push("opacity", fmt_num(opacity, 3));
    }

    if let Some(r) = &node.style.corner_radius {
        block.push("border-radius", css::radius(r));
    }

    if live && is_text {
        if let Some(t) = &node.style.typography {
            typography_decls(t, ctx, &mut block);
        }
    }
    block
}

fn layout_decls(node: &ClassifiedNode, block: &mut DeclarationBlock) {
    match &node.layout {
        LayoutModel::Flow {
            origin,
            direction,
            gap,
            padding,
            align,
            justify,
            width,
            height,
        } => {
            block.push("display", "flex");
            block.push("flex-direction", css::flex_direction(*direction));
            if *gap != 0.0 {
                block.push("gap", px(*gap));
            }
            if !padding.is_zero() {
                block.push("padding", css::padding(padding));
            }
            block.push("justify-content", css::justify_content(*justify));
            block.push("align-items", css::align_items(*align));
            match origin {
                Some(p) => {
                    block.push("position", "absolute");
                    block.push("left", px(p.x));
                    block.push("top", px(p.y));
                }
                None => block.push("position", "relative"),
            }
            block.push("width", px(*width));
            block.push("height", css::dimension(*height));
        }
        LayoutModel::FlowItem { width, height } => {
            block.push("width", px(*width));
            block.push("height", px(*height));
            if !node.children.is_empty() {
                block.push("position", "relative");
            }
        }
        LayoutModel::Absolute {
            x,
            y,
            width,
            height,
        } => {
            block.push("position", "absolute");
            block.push("left", px(*x));
            block.push("top", px(*y));
            block.push("width", px(*width));
            block.push("height", px(*height));
        }
    }
}

/// One `background` list, topmost layer first. Fills are declared bottom-up.
fn background_decls(
    node: &ClassifiedNode,
    ctx: &StylesheetContext<'_>,
    block: &mut DeclarationBlock,
) {
    let paintable: Vec<&Fill> = node
        .style
        .fills
        .iter()
        .filter(|f| match f {
            Fill::Image { image_ref, .. } => image_ref
                .as_ref()
                .is_some_and(|r| ctx.image_urls.contains_key(r)),
            Fill::DiamondGradient { .. } => false,
            _ => true,
        })
        .collect();

    let mut layers = Vec::new();
    let mut crop = false;
    let last = paintable.len().saturating_sub(1);
    for (i, fill) in paintable.iter().rev().enumerate() {
        let layer = match fill {
            Fill::Image {
                image_ref: Some(r),
                scale_mode,
            } => {
                crop |= *scale_mode == ScaleMode::Crop;
                ctx.image_urls.get(r).map(|url| css::image_layer(url, *scale_mode))
            }
            other => css::fill_layer(other, i == last),
        };
        layers.extend(layer);
    }

    if !layers.is_empty() {
        block.push("background", layers.join(", "));
    }
    if crop {
        block.push("overflow", "hidden");
    }
}

fn typography_decls(t: &Typography, ctx: &StylesheetContext<'_>, block: &mut DeclarationBlock) {
    block.push(
        "font-family",
        css::font_family(t.family.as_deref(), ctx.fallback_font_family),
    );
    if let Some(size) = t.size {
        block.push("font-size", px(size));
    }
    if let Some(weight) = t.weight.filter(|w| w.is_finite()) {
        block.push("font-weight", fmt_num(weight, 0));
    }
    if t.italic {
        block.push("font-style", "italic");
    }
    if let Some(lh) = css::line_height(t.line_height) {
        block.push("line-height", lh);
    }
    if t.letter_spacing != 0.0 {
        block.push("letter-spacing", px(t.letter_spacing));
    }
    block.push("text-align", css::text_align(t.align));
    if t.decoration != Default::default() {
        block.push("text-decoration", css::text_decoration(t.decoration));
    }
    if t.case != Default::default() {
        let (property, value) = css::text_case(t.case);
        block.push(property, value);
    }
    block.push("white-space", "pre-wrap");
}

fn override_decls(
    o: &TypographyOverride,
    ctx: &StylesheetContext<'_>,
    block: &mut DeclarationBlock,
) {
    if let Some(family) = &o.family {
        block.push(
            "font-family",
            css::font_family(Some(family), ctx.fallback_font_family),
        );
    }
    if let Some(size) = o.size {
        block.push("font-size", px(size));
    }
    if let Some(weight) = o.weight {
        block.push("font-weight", fmt_num(weight, 0));
    }
    if let Some(italic) = o.italic {
        block.push("font-style", if italic { "italic" } else { "normal" });
    }
    if let Some(lh) = o.line_height.and_then(css::line_height) {
        block.push("line-height", lh);
    }
    if let Some(ls) = o.letter_spacing {
        block.push("letter-spacing", px(ls));
    }
    if let Some(d) = o.decoration {
        block.push("text-decoration", css::text_decoration(d));
    }
    if let Some(case) = o.case {
        let (property, value) = css::text_case(case);
        block.push(property, value);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/emit/stylesheet.rs"]
mod tests;
