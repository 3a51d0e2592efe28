use std::fmt::Write as _;

use crate::classify::classifier::{ClassifiedNode, RenderStrategy};
use crate::emit::stylesheet::ASSET_OVERLAY_CLASS;
use crate::foundation::naming::{asset_file_name, class_name, run_class_name};

/// Inputs shared by every element of one markup document.
#[derive(Clone, Copy, Debug)]
pub struct MarkupContext<'a> {
    /// Prefix of every generated class.
    pub class_prefix: &'a str,
    /// Directory of rendered assets, relative to the markup.
    pub asset_dir: &'a str,
}

impl MarkupContext<'_> {
    /// Address the markup uses for a node's rendered asset.
    pub fn asset_src(&self, id: &str) -> String {
        let dir = self.asset_dir.trim_end_matches('/');
        if dir.is_empty() {
            asset_file_name(id)
        } else {
            format!("{dir}/{}", asset_file_name(id))
        }
    }
}

/// Emit the element tree for a classified root, two-space indented.
#[tracing::instrument(skip_all, fields(root = %root.id))]
pub fn emit_markup(root: &ClassifiedNode, ctx: &MarkupContext<'_>) -> String {
    let mut out = String::new();
    write_node(root, ctx, 0, &mut out);
    tracing::debug!(bytes = out.len(), "emitted markup");
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn write_node(node: &ClassifiedNode, ctx: &MarkupContext<'_>, depth: usize, out: &mut String) {
    let class = class_name(ctx.class_prefix, &node.id);
    let id = escape_html(&node.id);
    indent(out, depth);

    match node.strategy {
        RenderStrategy::ImageFallback if node.children.is_empty() => {
            let _ = writeln!(
                out,
                r#"<img class="{class}" data-node-id="{id}" src="{}" alt="{}" />"#,
                escape_html(&ctx.asset_src(&node.id)),
                escape_html(&node.name)
            );
        }
        RenderStrategy::ImageFallback => {
            let _ = writeln!(out, r#"<div class="{class}" data-node-id="{id}">"#);
            indent(out, depth + 1);
            let _ = writeln!(
                out,
                r#"<img class="{ASSET_OVERLAY_CLASS}" src="{}" alt="{}" />"#,
                escape_html(&ctx.asset_src(&node.id)),
                escape_html(&node.name)
            );
            write_children(node, ctx, depth, out);
            indent(out, depth);
            out.push_str("</div>\n");
        }
        RenderStrategy::Text => {
            let _ = write!(out, r#"<p class="{class}" data-node-id="{id}">"#);
            if let Some(text) = &node.text {
                if text.runs.is_empty() {
                    out.push_str(&escape_text(&text.characters));
                } else {
                    for (index, run) in text.runs.iter().enumerate() {
                        let _ = write!(
                            out,
                            r#"<span class="{}">{}</span>"#,
                            run_class_name(ctx.class_prefix, &node.id, index),
                            escape_text(&run.text)
                        );
                    }
                }
            }
            out.push_str("</p>\n");
        }
        RenderStrategy::Markup if node.children.is_empty() => {
            let _ = writeln!(out, r#"<div class="{class}" data-node-id="{id}"></div>"#);
        }
        RenderStrategy::Markup => {
            let _ = writeln!(out, r#"<div class="{class}" data-node-id="{id}">"#);
            write_children(node, ctx, depth, out);
            indent(out, depth);
            out.push_str("</div>\n");
        }
    }
}

fn write_children(node: &ClassifiedNode, ctx: &MarkupContext<'_>, depth: usize, out: &mut String) {
    for child in &node.children {
        write_node(child, ctx, depth + 1, out);
    }
}

/// Escape `& < > " '` for element content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escaped text with line breaks as `<br />`.
fn escape_text(s: &str) -> String {
    escape_html(s)
        .replace("\r\n", "\n")
        .replace('\n', "<br />")
}

/// Wrap an emitted body in a standalone HTML5 document.
pub fn render_document(title: &str, body: &str, stylesheet_href: &str) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n");
    out.push_str("<html lang=\"en\">\n<head>\n");
    out.push_str("  <meta charset=\"utf-8\" />\n");
    out.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");
    let _ = writeln!(out, "  <title>{}</title>", escape_html(title));
    let _ = writeln!(
        out,
        "  <link rel=\"stylesheet\" href=\"{}\" />",
        escape_html(stylesheet_href)
    );
    out.push_str("</head>\n<body>\n");
    for line in body.lines() {
        if line.is_empty() {
            out.push('\n');
        } else {
            let _ = writeln!(out, "  {line}");
        }
    }
    out.push_str("</body>\n</html>\n");
    out
}

#[cfg(test)]
#[path = "../../tests/unit/emit/markup.rs"]
mod tests;
