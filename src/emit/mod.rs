//! Markup and stylesheet text generation.

pub(crate) mod css;
pub mod markup;
pub mod stylesheet;

pub use markup::{MarkupContext, emit_markup, escape_html, render_document};
pub use stylesheet::{ASSET_OVERLAY_CLASS, StylesheetContext, emit_stylesheet};
