//! figdom converts design-tool document trees into semantic HTML and CSS.
//!
//! A conversion runs in fixed stages:
//!
//! - Normalize the raw, loosely-typed node tree into a [`NormalizedNode`] tree
//! - Classify every node as text, markup or image fallback
//! - Ask an [`AssetExporter`] for the bitmaps of fallback nodes
//! - Emit markup, stylesheet and an [`AssetPlan`]
//!
//! Every stage except the exporter call is pure and deterministic: the same input and options
//! always yield byte-identical output.
#![forbid(unsafe_code)]

mod foundation;

/// Asset exporter boundary and output asset planning.
pub mod assets;
/// Per-node render strategy decision.
pub mod classify;
/// Raw and normalized document models.
pub mod document;
/// Markup and stylesheet emission.
pub mod emit;
/// Raw tree → normalized tree.
pub mod normalize;
/// End-to-end conversion.
pub mod pipeline;

pub use crate::foundation::core::{Affine, Color, Edges, Point, Rect, Rgba8, Size, Vec2};
pub use crate::foundation::error::{FigdomError, FigdomResult};
pub use crate::foundation::naming::{asset_file_name, class_name, safe_id};

pub use crate::assets::{AssetExporter, AssetPlan, LocalAssetDir, NoExport, ResolvedAssets};
pub use crate::classify::{
    ClassifiedNode, ClassifierPolicy, FallbackReason, FillPolicy, RenderStrategy, StrategyCounts,
    TextPolicy,
};
pub use crate::document::model::{NodeKind, NormalizeStats, NormalizedNode};
pub use crate::document::raw::{RawDocument, RawNode};
pub use crate::normalize::{NormalizedTree, SourceInfo, normalize};
pub use crate::pipeline::{ConversionOutput, ConvertOpts, Converter, PreparedConversion};
