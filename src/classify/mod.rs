//! Per-node capability decision.

pub mod classifier;

pub use classifier::{
    ClassifiedNode, Classification, ClassifierPolicy, FallbackReason, FillPolicy, RenderStrategy,
    StrategyCounts, TextPolicy, classify_node, classify_tree, fallback_ids, image_refs,
};
