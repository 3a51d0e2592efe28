use std::collections::BTreeSet;

use crate::{
    document::model::{FlowMode, NodeKind, NormalizeStats, NormalizedNode},
    document::raw::{RawDocument, RawNode},
    foundation::core::Rect,
    foundation::error::{FigdomError, FigdomResult},
    normalize::mapper::{MappedKind, map_kind, map_node, node_box},
};

/// Nodes nested deeper than this are dropped with a warning.
pub const MAX_DEPTH: usize = 256;

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Provenance of a normalized tree.
pub struct SourceInfo {
    /// Display name of the design file.
    pub name: Option<String>,
    /// Cache token supplied by the fetch layer.
    pub last_modified: Option<String>,
}

#[derive(Clone, Debug, serde::Serialize)]
/// Output of [`normalize`].
pub struct NormalizedTree {
    /// Normalized conversion root.
    pub root: NormalizedNode,
    /// Non-fatal findings in traversal order.
    pub warnings: Vec<String>,
    /// Aggregate node counts.
    pub stats: NormalizeStats,
    /// Provenance copied from the raw document.
    pub source: SourceInfo,
}

/// Warnings and counts produced by one subtree; returned to the caller and merged there.
#[derive(Debug, Default)]
pub(crate) struct NormalizeAccum {
    pub(crate) warnings: Vec<String>,
    pub(crate) stats: NormalizeStats,
}

impl NormalizeAccum {
    fn merge(&mut self, other: Self) {
        self.warnings.extend(other.warnings);
        self.stats.merge(&other.stats);
    }

    fn drop_node(&mut self, warning: String) {
        self.stats.nodes_total += 1;
        self.stats.dropped += 1;
        self.warnings.push(warning);
    }
}

/// Placement context handed from a parent to each child.
#[derive(Clone, Copy)]
struct Parent<'a> {
    id: &'a str,
    bbox: Option<Rect>,
    flow: FlowMode,
    depth: usize,
}

/// Normalize a raw document into the typed tree.
///
/// Fails only when the root carries no `children` list. Everything else that is malformed is
/// coerced, skipped or dropped and reported through `warnings`.
#[tracing::instrument(skip(doc), fields(name = doc.name.as_deref().unwrap_or_default()))]
pub fn normalize(doc: &RawDocument) -> FigdomResult<NormalizedTree> {
    let raw = &doc.document;
    if raw.children.is_none() {
        return Err(FigdomError::validation(
            "document root has no children list",
        ));
    }

    let id = raw_id(raw).unwrap_or_else(|| "0".to_owned());
    let mut accum = NormalizeAccum::default();
    let kind = match map_kind(raw) {
        MappedKind::Node(kind) => kind,
        MappedKind::NonVisual | MappedKind::Unrenderable => {
            accum.warnings.push(format!(
                "node {id}: root kind '{}' is not renderable, treating it as a container",
                raw.kind.as_deref().unwrap_or("<missing>")
            ));
            NodeKind::Container
        }
    };

    let mut seen = BTreeSet::from([id.clone()]);
    // The root's own box is its parent origin, which places it at (0, 0).
    let root_box = node_box(raw);
    let (root, sub) = build(raw, id, kind, root_box, FlowMode::None, 0, &mut seen);
    accum.merge(sub);

    tracing::debug!(
        nodes = accum.stats.nodes_total,
        dropped = accum.stats.dropped,
        skipped = accum.stats.skipped,
        warnings = accum.warnings.len(),
        "normalized document"
    );

    Ok(NormalizedTree {
        root,
        warnings: accum.warnings,
        stats: accum.stats,
        source: SourceInfo {
            name: doc.name.clone(),
            last_modified: doc.last_modified.clone(),
        },
    })
}

fn raw_id(raw: &RawNode) -> Option<String> {
    raw.id.clone().filter(|id| !id.trim().is_empty())
}

fn build(
    raw: &RawNode,
    id: String,
    kind: NodeKind,
    parent_box: Option<Rect>,
    parent_flow: FlowMode,
    depth: usize,
    seen: &mut BTreeSet<String>,
) -> (NormalizedNode, NormalizeAccum) {
    let mut accum = NormalizeAccum::default();
    let mapped = map_node(raw, &id, kind, parent_box, parent_flow);
    accum.warnings.extend(mapped.warnings);

    accum.stats.nodes_total += 1;
    accum.stats.count_kind(kind);
    if mapped.style.has_gradient() {
        accum.stats.with_gradient += 1;
    }
    if mapped.style.is_mask {
        accum.stats.with_mask += 1;
    }

    let here = Parent {
        id: &id,
        bbox: node_box(raw),
        flow: mapped.layout.flow_mode(),
        depth,
    };
    let mut children = Vec::new();
    for (index, child) in raw.children.iter().flatten().enumerate() {
        let (node, sub) = visit(child, index, here, seen);
        accum.merge(sub);
        children.extend(node);
    }

    let node = NormalizedNode {
        name: raw.name.clone().unwrap_or_default(),
        id,
        kind,
        layout: mapped.layout,
        style: mapped.style,
        text: mapped.text,
        children,
    };
    (node, accum)
}

fn visit(
    raw: &RawNode,
    index: usize,
    parent: Parent<'_>,
    seen: &mut BTreeSet<String>,
) -> (Option<NormalizedNode>, NormalizeAccum) {
    let mut accum = NormalizeAccum::default();
    if raw.visible == Some(false) {
        accum.stats.skipped += 1;
        return (None, accum);
    }

    let id = raw_id(raw).unwrap_or_else(|| format!("{}/{index}", parent.id));
    let kind = match map_kind(raw) {
        MappedKind::Node(kind) => kind,
        MappedKind::NonVisual => {
            accum.stats.skipped += 1;
            return (None, accum);
        }
        MappedKind::Unrenderable => {
            accum.drop_node(format!(
                "node {id}: unsupported node kind '{}', subtree dropped",
                raw.kind.as_deref().unwrap_or("<missing>")
            ));
            return (None, accum);
        }
    };

    let depth = parent.depth + 1;
    if depth > MAX_DEPTH {
        accum.drop_node(format!(
            "node {id}: nesting exceeds {MAX_DEPTH} levels, subtree dropped"
        ));
        return (None, accum);
    }
    if !seen.insert(id.clone()) {
        accum.drop_node(format!("node {id}: repeated id, subtree dropped"));
        return (None, accum);
    }

    let (node, sub) = build(raw, id, kind, parent.bbox, parent.flow, depth, seen);
    accum.merge(sub);
    (Some(node), accum)
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/pass.rs"]
mod tests;
