use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::document::model::{
    Fill, LayoutModel, NodeKind, NormalizedNode, StrokeAlign, StrokePaint, StyleModel,
    TextContent,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// How a node is reproduced in the output.
pub enum RenderStrategy {
    /// Live text element styled by the stylesheet.
    Text,
    /// Box element whose look is fully expressed by stylesheet declarations.
    Markup,
    /// Rendered bitmap referenced from the markup.
    ImageFallback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// First rule that forced an image fallback.
pub enum FallbackReason {
    /// Vector geometry has no box-model equivalent.
    VectorGeometry,
    /// The node masks its siblings.
    Mask,
    /// More than one stroke, or a stroke that is not a solid centered line.
    ComplexStroke,
    /// A fill the active fill policy cannot express.
    UnsupportedFill,
    /// A blend mode other than normal or pass-through.
    BlendMode,
    /// Several shadows, or any blur.
    ComplexEffects,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// What happens to text nodes with styling the stylesheet cannot reproduce.
pub enum TextPolicy {
    /// Complex text becomes an image fallback.
    #[default]
    DowngradeComplex,
    /// Text always stays live text.
    KeepText,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Fill kinds treated as expressible.
pub enum FillPolicy {
    /// Solid, image, linear, radial and conic fills.
    #[default]
    Extended,
    /// Solid fills only.
    SolidOnly,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Configurable classification policy.
///
/// Defaults, also used for fields absent from a JSON config:
///
/// - `text`: [`TextPolicy::DowngradeComplex`]
/// - `fills`: [`FillPolicy::Extended`]
/// - `rasterize_vectors`: `true`
pub struct ClassifierPolicy {
    /// Text downgrade policy.
    pub text: TextPolicy,
    /// Fill expressibility policy.
    pub fills: FillPolicy,
    /// Rasterize vector geometry.
    pub rasterize_vectors: bool,
}

impl Default for ClassifierPolicy {
    fn default() -> Self {
        Self {
            text: TextPolicy::default(),
            fills: FillPolicy::default(),
            rasterize_vectors: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Result of classifying one node.
pub struct Classification {
    /// Chosen strategy.
    pub strategy: RenderStrategy,
    /// Set only for [`RenderStrategy::ImageFallback`].
    pub reason: Option<FallbackReason>,
}

struct Rule {
    reason: FallbackReason,
    fires: fn(NodeKind, &StyleModel, &ClassifierPolicy) -> bool,
}

/// Fallback rules in priority order; the first that fires wins.
const RULES: &[Rule] = &[
    Rule {
        reason: FallbackReason::VectorGeometry,
        fires: vector_geometry,
    },
    Rule {
        reason: FallbackReason::Mask,
        fires: is_mask,
    },
    Rule {
        reason: FallbackReason::ComplexStroke,
        fires: complex_stroke,
    },
    Rule {
        reason: FallbackReason::UnsupportedFill,
        fires: unsupported_fill,
    },
    Rule {
        reason: FallbackReason::BlendMode,
        fires: non_normal_blend,
    },
    Rule {
        reason: FallbackReason::ComplexEffects,
        fires: complex_effects,
    },
];

fn vector_geometry(kind: NodeKind, _: &StyleModel, policy: &ClassifierPolicy) -> bool {
    kind == NodeKind::Vector && policy.rasterize_vectors
}

fn is_mask(_: NodeKind, style: &StyleModel, _: &ClassifierPolicy) -> bool {
    style.is_mask
}

fn complex_stroke(_: NodeKind, style: &StyleModel, _: &ClassifierPolicy) -> bool {
    match style.strokes.as_slice() {
        [] => false,
        [only] => {
            !matches!(only.paint, StrokePaint::Solid { .. })
                || only.align != StrokeAlign::Center
                || !only.dashes.is_empty()
        }
        _ => true,
    }
}

fn unsupported_fill(_: NodeKind, style: &StyleModel, policy: &ClassifierPolicy) -> bool {
    style.fills.iter().any(|fill| match policy.fills {
        FillPolicy::Extended => matches!(fill, Fill::DiamondGradient { .. }),
        FillPolicy::SolidOnly => !matches!(fill, Fill::Solid { .. }),
    })
}

fn non_normal_blend(_: NodeKind, style: &StyleModel, _: &ClassifierPolicy) -> bool {
    style
        .blend_mode
        .as_deref()
        .is_some_and(|m| m != "normal" && m != "pass-through")
}

fn complex_effects(_: NodeKind, style: &StyleModel, _: &ClassifierPolicy) -> bool {
    let shadows = style.effects.iter().filter(|e| e.is_shadow()).count();
    shadows > 1 || style.effects.iter().any(|e| e.is_blur())
}

/// Decide the strategy for one node from its own kind and style.
pub fn classify_node(
    kind: NodeKind,
    style: &StyleModel,
    policy: &ClassifierPolicy,
) -> Classification {
    let fired = RULES
        .iter()
        .find(|rule| (rule.fires)(kind, style, policy))
        .map(|rule| rule.reason);

    let fallback = |reason| Classification {
        strategy: RenderStrategy::ImageFallback,
        reason: Some(reason),
    };
    let plain = |strategy| Classification {
        strategy,
        reason: None,
    };

    match (kind, fired) {
        (NodeKind::Text, Some(reason)) if policy.text == TextPolicy::DowngradeComplex => {
            fallback(reason)
        }
        (NodeKind::Text, _) => plain(RenderStrategy::Text),
        (_, Some(reason)) => fallback(reason),
        (_, None) => plain(RenderStrategy::Markup),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Normalized node annotated with its render strategy.
pub struct ClassifiedNode {
    /// Stable node id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Normalized kind.
    pub kind: NodeKind,
    /// Resolved layout.
    pub layout: LayoutModel,
    /// Resolved style.
    pub style: StyleModel,
    /// Text content for text nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,
    /// Chosen strategy.
    pub strategy: RenderStrategy,
    /// Why the node falls back to an image, if it does.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<FallbackReason>,
    /// Children in paint order.
    pub children: Vec<ClassifiedNode>,
}

impl ClassifiedNode {
    /// Pre-order traversal.
    pub fn walk(&self, f: &mut impl FnMut(&ClassifiedNode)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Number of nodes per strategy.
pub struct StrategyCounts {
    /// Live text nodes.
    pub text: usize,
    /// Markup nodes.
    pub markup: usize,
    /// Image-fallback nodes.
    pub image_fallback: usize,
}

impl StrategyCounts {
    /// Count every node of a classified tree.
    pub fn of(root: &ClassifiedNode) -> Self {
        let mut counts = Self::default();
        root.walk(&mut |node| match node.strategy {
            RenderStrategy::Text => counts.text += 1,
            RenderStrategy::Markup => counts.markup += 1,
            RenderStrategy::ImageFallback => counts.image_fallback += 1,
        });
        counts
    }
}

/// Classify every node of a normalized tree.
///
/// Each node is judged on its own attributes. An image-fallback node keeps its classified
/// children.
#[tracing::instrument(skip_all, fields(root = %root.id))]
pub fn classify_tree(root: NormalizedNode, policy: &ClassifierPolicy) -> ClassifiedNode {
    let classified = classify_owned(root, policy);
    let counts = StrategyCounts::of(&classified);
    tracing::debug!(
        text = counts.text,
        markup = counts.markup,
        image_fallback = counts.image_fallback,
        "classified tree"
    );
    classified
}

fn classify_owned(node: NormalizedNode, policy: &ClassifierPolicy) -> ClassifiedNode {
    let Classification { strategy, reason } = classify_node(node.kind, &node.style, policy);
    ClassifiedNode {
        id: node.id,
        name: node.name,
        kind: node.kind,
        layout: node.layout,
        style: node.style,
        text: node.text,
        strategy,
        fallback_reason: reason,
        children: node
            .children
            .into_iter()
            .map(|child| classify_owned(child, policy))
            .collect(),
    }
}

/// Sorted, de-duplicated ids of every image-fallback node.
pub fn fallback_ids(root: &ClassifiedNode) -> Vec<String> {
    let mut ids = BTreeSet::new();
    root.walk(&mut |node| {
        if node.strategy == RenderStrategy::ImageFallback {
            ids.insert(node.id.clone());
        }
    });
    ids.into_iter().collect()
}

/// Sorted, distinct image-fill references of markup nodes; only their fills reach the stylesheet.
pub fn image_refs(root: &ClassifiedNode) -> Vec<String> {
    let mut refs = BTreeSet::new();
    root.walk(&mut |node| {
        if node.strategy != RenderStrategy::Markup {
            return;
        }
        for fill in &node.style.fills {
            if let Fill::Image {
                image_ref: Some(r), ..
            } = fill
            {
                refs.insert(r.clone());
            }
        }
    });
    refs.into_iter().collect()
}

#[cfg(test)]
#[path = "../../tests/unit/classify/classifier.rs"]
mod tests;
