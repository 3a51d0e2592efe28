use super::*;
use crate::document::model::{
    ColorStop, Effect, LayoutModel, ScaleMode, Shadow, Stroke, TextContent,
};
use crate::foundation::core::Color;

fn solid(r: f64) -> Fill {
    Fill::Solid {
        color: Color::rgba(r, 0.0, 0.0, 1.0),
        opacity: 1.0,
    }
}

fn linear() -> Fill {
    Fill::LinearGradient {
        angle_deg: 90.0,
        stops: vec![
            ColorStop {
                position: 0.0,
                color: Color::BLACK,
            },
            ColorStop {
                position: 1.0,
                color: Color::TRANSPARENT,
            },
        ],
    }
}

fn stroke(align: StrokeAlign) -> Stroke {
    Stroke {
        align,
        width: 1.0,
        paint: StrokePaint::Solid {
            color: Color::BLACK,
        },
        dashes: Vec::new(),
    }
}

fn shadow() -> Effect {
    Effect::DropShadow(Shadow {
        offset_x: 0.0,
        offset_y: 2.0,
        blur: 4.0,
        spread: 0.0,
        color: Color::BLACK,
    })
}

fn node(
    id: &str,
    kind: NodeKind,
    style: StyleModel,
    children: Vec<NormalizedNode>,
) -> NormalizedNode {
    NormalizedNode {
        id: id.to_owned(),
        name: id.to_owned(),
        kind,
        layout: LayoutModel::FlowItem {
            width: 10.0,
            height: 10.0,
        },
        style,
        text: (kind == NodeKind::Text).then(|| TextContent {
            characters: "hi".to_owned(),
            runs: Vec::new(),
        }),
        children,
    }
}

fn strategy(kind: NodeKind, style: &StyleModel, policy: &ClassifierPolicy) -> RenderStrategy {
    classify_node(kind, style, policy).strategy
}

#[test]
fn plain_box_is_markup_and_plain_text_is_text() {
    let policy = ClassifierPolicy::default();
    let style = StyleModel {
        fills: vec![solid(1.0)],
        ..StyleModel::default()
    };
    assert_eq!(
        classify_node(NodeKind::Container, &style, &policy),
        Classification {
            strategy: RenderStrategy::Markup,
            reason: None
        }
    );
    assert_eq!(strategy(NodeKind::Text, &style, &policy), RenderStrategy::Text);
}

#[test]
fn two_strokes_fall_back() {
    let style = StyleModel {
        strokes: vec![stroke(StrokeAlign::Center), stroke(StrokeAlign::Center)],
        ..StyleModel::default()
    };
    let c = classify_node(NodeKind::Container, &style, &ClassifierPolicy::default());
    assert_eq!(c.strategy, RenderStrategy::ImageFallback);
    assert_eq!(c.reason, Some(FallbackReason::ComplexStroke));
}

#[test]
fn single_stroke_must_be_solid_centered_and_undashed() {
    let policy = ClassifierPolicy::default();
    let centered = StyleModel {
        strokes: vec![stroke(StrokeAlign::Center)],
        ..StyleModel::default()
    };
    assert_eq!(strategy(NodeKind::Container, &centered, &policy), RenderStrategy::Markup);

    let inside = StyleModel {
        strokes: vec![stroke(StrokeAlign::Inside)],
        ..StyleModel::default()
    };
    assert_eq!(
        strategy(NodeKind::Container, &inside, &policy),
        RenderStrategy::ImageFallback
    );

    let mut dashed = stroke(StrokeAlign::Center);
    dashed.dashes = vec![4.0, 2.0];
    let dashed = StyleModel {
        strokes: vec![dashed],
        ..StyleModel::default()
    };
    assert_eq!(
        strategy(NodeKind::Container, &dashed, &policy),
        RenderStrategy::ImageFallback
    );
}

#[test]
fn text_policy_controls_downgrade() {
    let complex = StyleModel {
        fills: vec![solid(0.0)],
        effects: vec![shadow(), shadow()],
        ..StyleModel::default()
    };
    let downgrade = ClassifierPolicy::default();
    let keep = ClassifierPolicy {
        text: TextPolicy::KeepText,
        ..ClassifierPolicy::default()
    };
    let c = classify_node(NodeKind::Text, &complex, &downgrade);
    assert_eq!(c.strategy, RenderStrategy::ImageFallback);
    assert_eq!(c.reason, Some(FallbackReason::ComplexEffects));
    assert_eq!(
        classify_node(NodeKind::Text, &complex, &keep),
        Classification {
            strategy: RenderStrategy::Text,
            reason: None
        }
    );
}

#[test]
fn fill_policy_controls_gradients() {
    let style = StyleModel {
        fills: vec![solid(1.0), linear()],
        ..StyleModel::default()
    };
    let extended = ClassifierPolicy::default();
    let solid_only = ClassifierPolicy {
        fills: FillPolicy::SolidOnly,
        ..ClassifierPolicy::default()
    };
    assert_eq!(strategy(NodeKind::Container, &style, &extended), RenderStrategy::Markup);
    assert_eq!(
        classify_node(NodeKind::Container, &style, &solid_only).reason,
        Some(FallbackReason::UnsupportedFill)
    );

    let diamond = StyleModel {
        fills: vec![Fill::DiamondGradient { stops: Vec::new() }],
        ..StyleModel::default()
    };
    assert_eq!(
        strategy(NodeKind::Container, &diamond, &extended),
        RenderStrategy::ImageFallback
    );

    let photo = StyleModel {
        fills: vec![Fill::Image {
            image_ref: Some("abc".to_owned()),
            scale_mode: ScaleMode::Fill,
        }],
        ..StyleModel::default()
    };
    assert_eq!(strategy(NodeKind::Image, &photo, &extended), RenderStrategy::Markup);
    assert_eq!(
        strategy(NodeKind::Image, &photo, &solid_only),
        RenderStrategy::ImageFallback
    );
}

#[test]
fn vectors_masks_blends_and_blurs() {
    let policy = ClassifierPolicy::default();
    let plain = StyleModel::default();
    assert_eq!(
        classify_node(NodeKind::Vector, &plain, &policy).reason,
        Some(FallbackReason::VectorGeometry)
    );
    let no_raster = ClassifierPolicy {
        rasterize_vectors: false,
        ..ClassifierPolicy::default()
    };
    assert_eq!(strategy(NodeKind::Vector, &plain, &no_raster), RenderStrategy::Markup);

    let mask = StyleModel {
        is_mask: true,
        ..StyleModel::default()
    };
    assert_eq!(
        classify_node(NodeKind::Container, &mask, &policy).reason,
        Some(FallbackReason::Mask)
    );

    for (mode, expected) in [
        ("normal", RenderStrategy::Markup),
        ("pass-through", RenderStrategy::Markup),
        ("multiply", RenderStrategy::ImageFallback),
    ] {
        let style = StyleModel {
            blend_mode: Some(mode.to_owned()),
            ..StyleModel::default()
        };
        assert_eq!(strategy(NodeKind::Container, &style, &policy), expected, "{mode}");
    }

    let blurred = StyleModel {
        effects: vec![Effect::LayerBlur { radius: 4.0 }],
        ..StyleModel::default()
    };
    assert_eq!(
        strategy(NodeKind::Container, &blurred, &policy),
        RenderStrategy::ImageFallback
    );
    let one_shadow = StyleModel {
        effects: vec![shadow()],
        ..StyleModel::default()
    };
    assert_eq!(strategy(NodeKind::Container, &one_shadow, &policy), RenderStrategy::Markup);
}

#[test]
fn first_matching_rule_names_the_reason() {
    let style = StyleModel {
        is_mask: true,
        strokes: vec![stroke(StrokeAlign::Center), stroke(StrokeAlign::Center)],
        ..StyleModel::default()
    };
    assert_eq!(
        classify_node(NodeKind::Container, &style, &ClassifierPolicy::default()).reason,
        Some(FallbackReason::Mask)
    );
}

#[test]
fn classification_is_pure_and_stable() {
    let style = StyleModel {
        fills: vec![linear(), solid(0.5)],
        effects: vec![shadow()],
        ..StyleModel::default()
    };
    let policy = ClassifierPolicy::default();
    let first = classify_node(NodeKind::Container, &style, &policy);
    for _ in 0..8 {
        assert_eq!(classify_node(NodeKind::Container, &style, &policy), first);
    }
}

#[test]
fn tree_classification_is_independent_per_node() {
    let vector = node("3:1", NodeKind::Vector, StyleModel::default(), Vec::new());
    let text = node("3:2", NodeKind::Text, StyleModel::default(), Vec::new());
    let masked_group = node(
        "2:1",
        NodeKind::Container,
        StyleModel {
            is_mask: true,
            ..StyleModel::default()
        },
        vec![text],
    );
    let photo = node(
        "2:2",
        NodeKind::Image,
        StyleModel {
            fills: vec![
                Fill::Image {
                    image_ref: Some("img-b".to_owned()),
                    scale_mode: ScaleMode::Fill,
                },
                Fill::Image {
                    image_ref: Some("img-a".to_owned()),
                    scale_mode: ScaleMode::Tile,
                },
            ],
            ..StyleModel::default()
        },
        Vec::new(),
    );
    let root = node(
        "1:1",
        NodeKind::Container,
        StyleModel::default(),
        vec![masked_group, vector, photo],
    );

    let classified = classify_tree(root, &ClassifierPolicy::default());
    assert_eq!(classified.strategy, RenderStrategy::Markup);
    assert_eq!(classified.children[0].strategy, RenderStrategy::ImageFallback);
    assert_eq!(
        classified.children[0].children[0].strategy,
        RenderStrategy::Text
    );
    assert_eq!(fallback_ids(&classified), vec!["2:1", "3:1"]);
    assert_eq!(image_refs(&classified), vec!["img-a", "img-b"]);
    assert_eq!(
        StrategyCounts::of(&classified),
        StrategyCounts {
            text: 1,
            markup: 2,
            image_fallback: 2
        }
    );
}

#[test]
fn default_policy_and_partial_config() {
    let policy = ClassifierPolicy::default();
    assert_eq!(policy.text, TextPolicy::DowngradeComplex);
    assert_eq!(policy.fills, FillPolicy::Extended);
    assert!(policy.rasterize_vectors);

    let partial: ClassifierPolicy = serde_json::from_str(r#"{ "fills": "solid_only" }"#).unwrap();
    assert_eq!(
        partial,
        ClassifierPolicy {
            fills: FillPolicy::SolidOnly,
            ..ClassifierPolicy::default()
        }
    );
}
