use std::{collections::BTreeMap, path::PathBuf};

use super::*;
use crate::assets::{AssetSource, NoExport};
use crate::classify::{FillPolicy, RenderStrategy};
use crate::foundation::naming::{asset_file_name, class_name};

const DOC: &str = r#"{
    "name": "Landing <page>",
    "lastModified": "2024-05-01T10:00:00Z",
    "document": {
        "id": "0:0", "type": "DOCUMENT",
        "children": [{
            "id": "1:1", "type": "FRAME", "name": "Hero",
            "absoluteBoundingBox": { "x": 0, "y": 0, "width": 320, "height": 200 },
            "fills": [{ "type": "SOLID", "color": { "r": 1, "g": 1, "b": 1, "a": 1 } }],
            "children": [
                { "id": "1:2", "type": "TEXT", "name": "Title", "characters": "Hello",
                  "absoluteBoundingBox": { "x": 16, "y": 16, "width": 100, "height": 24 },
                  "style": { "fontFamily": "Inter", "fontSize": 20 } },
                { "id": "1:3", "type": "VECTOR", "name": "Logo",
                  "absoluteBoundingBox": { "x": 200, "y": 16, "width": 32, "height": 32 } },
                { "id": "1:4", "type": "RECTANGLE", "name": "Photo",
                  "fills": [{ "type": "IMAGE", "imageRef": "img1", "scaleMode": "FILL" }] },
                { "id": "1:5", "type": "RECTANGLE", "name": "Banner",
                  "fills": [{ "type": "GRADIENT_RADIAL", "gradientStops": [] }] },
                { "id": "1:6", "type": "FRAME", "name": "Caption",
                  "children": [{ "id": "1:7", "type": "TEXT", "characters": "Fine print" }] }
            ]
        }]
    }
}"#;

fn doc() -> RawDocument {
    RawDocument::from_json_str(DOC).unwrap()
}

#[derive(Default)]
struct RecordingExporter {
    asked_nodes: Vec<Vec<String>>,
    asked_refs: Vec<Vec<String>>,
    rendered: BTreeMap<String, PathBuf>,
    fills: BTreeMap<String, PathBuf>,
}

impl AssetExporter for RecordingExporter {
    fn export_nodes(&mut self, ids: &[String]) -> FigdomResult<BTreeMap<String, PathBuf>> {
        self.asked_nodes.push(ids.to_vec());
        Ok(self.rendered.clone())
    }

    fn resolve_image_fills(&mut self, refs: &[String]) -> FigdomResult<BTreeMap<String, PathBuf>> {
        self.asked_refs.push(refs.to_vec());
        Ok(self.fills.clone())
    }
}

#[test]
fn default_opts_are_valid() {
    let opts = ConvertOpts::default();
    assert_eq!(opts.class_prefix, "fd-");
    assert_eq!(opts.asset_dir, "assets");
    opts.validate().unwrap();
}

#[test]
fn partial_json_keeps_defaults() {
    let opts = ConvertOpts::from_json_str(
        r#"{ "class_prefix": "x-", "classifier": { "fills": "solid_only" } }"#,
    )
    .unwrap();
    assert_eq!(opts.class_prefix, "x-");
    assert_eq!(opts.classifier.fills, FillPolicy::SolidOnly);
    assert!(opts.classifier.rasterize_vectors);
    assert_eq!(opts.stylesheet_href, "styles.css");
}

#[test]
fn invalid_opts_are_rejected() {
    for json in [
        r#"{ "class_prefix": "9a" }"#,
        r#"{ "class_prefix": "a b" }"#,
        r#"{ "asset_dir": "../out" }"#,
        r#"{ "asset_dir": "/abs" }"#,
        r#"{ "fallback_font_family": "  " }"#,
    ] {
        let err = ConvertOpts::from_json_str(json).unwrap_err();
        assert!(matches!(err, FigdomError::Validation(_)), "{json}");
    }
    assert!(matches!(
        ConvertOpts::from_json_str("[1]").unwrap_err(),
        FigdomError::Serde(_)
    ));
}

#[test]
fn prepare_lists_fallbacks_and_image_refs() {
    let prepared = Converter::default().prepare(&doc()).unwrap();
    assert_eq!(prepared.fallback_ids, vec!["1:3".to_owned()]);
    assert_eq!(prepared.image_refs, vec!["img1".to_owned()]);
    assert_eq!(prepared.source.last_modified.as_deref(), Some("2024-05-01T10:00:00Z"));
    assert_eq!(prepared.tree.children[0].children[0].strategy, RenderStrategy::Text);
}

#[test]
fn missing_exports_become_placeholders_with_warnings() {
    let out = Converter::default().convert(&doc(), &mut NoExport).unwrap();

    assert_eq!(out.assets.entries.len(), 1);
    let entry = &out.assets.entries[0];
    assert_eq!(entry.node_id, "1:3");
    assert!(matches!(entry.source, AssetSource::Placeholder(_)));
    assert!(
        out.markup
            .contains(&format!("src=\"assets/{}\"", asset_file_name("1:3")))
    );
    assert!(out.warnings.iter().any(|w| w.contains("1:3")));
    assert!(out.warnings.iter().any(|w| w.contains("img1")));
    assert_eq!(out.strategy_counts.image_fallback, 1);
    assert_eq!(out.last_modified.as_deref(), Some("2024-05-01T10:00:00Z"));
}

#[test]
fn exporter_is_asked_once_with_sorted_inputs() {
    let mut exporter = RecordingExporter::default();
    exporter
        .rendered
        .insert("1:3".to_owned(), PathBuf::from("/r/logo.png"));
    exporter
        .fills
        .insert("img1".to_owned(), PathBuf::from("/r/images/img1.png"));

    let out = Converter::default().convert(&doc(), &mut exporter).unwrap();
    assert_eq!(exporter.asked_nodes, vec![vec!["1:3".to_owned()]]);
    assert_eq!(exporter.asked_refs, vec![vec!["img1".to_owned()]]);
    assert_eq!(out.assets.placeholder_count(), 0);
    assert_eq!(out.assets.image_fills.len(), 1);
    assert!(out.stylesheet.contains("url(\"assets/images/img1-"));
    assert!(out.warnings.iter().all(|w| !w.contains("img1")));
}

#[test]
fn exporter_is_not_called_without_fallbacks() {
    let mut exporter = RecordingExporter::default();
    let opts = ConvertOpts {
        root_node: Some("1:6".to_owned()),
        ..ConvertOpts::default()
    };
    let out = Converter::new(opts).convert(&doc(), &mut exporter).unwrap();
    assert!(exporter.asked_nodes.is_empty());
    assert!(exporter.asked_refs.is_empty());
    assert!(out.assets.entries.is_empty());
    assert_eq!(out.tree.id, "1:6");
    assert!(out.markup.starts_with("<div "));
    assert!(out.markup.contains("Fine print"));
}

#[test]
fn unknown_root_node_is_a_validation_error() {
    let opts = ConvertOpts {
        root_node: Some("404:1".to_owned()),
        ..ConvertOpts::default()
    };
    let err = Converter::new(opts).prepare(&doc()).unwrap_err();
    assert!(matches!(err, FigdomError::Validation(_)));
}

#[test]
fn document_wraps_markup_with_escaped_title() {
    let out = Converter::default().convert(&doc(), &mut NoExport).unwrap();
    assert!(out.document.contains("<title>Landing &lt;page&gt;</title>"));
    assert!(out.document.contains("href=\"styles.css\""));
    assert!(out.stylesheet.contains(&format!(".{}", class_name("fd-", "1:2"))));

    let titled = Converter::new(ConvertOpts {
        title: Some("Home".to_owned()),
        ..ConvertOpts::default()
    })
    .convert(&doc(), &mut NoExport)
    .unwrap();
    assert!(titled.document.contains("<title>Home</title>"));
}

#[test]
fn conversion_is_deterministic() {
    let converter = Converter::default();
    let a = converter.convert(&doc(), &mut NoExport).unwrap();
    let b = converter.convert(&doc(), &mut NoExport).unwrap();
    assert_eq!(a.markup, b.markup);
    assert_eq!(a.stylesheet, b.stylesheet);
    assert_eq!(a.warnings, b.warnings);
    assert_eq!(a.assets, b.assets);
}
