use super::*;
use crate::classify::classifier::{ClassifierPolicy, classify_tree};
use crate::document::raw::RawDocument;
use crate::normalize::normalize;

const CTX: MarkupContext<'static> = MarkupContext {
    class_prefix: "fd-",
    asset_dir: "assets",
};

fn classify(json: &str) -> ClassifiedNode {
    let doc = RawDocument::from_json_str(json).unwrap();
    classify_tree(normalize(&doc).unwrap().root, &ClassifierPolicy::default())
}

#[test]
fn escape_covers_the_five_specials() {
    assert_eq!(
        escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
        "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
    );
}

#[test]
fn containers_nest_with_two_space_indent() {
    let root = classify(
        r#"{ "id": "1:1", "type": "FRAME", "children": [
              { "id": "2:1", "type": "FRAME", "children": [
                  { "id": "3:1", "type": "TEXT", "characters": "a < b" }
              ] }
           ] }"#,
    );
    let html = emit_markup(&root, &CTX);
    let expected = format!(
        concat!(
            "<div class=\"{c1}\" data-node-id=\"1:1\">\n",
            "  <div class=\"{c2}\" data-node-id=\"2:1\">\n",
            "    <p class=\"{c3}\" data-node-id=\"3:1\">a &lt; b</p>\n",
            "  </div>\n",
            "</div>\n",
        ),
        c1 = class_name("fd-", "1:1"),
        c2 = class_name("fd-", "2:1"),
        c3 = class_name("fd-", "3:1"),
    );
    assert_eq!(html, expected);
}

#[test]
fn fallback_leaf_is_an_img_at_the_asset_address() {
    let root = classify(
        r#"{ "id": "1:1", "type": "FRAME", "children": [
              { "id": "2:1", "name": "Logo \"mark\"", "type": "VECTOR" }
           ] }"#,
    );
    let html = emit_markup(&root, &CTX);
    let line = format!(
        r#"  <img class="{}" data-node-id="2:1" src="assets/{}" alt="Logo &quot;mark&quot;" />"#,
        class_name("fd-", "2:1"),
        asset_file_name("2:1")
    );
    assert!(html.contains(&line), "{html}");
}

#[test]
fn fallback_with_children_wraps_an_overlay_image() {
    let root = classify(
        r#"{ "id": "1:1", "type": "FRAME", "isMask": true, "children": [
              { "id": "2:1", "type": "TEXT", "characters": "kept" }
           ] }"#,
    );
    let html = emit_markup(&root, &CTX);
    let lines: Vec<&str> = html.lines().collect();
    assert!(lines[0].starts_with("<div class="));
    assert!(lines[1].starts_with(&format!("  <img class=\"{ASSET_OVERLAY_CLASS}\"")));
    assert!(lines[2].starts_with("  <p class="));
    assert_eq!(lines[3], "</div>");
}

#[test]
fn styled_runs_become_spans_with_line_breaks() {
    let root = classify(
        r#"{ "id": "1:1", "type": "FRAME", "children": [
              { "id": "2:1", "type": "TEXT", "characters": "ab\nc",
                "characterStyleOverrides": [0, 0, 0, 5],
                "styleOverrideTable": { "5": { "fontWeight": 700 } } }
           ] }"#,
    );
    let html = emit_markup(&root, &CTX);
    let expected = format!(
        r#"<span class="{}">ab<br /></span><span class="{}">c</span>"#,
        run_class_name("fd-", "2:1", 0),
        run_class_name("fd-", "2:1", 1)
    );
    assert!(html.contains(&expected), "{html}");
}

#[test]
fn asset_src_handles_empty_and_trailing_slash_dirs() {
    let bare = MarkupContext {
        class_prefix: "fd-",
        asset_dir: "",
    };
    assert_eq!(bare.asset_src("1:2"), asset_file_name("1:2"));
    let slashed = MarkupContext {
        class_prefix: "fd-",
        asset_dir: "media/",
    };
    assert_eq!(
        slashed.asset_src("1:2"),
        format!("media/{}", asset_file_name("1:2"))
    );
}

#[test]
fn document_wrapper_links_the_stylesheet() {
    let doc = render_document("A & B", "<div></div>\n", "styles.css");
    assert!(doc.starts_with("<!DOCTYPE html>\n"));
    assert!(doc.contains("<title>A &amp; B</title>"));
    assert!(doc.contains(r#"<link rel="stylesheet" href="styles.css" />"#));
    assert!(doc.contains("<body>\n  <div></div>\n</body>"));
}
