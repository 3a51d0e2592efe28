use super::*;

#[test]
fn rgba_uses_byte_channels_and_three_decimal_alpha() {
    assert_eq!(rgba(Color::rgba(1.0, 0.5, 0.0, 1.0)), "rgba(255, 128, 0, 1)");
    assert_eq!(rgba(Color::rgba(0.0, 0.0, 0.0, 0.33333)), "rgba(0, 0, 0, 0.333)");
    assert_eq!(rgba(Color::TRANSPARENT), "rgba(0, 0, 0, 0)");
}

#[test]
fn solid_layer_is_wrapped_unless_bottom() {
    let fill = Fill::Solid {
        color: Color::rgba(1.0, 0.0, 0.0, 1.0),
        opacity: 0.5,
    };
    assert_eq!(fill_layer(&fill, true).unwrap(), "rgba(255, 0, 0, 0.5)");
    assert_eq!(
        fill_layer(&fill, false).unwrap(),
        "linear-gradient(rgba(255, 0, 0, 0.5), rgba(255, 0, 0, 0.5))"
    );
}

#[test]
fn gradient_layers_carry_angle_and_stops() {
    let stops = vec![
        ColorStop {
            position: 0.0,
            color: Color::BLACK,
        },
        ColorStop {
            position: 0.255,
            color: Color::rgba(1.0, 1.0, 1.0, 1.0),
        },
    ];
    let linear = Fill::LinearGradient {
        angle_deg: 450.0,
        stops: stops.clone(),
    };
    assert_eq!(
        fill_layer(&linear, true).unwrap(),
        "linear-gradient(90deg, rgba(0, 0, 0, 1) 0%, rgba(255, 255, 255, 1) 25.5%)"
    );
    let radial = Fill::RadialGradient {
        stops: stops.clone(),
    };
    assert!(
        fill_layer(&radial, false)
            .unwrap()
            .starts_with("radial-gradient(ellipse at 50% 50%, ")
    );
    let conic = Fill::ConicGradient {
        angle_deg: 0.0,
        stops,
    };
    assert!(
        fill_layer(&conic, false)
            .unwrap()
            .starts_with("conic-gradient(from 0deg at 50% 50%, ")
    );
    assert!(fill_layer(&Fill::DiamondGradient { stops: Vec::new() }, true).is_none());
    assert!(
        fill_layer(
            &Fill::LinearGradient {
                angle_deg: 0.0,
                stops: Vec::new()
            },
            true
        )
        .is_none()
    );
}

#[test]
fn image_layers_follow_scale_mode() {
    assert_eq!(
        image_layer("assets/images/a.png", ScaleMode::Fill),
        "url(\"assets/images/a.png\") center / cover no-repeat"
    );
    assert_eq!(
        image_layer("a.png", ScaleMode::Fit),
        "url(\"a.png\") center / contain no-repeat"
    );
    assert_eq!(image_layer("a.png", ScaleMode::Tile), "url(\"a.png\") repeat");
}

#[test]
fn shadows_and_rings() {
    let s = Shadow {
        offset_x: 0.0,
        offset_y: 4.0,
        blur: 8.5,
        spread: -1.0,
        color: Color::rgba(0.0, 0.0, 0.0, 0.25),
    };
    assert_eq!(shadow(&s, false), "0 4px 8.5px -1px rgba(0, 0, 0, 0.25)");
    assert_eq!(shadow(&s, true), "0 4px 8.5px -1px rgba(0, 0, 0, 0.25) inset");
    assert_eq!(text_shadow(&s), "0 4px 8.5px rgba(0, 0, 0, 0.25)");
    assert_eq!(
        stroke_ring(2.0, Color::BLACK, true),
        "0 0 0 2px rgba(0, 0, 0, 1) inset"
    );
    assert_eq!(border(1.0, Color::BLACK), "1px solid rgba(0, 0, 0, 1)");
}

#[test]
fn block_renders_in_insertion_order_and_skips_empty() {
    let mut out = String::new();
    DeclarationBlock::default().write_rule(".empty", &mut out);
    assert!(out.is_empty());

    let mut block = DeclarationBlock::default();
    block.push("position", "absolute");
    block.push("left", px(10.0));
    block.write_rule(".a", &mut out);
    assert_eq!(out, ".a {\n  position: absolute;\n  left: 10px;\n}\n");
    assert_eq!(block.get("left"), Some("10px"));
}

#[test]
fn typography_helpers() {
    assert_eq!(font_family(Some("Inter"), "sans-serif"), "\"Inter\", sans-serif");
    assert_eq!(font_family(Some("A\"B"), "serif"), "\"A\\\"B\", serif");
    assert_eq!(font_family(None, "sans-serif"), "sans-serif");
    assert_eq!(line_height(LineHeight::Percent(150.0)).as_deref(), Some("150%"));
    assert_eq!(line_height(LineHeight::Auto), None);
    assert_eq!(text_case(TextCase::SmallCaps), ("font-variant", "small-caps"));
    assert_eq!(
        radius(&CornerRadius::PerCorner([1.0, 2.0, 0.0, 4.0])),
        "1px 2px 0 4px"
    );
}

#[test]
fn css_strings_escape_quotes_and_line_breaks() {
    assert_eq!(escape_css_string(r#"a\b"c"#), r#"a\\b\"c"#);
    assert_eq!(escape_css_string("Inter\nDisplay"), "Inter\\a Display");
    assert_eq!(escape_css_string("x\r\u{c}"), "x\\d \\c ");
    assert_eq!(escape_css_string("Noto Sans JP"), "Noto Sans JP");
}
