use pcb_kicad_codec::{
    init, parse, registry, DecodeError, Document, Error, Footprint, Pcb, Schematic, Value,
};

#[test]
fn test_stroke_edit_keeps_unknown_children_in_place() {
    let mut nodes = parse("(stroke (width 0.1) (future_dash_ratio 3) (type dash))").unwrap();
    let stroke = &mut nodes[0];
    assert_eq!(stroke.unrecognized().len(), 1);

    stroke.set("width", 0.25).unwrap();
    stroke.set("line_type", "dot").unwrap();
    assert_eq!(
        stroke.encode().unwrap().to_compact_string(),
        "(stroke (width 0.25) (future_dash_ratio 3) (type dot))"
    );
}

#[test]
fn test_stroke_binds_and_reencodes_in_field_order() {
    let nodes = parse("(stroke (width 1) (type solid) (color 0 0 0 1))").unwrap();
    let stroke = &nodes[0];
    assert_eq!(stroke.number("width"), Some(1.0));
    assert_eq!(stroke.text("line_type"), Some("solid"));

    let color = stroke.child("color").unwrap();
    let rgba: Vec<_> = ["r", "g", "b", "a"]
        .iter()
        .map(|c| color.number(c))
        .collect();
    assert_eq!(rgba, vec![Some(0.0), Some(0.0), Some(0.0), Some(1.0)]);

    assert!(stroke.unrecognized().is_empty());
    assert_eq!(
        stroke.encode().unwrap().to_compact_string(),
        "(stroke (width 1) (type solid) (color 0 0 0 1))"
    );
}

#[test]
fn test_flag_and_keyword_boolean_are_distinct() {
    let effects = &parse("(effects (font (size 1 1)) hide)").unwrap()[0];
    assert!(effects.flag("hide"));
    assert_eq!(effects.bool("hidden"), None);

    let effects = &parse("(effects (font (size 1 1)) (hide yes))").unwrap()[0];
    assert!(!effects.flag("hide"));
    assert_eq!(effects.bool("hidden"), Some(true));

    let mut effects = registry().node("effects").unwrap();
    effects.set("hidden", false).unwrap();
    assert_eq!(effects.encode().unwrap().to_compact_string(), "(effects (hide no))");
}

#[test]
fn test_positional_type_mismatch_is_reported_with_offset() {
    let err = parse("(title_block (comment \"first\" 1))").unwrap_err();
    assert_eq!(
        err,
        Error::Decode(DecodeError::TypeMismatch {
            tag: "comment",
            field: "number",
            expected: "a number",
            found: "\"first\"".to_string(),
            offset: 22,
        })
    );
}

#[test]
fn test_optional_positional_that_does_not_fit_is_kept_verbatim() {
    let nodes = parse("(at 1 2 \"90\")").unwrap();
    let at = &nodes[0];
    assert!(!at.is_set("angle"));
    assert_eq!(at.unrecognized()[0].index, 2);
    assert_eq!(at.encode().unwrap().to_compact_string(), "(at 1 2 \"90\")");
}

#[test]
fn test_roundrect_pad_selects_its_variant() {
    let nodes = parse(r#"(pad "1" smd roundrect (size 1.2 0.6) (roundrect_rratio 0.25))"#).unwrap();
    let pad = &nodes[0];
    assert_eq!(pad.variant(), Some("roundrect"));
    assert_eq!(pad.text("shape"), Some("roundrect"));
    assert_eq!(pad.number("roundrect_rratio"), Some(0.25));
    assert!(pad.unrecognized().is_empty());
}

#[test]
fn test_pad_layout_follows_shape() {
    let text = r#"(footprint "X"
        (pad "1" smd roundrect (at 0 0) (size 1 1) (layers "F.Cu") (roundrect_rratio 0.25) (chamfer_ratio 0.2) (chamfer top_left bottom_right))
        (pad "2" smd rect (at 2 0) (size 1 1) (layers "F.Cu") (roundrect_rratio 0.25)))"#;
    let fp = Footprint::parse(text).unwrap();

    let rounded = fp.pad("1").unwrap();
    assert_eq!(rounded.variant(), Some("roundrect"));
    assert_eq!(
        rounded.child("chamfer").unwrap().texts("corners"),
        vec!["top_left", "bottom_right"]
    );

    let rect = fp.pad("2").unwrap();
    assert_eq!(rect.variant(), None);
    assert!(!rect.is_set("roundrect_rratio"));
    assert_eq!(rect.unrecognized()[0].value.to_compact_string(), "(roundrect_rratio 0.25)");
}

#[test]
fn test_unknown_children_survive_pad_edits() {
    let text = r#"(footprint "X"
        (pad "1" smd rect (at 0 0) (size 1 1) (layers "F.Cu") (teardrops (best_length_ratio 0.5)) (uuid "p1")))"#;
    let mut fp = Footprint::parse(text).unwrap();
    for pad in fp.pads_mut() {
        let size = pad.child_mut("size").unwrap();
        size.set("width", 1.5).unwrap();
        pad.set("layers", registry().node("layers").unwrap().with("names", Value::texts(["B.Cu"])).unwrap())
            .unwrap();
    }

    let pad = fp.items()[0].encode().unwrap().to_compact_string();
    assert_eq!(
        pad,
        r#"(pad "1" smd rect (at 0 0) (size 1.5 1) (layers "B.Cu") (teardrops (best_length_ratio 0.5)) (uuid "p1"))"#
    );
}

#[test]
fn test_registry_initializes_once_across_threads() {
    let addresses: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| init() as *const _ as usize))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(addresses.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(addresses[0], registry() as *const _ as usize);

    // Decoding with the shared registry is repeatable.
    let text = "(kicad_pcb (version 20240108) (net 0 \"\"))";
    assert_eq!(Pcb::parse(text).unwrap(), Pcb::parse(text).unwrap());
}

#[test]
fn test_syntax_errors_carry_offsets() {
    assert_eq!(
        Pcb::parse("(kicad_pcb (version 1) (net 0 \"\")"),
        Err(Error::Parse(pcb_sexpr::ParseError::UnclosedList { offset: 0 }))
    );
    assert_eq!(
        Pcb::parse("(kicad_pcb))"),
        Err(Error::Parse(pcb_sexpr::ParseError::UnexpectedClose { offset: 11 }))
    );
}

#[test]
fn test_keyword_children_with_other_shapes_are_kept_verbatim() {
    let _ = env_logger::builder().is_test(true).try_init();

    let text = r#"(kicad_sch (version 20230121) (generator eeschema) (symbol (lib_id "Device:R") (at 10 20 0) (unit 1) (fields_autoplaced) (uuid "u1")))"#;
    let sch = Schematic::parse(text).unwrap();
    let symbol = sch.symbols().next().unwrap();
    assert!(!symbol.is_set("fields_autoplaced"));
    assert_eq!(symbol.text("uuid"), Some("u1"));
    assert_eq!(symbol.unrecognized()[0].index, 3);
    assert_eq!(sch.node().encode().unwrap().to_compact_string(), text);

    let text = r#"(kicad_pcb (version 20240108) (generator "pcbnew") (gr_text "X" (at 0 0) (layer "F.SilkS" knockout) (uuid "t1") (effects (font (size 1 1)))))"#;
    let pcb = Pcb::parse(text).unwrap();
    let label = pcb.texts().next().unwrap();
    assert_eq!(label.text("layer"), None);
    assert_eq!(
        label.unrecognized()[0].value.to_compact_string(),
        r#"(layer "F.SilkS" knockout)"#
    );
    assert_eq!(pcb.node().encode().unwrap().to_compact_string(), text);
}
