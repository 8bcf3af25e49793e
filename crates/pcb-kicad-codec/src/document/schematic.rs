use crate::document::{document, item_views, property_value};
use crate::node::Node;

document! {
    /// A `.kicad_sch` sheet.
    Schematic => "kicad_sch"
}

item_views!(Schematic, "items" {
    junctions, junctions_mut => "junction";
    no_connects, no_connects_mut => "no_connect";
    bus_entries, bus_entries_mut => "bus_entry";
    wires, wires_mut => "wire";
    buses, buses_mut => "bus";
    polylines, polylines_mut => "polyline";
    texts, texts_mut => "text";
    labels, labels_mut => "label";
    global_labels, global_labels_mut => "global_label";
    hierarchical_labels, hierarchical_labels_mut => "hierarchical_label";
    symbols, symbols_mut => "symbol";
    sheets, sheets_mut => "sheet";
});

impl Schematic {
    pub fn uuid(&self) -> Option<&str> {
        self.node.text("uuid")
    }

    /// Symbols embedded in the sheet's `lib_symbols` cache.
    pub fn lib_symbols(&self) -> &[Node] {
        self.node
            .child("lib_symbols")
            .map(|cache| cache.nodes("symbol"))
            .unwrap_or(&[])
    }

    pub fn lib_symbol(&self, lib_id: &str) -> Option<&Node> {
        self.lib_symbols()
            .iter()
            .find(|s| s.text("name") == Some(lib_id))
    }

    /// The placed symbol whose `Reference` property is `reference`.
    pub fn symbol_by_reference(&self, reference: &str) -> Option<&Node> {
        self.symbols()
            .find(|s| property_value(s.nodes("property"), "Reference") == Some(reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::error::{DecodeError, Error};

    const SHEET: &str = r#"(kicad_sch
        (version 20231120)
        (generator "eeschema")
        (uuid "5e4c4b8e-0000-4000-8000-000000000001")
        (paper "A4")
        (lib_symbols
            (symbol "Device:R" (in_bom yes) (on_board yes)
                (property "Reference" "R" (at 2.032 0 90) (effects (font (size 1.27 1.27))))))
        (wire (pts (xy 10 10) (xy 20 10)) (stroke (width 0) (type default)) (uuid "w1"))
        (label "SIG" (at 20 10 0) (effects (font (size 1.27 1.27))) (uuid "l1"))
        (wire (pts (xy 20 10) (xy 20 30)) (stroke (width 0) (type default)) (uuid "w2"))
        (symbol (lib_id "Device:R") (at 30 30 0) (unit 1)
            (property "Reference" "R1" (at 32 30 0) (effects (font (size 1.27 1.27))))
            (pin "1" (uuid "p1"))))"#;

    #[test]
    fn grouped_views_keep_file_order() {
        let sch = Schematic::parse(SHEET).unwrap();
        assert_eq!(sch.version(), Some(20231120.0));
        assert_eq!(sch.generator(), Some("eeschema"));
        let tags: Vec<_> = sch.items().iter().map(Node::tag).collect();
        assert_eq!(tags, vec!["wire", "label", "wire", "symbol"]);
        let wire_ids: Vec<_> = sch.wires().filter_map(|w| w.text("uuid")).collect();
        assert_eq!(wire_ids, vec!["w1", "w2"]);
        assert_eq!(sch.labels().count(), 1);
    }

    #[test]
    fn library_and_placed_symbols_use_different_layouts() {
        let sch = Schematic::parse(SHEET).unwrap();
        let lib = sch.lib_symbol("Device:R").unwrap();
        assert_eq!(lib.variant(), Some("library"));
        assert_eq!(lib.bool("in_bom"), Some(true));

        let placed = sch.symbol_by_reference("R1").unwrap();
        assert_eq!(placed.variant(), None);
        assert_eq!(placed.text("lib_id"), Some("Device:R"));
        assert_eq!(placed.nodes("pin")[0].variant(), Some("instance"));
    }

    #[test]
    fn editing_through_a_view() {
        let mut sch = Schematic::parse(SHEET).unwrap();
        for wire in sch.wires_mut() {
            let stroke = wire.child_mut("stroke").unwrap();
            stroke.set("width", 0.2).unwrap();
        }
        let text = sch.to_text().unwrap();
        assert_eq!(text.matches("(width 0.2)").count(), 2);
        let reparsed = Schematic::parse(&text).unwrap();
        assert_eq!(reparsed.wires().count(), 2);
    }

    #[test]
    fn wrong_root_and_extra_forms() {
        assert!(matches!(
            Schematic::parse("(kicad_pcb (version 1))"),
            Err(Error::Decode(DecodeError::UnexpectedTag { .. }))
        ));
        assert!(matches!(
            Schematic::parse("(kicad_sch (version 1)) (kicad_sch (version 1))"),
            Err(Error::Decode(DecodeError::ExpectedSingleForm { found: 2 }))
        ));
        assert!(matches!(
            Schematic::parse(""),
            Err(Error::Decode(DecodeError::ExpectedSingleForm { found: 0 }))
        ));
    }

    #[test]
    fn new_document_needs_a_version() {
        let mut sch = Schematic::new().unwrap();
        assert!(sch.to_text().is_err());
        sch.node_mut().set("version", 20231120i64).unwrap();
        assert_eq!(sch.to_text().unwrap(), "(kicad_sch\n\t(version 20231120)\n)\n");
    }
}
