use crate::document::{document, item_views, property_value};
use crate::node::Node;

document! {
    /// A `.kicad_pcb` board.
    Pcb => "kicad_pcb"
}

item_views!(Pcb, "items" {
    footprints, footprints_mut => "footprint";
    lines, lines_mut => "gr_line";
    graphic_arcs, graphic_arcs_mut => "gr_arc";
    circles, circles_mut => "gr_circle";
    rects, rects_mut => "gr_rect";
    polys, polys_mut => "gr_poly";
    texts, texts_mut => "gr_text";
    segments, segments_mut => "segment";
    arcs, arcs_mut => "arc";
    vias, vias_mut => "via";
    zones, zones_mut => "zone";
    groups, groups_mut => "group";
});

impl Pcb {
    /// The board's net table.
    pub fn nets(&self) -> &[Node] {
        self.node.nodes("net")
    }

    pub fn net_name(&self, number: f64) -> Option<&str> {
        self.nets()
            .iter()
            .find(|n| n.number("number") == Some(number))
            .and_then(|n| n.text("name"))
    }

    pub fn thickness(&self) -> Option<f64> {
        self.node.child("general")?.number("thickness")
    }

    /// The footprint whose `Reference` property is `reference`.
    pub fn footprint(&self, reference: &str) -> Option<&Node> {
        self.footprints()
            .find(|f| property_value(f.nodes("property"), "Reference") == Some(reference))
    }

    /// Copper segments and arcs on net `number`, in file order.
    pub fn tracks_on_net(&self, number: f64) -> impl Iterator<Item = &Node> + '_ {
        self.items().iter().filter(move |item| {
            matches!(item.tag(), "segment" | "arc")
                && item.child("net").and_then(|n| n.number("number")) == Some(number)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, Footprint};

    const BOARD: &str = r#"(kicad_pcb
        (version 20240108)
        (generator "pcbnew")
        (general (thickness 1.6))
        (paper "A4")
        (layers (0 "F.Cu" signal) (31 "B.Cu" signal))
        (setup (pad_to_mask_clearance 0))
        (net 0 "")
        (net 1 "GND")
        (footprint "R_0603" (layer "F.Cu") (uuid "f1") (at 100 50)
            (property "Reference" "R1" (at 0 -1.43 0) (layer "F.SilkS") (uuid "f2")
                (effects (font (size 1 1) (thickness 0.15))))
            (pad "1" smd rect (at -0.825 0) (size 0.8 0.95) (layers "F.Cu") (net 1 "GND") (uuid "f3")))
        (segment (start 100 50) (end 110 50) (width 0.25) (layer "F.Cu") (net 1) (uuid "s1"))
        (arc (start 110 50) (mid 112 51) (end 113 53) (width 0.25) (layer "F.Cu") (net 1) (uuid "s2"))
        (via (at 113 53) (size 0.6) (drill 0.3) (layers "F.Cu" "B.Cu") (net 1) (uuid "v1")))"#;

    #[test]
    fn board_tables_and_tracks() {
        let pcb = Pcb::parse(BOARD).unwrap();
        assert_eq!(pcb.thickness(), Some(1.6));
        assert_eq!(pcb.net_name(1.0), Some("GND"));
        assert_eq!(pcb.tracks_on_net(1.0).count(), 2);
        assert_eq!(pcb.vias().next().and_then(|v| v.number("drill")), Some(0.3));

        let heads: Vec<_> = pcb
            .node()
            .unrecognized()
            .iter()
            .map(|u| (u.index, u.value.head().unwrap_or_default().to_string()))
            .collect();
        assert_eq!(
            heads,
            vec![(4, "layers".to_string()), (5, "setup".to_string())]
        );
    }

    #[test]
    fn footprints_copy_out_of_the_board() {
        let pcb = Pcb::parse(BOARD).unwrap();
        let fp = Footprint::try_from(pcb.footprint("R1").unwrap()).unwrap();
        assert_eq!(fp.pads().count(), 1);
        assert_eq!(
            fp.pad("1").and_then(|p| p.child("net")).and_then(|n| n.text("name")),
            Some("GND")
        );
    }

    #[test]
    fn undeclared_tables_survive_rewrites() {
        let mut pcb = Pcb::parse(BOARD).unwrap();
        for via in pcb.vias_mut() {
            via.set("drill", 0.4).unwrap();
        }
        let text = pcb.to_text().unwrap();
        assert!(text.contains("(drill 0.4)"));
        assert!(text.contains("(0 \"F.Cu\" signal)"));
        assert!(text.contains("(pad_to_mask_clearance 0)"));
    }
}
