use crate::document::{document, item_views, property_value};
use crate::node::Node;

document! {
    /// A `.kicad_mod` footprint, also found inline in boards.
    Footprint => "footprint"
}

item_views!(Footprint, "items" {
    lines, lines_mut => "fp_line";
    arcs, arcs_mut => "fp_arc";
    circles, circles_mut => "fp_circle";
    rects, rects_mut => "fp_rect";
    polys, polys_mut => "fp_poly";
    texts, texts_mut => "fp_text";
    pads, pads_mut => "pad";
    zones, zones_mut => "zone";
    groups, groups_mut => "group";
    models, models_mut => "model";
});

impl Footprint {
    /// Library name, e.g. `Resistor_SMD:R_0603_1608Metric`.
    pub fn name(&self) -> Option<&str> {
        self.node.text("name")
    }

    pub fn layer(&self) -> Option<&str> {
        self.node.text("layer")
    }

    pub fn properties(&self) -> &[Node] {
        self.node.nodes("property")
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        property_value(self.properties(), name)
    }

    /// The first pad numbered `number`.
    pub fn pad(&self, number: &str) -> Option<&Node> {
        self.pads().find(|p| p.text("number") == Some(number))
    }
}

impl TryFrom<&Node> for Footprint {
    type Error = crate::error::DecodeError;

    /// Copy a footprint out of a board.
    fn try_from(node: &Node) -> Result<Self, Self::Error> {
        Footprint::try_from(node.clone())
    }
}
