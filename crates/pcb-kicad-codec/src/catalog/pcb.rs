//! Board forms. The layer table and `setup` block are left undeclared and
//! travel through as unrecognized children.

use crate::registry::RegistryBuilder;
use crate::schema::AtomType::{Number, String};
use crate::schema::Schema;

pub(super) const BOARD_ITEMS: &[&str] = &[
    "footprint", "gr_line", "gr_arc", "gr_circle", "gr_rect", "gr_poly", "gr_text", "segment",
    "arc", "via", "zone", "group",
];

/// Board graphics. Inside custom pad primitives these carry `width` and
/// `(fill yes)` instead of a stroke and layer.
fn graphic(tag: &'static str, geometry: &[&'static str]) -> Schema {
    geometry
        .iter()
        .fold(Schema::builder(tag), |builder, &child| builder.child(child))
        .property("width", Number)
        .child("stroke")
        .child("fill")
        .property("layer", String)
        .child("net")
        .property("uuid", String)
        .build()
}

pub(super) fn register(b: &mut RegistryBuilder) {
    b.register(
        Schema::builder("kicad_pcb")
            .property("version", Number)
            .property("generator", String)
            .property("generator_version", String)
            .child("general")
            .child("paper")
            .child("title_block")
            .children("net")
            .children_of("items", BOARD_ITEMS)
            .yes_no("embedded_fonts")
            .require("version")
            .build(),
    );
    b.register(
        Schema::builder("general")
            .property("thickness", Number)
            .yes_no("legacy_teardrops")
            .build(),
    );

    b.register(graphic("gr_line", &["start", "end"]));
    b.register(graphic("gr_arc", &["start", "mid", "end"]));
    b.register(graphic("gr_circle", &["center", "end"]));
    b.register(graphic("gr_rect", &["start", "end"]));
    b.register(graphic("gr_poly", &["pts"]));
    b.register(
        Schema::builder("gr_text")
            .positional("text", String)
            .flag("locked")
            .child("at")
            .property("layer", String)
            .property("uuid", String)
            .child("effects")
            .build(),
    );

    b.register(
        Schema::builder("segment")
            .child("start")
            .child("end")
            .property("width", Number)
            .property("layer", String)
            .child("net")
            .property("uuid", String)
            .build(),
    );
    b.register(
        Schema::builder("via")
            .flag("blind")
            .flag("micro")
            .flag("locked")
            .child("at")
            .property("size", Number)
            .property("drill", Number)
            .child("layers")
            .yes_no("remove_unused_layers")
            .yes_no("keep_end_layers")
            .yes_no("free")
            .child("net")
            .property("uuid", String)
            .build(),
    );
}
