//! Footprint forms: the footprint itself, its graphics and pads.

use crate::registry::{Discriminant, RegistryBuilder};
use crate::schema::AtomType::{Number, String, Symbol};
use crate::schema::{Schema, SchemaBuilder};

pub(super) const FOOTPRINT_ITEMS: &[&str] = &[
    "fp_line", "fp_arc", "fp_circle", "fp_rect", "fp_poly", "fp_text", "pad", "zone", "group",
    "model",
];

const PAD_PLACEMENT: &[&str] = &[
    "number",
    "pad_type",
    "shape",
    "locked",
    "at",
    "size",
    "drill",
    "layers",
    "remove_unused_layers",
    "keep_end_layers",
];

const PAD_CONNECTION: &[&str] = &[
    "net",
    "pinfunction",
    "pintype",
    "die_length",
    "solder_mask_margin",
    "solder_paste_margin",
    "solder_paste_margin_ratio",
    "clearance",
    "zone_connect",
    "thermal_bridge_width",
    "thermal_bridge_angle",
    "thermal_gap",
];

/// Fields every pad shape has.
fn pad() -> SchemaBuilder {
    Schema::builder("pad")
        .positional("number", String)
        .positional("pad_type", Symbol)
        .positional("shape", Symbol)
        .flag("locked")
        .child("at")
        .child("size")
        .child("drill")
        .child("layers")
        .yes_no("remove_unused_layers")
        .yes_no("keep_end_layers")
        .child("net")
        .property("pinfunction", String)
        .property("pintype", String)
        .property("die_length", Number)
        .property("solder_mask_margin", Number)
        .property("solder_paste_margin", Number)
        .property("solder_paste_margin_ratio", Number)
        .property("clearance", Number)
        .property("zone_connect", Number)
        .property("thermal_bridge_width", Number)
        .property("thermal_bridge_angle", Number)
        .property("thermal_gap", Number)
        .property("uuid", String)
}

fn graphic(tag: &'static str, geometry: &[&'static str]) -> Schema {
    geometry
        .iter()
        .fold(Schema::builder(tag), |builder, &child| builder.child(child))
        .child("stroke")
        .child("fill")
        .property("layer", String)
        // KiCad 6 wrote a bare width after the layer instead of a stroke.
        .property("width", Number)
        .property("uuid", String)
        .build()
}

pub(super) fn register(b: &mut RegistryBuilder) {
    b.register(
        Schema::builder("footprint")
            .positional("name", String)
            .flag("locked")
            .flag("placed")
            .property("version", Number)
            .property("generator", String)
            .property("generator_version", String)
            .property("layer", String)
            .property("uuid", String)
            .child("at")
            .property("descr", String)
            .property("tags", String)
            .children("property")
            .property("path", String)
            .property("sheetname", String)
            .property("sheetfile", String)
            .property("solder_mask_margin", Number)
            .property("solder_paste_margin", Number)
            .property("clearance", Number)
            .child("attr")
            .children_of("items", FOOTPRINT_ITEMS)
            .yes_no("embedded_fonts")
            .build(),
    );
    b.register(Schema::builder("attr").rest("kinds", Symbol).build());

    b.register(graphic("fp_line", &["start", "end"]));
    b.register(graphic("fp_arc", &["start", "mid", "end"]));
    b.register(graphic("fp_circle", &["center", "end"]));
    b.register(graphic("fp_rect", &["start", "end"]));
    b.register(graphic("fp_poly", &["pts"]));
    b.register(
        Schema::builder("fp_text")
            .positional("kind", Symbol)
            .positional("text", String)
            .child("at")
            .yes_no("unlocked")
            .property("layer", String)
            .flag("hide")
            .property("uuid", String)
            .child("effects")
            .build(),
    );

    b.register(pad().build());
    b.register_variant(
        2,
        Discriminant::Equals("roundrect"),
        pad()
            .variant("roundrect")
            .property("roundrect_rratio", Number)
            .property("chamfer_ratio", Number)
            .child("chamfer")
            .encode_order(&[PAD_PLACEMENT, &["roundrect_rratio", "chamfer_ratio", "chamfer"]].concat())
            .build(),
    );
    b.register_variant(
        2,
        Discriminant::Equals("custom"),
        pad()
            .variant("custom")
            .child("options")
            .child("primitives")
            .encode_order(&[PAD_PLACEMENT, PAD_CONNECTION, &["options", "primitives"]].concat())
            .build(),
    );
    b.register(
        Schema::builder("drill")
            .flag("oval")
            .optional("diameter", Number)
            .optional("width", Number)
            .build(),
    );
    b.register(Schema::builder("chamfer").rest("corners", Symbol).build());
    b.register(
        Schema::builder("options")
            .property("clearance", Symbol)
            .property("anchor", Symbol)
            .build(),
    );
    b.register(
        Schema::builder("primitives")
            .children_of("items", &["gr_line", "gr_arc", "gr_circle", "gr_rect", "gr_poly"])
            .build(),
    );

    b.register(
        Schema::builder("zone")
            .child("net")
            .property("net_name", String)
            .property("layer", String)
            .child("layers")
            .property("uuid", String)
            .property("name", String)
            .build(),
    );
}
