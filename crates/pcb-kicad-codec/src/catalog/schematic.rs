//! Schematic sheet forms.

use crate::registry::{Discriminant, RegistryBuilder};
use crate::schema::AtomType::{Number, String, Symbol};
use crate::schema::{Schema, SchemaBuilder};

/// Top-level schematic items, kept in one field so their order survives.
pub(super) const SCHEMATIC_ITEMS: &[&str] = &[
    "junction",
    "no_connect",
    "bus_entry",
    "wire",
    "bus",
    "polyline",
    "text",
    "label",
    "global_label",
    "hierarchical_label",
    "symbol",
    "sheet",
];

fn label(tag: &'static str) -> SchemaBuilder {
    Schema::builder(tag).positional("text", String)
}

fn label_tail(builder: SchemaBuilder) -> Schema {
    builder
        .child("at")
        .yes_no("fields_autoplaced")
        .child("effects")
        .property("uuid", String)
        .children("property")
        .build()
}

pub(super) fn register(b: &mut RegistryBuilder) {
    b.register(
        Schema::builder("kicad_sch")
            .property("version", Number)
            .property("generator", String)
            .property("generator_version", String)
            .property("uuid", String)
            .child("paper")
            .child("title_block")
            .child("lib_symbols")
            .children_of("items", SCHEMATIC_ITEMS)
            .child("sheet_instances")
            .yes_no("embedded_fonts")
            .require("version")
            .build(),
    );
    b.register(Schema::builder("lib_symbols").children("symbol").build());

    b.register(
        Schema::builder("junction")
            .child("at")
            .property("diameter", Number)
            .child("color")
            .property("uuid", String)
            .build(),
    );
    b.register(
        Schema::builder("no_connect")
            .child("at")
            .property("uuid", String)
            .build(),
    );
    b.register(
        Schema::builder("bus_entry")
            .child("at")
            .child("size")
            .child("stroke")
            .property("uuid", String)
            .build(),
    );
    for tag in ["wire", "bus"] {
        b.register(
            Schema::builder(tag)
                .child("pts")
                .child("stroke")
                .property("uuid", String)
                .build(),
        );
    }

    b.register(label_tail(label("label")));
    b.register(label_tail(label("global_label").property("shape", Symbol)));
    b.register(label_tail(label("hierarchical_label").property("shape", Symbol)));

    b.register(
        Schema::builder("symbol")
            .property("lib_name", String)
            .property("lib_id", String)
            .child("at")
            .property("mirror", Symbol)
            .property("unit", Number)
            .property("convert", Number)
            .yes_no("exclude_from_sim")
            .yes_no("in_bom")
            .yes_no("on_board")
            .yes_no("dnp")
            .yes_no("fields_autoplaced")
            .property("uuid", String)
            .children("property")
            .children("pin")
            .child("instances")
            .require("lib_id")
            .build(),
    );
    // Pins of placed symbols and sheets open with a quoted number or name.
    b.register_variant(
        0,
        Discriminant::Quoted,
        Schema::builder("pin")
            .variant("instance")
            .positional("number", String)
            .optional("electrical_type", Symbol)
            .child("at")
            .property("uuid", String)
            .child("effects")
            .property("alternate", String)
            .build(),
    );

    b.register(
        Schema::builder("sheet")
            .child("at")
            .child("size")
            .yes_no("exclude_from_sim")
            .yes_no("in_bom")
            .yes_no("on_board")
            .yes_no("dnp")
            .yes_no("fields_autoplaced")
            .child("stroke")
            .child("fill")
            .property("uuid", String)
            .children("property")
            .children("pin")
            .child("instances")
            .build(),
    );

    b.register(Schema::builder("instances").children("project").build());
    b.register(
        Schema::builder("project")
            .positional("name", String)
            .children("path")
            .build(),
    );
    // Instance paths carry a reference and unit; sheet instance paths a page.
    b.register(
        Schema::builder("path")
            .positional("path", String)
            .property("reference", String)
            .property("unit", Number)
            .property("page", String)
            .build(),
    );
    b.register(Schema::builder("sheet_instances").children("path").build());
}
