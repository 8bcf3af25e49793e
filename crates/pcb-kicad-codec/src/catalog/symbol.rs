//! Symbol library forms: library symbols, their graphics and pins.

use crate::registry::{Discriminant, RegistryBuilder};
use crate::schema::AtomType::{Number, String, Symbol};
use crate::schema::Schema;

/// Graphic items a library symbol unit can hold.
pub(super) const SYMBOL_GRAPHICS: &[&str] = &[
    "arc",
    "bezier",
    "circle",
    "pin",
    "polyline",
    "rectangle",
    "text",
];

pub(super) fn register(b: &mut RegistryBuilder) {
    b.register(
        Schema::builder("kicad_symbol_lib")
            .property("version", Number)
            .property("generator", String)
            .property("generator_version", String)
            .children("symbol")
            .require("version")
            .build(),
    );

    // Library symbols open with their quoted name; placed symbols with
    // `(lib_id ...)`.
    b.register_variant(
        0,
        Discriminant::Quoted,
        Schema::builder("symbol")
            .variant("library")
            .positional("name", String)
            .property("extends", String)
            .child("power")
            .child("pin_numbers")
            .child("pin_names")
            .yes_no("exclude_from_sim")
            .yes_no("in_bom")
            .yes_no("on_board")
            .children("property")
            .property("unit_name", String)
            .children_of("items", SYMBOL_GRAPHICS)
            .children("symbol")
            .yes_no("embedded_fonts")
            .build(),
    );
    b.register(Schema::builder("power").build());
    b.register(
        Schema::builder("pin_numbers")
            .flag("hide")
            .yes_no_as("hidden", "hide")
            .build(),
    );
    b.register(
        Schema::builder("pin_names")
            .property("offset", Number)
            .flag("hide")
            .yes_no_as("hidden", "hide")
            .build(),
    );

    b.register(
        Schema::builder("pin")
            .positional("electrical_type", Symbol)
            .positional("graphic_style", Symbol)
            .child("at")
            .property("length", Number)
            .flag("hide")
            .yes_no_as("hidden", "hide")
            .child("name")
            .child("number")
            .children("alternate")
            .build(),
    );
    for tag in ["name", "number"] {
        b.register(
            Schema::builder(tag)
                .positional("text", String)
                .child("effects")
                .build(),
        );
    }
    b.register(
        Schema::builder("alternate")
            .positional("name", String)
            .positional("electrical_type", Symbol)
            .positional("graphic_style", Symbol)
            .build(),
    );

    b.register(
        Schema::builder("rectangle")
            .child("start")
            .child("end")
            .child("stroke")
            .child("fill")
            .property("uuid", String)
            .build(),
    );
    b.register(
        Schema::builder("circle")
            .child("center")
            .property("radius", Number)
            .child("stroke")
            .child("fill")
            .property("uuid", String)
            .build(),
    );
    // Symbol arcs and board track arcs share the tag.
    b.register(
        Schema::builder("arc")
            .child("start")
            .child("mid")
            .child("end")
            .child("stroke")
            .child("fill")
            .property("width", Number)
            .property("layer", String)
            .child("net")
            .property("uuid", String)
            .build(),
    );
    b.register(
        Schema::builder("bezier")
            .child("pts")
            .child("stroke")
            .child("fill")
            .property("uuid", String)
            .build(),
    );
    b.register(
        Schema::builder("polyline")
            .child("pts")
            .child("stroke")
            .child("fill")
            .property("uuid", String)
            .build(),
    );
    b.register(
        Schema::builder("text")
            .positional("text", String)
            .yes_no("exclude_from_sim")
            .child("at")
            .child("effects")
            .property("uuid", String)
            .build(),
    );
}
