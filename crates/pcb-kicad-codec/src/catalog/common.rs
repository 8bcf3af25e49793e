//! Geometry, styling and metadata forms shared by every file type.

use crate::registry::RegistryBuilder;
use crate::schema::AtomType::{Number, String, Symbol};
use crate::schema::Schema;

fn point(tag: &'static str) -> Schema {
    Schema::builder(tag)
        .positional("x", Number)
        .positional("y", Number)
        .build()
}

fn xyz(tag: &'static str) -> Schema {
    Schema::builder(tag).child("xyz").build()
}

pub(super) fn register(b: &mut RegistryBuilder) {
    for tag in ["xy", "start", "mid", "end", "center"] {
        b.register(point(tag));
    }
    b.register(
        Schema::builder("at")
            .positional("x", Number)
            .positional("y", Number)
            .optional("angle", Number)
            .build(),
    );
    b.register(
        Schema::builder("size")
            .positional("width", Number)
            .positional("height", Number)
            .build(),
    );
    b.register(
        Schema::builder("xyz")
            .positional("x", Number)
            .positional("y", Number)
            .positional("z", Number)
            .build(),
    );
    b.register(Schema::builder("pts").children("xy").build());
    b.register(
        Schema::builder("color")
            .positional("r", Number)
            .positional("g", Number)
            .positional("b", Number)
            .positional("a", Number)
            .build(),
    );

    b.register(
        Schema::builder("stroke")
            .property("width", Number)
            .property_as("line_type", "type", Symbol)
            .child("color")
            .build(),
    );
    // `(fill solid)` on boards, `(fill (type none))` in schematics.
    b.register(
        Schema::builder("fill")
            .optional("mode", Symbol)
            .property_as("fill_type", "type", Symbol)
            .child("color")
            .build(),
    );
    b.register(
        Schema::builder("font")
            .property("face", String)
            .child("size")
            .property("thickness", Number)
            .flag("bold")
            .flag("italic")
            .property("line_spacing", Number)
            .child("color")
            .build(),
    );
    b.register(Schema::builder("justify").rest("sides", Symbol).build());
    b.register(
        Schema::builder("effects")
            .child("font")
            .child("justify")
            .flag("hide")
            .yes_no_as("hidden", "hide")
            .build(),
    );

    b.register(
        Schema::builder("property")
            .positional("name", String)
            .positional("value", String)
            .property("id", Number)
            .child("at")
            .yes_no("unlocked")
            .property("layer", String)
            .yes_no("show_name")
            .yes_no("do_not_autoplace")
            .yes_no("hide")
            .property("uuid", String)
            .child("effects")
            .build(),
    );

    b.register(Schema::builder("layers").rest("names", String).build());
    // `(net 3 "GND")` on boards, `(net "GND")` on KiCad 9 pads.
    b.register(
        Schema::builder("net")
            .optional("number", Number)
            .optional("name", String)
            .build(),
    );

    b.register(
        Schema::builder("paper")
            .positional("size", String)
            .optional("width", Number)
            .optional("height", Number)
            .flag("portrait")
            .build(),
    );
    b.register(
        Schema::builder("title_block")
            .property("title", String)
            .property("date", String)
            .property("rev", String)
            .property("company", String)
            .children("comment")
            .build(),
    );
    b.register(
        Schema::builder("comment")
            .positional("number", Number)
            .positional("text", String)
            .build(),
    );

    b.register(
        Schema::builder("model")
            .positional("path", String)
            .yes_no("hide")
            .property("opacity", Number)
            .child("offset")
            .child("scale")
            .child("rotate")
            .build(),
    );
    for tag in ["offset", "scale", "rotate"] {
        b.register(xyz(tag));
    }

    b.register(
        Schema::builder("group")
            .optional("name", String)
            .flag("locked")
            .property("uuid", String)
            .child("members")
            .build(),
    );
    b.register(Schema::builder("members").rest("uuids", String).build());
}
