//! Schema-driven typed codec for KiCad S-expression files.
//!
//! Text is parsed by `pcb-sexpr` into primitive trees, which a [`Binder`]
//! matches against declarative [`Schema`]s from a [`SchemaRegistry`] to build
//! typed [`Node`]s. Encoding walks the same schemas in reverse. Children a
//! schema does not know are carried along verbatim at their original position,
//! so files from newer KiCad versions survive a decode/edit/encode cycle.
//!
//! ```
//! use pcb_kicad_codec::{Document, Footprint};
//!
//! let mut fp = Footprint::parse(r#"(footprint "R" (layer "F.Cu") (future_field 1))"#).unwrap();
//! fp.node_mut().set("layer", "B.Cu").unwrap();
//! assert_eq!(
//!     fp.node().encode().unwrap().to_compact_string(),
//!     r#"(footprint "R" (layer "B.Cu") (future_field 1))"#
//! );
//! ```

pub mod binder;
pub mod document;
pub mod encoder;
pub mod error;
pub mod node;
pub mod registry;
pub mod schema;
pub mod value;

mod catalog;

pub use binder::Binder;
pub use document::{Document, Footprint, Pcb, Schematic, SymbolLibrary};
pub use encoder::{encode, Encoder};
pub use error::{DecodeError, EncodeError, Error, FieldError};
pub use node::{Node, Unrecognized};
pub use registry::{init, registry, Discriminant, RegistryBuilder, SchemaRegistry};
pub use schema::{Arity, AtomType, FieldKind, FieldSpec, Schema, SchemaBuilder};
pub use value::{Text, Value};

pub use pcb_sexpr::formatter::FormatMode;
pub use pcb_sexpr::{Number, Sexpr};

/// Decode every top-level form with the standard registry.
pub fn parse(text: &str) -> Result<Vec<Node>, Error> {
    parse_with(registry(), text)
}

/// Decode every top-level form with `registry`.
pub fn parse_with(registry: &SchemaRegistry, text: &str) -> Result<Vec<Node>, Error> {
    let forms = pcb_sexpr::parse_all(text)?;
    let binder = Binder::new(registry);
    forms
        .iter()
        .map(|form| binder.bind(form, None).map_err(Error::from))
        .collect()
}
