//! File-level documents.
//!
//! Each document wraps the root [`Node`] of one KiCad file type. Mixed item
//! lists stay in a single field in file order; the grouped accessors
//! (`wires()`, `pads()`, `vias()`, ...) are views over it filtered by tag.

mod footprint;
mod pcb;
mod schematic;
mod symbol_lib;

pub use footprint::Footprint;
pub use pcb::Pcb;
pub use schematic::Schematic;
pub use symbol_lib::SymbolLibrary;

use crate::binder::Binder;
use crate::error::{DecodeError, EncodeError, Error};
use crate::node::Node;
use crate::registry::{registry, SchemaRegistry};

/// A typed view over the root node of a KiCad file.
pub trait Document: TryFrom<Node, Error = DecodeError> {
    /// Root tag, e.g. `kicad_sch`.
    const TAG: &'static str;

    fn node(&self) -> &Node;
    fn node_mut(&mut self) -> &mut Node;
    fn into_node(self) -> Node;

    /// Parse with the standard registry.
    fn parse(text: &str) -> Result<Self, Error> {
        Self::parse_with(registry(), text)
    }

    /// Parse exactly one top-level form tagged [`Document::TAG`].
    fn parse_with(registry: &SchemaRegistry, text: &str) -> Result<Self, Error> {
        let forms = pcb_sexpr::parse_all(text)?;
        let [form] = forms.as_slice() else {
            return Err(DecodeError::ExpectedSingleForm { found: forms.len() }.into());
        };
        let node = Binder::new(registry).bind(form, Some(Self::TAG))?;
        log::debug!(
            "Decoded `{}` with {} unrecognized top-level children",
            Self::TAG,
            node.unrecognized().len()
        );
        Ok(Self::try_from(node)?)
    }

    fn to_text(&self) -> Result<String, EncodeError> {
        self.node().to_text()
    }

    /// File format version, e.g. `20231120`.
    fn version(&self) -> Option<f64> {
        self.node().number("version")
    }

    fn generator(&self) -> Option<&str> {
        self.node().text("generator")
    }
}

/// Declares a document type over a root tag.
macro_rules! document {
    ($(#[$meta:meta])* $name:ident => $tag:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            node: $crate::node::Node,
        }

        impl $crate::document::Document for $name {
            const TAG: &'static str = $tag;

            fn node(&self) -> &$crate::node::Node {
                &self.node
            }

            fn node_mut(&mut self) -> &mut $crate::node::Node {
                &mut self.node
            }

            fn into_node(self) -> $crate::node::Node {
                self.node
            }
        }

        impl TryFrom<$crate::node::Node> for $name {
            type Error = $crate::error::DecodeError;

            fn try_from(node: $crate::node::Node) -> Result<Self, Self::Error> {
                if node.tag() != $tag {
                    return Err($crate::error::DecodeError::UnexpectedTag {
                        expected: $tag.to_string(),
                        found: node.tag().to_string(),
                        offset: node.span().start,
                    });
                }
                Ok(Self { node })
            }
        }

        impl $name {
            /// An empty document from the standard registry.
            pub fn new() -> Result<Self, $crate::error::DecodeError> {
                let node = $crate::registry::registry().node($tag)?;
                Ok(Self { node })
            }
        }
    };
}

/// Tag-filtered views over a mixed item field.
macro_rules! item_views {
    ($name:ident, $field:literal { $($get:ident, $get_mut:ident => $tag:literal;)* }) => {
        impl $name {
            $(
                #[doc = concat!("`(", $tag, " ...)` items in file order.")]
                pub fn $get(&self) -> impl Iterator<Item = &$crate::node::Node> + '_ {
                    self.node.nodes($field).iter().filter(|n| n.tag() == $tag)
                }

                pub fn $get_mut(&mut self) -> impl Iterator<Item = &mut $crate::node::Node> + '_ {
                    self.node.nodes_iter_mut($field).filter(|n| n.tag() == $tag)
                }
            )*

            /// Every item in file order.
            pub fn items(&self) -> &[$crate::node::Node] {
                self.node.nodes($field)
            }

            /// Append an item after the existing ones.
            pub fn push_item(
                &mut self,
                item: $crate::node::Node,
            ) -> Result<(), $crate::error::FieldError> {
                self.node.push($field, item)
            }
        }
    };
}

pub(crate) use {document, item_views};

/// Value of the `(property "name" "value")` child named `name`.
pub(crate) fn property_value<'a>(properties: &'a [Node], name: &str) -> Option<&'a str> {
    properties
        .iter()
        .find(|p| p.text("name") == Some(name))
        .and_then(|p| p.text("value"))
}
