//! Typed node to primitive tree encoding.

use pcb_sexpr::formatter::{format_tree, needs_quotes, FormatMode};
use pcb_sexpr::{kv, ListBuilder, Sexpr};

use crate::error::EncodeError;
use crate::node::{Node, Unrecognized};
use crate::schema::{AtomType, FieldKind};
use crate::value::{Text, Value};

/// Renders nodes as KiCad text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder {
    mode: FormatMode,
}

impl Encoder {
    pub fn new(mode: FormatMode) -> Self {
        Self { mode }
    }

    pub fn encode(&self, node: &Node) -> Result<Sexpr, EncodeError> {
        encode(node)
    }

    pub fn render(&self, node: &Node) -> Result<String, EncodeError> {
        Ok(format_tree(&encode(node)?, self.mode))
    }
}

/// Encode a node and its children in schema encode order, then splice the
/// unrecognized children back at their recorded indices.
pub fn encode(node: &Node) -> Result<Sexpr, EncodeError> {
    let schema = node.schema();
    let mut list = ListBuilder::node(Sexpr::symbol(schema.tag()));

    for &idx in schema.encode_order() {
        let spec = &schema.fields()[idx];
        let Some(value) = &node.values[idx] else {
            if spec.required {
                return Err(EncodeError::MissingRequiredField {
                    tag: schema.tag(),
                    field: spec.name,
                });
            }
            continue;
        };
        let invalid = || EncodeError::InvalidValue {
            tag: schema.tag(),
            field: spec.name,
        };

        match (&spec.kind, value) {
            (FieldKind::Positional { ty, .. }, Value::List(values)) => {
                for value in values {
                    list.push(atom(*ty, value).ok_or_else(invalid)?);
                }
            }
            (FieldKind::Positional { ty, .. }, value) => {
                list.push(atom(*ty, value).ok_or_else(invalid)?);
            }
            (FieldKind::Flag { symbol }, Value::Bool(present)) => {
                list.push_if(*present, Sexpr::symbol(*symbol));
            }
            (FieldKind::Property { symbol, ty }, value) => {
                list.push(kv(*symbol, atom(*ty, value).ok_or_else(invalid)?));
            }
            (FieldKind::Child { .. }, Value::Node(child)) => {
                list.push(encode(child)?);
            }
            (FieldKind::Child { .. }, Value::Nodes(children)) => {
                for child in children {
                    list.push(encode(child)?);
                }
            }
            _ => return Err(invalid()),
        }
    }

    splice(&mut list, node.unrecognized());
    Ok(list.build())
}

fn splice(list: &mut ListBuilder, unrecognized: &[Unrecognized]) {
    let mut ordered: Vec<&Unrecognized> = unrecognized.iter().collect();
    ordered.sort_by_key(|u| u.index);
    for u in ordered {
        // +1 for the head tag; out-of-range indices append.
        list.insert(u.index + 1, u.value.clone());
    }
}

fn atom(ty: AtomType, value: &Value) -> Option<Sexpr> {
    match value {
        Value::Number(n) => Some(Sexpr::number(n.encoded())),
        Value::Text(text) => Some(text_atom(ty, text)),
        Value::Bool(b) => Some(Sexpr::from(*b)),
        _ => None,
    }
}

/// Quote when the text requires it, otherwise follow the source quoting or,
/// for text built in code, the field convention.
fn text_atom(ty: AtomType, text: &Text) -> Sexpr {
    let value = text.as_str();
    let quoted = needs_quotes(value) || text.was_quoted().unwrap_or(ty == AtomType::String);
    if quoted {
        Sexpr::string(value)
    } else {
        Sexpr::bare(value)
    }
}
