//! Typed nodes.
//!
//! A [`Node`] is one decoded list: a slot per schema field plus the children
//! the schema did not recognize, each remembered with its position so the
//! encoder can put it back where it was.

use std::sync::Arc;

use pcb_sexpr::formatter::FormatMode;
use pcb_sexpr::{Sexpr, Span};

use crate::encoder::{self, Encoder};
use crate::error::{EncodeError, FieldError};
use crate::schema::{FieldKind, Schema};
use crate::value::Value;

/// A child the schema had no field for, kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Unrecognized {
    /// Position among the children after the head tag.
    pub index: usize,
    pub value: Sexpr,
}

#[derive(Debug, Clone)]
pub struct Node {
    schema: Arc<Schema>,
    pub(crate) values: Vec<Option<Value>>,
    pub(crate) unrecognized: Vec<Unrecognized>,
    pub(crate) span: Span,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.schema.tag() == other.schema.tag()
            && self.schema.variant() == other.schema.variant()
            && self.values == other.values
            && self.unrecognized == other.unrecognized
    }
}

impl Node {
    /// An empty node with every field unset.
    pub fn new(schema: Arc<Schema>) -> Self {
        let values = vec![None; schema.fields().len()];
        Self {
            schema,
            values,
            unrecognized: Vec::new(),
            span: Span::synthetic(),
        }
    }

    pub fn tag(&self) -> &'static str {
        self.schema.tag()
    }

    pub fn variant(&self) -> Option<&'static str> {
        self.schema.variant()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Source span, or a synthetic span for nodes built in code.
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        let idx = self.schema.field_index(name)?;
        self.values[idx].as_ref()
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        let idx = self.schema.field_index(name)?;
        self.values[idx].as_mut()
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name)?.as_number()
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_text()
    }

    /// Keyword boolean or flag value, `None` when unset.
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name)?.as_bool()
    }

    /// Whether a flag is present. Unset flags read as `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.bool(name).unwrap_or(false)
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.get(name)?.as_node()
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        match self.get_mut(name)? {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Nodes of a repeated child field, in source order.
    pub fn nodes(&self, name: &str) -> &[Node] {
        self.get(name).and_then(Value::as_nodes).unwrap_or(&[])
    }

    pub fn nodes_iter_mut(&mut self, name: &str) -> std::slice::IterMut<'_, Node> {
        match self.get_mut(name) {
            Some(Value::Nodes(nodes)) => nodes.iter_mut(),
            _ => Default::default(),
        }
    }

    /// Mutable access to a repeated child field, creating it when unset.
    pub fn nodes_mut(&mut self, name: &str) -> Result<&mut Vec<Node>, FieldError> {
        let idx = self.repeated_field(name)?;
        let tag = self.tag();
        let field = self.schema.fields()[idx].name;
        let slot = &mut self.values[idx];
        if !matches!(slot, Some(Value::Nodes(_))) {
            *slot = Some(Value::Nodes(Vec::new()));
        }
        if let Some(Value::Nodes(nodes)) = slot {
            return Ok(nodes);
        }
        Err(FieldError::KindMismatch {
            tag,
            field,
            expected: "a list of nodes",
        })
    }

    /// Text values of a rest positional.
    pub fn texts(&self, name: &str) -> Vec<&str> {
        self.get(name)
            .and_then(Value::as_list)
            .map(|items| items.iter().filter_map(Value::as_text).collect())
            .unwrap_or_default()
    }

    /// Numeric values of a rest positional.
    pub fn numbers(&self, name: &str) -> Vec<f64> {
        self.get(name)
            .and_then(Value::as_list)
            .map(|items| items.iter().filter_map(Value::as_number).collect())
            .unwrap_or_default()
    }

    /// Set a field, checking the value against the field's declared kind.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), FieldError> {
        let value = value.into();
        let idx = self.field(name)?;
        let spec = &self.schema.fields()[idx];
        if !spec.accepts(&value) {
            return Err(FieldError::KindMismatch {
                tag: self.tag(),
                field: spec.name,
                expected: spec.expects(),
            });
        }
        self.values[idx] = Some(value);
        Ok(())
    }

    /// Builder-style [`Node::set`].
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self, FieldError> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Unset a field, returning its previous value.
    pub fn clear(&mut self, name: &str) -> Result<Option<Value>, FieldError> {
        let idx = self.field(name)?;
        Ok(self.values[idx].take())
    }

    /// Append a node to a repeated child field.
    pub fn push(&mut self, name: &str, node: Node) -> Result<(), FieldError> {
        let idx = self.repeated_field(name)?;
        let spec = &self.schema.fields()[idx];
        let accepted = match &spec.kind {
            FieldKind::Child { tags, .. } => tags.contains(&node.tag()),
            _ => false,
        };
        if !accepted {
            return Err(FieldError::KindMismatch {
                tag: self.tag(),
                field: spec.name,
                expected: "a node with an accepted tag",
            });
        }
        self.nodes_mut(name)?.push(node);
        Ok(())
    }

    pub fn unrecognized(&self) -> &[Unrecognized] {
        &self.unrecognized
    }

    pub fn unrecognized_mut(&mut self) -> &mut Vec<Unrecognized> {
        &mut self.unrecognized
    }

    pub fn encode(&self) -> Result<Sexpr, EncodeError> {
        encoder::encode(self)
    }

    /// Render as KiCad-formatted text with a trailing newline.
    pub fn to_text(&self) -> Result<String, EncodeError> {
        Encoder::new(FormatMode::Normal).render(self)
    }

    fn field(&self, name: &str) -> Result<usize, FieldError> {
        self.schema
            .field_index(name)
            .ok_or_else(|| FieldError::UnknownField {
                tag: self.tag(),
                field: name.to_string(),
            })
    }

    fn repeated_field(&self, name: &str) -> Result<usize, FieldError> {
        let idx = self.field(name)?;
        let spec = &self.schema.fields()[idx];
        match spec.kind {
            FieldKind::Child { many: true, .. } => Ok(idx),
            _ => Err(FieldError::KindMismatch {
                tag: self.tag(),
                field: spec.name,
                expected: "a list of nodes",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::registry;

    #[test]
    fn set_checks_field_kind() {
        let mut at = registry().node("at").unwrap();
        at.set("x", 1.5).unwrap();
        assert_eq!(at.number("x"), Some(1.5));

        assert_eq!(
            at.set("x", "left"),
            Err(FieldError::KindMismatch {
                tag: "at",
                field: "x",
                expected: "a number",
            })
        );
        assert!(matches!(
            at.set("z", 1.0),
            Err(FieldError::UnknownField { .. })
        ));
    }

    #[test]
    fn push_rejects_foreign_tags() {
        let reg = registry();
        let mut pts = reg.node("pts").unwrap();
        pts.push("xy", reg.node("xy").unwrap()).unwrap();
        assert_eq!(pts.nodes("xy").len(), 1);
        assert!(pts.push("xy", reg.node("at").unwrap()).is_err());
    }

    #[test]
    fn unset_accessors_are_empty() {
        let mut pts = registry().node("pts").unwrap();
        assert!(pts.nodes("xy").is_empty());
        assert_eq!(pts.nodes_iter_mut("xy").count(), 0);
        assert!(pts.child("xy").is_none());
        assert!(!pts.flag("xy"));
        assert!(pts.nodes_mut("xy").unwrap().is_empty());
    }

    #[test]
    fn clear_unsets() {
        let mut stroke = registry().node("stroke").unwrap();
        stroke.set("width", 0.2).unwrap();
        assert_eq!(stroke.clear("width").unwrap().and_then(|v| v.as_number()), Some(0.2));
        assert!(!stroke.is_set("width"));
    }
}
