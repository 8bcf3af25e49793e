//! Primitive tree to typed node binding.

use std::sync::Arc;

use pcb_sexpr::{Sexpr, SexprKind};

use crate::error::DecodeError;
use crate::node::{Node, Unrecognized};
use crate::registry::SchemaRegistry;
use crate::schema::{Arity, FieldKind, Schema};
use crate::value::Value;

/// Binds [`Sexpr`] lists to schemas from a registry.
///
/// Positional atoms are consumed in declaration order. A bare symbol naming a
/// declared flag is taken as that flag even between positionals, as in
/// `(drill oval 1.2 0.8)`. Every remaining child is matched by shape: bare
/// symbols against flags, lists against properties and child fields by their
/// head. Anything left over, including a second occurrence of a
/// single-valued field or a property that is not `(symbol atom)`, is kept as
/// unrecognized at its original index.
#[derive(Debug, Clone, Copy)]
pub struct Binder<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> Binder<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Bind a list, optionally requiring its head tag.
    pub fn bind(&self, sexpr: &Sexpr, expected: Option<&str>) -> Result<Node, DecodeError> {
        let offset = sexpr.span.start;
        let items = sexpr.as_list().ok_or(DecodeError::NotAList { offset })?;
        let tag = items
            .first()
            .and_then(Sexpr::as_sym)
            .ok_or(DecodeError::MissingHead { offset })?;

        if let Some(expected) = expected.filter(|&expected| expected != tag) {
            return Err(DecodeError::UnexpectedTag {
                expected: expected.to_string(),
                found: tag.to_string(),
                offset,
            });
        }

        let schema = self
            .registry
            .resolve(tag, items)
            .ok_or_else(|| DecodeError::UnknownTag {
                tag: tag.to_string(),
                offset,
            })?;
        self.bind_with(schema, sexpr, items)
    }

    fn bind_with(
        &self,
        schema: Arc<Schema>,
        sexpr: &Sexpr,
        items: &[Sexpr],
    ) -> Result<Node, DecodeError> {
        let mut node = Node::new(schema.clone());
        node.span = sexpr.span;

        let children = &items[1..];
        let cursor = bind_positionals(&schema, &mut node, children, sexpr.span.start)?;

        for (index, child) in children.iter().enumerate().skip(cursor) {
            if !self.bind_child(&schema, &mut node, child)? {
                log::debug!(
                    "Keeping unrecognized `{}` in `{}` at byte {}",
                    child.head().unwrap_or("atom"),
                    schema.tag(),
                    child.span.start
                );
                node.unrecognized.push(Unrecognized {
                    index,
                    value: child.clone(),
                });
            }
        }

        Ok(node)
    }

    /// Bind one non-positional child. `Ok(false)` means it stays unrecognized.
    fn bind_child(&self, schema: &Schema, node: &mut Node, child: &Sexpr) -> Result<bool, DecodeError> {
        let items = match &child.kind {
            SexprKind::Symbol(symbol) => return Ok(bind_flag(schema, node, symbol)),
            SexprKind::List(items) => items,
            _ => return Ok(false),
        };
        let Some(head) = items.first().and_then(Sexpr::as_sym) else {
            return Ok(false);
        };
        let Some(idx) = schema.keyword_index(head) else {
            return Ok(false);
        };

        let spec = &schema.fields()[idx];
        match &spec.kind {
            FieldKind::Property { ty, .. } => {
                if node.values[idx].is_some() {
                    return Ok(false);
                }
                // Other shapes, like `(fields_autoplaced)` or
                // `(layer "F.SilkS" knockout)`, are kept verbatim.
                let value = match items.as_slice() {
                    [_, atom] => ty.coerce(atom),
                    _ => None,
                };
                let Some(value) = value else {
                    return Ok(false);
                };
                node.values[idx] = Some(value);
                Ok(true)
            }
            FieldKind::Child { many, .. } => {
                if !many && node.values[idx].is_some() {
                    return Ok(false);
                }
                let Some(child_schema) = self.registry.resolve(head, items) else {
                    return Ok(false);
                };
                let bound = self.bind_with(child_schema, child, items)?;
                match &mut node.values[idx] {
                    Some(Value::Nodes(nodes)) => nodes.push(bound),
                    slot if *many => *slot = Some(Value::Nodes(vec![bound])),
                    slot => *slot = Some(Value::Node(bound)),
                }
                Ok(true)
            }
            FieldKind::Positional { .. } | FieldKind::Flag { .. } => Ok(false),
        }
    }
}

fn bind_flag(schema: &Schema, node: &mut Node, symbol: &str) -> bool {
    match schema.flag_index(symbol) {
        Some(idx) if node.values[idx].is_none() => {
            node.values[idx] = Some(Value::Bool(true));
            true
        }
        _ => false,
    }
}

/// Consume positional atoms; returns the index of the first child left for
/// keyword matching.
fn bind_positionals(
    schema: &Schema,
    node: &mut Node,
    children: &[Sexpr],
    offset: usize,
) -> Result<usize, DecodeError> {
    let mut cursor = 0;

    for (idx, spec) in schema.fields().iter().enumerate() {
        let FieldKind::Positional { ty, arity } = &spec.kind else {
            continue;
        };

        while let Some(symbol) = children.get(cursor).and_then(Sexpr::as_sym) {
            if !bind_flag(schema, node, symbol) {
                break;
            }
            cursor += 1;
        }

        match arity {
            Arity::Required => {
                let Some(atom) = children.get(cursor).filter(|c| c.is_atom()) else {
                    return Err(DecodeError::MissingRequiredPositional {
                        tag: schema.tag(),
                        field: spec.name,
                        offset,
                    });
                };
                let value = ty.coerce(atom).ok_or_else(|| DecodeError::TypeMismatch {
                    tag: schema.tag(),
                    field: spec.name,
                    expected: ty.describe(),
                    found: atom.to_compact_string(),
                    offset: atom.span.start,
                })?;
                node.values[idx] = Some(value);
                cursor += 1;
            }
            Arity::Optional => {
                if let Some(value) = children.get(cursor).and_then(|c| ty.coerce(c)) {
                    node.values[idx] = Some(value);
                    cursor += 1;
                }
            }
            Arity::Rest => {
                let mut values = Vec::new();
                while let Some(value) = children.get(cursor).and_then(|c| ty.coerce(c)) {
                    values.push(value);
                    cursor += 1;
                }
                if !values.is_empty() {
                    node.values[idx] = Some(Value::List(values));
                }
            }
        }
    }

    Ok(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::registry;
    use pcb_sexpr::parse;

    fn bind(text: &str) -> Result<Node, DecodeError> {
        Binder::new(registry()).bind(&parse(text).unwrap(), None)
    }

    #[test]
    fn positionals_and_optional_angle() {
        let at = bind("(at 1.5 -2)").unwrap();
        assert_eq!(at.number("x"), Some(1.5));
        assert_eq!(at.number("y"), Some(-2.0));
        assert!(!at.is_set("angle"));

        let at = bind("(at 1 2 90)").unwrap();
        assert_eq!(at.number("angle"), Some(90.0));
    }

    #[test]
    fn required_positional_must_be_present() {
        assert_eq!(
            bind("(at 1)"),
            Err(DecodeError::MissingRequiredPositional {
                tag: "at",
                field: "y",
                offset: 0,
            })
        );
    }

    #[test]
    fn positional_type_mismatch() {
        assert_eq!(
            bind("(at 1 \"2\")"),
            Err(DecodeError::TypeMismatch {
                tag: "at",
                field: "y",
                expected: "a number",
                found: "\"2\"".to_string(),
                offset: 6,
            })
        );
    }

    #[test]
    fn property_with_other_shape_is_kept_verbatim() {
        let stroke = bind("(stroke (width 0.1 0.2) (type dash))").unwrap();
        assert!(!stroke.is_set("width"));
        assert_eq!(stroke.unrecognized()[0].index, 0);
        assert_eq!(
            stroke.encode().unwrap().to_compact_string(),
            "(stroke (width 0.1 0.2) (type dash))"
        );

        let stroke = bind("(stroke (width thick))").unwrap();
        assert!(!stroke.is_set("width"));
        assert_eq!(stroke.unrecognized().len(), 1);
    }

    #[test]
    fn leading_flag_between_positionals() {
        let drill = bind("(drill oval 1.2 0.8)").unwrap();
        assert!(drill.flag("oval"));
        assert_eq!(drill.number("diameter"), Some(1.2));
        assert_eq!(drill.number("width"), Some(0.8));

        let drill = bind("(drill 0.4)").unwrap();
        assert!(!drill.flag("oval"));
        assert_eq!(drill.number("diameter"), Some(0.4));
    }

    #[test]
    fn duplicates_and_unknowns_are_kept_in_place() {
        let stroke = bind("(stroke (width 1) (future 2) (width 3) stray)").unwrap();
        assert_eq!(stroke.number("width"), Some(1.0));
        let kept: Vec<_> = stroke
            .unrecognized()
            .iter()
            .map(|u| (u.index, u.value.to_compact_string()))
            .collect();
        assert_eq!(
            kept,
            vec![
                (1, "(future 2)".to_string()),
                (2, "(width 3)".to_string()),
                (3, "stray".to_string()),
            ]
        );
    }

    #[test]
    fn flags_do_not_match_lists_and_properties_do_not_match_symbols() {
        let effects = bind("(effects (hide yes))").unwrap();
        assert!(!effects.flag("hide"));
        assert_eq!(effects.bool("hidden"), Some(true));

        let effects = bind("(effects hide)").unwrap();
        assert!(effects.flag("hide"));
        assert_eq!(effects.bool("hidden"), None);
    }

    #[test]
    fn expected_tag_and_unknown_tag() {
        let sexpr = parse("(kicad_pcb (version 1))").unwrap();
        assert!(matches!(
            Binder::new(registry()).bind(&sexpr, Some("kicad_sch")),
            Err(DecodeError::UnexpectedTag { .. })
        ));
        assert!(matches!(bind("(frobnicate 1)"), Err(DecodeError::UnknownTag { .. })));
        assert!(matches!(
            Binder::new(registry()).bind(&parse("(\"x\")").unwrap(), None),
            Err(DecodeError::MissingHead { offset: 0 })
        ));
        assert!(matches!(
            Binder::new(registry()).bind(&Sexpr::symbol("x"), None),
            Err(DecodeError::NotAList { .. })
        ));
    }

    #[test]
    fn nested_children_bind_recursively() {
        let stroke = bind("(stroke (width 0) (type dash) (color 255 0 0 1))").unwrap();
        assert_eq!(stroke.text("line_type"), Some("dash"));
        let color = stroke.child("color").unwrap();
        assert_eq!(color.number("r"), Some(255.0));
        assert_eq!(color.number("a"), Some(1.0));
    }
}
