//! Declarative schema descriptors.
//!
//! A [`Schema`] describes the field layout of one node type (or one
//! discriminated variant of it): which leading atoms are positional, which
//! bare symbols are flags, which `(keyword value)` lists are scalar properties
//! and which nested lists bind to child nodes. Adding a node type is a data
//! declaration through [`SchemaBuilder`]; the binder and encoder interpret it.

use std::collections::HashMap;

use pcb_sexpr::{Sexpr, SexprKind};

use crate::value::{Text, Value};

/// Type of an atom-valued field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomType {
    /// A bare numeric atom.
    Number,
    /// Free text, quoted by convention (names, values, layer names).
    String,
    /// Free text, bare by convention (keywords such as `smd`, `solid`).
    Symbol,
    /// `yes` / `no`.
    Bool,
}

impl AtomType {
    /// Coerce a primitive atom into a field value.
    pub fn coerce(self, atom: &Sexpr) -> Option<Value> {
        match (self, &atom.kind) {
            (AtomType::Number, SexprKind::Number(n)) => Some(Value::Number(n.clone())),
            (AtomType::String | AtomType::Symbol, SexprKind::String(s)) => {
                Some(Value::Text(Text::from_atom(s.clone(), true)))
            }
            (AtomType::String | AtomType::Symbol, SexprKind::Symbol(s)) => {
                Some(Value::Text(Text::from_atom(s.clone(), false)))
            }
            (AtomType::String | AtomType::Symbol, SexprKind::Number(n)) => {
                Some(Value::Text(Text::from_atom(n.text().into_owned(), false)))
            }
            (AtomType::Bool, SexprKind::Symbol(s)) => match s.as_str() {
                "yes" => Some(Value::Bool(true)),
                "no" => Some(Value::Bool(false)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Whether a value set programmatically fits this type.
    pub fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (AtomType::Number, Value::Number(_))
                | (AtomType::String | AtomType::Symbol, Value::Text(_))
                | (AtomType::Bool, Value::Bool(_))
        )
    }

    pub fn describe(self) -> &'static str {
        match self {
            AtomType::Number => "a number",
            AtomType::String | AtomType::Symbol => "an atom",
            AtomType::Bool => "yes or no",
        }
    }
}

/// How many atoms a positional field takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Required,
    /// Bound only when the next atom coerces.
    Optional,
    /// Every following coercible atom.
    Rest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Atom at a fixed position after the head tag.
    Positional { ty: AtomType, arity: Arity },
    /// Bare symbol whose presence means `true`.
    Flag { symbol: &'static str },
    /// `(symbol atom)` child, including the `(symbol yes|no)` keyword boolean.
    Property { symbol: &'static str, ty: AtomType },
    /// Nested node(s) bound against their own schema. One field may accept
    /// several tags so that mixed items keep their relative order.
    Child { tags: Vec<&'static str>, many: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    /// Whether `value` may be stored in this field.
    pub fn accepts(&self, value: &Value) -> bool {
        match (&self.kind, value) {
            (FieldKind::Positional { ty, arity: Arity::Rest }, Value::List(items)) => {
                items.iter().all(|item| ty.accepts(item))
            }
            (FieldKind::Positional { arity: Arity::Rest, .. }, _) => false,
            (FieldKind::Positional { ty, .. } | FieldKind::Property { ty, .. }, value) => {
                ty.accepts(value)
            }
            (FieldKind::Flag { .. }, Value::Bool(_)) => true,
            (FieldKind::Child { tags, many: false }, Value::Node(node)) => tags.contains(&node.tag()),
            (FieldKind::Child { tags, many: true }, Value::Nodes(nodes)) => {
                nodes.iter().all(|node| tags.contains(&node.tag()))
            }
            _ => false,
        }
    }

    pub(crate) fn expects(&self) -> &'static str {
        match &self.kind {
            FieldKind::Positional { arity: Arity::Rest, .. } => "a list of atoms",
            FieldKind::Positional { ty, .. } | FieldKind::Property { ty, .. } => ty.describe(),
            FieldKind::Flag { .. } => "a boolean",
            FieldKind::Child { many: false, .. } => "a node",
            FieldKind::Child { many: true, .. } => "a list of nodes",
        }
    }

    pub fn is_positional(&self) -> bool {
        matches!(self.kind, FieldKind::Positional { .. })
    }
}

/// Field layout for one node type or discriminated variant.
#[derive(Debug, Clone)]
pub struct Schema {
    tag: &'static str,
    variant: Option<&'static str>,
    fields: Vec<FieldSpec>,
    encode_order: Vec<usize>,
    flags: HashMap<&'static str, usize>,
    keywords: HashMap<&'static str, usize>,
}

impl Schema {
    pub fn builder(tag: &'static str) -> SchemaBuilder {
        SchemaBuilder::new(tag)
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Variant name for layouts selected by a discriminator.
    pub fn variant(&self) -> Option<&'static str> {
        self.variant
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Field indices in emission order.
    pub fn encode_order(&self) -> &[usize] {
        &self.encode_order
    }

    /// Field bound by a bare symbol.
    pub(crate) fn flag_index(&self, symbol: &str) -> Option<usize> {
        self.flags.get(symbol).copied()
    }

    /// Property or child field bound by a list with this head symbol.
    pub(crate) fn keyword_index(&self, head: &str) -> Option<usize> {
        self.keywords.get(head).copied()
    }

    /// Every tag a child field of this schema accepts.
    pub fn child_tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().flat_map(|f| match &f.kind {
            FieldKind::Child { tags, .. } => tags.as_slice(),
            _ => &[],
        })
        .copied()
    }
}

/// Builder for [`Schema`]. Positional fields are declared before keyword
/// fields; emission follows declaration order unless
/// [`SchemaBuilder::encode_order`] says otherwise.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    tag: &'static str,
    variant: Option<&'static str>,
    fields: Vec<FieldSpec>,
    order: Vec<&'static str>,
}

impl SchemaBuilder {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            variant: None,
            fields: Vec::new(),
            order: Vec::new(),
        }
    }

    pub fn variant(mut self, name: &'static str) -> Self {
        self.variant = Some(name);
        self
    }

    fn field(mut self, name: &'static str, kind: FieldKind, required: bool) -> Self {
        self.fields.push(FieldSpec {
            name,
            kind,
            required,
        });
        self
    }

    /// Required positional atom.
    pub fn positional(self, name: &'static str, ty: AtomType) -> Self {
        let kind = FieldKind::Positional {
            ty,
            arity: Arity::Required,
        };
        self.field(name, kind, true)
    }

    /// Optional positional atom.
    pub fn optional(self, name: &'static str, ty: AtomType) -> Self {
        let kind = FieldKind::Positional {
            ty,
            arity: Arity::Optional,
        };
        self.field(name, kind, false)
    }

    /// All remaining positional atoms of a type.
    pub fn rest(self, name: &'static str, ty: AtomType) -> Self {
        let kind = FieldKind::Positional {
            ty,
            arity: Arity::Rest,
        };
        self.field(name, kind, false)
    }

    pub fn flag(self, symbol: &'static str) -> Self {
        self.flag_as(symbol, symbol)
    }

    pub fn flag_as(self, name: &'static str, symbol: &'static str) -> Self {
        self.field(name, FieldKind::Flag { symbol }, false)
    }

    /// `(name atom)` scalar keyword field.
    pub fn property(self, name: &'static str, ty: AtomType) -> Self {
        self.property_as(name, name, ty)
    }

    pub fn property_as(self, name: &'static str, symbol: &'static str, ty: AtomType) -> Self {
        self.field(name, FieldKind::Property { symbol, ty }, false)
    }

    /// `(name yes|no)` keyword boolean.
    pub fn yes_no(self, name: &'static str) -> Self {
        self.property(name, AtomType::Bool)
    }

    pub fn yes_no_as(self, name: &'static str, symbol: &'static str) -> Self {
        self.property_as(name, symbol, AtomType::Bool)
    }

    /// A single nested node, stored under its tag.
    pub fn child(self, tag: &'static str) -> Self {
        let kind = FieldKind::Child {
            tags: vec![tag],
            many: false,
        };
        self.field(tag, kind, false)
    }

    /// Any number of nested nodes with this tag, stored under the tag.
    pub fn children(self, tag: &'static str) -> Self {
        self.children_of(tag, &[tag])
    }

    /// Any number of nested nodes with any of `tags`, kept in source order.
    pub fn children_of(self, name: &'static str, tags: &[&'static str]) -> Self {
        let kind = FieldKind::Child {
            tags: tags.to_vec(),
            many: true,
        };
        self.field(name, kind, false)
    }

    /// Mark an already declared field as required for encoding.
    pub fn require(mut self, name: &'static str) -> Self {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.required = true,
            None => log::warn!("`{}` has no field `{name}` to require", self.tag),
        }
        self
    }

    /// Emit the named fields first, in this order; the rest follow in
    /// declaration order.
    pub fn encode_order(mut self, names: &[&'static str]) -> Self {
        self.order = names.to_vec();
        self
    }

    pub fn build(self) -> Schema {
        let mut encode_order = Vec::with_capacity(self.fields.len());
        for name in &self.order {
            match self.fields.iter().position(|f| f.name == *name) {
                Some(idx) if !encode_order.contains(&idx) => encode_order.push(idx),
                Some(_) => {}
                None => log::warn!("`{}` encode order names unknown field `{name}`", self.tag),
            }
        }
        for idx in 0..self.fields.len() {
            if !encode_order.contains(&idx) {
                encode_order.push(idx);
            }
        }
        self.keep_positionals_first(&mut encode_order);

        let mut flags = HashMap::new();
        let mut keywords = HashMap::new();
        for (idx, field) in self.fields.iter().enumerate() {
            let (map, symbols): (_, &[&'static str]) = match &field.kind {
                FieldKind::Positional { .. } => continue,
                FieldKind::Flag { symbol } => (&mut flags, std::slice::from_ref(symbol)),
                FieldKind::Property { symbol, .. } => (&mut keywords, std::slice::from_ref(symbol)),
                FieldKind::Child { tags, .. } => (&mut keywords, tags.as_slice()),
            };
            for &symbol in symbols {
                if map.insert(symbol, idx).is_some() {
                    log::warn!("`{}` binds `{symbol}` to more than one field", self.tag);
                }
            }
        }

        Schema {
            tag: self.tag,
            variant: self.variant,
            fields: self.fields,
            encode_order,
            flags,
            keywords,
        }
    }

    /// Move keyword fields ordered ahead of a positional to just after the
    /// last positional. Flags may stay among the positionals.
    fn keep_positionals_first(&self, order: &mut Vec<usize>) {
        let Some(last) = order.iter().rposition(|&idx| self.fields[idx].is_positional()) else {
            return;
        };
        let is_keyword = |idx: usize| {
            matches!(
                self.fields[idx].kind,
                FieldKind::Property { .. } | FieldKind::Child { .. }
            )
        };
        let (early, rest): (Vec<usize>, Vec<usize>) = order[..=last]
            .iter()
            .partition(|&&idx| is_keyword(idx));
        if early.is_empty() {
            return;
        }
        for &idx in &early {
            log::warn!(
                "`{}` encode order puts `{}` before a positional; moving it after",
                self.tag,
                self.fields[idx].name
            );
        }
        let tail = order.split_off(last + 1);
        *order = rest.into_iter().chain(early).chain(tail).collect();
    }
}
