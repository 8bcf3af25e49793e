//! Tag to schema lookup.
//!
//! Most tags map to one generic layout. Tags whose shape depends on content
//! (`symbol`, `pin`, `pad`) also carry variants, each selected by a
//! [`Discriminant`] over one positional atom and tried in registration order
//! before falling back to the generic layout.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use pcb_sexpr::Sexpr;

use crate::catalog;
use crate::error::DecodeError;
use crate::node::Node;
use crate::schema::Schema;

/// Predicate over the atom at a fixed position after the head tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discriminant {
    /// The atom's text equals this value.
    Equals(&'static str),
    /// The atom is a quoted string.
    Quoted,
    /// There is no atom at the position.
    Missing,
}

impl Discriminant {
    fn matches(self, item: Option<&Sexpr>) -> bool {
        match self {
            Discriminant::Equals(expected) => item
                .and_then(Sexpr::atom_text)
                .is_some_and(|text| text == expected),
            Discriminant::Quoted => item.and_then(Sexpr::as_str).is_some(),
            Discriminant::Missing => item.is_none_or(Sexpr::is_list),
        }
    }
}

#[derive(Debug, Clone)]
struct Variant {
    position: usize,
    when: Discriminant,
    schema: Arc<Schema>,
}

#[derive(Debug, Clone, Default)]
struct Entry {
    generic: Option<Arc<Schema>>,
    variants: Vec<Variant>,
}

/// Immutable set of schemas shared by every binder.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entries: HashMap<&'static str, Entry>,
}

impl SchemaRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Every schema this crate ships for schematics, symbol libraries,
    /// footprints and boards.
    pub fn standard() -> Self {
        let mut builder = RegistryBuilder::default();
        catalog::register_all(&mut builder);
        builder.build()
    }

    /// Schema for a list whose items (head included) are `items`.
    pub fn resolve(&self, tag: &str, items: &[Sexpr]) -> Option<Arc<Schema>> {
        let entry = self.entries.get(tag)?;
        entry
            .variants
            .iter()
            .find(|v| v.when.matches(items.get(v.position + 1)))
            .map(|v| &v.schema)
            .or(entry.generic.as_ref())
            .cloned()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    /// The generic layout of a tag.
    pub fn schema(&self, tag: &str) -> Option<&Arc<Schema>> {
        self.entries.get(tag)?.generic.as_ref()
    }

    pub fn variant(&self, tag: &str, name: &str) -> Option<&Arc<Schema>> {
        self.entries
            .get(tag)?
            .variants
            .iter()
            .map(|v| &v.schema)
            .find(|s| s.variant() == Some(name))
    }

    /// An empty node of the generic layout of `tag`.
    pub fn node(&self, tag: &str) -> Result<Node, DecodeError> {
        self.schema(tag)
            .map(|schema| Node::new(schema.clone()))
            .ok_or_else(|| unknown(tag))
    }

    /// An empty node of a named variant of `tag`.
    pub fn node_variant(&self, tag: &str, name: &str) -> Result<Node, DecodeError> {
        self.variant(tag, name)
            .map(|schema| Node::new(schema.clone()))
            .ok_or_else(|| unknown(tag))
    }

    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn unknown(tag: &str) -> DecodeError {
    DecodeError::UnknownTag {
        tag: tag.to_string(),
        offset: 0,
    }
}

/// Mutable registry under construction.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: HashMap<&'static str, Entry>,
}

impl RegistryBuilder {
    /// Register the generic layout of a tag, replacing any earlier one.
    pub fn register(&mut self, schema: Schema) -> &mut Self {
        let tag = schema.tag();
        let entry = self.entries.entry(tag).or_default();
        if entry.generic.replace(Arc::new(schema)).is_some() {
            log::warn!("Replacing schema for `{tag}`");
        }
        self
    }

    /// Register a layout used when `when` holds for the positional atom at
    /// `position`. Variants are tried in registration order.
    pub fn register_variant(
        &mut self,
        position: usize,
        when: Discriminant,
        schema: Schema,
    ) -> &mut Self {
        let tag = schema.tag();
        let entry = self.entries.entry(tag).or_default();
        let variant = Variant {
            position,
            when,
            schema: Arc::new(schema),
        };
        match entry
            .variants
            .iter_mut()
            .find(|v| v.position == position && v.when == when)
        {
            Some(existing) => {
                log::warn!("Replacing variant {when:?} at {position} for `{tag}`");
                *existing = variant;
            }
            None => entry.variants.push(variant),
        }
        self
    }

    pub fn build(self) -> SchemaRegistry {
        let schemas = self
            .entries
            .values()
            .flat_map(|e| e.generic.iter().chain(e.variants.iter().map(|v| &v.schema)));
        for schema in schemas {
            for child in schema.child_tags() {
                if !self.entries.contains_key(child) {
                    log::warn!("`{}` accepts unregistered child `{child}`", schema.tag());
                }
            }
        }
        log::debug!("Built schema registry with {} tags", self.entries.len());
        SchemaRegistry {
            entries: self.entries,
        }
    }
}

static REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();

/// Initialize the process-wide standard registry. Safe to call repeatedly
/// and from several threads; every caller gets the same instance.
pub fn init() -> &'static SchemaRegistry {
    REGISTRY.get_or_init(SchemaRegistry::standard)
}

/// The process-wide standard registry, initialized on first use.
pub fn registry() -> &'static SchemaRegistry {
    init()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AtomType;
    use pcb_sexpr::parse;

    fn items(text: &str) -> Vec<Sexpr> {
        parse(text).unwrap().as_list().unwrap().to_vec()
    }

    fn tagged(tag: &'static str, variant: Option<&'static str>) -> Schema {
        let builder = Schema::builder(tag).optional("name", AtomType::String);
        match variant {
            Some(name) => builder.variant(name).build(),
            None => builder.build(),
        }
    }

    #[test]
    fn variants_are_tried_before_generic() {
        let mut builder = SchemaRegistry::builder();
        builder
            .register(tagged("symbol", None))
            .register_variant(0, Discriminant::Quoted, tagged("symbol", Some("library")));
        let reg = builder.build();

        let lib = reg.resolve("symbol", &items(r#"(symbol "Device:R")"#)).unwrap();
        assert_eq!(lib.variant(), Some("library"));
        let placed = reg.resolve("symbol", &items("(symbol (lib_id x))")).unwrap();
        assert_eq!(placed.variant(), None);
    }

    #[test]
    fn equals_and_missing_rules() {
        let mut builder = SchemaRegistry::builder();
        builder
            .register_variant(2, Discriminant::Equals("custom"), tagged("pad", Some("custom")))
            .register_variant(0, Discriminant::Missing, tagged("pad", Some("bare")));
        let reg = builder.build();

        let custom = reg.resolve("pad", &items(r#"(pad "1" smd custom)"#)).unwrap();
        assert_eq!(custom.variant(), Some("custom"));
        let bare = reg.resolve("pad", &items("(pad (at 1 2))")).unwrap();
        assert_eq!(bare.variant(), Some("bare"));
        assert!(reg.resolve("pad", &items(r#"(pad "1" smd rect)"#)).is_none());
    }

    #[test]
    fn replacement_keeps_one_entry() {
        let mut builder = SchemaRegistry::builder();
        builder
            .register(tagged("at", None))
            .register(Schema::builder("at").positional("x", AtomType::Number).build());
        let reg = builder.build();
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.schema("at").unwrap().fields()[0].name, "x");
    }

    #[test]
    fn unknown_tags() {
        let reg = SchemaRegistry::default();
        assert!(reg.is_empty());
        assert!(reg.resolve("at", &items("(at 1 2)")).is_none());
        assert_eq!(
            reg.node("at"),
            Err(DecodeError::UnknownTag {
                tag: "at".to_string(),
                offset: 0,
            })
        );
    }

    #[test]
    fn global_registry_is_shared() {
        assert!(std::ptr::eq(init(), registry()));
        assert!(registry().contains("kicad_sch"));
        assert!(registry().variant("pad", "roundrect").is_some());
    }
}
