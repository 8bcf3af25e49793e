use crate::document::{document, property_value};
use crate::error::FieldError;
use crate::node::Node;

document! {
    /// A `.kicad_sym` symbol library.
    SymbolLibrary => "kicad_symbol_lib"
}

impl SymbolLibrary {
    pub fn symbols(&self) -> &[Node] {
        self.node.nodes("symbol")
    }

    pub fn symbols_mut(&mut self) -> Result<&mut Vec<Node>, FieldError> {
        self.node.nodes_mut("symbol")
    }

    pub fn symbol(&self, name: &str) -> Option<&Node> {
        self.symbols().iter().find(|s| s.text("name") == Some(name))
    }

    /// Property value of a symbol, following one level of `extends`.
    pub fn property(&self, symbol: &str, property: &str) -> Option<&str> {
        let node = self.symbol(symbol)?;
        property_value(node.nodes("property"), property).or_else(|| {
            let parent = self.symbol(node.text("extends")?)?;
            property_value(parent.nodes("property"), property)
        })
    }

    pub fn push_symbol(&mut self, symbol: Node) -> Result<(), FieldError> {
        self.node.push("symbol", symbol)
    }
}
