use pcb_sexpr::Number;

use crate::node::Node;

/// Text held by a string or symbol field.
///
/// Decoded text remembers whether the source atom was quoted so it can be
/// written back the same way. Text created in code follows the field's
/// convention instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    value: String,
    quoted: Option<bool>,
}

impl Text {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: None,
        }
    }

    pub(crate) fn from_atom(value: impl Into<String>, quoted: bool) -> Self {
        Self {
            value: value.into(),
            quoted: Some(quoted),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Source quoting, if this text was decoded.
    pub fn was_quoted(&self) -> Option<bool> {
        self.quoted
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        Text::new(value)
    }
}

impl From<String> for Text {
    fn from(value: String) -> Self {
        Text::new(value)
    }
}

/// A field value held by a [`Node`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(Number),
    Text(Text),
    Bool(bool),
    /// Values of a rest positional.
    List(Vec<Value>),
    Node(Node),
    Nodes(Vec<Node>),
}

impl Value {
    /// A rest-positional list of text values.
    pub fn texts<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Text>,
    {
        Value::List(items.into_iter().map(|s| Value::Text(s.into())).collect())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.value()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(t) => Some(t.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_nodes(&self) -> Option<&[Node]> {
        match self {
            Value::Nodes(nodes) => Some(nodes),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::new(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value.into())
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(Text::new(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(Text::new(value))
    }
}

impl From<Text> for Value {
    fn from(value: Text) -> Self {
        Value::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Node> for Value {
    fn from(value: Node) -> Self {
        Value::Node(value)
    }
}

impl From<Vec<Node>> for Value {
    fn from(value: Vec<Node>) -> Self {
        Value::Nodes(value)
    }
}
