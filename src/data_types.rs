//! Values produced by the parser: element events for the stream, and the nested
//! [`Value`] the tree reducer folds them into.

use std::collections::BTreeMap;

/// Attribute name to value, captured when an element opens.
pub type Attributes = BTreeMap<String, String>;

/// Where in an element's lifetime an [`Element`] event was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The start tag was seen, before any children or text.
    Open,
    /// `body` holds the element's complete text content.
    Data,
    /// The end tag was seen, after all children closed.
    Close,
}

/// One point in the parse timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub phase: Phase,
    /// Raw tag name, e.g. `<title>` becomes `title` and `<x:a>` becomes `x:a`.
    pub name: String,
    /// Text read from character data and CDATA blocks. Only populated on [`Phase::Data`].
    pub body: String,
    pub attributes: Attributes,
}

impl Element {
    /// Start tag seen, body left empty.
    pub fn open(name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            phase: Phase::Open,
            name: name.into(),
            body: String::new(),
            attributes,
        }
    }

    /// Complete text content of the named element.
    pub fn data(name: impl Into<String>, body: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            phase: Phase::Data,
            name: name.into(),
            body: body.into(),
            attributes,
        }
    }

    /// End tag seen. Carries no attributes.
    pub fn close(name: impl Into<String>) -> Self {
        Self {
            phase: Phase::Close,
            name: name.into(),
            body: String::new(),
            attributes: Attributes::new(),
        }
    }
}

/// Key prefix for attributes stored in a [`Value::Map`].
pub const ATTRIBUTE_PREFIX: char = '@';
/// Key holding an element's own text when it also has attributes or children.
pub const BODY_KEY: &str = "#body";

/// Aggregated document tree.
///
/// XML names can't start with `@` or `#`, so attribute keys (`@id`) and the body
/// key (`#body`) never collide with child element names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Map(BTreeMap<String, Value>),
    /// Repeated sibling elements, in document order.
    List(Vec<Value>),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Looks up a child by key, `None` unless this is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?.get(key)
    }

    /// Shorthand for `get("@name")`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.get(&format!("{ATTRIBUTE_PREFIX}{name}"))?.as_text()
    }

    /// The element's own text, whether collapsed to a string or stored under [`BODY_KEY`].
    pub fn body(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Map(m) => m.get(BODY_KEY)?.as_text(),
            Value::List(_) => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}
