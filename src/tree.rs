//! Folds an element stream into a single nested [`Value`].
//!
//! The value built for the root element is the result, so `<root><a>1</a></root>`
//! reduces to `{a: "1"}`. An element with neither attributes nor children becomes
//! its text. Attributes are stored as `@name` and the element's own text, when it
//! also has attributes or children, under `#body`. A repeated sibling name turns
//! the entry into a [`Value::List`] in document order.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::mem;

use log::warn;

use crate::{
    data_types::{Element, Phase, Value, ATTRIBUTE_PREFIX, BODY_KEY},
    error::Error,
};

/// Default filter, keeps every element.
pub fn include_all(_name: &str) -> bool {
    true
}

/// An included element that is still open.
struct Node {
    entries: BTreeMap<String, Value>,
    body: Option<String>,
}

impl Node {
    fn into_value(mut self) -> Value {
        if self.entries.is_empty() {
            return Value::Text(self.body.unwrap_or_default());
        }
        if let Some(body) = self.body {
            self.entries.insert(BODY_KEY.to_owned(), Value::Text(body));
        }
        Value::Map(self.entries)
    }

    fn add_child(&mut self, name: String, value: Value) {
        match self.entries.entry(name) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(slot) => {
                let existing = slot.into_mut();
                if let Value::List(siblings) = existing {
                    siblings.push(value);
                } else {
                    let first = mem::replace(existing, Value::List(Vec::new()));
                    *existing = Value::List(vec![first, value]);
                }
            }
        }
    }
}

/// Incremental reducer. Feed it events in arrival order, then call [`TreeReducer::finish`].
///
/// `include` sees each element's name; returning `false` drops that element and
/// its whole subtree. It is consulted for the root element as well, and an
/// excluded root leaves an empty map.
pub struct TreeReducer<F> {
    include: F,
    stack: Vec<Node>,
    /// Open elements inside an excluded subtree, including its root.
    skip_depth: usize,
    result: Option<Value>,
}

impl<F: Fn(&str) -> bool> TreeReducer<F> {
    pub fn new(include: F) -> Self {
        Self {
            include,
            stack: Vec::new(),
            skip_depth: 0,
            result: None,
        }
    }

    pub fn feed(&mut self, event: Element) {
        match event.phase {
            Phase::Open => {
                if self.skip_depth > 0 || !(self.include)(&event.name) {
                    self.skip_depth += 1;
                    return;
                }
                let entries = event
                    .attributes
                    .into_iter()
                    .map(|(k, v)| (format!("{ATTRIBUTE_PREFIX}{k}"), Value::Text(v)))
                    .collect();
                self.stack.push(Node {
                    entries,
                    body: None,
                });
            }
            Phase::Data => {
                if self.skip_depth > 0 {
                    return;
                }
                if let Some(node) = self.stack.last_mut() {
                    node.body = Some(event.body);
                }
            }
            Phase::Close => {
                if self.skip_depth > 0 {
                    self.skip_depth -= 1;
                    return;
                }
                let Some(node) = self.stack.pop() else {
                    warn!("close event for {} without an open element", event.name);
                    return;
                };
                let value = node.into_value();
                match self.stack.last_mut() {
                    Some(parent) => parent.add_child(event.name, value),
                    None => self.result = Some(value),
                }
            }
        }
    }

    /// The aggregated tree. An excluded root, or no events at all, gives an empty map.
    pub fn finish(self) -> Value {
        self.result.unwrap_or_else(|| Value::Map(BTreeMap::new()))
    }
}

/// Reduces a whole event sequence. The first error is returned unchanged and the
/// partial tree is discarded.
pub fn reduce<I, F>(events: I, include: F) -> Result<Value, Error>
where
    I: IntoIterator<Item = Result<Element, Error>>,
    F: Fn(&str) -> bool,
{
    let mut reducer = TreeReducer::new(include);
    for event in events {
        reducer.feed(event?);
    }
    Ok(reducer.finish())
}
