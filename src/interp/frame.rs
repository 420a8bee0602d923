//! Binding tables
//!
//! A [`StackFrame`] owns the bindings of one scope and links to the frame it
//! was created in (its lexical parent). Frames are shared through [`FrameRef`]
//! so that a function can keep its defining frame alive after the call that
//! created it returns.

use std::cell::RefCell;
use std::fmt::Write;
use std::rc::Rc;

use indexmap::IndexMap;

use super::value::Value;

/// Shared, mutable handle to a frame
pub type FrameRef = Rc<RefCell<StackFrame>>;

/// A single scope's name-to-value table
#[derive(Debug, Default)]
pub struct StackFrame {
    /// Bindings in declaration order
    variables: IndexMap<String, Value>,
    parent: Option<FrameRef>,
}

impl StackFrame {
    /// An empty frame with no parent (the global scope)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(parent: FrameRef) -> Self {
        StackFrame {
            variables: IndexMap::new(),
            parent: Some(parent),
        }
    }

    pub fn into_ref(self) -> FrameRef {
        Rc::new(RefCell::new(self))
    }

    /// Look up `name` in this frame only
    pub fn get_variable(&self, name: &str) -> Option<Value> {
        self.variables.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Bind `name` in this frame, replacing an existing binding in place
    pub fn set_variable(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    pub fn parent(&self) -> Option<&FrameRef> {
        self.parent.as_ref()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render the bindings, one `name: value` line each
    pub fn dump(&self) -> String {
        let mut out = String::from("<----------------->\n");
        for (name, value) in &self.variables {
            let _ = writeln!(out, "{}: {}", name, value);
        }
        out
    }
}
