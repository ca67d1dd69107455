//! Mirrored-stack replay of an operation stream into owned values.
//!
//! The consumer half of the protocol: push on a container open, pop and
//! close on [`Op::Return`], record scalars in place. Feeding a complete
//! stream through a [`TreeBuilder`] reconstructs a tree structurally and
//! value-wise identical to the source document, which is exactly the
//! property the round-trip tests lean on.
//!
//! # Examples
//!
//! ```
//! use jsonshuttle::{Session, TreeBuilder, Value};
//!
//! let mut session = Session::new();
//! let mut traversal = session.parse(br#"{"n":[1,2]}"#)?;
//!
//! let mut builder = TreeBuilder::new();
//! loop {
//!     for op in traversal.operations() {
//!         builder.apply(*op).expect("engine streams are well formed");
//!     }
//!     if traversal.resume() == 0 {
//!         break;
//!     }
//! }
//! let root = builder.finish().expect("document complete");
//! assert!(root.is_object());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use thiserror::Error;

use crate::{
    op::Op,
    value::{Array, Map, Value},
};

/// A malformed operation stream fed to a [`TreeBuilder`].
///
/// Streams produced by a [`Traversal`](crate::Traversal) never trigger
/// these; they guard replay of streams that crossed a boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    /// A close operation arrived with no container open.
    #[error("return operation with no open container")]
    UnbalancedReturn,
    /// An operation arrived after the root value was already complete.
    #[error("operation after the document completed")]
    TrailingOperation,
    /// An object value arrived without a preceding key.
    #[error("object value with no pending key")]
    MissingKey,
}

/// One container being rebuilt, with the pending key of an object whose
/// value has not arrived yet.
#[derive(Debug)]
enum Pending {
    Array(Array),
    Object { map: Map, key: Option<String> },
}

/// Rebuilds a document from its operation stream with a mirrored stack.
///
/// Duplicate object keys are resolved last-wins, matching the usual
/// owned-map semantics; the stream itself always carries every pair.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    stack: Vec<Pending>,
    root: Option<Value>,
}

impl TreeBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one operation.
    ///
    /// # Errors
    ///
    /// A [`ReplayError`] if the stream is not a well-formed depth-first
    /// emission.
    pub fn apply(&mut self, op: Op<'_>) -> Result<(), ReplayError> {
        if self.root.is_some() {
            return Err(ReplayError::TrailingOperation);
        }
        match op {
            Op::ArrayOpen { len } => self.stack.push(Pending::Array(Array::with_capacity(len))),
            Op::ObjectOpen { .. } => self.stack.push(Pending::Object {
                map: Map::new(),
                key: None,
            }),
            Op::String(s) => {
                let in_field_position =
                    matches!(self.stack.last(), Some(Pending::Object { key: None, .. }));
                if in_field_position {
                    if let Some(Pending::Object { key, .. }) = self.stack.last_mut() {
                        *key = Some(s.to_owned());
                    }
                } else {
                    self.place(Value::String(s.to_owned()))?;
                }
            }
            Op::Number(n) => self.place(Value::Number(n))?,
            Op::Boolean(b) => self.place(Value::Boolean(b))?,
            Op::Null => self.place(Value::Null)?,
            Op::Return => {
                let closed = match self.stack.pop() {
                    Some(Pending::Array(items)) => Value::Array(items),
                    Some(Pending::Object { map, .. }) => Value::Object(map),
                    None => return Err(ReplayError::UnbalancedReturn),
                };
                self.place(closed)?;
            }
        }
        Ok(())
    }

    /// Whether a complete root value has been rebuilt.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.root.is_some()
    }

    /// Consumes the builder, returning the root if the stream completed.
    #[must_use]
    pub fn finish(self) -> Option<Value> {
        self.root
    }

    fn place(&mut self, value: Value) -> Result<(), ReplayError> {
        match self.stack.last_mut() {
            None => self.root = Some(value),
            Some(Pending::Array(items)) => items.push(value),
            Some(Pending::Object { map, key }) => {
                let key = key.take().ok_or(ReplayError::MissingKey)?;
                map.insert(key, value);
            }
        }
        Ok(())
    }
}
