//! Session lifecycle: create once, parse a document, drain it in batches,
//! reuse for the next document.
//!
//! A [`Session`] owns everything that outlives a single document: the
//! defensive input copy and the reader's reusable scratch buffers. A
//! [`Traversal`] borrows the session for the duration of one document and
//! owns the per-document state: the parsed tape, the frame stack, and the
//! operation buffer. Dropping the traversal is cancellation; no cleanup
//! beyond the drop is required.
//!
//! # Examples
//!
//! ```
//! use jsonshuttle::{Op, Session};
//!
//! let mut session = Session::new();
//! let mut traversal = session.parse(br#"{"a":1,"b":[2,3]}"#)?;
//!
//! let mut ops = Vec::new();
//! loop {
//!     ops.extend_from_slice(traversal.operations());
//!     if traversal.resume() == 0 {
//!         break;
//!     }
//! }
//! assert_eq!(ops.len(), 9);
//! assert_eq!(ops[0], Op::ObjectOpen { len: 2 });
//!
//! // The same session parses the next document.
//! drop(traversal);
//! let traversal = session.parse(b"42")?;
//! assert_eq!(traversal.operations(), [Op::Number(42.0)]);
//! # Ok::<(), jsonshuttle::ParseError>(())
//! ```

use crate::{
    batch::{self, OpBuffer},
    engine::Engine,
    error::ParseError,
    op::Op,
    reader::Document,
};

/// Configuration for a [`Session`].
///
/// # Examples
///
/// ```rust
/// use jsonshuttle::{Session, SessionOptions};
///
/// let session = Session::with_options(SessionOptions {
///     batch_capacity: 64,
///     adaptive_capacity: false,
/// });
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Operation capacity of one batch at the largest tier.
    ///
    /// Values below 2 are clamped up: two slots are the minimum at which
    /// an object key and its value fit in one batch.
    ///
    /// # Default
    ///
    /// [`DEFAULT_BATCH_CAPACITY`](crate::DEFAULT_BATCH_CAPACITY) (2048)
    pub batch_capacity: usize,

    /// Whether to scale the batch capacity down for small inputs to
    /// reduce retained memory: a quarter of `batch_capacity` under 1 KiB
    /// of input, half under 4 KiB. Capacity is chosen once per parse,
    /// never mid-stream.
    ///
    /// # Default
    ///
    /// `true`
    pub adaptive_capacity: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            batch_capacity: batch::DEFAULT_BATCH_CAPACITY,
            adaptive_capacity: true,
        }
    }
}

/// A reusable parsing session.
///
/// Not safe for concurrent use: every call mutates the session in place.
/// Parsing a new document discards any prior in-progress traversal by
/// construction, since the previous [`Traversal`]'s borrow must end
/// before [`Session::parse`] can be called again.
#[derive(Default)]
pub struct Session {
    input: Vec<u8>,
    buffers: simd_json::Buffers,
    options: SessionOptions,
}

impl Session {
    /// Creates a session with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(SessionOptions::default())
    }

    /// Creates a session with the given options.
    #[must_use]
    pub fn with_options(options: SessionOptions) -> Self {
        Self {
            input: Vec::new(),
            buffers: simd_json::Buffers::default(),
            options,
        }
    }

    /// Parses one document from a defensive copy of `bytes` and performs
    /// the first traversal step: the returned traversal's batch holds
    /// exactly one operation describing the root.
    ///
    /// The copy exists because the reader unescapes strings in place and
    /// therefore needs mutable access to the bytes it scans; callers who
    /// can hand over their buffer should prefer
    /// [`Session::parse_in_place`]. The copy's allocation is made
    /// fallibly and reused across documents; [`Session::reset`] releases
    /// it.
    ///
    /// # Errors
    ///
    /// [`ParseError::Malformed`] if the reader rejects the bytes,
    /// [`ParseError::BufferAlloc`] if the copy cannot be allocated.
    pub fn parse(&mut self, bytes: &[u8]) -> Result<Traversal<'_>, ParseError> {
        self.input.clear();
        if let Err(source) = self.input.try_reserve(bytes.len()) {
            self.input = Vec::new();
            return Err(ParseError::BufferAlloc(source));
        }
        self.input.extend_from_slice(bytes);
        let capacity = batch::effective_capacity(
            self.options.batch_capacity,
            self.options.adaptive_capacity,
            bytes.len(),
        );
        let tape = simd_json::to_tape_with_buffers(&mut self.input, &mut self.buffers)?;
        Ok(Traversal::start(Document::new(tape), capacity))
    }

    /// Parses one document directly from the caller's buffer, zero-copy.
    ///
    /// The buffer is scanned and unescaped in place; its contents after
    /// the call are unspecified except through the string views of the
    /// emitted operations. Semantics are otherwise identical to
    /// [`Session::parse`].
    ///
    /// # Errors
    ///
    /// [`ParseError::Malformed`] if the reader rejects the bytes.
    pub fn parse_in_place<'s>(
        &'s mut self,
        bytes: &'s mut [u8],
    ) -> Result<Traversal<'s>, ParseError> {
        let capacity = batch::effective_capacity(
            self.options.batch_capacity,
            self.options.adaptive_capacity,
            bytes.len(),
        );
        let tape = simd_json::to_tape_with_buffers(bytes, &mut self.buffers)?;
        Ok(Traversal::start(Document::new(tape), capacity))
    }

    /// Releases the owned input copy and the reader's scratch buffers.
    ///
    /// [`Session::parse`] clears the copy before reusing it, so calling
    /// this is only needed to stop retaining memory while a session sits
    /// idle, such as after a parse error.
    pub fn reset(&mut self) {
        self.input = Vec::new();
        self.buffers = simd_json::Buffers::default();
    }
}

/// One document's traversal state, borrowed from its [`Session`].
///
/// String payloads in the emitted operations point into the session's
/// input buffer; they stay valid for the lifetime of this traversal and
/// no longer. The batch returned by [`Traversal::operations`] is a view
/// that the next [`Traversal::resume`] overwrites, which the borrow
/// checker enforces: the view cannot be held across a resume.
pub struct Traversal<'s> {
    engine: Engine<'s>,
    buf: OpBuffer<'s>,
}

impl<'s> Traversal<'s> {
    fn start(doc: Document<'s>, capacity: usize) -> Self {
        let mut engine = Engine::new(doc);
        let mut buf = OpBuffer::with_capacity(capacity);
        engine.begin(&mut buf);
        Self { engine, buf }
    }

    /// The current batch: everything the last `parse`/`resume` wrote.
    #[must_use]
    pub fn operations(&self) -> &[Op<'s>] {
        self.buf.as_slice()
    }

    /// Fills the next batch and returns the number of operations
    /// written. Zero means the document was already fully drained;
    /// further calls keep returning zero with an empty batch.
    pub fn resume(&mut self) -> usize {
        self.engine.resume(&mut self.buf)
    }

    /// Whether every operation of the document has been emitted. The
    /// final batch may still be waiting in [`Traversal::operations`].
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.engine.is_complete()
    }

    /// Nesting depth of the suspension point: the number of containers
    /// currently open.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.engine.depth()
    }

    /// Whether the reader consumed the raw input in full, independent of
    /// how much of the operation stream has been drained.
    #[must_use]
    pub fn input_consumed(&self) -> bool {
        self.engine.doc().input_consumed()
    }

    /// The batch capacity this traversal was sized with.
    #[must_use]
    pub fn batch_capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Runs the batch loop to completion, handing every non-empty batch
    /// to `sink` in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonshuttle::Session;
    ///
    /// let mut session = Session::new();
    /// let mut traversal = session.parse(br#"[null,false]"#)?;
    /// let mut ops = Vec::new();
    /// traversal.drain(|batch| ops.extend_from_slice(batch));
    /// assert_eq!(ops.len(), 4);
    /// # Ok::<(), jsonshuttle::ParseError>(())
    /// ```
    pub fn drain<F: FnMut(&[Op<'s>])>(&mut self, mut sink: F) {
        loop {
            let batch = self.operations();
            if !batch.is_empty() {
                sink(batch);
            }
            if self.resume() == 0 {
                break;
            }
        }
    }
}
