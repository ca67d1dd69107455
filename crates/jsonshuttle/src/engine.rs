//! The explicit-stack depth-first traversal engine.
//!
//! The natural shape of depth-first emission is recursion; here progress
//! must survive returning to the caller between batches, so the call
//! stack is replaced by an explicit stack of [`Frame`]s. At every
//! suspension point the stack encodes the path from the root to the next
//! unemitted element, and nothing else: resuming needs no rescan.
//!
//! Slot discipline: continuing an array needs one free slot, an object
//! field needs two so that a key is never the last operation of a batch
//! with its value pushed to the next one. A close operation also takes a
//! slot and is deferred to the next batch when the buffer fills on a
//! container's final child.

use crate::{
    batch::OpBuffer,
    op::Op,
    reader::{ContainerKind, Document, ValueRef},
};

/// Externalized state of one in-progress container iteration.
///
/// `next` is the tape index of the first child not yet emitted; for an
/// object it points at the key node of the next field. `remaining` counts
/// the children still to emit. While a child container is being walked
/// the parent's `next` is stale; the pop hands the child's final cursor,
/// which sits exactly one past the child's subtree, back to the parent.
#[derive(Debug, Clone, Copy)]
struct Frame {
    kind: ContainerKind,
    next: usize,
    remaining: usize,
}

/// Outcome of working the top frame against the current batch.
enum Step {
    /// A child container was opened; its frame goes on top.
    Descend(Frame),
    /// The frame's children are exhausted; close it.
    Done,
    /// The batch cannot take the frame's next write.
    Full,
}

/// The walker: a parsed document plus the stack of open containers.
pub(crate) struct Engine<'input> {
    doc: Document<'input>,
    frames: Vec<Frame>,
}

impl<'input> Engine<'input> {
    pub(crate) fn new(doc: Document<'input>) -> Self {
        Self {
            doc,
            frames: Vec::new(),
        }
    }

    pub(crate) fn doc(&self) -> &Document<'input> {
        &self.doc
    }

    /// Current nesting depth; zero once the traversal has completed.
    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.frames.is_empty()
    }

    /// Emits the single operation describing the root and, for a
    /// container root, pushes its resume frame.
    pub(crate) fn begin(&mut self, buf: &mut OpBuffer<'input>) {
        buf.reset();
        match self.doc.value_at(Document::ROOT) {
            ValueRef::Container(kind, len) => {
                buf.push(kind.open(len));
                self.frames.push(Frame {
                    kind,
                    next: Document::ROOT + 1,
                    remaining: len,
                });
            }
            ValueRef::Scalar(op) => buf.push(op),
        }
    }

    /// Drains the walk into `buf` until the buffer cannot take the next
    /// required write or the frame stack empties. Returns the number of
    /// operations written; zero means the traversal completed earlier.
    pub(crate) fn resume(&mut self, buf: &mut OpBuffer<'input>) -> usize {
        buf.reset();
        loop {
            let Some(frame) = self.frames.last_mut() else {
                break;
            };
            if buf.remaining() < frame.kind.reservation() {
                break;
            }
            let step = match frame.kind {
                ContainerKind::Array => Self::step_array(&self.doc, frame, buf),
                ContainerKind::Object => Self::step_object(&self.doc, frame, buf),
            };
            match step {
                Step::Descend(child) => self.frames.push(child),
                Step::Full => break,
                Step::Done => {
                    if buf.is_full() {
                        break;
                    }
                    if let Some(done) = self.frames.pop() {
                        buf.push(Op::Return);
                        if let Some(parent) = self.frames.last_mut() {
                            parent.next = done.next;
                        }
                    }
                }
            }
        }
        buf.len()
    }

    fn step_array(doc: &Document<'input>, frame: &mut Frame, buf: &mut OpBuffer<'input>) -> Step {
        while frame.remaining > 0 {
            if buf.is_full() {
                return Step::Full;
            }
            let idx = frame.next;
            match doc.value_at(idx) {
                ValueRef::Container(kind, len) => {
                    buf.push(kind.open(len));
                    frame.remaining -= 1;
                    return Step::Descend(Frame {
                        kind,
                        next: idx + 1,
                        remaining: len,
                    });
                }
                ValueRef::Scalar(op) => {
                    buf.push(op);
                    frame.next = idx + 1;
                    frame.remaining -= 1;
                }
            }
        }
        Step::Done
    }

    fn step_object(doc: &Document<'input>, frame: &mut Frame, buf: &mut OpBuffer<'input>) -> Step {
        while frame.remaining > 0 {
            if buf.remaining() < 2 {
                return Step::Full;
            }
            let key_idx = frame.next;
            buf.push(Op::String(doc.key_at(key_idx)));
            let value_idx = key_idx + 1;
            match doc.value_at(value_idx) {
                ValueRef::Container(kind, len) => {
                    buf.push(kind.open(len));
                    frame.remaining -= 1;
                    return Step::Descend(Frame {
                        kind,
                        next: value_idx + 1,
                        remaining: len,
                    });
                }
                ValueRef::Scalar(op) => {
                    buf.push(op);
                    frame.next = value_idx + 1;
                    frame.remaining -= 1;
                }
            }
        }
        Step::Done
    }
}
