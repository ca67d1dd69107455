use crate::{Op, Traversal};

/// Concatenates every batch of `traversal` into one stream.
pub(crate) fn concat<'s>(traversal: &mut Traversal<'s>) -> Vec<Op<'s>> {
    let mut ops = Vec::new();
    traversal.drain(|batch| ops.extend_from_slice(batch));
    ops
}

struct OpenFrame {
    is_object: bool,
    advertised: usize,
    children: usize,
    expect_key: bool,
}

/// Structural validator for an operation stream, fed batch by batch.
///
/// Checks balance, advisory counts against the children actually
/// emitted, and the field-pair atomicity rule at batch boundaries.
pub(crate) struct StreamChecker {
    stack: Vec<OpenFrame>,
    done: bool,
}

impl StreamChecker {
    pub(crate) fn new() -> Self {
        Self {
            stack: Vec::new(),
            done: false,
        }
    }

    pub(crate) fn feed(&mut self, op: &Op<'_>) {
        assert!(!self.done, "operation after the document completed");
        match op {
            Op::Return => {
                let frame = self.stack.pop().expect("return with no open container");
                assert!(
                    !frame.is_object || frame.expect_key,
                    "container closed in the middle of a field"
                );
                assert_eq!(
                    frame.advertised, frame.children,
                    "advisory count does not match emitted children"
                );
                if self.stack.is_empty() {
                    self.done = true;
                }
            }
            Op::String(_)
                if self
                    .stack
                    .last()
                    .is_some_and(|f| f.is_object && f.expect_key) =>
            {
                let frame = self.stack.last_mut().unwrap();
                frame.expect_key = false;
                frame.children += 1;
            }
            value => {
                if let Some(frame) = self.stack.last_mut() {
                    if frame.is_object {
                        assert!(!frame.expect_key, "value operation in key position");
                        frame.expect_key = true;
                    } else {
                        frame.children += 1;
                    }
                }
                match value {
                    Op::ArrayOpen { len } => self.stack.push(OpenFrame {
                        is_object: false,
                        advertised: *len,
                        children: 0,
                        expect_key: false,
                    }),
                    Op::ObjectOpen { len } => self.stack.push(OpenFrame {
                        is_object: true,
                        advertised: *len,
                        children: 0,
                        expect_key: true,
                    }),
                    _ => {
                        if self.stack.is_empty() {
                            self.done = true;
                        }
                    }
                }
            }
        }
    }

    /// A batch boundary must never fall between a key and its value.
    pub(crate) fn end_of_batch(&self) {
        assert!(
            self.stack
                .last()
                .is_none_or(|f| !f.is_object || f.expect_key),
            "batch boundary split a key from its value"
        );
    }

    pub(crate) fn assert_complete(&self) {
        assert!(self.done, "stream ended before the document completed");
        assert!(self.stack.is_empty(), "open containers at end of stream");
    }
}

/// Drains `traversal` while running every structural check, returning
/// the concatenated stream.
pub(crate) fn concat_checked<'s>(traversal: &mut Traversal<'s>) -> Vec<Op<'s>> {
    let capacity = traversal.batch_capacity();
    let mut checker = StreamChecker::new();
    let mut ops = Vec::new();
    loop {
        let batch = traversal.operations();
        assert!(batch.len() <= capacity, "batch exceeded its capacity");
        for op in batch {
            checker.feed(op);
        }
        checker.end_of_batch();
        ops.extend_from_slice(batch);
        if traversal.resume() == 0 {
            break;
        }
    }
    checker.assert_complete();
    ops
}
