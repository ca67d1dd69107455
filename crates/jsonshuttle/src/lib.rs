//! Batched, resumable depth-first operation streaming over SIMD-parsed
//! JSON.
//!
//! A [`Session`] parses a document with the [`simd-json`](simd_json) tape
//! reader and walks it with an explicit-stack, non-recursive depth-first
//! engine, emitting a flat stream of typed [`Op`] records in bounded
//! batches. The walk suspends whenever a batch fills, anywhere in the
//! document, and resumes from exactly that point on the next
//! [`Traversal::resume`]. A consumer replays the stream with a mirrored
//! stack to reconstruct the document on the far side of whatever boundary
//! the batches cross.
//!
//! No owned tree is ever built on the producing side: container opens
//! carry exact child counts, strings are borrowed views into the input
//! buffer, and the whole suspension state is a small stack of resume
//! frames.
//!
//! # Examples
//!
//! ```
//! use jsonshuttle::{Op, Session, SessionOptions};
//!
//! let mut session = Session::with_options(SessionOptions {
//!     batch_capacity: 4,
//!     adaptive_capacity: false,
//! });
//! let mut traversal = session.parse(br#"{"name":"shuttle","tags":[1,2,3]}"#)?;
//!
//! let mut ops = Vec::new();
//! traversal.drain(|batch| {
//!     assert!(batch.len() <= 4);
//!     ops.extend_from_slice(batch);
//! });
//!
//! assert_eq!(ops[0], Op::ObjectOpen { len: 2 });
//! assert_eq!(ops[1], Op::String("name"));
//! assert_eq!(ops.last(), Some(&Op::Return));
//! # Ok::<(), jsonshuttle::ParseError>(())
//! ```

mod batch;
mod engine;
mod error;
mod op;
mod reader;
#[cfg(feature = "values")]
mod replay;
mod session;
#[cfg(feature = "values")]
mod value;

#[cfg(test)]
mod tests;

pub use batch::DEFAULT_BATCH_CAPACITY;
pub use error::ParseError;
pub use op::{Op, Opcode};
#[cfg(feature = "values")]
pub use replay::{ReplayError, TreeBuilder};
pub use session::{Session, SessionOptions, Traversal};
#[cfg(feature = "values")]
pub use value::{Array, Map, Value};
