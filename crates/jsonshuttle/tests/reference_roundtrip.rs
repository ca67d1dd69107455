//! Replays an operation stream into `serde_json` values and checks the
//! result against `serde_json`'s own reading of the same document.

use jsonshuttle::{Op, Session, SessionOptions};
use serde_json::{Map as JsonMap, Value as JsonValue};

/// Mirrored-stack consumer over `serde_json` values, the way a host
/// runtime on the far side of the batch boundary would rebuild the
/// document.
#[derive(Default)]
struct Rebuilder {
    stack: Vec<Slot>,
    root: Option<JsonValue>,
}

enum Slot {
    Array(Vec<JsonValue>),
    Object(JsonMap<String, JsonValue>, Option<String>),
}

impl Rebuilder {
    fn apply(&mut self, op: &Op<'_>) {
        match *op {
            Op::ArrayOpen { len } => self.stack.push(Slot::Array(Vec::with_capacity(len))),
            Op::ObjectOpen { .. } => self.stack.push(Slot::Object(JsonMap::new(), None)),
            Op::String(s) => {
                let is_key = matches!(self.stack.last(), Some(Slot::Object(_, None)));
                if is_key {
                    if let Some(Slot::Object(_, key)) = self.stack.last_mut() {
                        *key = Some(s.to_owned());
                    }
                } else {
                    self.place(JsonValue::String(s.to_owned()));
                }
            }
            Op::Number(n) => self.place(JsonValue::from(n)),
            Op::Boolean(b) => self.place(JsonValue::Bool(b)),
            Op::Null => self.place(JsonValue::Null),
            Op::Return => {
                let closed = match self.stack.pop().expect("balanced stream") {
                    Slot::Array(items) => JsonValue::Array(items),
                    Slot::Object(map, _) => JsonValue::Object(map),
                };
                self.place(closed);
            }
        }
    }

    fn place(&mut self, value: JsonValue) {
        match self.stack.last_mut() {
            None => self.root = Some(value),
            Some(Slot::Array(items)) => items.push(value),
            Some(Slot::Object(map, key)) => {
                let key = key.take().expect("key precedes value");
                map.insert(key, value);
            }
        }
    }
}

// Numbers stay float-shaped: the stream widens every number to f64,
// while serde_json keeps separate integer representations that would
// not compare equal.
const DOC: &str = r#"{
  "mission": "boundary crossing",
  "window": {"open": 4.25, "close": 9.75, "scrubbed": false},
  "payloads": [
    {"name": "relay", "mass": 120.5},
    {"name": "probe", "mass": 80.25, "instruments": ["mag", "dust"]},
    null
  ],
  "backup": null,
  "telemetry": {"rates": [0.5, 1.5, 2.5], "unit": "hz"}
}"#;

#[test]
fn rebuilt_document_matches_the_reference_parser() {
    for capacity in [2, 5, 4096] {
        let mut session = Session::with_options(SessionOptions {
            batch_capacity: capacity,
            adaptive_capacity: false,
        });
        let mut traversal = session.parse(DOC.as_bytes()).unwrap();
        let mut rebuilder = Rebuilder::default();
        loop {
            for op in traversal.operations() {
                rebuilder.apply(op);
            }
            if traversal.resume() == 0 {
                break;
            }
        }
        let rebuilt = rebuilder.root.expect("document complete");
        let reference: JsonValue = serde_json::from_str(DOC).unwrap();
        assert_eq!(rebuilt, reference);
    }
}
