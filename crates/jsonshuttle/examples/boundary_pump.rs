//! Pumps one document across the batch boundary and prints each batch,
//! the way a host binding would drain a session.

use jsonshuttle::{Session, SessionOptions};

fn main() -> Result<(), jsonshuttle::ParseError> {
    let doc = br#"{"crew":["ada","grace","edsger"],"stages":2,"reusable":true}"#;

    let mut session = Session::with_options(SessionOptions {
        batch_capacity: 4,
        adaptive_capacity: false,
    });
    let mut traversal = session.parse(doc)?;

    let mut batch = 0usize;
    loop {
        batch += 1;
        for op in traversal.operations() {
            println!("batch {batch}: {op:?}");
        }
        if traversal.resume() == 0 {
            break;
        }
    }
    println!("done in {batch} batches");
    Ok(())
}
