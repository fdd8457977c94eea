//! Test support for `roster`: a scripted in-memory data source and user fixtures.

mod source;
pub use source::*;

use roster::Record;
use std::sync::atomic::{AtomicU32, Ordering};

/// The first page of users served by the GraphQLZero API.
pub fn users() -> Vec<Record> {
    vec![
        Record::new("1", "Leanne Graham", "Sincere@april.biz"),
        Record::new("2", "Ervin Howell", "Shanna@melissa.tv"),
        Record::new("3", "Clementine Bauch", "Nathan@yesenia.net"),
        Record::new("4", "Patricia Lebsack", "Julianne.OConner@kory.org"),
        Record::new("5", "Chelsey Dietrich", "Lucio_Hettinger@annie.ca"),
    ]
}

#[derive(Debug, Default)]
pub struct Counter {
    n: AtomicU32
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(&self) {
        self.n.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self) -> u32 {
        self.n.load(Ordering::SeqCst)
    }
}

impl PartialEq<u32> for Counter {
    fn eq(&self, other: &u32) -> bool {
        self.get() == *other
    }
}
