use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, stable identity of a [Record](./struct.Record.html). Maps to the GraphQL `ID` scalar.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new<I: Into<String>>(id: I) -> Self {
        RecordId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        RecordId(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId(id.to_string())
    }
}

/// A user as mirrored locally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub email: String
}

impl Record {
    pub fn new<I, N, E>(id: I, name: N, email: E) -> Self
    where
        I: Into<RecordId>,
        N: Into<String>,
        E: Into<String>
    {
        Record {
            id: id.into(),
            name: name.into(),
            email: email.into()
        }
    }
}

/// Fields sent with an update. Only the name can change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserPatch {
    pub name: String
}
