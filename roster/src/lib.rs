//! Mirror a remote GraphQL user list into local state
//! and keep it consistent while update and delete mutations complete.
//!
//! # Getting Started
//!
//! Build a [Client](./client/struct.Client.html), wrap it in a
//! [GraphQLSource](./source/struct.GraphQLSource.html) and hand that to a
//! [Controller](./controller/struct.Controller.html):
//!
//! ```no_run
//! # tokio_test::block_on(async {
//! use roster::{Client, Controller, GraphQLSource, RecordId};
//!
//! let client = Client::builder("https://graphqlzero.almansi.me/api")
//!     .with_default_exchanges()
//!     .build();
//! let controller = Controller::new(GraphQLSource::new(client));
//!
//! controller.load().await.unwrap();
//! controller
//!     .request_update(&RecordId::new("1"), || Some("Updated Name".to_string()))
//!     .await
//!     .unwrap();
//!
//! for record in controller.snapshot().records {
//!     println!("{} <{}>", record.name, record.email);
//! }
//! # });
//! ```
//!
//! # Reconciliation
//!
//! The list is fetched once and copied into a local
//! [MirrorStore](./store/struct.MirrorStore.html). From then on the store only changes
//! when a mutation has been confirmed by the server:
//!
//! * a confirmed update renames exactly one record, using the name the caller asked for
//!   rather than the one echoed back by the server
//! * a confirmed delete removes exactly one record, whatever the boolean payload says
//! * a confirmation for an id that is no longer in the store is dropped
//!
//! Failures never touch the store. They are reported to the caller and kept in the
//! [View](./controller/struct.View.html) for display.
//!
//! # Exchanges
//!
//! Exchanges are like a bi-directional middleware.
//! They act on both the outgoing operation and the incoming result,
//! passing the operation on if they can't return a result themselves.
//!
//! There are two default exchanges, called in this order:
//!
//! ## DedupExchange
//!
//! Keeps track of in-flight queries and, instead of firing off another identical query,
//! waits for the result of the one already running. Mutations are never deduplicated:
//! every intent the user triggers reaches the server.
//!
//! ## FetchExchange
//!
//! Serializes the operation, POSTs it using `reqwest` and deserializes the response.
//! This should be the last exchange in the chain, as it never forwards an operation.
//!
//! # Features
//!
//! * `default-exchanges` **(default)** - Include the default exchanges and the related builder method

#[macro_use]
extern crate async_trait;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{collections::HashMap, fmt, fmt::Display};

pub mod client;
pub mod controller;
mod error;
pub mod exchanges;
pub mod queries;
mod record;
pub mod source;
pub mod store;
pub(crate) mod types;
pub mod utils;

pub use client::{Client, ClientBuilder};
pub use controller::{Confirm, Controller, FetchState, NamePrompt, Outcome, View};
pub use error::{MirrorError, QueryError, SourceError};
pub use record::{Record, RecordId, UserPatch};
pub use source::{GraphQLSource, RemoteDataSource, SourceConfig, DEFAULT_ENDPOINT};
pub use store::MirrorStore;
pub use types::{DebugInfo, Exchange, ExchangeFactory, HeaderPair, OperationType};

/// Types used by custom exchanges. Regular users probably don't need these.
pub mod exchange {
    pub use crate::types::{
        Exchange, ExchangeFactory, ExchangeResult, Operation, OperationMeta, OperationOptions,
        OperationResult, OperationType
    };
}

/// The form in which operations are sent over HTTP. This will be built using the [GraphQLQuery](./trait.GraphQLQuery.html) trait normally.
#[derive(Debug, Serialize, Clone)]
pub struct QueryBody<Variables: Serialize + Send + Sync + Clone> {
    /// The values for the variables. They must match those declared in the operation document.
    pub variables: Variables,
    /// The GraphQL document, as a string.
    pub query: &'static str,
    /// The GraphQL operation name, as a string.
    #[serde(rename = "operationName")]
    pub operation_name: &'static str
}

/// A typed GraphQL operation. Implemented on the zero-sized marker struct of each module in [queries](./queries/index.html).
pub trait GraphQLQuery: Send + Sync + 'static {
    /// The shape of the variables expected by the operation.
    type Variables: Serialize + Send + Sync + Clone + 'static;
    /// The top-level shape of the response data (the `data` field in the GraphQL response).
    type ResponseData: Serialize + DeserializeOwned + Send + Sync + Clone + 'static;

    /// Produce the request body along with the static metadata of the operation.
    fn build_query(variables: Self::Variables) -> (QueryBody<Self::Variables>, exchange::OperationMeta);
}

/// The generic shape taken by the responses of GraphQL APIs.
///
/// [GraphQL response format](https://github.com/graphql/graphql-spec/blob/main/spec/Section%207%20--%20Response.md)
///
/// ```
/// # use serde_json::json;
/// # use serde::Deserialize;
/// #
/// # #[derive(Debug, Deserialize, PartialEq, Clone)]
/// # struct User {
/// #     id: String,
/// # }
/// #
/// # #[derive(Debug, Deserialize, PartialEq, Clone)]
/// # struct ResponseData {
/// #     users: Vec<User>,
/// # }
/// #
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use roster::Response;
///
/// let body: Response<ResponseData> = serde_json::from_value(json!({
///     "data": {
///         "users": [{"id": "1"}],
///     },
///     "errors": [],
/// }))?;
///
/// let expected: Response<ResponseData> = Response {
///     data: Some(ResponseData {
///         users: vec![User { id: "1".to_owned() }],
///     }),
///     errors: Some(vec![]),
///     debug_info: None
/// };
///
/// assert_eq!(body, expected);
///
/// #     Ok(())
/// # }
/// ```
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Response<Data: Clone> {
    /// Set by the exchanges on the way back, never read from the wire.
    #[serde(skip_deserializing, rename = "debugInfo")]
    pub debug_info: Option<DebugInfo>,
    /// The absent, partial or complete response data.
    pub data: Option<Data>,
    /// The top-level errors returned by the server.
    pub errors: Option<Vec<Error>>
}

impl<Data: Clone> Response<Data> {
    /// Whether the server reported at least one error.
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().map_or(false, |errors| !errors.is_empty())
    }
}

/// An element in the top-level `errors` array of a response body.
///
/// ```
/// # use serde_json::json;
/// # use serde::Deserialize;
/// #
/// # #[derive(Debug, Deserialize, PartialEq, Clone)]
/// # struct ResponseData {
/// #     something: i32
/// # }
/// #
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use roster::*;
///
/// let body: Response<ResponseData> = serde_json::from_value(json!({
///     "data": null,
///     "errors": [
///         {
///             "message": "User not found",
///             "locations": [{ "line": 2, "column": 3 }],
///             "path": ["updateUser"]
///         }
///      ],
/// }))?;
///
/// let error = &body.errors.unwrap()[0];
/// assert_eq!(error.to_string(), "updateUser:2:3: User not found");
///
/// #     Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Error {
    /// The human-readable error message. This is the only required field.
    pub message: String,
    /// Which locations in the document the error applies to.
    pub locations: Option<Vec<Location>>,
    /// Which path in the response the error applies to, e.g. `["users", 0, "email"]`.
    pub path: Option<Vec<PathFragment>>,
    /// Additional errors. Their exact format is defined by the server.
    pub extensions: Option<HashMap<String, serde_json::Value>>
}

impl Error {
    /// An error carrying only a message.
    pub fn new<M: Into<String>>(message: M) -> Self {
        Error {
            message: message.into(),
            locations: None,
            path: None,
            extensions: None
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Use `/` as a separator like JSON Pointer.
        let path = self
            .path
            .as_ref()
            .map(|fragments| {
                fragments
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_else(|| "<query>".to_string());

        // Only the first location is shown.
        let loc = self
            .locations
            .as_ref()
            .and_then(|locations| locations.first())
            .copied()
            .unwrap_or_default();

        write!(f, "{}:{}:{}: {}", path, loc.line, loc.column, self.message)
    }
}

/// Part of a path in a response. It can be an object key or an array index. See [Error](./struct.Error.html).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PathFragment {
    /// A key inside an object
    Key(String),
    /// An index inside an array
    Index(i32)
}

impl Display for PathFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PathFragment::Key(ref key) => write!(f, "{}", key),
            PathFragment::Index(ref idx) => write!(f, "{}", idx)
        }
    }
}

/// Represents a location inside a document. Used in errors. See [Error](./struct.Error.html).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Location {
    /// The line number in the document where the error originated (starting from 1).
    pub line: i32,
    /// The column number in the document where the error originated (starting from 1).
    pub column: i32
}
