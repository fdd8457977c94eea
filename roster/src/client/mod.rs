use std::sync::Arc;

mod builder;
mod r#impl;

use crate::{exchanges::TerminatorExchange, Exchange, GraphQLQuery, QueryError, Response};
pub use builder::ClientBuilder;
pub use r#impl::ClientImpl;

/// Handle to an exchange chain and its endpoint. Cheap to clone.
#[derive(Clone)]
#[repr(transparent)]
pub struct Client<M: Exchange = TerminatorExchange>(pub Arc<ClientImpl<M>>);

impl Client {
    pub fn builder<U: Into<String>>(url: U) -> ClientBuilder {
        ClientBuilder::new(url)
    }
}

impl<M: Exchange> Client<M> {
    pub async fn query<Q: GraphQLQuery>(
        &self,
        _query: Q,
        variables: Q::Variables
    ) -> Result<Response<Q::ResponseData>, QueryError> {
        self.0.query(_query, variables).await
    }
}
