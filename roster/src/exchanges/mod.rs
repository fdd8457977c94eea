//! The built-in exchanges.
//! `FetchExchange` and `DedupExchange` require the `default-exchanges` feature.

use crate::{
    types::{Exchange, ExchangeResult, Operation},
    GraphQLQuery
};
use thiserror::Error;

#[cfg(feature = "default-exchanges")]
mod dedup;
#[cfg(feature = "default-exchanges")]
mod fetch;

#[cfg(feature = "default-exchanges")]
pub use dedup::{DedupExchange, DedupExchangeImpl};
#[cfg(feature = "default-exchanges")]
pub use fetch::{FetchError, FetchExchange, FetchExchangeImpl};

#[derive(Debug, Error)]
enum ChainError {
    #[error("unexpected end of exchange chain")]
    UnexpectedEndOfChain
}

/// The terminating exchange.
/// This will always be the last exchange in the chain and will simply return an error if called.
pub struct TerminatorExchange;

#[async_trait]
impl Exchange for TerminatorExchange {
    async fn run<Q: GraphQLQuery>(
        &self,
        _operation: Operation<Q::Variables>
    ) -> ExchangeResult<Q::ResponseData> {
        Err(ChainError::UnexpectedEndOfChain.into())
    }
}
