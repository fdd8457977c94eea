use crate::{
    types::{ExchangeResult, Operation, OperationOptions, OperationResult},
    DebugInfo, Exchange, ExchangeFactory, GraphQLQuery, HeaderPair, QueryBody, Response
};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("fetch error: {0}")]
    NetworkError(#[source] reqwest::Error),
    #[error("server returned error code: {0}\n{1}")]
    NotOk(u16, String),
    #[error("decoding error: {0}")]
    DecodeError(#[source] reqwest::Error)
}

/// The default fetch exchange
///
/// POSTs the operation as JSON using `reqwest`. One HTTP client is shared by every
/// operation that goes through the exchange.
pub struct FetchExchange;

pub struct FetchExchangeImpl {
    http: reqwest::Client
}

impl<TNext: Exchange> ExchangeFactory<TNext> for FetchExchange {
    type Output = FetchExchangeImpl;

    fn build(self, _next: TNext) -> Self::Output {
        FetchExchangeImpl {
            http: reqwest::Client::new()
        }
    }
}

impl FetchExchangeImpl {
    async fn fetch<Q: GraphQLQuery>(
        &self,
        extra_headers: Vec<HeaderPair>,
        options: OperationOptions,
        query: QueryBody<Q::Variables>
    ) -> Result<Response<Q::ResponseData>, FetchError> {
        let mut request = self
            .http
            .post(&options.url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&query);

        for HeaderPair(key, value) in extra_headers {
            request = request.header(key, value);
        }

        let response = request.send().await.map_err(FetchError::NetworkError)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "GraphQL endpoint answered with an error status");
            return Err(FetchError::NotOk(status.as_u16(), body));
        }

        response.json().await.map_err(FetchError::DecodeError)
    }
}

#[async_trait]
impl Exchange for FetchExchangeImpl {
    async fn run<Q: GraphQLQuery>(
        &self,
        operation: Operation<Q::Variables>
    ) -> ExchangeResult<Q::ResponseData> {
        let extra_headers = if let Some(ref extra_headers) = operation.options.extra_headers {
            extra_headers()
        } else {
            Vec::new()
        };

        debug!(
            operation = operation.query.operation_name,
            kind = %operation.meta.operation_type,
            url = %operation.options.url,
            "sending GraphQL request"
        );

        let mut response = self
            .fetch::<Q>(extra_headers, operation.options, operation.query)
            .await?;
        response.debug_info = Some(DebugInfo { did_dedup: false });

        Ok(OperationResult {
            key: operation.key,
            meta: operation.meta,
            response
        })
    }
}
