use crate::{
    types::{HeaderFn, Operation, OperationMeta, OperationOptions},
    utils::progressive_hash,
    Exchange, GraphQLQuery, QueryBody, QueryError, Response
};
use tracing::trace;

pub struct ClientImpl<M: Exchange> {
    pub(crate) url: String,
    pub(crate) exchange: M,
    pub(crate) extra_headers: Option<HeaderFn>
}

impl<M: Exchange> ClientImpl<M> {
    pub(crate) async fn execute_request_operation<Q: GraphQLQuery>(
        &self,
        operation: Operation<Q::Variables>
    ) -> Result<Response<Q::ResponseData>, QueryError> {
        self.exchange
            .run::<Q>(operation)
            .await
            .map(|operation_result| operation_result.response)
    }

    pub async fn query<Q: GraphQLQuery>(
        &self,
        _query: Q,
        variables: Q::Variables
    ) -> Result<Response<Q::ResponseData>, QueryError> {
        let (query, meta) = Q::build_query(variables);
        let operation = self.create_request_operation::<Q>(query, meta)?;
        trace!(
            operation = operation.query.operation_name,
            key = operation.key,
            "executing operation"
        );
        self.execute_request_operation::<Q>(operation).await
    }

    pub(crate) fn create_request_operation<Q: GraphQLQuery>(
        &self,
        query: QueryBody<Q::Variables>,
        meta: OperationMeta
    ) -> Result<Operation<Q::Variables>, QueryError> {
        let key = progressive_hash(meta.query_key, &query.variables)?;

        Ok(Operation {
            key,
            meta,
            query,
            options: OperationOptions {
                url: self.url.clone(),
                extra_headers: self.extra_headers.clone()
            }
        })
    }
}
