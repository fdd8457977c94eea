use crate::{
    types::{ExchangeResult, Operation, OperationResult},
    Exchange, ExchangeFactory, GraphQLQuery, OperationType, QueryError
};
use futures::channel::{oneshot, oneshot::Sender};
use parking_lot::Mutex;
use std::{any::Any, collections::HashMap, sync::Arc};
use tracing::trace;

type Listener = Sender<Result<Box<dyn Any + Send>, QueryError>>;
type InFlightCache = Arc<Mutex<HashMap<u64, Vec<Listener>>>>;

/// The default deduplication exchange.
///
/// This will keep track of in-flight queries and catch any identical queries before they execute,
/// instead waiting for the result from the in-flight query.
/// Mutations always pass through.
pub struct DedupExchange;

pub struct DedupExchangeImpl<TNext: Exchange> {
    next: TNext,
    in_flight_operations: InFlightCache
}

impl<TNext: Exchange> ExchangeFactory<TNext> for DedupExchange {
    type Output = DedupExchangeImpl<TNext>;

    fn build(self, next: TNext) -> Self::Output {
        DedupExchangeImpl {
            next,
            in_flight_operations: InFlightCache::default()
        }
    }
}

fn should_skip<Q: GraphQLQuery>(operation: &Operation<Q::Variables>) -> bool {
    operation.meta.operation_type != OperationType::Query
}

fn make_deduped_result<Q: GraphQLQuery>(
    res: &ExchangeResult<Q::ResponseData>
) -> Result<Box<dyn Any + Send>, QueryError> {
    match res {
        Ok(ref res) => {
            let mut res = res.clone();
            if let Some(ref mut debug_info) = res.response.debug_info {
                debug_info.did_dedup = true;
            }
            Ok(Box::new(res))
        }
        Err(e) => Err(e.clone())
    }
}

/// Clears the in-flight entry if the leading operation is dropped before it resolves,
/// so that waiters see a cancellation instead of hanging.
struct Leader<'a> {
    in_flight: &'a InFlightCache,
    key: u64,
    settled: bool
}

impl Drop for Leader<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.in_flight.lock().remove(&self.key);
        }
    }
}

impl<TNext: Exchange> DedupExchangeImpl<TNext> {
    fn notify_listeners<Q: GraphQLQuery>(&self, key: u64, res: &ExchangeResult<Q::ResponseData>) {
        let to_be_notified = self.in_flight_operations.lock().remove(&key);
        for sender in to_be_notified.into_iter().flatten() {
            // A waiter that went away is not an error.
            let _ = sender.send(make_deduped_result::<Q>(res));
        }
    }
}

#[async_trait]
impl<TNext: Exchange> Exchange for DedupExchangeImpl<TNext> {
    async fn run<Q: GraphQLQuery>(
        &self,
        operation: Operation<Q::Variables>
    ) -> ExchangeResult<Q::ResponseData> {
        if should_skip::<Q>(&operation) {
            return self.next.run::<Q>(operation).await;
        }

        let key = operation.key;
        let rcv = {
            let mut cache = self.in_flight_operations.lock();
            if let Some(listeners) = cache.get_mut(&key) {
                let (sender, receiver) = oneshot::channel();
                listeners.push(sender);
                Some(receiver)
            } else {
                cache.insert(key, Vec::new());
                None
            }
        };

        if let Some(rcv) = rcv {
            trace!(key, "waiting for identical in-flight query");
            let res: Box<dyn Any + Send> = rcv.await??;
            match res.downcast::<OperationResult<Q::ResponseData>>() {
                Ok(res) => Ok(*res),
                // Key collision between two different operations.
                Err(_) => self.next.run::<Q>(operation).await
            }
        } else {
            let mut leader = Leader {
                in_flight: &self.in_flight_operations,
                key,
                settled: false
            };
            let res = self.next.run::<Q>(operation).await;
            leader.settled = true;
            self.notify_listeners::<Q>(key, &res);
            res
        }
    }
}
