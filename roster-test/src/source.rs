use crate::Counter;
use futures::channel::oneshot;
use parking_lot::Mutex;
use roster::{Error, Record, RecordId, RemoteDataSource, SourceError, UserPatch};
use std::collections::{HashMap, HashSet, VecDeque};

/// Holds back the next call for one id until it is opened or dropped.
pub struct Gate(oneshot::Sender<()>);

impl Gate {
    pub fn open(self) {
        let _ = self.0.send(());
    }
}

/// Calls made against a [FakeSource](./struct.FakeSource.html).
#[derive(Debug, Default)]
pub struct Calls {
    pub fetches: Counter,
    pub updates: Counter,
    pub deletes: Counter
}

/// A [RemoteDataSource] that answers from memory.
///
/// Failures are scripted per id, and [gate](#method.gate) lets a test decide the order in which
/// concurrent calls resolve. The server echo of an update is configurable so tests can tell it
/// apart from the name that was asked for.
pub struct FakeSource {
    list: Mutex<Result<Vec<Record>, String>>,
    failing: Mutex<HashSet<RecordId>>,
    gates: Mutex<HashMap<RecordId, VecDeque<oneshot::Receiver<()>>>>,
    echo_name: Option<String>,
    delete_payload: bool,
    calls: Calls
}

impl FakeSource {
    pub fn new(list: Vec<Record>) -> Self {
        FakeSource {
            list: Mutex::new(Ok(list)),
            failing: Mutex::new(HashSet::new()),
            gates: Mutex::new(HashMap::new()),
            echo_name: None,
            delete_payload: true,
            calls: Calls::default()
        }
    }

    /// A source whose list fetch fails with `message`.
    pub fn failing_fetch<M: Into<String>>(message: M) -> Self {
        let source = Self::new(Vec::new());
        *source.list.lock() = Err(message.into());
        source
    }

    /// Echo `name` from every update instead of the requested one.
    pub fn with_echo_name<N: Into<String>>(mut self, name: N) -> Self {
        self.echo_name = Some(name.into());
        self
    }

    /// The boolean every delete answers with.
    pub fn with_delete_payload(mut self, payload: bool) -> Self {
        self.delete_payload = payload;
        self
    }

    pub fn set_list(&self, list: Vec<Record>) {
        *self.list.lock() = Ok(list);
    }

    /// Make every following update and delete for `id` fail.
    pub fn fail(&self, id: &RecordId) {
        self.failing.lock().insert(id.clone());
    }

    /// Hold back the next update or delete for `id`. Gates for the same id queue up in call order.
    pub fn gate(&self, id: &RecordId) -> Gate {
        let (sender, receiver) = oneshot::channel();
        self.gates
            .lock()
            .entry(id.clone())
            .or_default()
            .push_back(receiver);
        Gate(sender)
    }

    pub fn calls(&self) -> &Calls {
        &self.calls
    }

    async fn pass_gate(&self, id: &RecordId) {
        let gate = self.gates.lock().get_mut(id).and_then(VecDeque::pop_front);
        if let Some(gate) = gate {
            // A dropped gate releases the call as well.
            let _ = gate.await;
        }
    }

    fn check(&self, id: &RecordId) -> Result<(), SourceError> {
        if self.failing.lock().contains(id) {
            Err(SourceError::Server(vec![Error::new(format!(
                "user {} cannot be changed",
                id
            ))]))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl RemoteDataSource for FakeSource {
    async fn fetch_list(&self) -> Result<Vec<Record>, SourceError> {
        self.calls.fetches.inc();
        let list = self.list.lock().clone();
        list.map_err(|message| SourceError::Server(vec![Error::new(message)]))
    }

    async fn apply_update(&self, id: &RecordId, patch: UserPatch) -> Result<Option<Record>, SourceError> {
        self.calls.updates.inc();
        self.pass_gate(id).await;
        self.check(id)?;

        let name = self.echo_name.clone().unwrap_or(patch.name);
        Ok(Some(Record::new(id.clone(), name, format!("{}@fake", id))))
    }

    async fn apply_delete(&self, id: &RecordId) -> Result<bool, SourceError> {
        self.calls.deletes.inc();
        self.pass_gate(id).await;
        self.check(id)?;

        Ok(self.delete_payload)
    }
}
