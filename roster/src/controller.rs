//! Reconciliation of remote operation outcomes into the local mirror.
//!
//! The [Controller](./struct.Controller.html) owns a [MirrorStore](../store/struct.MirrorStore.html)
//! and is the only thing that mutates it. Requests are issued without waiting for each other:
//! each one applies its own mutation when it resolves, in resolution order.
//!
//! Two requests for the same id are not serialized either. Whichever update resolves last
//! decides the stored name.
//!
//! Every request remembers the session it was issued in. [teardown](./struct.Controller.html#method.teardown)
//! starts a new session, so results arriving for the old one are dropped instead of being
//! written into a store that has been discarded.

use crate::{MirrorError, MirrorStore, Record, RecordId, RemoteDataSource, SourceError, UserPatch};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Asks the user for a new name. `None` cancels the update.
#[async_trait]
pub trait NamePrompt: Send + Sync {
    async fn prompt_for_name(&self) -> Option<String>;
}

#[async_trait]
impl<F> NamePrompt for F
where
    F: Fn() -> Option<String> + Send + Sync
{
    async fn prompt_for_name(&self) -> Option<String> {
        self()
    }
}

/// Asks the user to confirm a delete.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self) -> bool;
}

#[async_trait]
impl<F> Confirm for F
where
    F: Fn() -> bool + Send + Sync
{
    async fn confirm(&self) -> bool {
        self()
    }
}

/// What became of a request that did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing was sent: the user cancelled, or the id was not in the store.
    Skipped,
    /// The server confirmed and the store was updated.
    Applied,
    /// The server confirmed, but the record was gone or the controller was torn down.
    Discarded
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Loading,
    Loaded,
    Failed(MirrorError)
}

/// A read-only snapshot for rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct View {
    pub records: Vec<Record>,
    pub fetch: FetchState,
    /// Whether any update is in flight.
    pub updating: bool,
    /// Whether any delete is in flight.
    pub deleting: bool,
    /// Failure of the most recent update, cleared when the next update is issued.
    pub update_error: Option<MirrorError>,
    /// Failure of the most recent delete, cleared when the next delete is issued.
    pub delete_error: Option<MirrorError>
}

impl View {
    /// The loading indicator is only worth showing while there is nothing else to show.
    pub fn show_loading(&self) -> bool {
        self.fetch == FetchState::Loading && self.records.is_empty()
    }

    pub fn fetch_error(&self) -> Option<&MirrorError> {
        match self.fetch {
            FetchState::Failed(ref error) => Some(error),
            _ => None
        }
    }
}

#[derive(Clone, Copy)]
enum Mutation {
    Update,
    Delete
}

struct State {
    session: u64,
    store: MirrorStore,
    fetch: FetchState,
    pending_updates: usize,
    pending_deletes: usize,
    update_error: Option<MirrorError>,
    delete_error: Option<MirrorError>
}

impl State {
    fn new(session: u64) -> Self {
        State {
            session,
            store: MirrorStore::new(),
            fetch: FetchState::Idle,
            pending_updates: 0,
            pending_deletes: 0,
            update_error: None,
            delete_error: None
        }
    }

    fn begin(&mut self, mutation: Mutation) -> u64 {
        match mutation {
            Mutation::Update => {
                self.pending_updates += 1;
                self.update_error = None;
            }
            Mutation::Delete => {
                self.pending_deletes += 1;
                self.delete_error = None;
            }
        }
        self.session
    }

    fn finish(&mut self, mutation: Mutation, error: Option<MirrorError>) {
        match mutation {
            Mutation::Update => {
                self.pending_updates = self.pending_updates.saturating_sub(1);
                if error.is_some() {
                    self.update_error = error;
                }
            }
            Mutation::Delete => {
                self.pending_deletes = self.pending_deletes.saturating_sub(1);
                if error.is_some() {
                    self.delete_error = error;
                }
            }
        }
    }
}

/// One issued request, counted in the busy flag of its kind until it settles.
///
/// Dropping an unsettled guard, because the request future was cancelled, still
/// releases the count so the flag cannot stay set.
struct Pending<'a> {
    state: &'a Mutex<State>,
    mutation: Mutation,
    session: u64,
    settled: bool
}

impl<'a> Pending<'a> {
    fn begin(state: &'a Mutex<State>, mutation: Mutation) -> Self {
        let session = state.lock().begin(mutation);
        Pending {
            state,
            mutation,
            session,
            settled: false
        }
    }

    /// Settle against the already locked `state`. Returns whether the request still belongs
    /// to the current session.
    fn settle(mut self, state: &mut State, error: Option<MirrorError>) -> bool {
        self.settled = true;
        let current = state.session == self.session;
        if current {
            state.finish(self.mutation, error);
        }
        current
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        if !self.settled {
            let mut state = self.state.lock();
            if state.session == self.session {
                debug!("request dropped before it resolved");
                state.finish(self.mutation, None);
            }
        }
    }
}

pub struct ControllerImpl<S: RemoteDataSource> {
    source: S,
    state: Mutex<State>
}

/// Mirrors a [RemoteDataSource](../source/trait.RemoteDataSource.html) into local state.
/// Cheap to clone; clones share the same store.
#[repr(transparent)]
pub struct Controller<S: RemoteDataSource>(Arc<ControllerImpl<S>>);

impl<S: RemoteDataSource> Clone for Controller<S> {
    fn clone(&self) -> Self {
        Controller(self.0.clone())
    }
}

impl<S: RemoteDataSource> Controller<S> {
    pub fn new(source: S) -> Self {
        Controller(Arc::new(ControllerImpl {
            source,
            state: Mutex::new(State::new(0))
        }))
    }

    pub fn source(&self) -> &S {
        &self.0.source
    }

    pub fn snapshot(&self) -> View {
        let state = self.0.state.lock();
        View {
            records: state.store.records().to_vec(),
            fetch: state.fetch.clone(),
            updating: state.pending_updates > 0,
            deleting: state.pending_deletes > 0,
            update_error: state.update_error.clone(),
            delete_error: state.delete_error.clone()
        }
    }

    /// Fetch the list and mirror it. Returns the number of records now held.
    #[instrument(skip_all)]
    pub async fn load(&self) -> Result<usize, MirrorError> {
        let session = {
            let mut state = self.0.state.lock();
            state.fetch = FetchState::Loading;
            state.session
        };
        debug!("fetching user list");
        let result = self.0.source.fetch_list().await;
        self.settle_fetch(session, result)
    }

    /// Mirror the outcome of a list fetch. A successful fetch replaces the whole store;
    /// a failed one leaves it as it was and is surfaced through [View::fetch](./struct.View.html#structfield.fetch).
    pub fn on_fetch_settled(
        &self,
        result: Result<Vec<Record>, SourceError>
    ) -> Result<usize, MirrorError> {
        let session = self.0.state.lock().session;
        self.settle_fetch(session, result)
    }

    fn settle_fetch(
        &self,
        session: u64,
        result: Result<Vec<Record>, SourceError>
    ) -> Result<usize, MirrorError> {
        let mut state = self.0.state.lock();
        if state.session != session {
            warn!("discarding user list fetched before teardown");
            return match result {
                Ok(records) => Ok(records.len()),
                Err(e) => Err(MirrorError::FetchFailed {
                    reason: e.to_string()
                })
            };
        }

        match result {
            Ok(records) => {
                let count = state.store.replace_all(records);
                state.fetch = FetchState::Loaded;
                info!(count, "user list mirrored");
                Ok(count)
            }
            Err(e) => {
                let error = MirrorError::FetchFailed {
                    reason: e.to_string()
                };
                warn!(%error, "fetching user list failed");
                state.fetch = FetchState::Failed(error.clone());
                Err(error)
            }
        }
    }

    /// Rename the record with `id` to whatever `prompt` yields.
    ///
    /// A cancelled prompt, or a blank name, skips the request entirely. On success the store
    /// takes the name the prompt produced; whatever name the server echoes back is ignored.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn request_update<P: NamePrompt>(
        &self,
        id: &RecordId,
        prompt: P
    ) -> Result<Outcome, MirrorError> {
        if !self.contains(id) {
            debug!("record is not mirrored; not prompting");
            return Ok(Outcome::Skipped);
        }

        let name = match prompt.prompt_for_name().await {
            Some(name) if !name.trim().is_empty() => name,
            _ => {
                debug!("update cancelled");
                return Ok(Outcome::Skipped);
            }
        };

        let pending = Pending::begin(&self.0.state, Mutation::Update);
        debug!(%name, "issuing update");
        let patch = UserPatch { name: name.clone() };
        let result = self.0.source.apply_update(id, patch).await;

        let mut state = self.0.state.lock();
        match result {
            Ok(echoed) => {
                let current = pending.settle(&mut state, None);
                match echoed {
                    Some(echoed) if echoed.name != name => {
                        debug!(echoed = %echoed.name, "server echoed a different name; keeping the requested one")
                    }
                    None => debug!("server echoed nothing; keeping the requested name"),
                    _ => {}
                }
                if current && state.store.rename_by_id(id, name) {
                    info!("update applied");
                    Ok(Outcome::Applied)
                } else {
                    debug!("update confirmed for a record that is no longer mirrored");
                    Ok(Outcome::Discarded)
                }
            }
            Err(e) => {
                let error = MirrorError::UpdateFailed {
                    id: id.clone(),
                    reason: e.to_string()
                };
                warn!(%error, "update failed");
                pending.settle(&mut state, Some(error.clone()));
                Err(error)
            }
        }
    }

    /// Delete the record with `id` once `confirm` agrees.
    ///
    /// Any successful resolution removes the record. The boolean the server returns is not
    /// looked at.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn request_delete<C: Confirm>(
        &self,
        id: &RecordId,
        confirm: C
    ) -> Result<Outcome, MirrorError> {
        if !self.contains(id) {
            debug!("record is not mirrored; not asking for confirmation");
            return Ok(Outcome::Skipped);
        }

        if !confirm.confirm().await {
            debug!("delete declined");
            return Ok(Outcome::Skipped);
        }

        let pending = Pending::begin(&self.0.state, Mutation::Delete);
        debug!("issuing delete");
        let result = self.0.source.apply_delete(id).await;

        let mut state = self.0.state.lock();
        match result {
            Ok(_) => {
                let current = pending.settle(&mut state, None);
                if current && state.store.remove_by_id(id) {
                    info!("delete applied");
                    Ok(Outcome::Applied)
                } else {
                    debug!("delete confirmed for a record that is no longer mirrored");
                    Ok(Outcome::Discarded)
                }
            }
            Err(e) => {
                let error = MirrorError::DeleteFailed {
                    id: id.clone(),
                    reason: e.to_string()
                };
                warn!(%error, "delete failed");
                pending.settle(&mut state, Some(error.clone()));
                Err(error)
            }
        }
    }

    /// Discard the store and all flags. Requests still in flight will resolve without effect.
    /// The controller can be loaded again afterwards.
    pub fn teardown(&self) {
        let mut state = self.0.state.lock();
        let session = state.session.wrapping_add(1);
        *state = State::new(session);
        debug!(session, "controller torn down");
    }

    fn contains(&self, id: &RecordId) -> bool {
        self.0.state.lock().store.contains(id)
    }
}
