//! Where the records come from.

use crate::{
    queries::{
        delete_user::{delete_user, DeleteUser},
        get_users::{get_users, GetUsers},
        update_user::{update_user, UpdateUser}
    },
    Client, Exchange, Record, RecordId, Response, SourceError, UserPatch
};

/// The public GraphQLZero endpoint the demo talks to.
pub const DEFAULT_ENDPOINT: &str = "https://graphqlzero.almansi.me/api";

/// The remote capability the controller mirrors. Every call is independent and may fail.
#[async_trait]
pub trait RemoteDataSource: Send + Sync + 'static {
    /// Fetch the (single, fixed) page of records.
    async fn fetch_list(&self) -> Result<Vec<Record>, SourceError>;

    /// Apply `patch` to the record with `id`. Returns the record as echoed by the server,
    /// if it echoed one.
    async fn apply_update(&self, id: &RecordId, patch: UserPatch) -> Result<Option<Record>, SourceError>;

    /// Delete the record with `id`. Returns the server's boolean payload, `false` when absent.
    async fn apply_delete(&self, id: &RecordId) -> Result<bool, SourceError>;
}

/// Pagination of the list fetch. Opaque to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceConfig {
    pub page: i64,
    pub limit: i64
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig { page: 1, limit: 5 }
    }
}

/// [RemoteDataSource](./trait.RemoteDataSource.html) backed by a GraphQL [Client](../client/struct.Client.html).
pub struct GraphQLSource<M: Exchange> {
    client: Client<M>,
    config: SourceConfig
}

impl<M: Exchange> GraphQLSource<M> {
    pub fn new(client: Client<M>) -> Self {
        GraphQLSource {
            client,
            config: SourceConfig::default()
        }
    }

    pub fn with_config(mut self, config: SourceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> SourceConfig {
        self.config
    }
}

/// Turn a GraphQL response into its data, treating a non-empty `errors` array as failure.
///
/// A response without errors counts as success even when `data` is null; only the list
/// fetch needs the payload.
fn into_data<T: Clone>(response: Response<T>) -> Result<Option<T>, SourceError> {
    if response.has_errors() {
        return Err(SourceError::Server(response.errors.unwrap_or_default()));
    }
    Ok(response.data)
}

#[async_trait]
impl<M: Exchange> RemoteDataSource for GraphQLSource<M> {
    async fn fetch_list(&self) -> Result<Vec<Record>, SourceError> {
        let variables = get_users::Variables {
            page: self.config.page,
            limit: self.config.limit
        };
        let data = into_data(self.client.query(GetUsers, variables).await?)?
            .ok_or(SourceError::MissingData("data"))?;
        let users = data
            .users
            .and_then(|users| users.data)
            .ok_or(SourceError::MissingData("users.data"))?;

        Ok(users.into_iter().map(Record::from).collect())
    }

    async fn apply_update(&self, id: &RecordId, patch: UserPatch) -> Result<Option<Record>, SourceError> {
        let variables = update_user::Variables {
            id: id.to_string(),
            name: patch.name
        };
        let data = into_data(self.client.query(UpdateUser, variables).await?)?;

        Ok(data.and_then(|data| data.update_user).map(Record::from))
    }

    async fn apply_delete(&self, id: &RecordId) -> Result<bool, SourceError> {
        let variables = delete_user::Variables { id: id.to_string() };
        let data = into_data(self.client.query(DeleteUser, variables).await?)?;

        Ok(data.and_then(|data| data.delete_user).unwrap_or(false))
    }
}
