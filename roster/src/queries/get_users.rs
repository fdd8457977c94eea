pub struct GetUsers;
pub mod get_users {
    #![allow(dead_code)]
    pub const OPERATION_NAME: &str = "GetUsers";
    pub const QUERY: &str = "query GetUsers($page: Int!, $limit: Int!) {\n    users(options: { paginate: { page: $page, limit: $limit } }) {\n        data {\n            id\n            name\n            email\n        }\n    }\n}";
    pub const KEY: u32 = 3902458721u32;
    pub const OPERATION_TYPE: crate::OperationType = crate::OperationType::Query;
    use serde::{Deserialize, Serialize};
    type Int = i64;
    type ID = String;
    #[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
    pub struct GetUsersUsersData {
        pub id: ID,
        pub name: Option<String>,
        pub email: Option<String>
    }
    #[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
    pub struct GetUsersUsers {
        pub data: Option<Vec<GetUsersUsersData>>
    }
    #[derive(Clone, Debug, PartialEq, Serialize)]
    pub struct Variables {
        pub page: Int,
        pub limit: Int
    }
    #[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
    pub struct ResponseData {
        pub users: Option<GetUsersUsers>
    }
}
impl crate::GraphQLQuery for GetUsers {
    type Variables = get_users::Variables;
    type ResponseData = get_users::ResponseData;
    fn build_query(
        variables: Self::Variables
    ) -> (crate::QueryBody<Self::Variables>, crate::exchange::OperationMeta) {
        let meta = crate::exchange::OperationMeta {
            query_key: get_users::KEY,
            operation_type: get_users::OPERATION_TYPE
        };
        let body = crate::QueryBody {
            variables,
            query: get_users::QUERY,
            operation_name: get_users::OPERATION_NAME
        };
        (body, meta)
    }
}
impl From<get_users::GetUsersUsersData> for crate::Record {
    fn from(user: get_users::GetUsersUsersData) -> Self {
        crate::Record::new(
            user.id,
            user.name.unwrap_or_default(),
            user.email.unwrap_or_default()
        )
    }
}
