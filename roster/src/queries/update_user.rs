pub struct UpdateUser;
pub mod update_user {
    #![allow(dead_code)]
    pub const OPERATION_NAME: &str = "UpdateUser";
    pub const QUERY: &str = "mutation UpdateUser($id: ID!, $name: String!) {\n    updateUser(id: $id, input: { name: $name }) {\n        id\n        name\n        email\n    }\n}";
    pub const KEY: u32 = 1170392856u32;
    pub const OPERATION_TYPE: crate::OperationType = crate::OperationType::Mutation;
    use serde::{Deserialize, Serialize};
    type ID = String;
    #[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
    pub struct UpdateUserUpdateUser {
        pub id: ID,
        pub name: Option<String>,
        pub email: Option<String>
    }
    #[derive(Clone, Debug, PartialEq, Serialize)]
    pub struct Variables {
        pub id: ID,
        pub name: String
    }
    #[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
    pub struct ResponseData {
        #[serde(rename = "updateUser")]
        pub update_user: Option<UpdateUserUpdateUser>
    }
}
impl crate::GraphQLQuery for UpdateUser {
    type Variables = update_user::Variables;
    type ResponseData = update_user::ResponseData;
    fn build_query(
        variables: Self::Variables
    ) -> (crate::QueryBody<Self::Variables>, crate::exchange::OperationMeta) {
        let meta = crate::exchange::OperationMeta {
            query_key: update_user::KEY,
            operation_type: update_user::OPERATION_TYPE
        };
        let body = crate::QueryBody {
            variables,
            query: update_user::QUERY,
            operation_name: update_user::OPERATION_NAME
        };
        (body, meta)
    }
}
impl From<update_user::UpdateUserUpdateUser> for crate::Record {
    fn from(user: update_user::UpdateUserUpdateUser) -> Self {
        crate::Record::new(
            user.id,
            user.name.unwrap_or_default(),
            user.email.unwrap_or_default()
        )
    }
}
