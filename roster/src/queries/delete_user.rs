pub struct DeleteUser;
pub mod delete_user {
    #![allow(dead_code)]
    pub const OPERATION_NAME: &str = "DeleteUser";
    pub const QUERY: &str = "mutation DeleteUser($id: ID!) {\n    deleteUser(id: $id)\n}";
    pub const KEY: u32 = 2264871093u32;
    pub const OPERATION_TYPE: crate::OperationType = crate::OperationType::Mutation;
    use serde::{Deserialize, Serialize};
    type Boolean = bool;
    type ID = String;
    #[derive(Clone, Debug, PartialEq, Serialize)]
    pub struct Variables {
        pub id: ID
    }
    #[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
    pub struct ResponseData {
        #[serde(rename = "deleteUser")]
        pub delete_user: Option<Boolean>
    }
}
impl crate::GraphQLQuery for DeleteUser {
    type Variables = delete_user::Variables;
    type ResponseData = delete_user::ResponseData;
    fn build_query(
        variables: Self::Variables
    ) -> (crate::QueryBody<Self::Variables>, crate::exchange::OperationMeta) {
        let meta = crate::exchange::OperationMeta {
            query_key: delete_user::KEY,
            operation_type: delete_user::OPERATION_TYPE
        };
        let body = crate::QueryBody {
            variables,
            query: delete_user::QUERY,
            operation_name: delete_user::OPERATION_NAME
        };
        (body, meta)
    }
}
