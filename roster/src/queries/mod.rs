//! The operations sent to the GraphQLZero API, one module per document.
//! Each module follows the same layout: a zero-sized marker struct implementing
//! [GraphQLQuery](../trait.GraphQLQuery.html) and a submodule holding the document,
//! `Variables` and `ResponseData`.

pub mod delete_user;
pub mod get_users;
pub mod update_user;

pub use delete_user::DeleteUser;
pub use get_users::GetUsers;
pub use update_user::UpdateUser;
