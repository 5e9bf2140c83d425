//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts;
mod credential_repository;
mod post_repository;
mod posts;
mod profile;
mod user_repository;

pub use accounts::{AccountService, InMemoryAccounts};
pub use credential_repository::{CredentialPersistenceError, CredentialRepository};
pub use post_repository::{PostListPosition, PostPersistenceError, PostRepository};
pub use posts::{InMemoryPosts, PostListRequest, PostsCommand, PostsQuery};
pub use profile::UserProfileQuery;
pub use user_repository::{UserPersistenceError, UserRepository};
