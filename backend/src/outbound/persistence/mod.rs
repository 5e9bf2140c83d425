//! Diesel-backed persistence adapters for the domain's driven ports.

mod diesel_credential_repository;
mod diesel_post_repository;
mod diesel_user_repository;
mod models;
mod pool;
pub mod schema;

pub use diesel_credential_repository::DieselCredentialRepository;
pub use diesel_post_repository::DieselPostRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
