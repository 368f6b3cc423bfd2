pub mod client_repo;
pub mod error;
