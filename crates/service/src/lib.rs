//! Service layer implementing the HBnB resource contract on top of `models`.
//! - `storage`: the persistence collaborator (`Storage` trait, file and database backends).
//! - `resource` + `controller`: the generic CRUD contract shared by all six entity kinds.
//! - `search`: the places search.
//! - `place_amenities`, `stats`: the remaining cross-entity operations.

pub mod errors;
pub mod payload;
pub mod password;
pub mod storage;
pub mod resource;
pub mod controller;
pub mod search;
pub mod place_amenities;
pub mod stats;
#[cfg(test)]
pub mod test_support;

pub use controller::ResourceService;
pub use errors::ServiceError;
pub use storage::Storage;
