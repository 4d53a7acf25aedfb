//! Entity definitions for the HBnB domain.
//!
//! Each module holds one SeaORM entity whose `Model` doubles as the in-memory
//! object handed between storage backends and the service layer. [`record`]
//! wraps the six kinds in a closed enum used wherever code dispatches on type.

pub mod errors;
pub mod db;
pub mod timestamp;
pub mod record;
pub mod state;
pub mod city;
pub mod user;
pub mod place;
pub mod review;
pub mod amenity;
pub mod place_amenity;

pub use record::{EntityKind, ParentLink, Record};
