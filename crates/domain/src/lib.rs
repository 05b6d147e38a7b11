//! Domain layer for the StoryReel client
//!
//! Wire models exchanged with the StoryReel backend, request payloads with
//! their client-side validation rules, and domain errors.
//! This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod requests;
pub mod timestamp;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use requests::*;
pub use value_objects::*;
