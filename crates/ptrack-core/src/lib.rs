//! PTrack Core Library
//!
//! Entity store, authorization rules and user directory for the project
//! tracker. Every operation here returns a structured result and leaves
//! logging to its caller.

pub mod authz;
pub mod error;
pub mod project;
pub mod task;
pub mod user;
mod validation;

pub use error::{ErrorKind, TrackerError, TrackerResult};
pub use user::model::Identity;
