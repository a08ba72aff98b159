//! # types
//!
//! `types` is the module containing all the useful public structs of the crate

pub mod database;
pub mod encoding;
pub mod errors;
pub mod frame;
pub mod node;
pub mod node_attributes;
pub mod schedule;
pub mod signal;
pub mod validation;
pub mod version;

mod validate;
