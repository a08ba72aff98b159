//! Per-statement decoders of the LDF grammar, one module per entity kind.

pub(crate) mod configurable_frames;
pub(crate) mod encoding;
pub(crate) mod frames;
pub(crate) mod header;
pub(crate) mod node_attributes;
pub(crate) mod nodes;
pub(crate) mod schedule_tables;
pub(crate) mod signals;
pub(crate) mod tokens;
