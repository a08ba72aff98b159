//! # lin_tools
//!
//! Rust utilities for parsing and modeling **LIN Description Files** (`.ldf`).
//!
//! ## Highlights
//! - **LDF parser**: load a LIN cluster description from `.ldf` into a [`LinDatabase`].
//! - **Lenient grammar**: malformed statements are dropped, never abort a load; problems surface as
//!   [`ValidationMessage`]s after the parse.
//! - **Validator**: `LinDatabase::validate()` checks header directives, node/signal/frame references,
//!   frame packing, node attributes, schedule tables and signal representations.
//! - **Consistent editing**: `add_*`, `update_*`, `delete_*` keep every name-based reference valid
//!   (renaming a node renames it in signals, frames and schedule commands).
//! - **LDF writer**: `ldf::save_to_file` / `ldf::to_ldf_string` render a database back to LDF text.
//!
//! ## Example
//! ```
//! use lin_tools::ldf;
//!
//! let mut db = ldf::from_str(
//!     "LIN_description_file;
//!      LIN_protocol_version = \"2.1\";
//!      LIN_language_version = \"2.1\";
//!      LIN_speed = 19.2 kbps;
//!      Nodes { Master: ECU, 10 ms, 0.1 ms; Slaves: Door; }",
//! );
//! assert_eq!(db.speed, 19200);
//! assert!(db.validate());
//! ```
//!

#[cfg(feature = "ldf")]
pub mod ldf;
#[doc(hidden)]
pub mod types;

// Top-level re-exports (appear under Crate Items → Structs)
#[doc(inline)]
pub use crate::types::{
    database::LinDatabase,
    encoding::{EncodingSignalGroup, EncodingValue, LinEncodingType},
    errors::{DatabaseError, LdfParseError, LdfSaveError},
    frame::{FrameSignal, LinFrame},
    node::{LinMasterNode, LinNode},
    node_attributes::{ConfigurableFrame, LinNodeAttributes, ProductId},
    schedule::{LinScheduleTable, ScheduleCommand, ScheduleEntry},
    signal::{LinSignal, SignalInitValue},
    validation::{Severity, ValidationCode, ValidationMessage},
    version::LinVersion,
};
