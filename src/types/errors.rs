use std::io;
use thiserror::Error;

/// Errors produced while loading a `.ldf` file.
#[derive(Debug, Error)]
pub enum LdfParseError {
    #[error("Not a valid .ldf file: {path}")]
    InvalidExtension { path: String },
    #[error("Failed to open '{path}'. \nError: {source}")]
    OpenFile {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed while reading '{path}'. \nError: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Errors produced while saving a LinDatabase into a `.ldf` file.
#[derive(Debug, Error)]
pub enum LdfSaveError {
    #[error("Output path must end in .ldf: {path}")]
    InvalidExtension { path: String },
    #[error("Failed to create '{path}'. \nError: {source}")]
    CreateFile {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to create directories for '{path}'. \nError: {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed while writing '{path}'. \nError: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Errors returned by add/update/delete operations on [`LinDatabase`](crate::LinDatabase).
///
/// A failing operation never modifies the database.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatabaseError {
    #[error("Master node not defined")]
    MasterMissing,
    #[error("Node '{name}' not found")]
    NodeNotFound { name: String },
    #[error("Node '{name}' already exists")]
    NodeAlreadyExists { name: String },
    #[error("Signal '{name}' not found")]
    SignalNotFound { name: String },
    #[error("Signal '{name}' already exists")]
    SignalAlreadyExists { name: String },
    #[error("Frame '{name}' not found")]
    FrameNotFound { name: String },
    #[error("Frame '{name}' already exists")]
    FrameAlreadyExists { name: String },
    #[error("Frame ID {id} already assigned to frame '{name}'")]
    FrameIdAlreadyAssigned { id: u8, name: String },
    #[error("Node_attributes for '{name}' not found")]
    NodeAttributesNotFound { name: String },
    #[error("Node_attributes for '{name}' already exist")]
    NodeAttributesAlreadyExist { name: String },
    #[error("Schedule table '{name}' not found")]
    ScheduleTableNotFound { name: String },
    #[error("Schedule table '{name}' already exists")]
    ScheduleTableAlreadyExists { name: String },
    #[error("Encoding type '{name}' not found")]
    EncodingTypeNotFound { name: String },
    #[error("Encoding type '{name}' already exists")]
    EncodingTypeAlreadyExists { name: String },
    #[error("Signal representation '{name}' not found")]
    EncodingSignalGroupNotFound { name: String },
    #[error("Signal representation '{name}' already exists")]
    EncodingSignalGroupAlreadyExists { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = DatabaseError::FrameIdAlreadyAssigned {
            id: 3,
            name: "DoorFrame".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Frame ID 3 already assigned to frame 'DoorFrame'"
        );

        let err = LdfParseError::InvalidExtension {
            path: "net.dbc".to_string(),
        };
        assert_eq!(err.to_string(), "Not a valid .ldf file: net.dbc");
    }
}
