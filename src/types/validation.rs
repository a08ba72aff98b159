use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a validation finding. Every current check reports an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Severity {
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("ERROR"),
        }
    }
}

/// Which check produced a [`ValidationMessage`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationCode {
    NotLinDescriptionFile,
    ProtocolVersionMissing,
    LanguageVersionMissing,
    SpeedMissing,
    MasterMissing,
    SlavesMissing,
    NodeDuplicated,
    SignalPublisherUnknown,
    SignalSubscriberUnknown,
    SignalDuplicated,
    FramePublisherUnknown,
    FrameDuplicatedName,
    FrameDuplicatedId,
    FrameSignalUnknown,
    FrameSignalOutOfBounds,
    FrameSignalOverlap,
    NodeAttributesProtocolMissing,
    NodeAttributesNodeUnknown,
    NodeAttributesDuplicated,
    NodeAttributesSignalUnknown,
    ConfigurableFrameUnknown,
    ConfigurableFrameDuplicated,
    ScheduleTableDuplicated,
    ScheduleFrameUnknown,
    ScheduleSlaveUnknown,
    EncodingSignalGroupDuplicated,
    EncodingTypeUnknown,
    EncodingSignalUnknown,
}

/// A diagnostic produced by [`LinDatabase::validate`](crate::LinDatabase::validate).
///
/// `context` is the name of the entity the message is about (empty for
/// database-wide findings). Messages are never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub severity: Severity,
    pub code: ValidationCode,
    pub context: String,
    pub message: String,
}

impl ValidationMessage {
    pub fn error(code: ValidationCode, context: &str, message: String) -> ValidationMessage {
        ValidationMessage {
            severity: Severity::Error,
            code,
            context: context.to_string(),
            message,
        }
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}
