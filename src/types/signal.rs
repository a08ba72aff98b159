use serde::{Deserialize, Serialize};
use std::fmt;

/// Definition of a signal carried by the cluster.
///
/// A signal has exactly one publisher and one or more subscribers, all of
/// them referenced **by name**. Its placement inside frames is described by
/// [`FrameSignal`](crate::FrameSignal) entries, not by the signal itself.
#[derive(Default, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct LinSignal {
    /// Signal name.
    pub name: String,
    /// Size in bits.
    pub bit_size: u16,
    /// Initial value (scalar or byte array).
    pub init_value: SignalInitValue,
    /// Publishing node name.
    pub publisher: String,
    /// Subscribing node names.
    pub subscribers: Vec<String>,
}

impl LinSignal {
    pub fn new(
        name: &str,
        bit_size: u16,
        init_value: SignalInitValue,
        publisher: &str,
        subscribers: &[&str],
    ) -> LinSignal {
        LinSignal {
            name: name.to_string(),
            bit_size,
            init_value,
            publisher: publisher.to_string(),
            subscribers: subscribers.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// `true` if the node publishes or subscribes this signal.
    pub fn uses_node(&self, node_name: &str) -> bool {
        self.publisher == node_name || self.subscribers.iter().any(|s| s == node_name)
    }

    /// Renames every reference to `old_name` (publisher and subscribers).
    pub fn update_node_name(&mut self, old_name: &str, new_name: &str) {
        if self.publisher == old_name {
            self.publisher = new_name.to_string();
        }
        for sub in self.subscribers.iter_mut().filter(|s| s.as_str() == old_name) {
            *sub = new_name.to_string();
        }
    }
}

/// Initial value of a signal: a scalar, or a byte array for byte-array signals.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum SignalInitValue {
    Scalar(u64),
    Array(Vec<u8>),
}

impl Default for SignalInitValue {
    fn default() -> Self {
        SignalInitValue::Scalar(0)
    }
}

impl fmt::Display for SignalInitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalInitValue::Scalar(v) => write!(f, "{v}"),
            SignalInitValue::Array(bytes) => {
                let items: Vec<String> = bytes.iter().map(|b| b.to_string()).collect();
                write!(f, "{{{}}}", items.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uses_and_rename_node() {
        let mut sig: LinSignal = LinSignal::new(
            "DoorStatus",
            8,
            SignalInitValue::Scalar(0),
            "Door",
            &["ECU", "Door"],
        );
        assert!(sig.uses_node("ECU"));
        assert!(sig.uses_node("Door"));
        assert!(!sig.uses_node("Seat"));

        sig.update_node_name("Door", "FrontDoor");
        assert_eq!(sig.publisher, "FrontDoor");
        assert_eq!(sig.subscribers, vec!["ECU", "FrontDoor"]);
    }

    #[test]
    fn test_init_value_display() {
        assert_eq!(SignalInitValue::Scalar(3).to_string(), "3");
        assert_eq!(SignalInitValue::Array(vec![0, 255]).to_string(), "{0, 255}");
    }
}
