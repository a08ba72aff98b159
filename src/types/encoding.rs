use serde::{Deserialize, Serialize};

/// Named value-to-meaning mapping (`Signal_encoding_types` section).
///
/// Used for presentation only; nothing in the database decodes with it.
#[derive(Default, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct LinEncodingType {
    pub name: String,
    pub values: Vec<EncodingValue>,
}

/// One line inside an encoding type.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum EncodingValue {
    /// `logical_value, <value> [, "<text>"];`
    Logical { value: u64, text: Option<String> },
    /// `physical_value, <min>, <max>, <scale>, <offset> [, "<unit>"];`
    Physical {
        min: u64,
        max: u64,
        scale: f64,
        offset: f64,
        unit: Option<String>,
    },
    /// `bcd_value;`
    Bcd,
    /// `ascii_value;`
    Ascii,
}

/// Signals that share one encoding (`Signal_representation` section).
#[derive(Default, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct EncodingSignalGroup {
    /// Encoding type name.
    pub name: String,
    /// Signal names using it.
    pub signals: Vec<String>,
}

impl LinEncodingType {
    pub fn new(name: &str) -> LinEncodingType {
        LinEncodingType {
            name: name.to_string(),
            values: Vec::new(),
        }
    }

    pub fn add_value(&mut self, value: EncodingValue) {
        self.values.push(value);
    }

    /// Text associated to a raw logical value, if any.
    pub fn logical_text(&self, raw: u64) -> Option<&str> {
        self.values.iter().find_map(|v| match v {
            EncodingValue::Logical {
                value,
                text: Some(text),
            } if *value == raw => Some(text.as_str()),
            _ => None,
        })
    }
}

impl EncodingSignalGroup {
    pub fn new(name: &str, signals: &[&str]) -> EncodingSignalGroup {
        EncodingSignalGroup {
            name: name.to_string(),
            signals: signals.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn update_signal_name(&mut self, old_name: &str, new_name: &str) {
        for s in self.signals.iter_mut().filter(|s| s.as_str() == old_name) {
            *s = new_name.to_string();
        }
    }

    pub fn delete_signal_by_name(&mut self, name: &str) {
        self.signals.retain(|s| s != name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_text() {
        let mut enc: LinEncodingType = LinEncodingType::new("DoorEncoding");
        enc.add_value(EncodingValue::Logical {
            value: 0,
            text: Some("closed".to_string()),
        });
        enc.add_value(EncodingValue::Logical {
            value: 1,
            text: None,
        });
        assert_eq!(enc.logical_text(0), Some("closed"));
        assert_eq!(enc.logical_text(1), None);
        assert_eq!(enc.logical_text(2), None);
    }

    #[test]
    fn test_group_signals() {
        let mut group: EncodingSignalGroup = EncodingSignalGroup::new("Enc", &["A", "B"]);
        group.update_signal_name("A", "C");
        group.delete_signal_by_name("B");
        assert_eq!(group.signals, vec!["C"]);
    }
}
