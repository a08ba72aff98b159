use log::warn;

use crate::ldf::core::tokens;
use crate::types::encoding::{EncodingSignalGroup, EncodingValue};

/// Decode a value line nested in an encoding type.
/// Examples:
/// - `logical_value, 0, "closed"`
/// - `physical_value, 0, 200, 0.5, -40, "degC"`
/// - `bcd_value` / `ascii_value`
pub(crate) fn decode_value(line: &str) -> Option<EncodingValue> {
    let parts: Vec<&str> = tokens::split_outside_quotes(line, ',');
    let text = |idx: usize| -> Option<String> {
        parts
            .get(idx)
            .filter(|t| !t.is_empty())
            .map(|t| tokens::unquote(t).to_string())
    };

    let decoded = || -> Option<EncodingValue> {
        match parts.first().copied() {
            Some("logical_value") => Some(EncodingValue::Logical {
                value: tokens::parse_u64(parts.get(1).copied().unwrap_or(""))?,
                text: text(2),
            }),
            Some("physical_value") => Some(EncodingValue::Physical {
                min: tokens::parse_u64(parts.get(1).copied().unwrap_or(""))?,
                max: tokens::parse_u64(parts.get(2).copied().unwrap_or(""))?,
                scale: tokens::parse_f64(parts.get(3).copied().unwrap_or(""))?,
                offset: tokens::parse_f64(parts.get(4).copied().unwrap_or(""))?,
                unit: text(5),
            }),
            Some("bcd_value") => Some(EncodingValue::Bcd),
            Some("ascii_value") => Some(EncodingValue::Ascii),
            _ => None,
        }
    };
    let value: Option<EncodingValue> = decoded();
    if value.is_none() {
        warn!("dropping encoding value '{line}'");
    }
    value
}

/// Decode a `Signal_representation` entry.
/// Example: `DoorEncoding: DoorStatus, WindowStatus`
pub(crate) fn decode_representation(line: &str) -> Option<EncodingSignalGroup> {
    let Some((name, rest)) = tokens::split_name(line) else {
        warn!("dropping signal representation '{line}'");
        return None;
    };
    Some(EncodingSignalGroup {
        name: name.to_string(),
        signals: tokens::identifier_list(rest),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_values() {
        assert_eq!(
            decode_value("logical_value, 1, \"open, unlocked\""),
            Some(EncodingValue::Logical {
                value: 1,
                text: Some("open, unlocked".to_string())
            })
        );
        assert_eq!(
            decode_value("logical_value, 0x02"),
            Some(EncodingValue::Logical {
                value: 2,
                text: None
            })
        );
        assert_eq!(
            decode_value("physical_value, 0, 200, 0.5, -40, \"degC\""),
            Some(EncodingValue::Physical {
                min: 0,
                max: 200,
                scale: 0.5,
                offset: -40.0,
                unit: Some("degC".to_string())
            })
        );
        assert_eq!(decode_value("bcd_value"), Some(EncodingValue::Bcd));
        assert_eq!(decode_value("ascii_value"), Some(EncodingValue::Ascii));
        assert!(decode_value("physical_value, 0, 200").is_none());
        assert!(decode_value("unknown_value, 1").is_none());
    }

    #[test]
    fn test_decode_representation() {
        let group: EncodingSignalGroup =
            decode_representation("DoorEncoding: DoorStatus, WindowStatus").unwrap();
        assert_eq!(group.name, "DoorEncoding");
        assert_eq!(group.signals, vec!["DoorStatus", "WindowStatus"]);
        assert!(decode_representation("no colon here").is_none());
    }
}
