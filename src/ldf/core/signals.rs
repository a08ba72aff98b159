use log::warn;

use crate::ldf::core::tokens;
use crate::types::signal::{LinSignal, SignalInitValue};

/// Decode a signal declaration.
/// Examples:
/// - `DoorStatus: 8, 0, Door, ECU, Seat`
/// - `DoorData: 16, { 0, 0 }, Door, ECU` (byte-array initial value)
///
/// Returns `None` when the size, publisher or subscribers are missing.
pub(crate) fn decode(line: &str) -> Option<LinSignal> {
    let Some((name, rest)) = tokens::split_name(line) else {
        warn!("dropping signal '{line}'");
        return None;
    };

    let (bit_size, init_value, nodes): (&str, SignalInitValue, Vec<String>) =
        match (rest.find('{'), rest.find('}')) {
            (Some(open), Some(close)) if open < close => {
                // `<size>, { b0, b1 }, <publisher>, <subscribers>`
                let size: &str = rest[..open].trim().trim_end_matches(',').trim();
                let bytes: Option<Vec<u8>> = rest[open + 1..close]
                    .split(',')
                    .map(str::trim)
                    .filter(|b| !b.is_empty())
                    .map(tokens::parse_u8)
                    .collect();
                let Some(bytes) = bytes else {
                    warn!("dropping signal '{name}': unreadable initial value");
                    return None;
                };
                (size, SignalInitValue::Array(bytes), tokens::identifier_list(&rest[close + 1..]))
            }
            _ => {
                let mut parts = rest.splitn(3, ',');
                let size: &str = parts.next().unwrap_or("").trim();
                let Some(init) = parts.next().and_then(tokens::parse_u64) else {
                    warn!("dropping signal '{name}': unreadable initial value");
                    return None;
                };
                (
                    size,
                    SignalInitValue::Scalar(init),
                    tokens::identifier_list(parts.next().unwrap_or("")),
                )
            }
        };

    let Some(bit_size) = tokens::parse_u16(bit_size) else {
        warn!("dropping signal '{name}': unreadable size '{bit_size}'");
        return None;
    };
    let Some((publisher, subscribers)) = nodes.split_first() else {
        warn!("dropping signal '{name}': no publisher");
        return None;
    };
    if subscribers.is_empty() {
        warn!("dropping signal '{name}': no subscriber");
        return None;
    }

    Some(LinSignal {
        name: name.to_string(),
        bit_size,
        init_value,
        publisher: publisher.clone(),
        subscribers: subscribers.to_vec(),
    })
}
