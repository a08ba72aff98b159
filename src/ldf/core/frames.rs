use log::warn;

use crate::ldf::core::tokens;
use crate::types::frame::{FrameSignal, LinFrame};

/// Decode a frame header (the text before the frame's `{`).
/// Example: `DoorFrame: 0x01, Door, 2`
pub(crate) fn decode_header(line: &str) -> Option<LinFrame> {
    let Some((name, rest)) = tokens::split_name(line) else {
        warn!("dropping frame '{line}'");
        return None;
    };
    let parts: Vec<&str> = rest.split(',').map(str::trim).collect();
    let (Some(id), Some(publisher), Some(size)) = (
        parts.first().and_then(|p| tokens::parse_u8(p)),
        parts.get(1).filter(|p| tokens::is_identifier(p)),
        parts.get(2).and_then(|p| tokens::parse_u8(p)),
    ) else {
        warn!("dropping frame '{name}': expected '<id>, <publisher>, <size>'");
        return None;
    };
    Some(LinFrame::new(name, id, publisher, size))
}

/// Decode a signal entry nested in a frame.
/// Example: `DoorStatus, 8`
pub(crate) fn decode_signal(line: &str) -> Option<FrameSignal> {
    let (name, offset) = line.split_once(',')?;
    let name: &str = name.trim();
    if !tokens::is_identifier(name) {
        return None;
    }
    let offset: u16 = tokens::parse_u16(offset)?;
    Some(FrameSignal::new(name, offset))
}
