use crate::ldf::core::tokens;
use crate::types::node_attributes::ConfigurableFrame;

/// Decode an entry of a `configurable_frames` block.
/// Examples: `DoorFrame = 0x12` (LIN 2.0) and `DoorFrame` (LIN 2.1)
pub(crate) fn decode(line: &str) -> Option<ConfigurableFrame> {
    let (name, id) = match line.split_once('=') {
        Some((name, id)) => (name.trim(), Some(tokens::parse_u8(id)?)),
        None => (line.trim(), None),
    };
    if !tokens::is_identifier(name) {
        return None;
    }
    Some(ConfigurableFrame::new(name, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode() {
        assert_eq!(
            decode("DoorFrame = 0x12"),
            Some(ConfigurableFrame::new("DoorFrame", Some(0x12)))
        );
        assert_eq!(
            decode("DoorFrame"),
            Some(ConfigurableFrame::new("DoorFrame", None))
        );
        assert!(decode("DoorFrame = none").is_none());
        assert!(decode("").is_none());
    }
}
