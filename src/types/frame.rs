use serde::{Deserialize, Serialize};

/// Unconditional LIN frame defined in the `Frames` section.
///
/// Holds the frame id, the publishing node (by name), the payload size in
/// bytes and the ordered list of signals packed into it.
#[derive(Default, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct LinFrame {
    /// Frame name.
    pub name: String,
    /// Frame identifier (0..=63 on a real bus).
    pub id: u8,
    /// Publishing node name.
    pub publisher: String,
    /// Payload size in bytes.
    pub size: u8,
    /// Signals packed into the frame with their bit offsets.
    pub signals: Vec<FrameSignal>,
}

/// A `(signal, bit offset)` entry inside a frame.
#[derive(Default, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct FrameSignal {
    pub name: String,
    pub offset: u16,
}

impl FrameSignal {
    pub fn new(name: &str, offset: u16) -> FrameSignal {
        FrameSignal {
            name: name.to_string(),
            offset,
        }
    }
}

impl LinFrame {
    pub fn new(name: &str, id: u8, publisher: &str, size: u8) -> LinFrame {
        LinFrame {
            name: name.to_string(),
            id,
            publisher: publisher.to_string(),
            size,
            signals: Vec::new(),
        }
    }

    /// Capacity of the payload in bits.
    pub fn bit_capacity(&self) -> u32 {
        u32::from(self.size) * 8
    }

    /// Protected identifier: the 6-bit id plus parity bits P0 (bit 6) and P1 (bit 7).
    ///
    /// P0 = ID0 ^ ID1 ^ ID2 ^ ID4, P1 = !(ID1 ^ ID3 ^ ID4 ^ ID5).
    pub fn pid(&self) -> u8 {
        let id: u8 = self.id & 0x3F;
        let bit = |n: u8| (id >> n) & 1;
        let p0: u8 = bit(0) ^ bit(1) ^ bit(2) ^ bit(4);
        let p1: u8 = !(bit(1) ^ bit(3) ^ bit(4) ^ bit(5)) & 1;
        id | (p0 << 6) | (p1 << 7)
    }

    /// Appends a signal entry.
    pub fn add_signal(&mut self, signal: FrameSignal) {
        self.signals.push(signal);
    }

    pub fn get_signal_by_name(&self, name: &str) -> Option<&FrameSignal> {
        self.signals.iter().find(|s| s.name == name)
    }

    /// Renames every entry pointing at `old_name`.
    pub fn update_signal_name(&mut self, old_name: &str, new_name: &str) {
        for s in self.signals.iter_mut().filter(|s| s.name == old_name) {
            s.name = new_name.to_string();
        }
    }

    /// Drops every entry pointing at `name`.
    pub fn delete_signal_by_name(&mut self, name: &str) {
        self.signals.retain(|s| s.name != name);
    }

    pub fn update_node_name(&mut self, old_name: &str, new_name: &str) {
        if self.publisher == old_name {
            self.publisher = new_name.to_string();
        }
    }

    /// Orders the signal entries by bit offset.
    pub fn sort_signals(&mut self) {
        self.signals.sort_by_key(|s| s.offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid() {
        // Reference values from the LIN 2.1 PID table
        assert_eq!(LinFrame::new("f", 0x00, "m", 8).pid(), 0x80);
        assert_eq!(LinFrame::new("f", 0x01, "m", 8).pid(), 0xC1);
        assert_eq!(LinFrame::new("f", 0x3C, "m", 8).pid(), 0x3C);
        assert_eq!(LinFrame::new("f", 0x3D, "m", 8).pid(), 0x7D);
        assert_eq!(LinFrame::new("f", 0x10, "m", 8).pid(), 0x50);
    }

    #[test]
    fn test_signal_entries() {
        let mut frame: LinFrame = LinFrame::new("DoorFrame", 1, "Door", 2);
        frame.add_signal(FrameSignal::new("B", 8));
        frame.add_signal(FrameSignal::new("A", 0));
        assert_eq!(frame.bit_capacity(), 16);

        frame.update_signal_name("A", "Alpha");
        assert!(frame.get_signal_by_name("Alpha").is_some());

        frame.sort_signals();
        assert_eq!(frame.signals[0].name, "Alpha");

        frame.delete_signal_by_name("B");
        assert_eq!(frame.signals.len(), 1);
    }
}
