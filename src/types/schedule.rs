use serde::{Deserialize, Serialize};
use std::fmt;

/// Schedule table executed by the master.
#[derive(Default, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct LinScheduleTable {
    pub name: String,
    pub entries: Vec<ScheduleEntry>,
}

/// One slot of a schedule table: a command plus the delay before the next slot.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub command: ScheduleCommand,
    /// Slot length in milliseconds (`delay <t> ms`).
    pub delay_ms: f64,
}

/// Command issued in a schedule slot. Every variant carries only what it needs.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ScheduleCommand {
    /// `<frame> delay ...`
    UnconditionalFrame { frame: String },
    /// `MasterReq delay ...`
    MasterReq,
    /// `SlaveResp delay ...`
    SlaveResp,
    /// `AssignNAD { <slave> } delay ...`
    AssignNad { slave: String },
    /// `DataDump { <slave>, d1, d2, d3, d4, d5 } delay ...`
    DataDump { slave: String, data: [u8; 5] },
    /// `SaveConfiguration { <slave> } delay ...`
    SaveConfiguration { slave: String },
    /// `FreeFormat { d1, ..., d8 } delay ...`
    FreeFormat { data: [u8; 8] },
    /// `AssignFrameIdRange { <slave>, <start index> [, pid0, pid1, pid2, pid3] } delay ...`
    AssignFrameIdRange {
        slave: String,
        start_index: u8,
        pids: Option<[u8; 4]>,
    },
    /// `AssignFrameId { <slave>, <frame> } delay ...`
    AssignFrameId { slave: String, frame: String },
}

impl ScheduleCommand {
    /// Frame referenced by the command, if any.
    pub fn frame_name(&self) -> Option<&str> {
        match self {
            ScheduleCommand::UnconditionalFrame { frame }
            | ScheduleCommand::AssignFrameId { frame, .. } => Some(frame.as_str()),
            _ => None,
        }
    }

    /// Slave node targeted by the command, if any.
    pub fn slave_name(&self) -> Option<&str> {
        match self {
            ScheduleCommand::AssignNad { slave }
            | ScheduleCommand::DataDump { slave, .. }
            | ScheduleCommand::SaveConfiguration { slave }
            | ScheduleCommand::AssignFrameIdRange { slave, .. }
            | ScheduleCommand::AssignFrameId { slave, .. } => Some(slave.as_str()),
            _ => None,
        }
    }

    pub fn update_frame_name(&mut self, old_name: &str, new_name: &str) {
        match self {
            ScheduleCommand::UnconditionalFrame { frame }
            | ScheduleCommand::AssignFrameId { frame, .. }
                if frame == old_name =>
            {
                *frame = new_name.to_string();
            }
            _ => {}
        }
    }

    pub fn update_slave_name(&mut self, old_name: &str, new_name: &str) {
        match self {
            ScheduleCommand::AssignNad { slave }
            | ScheduleCommand::DataDump { slave, .. }
            | ScheduleCommand::SaveConfiguration { slave }
            | ScheduleCommand::AssignFrameIdRange { slave, .. }
            | ScheduleCommand::AssignFrameId { slave, .. }
                if slave == old_name =>
            {
                *slave = new_name.to_string();
            }
            _ => {}
        }
    }

    /// LDF keyword of the command (the frame name for unconditional frames).
    pub fn keyword(&self) -> &str {
        match self {
            ScheduleCommand::UnconditionalFrame { frame } => frame.as_str(),
            ScheduleCommand::MasterReq => "MasterReq",
            ScheduleCommand::SlaveResp => "SlaveResp",
            ScheduleCommand::AssignNad { .. } => "AssignNAD",
            ScheduleCommand::DataDump { .. } => "DataDump",
            ScheduleCommand::SaveConfiguration { .. } => "SaveConfiguration",
            ScheduleCommand::FreeFormat { .. } => "FreeFormat",
            ScheduleCommand::AssignFrameIdRange { .. } => "AssignFrameIdRange",
            ScheduleCommand::AssignFrameId { .. } => "AssignFrameId",
        }
    }
}

/// Renders the command as LDF text, without the trailing `delay` part.
impl fmt::Display for ScheduleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = |bytes: &[u8]| -> String {
            bytes
                .iter()
                .map(|b| format!("0x{b:02X}"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        match self {
            ScheduleCommand::UnconditionalFrame { frame } => f.write_str(frame),
            ScheduleCommand::MasterReq | ScheduleCommand::SlaveResp => f.write_str(self.keyword()),
            ScheduleCommand::AssignNad { slave } | ScheduleCommand::SaveConfiguration { slave } => {
                write!(f, "{} {{ {} }}", self.keyword(), slave)
            }
            ScheduleCommand::DataDump { slave, data } => {
                write!(f, "DataDump {{ {}, {} }}", slave, hex(data.as_slice()))
            }
            ScheduleCommand::FreeFormat { data } => write!(f, "FreeFormat {{ {} }}", hex(data.as_slice())),
            ScheduleCommand::AssignFrameIdRange {
                slave,
                start_index,
                pids,
            } => match pids {
                Some(p) => write!(
                    f,
                    "AssignFrameIdRange {{ {}, {}, {} }}",
                    slave,
                    start_index,
                    hex(p.as_slice())
                ),
                None => write!(f, "AssignFrameIdRange {{ {}, {} }}", slave, start_index),
            },
            ScheduleCommand::AssignFrameId { slave, frame } => {
                write!(f, "AssignFrameId {{ {}, {} }}", slave, frame)
            }
        }
    }
}

impl ScheduleEntry {
    pub fn new(command: ScheduleCommand, delay_ms: f64) -> ScheduleEntry {
        ScheduleEntry { command, delay_ms }
    }
}

impl LinScheduleTable {
    pub fn new(name: &str) -> LinScheduleTable {
        LinScheduleTable {
            name: name.to_string(),
            entries: Vec::new(),
        }
    }

    pub fn add_entry(&mut self, entry: ScheduleEntry) {
        self.entries.push(entry);
    }

    pub fn update_commands_frame_name(&mut self, old_name: &str, new_name: &str) {
        for e in &mut self.entries {
            e.command.update_frame_name(old_name, new_name);
        }
    }

    pub fn update_commands_slave_name(&mut self, old_name: &str, new_name: &str) {
        for e in &mut self.entries {
            e.command.update_slave_name(old_name, new_name);
        }
    }

    /// Removes every slot whose command references the frame.
    pub fn delete_commands_by_frame_name(&mut self, name: &str) {
        self.entries
            .retain(|e| e.command.frame_name() != Some(name));
    }

    /// Removes every slot whose command targets the slave.
    pub fn delete_commands_by_slave_name(&mut self, name: &str) {
        self.entries
            .retain(|e| e.command.slave_name() != Some(name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_test_table() -> LinScheduleTable {
        let mut table: LinScheduleTable = LinScheduleTable::new("Normal");
        table.add_entry(ScheduleEntry::new(
            ScheduleCommand::UnconditionalFrame {
                frame: "DoorFrame".to_string(),
            },
            10.0,
        ));
        table.add_entry(ScheduleEntry::new(
            ScheduleCommand::AssignFrameId {
                slave: "Door".to_string(),
                frame: "DoorFrame".to_string(),
            },
            20.0,
        ));
        table.add_entry(ScheduleEntry::new(
            ScheduleCommand::AssignNad {
                slave: "Seat".to_string(),
            },
            20.0,
        ));
        table.add_entry(ScheduleEntry::new(ScheduleCommand::MasterReq, 10.0));
        table
    }

    #[test]
    fn test_references() {
        let table: LinScheduleTable = build_test_table();
        assert_eq!(table.entries[0].command.frame_name(), Some("DoorFrame"));
        assert_eq!(table.entries[0].command.slave_name(), None);
        assert_eq!(table.entries[1].command.slave_name(), Some("Door"));
        assert_eq!(table.entries[3].command.frame_name(), None);
    }

    #[test]
    fn test_rename_and_delete() {
        let mut table: LinScheduleTable = build_test_table();
        table.update_commands_frame_name("DoorFrame", "DoorFrame2");
        assert_eq!(table.entries[1].command.frame_name(), Some("DoorFrame2"));

        table.update_commands_slave_name("Seat", "Chair");
        assert_eq!(table.entries[2].command.slave_name(), Some("Chair"));

        table.delete_commands_by_frame_name("DoorFrame2");
        assert_eq!(table.entries.len(), 2);

        table.delete_commands_by_slave_name("Chair");
        assert_eq!(table.entries.len(), 1);
        assert_eq!(table.entries[0].command, ScheduleCommand::MasterReq);
    }

    #[test]
    fn test_display() {
        let dump = ScheduleCommand::DataDump {
            slave: "Door".to_string(),
            data: [1, 2, 3, 4, 0xFF],
        };
        assert_eq!(
            dump.to_string(),
            "DataDump { Door, 0x01, 0x02, 0x03, 0x04, 0xFF }"
        );
        let range = ScheduleCommand::AssignFrameIdRange {
            slave: "Door".to_string(),
            start_index: 0,
            pids: None,
        };
        assert_eq!(range.to_string(), "AssignFrameIdRange { Door, 0 }");
        assert_eq!(ScheduleCommand::SlaveResp.to_string(), "SlaveResp");
    }
}
