use log::{debug, warn};

use crate::ldf::core::{
    configurable_frames, encoding, frames, header, node_attributes, nodes, schedule_tables,
    signals, tokens,
};
use crate::ldf::scanner::{ScanEvent, Scanner};
use crate::types::{
    database::LinDatabase, encoding::LinEncodingType, node_attributes::LinNodeAttributes,
    schedule::LinScheduleTable,
};

/// Section of the file the parser is currently in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Section {
    None,
    Nodes,
    Signals,
    Frames,
    NodeAttributes,
    /// `configurable_frames { ... }` nested in a node of `Node_attributes`.
    ConfigurableFrames,
    ScheduleTables,
    EncodingTypes,
    EncodingSignals,
}

impl Section {
    fn from_keyword(keyword: &str) -> Option<Section> {
        match keyword {
            "Nodes" => Some(Section::Nodes),
            "Signals" => Some(Section::Signals),
            "Frames" => Some(Section::Frames),
            "Node_attributes" => Some(Section::NodeAttributes),
            "Schedule_tables" => Some(Section::ScheduleTables),
            "Signal_encoding_types" => Some(Section::EncodingTypes),
            "Signal_representation" => Some(Section::EncodingSignals),
            _ => None,
        }
    }
}

/// Statement interrupted by an inline brace group, waiting for its `;`.
/// Example: `Sig: 16, {0, 0}, Door, ECU;` arrives as three scanner events.
#[derive(Debug)]
struct Pending {
    text: String,
    open: usize,
}

/// Incremental LDF parser.
///
/// Text is fed character by character (or in chunks) through a scanner; each
/// statement is routed to a decoder according to the current section and nesting
/// depth, and decoded entities are appended to the database in file order.
/// Malformed statements are dropped.
///
/// Every instance is independent, so several files can be parsed at once.
///
/// # Example
/// ```
/// use lin_tools::ldf::Parser;
///
/// let mut parser = Parser::new();
/// parser.feed("Nodes { Master: ECU, 10 ms, 0 ms; Slaves: Door; }");
/// let db = parser.finish();
/// assert_eq!(db.slave_count(), 1);
/// ```
#[derive(Debug)]
pub struct Parser {
    scanner: Scanner,
    db: LinDatabase,
    section: Section,
    depth: usize,
    pending: Option<Pending>,
    /// Index of the frame, node attributes, schedule table or encoding type being filled.
    current: Option<usize>,
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new()
    }
}

impl Parser {
    pub fn new() -> Parser {
        Parser {
            scanner: Scanner::new(),
            db: LinDatabase::default(),
            section: Section::None,
            depth: 0,
            pending: None,
            current: None,
        }
    }

    /// Feeds a chunk of text.
    pub fn feed(&mut self, text: &str) {
        for ch in text.chars() {
            self.feed_char(ch);
        }
    }

    /// Feeds one character.
    pub fn feed_char(&mut self, ch: char) {
        if let Some(event) = self.scanner.push(ch) {
            self.handle(event);
        }
    }

    /// Flushes any trailing statement and returns the database.
    pub fn finish(mut self) -> LinDatabase {
        if let Some(event) = self.scanner.finish() {
            self.handle(event);
        }
        if let Some(pending) = self.pending.take() {
            warn!("unterminated statement '{}' at end of input", pending.text);
        }
        if self.depth > 0 {
            warn!("{} group(s) left open at end of input", self.depth);
        }
        self.db
    }

    fn handle(&mut self, event: ScanEvent) {
        match event {
            ScanEvent::Statement(text) => self.on_statement(text),
            ScanEvent::GroupStart(text) => self.on_group_start(text),
            ScanEvent::GroupEnd(text) => self.on_group_end(text),
        }
    }

    fn on_statement(&mut self, text: String) {
        let text: String = match self.pending.take() {
            Some(pending) => format!("{} {}", pending.text, text),
            None => text,
        };
        self.route_statement(&text);
    }

    fn on_group_start(&mut self, text: String) {
        if let Some(pending) = self.pending.as_mut() {
            pending.text.push(' ');
            pending.text.push_str(&text);
            pending.text.push_str(" {");
            pending.open += 1;
            return;
        }
        if self.accepts_inline_group() {
            self.pending = Some(Pending {
                text: format!("{text} {{"),
                open: 1,
            });
            return;
        }
        self.route_group_header(&text);
        self.depth += 1;
    }

    fn on_group_end(&mut self, text: String) {
        if let Some(pending) = self.pending.as_mut()
            && pending.open > 0
        {
            pending.text.push(' ');
            pending.text.push_str(&text);
            pending.text.push_str(" }");
            pending.open -= 1;
            return;
        }
        if !text.is_empty() || self.pending.is_some() {
            self.on_statement(text);
        }
        self.close_group();
    }

    /// Signal initial values and schedule command arguments are brace groups
    /// inside a single statement.
    fn accepts_inline_group(&self) -> bool {
        matches!(
            (self.section, self.depth),
            (Section::Signals, 1) | (Section::ScheduleTables, 2)
        )
    }

    fn close_group(&mut self) {
        if self.depth == 0 {
            warn!("ignoring unbalanced '}}'");
            return;
        }
        self.depth -= 1;
        match (self.section, self.depth) {
            (_, 0) => {
                debug!("leaving section {:?}", self.section);
                self.section = Section::None;
                self.current = None;
            }
            (Section::ConfigurableFrames, 2) => self.section = Section::NodeAttributes,
            (_, 1) => self.current = None,
            _ => {}
        }
    }

    fn route_group_header(&mut self, text: &str) {
        match (self.section, self.depth) {
            (Section::None, 0) => {
                let keyword: &str = text.split_whitespace().next().unwrap_or("");
                match Section::from_keyword(keyword) {
                    Some(section) => {
                        debug!("entering section {section:?}");
                        self.section = section;
                    }
                    None => debug!("skipping section '{text}'"),
                }
            }
            (Section::Frames, 1) => {
                self.current = frames::decode_header(text).map(|frame| {
                    self.db.frames.push(frame);
                    self.db.frames.len() - 1
                });
            }
            (Section::NodeAttributes, 1) => {
                self.current = self.named_header(text).map(|name| {
                    self.db.node_attributes.push(LinNodeAttributes::new(name));
                    self.db.node_attributes.len() - 1
                });
            }
            (Section::NodeAttributes, 2) if text.starts_with("configurable_frames") => {
                self.section = Section::ConfigurableFrames;
            }
            (Section::ScheduleTables, 1) => {
                self.current = self.named_header(text).map(|name| {
                    self.db.schedule_tables.push(LinScheduleTable::new(name));
                    self.db.schedule_tables.len() - 1
                });
            }
            (Section::EncodingTypes, 1) => {
                self.current = self.named_header(text).map(|name| {
                    self.db.encoding_types.push(LinEncodingType::new(name));
                    self.db.encoding_types.len() - 1
                });
            }
            _ => debug!("skipping group '{text}'"),
        }
    }

    fn named_header<'a>(&self, text: &'a str) -> Option<&'a str> {
        let name: &str = text.trim();
        if tokens::is_identifier(name) {
            Some(name)
        } else {
            warn!("dropping {:?} entry '{text}'", self.section);
            None
        }
    }

    fn route_statement(&mut self, text: &str) {
        match (self.section, self.depth) {
            (Section::None, 0) => header::decode(&mut self.db, text),
            (Section::Nodes, 1) => nodes::decode(&mut self.db, text),
            (Section::Signals, 1) => {
                if let Some(signal) = signals::decode(text) {
                    debug!("signal '{}'", signal.name);
                    self.db.signals.push(signal);
                }
            }
            (Section::Frames, 2) => {
                let frame = self.current.and_then(|i| self.db.frames.get_mut(i));
                match (frame, frames::decode_signal(text)) {
                    (Some(frame), Some(signal)) => frame.add_signal(signal),
                    _ => warn!("dropping frame signal '{text}'"),
                }
            }
            (Section::NodeAttributes, 2) => {
                match self.current.and_then(|i| self.db.node_attributes.get_mut(i)) {
                    Some(attrs) => node_attributes::decode_attribute(attrs, text),
                    None => warn!("dropping node attribute '{text}'"),
                }
            }
            (Section::ConfigurableFrames, 3) => {
                let attrs = self.current.and_then(|i| self.db.node_attributes.get_mut(i));
                match (attrs, configurable_frames::decode(text)) {
                    (Some(attrs), Some(frame)) => attrs.add_configurable_frame(frame),
                    _ => warn!("dropping configurable frame '{text}'"),
                }
            }
            (Section::ScheduleTables, 2) => {
                let table = self.current.and_then(|i| self.db.schedule_tables.get_mut(i));
                match (table, schedule_tables::decode(text)) {
                    (Some(table), Some(entry)) => table.add_entry(entry),
                    (None, _) => warn!("dropping schedule command '{text}'"),
                    _ => {}
                }
            }
            (Section::EncodingTypes, 2) => {
                let enc = self.current.and_then(|i| self.db.encoding_types.get_mut(i));
                match (enc, encoding::decode_value(text)) {
                    (Some(enc), Some(value)) => enc.add_value(value),
                    (None, _) => warn!("dropping encoding value '{text}'"),
                    _ => {}
                }
            }
            (Section::EncodingSignals, 1) => {
                if let Some(group) = encoding::decode_representation(text) {
                    self.db.encoding_signals.push(group);
                }
            }
            _ => debug!("skipping statement '{text}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        encoding::EncodingValue,
        node_attributes::ConfigurableFrame,
        schedule::ScheduleCommand,
        signal::SignalInitValue,
        version::LinVersion,
    };

    fn parse(text: &str) -> LinDatabase {
        let mut parser: Parser = Parser::new();
        parser.feed(text);
        parser.finish()
    }

    #[test]
    fn test_sections_and_depth() {
        let db: LinDatabase = parse(
            "LIN_description_file;
             LIN_protocol_version = \"2.1\";
             Nodes {
                 Master: ECU, 10 ms, 0.1 ms;
                 Slaves: Door;
             }
             Frames {
                 DoorFrame: 1, Door, 2 {
                     DoorStatus, 0;
                     DoorLock, 8;
                 }
                 Other: 2, ECU, 1 { }
             }
             LIN_speed = 9.6 kbps;",
        );
        assert!(db.is_lin_description_file);
        assert_eq!(db.protocol_version, Some(LinVersion::V2_1));
        assert_eq!(db.speed, 9600);
        assert_eq!(db.frame_count(), 2);
        let frame = db.get_frame_by_name("DoorFrame").unwrap();
        assert_eq!(frame.signals.len(), 2);
        assert_eq!(frame.signals[1].offset, 8);
        assert!(db.get_frame_by_name("Other").unwrap().signals.is_empty());
    }

    #[test]
    fn test_directives_only_at_top_level() {
        let db: LinDatabase = parse("Nodes { LIN_speed = 19.2 kbps; }");
        assert_eq!(db.speed, 0);
    }

    #[test]
    fn test_unknown_sections_are_skipped() {
        let db: LinDatabase = parse(
            "Diagnostic_frames {
                 MasterReq: 0x3C { MasterReqB0, 0; }
             }
             Sporadic_frames { Spo: A, B; }
             Signals { Sig: 8, 0, ECU, Door; }",
        );
        assert_eq!(db.frame_count(), 0);
        assert_eq!(db.signal_count(), 1);
    }

    #[test]
    fn test_inline_groups() {
        let db: LinDatabase = parse(
            "Signals {
                 Data: 16, {0, 0xFF}, Door, ECU;
                 Plain: 1, 1, ECU, Door;
             }
             Schedule_tables {
                 Diag {
                     AssignNAD { Door } delay 10 ms;
                     AssignFrameId { Door, DoorFrame } delay 10 ms;
                     Unknown { Door } delay 10 ms;
                     MasterReq delay 20 ms;
                 }
             }",
        );
        let data = db.get_signal_by_name("Data").unwrap();
        assert_eq!(data.init_value, SignalInitValue::Array(vec![0, 255]));
        assert_eq!(data.subscribers, vec!["ECU"]);
        assert_eq!(db.signal_count(), 2);

        let table = db.get_schedule_table_by_name("Diag").unwrap();
        assert_eq!(table.entries.len(), 3);
        assert_eq!(
            table.entries[0].command,
            ScheduleCommand::AssignNad {
                slave: "Door".to_string()
            }
        );
        assert_eq!(table.entries[1].command.frame_name(), Some("DoorFrame"));
        assert_eq!(table.entries[2].command, ScheduleCommand::MasterReq);
        assert_eq!(table.entries[2].delay_ms, 20.0);
    }

    #[test]
    fn test_node_attributes_and_configurable_frames() {
        let db: LinDatabase = parse(
            "Node_attributes {
                 Door {
                     LIN_protocol = \"2.0\";
                     configured_NAD = 0x02;
                     configurable_frames {
                         DoorFrame = 0x01;
                         Other;
                     }
                     P2_min = 10 ms;
                 }
                 Seat { LIN_protocol = \"2.1\"; }
             }",
        );
        assert_eq!(db.node_attributes().count(), 2);
        let door = db.get_node_attributes_by_name("Door").unwrap();
        assert_eq!(door.protocol, Some(LinVersion::V2_0));
        assert_eq!(door.configured_nad, 2);
        assert_eq!(door.p2_min_ms, 10.0);
        assert_eq!(
            door.configurable_frames,
            vec![
                ConfigurableFrame::new("DoorFrame", Some(1)),
                ConfigurableFrame::new("Other", None)
            ]
        );
        let seat = db.get_node_attributes_by_name("Seat").unwrap();
        assert_eq!(seat.protocol, Some(LinVersion::V2_1));
        assert_eq!(seat.configured_nad, 0xFF);
    }

    #[test]
    fn test_encodings() {
        let db: LinDatabase = parse(
            "Signal_encoding_types {
                 DoorEnc {
                     logical_value, 0, \"closed\";
                     physical_value, 1, 10, 1, 0, \"km/h\";
                 }
             }
             Signal_representation {
                 DoorEnc: DoorStatus;
             }",
        );
        let enc = db.get_encoding_type_by_name("DoorEnc").unwrap();
        assert_eq!(enc.values.len(), 2);
        assert!(matches!(
            &enc.values[1],
            EncodingValue::Physical { unit: Some(u), .. } if u == "km/h"
        ));
        assert_eq!(
            db.get_encoding_signal_group_by_name("DoorEnc").unwrap().signals,
            vec!["DoorStatus"]
        );
    }

    #[test]
    fn test_malformed_statements_are_dropped() {
        let db: LinDatabase = parse(
            "Signals {
                 Broken: eight, 0, Door, ECU;
                 Good: 8, 0, Door, ECU
             }
             Frames {
                 : 1, Door {
                     Good, 0;
                 }
             }
             }",
        );
        assert_eq!(db.signal_count(), 1);
        assert_eq!(db.frame_count(), 0);
    }

    #[test]
    fn test_independent_parsers() {
        let mut a: Parser = Parser::new();
        let mut b: Parser = Parser::new();
        a.feed("Nodes { Slaves: A");
        b.feed("Nodes { Slaves: B; }");
        a.feed("; }");
        assert_eq!(a.finish().slaves[0].name, "A");
        assert_eq!(b.finish().slaves[0].name, "B");
    }
}
